//! Polled push button with debouncing and long-press detection.

use crate::{DEBOUNCE_MS, LONG_CLICK_MS};
use embedded_hal::digital::v2::InputPin;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ButtonEvent {
    /// Pressed and released before the long-press time
    Click,
    /// Held for the long-press time; the following release emits nothing
    LongPressStart,
}

/// A button wired to ground, read through a pull-up: low means pressed.
///
/// [`poll`](Button::poll) must be called once per loop iteration with the
/// current time. A level change counts only after it stayed put for
/// [`DEBOUNCE_MS`].
pub struct Button<P: InputPin> {
    pin: P,
    raw_pressed: bool,
    raw_since: u32,
    pressed: bool,
    pressed_at: u32,
    long_press_sent: bool,
}

impl<P: InputPin> Button<P> {
    pub fn new(pin: P) -> Self {
        Self {
            pin,
            raw_pressed: false,
            raw_since: 0,
            pressed: false,
            pressed_at: 0,
            long_press_sent: false,
        }
    }

    /// Debounced level
    pub fn is_pressed(&self) -> bool {
        self.pressed
    }

    pub fn poll(&mut self, now: u32) -> Option<ButtonEvent> {
        // An unreadable pin counts as released
        let raw_pressed = self.pin.is_low().unwrap_or(false);
        if raw_pressed != self.raw_pressed {
            self.raw_pressed = raw_pressed;
            self.raw_since = now;
        }

        if raw_pressed != self.pressed && now.wrapping_sub(self.raw_since) >= DEBOUNCE_MS {
            self.pressed = raw_pressed;
            if raw_pressed {
                self.pressed_at = self.raw_since;
                self.long_press_sent = false;
            } else if !self.long_press_sent {
                return Some(ButtonEvent::Click);
            }
        }

        if self.pressed
            && !self.long_press_sent
            && now.wrapping_sub(self.pressed_at) >= LONG_CLICK_MS
        {
            self.long_press_sent = true;
            return Some(ButtonEvent::LongPressStart);
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::convert::Infallible;
    use std::cell::Cell;
    use std::rc::Rc;

    /// Level shared with the test; `true` means the line is pulled low
    #[derive(Clone, Default)]
    struct FakePin(Rc<Cell<bool>>);

    impl InputPin for FakePin {
        type Error = Infallible;

        fn is_high(&self) -> Result<bool, Infallible> {
            Ok(!self.0.get())
        }

        fn is_low(&self) -> Result<bool, Infallible> {
            Ok(self.0.get())
        }
    }

    fn button() -> (Button<FakePin>, Rc<Cell<bool>>) {
        let pin = FakePin::default();
        let level = pin.0.clone();
        (Button::new(pin), level)
    }

    fn poll_range(button: &mut Button<FakePin>, from: u32, to: u32) -> Vec<(u32, ButtonEvent)> {
        (from..to)
            .filter_map(|now| button.poll(now).map(|event| (now, event)))
            .collect()
    }

    #[test]
    fn short_press_clicks_on_release() {
        let (mut button, level) = button();
        level.set(true);
        assert!(poll_range(&mut button, 0, 300).is_empty());
        assert!(button.is_pressed());

        level.set(false);
        assert_eq!(
            poll_range(&mut button, 300, 400),
            vec![(350, ButtonEvent::Click)]
        );
    }

    #[test]
    fn long_press_fires_once_while_held() {
        let (mut button, level) = button();
        level.set(true);
        assert_eq!(
            poll_range(&mut button, 10, 5000),
            vec![(2010, ButtonEvent::LongPressStart)]
        );

        level.set(false);
        assert!(poll_range(&mut button, 5000, 5200).is_empty());
    }

    #[test]
    fn bounces_are_ignored() {
        let (mut button, level) = button();
        for now in 0..200 {
            // 20 ms high, 20 ms low
            level.set((now / 20) % 2 == 1);
            assert_eq!(button.poll(now), None);
        }
        assert!(!button.is_pressed());
    }

    #[test]
    fn press_after_long_press_clicks_again() {
        let (mut button, level) = button();
        level.set(true);
        poll_range(&mut button, 0, 2100);
        level.set(false);
        poll_range(&mut button, 2100, 2200);

        level.set(true);
        poll_range(&mut button, 2200, 2300);
        level.set(false);
        assert_eq!(
            poll_range(&mut button, 2300, 2400),
            vec![(2350, ButtonEvent::Click)]
        );
    }
}
