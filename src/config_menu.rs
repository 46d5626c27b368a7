//! The on-device configuration menu.
//!
//! Items form a ring (see [`CONFIG_RING`]). Each item is first shown by the
//! color of the marker pixel (MAIN) and a click opens it for editing (IN),
//! where every click adds a pixel to the item's segment. An item left alone
//! for [`CONFIG_MENU_ITEM_DURATION_MS`] hands over to the next one.

use crate::color::PURPLE;
use crate::led_strip::LedStrip;
use crate::lights::Lights;
use crate::operation_state::{ConfigItem, OperationState, CONFIG_RING};
use crate::segment_store::{SegmentStore, Storage};
use crate::sequencer::Sequencer;
use crate::{Result, CONFIG_MENU_ITEM_DURATION_MS};

const ARMED_BLINK_PERIOD_MS: u32 = 200;
const RESET_BLINK_PERIOD_MS: u32 = 75;
const RESET_BLINK_TOGGLES: u8 = 10;

/// Everything the menu and the modes act on
pub struct Rig<S: LedStrip, E: Storage> {
    pub lights: Lights<S>,
    pub sequencer: Sequencer,
    pub store: SegmentStore<E>,
}

impl<S: LedStrip, E: Storage> Rig<S, E> {
    pub fn new(lights: Lights<S>, store: SegmentStore<E>) -> Self {
        Self {
            lights,
            sequencer: Sequencer::new(),
            store,
        }
    }

    /// Fire due timer tasks against the current segments
    pub fn run_timers(&mut self, now: u32) -> Result<()> {
        let Rig {
            lights,
            sequencer,
            store,
        } = self;
        sequencer.run_due(now, lights, store.segments())
    }
}

#[derive(Default)]
pub struct ConfigMenu {
    elapsed_ms: u32,
    last_tick_ms: u32,
    modified: bool,
}

impl ConfigMenu {
    pub const fn new() -> Self {
        Self {
            elapsed_ms: 0,
            last_tick_ms: 0,
            modified: false,
        }
    }

    pub fn is_modified(&self) -> bool {
        self.modified
    }

    pub fn elapsed_ms(&self) -> u32 {
        self.elapsed_ms
    }

    fn restart_timer(&mut self, now: u32) {
        self.elapsed_ms = 0;
        self.last_tick_ms = now;
    }

    /// Open the menu on its first item. The lights are torn down and the
    /// marker shows the first item's color.
    pub fn enter<S: LedStrip, E: Storage>(
        &mut self,
        state: &mut OperationState,
        now: u32,
        rig: &mut Rig<S, E>,
    ) {
        let first = CONFIG_RING[0];
        *state = OperationState::ConfigMain(first);
        self.restart_timer(now);
        self.modified = false;

        rig.sequencer.cancel_all();
        rig.lights.turn_off();
        rig.lights.marker(first.marker_color());
    }

    /// Close the menu and persist the edited segments
    pub fn exit<S: LedStrip, E: Storage>(&mut self, rig: &mut Rig<S, E>) {
        self.modified = false;
        rig.store.commit();
    }

    pub fn click<S: LedStrip, E: Storage>(
        &mut self,
        state: &mut OperationState,
        now: u32,
        rig: &mut Rig<S, E>,
    ) -> Result<()> {
        match *state {
            OperationState::ConfigMain(item) => {
                *state = OperationState::ConfigIn(item);
                self.restart_timer(now);
                rig.sequencer.cancel_all();
                match item.channel() {
                    Some(channel) => {
                        let count = rig.store.segments().count(channel);
                        rig.sequencer.blink_count(now, count)
                    }
                    None => rig
                        .sequencer
                        .blink_marker(now, PURPLE, ARMED_BLINK_PERIOD_MS, None),
                }
            }
            OperationState::ConfigIn(item) => match item.channel() {
                Some(channel) => {
                    let count = rig.store.segments_mut().increment(channel);
                    rig.lights.set_lengths(rig.store.segments());
                    self.modified = true;
                    self.restart_timer(now);
                    rig.sequencer.blink_count(now, count)
                }
                None => Ok(()),
            },
            _ => Ok(()),
        }
    }

    /// Long press while editing the factory reset item resets right away.
    /// Long presses in MAIN states are handled by the caller (exit).
    pub fn long_press<S: LedStrip, E: Storage>(
        &mut self,
        state: &mut OperationState,
        now: u32,
        rig: &mut Rig<S, E>,
    ) -> Result<()> {
        if *state != OperationState::ConfigIn(ConfigItem::FactoryReset) {
            return Ok(());
        }
        self.reset_to_defaults(rig);
        self.restart_timer(now);
        rig.sequencer
            .blink_marker(now, PURPLE, RESET_BLINK_PERIOD_MS, None)
    }

    /// Advance the item timer. When the current item timed out, move to the
    /// next item's MAIN state and return `true`.
    pub fn tick<S: LedStrip, E: Storage>(
        &mut self,
        state: &mut OperationState,
        now: u32,
        rig: &mut Rig<S, E>,
    ) -> Result<bool> {
        let item = match *state {
            OperationState::ConfigMain(item) | OperationState::ConfigIn(item) => item,
            _ => return Ok(false),
        };

        self.elapsed_ms = self
            .elapsed_ms
            .saturating_add(now.wrapping_sub(self.last_tick_ms));
        self.last_tick_ms = now;
        if self.elapsed_ms < CONFIG_MENU_ITEM_DURATION_MS {
            return Ok(false);
        }

        let editing = matches!(*state, OperationState::ConfigIn(_));
        let next = item.next();
        *state = OperationState::ConfigMain(next);
        self.restart_timer(now);
        rig.sequencer.cancel_all();

        if editing && item == ConfigItem::FactoryReset {
            self.reset_to_defaults(rig);
            self.modified = false;
            rig.sequencer.blink_marker(
                now,
                PURPLE,
                RESET_BLINK_PERIOD_MS,
                Some(RESET_BLINK_TOGGLES),
            )?;
            let settle = RESET_BLINK_PERIOD_MS * (RESET_BLINK_TOGGLES as u32 + 1);
            rig.sequencer
                .settle_marker_after(now, settle, next.marker_color())?;
        } else if editing && self.modified {
            self.modified = false;
            rig.sequencer
                .rapid_blink_then_marker(now, next.marker_color())?;
        } else {
            self.modified = false;
            rig.lights.marker(next.marker_color());
        }
        Ok(true)
    }

    /// Compiled defaults back in memory and storage, strips resized
    fn reset_to_defaults<S: LedStrip, E: Storage>(&mut self, rig: &mut Rig<S, E>) {
        rig.store.factory_reset();
        rig.lights.set_lengths(rig.store.segments());
        self.modified = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::{Color, BLACK, BLUE, GREEN, RED, WHITE};
    use crate::lights::tests::{fake_lights, FakeStrip};
    use crate::segment::{Channel, Segments};
    use crate::segment_store::tests::MemoryStorage;

    fn rig() -> Rig<FakeStrip, MemoryStorage> {
        let mut store = SegmentStore::new(MemoryStorage::blank());
        store.seed_defaults();
        store.load().unwrap();
        let lights = fake_lights(store.segments());
        Rig::new(lights, store)
    }

    fn marker(rig: &Rig<FakeStrip, MemoryStorage>) -> Color {
        rig.lights.port_nav.shown[0]
    }

    fn run(
        menu: &mut ConfigMenu,
        state: &mut OperationState,
        rig: &mut Rig<FakeStrip, MemoryStorage>,
        from: u32,
        to: u32,
    ) {
        for now in from..to {
            rig.run_timers(now).unwrap();
            menu.tick(state, now, rig).unwrap();
        }
    }

    #[test]
    fn enter_shows_first_item() {
        let mut rig = rig();
        let mut menu = ConfigMenu::new();
        let mut state = OperationState::Normal;
        rig.sequencer.install_normal(0).unwrap();

        menu.enter(&mut state, 100, &mut rig);
        assert_eq!(state, OperationState::ConfigMain(ConfigItem::Nav));
        assert_eq!(marker(&rig), GREEN);
        assert!(rig.sequencer.is_idle());
    }

    #[test]
    fn idle_menu_walks_the_ring() {
        let mut rig = rig();
        let mut menu = ConfigMenu::new();
        let mut state = OperationState::Normal;
        menu.enter(&mut state, 0, &mut rig);

        let mut seen = Vec::new();
        for now in 1..=15_000 {
            if menu.tick(&mut state, now, &mut rig).unwrap() {
                seen.push((now, state));
            }
        }
        assert_eq!(
            seen,
            vec![
                (3000, OperationState::ConfigMain(ConfigItem::Strobe)),
                (6000, OperationState::ConfigMain(ConfigItem::Beacon)),
                (9000, OperationState::ConfigMain(ConfigItem::Landing)),
                (12_000, OperationState::ConfigMain(ConfigItem::FactoryReset)),
                (15_000, OperationState::ConfigMain(ConfigItem::Nav)),
            ]
        );
        assert_eq!(marker(&rig), GREEN);
    }

    #[test]
    fn click_opens_item_and_blinks_its_count() {
        let mut rig = rig();
        let mut menu = ConfigMenu::new();
        let mut state = OperationState::Normal;
        menu.enter(&mut state, 0, &mut rig);
        menu.click(&mut state, 10, &mut rig).unwrap();
        assert_eq!(state, OperationState::ConfigIn(ConfigItem::Nav));
        assert_eq!(rig.sequencer.pending_plain(), 3);

        rig.run_timers(10).unwrap();
        assert_eq!(marker(&rig), BLACK);
        rig.run_timers(410).unwrap();
        assert_eq!(marker(&rig), WHITE);
    }

    #[test]
    fn edit_wraps_and_resizes_strips() {
        let mut rig = rig();
        let mut menu = ConfigMenu::new();
        let mut state = OperationState::ConfigMain(ConfigItem::Nav);
        menu.click(&mut state, 0, &mut rig).unwrap();

        menu.click(&mut state, 100, &mut rig).unwrap();
        assert_eq!(rig.store.segments().count(Channel::Nav), 2);
        assert_eq!(rig.lights.port_nav.length, 3);
        assert!(menu.is_modified());

        menu.click(&mut state, 200, &mut rig).unwrap();
        assert_eq!(rig.store.segments().count(Channel::Nav), 1);
        assert_eq!(rig.lights.starboard_nav.length, 2);
        assert_eq!(state, OperationState::ConfigIn(ConfigItem::Nav));
    }

    #[test]
    fn edits_stay_in_memory_until_exit() {
        let mut rig = rig();
        let mut menu = ConfigMenu::new();
        let mut state = OperationState::ConfigMain(ConfigItem::Beacon);
        menu.click(&mut state, 0, &mut rig).unwrap();
        menu.click(&mut state, 100, &mut rig).unwrap();
        assert_eq!(rig.store.storage().bytes[2], 1);

        menu.exit(&mut rig);
        assert_eq!(rig.store.storage().bytes[2], 2);
    }

    #[test]
    fn click_restarts_item_timer() {
        let mut rig = rig();
        let mut menu = ConfigMenu::new();
        let mut state = OperationState::Normal;
        menu.enter(&mut state, 0, &mut rig);
        menu.click(&mut state, 2000, &mut rig).unwrap();
        run(&mut menu, &mut state, &mut rig, 2000, 4999);
        assert_eq!(state, OperationState::ConfigIn(ConfigItem::Nav));
        run(&mut menu, &mut state, &mut rig, 4999, 5001);
        assert_eq!(state, OperationState::ConfigMain(ConfigItem::Strobe));
    }

    #[test]
    fn modified_item_confirms_with_rapid_blink() {
        let mut rig = rig();
        let mut menu = ConfigMenu::new();
        let mut state = OperationState::ConfigMain(ConfigItem::Strobe);
        menu.click(&mut state, 0, &mut rig).unwrap();
        menu.click(&mut state, 0, &mut rig).unwrap();
        run(&mut menu, &mut state, &mut rig, 0, 3001);
        assert_eq!(state, OperationState::ConfigMain(ConfigItem::Beacon));
        assert!(!menu.is_modified());
        assert_eq!(rig.sequencer.pending_color(), 1);

        run(&mut menu, &mut state, &mut rig, 3001, 4000);
        assert_eq!(marker(&rig), RED);
        assert!(rig.sequencer.is_idle());
    }

    #[test]
    fn unmodified_item_shows_next_marker_directly() {
        let mut rig = rig();
        let mut menu = ConfigMenu::new();
        let mut state = OperationState::ConfigMain(ConfigItem::Nav);
        menu.click(&mut state, 0, &mut rig).unwrap();
        run(&mut menu, &mut state, &mut rig, 0, 3001);
        assert_eq!(state, OperationState::ConfigMain(ConfigItem::Strobe));
        assert_eq!(marker(&rig), BLUE);
        assert!(rig.sequencer.is_idle());
    }

    #[test]
    fn factory_reset_on_timeout() {
        let mut rig = rig();
        rig.store.segments_mut().increment(Channel::Landing);
        rig.store.segments_mut().increment(Channel::Nav);
        rig.store.commit();

        let mut menu = ConfigMenu::new();
        let mut state = OperationState::ConfigMain(ConfigItem::FactoryReset);
        menu.click(&mut state, 0, &mut rig).unwrap();
        assert_eq!(state, OperationState::ConfigIn(ConfigItem::FactoryReset));
        assert_eq!(rig.sequencer.pending_color(), 1);

        // Clicks do nothing while armed
        menu.click(&mut state, 500, &mut rig).unwrap();
        run(&mut menu, &mut state, &mut rig, 0, 3001);
        assert_eq!(state, OperationState::ConfigMain(ConfigItem::Nav));
        assert_eq!(*rig.store.segments(), Segments::defaults());
        assert_eq!(rig.store.storage().bytes, [1, 1, 1, 2, 0, 1, 0, 0]);
        assert_eq!(rig.lights.port_nav.length, 2);
        assert_eq!(rig.lights.landing.length, 2);

        run(&mut menu, &mut state, &mut rig, 3001, 4000);
        assert_eq!(marker(&rig), GREEN);
        assert!(rig.sequencer.is_idle());
    }

    #[test]
    fn long_press_resets_and_stays_armed() {
        let mut rig = rig();
        rig.store.segments_mut().increment(Channel::Beacon);
        let mut menu = ConfigMenu::new();
        let mut state = OperationState::ConfigMain(ConfigItem::FactoryReset);
        menu.click(&mut state, 0, &mut rig).unwrap();
        menu.long_press(&mut state, 2500, &mut rig).unwrap();

        assert_eq!(state, OperationState::ConfigIn(ConfigItem::FactoryReset));
        assert_eq!(rig.store.segments().count(Channel::Beacon), 1);
        assert!(menu.is_modified());
        assert_eq!(menu.elapsed_ms(), 0);
    }

    #[test]
    fn long_press_elsewhere_is_ignored() {
        let mut rig = rig();
        let mut menu = ConfigMenu::new();
        let mut state = OperationState::ConfigMain(ConfigItem::Landing);
        menu.click(&mut state, 0, &mut rig).unwrap();
        menu.click(&mut state, 10, &mut rig).unwrap();
        menu.long_press(&mut state, 20, &mut rig).unwrap();
        assert_eq!(state, OperationState::ConfigIn(ConfigItem::Landing));
        assert_eq!(rig.store.segments().count(Channel::Landing), 3);
    }
}
