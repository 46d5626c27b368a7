//! Pulse-width decoding of the two RC receiver channels.
//!
//! The edge interrupt of each channel calls [`PulseChannel::record_edge`]
//! with a microsecond timestamp. The main loop picks up freshly accepted
//! widths with [`PulseChannel::take_fresh`] and maps them to commands with
//! [`landing_lights_requested`] and [`requested_display_mode`].

use crate::operation_state::DisplayMode;
use portable_atomic::{AtomicU32, Ordering};

/// Anything at or above this is idle-line time or noise, not a pulse
pub const MAX_PULSE_WIDTH_US: u32 = 2015;
pub const HIGH_PWM_POSITION_US: u32 = 1900;
pub const LOW_PWM_POSITION_US: u32 = 1100;

const RAINBOW_BAND_CENTER_US: u32 = 1500;
const RAINBOW_BAND_HALF_WIDTH_US: u32 = 100;

/// Sample state shared between one edge interrupt (writer) and the main loop
/// (reader)
pub struct PulseChannel {
    last_edge_us: AtomicU32,
    width_us: AtomicU32,
    accepted: AtomicU32,
    consumed: AtomicU32,
}

impl PulseChannel {
    pub const fn new() -> Self {
        Self {
            last_edge_us: AtomicU32::new(0),
            width_us: AtomicU32::new(0),
            accepted: AtomicU32::new(0),
            consumed: AtomicU32::new(0),
        }
    }

    /// Interrupt side. `now_us` must be read with interrupts disabled.
    ///
    /// Timestamps are compared modulo 2^32, so the microsecond clock may wrap.
    /// An edge at most one pulse ceiling behind the stored one (another edge
    /// slipped in between snapshot and update) is dropped. Any other gap only
    /// moves the reference, so a channel silent for longer than half the
    /// clock range picks up again on its next edge.
    pub fn record_edge(&self, now_us: u32) {
        let last_edge_us = self.last_edge_us.load(Ordering::Acquire);
        let elapsed_us = now_us.wrapping_sub(last_edge_us);
        if elapsed_us == 0 || elapsed_us > u32::MAX - MAX_PULSE_WIDTH_US {
            return;
        }

        if elapsed_us < MAX_PULSE_WIDTH_US {
            self.width_us.store(elapsed_us, Ordering::Release);
            self.accepted.fetch_add(1, Ordering::AcqRel);
        }
        self.last_edge_us.store(now_us, Ordering::Release);
    }

    /// Latest accepted width, fresh or not
    pub fn width_us(&self) -> u32 {
        self.width_us.load(Ordering::Acquire)
    }

    /// Loop side. Returns the latest accepted width if one arrived since the
    /// previous call.
    pub fn take_fresh(&self) -> Option<u32> {
        critical_section::with(|_| {
            let accepted = self.accepted.load(Ordering::Acquire);
            if accepted == self.consumed.load(Ordering::Acquire) {
                None
            } else {
                self.consumed.store(accepted, Ordering::Release);
                Some(self.width_us.load(Ordering::Acquire))
            }
        })
    }
}

impl Default for PulseChannel {
    fn default() -> Self {
        Self::new()
    }
}

/// Single threshold, no hysteresis
pub fn landing_lights_requested(width_us: u32) -> bool {
    width_us > HIGH_PWM_POSITION_US
}

/// Map a mode-select width to a display mode. Widths between the bands
/// select nothing.
pub fn requested_display_mode(width_us: u32) -> Option<DisplayMode> {
    if width_us > HIGH_PWM_POSITION_US {
        Some(DisplayMode::Chase)
    } else if width_us > RAINBOW_BAND_CENTER_US - RAINBOW_BAND_HALF_WIDTH_US
        && width_us < RAINBOW_BAND_CENTER_US + RAINBOW_BAND_HALF_WIDTH_US
    {
        Some(DisplayMode::Rainbow)
    } else if width_us < LOW_PWM_POSITION_US {
        Some(DisplayMode::Normal)
    } else {
        None
    }
}
