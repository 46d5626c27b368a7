#![cfg_attr(not(any(test, feature = "std")), no_std)]

//! Behavioral core of the navigation-lights controller.
//!
//! Everything in here is hardware independent: strips, storage and the clock
//! come in through traits, so the state machines run the same on the board
//! and in host tests. The AVR firmware lives in `main.rs`.

pub mod app;
pub mod button;
pub mod color;
pub mod config_menu;
pub mod led_strip;
pub mod lights;
pub mod operation_state;
pub mod pulse;
pub mod scheduler;
pub mod segment;
pub mod segment_store;
pub mod sequencer;
pub mod serial_wrapper;

use crate::segment::Channel;
use ufmt::derive::uDebug;

/// Time a config menu item stays selected before the ring advances
pub const CONFIG_MENU_ITEM_DURATION_MS: u32 = 3000;

/// Hold time for a long press
pub const LONG_CLICK_MS: u32 = 2000;

/// Minimum stable time of the button input
pub const DEBOUNCE_MS: u32 = 50;

/// Brightness applied to every strip
pub const NEO_PIXEL_BRIGHTNESS: u8 = 12;

/// Capacity of the plain timer pool
pub const PLAIN_POOL_CAPACITY: usize = 12;

/// Capacity of the color timer pool
pub const COLOR_POOL_CAPACITY: usize = 2;

/// Pixels needed by the longest strip (nav + strobe at their maxima)
pub const MAX_STRIP_PIXELS: usize = 4;

#[derive(Copy, Clone, Debug, PartialEq, Eq, uDebug)]
pub enum Error {
    /// A timer pool had no free slot, the task was dropped
    SchedulerFull,
    /// A persisted segment count was out of range and replaced by its default
    InvalidSegment(Channel),
}

pub type Result<T> = core::result::Result<T, Error>;
