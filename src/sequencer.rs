//! Timer-driven light sequences: the NORMAL strobe/beacon ladder and the
//! marker blinks of the configuration menu.
//!
//! Pixels are only touched from [`Sequencer::run_due`], when a task fires.

use crate::color::{Color, BLACK, RED, WHITE};
use crate::led_strip::LedStrip;
use crate::lights::Lights;
use crate::scheduler::{Payload, Repeat, Scheduler, TaskId};
use crate::segment::Segments;
use crate::{Result, COLOR_POOL_CAPACITY, PLAIN_POOL_CAPACITY};

const STROBE_PERIOD_MS: u32 = 1000;
const COUNT_BLINK_HALF_PERIOD_MS: u32 = 200;
const RAPID_BLINK_HALF_PERIOD_MS: u32 = 75;
const RAPID_BLINK_COUNT: u32 = 5;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Command {
    /// Starters of the NORMAL ladder; each installs one repeating task
    ArmStrobeOn,
    ArmStrobeOff,
    ArmBeaconOn,
    ArmBeaconOff,
    StrobeOn,
    StrobeOff,
    BeaconOn,
    BeaconOff,
    /// Light the marker in the payload color, white if plain
    MarkerOn,
    MarkerOff,
    ToggleMarker,
}

impl TaskId for Command {}

pub struct Sequencer {
    plain: Scheduler<Command, PLAIN_POOL_CAPACITY>,
    color: Scheduler<Command, COLOR_POOL_CAPACITY>,
    marker_lit: bool,
    /// Remaining toggles of a bounded marker blink
    toggles_left: Option<u8>,
}

impl Sequencer {
    pub const fn new() -> Self {
        Self {
            plain: Scheduler::new(),
            color: Scheduler::new(),
            marker_lit: false,
            toggles_left: None,
        }
    }

    /// Strobe double flash and beacon flash, once per second
    pub fn install_normal(&mut self, now: u32) -> Result<()> {
        self.plain.after(now, 0, Command::ArmStrobeOn, Payload::Plain)?;
        self.plain.after(now, 50, Command::ArmStrobeOff, Payload::Plain)?;
        self.plain.after(now, 100, Command::ArmStrobeOn, Payload::Plain)?;
        self.plain.after(now, 150, Command::ArmStrobeOff, Payload::Plain)?;
        self.plain.after(now, 500, Command::ArmBeaconOn, Payload::Plain)?;
        self.plain.after(now, 600, Command::ArmBeaconOff, Payload::Plain)
    }

    pub fn cancel_all(&mut self) {
        self.plain.cancel_all();
        self.cancel_color();
    }

    pub fn cancel_color(&mut self) {
        self.color.cancel_all();
        self.toggles_left = None;
    }

    /// Blink the marker white `count` times, replacing any running ladder
    pub fn blink_count(&mut self, now: u32, count: u8) -> Result<()> {
        self.plain.cancel_all();
        self.plain.after(now, 0, Command::MarkerOff, Payload::Plain)?;
        let mut at = 2 * COUNT_BLINK_HALF_PERIOD_MS;
        for _ in 0..count {
            self.plain.after(now, at, Command::MarkerOn, Payload::Plain)?;
            at += COUNT_BLINK_HALF_PERIOD_MS;
            self.plain.after(now, at, Command::MarkerOff, Payload::Plain)?;
            at += COUNT_BLINK_HALF_PERIOD_MS;
        }
        Ok(())
    }

    /// Five quick blinks in `color`, then the marker stays lit in `color`
    pub fn rapid_blink_then_marker(&mut self, now: u32, color: Color) -> Result<()> {
        self.plain.cancel_all();
        self.plain.after(now, 0, Command::MarkerOff, Payload::Plain)?;
        let mut at = 2 * RAPID_BLINK_HALF_PERIOD_MS;
        for _ in 0..RAPID_BLINK_COUNT {
            let lit = Payload::WithColor(color);
            self.plain.after(now, at, Command::MarkerOn, lit)?;
            at += RAPID_BLINK_HALF_PERIOD_MS;
            self.plain.after(now, at, Command::MarkerOff, Payload::Plain)?;
            at += RAPID_BLINK_HALF_PERIOD_MS;
        }
        self.color
            .after(now, at, Command::MarkerOn, Payload::WithColor(color))
    }

    /// Toggle the marker every `period` ms on the color pool, the first
    /// toggle lighting it. Stops after `toggles` toggles if given.
    pub fn blink_marker(
        &mut self,
        now: u32,
        color: Color,
        period: u32,
        toggles: Option<u8>,
    ) -> Result<()> {
        self.cancel_color();
        self.marker_lit = false;
        self.toggles_left = toggles;
        self.color
            .every(now, period, Command::ToggleMarker, Payload::WithColor(color))
    }

    /// Light the marker in `color` after `delay` ms
    pub fn settle_marker_after(&mut self, now: u32, delay: u32, color: Color) -> Result<()> {
        self.color
            .after(now, delay, Command::MarkerOn, Payload::WithColor(color))
    }

    /// Fire every due task, plain pool first. All due tasks run even if one
    /// fails; the first error is returned.
    pub fn run_due<S: LedStrip>(
        &mut self,
        now: u32,
        lights: &mut Lights<S>,
        segments: &Segments,
    ) -> Result<()> {
        let mut result = Ok(());
        while let Some(task) = self.plain.pop_due(now) {
            let fired = self
                .dispatch(task.id, task.payload, now, lights, segments)
                .and_then(|repeat| match repeat {
                    Repeat::Continue => self.plain.reschedule(task, now),
                    Repeat::Stop => Ok(()),
                });
            result = result.and(fired);
        }
        while let Some(task) = self.color.pop_due(now) {
            let fired = self
                .dispatch(task.id, task.payload, now, lights, segments)
                .and_then(|repeat| match repeat {
                    Repeat::Continue => self.color.reschedule(task, now),
                    Repeat::Stop => Ok(()),
                });
            result = result.and(fired);
        }
        result
    }

    fn dispatch<S: LedStrip>(
        &mut self,
        command: Command,
        payload: Payload,
        now: u32,
        lights: &mut Lights<S>,
        segments: &Segments,
    ) -> Result<Repeat> {
        match command {
            Command::ArmStrobeOn => self.arm(now, Command::StrobeOn)?,
            Command::ArmStrobeOff => self.arm(now, Command::StrobeOff)?,
            Command::ArmBeaconOn => self.arm(now, Command::BeaconOn)?,
            Command::ArmBeaconOff => self.arm(now, Command::BeaconOff)?,
            Command::StrobeOn => lights.strobe(WHITE, segments),
            Command::StrobeOff => lights.strobe(BLACK, segments),
            Command::BeaconOn => lights.beacon(RED, segments),
            Command::BeaconOff => lights.beacon(BLACK, segments),
            Command::MarkerOn => {
                lights.marker(payload.color_or(WHITE));
                self.marker_lit = true;
            }
            Command::MarkerOff => {
                lights.marker(BLACK);
                self.marker_lit = false;
            }
            Command::ToggleMarker => {
                self.marker_lit = !self.marker_lit;
                lights.marker(if self.marker_lit {
                    payload.color_or(WHITE)
                } else {
                    BLACK
                });
                if let Some(left) = self.toggles_left.as_mut() {
                    *left = left.saturating_sub(1);
                    if *left == 0 {
                        self.toggles_left = None;
                        return Ok(Repeat::Stop);
                    }
                }
            }
        }
        Ok(Repeat::Continue)
    }

    fn arm(&mut self, now: u32, command: Command) -> Result<()> {
        self.plain
            .every(now, STROBE_PERIOD_MS, command, Payload::Plain)
    }

    pub fn pending_plain(&self) -> usize {
        self.plain.len()
    }

    pub fn pending_color(&self) -> usize {
        self.color.len()
    }

    pub fn is_idle(&self) -> bool {
        self.plain.is_empty() && self.color.is_empty()
    }

    pub fn is_pending(&self, command: Command) -> bool {
        self.plain.contains(command) || self.color.contains(command)
    }
}

impl Default for Sequencer {
    fn default() -> Self {
        Self::new()
    }
}
