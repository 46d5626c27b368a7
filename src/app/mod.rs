//! Top-level controller: owns the operation state and routes button, pulse
//! and timer events to the modes and the configuration menu.

use crate::button::ButtonEvent;
use crate::color::{complement, wheel, HueSource};
use crate::config_menu::{ConfigMenu, Rig};
use crate::led_strip::{LedStrip, Pattern, PatternKind};
use crate::lights::Lights;
use crate::operation_state::{ConfigItem, DisplayMode, OperationState};
use crate::pulse::{landing_lights_requested, requested_display_mode};
use crate::segment::Segments;
use crate::segment_store::{SegmentStore, Storage};
use crate::serial_wrapper::SerialWrapper;
use crate::Error;
use ufmt::uWrite;
use void::ResultVoidExt;

const RAINBOW_INTERVAL_MS: u32 = 3;
const CHASE_INTERVAL_MS: u32 = 100;

/// What happened since the previous loop iteration
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct LoopInputs {
    pub button: Option<ButtonEvent>,
    /// Freshly accepted width of the landing-toggle channel
    pub landing_pulse: Option<u32>,
    /// Freshly accepted width of the mode-select channel
    pub mode_pulse: Option<u32>,
}

pub struct App<S: LedStrip, E: Storage, W: uWrite> {
    state: OperationState,
    rig: Rig<S, E>,
    menu: ConfigMenu,
    landing_lights_on: bool,
    hue: HueSource,
    serial: SerialWrapper<W>,
}

impl<S: LedStrip, E: Storage, W: uWrite> App<S, E, W> {
    pub fn new(lights: Lights<S>, storage: E, serial: SerialWrapper<W>, seed: u32) -> Self {
        Self {
            state: OperationState::Init,
            rig: Rig::new(lights, SegmentStore::new(storage)),
            menu: ConfigMenu::new(),
            landing_lights_on: false,
            hue: HueSource::new(seed),
            serial,
        }
    }

    /// Seed and load the persisted segments, bring up the strips and start
    /// in NORMAL mode
    pub fn boot(&mut self, now: u32) {
        if cfg!(feature = "debug") {
            ufmt::uwriteln!(&mut self.serial, "Hello from navlights with debug!\r").void_unwrap();
        }

        let seeded = self.rig.store.seed_defaults();
        if seeded > 0 {
            ufmt::uwriteln!(&mut self.serial, "EEPROM seeded {} bytes\r", seeded).void_unwrap();
        }
        if let Err(error) = self.rig.store.load() {
            self.log_error(error);
        }
        self.rig.lights.begin(self.rig.store.segments());

        self.apply_display_mode(DisplayMode::Normal, now);
    }

    /// One pass of the main loop
    pub fn tick(&mut self, now: u32, inputs: LoopInputs) {
        if let Err(error) = self.rig.run_timers(now) {
            self.log_error(error);
        }

        match inputs.button {
            Some(ButtonEvent::Click) => self.handle_single_click(now),
            Some(ButtonEvent::LongPressStart) => self.handle_long_press_start(now),
            None => {}
        }

        if let Some(width) = inputs.mode_pulse {
            self.handle_mode_pulse(width, now);
        }
        if let Some(width) = inputs.landing_pulse {
            self.handle_landing_pulse(width);
        }

        if self.state.is_config() {
            match self.menu.tick(&mut self.state, now, &mut self.rig) {
                Ok(true) => self.log_state(),
                Ok(false) => {}
                Err(error) => {
                    self.log_state();
                    self.log_error(error);
                }
            }
        }

        match self.state {
            OperationState::Normal => {
                let on = self.landing_lights_on;
                self.rig.lights.landing(on, self.rig.store.segments());
            }
            OperationState::Rainbow | OperationState::Chase => self.rig.lights.advance(now),
            _ => {}
        }
    }

    pub fn handle_single_click(&mut self, now: u32) {
        if let Some(mode) = self.state.display_mode() {
            self.apply_display_mode(mode.next(), now);
        } else if self.state.is_config() {
            let before = self.state;
            let result = self.menu.click(&mut self.state, now, &mut self.rig);
            if self.state != before {
                self.log_state();
            } else if let OperationState::ConfigIn(item) = self.state {
                if item != ConfigItem::FactoryReset {
                    ufmt::uwriteln!(&mut self.serial, "Modifying {}\r", item).void_unwrap();
                }
            }
            if let Err(error) = result {
                self.log_error(error);
            }
        }
    }

    pub fn handle_long_press_start(&mut self, now: u32) {
        match self.state {
            OperationState::Normal | OperationState::Rainbow | OperationState::Chase => {
                self.menu.enter(&mut self.state, now, &mut self.rig);
                self.log_state();
            }
            OperationState::ConfigMain(_) => {
                self.menu.exit(&mut self.rig);
                ufmt::uwriteln!(&mut self.serial, "EEPROM committed\r").void_unwrap();
                self.apply_display_mode(DisplayMode::Normal, now);
            }
            OperationState::ConfigIn(ConfigItem::FactoryReset) => {
                ufmt::uwriteln!(&mut self.serial, "Doing Factory Reset\r").void_unwrap();
                if let Err(error) = self.menu.long_press(&mut self.state, now, &mut self.rig) {
                    self.log_error(error);
                }
            }
            _ => {}
        }
    }

    /// Tear everything down and light the rig for `mode`
    pub fn apply_display_mode(&mut self, mode: DisplayMode, now: u32) {
        self.rig.sequencer.cancel_all();
        self.rig.lights.turn_off();

        match mode {
            DisplayMode::Normal => {
                self.landing_lights_on = true;
                self.rig.lights.seed_normal(self.rig.store.segments());
                if let Err(error) = self.rig.sequencer.install_normal(now) {
                    self.log_error(error);
                }
            }
            DisplayMode::Rainbow => {
                let pattern = self.pattern(PatternKind::RainbowCycle, RAINBOW_INTERVAL_MS);
                self.rig.lights.set_pattern(pattern);
            }
            DisplayMode::Chase => {
                let pattern = self.pattern(PatternKind::TheaterChase, CHASE_INTERVAL_MS);
                self.rig.lights.set_pattern(pattern);
            }
        }

        self.state = OperationState::from_display_mode(mode);
        self.log_state();
    }

    /// Pattern seeded with a fresh random hue and its complement
    fn pattern(&mut self, kind: PatternKind, interval: u32) -> Pattern {
        let hue = self.hue.next_hue();
        Pattern {
            kind,
            interval,
            color1: wheel(hue),
            color2: wheel(complement(hue)),
            phase: hue,
        }
    }

    fn handle_mode_pulse(&mut self, width: u32, now: u32) {
        if self.state == OperationState::Init {
            return;
        }
        if cfg!(feature = "config_guard") && self.state.is_config() {
            return;
        }
        let mode = match requested_display_mode(width) {
            Some(mode) => mode,
            None => return,
        };
        if self.state.display_mode() == Some(mode) {
            return;
        }
        ufmt::uwriteln!(&mut self.serial, "Display Mode: {} ({}us)\r", mode, width).void_unwrap();
        self.apply_display_mode(mode, now);
    }

    fn handle_landing_pulse(&mut self, width: u32) {
        if self.state != OperationState::Normal {
            return;
        }
        let on = landing_lights_requested(width);
        if on != self.landing_lights_on {
            self.landing_lights_on = on;
            let label = if on { "ON" } else { "OFF" };
            ufmt::uwriteln!(&mut self.serial, "Landing Lights: {} ({}us)\r", label, width)
                .void_unwrap();
        }
    }

    fn log_state(&mut self) {
        ufmt::uwriteln!(&mut self.serial, "State Transition TO: {}\r", self.state).void_unwrap();
    }

    fn log_error(&mut self, error: Error) {
        ufmt::uwriteln!(&mut self.serial, "Error: {:?}\r", error).void_unwrap();
    }

    pub fn state(&self) -> OperationState {
        self.state
    }

    pub fn landing_lights_on(&self) -> bool {
        self.landing_lights_on
    }

    pub fn segments(&self) -> &Segments {
        self.rig.store.segments()
    }

    pub fn rig(&self) -> &Rig<S, E> {
        &self.rig
    }

    pub fn menu(&self) -> &ConfigMenu {
        &self.menu
    }

    pub fn serial(&mut self) -> &mut SerialWrapper<W> {
        &mut self.serial
    }
}
