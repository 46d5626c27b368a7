#![allow(dead_code)]

use navlights::app::{App, LoopInputs};
use navlights::button::ButtonEvent;
use navlights::color::{Color, BLACK};
use navlights::led_strip::{LedStrip, Pattern};
use navlights::lights::Lights;
use navlights::segment_store::{Storage, EEPROM_ADDRESS_EMPTY};
use navlights::serial_wrapper::SerialWrapper;
use navlights::MAX_STRIP_PIXELS;
use ufmt::uWrite;

/// Strip that remembers the last shown frame and every pattern it was given
#[derive(Default)]
pub struct RecordingStrip {
    pixels: [Color; MAX_STRIP_PIXELS],
    pub shown: [Color; MAX_STRIP_PIXELS],
    pub length: usize,
    pub brightness: u8,
    pub pattern: Option<Pattern>,
    pub frames: u32,
    pub shows: u32,
}

impl RecordingStrip {
    pub fn shown(&self) -> &[Color] {
        &self.shown[..self.length]
    }
}

impl LedStrip for RecordingStrip {
    fn begin(&mut self) {
        self.pixels = [BLACK; MAX_STRIP_PIXELS];
    }

    fn set_length(&mut self, length: usize) {
        self.length = length.min(MAX_STRIP_PIXELS);
    }

    fn set_brightness(&mut self, brightness: u8) {
        self.brightness = brightness;
    }

    fn clear(&mut self) {
        self.pixels = [BLACK; MAX_STRIP_PIXELS];
    }

    fn show(&mut self) {
        self.shown = self.pixels;
        self.shows += 1;
    }

    fn fill(&mut self, color: Color, start: usize, count: usize) {
        let end = (start + count).min(self.length);
        for index in start..end {
            self.pixels[index] = color;
        }
    }

    fn set_pattern(&mut self, pattern: Pattern) {
        self.pattern = if pattern == Pattern::NONE {
            None
        } else {
            Some(pattern)
        };
    }

    fn advance(&mut self, _now: u32) {
        if self.pattern.is_some() {
            self.frames += 1;
        }
    }
}

/// EEPROM stand-in counting writes
pub struct MemoryStorage {
    pub bytes: [u8; 8],
    pub writes: usize,
}

impl MemoryStorage {
    pub fn blank() -> Self {
        Self {
            bytes: [EEPROM_ADDRESS_EMPTY; 8],
            writes: 0,
        }
    }

    pub fn with(bytes: [u8; 8]) -> Self {
        Self { bytes, writes: 0 }
    }
}

impl Storage for MemoryStorage {
    fn read_byte(&mut self, address: u16) -> u8 {
        self.bytes[address as usize]
    }

    fn write_byte(&mut self, address: u16, value: u8) {
        self.writes += 1;
        self.bytes[address as usize] = value;
    }
}

/// Collects the debug log
#[derive(Default)]
pub struct Sink(pub String);

impl uWrite for Sink {
    type Error = ();

    fn write_str(&mut self, s: &str) -> Result<(), ()> {
        self.0.push_str(s);
        Ok(())
    }
}

pub type TestApp = App<RecordingStrip, MemoryStorage, Sink>;

pub fn app_with(storage: MemoryStorage) -> TestApp {
    let lights = Lights::new(
        RecordingStrip::default(),
        RecordingStrip::default(),
        RecordingStrip::default(),
        RecordingStrip::default(),
    );
    let mut app = App::new(lights, storage, SerialWrapper::new(true, Sink::default()), 42);
    app.boot(0);
    app
}

pub fn booted_app() -> TestApp {
    app_with(MemoryStorage::blank())
}

/// Tick every millisecond in `from..to` with no input
pub fn idle(app: &mut TestApp, from: u32, to: u32) {
    for now in from..to {
        app.tick(now, LoopInputs::default());
    }
}

pub fn press(app: &mut TestApp, now: u32, event: ButtonEvent) {
    app.tick(
        now,
        LoopInputs {
            button: Some(event),
            ..LoopInputs::default()
        },
    );
}

pub fn mode_pulse(app: &mut TestApp, now: u32, width: u32) {
    app.tick(
        now,
        LoopInputs {
            mode_pulse: Some(width),
            ..LoopInputs::default()
        },
    );
}

pub fn landing_pulse(app: &mut TestApp, now: u32, width: u32) {
    app.tick(
        now,
        LoopInputs {
            landing_pulse: Some(width),
            ..LoopInputs::default()
        },
    );
}

pub fn marker(app: &TestApp) -> Color {
    app.rig().lights.port_nav.shown[0]
}
