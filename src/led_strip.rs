//! Pixel rendering for one addressable strip.

use crate::color::{wheel, Color, BLACK};
use crate::MAX_STRIP_PIXELS;
use smart_leds::brightness;
use smart_leds_trait::SmartLedsWrite;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum PatternKind {
    None,
    RainbowCycle,
    TheaterChase,
}

/// Animation the strip renders on its own when advanced
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Pattern {
    pub kind: PatternKind,
    /// Milliseconds between frames
    pub interval: u32,
    pub color1: Color,
    pub color2: Color,
    /// Starting hue of the rainbow
    pub phase: u8,
}

impl Pattern {
    pub const NONE: Pattern = Pattern {
        kind: PatternKind::None,
        interval: 0,
        color1: BLACK,
        color2: BLACK,
        phase: 0,
    };
}

/// Rendering operations the controller needs from a strip
pub trait LedStrip {
    fn begin(&mut self);
    fn set_length(&mut self, length: usize);
    fn set_brightness(&mut self, brightness: u8);
    fn clear(&mut self);
    fn show(&mut self);
    /// Paint `count` pixels from `start`; pixels past the end are skipped
    fn fill(&mut self, color: Color, start: usize, count: usize);
    fn set_pattern(&mut self, pattern: Pattern);
    /// Render the next animation frame if its interval elapsed
    fn advance(&mut self, now: u32);
}

/// A strip on top of any smart-leds driver
pub struct NeoStrip<W: SmartLedsWrite<Color = Color>> {
    outlet: W,
    pixels: [Color; MAX_STRIP_PIXELS],
    length: usize,
    brightness: u8,
    last_data: Option<[Color; MAX_STRIP_PIXELS]>,
    last_length: usize,
    pattern: Pattern,
    step: u16,
    last_update: u32,
}

impl<W: SmartLedsWrite<Color = Color>> NeoStrip<W> {
    pub fn new(outlet: W, length: usize) -> Self {
        Self {
            outlet,
            pixels: [BLACK; MAX_STRIP_PIXELS],
            length: length.min(MAX_STRIP_PIXELS),
            brightness: 255,
            last_data: None,
            last_length: 0,
            pattern: Pattern::NONE,
            step: 0,
            last_update: 0,
        }
    }

    pub fn pixels(&self) -> &[Color] {
        &self.pixels[..self.length]
    }

    pub fn length(&self) -> usize {
        self.length
    }

    pub fn pattern(&self) -> Pattern {
        self.pattern
    }

    pub fn outlet(&self) -> &W {
        &self.outlet
    }

    fn total_steps(&self) -> u16 {
        match self.pattern.kind {
            PatternKind::None => 1,
            PatternKind::RainbowCycle => 256,
            PatternKind::TheaterChase => 3,
        }
    }

    fn render_frame(&mut self) {
        let length = self.length;
        let pattern = self.pattern;
        let step = self.step;
        for (index, pixel) in self.pixels[..length].iter_mut().enumerate() {
            match pattern.kind {
                PatternKind::None => {}
                PatternKind::RainbowCycle => {
                    let offset = (index * 256 / length) as u16;
                    let hue = (offset + step + pattern.phase as u16) as u8;
                    *pixel = wheel(hue);
                }
                PatternKind::TheaterChase => {
                    *pixel = if (index as u16 + step) % 3 == 0 {
                        pattern.color1
                    } else {
                        pattern.color2
                    };
                }
            }
        }
    }
}

impl<W: SmartLedsWrite<Color = Color>> LedStrip for NeoStrip<W> {
    fn begin(&mut self) {
        self.pixels = [BLACK; MAX_STRIP_PIXELS];
        self.last_data = None;
    }

    fn set_length(&mut self, length: usize) {
        let length = length.min(MAX_STRIP_PIXELS);
        for pixel in self.pixels[length..].iter_mut() {
            *pixel = BLACK;
        }
        self.length = length;
    }

    fn set_brightness(&mut self, brightness: u8) {
        self.brightness = brightness;
        self.last_data = None;
    }

    fn clear(&mut self) {
        self.pixels = [BLACK; MAX_STRIP_PIXELS];
    }

    /// Pushes the pixels out, unless nothing changed since the last push.
    /// A failed write is retried on the next call.
    fn show(&mut self) {
        if self.last_data == Some(self.pixels) && self.last_length == self.length {
            return;
        }
        let data = self.pixels;
        let written = self
            .outlet
            .write(brightness(data[..self.length].iter().cloned(), self.brightness));
        if written.is_ok() {
            self.last_data = Some(data);
            self.last_length = self.length;
        }
    }

    fn fill(&mut self, color: Color, start: usize, count: usize) {
        let end = start.saturating_add(count).min(self.length);
        if start >= end {
            return;
        }
        for pixel in self.pixels[start..end].iter_mut() {
            *pixel = color;
        }
    }

    fn set_pattern(&mut self, pattern: Pattern) {
        self.pattern = pattern;
        self.step = 0;
    }

    fn advance(&mut self, now: u32) {
        if self.pattern.kind == PatternKind::None || self.length == 0 {
            return;
        }
        if now.wrapping_sub(self.last_update) < self.pattern.interval {
            return;
        }
        self.last_update = now;
        self.render_frame();
        self.show();
        self.step = (self.step + 1) % self.total_steps();
    }
}
