use smart_leds::hsv::{hsv2rgb, Hsv};
use smart_leds::RGB8;

pub type Color = RGB8;

pub const BLACK: Color = Color { r: 0, g: 0, b: 0 };
pub const RED: Color = Color { r: 255, g: 0, b: 0 };
pub const GREEN: Color = Color { r: 0, g: 255, b: 0 };
pub const WHITE: Color = Color { r: 255, g: 255, b: 255 };
pub const BLUE: Color = Color { r: 0, g: 0, b: 255 };
pub const PURPLE: Color = Color { r: 255, g: 0, b: 255 };
pub const YELLOW: Color = Color { r: 255, g: 255, b: 0 };

/// Map a position on the color wheel (0..=255 is one full turn) to a fully
/// saturated color
pub fn wheel(position: u8) -> Color {
    hsv2rgb(Hsv {
        hue: position,
        sat: 255,
        val: 255,
    })
}

/// The position half a turn away on the wheel
pub const fn complement(position: u8) -> u8 {
    position.wrapping_add(128)
}

/// Simple xorshift32 PRNG, good enough to pick a hue
pub struct HueSource {
    state: u32,
}

impl HueSource {
    pub fn new(seed: u32) -> Self {
        // A zero state would stay zero forever
        Self {
            state: if seed == 0 { 0x9E37_79B9 } else { seed },
        }
    }

    pub fn next_hue(&mut self) -> u8 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 17;
        x ^= x << 5;
        self.state = x;
        (x >> 24) as u8
    }
}
