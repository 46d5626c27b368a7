//! The four strips of the rig and the segment-aware operations on them.

use crate::color::{Color, BLACK, GREEN, RED, WHITE};
use crate::led_strip::{LedStrip, Pattern};
use crate::segment::{Channel, Segments};
use crate::NEO_PIXEL_BRIGHTNESS;

pub struct Lights<S: LedStrip> {
    pub port_nav: S,
    pub starboard_nav: S,
    pub beacon: S,
    pub landing: S,
}

impl<S: LedStrip> Lights<S> {
    pub fn new(port_nav: S, starboard_nav: S, beacon: S, landing: S) -> Self {
        Self {
            port_nav,
            starboard_nav,
            beacon,
            landing,
        }
    }

    fn strips(&mut self) -> [&mut S; 4] {
        [
            &mut self.port_nav,
            &mut self.starboard_nav,
            &mut self.beacon,
            &mut self.landing,
        ]
    }

    /// Power-on initialization of every strip
    pub fn begin(&mut self, segments: &Segments) {
        for strip in self.strips().iter_mut() {
            strip.begin();
            strip.set_brightness(NEO_PIXEL_BRIGHTNESS);
        }
        self.set_lengths(segments);
        for strip in self.strips().iter_mut() {
            strip.show();
        }
    }

    /// Apply the strip lengths derived from the segment counts
    pub fn set_lengths(&mut self, segments: &Segments) {
        self.port_nav.set_length(segments.nav_strip_len());
        self.starboard_nav.set_length(segments.nav_strip_len());
        self.beacon.set_length(segments.beacon_strip_len());
        self.landing.set_length(segments.landing_strip_len());
    }

    /// Stop any animation and blank all four strips
    pub fn turn_off(&mut self) {
        for strip in self.strips().iter_mut() {
            strip.set_pattern(Pattern::NONE);
            strip.clear();
            strip.show();
        }
    }

    /// Steady colors of NORMAL mode: red port, green starboard, landing on
    pub fn seed_normal(&mut self, segments: &Segments) {
        let nav = segments.get(Channel::Nav);
        self.port_nav
            .fill(RED, nav.start_index as usize, nav.count as usize);
        self.port_nav.show();
        self.starboard_nav
            .fill(GREEN, nav.start_index as usize, nav.count as usize);
        self.starboard_nav.show();
        self.landing(true, segments);
    }

    /// Paint the strobe segment on both nav strips
    pub fn strobe(&mut self, color: Color, segments: &Segments) {
        let strobe = segments.get(Channel::Strobe);
        for strip in [&mut self.port_nav, &mut self.starboard_nav].iter_mut() {
            strip.fill(color, strobe.start_index as usize, strobe.count as usize);
            strip.show();
        }
    }

    pub fn beacon(&mut self, color: Color, segments: &Segments) {
        let beacon = segments.get(Channel::Beacon);
        self.beacon
            .fill(color, beacon.start_index as usize, beacon.count as usize);
        self.beacon.show();
    }

    pub fn landing(&mut self, on: bool, segments: &Segments) {
        let landing = segments.get(Channel::Landing);
        let color = if on { WHITE } else { BLACK };
        self.landing
            .fill(color, landing.start_index as usize, landing.count as usize);
        self.landing.show();
    }

    /// The single config marker pixel, first pixel of the port strip
    pub fn marker(&mut self, color: Color) {
        self.port_nav.fill(color, 0, 1);
        self.port_nav.show();
    }

    /// Same pattern on all four strips
    pub fn set_pattern(&mut self, pattern: Pattern) {
        for strip in self.strips().iter_mut() {
            strip.set_pattern(pattern);
        }
    }

    pub fn advance(&mut self, now: u32) {
        for strip in self.strips().iter_mut() {
            strip.advance(now);
        }
    }
}
