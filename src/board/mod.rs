//! Arduino Uno wiring of the controller.

mod app_builder;
mod eeprom;
pub mod millis;

pub use app_builder::{AppBuilder, AppBuilderTrait};
pub use eeprom::Eeprom;

use embedded_hal::timer::{CountDown, Periodic};
use navlights::pulse::PulseChannel;
use void::Void;

/// D2 / INT0
pub static LANDING_PULSE: PulseChannel = PulseChannel::new();
/// D3 / INT1
pub static MODE_PULSE: PulseChannel = PulseChannel::new();

#[avr_device::interrupt(atmega328p)]
fn INT0() {
    LANDING_PULSE.record_edge(millis::micros());
}

#[avr_device::interrupt(atmega328p)]
fn INT1() {
    MODE_PULSE.record_edge(millis::micros());
}

struct AvrCriticalSection;
critical_section::set_impl!(AvrCriticalSection);

const SREG: *const u8 = 0x5F as *const u8;
const SREG_I: u8 = 1 << 7;

unsafe impl critical_section::Impl for AvrCriticalSection {
    unsafe fn acquire() -> u8 {
        let sreg = core::ptr::read_volatile(SREG);
        avr_device::interrupt::disable();
        sreg
    }

    unsafe fn release(sreg: u8) {
        if sreg & SREG_I != 0 {
            avr_device::interrupt::enable();
        }
    }
}

/// Bit timer for the bit-banged strip driver. At 16 MHz the CPU is the
/// bottleneck, so every wait returns at once.
pub struct BitClock;

impl CountDown for BitClock {
    type Time = u32;

    fn start<T>(&mut self, _count: T)
    where
        T: Into<u32>,
    {
    }

    fn wait(&mut self) -> nb::Result<(), Void> {
        Ok(())
    }
}

impl Periodic for BitClock {}
