//! Millisecond and microsecond clock on TC0.
//!
//! TC0 runs in CTC mode with a /64 prescaler, so one counter step is 4 µs and
//! the compare match fires once per millisecond.

use arduino_uno::pac::TC0;
use avr_device::interrupt::Mutex;
use core::cell::Cell;

const PRESCALER: u32 = 64;
const TIMER_COUNTS: u32 = 250;
const US_PER_COUNT: u32 = PRESCALER / 16;
const MILLIS_INCREMENT: u32 = PRESCALER * TIMER_COUNTS / 16_000;

static MILLIS_COUNTER: Mutex<Cell<u32>> = Mutex::new(Cell::new(0));

pub fn millis_init(tc0: TC0) {
    tc0.tccr0a.write(|w| w.wgm0().ctc());
    tc0.ocr0a.write(|w| unsafe { w.bits((TIMER_COUNTS - 1) as u8) });
    tc0.tccr0b.write(|w| w.cs0().prescale_64());
    tc0.timsk0.write(|w| w.ocie0a().set_bit());

    avr_device::interrupt::free(|cs| {
        MILLIS_COUNTER.borrow(cs).set(0);
    });
}

#[avr_device::interrupt(atmega328p)]
fn TIMER0_COMPA() {
    avr_device::interrupt::free(|cs| {
        let counter_cell = MILLIS_COUNTER.borrow(cs);
        let counter = counter_cell.get();
        counter_cell.set(counter.wrapping_add(MILLIS_INCREMENT));
    })
}

pub fn millis() -> u32 {
    avr_device::interrupt::free(|cs| MILLIS_COUNTER.borrow(cs).get())
}

/// Microseconds since `millis_init`, wrapping after about 71 minutes
pub fn micros() -> u32 {
    avr_device::interrupt::free(|cs| {
        // Safe to steal: only the count and flag registers are read
        let tc0 = unsafe { &*TC0::ptr() };
        let mut millis = MILLIS_COUNTER.borrow(cs).get();
        let count = tc0.tcnt0.read().bits() as u32;
        // Compare match pending but not yet serviced
        if tc0.tifr0.read().ocf0a().bit_is_set() && count < TIMER_COUNTS - 1 {
            millis = millis.wrapping_add(MILLIS_INCREMENT);
        }
        millis
            .wrapping_mul(1000)
            .wrapping_add(count * US_PER_COUNT)
    })
}
