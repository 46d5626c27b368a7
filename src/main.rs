#![feature(abi_avr_interrupt)]
#![no_std]
#![no_main]

mod board;

use crate::board::millis::millis;
use crate::board::{AppBuilder, AppBuilderTrait, LANDING_PULSE, MODE_PULSE};
use arduino_uno as arduino;
use arduino_uno::hal::port::mode::Output;
use arduino_uno::hal::port::portb::PB5;
use embedded_hal::digital::v2::OutputPin;
use navlights::app::LoopInputs;
use void::ResultVoidExt;

#[arduino::entry]
fn main() -> ! {
    let (mut app, mut button) = AppBuilder::build();
    app.boot(millis());

    loop {
        let now = millis();
        let inputs = LoopInputs {
            button: button.poll(now),
            landing_pulse: LANDING_PULSE.take_fresh(),
            mode_pulse: MODE_PULSE.take_fresh(),
        };
        app.tick(now, inputs);
    }
}

#[panic_handler]
fn panic(info: &core::panic::PanicInfo) -> ! {
    avr_device::interrupt::disable();

    let mut builtin_led: PB5<Output> = unsafe { core::mem::MaybeUninit::uninit().assume_init() };
    builtin_led.set_high().void_unwrap();

    let mut serial: arduino::Serial<arduino::hal::port::mode::Floating> =
        unsafe { core::mem::MaybeUninit::uninit().assume_init() };

    ufmt::uwriteln!(&mut serial, "Firmware panic!\r").void_unwrap();

    if let Some(loc) = info.location() {
        ufmt::uwriteln!(
            &mut serial,
            "  At {}:{}:{}\r",
            loc.file(),
            loc.line(),
            loc.column(),
        )
        .void_unwrap();
    }

    loop {
        builtin_led.set_high().void_unwrap();
        arduino::delay_ms(600);
        builtin_led.set_low().void_unwrap();
        arduino::delay_ms(150);
        builtin_led.set_high().void_unwrap();
        arduino::delay_ms(150);
        builtin_led.set_low().void_unwrap();
        arduino::delay_ms(150);
    }
}
