use super::{millis, BitClock, Eeprom};
use arduino_uno as arduino;
use arduino::hal::port::mode::{Floating, Input, Output, PullUp};
use arduino::hal::port::portc::PC0;
use arduino::hal::port::Pin;
use arduino::prelude::*;
use arduino_uno::adc;
use navlights::app::App;
use navlights::button::Button;
use navlights::led_strip::NeoStrip;
use navlights::lights::Lights;
use navlights::serial_wrapper::SerialWrapper;
use navlights::MAX_STRIP_PIXELS;
use ws2812_timer_delay::Ws2812;

pub type BoardStrip = NeoStrip<Ws2812<BitClock, Pin<Output>>>;
pub type BoardApp = App<BoardStrip, Eeprom, arduino::Serial<Floating>>;
pub type BoardButton = Button<PC0<Input<PullUp>>>;

/// Reads of the floating analog pin mixed into the hue seed
const SEED_SAMPLES: u8 = 16;

pub trait AppBuilderTrait {
    fn build() -> (BoardApp, BoardButton);
}

pub struct AppBuilder {}

impl AppBuilderTrait for AppBuilder {
    fn build() -> (BoardApp, BoardButton) {
        let dp = arduino::Peripherals::take().unwrap();

        let mut pins = arduino::Pins::new(dp.PORTB, dp.PORTC, dp.PORTD);

        let serial = SerialWrapper::new(
            cfg!(feature = "debug"),
            arduino::Serial::new(
                dp.USART0,
                pins.d0,
                pins.d1.into_output(&mut pins.ddr),
                57600.into_baudrate(),
            ),
        );

        // Noise on an unconnected analog input seeds the hue source
        let mut adc = adc::Adc::new(dp.ADC, Default::default());
        let mut noise = pins.a1.into_analog_input(&mut adc);
        let mut seed: u32 = 0;
        for _ in 0..SEED_SAMPLES {
            let sample: u16 = nb::block!(adc.read(&mut noise)).void_unwrap();
            seed = seed.rotate_left(5) ^ sample as u32;
        }

        let button = Button::new(pins.a0.into_pull_up_input(&mut pins.ddr));

        // The ISRs only need the pins configured as inputs
        pins.d2.into_floating_input(&mut pins.ddr);
        pins.d3.into_floating_input(&mut pins.ddr);

        let strip =
            |pin: Pin<Output>| NeoStrip::new(Ws2812::new(BitClock, pin), MAX_STRIP_PIXELS);
        let lights = Lights::new(
            strip(pins.d4.into_output(&mut pins.ddr).downgrade()),
            strip(pins.d5.into_output(&mut pins.ddr).downgrade()),
            strip(pins.d6.into_output(&mut pins.ddr).downgrade()),
            strip(pins.d7.into_output(&mut pins.ddr).downgrade()),
        );

        millis::millis_init(dp.TC0);

        // Any logical change on INT0 and INT1
        dp.EXINT.eicra.modify(|_, w| w.isc0().bits(0x01).isc1().bits(0x01));
        dp.EXINT.eimsk.modify(|_, w| w.int0().set_bit().int1().set_bit());

        // Enable interrupts globally
        unsafe { avr_device::interrupt::enable() };

        let app = App::new(lights, Eeprom::new(dp.EEPROM), serial, seed);
        (app, button)
    }
}
