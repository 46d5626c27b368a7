//! [`Storage`] on the ATmega328P's internal EEPROM.

use arduino_uno::pac::EEPROM;
use navlights::segment_store::Storage;

pub struct Eeprom {
    eeprom: EEPROM,
}

impl Eeprom {
    pub fn new(eeprom: EEPROM) -> Self {
        Self { eeprom }
    }

    fn wait_ready(&self) {
        while self.eeprom.eecr.read().eepe().bit_is_set() {}
    }

    fn set_address(&mut self, address: u16) {
        self.eeprom.eear.write(|w| unsafe { w.bits(address) });
    }
}

impl Storage for Eeprom {
    fn read_byte(&mut self, address: u16) -> u8 {
        self.wait_ready();
        self.set_address(address);
        self.eeprom.eecr.write(|w| w.eere().set_bit());
        self.eeprom.eedr.read().bits()
    }

    fn write_byte(&mut self, address: u16, value: u8) {
        self.wait_ready();
        self.set_address(address);
        self.eeprom.eedr.write(|w| unsafe { w.bits(value) });
        // EEPE has to follow EEMPE within four cycles
        avr_device::interrupt::free(|_| {
            self.eeprom.eecr.write(|w| w.eempe().set_bit());
            self.eeprom.eecr.write(|w| w.eempe().set_bit().eepe().set_bit());
        });
    }
}
