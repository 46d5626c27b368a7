use ufmt::uWrite;

/// Debug log sink. Text reaches the inner writer only with the `debug`
/// feature on and `debug` set; write errors are dropped.
pub struct SerialWrapper<W: uWrite> {
    debug: bool,
    serial: W,
}

impl<W: uWrite> SerialWrapper<W> {
    pub fn new(debug: bool, serial: W) -> Self {
        SerialWrapper { debug, serial }
    }

    pub fn get_serial(&mut self) -> &mut W {
        &mut self.serial
    }

    pub fn is_enabled(&self) -> bool {
        cfg!(feature = "debug") && self.debug
    }
}

impl<W: uWrite> uWrite for SerialWrapper<W> {
    type Error = void::Void;

    fn write_str(&mut self, s: &str) -> Result<(), Self::Error> {
        if self.is_enabled() {
            let _ = self.serial.write_str(s);
        }
        Ok(())
    }
}
