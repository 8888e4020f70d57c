//! Operator console on a buffered UART
//!
//! The interrupt-driven ring buffers let the user task poll for input and
//! queue output without waiting on the wire.

use embassy_rp::uart::{BufferedUart, Error};
use embedded_io::{Read, ReadReady, Write};
use teeter_hal::{UartRx, UartTx};

/// Console over UART0
pub struct Console {
    uart: BufferedUart,
}

impl Console {
    pub fn new(uart: BufferedUart) -> Self {
        Self { uart }
    }
}

impl UartTx for Console {
    type Error = Error;

    fn write_blocking(&mut self, data: &[u8]) -> Result<(), Error> {
        self.uart.write_all(data)
    }

    fn flush(&mut self) -> Result<(), Error> {
        Write::flush(&mut self.uart)
    }
}

impl UartRx for Console {
    type Error = Error;

    fn try_read_byte(&mut self) -> Result<Option<u8>, Error> {
        if !self.uart.read_ready()? {
            return Ok(None);
        }
        let mut byte = [0u8; 1];
        match self.uart.read(&mut byte)? {
            0 => Ok(None),
            _ => Ok(Some(byte[0])),
        }
    }
}
