//! UART receive helpers
//!
//! The input task consumes the console one byte at a time so it can check
//! the idle timeout between bytes. `ByteReader` bounds each read with a
//! timeout and folds the peripheral's error kinds into `RxError`.

use core::fmt;

use embassy_rp::uart::{self, BufferedUartRx};
use embassy_time::{with_timeout, Duration};
use embedded_io_async::Read;

use duoseg_core::config::SerialConfig;

/// UART receive error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RxError {
    /// Receive FIFO overflowed, bytes were lost
    Overrun,
    /// Line held low for longer than a frame
    Break,
    Parity,
    Framing,
    /// Any other peripheral error
    Other,
}

impl fmt::Display for RxError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RxError::Overrun => write!(f, "receive overrun"),
            RxError::Break => write!(f, "break condition"),
            RxError::Parity => write!(f, "parity error"),
            RxError::Framing => write!(f, "framing error"),
            RxError::Other => write!(f, "receive error"),
        }
    }
}

impl From<uart::Error> for RxError {
    fn from(e: uart::Error) -> Self {
        match e {
            uart::Error::Overrun => RxError::Overrun,
            uart::Error::Break => RxError::Break,
            uart::Error::Parity => RxError::Parity,
            uart::Error::Framing => RxError::Framing,
            _ => RxError::Other,
        }
    }
}

/// Build the UART peripheral config from the device settings
///
/// 8N1 framing, baud rate from `serial.baudrate`.
pub fn uart_config(serial: &SerialConfig) -> uart::Config {
    let mut config = uart::Config::default();
    config.baudrate = serial.baudrate;
    config
}

/// Single-byte reader over the buffered UART receiver
pub struct ByteReader {
    rx: BufferedUartRx,
    timeout: Duration,
}

impl ByteReader {
    pub fn new(rx: BufferedUartRx, timeout_ms: u32) -> Self {
        Self {
            rx,
            timeout: Duration::from_millis(timeout_ms as u64),
        }
    }

    /// Wait up to the configured timeout for one byte
    ///
    /// Returns `Ok(None)` when nothing arrived in time.
    pub async fn read_byte(&mut self) -> Result<Option<u8>, RxError> {
        let mut buf = [0u8; 1];
        match with_timeout(self.timeout, self.rx.read(&mut buf)).await {
            Ok(Ok(n)) if n > 0 => Ok(Some(buf[0])),
            Ok(Ok(_)) => Ok(None),
            Ok(Err(e)) => Err(RxError::from(e)),
            Err(_) => Ok(None),
        }
    }
}
