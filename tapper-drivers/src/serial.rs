//! UART-backed byte channel
//!
//! Adapts an `embedded-io` UART (the RP2040 buffered UART in practice) to
//! the non-blocking [`ByteChannel`] the orchestrator expects. Received
//! bytes are pulled from the driver's ring buffer in small batches; a read
//! only happens when the driver reports data ready.
//!
//! Writes go to the driver in a single call. A call that accepts only part
//! of a line fails, and the rest of the line is dropped.

use embedded_io::{Read, ReadReady, Write};
use heapless::Deque;
use tapper_hal::uart::{DataBits, Parity, StopBits};
use tapper_hal::{ByteChannel, UartConfig, UartRx, UartTx};

/// Bytes staged from the UART per refill
const STAGE_LEN: usize = 32;

/// Serial channel errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum UartError {
    /// Line settings differ from the ones the UART was built with
    Unsupported,
    /// The driver reported a transmit error
    Write,
    /// The TX ring took only part of the line
    Truncated,
}

/// Byte channel over an `embedded-io` UART
pub struct SerialChannel<U> {
    uart: U,
    /// Baud rate the peripheral was configured with
    baudrate: u32,
    staged: Deque<u8, STAGE_LEN>,
}

impl<U> SerialChannel<U>
where
    U: Read + ReadReady + Write,
{
    /// Wrap a UART already configured for `baudrate` 8N1
    pub fn new(uart: U, baudrate: u32) -> Self {
        Self {
            uart,
            baudrate,
            staged: Deque::new(),
        }
    }

    /// Access the wrapped UART
    pub fn uart(&self) -> &U {
        &self.uart
    }

    fn refill(&mut self) {
        if !matches!(self.uart.read_ready(), Ok(true)) {
            return;
        }
        let mut buf = [0u8; STAGE_LEN];
        let free = STAGE_LEN - self.staged.len();
        // Ready means this read returns without waiting
        if let Ok(n) = self.uart.read(&mut buf[..free]) {
            for &byte in &buf[..n] {
                let _ = self.staged.push_back(byte);
            }
        }
    }
}

impl<U> UartRx for SerialChannel<U>
where
    U: Read + ReadReady + Write,
{
    fn bytes_available(&self) -> usize {
        self.staged.len()
    }

    fn read_byte(&mut self) -> Option<u8> {
        if self.staged.is_empty() {
            self.refill();
        }
        self.staged.pop_front()
    }
}

impl<U> UartTx for SerialChannel<U>
where
    U: Read + ReadReady + Write,
{
    type Error = UartError;

    /// Copy into the driver's TX ring with one `write` call
    ///
    /// The driver returns once it has taken what fits, so a full ring
    /// costs at most one byte time on the wire.
    fn write_bytes(&mut self, data: &[u8]) -> Result<(), Self::Error> {
        if data.is_empty() {
            return Ok(());
        }
        let written = self.uart.write(data).map_err(|_| UartError::Write)?;
        if written < data.len() {
            return Err(UartError::Truncated);
        }
        Ok(())
    }
}

impl<U> ByteChannel for SerialChannel<U>
where
    U: Read + ReadReady + Write,
{
    fn open(&mut self, config: &UartConfig) -> Result<(), Self::Error> {
        let framing_ok = config.data_bits == DataBits::Eight
            && config.parity == Parity::None
            && config.stop_bits == StopBits::One;
        if !framing_ok || config.baudrate != self.baudrate {
            return Err(UartError::Unsupported);
        }
        self.staged.clear();
        Ok(())
    }
}
