//! UART serial communication abstractions
//!
//! The command core never blocks on I/O, so these traits are deliberately
//! non-blocking: reads return `None` when nothing is buffered and writes
//! either hand the bytes to the transport or fail immediately.

/// UART transmitter
pub trait UartTx {
    /// Error type for transmit operations
    type Error;

    /// Queue `data` for transmission
    ///
    /// Best effort: implementations must not wait for the line to drain.
    /// If the whole slice cannot be accepted the call fails and the
    /// caller treats the message as lost.
    fn write_bytes(&mut self, data: &[u8]) -> Result<(), Self::Error>;
}

/// UART receiver
pub trait UartRx {
    /// Number of received bytes that can be read without waiting
    fn bytes_available(&self) -> usize;

    /// Read a single byte if one is buffered
    fn read_byte(&mut self) -> Option<u8>;
}

/// Bidirectional byte channel
///
/// A UART that supports both directions and can be (re)opened at a given
/// line configuration.
pub trait ByteChannel: UartRx + UartTx {
    /// Open the channel with the given line settings
    fn open(&mut self, config: &UartConfig) -> Result<(), Self::Error>;
}

/// UART configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct UartConfig {
    /// Baud rate in bits per second
    pub baudrate: u32,
    /// Number of data bits (typically 8)
    pub data_bits: DataBits,
    /// Parity mode
    pub parity: Parity,
    /// Number of stop bits
    pub stop_bits: StopBits,
}

impl UartConfig {
    /// 8N1 at the given baud rate
    pub const fn with_baudrate(baudrate: u32) -> Self {
        Self {
            baudrate,
            data_bits: DataBits::Eight,
            parity: Parity::None,
            stop_bits: StopBits::One,
        }
    }
}

impl Default for UartConfig {
    fn default() -> Self {
        Self::with_baudrate(115200)
    }
}

/// Number of data bits per frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DataBits {
    Seven,
    Eight,
    Nine,
}

/// Parity mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Parity {
    None,
    Even,
    Odd,
}

/// Number of stop bits
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StopBits {
    One,
    Two,
}
