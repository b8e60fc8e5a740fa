//! Command channel
//!
//! The only component that touches the byte transport. Inbound bytes are
//! decoded one command at a time; outbound messages are encoded to lines
//! and handed to the transport best-effort.

use tapper_hal::{ByteChannel, UartConfig};
use tapper_protocol::{AckEvent, Command, DecodeError, Decoder, DeviceMessage, Identity};

/// A message could not be handed to the transport
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TransportFault {
    /// The transport rejected the write
    Rejected,
    /// The message does not fit an outbound line
    Oversized,
}

/// Byte-stream boundary of the firmware
#[derive(Debug)]
pub struct CommandChannel<B: ByteChannel> {
    transport: B,
    decoder: Decoder,
    faults: u32,
}

impl<B: ByteChannel> CommandChannel<B> {
    /// Wrap a transport
    pub fn new(transport: B) -> Self {
        Self {
            transport,
            decoder: Decoder::new(),
            faults: 0,
        }
    }

    /// Open the transport and discard any partial frame
    pub fn open(&mut self, config: &UartConfig) -> Result<(), TransportFault> {
        self.decoder.reset();
        self.transport
            .open(config)
            .map_err(|_| TransportFault::Rejected)
    }

    /// Decode at most one command from buffered input
    ///
    /// Never waits: returns `Ok(None)` as soon as the transport has no
    /// more bytes. A legacy token consumes exactly one byte; a structured
    /// frame consumes bytes until it completes or input runs dry.
    pub fn poll(&mut self) -> Result<Option<Command>, DecodeError> {
        while let Some(byte) = self.transport.read_byte() {
            if let Some(command) = self.decoder.feed(byte)? {
                return Ok(Some(command));
            }
        }
        Ok(None)
    }

    /// Check if a structured frame is partially received
    pub fn is_framing(&self) -> bool {
        self.decoder.is_framing()
    }

    /// Send the boot identification frame
    pub fn send_hello(&mut self, identity: Identity<'_>) -> Result<(), TransportFault> {
        self.send(&DeviceMessage::Hello(identity))
    }

    /// Send an acknowledgement
    pub fn send_ack(&mut self, event: AckEvent) -> Result<(), TransportFault> {
        self.send(&DeviceMessage::Ack(event))
    }

    /// Send a heartbeat carrying the uptime
    pub fn send_heartbeat(&mut self, uptime_ms: u32) -> Result<(), TransportFault> {
        self.send(&DeviceMessage::Heartbeat { uptime_ms })
    }

    /// Report a discarded structured frame
    pub fn send_decode_error(&mut self) -> Result<(), TransportFault> {
        self.send(&DeviceMessage::DecodeError)
    }

    /// Number of messages lost since boot (saturating)
    pub fn transport_faults(&self) -> u32 {
        self.faults
    }

    /// Access the underlying transport
    pub fn transport(&self) -> &B {
        &self.transport
    }

    /// Mutable access to the underlying transport
    pub fn transport_mut(&mut self) -> &mut B {
        &mut self.transport
    }

    fn send(&mut self, message: &DeviceMessage<'_>) -> Result<(), TransportFault> {
        let result = match message.encode() {
            Ok(line) => self
                .transport
                .write_bytes(&line)
                .map_err(|_| TransportFault::Rejected),
            Err(_) => Err(TransportFault::Oversized),
        };
        if result.is_err() {
            self.faults = self.faults.saturating_add(1);
        }
        result
    }
}
