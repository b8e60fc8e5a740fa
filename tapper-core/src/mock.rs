//! Test doubles for the hardware traits

use heapless::{Deque, Vec};
use tapper_hal::{ByteChannel, UartConfig, UartRx, UartTx};

use crate::traits::{Actuator, ActuatorError, Direction};

/// A recorded actuator call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActuatorCall {
    Init,
    Enabled(bool),
    Microstep(u8),
    Pulse,
    Step(Direction),
}

/// Actuator that records every call
#[derive(Debug, Default)]
pub struct MockActuator {
    pub calls: Vec<ActuatorCall, 1024>,
    pub fail_init: bool,
}

impl MockActuator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            fail_init: true,
            ..Self::default()
        }
    }

    pub fn pulses(&self) -> usize {
        self.calls.iter().filter(|c| **c == ActuatorCall::Pulse).count()
    }

    pub fn steps(&self, direction: Direction) -> usize {
        self.calls
            .iter()
            .filter(|c| **c == ActuatorCall::Step(direction))
            .count()
    }

    /// Number of pulse or step calls
    pub fn motions(&self) -> usize {
        self.calls
            .iter()
            .filter(|c| matches!(c, ActuatorCall::Pulse | ActuatorCall::Step(_)))
            .count()
    }

    pub fn last_microstep(&self) -> Option<u8> {
        self.calls.iter().rev().find_map(|c| match c {
            ActuatorCall::Microstep(m) => Some(*m),
            _ => None,
        })
    }

    fn record(&mut self, call: ActuatorCall) {
        self.calls.push(call).expect("mock actuator call log full");
    }
}

impl Actuator for MockActuator {
    fn init(&mut self) -> Result<(), ActuatorError> {
        self.record(ActuatorCall::Init);
        if self.fail_init {
            Err(ActuatorError::Unavailable)
        } else {
            Ok(())
        }
    }

    fn set_enabled(&mut self, enabled: bool) {
        self.record(ActuatorCall::Enabled(enabled));
    }

    fn set_microstep(&mut self, microstep: u8) {
        self.record(ActuatorCall::Microstep(microstep));
    }

    fn pulse(&mut self) {
        self.record(ActuatorCall::Pulse);
    }

    fn step(&mut self, direction: Direction) {
        self.record(ActuatorCall::Step(direction));
    }
}

/// Mock transport error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MockFault;

/// In-memory byte channel
#[derive(Debug, Default)]
pub struct MockChannel {
    rx: Deque<u8, 1024>,
    tx: Vec<u8, 4096>,
    pub opened: Option<UartConfig>,
    pub fail_open: bool,
    pub fail_writes: bool,
}

impl MockChannel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue bytes as if received from the host
    pub fn push_rx(&mut self, bytes: &[u8]) {
        for &b in bytes {
            self.rx.push_back(b).expect("mock rx buffer full");
        }
    }

    pub fn pending_rx(&self) -> usize {
        self.rx.len()
    }

    pub fn tx(&self) -> &[u8] {
        &self.tx
    }

    /// Written lines, terminators stripped
    pub fn lines(&self) -> impl Iterator<Item = &[u8]> {
        self.tx
            .split(|b| *b == b'\n')
            .filter(|line| !line.is_empty())
    }

    pub fn line_count(&self) -> usize {
        self.lines().count()
    }

    pub fn clear_tx(&mut self) {
        self.tx.clear();
    }
}

impl UartRx for MockChannel {
    fn bytes_available(&self) -> usize {
        self.rx.len()
    }

    fn read_byte(&mut self) -> Option<u8> {
        self.rx.pop_front()
    }
}

impl UartTx for MockChannel {
    type Error = MockFault;

    fn write_bytes(&mut self, data: &[u8]) -> Result<(), Self::Error> {
        if self.fail_writes {
            return Err(MockFault);
        }
        self.tx.extend_from_slice(data).map_err(|_| MockFault)
    }
}

impl ByteChannel for MockChannel {
    fn open(&mut self, config: &UartConfig) -> Result<(), Self::Error> {
        if self.fail_open {
            return Err(MockFault);
        }
        self.opened = Some(*config);
        Ok(())
    }
}
