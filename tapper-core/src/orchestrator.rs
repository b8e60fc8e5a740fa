//! Orchestrator
//!
//! Owns the motor engine and the command channel and drives them from a
//! single cooperative loop:
//!
//! ```text
//!  bytes ──► CommandChannel::poll ──► dispatch ──► MotorEngine
//!                                        │
//!  lines ◄── CommandChannel::send_* ◄────┘ ack / heartbeat
//! ```
//!
//! Every call takes the current time from the caller and returns without
//! waiting on I/O.

use tapper_hal::ByteChannel;
use tapper_protocol::{AckEvent, Command, DecodeError};

use crate::channel::{CommandChannel, TransportFault};
use crate::config::TapperConfig;
use crate::engine::{EngineError, MotorEngine, MotorState};
use crate::motion::ArmPosition;
use crate::scheduler::HeartbeatScheduler;
use crate::traits::{Actuator, ActuatorError, Direction};

/// Failure that prevents the orchestrator from starting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum InitError {
    /// The actuator could not be brought to a safe idle state
    Actuator(ActuatorError),
    /// The transport refused to open
    Transport,
}

impl From<ActuatorError> for InitError {
    fn from(err: ActuatorError) -> Self {
        InitError::Actuator(err)
    }
}

impl From<TransportFault> for InitError {
    fn from(_: TransportFault) -> Self {
        InitError::Transport
    }
}

/// Summary of one [`Orchestrator::run_once`] pass
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TickReport {
    /// Commands dispatched (unknown ones included)
    pub commands: u16,
    /// Structured frames discarded
    pub decode_errors: u16,
    /// Kind of the last discarded frame
    pub last_decode_error: Option<DecodeError>,
    /// Outbound messages lost during this pass
    pub transport_faults: u32,
    /// A heartbeat was due
    pub heartbeat: bool,
}

impl TickReport {
    /// Check if anything went wrong during the pass
    pub fn has_anomalies(&self) -> bool {
        self.decode_errors > 0 || self.transport_faults > 0
    }
}

/// Top-level control loop
pub struct Orchestrator<A: Actuator, B: ByteChannel> {
    engine: MotorEngine<A>,
    channel: CommandChannel<B>,
    heartbeat: HeartbeatScheduler,
    position: ArmPosition,
    config: TapperConfig,
    boot_ms: u32,
}

impl<A: Actuator, B: ByteChannel> Orchestrator<A, B> {
    /// Assemble an orchestrator
    ///
    /// Fails only if the configured boot microstep is out of range.
    pub fn new(actuator: A, transport: B, config: TapperConfig) -> Result<Self, EngineError> {
        Ok(Self {
            engine: MotorEngine::with_microstep(actuator, config.motor.default_microstep)?,
            channel: CommandChannel::new(transport),
            heartbeat: HeartbeatScheduler::new(config.heartbeat.interval_ms),
            position: ArmPosition::new(),
            config,
            boot_ms: 0,
        })
    }

    /// Bring hardware to a safe idle state and announce the device
    pub fn initialize(&mut self, now_ms: u32) -> Result<(), InitError> {
        self.engine.initialize()?;
        self.channel.open(&self.config.uart_config())?;

        self.boot_ms = now_ms;
        self.heartbeat.start(now_ms);

        // A lost hello is already counted by the channel
        let _ = self.channel.send_hello(self.config.identity.as_identity());
        Ok(())
    }

    /// Run one loop pass
    pub fn run_once(&mut self, now_ms: u32) -> TickReport {
        self.run_once_with(now_ms, |_, _| {})
    }

    /// Run one loop pass, reporting each dispatched command and its ack
    pub fn run_once_with<F>(&mut self, now_ms: u32, mut on_dispatch: F) -> TickReport
    where
        F: FnMut(&Command, AckEvent),
    {
        let faults_before = self.channel.transport_faults();
        let limit = self.config.dispatch.limit();
        let mut report = TickReport::default();
        let mut handled = 0usize;

        while limit.map_or(true, |max| handled < max) {
            match self.channel.poll() {
                Ok(Some(command)) => {
                    let event = self.dispatch(command);
                    let _ = self.channel.send_ack(event);
                    on_dispatch(&command, event);
                    report.commands = report.commands.saturating_add(1);
                }
                Ok(None) => break,
                Err(err) => {
                    let _ = self.channel.send_decode_error();
                    report.decode_errors = report.decode_errors.saturating_add(1);
                    report.last_decode_error = Some(err);
                }
            }
            handled += 1;
        }

        if self.heartbeat.tick(now_ms) {
            let _ = self.channel.send_heartbeat(self.uptime_ms(now_ms));
            report.heartbeat = true;
        }

        report.transport_faults = self
            .channel
            .transport_faults()
            .saturating_sub(faults_before);
        report
    }

    fn dispatch(&mut self, command: Command) -> AckEvent {
        match command {
            Command::TapManual => {
                outcome(self.engine.tap_once(), AckEvent::TapAck, AckEvent::TapError)
            }
            Command::MotorEnable => outcome(
                self.engine.enable_motor(true),
                AckEvent::MotorEnabled,
                AckEvent::MotorError,
            ),
            Command::MotorDisable => outcome(
                self.engine.enable_motor(false),
                AckEvent::MotorDisabled,
                AckEvent::MotorError,
            ),
            Command::SetStepsize { microstep } => outcome(
                self.engine.set_stepsize(microstep),
                AckEvent::ConfigStepsize,
                AckEvent::ConfigError,
            ),
            Command::ArmJog {
                direction_up,
                steps,
            } => {
                let direction = Direction::from(direction_up);
                match self.engine.jog(direction, steps) {
                    Ok(()) => {
                        self.position.record_jog(direction, steps);
                        AckEvent::ArmJogged
                    }
                    Err(_) => AckEvent::ArmError,
                }
            }
            // Reserved for run sequencing; acknowledged only
            Command::RunStart => AckEvent::RunStartAck,
            Command::RunStop => AckEvent::RunStopAck,
            Command::Seed { .. } => AckEvent::SeedAck,
            Command::Unknown => AckEvent::CmdUnknown,
        }
    }

    /// Current motor state
    pub fn motor_state(&self) -> MotorState {
        self.engine.state()
    }

    /// Net arm travel since boot or the last reset
    pub fn arm_position(&self) -> i32 {
        self.position.steps()
    }

    /// Zero the arm position counter
    pub fn reset_arm_position(&mut self) {
        self.position.reset();
    }

    /// Outbound messages lost since boot
    pub fn transport_faults(&self) -> u32 {
        self.channel.transport_faults()
    }

    /// Milliseconds since [`initialize`](Self::initialize)
    pub fn uptime_ms(&self, now_ms: u32) -> u32 {
        now_ms.wrapping_sub(self.boot_ms)
    }

    /// Active configuration
    pub fn config(&self) -> &TapperConfig {
        &self.config
    }

    /// Access the motor engine
    pub fn engine(&self) -> &MotorEngine<A> {
        &self.engine
    }

    /// Access the command channel
    pub fn channel(&self) -> &CommandChannel<B> {
        &self.channel
    }

    /// Mutable access to the command channel
    pub fn channel_mut(&mut self) -> &mut CommandChannel<B> {
        &mut self.channel
    }
}

fn outcome(result: Result<(), EngineError>, ok: AckEvent, err: AckEvent) -> AckEvent {
    match result {
        Ok(()) => ok,
        Err(_) => err,
    }
}
