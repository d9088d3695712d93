//! The command engine.
//!
//! Owns the modem configuration and the transceiver, classifies one input
//! line at a time, and formats every line the modem sends back. The receive
//! poll lives here too but is driven by the host loop, never by a command.

use log::{debug, error, warn};
use rfmodem_protocol::{decode_hex, Command, HexError, Response};
use rfmodem_radio::{RadioError, Transceiver};
use thiserror::Error;

use crate::config::ModemConfig;

/// Firmware version reported by `AT+INFO`.
pub const FIRMWARE_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Unrecoverable radio faults.
///
/// Once one of these occurs the engine is halted: it services no further
/// commands and returns the stored fault from every call. The host decides
/// whether to reset the board, reboot, or report.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FatalFault {
    /// The radio failed to initialize.
    #[error("LoRa radio init failed")]
    InitFailed(#[source] RadioError),

    /// The radio rejected the configured frequency during initialization.
    #[error("setFrequency failed")]
    FrequencyRejected(#[source] RadioError),
}

#[derive(Debug)]
enum EngineState {
    Ready,
    Faulted(FatalFault),
}

/// The serial-line command interpreter over a LoRa transceiver.
pub struct ModemEngine<R: Transceiver> {
    radio: R,
    config: ModemConfig,
    state: EngineState,
}

impl<R: Transceiver> ModemEngine<R> {
    /// Create an engine over a radio. The radio is untouched until
    /// [`start`](Self::start) runs the initialization sequence.
    pub fn new(radio: R, config: ModemConfig) -> Self {
        ModemEngine {
            radio,
            config,
            state: EngineState::Ready,
        }
    }

    /// Boot-time radio initialization.
    ///
    /// Runs the same sequence as a frequency change: init, tune, apply the
    /// modulation profile, apply the transmit power. On success the returned
    /// responses announce the tuned frequency and radio readiness.
    pub fn start(&mut self) -> Result<Vec<Response>, FatalFault> {
        self.reinit()
    }

    /// Current configuration.
    pub fn config(&self) -> &ModemConfig {
        &self.config
    }

    /// The fault that halted the engine, if any.
    pub fn fault(&self) -> Option<&FatalFault> {
        match &self.state {
            EngineState::Ready => None,
            EngineState::Faulted(fault) => Some(fault),
        }
    }

    /// Access the underlying radio.
    pub fn radio_mut(&mut self) -> &mut R {
        &mut self.radio
    }

    /// Classify and execute one command line.
    ///
    /// The line must already be stripped of terminators and surrounding
    /// whitespace; matching is case-insensitive either way. Returns the
    /// response lines to emit, or the fault if the engine is (or just
    /// became) halted.
    pub fn handle_line(&mut self, line: &str) -> Result<Vec<Response>, FatalFault> {
        if let EngineState::Faulted(fault) = &self.state {
            return Err(fault.clone());
        }

        let command = Command::parse(line);
        debug!("dispatching {:?}", command);
        match command {
            Command::Transmit { hex } => Ok(self.transmit(&hex)),
            Command::SetMode { code } => {
                self.config.modulation = code;
                self.radio.set_modem_profile(code);
                Ok(vec![Response::Ok])
            }
            Command::SetRxMode { arg } => Ok(vec![match arg.as_str() {
                "0" => {
                    self.config.rx_enabled = false;
                    Response::Ok
                }
                "1" => {
                    self.config.rx_enabled = true;
                    Response::Ok
                }
                _ => Response::InvalidRxMode,
            }]),
            Command::SetFrequency { mhz } => {
                self.config.frequency_mhz = mhz;
                self.reinit()
            }
            Command::Help => Ok(vec![Response::Help]),
            Command::Info => Ok(vec![self.info()]),
            Command::Unknown { line } => Ok(vec![Response::Unknown { line }]),
        }
    }

    /// One receive poll, to be called once per host loop iteration.
    ///
    /// Returns `None` when reporting is disabled, the engine is halted, or
    /// nothing is pending. A failing check yields [`Response::ReceiveFailed`];
    /// an available packet yields its [`Response::Packet`] report.
    pub fn poll_receive(&mut self) -> Option<Response> {
        if !self.config.rx_enabled || matches!(self.state, EngineState::Faulted(_)) {
            return None;
        }
        match self.radio.try_receive() {
            Ok(None) => None,
            Ok(Some(payload)) => Some(Response::Packet {
                payload,
                rssi: self.radio.last_rssi(),
                snr: self.radio.last_snr(),
            }),
            Err(e) => {
                warn!("receive check failed: {}", e);
                Some(Response::ReceiveFailed)
            }
        }
    }

    fn transmit(&mut self, hex: &str) -> Vec<Response> {
        let payload = match decode_hex(hex, self.radio.max_payload_len()) {
            Ok(payload) => payload,
            Err(HexError::TooLong { size, max }) => {
                return vec![Response::TxTooLong { size, max }];
            }
            Err(HexError::InvalidDigit { position, .. }) => {
                return vec![Response::TxInvalidHex { position }];
            }
        };

        // Blocks the whole loop until the packet has left the air; no
        // receive poll runs in this window.
        if let Err(e) = self.radio.send(&payload).and_then(|_| self.radio.wait_sent()) {
            error!("transmit failed: {}", e);
            return Vec::new();
        }
        vec![Response::Sent { bytes: payload.len() }]
    }

    fn info(&self) -> Response {
        let stats = self.radio.stats();
        Response::Info {
            version: FIRMWARE_VERSION.to_string(),
            profile: self.config.modulation,
            max_payload: self.radio.max_payload_len(),
            frequency_mhz: self.config.frequency_mhz,
            rx_enabled: self.config.rx_enabled,
            rx_bad: stats.rx_bad,
            rx_good: stats.rx_good,
            tx_good: stats.tx_good,
        }
    }

    /// Full radio re-initialization.
    ///
    /// The radio only picks configuration up at init, so a frequency change
    /// reruns the whole sequence. Init and tune failures are fatal and move
    /// the engine into its terminal state; profile and power application are
    /// the driver's to validate.
    fn reinit(&mut self) -> Result<Vec<Response>, FatalFault> {
        if let Err(e) = self.radio.init() {
            return Err(self.fail(FatalFault::InitFailed(e)));
        }
        if let Err(e) = self.radio.set_frequency(self.config.frequency_mhz) {
            return Err(self.fail(FatalFault::FrequencyRejected(e)));
        }
        self.radio.set_modem_profile(self.config.modulation);
        self.radio.set_tx_power(self.config.tx_power_dbm);
        Ok(vec![
            Response::FrequencySet { mhz: self.config.frequency_mhz },
            Response::RadioReady,
        ])
    }

    fn fail(&mut self, fault: FatalFault) -> FatalFault {
        error!("fatal radio fault: {}", fault);
        self.state = EngineState::Faulted(fault.clone());
        fault
    }
}
