//! Transceiver abstraction for rfmodem.
//!
//! The command engine never touches radio hardware directly; it drives a
//! [`Transceiver`] implementation. Real drivers wrap a LoRa chip behind
//! this trait (reset-pin sequencing and settle delays belong inside their
//! `init`), while [`sim::SimTransceiver`] provides a deterministic
//! in-memory radio for tests and the stdio runner.

pub mod sim;

use rfmodem_protocol::ProfileCode;
use thiserror::Error;

/// Errors reported by a transceiver driver.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RadioError {
    /// The radio failed to initialize.
    #[error("radio init failed: {0}")]
    InitFailed(String),

    /// The radio rejected a requested frequency.
    #[error("frequency {mhz} MHz rejected")]
    FrequencyRejected {
        /// The rejected frequency in MHz.
        mhz: String,
    },

    /// A transmit operation failed.
    #[error("transmit failed: {0}")]
    TxFailed(String),

    /// A receive operation failed.
    #[error("receive failed: {0}")]
    RxFailed(String),
}

impl RadioError {
    /// Create a frequency rejection error.
    pub fn frequency_rejected(mhz: f32) -> Self {
        RadioError::FrequencyRejected {
            mhz: format!("{:.2}", mhz),
        }
    }
}

/// Cumulative packet counters kept by the transceiver.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RadioStats {
    /// Receptions dropped for CRC or header errors.
    pub rx_bad: u32,
    /// Successfully received packets.
    pub rx_good: u32,
    /// Successfully transmitted packets.
    pub tx_good: u32,
}

/// Capability interface over a LoRa radio transceiver.
///
/// The engine calls these in a single-threaded cooperative loop, so
/// implementations may block; `try_receive` is the one operation that must
/// return without waiting.
pub trait Transceiver {
    /// Reset and initialize the radio. Board-level reset sequencing and
    /// power-on delays happen here.
    fn init(&mut self) -> Result<(), RadioError>;

    /// Tune the carrier frequency in MHz.
    fn set_frequency(&mut self, mhz: f32) -> Result<(), RadioError>;

    /// Apply a modem configuration profile. Unknown codes are the driver's
    /// to accept or reject.
    fn set_modem_profile(&mut self, profile: ProfileCode);

    /// Set the transmit power in dBm.
    fn set_tx_power(&mut self, dbm: i8);

    /// Maximum payload size in bytes for a single transmission.
    fn max_payload_len(&self) -> usize;

    /// Start transmitting a payload.
    fn send(&mut self, data: &[u8]) -> Result<(), RadioError>;

    /// Block until the in-flight transmission has left the air.
    fn wait_sent(&mut self) -> Result<(), RadioError>;

    /// Non-blocking receive check. `Ok(None)` means nothing is pending;
    /// `Err` means the check itself failed.
    fn try_receive(&mut self) -> Result<Option<Vec<u8>>, RadioError>;

    /// RSSI in dBm of the most recent reception.
    fn last_rssi(&self) -> i16;

    /// SNR in dB of the most recent reception.
    fn last_snr(&self) -> i16;

    /// Cumulative packet counters.
    fn stats(&self) -> RadioStats;
}
