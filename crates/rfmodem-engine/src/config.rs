//! Modem configuration.

use rfmodem_protocol::{ModemProfile, ProfileCode};
use serde::{Deserialize, Serialize};

/// Compiled-in default carrier frequency in MHz.
pub const DEFAULT_FREQUENCY_MHZ: f32 = 434.0;

/// Compiled-in default transmit power in dBm.
pub const DEFAULT_TX_POWER_DBM: i8 = 23;

/// The modem's one live configuration.
///
/// Owned by the engine and mutated only by successful command execution.
/// A frequency change is not current until the full re-initialization
/// sequence has run, since the radio only picks configuration up at init.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModemConfig {
    /// Active modem configuration profile code.
    pub modulation: ProfileCode,
    /// Carrier frequency in MHz.
    pub frequency_mhz: f32,
    /// Whether inbound packets are reported on the serial line.
    pub rx_enabled: bool,
    /// Transmit power in dBm, applied at every (re-)initialization.
    pub tx_power_dbm: i8,
}

impl Default for ModemConfig {
    fn default() -> Self {
        ModemConfig {
            modulation: ModemProfile::MediumRange.into(),
            frequency_mhz: DEFAULT_FREQUENCY_MHZ,
            rx_enabled: true,
            tx_power_dbm: DEFAULT_TX_POWER_DBM,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ModemConfig::default();
        assert_eq!(config.modulation, ProfileCode(0));
        assert_eq!(config.frequency_mhz, 434.0);
        assert!(config.rx_enabled);
        assert_eq!(config.tx_power_dbm, 23);
    }
}
