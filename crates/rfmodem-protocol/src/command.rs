//! Command recognition for the rfmodem serial protocol.
//!
//! One input line maps to one [`Command`]. Recognition is by prefix, checked
//! in a fixed priority order; the first matching prefix wins and anything
//! that matches nothing is carried through as [`Command::Unknown`] so the
//! engine can echo the original line back.

use serde::{Deserialize, Serialize};

/// Maximum accepted command line length in bytes.
///
/// Lines longer than this are dropped by the transport before they reach
/// the engine.
pub const MAX_COMMAND_LEN: usize = 512;

/// Modem configuration profile code as carried on the wire.
///
/// `AT+MODE=` does not validate its argument against the known profiles;
/// whatever code the host sends is stored and handed to the transceiver,
/// which is the final authority on accepting or rejecting it. The newtype
/// keeps unknown codes representable end to end.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProfileCode(pub u8);

/// The four modem profiles defined by the protocol.
///
/// Each bundles a bandwidth, coding rate, and spreading factor choice for
/// the radio's physical layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ModemProfile {
    /// Bw = 125 kHz, Cr = 4/5, Sf = 128 chips/symbol. The default.
    MediumRange,
    /// Bw = 500 kHz, Cr = 4/5, Sf = 128 chips/symbol.
    FastShortRange,
    /// Bw = 31.25 kHz, Cr = 4/8, Sf = 512 chips/symbol.
    SlowLongRangeA,
    /// Bw = 125 kHz, Cr = 4/8, Sf = 4096 chips/symbol.
    SlowLongRangeB,
}

impl ModemProfile {
    /// Wire code for this profile.
    pub fn code(&self) -> u8 {
        match self {
            ModemProfile::MediumRange => 0,
            ModemProfile::FastShortRange => 1,
            ModemProfile::SlowLongRangeA => 2,
            ModemProfile::SlowLongRangeB => 3,
        }
    }

    /// Look up a profile from its wire code.
    pub fn from_code(code: u8) -> Option<ModemProfile> {
        match code {
            0 => Some(ModemProfile::MediumRange),
            1 => Some(ModemProfile::FastShortRange),
            2 => Some(ModemProfile::SlowLongRangeA),
            3 => Some(ModemProfile::SlowLongRangeB),
            _ => None,
        }
    }

    /// Short human-readable name used in the INFO report.
    pub fn description(&self) -> &'static str {
        match self {
            ModemProfile::MediumRange => "medium range",
            ModemProfile::FastShortRange => "fast+short range",
            ModemProfile::SlowLongRangeA => "slow+long range",
            ModemProfile::SlowLongRangeB => "slow+long range",
        }
    }
}

impl ProfileCode {
    /// The named profile behind this code, if it is one of the four
    /// defined ones.
    pub fn profile(self) -> Option<ModemProfile> {
        ModemProfile::from_code(self.0)
    }
}

impl From<ModemProfile> for ProfileCode {
    fn from(profile: ModemProfile) -> Self {
        ProfileCode(profile.code())
    }
}

/// One parsed command line.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// `AT+TX=<hexdata>` — transmit a hex-encoded payload.
    Transmit {
        /// The raw hex argument, not yet decoded.
        hex: String,
    },

    /// `AT+MODE=<n>` — select a modem configuration profile by code.
    SetMode {
        /// The requested profile code, unvalidated.
        code: ProfileCode,
    },

    /// `AT+RX=<0|1>` — enable or disable receive reporting.
    SetRxMode {
        /// The raw argument; only the literals `0` and `1` are valid.
        arg: String,
    },

    /// `AT+FREQ=<mhz>` — change frequency and re-initialize the radio.
    SetFrequency {
        /// Frequency in MHz.
        mhz: f32,
    },

    /// `AT+HELP` — print usage information.
    Help,

    /// `AT+INFO` — print modem status.
    Info,

    /// Anything that matched no known prefix.
    Unknown {
        /// The original input line, echoed in the error response.
        line: String,
    },
}

impl Command {
    /// Parse one trimmed input line.
    ///
    /// Matching is case-insensitive; prefixes are tried in the fixed
    /// protocol order (`AT+TX=`, `AT+MODE=`, `AT+RX=`, `AT+FREQ=`,
    /// `AT+HELP`, `AT+INFO`). Numeric arguments to `AT+MODE=` and
    /// `AT+FREQ=` parse leniently: an unparsable value falls back to zero,
    /// matching the tolerance existing host tooling relies on.
    pub fn parse(line: &str) -> Command {
        let upper = line.to_ascii_uppercase();
        if let Some(arg) = upper.strip_prefix("AT+TX=") {
            Command::Transmit { hex: arg.to_string() }
        } else if let Some(arg) = upper.strip_prefix("AT+MODE=") {
            Command::SetMode {
                code: ProfileCode(arg.trim().parse().unwrap_or(0)),
            }
        } else if let Some(arg) = upper.strip_prefix("AT+RX=") {
            Command::SetRxMode { arg: arg.trim().to_string() }
        } else if let Some(arg) = upper.strip_prefix("AT+FREQ=") {
            Command::SetFrequency {
                mhz: arg.trim().parse().unwrap_or(0.0),
            }
        } else if upper.starts_with("AT+HELP") {
            Command::Help
        } else if upper.starts_with("AT+INFO") {
            Command::Info
        } else {
            Command::Unknown { line: line.to_string() }
        }
    }
}
