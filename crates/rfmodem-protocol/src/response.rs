//! Response and report formatting.
//!
//! Every line the modem emits is a [`Response`] rendered through `Display`.
//! Command responses and the unsolicited `+RX` packet report share this
//! type since they interleave on the same serial line.

use std::fmt;

use crate::command::ProfileCode;
use crate::hex::encode_hex;

/// One response or report emitted on the serial line.
///
/// Most variants render as a single line; `Info` and `Help` are the two
/// multi-line reports of the protocol.
#[derive(Debug, Clone, PartialEq)]
pub enum Response {
    /// Transmission complete: `+SENT <n> bytes.`
    Sent {
        /// Number of payload bytes put on the air.
        bytes: usize,
    },

    /// Payload exceeds the transceiver maximum:
    /// `+FAIL: MAX_MESSAGE_LEN EXCEEDED! <n> / <max>`
    TxTooLong {
        /// Decoded byte count of the offered payload.
        size: usize,
        /// Transceiver maximum payload size.
        max: usize,
    },

    /// Payload contained a non-hex character:
    /// `+FAIL: INVALID HEX! char <position>`
    TxInvalidHex {
        /// Zero-based position of the offending character.
        position: usize,
    },

    /// Generic success: `+ Ok.`
    Ok,

    /// Bad `AT+RX=` argument: `+ Failed. Invalid RX mode!`
    InvalidRxMode,

    /// Unrecognized command: `Unknown command: <line>`
    Unknown {
        /// The original input line.
        line: String,
    },

    /// Inbound packet report: `+RX <len>,<hexpayload>,<rssi>,<snr>`
    Packet {
        /// The received payload bytes.
        payload: Vec<u8>,
        /// RSSI of the reception in dBm.
        rssi: i16,
        /// SNR of the reception in dB.
        snr: i16,
    },

    /// The receive check itself failed: `+RX failed`
    ReceiveFailed,

    /// Frequency applied during (re-)initialization: `Set Freq to: <mhz>`
    FrequencySet {
        /// Frequency in MHz.
        mhz: f32,
    },

    /// Radio (re-)initialization finished: `LoRa radio init OK!`
    RadioReady,

    /// Multi-line status report for `AT+INFO`.
    Info {
        /// Firmware version string.
        version: String,
        /// Active modem profile code.
        profile: ProfileCode,
        /// Transceiver maximum payload size in bytes.
        max_payload: usize,
        /// Current frequency in MHz.
        frequency_mhz: f32,
        /// Whether receive reporting is enabled.
        rx_enabled: bool,
        /// Count of corrupt receptions.
        rx_bad: u32,
        /// Count of good receptions.
        rx_good: u32,
        /// Count of completed transmissions.
        tx_good: u32,
    },

    /// Multi-line usage text for `AT+HELP`.
    Help,
}

impl Response {
    /// Whether this response reports a failure.
    pub fn is_failure(&self) -> bool {
        matches!(
            self,
            Response::TxTooLong { .. }
                | Response::TxInvalidHex { .. }
                | Response::InvalidRxMode
                | Response::Unknown { .. }
                | Response::ReceiveFailed
        )
    }
}

impl fmt::Display for Response {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Response::Sent { bytes } => write!(f, "+SENT {} bytes.", bytes),
            Response::TxTooLong { size, max } => {
                write!(f, "+FAIL: MAX_MESSAGE_LEN EXCEEDED! {} / {}", size, max)
            }
            Response::TxInvalidHex { position } => {
                write!(f, "+FAIL: INVALID HEX! char {}", position)
            }
            Response::Ok => write!(f, "+ Ok."),
            Response::InvalidRxMode => write!(f, "+ Failed. Invalid RX mode!"),
            Response::Unknown { line } => write!(f, "Unknown command: {}", line),
            Response::Packet { payload, rssi, snr } => {
                write!(
                    f,
                    "+RX {},{},{},{}",
                    payload.len(),
                    encode_hex(payload),
                    rssi,
                    snr
                )
            }
            Response::ReceiveFailed => write!(f, "+RX failed"),
            Response::FrequencySet { mhz } => write!(f, "Set Freq to: {:.2}", mhz),
            Response::RadioReady => write!(f, "LoRa radio init OK!"),
            Response::Info {
                version,
                profile,
                max_payload,
                frequency_mhz,
                rx_enabled,
                rx_bad,
                rx_good,
                tx_good,
            } => {
                writeln!(f, "status info:")?;
                writeln!(f)?;
                writeln!(f, "firmware:      {}", version)?;
                let profile_name = profile
                    .profile()
                    .map(|p| p.description())
                    .unwrap_or("unknown modem config!");
                writeln!(f, "modem config:  {}", profile_name)?;
                writeln!(f, "max pkt size:  {}", max_payload)?;
                writeln!(f, "frequency:     {:.2}", frequency_mhz)?;
                writeln!(f, "rx listener:   {}", *rx_enabled as u8)?;
                writeln!(f)?;
                writeln!(f, "rx bad:        {}", rx_bad)?;
                writeln!(f, "rx good:       {}", rx_good)?;
                write!(f, "tx good:       {}", tx_good)
            }
            Response::Help => {
                use crate::command::ModemProfile::*;
                writeln!(f, "rfmodem help:")?;
                writeln!(f, "AT+HELP             Print this usage information.")?;
                writeln!(f, "AT+TX=<hexdata>     Send binary data.")?;
                writeln!(f, "AT+RX=<0|1>         Turn receiving on (1) or off (0).")?;
                writeln!(f, "AT+FREQ=<freq>      Changes the frequency.")?;
                writeln!(f, "AT+INFO             Output status information.")?;
                writeln!(f, "AT+MODE=<NUM>       Set modem config:")?;
                writeln!(f, "                    {} - {} (default)", MediumRange.code(), MediumRange.description())?;
                writeln!(f, "                     Bw = 125 kHz, Cr = 4/5, Sf = 128chips/symbol, CRC on.")?;
                writeln!(f, "                    {} - {}", FastShortRange.code(), FastShortRange.description())?;
                writeln!(f, "                     Bw = 500 kHz, Cr = 4/5, Sf = 128chips/symbol, CRC on.")?;
                writeln!(f, "                    {} - {}", SlowLongRangeA.code(), SlowLongRangeA.description())?;
                writeln!(f, "                     Bw = 31.25 kHz, Cr = 4/8, Sf = 512chips/symbol, CRC on.")?;
                writeln!(f, "                    {} - {}", SlowLongRangeB.code(), SlowLongRangeB.description())?;
                write!(f, "                     Bw = 125 kHz, Cr = 4/8, Sf = 4096chips/symbol, CRC on.")
            }
        }
    }
}
