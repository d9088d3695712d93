//! rfmodem AT command protocol
//!
//! This crate provides the wire-level types for the rfmodem serial protocol:
//! a line-based text interface that turns a LoRa transceiver into a modem.
//!
//! # Protocol Overview
//!
//! - **Commands** (host → modem): AT-style lines such as `AT+TX=<hexdata>`,
//!   terminated with a newline and matched case-insensitively.
//! - **Responses** (modem → host): one or more text lines per command,
//!   e.g. `+SENT 2 bytes.` or `+ Ok.`.
//! - **Reports** (modem → host, unsolicited): inbound radio packets are
//!   announced as `+RX <len>,<hexpayload>,<rssi>,<snr>` lines that may
//!   interleave with command responses.
//!
//! Payloads travel as hex strings: two uppercase digits per byte on the way
//! out, case-insensitive digits on the way in. An odd-length input is legal;
//! its final lone character is the low-order nibble of the final byte.
//!
//! # Example
//!
//! ```
//! use rfmodem_protocol::{Command, Response};
//!
//! let cmd = Command::parse("AT+RX=1");
//! assert_eq!(cmd, Command::SetRxMode { arg: "1".to_string() });
//!
//! let line = Response::Ok.to_string();
//! assert_eq!(line, "+ Ok.");
//! ```

mod command;
mod error;
mod hex;
mod response;

pub use command::*;
pub use error::*;
pub use hex::*;
pub use response::*;
