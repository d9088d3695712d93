//! # rfmodem-engine
//!
//! The command protocol engine of the rfmodem LoRa serial modem: it owns
//! the modem configuration, recognizes and executes AT-style command lines,
//! and formats every response and the unsolicited `+RX` packet report.
//!
//! The engine is transport- and hardware-agnostic: the host loop feeds it
//! trimmed text lines and writes the returned [`rfmodem_protocol::Response`]
//! values back out, and all radio access goes through the
//! [`rfmodem_radio::Transceiver`] trait.
//!
//! ## Usage
//!
//! ```
//! use rfmodem_engine::{ModemConfig, ModemEngine};
//! use rfmodem_radio::sim::SimTransceiver;
//!
//! let mut engine = ModemEngine::new(SimTransceiver::new(), ModemConfig::default());
//! engine.start()?;
//!
//! let responses = engine.handle_line("AT+RX=1")?;
//! assert_eq!(responses[0].to_string(), "+ Ok.");
//! # Ok::<(), rfmodem_engine::FatalFault>(())
//! ```

mod config;
mod engine;

pub use config::*;
pub use engine::*;
