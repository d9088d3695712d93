//! Stdio runner for the rfmodem command engine.
//!
//! Wires the engine to a line transport on stdin/stdout with the simulated
//! transceiver, which makes the whole command protocol exercisable without
//! radio hardware. The loop is single-threaded and cooperative: one command
//! line is serviced, then one receive poll runs, exactly like the firmware's
//! main loop. Logs go to stderr so the protocol surface on stdout stays
//! clean.

use std::io::{self, BufRead, Write};
use std::process::ExitCode;

use clap::Parser;
use rfmodem_engine::{FatalFault, ModemConfig, ModemEngine, FIRMWARE_VERSION};
use rfmodem_protocol::{ProfileCode, MAX_COMMAND_LEN};
use rfmodem_radio::sim::SimTransceiver;
use tracing::{debug, error, warn};

#[derive(Parser, Debug)]
#[command(name = "rfmodem", version, about = "LoRa serial modem over a simulated transceiver")]
struct Args {
    /// Initial carrier frequency in MHz.
    #[arg(long, default_value_t = rfmodem_engine::DEFAULT_FREQUENCY_MHZ)]
    freq: f32,

    /// Initial modem profile code (0-3).
    #[arg(long, default_value_t = 0)]
    mode: u8,

    /// Transmit power in dBm.
    #[arg(long, default_value_t = rfmodem_engine::DEFAULT_TX_POWER_DBM)]
    tx_power: i8,

    /// Disable receive reporting at boot.
    #[arg(long)]
    no_rx: bool,

    /// Loop transmitted packets back as receptions.
    #[arg(long)]
    loopback: bool,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();
    let config = ModemConfig {
        modulation: ProfileCode(args.mode),
        frequency_mhz: args.freq,
        rx_enabled: !args.no_rx,
        tx_power_dbm: args.tx_power,
    };

    let radio = if args.loopback {
        SimTransceiver::new().with_loopback()
    } else {
        SimTransceiver::new()
    };
    let mut engine = ModemEngine::new(radio, config);

    let stdout = io::stdout();
    let mut out = stdout.lock();

    if let Err(e) = writeln!(out, "rfmodem firmware (v{})", FIRMWARE_VERSION) {
        error!("stdout closed: {}", e);
        return ExitCode::FAILURE;
    }

    match engine.start() {
        Ok(responses) => {
            if emit(&mut out, &responses).is_err() {
                return ExitCode::FAILURE;
            }
        }
        Err(fault) => return halt(&mut out, &fault),
    }

    let stdin = io::stdin();
    for line in stdin.lock().lines() {
        let line = match line {
            Ok(line) => line,
            Err(e) => {
                error!("stdin read failed: {}", e);
                return ExitCode::FAILURE;
            }
        };
        if line.len() > MAX_COMMAND_LEN {
            warn!("dropping over-long command line ({} bytes)", line.len());
            continue;
        }

        let trimmed = line.trim();
        debug!("command line: {:?}", trimmed);
        match engine.handle_line(trimmed) {
            Ok(responses) => {
                if emit(&mut out, &responses).is_err() {
                    return ExitCode::FAILURE;
                }
            }
            Err(fault) => return halt(&mut out, &fault),
        }

        // One receive poll per loop iteration, after command handling.
        if let Some(report) = engine.poll_receive() {
            if emit(&mut out, std::slice::from_ref(&report)).is_err() {
                return ExitCode::FAILURE;
            }
        }
    }

    ExitCode::SUCCESS
}

fn emit(out: &mut impl Write, responses: &[rfmodem_protocol::Response]) -> io::Result<()> {
    for response in responses {
        writeln!(out, "{}", response)?;
    }
    out.flush()
}

/// Print the fatal diagnostic on the protocol surface and stop. The
/// firmware would spin forever here; the host-side runner exits instead
/// and leaves the retry decision to whoever launched it.
fn halt(out: &mut impl Write, fault: &FatalFault) -> ExitCode {
    let _ = writeln!(out, "{}", fault);
    let _ = out.flush();
    error!("halting on fatal radio fault: {}", fault);
    ExitCode::FAILURE
}
