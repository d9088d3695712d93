//! Integration tests for the command engine against the simulated radio.

use rfmodem_engine::{FatalFault, ModemConfig, ModemEngine};
use rfmodem_protocol::{ProfileCode, Response};
use rfmodem_radio::sim::SimTransceiver;
use rfmodem_radio::Transceiver;

/// Helper to build a started engine over a given radio.
fn started(radio: SimTransceiver) -> ModemEngine<SimTransceiver> {
    let mut engine = ModemEngine::new(radio, ModemConfig::default());
    engine.start().expect("start should succeed");
    engine
}

// ============================================================================
// Boot
// ============================================================================

#[test]
fn test_start_runs_full_init_sequence() {
    let mut engine = started(SimTransceiver::new());

    let radio = engine.radio_mut();
    assert_eq!(radio.init_count(), 1);
    assert_eq!(radio.frequency(), 434.0);
    assert_eq!(radio.profile(), Some(ProfileCode(0)));
    assert_eq!(radio.tx_power(), 23);
}

#[test]
fn test_start_announces_frequency_and_readiness() {
    let mut engine = ModemEngine::new(SimTransceiver::new(), ModemConfig::default());
    let responses = engine.start().unwrap();
    let lines: Vec<String> = responses.iter().map(|r| r.to_string()).collect();
    assert_eq!(lines, vec!["Set Freq to: 434.00", "LoRa radio init OK!"]);
}

// ============================================================================
// AT+TX=
// ============================================================================

#[test]
fn test_tx_transmits_decoded_payload() {
    let mut engine = started(SimTransceiver::new());

    let responses = engine.handle_line("AT+TX=0A0B").unwrap();
    assert_eq!(responses, vec![Response::Sent { bytes: 2 }]);
    assert_eq!(responses[0].to_string(), "+SENT 2 bytes.");
    assert_eq!(engine.radio_mut().sent_packets(), &[vec![0x0a, 0x0b]]);
}

#[test]
fn test_tx_over_max_payload_fails_without_transmitting() {
    let mut engine = started(SimTransceiver::new().with_max_payload(2));

    let responses = engine.handle_line("AT+TX=AABBCC").unwrap();
    assert_eq!(responses, vec![Response::TxTooLong { size: 3, max: 2 }]);
    assert_eq!(
        responses[0].to_string(),
        "+FAIL: MAX_MESSAGE_LEN EXCEEDED! 3 / 2"
    );
    assert!(engine.radio_mut().sent_packets().is_empty());
    assert_eq!(engine.radio_mut().stats().tx_good, 0);
}

#[test]
fn test_tx_odd_length_payload() {
    // Trailing lone digit decodes as the low nibble of a final byte.
    let mut engine = started(SimTransceiver::new());

    let responses = engine.handle_line("AT+TX=0A0B7").unwrap();
    assert_eq!(responses, vec![Response::Sent { bytes: 3 }]);
    assert_eq!(engine.radio_mut().sent_packets(), &[vec![0x0a, 0x0b, 0x07]]);
}

#[test]
fn test_tx_invalid_hex_fails_without_transmitting() {
    let mut engine = started(SimTransceiver::new());

    let responses = engine.handle_line("AT+TX=0AZZ").unwrap();
    assert_eq!(responses, vec![Response::TxInvalidHex { position: 2 }]);
    assert!(engine.radio_mut().sent_packets().is_empty());
}

#[test]
fn test_no_receive_report_during_transmit() {
    // A packet is already pending when the transmit starts. The blocking
    // transmit must finish without a +RX report sneaking into its output;
    // the report only appears at the next poll step.
    let mut engine = started(SimTransceiver::new());
    engine.radio_mut().queue_inbound(vec![0xee], -80, 3);

    let responses = engine.handle_line("AT+TX=0102").unwrap();
    assert_eq!(responses, vec![Response::Sent { bytes: 2 }]);
    assert!(!responses.iter().any(|r| matches!(r, Response::Packet { .. })));

    let report = engine.poll_receive().expect("packet still pending");
    assert!(matches!(report, Response::Packet { .. }));
}

// ============================================================================
// AT+MODE=
// ============================================================================

#[test]
fn test_mode_updates_profile_and_info_reflects_it() {
    let expected = [
        (0, "medium range"),
        (1, "fast+short range"),
        (2, "slow+long range"),
        (3, "slow+long range"),
    ];
    for (code, name) in expected {
        let mut engine = started(SimTransceiver::new());

        let responses = engine.handle_line(&format!("AT+MODE={}", code)).unwrap();
        assert_eq!(responses, vec![Response::Ok]);
        assert_eq!(engine.config().modulation, ProfileCode(code));
        assert_eq!(engine.radio_mut().profile(), Some(ProfileCode(code)));

        let info = engine.handle_line("AT+INFO").unwrap()[0].to_string();
        assert!(
            info.contains(&format!("modem config:  {}", name)),
            "code {} missing {:?} in:\n{}",
            code,
            name,
            info
        );
    }
}

#[test]
fn test_mode_out_of_range_passes_through_to_radio() {
    let mut engine = started(SimTransceiver::new());

    let responses = engine.handle_line("AT+MODE=9").unwrap();
    assert_eq!(responses, vec![Response::Ok]);
    assert_eq!(engine.radio_mut().profile(), Some(ProfileCode(9)));

    let info = engine.handle_line("AT+INFO").unwrap()[0].to_string();
    assert!(info.contains("unknown modem config!"));
}

// ============================================================================
// AT+RX=
// ============================================================================

#[test]
fn test_rx_toggle() {
    let mut engine = started(SimTransceiver::new());
    assert!(engine.config().rx_enabled);

    let responses = engine.handle_line("AT+RX=0").unwrap();
    assert_eq!(responses, vec![Response::Ok]);
    assert!(!engine.config().rx_enabled);

    let responses = engine.handle_line("AT+RX=1").unwrap();
    assert_eq!(responses, vec![Response::Ok]);
    assert!(engine.config().rx_enabled);
}

#[test]
fn test_rx_invalid_value_leaves_state_unchanged() {
    let mut engine = started(SimTransceiver::new());

    let responses = engine.handle_line("AT+RX=2").unwrap();
    assert_eq!(responses, vec![Response::InvalidRxMode]);
    assert_eq!(responses[0].to_string(), "+ Failed. Invalid RX mode!");
    assert!(engine.config().rx_enabled);

    engine.handle_line("AT+RX=0").unwrap();
    let responses = engine.handle_line("AT+RX=banana").unwrap();
    assert_eq!(responses, vec![Response::InvalidRxMode]);
    assert!(!engine.config().rx_enabled);
}

#[test]
fn test_rx_disabled_suppresses_poll_reports() {
    let mut engine = started(SimTransceiver::new());
    engine.radio_mut().queue_inbound(vec![0x01], -90, 1);

    engine.handle_line("AT+RX=0").unwrap();
    assert_eq!(engine.poll_receive(), None);

    // Re-enabling makes the still-queued packet visible again.
    engine.handle_line("AT+RX=1").unwrap();
    assert!(matches!(
        engine.poll_receive(),
        Some(Response::Packet { .. })
    ));
}

// ============================================================================
// AT+FREQ=
// ============================================================================

#[test]
fn test_freq_reinitializes_radio_with_new_frequency() {
    let mut engine = started(SimTransceiver::new());
    engine.handle_line("AT+MODE=2").unwrap();

    let responses = engine.handle_line("AT+FREQ=868.1").unwrap();
    let lines: Vec<String> = responses.iter().map(|r| r.to_string()).collect();
    assert_eq!(lines, vec!["Set Freq to: 868.10", "LoRa radio init OK!"]);

    let radio = engine.radio_mut();
    assert_eq!(radio.init_count(), 2);
    assert_eq!(radio.frequency(), 868.1);
    // The re-init re-applies the previously selected profile and power.
    assert_eq!(radio.profile(), Some(ProfileCode(2)));
    assert_eq!(radio.tx_power(), 23);
}

#[test]
fn test_freq_rejection_is_fatal() {
    let mut engine = started(SimTransceiver::new());
    engine.radio_mut().inject_frequency_failure(true);

    let fault = engine.handle_line("AT+FREQ=1.0").unwrap_err();
    assert!(matches!(fault, FatalFault::FrequencyRejected(_)));
    assert_eq!(engine.fault(), Some(&fault));

    // Halted: nothing is serviced any more.
    let later = engine.handle_line("AT+INFO").unwrap_err();
    assert_eq!(later, fault);
    engine.radio_mut().queue_inbound(vec![0x01], -90, 1);
    assert_eq!(engine.poll_receive(), None);
}

#[test]
fn test_init_failure_at_boot_is_fatal() {
    let mut radio = SimTransceiver::new();
    radio.inject_init_failure(true);
    let mut engine = ModemEngine::new(radio, ModemConfig::default());

    let fault = engine.start().unwrap_err();
    assert!(matches!(fault, FatalFault::InitFailed(_)));
    assert_eq!(
        engine.handle_line("AT+HELP").unwrap_err(),
        fault
    );
}

// ============================================================================
// AT+INFO / AT+HELP / unknown
// ============================================================================

#[test]
fn test_info_reports_counters_from_radio() {
    let mut engine = started(SimTransceiver::new());
    engine.handle_line("AT+TX=01").unwrap();
    engine.radio_mut().queue_inbound(vec![0x02], -70, 5);
    engine.poll_receive().unwrap();

    let info = engine.handle_line("AT+INFO").unwrap()[0].to_string();
    assert!(info.contains("rx bad:        0"));
    assert!(info.contains("rx good:       1"));
    assert!(info.contains("tx good:       1"));
    assert!(info.contains("frequency:     434.00"));
    assert!(info.contains("rx listener:   1"));
}

#[test]
fn test_help_is_served() {
    let mut engine = started(SimTransceiver::new());
    let responses = engine.handle_line("AT+HELP").unwrap();
    assert_eq!(responses, vec![Response::Help]);
}

#[test]
fn test_unknown_command_echoes_line() {
    let mut engine = started(SimTransceiver::new());
    let responses = engine.handle_line("AT+FOO=1").unwrap();
    assert_eq!(
        responses[0].to_string(),
        "Unknown command: AT+FOO=1"
    );
}

// ============================================================================
// Receive poll
// ============================================================================

#[test]
fn test_poll_reports_one_packet_with_metadata() {
    let mut engine = started(SimTransceiver::new());
    engine.radio_mut().queue_inbound(vec![0x0a, 0x0b, 0x0c], -92, -7);

    let report = engine.poll_receive().expect("one report");
    assert_eq!(report.to_string(), "+RX 3,0A0B0C,-92,-7");

    // The length field always equals half the hex payload length.
    if let Response::Packet { payload, .. } = &report {
        assert_eq!(payload.len(), "0A0B0C".len() / 2);
    } else {
        panic!("expected packet report");
    }

    // Nothing pending: the poll is silent.
    assert_eq!(engine.poll_receive(), None);
}

#[test]
fn test_poll_failure_is_reported_and_recoverable() {
    let mut engine = started(SimTransceiver::new());
    engine.radio_mut().inject_receive_failure(true);
    assert_eq!(engine.poll_receive(), Some(Response::ReceiveFailed));

    // A transient driver error does not halt the engine.
    engine.radio_mut().inject_receive_failure(false);
    engine.radio_mut().queue_inbound(vec![0xff], -60, 8);
    assert!(matches!(
        engine.poll_receive(),
        Some(Response::Packet { .. })
    ));
    assert_eq!(engine.handle_line("AT+RX=1").unwrap(), vec![Response::Ok]);
}
