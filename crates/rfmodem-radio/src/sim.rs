//! Deterministic simulated transceiver.
//!
//! Backs the engine tests and the stdio runner. Inbound traffic is scripted
//! through [`SimTransceiver::queue_inbound`] (or generated by loopback mode,
//! where every transmitted payload comes back as a reception), and the three
//! failure injection switches cover the error paths a real driver can hit.

use std::collections::VecDeque;

use log::debug;
use rfmodem_protocol::ProfileCode;

use crate::{RadioError, RadioStats, Transceiver};

/// Default maximum payload size, matching common LoRa driver limits.
pub const SIM_MAX_PAYLOAD: usize = 251;

/// RSSI attached to loopback receptions.
const LOOPBACK_RSSI: i16 = -42;
/// SNR attached to loopback receptions.
const LOOPBACK_SNR: i16 = 9;

#[derive(Debug, Clone)]
struct InboundPacket {
    payload: Vec<u8>,
    rssi: i16,
    snr: i16,
}

/// An in-memory [`Transceiver`] with scripted traffic and failure injection.
#[derive(Debug)]
pub struct SimTransceiver {
    initialized: bool,
    init_count: u32,
    frequency_mhz: f32,
    profile: Option<ProfileCode>,
    tx_power_dbm: i8,
    max_payload: usize,
    loopback: bool,

    in_flight: Option<Vec<u8>>,
    sent: Vec<Vec<u8>>,
    inbound: VecDeque<InboundPacket>,
    last_rssi: i16,
    last_snr: i16,
    stats: RadioStats,

    fail_init: bool,
    fail_frequency: bool,
    fail_receive: bool,
}

impl Default for SimTransceiver {
    fn default() -> Self {
        Self::new()
    }
}

impl SimTransceiver {
    /// Create a simulated radio with the default payload limit.
    pub fn new() -> Self {
        SimTransceiver {
            initialized: false,
            init_count: 0,
            frequency_mhz: 0.0,
            profile: None,
            tx_power_dbm: 0,
            max_payload: SIM_MAX_PAYLOAD,
            loopback: false,
            in_flight: None,
            sent: Vec::new(),
            inbound: VecDeque::new(),
            last_rssi: 0,
            last_snr: 0,
            stats: RadioStats::default(),
            fail_init: false,
            fail_frequency: false,
            fail_receive: false,
        }
    }

    /// Override the maximum payload size.
    pub fn with_max_payload(mut self, max: usize) -> Self {
        self.max_payload = max;
        self
    }

    /// Enable loopback: every transmitted payload is queued as a reception.
    pub fn with_loopback(mut self) -> Self {
        self.loopback = true;
        self
    }

    /// Script an inbound packet with its reception metadata.
    pub fn queue_inbound(&mut self, payload: Vec<u8>, rssi: i16, snr: i16) {
        self.inbound.push_back(InboundPacket { payload, rssi, snr });
    }

    /// Make subsequent `init` calls fail.
    pub fn inject_init_failure(&mut self, fail: bool) {
        self.fail_init = fail;
    }

    /// Make subsequent `set_frequency` calls fail.
    pub fn inject_frequency_failure(&mut self, fail: bool) {
        self.fail_frequency = fail;
    }

    /// Make subsequent `try_receive` calls fail.
    pub fn inject_receive_failure(&mut self, fail: bool) {
        self.fail_receive = fail;
    }

    /// Payloads transmitted so far, in order.
    pub fn sent_packets(&self) -> &[Vec<u8>] {
        &self.sent
    }

    /// How many times `init` has completed.
    pub fn init_count(&self) -> u32 {
        self.init_count
    }

    /// Currently tuned frequency in MHz.
    pub fn frequency(&self) -> f32 {
        self.frequency_mhz
    }

    /// Currently applied profile code, if any was applied since creation.
    pub fn profile(&self) -> Option<ProfileCode> {
        self.profile
    }

    /// Currently applied transmit power in dBm.
    pub fn tx_power(&self) -> i8 {
        self.tx_power_dbm
    }
}

impl Transceiver for SimTransceiver {
    fn init(&mut self) -> Result<(), RadioError> {
        if self.fail_init {
            return Err(RadioError::InitFailed("simulated init failure".to_string()));
        }
        self.initialized = true;
        self.init_count += 1;
        self.in_flight = None;
        debug!("sim radio initialized (count={})", self.init_count);
        Ok(())
    }

    fn set_frequency(&mut self, mhz: f32) -> Result<(), RadioError> {
        if self.fail_frequency {
            return Err(RadioError::frequency_rejected(mhz));
        }
        self.frequency_mhz = mhz;
        Ok(())
    }

    fn set_modem_profile(&mut self, profile: ProfileCode) {
        // Unknown codes are accepted; a real driver may reject them.
        self.profile = Some(profile);
    }

    fn set_tx_power(&mut self, dbm: i8) {
        self.tx_power_dbm = dbm;
    }

    fn max_payload_len(&self) -> usize {
        self.max_payload
    }

    fn send(&mut self, data: &[u8]) -> Result<(), RadioError> {
        if !self.initialized {
            return Err(RadioError::TxFailed("radio not initialized".to_string()));
        }
        self.in_flight = Some(data.to_vec());
        Ok(())
    }

    fn wait_sent(&mut self) -> Result<(), RadioError> {
        let payload = self
            .in_flight
            .take()
            .ok_or_else(|| RadioError::TxFailed("no transmission in flight".to_string()))?;
        self.stats.tx_good += 1;
        if self.loopback {
            self.inbound.push_back(InboundPacket {
                payload: payload.clone(),
                rssi: LOOPBACK_RSSI,
                snr: LOOPBACK_SNR,
            });
        }
        self.sent.push(payload);
        Ok(())
    }

    fn try_receive(&mut self) -> Result<Option<Vec<u8>>, RadioError> {
        if self.fail_receive {
            self.stats.rx_bad += 1;
            return Err(RadioError::RxFailed("simulated receive failure".to_string()));
        }
        match self.inbound.pop_front() {
            Some(packet) => {
                self.last_rssi = packet.rssi;
                self.last_snr = packet.snr;
                self.stats.rx_good += 1;
                Ok(Some(packet.payload))
            }
            None => Ok(None),
        }
    }

    fn last_rssi(&self) -> i16 {
        self.last_rssi
    }

    fn last_snr(&self) -> i16 {
        self.last_snr
    }

    fn stats(&self) -> RadioStats {
        self.stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_send_records_payload_and_counts() {
        let mut radio = SimTransceiver::new();
        radio.init().unwrap();
        radio.send(&[1, 2, 3]).unwrap();
        radio.wait_sent().unwrap();
        assert_eq!(radio.sent_packets(), &[vec![1, 2, 3]]);
        assert_eq!(radio.stats().tx_good, 1);
    }

    #[test]
    fn test_scripted_receive_sets_metadata() {
        let mut radio = SimTransceiver::new();
        radio.queue_inbound(vec![0xaa], -100, -5);
        let packet = radio.try_receive().unwrap();
        assert_eq!(packet, Some(vec![0xaa]));
        assert_eq!(radio.last_rssi(), -100);
        assert_eq!(radio.last_snr(), -5);
        assert_eq!(radio.stats().rx_good, 1);

        // Queue drained.
        assert_eq!(radio.try_receive().unwrap(), None);
    }

    #[test]
    fn test_loopback_queues_transmissions() {
        let mut radio = SimTransceiver::new().with_loopback();
        radio.init().unwrap();
        radio.send(&[7, 8]).unwrap();
        radio.wait_sent().unwrap();
        assert_eq!(radio.try_receive().unwrap(), Some(vec![7, 8]));
    }

    #[test]
    fn test_failure_injection() {
        let mut radio = SimTransceiver::new();
        radio.inject_init_failure(true);
        assert!(radio.init().is_err());

        radio.inject_init_failure(false);
        radio.init().unwrap();

        radio.inject_frequency_failure(true);
        assert!(radio.set_frequency(434.0).is_err());

        radio.inject_receive_failure(true);
        assert!(radio.try_receive().is_err());
        assert_eq!(radio.stats().rx_bad, 1);
    }

    #[test]
    fn test_send_requires_init() {
        let mut radio = SimTransceiver::new();
        assert!(radio.send(&[1]).is_err());
    }
}
