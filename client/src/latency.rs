//! Round-trip latency tracking over id-correlated ping/pong probes

use log::debug;
use shared::ClientMessage;

/// Issues timestamped latency probes and matches replies back to them.
///
/// One probe is outstanding at a time; starting a new probe abandons the
/// previous one, and a reply is only accepted when its probe id matches the
/// outstanding probe. The most recent sample overwrites the displayed value.
pub struct LatencyTracker {
    next_probe_id: u64,
    outstanding: Option<Probe>,
    rtt_us: Option<u64>,
}

#[derive(Debug, Clone, Copy)]
struct Probe {
    id: u64,
    sent_at_us: u64,
}

impl LatencyTracker {
    pub fn new() -> Self {
        Self {
            next_probe_id: 1,
            outstanding: None,
            rtt_us: None,
        }
    }

    /// Builds the next probe message, stamped with the given monotonic
    /// microsecond clock reading.
    pub fn start_probe(&mut self, now_us: u64) -> ClientMessage {
        let id = self.next_probe_id;
        self.next_probe_id += 1;
        self.outstanding = Some(Probe {
            id,
            sent_at_us: now_us,
        });
        ClientMessage::Ping {
            timestamp: now_us,
            probe_id: id,
        }
    }

    /// Consumes a pong. Returns the new RTT sample in microseconds, or
    /// `None` when the reply does not match the outstanding probe.
    pub fn on_pong(&mut self, original_timestamp: u64, probe_id: u64, now_us: u64) -> Option<u64> {
        let probe = self.outstanding?;
        if probe.id != probe_id {
            debug!(
                "ignoring pong for probe {} (outstanding: {})",
                probe_id, probe.id
            );
            return None;
        }
        self.outstanding = None;
        let rtt = now_us.saturating_sub(original_timestamp);
        self.rtt_us = Some(rtt);
        Some(rtt)
    }

    /// Latest round-trip time in milliseconds, if any probe has completed.
    pub fn rtt_ms(&self) -> Option<f64> {
        self.rtt_us.map(|us| us as f64 / 1000.0)
    }

    /// HUD string for the latest sample, two-decimal milliseconds.
    pub fn display(&self) -> String {
        match self.rtt_ms() {
            Some(ms) => format!("{:.2} ms", ms),
            None => "-- ms".to_string(),
        }
    }
}

impl Default for LatencyTracker {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_approx_eq::assert_approx_eq;

    #[test]
    fn probe_carries_timestamp_and_id() {
        let mut tracker = LatencyTracker::new();
        match tracker.start_probe(5_000) {
            ClientMessage::Ping {
                timestamp,
                probe_id,
            } => {
                assert_eq!(timestamp, 5_000);
                assert_eq!(probe_id, 1);
            }
            other => panic!("wrong message: {:?}", other),
        }
    }

    #[test]
    fn rtt_is_receipt_minus_original() {
        let mut tracker = LatencyTracker::new();
        let sent = match tracker.start_probe(1_000_000) {
            ClientMessage::Ping { timestamp, .. } => timestamp,
            other => panic!("wrong message: {:?}", other),
        };
        let rtt = tracker.on_pong(sent, 1, 1_012_500).unwrap();
        assert_eq!(rtt, 12_500);
        assert_approx_eq!(tracker.rtt_ms().unwrap(), 12.5, 1e-9);
        assert_eq!(tracker.display(), "12.50 ms");
    }

    #[test]
    fn mismatched_probe_id_yields_no_sample() {
        let mut tracker = LatencyTracker::new();
        tracker.start_probe(1_000);
        assert!(tracker.on_pong(1_000, 99, 2_000).is_none());
        assert!(tracker.rtt_ms().is_none());
        // The outstanding probe is still live and can complete afterwards.
        assert_eq!(tracker.on_pong(1_000, 1, 3_000), Some(2_000));
    }

    #[test]
    fn unsolicited_pong_is_ignored() {
        let mut tracker = LatencyTracker::new();
        assert!(tracker.on_pong(123, 1, 456).is_none());
    }

    #[test]
    fn new_probe_abandons_previous_one() {
        let mut tracker = LatencyTracker::new();
        tracker.start_probe(1_000);
        tracker.start_probe(2_000);
        // Reply to the first probe arrives after the second went out.
        assert!(tracker.on_pong(1_000, 1, 3_000).is_none());
        assert_eq!(tracker.on_pong(2_000, 2, 3_000), Some(1_000));
    }

    #[test]
    fn latest_sample_overwrites_previous() {
        let mut tracker = LatencyTracker::new();
        tracker.start_probe(0);
        tracker.on_pong(0, 1, 10_000);
        tracker.start_probe(1_000_000);
        tracker.on_pong(1_000_000, 2, 1_020_000);
        assert_approx_eq!(tracker.rtt_ms().unwrap(), 20.0, 1e-9);
    }

    #[test]
    fn rtt_non_negative_even_for_skewed_reply() {
        let mut tracker = LatencyTracker::new();
        tracker.start_probe(5_000);
        assert_eq!(tracker.on_pong(5_000, 1, 4_000), Some(0));
    }

    #[test]
    fn display_before_any_sample() {
        assert_eq!(LatencyTracker::new().display(), "-- ms");
    }
}
