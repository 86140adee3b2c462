use std::sync::atomic::{AtomicU64, Ordering};

use super::{DropReason, PacketKind};

/// Per-node link counters.
#[derive(Debug, Default)]
pub(crate) struct Metrics {
    frames_sent: AtomicU64,
    frames_received: AtomicU64,
    data_sent: AtomicU64,
    acks_sent: AtomicU64,
    data_received: AtomicU64,
    acks_received: AtomicU64,
    retransmissions: AtomicU64,
    delivered: AtomicU64,
    failed: AtomicU64,
    transmit_faults: AtomicU64,
    receive_faults: AtomicU64,
    dropped_frames: AtomicU64,
    self_echoes: AtomicU64,
}

impl Metrics {
    #[inline]
    pub(crate) fn record_sent(&self, kind: PacketKind) {
        self.frames_sent.fetch_add(1, Ordering::Relaxed);
        match kind {
            PacketKind::Data => self.data_sent.fetch_add(1, Ordering::Relaxed),
            PacketKind::Ack => self.acks_sent.fetch_add(1, Ordering::Relaxed),
        };
    }

    #[inline]
    pub(crate) fn record_received(&self, kind: PacketKind) {
        self.frames_received.fetch_add(1, Ordering::Relaxed);
        match kind {
            PacketKind::Data => self.data_received.fetch_add(1, Ordering::Relaxed),
            PacketKind::Ack => self.acks_received.fetch_add(1, Ordering::Relaxed),
        };
    }

    #[inline]
    pub(crate) fn record_retransmission(&self) {
        self.retransmissions.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub(crate) fn record_delivered(&self) {
        self.delivered.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub(crate) fn record_failed(&self) {
        self.failed.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub(crate) fn record_transmit_fault(&self) {
        self.transmit_faults.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub(crate) fn record_receive_fault(&self) {
        self.receive_faults.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub(crate) fn record_drop(&self, reason: DropReason) {
        self.dropped_frames.fetch_add(1, Ordering::Relaxed);
        if reason == DropReason::SelfEcho {
            self.self_echoes.fetch_add(1, Ordering::Relaxed);
        }
    }

    pub(crate) fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            frames_sent: self.frames_sent.load(Ordering::Relaxed),
            frames_received: self.frames_received.load(Ordering::Relaxed),
            data_sent: self.data_sent.load(Ordering::Relaxed),
            acks_sent: self.acks_sent.load(Ordering::Relaxed),
            data_received: self.data_received.load(Ordering::Relaxed),
            acks_received: self.acks_received.load(Ordering::Relaxed),
            retransmissions: self.retransmissions.load(Ordering::Relaxed),
            delivered: self.delivered.load(Ordering::Relaxed),
            failed: self.failed.load(Ordering::Relaxed),
            transmit_faults: self.transmit_faults.load(Ordering::Relaxed),
            receive_faults: self.receive_faults.load(Ordering::Relaxed),
            dropped_frames: self.dropped_frames.load(Ordering::Relaxed),
            self_echoes: self.self_echoes.load(Ordering::Relaxed),
        }
    }
}

/// Lightweight snapshot of link counters.
#[allow(missing_docs)]
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
pub struct MetricsSnapshot {
    pub frames_sent: u64,
    pub frames_received: u64,
    pub data_sent: u64,
    pub acks_sent: u64,
    pub data_received: u64,
    pub acks_received: u64,
    pub retransmissions: u64,
    pub delivered: u64,
    pub failed: u64,
    pub transmit_faults: u64,
    pub receive_faults: u64,
    pub dropped_frames: u64,
    pub self_echoes: u64,
}

impl MetricsSnapshot {
    /// Share of finished sends that were acknowledged, if any have finished.
    #[must_use]
    pub fn delivery_ratio(&self) -> Option<f64> {
        let finished = self.delivered + self.failed;
        if finished == 0 {
            return None;
        }
        #[allow(clippy::cast_precision_loss)]
        Some(self.delivered as f64 / finished as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counters_split_by_kind() {
        let metrics = Metrics::default();
        metrics.record_sent(PacketKind::Data);
        metrics.record_sent(PacketKind::Ack);
        metrics.record_received(PacketKind::Ack);
        metrics.record_drop(DropReason::SelfEcho);
        metrics.record_drop(DropReason::Foreign);

        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.frames_sent, 2);
        assert_eq!(snapshot.data_sent, 1);
        assert_eq!(snapshot.acks_sent, 1);
        assert_eq!(snapshot.acks_received, 1);
        assert_eq!(snapshot.dropped_frames, 2);
        assert_eq!(snapshot.self_echoes, 1);
    }

    #[test]
    fn delivery_ratio_needs_finished_sends() {
        let mut snapshot = MetricsSnapshot::default();
        assert_eq!(snapshot.delivery_ratio(), None);
        snapshot.delivered = 3;
        snapshot.failed = 1;
        assert_eq!(snapshot.delivery_ratio(), Some(0.75));
    }
}
