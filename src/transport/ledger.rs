//! Outgoing message tracking, ack matching, and timeout-driven retransmission.

use std::fmt;
use std::time::{Duration, Instant};

use bytes::Bytes;
use tracing::{debug, trace, warn};

use crate::protocol::{CorrelationId, DeviceId, MessageId, PacketCodec};

/// Configurable parameters driving retransmission.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct LedgerConfig {
    /// Silence after a transmission before it is repeated.
    pub ack_timeout: Duration,
    /// Retransmissions attempted after the first send.
    pub max_retries: u8,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            ack_timeout: Duration::from_millis(5000),
            max_retries: 4,
        }
    }
}

/// Delivery state of an outgoing message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeliveryStatus {
    /// Sent, waiting for an acknowledgment.
    Pending,
    /// Peer acknowledged the message.
    Acknowledged,
    /// Retries exhausted without an acknowledgment.
    Failed,
}

impl DeliveryStatus {
    /// Name used by the browser UI.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending_ack",
            Self::Acknowledged => "acked",
            Self::Failed => "failed",
        }
    }

    /// Whether no further transition can happen.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        !matches!(self, Self::Pending)
    }
}

impl fmt::Display for DeliveryStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One message awaiting acknowledgment.
#[derive(Debug, Clone)]
pub struct OutgoingMessage {
    correlation_id: CorrelationId,
    message_id: MessageId,
    wire: Bytes,
    last_sent_at: Instant,
    retries_remaining: u8,
    status: DeliveryStatus,
}

impl OutgoingMessage {
    /// Caller's correlation tag.
    #[must_use]
    pub const fn correlation_id(&self) -> &CorrelationId {
        &self.correlation_id
    }

    /// Radio-level message id.
    #[must_use]
    pub const fn message_id(&self) -> MessageId {
        self.message_id
    }

    /// Encoded frame, reused verbatim on every retransmission.
    #[must_use]
    pub const fn wire(&self) -> &Bytes {
        &self.wire
    }

    /// Time of the latest transmission attempt.
    #[must_use]
    pub const fn last_sent_at(&self) -> Instant {
        self.last_sent_at
    }

    /// Retransmissions still allowed.
    #[must_use]
    pub const fn retries_remaining(&self) -> u8 {
        self.retries_remaining
    }

    /// Current delivery state.
    #[must_use]
    pub const fn status(&self) -> DeliveryStatus {
        self.status
    }

    fn event(&self) -> StatusEvent {
        StatusEvent {
            correlation_id: self.correlation_id.clone(),
            message_id: self.message_id,
            status: self.status,
        }
    }
}

/// Status change reported to the sender of a message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusEvent {
    /// Caller's correlation tag.
    pub correlation_id: CorrelationId,
    /// Radio-level message id.
    pub message_id: MessageId,
    /// New delivery state.
    pub status: DeliveryStatus,
}

impl StatusEvent {
    /// Whether the peer acknowledged the message.
    #[must_use]
    pub fn acked(&self) -> bool {
        self.status == DeliveryStatus::Acknowledged
    }

    /// Whether delivery was given up.
    #[must_use]
    pub fn final_failure(&self) -> bool {
        self.status == DeliveryStatus::Failed
    }
}

/// Result of queuing a new message.
#[derive(Debug, Clone)]
pub struct Enqueued {
    /// Id assigned to the message.
    pub message_id: MessageId,
    /// Frame to transmit now.
    pub wire: Bytes,
    /// The initial `Pending` status event.
    pub event: StatusEvent,
}

/// A frame due for retransmission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Retransmit {
    /// Id of the repeated message.
    pub message_id: MessageId,
    /// Original frame bytes.
    pub wire: Bytes,
    /// Retransmissions left after this one.
    pub retries_remaining: u8,
}

/// Summary of one timeout sweep.
#[derive(Debug, Default)]
pub struct TickOutcome {
    /// Frames to send again, oldest message first.
    pub retransmit: Vec<Retransmit>,
    /// Messages that ran out of retries.
    pub failed: Vec<StatusEvent>,
    /// Terminal entries found and removed by the sweep.
    pub purged: usize,
}

impl TickOutcome {
    /// Whether the sweep changed nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.retransmit.is_empty() && self.failed.is_empty() && self.purged == 0
    }
}

/// In-memory table of messages awaiting acknowledgment.
///
/// Acks are matched on the bare message id; the acknowledging sender is only
/// logged. Two peers that reuse the same id can therefore satisfy each
/// other's entries.
#[derive(Debug)]
pub struct OutgoingMessageLedger {
    config: LedgerConfig,
    last_id: MessageId,
    entries: Vec<OutgoingMessage>,
}

impl OutgoingMessageLedger {
    /// Create an empty ledger.
    #[must_use]
    pub fn new(config: LedgerConfig) -> Self {
        Self {
            config,
            last_id: MessageId::NONE,
            entries: Vec::new(),
        }
    }

    /// Active configuration.
    #[must_use]
    pub const fn config(&self) -> &LedgerConfig {
        &self.config
    }

    /// Assign an id, encode the frame once, and record it as pending.
    ///
    /// The caller transmits `wire` immediately and forwards `event`.
    pub fn enqueue(
        &mut self,
        codec: &PacketCodec,
        sender: &DeviceId,
        plaintext: &[u8],
        correlation_id: CorrelationId,
        now: Instant,
    ) -> Enqueued {
        let message_id = self.allocate_id();
        let wire = Bytes::from(codec.encode_data(sender, message_id, plaintext));

        let entry = OutgoingMessage {
            correlation_id,
            message_id,
            wire: wire.clone(),
            last_sent_at: now,
            retries_remaining: self.config.max_retries,
            status: DeliveryStatus::Pending,
        };
        debug!(
            %message_id,
            correlation_id = %entry.correlation_id,
            len = wire.len(),
            "queued message awaiting ack"
        );
        let event = entry.event();
        self.entries.push(entry);

        Enqueued {
            message_id,
            wire,
            event,
        }
    }

    /// Match an acknowledgment against the pending entries.
    ///
    /// Returns the `Acknowledged` event on a match. Duplicate or stale acks
    /// are logged and ignored.
    pub fn on_ack_received(
        &mut self,
        message_id: MessageId,
        from: &DeviceId,
    ) -> Option<StatusEvent> {
        let Some(index) = self.entries.iter().position(|entry| {
            entry.message_id == message_id && entry.status == DeliveryStatus::Pending
        }) else {
            debug!(%message_id, %from, "ack for unknown or finished message");
            return None;
        };

        let mut entry = self.entries.remove(index);
        entry.status = DeliveryStatus::Acknowledged;
        debug!(
            %message_id,
            %from,
            correlation_id = %entry.correlation_id,
            retries_used = self.config.max_retries.saturating_sub(entry.retries_remaining),
            "message acknowledged"
        );
        Some(entry.event())
    }

    /// Sweep for expired acknowledgments at `now`.
    ///
    /// Entries silent for longer than the ack timeout are scheduled for
    /// retransmission with their original bytes, or fail once no retries are
    /// left. Failed entries are removed.
    pub fn tick(&mut self, now: Instant) -> TickOutcome {
        let timeout = self.config.ack_timeout;
        let mut outcome = TickOutcome::default();

        self.entries.retain_mut(|entry| {
            if entry.status.is_terminal() {
                warn!(
                    message_id = %entry.message_id,
                    status = %entry.status,
                    "purging finished entry left in ledger"
                );
                outcome.purged += 1;
                return false;
            }

            let silent_for = now.saturating_duration_since(entry.last_sent_at);
            if silent_for <= timeout {
                return true;
            }

            if entry.retries_remaining > 0 {
                entry.retries_remaining -= 1;
                entry.last_sent_at = now;
                debug!(
                    message_id = %entry.message_id,
                    correlation_id = %entry.correlation_id,
                    retries_remaining = entry.retries_remaining,
                    "ack timeout, retransmitting"
                );
                outcome.retransmit.push(Retransmit {
                    message_id: entry.message_id,
                    wire: entry.wire.clone(),
                    retries_remaining: entry.retries_remaining,
                });
                true
            } else {
                entry.status = DeliveryStatus::Failed;
                debug!(
                    message_id = %entry.message_id,
                    correlation_id = %entry.correlation_id,
                    "ack timeout, retries exhausted"
                );
                outcome.failed.push(entry.event());
                false
            }
        });

        if !outcome.is_empty() {
            trace!(
                retransmit = outcome.retransmit.len(),
                failed = outcome.failed.len(),
                remaining = self.entries.len(),
                "ledger sweep"
            );
        }
        outcome
    }

    /// Look up a pending entry.
    #[must_use]
    pub fn get(&self, message_id: MessageId) -> Option<&OutgoingMessage> {
        self.entries
            .iter()
            .find(|entry| entry.message_id == message_id)
    }

    /// Number of entries awaiting acknowledgment.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing is awaiting acknowledgment.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn allocate_id(&mut self) -> MessageId {
        let mut candidate = self.last_id.next();
        while self.entries.iter().any(|entry| entry.message_id == candidate) {
            candidate = candidate.next();
        }
        self.last_id = candidate;
        candidate
    }
}

impl Default for OutgoingMessageLedger {
    fn default() -> Self {
        Self::new(LedgerConfig::default())
    }
}
