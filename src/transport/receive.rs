//! Interrupt-flagged receive path: read, classify, dispatch, acknowledge.

use tracing::{debug, trace, warn};

use super::error::TransportError;
use super::irq::{InterruptHandle, RxFlag};
use super::ledger::OutgoingMessageLedger;
use super::link::Link;
use super::notify::Notifiers;
use super::radio::{Radio, RadioError};
use crate::protocol::{
    Decoded, DeviceId, DropReason, MessageId, Packet, PacketCodec, PacketKind,
};

/// What one poll of the pipeline did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollOutcome {
    /// No frame was flagged.
    Idle,
    /// The radio reported a read error ([`TransportError::ReceiveFault`]).
    Fault(TransportError),
    /// The frame was discarded.
    Dropped(DropReason),
    /// An acknowledgment was processed.
    Ack {
        /// Acknowledging node.
        from: DeviceId,
        /// Acknowledged id.
        message_id: MessageId,
        /// Whether it settled one of our pending messages.
        matched: bool,
    },
    /// A peer's message was delivered and acknowledged.
    Data {
        /// Sending node.
        from: DeviceId,
        /// Sender's message id.
        message_id: MessageId,
        /// Recovered text.
        text: String,
        /// Whether the ack reply left the radio.
        ack_sent: bool,
    },
}

/// Receive side of the link.
///
/// The interrupt handler only raises the flag; [`InterruptHandle`] is the
/// piece handed to it. All decoding and dispatch happen in the poll.
#[derive(Debug)]
pub(crate) struct ReceivePipeline {
    device_id: DeviceId,
    codec: PacketCodec,
    min_frame_len: usize,
    flag: RxFlag,
}

impl ReceivePipeline {
    /// Create a pipeline for the node `device_id`.
    pub(crate) fn new(device_id: DeviceId, codec: PacketCodec, min_frame_len: usize) -> Self {
        Self {
            device_id,
            codec,
            min_frame_len,
            flag: RxFlag::new(),
        }
    }

    /// Handle for the radio's receive-ready interrupt.
    pub(crate) fn interrupt_handle(&self) -> InterruptHandle {
        self.flag.handle()
    }

    /// Whether a frame is waiting to be read.
    pub(crate) fn frame_pending(&self) -> bool {
        self.flag.is_raised()
    }

    /// Process the flagged frame, if any. Always leaves the radio listening.
    pub(crate) fn poll<R: Radio>(
        &mut self,
        link: &mut Link<R>,
        ledger: &mut OutgoingMessageLedger,
        notifiers: &mut Notifiers,
    ) -> PollOutcome {
        if !self.flag.take() {
            return PollOutcome::Idle;
        }

        let raw = match link.read() {
            Ok(raw) => raw,
            Err(err) => {
                warn!(error = %err, "receive fault");
                link.metrics.record_receive_fault();
                notifiers.status(match err {
                    RadioError::CrcMismatch => "LoRa RX CRC",
                    _ => "LoRa RX Fail",
                });
                link.rearm(notifiers);
                return PollOutcome::Fault(TransportError::ReceiveFault(err));
            }
        };

        if raw.len() < self.min_frame_len {
            return self.drop_frame(DropReason::TooShort, &raw, link, notifiers);
        }

        if let Some(quality) = link.signal_quality() {
            debug!(rssi = quality.rssi_dbm, snr = quality.snr_db, len = raw.len(), "rx");
        }

        let packet = match self.codec.decode(&raw) {
            Decoded::Packet(packet) => packet,
            Decoded::Dropped(reason) => return self.drop_frame(reason, &raw, link, notifiers),
        };
        if packet.sender() == &self.device_id {
            return self.drop_frame(DropReason::SelfEcho, &raw, link, notifiers);
        }

        link.metrics.record_received(packet.kind());
        match packet.kind() {
            PacketKind::Ack => self.on_ack(packet, link, ledger, notifiers),
            PacketKind::Data => self.on_data(&packet, link, notifiers),
        }
    }

    fn on_ack<R: Radio>(
        &self,
        packet: Packet,
        link: &mut Link<R>,
        ledger: &mut OutgoingMessageLedger,
        notifiers: &mut Notifiers,
    ) -> PollOutcome {
        let message_id = packet.message_id();
        let event = ledger.on_ack_received(message_id, packet.sender());
        if let Some(event) = &event {
            link.metrics.record_delivered();
            notifiers.bridge.on_ack_status(
                &event.correlation_id,
                event.message_id,
                event.acked(),
                event.final_failure(),
            );
        }
        link.rearm(notifiers);

        PollOutcome::Ack {
            from: packet.sender().clone(),
            message_id,
            matched: event.is_some(),
        }
    }

    fn on_data<R: Radio>(
        &self,
        packet: &Packet,
        link: &mut Link<R>,
        notifiers: &mut Notifiers,
    ) -> PollOutcome {
        let message_id = packet.message_id();
        let text = String::from_utf8_lossy(&self.codec.open(packet)).into_owned();
        debug!(from = %packet.sender(), %message_id, %text, "peer message");

        notifiers.status("LoRa RX OK");
        notifiers.bridge.on_peer_message(packet.sender(), &text);
        notifiers.display.on_message_received(&text);

        // Reply before listening again; frames arriving meanwhile are lost.
        let ack = self.codec.encode_ack(&self.device_id, message_id);
        let ack_sent = match link.transmit(PacketKind::Ack, None, ack.as_bytes(), notifiers) {
            Ok(()) => true,
            Err(err) => {
                debug!(%message_id, error = %err, "ack reply not sent");
                false
            }
        };

        PollOutcome::Data {
            from: packet.sender().clone(),
            message_id,
            text,
            ack_sent,
        }
    }

    fn drop_frame<R: Radio>(
        &self,
        reason: DropReason,
        raw: &[u8],
        link: &mut Link<R>,
        notifiers: &mut Notifiers,
    ) -> PollOutcome {
        trace!(%reason, frame = %String::from_utf8_lossy(raw), "dropped frame");
        link.metrics.record_drop(reason);
        link.rearm(notifiers);
        PollOutcome::Dropped(reason)
    }
}
