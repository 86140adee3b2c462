//! Public messaging surface composing the codec, ledger, and receive pipeline.

use std::time::Instant;

use tracing::{debug, info, instrument, warn};

use crate::protocol::{
    Cipher, CorrelationId, DEFAULT_APP_PREFIX, DEFAULT_PASSPHRASE, DeviceId, Error, MIN_FRAME_LEN,
    MessageId, MetricsSnapshot, PacketCodec, PacketKind, Result,
};
use crate::transport::{
    InterruptHandle, LedgerConfig, Link, Notifiers, OutgoingMessageLedger, PollOutcome, Radio,
    RadioSettings, ReceivePipeline, StatusEvent, TransportError,
};

/// Node configuration options.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NodeConfig {
    /// Identity stamped on every outgoing frame.
    pub device_id: DeviceId,
    /// Data-frame prefix shared by every node of this application.
    #[cfg_attr(feature = "serde", serde(default = "default_app_prefix"))]
    pub app_prefix: String,
    /// Pre-shared obfuscation passphrase.
    #[cfg_attr(feature = "serde", serde(default = "default_passphrase"))]
    pub passphrase: String,
    /// Reads shorter than this are discarded before decoding.
    #[cfg_attr(feature = "serde", serde(default = "default_min_frame_len"))]
    pub min_frame_len: usize,
    /// Retransmission policy.
    #[cfg_attr(feature = "serde", serde(default))]
    pub ledger: LedgerConfig,
    /// Physical-layer settings.
    #[cfg_attr(feature = "serde", serde(default))]
    pub radio: RadioSettings,
}

#[cfg(feature = "serde")]
fn default_app_prefix() -> String {
    DEFAULT_APP_PREFIX.to_owned()
}

#[cfg(feature = "serde")]
fn default_passphrase() -> String {
    DEFAULT_PASSPHRASE.to_owned()
}

#[cfg(feature = "serde")]
const fn default_min_frame_len() -> usize {
    MIN_FRAME_LEN
}

impl NodeConfig {
    /// Configuration with deployment defaults for the given node.
    #[must_use]
    pub fn new(device_id: DeviceId) -> Self {
        Self {
            device_id,
            app_prefix: DEFAULT_APP_PREFIX.to_owned(),
            passphrase: DEFAULT_PASSPHRASE.to_owned(),
            min_frame_len: MIN_FRAME_LEN,
            ledger: LedgerConfig::default(),
            radio: RadioSettings::default(),
        }
    }

    /// Use a different application prefix.
    #[must_use]
    pub fn with_app_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.app_prefix = prefix.into();
        self
    }

    /// Use a different passphrase.
    #[must_use]
    pub fn with_passphrase(mut self, passphrase: impl Into<String>) -> Self {
        self.passphrase = passphrase.into();
        self
    }

    /// Use a different retransmission policy.
    #[must_use]
    pub fn with_ledger(mut self, ledger: LedgerConfig) -> Self {
        self.ledger = ledger;
        self
    }

    /// Use different physical-layer settings.
    #[must_use]
    pub fn with_radio(mut self, radio: RadioSettings) -> Self {
        self.radio = radio;
        self
    }

    /// Check the configuration without touching any hardware.
    pub fn validate(&self) -> Result<()> {
        self.codec().map(|_| ())
    }

    fn codec(&self) -> Result<PacketCodec> {
        PacketCodec::new(self.app_prefix.clone(), Cipher::new(&self.passphrase)?)
    }
}

/// One messenger node: owns the radio, the outgoing ledger, and the receive
/// pipeline, and runs entirely on the caller's polling loop.
#[derive(Debug)]
pub struct Messenger<R> {
    device_id: DeviceId,
    codec: PacketCodec,
    link: Link<R>,
    ledger: OutgoingMessageLedger,
    pipeline: ReceivePipeline,
    notifiers: Notifiers,
}

impl<R: Radio> Messenger<R> {
    /// Configure the radio and start listening.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError::RadioFault`] if the radio rejects its
    /// settings, and [`TransportError::Protocol`] for an invalid prefix or
    /// passphrase. The host decides whether to retry, reboot, or halt.
    #[instrument(level = "info", skip_all, fields(device_id = %config.device_id))]
    pub fn start(
        config: NodeConfig,
        radio: R,
        mut notifiers: Notifiers,
    ) -> std::result::Result<Self, TransportError> {
        let codec = config.codec()?;
        let mut link = Link::new(radio);
        link.bring_up(&config.radio, &mut notifiers)?;

        info!(
            prefix = codec.app_prefix(),
            frequency_mhz = config.radio.frequency_mhz,
            "link ready"
        );
        let pipeline = ReceivePipeline::new(
            config.device_id.clone(),
            codec.clone(),
            config.min_frame_len,
        );
        Ok(Self {
            device_id: config.device_id,
            codec,
            link,
            ledger: OutgoingMessageLedger::new(config.ledger),
            pipeline,
            notifiers,
        })
    }

    /// Handle for the radio's receive-ready interrupt.
    #[must_use]
    pub fn interrupt_handle(&self) -> InterruptHandle {
        self.pipeline.interrupt_handle()
    }

    /// Whether a received frame is waiting for the next [`Messenger::pump`].
    #[must_use]
    pub fn frame_pending(&self) -> bool {
        self.pipeline.frame_pending()
    }

    /// Queue `text` for reliable delivery and transmit it immediately.
    ///
    /// A failed first transmission is logged and left to the retry timer;
    /// the caller learns the outcome through `on_ack_status`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptyPayload`] for an empty message, which the frame
    /// grammar cannot carry.
    #[instrument(level = "debug", skip(self, text, correlation_id))]
    pub fn send(
        &mut self,
        text: &str,
        correlation_id: impl Into<CorrelationId>,
        now: Instant,
    ) -> Result<MessageId> {
        if text.is_empty() {
            return Err(Error::EmptyPayload);
        }

        let queued = self.ledger.enqueue(
            &self.codec,
            &self.device_id,
            text.as_bytes(),
            correlation_id.into(),
            now,
        );
        self.notifiers.display.on_message_sent(text);
        if let Err(err) = self.link.transmit(
            PacketKind::Data,
            Some(queued.message_id),
            &queued.wire,
            &mut self.notifiers,
        ) {
            warn!(error = %err, "first transmission failed, retry pending");
        }
        self.report(&queued.event);
        Ok(queued.message_id)
    }

    /// Run one scheduling cycle: retry sweep first, then the receive path.
    pub fn pump(&mut self, now: Instant) -> PollOutcome {
        let outcome = self.ledger.tick(now);
        for retransmit in &outcome.retransmit {
            self.link.metrics.record_retransmission();
            if let Err(err) = self.link.transmit(
                PacketKind::Data,
                Some(retransmit.message_id),
                &retransmit.wire,
                &mut self.notifiers,
            ) {
                debug!(
                    retries_remaining = retransmit.retries_remaining,
                    error = %err,
                    "retransmission failed"
                );
            }
        }
        for event in &outcome.failed {
            self.link.metrics.record_failed();
            self.report(event);
        }

        self.pipeline
            .poll(&mut self.link, &mut self.ledger, &mut self.notifiers)
    }

    /// Local node id.
    #[must_use]
    pub const fn device_id(&self) -> &DeviceId {
        &self.device_id
    }

    /// Messages awaiting acknowledgment.
    #[must_use]
    pub const fn ledger(&self) -> &OutgoingMessageLedger {
        &self.ledger
    }

    /// Number of messages awaiting acknowledgment.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.ledger.len()
    }

    /// Snapshot of the link counters.
    #[must_use]
    pub fn metrics(&self) -> MetricsSnapshot {
        self.link.metrics.snapshot()
    }

    /// Borrow the radio.
    #[must_use]
    pub const fn radio(&self) -> &R {
        self.link.radio()
    }

    /// Shut the node down and hand the radio back.
    #[must_use]
    pub fn into_radio(self) -> R {
        self.link.into_radio()
    }

    fn report(&mut self, event: &StatusEvent) {
        self.notifiers.bridge.on_ack_status(
            &event.correlation_id,
            event.message_id,
            event.acked(),
            event.final_failure(),
        );
    }
}
