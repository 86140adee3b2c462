//! Radio handle wrapper: every transmission is followed by a return to
//! receive mode, and every outcome is counted and shown on the status line.

use tracing::{trace, warn};

use super::error::TransportError;
use super::notify::Notifiers;
use super::radio::{Radio, RadioError, RadioSettings, SignalQuality};
use crate::protocol::{MessageId, PacketKind};
use crate::protocol::metrics::Metrics;

/// Exclusive owner of the radio and the link counters.
#[derive(Debug)]
pub(crate) struct Link<R> {
    radio: R,
    pub(crate) metrics: Metrics,
}

impl<R: Radio> Link<R> {
    pub(crate) fn new(radio: R) -> Self {
        Self {
            radio,
            metrics: Metrics::default(),
        }
    }

    /// Apply settings and enter receive mode.
    pub(crate) fn bring_up(
        &mut self,
        settings: &RadioSettings,
        notifiers: &mut Notifiers,
    ) -> Result<(), TransportError> {
        notifiers.status("LoRa Init...");
        if let Err(err) = self.radio.configure(settings) {
            warn!(error = %err, "radio configuration failed");
            notifiers.status(&format!("LoRa Fail {err}"));
            return Err(TransportError::RadioFault(err));
        }
        notifiers.status("LoRa OK");
        if self.rearm(notifiers) {
            notifiers.status("Listening...");
        }
        Ok(())
    }

    /// Send one frame, then return to receive mode whatever the outcome.
    ///
    /// `message_id` tags a failure with the data frame it concerns.
    pub(crate) fn transmit(
        &mut self,
        kind: PacketKind,
        message_id: Option<MessageId>,
        frame: &[u8],
        notifiers: &mut Notifiers,
    ) -> Result<(), TransportError> {
        trace!(%kind, len = frame.len(), frame = %String::from_utf8_lossy(frame), "tx");
        notifiers.status("Sending LoRa...");

        let result = self.radio.transmit(frame);
        match &result {
            Ok(()) => {
                self.metrics.record_sent(kind);
                notifiers.status("LoRa Sent");
            }
            Err(err) => {
                warn!(%kind, ?message_id, error = %err, "transmit failed");
                self.metrics.record_transmit_fault();
                notifiers.status("LoRa Send Fail");
            }
        }

        self.rearm(notifiers);
        result.map_err(|source| TransportError::TransmitFault { message_id, source })
    }

    /// Read the frame that raised the receive interrupt.
    pub(crate) fn read(&mut self) -> Result<Vec<u8>, RadioError> {
        self.radio.read()
    }

    pub(crate) fn signal_quality(&self) -> Option<SignalQuality> {
        self.radio.signal_quality()
    }

    /// Enter receive mode. Failure is reported but not fatal.
    pub(crate) fn rearm(&mut self, notifiers: &mut Notifiers) -> bool {
        match self.radio.start_receive() {
            Ok(()) => {
                trace!("listening");
                true
            }
            Err(err) => {
                warn!(error = %err, "failed to enter receive mode");
                notifiers.status(&format!("Listen Fail {err}"));
                false
            }
        }
    }

    pub(crate) const fn radio(&self) -> &R {
        &self.radio
    }

    pub(crate) fn into_radio(self) -> R {
        self.radio
    }
}
