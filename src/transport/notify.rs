//! Collaborator notification interfaces.
//!
//! Both notifiers are fire-and-forget and run on the polling loop, so
//! implementations must return quickly.

use std::fmt;

use crate::protocol::{CorrelationId, DeviceId, MessageId};

/// On-device status display.
pub trait DisplayNotifier {
    /// Short status line (e.g. "LoRa Sent").
    fn on_status_line(&mut self, _text: &str) {}

    /// Text of a message this node just sent.
    fn on_message_sent(&mut self, _text: &str) {}

    /// Text of a message this node just received.
    fn on_message_received(&mut self, _text: &str) {}
}

/// Local web/socket bridge to the browser UI.
pub trait BridgeNotifier {
    /// A peer's message arrived.
    fn on_peer_message(&mut self, _sender: &DeviceId, _text: &str) {}

    /// Delivery status of one of our sends changed.
    fn on_ack_status(
        &mut self,
        _correlation_id: &CorrelationId,
        _message_id: MessageId,
        _acked: bool,
        _final_failure: bool,
    ) {
    }
}

impl DisplayNotifier for () {}

impl BridgeNotifier for () {}

/// The set of collaborators a messenger reports to.
pub struct Notifiers {
    pub(crate) display: Box<dyn DisplayNotifier>,
    pub(crate) bridge: Box<dyn BridgeNotifier>,
}

impl Notifiers {
    /// Bundle a display and a bridge notifier.
    pub fn new(
        display: impl DisplayNotifier + 'static,
        bridge: impl BridgeNotifier + 'static,
    ) -> Self {
        Self {
            display: Box::new(display),
            bridge: Box::new(bridge),
        }
    }

    pub(crate) fn status(&mut self, text: &str) {
        self.display.on_status_line(text);
    }
}

impl Default for Notifiers {
    fn default() -> Self {
        Self::new((), ())
    }
}

impl fmt::Debug for Notifiers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Notifiers").finish_non_exhaustive()
    }
}
