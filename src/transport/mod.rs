//! Reliable delivery over a half-duplex radio

mod error;
mod irq;
mod ledger;
mod link;
mod notify;
mod radio;
mod receive;

pub use error::TransportError;
pub use irq::InterruptHandle;
pub use ledger::{
    DeliveryStatus, Enqueued, LedgerConfig, OutgoingMessage, OutgoingMessageLedger, Retransmit,
    StatusEvent, TickOutcome,
};
pub(crate) use link::Link;
pub use notify::{BridgeNotifier, DisplayNotifier, Notifiers};
pub use radio::{Radio, RadioError, RadioSettings, SignalQuality};
pub use receive::PollOutcome;
pub(crate) use receive::ReceivePipeline;
