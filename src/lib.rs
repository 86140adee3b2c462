//! loralink - reliable text messaging over a half-duplex LoRa radio
//!
//! This library implements the link layer of a small battery-powered
//! messenger: a compact colon-delimited frame format, lightweight payload
//! obfuscation, a send-and-acknowledge ledger with bounded retries, and an
//! interrupt-flagged receive path driven from a single polling loop.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use std::time::Instant;
//! use loralink::{DeviceId, Messenger, NodeConfig, Notifiers};
//! # use loralink::transport::{Radio, RadioError, RadioSettings};
//! # struct Sx1262;
//! # impl Radio for Sx1262 {
//! #     fn configure(&mut self, _: &RadioSettings) -> Result<(), RadioError> { Ok(()) }
//! #     fn transmit(&mut self, _: &[u8]) -> Result<(), RadioError> { Ok(()) }
//! #     fn read(&mut self) -> Result<Vec<u8>, RadioError> { Ok(Vec::new()) }
//! #     fn start_receive(&mut self) -> Result<(), RadioError> { Ok(()) }
//! # }
//!
//! let config = NodeConfig::new(DeviceId::new("BigNode")?);
//! let mut node = Messenger::start(config, Sx1262, Notifiers::default())?;
//!
//! // Give this to the DIO1 interrupt handler.
//! let irq = node.interrupt_handle();
//!
//! node.send("im alive", "button_msg", Instant::now())?;
//! loop {
//!     node.pump(Instant::now());
//! #   break;
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! # Wire Format
//!
//! ```text
//! Data: <sender>:<prefix><message id>:<hex payload>    PhoneNode:P:42:1a2b3c
//! Ack:  <sender>:A:<message id>                        PhoneNode:A:42
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod messenger;
pub mod protocol;
pub mod transport;

pub use messenger::{Messenger, NodeConfig};
pub use protocol::{
    ACK_TAG, Cipher, CorrelationId, Decoded, DeviceId, DropReason, Error, MessageId,
    MetricsSnapshot, Packet, PacketCodec, PacketKind, Result,
};
pub use transport::{
    BridgeNotifier, DeliveryStatus, DisplayNotifier, InterruptHandle, Notifiers, PollOutcome,
    Radio, RadioError, TransportError,
};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
