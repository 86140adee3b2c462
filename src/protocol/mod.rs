//! LoRa link wire protocol
//!
//! This module provides the frame grammar, payload obfuscation, identifier
//! types, and per-node counters. Everything here is pure: no radio access and
//! no clocks.

mod cipher;
mod codec;
mod error;
pub(crate) mod metrics;
mod packet;
mod types;

pub use cipher::Cipher;
pub use codec::PacketCodec;
pub use error::{Error, Result};
pub use metrics::MetricsSnapshot;
pub use packet::{Decoded, DropReason, Packet};
pub use types::{CorrelationId, DeviceId, MessageId, PacketKind};

/// Tag that follows the sender id in every acknowledgment frame.
pub const ACK_TAG: &str = "A:";

/// Default application prefix carried by data frames.
pub const DEFAULT_APP_PREFIX: &str = "P:";

/// Default pre-shared obfuscation passphrase.
pub const DEFAULT_PASSPHRASE: &str = "SecureLoraComms1";

/// Longest sender id accepted on the wire (in characters).
pub const MAX_DEVICE_ID_LEN: usize = 20;

/// Shortest read that is worth handing to the decoder.
pub const MIN_FRAME_LEN: usize = 5;

/// Field separator of the wire grammar.
pub const SEPARATOR: char = ':';
