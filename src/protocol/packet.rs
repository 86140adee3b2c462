//! Parsed view of one frame

use std::fmt;

use super::{DeviceId, MessageId, PacketKind};

/// One frame of the link protocol.
///
/// Data frames carry the obfuscated payload exactly as it appeared on the
/// wire (hex text); acknowledgments carry none.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Packet {
    sender: DeviceId,
    kind: PacketKind,
    message_id: MessageId,
    payload: Option<String>,
}

impl Packet {
    /// Create a data frame from an already obfuscated payload.
    pub fn data(sender: DeviceId, message_id: MessageId, payload_hex: impl Into<String>) -> Self {
        Self {
            sender,
            kind: PacketKind::Data,
            message_id,
            payload: Some(payload_hex.into()),
        }
    }

    /// Create an acknowledgment frame.
    #[must_use]
    pub const fn ack(sender: DeviceId, message_id: MessageId) -> Self {
        Self {
            sender,
            kind: PacketKind::Ack,
            message_id,
            payload: None,
        }
    }

    /// Get sender id
    #[must_use]
    pub const fn sender(&self) -> &DeviceId {
        &self.sender
    }

    /// Get frame kind
    #[must_use]
    pub const fn kind(&self) -> PacketKind {
        self.kind
    }

    /// Get message id
    #[must_use]
    pub const fn message_id(&self) -> MessageId {
        self.message_id
    }

    /// Get obfuscated payload (data frames only)
    #[must_use]
    pub fn payload_hex(&self) -> Option<&str> {
        self.payload.as_deref()
    }
}

/// Result of decoding one raw read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decoded {
    /// Frame belongs to this application.
    Packet(Packet),
    /// Frame was discarded without any state change.
    Dropped(DropReason),
}

impl Decoded {
    /// Get the packet, if any
    #[must_use]
    pub fn packet(self) -> Option<Packet> {
        match self {
            Self::Packet(packet) => Some(packet),
            Self::Dropped(_) => None,
        }
    }
}

/// Why a raw read was discarded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DropReason {
    /// Shorter than the minimum viable frame.
    TooShort,
    /// No sender separator, or nothing after it.
    MissingSeparator,
    /// Sender id empty or too long.
    InvalidSender,
    /// Data prefix present but the id/payload part is unusable.
    Malformed,
    /// Another application sharing the frequency.
    Foreign,
    /// Our own transmission heard back.
    SelfEcho,
}

impl DropReason {
    /// Get reason name
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::TooShort => "too short",
            Self::MissingSeparator => "missing sender separator",
            Self::InvalidSender => "invalid sender id",
            Self::Malformed => "malformed data frame",
            Self::Foreign => "foreign traffic",
            Self::SelfEcho => "self echo",
        }
    }
}

impl fmt::Display for DropReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
