//! Identifier types and frame kinds

use std::fmt;

use uuid::Uuid;

use super::{Error, MAX_DEVICE_ID_LEN, Result, SEPARATOR};

/// Identity of one node, used as the sender tag of every frame it emits.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "String", into = "String"))]
pub struct DeviceId(String);

impl DeviceId {
    /// Create a device id, rejecting values the wire grammar cannot carry.
    pub fn new(id: impl Into<String>) -> Result<Self> {
        let id = id.into();
        let reason = if id.is_empty() {
            Some("empty")
        } else if id.chars().count() > MAX_DEVICE_ID_LEN {
            Some("longer than 20 characters")
        } else if id.contains(SEPARATOR) {
            Some("contains the ':' separator")
        } else {
            None
        };

        match reason {
            Some(reason) => Err(Error::InvalidDeviceId { id, reason }),
            None => Ok(Self(id)),
        }
    }

    /// Borrow the id as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DeviceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for DeviceId {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        Self::new(value)
    }
}

impl TryFrom<&str> for DeviceId {
    type Error = Error;

    fn try_from(value: &str) -> Result<Self> {
        Self::new(value)
    }
}

impl From<DeviceId> for String {
    fn from(id: DeviceId) -> Self {
        id.0
    }
}

/// Per-sender message counter value.
///
/// Zero is reserved: it marks an id that could not be parsed and is never
/// assigned to an outgoing message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MessageId(u32);

impl MessageId {
    /// Reserved "no id" value.
    pub const NONE: Self = Self(0);

    /// Wrap a raw counter value.
    #[must_use]
    pub const fn new(raw: u32) -> Self {
        Self(raw)
    }

    /// Raw counter value.
    #[must_use]
    pub const fn as_u32(self) -> u32 {
        self.0
    }

    /// Whether this is the reserved zero id.
    #[must_use]
    pub const fn is_none(self) -> bool {
        self.0 == 0
    }

    /// The id following this one, wrapping past `u32::MAX` straight to 1.
    #[must_use]
    pub const fn next(self) -> Self {
        match self.0.wrapping_add(1) {
            0 => Self(1),
            n => Self(n),
        }
    }

    /// Best-effort parse of the leading decimal digits of `text`.
    ///
    /// Anything that does not start with a digit, or overflows 32 bits,
    /// yields [`MessageId::NONE`].
    #[must_use]
    pub fn parse_leading(text: &str) -> Self {
        let digits = text.bytes().take_while(u8::is_ascii_digit);
        let mut value: u32 = 0;
        for digit in digits {
            let Some(next) = value
                .checked_mul(10)
                .and_then(|v| v.checked_add(u32::from(digit - b'0')))
            else {
                return Self::NONE;
            };
            value = next;
        }
        Self(value)
    }
}

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for MessageId {
    fn from(raw: u32) -> Self {
        Self(raw)
    }
}

/// Opaque caller-supplied tag linking a send to its later status events.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CorrelationId(String);

impl CorrelationId {
    /// Wrap a caller-supplied tag.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Generate a fresh random tag for callers that do not track their own.
    #[must_use]
    pub fn random() -> Self {
        Self(Uuid::new_v4().simple().to_string())
    }

    /// Borrow the tag as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CorrelationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for CorrelationId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for CorrelationId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Frame kinds carried on the link
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PacketKind {
    /// Application text, expects an acknowledgment
    Data,
    /// Acknowledgment of a data frame
    Ack,
}

impl PacketKind {
    /// Get kind name
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Data => "data",
            Self::Ack => "ack",
        }
    }
}

impl fmt::Display for PacketKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn device_id_rejects_wire_hostile_values() {
        assert!(DeviceId::new("BigNode").is_ok());
        assert!(DeviceId::new("").is_err());
        assert!(DeviceId::new("a".repeat(21)).is_err());
        assert!(DeviceId::new("a".repeat(20)).is_ok());
        assert!(matches!(
            DeviceId::new("Big:Node"),
            Err(Error::InvalidDeviceId { .. })
        ));
    }

    #[test]
    fn message_id_skips_zero_on_wrap() {
        assert_eq!(MessageId::NONE.next(), MessageId::new(1));
        assert_eq!(MessageId::new(41).next(), MessageId::new(42));
        assert_eq!(MessageId::new(u32::MAX).next(), MessageId::new(1));
    }

    #[test]
    fn message_id_parses_leading_digits() {
        assert_eq!(MessageId::parse_leading("42"), MessageId::new(42));
        assert_eq!(MessageId::parse_leading("42abc"), MessageId::new(42));
        assert_eq!(MessageId::parse_leading("abc"), MessageId::NONE);
        assert_eq!(MessageId::parse_leading(""), MessageId::NONE);
        assert_eq!(MessageId::parse_leading("99999999999"), MessageId::NONE);
    }

    #[test]
    fn random_correlation_ids_differ() {
        let a = CorrelationId::random();
        let b = CorrelationId::random();
        assert_ne!(a, b);
        assert_eq!(a.as_str().len(), 32);
    }
}
