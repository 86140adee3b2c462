//! Text frame codec (encode/decode)
//!
//! # Format
//!
//! ```text
//! Data: <sender>:<prefix><message id>:<hex payload>    PhoneNode:P:42:1a2b3c
//! Ack:  <sender>:A:<message id>                        PhoneNode:A:42
//! ```
//!
//! Anything else heard on the channel is foreign traffic and is dropped
//! without complaint.

use super::{
    ACK_TAG, Cipher, Decoded, DeviceId, DropReason, Error, MAX_DEVICE_ID_LEN, MessageId, Packet,
    PacketKind, Result, SEPARATOR,
};

/// Shortest `<id>:<payload>` remainder after the data prefix.
const MIN_DATA_BODY_LEN: usize = 3;

/// Encoder/decoder bound to one application prefix and passphrase.
#[derive(Debug, Clone)]
pub struct PacketCodec {
    app_prefix: String,
    cipher: Cipher,
}

impl PacketCodec {
    /// Create a codec for the given application prefix.
    ///
    /// # Errors
    ///
    /// The prefix must be non-empty, end with `:`, and must not start with
    /// the ack tag. An unterminated prefix such as `P` would also match
    /// another application's `PX:` frames.
    pub fn new(app_prefix: impl Into<String>, cipher: Cipher) -> Result<Self> {
        let app_prefix = app_prefix.into();
        if app_prefix.is_empty() {
            return Err(Error::InvalidPrefix {
                prefix: app_prefix,
                reason: "empty",
            });
        }
        if app_prefix.starts_with(ACK_TAG) {
            return Err(Error::InvalidPrefix {
                prefix: app_prefix,
                reason: "collides with the ack tag",
            });
        }
        if !app_prefix.ends_with(SEPARATOR) {
            return Err(Error::InvalidPrefix {
                prefix: app_prefix,
                reason: "must end with ':'",
            });
        }
        Ok(Self { app_prefix, cipher })
    }

    /// Application prefix carried by data frames.
    #[must_use]
    pub fn app_prefix(&self) -> &str {
        &self.app_prefix
    }

    /// Payload cipher.
    #[must_use]
    pub const fn cipher(&self) -> &Cipher {
        &self.cipher
    }

    /// Encode a data frame, obfuscating `plaintext`.
    #[must_use]
    pub fn encode_data(
        &self,
        sender: &DeviceId,
        message_id: MessageId,
        plaintext: &[u8],
    ) -> String {
        let payload = self.cipher.encrypt(plaintext);
        format!(
            "{sender}{SEPARATOR}{}{message_id}{SEPARATOR}{payload}",
            self.app_prefix
        )
    }

    /// Encode an acknowledgment frame.
    #[must_use]
    pub fn encode_ack(&self, sender: &DeviceId, message_id: MessageId) -> String {
        format!("{sender}{SEPARATOR}{ACK_TAG}{message_id}")
    }

    /// Encode a parsed packet back to its wire form.
    #[must_use]
    pub fn encode(&self, packet: &Packet) -> String {
        match packet.kind() {
            PacketKind::Ack => self.encode_ack(packet.sender(), packet.message_id()),
            PacketKind::Data => format!(
                "{}{SEPARATOR}{}{}{SEPARATOR}{}",
                packet.sender(),
                self.app_prefix,
                packet.message_id(),
                packet.payload_hex().unwrap_or_default()
            ),
        }
    }

    /// Decode one raw read.
    ///
    /// Never fails: frames outside the grammar come back as
    /// [`Decoded::Dropped`] with the reason.
    #[must_use]
    pub fn decode(&self, raw: &[u8]) -> Decoded {
        let Ok(text) = std::str::from_utf8(raw) else {
            return Decoded::Dropped(DropReason::Foreign);
        };

        let Some((sender, rest)) = text.split_once(SEPARATOR) else {
            return Decoded::Dropped(DropReason::MissingSeparator);
        };
        if sender.is_empty() || rest.is_empty() {
            return Decoded::Dropped(DropReason::MissingSeparator);
        }
        if sender.chars().count() > MAX_DEVICE_ID_LEN {
            return Decoded::Dropped(DropReason::InvalidSender);
        }
        let Ok(sender) = DeviceId::new(sender) else {
            return Decoded::Dropped(DropReason::InvalidSender);
        };

        if let Some(id) = rest.strip_prefix(ACK_TAG) {
            return Decoded::Packet(Packet::ack(sender, MessageId::parse_leading(id)));
        }

        let Some(body) = rest.strip_prefix(self.app_prefix.as_str()) else {
            return Decoded::Dropped(DropReason::Foreign);
        };
        if body.len() < MIN_DATA_BODY_LEN {
            return Decoded::Dropped(DropReason::Malformed);
        }
        match body.split_once(SEPARATOR) {
            Some((id, payload)) if !id.is_empty() && !payload.is_empty() => Decoded::Packet(
                Packet::data(sender, MessageId::parse_leading(id), payload),
            ),
            _ => Decoded::Dropped(DropReason::Malformed),
        }
    }

    /// Recover the plaintext of a data frame. Empty for acks or bad payloads.
    #[must_use]
    pub fn open(&self, packet: &Packet) -> Vec<u8> {
        packet
            .payload_hex()
            .map(|hex| self.cipher.decrypt(hex))
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::{DEFAULT_APP_PREFIX, DEFAULT_PASSPHRASE};

    fn codec() -> PacketCodec {
        PacketCodec::new(DEFAULT_APP_PREFIX, Cipher::new(DEFAULT_PASSPHRASE).unwrap()).unwrap()
    }

    fn id(raw: &str) -> DeviceId {
        DeviceId::new(raw).unwrap()
    }

    fn dropped(raw: &str) -> Option<DropReason> {
        match codec().decode(raw.as_bytes()) {
            Decoded::Dropped(reason) => Some(reason),
            Decoded::Packet(_) => None,
        }
    }

    #[test]
    fn test_encode_data_shape() {
        let wire = codec().encode_data(&id("BigNode"), MessageId::new(1), b"hi");
        assert_eq!(wire, "BigNode:P:1:3b0c");
    }

    #[test]
    fn test_encode_ack_shape() {
        let wire = codec().encode_ack(&id("BigNode"), MessageId::new(7));
        assert_eq!(wire, "BigNode:A:7");
    }

    #[test]
    fn test_decode_data() {
        let codec = codec();
        let wire = codec.encode_data(&id("PhoneNode"), MessageId::new(7), b"hello");
        let packet = codec.decode(wire.as_bytes()).packet().expect("data frame");
        assert_eq!(packet.sender().as_str(), "PhoneNode");
        assert_eq!(packet.kind(), PacketKind::Data);
        assert_eq!(packet.message_id(), MessageId::new(7));
        assert_eq!(codec.open(&packet), b"hello");
    }

    #[test]
    fn test_decode_ack() {
        let packet = codec().decode(b"PhoneNode:A:42").packet().expect("ack");
        assert_eq!(packet.kind(), PacketKind::Ack);
        assert_eq!(packet.message_id(), MessageId::new(42));
        assert!(packet.payload_hex().is_none());
    }

    #[test]
    fn test_decode_ack_non_numeric_id_is_zero() {
        let packet = codec().decode(b"PhoneNode:A:xyz").packet().expect("ack");
        assert_eq!(packet.message_id(), MessageId::NONE);
    }

    #[test]
    fn test_decode_missing_separator() {
        assert_eq!(dropped("hello world"), Some(DropReason::MissingSeparator));
        assert_eq!(dropped(":P:1:00"), Some(DropReason::MissingSeparator));
        assert_eq!(dropped("PhoneNode:"), Some(DropReason::MissingSeparator));
    }

    #[test]
    fn test_decode_sender_too_long() {
        let raw = format!("{}:P:1:00", "x".repeat(21));
        assert_eq!(dropped(&raw), Some(DropReason::InvalidSender));
    }

    #[test]
    fn test_decode_foreign_prefix() {
        assert_eq!(dropped("PhoneNode:Q:1:00"), Some(DropReason::Foreign));
        assert_eq!(dropped("weather:21.5C"), Some(DropReason::Foreign));
    }

    #[test]
    fn test_decode_non_utf8_is_foreign() {
        assert_eq!(
            codec().decode(&[0xff, 0xfe, b':', b'P', b':', b'1']),
            Decoded::Dropped(DropReason::Foreign)
        );
    }

    #[test]
    fn test_decode_malformed_data() {
        assert_eq!(dropped("PhoneNode:P:1"), Some(DropReason::Malformed));
        assert_eq!(dropped("PhoneNode:P:12"), Some(DropReason::Malformed));
        assert_eq!(dropped("PhoneNode:P:123"), Some(DropReason::Malformed));
        assert_eq!(dropped("PhoneNode:P:12:"), Some(DropReason::Malformed));
        assert_eq!(dropped("PhoneNode:P::ab"), Some(DropReason::Malformed));
    }

    #[test]
    fn test_prefix_validation() {
        let cipher = Cipher::new(DEFAULT_PASSPHRASE).unwrap();
        assert!(PacketCodec::new("", cipher.clone()).is_err());
        assert!(PacketCodec::new("A:", cipher.clone()).is_err());
        assert_eq!(
            PacketCodec::new("P", cipher.clone()).map(|_| ()),
            Err(Error::InvalidPrefix {
                prefix: "P".to_owned(),
                reason: "must end with ':'",
            })
        );
        assert!(PacketCodec::new("Chat:", cipher).is_ok());
    }

    #[test]
    fn test_longer_prefix_sharing_our_letter_is_foreign() {
        assert_eq!(dropped("Sensor:PX:17:00"), Some(DropReason::Foreign));
        assert_eq!(dropped("Sensor:PP:1:3b0c"), Some(DropReason::Foreign));
    }

    #[test]
    fn test_other_prefix_is_foreign_to_us() {
        let ours = codec();
        let theirs =
            PacketCodec::new("Q:", Cipher::new(DEFAULT_PASSPHRASE).unwrap()).unwrap();
        let wire = theirs.encode_data(&id("Other"), MessageId::new(3), b"hey");
        assert_eq!(
            ours.decode(wire.as_bytes()),
            Decoded::Dropped(DropReason::Foreign)
        );
    }

    #[test]
    fn test_encode_matches_parsed_packet() {
        let codec = codec();
        let wire = "PhoneNode:P:9:3b0c";
        let packet = codec.decode(wire.as_bytes()).packet().unwrap();
        assert_eq!(codec.encode(&packet), wire);
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        fn device_id_strategy() -> impl Strategy<Value = DeviceId> {
            "[A-Za-z0-9_-]{1,20}".prop_map(|s| DeviceId::new(s).unwrap())
        }

        proptest! {
            /// Property: data frames survive encode/decode with their plaintext
            #[test]
            fn prop_data_roundtrip(
                sender in device_id_strategy(),
                raw_id in 1u32..,
                plaintext in prop::collection::vec(any::<u8>(), 1..200),
            ) {
                let codec = codec();
                let message_id = MessageId::new(raw_id);
                let wire = codec.encode_data(&sender, message_id, &plaintext);
                let packet = codec.decode(wire.as_bytes()).packet().expect("decodes");
                prop_assert_eq!(packet.sender(), &sender);
                prop_assert_eq!(packet.kind(), PacketKind::Data);
                prop_assert_eq!(packet.message_id(), message_id);
                prop_assert_eq!(codec.open(&packet), plaintext);
            }

            /// Property: ack frames survive encode/decode
            #[test]
            fn prop_ack_roundtrip(sender in device_id_strategy(), raw_id in any::<u32>()) {
                let codec = codec();
                let wire = codec.encode_ack(&sender, MessageId::new(raw_id));
                let packet = codec.decode(wire.as_bytes()).packet().expect("decodes");
                prop_assert_eq!(packet.sender(), &sender);
                prop_assert_eq!(packet.kind(), PacketKind::Ack);
                prop_assert_eq!(packet.message_id(), MessageId::new(raw_id));
            }

            /// Property: arbitrary bytes never panic the decoder
            #[test]
            fn prop_decode_total(raw in prop::collection::vec(any::<u8>(), 0..64)) {
                let _ = codec().decode(&raw);
            }
        }
    }
}
