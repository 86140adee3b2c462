//! Link-level error types covering radio, transmit, and receive failures.

use super::radio::RadioError;
use crate::protocol::{Error as ProtocolError, MessageId};
use core::fmt;

/// Unified error type for link operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    /// Radio could not be configured. The node cannot work without it.
    RadioFault(RadioError),
    /// A single transmit attempt failed; the ledger retries data frames.
    TransmitFault {
        /// Id of the data frame that failed to leave, `None` for acks.
        message_id: Option<MessageId>,
        /// Radio-level cause.
        source: RadioError,
    },
    /// A read failed at the radio layer (checksum, timeout).
    ReceiveFault(RadioError),
    /// Configuration rejected by the protocol layer.
    Protocol(ProtocolError),
}

impl TransportError {
    /// Whether the node can keep running after this error.
    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::TransmitFault { .. } | Self::ReceiveFault(_))
    }
}

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RadioFault(err) => write!(f, "radio initialisation failed: {err}"),
            Self::TransmitFault {
                message_id: Some(id),
                source,
            } => write!(f, "transmit of message {id} failed: {source}"),
            Self::TransmitFault {
                message_id: None,
                source,
            } => write!(f, "transmit failed: {source}"),
            Self::ReceiveFault(err) => write!(f, "receive failed: {err}"),
            Self::Protocol(err) => write!(f, "protocol error: {err}"),
        }
    }
}

impl std::error::Error for TransportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::RadioFault(err)
            | Self::TransmitFault { source: err, .. }
            | Self::ReceiveFault(err) => Some(err),
            Self::Protocol(err) => Some(err),
        }
    }
}

impl From<ProtocolError> for TransportError {
    fn from(err: ProtocolError) -> Self {
        Self::Protocol(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_link_faults_are_recoverable() {
        assert!(
            TransportError::TransmitFault {
                message_id: None,
                source: RadioError::Timeout,
            }
            .is_recoverable()
        );
        assert!(TransportError::ReceiveFault(RadioError::CrcMismatch).is_recoverable());
        assert!(!TransportError::RadioFault(RadioError::Hardware { code: -2 }).is_recoverable());
        assert!(!TransportError::Protocol(ProtocolError::EmptyPassphrase).is_recoverable());
    }

    #[test]
    fn display_includes_cause() {
        let err = TransportError::RadioFault(RadioError::Hardware { code: -707 });
        assert_eq!(
            err.to_string(),
            "radio initialisation failed: radio error code -707"
        );
    }

    #[test]
    fn transmit_fault_names_the_message() {
        let err = TransportError::TransmitFault {
            message_id: Some(MessageId::new(12)),
            source: RadioError::Timeout,
        };
        assert_eq!(err.to_string(), "transmit of message 12 failed: radio timeout");
        assert!(std::error::Error::source(&err).is_some());

        let err = TransportError::TransmitFault {
            message_id: None,
            source: RadioError::Hardware { code: -5 },
        };
        assert_eq!(err.to_string(), "transmit failed: radio error code -5");
    }
}
