//! Error handling for rtelnet
//!
//! This module provides structured error types for the client. Every error
//! carries a fatal/recoverable classification: fatal conditions (transport
//! failures, unhandled negotiation verbs, remote close mid-read) are terminal
//! at the point of detection, while recoverable conditions (bad credentials,
//! writing before login) leave session state unchanged so the caller can
//! retry. The calling layer decides whether a fatal error aborts the process.

use std::error::Error as StdError;
use std::fmt;
use std::io;

/// Top-level error type for rtelnet operations
#[derive(Debug)]
pub enum ClientError {
    /// Transport-level errors (connect, send, receive)
    Network(NetworkError),
    /// Telnet negotiation errors
    Negotiation(NegotiationError),
    /// Session-state errors (all recoverable)
    Session(SessionError),
}

/// Network connection related errors. All fatal.
#[derive(Debug)]
pub enum NetworkError {
    /// Could not establish the initial connection
    ConnectionFailed { host: String, port: u16, reason: String },
    /// A blocking operation hit the configured socket timeout
    Timeout { peer: String },
    /// Connection lost during send or receive
    ConnectionLost { reason: String },
}

/// Telnet negotiation errors. All fatal.
#[derive(Debug)]
pub enum NegotiationError {
    /// An IAC sequence carried a verb the client has no handler for
    UnhandledCommand { code: u8 },
    /// The remote side closed the connection before negotiation or a
    /// phrase match could complete
    Incomplete,
    /// An IAC sequence was cut off at the end of a received chunk
    Truncated { at: usize },
}

/// Session-state errors. All recoverable: state is unchanged and the
/// caller may retry.
#[derive(Debug)]
pub enum SessionError {
    /// The server reported incorrect credentials
    LoginFailed,
    /// A command was issued before a successful login
    NotLoggedIn { command: String },
    /// The session has been closed
    NotConnected,
}

impl ClientError {
    /// True for conditions that are terminal at the point of detection.
    /// Recoverable errors leave session state unchanged.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, ClientError::Session(_))
    }
}

impl fmt::Display for ClientError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClientError::Network(err) => write!(f, "Network error: {err}"),
            ClientError::Negotiation(err) => write!(f, "Negotiation error: {err}"),
            ClientError::Session(err) => write!(f, "Session error: {err}"),
        }
    }
}

impl fmt::Display for NetworkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NetworkError::ConnectionFailed { host, port, reason } => {
                write!(f, "Unable to connect to {host}:{port}: {reason}")
            }
            NetworkError::Timeout { peer } => {
                write!(f, "Operation timed out waiting on {peer}")
            }
            NetworkError::ConnectionLost { reason } => {
                write!(f, "Connection lost: {reason}")
            }
        }
    }
}

impl fmt::Display for NegotiationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NegotiationError::UnhandledCommand { code } => {
                write!(f, "No method to handle IAC code: {code}")
            }
            NegotiationError::Incomplete => {
                write!(f, "Unable to complete negotiation process")
            }
            NegotiationError::Truncated { at } => {
                write!(f, "Truncated IAC sequence at byte {at}")
            }
        }
    }
}

impl fmt::Display for SessionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionError::LoginFailed => {
                write!(f, "Unable to log in: incorrect username or password")
            }
            SessionError::NotLoggedIn { command } => {
                write!(f, "Unable to write `{command}` to terminal: not logged in")
            }
            SessionError::NotConnected => write!(f, "Session is closed"),
        }
    }
}

impl StdError for ClientError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            ClientError::Network(err) => Some(err),
            ClientError::Negotiation(err) => Some(err),
            ClientError::Session(err) => Some(err),
        }
    }
}

impl StdError for NetworkError {}
impl StdError for NegotiationError {}
impl StdError for SessionError {}

impl From<NetworkError> for ClientError {
    fn from(err: NetworkError) -> Self {
        ClientError::Network(err)
    }
}

impl From<NegotiationError> for ClientError {
    fn from(err: NegotiationError) -> Self {
        ClientError::Negotiation(err)
    }
}

impl From<SessionError> for ClientError {
    fn from(err: SessionError) -> Self {
        ClientError::Session(err)
    }
}

impl From<io::Error> for ClientError {
    fn from(err: io::Error) -> Self {
        match err.kind() {
            io::ErrorKind::WouldBlock | io::ErrorKind::TimedOut => {
                ClientError::Network(NetworkError::Timeout {
                    peer: "unknown".to_string(),
                })
            }
            _ => ClientError::Network(NetworkError::ConnectionLost {
                reason: err.to_string(),
            }),
        }
    }
}

/// Result type alias for rtelnet operations
pub type ClientResult<T> = Result<T, ClientError>;

/// Specialized result type for transport operations
pub type NetworkResult<T> = Result<T, NetworkError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fatal_classification() {
        assert!(ClientError::Network(NetworkError::ConnectionLost {
            reason: "reset".to_string()
        })
        .is_fatal());
        assert!(ClientError::Negotiation(NegotiationError::Incomplete).is_fatal());
        assert!(
            ClientError::Negotiation(NegotiationError::UnhandledCommand { code: 246 }).is_fatal()
        );
        assert!(!ClientError::Session(SessionError::LoginFailed).is_fatal());
        assert!(!ClientError::Session(SessionError::NotLoggedIn {
            command: "pwd".to_string()
        })
        .is_fatal());
        assert!(!ClientError::Session(SessionError::NotConnected).is_fatal());
    }

    #[test]
    fn test_io_timeout_maps_to_timeout() {
        let err: ClientError = io::Error::from(io::ErrorKind::TimedOut).into();
        assert!(matches!(
            err,
            ClientError::Network(NetworkError::Timeout { .. })
        ));
        let err: ClientError = io::Error::from(io::ErrorKind::WouldBlock).into();
        assert!(matches!(
            err,
            ClientError::Network(NetworkError::Timeout { .. })
        ));
    }

    #[test]
    fn test_display_messages() {
        let err = ClientError::Negotiation(NegotiationError::UnhandledCommand { code: 250 });
        assert_eq!(
            err.to_string(),
            "Negotiation error: No method to handle IAC code: 250"
        );
    }
}
