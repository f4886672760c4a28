//! rtelnet: a minimal interactive telnet client
//!
//! Connects to a remote host, declines every telnet option the server
//! offers (WILL -> DONT, DO -> WONT), automates the login sequence by
//! matching prompt text, and then issues line commands and captures their
//! echoed output. Strictly synchronous, blocking I/O; one connection per
//! client instance.

/// Telnet command byte table and prompt character set
pub mod telnet;

/// Error types with the fatal/recoverable classification
pub mod error;

/// TCP transport and the byte-stream abstraction the engine runs on
pub mod network;

/// Structured debug-event stream
pub mod debug;

/// Pluggable phrase matching (substring, prefix, regex)
pub mod matcher;

/// Negotiation and session engine
pub mod session;

/// Session profile persistence
pub mod config;

pub use error::{ClientError, ClientResult, NegotiationError, NetworkError, SessionError};
pub use network::{TcpTransport, Transport};
pub use session::{SessionState, TelnetClient};
pub use telnet::{TelnetCommand, DEFAULT_PORT, PROMPT_CHARS};
