//! Negotiation and session engine
//!
//! This module implements the core of the client: the stream scan that
//! separates IAC control sequences from literal data and answers each one
//! immediately (WILL -> DONT, DO -> WONT), and the read-until-phrase loop
//! that drives the login and command flows off pattern matches in the data
//! stream. Session state moves Unauthenticated -> Authenticated on a
//! successful login and reaches Closed on `close`; no transition leaves
//! Closed.

use log::{debug, info, warn};
use once_cell::sync::Lazy;

use crate::debug::{DebugEvent, DebugSink, Direction};
use crate::error::{ClientResult, NegotiationError, NetworkError, SessionError};
use crate::matcher::{match_phrase, PhraseMatcher, SubstringMatcher};
use crate::network::Transport;
use crate::telnet::{TelnetCommand, PROMPT_CHARS};

/// Maximum bytes consumed per receive
const RECV_CHUNK: usize = 1024;

/// Phrases expected after submitting credentials. Index 0 is the failure
/// indicator; every later index is a prompt character, so a match index
/// greater than zero means the login succeeded.
static LOGIN_PHRASES: Lazy<Vec<Vec<u8>>> = Lazy::new(|| {
    let mut phrases: Vec<Vec<u8>> = vec![b"ncorrect".to_vec()];
    phrases.extend(PROMPT_CHARS.iter().map(|&c| vec![c]));
    phrases
});

/// The prompt characters as individual phrases, used to pace command
/// issuance once logged in
static PROMPT_PHRASES: Lazy<Vec<Vec<u8>>> =
    Lazy::new(|| PROMPT_CHARS.iter().map(|&c| vec![c]).collect());

/// Session lifecycle state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Unauthenticated,
    Authenticated,
    Closed,
}

/// A telnet client session over an injected transport
pub struct TelnetClient<T: Transport> {
    transport: T,
    state: SessionState,
    debug: bool,
    sink: Option<Box<dyn DebugSink>>,
    matcher: Box<dyn PhraseMatcher>,
}

impl<T: Transport> TelnetClient<T> {
    /// Creates a new session in the Unauthenticated state. Debug mode is
    /// off until a sink is attached.
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            state: SessionState::Unauthenticated,
            debug: false,
            sink: None,
            matcher: Box::new(SubstringMatcher),
        }
    }

    /// Attaches a debug sink and turns debug mode on
    pub fn set_debug_sink(&mut self, sink: Box<dyn DebugSink>) {
        self.sink = Some(sink);
        self.debug = true;
    }

    /// Toggles debug-event emission. Without a sink this has no effect.
    pub fn set_debug(&mut self, enabled: bool) {
        self.debug = enabled;
    }

    /// Replaces the phrase matcher used by `read_until` and `expect`
    pub fn set_matcher(&mut self, matcher: Box<dyn PhraseMatcher>) {
        self.matcher = matcher;
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn is_logged_in(&self) -> bool {
        self.state == SessionState::Authenticated
    }

    /// The underlying transport
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Attempts to log into the remote host. Drains data until "ogin"
    /// appears, sends the username, drains until "assword" appears, sends
    /// the password, then waits for either the failure phrase or a prompt
    /// character. A prompt match (index > 0) moves the session to
    /// Authenticated; the failure phrase is a recoverable
    /// [`SessionError::LoginFailed`] and state is unchanged.
    pub fn login(&mut self, username: &str, password: &str) -> ClientResult<()> {
        match self.state {
            SessionState::Closed => return Err(SessionError::NotConnected.into()),
            SessionState::Authenticated => {
                warn!("login called on an authenticated session");
                return Ok(());
            }
            SessionState::Unauthenticated => {}
        }

        self.read_until(b"ogin")?;
        self.send_line(username.as_bytes())?;

        self.read_until(b"assword")?;
        self.send_line(password.as_bytes())?;

        let (index, _) = self.expect(&LOGIN_PHRASES)?;
        if index > 0 {
            info!("logged in as {username}");
            self.state = SessionState::Authenticated;
            Ok(())
        } else {
            warn!("login rejected for {username}");
            Err(SessionError::LoginFailed.into())
        }
    }

    /// Issues a command to the remote host and returns the raw bytes of one
    /// subsequent receive, untrimmed. Waits for a prompt character first,
    /// negotiating any control sequences seen on the way. Calling this
    /// before a successful login sends nothing and reports a recoverable
    /// [`SessionError::NotLoggedIn`].
    pub fn write(&mut self, command: &str) -> ClientResult<Vec<u8>> {
        match self.state {
            SessionState::Closed => return Err(SessionError::NotConnected.into()),
            SessionState::Unauthenticated => {
                return Err(SessionError::NotLoggedIn {
                    command: command.to_string(),
                }
                .into());
            }
            SessionState::Authenticated => {}
        }

        self.expect(&PROMPT_PHRASES)?;
        self.send_line(command.as_bytes())?;
        self.receive_chunk()
    }

    /// Closes the session and releases the transport. A second call is a
    /// no-op; no transition leaves Closed.
    pub fn close(&mut self) -> ClientResult<()> {
        if self.state == SessionState::Closed {
            return Ok(());
        }
        self.state = SessionState::Closed;
        self.transport.close().map_err(|e| NetworkError::ConnectionLost {
            reason: e.to_string(),
        })?;
        Ok(())
    }

    /// Consumes data from the server until `phrase` is seen, negotiating
    /// any control sequences found along the way. Matching is per received
    /// chunk: a phrase split across two chunks is not recognized.
    pub fn read_until(&mut self, phrase: &[u8]) -> ClientResult<()> {
        loop {
            let chunk = self.receive_chunk()?;
            if self.matcher.matches(phrase, &chunk) {
                return Ok(());
            }
            self.negotiate(&chunk)?;
        }
    }

    /// Consumes data from the server until one of `phrases` is seen and
    /// returns the match index and phrase. Phrases are tried in list
    /// order against each received chunk.
    pub fn expect(&mut self, phrases: &[Vec<u8>]) -> ClientResult<(usize, Vec<u8>)> {
        loop {
            let chunk = self.receive_chunk()?;
            if let Some((index, phrase)) = match_phrase(self.matcher.as_ref(), phrases, &chunk) {
                return Ok((index, phrase.to_vec()));
            }
            self.negotiate(&chunk)?;
        }
    }

    /// Scans a chunk for IAC sequences and answers each one immediately.
    ///
    /// After a handled sequence the scan advances two bytes, not three:
    /// the option byte is re-examined as if it were new data. This matches
    /// the reference behavior exactly and is pinned by tests; see
    /// DESIGN.md before changing it.
    pub fn negotiate(&mut self, data: &[u8]) -> ClientResult<()> {
        let iac = TelnetCommand::IAC as u8;
        let mut pos = 0;

        while pos < data.len() {
            if data[pos] != iac {
                // No negotiation to be done
                pos += 1;
                continue;
            }

            let code = match data.get(pos + 1) {
                Some(&code) => code,
                None => return Err(NegotiationError::Truncated { at: pos }.into()),
            };
            if code == iac {
                // Extra IAC, skip it
                pos += 1;
                continue;
            }

            let option = match data.get(pos + 2) {
                Some(&option) => option,
                None => return Err(NegotiationError::Truncated { at: pos }.into()),
            };

            let response = self.handle_command(code, option)?;
            self.send_raw(&response)?;
            pos += 2;
        }
        Ok(())
    }

    /// Builds the counter-response to one IAC sequence. Only WILL and DO
    /// are handled, and both are declined; any other verb is a fatal
    /// [`NegotiationError::UnhandledCommand`].
    fn handle_command(&self, code: u8, option: u8) -> ClientResult<[u8; 3]> {
        let reply = match TelnetCommand::from_u8(code) {
            Some(TelnetCommand::WILL) => TelnetCommand::DONT,
            Some(TelnetCommand::DO) => TelnetCommand::WONT,
            _ => return Err(NegotiationError::UnhandledCommand { code }.into()),
        };
        debug!("IAC {} {option} -> IAC {} {option}",
            TelnetCommand::from_u8(code).map(|c| c.name()).unwrap_or("?"),
            reply.name());
        Ok([TelnetCommand::IAC as u8, reply as u8, option])
    }

    /// One blocking receive of at most [`RECV_CHUNK`] bytes. An empty
    /// receive means the remote closed mid-read and is fatal; a socket
    /// timeout is an equally fatal [`NetworkError::Timeout`].
    fn receive_chunk(&mut self) -> ClientResult<Vec<u8>> {
        let mut buf = [0u8; RECV_CHUNK];
        let n = match self.transport.receive(&mut buf) {
            Ok(n) => n,
            Err(e)
                if e.kind() == std::io::ErrorKind::WouldBlock
                    || e.kind() == std::io::ErrorKind::TimedOut =>
            {
                return Err(NetworkError::Timeout { peer: self.peer() }.into());
            }
            Err(e) => {
                return Err(NetworkError::ConnectionLost {
                    reason: e.to_string(),
                }
                .into());
            }
        };
        if n == 0 {
            return Err(NegotiationError::Incomplete.into());
        }

        let chunk = buf[..n].to_vec();
        self.emit(Direction::Remote, &chunk);
        Ok(chunk)
    }

    /// Sends a line of text with the newline terminator appended
    fn send_line(&mut self, text: &[u8]) -> ClientResult<()> {
        let mut line = text.to_vec();
        line.push(b'\n');
        self.send_raw(&line)
    }

    fn send_raw(&mut self, data: &[u8]) -> ClientResult<()> {
        if let Err(e) = self.transport.send(data) {
            let err = if e.kind() == std::io::ErrorKind::WouldBlock
                || e.kind() == std::io::ErrorKind::TimedOut
            {
                NetworkError::Timeout { peer: self.peer() }
            } else {
                NetworkError::ConnectionLost {
                    reason: e.to_string(),
                }
            };
            return Err(err.into());
        }
        self.emit(Direction::Local, data);
        Ok(())
    }

    fn peer(&self) -> String {
        self.transport.peer_label().to_string()
    }

    fn emit(&mut self, direction: Direction, payload: &[u8]) {
        if !self.debug {
            return;
        }
        let label = match direction {
            Direction::Local => self.transport.local_label(),
            Direction::Remote => self.transport.peer_label(),
        }
        .to_string();
        if let Some(sink) = self.sink.as_mut() {
            sink.emit(&DebugEvent::decode(direction, label, payload));
        }
    }
}
