//! Shared test support: a scripted peer standing in for the TCP transport

use std::collections::VecDeque;
use std::io;

use rtelnet::Transport;

/// One step of a scripted conversation
pub enum Script {
    /// Deliver a chunk of bytes on the next receive
    Chunk(Vec<u8>),
    /// Fail the next receive with a socket timeout
    Timeout,
}

/// Transport driven by a fixed script. Once the script is exhausted every
/// receive returns `Ok(0)`, which reads as an orderly remote close.
pub struct MockTransport {
    incoming: VecDeque<Script>,
    pub sent: Vec<Vec<u8>>,
    pub closed: bool,
}

impl MockTransport {
    pub fn new(script: Vec<Script>) -> Self {
        Self {
            incoming: script.into_iter().collect(),
            sent: Vec::new(),
            closed: false,
        }
    }

    pub fn with_chunks(chunks: Vec<&[u8]>) -> Self {
        Self::new(chunks.into_iter().map(|c| Script::Chunk(c.to_vec())).collect())
    }
}

impl Transport for MockTransport {
    fn send(&mut self, data: &[u8]) -> io::Result<()> {
        self.sent.push(data.to_vec());
        Ok(())
    }

    fn receive(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match self.incoming.pop_front() {
            Some(Script::Chunk(chunk)) => {
                buf[..chunk.len()].copy_from_slice(&chunk);
                Ok(chunk.len())
            }
            Some(Script::Timeout) => Err(io::Error::from(io::ErrorKind::TimedOut)),
            None => Ok(0),
        }
    }

    fn close(&mut self) -> io::Result<()> {
        self.closed = true;
        Ok(())
    }

    fn local_label(&self) -> &str {
        "client"
    }

    fn peer_label(&self) -> &str {
        "server"
    }
}
