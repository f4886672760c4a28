//! Network module for the telnet transport
//!
//! This module provides the TCP transport for the client: connection
//! establishment with an optional timeout that is applied to all subsequent
//! blocking operations, raw send/receive primitives, and the host labels
//! resolved once at connect time for debug-event labelling.

use std::io::{self, Read, Write};
use std::net::{Shutdown, SocketAddr, TcpStream, ToSocketAddrs};
use std::time::Duration;

use log::{debug, info};

use crate::error::{NetworkError, NetworkResult};

/// Byte-stream abstraction the session engine runs on.
///
/// One connection per client instance. The engine never touches sockets
/// directly, so tests can drive it with a scripted peer.
pub trait Transport {
    /// Write raw bytes to the stream. No chunking guarantees beyond what
    /// the underlying transport offers.
    fn send(&mut self, data: &[u8]) -> io::Result<()>;

    /// Block until at least one byte is available or the configured timeout
    /// elapses. Returns `Ok(0)` on orderly remote close.
    fn receive(&mut self, buf: &mut [u8]) -> io::Result<usize>;

    /// Release the transport. The engine calls this exactly once.
    fn close(&mut self) -> io::Result<()>;

    /// Label for the local end, used only for debug-event labelling
    fn local_label(&self) -> &str;

    /// Label for the remote end, used only for debug-event labelling
    fn peer_label(&self) -> &str;
}

/// TCP transport for a telnet session
pub struct TcpTransport {
    stream: TcpStream,
    local_label: String,
    peer_label: String,
    host: String,
    port: u16,
}

impl TcpTransport {
    /// Connects to `host:port`. When a timeout is supplied it bounds the
    /// initial connect and is then applied to every subsequent blocking
    /// read and write on the stream.
    pub fn connect(host: &str, port: u16, timeout: Option<Duration>) -> NetworkResult<Self> {
        let address = format!("{host}:{port}");

        let stream = match timeout {
            Some(t) => {
                let addr: SocketAddr = address
                    .to_socket_addrs()
                    .map_err(|e| Self::connect_failed(host, port, &e))?
                    .next()
                    .ok_or_else(|| NetworkError::ConnectionFailed {
                        host: host.to_string(),
                        port,
                        reason: "no socket addresses resolved".to_string(),
                    })?;
                TcpStream::connect_timeout(&addr, t)
                    .map_err(|e| Self::connect_failed(host, port, &e))?
            }
            None => TcpStream::connect(&address).map_err(|e| Self::connect_failed(host, port, &e))?,
        };

        stream
            .set_read_timeout(timeout)
            .and_then(|_| stream.set_write_timeout(timeout))
            .map_err(|e| Self::connect_failed(host, port, &e))?;

        // Host labels are resolved once here and immutable afterward
        let local_label = hostname::get()
            .map(|h| h.to_string_lossy().into_owned())
            .unwrap_or_else(|_| "localhost".to_string());
        let peer_label = host.to_string();

        info!("connected to {address}");
        Ok(Self {
            stream,
            local_label,
            peer_label,
            host: host.to_string(),
            port,
        })
    }

    fn connect_failed(host: &str, port: u16, err: &dyn std::fmt::Display) -> NetworkError {
        NetworkError::ConnectionFailed {
            host: host.to_string(),
            port,
            reason: err.to_string(),
        }
    }

    /// The host this transport was connected to
    pub fn host(&self) -> &str {
        &self.host
    }

    /// The port this transport was connected to
    pub fn port(&self) -> u16 {
        self.port
    }
}

impl Transport for TcpTransport {
    fn send(&mut self, data: &[u8]) -> io::Result<()> {
        self.stream.write_all(data)?;
        self.stream.flush()
    }

    fn receive(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let n = self.stream.read(buf)?;
        debug!("received {n} bytes from {}", self.peer_label);
        Ok(n)
    }

    fn close(&mut self) -> io::Result<()> {
        info!("closing connection to {}:{}", self.host, self.port);
        self.stream.shutdown(Shutdown::Both)
    }

    fn local_label(&self) -> &str {
        &self.local_label
    }

    fn peer_label(&self) -> &str {
        &self.peer_label
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::TcpListener;

    #[test]
    fn test_connect_and_labels() {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
        let port = listener.local_addr().unwrap().port();

        let transport = TcpTransport::connect("127.0.0.1", port, None).expect("connect");
        assert_eq!(transport.peer_label(), "127.0.0.1");
        assert_eq!(transport.host(), "127.0.0.1");
        assert_eq!(transport.port(), port);
        assert!(!transport.local_label().is_empty());
    }

    #[test]
    fn test_send_and_receive() {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
        let port = listener.local_addr().unwrap().port();

        let handle = std::thread::spawn(move || {
            let (mut peer, _) = listener.accept().expect("accept");
            let mut buf = [0u8; 16];
            let n = peer.read(&mut buf).expect("read");
            peer.write_all(&buf[..n]).expect("write");
        });

        let mut transport =
            TcpTransport::connect("127.0.0.1", port, Some(Duration::from_secs(5))).expect("connect");
        transport.send(b"hello").expect("send");

        let mut buf = [0u8; 16];
        let n = transport.receive(&mut buf).expect("receive");
        assert_eq!(&buf[..n], b"hello");

        transport.close().expect("close");
        handle.join().unwrap();
    }

    #[test]
    fn test_receive_zero_on_remote_close() {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
        let port = listener.local_addr().unwrap().port();

        let handle = std::thread::spawn(move || {
            let (peer, _) = listener.accept().expect("accept");
            drop(peer);
        });

        let mut transport =
            TcpTransport::connect("127.0.0.1", port, Some(Duration::from_secs(5))).expect("connect");
        handle.join().unwrap();

        let mut buf = [0u8; 16];
        let n = transport.receive(&mut buf).expect("receive");
        assert_eq!(n, 0, "orderly close must surface as an empty receive");
    }

    #[test]
    fn test_connect_failure_is_reported() {
        // Port 1 on localhost is almost certainly closed
        let result = TcpTransport::connect("127.0.0.1", 1, Some(Duration::from_millis(200)));
        assert!(matches!(
            result,
            Err(NetworkError::ConnectionFailed { port: 1, .. })
        ));
    }
}
