//! Abstraction for network transport, so the verification pipeline can be tested
//! without a real socket.

use std::net::{SocketAddr, UdpSocket};
use std::time::Duration;

use tracing::debug;

use crate::error::ClientError;

pub trait ClientTransport {
    fn send(&self, data: &[u8], addr: SocketAddr) -> Result<usize, ClientError>;
    fn recv(&self, buf: &mut [u8]) -> Result<(usize, SocketAddr), ClientError>;
}

/// The client's one production transport: an ephemeral UDP socket bound per query.
pub struct UdpTransport {
    socket: UdpSocket,
}

impl UdpTransport {
    pub fn new(timeout: Duration) -> std::io::Result<Self> {
        let socket = UdpSocket::bind("0.0.0.0:0")?;
        socket.set_read_timeout(Some(timeout))?;
        socket.set_write_timeout(Some(timeout))?;
        Ok(Self { socket })
    }
}

impl ClientTransport for UdpTransport {
    fn send(&self, data: &[u8], addr: SocketAddr) -> Result<usize, ClientError> {
        debug!(bytes = data.len(), %addr, "sending request");
        Ok(self.socket.send_to(data, addr)?)
    }

    fn recv(&self, buf: &mut [u8]) -> Result<(usize, SocketAddr), ClientError> {
        match self.socket.recv_from(buf) {
            Ok((nbytes, addr)) => {
                debug!(bytes = nbytes, %addr, "received datagram");
                Ok((nbytes, addr))
            }
            Err(e) if e.kind() == std::io::ErrorKind::WouldBlock || e.kind() == std::io::ErrorKind::TimedOut => {
                Err(ClientError::Timeout)
            }
            Err(e) => Err(ClientError::Io(e)),
        }
    }
}
