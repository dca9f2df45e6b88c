//! Non-blocking UDP socket owned by the control plane.

use protocol::{Address, MAX_DATAGRAM_SIZE};
use std::io;
use std::net::{SocketAddr, UdpSocket};

/// One inbound datagram and its sender.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Datagram {
    pub payload: Vec<u8>,
    pub from: Address,
}

/// Thin wrapper around a bound, non-blocking UDP socket.
///
/// Receiving never waits: an empty queue is reported as `Ok(None)`.
pub struct Transport {
    socket: UdpSocket,
    buffer: Vec<u8>,
}

impl Transport {
    pub fn bind(addr: &str) -> io::Result<Self> {
        let socket = UdpSocket::bind(addr)?;
        socket.set_nonblocking(true)?;
        Ok(Self {
            socket,
            buffer: vec![0u8; MAX_DATAGRAM_SIZE],
        })
    }

    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.socket.local_addr()
    }

    /// Takes at most one queued datagram off the socket.
    pub fn try_recv(&mut self) -> io::Result<Option<Datagram>> {
        match self.socket.recv_from(&mut self.buffer) {
            Ok((len, addr)) => Ok(Some(Datagram {
                payload: self.buffer[..len].to_vec(),
                from: Address::from(addr),
            })),
            Err(e) if e.kind() == io::ErrorKind::WouldBlock => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Fire-and-forget send to one peer.
    pub fn send_to(&self, bytes: &[u8], addr: &Address) -> io::Result<usize> {
        self.socket.send_to(bytes, (addr.host.as_str(), addr.port))
    }
}
