//! OSC-over-UDP sink.
//!
//! Encodes the one message shape the sync core produces: an address followed by
//! int32 arguments. Strings are NUL-terminated and zero-padded to a multiple of
//! four bytes; integers are big-endian.

use super::EventSink;
use crate::error::SinkError;
use std::io::ErrorKind;
use std::net::{SocketAddr, ToSocketAddrs, UdpSocket};

/// Encode an OSC message with int32 arguments.
///
/// Fails if the address is not an OSC address (must start with `/` and contain
/// no NUL bytes).
pub fn encode_message(address: &str, args: &[i32]) -> Result<Vec<u8>, SinkError> {
    if !address.starts_with('/') || address.contains('\0') {
        return Err(SinkError::Encode(format!("invalid OSC address {address:?}")));
    }

    let mut buf = Vec::with_capacity(
        padded_len(address.len()) + padded_len(args.len() + 1) + 4 * args.len(),
    );
    push_padded_str(&mut buf, address.as_bytes());

    let mut tags = Vec::with_capacity(args.len() + 1);
    tags.push(b',');
    tags.extend(std::iter::repeat(b'i').take(args.len()));
    push_padded_str(&mut buf, &tags);

    for a in args {
        buf.extend_from_slice(&a.to_be_bytes());
    }
    Ok(buf)
}

/// Length of a string plus its NUL terminator, rounded up to 4.
#[inline]
fn padded_len(len: usize) -> usize {
    (len + 4) & !3
}

fn push_padded_str(buf: &mut Vec<u8>, s: &[u8]) {
    buf.extend_from_slice(s);
    buf.resize(buf.len() + padded_len(s.len()) - s.len(), 0);
}

/// Sends each message as one UDP datagram.
///
/// The socket is non-blocking with broadcast enabled. A datagram the OS cannot
/// take right now (`WouldBlock`) is reported as an error and dropped.
#[derive(Debug)]
pub struct OscUdpSink {
    socket: UdpSocket,
    target: SocketAddr,
}

impl OscUdpSink {
    /// Bind an ephemeral local port and target `host:port`.
    pub fn connect(host: &str, port: u16) -> Result<Self, SinkError> {
        let target = (host, port).to_socket_addrs()?.next().ok_or_else(|| {
            SinkError::Io(std::io::Error::new(
                ErrorKind::NotFound,
                format!("{host}:{port} did not resolve"),
            ))
        })?;
        let bind: SocketAddr = if target.is_ipv4() {
            ([0, 0, 0, 0], 0).into()
        } else {
            ([0u16; 8], 0).into()
        };
        let socket = UdpSocket::bind(bind)?;
        socket.set_broadcast(true)?;
        socket.set_nonblocking(true)?;
        tracing::debug!(local = ?socket.local_addr().ok(), %target, "OSC sink ready");
        Ok(Self { socket, target })
    }

    pub fn target(&self) -> SocketAddr {
        self.target
    }
}

impl EventSink for OscUdpSink {
    fn send(&mut self, address: &str, args: &[i32]) -> Result<(), SinkError> {
        let packet = encode_message(address, args)?;
        self.socket.send_to(&packet, self.target)?;
        Ok(())
    }
}
