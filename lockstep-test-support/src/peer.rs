//! Scripted loopback peers for driving one side of an exchange.

use lockstep_shared::{PacketHeader, HEADER_SIZE};
use std::io;
use std::net::{SocketAddr, UdpSocket};
use std::thread::JoinHandle;
use std::time::Duration;

/// A bound loopback socket that never replies. Connect attempts against
/// it time out on every receive.
pub struct SilentPeer {
    _socket: UdpSocket,
    addr: SocketAddr,
}

impl SilentPeer {
    pub fn bind() -> io::Result<Self> {
        let socket = UdpSocket::bind("127.0.0.1:0")?;
        let addr = socket.local_addr()?;
        Ok(Self {
            _socket: socket,
            addr,
        })
    }

    /// The address nothing will ever answer from.
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }
}

/// Replies a fixed raw datagram to each incoming packet.
pub struct ScriptedPeer;

impl ScriptedPeer {
    /// Bind on loopback and answer the first `count` datagrams with
    /// `response`, then exit. Returns the peer address and join handle.
    pub fn reply_with(
        response: Vec<u8>,
        count: usize,
    ) -> io::Result<(SocketAddr, JoinHandle<()>)> {
        let socket = UdpSocket::bind("127.0.0.1:0")?;
        let addr = socket.local_addr()?;
        let handle = std::thread::spawn(move || {
            let mut buf = vec![0u8; 65_536];
            for _ in 0..count {
                if let Ok((_, src)) = socket.recv_from(&mut buf) {
                    let _ = socket.send_to(&response, src);
                }
            }
        });
        Ok((addr, handle))
    }

    /// A peer that ACKs the first `count` datagrams it receives.
    pub fn acker(count: usize) -> io::Result<(SocketAddr, JoinHandle<()>)> {
        Self::reply_with(PacketHeader::ack().to_bytes().to_vec(), count)
    }
}

/// A bare UDP endpoint speaking the wire format directly, for tests that
/// need to inject hand-crafted or malformed packets.
pub struct RawEndpoint {
    socket: UdpSocket,
    buf: Vec<u8>,
}

impl RawEndpoint {
    /// Bind on loopback with a one-second receive timeout so a broken
    /// exchange fails the test instead of hanging it.
    pub fn bind() -> io::Result<Self> {
        let socket = UdpSocket::bind("127.0.0.1:0")?;
        socket.set_read_timeout(Some(Duration::from_secs(1)))?;
        Ok(Self {
            socket,
            buf: vec![0u8; 65_536],
        })
    }

    pub fn addr(&self) -> io::Result<SocketAddr> {
        self.socket.local_addr()
    }

    /// Send a header followed by `payload`, with no padding to the
    /// protocol's full packet size.
    pub fn send_packet(
        &self,
        header: &PacketHeader,
        payload: &[u8],
        dest: SocketAddr,
    ) -> io::Result<()> {
        let mut wire = Vec::with_capacity(HEADER_SIZE + payload.len());
        wire.extend_from_slice(&header.to_bytes());
        wire.extend_from_slice(payload);
        self.socket.send_to(&wire, dest)?;
        Ok(())
    }

    /// Send arbitrary bytes.
    pub fn send_raw(&self, bytes: &[u8], dest: SocketAddr) -> io::Result<()> {
        self.socket.send_to(bytes, dest)?;
        Ok(())
    }

    /// Receive one datagram and parse its header.
    pub fn recv_header(&mut self) -> io::Result<(PacketHeader, SocketAddr)> {
        let (len, src) = self.socket.recv_from(&mut self.buf)?;
        let header = PacketHeader::from_bytes(&self.buf[..len])
            .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidData, "short packet"))?;
        Ok((header, src))
    }
}
