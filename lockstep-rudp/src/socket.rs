//! Endpoint handle: socket lifecycle and raw packet I/O.

use crate::error::{Error, Result};
use crate::retry::RetryPolicy;
use lockstep_shared::{PacketHeader, HEADER_SIZE, PACKET_SIZE};
use std::io;
use std::net::{SocketAddr, UdpSocket};
use std::time::Duration;
use tracing::info;

/// Endpoint role, fixed at creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    /// Binds a listen port and accepts one connection.
    Server,
    /// Binds an ephemeral port and initiates the connection.
    Client,
}

/// Connection state machine.
///
/// The peer address exists exactly while a connection is established;
/// there is no separate connected flag to fall out of sync with it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    /// No peer bound.
    Idle,
    /// Connected to a single peer.
    Connected(SocketAddr),
}

/// Configuration for an endpoint.
#[derive(Debug, Clone)]
pub struct RudpConfig {
    /// Receive timeout on the initiating side. This is the retransmission
    /// interval: each expiry retransmits the outstanding packet. Server
    /// handles block without a timeout.
    pub recv_timeout: Duration,
    /// Bounds for retransmission loops.
    pub retry: RetryPolicy,
}

impl Default for RudpConfig {
    fn default() -> Self {
        Self {
            recv_timeout: Duration::from_millis(1),
            retry: RetryPolicy::unbounded(),
        }
    }
}

/// Reliable-UDP endpoint handle.
///
/// Owns the datagram socket and the single peer slot. Every operation is
/// synchronous and takes `&mut self`; there is no internal locking and no
/// background work. One handle talks to exactly one peer at a time.
pub struct RudpSocket {
    pub(crate) socket: UdpSocket,
    pub(crate) role: Role,
    pub(crate) state: ConnectionState,
    pub(crate) config: RudpConfig,
    /// Outgoing wire buffer (header + fixed payload region)
    send_buf: Box<[u8]>,
    /// Incoming wire buffer
    pub(crate) recv_buf: Box<[u8]>,
}

impl RudpSocket {
    /// Open an endpoint with the default configuration.
    ///
    /// Servers bind `0.0.0.0:listen_port`; clients ignore `listen_port`,
    /// bind an ephemeral port, and get the short receive timeout that
    /// drives retransmission.
    pub fn open(role: Role, listen_port: u16) -> Result<Self> {
        Self::open_with_config(role, listen_port, RudpConfig::default())
    }

    /// Open an endpoint with a custom timeout and retry policy.
    pub fn open_with_config(role: Role, listen_port: u16, config: RudpConfig) -> Result<Self> {
        let socket = match role {
            Role::Server => UdpSocket::bind(("0.0.0.0", listen_port))?,
            Role::Client => {
                let socket = UdpSocket::bind(("0.0.0.0", 0))?;
                socket.set_read_timeout(Some(config.recv_timeout))?;
                socket
            }
        };
        info!(?role, local = %socket.local_addr()?, "endpoint open");

        Ok(Self {
            socket,
            role,
            state: ConnectionState::Idle,
            config,
            send_buf: vec![0u8; PACKET_SIZE].into_boxed_slice(),
            recv_buf: vec![0u8; PACKET_SIZE].into_boxed_slice(),
        })
    }

    /// The endpoint's role.
    pub fn role(&self) -> Role {
        self.role
    }

    /// Current connection state.
    pub fn state(&self) -> ConnectionState {
        self.state
    }

    /// Whether a peer is currently bound.
    pub fn is_connected(&self) -> bool {
        matches!(self.state, ConnectionState::Connected(_))
    }

    /// The connected peer's address, while connected.
    pub fn peer_addr(&self) -> Option<SocketAddr> {
        match self.state {
            ConnectionState::Connected(peer) => Some(peer),
            ConnectionState::Idle => None,
        }
    }

    /// Local address of the underlying socket.
    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.socket.local_addr()
    }

    /// Release the socket.
    ///
    /// Consumes the handle, so the descriptor is released exactly once and
    /// a second close is unrepresentable. Dropping the handle has the same
    /// effect.
    pub fn close(self) {
        info!(role = ?self.role, "endpoint closed");
    }

    /// The connected peer, or `NotConnected`.
    pub(crate) fn connected_peer(&self) -> Result<SocketAddr> {
        match self.state {
            ConnectionState::Connected(peer) => Ok(peer),
            ConnectionState::Idle => Err(Error::NotConnected),
        }
    }

    /// Send a full fixed-size packet: header, payload, zero padding.
    pub(crate) fn send_packet_to(
        &mut self,
        header: &PacketHeader,
        payload: &[u8],
        dest: SocketAddr,
    ) -> io::Result<()> {
        self.send_buf[..HEADER_SIZE].copy_from_slice(&header.to_bytes());
        let region = &mut self.send_buf[HEADER_SIZE..];
        region[..payload.len()].copy_from_slice(payload);
        region[payload.len()..].fill(0);
        self.socket.send_to(&self.send_buf, dest)?;
        Ok(())
    }

    /// Send a header-only datagram (ACK replies).
    pub(crate) fn send_header_to(&self, header: &PacketHeader, dest: SocketAddr) -> io::Result<()> {
        self.socket.send_to(&header.to_bytes(), dest)?;
        Ok(())
    }

    /// Block-receive one datagram into the wire buffer, returning its
    /// length and source. Expired receive timeouts surface as
    /// `WouldBlock`/`TimedOut` depending on platform.
    pub(crate) fn recv_datagram(&mut self) -> io::Result<(usize, SocketAddr)> {
        self.socket.recv_from(&mut self.recv_buf)
    }

    /// Parse the header of the last received datagram.
    pub(crate) fn parse_header(&self, len: usize) -> Result<PacketHeader> {
        PacketHeader::from_bytes(&self.recv_buf[..len]).ok_or(Error::ShortPacket { len })
    }

    /// Whether an I/O error is the receive timeout expiring.
    pub(crate) fn is_timeout(err: &io::Error) -> bool {
        matches!(
            err.kind(),
            io::ErrorKind::WouldBlock | io::ErrorKind::TimedOut
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_client_sets_receive_timeout() {
        let client = RudpSocket::open(Role::Client, 0).unwrap();
        assert_eq!(client.role(), Role::Client);
        assert_eq!(
            client.socket.read_timeout().unwrap(),
            Some(Duration::from_millis(1))
        );
    }

    #[test]
    fn test_open_server_blocks_without_timeout() {
        let server = RudpSocket::open(Role::Server, 0).unwrap();
        assert_eq!(server.role(), Role::Server);
        assert_eq!(server.socket.read_timeout().unwrap(), None);
        assert!(server.local_addr().unwrap().port() > 0);
    }

    #[test]
    fn test_initial_state_idle() {
        let client = RudpSocket::open(Role::Client, 0).unwrap();
        assert_eq!(client.state(), ConnectionState::Idle);
        assert!(!client.is_connected());
        assert!(client.peer_addr().is_none());
        assert!(client.connected_peer().is_err());
    }

    #[test]
    fn test_close_consumes_handle() {
        let client = RudpSocket::open(Role::Client, 0).unwrap();
        client.close();
        // `client` is moved; a second close would not compile.
    }

    #[test]
    fn test_custom_config_timeout() {
        let config = RudpConfig {
            recv_timeout: Duration::from_millis(50),
            retry: RetryPolicy::with_max_attempts(4),
        };
        let client = RudpSocket::open_with_config(Role::Client, 0, config).unwrap();
        assert_eq!(
            client.socket.read_timeout().unwrap(),
            Some(Duration::from_millis(50))
        );
    }
}
