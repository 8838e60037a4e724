//! Connection establishment: two-message SYN → ACK handshake.

use crate::error::{Error, Result};
use crate::socket::{ConnectionState, Role, RudpSocket};
use lockstep_shared::{PacketFlag, PacketHeader};
use std::net::ToSocketAddrs;
use tracing::{debug, info, warn};

impl RudpSocket {
    /// Connect to a listening server (client half of the handshake).
    ///
    /// Sends a SYN and waits for the ACK, retransmitting the SYN on every
    /// receive timeout until the retry policy gives up. A reply from any
    /// address other than `peer`, or with any flag other than ACK, is a
    /// protocol error — there is no retry after a bad reply.
    pub fn connect<A: ToSocketAddrs>(&mut self, peer: A) -> Result<()> {
        if self.is_connected() {
            return Err(Error::AlreadyConnected);
        }
        if self.role != Role::Client {
            return Err(Error::WrongRole { role: self.role });
        }
        let peer = peer
            .to_socket_addrs()
            .map_err(|_| Error::InvalidAddress)?
            .next()
            .ok_or(Error::InvalidAddress)?;

        let syn = PacketHeader::syn();
        let mut retry = self.config.retry.start();
        loop {
            if !retry.attempt() {
                return Err(Error::RetriesExhausted {
                    attempts: retry.attempts(),
                });
            }
            self.send_packet_to(&syn, &[], peer)?;

            let (len, src) = match self.recv_datagram() {
                Ok(reply) => reply,
                Err(err) if Self::is_timeout(&err) => {
                    debug!(attempt = retry.attempts(), "connect timed out, resending SYN");
                    continue;
                }
                Err(err) => return Err(err.into()),
            };

            if src != peer {
                warn!(%src, expected = %peer, "handshake reply from unexpected source");
                return Err(Error::UnexpectedSource {
                    expected: peer,
                    actual: src,
                });
            }

            let reply = self.parse_header(len)?;
            return match reply.flag() {
                Some(PacketFlag::Ack) => {
                    self.state = ConnectionState::Connected(peer);
                    info!(%peer, "connected");
                    Ok(())
                }
                _ => {
                    warn!(flags = reply.flags, "non-ACK handshake reply");
                    Err(Error::UnexpectedFlag { flags: reply.flags })
                }
            };
        }
    }

    /// Accept one incoming connection (server half of the handshake).
    ///
    /// Blocks without a timeout until a packet arrives; the sender becomes
    /// the candidate peer. A SYN is answered with a header-only ACK and
    /// establishes the connection. Anything else fails this call and
    /// leaves the handle idle, so the caller can accept again.
    pub fn accept(&mut self) -> Result<()> {
        if self.is_connected() {
            return Err(Error::AlreadyConnected);
        }
        if self.role != Role::Server {
            return Err(Error::WrongRole { role: self.role });
        }

        let (len, candidate) = self.recv_datagram()?;
        let packet = self.parse_header(len)?;
        match packet.flag() {
            Some(PacketFlag::Syn) => {
                debug!(peer = %candidate, "connection request, sending ACK");
                self.send_header_to(&PacketHeader::ack(), candidate)?;
                self.state = ConnectionState::Connected(candidate);
                info!(peer = %candidate, "accepted connection");
                Ok(())
            }
            _ => {
                warn!(flags = packet.flags, "non-SYN packet while accepting");
                Err(Error::UnexpectedFlag {
                    flags: packet.flags,
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_connect_wrong_role() {
        let mut server = RudpSocket::open(Role::Server, 0).unwrap();
        let err = server.connect("127.0.0.1:9").unwrap_err();
        assert!(matches!(err, Error::WrongRole { role: Role::Server }));
    }

    #[test]
    fn test_accept_wrong_role() {
        let mut client = RudpSocket::open(Role::Client, 0).unwrap();
        let err = client.accept().unwrap_err();
        assert!(matches!(err, Error::WrongRole { role: Role::Client }));
    }

    #[test]
    fn test_connect_invalid_address() {
        let mut client = RudpSocket::open(Role::Client, 0).unwrap();
        let err = client.connect("not an address").unwrap_err();
        assert!(matches!(err, Error::InvalidAddress));
    }
}
