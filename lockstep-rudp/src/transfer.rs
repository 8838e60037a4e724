//! Stop-and-wait data transfer and teardown.
//!
//! One message is in flight at a time: `send` transmits a packet and
//! blocks until the peer's ACK arrives, retransmitting the identical
//! packet on every receive timeout. `recv` delivers one packet and
//! acknowledges it. `disconnect` drives a FIN through the same send loop.

use crate::error::{Error, Result};
use crate::socket::{ConnectionState, RudpSocket};
use lockstep_shared::{
    checksum, PacketFlag, PacketHeader, END_OF_STREAM, HEADER_SIZE, MAX_PAYLOAD_SIZE,
};
use std::net::SocketAddr;
use tracing::{debug, info, warn};

/// Outcome of a successful [`RudpSocket::recv`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecvOutcome {
    /// DATA packet delivered; the declared payload length.
    Data(usize),
    /// The peer retransmitted its SYN after the connection was already
    /// established. It was re-acknowledged; no data was delivered and the
    /// caller's buffer is untouched. Callers timing the current logical
    /// message should restart their clock.
    SynRepeat,
    /// DATA packet carrying the end-of-stream sentinel in its first
    /// payload byte.
    EndOfStream,
    /// FIN received and acknowledged; the connection is now closed.
    PeerClosed,
}

impl RudpSocket {
    /// Send one payload reliably.
    ///
    /// Blocks until the peer acknowledges, retransmitting on timeout per
    /// the retry policy. Returns the payload length.
    pub fn send(&mut self, payload: &[u8]) -> Result<usize> {
        let peer = self.connected_peer()?;
        if payload.is_empty() || payload.len() > MAX_PAYLOAD_SIZE {
            return Err(Error::InvalidPayload {
                len: payload.len(),
                max: MAX_PAYLOAD_SIZE,
            });
        }

        let header = PacketHeader::data(payload);
        self.send_reliable(&header, payload, peer)?;
        debug!(len = payload.len(), "payload acknowledged");
        Ok(payload.len())
    }

    /// Send the end-of-stream sentinel reliably.
    ///
    /// The sentinel is a DATA packet with zero declared length whose first
    /// payload byte is [`END_OF_STREAM`]; the receiving side reports it as
    /// [`RecvOutcome::EndOfStream`].
    pub fn send_end_of_stream(&mut self) -> Result<()> {
        let peer = self.connected_peer()?;
        self.send_reliable(&PacketHeader::end_of_stream(), &[END_OF_STREAM], peer)?;
        debug!("end of stream acknowledged");
        Ok(())
    }

    /// Tear down the logical connection.
    ///
    /// Drives a zero-length FIN through the reliable-send loop; the ACK
    /// clears the peer slot. Any failure surfaces without mutating the
    /// connection state, so the caller may retry. A second `disconnect`
    /// fails with `NotConnected`.
    pub fn disconnect(&mut self) -> Result<()> {
        let peer = self.connected_peer()?;
        self.send_reliable(&PacketHeader::fin(), &[], peer)?;
        self.state = ConnectionState::Idle;
        info!(%peer, "disconnected");
        Ok(())
    }

    /// Receive one packet from the connected peer.
    ///
    /// Blocks until a datagram arrives (server handles have no receive
    /// timeout and can wait indefinitely; on a client handle the configured
    /// timeout surfaces as `Error::Io`). For DATA packets, exactly
    /// `buf.len()` bytes of the payload region are copied — the
    /// caller-requested capacity, not the declared length — so size `buf`
    /// to the transfer you expect. A packet from any address other than
    /// the peer, an undefined flag, or a checksum mismatch is terminal;
    /// none of these mutate connection state.
    pub fn recv(&mut self, buf: &mut [u8]) -> Result<RecvOutcome> {
        let peer = self.connected_peer()?;
        if buf.is_empty() || buf.len() > MAX_PAYLOAD_SIZE {
            return Err(Error::InvalidPayload {
                len: buf.len(),
                max: MAX_PAYLOAD_SIZE,
            });
        }

        let (len, src) = self.recv_datagram()?;
        if src != peer {
            warn!(%src, expected = %peer, "packet from unexpected source");
            return Err(Error::UnexpectedSource {
                expected: peer,
                actual: src,
            });
        }

        let header = self.parse_header(len)?;
        match header.flag() {
            Some(PacketFlag::Syn) => {
                debug!("SYN retransmission while connected, re-acknowledging");
                self.send_header_to(&PacketHeader::ack(), peer)?;
                Ok(RecvOutcome::SynRepeat)
            }
            Some(PacketFlag::Data) => {
                let region = &self.recv_buf[HEADER_SIZE..len];
                let declared = header.length as usize;
                if declared > region.len() {
                    return Err(Error::ShortPacket { len });
                }
                let computed = checksum::checksum(&region[..declared]);
                if computed != header.checksum {
                    warn!(
                        expected = header.checksum,
                        computed, "checksum mismatch on DATA packet"
                    );
                    return Err(Error::ChecksumMismatch {
                        expected: header.checksum,
                        computed,
                    });
                }

                self.send_header_to(&PacketHeader::ack(), peer)?;

                let copy = buf.len().min(region.len());
                buf[..copy].copy_from_slice(&region[..copy]);

                if region.first() == Some(&END_OF_STREAM) {
                    debug!("end of stream received");
                    return Ok(RecvOutcome::EndOfStream);
                }
                Ok(RecvOutcome::Data(declared))
            }
            Some(PacketFlag::Fin) => {
                self.send_header_to(&PacketHeader::ack(), peer)?;
                self.state = ConnectionState::Idle;
                info!(%peer, "peer closed connection");
                Ok(RecvOutcome::PeerClosed)
            }
            Some(PacketFlag::Ack) | None => {
                warn!(flags = header.flags, "unexpected flag in recv");
                Err(Error::UnexpectedFlag {
                    flags: header.flags,
                })
            }
        }
    }

    /// Shared reliable-send loop: transmit, await a header-only ACK from
    /// the peer, retransmit the identical packet on timeout.
    fn send_reliable(
        &mut self,
        header: &PacketHeader,
        payload: &[u8],
        peer: SocketAddr,
    ) -> Result<()> {
        let mut retry = self.config.retry.start();
        loop {
            if !retry.attempt() {
                return Err(Error::RetriesExhausted {
                    attempts: retry.attempts(),
                });
            }
            self.send_packet_to(header, payload, peer)?;

            let (len, src) = match self.recv_datagram() {
                Ok(reply) => reply,
                Err(err) if Self::is_timeout(&err) => {
                    debug!(attempt = retry.attempts(), "ack timed out, retransmitting");
                    continue;
                }
                Err(err) => return Err(err.into()),
            };

            if src != peer {
                warn!(%src, expected = %peer, "reply from unexpected source");
                return Err(Error::UnexpectedSource {
                    expected: peer,
                    actual: src,
                });
            }

            let reply = self.parse_header(len)?;
            return match reply.flag() {
                Some(PacketFlag::Ack) => Ok(()),
                _ => {
                    warn!(flags = reply.flags, "non-ACK reply to reliable send");
                    Err(Error::UnexpectedFlag { flags: reply.flags })
                }
            };
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::socket::Role;

    #[test]
    fn test_send_requires_connection() {
        let mut client = RudpSocket::open(Role::Client, 0).unwrap();
        assert!(matches!(
            client.send(b"abc").unwrap_err(),
            Error::NotConnected
        ));
    }

    #[test]
    fn test_recv_requires_connection() {
        let mut client = RudpSocket::open(Role::Client, 0).unwrap();
        let mut buf = [0u8; 16];
        assert!(matches!(
            client.recv(&mut buf).unwrap_err(),
            Error::NotConnected
        ));
    }

    #[test]
    fn test_disconnect_requires_connection() {
        let mut client = RudpSocket::open(Role::Client, 0).unwrap();
        assert!(matches!(
            client.disconnect().unwrap_err(),
            Error::NotConnected
        ));
    }

    #[test]
    fn test_send_rejects_oversized_payload() {
        let mut client = RudpSocket::open(Role::Client, 0).unwrap();
        // Force a connected state to reach argument validation.
        client.state = ConnectionState::Connected("127.0.0.1:9".parse().unwrap());
        let oversized = vec![0u8; MAX_PAYLOAD_SIZE + 1];
        assert!(matches!(
            client.send(&oversized).unwrap_err(),
            Error::InvalidPayload { .. }
        ));
        assert!(matches!(
            client.send(b"").unwrap_err(),
            Error::InvalidPayload { .. }
        ));
    }
}
