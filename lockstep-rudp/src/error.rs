//! Error types for the lockstep transport.

use crate::socket::Role;
use std::net::SocketAddr;
use thiserror::Error;

/// Result type for transport operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Transport errors.
///
/// Receive timeouts never surface here — they drive the retransmission
/// loop internally. Everything below is terminal for the operation that
/// returned it.
#[derive(Debug, Error)]
pub enum Error {
    /// Socket creation, bind, or non-timeout network I/O failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Operation requires an established connection.
    #[error("not connected")]
    NotConnected,

    /// Operation requires an idle handle.
    #[error("already connected")]
    AlreadyConnected,

    /// Operation is not valid for this endpoint's role.
    #[error("operation not valid for {role:?} role")]
    WrongRole {
        /// The handle's actual role
        role: Role,
    },

    /// Peer address did not resolve to a usable address.
    #[error("invalid peer address")]
    InvalidAddress,

    /// Payload or buffer is empty or larger than the payload region.
    #[error("invalid payload length {len} (1..={max})")]
    InvalidPayload { len: usize, max: usize },

    /// Datagram too short to contain a packet header.
    #[error("short packet: {len} bytes")]
    ShortPacket { len: usize },

    /// Packet arrived from an address other than the connected peer.
    #[error("packet from unexpected source {actual} (peer is {expected})")]
    UnexpectedSource {
        expected: SocketAddr,
        actual: SocketAddr,
    },

    /// Flag is undefined, or defined but invalid for the current phase.
    #[error("unexpected packet flag {flags:#04x}")]
    UnexpectedFlag { flags: u8 },

    /// DATA packet failed integrity verification. There is no
    /// negative-acknowledgment path; the logical session is lost.
    #[error("checksum mismatch: header {expected:#06x}, computed {computed:#06x}")]
    ChecksumMismatch { expected: u16, computed: u16 },

    /// A bounded retry policy ran out of attempts or time.
    #[error("retries exhausted after {attempts} attempts")]
    RetriesExhausted { attempts: u32 },
}
