//! # lockstep-rudp
//!
//! Stop-and-wait reliable UDP transport.
//!
//! ## Features
//!
//! - **Connection-oriented**: connect/accept, send/recv, disconnect over
//!   plain UDP datagrams
//! - **Reliable**: every SYN/DATA/FIN packet is acknowledged; an expired
//!   receive timeout retransmits the identical packet
//! - **Integrity-checked**: RFC 1071 internet checksum over every DATA
//!   payload, verified on receipt
//! - **Synchronous**: every operation blocks its caller; no background
//!   tasks, no I/O multiplexing
//!
//! ## Protocol
//!
//! - Two-message handshake: SYN → ACK
//! - One message in flight: each `send` blocks until its own ACK, so
//!   stop-and-wait stays correct without sequence numbers
//! - Fixed wire size: every SYN/DATA/FIN datagram is
//!   [`PACKET_SIZE`] bytes; ACKs are header-only
//! - Teardown: FIN → ACK clears the peer slot
//!
//! ## Limitations
//!
//! The protocol carries no sequence numbers: a duplicate or delayed ACK
//! from an earlier retransmission is indistinguishable from the awaited
//! one, and a retransmitted DATA packet is delivered again as a new
//! message. This is inherent to the design and holds only because a
//! single peer owns the socket and each send blocks for its own ACK.
//! A checksum mismatch is terminal — there is no negative-acknowledgment
//! path to request retransmission.
//!
//! ## Example
//!
//! ```rust,no_run
//! use lockstep_rudp::{Role, RudpSocket};
//!
//! fn main() -> lockstep_rudp::Result<()> {
//!     let mut client = RudpSocket::open(Role::Client, 0)?;
//!     client.connect("127.0.0.1:7400")?;
//!     client.send(b"hello")?;
//!     client.disconnect()?;
//!     client.close();
//!     Ok(())
//! }
//! ```

mod error;
mod handshake;
mod retry;
mod socket;
mod transfer;

pub use error::{Error, Result};
pub use retry::RetryPolicy;
pub use socket::{ConnectionState, Role, RudpConfig, RudpSocket};
pub use transfer::RecvOutcome;

pub use lockstep_shared::{END_OF_STREAM, HEADER_SIZE, MAX_PAYLOAD_SIZE, PACKET_SIZE};
