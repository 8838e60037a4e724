//! # lockstep-test-support
//!
//! Test harnesses for exercising the lockstep transport:
//!
//! - [`corrupt`]: bit flips and truncation for checksum-rejection tests
//! - [`peer`]: scripted loopback peers that drive one side of an exchange

pub mod corrupt;
pub mod peer;

pub use corrupt::{flip_bit, Corruptor};
pub use peer::{RawEndpoint, ScriptedPeer, SilentPeer};
