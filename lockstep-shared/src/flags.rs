//! Packet flag discriminator.

/// Packet flags for the transport.
///
/// Exactly one flag tags each packet; they are never combined:
/// - `Syn`: connection request
/// - `Ack`: acknowledgement (header-only reply)
/// - `Fin`: teardown request
/// - `Data`: application payload
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PacketFlag {
    /// Connection request
    Syn = 0x01,
    /// Acknowledgement
    Ack = 0x02,
    /// Teardown request
    Fin = 0x04,
    /// Application data payload
    Data = 0x08,
}

impl PacketFlag {
    /// Convert from the raw wire byte.
    ///
    /// Returns `None` for any value outside the four defined flags;
    /// undefined flag bytes are a protocol error and must never be
    /// interpreted as data.
    #[inline]
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0x01 => Some(Self::Syn),
            0x02 => Some(Self::Ack),
            0x04 => Some(Self::Fin),
            0x08 => Some(Self::Data),
            _ => None,
        }
    }
}

impl TryFrom<u8> for PacketFlag {
    type Error = ();

    #[inline]
    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::from_u8(value).ok_or(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flag_values() {
        assert_eq!(PacketFlag::Syn as u8, 0x01);
        assert_eq!(PacketFlag::Ack as u8, 0x02);
        assert_eq!(PacketFlag::Fin as u8, 0x04);
        assert_eq!(PacketFlag::Data as u8, 0x08);
    }

    #[test]
    fn test_from_u8() {
        assert_eq!(PacketFlag::from_u8(0x01), Some(PacketFlag::Syn));
        assert_eq!(PacketFlag::from_u8(0x08), Some(PacketFlag::Data));
        assert_eq!(PacketFlag::from_u8(0x00), None);
        // Combinations are not part of the protocol
        assert_eq!(PacketFlag::from_u8(0x03), None);
        assert_eq!(PacketFlag::from_u8(0x10), None);
        assert_eq!(PacketFlag::from_u8(0xFF), None);
    }

    #[test]
    fn test_try_from() {
        assert_eq!(PacketFlag::try_from(0x04u8), Ok(PacketFlag::Fin));
        assert_eq!(PacketFlag::try_from(0x07u8), Err(()));
    }
}
