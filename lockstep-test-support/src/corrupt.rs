//! Wire-level corruption for integrity tests.

use rand::Rng;

/// Flip a single bit at a known position. Deterministic; the inverse of
/// itself, so applying it twice restores the buffer.
pub fn flip_bit(buf: &mut [u8], byte: usize, bit: u8) {
    assert!(byte < buf.len(), "byte {} out of range", byte);
    assert!(bit < 8, "bit {} out of range", bit);
    buf[byte] ^= 1 << bit;
}

/// Randomized corruption of wire buffers.
///
/// # Example
///
/// ```
/// use lockstep_test_support::corrupt::Corruptor;
///
/// let mut corruptor = Corruptor::new();
/// let mut wire = vec![0u8; 64];
/// let (byte, bit) = corruptor.flip_random_bit(&mut wire);
/// assert_eq!(wire[byte], 1 << bit);
/// ```
pub struct Corruptor {
    rng: rand::rngs::ThreadRng,
}

impl Default for Corruptor {
    fn default() -> Self {
        Self::new()
    }
}

impl Corruptor {
    pub fn new() -> Self {
        Self {
            rng: rand::thread_rng(),
        }
    }

    /// Flip one random bit anywhere in `buf`, returning its position.
    pub fn flip_random_bit(&mut self, buf: &mut [u8]) -> (usize, u8) {
        assert!(!buf.is_empty(), "cannot corrupt an empty buffer");
        let byte = self.rng.gen_range(0..buf.len());
        let bit = self.rng.gen_range(0..8u8);
        flip_bit(buf, byte, bit);
        (byte, bit)
    }

    /// Truncate `buf` to a random length below its current one.
    pub fn truncate_random(&mut self, buf: &mut Vec<u8>) -> usize {
        assert!(!buf.is_empty(), "cannot truncate an empty buffer");
        let new_len = self.rng.gen_range(0..buf.len());
        buf.truncate(new_len);
        new_len
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flip_bit_deterministic() {
        let mut buf = vec![0u8; 8];
        flip_bit(&mut buf, 3, 5);
        assert_eq!(buf[3], 0b0010_0000);
        flip_bit(&mut buf, 3, 5);
        assert_eq!(buf[3], 0);
    }

    #[test]
    fn test_flip_random_bit_changes_buffer() {
        let mut corruptor = Corruptor::new();
        let mut buf = vec![0u8; 32];
        let (byte, bit) = corruptor.flip_random_bit(&mut buf);
        assert_eq!(buf[byte], 1 << bit);
        assert_eq!(buf.iter().filter(|&&b| b != 0).count(), 1);
    }

    #[test]
    fn test_truncate_random_shrinks() {
        let mut corruptor = Corruptor::new();
        let mut buf = vec![0xAAu8; 32];
        let new_len = corruptor.truncate_random(&mut buf);
        assert!(new_len < 32);
        assert_eq!(buf.len(), new_len);
    }
}
