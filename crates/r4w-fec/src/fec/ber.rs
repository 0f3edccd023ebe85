//! Bit Error Counting
//!
//! Counts raw bit errors between a reference and a decoded stream, and
//! converts between hard bits and LLRs for feeding the soft decoder.
//!
//! ```rust
//! use r4w_fec::fec::ber::{bit_errors, BerCounter};
//!
//! let tx = vec![true, false, true, true, false];
//! let rx = vec![true, true, true, false, false];
//! assert_eq!(bit_errors(&tx, &rx), 2);
//!
//! let mut counter = BerCounter::new();
//! counter.update(&tx, &rx);
//! assert_eq!(counter.error_bits(), 2);
//! ```

use crate::types::{BitStream, LlrStream};

/// Number of positions where `a` and `b` differ, over their common length.
pub fn bit_errors(a: &[bool], b: &[bool]) -> usize {
    a.iter().zip(b).filter(|(x, y)| x != y).count()
}

/// Hard bits to LLRs of the given magnitude (bit 0 -> `+magnitude`).
pub fn hard_to_llr(bits: &[bool], magnitude: f64) -> LlrStream {
    bits.iter()
        .map(|&b| if b { -magnitude } else { magnitude })
        .collect()
}

/// LLRs to hard bits. Negative means bit 1; zero is taken as bit 0.
pub fn llr_to_hard(llr: &[f64]) -> BitStream {
    llr.iter().map(|&l| l < 0.0).collect()
}

/// Running bit error rate across many blocks.
#[derive(Debug, Clone, Default)]
pub struct BerCounter {
    total_bits: u64,
    error_bits: u64,
}

impl BerCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Compare one block and accumulate. Only the common prefix counts.
    pub fn update(&mut self, reference: &[bool], received: &[bool]) {
        self.total_bits += reference.len().min(received.len()) as u64;
        self.error_bits += bit_errors(reference, received) as u64;
    }

    /// Current BER (0.0 before any bits are counted).
    pub fn ber(&self) -> f64 {
        if self.total_bits == 0 {
            0.0
        } else {
            self.error_bits as f64 / self.total_bits as f64
        }
    }

    pub fn total_bits(&self) -> u64 {
        self.total_bits
    }

    pub fn error_bits(&self) -> u64 {
        self.error_bits
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_bit_errors() {
        assert_eq!(bit_errors(&[], &[]), 0);
        assert_eq!(bit_errors(&[true, false], &[true, false]), 0);
        assert_eq!(bit_errors(&[true, false, true], &[false, false, false]), 2);
        // Length mismatch: only the overlap is compared.
        assert_eq!(bit_errors(&[true, true, true], &[false]), 1);
    }

    #[test]
    fn test_llr_conversions() {
        let bits = vec![false, true, true, false];
        let llr = hard_to_llr(&bits, 10.0);
        assert_eq!(llr, vec![10.0, -10.0, -10.0, 10.0]);
        assert_eq!(llr_to_hard(&llr), bits);
        assert_eq!(llr_to_hard(&[0.0, -0.1, 0.1]), vec![false, true, false]);
    }

    #[test]
    fn test_ber_counter() {
        let mut counter = BerCounter::new();
        assert_eq!(counter.ber(), 0.0);

        let tx = vec![true, false, true, true, false, true, false, false, true, true];
        let rx = vec![true, false, true, false, false, true, false, true, true, true];
        counter.update(&tx, &rx);
        assert_eq!(counter.error_bits(), 2);
        assert_eq!(counter.total_bits(), 10);
        assert_relative_eq!(counter.ber(), 0.2);

        counter.update(&tx, &tx);
        assert_relative_eq!(counter.ber(), 0.1);

        counter.reset();
        assert_eq!(counter.total_bits(), 0);
    }
}
