//! Convolutional Encoder
//!
//! Walks the code trellis forward one input bit at a time, emitting one
//! output bit per generator polynomial. Every call starts from the all-zero
//! register, which is the state the Viterbi decoder assumes at time 0.

use super::trellis::{ConvCodeConfig, Trellis};
use crate::types::{BitStream, FecResult};
use serde::{Deserialize, Serialize};

/// How an encoded block ends.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Termination {
    /// The register is left wherever the last data bit put it.
    #[default]
    Open,
    /// K-1 zero flush bits drive the trellis back to state 0.
    ZeroTail,
}

/// Convolutional encoder.
///
/// The shift register lives only for the duration of one call, so a single
/// encoder can be shared between threads.
#[derive(Debug, Clone)]
pub struct ConvolutionalEncoder {
    trellis: Trellis,
}

impl ConvolutionalEncoder {
    /// Create a new encoder.
    pub fn new(config: &ConvCodeConfig) -> FecResult<Self> {
        Ok(Self::from_trellis(Trellis::new(config)?))
    }

    /// Create an encoder over an already built trellis.
    pub fn from_trellis(trellis: Trellis) -> Self {
        Self { trellis }
    }

    /// Encode a block of input bits without trellis termination.
    ///
    /// Produces exactly `n * input.len()` bits, n outputs per input bit in
    /// generator order.
    pub fn encode(&self, input: &[bool]) -> BitStream {
        let mut output = Vec::with_capacity(input.len() * self.trellis.outputs_per_input());
        let end_state = self.encode_into(0, input.iter().copied(), &mut output);
        tracing::trace!(bits = input.len(), end_state, "encoded block");
        output
    }

    /// Encode a block and append (K-1) flush bits so the trellis ends at
    /// the zero state.
    pub fn encode_terminated(&self, input: &[bool]) -> BitStream {
        let tail = self.trellis.constraint_length() - 1;
        let mut output =
            Vec::with_capacity((input.len() + tail) * self.trellis.outputs_per_input());
        let bits = input.iter().copied().chain(std::iter::repeat(false).take(tail));
        let end_state = self.encode_into(0, bits, &mut output);
        debug_assert_eq!(end_state, 0);
        output
    }

    /// Encode with the given termination mode.
    pub fn encode_with(&self, input: &[bool], termination: Termination) -> BitStream {
        match termination {
            Termination::Open => self.encode(input),
            Termination::ZeroTail => self.encode_terminated(input),
        }
    }

    /// Number of coded bits produced for `data_len` input bits.
    ///
    /// Saturates at `usize::MAX`, a length no received buffer can match.
    pub fn coded_len(&self, data_len: usize, termination: Termination) -> usize {
        let steps = match termination {
            Termination::Open => data_len,
            Termination::ZeroTail => {
                data_len.saturating_add(self.trellis.constraint_length() - 1)
            }
        };
        steps.saturating_mul(self.trellis.outputs_per_input())
    }

    fn encode_into(
        &self,
        mut state: usize,
        bits: impl Iterator<Item = bool>,
        output: &mut Vec<bool>,
    ) -> usize {
        for bit in bits {
            let transition = self.trellis.step(state, bit);
            output.extend(self.trellis.expected_bits(transition.output));
            state = transition.next_state;
        }
        state
    }

    /// Code rate as (1, n).
    pub fn rate(&self) -> (usize, usize) {
        (1, self.trellis.outputs_per_input())
    }

    pub fn trellis(&self) -> &Trellis {
        &self.trellis
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bits(v: &[u8]) -> Vec<bool> {
        v.iter().map(|&b| b == 1).collect()
    }

    #[test]
    fn test_k7_reference_vector() {
        let encoder = ConvolutionalEncoder::new(&ConvCodeConfig::nasa_k7_rate_half()).unwrap();
        let encoded = encoder.encode(&bits(&[1, 0, 1, 1]));
        assert_eq!(encoded.len(), 8);
        assert_eq!(encoded, bits(&[1, 1, 1, 0, 1, 1, 1, 0]));
    }

    #[test]
    fn test_impulse_response_is_generators() {
        // A single 1 followed by zeros walks the 1 through every register
        // tap, so output i over time spells generator i from LSB to MSB.
        let config = ConvCodeConfig::nasa_k7_rate_half();
        let encoder = ConvolutionalEncoder::new(&config).unwrap();
        let mut input = vec![false; 7];
        input[0] = true;
        let encoded = encoder.encode(&input);

        for (g, &gen) in config.generators.iter().enumerate() {
            let spelled = (0..7).fold(0u32, |acc, t| acc | ((encoded[2 * t + g] as u32) << t));
            assert_eq!(spelled, gen, "generator {:o}", gen);
        }
    }

    #[test]
    fn test_empty_input() {
        let encoder = ConvolutionalEncoder::new(&ConvCodeConfig::simple_k3()).unwrap();
        assert!(encoder.encode(&[]).is_empty());
        assert_eq!(encoder.encode_terminated(&[]).len(), 4);
    }

    #[test]
    fn test_each_call_starts_from_zero() {
        let encoder = ConvolutionalEncoder::new(&ConvCodeConfig::simple_k3()).unwrap();
        let data = bits(&[1, 0, 1]);
        assert_eq!(encoder.encode(&data), encoder.encode(&data));
    }

    #[test]
    fn test_all_zeros_encode_to_zeros() {
        let encoder = ConvolutionalEncoder::new(&ConvCodeConfig::k9_rate_third()).unwrap();
        let encoded = encoder.encode(&[false; 20]);
        assert_eq!(encoded.len(), 60);
        assert!(encoded.iter().all(|&b| !b));
    }

    #[test]
    fn test_terminated_length_and_prefix() {
        let encoder = ConvolutionalEncoder::new(&ConvCodeConfig::nasa_k7_rate_half()).unwrap();
        let data = bits(&[1, 1, 0, 1, 0, 0, 1]);
        let open = encoder.encode(&data);
        let terminated = encoder.encode_terminated(&data);

        assert_eq!(terminated.len(), (data.len() + 6) * 2);
        assert_eq!(&terminated[..open.len()], &open[..]);
        assert_eq!(encoder.coded_len(data.len(), Termination::ZeroTail), terminated.len());
        assert_eq!(encoder.coded_len(data.len(), Termination::Open), open.len());
        assert_eq!(encoder.encode_with(&data, Termination::ZeroTail), terminated);
    }

    #[test]
    fn test_coded_len_saturates() {
        let encoder = ConvolutionalEncoder::new(&ConvCodeConfig::nasa_k7_rate_half()).unwrap();
        assert_eq!(encoder.coded_len(usize::MAX, Termination::ZeroTail), usize::MAX);
        assert_eq!(encoder.coded_len(usize::MAX / 2 + 1, Termination::Open), usize::MAX);
        assert_eq!(encoder.coded_len(10, Termination::ZeroTail), 32);
    }

    #[test]
    fn test_rate() {
        let encoder = ConvolutionalEncoder::new(&ConvCodeConfig::k9_rate_third()).unwrap();
        assert_eq!(encoder.rate(), (1, 3));
    }
}
