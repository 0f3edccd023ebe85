//! Forward Error Correction (FEC) Blocks
//!
//! Convolutional coding with Viterbi decoding, plus a block interleaver to
//! break up burst errors.
//!
//! ## Available Blocks
//!
//! - [`ConvolutionalEncoder`] + [`ViterbiDecoder`] - rate 1/n convolutional
//!   codes, hard or soft decision
//! - [`BlockInterleaver`] - row/column interleaving over bits or LLRs
//! - [`FecChain`] - all of the above in link order
//!
//! ## Usage
//!
//! ```rust
//! use r4w_fec::fec::{ConvCodeConfig, ConvolutionalEncoder, ViterbiDecoder};
//!
//! // NASA standard rate 1/2, K=7 code
//! let config = ConvCodeConfig::nasa_k7_rate_half();
//! let encoder = ConvolutionalEncoder::new(&config).unwrap();
//! let decoder = ViterbiDecoder::new(&config).unwrap();
//!
//! let data = vec![true, false, true, true, false, false, true, false];
//! let mut encoded = encoder.encode_terminated(&data);
//! encoded[5] = !encoded[5];
//!
//! let decoded = decoder.decode_hard_terminated(&encoded, data.len()).unwrap();
//! assert_eq!(decoded, data);
//! ```

pub mod ber;
pub mod chain;
pub mod convolutional;
pub mod interleaver;
pub mod trellis;
pub mod viterbi;

pub use chain::FecChain;
pub use convolutional::{ConvolutionalEncoder, Termination};
pub use interleaver::BlockInterleaver;
pub use trellis::{ConvCodeConfig, Transition, Trellis};
pub use viterbi::{BranchMetric, DecodeOutcome, HardDecision, SoftDecision, ViterbiDecoder};
