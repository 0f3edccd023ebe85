//! # R4W FEC
//!
//! Forward error correction for a digital link: a rate 1/n convolutional
//! encoder, a Viterbi maximum-likelihood decoder with hard- and
//! soft-decision metrics, and a block interleaver that spreads channel
//! bursts into errors the decoder can correct.
//!
//! ## Signal Flow
//!
//! ```text
//! TX: Data → Convolutional Encode → Interleave → channel
//! RX: channel → De-interleave → Viterbi Decode → Data
//! ```
//!
//! Bits are `bool`; soft values are `f64` LLRs, positive meaning bit 0 is
//! more likely. Modulation, channel models and framing live elsewhere and
//! hand this crate plain bit or LLR slices.
//!
//! ## Example
//!
//! ```rust
//! use r4w_fec::prelude::*;
//!
//! let chain = FecChain::new(&ConvCodeConfig::nasa_k7_rate_half(), Termination::ZeroTail)
//!     .unwrap()
//!     .with_interleaver(12, 16)
//!     .unwrap();
//!
//! let data: Vec<bool> = (0..90).map(|i| i % 3 == 0).collect();
//! let mut channel = chain.transmit(&data).unwrap();
//!
//! // A burst of eight consecutive channel errors.
//! for bit in &mut channel[50..58] {
//!     *bit = !*bit;
//! }
//!
//! let decoded = chain.receive_hard(&channel, data.len()).unwrap();
//! assert_eq!(bit_errors(&decoded, &data), 0);
//! ```

pub mod config;
pub mod fec;
pub mod observe;
pub mod types;

pub use config::{ConfigError, FecConfig};
pub use types::{FecError, FecResult};

/// Prelude for common imports
pub mod prelude {
    pub use crate::config::FecConfig;
    pub use crate::fec::ber::{bit_errors, hard_to_llr, llr_to_hard, BerCounter};
    pub use crate::fec::{
        BlockInterleaver, ConvCodeConfig, ConvolutionalEncoder, FecChain, Termination,
        ViterbiDecoder,
    };
    pub use crate::types::{FecError, FecResult};
}
