//! FEC Chain
//!
//! Encoder, optional block interleaver and Viterbi decoder wired in link
//! order:
//!
//! ```text
//! TX: data → ConvolutionalEncoder → pad to whole blocks → BlockInterleaver → channel
//! RX: channel → BlockInterleaver⁻¹ → drop padding → ViterbiDecoder → data
//! ```
//!
//! Padding bits are zeros and never reach the decoder.

use super::convolutional::{ConvolutionalEncoder, Termination};
use super::interleaver::BlockInterleaver;
use super::trellis::{ConvCodeConfig, Trellis};
use super::viterbi::ViterbiDecoder;
use crate::config::FecConfig;
use crate::types::{BitStream, FecError, FecResult};

/// A complete encode/interleave and deinterleave/decode pipeline.
#[derive(Debug, Clone)]
pub struct FecChain {
    encoder: ConvolutionalEncoder,
    decoder: ViterbiDecoder,
    interleaver: Option<BlockInterleaver>,
    termination: Termination,
}

impl FecChain {
    /// Chain without an interleaver.
    pub fn new(code: &ConvCodeConfig, termination: Termination) -> FecResult<Self> {
        let trellis = Trellis::new(code)?;
        Ok(Self {
            encoder: ConvolutionalEncoder::from_trellis(trellis.clone()),
            decoder: ViterbiDecoder::from_trellis(trellis),
            interleaver: None,
            termination,
        })
    }

    /// Build the chain described by a configuration file.
    pub fn from_config(config: &FecConfig) -> FecResult<Self> {
        let mut chain = Self::new(&config.code, config.termination)?
            .with_max_steps(config.decoder.max_steps);
        if let Some(il) = &config.interleaver {
            chain = chain.with_interleaver(il.rows, il.cols)?;
        }
        Ok(chain)
    }

    /// Insert a `rows × cols` block interleaver between encoder and channel.
    pub fn with_interleaver(mut self, rows: usize, cols: usize) -> FecResult<Self> {
        self.interleaver = Some(BlockInterleaver::new(rows, cols)?);
        Ok(self)
    }

    /// Cap the decoder's trellis length.
    pub fn with_max_steps(mut self, max_steps: Option<usize>) -> Self {
        self.decoder = self.decoder.with_max_steps(max_steps);
        self
    }

    pub fn encoder(&self) -> &ConvolutionalEncoder {
        &self.encoder
    }

    pub fn decoder(&self) -> &ViterbiDecoder {
        &self.decoder
    }

    pub fn interleaver(&self) -> Option<&BlockInterleaver> {
        self.interleaver.as_ref()
    }

    pub fn termination(&self) -> Termination {
        self.termination
    }

    /// Channel bits sent for `data_len` data bits, padding included.
    /// Saturates at `usize::MAX`.
    pub fn transmitted_len(&self, data_len: usize) -> usize {
        let coded = self.encoder.coded_len(data_len, self.termination);
        match &self.interleaver {
            Some(il) if il.block_size() > 0 => coded
                .div_ceil(il.block_size())
                .saturating_mul(il.block_size()),
            _ => coded,
        }
    }

    /// Encode and interleave a block of data bits.
    pub fn transmit(&self, data: &[bool]) -> FecResult<BitStream> {
        let mut coded = self.encoder.encode_with(data, self.termination);
        match &self.interleaver {
            Some(il) if il.block_size() > 0 => {
                coded.resize(self.transmitted_len(data.len()), false);
                il.apply_blocks(&coded)
            }
            _ => Ok(coded),
        }
    }

    /// Deinterleave and hard-decision decode `data_len` data bits.
    pub fn receive_hard(&self, received: &[bool], data_len: usize) -> FecResult<BitStream> {
        let coded = self.deinterleave(received, data_len)?;
        match self.termination {
            Termination::Open => self.decoder.decode_hard(&coded),
            Termination::ZeroTail => self.decoder.decode_hard_terminated(&coded, data_len),
        }
    }

    /// Deinterleave and soft-decision decode `data_len` data bits.
    pub fn receive_soft(&self, llr: &[f64], data_len: usize) -> FecResult<BitStream> {
        let coded = self.deinterleave(llr, data_len)?;
        match self.termination {
            Termination::Open => self.decoder.decode_soft(&coded),
            Termination::ZeroTail => self.decoder.decode_soft_terminated(&coded, data_len),
        }
    }

    fn deinterleave<T: Copy>(&self, received: &[T], data_len: usize) -> FecResult<Vec<T>> {
        let expected = self.transmitted_len(data_len);
        if received.len() != expected {
            return Err(FecError::LengthMismatch {
                expected,
                actual: received.len(),
            });
        }
        let mut coded = match &self.interleaver {
            Some(il) if il.block_size() > 0 => il.deapply_blocks(received)?,
            _ => received.to_vec(),
        };
        coded.truncate(self.encoder.coded_len(data_len, self.termination));
        Ok(coded)
    }
}
