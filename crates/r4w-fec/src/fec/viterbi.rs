//! Viterbi Decoder
//!
//! Maximum-likelihood sequence estimation over the code trellis:
//!
//! 1. Branch metric computation ([`BranchMetric`]: Hamming distance for hard
//!    decisions, negated LLR agreement for soft decisions)
//! 2. Path metric update (add-compare-select) with survivor recording
//! 3. Traceback from the best final state
//!
//! Both metrics run through the same add-compare-select loop. Survivors are
//! kept in one contiguous buffer indexed by `step * num_states + state`,
//! sized to the input, so decode length is bounded only by memory (or by an
//! explicit [`ViterbiDecoder::with_max_steps`] cap, which is reported as
//! [`FecError::CapacityExceeded`] rather than truncating).
//!
//! Decoded output is delay-free: `decoded[t]` is the bit that entered the
//! encoder at step t.
//!
//! ## Tie-breaking
//!
//! Predecessors are scanned in ascending state order and only a strictly
//! smaller metric replaces a survivor, so equal-cost merges keep the
//! lower-numbered predecessor. The final state is the lowest-numbered state
//! holding the minimum metric.

use super::convolutional::Termination;
use super::trellis::{ConvCodeConfig, Trellis};
use crate::types::{try_alloc, BitStream, FecError, FecResult};

/// Cost of one trellis branch at one time step.
///
/// Implementations hold the received symbols for a whole block; the decoder
/// asks for the cost of hypothesizing `expected` (packed output bits, bit i =
/// generator i) at `step`.
pub trait BranchMetric {
    /// Number of trellis steps covered by the received block.
    fn num_steps(&self) -> usize;

    /// Cost added when the transition at `step` would have emitted
    /// `expected`. Lower is more likely.
    fn branch_cost(&self, step: usize, expected: u32) -> f64;
}

/// Hard-decision metric: Hamming distance between expected and received bits.
#[derive(Debug, Clone)]
pub struct HardDecision {
    /// Received bits packed per step, same layout as `Transition::output`.
    symbols: Vec<u32>,
}

impl HardDecision {
    /// Group received bits into steps of `outputs` bits.
    pub fn new(received: &[bool], outputs: usize) -> FecResult<Self> {
        check_ragged(received.len(), outputs)?;
        let symbols = received
            .chunks_exact(outputs)
            .map(|chunk| {
                chunk
                    .iter()
                    .enumerate()
                    .fold(0u32, |acc, (i, &bit)| acc | ((bit as u32) << i))
            })
            .collect();
        Ok(Self { symbols })
    }
}

impl BranchMetric for HardDecision {
    fn num_steps(&self) -> usize {
        self.symbols.len()
    }

    #[inline]
    fn branch_cost(&self, step: usize, expected: u32) -> f64 {
        (self.symbols[step] ^ expected).count_ones() as f64
    }
}

/// Soft-decision metric over log-likelihood ratios.
///
/// Positive LLR means bit 0 is more likely. Agreement with a hypothesized
/// bit is `llr` for 0 and `-llr` for 1; the branch cost is the negated sum
/// of agreements, so the decoder minimizes negative log-likelihood.
#[derive(Debug, Clone, Copy)]
pub struct SoftDecision<'a> {
    llr: &'a [f64],
    outputs: usize,
}

impl<'a> SoftDecision<'a> {
    /// Wrap `llr`, rejecting ragged lengths and non-finite values.
    pub fn new(llr: &'a [f64], outputs: usize) -> FecResult<Self> {
        check_ragged(llr.len(), outputs)?;
        if let Some((index, &value)) = llr.iter().enumerate().find(|(_, v)| !v.is_finite()) {
            return Err(FecError::InvalidLlr { index, value });
        }
        Ok(Self { llr, outputs })
    }
}

impl BranchMetric for SoftDecision<'_> {
    fn num_steps(&self) -> usize {
        self.llr.len() / self.outputs
    }

    #[inline]
    fn branch_cost(&self, step: usize, expected: u32) -> f64 {
        let chunk = &self.llr[step * self.outputs..(step + 1) * self.outputs];
        chunk
            .iter()
            .enumerate()
            .map(|(i, &l)| if (expected >> i) & 1 == 1 { l } else { -l })
            .sum()
    }
}

fn check_ragged(len: usize, outputs: usize) -> FecResult<()> {
    if outputs == 0 || len % outputs != 0 {
        return Err(FecError::RaggedInput { len, outputs });
    }
    Ok(())
}

/// Result of a decode, with the metric of the surviving path.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodeOutcome {
    /// Decoded bits in transmission order.
    pub bits: BitStream,
    /// Accumulated metric of the chosen path. Zero for a clean hard-decision
    /// block; grows with the number of corrected errors. With soft input
    /// the sum can overflow to `-inf` for LLR magnitudes near `f64::MAX`;
    /// the decoded bits are unaffected.
    pub path_metric: f64,
    /// State the traceback started from.
    pub end_state: usize,
}

/// Viterbi decoder for convolutional codes.
///
/// Holds only the immutable trellis; every decode allocates its own metric
/// and survivor storage, so one decoder can serve many threads.
#[derive(Debug, Clone)]
pub struct ViterbiDecoder {
    trellis: Trellis,
    max_steps: Option<usize>,
}

impl ViterbiDecoder {
    /// Create a new Viterbi decoder with no length cap.
    pub fn new(config: &ConvCodeConfig) -> FecResult<Self> {
        Ok(Self::from_trellis(Trellis::new(config)?))
    }

    pub fn from_trellis(trellis: Trellis) -> Self {
        Self {
            trellis,
            max_steps: None,
        }
    }

    /// Limit the number of trellis steps a single decode may span.
    pub fn with_max_steps(mut self, max_steps: Option<usize>) -> Self {
        self.max_steps = max_steps;
        self
    }

    pub fn max_steps(&self) -> Option<usize> {
        self.max_steps
    }

    pub fn trellis(&self) -> &Trellis {
        &self.trellis
    }

    /// Decode hard-decision bits. Returns `received.len() / n` bits.
    pub fn decode_hard(&self, received: &[bool]) -> FecResult<BitStream> {
        Ok(self.decode_hard_with_metric(received)?.bits)
    }

    /// Decode LLRs (positive = bit 0 more likely). Returns `llr.len() / n` bits.
    pub fn decode_soft(&self, llr: &[f64]) -> FecResult<BitStream> {
        Ok(self.decode_soft_with_metric(llr)?.bits)
    }

    /// Hard-decision decode that also reports the final path metric.
    pub fn decode_hard_with_metric(&self, received: &[bool]) -> FecResult<DecodeOutcome> {
        let metric = HardDecision::new(received, self.trellis.outputs_per_input())?;
        self.decode_with(&metric, Termination::Open)
    }

    /// Soft-decision decode that also reports the final path metric.
    pub fn decode_soft_with_metric(&self, llr: &[f64]) -> FecResult<DecodeOutcome> {
        let metric = SoftDecision::new(llr, self.trellis.outputs_per_input())?;
        self.decode_with(&metric, Termination::Open)
    }

    /// Decode a zero-tail terminated block of `data_len` data bits.
    ///
    /// The traceback starts from state 0 and the K-1 tail bits are dropped.
    pub fn decode_hard_terminated(&self, received: &[bool], data_len: usize) -> FecResult<BitStream> {
        self.check_terminated_len(received.len(), data_len)?;
        let metric = HardDecision::new(received, self.trellis.outputs_per_input())?;
        let mut outcome = self.decode_with(&metric, Termination::ZeroTail)?;
        outcome.bits.truncate(data_len);
        Ok(outcome.bits)
    }

    /// Soft-decision counterpart of [`Self::decode_hard_terminated`].
    pub fn decode_soft_terminated(&self, llr: &[f64], data_len: usize) -> FecResult<BitStream> {
        self.check_terminated_len(llr.len(), data_len)?;
        let metric = SoftDecision::new(llr, self.trellis.outputs_per_input())?;
        let mut outcome = self.decode_with(&metric, Termination::ZeroTail)?;
        outcome.bits.truncate(data_len);
        Ok(outcome.bits)
    }

    fn check_terminated_len(&self, len: usize, data_len: usize) -> FecResult<()> {
        let expected = data_len
            .saturating_add(self.trellis.constraint_length() - 1)
            .saturating_mul(self.trellis.outputs_per_input());
        if len != expected {
            return Err(FecError::LengthMismatch {
                expected,
                actual: len,
            });
        }
        Ok(())
    }

    /// Run the add-compare-select recursion and traceback for any metric.
    pub fn decode_with<M: BranchMetric>(
        &self,
        metric: &M,
        termination: Termination,
    ) -> FecResult<DecodeOutcome> {
        let num_steps = metric.num_steps();
        let num_states = self.trellis.num_states();

        if let Some(capacity) = self.max_steps {
            if num_steps > capacity {
                tracing::warn!(requested = num_steps, capacity, "decode exceeds capacity");
                return Err(FecError::CapacityExceeded {
                    requested: num_steps,
                    capacity,
                });
            }
        }

        let _span = tracing::debug_span!("viterbi", steps = num_steps, states = num_states).entered();

        let cells = num_steps
            .checked_mul(num_states)
            .ok_or(FecError::AllocationFailure { elements: usize::MAX })?;
        let mut survivors: Vec<u32> = try_alloc(cells)?;
        let mut path_metrics = vec![f64::INFINITY; num_states];
        let mut new_metrics = vec![f64::INFINITY; num_states];
        path_metrics[0] = 0.0;

        for (step, row) in survivors.chunks_exact_mut(num_states).enumerate() {
            new_metrics.fill(f64::INFINITY);

            for (state, &metric_so_far) in path_metrics.iter().enumerate() {
                if metric_so_far == f64::INFINITY {
                    continue;
                }
                for input in [false, true] {
                    let transition = self.trellis.step(state, input);
                    let candidate = metric_so_far + metric.branch_cost(step, transition.output);
                    if candidate < new_metrics[transition.next_state] {
                        new_metrics[transition.next_state] = candidate;
                        row[transition.next_state] = state as u32;
                    }
                }
            }

            std::mem::swap(&mut path_metrics, &mut new_metrics);
        }

        let end_state = match termination {
            Termination::ZeroTail => 0,
            Termination::Open => best_state(&path_metrics),
        };

        let mut bits = vec![false; num_steps];
        let mut state = end_state;
        for step in (0..num_steps).rev() {
            // The low bit of a state is the input that was shifted into it.
            bits[step] = state & 1 == 1;
            state = survivors[step * num_states + state] as usize;
        }

        let path_metric = path_metrics[end_state];
        tracing::debug!(end_state, path_metric, "viterbi traceback complete");

        Ok(DecodeOutcome {
            bits,
            path_metric,
            end_state,
        })
    }
}

/// Lowest-numbered state holding the minimum metric.
fn best_state(metrics: &[f64]) -> usize {
    let mut best = 0;
    for (state, &m) in metrics.iter().enumerate().skip(1) {
        if m < metrics[best] {
            best = state;
        }
    }
    best
}
