//! Code Trellis
//!
//! The state-transition function shared by the encoder and the decoder.
//!
//! A rate 1/n convolutional code with constraint length K keeps the last
//! K-1 input bits as its state, newest bit in the low-order position. Each
//! input bit is shifted in to form the full K-bit register; every generator
//! polynomial selects register taps whose parity is one output bit.
//!
//! ```text
//!   state (K-1 bits)      input
//!  ┌───┬───┬───┬───┐      ┌───┐
//!  │b5 │b4 │...│b0 │ <<1  │ u │   register = (state << 1) | u
//!  └───┴───┴───┴───┘      └───┘
//!        │  taps (generator g_i)
//!        ▼
//!   out_i = parity(register & g_i)
//!   next  = register mod 2^(K-1)
//! ```
//!
//! ## Standard Codes
//!
//! - **NASA K=7, Rate 1/2**: Generators [0o133, 0o171] (CCSDS, 802.11a/g)
//! - **GSM K=5, Rate 1/2**: Generators [0o23, 0o33]
//! - **3GPP K=9, Rate 1/3**: Generators [0o557, 0o663, 0o711]

use crate::types::{FecError, FecResult, MAX_CONSTRAINT_LENGTH, MAX_GENERATORS};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Configuration for a convolutional code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConvCodeConfig {
    /// Constraint length K (memory + 1)
    pub constraint_length: usize,
    /// Generator polynomials, one per output bit. Written as octal strings
    /// in configuration files.
    #[serde(with = "octal")]
    pub generators: Vec<u32>,
}

impl Default for ConvCodeConfig {
    fn default() -> Self {
        Self::nasa_k7_rate_half()
    }
}

impl ConvCodeConfig {
    /// Create a configuration from a constraint length and generators.
    pub fn new(constraint_length: usize, generators: Vec<u32>) -> Self {
        Self {
            constraint_length,
            generators,
        }
    }

    /// NASA standard rate 1/2, K=7 convolutional code.
    ///
    /// Output 0 uses G0=133₈, output 1 uses G1=171₈.
    pub fn nasa_k7_rate_half() -> Self {
        Self::new(7, vec![0o133, 0o171])
    }

    /// GSM rate 1/2, K=5 convolutional code.
    pub fn gsm_k5_rate_half() -> Self {
        Self::new(5, vec![0o23, 0o33])
    }

    /// Rate 1/3, K=9 convolutional code (3GPP).
    pub fn k9_rate_third() -> Self {
        Self::new(9, vec![0o557, 0o663, 0o711])
    }

    /// Simple rate 1/2, K=3 code.
    pub fn simple_k3() -> Self {
        Self::new(3, vec![0o7, 0o5])
    }

    /// Code rate as a fraction (1/n where n = number of generators).
    pub fn rate(&self) -> f64 {
        1.0 / self.generators.len() as f64
    }

    /// Number of states in the trellis (2^(K-1)).
    pub fn num_states(&self) -> usize {
        1 << (self.constraint_length - 1)
    }

    /// Number of output bits per input bit.
    pub fn outputs_per_input(&self) -> usize {
        self.generators.len()
    }

    /// Check the constraint length and every generator.
    pub fn validate(&self) -> FecResult<()> {
        let k = self.constraint_length;
        if !(2..=MAX_CONSTRAINT_LENGTH).contains(&k) {
            return Err(FecError::InvalidConstraintLength(k));
        }
        if self.generators.is_empty() || self.generators.len() > MAX_GENERATORS {
            return Err(FecError::InvalidGeneratorCount(self.generators.len()));
        }
        let limit = 1u32 << k;
        for &generator in &self.generators {
            if generator == 0 || generator >= limit {
                return Err(FecError::InvalidGenerator {
                    generator,
                    constraint_length: k,
                });
            }
        }
        Ok(())
    }
}

impl fmt::Display for ConvCodeConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Conv(K={}, rate=1/{}, generators={:?})",
            self.constraint_length,
            self.generators.len(),
            self.generators
                .iter()
                .map(|g| format!("{:o}", g))
                .collect::<Vec<_>>()
        )
    }
}

/// One edge of the trellis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    /// State reached after shifting in the input bit.
    pub next_state: usize,
    /// Output bits packed LSB-first: bit i is the output of generator i.
    pub output: u32,
}

/// Precomputed trellis for a convolutional code.
///
/// Immutable once built; safe to share across threads.
#[derive(Debug, Clone)]
pub struct Trellis {
    config: ConvCodeConfig,
    num_states: usize,
    /// transitions[state][input]
    transitions: Vec<[Transition; 2]>,
}

impl Trellis {
    /// Build the trellis for a validated code configuration.
    pub fn new(config: &ConvCodeConfig) -> FecResult<Self> {
        config.validate()?;

        if config.generators.iter().all(|&g| g & 1 == 0) {
            tracing::warn!(
                code = %config,
                "No generator taps the input bit; both branches out of a state emit identical symbols"
            );
        }

        let num_states = config.num_states();
        let state_mask = num_states - 1;
        let transitions = (0..num_states)
            .map(|state| {
                [false, true].map(|input| {
                    let register = ((state as u32) << 1) | input as u32;
                    let output = config
                        .generators
                        .iter()
                        .enumerate()
                        .fold(0u32, |acc, (i, &gen)| {
                            acc | (((register & gen).count_ones() & 1) << i)
                        });
                    Transition {
                        next_state: register as usize & state_mask,
                        output,
                    }
                })
            })
            .collect();

        Ok(Self {
            config: config.clone(),
            num_states,
            transitions,
        })
    }

    /// Advance one step from `state` with `input`.
    #[inline]
    pub fn step(&self, state: usize, input: bool) -> Transition {
        self.transitions[state][input as usize]
    }

    /// The two states that lead into `state`, lower-numbered first.
    ///
    /// Both predecessors shift in the same input bit, `state & 1`.
    pub fn predecessors(&self, state: usize) -> [usize; 2] {
        let base = state >> 1;
        [base, base | (self.num_states >> 1)]
    }

    /// Unpack a transition output into individual bits, generator order.
    pub fn expected_bits(&self, output: u32) -> impl Iterator<Item = bool> {
        (0..self.outputs_per_input()).map(move |i| (output >> i) & 1 == 1)
    }

    pub fn config(&self) -> &ConvCodeConfig {
        &self.config
    }

    pub fn constraint_length(&self) -> usize {
        self.config.constraint_length
    }

    pub fn num_states(&self) -> usize {
        self.num_states
    }

    pub fn outputs_per_input(&self) -> usize {
        self.config.generators.len()
    }
}

/// Serialize generators as octal strings ("133"), the way codes are written
/// in the literature.
mod octal {
    use serde::de::Error;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(generators: &[u32], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(generators.iter().map(|g| format!("{:o}", g)))
    }

    /// Accepts quoted octal strings ("133", "0o133") or bare YAML integers,
    /// whose decimal digits are read as octal (133 -> 0o133).
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Digits(u64),
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u32>, D::Error> {
        Vec::<Raw>::deserialize(deserializer)?
            .into_iter()
            .map(|raw| {
                let text = match raw {
                    Raw::Text(s) => s,
                    Raw::Digits(n) => n.to_string(),
                };
                let digits = text.trim().trim_start_matches("0o");
                u32::from_str_radix(digits, 8)
                    .map_err(|e| D::Error::custom(format!("generator '{}': {}", text, e)))
            })
            .collect()
    }
}
