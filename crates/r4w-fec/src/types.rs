//! Core types shared by the FEC blocks
//!
//! Bits are carried as `bool` (`true` = 1) and soft values as `f64`
//! log-likelihood ratios where a positive value means bit 0 is more likely.

/// Largest supported constraint length. Trellis states are stored as `u32`
/// survivors and the register must fit a `u32` with room for the input bit.
pub const MAX_CONSTRAINT_LENGTH: usize = 16;

/// Largest number of generator polynomials (outputs per input bit).
pub const MAX_GENERATORS: usize = 32;

/// A hard-decision bit stream.
pub type BitStream = Vec<bool>;

/// A stream of log-likelihood ratios (positive = bit 0 more likely).
pub type LlrStream = Vec<f64>;

/// Result type for FEC operations
pub type FecResult<T> = Result<T, FecError>;

/// Errors that can occur while building or running the FEC blocks
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum FecError {
    #[error("Invalid constraint length: {0}. Must be between 2 and {max}", max = MAX_CONSTRAINT_LENGTH)]
    InvalidConstraintLength(usize),

    #[error("Invalid generator count: {0}. Must be between 1 and {max}", max = MAX_GENERATORS)]
    InvalidGeneratorCount(usize),

    #[error("Invalid generator {generator:o} (octal) for constraint length {constraint_length}")]
    InvalidGenerator {
        generator: u32,
        constraint_length: usize,
    },

    #[error("Failed to allocate storage for {elements} elements")]
    AllocationFailure { elements: usize },

    #[error("Decode of {requested} trellis steps exceeds capacity of {capacity}")]
    CapacityExceeded { requested: usize, capacity: usize },

    #[error("Received length {len} is not a multiple of {outputs} outputs per step")]
    RaggedInput { len: usize, outputs: usize },

    #[error("Length mismatch: expected {expected}, got {actual}")]
    LengthMismatch { expected: usize, actual: usize },

    #[error("Buffer too short: expected {expected}, got {actual}")]
    BufferTooShort { expected: usize, actual: usize },

    #[error("Non-finite LLR {value} at index {index}")]
    InvalidLlr { index: usize, value: f64 },
}

/// Reserve a zero-initialized buffer, reporting allocation failure instead of
/// aborting.
pub(crate) fn try_alloc<T: Clone + Default>(elements: usize) -> FecResult<Vec<T>> {
    let mut buf = Vec::new();
    buf.try_reserve_exact(elements)
        .map_err(|_| FecError::AllocationFailure { elements })?;
    buf.resize(elements, T::default());
    Ok(buf)
}
