//! Block Interleaver
//!
//! Writes a block row by row into a `rows × cols` matrix and reads it out
//! column by column. A burst of consecutive errors on the channel lands on
//! positions spread `cols` apart once deinterleaved, turning one burst the
//! Viterbi decoder cannot fix into scattered errors it can.
//!
//! ```text
//! rows = 3, cols = 4
//!
//!  write (row-major)
//!   0  1  2  3
//!   4  5  6  7     read down each column => 0 4 8 1 5 9 2 6 10 3 7 11
//!   8  9 10 11
//!
//!  perm[row*cols + col] = col*rows + row
//! ```
//!
//! The permutation and its inverse are computed once at construction and
//! shared by every `apply`/`deapply` call. The interleaver is generic over
//! the element type, so hard bits and soft LLRs go through the same tables.
//!
//! ## Example
//!
//! ```rust
//! use r4w_fec::fec::BlockInterleaver;
//!
//! let interleaver = BlockInterleaver::new(2, 3).unwrap();
//! let data = vec![0, 1, 2, 3, 4, 5];
//! let shuffled = interleaver.apply(&data).unwrap();
//! assert_eq!(shuffled, vec![0, 3, 1, 4, 2, 5]);
//! assert_eq!(interleaver.deapply(&shuffled).unwrap(), data);
//! ```

use crate::types::{try_alloc, FecError, FecResult};

/// Row/column block interleaver with cached permutation tables.
#[derive(Debug, Clone)]
pub struct BlockInterleaver {
    rows: usize,
    cols: usize,
    /// perm[write_index] = read_index
    perm: Vec<usize>,
    /// inv[read_index] = write_index
    inv: Vec<usize>,
}

impl BlockInterleaver {
    /// Build the permutation tables for a `rows × cols` block.
    ///
    /// Fails with [`FecError::AllocationFailure`] if the tables cannot be
    /// allocated (including a block size that overflows `usize`).
    pub fn new(rows: usize, cols: usize) -> FecResult<Self> {
        let size = rows
            .checked_mul(cols)
            .ok_or(FecError::AllocationFailure { elements: usize::MAX })?;

        let mut perm: Vec<usize> = try_alloc(size)?;
        let mut inv: Vec<usize> = try_alloc(size)?;

        for row in 0..rows {
            for col in 0..cols {
                let write_idx = row * cols + col;
                let read_idx = col * rows + row;
                perm[write_idx] = read_idx;
                inv[read_idx] = write_idx;
            }
        }

        tracing::debug!(rows, cols, "block interleaver built");
        Ok(Self {
            rows,
            cols,
            perm,
            inv,
        })
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Number of elements in one block (`rows * cols`).
    pub fn block_size(&self) -> usize {
        self.perm.len()
    }

    /// Forward table: `permutation()[write_index] = read_index`.
    pub fn permutation(&self) -> &[usize] {
        &self.perm
    }

    /// Inverse table: `inverse()[read_index] = write_index`.
    pub fn inverse(&self) -> &[usize] {
        &self.inv
    }

    /// Interleave one block: `output[perm[i]] = input[i]`.
    ///
    /// Elements past the first block are passed through unchanged. Input
    /// shorter than one block is rejected.
    pub fn apply<T: Copy>(&self, input: &[T]) -> FecResult<Vec<T>> {
        permute(&self.perm, input)
    }

    /// De-interleave one block: `output[inv[i]] = input[i]`.
    pub fn deapply<T: Copy>(&self, input: &[T]) -> FecResult<Vec<T>> {
        permute(&self.inv, input)
    }

    /// Interleave a stream of whole blocks, each independently.
    pub fn apply_blocks<T: Copy>(&self, input: &[T]) -> FecResult<Vec<T>> {
        self.each_block(&self.perm, input)
    }

    /// De-interleave a stream of whole blocks.
    pub fn deapply_blocks<T: Copy>(&self, input: &[T]) -> FecResult<Vec<T>> {
        self.each_block(&self.inv, input)
    }

    fn each_block<T: Copy>(&self, table: &[usize], input: &[T]) -> FecResult<Vec<T>> {
        let size = self.block_size();
        if size == 0 {
            if input.is_empty() {
                return Ok(Vec::new());
            }
            return Err(FecError::LengthMismatch {
                expected: 0,
                actual: input.len(),
            });
        }
        if input.len() % size != 0 {
            return Err(FecError::LengthMismatch {
                expected: input.len().div_ceil(size) * size,
                actual: input.len(),
            });
        }

        let mut output = input.to_vec();
        for (src, dst) in input.chunks_exact(size).zip(output.chunks_exact_mut(size)) {
            for (i, &value) in src.iter().enumerate() {
                dst[table[i]] = value;
            }
        }
        Ok(output)
    }
}

fn permute<T: Copy>(table: &[usize], input: &[T]) -> FecResult<Vec<T>> {
    if input.len() < table.len() {
        return Err(FecError::BufferTooShort {
            expected: table.len(),
            actual: input.len(),
        });
    }
    let mut output = input.to_vec();
    for (i, &value) in input.iter().take(table.len()).enumerate() {
        output[table[i]] = value;
    }
    Ok(output)
}
