//! Multiply-and-marginalize: the product of the tables summed over the leading
//! (fastest) variables of the joint domain.
//!
//! Implements:
//! - `multiply_and_marginalize_f64`: sequential kernel
//! - `multiply_and_marginalize_par_f64`: contiguous output chunks on rayon
//! - `multiply_and_marginalize_f64_with`: dispatch from a [`MultiplyConfig`]
//!
//! The eliminated variables come first in `dims`, so every output entry is the
//! sum of `elimination_size` consecutive joint entries. The sum runs in
//! ascending joint order on every path.

use crate::config::MultiplyConfig;
use crate::elementwise::multiply::product_at;
use crate::utility::checks::validate_marginal_operands;
use potentia_core::{Cursor, OffsetAccumulate, PotentialError, Result};
use rayon::prelude::*;

struct Marginal<'a> {
    total: usize,
    elimination_size: usize,
    scale: f64,
    dims: &'a [usize],
    tables: &'a [&'a [f64]],
    offsets: &'a OffsetAccumulate,
}

impl Marginal<'_> {
    #[inline]
    fn step(&self, cursor: &mut Cursor, next: usize) -> Result<()> {
        match cursor.advance(self.dims, self.offsets) {
            Some(_) => Ok(()),
            None => Err(PotentialError::DimensionMismatch {
                position: next,
                result_size: self.total,
            }),
        }
    }
}

/// Fills output entries `start..start + out.len()`; `cursor` must sit on joint
/// entry `start * elimination_size`.
fn sum_range(m: &Marginal<'_>, start: usize, cursor: &mut Cursor, out: &mut [f64]) -> Result<()> {
    let n = out.len();
    let mut joint = start * m.elimination_size;
    for (r, slot) in out.iter_mut().enumerate() {
        let mut acc = product_at(m.scale, m.tables, cursor.positions());
        for _ in 1..m.elimination_size {
            joint += 1;
            m.step(cursor, joint)?;
            acc += product_at(m.scale, m.tables, cursor.positions());
        }
        *slot = acc;
        if r + 1 < n {
            joint += 1;
            m.step(cursor, joint)?;
        }
    }
    Ok(())
}

/// Multiplies `tables` over the joint domain `dims` and sums out its first
/// `eliminated` variables.
///
/// `out[r] = Σ_e scale_factor * Π_i tables[i][p_i(r * E + e)]` with `E` the
/// product of the eliminated dimensions. `result_size` must equal the product
/// of the remaining dimensions. An empty elimination set is a plain product.
///
/// # Errors
/// - `InvalidArgument` when `eliminated` exceeds the domain, or `tables` and
///   `offsets` disagree on the table count
/// - `SizeMismatch` on any size disagreement; nothing is written in that case
#[tracing::instrument(skip_all, name = "multiply_and_marginalize_f64", fields(result_size = result_size, eliminated = eliminated, ntables = tables.len()))]
pub fn multiply_and_marginalize_f64(
    result_size: usize,
    eliminated: usize,
    scale_factor: f64,
    dims: &[usize],
    tables: &[&[f64]],
    offsets: &OffsetAccumulate,
    out: &mut [f64],
) -> Result<()> {
    let elimination_size =
        validate_marginal_operands(result_size, eliminated, dims, tables, offsets, out.len())?;
    if result_size == 0 {
        return Ok(());
    }
    if elimination_size == 0 {
        out.fill(0.0);
        return Ok(());
    }
    let m = Marginal {
        total: result_size * elimination_size,
        elimination_size,
        scale: scale_factor,
        dims,
        tables,
        offsets,
    };
    let mut cursor = Cursor::origin(dims.len(), tables.len());
    sum_range(&m, 0, &mut cursor, out)
}

/// Parallel [`multiply_and_marginalize_f64`] over chunks of `chunk_len` output
/// entries.
#[tracing::instrument(skip_all, name = "multiply_and_marginalize_par_f64", fields(result_size = result_size, eliminated = eliminated, chunk_len = chunk_len))]
#[allow(clippy::too_many_arguments)]
pub fn multiply_and_marginalize_par_f64(
    result_size: usize,
    eliminated: usize,
    scale_factor: f64,
    dims: &[usize],
    tables: &[&[f64]],
    offsets: &OffsetAccumulate,
    out: &mut [f64],
    chunk_len: usize,
) -> Result<()> {
    if chunk_len == 0 {
        return Err(PotentialError::InvalidArgument(
            "chunk length must be positive".into(),
        ));
    }
    let elimination_size =
        validate_marginal_operands(result_size, eliminated, dims, tables, offsets, out.len())?;
    if result_size == 0 {
        return Ok(());
    }
    if elimination_size == 0 {
        out.par_chunks_mut(chunk_len).for_each(|chunk| chunk.fill(0.0));
        return Ok(());
    }
    let strides = offsets.all_strides(dims)?;
    let m = Marginal {
        total: result_size * elimination_size,
        elimination_size,
        scale: scale_factor,
        dims,
        tables,
        offsets,
    };
    out.par_chunks_mut(chunk_len)
        .enumerate()
        .try_for_each(|(c, chunk)| {
            let start = c * chunk_len;
            let mut cursor = Cursor::at(start * elimination_size, dims, &strides)?;
            sum_range(&m, start, &mut cursor, chunk)
        })
}

/// Parallel when the joint domain reaches the configured threshold.
#[allow(clippy::too_many_arguments)]
pub fn multiply_and_marginalize_f64_with(
    config: &MultiplyConfig,
    result_size: usize,
    eliminated: usize,
    scale_factor: f64,
    dims: &[usize],
    tables: &[&[f64]],
    offsets: &OffsetAccumulate,
    out: &mut [f64],
) -> Result<()> {
    let work = potentia_core::product_checked(dims)?;
    if work >= config.parallel_threshold {
        tracing::debug!(work, chunk_len = config.chunk_len, "parallel multiply-and-marginalize");
        multiply_and_marginalize_par_f64(
            result_size,
            eliminated,
            scale_factor,
            dims,
            tables,
            offsets,
            out,
            config.chunk_len,
        )
    } else {
        multiply_and_marginalize_f64(result_size, eliminated, scale_factor, dims, tables, offsets, out)
    }
}
