//! Potential multiplication with the accumulated-offsets algorithm.
//!
//! Implements:
//! - `multiply_f64`: sequential kernel over the whole joint domain
//! - `multiply_par_f64`: the same kernel over contiguous chunks on rayon,
//!   each chunk started from a closed-form cursor
//! - `multiply_f64_with`: dispatch between the two from a [`MultiplyConfig`]
//!
//! Every output entry is `scale * t0[p0] * t1[p1] * ...` multiplied in
//! ascending table order, whichever path computes it, so all paths agree
//! bit for bit.

#![allow(
    clippy::needless_range_loop,
    reason = "Index-style loops mirror the counter/position bookkeeping"
)]

use crate::config::MultiplyConfig;
use crate::utility::checks::validate_operands;
use crate::utility::util::{isize_to_usize, LANES};
use potentia_core::{Cursor, OffsetAccumulate, PotentialError, Result};
use rayon::prelude::*;
use wide::f64x4;

/// Borrowed operands of one multiplication, validated.
struct Operands<'a> {
    result_size: usize,
    scale: f64,
    dims: &'a [usize],
    tables: &'a [&'a [f64]],
    offsets: &'a OffsetAccumulate,
}

#[inline]
pub(crate) fn product_at(scale: f64, tables: &[&[f64]], positions: &[isize]) -> f64 {
    let mut value = scale;
    for (t, &p) in tables.iter().zip(positions) {
        value *= t[isize_to_usize(p)];
    }
    value
}

/// Evaluates one full run of the fastest variable (coordinate 0 going from 0
/// to `out.len() - 1`) four lanes at a time.
#[inline]
fn fill_run(ops: &Operands<'_>, positions: &[isize], out: &mut [f64]) {
    let len = out.len();
    let limit = len & !(LANES - 1);
    let mut j = 0usize;
    while j < limit {
        let mut acc = f64x4::splat(ops.scale);
        for (i, t) in ops.tables.iter().enumerate() {
            let step = ops.offsets.get(i, 0);
            let p = positions[i] + j as isize * step;
            let lanes = f64x4::from([
                t[isize_to_usize(p)],
                t[isize_to_usize(p + step)],
                t[isize_to_usize(p + 2 * step)],
                t[isize_to_usize(p + 3 * step)],
            ]);
            acc = acc * lanes;
        }
        out[j..j + LANES].copy_from_slice(&acc.to_array());
        j += LANES;
    }
    while j < len {
        let mut value = ops.scale;
        for (i, t) in ops.tables.iter().enumerate() {
            let p = positions[i] + j as isize * ops.offsets.get(i, 0);
            value *= t[isize_to_usize(p)];
        }
        out[j] = value;
        j += 1;
    }
}

/// Fills `out` with result entries `start..start + out.len()`; `cursor` must sit
/// on `start`. Leaves the cursor on the last written entry.
fn fill_range(ops: &Operands<'_>, start: usize, cursor: &mut Cursor, out: &mut [f64]) -> Result<()> {
    let n = out.len();
    let run = ops.dims.first().copied().unwrap_or(1);
    let mut k = 0usize;
    while k < n {
        if run >= LANES && cursor.coordinate()[0] == 0 && n - k >= run {
            fill_run(ops, cursor.positions(), &mut out[k..k + run]);
            cursor.skip_fastest(run - 1, ops.offsets);
            k += run;
        } else {
            out[k] = product_at(ops.scale, ops.tables, cursor.positions());
            k += 1;
        }
        if k == n {
            break;
        }
        if cursor.advance(ops.dims, ops.offsets).is_none() {
            return Err(PotentialError::DimensionMismatch {
                position: start + k,
                result_size: ops.result_size,
            });
        }
    }
    Ok(())
}

/// Multiplies `tables` into `out` over the joint domain `dims`.
///
/// `out[k] = scale_factor * Π_i tables[i][p_i(k)]`, where `p_i` starts at 0 and
/// moves by `offsets[i][v]` whenever variable `v` is the one incremented by the
/// mixed-radix counter (variable 0 fastest).
///
/// # Errors
/// - `InvalidArgument` when `tables` and `offsets` disagree on the table count
/// - `SizeMismatch` when `result_size`, `Π dims`, `out.len()` or a table's
///   reachable positions disagree; nothing is written in that case
#[tracing::instrument(skip_all, name = "multiply_f64", fields(result_size = result_size, ntables = tables.len()))]
pub fn multiply_f64(
    result_size: usize,
    scale_factor: f64,
    dims: &[usize],
    tables: &[&[f64]],
    offsets: &OffsetAccumulate,
    out: &mut [f64],
) -> Result<()> {
    validate_operands(result_size, dims, tables, offsets, out.len())?;
    if result_size == 0 {
        return Ok(());
    }
    if tables.is_empty() {
        out.fill(scale_factor);
        return Ok(());
    }
    let ops = Operands {
        result_size,
        scale: scale_factor,
        dims,
        tables,
        offsets,
    };
    let mut cursor = Cursor::origin(dims.len(), tables.len());
    fill_range(&ops, 0, &mut cursor, out)
}

/// Parallel [`multiply_f64`]: `out` is split into chunks of `chunk_len` entries,
/// each evaluated from its own closed-form starting cursor.
#[tracing::instrument(skip_all, name = "multiply_par_f64", fields(result_size = result_size, ntables = tables.len(), chunk_len = chunk_len))]
pub fn multiply_par_f64(
    result_size: usize,
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
    validate_operands(result_size, dims, tables, offsets, out.len())?;
    if result_size == 0 {
        return Ok(());
    }
    if tables.is_empty() {
        out.par_chunks_mut(chunk_len)
            .for_each(|chunk| chunk.fill(scale_factor));
        return Ok(());
    }
    let strides = offsets.all_strides(dims)?;
    let ops = Operands {
        result_size,
        scale: scale_factor,
        dims,
        tables,
        offsets,
    };
    out.par_chunks_mut(chunk_len)
        .enumerate()
        .try_for_each(|(c, chunk)| {
            let start = c * chunk_len;
            let mut cursor = Cursor::at(start, dims, &strides)?;
            fill_range(&ops, start, &mut cursor, chunk)
        })
}

/// Runs [`multiply_par_f64`] when `result_size` reaches the configured
/// threshold, [`multiply_f64`] otherwise.
pub fn multiply_f64_with(
    config: &MultiplyConfig,
    result_size: usize,
    scale_factor: f64,
    dims: &[usize],
    tables: &[&[f64]],
    offsets: &OffsetAccumulate,
    out: &mut [f64],
) -> Result<()> {
    if result_size >= config.parallel_threshold {
        tracing::debug!(result_size, chunk_len = config.chunk_len, "parallel multiply");
        multiply_par_f64(
            result_size,
            scale_factor,
            dims,
            tables,
            offsets,
            out,
            config.chunk_len,
        )
    } else {
        multiply_f64(result_size, scale_factor, dims, tables, offsets, out)
    }
}
