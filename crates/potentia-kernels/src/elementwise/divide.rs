//! Quotient of two potentials over their joint domain

use crate::utility::checks::validate_operands;
use crate::utility::util::isize_to_usize;
use potentia_core::{Cursor, OffsetAccumulate, PotentialError, Result};

/// `out[k] = numerator[p0(k)] / denominator[p1(k)]`, with the positions driven by
/// the two rows of `offsets` exactly as in [`crate::multiply_f64`]. Entries whose
/// denominator is 0 are set to 0.
#[tracing::instrument(skip_all, name = "divide_f64", fields(result_size = result_size))]
pub fn divide_f64(
    result_size: usize,
    dims: &[usize],
    numerator: &[f64],
    denominator: &[f64],
    offsets: &OffsetAccumulate,
    out: &mut [f64],
) -> Result<()> {
    validate_operands(result_size, dims, &[numerator, denominator], offsets, out.len())?;
    let mut cursor = Cursor::origin(dims.len(), 2);
    for k in 0..result_size {
        let p = cursor.positions();
        let d = denominator[isize_to_usize(p[1])];
        out[k] = if d == 0.0 {
            0.0
        } else {
            numerator[isize_to_usize(p[0])] / d
        };
        if k + 1 == result_size {
            break;
        }
        if cursor.advance(dims, offsets).is_none() {
            return Err(PotentialError::DimensionMismatch {
                position: k + 1,
                result_size,
            });
        }
    }
    Ok(())
}
