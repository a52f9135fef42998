//! Boundary validation shared by the accumulated-offsets kernels
//
// Runs before any output is written. Once it passes, every position the
// counter can reach lies inside its table.

use potentia_core::{product_checked, OffsetAccumulate, PotentialError, Result};

pub(crate) fn validate_operands(
    result_size: usize,
    dims: &[usize],
    tables: &[&[f64]],
    offsets: &OffsetAccumulate,
    out_len: usize,
) -> Result<()> {
    if tables.len() != offsets.nrows() {
        return Err(PotentialError::InvalidArgument(format!(
            "{} tables but {} offset rows",
            tables.len(),
            offsets.nrows()
        )));
    }
    if offsets.nrows() > 0 && offsets.nvars() != dims.len() {
        return Err(PotentialError::SizeMismatch(format!(
            "offset rows have {} entries, domain has {} variables",
            offsets.nvars(),
            dims.len()
        )));
    }
    let product = product_checked(dims)?;
    if product != result_size {
        return Err(PotentialError::SizeMismatch(format!(
            "result size {result_size} differs from dimension product {product}"
        )));
    }
    if out_len != result_size {
        return Err(PotentialError::SizeMismatch(format!(
            "output buffer holds {out_len} values, result size is {result_size}"
        )));
    }
    if result_size == 0 {
        return Ok(());
    }
    for (i, table) in tables.iter().enumerate() {
        let (lo, hi) = offsets.reachable_range(i, dims)?;
        let len = isize::try_from(table.len()).unwrap_or(isize::MAX);
        if lo < 0 || hi >= len {
            return Err(PotentialError::SizeMismatch(format!(
                "table {i} has {} values but its offsets reach positions {lo}..={hi}",
                table.len()
            )));
        }
    }
    Ok(())
}

/// Validation for a joint domain whose leading `eliminated` variables are
/// summed out. Returns the number of joint entries folded into each output.
pub(crate) fn validate_marginal_operands(
    result_size: usize,
    eliminated: usize,
    dims: &[usize],
    tables: &[&[f64]],
    offsets: &OffsetAccumulate,
    out_len: usize,
) -> Result<usize> {
    if eliminated > dims.len() {
        return Err(PotentialError::InvalidArgument(format!(
            "{eliminated} eliminated variables in a domain of {}",
            dims.len()
        )));
    }
    let elimination_size = product_checked(&dims[..eliminated])?;
    let kept = product_checked(&dims[eliminated..])?;
    if kept != result_size {
        return Err(PotentialError::SizeMismatch(format!(
            "result size {result_size} differs from kept dimension product {kept}"
        )));
    }
    if out_len != result_size {
        return Err(PotentialError::SizeMismatch(format!(
            "output buffer holds {out_len} values, result size is {result_size}"
        )));
    }
    let total = product_checked(dims)?;
    validate_operands(total, dims, tables, offsets, total)?;
    Ok(elimination_size)
}
