//! Table-level operations: build the joint domain and offsets, then run a kernel

use crate::config::MultiplyConfig;
use crate::elementwise::divide::divide_f64;
use crate::elementwise::marginalize::multiply_and_marginalize_f64_with;
use crate::elementwise::multiply::multiply_f64_with;
use potentia_core::{
    product_checked, union_variables, OffsetAccumulate, PotentialError, Result, TablePotential,
    Variable,
};

/// Product of `potentials` with the default configuration.
pub fn multiply_tables(potentials: &[TablePotential]) -> Result<TablePotential> {
    multiply_tables_with(&MultiplyConfig::default(), potentials)
}

/// Product of `potentials`.
///
/// Single-entry tables are folded into the scale factor; the remaining tables
/// are optionally sorted by size (stable) and multiplied over the union of
/// their variables in first-appearance order. No potentials yields the
/// constant 1.
#[tracing::instrument(skip_all, name = "multiply_tables", fields(npotentials = potentials.len()))]
pub fn multiply_tables_with(
    config: &MultiplyConfig,
    potentials: &[TablePotential],
) -> Result<TablePotential> {
    match potentials {
        [] => return Ok(TablePotential::constant(1.0)),
        [single] => return Ok(single.clone()),
        _ => {}
    }
    let (constant_factor, proper) = split_constants(config, potentials);
    if proper.is_empty() {
        return Ok(TablePotential::constant(constant_factor));
    }

    let joint = union_variables(proper.iter().copied())?;
    let dims: Vec<usize> = joint.iter().map(|v| v.num_states).collect();
    let offsets = OffsetAccumulate::for_potentials(&joint, &proper)?;
    let size = product_checked(&dims)?;
    let tables: Vec<&[f64]> = proper.iter().map(|p| p.values.as_slice()).collect();
    tracing::debug!(
        proper = proper.len(),
        variables = joint.len(),
        size,
        "multiplying tables"
    );

    let mut values = vec![0.0f64; size];
    multiply_f64_with(
        config,
        size,
        constant_factor,
        &dims,
        &tables,
        &offsets,
        &mut values,
    )?;
    Ok(TablePotential::from_parts_unchecked(joint, values))
}

/// Optionally size-sorted (stable) proper tables, plus the product of the
/// single-entry ones.
fn split_constants<'a>(
    config: &MultiplyConfig,
    potentials: &'a [TablePotential],
) -> (f64, Vec<&'a TablePotential>) {
    let mut ordered: Vec<&TablePotential> = potentials.iter().collect();
    if config.reorder {
        ordered.sort_by_key(|p| p.table_size());
    }
    let mut constant_factor = 1.0f64;
    for p in ordered.iter().filter(|p| p.is_constant()) {
        if let Some(&v) = p.values.first() {
            constant_factor *= v;
        }
    }
    let proper = ordered.into_iter().filter(|p| !p.is_constant()).collect();
    (constant_factor, proper)
}

/// [`multiply_and_marginalize_with`] with the default configuration.
pub fn multiply_and_marginalize(
    potentials: &[TablePotential],
    keep: &[Variable],
    eliminate: &[Variable],
) -> Result<TablePotential> {
    multiply_and_marginalize_with(&MultiplyConfig::default(), potentials, keep, eliminate)
}

/// Product of `potentials` with the `eliminate` variables summed out.
///
/// The result ranges over `keep` in the given order. Every variable of a
/// non-constant potential must appear in `keep` or `eliminate`; variables no
/// potential depends on are allowed, and summing one out scales the result by
/// its number of states. Single-entry tables fold into the scale factor as in
/// [`multiply_tables_with`].
#[tracing::instrument(skip_all, name = "multiply_and_marginalize", fields(npotentials = potentials.len(), keep = keep.len(), eliminate = eliminate.len()))]
pub fn multiply_and_marginalize_with(
    config: &MultiplyConfig,
    potentials: &[TablePotential],
    keep: &[Variable],
    eliminate: &[Variable],
) -> Result<TablePotential> {
    // eliminated variables are the fastest, so each output sums a contiguous run
    let joint: Vec<Variable> = eliminate.iter().chain(keep).copied().collect();
    for (k, var) in joint.iter().enumerate() {
        if var.num_states == 0 {
            return Err(PotentialError::InvalidArgument(format!(
                "variable {} must have at least one state",
                var.id
            )));
        }
        if joint[..k].iter().any(|w| w.id == var.id) {
            return Err(PotentialError::InvalidArgument(format!(
                "variable {} is listed twice across keep and eliminate",
                var.id
            )));
        }
    }
    let (constant_factor, proper) = split_constants(config, potentials);
    let dims: Vec<usize> = joint.iter().map(|v| v.num_states).collect();
    let offsets = OffsetAccumulate::for_potentials(&joint, &proper)?;
    let size = product_checked(&dims[eliminate.len()..])?;
    let tables: Vec<&[f64]> = proper.iter().map(|p| p.values.as_slice()).collect();
    tracing::debug!(
        proper = proper.len(),
        variables = joint.len(),
        size,
        "multiplying and marginalizing tables"
    );

    let mut values = vec![0.0f64; size];
    multiply_and_marginalize_f64_with(
        config,
        size,
        eliminate.len(),
        constant_factor,
        &dims,
        &tables,
        &offsets,
        &mut values,
    )?;
    Ok(TablePotential::from_parts_unchecked(keep.to_vec(), values))
}

/// Quotient `numerator / denominator` over the union of their variables,
/// numerator variables first. Zero denominators give 0.
#[tracing::instrument(skip_all, name = "divide_tables")]
pub fn divide_tables(
    numerator: &TablePotential,
    denominator: &TablePotential,
) -> Result<TablePotential> {
    let joint = union_variables([numerator, denominator])?;
    let dims: Vec<usize> = joint.iter().map(|v| v.num_states).collect();
    let offsets = OffsetAccumulate::for_potentials(&joint, &[numerator, denominator])?;
    let size = product_checked(&dims)?;
    let mut values = vec![0.0f64; size];
    divide_f64(
        size,
        &dims,
        &numerator.values,
        &denominator.values,
        &offsets,
        &mut values,
    )?;
    Ok(TablePotential::from_parts_unchecked(joint, values))
}
