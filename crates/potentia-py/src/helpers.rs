//! Conversions between numpy inputs and potentia types

use numpy::{PyReadonlyArray1, PyReadonlyArray2};
use pyo3::prelude::*;

use potentia_core::{OffsetAccumulate, PotentialError, TablePotential, Variable};

/// Every kernel error surfaces as `ValueError`.
pub(crate) fn to_py_err(err: PotentialError) -> PyErr {
    PyErr::new::<pyo3::exceptions::PyValueError, _>(err.to_string())
}

/// Convert i64 dimensions to usize, with validation
///
/// # Errors
/// Returns `PyValueError` if any entry is negative or overflows usize
pub(crate) fn convert_dims_i64_to_usize(dims: &[i64], param_name: &str) -> PyResult<Vec<usize>> {
    let mut result = Vec::with_capacity(dims.len());
    for &d in dims {
        if d < 0 {
            return Err(PyErr::new::<pyo3::exceptions::PyValueError, _>(format!(
                "{param_name} must be non-negative, got {d}"
            )));
        }
        result.push(usize::try_from(d).map_err(|_| {
            PyErr::new::<pyo3::exceptions::PyValueError, _>(format!(
                "{param_name} value {d} overflows usize"
            ))
        })?);
    }
    Ok(result)
}

/// Convert a signed i64 vector to isize
pub(crate) fn convert_i64_to_isize(xs: &[i64], param_name: &str) -> PyResult<Vec<isize>> {
    xs.iter()
        .map(|&x| {
            isize::try_from(x).map_err(|_| {
                PyErr::new::<pyo3::exceptions::PyValueError, _>(format!(
                    "{param_name} value {x} overflows isize"
                ))
            })
        })
        .collect()
}

/// Build an offset-accumulate matrix from a `(ntables, nvars)` int64 array
pub(crate) fn offsets_from_array(offsets: &PyReadonlyArray2<'_, i64>) -> PyResult<OffsetAccumulate> {
    let arr = offsets.as_array();
    let (nrows, nvars) = arr.dim();
    let flat: Vec<i64> = arr.iter().copied().collect();
    let data = convert_i64_to_isize(&flat, "offsets")?;
    OffsetAccumulate::from_parts(nrows, nvars, data).map_err(to_py_err)
}

/// Convert usize values to i64 for Python return
pub(crate) fn convert_usize_to_i64(xs: &[usize]) -> PyResult<Vec<i64>> {
    xs.iter()
        .map(|&x| {
            i64::try_from(x).map_err(|_| {
                PyErr::new::<pyo3::exceptions::PyValueError, _>(format!(
                    "value {x} too large for int64"
                ))
            })
        })
        .collect()
}

/// Pair variable ids with their cardinalities
pub(crate) fn variables_from_parts(
    ids: &PyReadonlyArray1<'_, i64>,
    cardinalities: &PyReadonlyArray1<'_, i64>,
) -> PyResult<Vec<Variable>> {
    let ids = convert_dims_i64_to_usize(ids.as_slice()?, "variables")?;
    let states = convert_dims_i64_to_usize(cardinalities.as_slice()?, "cardinalities")?;
    if ids.len() != states.len() {
        return Err(PyErr::new::<pyo3::exceptions::PyValueError, _>(
            "each variable needs exactly one cardinality",
        ));
    }
    Ok(ids
        .into_iter()
        .zip(states)
        .map(|(id, n)| Variable::new(id, n))
        .collect())
}

/// Build potentials from parallel lists of ids, cardinalities and values
pub(crate) fn potentials_from_parts(
    variables: &[PyReadonlyArray1<'_, i64>],
    cardinalities: &[PyReadonlyArray1<'_, i64>],
    values: &[PyReadonlyArray1<'_, f64>],
) -> PyResult<Vec<TablePotential>> {
    if variables.len() != cardinalities.len() || variables.len() != values.len() {
        return Err(PyErr::new::<pyo3::exceptions::PyValueError, _>(
            "variables, cardinalities and values must have equal length",
        ));
    }
    let mut potentials = Vec::with_capacity(values.len());
    for ((ids, states), vals) in variables.iter().zip(cardinalities).zip(values) {
        let vars = variables_from_parts(ids, states)?;
        potentials.push(
            TablePotential::from_parts(vars, vals.as_slice()?.to_vec()).map_err(to_py_err)?,
        );
    }
    Ok(potentials)
}
