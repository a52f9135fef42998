#![allow(
    clippy::type_complexity,
    reason = "pyo3 functions often return tuples of arrays"
)]
#![allow(
    clippy::needless_pass_by_value,
    reason = "PyReadonlyArray types are thin wrappers passed by value in pyo3 idioms"
)]
#![allow(
    clippy::elidable_lifetime_names,
    reason = "Explicit 'py lifetimes are idiomatic and clear in PyO3 signatures"
)]
use numpy::{PyArray1, PyReadonlyArray1, PyReadonlyArray2};
use pyo3::prelude::*;
use pyo3::types::PyModule;

use potentia_kernels::{
    divide_f64, multiply_and_marginalize_with, multiply_f64_with, multiply_tables_with,
    MultiplyConfig,
};

mod helpers;

use helpers::{
    convert_dims_i64_to_usize, convert_i64_to_isize, convert_usize_to_i64, offsets_from_array,
    potentials_from_parts, to_py_err, variables_from_parts,
};

/// `scale * Π tables[i][p_i]` over the joint domain `dims` (variable 0 fastest).
/// `offsets` is the `(ntables, nvars)` accumulated-offsets matrix.
#[pyfunction]
fn multiply_from_parts<'py>(
    py: Python<'py>,
    scale: f64,
    dims: PyReadonlyArray1<'py, i64>,
    tables: Vec<PyReadonlyArray1<'py, f64>>,
    offsets: PyReadonlyArray2<'py, i64>,
) -> PyResult<Bound<'py, PyArray1<f64>>> {
    let dims = convert_dims_i64_to_usize(dims.as_slice()?, "dims")?;
    let offsets = offsets_from_array(&offsets)?;
    let slices: Vec<&[f64]> = tables
        .iter()
        .map(|t| t.as_slice())
        .collect::<Result<_, _>>()?;
    let size = potentia_core::product_checked(&dims).map_err(to_py_err)?;
    let config = MultiplyConfig::from_env();
    let out = py
        .detach(|| {
            let mut out = vec![0.0f64; size];
            multiply_f64_with(&config, size, scale, &dims, &slices, &offsets, &mut out)
                .map(|()| out)
        })
        .map_err(to_py_err)?;
    Ok(PyArray1::from_vec(py, out))
}

#[pyfunction]
fn divide_from_parts<'py>(
    py: Python<'py>,
    dims: PyReadonlyArray1<'py, i64>,
    numerator: PyReadonlyArray1<'py, f64>,
    denominator: PyReadonlyArray1<'py, f64>,
    offsets: PyReadonlyArray2<'py, i64>,
) -> PyResult<Bound<'py, PyArray1<f64>>> {
    let dims = convert_dims_i64_to_usize(dims.as_slice()?, "dims")?;
    let offsets = offsets_from_array(&offsets)?;
    let num = numerator.as_slice()?;
    let den = denominator.as_slice()?;
    let size = potentia_core::product_checked(&dims).map_err(to_py_err)?;
    let out = py
        .detach(|| {
            let mut out = vec![0.0f64; size];
            divide_f64(size, &dims, num, den, &offsets, &mut out).map(|()| out)
        })
        .map_err(to_py_err)?;
    Ok(PyArray1::from_vec(py, out))
}

/// Accumulated offsets of a table with per-variable `strides` over `dims`.
#[pyfunction]
fn accumulated_offsets<'py>(
    py: Python<'py>,
    dims: PyReadonlyArray1<'py, i64>,
    strides: PyReadonlyArray1<'py, i64>,
) -> PyResult<Bound<'py, PyArray1<i64>>> {
    let dims = convert_dims_i64_to_usize(dims.as_slice()?, "dims")?;
    let strides = convert_i64_to_isize(strides.as_slice()?, "strides")?;
    let acc = potentia_core::accumulated_offsets(&dims, &strides).map_err(to_py_err)?;
    let acc: Vec<i64> = acc.into_iter().map(|x| x as i64).collect();
    Ok(PyArray1::from_vec(py, acc))
}

#[pyfunction]
fn rank(coordinate: PyReadonlyArray1<'_, i64>, dims: PyReadonlyArray1<'_, i64>) -> PyResult<usize> {
    let coordinate = convert_dims_i64_to_usize(coordinate.as_slice()?, "coordinate")?;
    let dims = convert_dims_i64_to_usize(dims.as_slice()?, "dims")?;
    potentia_core::rank(&coordinate, &dims).map_err(to_py_err)
}

#[pyfunction]
fn unrank<'py>(
    py: Python<'py>,
    index: usize,
    dims: PyReadonlyArray1<'py, i64>,
) -> PyResult<Bound<'py, PyArray1<i64>>> {
    let dims = convert_dims_i64_to_usize(dims.as_slice()?, "dims")?;
    let mut coordinate = vec![0usize; dims.len()];
    potentia_core::unrank(index, &dims, &mut coordinate).map_err(to_py_err)?;
    Ok(PyArray1::from_vec(py, convert_usize_to_i64(&coordinate)?))
}

/// Multiplies potentials given as parallel lists of variable ids, cardinalities
/// and value tables. Returns the result's `(ids, cardinalities, values)`.
#[pyfunction]
fn multiply_tables_from_parts<'py>(
    py: Python<'py>,
    variables: Vec<PyReadonlyArray1<'py, i64>>,
    cardinalities: Vec<PyReadonlyArray1<'py, i64>>,
    values: Vec<PyReadonlyArray1<'py, f64>>,
) -> PyResult<(
    Bound<'py, PyArray1<i64>>,
    Bound<'py, PyArray1<i64>>,
    Bound<'py, PyArray1<f64>>,
)> {
    let potentials = potentials_from_parts(&variables, &cardinalities, &values)?;
    let config = MultiplyConfig::from_env();
    let r = py
        .detach(|| multiply_tables_with(&config, &potentials))
        .map_err(to_py_err)?;
    let ids: Vec<usize> = r.variables.iter().map(|v| v.id).collect();
    let states: Vec<usize> = r.variables.iter().map(|v| v.num_states).collect();
    Ok((
        PyArray1::from_vec(py, convert_usize_to_i64(&ids)?),
        PyArray1::from_vec(py, convert_usize_to_i64(&states)?),
        PyArray1::from_vec(py, r.values),
    ))
}

/// Product of the potentials with the `eliminate` variables summed out.
/// Returns the values over `keep` (first kept variable fastest).
#[pyfunction]
#[allow(clippy::too_many_arguments)]
fn multiply_and_marginalize_from_parts<'py>(
    py: Python<'py>,
    variables: Vec<PyReadonlyArray1<'py, i64>>,
    cardinalities: Vec<PyReadonlyArray1<'py, i64>>,
    values: Vec<PyReadonlyArray1<'py, f64>>,
    keep_ids: PyReadonlyArray1<'py, i64>,
    keep_cardinalities: PyReadonlyArray1<'py, i64>,
    eliminate_ids: PyReadonlyArray1<'py, i64>,
    eliminate_cardinalities: PyReadonlyArray1<'py, i64>,
) -> PyResult<Bound<'py, PyArray1<f64>>> {
    let potentials = potentials_from_parts(&variables, &cardinalities, &values)?;
    let keep = variables_from_parts(&keep_ids, &keep_cardinalities)?;
    let eliminate = variables_from_parts(&eliminate_ids, &eliminate_cardinalities)?;
    let config = MultiplyConfig::from_env();
    let r = py
        .detach(|| multiply_and_marginalize_with(&config, &potentials, &keep, &eliminate))
        .map_err(to_py_err)?;
    Ok(PyArray1::from_vec(py, r.values))
}

#[pymodule]
fn _core(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add("version", env!("CARGO_PKG_VERSION"))?;
    m.add_function(wrap_pyfunction!(multiply_from_parts, m)?)?;
    m.add_function(wrap_pyfunction!(divide_from_parts, m)?)?;
    m.add_function(wrap_pyfunction!(accumulated_offsets, m)?)?;
    m.add_function(wrap_pyfunction!(rank, m)?)?;
    m.add_function(wrap_pyfunction!(unrank, m)?)?;
    m.add_function(wrap_pyfunction!(multiply_tables_from_parts, m)?)?;
    m.add_function(wrap_pyfunction!(multiply_and_marginalize_from_parts, m)?)?;
    Ok(())
}
