//! Mixed-radix index arithmetic over a joint variable domain.
//!
//! Convention: variable 0 is the fastest-varying coordinate. For dimensions
//! `[d0, d1, ..., dn]` the linear index of a coordinate `c` is
//! `c0 + d0 * (c1 + d1 * (c2 + ...))`.

use crate::error::{PotentialError, Result};

#[inline]
fn dim_to_isize(d: usize) -> Result<isize> {
    isize::try_from(d)
        .map_err(|_| PotentialError::SizeMismatch(format!("dimension {d} overflows isize")))
}

#[inline]
fn overflow(what: &str) -> PotentialError {
    PotentialError::SizeMismatch(format!("{what} overflow"))
}

/// Product of the dimensions; 1 for an empty domain.
#[inline]
pub fn product_checked(dims: &[usize]) -> Result<usize> {
    let mut acc: usize = 1;
    for &d in dims {
        acc = acc.checked_mul(d).ok_or_else(|| overflow("dimension product"))?;
    }
    Ok(acc)
}

/// Strides with variable 0 fastest: `stride[0] = 1`, `stride[v] = stride[v-1] * dims[v-1]`.
pub fn strides_first_fastest(dims: &[usize]) -> Result<Vec<usize>> {
    let mut strides = Vec::with_capacity(dims.len());
    let mut s: usize = 1;
    for &d in dims {
        strides.push(s);
        s = s.checked_mul(d).ok_or_else(|| overflow("stride"))?;
    }
    Ok(strides)
}

/// Linear index of `coordinate` within `dims`.
pub fn rank(coordinate: &[usize], dims: &[usize]) -> Result<usize> {
    if coordinate.len() != dims.len() {
        return Err(PotentialError::SizeMismatch(format!(
            "coordinate has {} entries, domain has {} variables",
            coordinate.len(),
            dims.len()
        )));
    }
    let mut index: usize = 0;
    let mut stride: usize = 1;
    for (v, (&c, &d)) in coordinate.iter().zip(dims).enumerate() {
        if c >= d {
            return Err(PotentialError::InvalidArgument(format!(
                "coordinate {c} out of bounds for variable {v} with {d} states"
            )));
        }
        index = c
            .checked_mul(stride)
            .and_then(|x| index.checked_add(x))
            .ok_or_else(|| overflow("linear index"))?;
        stride = stride.checked_mul(d).ok_or_else(|| overflow("stride"))?;
    }
    Ok(index)
}

/// Writes the coordinate of linear `index` within `dims` into `coordinate`.
pub fn unrank(index: usize, dims: &[usize], coordinate: &mut [usize]) -> Result<()> {
    if coordinate.len() != dims.len() {
        return Err(PotentialError::SizeMismatch(format!(
            "coordinate has {} entries, domain has {} variables",
            coordinate.len(),
            dims.len()
        )));
    }
    let size = product_checked(dims)?;
    if index >= size {
        return Err(PotentialError::InvalidArgument(format!(
            "index {index} out of bounds for domain of size {size}"
        )));
    }
    let mut rem = index;
    for (c, &d) in coordinate.iter_mut().zip(dims) {
        *c = rem % d;
        rem /= d;
    }
    Ok(())
}

/// One counter step. Increments the first variable (scanning from 0) that stays
/// below its bound, resetting every variable scanned before it to 0, and returns
/// its index. Returns `None` once every variable has wrapped; the coordinate is
/// then back at all zeros.
#[inline]
pub fn advance(coordinate: &mut [usize], dims: &[usize]) -> Option<usize> {
    debug_assert_eq!(coordinate.len(), dims.len());
    for (v, (c, &d)) in coordinate.iter_mut().zip(dims).enumerate() {
        *c += 1;
        if *c < d {
            return Some(v);
        }
        *c = 0;
    }
    None
}

/// Accumulated offsets of a table whose stride for each joint variable is
/// `strides[v]` (0 when the table does not depend on `v`).
///
/// Entry `v` is the change of the table position when `v` is incremented and
/// every variable before it wraps from its last state back to 0:
/// `acc[0] = s[0]`, `acc[v] = acc[v-1] + s[v] - dims[v-1] * s[v-1]`.
pub fn accumulated_offsets(dims: &[usize], strides: &[isize]) -> Result<Vec<isize>> {
    if strides.len() != dims.len() {
        return Err(PotentialError::SizeMismatch(format!(
            "{} strides for {} joint variables",
            strides.len(),
            dims.len()
        )));
    }
    let mut acc: Vec<isize> = Vec::with_capacity(dims.len());
    for v in 0..dims.len() {
        let value = if v == 0 {
            strides[0]
        } else {
            let wrapped = dim_to_isize(dims[v - 1])?
                .checked_mul(strides[v - 1])
                .ok_or_else(|| overflow("accumulated offset"))?;
            acc[v - 1]
                .checked_add(strides[v])
                .and_then(|x| x.checked_sub(wrapped))
                .ok_or_else(|| overflow("accumulated offset"))?
        };
        acc.push(value);
    }
    Ok(acc)
}

/// Inverse of [`accumulated_offsets`]: recovers per-variable strides.
pub fn strides_from_accumulated(dims: &[usize], acc: &[isize]) -> Result<Vec<isize>> {
    if acc.len() != dims.len() {
        return Err(PotentialError::SizeMismatch(format!(
            "{} accumulated offsets for {} joint variables",
            acc.len(),
            dims.len()
        )));
    }
    let mut strides: Vec<isize> = Vec::with_capacity(dims.len());
    for v in 0..dims.len() {
        let value = if v == 0 {
            acc[0]
        } else {
            let wrapped = dim_to_isize(dims[v - 1])?
                .checked_mul(strides[v - 1])
                .ok_or_else(|| overflow("stride"))?;
            acc[v]
                .checked_sub(acc[v - 1])
                .and_then(|x| x.checked_add(wrapped))
                .ok_or_else(|| overflow("stride"))?
        };
        strides.push(value);
    }
    Ok(strides)
}

/// Position of `coordinate` in a table with the given per-variable strides.
pub fn position(coordinate: &[usize], strides: &[isize]) -> Result<isize> {
    if coordinate.len() != strides.len() {
        return Err(PotentialError::SizeMismatch(format!(
            "coordinate has {} entries, strides have {}",
            coordinate.len(),
            strides.len()
        )));
    }
    let mut pos: isize = 0;
    for (&c, &s) in coordinate.iter().zip(strides) {
        let term = dim_to_isize(c)?
            .checked_mul(s)
            .ok_or_else(|| overflow("position"))?;
        pos = pos.checked_add(term).ok_or_else(|| overflow("position"))?;
    }
    Ok(pos)
}

/// Smallest and largest position reachable with `strides` over the whole domain.
pub fn reachable_range(dims: &[usize], strides: &[isize]) -> Result<(isize, isize)> {
    let mut lo: isize = 0;
    let mut hi: isize = 0;
    for (&d, &s) in dims.iter().zip(strides) {
        if d == 0 {
            continue;
        }
        let span = dim_to_isize(d - 1)?
            .checked_mul(s)
            .ok_or_else(|| overflow("position"))?;
        if span < 0 {
            lo = lo.checked_add(span).ok_or_else(|| overflow("position"))?;
        } else {
            hi = hi.checked_add(span).ok_or_else(|| overflow("position"))?;
        }
    }
    Ok((lo, hi))
}
