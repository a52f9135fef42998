//! Offset-accumulate matrix: one row per source table, one column per joint variable

use crate::error::{PotentialError, Result};
use crate::index::{accumulated_offsets, reachable_range, strides_from_accumulated};
use crate::table::{TablePotential, Variable};

#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub struct OffsetAccumulate {
    pub data: Vec<isize>, // flattened (nrows * nvars), row-major
    pub nvars: usize,
    pub nrows: usize,
}

impl OffsetAccumulate {
    #[inline]
    #[must_use]
    pub const fn nrows(&self) -> usize {
        self.nrows
    }

    #[inline]
    #[must_use]
    pub const fn nvars(&self) -> usize {
        self.nvars
    }

    /// A matrix with no tables over a domain of `nvars` variables.
    #[inline]
    #[must_use]
    pub const fn empty(nvars: usize) -> Self {
        Self {
            data: Vec::new(),
            nvars,
            nrows: 0,
        }
    }

    pub fn from_parts(nrows: usize, nvars: usize, data: Vec<isize>) -> Result<Self> {
        let expected = nrows
            .checked_mul(nvars)
            .ok_or_else(|| PotentialError::SizeMismatch("offset matrix size overflow".into()))?;
        if data.len() != expected {
            return Err(PotentialError::SizeMismatch(format!(
                "offset data has {} entries, expected {nrows} rows * {nvars} variables",
                data.len()
            )));
        }
        Ok(Self { data, nvars, nrows })
    }

    /// Builds the matrix from per-table rows; every row must hold `nvars` entries.
    pub fn from_rows<R: AsRef<[isize]>>(nvars: usize, rows: &[R]) -> Result<Self> {
        let mut data = Vec::with_capacity(rows.len() * nvars);
        for (i, row) in rows.iter().enumerate() {
            let row = row.as_ref();
            if row.len() != nvars {
                return Err(PotentialError::SizeMismatch(format!(
                    "offset row {i} has {} entries, expected {nvars}",
                    row.len()
                )));
            }
            data.extend_from_slice(row);
        }
        Ok(Self {
            data,
            nvars,
            nrows: rows.len(),
        })
    }

    /// Derives the accumulated offsets of each table from its per-variable strides.
    pub fn from_strides<R: AsRef<[isize]>>(dims: &[usize], stride_rows: &[R]) -> Result<Self> {
        let mut data = Vec::with_capacity(stride_rows.len() * dims.len());
        for row in stride_rows {
            data.extend(accumulated_offsets(dims, row.as_ref())?);
        }
        Ok(Self {
            data,
            nvars: dims.len(),
            nrows: stride_rows.len(),
        })
    }

    /// Accumulated offsets of `potentials` relative to the joint ordering `joint`.
    pub fn for_potentials(joint: &[Variable], potentials: &[&TablePotential]) -> Result<Self> {
        let mut data = Vec::with_capacity(potentials.len() * joint.len());
        for p in potentials {
            data.extend(p.accumulated_offsets(joint)?);
        }
        Ok(Self {
            data,
            nvars: joint.len(),
            nrows: potentials.len(),
        })
    }

    #[inline]
    #[must_use]
    pub fn row(&self, i: usize) -> &[isize] {
        &self.data[i * self.nvars..(i + 1) * self.nvars]
    }

    #[inline]
    #[must_use]
    pub fn get(&self, i: usize, v: usize) -> isize {
        self.data[i * self.nvars + v]
    }

    /// Per-variable strides of table `i`, recovered from its accumulated offsets.
    pub fn row_strides(&self, i: usize, dims: &[usize]) -> Result<Vec<isize>> {
        strides_from_accumulated(dims, self.row(i))
    }

    pub fn all_strides(&self, dims: &[usize]) -> Result<Vec<Vec<isize>>> {
        (0..self.nrows).map(|i| self.row_strides(i, dims)).collect()
    }

    /// Smallest and largest position table `i` reaches over the whole domain.
    pub fn reachable_range(&self, i: usize, dims: &[usize]) -> Result<(isize, isize)> {
        let strides = self.row_strides(i, dims)?;
        reachable_range(dims, &strides)
    }
}
