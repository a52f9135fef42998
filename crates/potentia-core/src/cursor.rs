//! Iteration state over the joint domain: result coordinate plus one read
//! position per source table.

use crate::error::{PotentialError, Result};
use crate::index::{advance, position, unrank};
use crate::offsets::OffsetAccumulate;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cursor {
    coordinate: Vec<usize>,
    positions: Vec<isize>,
}

impl Cursor {
    /// All-zero coordinate, every table at position 0.
    #[must_use]
    pub fn origin(nvars: usize, ntables: usize) -> Self {
        Self {
            coordinate: vec![0; nvars],
            positions: vec![0; ntables],
        }
    }

    /// Closed-form cursor for linear `index`: un-ranks the coordinate and
    /// projects it through each table's strides. A projection that overflows
    /// `isize` is a `SizeMismatch`.
    pub fn at(index: usize, dims: &[usize], strides: &[Vec<isize>]) -> Result<Self> {
        let mut coordinate = vec![0; dims.len()];
        unrank(index, dims, &mut coordinate)?;
        let mut positions = Vec::with_capacity(strides.len());
        for (i, s) in strides.iter().enumerate() {
            if s.len() != dims.len() {
                return Err(PotentialError::SizeMismatch(format!(
                    "strides of table {i} have {} entries, domain has {} variables",
                    s.len(),
                    dims.len()
                )));
            }
            positions.push(position(&coordinate, s)?);
        }
        Ok(Self {
            coordinate,
            positions,
        })
    }

    #[inline]
    #[must_use]
    pub fn coordinate(&self) -> &[usize] {
        &self.coordinate
    }

    #[inline]
    #[must_use]
    pub fn positions(&self) -> &[isize] {
        &self.positions
    }

    /// Counter step: moves the coordinate to the next linear index and applies
    /// the incremented variable's accumulated offset to every table position.
    /// Returns `None` without touching the positions when the domain is exhausted.
    #[inline]
    pub fn advance(&mut self, dims: &[usize], offsets: &OffsetAccumulate) -> Option<usize> {
        let v = advance(&mut self.coordinate, dims)?;
        for (i, p) in self.positions.iter_mut().enumerate() {
            *p += offsets.get(i, v);
        }
        Some(v)
    }

    /// Moves the fastest variable forward by `steps` without wrapping.
    #[inline]
    pub fn skip_fastest(&mut self, steps: usize, offsets: &OffsetAccumulate) {
        debug_assert!(!self.coordinate.is_empty());
        self.coordinate[0] += steps;
        for (i, p) in self.positions.iter_mut().enumerate() {
            *p += steps as isize * offsets.get(i, 0);
        }
    }
}
