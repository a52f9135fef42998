//! Discrete variables and table potentials (variable 0 fastest in the layout)

use crate::error::{PotentialError, Result};
use crate::index::{accumulated_offsets, product_checked, rank, strides_first_fastest, unrank};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Variable {
    pub id: usize,
    pub num_states: usize,
}

impl Variable {
    #[inline]
    #[must_use]
    pub const fn new(id: usize, num_states: usize) -> Self {
        Self { id, num_states }
    }
}

#[derive(Debug, Clone, PartialEq)]
#[non_exhaustive]
pub struct TablePotential {
    pub variables: Vec<Variable>,
    pub values: Vec<f64>,
}

impl TablePotential {
    pub fn from_parts(variables: Vec<Variable>, values: Vec<f64>) -> Result<Self> {
        for (k, var) in variables.iter().enumerate() {
            if var.num_states == 0 {
                return Err(PotentialError::InvalidArgument(format!(
                    "variable {} must have at least one state",
                    var.id
                )));
            }
            if variables[..k].iter().any(|w| w.id == var.id) {
                return Err(PotentialError::InvalidArgument(format!(
                    "variable {} appears twice",
                    var.id
                )));
            }
        }
        let dims: Vec<usize> = variables.iter().map(|v| v.num_states).collect();
        let size = product_checked(&dims)?;
        if values.len() != size {
            return Err(PotentialError::SizeMismatch(format!(
                "table has {} values, variables span {size} configurations",
                values.len()
            )));
        }
        Ok(Self { variables, values })
    }

    #[inline]
    #[must_use]
    pub const fn from_parts_unchecked(variables: Vec<Variable>, values: Vec<f64>) -> Self {
        Self { variables, values }
    }

    /// A potential without variables holding a single value.
    #[inline]
    #[must_use]
    pub fn constant(value: f64) -> Self {
        Self {
            variables: Vec::new(),
            values: vec![value],
        }
    }

    #[inline]
    #[must_use]
    pub fn table_size(&self) -> usize {
        self.values.len()
    }

    /// Tables with a single entry contribute only a constant factor to a product.
    #[inline]
    #[must_use]
    pub fn is_constant(&self) -> bool {
        self.values.len() <= 1
    }

    #[inline]
    #[must_use]
    pub fn dimensions(&self) -> Vec<usize> {
        self.variables.iter().map(|v| v.num_states).collect()
    }

    pub fn strides(&self) -> Result<Vec<usize>> {
        strides_first_fastest(&self.dimensions())
    }

    /// Table position of a configuration given in this potential's variable order.
    pub fn position(&self, coordinate: &[usize]) -> Result<usize> {
        rank(coordinate, &self.dimensions())
    }

    /// Configuration (one state index per variable) stored at `position`.
    pub fn configuration(&self, position: usize) -> Result<Vec<usize>> {
        let dims = self.dimensions();
        let mut coordinate = vec![0; dims.len()];
        unrank(position, &dims, &mut coordinate)?;
        Ok(coordinate)
    }

    /// This table's stride for every variable of `joint`; 0 for variables it
    /// does not depend on. Every variable of the table must appear in `joint`
    /// with the same number of states.
    pub fn strides_in(&self, joint: &[Variable]) -> Result<Vec<isize>> {
        let own = self.strides()?;
        let mut out = vec![0isize; joint.len()];
        for (var, &s) in self.variables.iter().zip(&own) {
            let Some(j) = joint.iter().position(|w| w.id == var.id) else {
                return Err(PotentialError::InvalidArgument(format!(
                    "variable {} is missing from the joint domain",
                    var.id
                )));
            };
            if joint[j].num_states != var.num_states {
                return Err(PotentialError::InvalidArgument(format!(
                    "variable {} has {} states here and {} in the joint domain",
                    var.id, var.num_states, joint[j].num_states
                )));
            }
            out[j] = isize::try_from(s).map_err(|_| {
                PotentialError::SizeMismatch(format!("stride {s} overflows isize"))
            })?;
        }
        Ok(out)
    }

    /// Accumulated offsets of this table when iterating over `joint`.
    pub fn accumulated_offsets(&self, joint: &[Variable]) -> Result<Vec<isize>> {
        let dims: Vec<usize> = joint.iter().map(|v| v.num_states).collect();
        accumulated_offsets(&dims, &self.strides_in(joint)?)
    }
}

/// Union of the potentials' variables in first-appearance order.
pub fn union_variables<'a, I>(potentials: I) -> Result<Vec<Variable>>
where
    I: IntoIterator<Item = &'a TablePotential>,
{
    let mut out: Vec<Variable> = Vec::new();
    for p in potentials {
        for var in &p.variables {
            match out.iter().find(|w| w.id == var.id) {
                Some(w) if w.num_states != var.num_states => {
                    return Err(PotentialError::InvalidArgument(format!(
                        "variable {} has {} and {} states in different potentials",
                        var.id, w.num_states, var.num_states
                    )));
                }
                Some(_) => {}
                None => out.push(*var),
            }
        }
    }
    Ok(out)
}
