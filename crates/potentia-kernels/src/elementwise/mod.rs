//! Elementwise kernels over a joint variable domain

pub mod divide;
pub mod marginalize;
pub mod multiply;
