//! Core data structures and index arithmetic for Potentia (pure Rust)

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod cursor;
pub mod error;
pub mod index;
pub mod offsets;
pub mod table;

pub use cursor::Cursor;
pub use error::{PotentialError, Result};
pub use index::{
    accumulated_offsets, advance, position, product_checked, rank, reachable_range,
    strides_first_fastest, strides_from_accumulated, unrank,
};
pub use offsets::OffsetAccumulate;
pub use table::{union_variables, TablePotential, Variable};
