//! Accumulated-offsets kernels for Potentia (pure Rust, SIMD/parallel ready)

pub mod config;
pub mod elementwise;
pub mod tables;
pub mod utility;

pub use config::MultiplyConfig;
pub use elementwise::divide::divide_f64;
pub use elementwise::marginalize::{
    multiply_and_marginalize_f64, multiply_and_marginalize_f64_with,
    multiply_and_marginalize_par_f64,
};
pub use elementwise::multiply::{multiply_f64, multiply_f64_with, multiply_par_f64};
pub use tables::{
    divide_tables, multiply_and_marginalize, multiply_and_marginalize_with, multiply_tables,
    multiply_tables_with,
};
