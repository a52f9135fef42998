//! Utility constants and index conversions shared by the kernels

/// Result size from which the multiplier runs on the rayon pool
pub const PAR_THRESHOLD: usize = 64 * 1024;
/// Output elements per parallel chunk
pub const DEFAULT_CHUNK_LEN: usize = 16 * 1024;
/// SIMD lane count of `wide::f64x4`
pub const LANES: usize = 4;

/// Convert a validated table position to an index.
#[inline]
#[must_use]
pub fn isize_to_usize(x: isize) -> usize {
    debug_assert!(x >= 0, "table position must be non-negative");
    #[allow(clippy::cast_sign_loss)]
    {
        x as usize
    }
}
