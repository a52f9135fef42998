//! Runtime knobs for the multiplication kernels
//
// Thread count is left to rayon (RAYON_NUM_THREADS). The values here only
// decide when and how the joint domain is split across the pool.

use crate::utility::util::{DEFAULT_CHUNK_LEN, PAR_THRESHOLD};

pub const ENV_PARALLEL_THRESHOLD: &str = "POTENTIA_PARALLEL_THRESHOLD";
pub const ENV_CHUNK_LEN: &str = "POTENTIA_CHUNK_LEN";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MultiplyConfig {
    /// Result sizes at or above this run on the rayon pool.
    pub parallel_threshold: usize,
    /// Output elements per parallel chunk.
    pub chunk_len: usize,
    /// Sort operands by table size before multiplying.
    pub reorder: bool,
}

impl Default for MultiplyConfig {
    fn default() -> Self {
        Self {
            parallel_threshold: PAR_THRESHOLD,
            chunk_len: DEFAULT_CHUNK_LEN,
            reorder: true,
        }
    }
}

impl MultiplyConfig {
    /// Defaults overridden by `POTENTIA_PARALLEL_THRESHOLD` / `POTENTIA_CHUNK_LEN`.
    #[must_use]
    pub fn from_env() -> Self {
        let mut cfg = Self::default();
        if let Some(v) = read_usize(ENV_PARALLEL_THRESHOLD) {
            cfg.parallel_threshold = v;
        }
        if let Some(v) = read_usize(ENV_CHUNK_LEN) {
            if v == 0 {
                tracing::warn!(var = ENV_CHUNK_LEN, "chunk length must be positive; keeping default");
            } else {
                cfg.chunk_len = v;
            }
        }
        cfg
    }

    #[must_use]
    pub const fn sequential() -> Self {
        Self {
            parallel_threshold: usize::MAX,
            chunk_len: DEFAULT_CHUNK_LEN,
            reorder: true,
        }
    }
}

fn read_usize(key: &str) -> Option<usize> {
    let raw = std::env::var(key).ok()?;
    match raw.trim().parse::<usize>() {
        Ok(v) => Some(v),
        Err(err) => {
            tracing::warn!(var = key, value = %raw, %err, "ignoring unparsable setting");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_parallel_above_threshold() {
        let cfg = MultiplyConfig::default();
        assert!(cfg.parallel_threshold > 0);
        assert!(cfg.chunk_len > 0);
        assert!(cfg.reorder);
        assert_eq!(MultiplyConfig::sequential().parallel_threshold, usize::MAX);
    }
}
