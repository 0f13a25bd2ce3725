//! Brute-force reference enumeration: every colouring of the n×n grid,
//! counted by flood fill. Only feasible for tiny n, which is exactly
//! what the engine tests need.

use crate::dfs;
use crate::engine::EngineConfig;
use ndarray::Array2;
use rayon::prelude::*;

/// Counts the (valid, invalid) n×n colourings by checking all 2^(n²)
/// bitmasks.
pub fn exhaustive_count(n: i32, config: &EngineConfig) -> (u64, u64) {
    let cells = (n * n) as u32;
    assert!(n >= 1 && cells < 64, "exhaustive enumeration needs n*n < 64");
    let total: u64 = 1 << cells;

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(config.workers)
        .build()
        .expect("building worker pool");

    let valid = pool.install(|| {
        (0..total)
            .into_par_iter()
            .filter(|&mask| dfs::has_two_regions(&grid_from_mask(n, mask).view()))
            .count() as u64
    });

    (valid, total - valid)
}

fn grid_from_mask(n: i32, mask: u64) -> Array2<u8> {
    let n = n as usize;
    Array2::from_shape_fn((n, n), |(y, x)| ((mask >> (y * n + x)) & 1) as u8)
}

pub fn exhaustive_enumeration(cases: &[i32], config: &EngineConfig) -> Vec<(i32, u64, u64)> {
    let mut results = Vec::with_capacity(cases.len());
    for &n in cases {
        let (valid, invalid) = exhaustive_count(n, config);
        println!("**** N={n} | grids={valid} | invalid={invalid}");
        results.push((n, valid, invalid));
    }
    results
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_2x2_count() {
        let (valid, invalid) = exhaustive_count(2, &EngineConfig::default());
        assert_eq!(valid, 12);
        assert_eq!(valid + invalid, 16);
    }

    #[test]
    fn test_grid_from_mask() {
        let grid = grid_from_mask(2, 0b0110);
        assert_eq!(grid[[0, 0]], 0);
        assert_eq!(grid[[0, 1]], 1);
        assert_eq!(grid[[1, 0]], 1);
        assert_eq!(grid[[1, 1]], 0);
    }
}
