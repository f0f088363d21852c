//! Level generators decide how many layers a freshly inserted element spans.
//!
//! `random()` must return a value in `[0, total())`; the element is linked
//! into layers `0..=random()`.

use crate::error::{Result, SkiplistError};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

pub trait LevelGenerator {
    fn random(&mut self) -> usize;
    fn total(&self) -> usize;
}

fn make_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}

/// Draws the top level uniformly from `[0, total)`.
///
/// This is not the classical skiplist distribution: an element is as likely
/// to reach the top layer as to stay at the bottom one, so the upper layers
/// are much denser than with geometric decay.
pub struct UniformLevelGenerator {
    total: usize,
    rng: StdRng,
}

impl UniformLevelGenerator {
    pub fn new(total: usize, seed: Option<u64>) -> Result<Self> {
        if total < 1 {
            return Err(SkiplistError::MaxLevel(total));
        }
        Ok(Self {
            total,
            rng: make_rng(seed),
        })
    }
}

impl LevelGenerator for UniformLevelGenerator {
    fn random(&mut self) -> usize {
        self.rng.gen_range(0..self.total)
    }

    fn total(&self) -> usize {
        self.total
    }
}

/// Promotes an element one more layer with probability `p`, capped at
/// `total - 1`.
pub struct GeometricLevelGenerator {
    total: usize,
    p: f64,
    rng: StdRng,
}

impl GeometricLevelGenerator {
    pub fn new(total: usize, p: f64, seed: Option<u64>) -> Result<Self> {
        if total < 1 {
            return Err(SkiplistError::MaxLevel(total));
        }
        if !(p > 0.0 && p < 1.0) {
            return Err(SkiplistError::Probability(p));
        }
        Ok(Self {
            total,
            p,
            rng: make_rng(seed),
        })
    }
}

impl LevelGenerator for GeometricLevelGenerator {
    fn random(&mut self) -> usize {
        let mut h = 0;
        while h + 1 < self.total && self.rng.gen_bool(self.p) {
            h += 1;
        }
        h
    }

    fn total(&self) -> usize {
        self.total
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uniform_in_range_and_covers() {
        let mut gen = UniformLevelGenerator::new(4, Some(7)).unwrap();
        let mut seen = [0usize; 4];
        for _ in 0..4000 {
            let l = gen.random();
            assert!(l < 4);
            seen[l] += 1;
        }
        // roughly 1000 each
        for n in seen.iter() {
            assert!(*n > 700, "{:?}", seen);
        }
    }

    #[test]
    fn test_geometric_in_range_and_decays() {
        let mut gen = GeometricLevelGenerator::new(8, 0.5, Some(7)).unwrap();
        let mut seen = [0usize; 8];
        for _ in 0..8000 {
            let l = gen.random();
            assert!(l < 8);
            seen[l] += 1;
        }
        assert!(seen[0] > seen[1] && seen[1] > seen[2], "{:?}", seen);
    }

    #[test]
    fn test_single_level() {
        let mut gen = GeometricLevelGenerator::new(1, 0.9, None).unwrap();
        assert_eq!(gen.random(), 0);
        let mut gen = UniformLevelGenerator::new(1, None).unwrap();
        assert_eq!(gen.random(), 0);
    }

    #[test]
    fn test_rejects_bad_arguments() {
        assert_eq!(
            UniformLevelGenerator::new(0, None).err(),
            Some(SkiplistError::MaxLevel(0))
        );
        assert_eq!(
            GeometricLevelGenerator::new(3, 1.0, None).err(),
            Some(SkiplistError::Probability(1.0))
        );
    }

    #[test]
    fn test_seed_is_deterministic() {
        let mut a = UniformLevelGenerator::new(16, Some(42)).unwrap();
        let mut b = UniformLevelGenerator::new(16, Some(42)).unwrap();
        let xs: Vec<usize> = (0..32).map(|_| a.random()).collect();
        let ys: Vec<usize> = (0..32).map(|_| b.random()).collect();
        assert_eq!(xs, ys);
    }
}
