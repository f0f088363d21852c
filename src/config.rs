use crate::error::{Result, SkiplistError};
use crate::level::{GeometricLevelGenerator, LevelGenerator, UniformLevelGenerator};
use log::debug;
use std::env;

pub const DEFAULT_MAX_LEVEL: usize = 16;

pub const MAX_LEVEL_KEY: &str = "SKIPLIST_MAX_LEVEL";
pub const LEVELS_KEY: &str = "SKIPLIST_LEVELS";
pub const SEED_KEY: &str = "SKIPLIST_SEED";

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum LevelDistribution {
    Uniform,
    /// Promotion probability per layer.
    Geometric(f64),
}

impl Default for LevelDistribution {
    fn default() -> Self {
        LevelDistribution::Uniform
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct SkiplistConfig {
    pub max_level: usize,
    pub distribution: LevelDistribution,
    /// `None` seeds from entropy.
    pub seed: Option<u64>,
}

impl Default for SkiplistConfig {
    fn default() -> Self {
        Self {
            max_level: DEFAULT_MAX_LEVEL,
            distribution: LevelDistribution::Uniform,
            seed: None,
        }
    }
}

impl SkiplistConfig {
    pub fn new(max_level: usize) -> Self {
        Self {
            max_level,
            ..Self::default()
        }
    }

    pub fn distribution(mut self, distribution: LevelDistribution) -> Self {
        self.distribution = distribution;
        self
    }

    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Reads `SKIPLIST_MAX_LEVEL`, `SKIPLIST_LEVELS` (`uniform` or
    /// `geometric:<p>`) and `SKIPLIST_SEED`; unset keys keep their defaults.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&'static str) -> Option<String>,
    {
        let mut config = Self::default();
        if let Some(val) = lookup(MAX_LEVEL_KEY) {
            config.max_level = parse(MAX_LEVEL_KEY, &val)?;
        }
        if let Some(val) = lookup(LEVELS_KEY) {
            config.distribution = parse_distribution(&val)?;
        }
        if let Some(val) = lookup(SEED_KEY) {
            config.seed = Some(parse(SEED_KEY, &val)?);
        }
        debug!("skiplist config resolved: {:?}", config);
        Ok(config)
    }

    pub fn level_generator(&self) -> Result<Box<dyn LevelGenerator + Send + Sync>> {
        let levels: Box<dyn LevelGenerator + Send + Sync> = match self.distribution {
            LevelDistribution::Uniform => {
                Box::new(UniformLevelGenerator::new(self.max_level, self.seed)?)
            }
            LevelDistribution::Geometric(p) => {
                Box::new(GeometricLevelGenerator::new(self.max_level, p, self.seed)?)
            }
        };
        Ok(levels)
    }
}

fn parse<N: std::str::FromStr>(key: &'static str, val: &str) -> Result<N> {
    val.trim().parse().map_err(|_| SkiplistError::Config {
        key,
        value: val.to_string(),
    })
}

fn parse_distribution(val: &str) -> Result<LevelDistribution> {
    let trimmed = val.trim();
    if trimmed.eq_ignore_ascii_case("uniform") {
        return Ok(LevelDistribution::Uniform);
    }
    match trimmed.split_once(':') {
        Some((kind, p)) if kind.eq_ignore_ascii_case("geometric") => {
            Ok(LevelDistribution::Geometric(parse(LEVELS_KEY, p)?))
        }
        _ => Err(SkiplistError::Config {
            key: LEVELS_KEY,
            value: val.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&'static str, &str)]) -> impl Fn(&'static str) -> Option<String> {
        let map: HashMap<&'static str, String> =
            pairs.iter().map(|(k, v)| (*k, v.to_string())).collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_when_unset() {
        let config = SkiplistConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, SkiplistConfig::default());
        assert_eq!(config.max_level, DEFAULT_MAX_LEVEL);
    }

    #[test]
    fn test_reads_all_keys() {
        let config = SkiplistConfig::from_lookup(lookup(&[
            (MAX_LEVEL_KEY, " 8 "),
            (LEVELS_KEY, "geometric:0.25"),
            (SEED_KEY, "99"),
        ]))
        .unwrap();
        assert_eq!(
            config,
            SkiplistConfig::new(8)
                .distribution(LevelDistribution::Geometric(0.25))
                .seed(99)
        );
    }

    #[test]
    fn test_bad_values() {
        let err = SkiplistConfig::from_lookup(lookup(&[(MAX_LEVEL_KEY, "many")])).unwrap_err();
        assert_eq!(
            err,
            SkiplistError::Config {
                key: MAX_LEVEL_KEY,
                value: "many".to_string()
            }
        );
        assert!(SkiplistConfig::from_lookup(lookup(&[(LEVELS_KEY, "zipf")])).is_err());
        assert!(SkiplistConfig::from_lookup(lookup(&[(LEVELS_KEY, "geometric:x")])).is_err());
    }

    #[test]
    fn test_level_generator_validates() {
        assert!(SkiplistConfig::new(0).level_generator().is_err());
        let config = SkiplistConfig::new(4).distribution(LevelDistribution::Geometric(2.0));
        assert!(config.level_generator().is_err());
        let gen = SkiplistConfig::new(4).level_generator().unwrap();
        assert_eq!(gen.total(), 4);
    }
}
