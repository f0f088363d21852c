use thiserror::Error;

#[derive(Clone, Debug, Error, PartialEq)]
pub enum SkiplistError {
    #[error("max level should equal to or be greater than 1, got {0}")]
    MaxLevel(usize),
    #[error("promotion probability must be in (0, 1), got {0}")]
    Probability(f64),
    #[error("invalid value {value:?} for {key}")]
    Config { key: &'static str, value: String },
}

pub type Result<T> = std::result::Result<T, SkiplistError>;
