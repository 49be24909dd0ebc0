use thiserror::Error;

/// Rejected engine configuration.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("alphabet must contain at least one character")]
    EmptyAlphabet,
    #[error("minimum timer period must be greater than zero")]
    ZeroPeriod,
    #[error("reveal probability must be within [0, 1], got {0}")]
    RevealProbability(f64),
}
