use thiserror::Error;

/// Crate-wide result type alias.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while configuring a simulation or admitting particles.
///
/// Detection and resolution never fail; every variant here concerns input
/// that is rejected before a step runs.
#[derive(Debug, Error)]
pub enum Error {
    /// A configuration value is out of range.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// A particle would violate the positive finite radius invariant.
    #[error("invalid particle: {0}")]
    InvalidParticle(String),

    /// Configuration text could not be parsed.
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}
