/*
 * Error Module
 *
 * The simulation core has no runtime failure modes (numerical edge cases are
 * absorbed in place), so the only errors are in loading configuration.
 */

use thiserror::Error;

// Errors emitted while loading or validating simulation parameters.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read configuration: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse configuration: {0}")]
    Parse(#[from] serde_json::Error),

    // Values that cannot drive a simulation (e.g. non-positive cell size).
    #[error("invalid configuration: {0}")]
    Invalid(&'static str),
}
