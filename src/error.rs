//! Configuration errors
//!
//! Numeric faults inside the step are fail-soft (see `sim::guards`) and
//! two-phase ordering is enforced by types, so configuration is the only
//! fallible surface.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid config value `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}
