//! Simulation error types.
//!
//! Invalid transitions and unknown difficulty ids are not errors (they are
//! rejected in place). What remains is configuration problems and numeric
//! corruption of the simulation, which the host must answer with a restart.

use std::fmt;

/// Which simulated entity a value belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Entity {
    Ball,
    PaddleOne,
    PaddleTwo,
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ball => write!(f, "ball"),
            Self::PaddleOne => write!(f, "paddle one"),
            Self::PaddleTwo => write!(f, "paddle two"),
        }
    }
}

/// Top-level error enum for the simulation core.
#[derive(Debug, Clone, PartialEq)]
pub enum SimError {
    /// A position, velocity or speed became NaN or infinite during a tick.
    /// The match can no longer be trusted and must be restarted.
    NonFinite {
        entity: Entity,
        /// Name of the offending field (for logging).
        field: &'static str,
    },

    /// A settings value is outside its valid range.
    InvalidSetting {
        name: &'static str,
        value: f64,
        /// Human-readable description of the valid range.
        expected: &'static str,
    },

    /// Settings JSON could not be parsed.
    Config(String),
}

impl fmt::Display for SimError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NonFinite { entity, field } => {
                write!(f, "non-finite {entity} {field}; match must be restarted")
            }
            Self::InvalidSetting {
                name,
                value,
                expected,
            } => write!(f, "invalid setting {name} = {value} (expected {expected})"),
            Self::Config(msg) => write!(f, "failed to parse settings: {msg}"),
        }
    }
}

impl std::error::Error for SimError {}

impl From<serde_json::Error> for SimError {
    fn from(err: serde_json::Error) -> Self {
        Self::Config(err.to_string())
    }
}
