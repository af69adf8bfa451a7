//! Error types for the glue around the simulations
//!
//! The physics routines themselves never fail; these cover control parsing,
//! entity bookkeeping, configuration and the optional shadow endpoint.

use thiserror::Error;

/// Errors surfaced to the UI layer (logged, never fatal)
#[derive(Debug, Error)]
pub enum SimError {
    #[error("invalid color {0:?} (expected #rrggbb)")]
    InvalidColor(String),

    #[error("at most {max} light sources are allowed")]
    LightLimit { max: usize },

    #[error("the last light source cannot be removed")]
    LastLight,

    #[error("at most {max} pendulums are allowed")]
    PendulumLimit { max: usize },

    #[error("the last pendulum cannot be removed")]
    LastPendulum,

    #[error("no {kind} at index {index}")]
    NoSuchEntity { kind: &'static str, index: usize },

    #[error("unknown control {0:?}")]
    UnknownControl(String),

    #[error("invalid value {value:?} for control {key:?}")]
    InvalidValue { key: String, value: String },

    #[error("control {0:?} does not apply to the active simulation")]
    WrongScene(String),

    #[error("invalid settings: {0}")]
    Settings(#[from] serde_json::Error),

    #[error("shadow endpoint: {0}")]
    ShadowApi(String),
}

pub type Result<T> = std::result::Result<T, SimError>;
