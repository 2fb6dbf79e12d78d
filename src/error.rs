//! Engine error type
//!
//! Data-quality problems are diagnostics, not errors. Only strict phase
//! resolution and unreadable snapshot/config text surface here.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Subject {subject} references unknown biz-dev phase {phase}")]
    UnresolvedPhase { subject: String, phase: String },

    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

pub type EngineResult<T> = Result<T, EngineError>;
