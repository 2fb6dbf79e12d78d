//! Engine configuration
//!
//! Passed explicitly to every call; nothing is read from the environment.

use crate::error::EngineResult;
use serde::{Deserialize, Serialize};

/// Id of the synthetic "no value" pivot column and phase bucket
pub const UNASSIGNED_ID: &str = "none";

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Fail instead of bucketing subjects whose phase id resolves to nothing
    pub strict_phase_resolution: bool,

    /// Append an "unassigned" column to pivot matrices
    pub unassigned_column: bool,

    /// Label of the "no phase" bucket node and the unassigned column
    pub no_phase_label: String,

    /// Entries kept per memo cache in [`crate::Engine`]; 0 disables caching
    pub cache_capacity: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            strict_phase_resolution: false,
            unassigned_column: false,
            no_phase_label: "No phase".to_string(),
            cache_capacity: 32,
        }
    }
}

impl EngineConfig {
    pub fn from_yaml_str(yaml: &str) -> EngineResult<Self> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    pub fn from_json_str(json: &str) -> EngineResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn strict(mut self) -> Self {
        self.strict_phase_resolution = true;
        self
    }
}
