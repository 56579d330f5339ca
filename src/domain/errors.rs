//! Domain errors - Failures raised while loading certification content
//!
//! Gameplay itself has no error path: missing content resolves through
//! fallback chains and invalid input is re-prompted. Only the content
//! boundary can fail.

use crate::domain::value_objects::{CertificationId, ScenarioId};
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ContentError {
    #[error("Certification not found: {id} (looked in {path})")]
    CertificationNotFound { id: CertificationId, path: PathBuf },

    #[error("Failed to read {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse {path}")]
    Yaml {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("Invalid certification '{id}': {reason}")]
    InvalidCertification { id: CertificationId, reason: String },

    #[error("Invalid scenario '{id}': {reason}")]
    InvalidScenario { id: ScenarioId, reason: String },
}

impl ContentError {
    pub fn not_found(id: impl Into<CertificationId>, path: impl Into<PathBuf>) -> Self {
        Self::CertificationNotFound {
            id: id.into(),
            path: path.into(),
        }
    }

    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub fn yaml(path: impl Into<PathBuf>, source: serde_yaml::Error) -> Self {
        Self::Yaml {
            path: path.into(),
            source,
        }
    }

    pub fn invalid_certification(id: impl Into<CertificationId>, reason: impl Into<String>) -> Self {
        Self::InvalidCertification {
            id: id.into(),
            reason: reason.into(),
        }
    }

    pub fn invalid_scenario(id: impl Into<ScenarioId>, reason: impl Into<String>) -> Self {
        Self::InvalidScenario {
            id: id.into(),
            reason: reason.into(),
        }
    }
}
