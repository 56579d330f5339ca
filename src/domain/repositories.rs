//! Domain repository traits - Where certification packs come from

use crate::domain::config::CertificationConfig;
use crate::domain::errors::ContentError;
use crate::domain::value_objects::CertificationId;
use async_trait::async_trait;
use serde::Serialize;

/// Listing entry for an available certification
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CertificationSummary {
    pub id: CertificationId,
    pub name: String,
    pub full_name: String,
    pub organization: String,
    pub domain_count: u32,
}

/// Source of certification packs.
///
/// Implementations resolve and normalize raw content; the game core only
/// ever receives a finished [`CertificationConfig`].
#[async_trait]
pub trait CertificationRepository: Send + Sync {
    /// List available certifications, sorted by name
    async fn discover(&self) -> Result<Vec<CertificationSummary>, ContentError>;

    /// Fully load one certification
    async fn load(&self, id: &CertificationId) -> Result<CertificationConfig, ContentError>;
}
