//! Infrastructure layer - External dependencies and adapters
//!
//! This layer reads certification packs from disk and normalizes their YAML
//! into the domain types the game core consumes.

pub mod records;
pub mod repositories;

pub use repositories::{FileSystemCertificationRepository, InMemoryCertificationRepository};
