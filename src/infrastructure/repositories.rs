//! Infrastructure implementations of the certification repository

use crate::domain::repositories::{CertificationRepository, CertificationSummary};
use crate::domain::{CertificationConfig, CertificationId, ContentError};
use crate::infrastructure::records::{ConfigRecord, IntrosFile, ScenarioFile, ScenarioSources};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

const CONFIG_FILE: &str = "config.yaml";
const INTROS_FILE: &str = "intros.yaml";
const SCENARIOS_DIR: &str = "scenarios";
const COLLECTION_FILES: &[&str] = &["all.yaml", "scenarios.yaml"];

/// Certification packs stored as directories of YAML files:
///
/// ```text
/// <base>/<cert-id>/config.yaml
/// <base>/<cert-id>/scenarios/domain_1.yaml ... domain_N.yaml
/// <base>/<cert-id>/scenarios/all.yaml | scenarios.yaml
/// <base>/<cert-id>/intros.yaml
/// ```
pub struct FileSystemCertificationRepository {
    base_path: PathBuf,
}

impl FileSystemCertificationRepository {
    pub fn new<P: Into<PathBuf>>(base_path: P) -> Self {
        Self {
            base_path: base_path.into(),
        }
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    fn certification_path(&self, id: &CertificationId) -> PathBuf {
        self.base_path.join(id.as_str())
    }

    async fn read_yaml<T: DeserializeOwned>(path: &Path) -> Result<T, ContentError> {
        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| ContentError::io(path, e))?;
        serde_yaml::from_str(&content).map_err(|e| ContentError::yaml(path, e))
    }

    /// Read an optional pack file. Missing files are `None`; unreadable or
    /// malformed ones are logged and treated as missing.
    async fn read_optional_yaml<T: DeserializeOwned>(path: &Path) -> Option<T> {
        if !tokio::fs::try_exists(path).await.unwrap_or(false) {
            return None;
        }
        match Self::read_yaml(path).await {
            Ok(value) => Some(value),
            Err(e) => {
                log::warn!("Could not load {}: {}", path.display(), e);
                None
            }
        }
    }

    async fn load_scenario_sources(cert_path: &Path, domain_count: u32) -> ScenarioSources {
        let scenarios_path = cert_path.join(SCENARIOS_DIR);
        let mut sources = ScenarioSources::default();

        for domain in 1..=domain_count {
            let path = scenarios_path.join(format!("domain_{}.yaml", domain));
            if let Some(file) = Self::read_optional_yaml::<ScenarioFile>(&path).await {
                log::debug!(
                    "Loaded {} scenarios from {}",
                    file.scenarios.len(),
                    path.display()
                );
                sources.numbered.insert(domain, file);
            }
        }

        for name in COLLECTION_FILES {
            let path = scenarios_path.join(name);
            if let Some(file) = Self::read_optional_yaml::<ScenarioFile>(&path).await {
                log::debug!(
                    "Loaded {} scenarios from {}",
                    file.scenarios.len(),
                    path.display()
                );
                sources.collections.push((name.to_string(), file));
            }
        }

        sources
    }
}

#[async_trait]
impl CertificationRepository for FileSystemCertificationRepository {
    async fn discover(&self) -> Result<Vec<CertificationSummary>, ContentError> {
        let mut summaries = Vec::new();

        if !tokio::fs::try_exists(&self.base_path).await.unwrap_or(false) {
            log::debug!(
                "Certifications directory {} does not exist",
                self.base_path.display()
            );
            return Ok(summaries);
        }

        let mut entries = tokio::fs::read_dir(&self.base_path)
            .await
            .map_err(|e| ContentError::io(&self.base_path, e))?;

        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| ContentError::io(&self.base_path, e))?
        {
            let path = entry.path();
            let config_path = path.join(CONFIG_FILE);
            if !path.is_dir() || !config_path.exists() {
                continue;
            }
            let Some(dir_name) = path.file_name().and_then(|n| n.to_str()) else {
                continue;
            };

            match Self::read_yaml::<ConfigRecord>(&config_path).await {
                Ok(record) => {
                    let (_, name, full_name) = record.identity(dir_name);
                    summaries.push(CertificationSummary {
                        id: CertificationId::from(dir_name),
                        name,
                        full_name,
                        organization: record.certification.organization.clone(),
                        domain_count: record.domains.count,
                    });
                }
                Err(e) => log::warn!("Skipping certification in {}: {}", path.display(), e),
            }
        }

        summaries.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(summaries)
    }

    async fn load(&self, id: &CertificationId) -> Result<CertificationConfig, ContentError> {
        let cert_path = self.certification_path(id);
        let config_path = cert_path.join(CONFIG_FILE);

        if !tokio::fs::try_exists(&config_path).await.unwrap_or(false) {
            return Err(ContentError::not_found(id.clone(), config_path));
        }

        let record: ConfigRecord = Self::read_yaml(&config_path).await?;
        if record.domains.count == 0 {
            return Err(ContentError::invalid_certification(
                id.clone(),
                "domains.count must be at least 1",
            ));
        }

        let sources = Self::load_scenario_sources(&cert_path, record.domains.count).await;
        let scenarios = sources.into_scenarios(record.domains.count, &record.theme_keys());
        let intros = Self::read_optional_yaml::<IntrosFile>(&cert_path.join(INTROS_FILE))
            .await
            .map(IntrosFile::into_intros)
            .unwrap_or_default();

        let config = record.into_config(id.as_str(), scenarios, intros);
        log::info!(
            "Loaded certification '{}' with {} scenarios across {} domains",
            config.name,
            config.scenario_count(),
            config.domain_count
        );
        Ok(config)
    }
}

/// In-memory implementation for testing
#[derive(Default)]
pub struct InMemoryCertificationRepository {
    certifications: HashMap<CertificationId, CertificationConfig>,
}

impl InMemoryCertificationRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a certification under its own id
    pub fn add_certification(&mut self, config: CertificationConfig) {
        self.certifications.insert(config.id.clone(), config);
    }
}

#[async_trait]
impl CertificationRepository for InMemoryCertificationRepository {
    async fn discover(&self) -> Result<Vec<CertificationSummary>, ContentError> {
        let mut summaries: Vec<CertificationSummary> = self
            .certifications
            .values()
            .map(|config| CertificationSummary {
                id: config.id.clone(),
                name: config.name.clone(),
                full_name: config.full_name.clone(),
                organization: config.organization.clone(),
                domain_count: config.domain_count,
            })
            .collect();
        summaries.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(summaries)
    }

    async fn load(&self, id: &CertificationId) -> Result<CertificationConfig, ContentError> {
        self.certifications
            .get(id)
            .cloned()
            .ok_or_else(|| ContentError::not_found(id.clone(), "<memory>"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(id: &str, name: &str) -> CertificationConfig {
        CertificationConfig {
            id: CertificationId::from(id),
            name: name.to_string(),
            domain_count: 1,
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn in_memory_discover_sorts_by_name() {
        let mut repo = InMemoryCertificationRepository::new();
        repo.add_certification(config("sec", "Security+"));
        repo.add_certification(config("aws", "AWS SAA"));

        let names: Vec<String> = repo
            .discover()
            .await
            .unwrap()
            .into_iter()
            .map(|s| s.name)
            .collect();

        assert_eq!(names, vec!["AWS SAA", "Security+"]);
    }

    #[tokio::test]
    async fn in_memory_load_missing_is_not_found() {
        let repo = InMemoryCertificationRepository::new();
        let err = repo.load(&CertificationId::from("nope")).await.unwrap_err();
        assert!(matches!(err, ContentError::CertificationNotFound { .. }));
    }

    #[tokio::test]
    async fn missing_base_directory_discovers_nothing() {
        let repo = FileSystemCertificationRepository::new("/nonexistent/certquest/packs");
        assert!(repo.discover().await.unwrap().is_empty());
    }
}
