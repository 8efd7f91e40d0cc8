//! File-based acquisition preference repository
//!
//! Persists the sticky camera-issues flag to a small JSON file in the
//! application data directory.

use async_trait::async_trait;
use std::path::PathBuf;
use sw_core::ports::AcquisitionPreferencePort;
use sw_core::AcquisitionPreference;
use tokio::fs;
use tokio::io::AsyncWriteExt;

pub const DEFAULT_PREFERENCE_FILE: &str = ".acquisition_preference";

pub struct FileAcquisitionPreferenceRepository {
    preference_file_path: PathBuf,
}

impl FileAcquisitionPreferenceRepository {
    /// Create repository with custom file path
    pub fn new(preference_file_path: PathBuf) -> Self {
        Self {
            preference_file_path,
        }
    }

    /// Create repository with base dir and filename
    pub fn with_base_dir(base_dir: PathBuf, filename: impl Into<String>) -> Self {
        Self {
            preference_file_path: base_dir.join(filename.into()),
        }
    }

    /// Create repository with defaults
    pub fn with_defaults(base_dir: PathBuf) -> Self {
        Self {
            preference_file_path: base_dir.join(DEFAULT_PREFERENCE_FILE),
        }
    }

    async fn ensure_parent_dir(&self) -> anyhow::Result<()> {
        if let Some(parent) = self.preference_file_path.parent() {
            fs::create_dir_all(parent).await?;
        }
        Ok(())
    }
}

#[async_trait]
impl AcquisitionPreferencePort for FileAcquisitionPreferenceRepository {
    async fn get_preference(&self) -> anyhow::Result<AcquisitionPreference> {
        if !self.preference_file_path.exists() {
            return Ok(AcquisitionPreference::default());
        }

        let content = fs::read_to_string(&self.preference_file_path).await?;

        if content.trim().is_empty() {
            return Ok(AcquisitionPreference::default());
        }

        let preference: AcquisitionPreference = serde_json::from_str(&content)
            .map_err(|e| anyhow::anyhow!("Failed to parse acquisition preference: {}", e))?;

        Ok(preference)
    }

    async fn set_preference(&self, preference: &AcquisitionPreference) -> anyhow::Result<()> {
        self.ensure_parent_dir().await?;

        let json = serde_json::to_string_pretty(preference)
            .map_err(|e| anyhow::anyhow!("Failed to serialize acquisition preference: {}", e))?;

        let mut file = fs::File::create(&self.preference_file_path)
            .await
            .map_err(|e| anyhow::anyhow!("Failed to create preference file: {}", e))?;

        file.write_all(json.as_bytes())
            .await
            .map_err(|e| anyhow::anyhow!("Failed to write preference file: {}", e))?;

        file.sync_all()
            .await
            .map_err(|e| anyhow::anyhow!("Failed to sync preference file: {}", e))?;

        Ok(())
    }

    async fn reset(&self) -> anyhow::Result<()> {
        if self.preference_file_path.exists() {
            fs::remove_file(&self.preference_file_path).await?;
        }
        Ok(())
    }
}
