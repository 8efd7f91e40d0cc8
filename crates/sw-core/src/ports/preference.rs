//! Acquisition preference port
//!
//! Persists the sticky "camera access issues" flag across sessions.

use async_trait::async_trait;

use crate::preference::AcquisitionPreference;

#[async_trait]
pub trait AcquisitionPreferencePort: Send + Sync {
    async fn get_preference(&self) -> anyhow::Result<AcquisitionPreference>;

    async fn set_preference(&self, preference: &AcquisitionPreference) -> anyhow::Result<()>;

    async fn reset(&self) -> anyhow::Result<()>;

    async fn has_camera_access_issues(&self) -> anyhow::Result<bool> {
        Ok(self.get_preference().await?.camera_access_issues)
    }
}
