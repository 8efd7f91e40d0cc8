use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppDirs {
    pub app_data_root: PathBuf,
}

impl AppDirs {
    pub fn logs_dir(&self) -> PathBuf {
        self.app_data_root.join("logs")
    }

    pub fn preference_path(&self) -> PathBuf {
        self.app_data_root.join(".acquisition_preference")
    }

    pub fn session_path(&self) -> PathBuf {
        self.app_data_root.join("session.json")
    }
}
