//! # Configuration Loader / 配置加载器
//!
//! ## Responsibilities / 职责
//!
//! - ✅ Read TOML configuration files / 读取 TOML 配置文件
//! - ✅ Parse TOML into ScannerConfig DTO / 将 TOML 解析为 ScannerConfig DTO
//! - ✅ Report I/O and parsing errors with context / 报告带上下文的 I/O 和解析错误
//!
//! ## Prohibited / 禁止事项
//!
//! ❌ **No validation logic / 禁止验证逻辑**
//! ❌ **No business rules / 禁止业务规则**
//!
//! Missing keys take the defaults defined next to the DTO in `sw-core`.

use anyhow::Context;
use std::path::{Path, PathBuf};
use sw_core::config::ScannerConfig;

/// Load configuration from a TOML file
/// 从 TOML 文件加载配置
///
/// # Errors / 错误
///
/// Returns error if:
/// - File cannot be read (I/O error)
/// - Content is not valid TOML (parse error)
pub fn load_config(config_path: PathBuf) -> anyhow::Result<ScannerConfig> {
    let content = std::fs::read_to_string(&config_path)
        .with_context(|| format!("Failed to read config file: {}", config_path.display()))?;
    let toml_value: toml::Value =
        toml::from_str(&content).context("Failed to parse config as TOML")?;
    ScannerConfig::from_toml(&toml_value)
}

/// Explicit path, else `config.toml` in the working directory, else defaults.
pub fn resolve_config(explicit: Option<&Path>) -> anyhow::Result<ScannerConfig> {
    if let Some(path) = explicit {
        return load_config(path.to_path_buf());
    }

    let local = PathBuf::from("config.toml");
    if local.is_file() {
        return load_config(local);
    }

    Ok(ScannerConfig::default())
}
