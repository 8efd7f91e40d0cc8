//! # Scanner configuration DTO / 扫描配置 DTO
//!
//! ## Responsibilities / 职责
//!
//! - ✅ Define configuration data structures / 定义配置数据结构
//! - ✅ Provide TOML → DTO mapping / 提供 TOML → DTO 的映射
//!
//! ## Prohibited / 禁止事项
//!
//! ❌ **No validation logic / 禁止验证逻辑**
//!
//! Missing keys fall back to the v1 defaults. Numbers that are not positive
//! or do not fit the field are treated as missing.
//! 缺失的键使用默认值；非正数或越界的数值视为缺失。

use std::path::PathBuf;
use std::time::Duration;

use tracing::warn;

pub const DEFAULT_POLL_INTERVAL_MS: u64 = 500;
pub const DEFAULT_ACQUISITION_TIMEOUT_MS: u64 = 10_000;
pub const DEFAULT_MAX_FAILED_ATTEMPTS: u32 = 3;
pub const DEFAULT_IDEAL_WIDTH: u32 = 1280;
pub const DEFAULT_IDEAL_HEIGHT: u32 = 720;
pub const DEFAULT_FETCH_TIMEOUT_MS: u64 = 15_000;

/// Scanner configuration DTO
/// 扫描器配置 DTO
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScannerConfig {
    /// Frame poll period
    pub poll_interval_ms: u64,

    /// Upper bound for one acquisition strategy
    /// 单个获取策略的超时时间
    pub acquisition_timeout_ms: u64,

    /// Failed sequences before manual mode is recommended
    pub max_failed_attempts: u32,

    pub ideal_width: u32,
    pub ideal_height: u32,

    /// Remote payload fetch timeout
    pub fetch_timeout_ms: u64,

    /// Data directory override (empty = platform default, path info only)
    /// 数据目录覆盖（为空则使用平台默认目录）
    pub data_dir: PathBuf,
}

impl Default for ScannerConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
            acquisition_timeout_ms: DEFAULT_ACQUISITION_TIMEOUT_MS,
            max_failed_attempts: DEFAULT_MAX_FAILED_ATTEMPTS,
            ideal_width: DEFAULT_IDEAL_WIDTH,
            ideal_height: DEFAULT_IDEAL_HEIGHT,
            fetch_timeout_ms: DEFAULT_FETCH_TIMEOUT_MS,
            data_dir: PathBuf::new(),
        }
    }
}

impl ScannerConfig {
    /// Create ScannerConfig from TOML value
    /// 从 TOML 值创建 ScannerConfig
    pub fn from_toml(toml_value: &toml::Value) -> anyhow::Result<Self> {
        let get_int = |section: &str, key: &str| {
            toml_value
                .get(section)
                .and_then(|s| s.get(key))
                .and_then(|v| v.as_integer())
        };

        Ok(Self {
            poll_interval_ms: positive(get_int("scanner", "poll_interval_ms"), "poll_interval_ms")
                .unwrap_or(DEFAULT_POLL_INTERVAL_MS),
            acquisition_timeout_ms: positive(get_int("camera", "acquisition_timeout_ms"), "acquisition_timeout_ms")
                .unwrap_or(DEFAULT_ACQUISITION_TIMEOUT_MS),
            max_failed_attempts: positive(get_int("camera", "max_failed_attempts"), "max_failed_attempts")
                .unwrap_or(DEFAULT_MAX_FAILED_ATTEMPTS),
            ideal_width: positive(get_int("camera", "ideal_width"), "ideal_width")
                .unwrap_or(DEFAULT_IDEAL_WIDTH),
            ideal_height: positive(get_int("camera", "ideal_height"), "ideal_height")
                .unwrap_or(DEFAULT_IDEAL_HEIGHT),
            fetch_timeout_ms: positive(get_int("network", "fetch_timeout_ms"), "fetch_timeout_ms")
                .unwrap_or(DEFAULT_FETCH_TIMEOUT_MS),
            data_dir: PathBuf::from(
                toml_value
                    .get("storage")
                    .and_then(|s| s.get("data_dir"))
                    .and_then(|v| v.as_str())
                    .unwrap_or(""),
            ),
        })
    }

    /// Zero falls back to the default period.
    pub fn poll_interval(&self) -> Duration {
        match self.poll_interval_ms {
            0 => Duration::from_millis(DEFAULT_POLL_INTERVAL_MS),
            ms => Duration::from_millis(ms),
        }
    }

    pub fn acquisition_timeout(&self) -> Duration {
        Duration::from_millis(self.acquisition_timeout_ms)
    }

    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_millis(self.fetch_timeout_ms)
    }

    pub fn ideal_resolution(&self) -> (u32, u32) {
        (self.ideal_width, self.ideal_height)
    }
}

/// Accept a TOML integer only if it is positive and fits `T`.
fn positive<T: TryFrom<i64>>(value: Option<i64>, key: &str) -> Option<T> {
    let raw = value?;
    let converted = if raw > 0 { T::try_from(raw).ok() } else { None };
    if converted.is_none() {
        warn!(key, value = raw, "config value out of range, using default");
    }
    converted
}
