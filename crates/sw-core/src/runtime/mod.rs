//! Runtime environment facts that shape the camera strategy and guidance.
//!
//! 运行环境信息：是否为已安装应用、是否 Android、是否安全上下文、浏览器类型。

use serde::{Deserialize, Serialize};

/// Browser family detected from the user agent.
///
/// `Unknown` is a valid result, guidance simply degrades to generic text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum BrowserKind {
    Chrome,
    Firefox,
    Safari,
    Edge,
    Opera,
    SamsungInternet,
    UcBrowser,
    #[default]
    Unknown,
}

impl BrowserKind {
    pub fn display_name(&self) -> &'static str {
        match self {
            BrowserKind::Chrome => "Chrome",
            BrowserKind::Firefox => "Firefox",
            BrowserKind::Safari => "Safari",
            BrowserKind::Edge => "Edge",
            BrowserKind::Opera => "Opera",
            BrowserKind::SamsungInternet => "Samsung Internet",
            BrowserKind::UcBrowser => "UC Browser",
            BrowserKind::Unknown => "unknown",
        }
    }

    /// Browser specific hint shown next to a camera denial.
    pub fn permission_hint(&self) -> Option<&'static str> {
        match self {
            BrowserKind::Safari => Some(
                "Safari may require explicit permission in Settings. Check both website settings and camera permissions.",
            ),
            BrowserKind::Chrome => Some(
                "Chrome requires HTTPS for camera access. Check the camera icon in the address bar to manage permissions.",
            ),
            BrowserKind::Firefox => Some(
                "Firefox may block camera access. Click the camera icon in the address bar to allow access.",
            ),
            BrowserKind::Edge => {
                Some("Edge requires permission to be granted. Check the camera icon in the address bar.")
            }
            BrowserKind::SamsungInternet => Some(
                "Samsung Internet may require permissions to be set in both browser and device settings.",
            ),
            BrowserKind::UcBrowser => {
                Some("UC Browser may have additional security settings blocking camera access.")
            }
            BrowserKind::Opera | BrowserKind::Unknown => None,
        }
    }
}

impl std::fmt::Display for BrowserKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.display_name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct BrowserInfo {
    pub kind: BrowserKind,
    /// `major.minor`, when the user agent carries one.
    pub version: Option<String>,
}

impl BrowserInfo {
    pub fn new(kind: BrowserKind, version: Option<String>) -> Self {
        Self { kind, version }
    }

    pub fn unknown() -> Self {
        Self::default()
    }
}

/// Environment facts computed once at mount and never mutated afterwards.
///
/// 挂载时计算一次，之后不可变。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuntimeContext {
    /// Standalone display mode or launched from the home screen.
    pub is_installed_app: bool,
    pub is_android: bool,
    pub is_secure_context: bool,
    pub browser: BrowserInfo,
}

impl Default for RuntimeContext {
    fn default() -> Self {
        Self {
            is_installed_app: false,
            is_android: false,
            is_secure_context: true,
            browser: BrowserInfo::unknown(),
        }
    }
}
