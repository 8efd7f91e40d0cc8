//! Runtime capability detection for the scanner screen.
//!
//! Derives a [`RuntimeContext`] from what the host reports: the user agent,
//! the display mode and the secure-context flag. Computed once per mount.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use sw_core::{BrowserInfo, BrowserKind, RuntimeContext};

/// Raw facts reported by the host.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuntimeProbe {
    pub user_agent: String,
    /// `(display-mode: standalone)` matched.
    #[serde(default)]
    pub display_mode_standalone: bool,
    /// iOS home-screen launch (`navigator.standalone`).
    #[serde(default)]
    pub navigator_standalone: bool,
    /// `None` when the host does not expose the flag.
    #[serde(default)]
    pub is_secure_context: Option<bool>,
}

impl RuntimeProbe {
    pub fn new(user_agent: impl Into<String>) -> Self {
        Self {
            user_agent: user_agent.into(),
            ..Self::default()
        }
    }
}

/// Build the immutable runtime context for one mount.
///
/// # Detection Logic
///
/// - **Installed app**: standalone display mode or home-screen launch
/// - **Android**: case-insensitive `android` in the user agent
/// - **Secure context**: the host flag, assumed secure when not exposed
/// - **Browser**: see [`detect_browser`]
pub fn detect_runtime_context(probe: &RuntimeProbe) -> RuntimeContext {
    let is_installed_app = probe.display_mode_standalone || probe.navigator_standalone;
    let is_android = probe.user_agent.to_lowercase().contains("android");
    let is_secure_context = probe.is_secure_context.unwrap_or(true);
    let browser = detect_browser(&probe.user_agent);

    if !is_secure_context {
        log::warn!("⚠️  Insecure context detected. Camera access will likely be blocked");
    }
    log::info!(
        "Runtime detected: browser={} version={:?} installed_app={} android={}",
        browser.kind,
        browser.version,
        is_installed_app,
        is_android
    );

    RuntimeContext {
        is_installed_app,
        is_android,
        is_secure_context,
        browser,
    }
}

static CHROME_VERSION: Lazy<Option<Regex>> = Lazy::new(|| Regex::new(r"Chrome/(\d+\.\d+)").ok());
static FIREFOX_VERSION: Lazy<Option<Regex>> =
    Lazy::new(|| Regex::new(r"Firefox/(\d+\.\d+)").ok());
static SAFARI_VERSION: Lazy<Option<Regex>> =
    Lazy::new(|| Regex::new(r"Version/(\d+\.\d+)").ok());
static EDGE_VERSION: Lazy<Option<Regex>> = Lazy::new(|| Regex::new(r"Edg/(\d+\.\d+)").ok());
static OPERA_VERSION: Lazy<Option<Regex>> = Lazy::new(|| Regex::new(r"OPR/(\d+\.\d+)").ok());
static SAMSUNG_VERSION: Lazy<Option<Regex>> =
    Lazy::new(|| Regex::new(r"SamsungBrowser/(\d+\.\d+)").ok());
static UC_VERSION: Lazy<Option<Regex>> = Lazy::new(|| Regex::new(r"UCBrowser/(\d+\.\d+)").ok());

/// Classify the browser family from a user agent string.
///
/// Rules are checked in order and the first match wins:
///
/// 1. `Chrome` without `Edg` or `OPR` → Chrome
/// 2. `Firefox` → Firefox
/// 3. `Safari` without `Chrome` → Safari
/// 4. `Edg` → Edge
/// 5. `OPR` → Opera
/// 6. `SamsungBrowser` → Samsung Internet
/// 7. `UCBrowser` → UC Browser
///
/// Samsung Internet and UC Browser also advertise `Chrome`, so on most
/// devices they are reported as Chrome.
pub fn detect_browser(user_agent: &str) -> BrowserInfo {
    let ua = user_agent;
    let (kind, pattern) = if ua.contains("Chrome") && !ua.contains("Edg") && !ua.contains("OPR")
    {
        (BrowserKind::Chrome, &CHROME_VERSION)
    } else if ua.contains("Firefox") {
        (BrowserKind::Firefox, &FIREFOX_VERSION)
    } else if ua.contains("Safari") && !ua.contains("Chrome") {
        (BrowserKind::Safari, &SAFARI_VERSION)
    } else if ua.contains("Edg") {
        (BrowserKind::Edge, &EDGE_VERSION)
    } else if ua.contains("OPR") {
        (BrowserKind::Opera, &OPERA_VERSION)
    } else if ua.contains("SamsungBrowser") {
        (BrowserKind::SamsungInternet, &SAMSUNG_VERSION)
    } else if ua.contains("UCBrowser") {
        (BrowserKind::UcBrowser, &UC_VERSION)
    } else {
        return BrowserInfo::unknown();
    };

    BrowserInfo::new(kind, capture_version(pattern, ua))
}

fn capture_version(pattern: &Lazy<Option<Regex>>, ua: &str) -> Option<String> {
    let re = Lazy::force(pattern).as_ref()?;
    re.captures(ua)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    const CHROME_ANDROID: &str = "Mozilla/5.0 (Linux; Android 14; Pixel 8) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.6367.82 Mobile Safari/537.36";
    const SAFARI_IOS: &str = "Mozilla/5.0 (iPhone; CPU iPhone OS 17_4 like Mac OS X) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.4 Mobile/15E148 Safari/604.1";
    const FIREFOX_DESKTOP: &str =
        "Mozilla/5.0 (X11; Linux x86_64; rv:125.0) Gecko/20100101 Firefox/125.0";
    const EDGE_DESKTOP: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36 Edg/124.0.2478.51";
    const OPERA_DESKTOP: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/122.0.0.0 Safari/537.36 OPR/108.0.0.0";
    const SAMSUNG: &str = "Mozilla/5.0 (Linux; Android 13; SM-S911B) AppleWebKit/537.36 (KHTML, like Gecko) SamsungBrowser/24.0 Chrome/117.0.0.0 Mobile Safari/537.36";

    #[test]
    fn test_chrome_on_android() {
        let info = detect_browser(CHROME_ANDROID);
        assert_eq!(info.kind, BrowserKind::Chrome);
        assert_eq!(info.version.as_deref(), Some("124.0"));
    }

    #[test]
    fn test_safari_uses_version_token() {
        let info = detect_browser(SAFARI_IOS);
        assert_eq!(info.kind, BrowserKind::Safari);
        assert_eq!(info.version.as_deref(), Some("17.4"));
    }

    #[test]
    fn test_firefox() {
        let info = detect_browser(FIREFOX_DESKTOP);
        assert_eq!(info.kind, BrowserKind::Firefox);
        assert_eq!(info.version.as_deref(), Some("125.0"));
    }

    #[test]
    fn test_edge_and_opera_are_not_chrome() {
        assert_eq!(detect_browser(EDGE_DESKTOP).kind, BrowserKind::Edge);
        assert_eq!(
            detect_browser(EDGE_DESKTOP).version.as_deref(),
            Some("124.0")
        );
        assert_eq!(detect_browser(OPERA_DESKTOP).kind, BrowserKind::Opera);
    }

    #[test]
    fn test_samsung_advertising_chrome_is_reported_as_chrome() {
        assert_eq!(detect_browser(SAMSUNG).kind, BrowserKind::Chrome);
    }

    #[test]
    fn test_samsung_without_chrome_token() {
        let info = detect_browser("Mozilla/5.0 (Linux; Android 9) SamsungBrowser/9.2");
        assert_eq!(info.kind, BrowserKind::SamsungInternet);
        assert_eq!(info.version.as_deref(), Some("9.2"));
    }

    #[test]
    fn test_unknown_user_agent() {
        let info = detect_browser("curl/8.5.0");
        assert_eq!(info, BrowserInfo::unknown());
    }

    #[test]
    fn test_context_flags() {
        let probe = RuntimeProbe {
            user_agent: CHROME_ANDROID.to_string(),
            display_mode_standalone: true,
            navigator_standalone: false,
            is_secure_context: Some(false),
        };

        let ctx = detect_runtime_context(&probe);

        assert!(ctx.is_installed_app);
        assert!(ctx.is_android);
        assert!(!ctx.is_secure_context);
        assert_eq!(ctx.browser.kind, BrowserKind::Chrome);
    }

    #[test]
    fn test_missing_secure_flag_is_assumed_secure() {
        let mut probe = RuntimeProbe::new(SAFARI_IOS);
        probe.navigator_standalone = true;

        let ctx = detect_runtime_context(&probe);

        assert!(ctx.is_secure_context);
        assert!(ctx.is_installed_app);
        assert!(!ctx.is_android);
    }
}
