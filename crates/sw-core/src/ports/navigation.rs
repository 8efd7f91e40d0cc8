use crate::navigation::Route;

/// Host navigation (router push / back).
///
/// 页面导航端口。
pub trait NavigationPort: Send + Sync {
    fn navigate(&self, route: Route) -> anyhow::Result<()>;
}
