//! Host navigation adapter.
//!
//! The CLI has no router; navigation requests are logged and recorded so
//! the command can report where the screen would have gone.
//!
//! CLI 没有路由，导航请求仅记录，供命令输出使用。

use std::sync::Mutex;

use sw_core::navigation::Route;
use sw_core::ports::NavigationPort;
use tracing::info;

#[derive(Debug, Default)]
pub struct RecordingNavigator {
    routes: Mutex<Vec<Route>>,
}

impl RecordingNavigator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Most recent navigation, if any.
    pub fn last(&self) -> Option<Route> {
        self.routes.lock().ok().and_then(|r| r.last().copied())
    }

    pub fn history(&self) -> Vec<Route> {
        self.routes.lock().map(|r| r.clone()).unwrap_or_default()
    }
}

impl NavigationPort for RecordingNavigator {
    fn navigate(&self, route: Route) -> anyhow::Result<()> {
        info!(route = ?route, path = route.path(), "navigate");
        self.routes
            .lock()
            .map_err(|_| anyhow::anyhow!("navigation history lock poisoned"))?
            .push(route);
        Ok(())
    }
}
