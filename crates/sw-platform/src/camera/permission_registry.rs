use async_trait::async_trait;
use sw_core::camera::PermissionState;
use sw_core::ports::PermissionRegistryPort;
use tokio::sync::{mpsc, Mutex, RwLock};
use tracing::debug;

const SUBSCRIBER_BUFFER: usize = 8;

/// Permission registry whose state is set by the host.
///
/// 由宿主设置权限状态的注册表，变更会推送给所有订阅者。
pub struct StaticPermissionRegistry {
    state: RwLock<PermissionState>,
    subscribers: Mutex<Vec<mpsc::Sender<PermissionState>>>,
}

impl StaticPermissionRegistry {
    pub fn new(state: PermissionState) -> Self {
        Self {
            state: RwLock::new(state),
            subscribers: Mutex::new(Vec::new()),
        }
    }

    /// Change the state and notify subscribers. Closed channels are dropped.
    pub async fn report(&self, state: PermissionState) {
        *self.state.write().await = state;

        let mut subscribers = self.subscribers.lock().await;
        subscribers.retain(|tx| !tx.is_closed());
        for tx in subscribers.iter() {
            if let Err(e) = tx.try_send(state) {
                debug!(error = %e, "Permission change not delivered");
            }
        }
    }
}

#[async_trait]
impl PermissionRegistryPort for StaticPermissionRegistry {
    async fn query(&self) -> anyhow::Result<PermissionState> {
        Ok(*self.state.read().await)
    }

    async fn subscribe(&self) -> anyhow::Result<mpsc::Receiver<PermissionState>> {
        let (tx, rx) = mpsc::channel(SUBSCRIBER_BUFFER);
        self.subscribers.lock().await.push(tx);
        Ok(rx)
    }
}
