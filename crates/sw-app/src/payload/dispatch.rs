use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{info, info_span, warn, Instrument};

use sw_core::navigation::Route;
use sw_core::payload::{ClassificationError, ClassifiedPayload, PayloadType};
use sw_core::ports::{NavigationPort, SessionStorePort};
use sw_core::session::SessionKey;

/// What the dispatcher did.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DispatchOutcome {
    pub route: Route,
    pub stored_under: Option<SessionKey>,
    pub payload_type: Option<PayloadType>,
}

/// Use case: persist a classified payload and navigate on its type.
///
/// 用例：按类型持久化载荷并导航；未知类型或分类失败则返回上一页。
pub struct DispatchPayload {
    session: Arc<dyn SessionStorePort>,
    navigation: Arc<dyn NavigationPort>,
}

impl DispatchPayload {
    pub fn new(session: Arc<dyn SessionStorePort>, navigation: Arc<dyn NavigationPort>) -> Self {
        Self {
            session,
            navigation,
        }
    }

    pub fn from_ports(
        session: Arc<dyn SessionStorePort>,
        navigation: Arc<dyn NavigationPort>,
    ) -> Self {
        Self::new(session, navigation)
    }

    pub async fn execute(
        &self,
        classification: Result<ClassifiedPayload, ClassificationError>,
    ) -> DispatchOutcome {
        let span = info_span!("usecase.dispatch_payload.execute");
        async {
            let outcome = match classification {
                Ok(payload) => self.store(payload).await,
                Err(err) => {
                    warn!(error = %err, "payload classification failed; going back");
                    DispatchOutcome {
                        route: Route::Back,
                        stored_under: None,
                        payload_type: None,
                    }
                }
            };

            if let Err(err) = self.navigation.navigate(outcome.route) {
                warn!(route = ?outcome.route, error = %err, "navigation failed");
            }
            outcome
        }
        .instrument(span)
        .await
    }

    async fn store(&self, payload: ClassifiedPayload) -> DispatchOutcome {
        let payload_type = payload.payload_type;
        let Some(key) = SessionKey::for_payload(payload_type) else {
            warn!(payload_type = %payload_type, "unknown payload type; going back");
            return DispatchOutcome {
                route: Route::Back,
                stored_under: None,
                payload_type: Some(payload_type),
            };
        };

        match self.session.set(key, &payload.body).await {
            Ok(()) => {
                info!(key = %key, "payload stored");
                DispatchOutcome {
                    route: Route::for_payload(payload_type),
                    stored_under: Some(key),
                    payload_type: Some(payload_type),
                }
            }
            Err(err) => {
                warn!(key = %key, error = %err, "failed to store payload; going back");
                DispatchOutcome {
                    route: Route::Back,
                    stored_under: None,
                    payload_type: Some(payload_type),
                }
            }
        }
    }
}
