//! Navigation targets of the scanner screen.

use serde::{Deserialize, Serialize};

use crate::payload::PayloadType;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Route {
    /// Credential offer collection screen.
    CollectCredentials,
    /// Presentation request / credential sharing screen.
    CredentialRequest,
    /// Previous screen.
    Back,
}

impl Route {
    pub fn for_payload(payload_type: PayloadType) -> Route {
        match payload_type {
            PayloadType::CredentialOffer => Route::CollectCredentials,
            PayloadType::PresentationRequest => Route::CredentialRequest,
            PayloadType::Unknown => Route::Back,
        }
    }

    pub fn path(&self) -> &'static str {
        match self {
            Route::CollectCredentials => "/CollectCredentials",
            Route::CredentialRequest => "/CredentialRequest",
            Route::Back => "..",
        }
    }
}
