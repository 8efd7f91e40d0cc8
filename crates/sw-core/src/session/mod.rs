//! Session-scoped storage keys shared with the consuming screens.
//!
//! 会话存储键：写入方与读取方是不同页面。

use serde::{Deserialize, Serialize};

use crate::payload::PayloadType;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionKey {
    CredentialOffer,
    PresentationRequest,
    IdentityVerificationForm,
    SelectedCredentialForSharing,
    CredentialOfferPending,
}

impl SessionKey {
    pub const ALL: [SessionKey; 5] = [
        SessionKey::CredentialOffer,
        SessionKey::PresentationRequest,
        SessionKey::IdentityVerificationForm,
        SessionKey::SelectedCredentialForSharing,
        SessionKey::CredentialOfferPending,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SessionKey::CredentialOffer => "credential_offer",
            SessionKey::PresentationRequest => "presentation_request",
            SessionKey::IdentityVerificationForm => "identity_verification_form",
            SessionKey::SelectedCredentialForSharing => "selected_credential_for_sharing",
            SessionKey::CredentialOfferPending => "credential_offer_pending",
        }
    }

    pub fn parse(s: &str) -> Option<SessionKey> {
        Self::ALL.into_iter().find(|k| k.as_str() == s)
    }

    /// Storage key the dispatcher writes for a classified type.
    pub fn for_payload(payload_type: PayloadType) -> Option<SessionKey> {
        match payload_type {
            PayloadType::CredentialOffer => Some(SessionKey::CredentialOffer),
            PayloadType::PresentationRequest => Some(SessionKey::PresentationRequest),
            PayloadType::Unknown => None,
        }
    }
}

impl std::fmt::Display for SessionKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
