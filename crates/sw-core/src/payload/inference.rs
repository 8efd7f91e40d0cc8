//! URL-shape type inference.
//!
//! URL shape is a weak hint: it picks the inference path and only becomes
//! the source of truth when the remote body cannot be fetched.

use tracing::debug;
use url::Url;

use super::model::PayloadType;

/// Infer a payload type from the path or the `type` query parameter.
///
/// Path patterns win over the query; malformed URLs yield `None`.
pub fn infer_type_from_url(raw: &str) -> Option<PayloadType> {
    let url = match Url::parse(raw) {
        Ok(url) => url,
        Err(err) => {
            debug!(error = %err, "payload URL did not parse; no inferred type");
            return None;
        }
    };

    let path = url.path();
    if path_matches(path, "offer") || path_matches(path, "credential") {
        return Some(PayloadType::CredentialOffer);
    }
    if path_matches(path, "request") || path_matches(path, "presentation") {
        return Some(PayloadType::PresentationRequest);
    }

    // First `type` pair only, like URLSearchParams::get.
    let type_param = url
        .query_pairs()
        .find(|(key, _)| key == "type")
        .map(|(_, value)| value.into_owned());

    match type_param.as_deref() {
        Some("offer") | Some("credential_offer") => Some(PayloadType::CredentialOffer),
        Some("request") | Some("presentation_request") => Some(PayloadType::PresentationRequest),
        _ => None,
    }
}

/// `/<segment>/` anywhere in the path, or the path starting with `/<segment>`.
fn path_matches(path: &str, segment: &str) -> bool {
    path.contains(&format!("/{segment}/")) || path.starts_with(&format!("/{segment}"))
}
