//! Payload classification domain.
//!
//! URL inference, the resolution policy and the payload types that flow
//! from the decoders to the dispatcher.

pub mod error;
pub mod inference;
mod model;
pub mod resolution;

pub use error::{ClassificationError, FetchError};
pub use inference::infer_type_from_url;
pub use model::{ClassifiedPayload, DecodedPayload, PayloadSource, PayloadType};
pub use resolution::resolve_payload;
