//! Payload classification, dispatch and consumption use cases.

mod classify;
mod consume;
mod dispatch;

pub use classify::ClassifyPayload;
pub use consume::TakeStoredPayload;
pub use dispatch::{DispatchOutcome, DispatchPayload};
