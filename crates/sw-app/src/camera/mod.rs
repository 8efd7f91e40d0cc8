//! Camera permission negotiation.

mod negotiator;

pub use negotiator::{CameraNegotiator, NegotiatorSettings};
