pub mod decode;
pub mod payload;
pub mod preference_state;
pub mod session;

pub use decode::{ImageCrateRasterizer, RqrrQrDecoder};
pub use payload::HttpPayloadFetcher;
pub use preference_state::FileAcquisitionPreferenceRepository;
pub use session::{FileSessionStore, InMemorySessionStore};
