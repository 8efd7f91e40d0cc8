//! Session store adapters.

mod file;
mod memory;

pub use file::{FileSessionStore, DEFAULT_SESSION_FILE};
pub use memory::InMemorySessionStore;
