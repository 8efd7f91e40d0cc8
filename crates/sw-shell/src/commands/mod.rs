//! Command functions invoked by the CLI.
//!
//! Each command opens a `command.*` span and returns a serializable DTO.

pub mod dto;
pub mod error;
pub mod scanner;

pub use error::CommandError;
