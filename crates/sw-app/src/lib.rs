//! SSI Wallet Scanner Application Layer
//!
//! This crate contains the scanner use cases and the screen controller that
//! orchestrates them.

pub mod camera;
pub mod controller;
pub mod deps;
pub mod payload;
pub mod scan;

pub use controller::{ScannerController, ScreenError, ScreenSnapshot};
pub use deps::ScannerDeps;
