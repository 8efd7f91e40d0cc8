//! # sw-shell
//!
//! Composition root: loads configuration, initialises tracing, wires the
//! infrastructure and platform adapters into the application layer, and
//! exposes the command functions used by the CLI.

pub mod adapters;
pub mod bootstrap;
pub mod commands;
