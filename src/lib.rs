//! `ssi-wallet` command line.
//!
//! Thin clap front-end over the shell commands. Every subcommand prints a
//! JSON document on stdout; logs go to stderr and the app data `logs/` dir.

pub mod cli;

pub use cli::{run, Cli, Command};
