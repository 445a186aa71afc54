//! Tooling & Integration Layer
//!
//! The command-line front end over the library.

pub mod cli;

pub use cli::{Cli, CliContext, Commands, StoreCommands};
