//! CLI module for adloop - command-line interface.

pub mod commands;

pub use commands::Cli;
