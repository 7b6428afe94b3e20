//! # fpak Core Library
//!
//! This crate contains the command-line front-end of `fpak`: it takes the raw
//! process arguments, finds the subcommand, layers process-wide and
//! command-specific option parsing, runs the command and turns the result
//! into output and an exit status.
//!
//! The binary is a thin wrapper around [`Dispatcher`]; the same pieces can be
//! reused with a different command table.
//!
//! ## Modules Overview
//! - [`args`] – Splitting the command name out of the argument vector
//! - [`registry`] – The ordered command table and its help listing
//! - [`options`] – Layered option parsing (scope, command and global flags)
//! - [`dispatch`] – Resolving and running a command
//! - [`report`] – Help and error output, exit status
//! - [`dir`] – Per-scope installation directories
//! - [`repo`] – Repository configuration (`repo/config.toml`)
//! - [`config`] – Where installations live, read from the environment
//! - [`builtins`] – The built-in commands


pub mod args;
pub mod registry;
pub mod options;
pub mod dispatch;
pub mod report;
pub mod error;
pub mod dir;
pub mod repo;
pub mod config;
pub mod logging;
pub mod builtins;

pub use args::*;
pub use registry::*;
pub use options::*;
pub use dispatch::*;
pub use report::*;
pub use error::Error;
pub use dir::*;
pub use repo::*;
pub use config::*;
