//! Command-line front ends for fpsync
//!
//! Shared by the `fpsync` (batch) and `fpmirror` (single mirror) binaries.

pub mod cli;
pub mod commands;
pub mod console;
pub mod error;
pub mod logging;
