//! Shared test utilities for the fpsync workspace.
//!
//! Dev-dependency only, never published.
//!
//! # Modules
//!
//! - [`runner`] — [`RecordingRunner`] and [`RecordingConsole`], stand-ins
//!   for real processes and the terminal
//! - [`tree`] — [`SyncTree`], a temporary pair of directories plus a
//!   manifest writer

pub mod runner;
pub mod tree;

pub use runner::{RecordingConsole, RecordingRunner};
pub use tree::SyncTree;
