//! Filesystem layer for fpsync
//!
//! Provides the remote-aware path model used to address both sides of a
//! sync, variable expansion for configured paths, and the handful of
//! filesystem operations the mirror driver needs (destination preparation,
//! candidate search, cross-volume-safe log placement).

pub mod config;
pub mod constants;
pub mod error;
pub mod expand;
pub mod io;
pub mod path;

pub use config::ConfigStore;
pub use constants::KnownPath;
pub use error::{Error, Result};
pub use expand::{expand, expand_env, expand_home};
pub use io::{DestinationState, Placement};
pub use path::SyncPath;
