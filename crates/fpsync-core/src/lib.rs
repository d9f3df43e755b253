//! Domain layer for fpsync
//!
//! Two components sit on top of the external mirroring tool:
//!
//! - the [`MirrorDriver`], which turns one mirror request into one or two
//!   tool invocations and keeps a persistent log of the run;
//! - the [`BatchSynchronizer`], which expands a declarative [`Manifest`]
//!   and a [`Direction`] into transfers and launches the Mirror Driver for
//!   each of them, one at a time.
//!
//! Every external command goes through a [`CommandRunner`], and the
//! run-wide switches travel in an [`ExecutionContext`] value.

pub mod batch;
pub mod context;
pub mod direction;
pub mod error;
pub mod hooks;
pub mod manifest;
pub mod mirror;
pub mod runner;
pub mod transfer;

pub use batch::{
    BatchOptions, BatchReport, BatchSynchronizer, InProcessLauncher, MirrorLauncher,
    SubprocessLauncher, TransferOutcome, default_mirror_program,
};
pub use context::{Console, ExecutionContext, NullConsole};
pub use direction::{Direction, Pass, PassDirection};
pub use error::{Error, Result};
pub use hooks::{HookConfig, HookContext, HookEvent, run_hooks};
pub use manifest::{Builtins, Manifest, ManifestEntry};
pub use mirror::{
    MirrorDriver, MirrorOptions, MirrorReport, MirrorRequest, SyncMode, default_log_path,
    split_passthrough,
};
pub use runner::{CapturedOutput, CommandRunner, Invocation, SystemRunner};
pub use transfer::{TransferRequest, plan_transfers, render_sources};
