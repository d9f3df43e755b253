//! The Mirror Driver
//!
//! Runs a one-way mirror or a two-pass timestamp sync between the exact
//! paths it is given, and keeps a persistent log of what the tool said.

mod log;
mod plan;

pub use log::{LogHeader, LogRecord, render_footer};
pub use plan::{MirrorOptions, MirrorRequest, SyncMode, split_passthrough};

use std::path::{Path, PathBuf};

use chrono::Local;
use fpsync_fs::constants::KnownPath;
use fpsync_fs::io::{self as fsio, DestinationState, Placement};

use crate::context::{Console, ExecutionContext};
use crate::error::Result;
use crate::runner::{CommandRunner, Invocation};

/// What a mirror run did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MirrorReport {
    pub invocations: Vec<Invocation>,
    /// Exit code of each executed invocation, in order
    pub exit_codes: Vec<Option<i32>>,
    /// Where the finished log was placed
    pub log_file: Option<PathBuf>,
    pub destination_created: bool,
    /// False in debug mode
    pub executed: bool,
}

impl MirrorReport {
    /// The first unsuccessful exit, as a process exit code.
    ///
    /// A tool killed by a signal is reported as 1.
    pub fn first_failure(&self) -> Option<i32> {
        self.exit_codes.iter().find_map(|code| match code {
            Some(0) => None,
            Some(code) => Some(*code),
            None => Some(1),
        })
    }

    pub fn success(&self) -> bool {
        self.first_failure().is_none()
    }
}

/// Where the log goes when no explicit path is given.
///
/// The first source directory when it is local, else the destination when
/// it is local, else nowhere.
pub fn default_log_path(request: &MirrorRequest) -> Option<PathBuf> {
    let dir = match request.sources.first() {
        Some(source) if !source.is_remote() => local_dir(&source.to_native()),
        _ if !request.destination.is_remote() => request.destination.to_native(),
        _ => return None,
    };
    Some(dir.join(KnownPath::MirrorLog.as_str()))
}

/// A source that names a file is logged next to it.
fn local_dir(path: &Path) -> PathBuf {
    if path.is_file() {
        path.parent().map(Path::to_path_buf).unwrap_or_default()
    } else {
        path.to_path_buf()
    }
}

/// Drives the external mirroring tool for a single request.
pub struct MirrorDriver<'a, R: ?Sized, C: ?Sized> {
    ctx: ExecutionContext,
    runner: &'a mut R,
    console: &'a mut C,
}

impl<'a, R, C> MirrorDriver<'a, R, C>
where
    R: CommandRunner + ?Sized,
    C: Console + ?Sized,
{
    pub fn new(ctx: ExecutionContext, runner: &'a mut R, console: &'a mut C) -> Self {
        Self {
            ctx,
            runner,
            console,
        }
    }

    /// Run every pass of `request`.
    ///
    /// Tool failures do not stop the run: every pass is attempted, the log
    /// is finalised, and the exit codes are reported for the caller to act
    /// on.
    pub fn run(&mut self, request: &MirrorRequest) -> Result<MirrorReport> {
        let invocations = request.plan(&self.ctx)?;
        let mut report = MirrorReport {
            invocations: invocations.clone(),
            ..Default::default()
        };

        let mut record = if request.options.no_log {
            None
        } else {
            Some(LogRecord::begin(&self.header(request))?)
        };

        if !self.ctx.executes() {
            for invocation in &invocations {
                self.console.command(invocation);
            }
            return Ok(report);
        }

        if !request.destination.is_remote() {
            let state = fsio::prepare_destination(&request.destination.to_native())?;
            if state == DestinationState::Created {
                report.destination_created = true;
                if !self.ctx.quiet {
                    self.console
                        .note(&format!("created destination {}", request.destination));
                }
            }
        }

        report.executed = true;
        for invocation in &invocations {
            if self.ctx.echoes_commands() && !self.ctx.quiet {
                self.console.command(invocation);
            }
            let output = self.runner.output(invocation)?;
            if !self.ctx.quiet {
                self.console.output(&output);
            }
            if let Some(record) = record.as_mut() {
                record.record(invocation, &output)?;
            }
            if !output.success() {
                tracing::warn!(command = %invocation, code = ?output.code, "mirroring tool failed");
            }
            report.exit_codes.push(output.code);
        }

        if let Some(record) = record {
            report.log_file = self.finish_log(record, request)?;
        }
        Ok(report)
    }

    fn header(&self, request: &MirrorRequest) -> LogHeader {
        let (sources, destination) = request.endpoints();
        LogHeader {
            started: Local::now(),
            working_dir: std::env::current_dir().unwrap_or_default(),
            sources: sources.iter().map(ToString::to_string).collect(),
            destination: destination.to_string(),
            mode: request.options.sync_mode,
            options: request.common_flags(&self.ctx),
        }
    }

    fn finish_log(
        &mut self,
        record: LogRecord,
        request: &MirrorRequest,
    ) -> Result<Option<PathBuf>> {
        let Some(path) = request
            .options
            .log_file
            .clone()
            .or_else(|| default_log_path(request))
        else {
            tracing::warn!("no local directory to keep the log in, discarding it");
            return Ok(None);
        };

        let placement = if request.options.keep_log {
            Placement::Append
        } else {
            Placement::Replace
        };
        let placed = record.finish(&path, placement)?;
        self.mirror_log_copy(&placed, request);
        Ok(Some(placed))
    }

    /// When the log lives in one of two local synchronized directories,
    /// leave a copy in the other one too.
    fn mirror_log_copy(&mut self, log: &Path, request: &MirrorRequest) {
        let [source] = request.sources.as_slice() else {
            return;
        };
        if source.is_remote() || request.destination.is_remote() {
            return;
        }
        let Some(log_dir) = log.parent() else {
            return;
        };
        let source_dir = local_dir(&source.to_native());
        let dest_dir = request.destination.to_native();

        let opposite = if fsio::same_location(log_dir, &source_dir) {
            dest_dir
        } else if fsio::same_location(log_dir, &dest_dir) {
            source_dir
        } else {
            return;
        };
        let Some(name) = log.file_name() else {
            return;
        };
        let target = opposite.join(name);
        if let Err(e) = std::fs::copy(log, &target) {
            tracing::warn!(
                target = %target.display(),
                error = %e,
                "could not copy log to the other side"
            );
        }
    }
}
