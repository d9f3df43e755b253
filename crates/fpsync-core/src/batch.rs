//! The Batch Synchronizer
//!
//! Expands a manifest and a direction into transfers and hands each one to
//! the Mirror Driver, strictly one after another.

use std::path::PathBuf;

use fpsync_fs::constants::DEFAULT_MIRROR_TOOL;

use crate::context::{Console, ExecutionContext};
use crate::direction::{Direction, PassDirection};
use crate::error::{Error, Result};
use crate::hooks::{HookContext, HookEvent, run_hooks};
use crate::manifest::Manifest;
use crate::mirror::{MirrorDriver, MirrorOptions, MirrorRequest};
use crate::runner::{CommandRunner, Invocation};
use crate::transfer::plan_transfers;

/// Program name of the Mirror Driver binary.
pub const MIRROR_PROGRAM: &str = "fpmirror";

/// Starts one Mirror Driver run per transfer.
pub trait MirrorLauncher {
    /// Run the mirror and return its exit code.
    fn launch(&mut self, request: &MirrorRequest, ctx: &ExecutionContext) -> Result<Option<i32>>;

    /// Commands `launch` would run, for debug output.
    fn preview(&self, request: &MirrorRequest, ctx: &ExecutionContext) -> Result<Vec<Invocation>>;
}

/// Runs the Mirror Driver as a child process.
pub struct SubprocessLauncher<R> {
    program: String,
    runner: R,
}

impl<R: CommandRunner> SubprocessLauncher<R> {
    pub fn new(program: impl Into<String>, runner: R) -> Self {
        Self {
            program: program.into(),
            runner,
        }
    }

    /// The Mirror Driver command line for `request`.
    pub fn invocation(&self, request: &MirrorRequest, ctx: &ExecutionContext) -> Invocation {
        let options = &request.options;
        let mut inv = Invocation::new(&self.program);

        if ctx.dry_run {
            inv = inv.arg("--dry-run");
        }
        if ctx.verbose {
            inv = inv.arg("--verbose");
        }
        if ctx.quiet {
            inv = inv.arg("--quiet");
        }
        if options.no_delete {
            inv = inv.arg("--no-delete");
        }
        if let Some(excludes) = &options.exclude_from {
            inv = inv.arg("--exclude-from").arg(excludes.display().to_string());
        }
        if options.no_log {
            inv = inv.arg("--no-log");
        } else {
            if let Some(log) = &options.log_file {
                inv = inv.arg("--log-file").arg(log.display().to_string());
            }
            if options.keep_log {
                inv = inv.arg("--keep-log");
            }
        }
        if options.tool != DEFAULT_MIRROR_TOOL {
            inv = inv.arg("--rsync-path").arg(&options.tool);
        }
        if !options.passthrough.is_empty() {
            inv = inv.arg("--options").arg(options.passthrough.join(" "));
        }

        inv.args(crate::transfer::render_sources(&request.sources))
            .arg(request.destination.to_arg())
    }
}

impl<R: CommandRunner> MirrorLauncher for SubprocessLauncher<R> {
    fn launch(&mut self, request: &MirrorRequest, ctx: &ExecutionContext) -> Result<Option<i32>> {
        let invocation = self.invocation(request, ctx);
        self.runner.status(&invocation)
    }

    fn preview(&self, request: &MirrorRequest, ctx: &ExecutionContext) -> Result<Vec<Invocation>> {
        Ok(vec![self.invocation(request, ctx)])
    }
}

/// Runs the Mirror Driver inside the current process.
pub struct InProcessLauncher<R, C> {
    runner: R,
    console: C,
}

impl<R: CommandRunner, C: Console> InProcessLauncher<R, C> {
    pub fn new(runner: R, console: C) -> Self {
        Self { runner, console }
    }
}

impl<R: CommandRunner, C: Console> MirrorLauncher for InProcessLauncher<R, C> {
    fn launch(&mut self, request: &MirrorRequest, ctx: &ExecutionContext) -> Result<Option<i32>> {
        let report = MirrorDriver::new(*ctx, &mut self.runner, &mut self.console).run(request)?;
        Ok(Some(report.first_failure().unwrap_or(0)))
    }

    fn preview(&self, request: &MirrorRequest, ctx: &ExecutionContext) -> Result<Vec<Invocation>> {
        request.plan(ctx)
    }
}

/// Batch-level switches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchOptions {
    /// Suppress deletion in up and down passes
    pub no_delete: bool,
    /// Stop after the first failed transfer
    pub fail_fast: bool,
    /// Shared log for every transfer; no log is written when unset
    pub log_file: Option<PathBuf>,
    /// Mirroring tool handed to the Mirror Driver
    pub tool: String,
    pub metadata_excludes: bool,
}

impl Default for BatchOptions {
    fn default() -> Self {
        let mirror = MirrorOptions::default();
        Self {
            no_delete: false,
            fail_fast: false,
            log_file: None,
            tool: mirror.tool,
            metadata_excludes: mirror.metadata_excludes,
        }
    }
}

impl BatchOptions {
    /// Options every transfer of the batch starts from.
    pub fn mirror_options(&self) -> MirrorOptions {
        MirrorOptions {
            no_delete: self.no_delete,
            no_log: self.log_file.is_none(),
            keep_log: self.log_file.is_some(),
            log_file: self.log_file.clone(),
            tool: self.tool.clone(),
            metadata_excludes: self.metadata_excludes,
            ..Default::default()
        }
    }
}

/// Result of one transfer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferOutcome {
    pub name: String,
    pub pass: PassDirection,
    pub code: Option<i32>,
}

/// What a batch run did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchReport {
    pub succeeded: Vec<TransferOutcome>,
    pub failed: Vec<TransferOutcome>,
    /// Transfers only printed, in debug mode
    pub previewed: usize,
    /// Stopped early after a failure
    pub aborted: bool,
}

impl BatchReport {
    pub fn success(&self) -> bool {
        self.failed.is_empty()
    }

    /// Turn the first failure into an error.
    pub fn check(&self) -> Result<()> {
        match self.failed.first() {
            Some(outcome) => Err(Error::TransferFailed {
                name: outcome.name.clone(),
                code: outcome.code,
            }),
            None => Ok(()),
        }
    }
}

/// Runs a manifest in one direction.
pub struct BatchSynchronizer<'a, L: ?Sized, R: ?Sized, C: ?Sized> {
    ctx: ExecutionContext,
    options: BatchOptions,
    launcher: &'a mut L,
    hook_runner: &'a mut R,
    console: &'a mut C,
}

impl<'a, L, R, C> BatchSynchronizer<'a, L, R, C>
where
    L: MirrorLauncher + ?Sized,
    R: CommandRunner + ?Sized,
    C: Console + ?Sized,
{
    pub fn new(
        ctx: ExecutionContext,
        options: BatchOptions,
        launcher: &'a mut L,
        hook_runner: &'a mut R,
        console: &'a mut C,
    ) -> Self {
        Self {
            ctx,
            options,
            launcher,
            hook_runner,
            console,
        }
    }

    /// Check required paths, run hooks and every transfer.
    ///
    /// Configuration problems abort before anything runs. A failed
    /// transfer is recorded and the batch moves on, unless `fail_fast` is
    /// set, in which case the remaining transfers and the post-run hooks
    /// are skipped.
    pub fn run(&mut self, manifest: &Manifest, direction: Direction) -> Result<BatchReport> {
        manifest.check_required_paths()?;

        let hook_context = HookContext::for_run(&direction.to_string(), &self.ctx);
        let work_dir = std::env::current_dir()?;
        run_hooks(
            &manifest.hooks,
            HookEvent::PreRun,
            &hook_context,
            &work_dir,
            &self.ctx,
            &mut *self.hook_runner,
            &mut *self.console,
        )?;

        let base = self.options.mirror_options();
        let transfers = plan_transfers(manifest, direction, self.options.no_delete, &self.ctx);
        tracing::debug!(%direction, transfers = transfers.len(), "planned batch");

        let mut report = BatchReport::default();
        for transfer in &transfers {
            let request = MirrorRequest::from_transfer(transfer, &base);
            if !self.ctx.quiet {
                self.console
                    .note(&format!("{} ({})", transfer.name, transfer.pass));
            }

            if !self.ctx.executes() {
                for invocation in self.launcher.preview(&request, &self.ctx)? {
                    self.console.command(&invocation);
                }
                report.previewed += 1;
                continue;
            }

            let code = self.launcher.launch(&request, &self.ctx)?;
            let outcome = TransferOutcome {
                name: transfer.name.clone(),
                pass: transfer.pass,
                code,
            };
            if code == Some(0) {
                report.succeeded.push(outcome);
                continue;
            }

            tracing::warn!(entry = %transfer.name, pass = %transfer.pass, ?code, "transfer failed");
            report.failed.push(outcome);
            if self.options.fail_fast {
                report.aborted = true;
                return Ok(report);
            }
        }

        run_hooks(
            &manifest.hooks,
            HookEvent::PostRun,
            &hook_context,
            &work_dir,
            &self.ctx,
            &mut *self.hook_runner,
            &mut *self.console,
        )?;
        Ok(report)
    }
}

/// Locate the Mirror Driver: next to the running executable, else on `PATH`.
pub fn default_mirror_program() -> String {
    let sibling = std::env::current_exe().ok().and_then(|exe| {
        let candidate = exe
            .parent()?
            .join(format!("{}{}", MIRROR_PROGRAM, std::env::consts::EXE_SUFFIX));
        candidate.is_file().then_some(candidate)
    });
    match sibling {
        Some(path) => path.display().to_string(),
        None => MIRROR_PROGRAM.to_string(),
    }
}
