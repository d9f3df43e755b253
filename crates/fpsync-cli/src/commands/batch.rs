//! `fpsync`: run every manifest entry in one direction

use colored::Colorize;

use fpsync_core::{
    BatchOptions, BatchReport, BatchSynchronizer, Builtins, Direction, InProcessLauncher,
    Manifest, MirrorOptions, SubprocessLauncher, SystemRunner, default_mirror_program,
};

use crate::cli::FpsyncCli;
use crate::console::{self, TerminalConsole};
use crate::error::Result;

/// Run the batch synchronizer.
///
/// Returns an error when the configuration is unusable or any transfer
/// failed; in the latter case the summary has already been printed.
pub fn run_batch(cli: &FpsyncCli) -> Result<()> {
    let ctx = cli.flags.context();
    let direction: Direction = cli.mode.parse()?;

    let path = Manifest::discover(cli.config.as_deref())?;
    let builtins = Builtins {
        host: cli.host.clone(),
        start_dir: cli.start_dir.clone(),
        excludes: cli.excludes.clone(),
    };
    let manifest = Manifest::load(&path, &builtins)?;

    if !ctx.quiet {
        println!(
            "{} Syncing {} entries {} using {}",
            "=>".blue().bold(),
            manifest.entries.len(),
            direction.to_string().cyan(),
            path.display()
        );
    }

    let options = BatchOptions {
        no_delete: cli.no_delete,
        fail_fast: cli.fail_fast,
        log_file: cli.log_file.clone(),
        tool: cli.rsync_path.clone(),
        metadata_excludes: MirrorOptions::default().metadata_excludes,
    };

    let mut hook_runner = SystemRunner;
    let mut terminal = TerminalConsole;
    let report = if cli.in_process {
        let mut launcher = InProcessLauncher::new(SystemRunner, TerminalConsole);
        BatchSynchronizer::new(ctx, options, &mut launcher, &mut hook_runner, &mut terminal)
            .run(&manifest, direction)?
    } else {
        let program = cli
            .mirror_program
            .clone()
            .unwrap_or_else(default_mirror_program);
        let mut launcher = SubprocessLauncher::new(program, SystemRunner);
        BatchSynchronizer::new(ctx, options, &mut launcher, &mut hook_runner, &mut terminal)
            .run(&manifest, direction)?
    };

    if !ctx.quiet || !report.success() {
        print_summary(&report);
    }
    report.check()?;
    Ok(())
}

fn print_summary(report: &BatchReport) {
    if report.previewed > 0 {
        console::ok(&format!("{} transfers previewed, nothing run", report.previewed));
        return;
    }
    for outcome in &report.succeeded {
        console::ok(&format!("{} ({})", outcome.name, outcome.pass));
    }
    for outcome in &report.failed {
        let code = outcome
            .code
            .map(|c| c.to_string())
            .unwrap_or_else(|| "signal".to_string());
        console::fail(&format!("{} ({}): exit {}", outcome.name, outcome.pass, code));
    }
    if report.aborted {
        console::warn("stopped after the first failure; remaining entries skipped");
    }
}
