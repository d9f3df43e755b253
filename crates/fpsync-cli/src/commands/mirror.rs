//! `fpmirror`: mirror or two-way sync one set of paths

use colored::Colorize;

use fpsync_core::{
    MirrorDriver, MirrorOptions, MirrorRequest, SyncMode, SystemRunner, split_passthrough,
};
use fpsync_fs::SyncPath;

use crate::cli::FpmirrorCli;
use crate::console::{self, TerminalConsole};
use crate::error::{CliError, Result};

/// Run the mirror driver and return the process exit code.
pub fn run_mirror(cli: &FpmirrorCli) -> Result<i32> {
    let ctx = cli.flags.context();
    let (destination, sources) = match cli.paths.split_last() {
        Some((destination, sources)) if !sources.is_empty() => (destination, sources),
        _ => {
            return Err(CliError::MissingEndpoints {
                given: cli.paths.len(),
            });
        }
    };

    let request = MirrorRequest {
        sources: SyncPath::parse_list(sources),
        destination: SyncPath::parse(destination),
        options: MirrorOptions {
            sync_mode: cli.sync_mode(),
            no_delete: cli.no_delete,
            keep_log: cli.keep_log,
            no_log: cli.no_log,
            log_file: cli.log_file.clone(),
            exclude_from: cli.exclude_from.clone(),
            passthrough: cli.options.as_deref().map(split_passthrough).unwrap_or_default(),
            tool: cli.rsync_path.clone(),
            ..Default::default()
        },
    };
    request.validate()?;

    if ctx.executes() {
        SystemRunner::resolve(&request.options.tool)?;
    }
    if request.options.sync_mode == SyncMode::Destructive && !ctx.quiet {
        console::warn(&format!(
            "destructive sync: files only in {} will be deleted",
            request.destination
        ));
    }

    let mut runner = SystemRunner;
    let mut terminal = TerminalConsole;
    let report = MirrorDriver::new(ctx, &mut runner, &mut terminal).run(&request)?;

    if !ctx.quiet {
        if let Some(log) = &report.log_file {
            println!("{} log written to {}", "=>".blue().bold(), log.display());
        }
    }

    match report.first_failure() {
        Some(code) => {
            if !ctx.quiet {
                console::fail(&format!("{} exited with status {}", request.options.tool, code));
            }
            Ok(code)
        }
        None => Ok(0),
    }
}
