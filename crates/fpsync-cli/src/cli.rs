//! CLI argument parsing using clap derive

use std::path::PathBuf;

use clap::{Args, Parser};

use fpsync_core::{ExecutionContext, SyncMode};

/// Switches shared by both binaries
#[derive(Args, Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunFlags {
    /// Ask rsync what it would do without changing anything
    #[arg(short = 'n', long)]
    pub dry_run: bool,

    /// Print every command and run nothing
    #[arg(short, long)]
    pub debug: bool,

    /// Print every command before running it
    #[arg(short, long)]
    pub verbose: bool,

    /// Only print errors
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,
}

impl RunFlags {
    pub fn context(&self) -> ExecutionContext {
        ExecutionContext {
            dry_run: self.dry_run,
            verbose: self.verbose,
            debug: self.debug,
            quiet: self.quiet,
        }
    }
}

/// fpsync - keep a fixed set of directories in sync between two machines
///
/// Reads the list of directory pairs from a manifest and mirrors each pair
/// in the requested direction with fpmirror.
///
/// Examples:
///   fpsync up                     # push dir1 -> dir2 for every entry
///   fpsync down -n                # preview pulling dir2 -> dir1
///   fpsync sync -H box -s /srv/me # both ways, never deleting
#[derive(Parser, Debug)]
#[command(name = "fpsync")]
#[command(author, version, verbatim_doc_comment)]
pub struct FpsyncCli {
    /// Direction: up (dir1 -> dir2), down (dir2 -> dir1) or sync (up, then down, no deletes)
    #[arg(value_parser = ["up", "down", "sync"])]
    pub mode: String,

    #[command(flatten)]
    pub flags: RunFlags,

    /// Manifest file (default: ~/.fpsyncrc.toml, ~/usr/etc/fpsyncrc.toml,
    /// <config dir>/fpsync/config.toml)
    #[arg(short, long, env = "FPSYNC_CONFIG")]
    pub config: Option<PathBuf>,

    /// Remote host, available in the manifest as ${host}
    #[arg(short = 'H', long, env = "FPSYNC_HOST")]
    pub host: Option<String>,

    /// Start directory, available in the manifest as ${start_dir}
    #[arg(short, long, env = "FPSYNC_START_DIR")]
    pub start_dir: Option<String>,

    /// Exclusion file, available in the manifest as ${excludes}
    #[arg(short = 'x', long, env = "FPSYNC_EXCLUDES")]
    pub excludes: Option<String>,

    /// Never delete files in up or down mode
    #[arg(long)]
    pub no_delete: bool,

    /// Stop at the first failed transfer
    #[arg(long)]
    pub fail_fast: bool,

    /// Append every transfer's log to this file (default: no log)
    #[arg(short, long)]
    pub log_file: Option<PathBuf>,

    /// rsync program to use
    #[arg(long, env = "FPSYNC_RSYNC", default_value = "rsync")]
    pub rsync_path: String,

    /// fpmirror program to launch (default: next to fpsync, else on PATH)
    #[arg(long)]
    pub mirror_program: Option<String>,

    /// Run the mirror in this process instead of launching fpmirror
    #[arg(long, conflicts_with = "mirror_program")]
    pub in_process: bool,
}

/// fpmirror - mirror or two-way sync directories with rsync
///
/// The last path is the destination; every other path is a source. A
/// missing local destination is created; one that exists but is not a
/// directory is an error.
///
/// Examples:
///   fpmirror ~/notes box:notes          # one-way mirror, deleting extras
///   fpmirror -s ~/notes /mnt/usb/notes  # two-way by modification time
///   fpmirror box:a :b ~/backup          # two sources from one host
#[derive(Parser, Debug)]
#[command(name = "fpmirror")]
#[command(author, version, verbatim_doc_comment)]
pub struct FpmirrorCli {
    /// Sources followed by the destination
    #[arg(required = true, num_args = 2.., value_name = "PATH")]
    pub paths: Vec<String>,

    #[command(flatten)]
    pub flags: RunFlags,

    /// Two-way sync by modification time; deletes nothing
    #[arg(short, long)]
    pub sync: bool,

    /// Two-way sync whose first pass deletes destination files missing
    /// from the source. Files only present in the destination are lost.
    #[arg(short = 'S', long, conflicts_with_all = ["sync", "no_delete"])]
    pub destructive_sync: bool,

    /// Append to the log instead of replacing it
    #[arg(short, long, conflicts_with = "no_log")]
    pub keep_log: bool,

    /// Do not write a log
    #[arg(long, conflicts_with = "log_file")]
    pub no_log: bool,

    /// Never delete files in the destination
    #[arg(short = 'D', long)]
    pub no_delete: bool,

    /// Extra rsync options, split on whitespace
    #[arg(short, long, allow_hyphen_values = true)]
    pub options: Option<String>,

    /// Log file (default: fpmirror.log in the first source directory)
    #[arg(short, long)]
    pub log_file: Option<PathBuf>,

    /// rsync exclusion file
    #[arg(short = 'x', long)]
    pub exclude_from: Option<PathBuf>,

    /// rsync program to use
    #[arg(long, env = "FPSYNC_RSYNC", default_value = "rsync")]
    pub rsync_path: String,
}

impl FpmirrorCli {
    pub fn sync_mode(&self) -> SyncMode {
        if self.destructive_sync {
            SyncMode::Destructive
        } else if self.sync {
            SyncMode::Symmetric
        } else {
            SyncMode::None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli() {
        FpsyncCli::command().debug_assert();
        FpmirrorCli::command().debug_assert();
    }

    #[test]
    fn parse_mirror_paths() {
        let cli = FpmirrorCli::try_parse_from(["fpmirror", "-s", "/a", "box:/b"]).unwrap();
        assert_eq!(cli.paths, vec!["/a", "box:/b"]);
        assert_eq!(cli.sync_mode(), SyncMode::Symmetric);
    }

    #[test]
    fn parse_mirror_passthrough_with_hyphens() {
        let cli =
            FpmirrorCli::try_parse_from(["fpmirror", "-o", "--checksum --bwlimit=10", "/a", "/b"])
                .unwrap();
        assert_eq!(cli.options.as_deref(), Some("--checksum --bwlimit=10"));
    }

    #[test]
    fn mirror_needs_source_and_destination() {
        assert!(FpmirrorCli::try_parse_from(["fpmirror", "/a"]).is_err());
    }

    #[test]
    fn destructive_conflicts_with_no_delete() {
        assert!(FpmirrorCli::try_parse_from(["fpmirror", "-S", "-D", "/a", "/b"]).is_err());
    }

    #[test]
    fn parse_batch_mode() {
        let cli = FpsyncCli::try_parse_from(["fpsync", "sync", "-n", "-H", "box"]).unwrap();
        assert_eq!(cli.mode, "sync");
        assert!(cli.flags.dry_run);
        assert_eq!(cli.host.as_deref(), Some("box"));
        assert!(FpsyncCli::try_parse_from(["fpsync", "sideways"]).is_err());
    }
}
