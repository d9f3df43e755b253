//! Mirror invocation planning
//!
//! Turns a [`MirrorRequest`] into the exact command lines for the external
//! mirroring tool. Planning is pure; nothing here touches the filesystem.

use std::fmt;
use std::path::PathBuf;

use fpsync_fs::SyncPath;
use fpsync_fs::constants::{DEFAULT_MIRROR_TOOL, MACOS_METADATA_EXCLUDES, REMOTE_SHELL};

use crate::context::ExecutionContext;
use crate::error::{Error, Result};
use crate::runner::Invocation;
use crate::transfer::{TransferRequest, render_sources};

/// How the two sides are reconciled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SyncMode {
    /// One-way mirror, sources -> destination
    #[default]
    None,
    /// Two passes by modification time, nothing deleted
    Symmetric,
    /// Like symmetric, but the first pass deletes destination files missing
    /// from the source. Data that only existed in the destination is lost.
    Destructive,
}

impl fmt::Display for SyncMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => write!(f, "mirror"),
            Self::Symmetric => write!(f, "symmetric sync"),
            Self::Destructive => write!(f, "destructive sync"),
        }
    }
}

/// Flags for one mirror driver run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MirrorOptions {
    pub sync_mode: SyncMode,
    /// Never pass the delete flag
    pub no_delete: bool,
    /// Append to an existing log instead of replacing it
    pub keep_log: bool,
    /// Write no persistent log
    pub no_log: bool,
    pub log_file: Option<PathBuf>,
    pub exclude_from: Option<PathBuf>,
    /// Extra options handed to the tool verbatim
    pub passthrough: Vec<String>,
    /// Program name or path of the mirroring tool
    pub tool: String,
    /// Add excludes for macOS metadata files
    pub metadata_excludes: bool,
}

impl Default for MirrorOptions {
    fn default() -> Self {
        Self {
            sync_mode: SyncMode::None,
            no_delete: false,
            keep_log: false,
            no_log: false,
            log_file: None,
            exclude_from: None,
            passthrough: Vec::new(),
            tool: DEFAULT_MIRROR_TOOL.to_string(),
            metadata_excludes: cfg!(target_os = "macos"),
        }
    }
}

/// Split a passthrough option string on whitespace.
pub fn split_passthrough(options: &str) -> Vec<String> {
    options.split_whitespace().map(str::to_string).collect()
}

/// Sources, a destination and the options to mirror them with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MirrorRequest {
    pub sources: Vec<SyncPath>,
    pub destination: SyncPath,
    pub options: MirrorOptions,
}

impl MirrorRequest {
    pub fn new(sources: Vec<SyncPath>, destination: SyncPath) -> Self {
        Self {
            sources,
            destination,
            options: MirrorOptions::default(),
        }
    }

    /// The mirror a batch transfer asks for.
    pub fn from_transfer(transfer: &TransferRequest, base: &MirrorOptions) -> Self {
        Self {
            sources: transfer.sources.clone(),
            destination: transfer.destination.clone(),
            options: MirrorOptions {
                sync_mode: SyncMode::None,
                no_delete: base.no_delete || !transfer.delete_extraneous,
                exclude_from: transfer.exclude_file.clone(),
                ..base.clone()
            },
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.sources.is_empty() {
            return Err(Error::invalid_request("at least one source is required"));
        }
        if self.options.sync_mode != SyncMode::None && self.sources.len() != 1 {
            return Err(Error::invalid_request(format!(
                "{} takes exactly one source, got {}",
                self.options.sync_mode,
                self.sources.len()
            )));
        }
        Ok(())
    }

    pub fn any_remote(&self) -> bool {
        self.destination.is_remote() || self.sources.iter().any(SyncPath::is_remote)
    }

    /// Sources and destination as handed to the tool.
    ///
    /// In sync mode both ends get a trailing separator so the tool
    /// reconciles directory contents rather than nesting one directory
    /// inside the other.
    pub fn endpoints(&self) -> (Vec<SyncPath>, SyncPath) {
        match self.options.sync_mode {
            SyncMode::None => (self.sources.clone(), self.destination.clone()),
            SyncMode::Symmetric | SyncMode::Destructive => (
                self.sources.iter().map(SyncPath::with_trailing_slash).collect(),
                self.destination.with_trailing_slash(),
            ),
        }
    }

    /// Tool flags shared by every invocation of this request.
    pub fn common_flags(&self, ctx: &ExecutionContext) -> Vec<String> {
        let mut flags = vec!["-a".to_string()];
        if ctx.verbose {
            flags.push("-v".to_string());
        }
        if ctx.dry_run {
            flags.push("--dry-run".to_string());
        }
        if self.any_remote() {
            flags.push("-e".to_string());
            flags.push(REMOTE_SHELL.to_string());
        }
        if let Some(excludes) = &self.options.exclude_from {
            flags.push(format!("--exclude-from={}", excludes.display()));
        }
        if self.options.metadata_excludes {
            flags.extend(
                MACOS_METADATA_EXCLUDES
                    .iter()
                    .map(|pattern| format!("--exclude={}", pattern)),
            );
        }
        flags.extend(self.options.passthrough.iter().cloned());
        flags
    }

    /// Every invocation this request performs, in order.
    pub fn plan(&self, ctx: &ExecutionContext) -> Result<Vec<Invocation>> {
        self.validate()?;

        let (sources, destination) = self.endpoints();
        let flags = self.common_flags(ctx);
        let tool = &self.options.tool;

        let forward = |delete: bool| {
            let mut args = flags.clone();
            if delete {
                args.insert(1, "--delete".to_string());
            }
            Invocation::new(tool)
                .args(args)
                .args(render_sources(&sources))
                .arg(destination.to_arg())
        };

        let invocations = match self.options.sync_mode {
            SyncMode::None => vec![forward(!self.options.no_delete)],
            SyncMode::Symmetric => vec![
                forward(false),
                self.reverse(&sources, &destination, &flags),
            ],
            SyncMode::Destructive => vec![
                forward(!self.options.no_delete),
                self.reverse(&sources, &destination, &flags),
            ],
        };
        Ok(invocations)
    }

    fn reverse(
        &self,
        sources: &[SyncPath],
        destination: &SyncPath,
        flags: &[String],
    ) -> Invocation {
        Invocation::new(&self.options.tool)
            .args(flags.iter().cloned())
            .arg(destination.to_arg())
            .args(sources.iter().map(SyncPath::to_arg))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn request(sources: &[&str], dest: &str, mode: SyncMode) -> MirrorRequest {
        let mut req = MirrorRequest::new(
            sources.iter().map(|s| SyncPath::parse(s)).collect(),
            SyncPath::parse(dest),
        );
        req.options.sync_mode = mode;
        req.options.metadata_excludes = false;
        req
    }

    #[test]
    fn test_one_way_mirror_deletes() {
        let plan = request(&["/a/x", "/a/y"], "/b", SyncMode::None)
            .plan(&ExecutionContext::default())
            .unwrap();

        assert_eq!(plan.len(), 1);
        assert_eq!(plan[0].args, vec!["-a", "--delete", "/a/x", "/a/y", "/b"]);
    }

    #[test]
    fn test_one_way_mirror_no_delete() {
        let mut req = request(&["/a"], "/b", SyncMode::None);
        req.options.no_delete = true;
        let plan = req.plan(&ExecutionContext::default()).unwrap();
        assert!(!plan[0].has_arg("--delete"));
    }

    #[test]
    fn test_symmetric_order_and_no_delete() {
        let plan = request(&["/a"], "/b", SyncMode::Symmetric)
            .plan(&ExecutionContext::default())
            .unwrap();

        assert_eq!(plan.len(), 2);
        assert_eq!(plan[0].args, vec!["-a", "/a/", "/b/"]);
        assert_eq!(plan[1].args, vec!["-a", "/b/", "/a/"]);
        assert!(plan.iter().all(|inv| !inv.has_arg("--delete")));
    }

    #[test]
    fn test_destructive_deletes_only_first_pass() {
        let plan = request(&["/a"], "/b", SyncMode::Destructive)
            .plan(&ExecutionContext::default())
            .unwrap();

        assert!(plan[0].has_arg("--delete"));
        assert!(!plan[1].has_arg("--delete"));
    }

    #[rstest]
    #[case(SyncMode::Symmetric)]
    #[case(SyncMode::Destructive)]
    fn test_sync_modes_add_trailing_separators(#[case] mode: SyncMode) {
        let plan = request(&["/a"], "box:/b", mode)
            .plan(&ExecutionContext::default())
            .unwrap();

        for inv in &plan {
            let endpoints = &inv.args[inv.args.len() - 2..];
            assert!(endpoints.iter().all(|p| p.ends_with('/')), "{:?}", endpoints);
        }
    }

    #[test]
    fn test_sync_mode_requires_single_source() {
        let err = request(&["/a", "/c"], "/b", SyncMode::Symmetric)
            .plan(&ExecutionContext::default())
            .unwrap_err();
        assert!(matches!(err, Error::InvalidRequest { .. }));
    }

    #[test]
    fn test_remote_adds_shell() {
        let plan = request(&["/a"], "box:/b", SyncMode::None)
            .plan(&ExecutionContext::default())
            .unwrap();
        let pos = plan[0].args.iter().position(|a| a == "-e").unwrap();
        assert_eq!(plan[0].args[pos + 1], "ssh");

        let local = request(&["/a"], "/b", SyncMode::None)
            .plan(&ExecutionContext::default())
            .unwrap();
        assert!(!local[0].has_arg("-e"));
    }

    #[test]
    fn test_context_and_options_flags() {
        let mut req = request(&["/a"], "/b", SyncMode::None);
        req.options.exclude_from = Some(PathBuf::from("/etc/excl"));
        req.options.metadata_excludes = true;
        req.options.passthrough = split_passthrough("--checksum  --bwlimit=100");
        let ctx = ExecutionContext {
            verbose: true,
            dry_run: true,
            ..Default::default()
        };

        let plan = req.plan(&ctx).unwrap();
        assert_eq!(
            plan[0].args,
            vec![
                "-a",
                "--delete",
                "-v",
                "--dry-run",
                "--exclude-from=/etc/excl",
                "--exclude=.DS_Store",
                "--exclude=._*",
                "--checksum",
                "--bwlimit=100",
                "/a",
                "/b",
            ]
        );
    }

    #[test]
    fn test_from_transfer_maps_delete_and_excludes() {
        let transfer = TransferRequest {
            name: "t".into(),
            pass: crate::direction::PassDirection::Up,
            sources: vec![SyncPath::parse("/a/x")],
            destination: SyncPath::parse("/b"),
            delete_extraneous: false,
            exclude_file: Some(PathBuf::from("/x")),
            dry_run: false,
        };
        let req = MirrorRequest::from_transfer(&transfer, &MirrorOptions::default());
        assert!(req.options.no_delete);
        assert_eq!(req.options.exclude_from, Some(PathBuf::from("/x")));
    }
}
