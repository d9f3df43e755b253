//! Transfer requests: one mirror driver call per manifest entry per pass

use std::path::PathBuf;

use fpsync_fs::SyncPath;

use crate::context::ExecutionContext;
use crate::direction::{Direction, Pass, PassDirection};
use crate::manifest::{Manifest, ManifestEntry};

/// A single one-way mirror derived from a manifest entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferRequest {
    /// Entry name, for progress and error messages
    pub name: String,
    pub pass: PassDirection,
    pub sources: Vec<SyncPath>,
    pub destination: SyncPath,
    pub delete_extraneous: bool,
    pub exclude_file: Option<PathBuf>,
    pub dry_run: bool,
}

impl TransferRequest {
    /// Build the request for `entry` in the given pass.
    ///
    /// Every subpath of the entry becomes one source, all sent to the
    /// opposite base directory in a single call.
    pub fn for_entry(entry: &ManifestEntry, pass: Pass, ctx: &ExecutionContext) -> Self {
        let (base, destination) = match pass.direction {
            PassDirection::Up => (&entry.dir1, &entry.dir2),
            PassDirection::Down => (&entry.dir2, &entry.dir1),
        };

        Self {
            name: entry.name.clone(),
            pass: pass.direction,
            sources: entry.to_update.iter().map(|sub| base.join(sub)).collect(),
            destination: destination.clone(),
            delete_extraneous: pass.delete,
            exclude_file: entry.exclude_from.clone(),
            dry_run: ctx.dry_run,
        }
    }

    /// Source arguments as the mirroring tool expects them.
    pub fn source_args(&self) -> Vec<String> {
        render_sources(&self.sources)
    }
}

/// Render sources, collapsing repeated remote hosts into the `:path`
/// shorthand so one connection serves them all.
pub fn render_sources(sources: &[SyncPath]) -> Vec<String> {
    let mut previous_host: Option<&str> = None;
    sources
        .iter()
        .map(|source| {
            let arg = match (previous_host, source.host()) {
                (Some(prev), Some(host)) if prev == host => source.to_shared_host_arg(),
                _ => source.to_arg(),
            };
            previous_host = source.host();
            arg
        })
        .collect()
}

/// Every transfer a batch run performs, in execution order.
pub fn plan_transfers(
    manifest: &Manifest,
    direction: Direction,
    no_delete: bool,
    ctx: &ExecutionContext,
) -> Vec<TransferRequest> {
    direction
        .passes(no_delete)
        .into_iter()
        .flat_map(|pass| {
            manifest
                .entries
                .iter()
                .map(move |entry| TransferRequest::for_entry(entry, pass, ctx))
        })
        .collect()
}
