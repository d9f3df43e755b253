//! Properties of batch planning over generated manifests.

use fpsync_core::{
    Direction, ExecutionContext, Manifest, ManifestEntry, MirrorOptions, MirrorRequest,
    PassDirection, plan_transfers,
};
use fpsync_fs::SyncPath;
use proptest::prelude::*;

fn entry_strategy() -> impl Strategy<Value = ManifestEntry> {
    (
        "[a-z]{1,6}",
        "[a-z]{1,6}",
        prop::collection::vec("[a-z][a-z0-9._-]{0,7}", 1..4),
        any::<bool>(),
    )
        .prop_map(|(left, right, subs, remote)| {
            let dir1 = if remote {
                SyncPath::remote("box", format!("/srv/{left}"))
            } else {
                SyncPath::local(format!("/{left}"))
            };
            ManifestEntry {
                name: left.clone(),
                dir1,
                dir2: SyncPath::local(format!("/mnt/{right}")),
                exclude_from: None,
                to_update: subs,
            }
        })
}

fn manifest_strategy() -> impl Strategy<Value = Manifest> {
    prop::collection::vec(entry_strategy(), 1..5).prop_map(|entries| Manifest {
        entries,
        ..Default::default()
    })
}

proptest! {
    #[test]
    fn sync_equals_up_then_down_without_delete(
        manifest in manifest_strategy(),
        no_delete in any::<bool>(),
    ) {
        let ctx = ExecutionContext::default();
        let synced = plan_transfers(&manifest, Direction::Sync, no_delete, &ctx);

        let mut expected = plan_transfers(&manifest, Direction::Up, true, &ctx);
        expected.extend(plan_transfers(&manifest, Direction::Down, true, &ctx));

        prop_assert_eq!(&synced, &expected);
        let base = MirrorOptions { metadata_excludes: false, ..Default::default() };
        for transfer in &synced {
            let plan = MirrorRequest::from_transfer(transfer, &base).plan(&ctx).unwrap();
            prop_assert!(plan.iter().all(|inv| !inv.has_arg("--delete")));
        }
    }

    #[test]
    fn one_transfer_per_entry_per_pass(manifest in manifest_strategy()) {
        let ctx = ExecutionContext::default();
        let up = plan_transfers(&manifest, Direction::Up, false, &ctx);

        prop_assert_eq!(up.len(), manifest.entries.len());
        for (transfer, entry) in up.iter().zip(&manifest.entries) {
            prop_assert_eq!(transfer.pass, PassDirection::Up);
            prop_assert_eq!(transfer.sources.len(), entry.to_update.len());
            prop_assert!(transfer.delete_extraneous);
            prop_assert_eq!(&transfer.destination, &entry.dir2);
        }
    }

    #[test]
    fn remote_sources_share_one_host_prefix(manifest in manifest_strategy()) {
        let ctx = ExecutionContext::default();
        for transfer in plan_transfers(&manifest, Direction::Up, false, &ctx) {
            let args = transfer.source_args();
            if transfer.sources[0].is_remote() {
                prop_assert!(args[0].starts_with("box:"));
                prop_assert!(args[1..].iter().all(|a| a.starts_with(':')));
            } else {
                prop_assert!(args.iter().all(|a| a.starts_with('/')));
            }
        }
    }
}
