//! End-to-end scenarios across the manifest, batch and mirror layers.

use fpsync_core::{
    BatchOptions, BatchSynchronizer, Builtins, Direction, ExecutionContext, InProcessLauncher,
    Invocation, Manifest, MirrorOptions, MirrorRequest, NullConsole, SubprocessLauncher,
    plan_transfers,
};
use fpsync_test_utils::tree::toml_path;
use fpsync_test_utils::{RecordingRunner, SyncTree};
use pretty_assertions::assert_eq;

const AB_MANIFEST: &str = r#"
must_exist = "/"

[[to_update]]
dir1 = "/a"
dir2 = "/b"
to_update = ["x", "y"]
"#;

/// Every rsync command a batch run would issue, without touching disk.
fn rsync_commands(manifest: &Manifest, direction: Direction) -> Vec<Invocation> {
    let ctx = ExecutionContext::default();
    let base = MirrorOptions {
        metadata_excludes: false,
        ..Default::default()
    };
    plan_transfers(manifest, direction, false, &ctx)
        .iter()
        .flat_map(|t| MirrorRequest::from_transfer(t, &base).plan(&ctx).unwrap())
        .collect()
}

#[test]
fn test_up_is_one_deleting_mirror() {
    let manifest = Manifest::parse(AB_MANIFEST, &Builtins::default()).unwrap();

    let commands = rsync_commands(&manifest, Direction::Up);

    assert_eq!(commands.len(), 1);
    assert_eq!(commands[0].args, vec!["-a", "--delete", "/a/x", "/a/y", "/b"]);
}

#[test]
fn test_sync_is_up_then_down_without_delete() {
    let manifest = Manifest::parse(AB_MANIFEST, &Builtins::default()).unwrap();

    let commands = rsync_commands(&manifest, Direction::Sync);

    assert_eq!(commands.len(), 2);
    assert_eq!(commands[0].args, vec!["-a", "/a/x", "/a/y", "/b"]);
    assert_eq!(commands[1].args, vec!["-a", "/b/x", "/b/y", "/a"]);
}

#[test]
fn test_up_launches_fpmirror_once_with_all_subpaths() {
    let manifest = Manifest::parse(AB_MANIFEST, &Builtins::default()).unwrap();
    let mut mirror = RecordingRunner::new();
    let mut hooks = RecordingRunner::new();
    let mut launcher = SubprocessLauncher::new("fpmirror", &mut mirror);

    let report = BatchSynchronizer::new(
        ExecutionContext::default(),
        BatchOptions::default(),
        &mut launcher,
        &mut hooks,
        &mut NullConsole,
    )
    .run(&manifest, Direction::Up)
    .unwrap();

    assert!(report.success());
    assert_eq!(mirror.invocations.len(), 1);
    assert_eq!(mirror.invocations[0].args, vec!["--no-log", "/a/x", "/a/y", "/b"]);
}

#[test]
fn test_remote_entry_shares_host_and_uses_ssh() {
    let manifest = Manifest::parse(
        r#"
must_exist = "/"

[vars]
server = "${host}:${start_dir}"

[[to_update]]
dir1 = "${server}"
dir2 = "/local"
to_update = "x y"
"#,
        &Builtins {
            host: Some("box".into()),
            start_dir: Some("/srv/me".into()),
            excludes: None,
        },
    )
    .unwrap();

    let commands = rsync_commands(&manifest, Direction::Up);

    assert_eq!(
        commands[0].args,
        vec!["-a", "--delete", "-e", "ssh", "box:/srv/me/x", ":/srv/me/y", "/local"]
    );
}

#[test]
fn test_manifest_file_to_in_process_mirror() {
    let tree = SyncTree::new();
    let excludes = tree.write("excludes.txt", "*.swp\n");
    let content = format!(
        r#"
must_exist = ["{root}"]

[vars]
base = "{root}"

[[to_update]]
name = "notes"
dir1 = "${{base}}/left"
dir2 = "${{base}}/right/copy"
exclude_from = "{excludes}"
to_update = ["notes", "mail"]
"#,
        root = toml_path(tree.root()),
        excludes = toml_path(&excludes),
    );
    let path = tree.write_manifest_raw("fpsync.toml", &content);
    let manifest = Manifest::load(&path, &Builtins::default()).unwrap();

    let mut tool = RecordingRunner::new();
    let mut hooks = RecordingRunner::new();
    let mut launcher = InProcessLauncher::new(&mut tool, NullConsole);
    let options = BatchOptions {
        log_file: Some(tree.root().join("batch.log")),
        metadata_excludes: false,
        ..Default::default()
    };

    let report = BatchSynchronizer::new(
        ExecutionContext::default(),
        options,
        &mut launcher,
        &mut hooks,
        &mut NullConsole,
    )
    .run(&manifest, Direction::Sync)
    .unwrap();

    assert_eq!(report.succeeded.len(), 2);
    // The missing destination was created by the up pass
    assert!(tree.right().join("copy").is_dir());
    assert_eq!(tool.invocations.len(), 2);
    assert!(tool.invocations.iter().all(|i| !i.has_arg("--delete")));
    assert!(
        tool.invocations[0]
            .args
            .contains(&format!("--exclude-from={}", toml_path(&excludes)))
    );
    let log = tree.read("batch.log");
    assert_eq!(log.matches("=== fpmirror run started").count(), 2);
}
