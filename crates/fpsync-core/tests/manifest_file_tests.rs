//! Loading manifests from disk in each supported format.

use std::path::PathBuf;

use fpsync_core::{Builtins, Error, Manifest};
use fpsync_test_utils::SyncTree;
use fpsync_test_utils::tree::toml_path;
use rstest::rstest;

#[rstest]
#[case("fpsync.yaml", "must_exist: {root}\nto_update:\n  - dir1: {root}/a\n    dir2: {root}/b\n    to_update: x y\n")]
#[case("fpsync.json", r#"{"must_exist": ["{root}"], "to_update": [{"dir1": "{root}/a", "dir2": "{root}/b", "to_update": ["x", "y"]}]}"#)]
fn test_load_yaml_and_json(#[case] name: &str, #[case] template: &str) {
    let tree = SyncTree::new();
    let root = toml_path(tree.root());
    let path = tree.write_manifest_raw(name, &template.replace("{root}", &root));

    let manifest = Manifest::load(&path, &Builtins::default()).unwrap();

    assert_eq!(manifest.entries[0].to_update, vec!["x", "y"]);
    assert_eq!(manifest.entries[0].dir1.to_arg(), format!("{root}/a"));
    manifest.check_required_paths().unwrap();
}

#[test]
fn test_written_manifest_loads() {
    let tree = SyncTree::new();
    let path = tree.write_manifest(&["notes", "mail"]);

    let manifest = Manifest::load(&path, &Builtins::default()).unwrap();
    assert_eq!(manifest.entries[0].name, "pair");
    assert_eq!(manifest.entries[0].to_update, vec!["notes", "mail"]);
}

#[test]
fn test_unknown_key_is_rejected() {
    let tree = SyncTree::new();
    let path = tree.write_manifest_raw(
        "fpsync.toml",
        "must_exist = \"/\"\nto_updte = []\n",
    );

    let err = Manifest::load(&path, &Builtins::default()).unwrap_err();
    assert!(matches!(err, Error::Fs(fpsync_fs::Error::ConfigParse { .. })));
}

#[test]
fn test_missing_exclude_file_is_rejected() {
    let tree = SyncTree::new();
    let content = format!(
        "must_exist = \"/\"\n[[to_update]]\ndir1 = \"/a\"\ndir2 = \"/b\"\nexclude_from = \"{}/nope\"\nto_update = \"x\"\n",
        toml_path(tree.root())
    );
    let path = tree.write_manifest_raw("fpsync.toml", &content);

    let err = Manifest::load(&path, &Builtins::default()).unwrap_err();
    assert!(matches!(err, Error::InvalidManifest { .. }));
}

#[test]
fn test_exclude_file_from_builtin() {
    let tree = SyncTree::new();
    let excludes = tree.write("excludes.txt", "*.o\n");
    let content = "must_exist = \"/\"\n[[to_update]]\ndir1 = \"/a\"\ndir2 = \"/b\"\nexclude_from = \"${excludes}\"\nto_update = \"x\"\n";
    let path = tree.write_manifest_raw("fpsync.toml", content);
    let builtins = Builtins {
        excludes: Some(toml_path(&excludes)),
        ..Default::default()
    };

    let manifest = Manifest::load(&path, &builtins).unwrap();
    assert_eq!(
        manifest.entries[0].exclude_from,
        Some(PathBuf::from(toml_path(&excludes)))
    );
}

#[test]
fn test_discover_explicit_missing() {
    let tree = SyncTree::new();
    let err = Manifest::discover(Some(&tree.root().join("absent.toml"))).unwrap_err();
    assert!(matches!(err, Error::ConfigNotFound { .. }));
}

#[test]
fn test_discover_explicit_present() {
    let tree = SyncTree::new();
    let path = tree.write_manifest(&["x"]);
    assert_eq!(Manifest::discover(Some(&path)).unwrap(), path);
}
