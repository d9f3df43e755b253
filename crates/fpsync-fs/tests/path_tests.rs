use fpsync_fs::SyncPath;
use pretty_assertions::assert_eq;
use rstest::rstest;

#[rstest]
#[case("/home/user/docs", false)]
#[case("relative/dir", false)]
#[case("server:/srv/data", true)]
#[case("me@server:notes", true)]
#[case("server:", true)]
#[case("/tmp/odd:name", false)]
fn test_remote_detection(#[case] input: &str, #[case] remote: bool) {
    assert_eq!(SyncPath::parse(input).is_remote(), remote);
}

#[rstest]
#[case("/a/b", "/a/b/")]
#[case("/a/b/", "/a/b/")]
#[case("server:/srv", "server:/srv/")]
#[case("server:/srv/", "server:/srv/")]
fn test_trailing_slash(#[case] input: &str, #[case] expected: &str) {
    assert_eq!(SyncPath::parse(input).with_trailing_slash().to_arg(), expected);
}

#[test]
fn test_join_keeps_host() {
    let base = SyncPath::parse("server:/srv");
    let joined = base.join("notes");
    assert_eq!(joined.host(), Some("server"));
    assert_eq!(joined.to_arg(), "server:/srv/notes");
}

#[test]
fn test_join_local() {
    let base = SyncPath::parse("/a/");
    assert_eq!(base.join("x").to_arg(), "/a/x");
}

#[test]
fn test_join_onto_remote_home() {
    let base = SyncPath::parse("server:");
    assert_eq!(base.join(".bashrc").to_arg(), "server:.bashrc");
}

#[test]
fn test_normalize_backslashes() {
    let path = SyncPath::parse("foo\\bar\\baz");
    assert_eq!(path.path(), "foo/bar/baz");
}

#[test]
fn test_display_matches_arg() {
    let path = SyncPath::parse("server:/srv");
    assert_eq!(path.to_string(), "server:/srv");
}

#[test]
fn test_to_native_local() {
    let path = SyncPath::parse("/a/b");
    assert_eq!(path.to_native(), std::path::PathBuf::from("/a/b"));
}

#[test]
#[cfg(windows)]
fn test_drive_letter_is_local() {
    let path = SyncPath::parse("C:\\data\\notes");
    assert!(!path.is_remote());
    assert_eq!(path.to_arg(), "C:/data/notes");
}

#[test]
#[cfg(not(windows))]
fn test_single_letter_host_is_remote() {
    let path = SyncPath::parse("c:/data");
    assert_eq!(path.host(), Some("c"));
    assert_eq!(path.path(), "/data");
}
