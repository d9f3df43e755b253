//! [`SyncTree`]: two temporary directories to synchronize.

use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

/// A temporary root holding `left/` and `right/` directories, with helpers
/// to populate them and to write a manifest pointing at them.
///
/// # Example
///
/// ```rust
/// use fpsync_test_utils::SyncTree;
///
/// let tree = SyncTree::new();
/// tree.write_left("notes/todo.txt", "milk");
/// let manifest = tree.write_manifest(&["notes"]);
/// assert!(manifest.is_file());
/// ```
pub struct SyncTree {
    temp_dir: TempDir,
}

impl Default for SyncTree {
    fn default() -> Self {
        Self::new()
    }
}

impl SyncTree {
    /// Create the root with empty `left/` and `right/`.
    pub fn new() -> Self {
        let temp_dir = TempDir::new().unwrap();
        fs::create_dir(temp_dir.path().join("left")).unwrap();
        fs::create_dir(temp_dir.path().join("right")).unwrap();
        Self { temp_dir }
    }

    pub fn root(&self) -> &Path {
        self.temp_dir.path()
    }

    pub fn left(&self) -> PathBuf {
        self.root().join("left")
    }

    pub fn right(&self) -> PathBuf {
        self.root().join("right")
    }

    /// Write a file under `left/`, creating parents.
    pub fn write_left(&self, relative: &str, content: &str) -> PathBuf {
        write(&self.left().join(relative), content)
    }

    /// Write a file under `right/`, creating parents.
    pub fn write_right(&self, relative: &str, content: &str) -> PathBuf {
        write(&self.right().join(relative), content)
    }

    /// Write a file anywhere under the root.
    pub fn write(&self, relative: &str, content: &str) -> PathBuf {
        write(&self.root().join(relative), content)
    }

    /// Write `fpsync.toml` with one entry syncing `subpaths` between
    /// `left/` and `right/`.
    pub fn write_manifest(&self, subpaths: &[&str]) -> PathBuf {
        let list = subpaths
            .iter()
            .map(|s| format!("\"{}\"", s))
            .collect::<Vec<_>>()
            .join(", ");
        let content = format!(
            "must_exist = \"{root}\"\n\n[[to_update]]\nname = \"pair\"\ndir1 = \"{left}\"\ndir2 = \"{right}\"\nto_update = [{list}]\n",
            root = toml_path(self.root()),
            left = toml_path(&self.left()),
            right = toml_path(&self.right()),
        );
        self.write("fpsync.toml", &content)
    }

    /// Write a manifest with arbitrary content.
    pub fn write_manifest_raw(&self, name: &str, content: &str) -> PathBuf {
        self.write(name, content)
    }

    /// Read a file relative to the root.
    pub fn read(&self, relative: &str) -> String {
        let path = self.root().join(relative);
        fs::read_to_string(&path)
            .unwrap_or_else(|_| panic!("Could not read file: {}", path.display()))
    }
}

/// Forward slashes keep Windows paths valid inside TOML basic strings.
pub fn toml_path(path: &Path) -> String {
    path.display().to_string().replace('\\', "/")
}

fn write(path: &Path, content: &str) -> PathBuf {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, content).unwrap();
    path.to_path_buf()
}
