//! Filesystem operations used around a mirroring run

use std::fs::{self, File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};

use crate::{Error, Result};

/// How a finished log is merged into its final location.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    /// Append to whatever is already at the destination.
    Append,
    /// Replace the destination.
    Replace,
}

/// Outcome of [`prepare_destination`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DestinationState {
    /// The directory already existed.
    Existing,
    /// The directory was missing and has been created.
    Created,
}

/// Make sure a local destination directory exists.
///
/// A missing path is created (with parents). A path that exists but is not
/// a directory is an error.
pub fn prepare_destination(path: &Path) -> Result<DestinationState> {
    match fs::metadata(path) {
        Ok(meta) if meta.is_dir() => Ok(DestinationState::Existing),
        Ok(_) => Err(Error::NotADirectory {
            path: path.to_path_buf(),
        }),
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            fs::create_dir_all(path).map_err(|e| Error::io(path, e))?;
            tracing::info!(path = %path.display(), "created missing destination directory");
            Ok(DestinationState::Created)
        }
        Err(e) => Err(Error::io(path, e)),
    }
}

/// Return the first candidate that exists on disk.
pub fn first_existing<I, P>(candidates: I) -> Option<PathBuf>
where
    I: IntoIterator<Item = P>,
    P: AsRef<Path>,
{
    candidates
        .into_iter()
        .map(|p| p.as_ref().to_path_buf())
        .find(|p| p.exists())
}

/// Whether two local paths refer to the same directory.
///
/// Falls back to a plain comparison when either side cannot be resolved.
pub fn same_location(a: &Path, b: &Path) -> bool {
    match (dunce::canonicalize(a), dunce::canonicalize(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => a == b,
    }
}

/// Whether an I/O error reports a rename across storage volumes.
pub fn is_cross_device(err: &io::Error) -> bool {
    #[cfg(unix)]
    const EXDEV: i32 = 18;
    #[cfg(windows)]
    const EXDEV: i32 = 17; // ERROR_NOT_SAME_DEVICE
    #[cfg(not(any(unix, windows)))]
    const EXDEV: i32 = -1;

    err.kind() == io::ErrorKind::CrossesDevices || err.raw_os_error() == Some(EXDEV)
}

/// Move or append `src` into `dest`, consuming `src`.
pub fn place_file(src: &Path, dest: &Path, placement: Placement) -> Result<()> {
    place_file_with(src, dest, placement, |from, to| fs::rename(from, to))
}

/// [`place_file`] with an injectable rename step.
///
/// When the rename fails because `src` and `dest` live on different
/// volumes, the content is copied instead and `src` removed afterwards.
pub fn place_file_with<R>(src: &Path, dest: &Path, placement: Placement, rename: R) -> Result<()>
where
    R: FnOnce(&Path, &Path) -> io::Result<()>,
{
    if let Some(parent) = dest.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| Error::io(parent, e))?;
    }

    match placement {
        Placement::Append => append_file(src, dest)?,
        Placement::Replace => match rename(src, dest) {
            Ok(()) => return Ok(()),
            Err(e) if is_cross_device(&e) => {
                tracing::debug!(
                    src = %src.display(),
                    dest = %dest.display(),
                    "rename crosses volumes, copying instead"
                );
                fs::copy(src, dest).map_err(|e| Error::io(dest, e))?;
            }
            Err(e) => return Err(Error::io(dest, e)),
        },
    }

    if let Err(e) = fs::remove_file(src) {
        tracing::debug!(path = %src.display(), error = %e, "could not remove staged file");
    }
    Ok(())
}

/// Append the content of `src` to `dest`, creating `dest` when missing.
pub fn append_file(src: &Path, dest: &Path) -> Result<()> {
    let mut reader = File::open(src).map_err(|e| Error::io(src, e))?;
    let mut writer = OpenOptions::new()
        .create(true)
        .append(true)
        .open(dest)
        .map_err(|e| Error::io(dest, e))?;
    io::copy(&mut reader, &mut writer).map_err(|e| Error::io(dest, e))?;
    Ok(())
}

/// Read text content from a file.
pub fn read_text(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|e| Error::io(path, e))
}
