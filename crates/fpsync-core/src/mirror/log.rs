//! Persistent run log
//!
//! A log record is staged in the system temp directory while the tools run,
//! so a sync that deletes or overwrites files in the synchronized trees
//! cannot clobber its own log. It is merged into its final location once
//! every pass has finished.

use std::fs::File;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use fpsync_fs::{Placement, io as fsio};
use tempfile::NamedTempFile;

use crate::error::{Error, Result};
use crate::runner::{CapturedOutput, Invocation};

use super::plan::SyncMode;

const TIMESTAMP: &str = "%Y-%m-%d %H:%M:%S";

/// Everything recorded at the top of a log record.
#[derive(Debug, Clone)]
pub struct LogHeader {
    pub started: DateTime<Local>,
    pub working_dir: PathBuf,
    pub sources: Vec<String>,
    pub destination: String,
    pub mode: SyncMode,
    pub options: Vec<String>,
}

impl LogHeader {
    pub fn render(&self) -> String {
        let mut out = String::new();
        out.push_str(&format!(
            "=== fpmirror run started {} ===\n",
            self.started.format(TIMESTAMP)
        ));
        out.push_str(&format!("Working directory: {}\n", self.working_dir.display()));
        out.push_str("Sources:\n");
        for source in &self.sources {
            out.push_str(&format!("  {}\n", source));
        }
        out.push_str(&format!("Destination: {}\n", self.destination));
        out.push_str(&format!("Mode: {}\n", self.mode));
        out.push_str(&format!("Options: {}\n", self.options.join(" ")));
        out.push('\n');
        out
    }
}

/// Footer line closing a record.
pub fn render_footer(started: &DateTime<Local>, finished: &DateTime<Local>) -> String {
    format!(
        "=== started {} / finished {} ===\n\n",
        started.format(TIMESTAMP),
        finished.format(TIMESTAMP)
    )
}

/// A log record being written.
#[derive(Debug)]
pub struct LogRecord {
    file: NamedTempFile,
    started: DateTime<Local>,
}

impl LogRecord {
    /// Stage a new record in the system temp directory.
    pub fn begin(header: &LogHeader) -> Result<Self> {
        Self::begin_in(&std::env::temp_dir(), header)
    }

    /// Stage a new record in `dir`.
    pub fn begin_in(dir: &Path, header: &LogHeader) -> Result<Self> {
        let mut file = tempfile::Builder::new()
            .prefix("fpmirror-")
            .suffix(".log")
            .tempfile_in(dir)?;
        file.write_all(header.render().as_bytes())?;
        Ok(Self {
            file,
            started: header.started,
        })
    }

    pub fn staged_path(&self) -> &Path {
        self.file.path()
    }

    /// Append one finished command and its output.
    pub fn record(&mut self, invocation: &Invocation, output: &CapturedOutput) -> Result<()> {
        let file = self.file.as_file_mut();
        writeln!(file, "$ {}", invocation)?;
        write_block(file, &output.stdout)?;
        write_block(file, &output.stderr)?;
        match output.code {
            Some(code) => writeln!(file, "[exit code: {}]", code)?,
            None => writeln!(file, "[terminated by signal]")?,
        }
        writeln!(file)?;
        Ok(())
    }

    /// Write the footer and merge the record into `dest`.
    pub fn finish(self, dest: &Path, placement: Placement) -> Result<PathBuf> {
        self.finish_with(dest, placement, |from, to| std::fs::rename(from, to))
    }

    /// [`LogRecord::finish`] with an injectable rename step.
    pub fn finish_with<R>(mut self, dest: &Path, placement: Placement, rename: R) -> Result<PathBuf>
    where
        R: FnOnce(&Path, &Path) -> io::Result<()>,
    {
        let footer = render_footer(&self.started, &Local::now());
        self.file.write_all(footer.as_bytes())?;
        self.file.as_file().sync_all()?;

        let staged = self.file.into_temp_path().keep().map_err(|e| Error::Io(e.error))?;
        if let Err(e) = fsio::place_file_with(&staged, dest, placement, rename) {
            tracing::warn!(staged = %staged.display(), "log left in staging location");
            return Err(e.into());
        }
        Ok(dest.to_path_buf())
    }
}

fn write_block(file: &mut File, text: &str) -> io::Result<()> {
    if text.is_empty() {
        return Ok(());
    }
    file.write_all(text.as_bytes())?;
    if !text.ends_with('\n') {
        file.write_all(b"\n")?;
    }
    Ok(())
}
