//! External command execution
//!
//! Everything fpsync runs (the mirroring tool, the mirror driver itself,
//! lifecycle hooks) goes through [`CommandRunner`], so callers can swap in
//! a recorder instead of touching the real filesystem.

use std::fmt;
use std::path::PathBuf;
use std::process::{Command, Stdio};

use crate::error::{Error, Result};

/// A fully assembled command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub program: String,
    pub args: Vec<String>,
    pub current_dir: Option<PathBuf>,
    pub env: Vec<(String, String)>,
}

impl Invocation {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            current_dir: None,
            env: Vec::new(),
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn current_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.current_dir = Some(dir.into());
        self
    }

    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.push((key.into(), value.into()));
        self
    }

    /// Whether any argument equals `flag`.
    pub fn has_arg(&self, flag: &str) -> bool {
        self.args.iter().any(|a| a == flag)
    }

    fn to_command(&self, program: PathBuf) -> Command {
        let mut cmd = Command::new(program);
        cmd.args(&self.args);
        if let Some(dir) = &self.current_dir {
            cmd.current_dir(dir);
        }
        cmd.envs(self.env.iter().map(|(k, v)| (k, v)));
        cmd
    }
}

impl fmt::Display for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", shell_quote(&self.program))?;
        for arg in &self.args {
            write!(f, " {}", shell_quote(arg))?;
        }
        Ok(())
    }
}

/// Quote an argument for display so the printed line can be pasted into a shell.
fn shell_quote(arg: &str) -> String {
    let safe = !arg.is_empty()
        && arg
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || "-_./:=@,+%~".contains(c));
    if safe {
        arg.to_string()
    } else {
        format!("'{}'", arg.replace('\'', "'\\''"))
    }
}

/// Result of a command run with captured output.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CapturedOutput {
    /// Exit code; `None` when terminated by a signal
    pub code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl CapturedOutput {
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }
}

/// Executes invocations.
pub trait CommandRunner {
    /// Run to completion, capturing stdout and stderr.
    fn output(&mut self, invocation: &Invocation) -> Result<CapturedOutput>;

    /// Run to completion with inherited stdio, returning the exit code.
    fn status(&mut self, invocation: &Invocation) -> Result<Option<i32>>;
}

impl<R: CommandRunner + ?Sized> CommandRunner for &mut R {
    fn output(&mut self, invocation: &Invocation) -> Result<CapturedOutput> {
        (**self).output(invocation)
    }

    fn status(&mut self, invocation: &Invocation) -> Result<Option<i32>> {
        (**self).status(invocation)
    }
}

/// Runs commands as real child processes, resolving programs on `PATH`.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemRunner;

impl SystemRunner {
    /// Locate `program` on `PATH` (or check an explicit path).
    pub fn resolve(program: &str) -> Result<PathBuf> {
        which::which(program).map_err(|_| Error::ToolNotFound {
            program: program.to_string(),
        })
    }
}

impl CommandRunner for SystemRunner {
    fn output(&mut self, invocation: &Invocation) -> Result<CapturedOutput> {
        let program = Self::resolve(&invocation.program)?;
        tracing::debug!(command = %invocation, "running");

        let output = invocation
            .to_command(program)
            .stdin(Stdio::null())
            .output()?;

        Ok(CapturedOutput {
            code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }

    fn status(&mut self, invocation: &Invocation) -> Result<Option<i32>> {
        let program = Self::resolve(&invocation.program)?;
        tracing::debug!(command = %invocation, "running");

        let status = invocation.to_command(program).status()?;
        Ok(status.code())
    }
}
