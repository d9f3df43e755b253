//! Recording stand-ins for [`CommandRunner`] and [`Console`].

use std::collections::VecDeque;

use fpsync_core::{CapturedOutput, CommandRunner, Console, Invocation, Result};

/// A [`CommandRunner`] that records every invocation and runs nothing.
///
/// Exit codes are taken from a queue, in order; once the queue is empty
/// every invocation succeeds.
///
/// ```rust
/// use fpsync_core::{CommandRunner, Invocation};
/// use fpsync_test_utils::RecordingRunner;
///
/// let mut runner = RecordingRunner::new().with_exit_codes([23]);
/// let inv = Invocation::new("rsync").arg("-a");
/// assert_eq!(runner.status(&inv).unwrap(), Some(23));
/// assert_eq!(runner.status(&inv).unwrap(), Some(0));
/// assert_eq!(runner.invocations.len(), 2);
/// ```
#[derive(Debug, Default)]
pub struct RecordingRunner {
    /// Everything run so far, in order
    pub invocations: Vec<Invocation>,
    exit_codes: VecDeque<i32>,
    stdout: String,
}

impl RecordingRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue exit codes for the next invocations.
    pub fn with_exit_codes(mut self, codes: impl IntoIterator<Item = i32>) -> Self {
        self.exit_codes.extend(codes);
        self
    }

    /// Text every invocation prints on stdout.
    pub fn with_stdout(mut self, stdout: impl Into<String>) -> Self {
        self.stdout = stdout.into();
        self
    }

    /// Programs run so far, in order.
    pub fn programs(&self) -> Vec<&str> {
        self.invocations.iter().map(|i| i.program.as_str()).collect()
    }

    fn next_code(&mut self, invocation: &Invocation) -> i32 {
        self.invocations.push(invocation.clone());
        self.exit_codes.pop_front().unwrap_or(0)
    }
}

impl CommandRunner for RecordingRunner {
    fn output(&mut self, invocation: &Invocation) -> Result<CapturedOutput> {
        let code = self.next_code(invocation);
        Ok(CapturedOutput {
            code: Some(code),
            stdout: self.stdout.clone(),
            stderr: if code == 0 {
                String::new()
            } else {
                format!("{} failed", invocation.program)
            },
        })
    }

    fn status(&mut self, invocation: &Invocation) -> Result<Option<i32>> {
        Ok(Some(self.next_code(invocation)))
    }
}

/// A [`Console`] that keeps everything it is shown.
#[derive(Debug, Default)]
pub struct RecordingConsole {
    pub commands: Vec<String>,
    pub outputs: Vec<CapturedOutput>,
    pub notes: Vec<String>,
}

impl RecordingConsole {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Console for RecordingConsole {
    fn command(&mut self, invocation: &Invocation) {
        self.commands.push(invocation.to_string());
    }

    fn output(&mut self, output: &CapturedOutput) {
        self.outputs.push(output.clone());
    }

    fn note(&mut self, message: &str) {
        self.notes.push(message.to_string());
    }
}
