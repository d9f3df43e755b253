//! Execution context shared by every step of a run

use crate::runner::{CapturedOutput, Invocation};

/// Run-wide switches, passed by reference to everything that acts on them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExecutionContext {
    /// Ask the mirroring tool to report what it would do without doing it
    pub dry_run: bool,
    /// Print each command before running it
    pub verbose: bool,
    /// Print each command and run nothing
    pub debug: bool,
    /// Suppress progress and tool output on the console
    pub quiet: bool,
}

impl ExecutionContext {
    /// Whether commands are actually executed.
    pub fn executes(&self) -> bool {
        !self.debug
    }

    /// Whether commands are echoed to the console.
    pub fn echoes_commands(&self) -> bool {
        self.debug || self.verbose
    }
}

/// Where user-facing progress goes.
///
/// The CLI renders to the terminal; library callers and tests can collect
/// or discard.
pub trait Console {
    /// A command that is about to run (or would run, in debug mode).
    fn command(&mut self, invocation: &Invocation);

    /// Output captured from a finished command.
    fn output(&mut self, output: &CapturedOutput);

    /// A one-line status message.
    fn note(&mut self, message: &str);
}

/// A console that discards everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullConsole;

impl Console for NullConsole {
    fn command(&mut self, _invocation: &Invocation) {}
    fn output(&mut self, _output: &CapturedOutput) {}
    fn note(&mut self, _message: &str) {}
}

impl<C: Console + ?Sized> Console for &mut C {
    fn command(&mut self, invocation: &Invocation) {
        (**self).command(invocation)
    }

    fn output(&mut self, output: &CapturedOutput) {
        (**self).output(output)
    }

    fn note(&mut self, message: &str) {
        (**self).note(message)
    }
}
