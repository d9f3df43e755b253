//! Terminal output

use colored::Colorize;

use fpsync_core::{CapturedOutput, Console, Invocation};

/// Renders progress to the terminal.
///
/// Commands and notes go to stdout; captured tool output is replayed on
/// the stream it came from.
#[derive(Debug, Default, Clone, Copy)]
pub struct TerminalConsole;

impl Console for TerminalConsole {
    fn command(&mut self, invocation: &Invocation) {
        println!("{} {}", "$".dimmed(), invocation);
    }

    fn output(&mut self, output: &CapturedOutput) {
        if !output.stdout.is_empty() {
            print!("{}", output.stdout);
        }
        if !output.stderr.is_empty() {
            eprint!("{}", output.stderr);
        }
    }

    fn note(&mut self, message: &str) {
        println!("{} {}", "=>".blue().bold(), message);
    }
}

pub fn ok(message: &str) {
    println!("{} {}", "OK".green().bold(), message);
}

pub fn warn(message: &str) {
    println!("{} {}", "WARN".yellow().bold(), message);
}

pub fn fail(message: &str) {
    println!("{} {}", "FAIL".red().bold(), message);
}
