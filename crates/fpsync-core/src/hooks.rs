//! Lifecycle hooks around a batch run
//!
//! Hooks are declared in the manifest as `[[hooks]]` entries and executed
//! as subprocesses: `pre-run` hooks before the first transfer, `post-run`
//! hooks after the last one.

use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::context::{Console, ExecutionContext};
use crate::error::{Error, Result};
use crate::runner::{CommandRunner, Invocation};

/// Events that can trigger hooks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum HookEvent {
    /// Before the first transfer
    PreRun,
    /// After the last transfer
    PostRun,
}

impl fmt::Display for HookEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PreRun => write!(f, "pre-run"),
            Self::PostRun => write!(f, "post-run"),
        }
    }
}

/// Configuration for a single hook
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HookConfig {
    /// The event that triggers this hook
    pub event: HookEvent,
    /// The command to execute
    pub command: String,
    /// Arguments to pass to the command
    #[serde(default)]
    pub args: Vec<String>,
    /// Working directory override (defaults to the invoking directory)
    pub working_dir: Option<PathBuf>,
}

/// Context variables available to hooks during execution
#[derive(Debug, Clone, Default)]
pub struct HookContext {
    /// Variables available for substitution in hook args
    pub vars: HashMap<String, String>,
}

impl HookContext {
    /// Create context for a batch run in the given direction
    pub fn for_run(direction: &str, ctx: &ExecutionContext) -> Self {
        let mut vars = HashMap::new();
        vars.insert("FPSYNC_DIRECTION".to_string(), direction.to_string());
        vars.insert("FPSYNC_DRY_RUN".to_string(), ctx.dry_run.to_string());
        Self { vars }
    }
}

/// Run all hooks matching the given event
///
/// Hooks are executed in order. If a hook fails (non-zero exit), execution
/// stops and an error is returned. In debug mode the hooks are only echoed.
pub fn run_hooks<R, C>(
    hooks: &[HookConfig],
    event: HookEvent,
    context: &HookContext,
    default_dir: &Path,
    ctx: &ExecutionContext,
    runner: &mut R,
    console: &mut C,
) -> Result<usize>
where
    R: CommandRunner + ?Sized,
    C: Console + ?Sized,
{
    let mut ran = 0;

    for hook in hooks.iter().filter(|h| h.event == event) {
        let invocation = hook_invocation(hook, context, default_dir);

        if ctx.echoes_commands() {
            console.command(&invocation);
        }
        if !ctx.executes() {
            continue;
        }

        let output = runner.output(&invocation).map_err(|e| Error::HookFailed {
            event: event.to_string(),
            command: hook.command.clone(),
            message: e.to_string(),
        })?;
        if !ctx.quiet {
            console.output(&output);
        }

        if !output.success() {
            // Include stderr in the error message for actionable diagnostics
            let stderr_snippet = output.stderr.trim();
            let message = if stderr_snippet.is_empty() {
                format!("exited with non-zero status (exit code: {:?})", output.code)
            } else {
                format!(
                    "exited with non-zero status (exit code: {:?}): {}",
                    output.code, stderr_snippet
                )
            };
            return Err(Error::HookFailed {
                event: event.to_string(),
                command: hook.command.clone(),
                message,
            });
        }
        ran += 1;
    }

    Ok(ran)
}

fn hook_invocation(hook: &HookConfig, context: &HookContext, default_dir: &Path) -> Invocation {
    let work_dir = hook.working_dir.as_deref().unwrap_or(default_dir);

    let mut invocation = Invocation::new(&hook.command)
        .args(hook.args.iter().map(|arg| substitute_vars(arg, &context.vars)))
        .current_dir(work_dir);
    for (key, value) in &context.vars {
        invocation = invocation.env(key, value);
    }
    invocation
}

/// Substitute ${VAR_NAME} patterns in a string with context variables
fn substitute_vars(input: &str, vars: &HashMap<String, String>) -> String {
    let mut result = input.to_string();
    for (key, value) in vars {
        let pattern = format!("${{{}}}", key);
        result = result.replace(&pattern, value);
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::NullConsole;
    use crate::runner::CapturedOutput;

    struct FixedRunner {
        code: i32,
        seen: Vec<Invocation>,
    }

    impl CommandRunner for FixedRunner {
        fn output(&mut self, invocation: &Invocation) -> Result<CapturedOutput> {
            self.seen.push(invocation.clone());
            Ok(CapturedOutput {
                code: Some(self.code),
                stdout: String::new(),
                stderr: "boom".into(),
            })
        }

        fn status(&mut self, invocation: &Invocation) -> Result<Option<i32>> {
            self.seen.push(invocation.clone());
            Ok(Some(self.code))
        }
    }

    fn hook(event: HookEvent) -> HookConfig {
        HookConfig {
            event,
            command: "mount-check".to_string(),
            args: vec!["--dir=${FPSYNC_DIRECTION}".to_string()],
            working_dir: None,
        }
    }

    #[test]
    fn test_hook_event_display() {
        assert_eq!(HookEvent::PreRun.to_string(), "pre-run");
        assert_eq!(HookEvent::PostRun.to_string(), "post-run");
    }

    #[test]
    fn test_hook_config_deserialize() {
        let hook: HookConfig = serde_json::from_value(serde_json::json!({
            "event": "post-run",
            "command": "notify-send",
            "args": ["done"]
        }))
        .unwrap();
        assert_eq!(hook.event, HookEvent::PostRun);
        assert_eq!(hook.args, vec!["done"]);
    }

    #[test]
    fn test_substitute_vars() {
        let mut vars = HashMap::new();
        vars.insert("FPSYNC_DIRECTION".to_string(), "up".to_string());
        assert_eq!(substitute_vars("going ${FPSYNC_DIRECTION}", &vars), "going up");
        assert_eq!(substitute_vars("no vars here", &vars), "no vars here");
    }

    #[test]
    fn test_only_matching_hooks_run() {
        let hooks = vec![hook(HookEvent::PreRun), hook(HookEvent::PostRun)];
        let ctx = ExecutionContext::default();
        let mut runner = FixedRunner { code: 0, seen: Vec::new() };

        let ran = run_hooks(
            &hooks,
            HookEvent::PreRun,
            &HookContext::for_run("up", &ctx),
            Path::new("/"),
            &ctx,
            &mut runner,
            &mut NullConsole,
        )
        .unwrap();

        assert_eq!(ran, 1);
        assert_eq!(runner.seen[0].args, vec!["--dir=up"]);
        assert!(runner.seen[0].env.contains(&("FPSYNC_DIRECTION".into(), "up".into())));
    }

    #[test]
    fn test_failing_hook_reports_stderr() {
        let hooks = vec![hook(HookEvent::PreRun)];
        let ctx = ExecutionContext::default();
        let mut runner = FixedRunner { code: 3, seen: Vec::new() };

        let err = run_hooks(
            &hooks,
            HookEvent::PreRun,
            &HookContext::default(),
            Path::new("/"),
            &ctx,
            &mut runner,
            &mut NullConsole,
        )
        .unwrap_err();

        assert!(err.to_string().contains("boom"));
    }

    #[test]
    fn test_debug_mode_runs_nothing() {
        let hooks = vec![hook(HookEvent::PreRun)];
        let ctx = ExecutionContext {
            debug: true,
            ..Default::default()
        };
        let mut runner = FixedRunner { code: 0, seen: Vec::new() };

        let ran = run_hooks(
            &hooks,
            HookEvent::PreRun,
            &HookContext::default(),
            Path::new("/"),
            &ctx,
            &mut runner,
            &mut NullConsole,
        )
        .unwrap();

        assert_eq!(ran, 0);
        assert!(runner.seen.is_empty());
    }
}
