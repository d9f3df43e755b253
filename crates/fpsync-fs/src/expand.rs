//! `~` and `$VAR` expansion for configured paths

use std::sync::LazyLock;

use regex::{Captures, Regex};

use crate::{Error, Result};

static VAR_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\$(?:\{([A-Za-z_][A-Za-z0-9_]*)\}|([A-Za-z_][A-Za-z0-9_]*))")
        .expect("variable pattern is valid")
});

/// Expand `$NAME` and `${NAME}` references using `lookup`, then a leading `~`.
///
/// A reference that `lookup` cannot resolve is an error rather than being
/// left in place, so a typo never turns into a literal `$host` directory.
pub fn expand<F>(input: &str, lookup: F) -> Result<String>
where
    F: Fn(&str) -> Option<String>,
{
    let mut missing = None;
    let substituted = VAR_PATTERN.replace_all(input, |caps: &Captures<'_>| {
        let name = caps
            .get(1)
            .or_else(|| caps.get(2))
            .map(|m| m.as_str())
            .unwrap_or_default();
        match lookup(name) {
            Some(value) => value,
            None => {
                missing.get_or_insert_with(|| name.to_string());
                String::new()
            }
        }
    });

    if let Some(name) = missing {
        return Err(Error::UndefinedVariable {
            name,
            input: input.to_string(),
        });
    }

    expand_home(&substituted)
}

/// Expand against the process environment only.
pub fn expand_env(input: &str) -> Result<String> {
    expand(input, |name| std::env::var(name).ok())
}

/// Expand a leading `~` or `~/` to the current user's home directory.
///
/// `~user` forms and a `~` after a host marker (`box:~/x`) are left alone;
/// the latter is resolved by the remote side.
pub fn expand_home(input: &str) -> Result<String> {
    if input != "~" && !input.starts_with("~/") {
        return Ok(input.to_string());
    }
    let home = dirs::home_dir().ok_or(Error::NoHomeDirectory)?;
    let home = home.to_string_lossy().replace('\\', "/");
    Ok(format!("{}{}", home.trim_end_matches('/'), &input[1..]))
}
