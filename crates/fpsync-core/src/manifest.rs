//! Manifest parsing and validation
//!
//! The manifest is a declarative document (TOML, YAML or JSON) describing
//! which directory pairs to keep in sync. It is loaded in two steps: serde
//! parses the raw [`ManifestFile`], then [`Manifest::resolve`] expands
//! variables and validates everything before any transfer is attempted.
//!
//! ```toml
//! must_exist = "~/.ssh"
//!
//! [vars]
//! server_home = "${host}:${start_dir}"
//!
//! [[to_update]]
//! name = "home"
//! dir1 = "~"
//! dir2 = "${server_home}"
//! exclude_from = "${excludes}"
//! to_update = ".bashrc .emacs.d Documents"
//! ```

use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};

use fpsync_fs::{ConfigStore, KnownPath, SyncPath, io};
use serde::Deserialize;

use crate::error::{Error, Result};
use crate::hooks::HookConfig;

/// A string or a list of strings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum StringOrList {
    One(String),
    Many(Vec<String>),
}

/// Raw manifest document as written by the user.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ManifestFile {
    /// Path or paths that must exist before anything runs
    pub must_exist: StringOrList,

    /// User variables, usable as `${name}` in any path
    #[serde(default)]
    pub vars: BTreeMap<String, String>,

    /// Lifecycle hooks
    #[serde(default)]
    pub hooks: Vec<HookConfig>,

    /// Directory pairs to synchronize
    #[serde(default)]
    pub to_update: Vec<EntryFile>,
}

/// Raw `[[to_update]]` entry.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EntryFile {
    pub name: Option<String>,
    pub dir1: String,
    pub dir2: String,
    #[serde(default)]
    pub exclude_from: Option<String>,
    /// List of names, or one whitespace-separated string
    pub to_update: StringOrList,
    /// Only sync this entry on these operating systems
    #[serde(default)]
    pub platforms: Option<Vec<String>>,
}

/// Values supplied from the command line, available as `${host}`,
/// `${start_dir}` and `${excludes}`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Builtins {
    pub host: Option<String>,
    pub start_dir: Option<String>,
    pub excludes: Option<String>,
}

impl Builtins {
    fn get(&self, name: &str) -> Option<String> {
        match name {
            "host" => self.host.clone(),
            "start_dir" => self.start_dir.clone(),
            "excludes" => self.excludes.clone(),
            _ => None,
        }
    }
}

/// One validated directory pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestEntry {
    pub name: String,
    pub dir1: SyncPath,
    pub dir2: SyncPath,
    pub exclude_from: Option<PathBuf>,
    pub to_update: Vec<String>,
}

/// A fully resolved manifest.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Manifest {
    pub must_exist: Vec<PathBuf>,
    pub hooks: Vec<HookConfig>,
    pub entries: Vec<ManifestEntry>,
}

impl Manifest {
    /// Locate the manifest: `explicit` if given, else the first default
    /// location that exists.
    pub fn discover(explicit: Option<&Path>) -> Result<PathBuf> {
        if let Some(path) = explicit {
            let expanded = PathBuf::from(fpsync_fs::expand_env(&path.to_string_lossy())?);
            return if expanded.is_file() {
                Ok(expanded)
            } else {
                Err(Error::ConfigNotFound { path: expanded })
            };
        }

        let candidates = KnownPath::manifest_candidates();
        io::first_existing(&candidates).ok_or_else(|| Error::ConfigNotFound {
            path: candidates
                .into_iter()
                .next()
                .unwrap_or_else(|| PathBuf::from(KnownPath::HomeManifest.as_str())),
        })
    }

    /// Load and resolve a manifest file.
    pub fn load(path: &Path, builtins: &Builtins) -> Result<Self> {
        if !path.is_file() {
            return Err(Error::ConfigNotFound {
                path: path.to_path_buf(),
            });
        }
        let file: ManifestFile = ConfigStore::new().load(path)?;
        tracing::debug!(path = %path.display(), entries = file.to_update.len(), "loaded manifest");
        Self::resolve(file, builtins)
    }

    /// Parse TOML content and resolve it.
    pub fn parse(content: &str, builtins: &Builtins) -> Result<Self> {
        let file: ManifestFile =
            ConfigStore::new().parse(content, "toml", Path::new("<inline>"))?;
        Self::resolve(file, builtins)
    }

    /// Expand variables and validate a raw manifest.
    pub fn resolve(file: ManifestFile, builtins: &Builtins) -> Result<Self> {
        let vars = resolve_vars(&file.vars, builtins)?;
        let expand = |input: &str| -> Result<String> {
            Ok(fpsync_fs::expand(input, |name| lookup(name, &vars, builtins))?)
        };

        let must_exist: Vec<PathBuf> = match &file.must_exist {
            StringOrList::One(path) => vec![path.clone()],
            StringOrList::Many(paths) => paths.clone(),
        }
        .iter()
        .map(|p| expand(p).map(PathBuf::from))
        .collect::<Result<_>>()?;

        if must_exist.is_empty() {
            return Err(Error::invalid_manifest("must_exist lists no paths"));
        }

        let mut entries = Vec::new();
        for (index, raw) in file.to_update.iter().enumerate() {
            if !applies_to_this_platform(raw.platforms.as_deref()) {
                tracing::debug!(entry = index, "skipping entry for other platform");
                continue;
            }
            entries.push(resolve_entry(index, raw, &expand)?);
        }

        let hooks = file
            .hooks
            .into_iter()
            .map(|mut hook| -> Result<HookConfig> {
                hook.command = fpsync_fs::expand_home(&hook.command)?;
                Ok(hook)
            })
            .collect::<Result<_>>()?;

        Ok(Self {
            must_exist,
            hooks,
            entries,
        })
    }

    /// Fail on the first required path that does not exist.
    pub fn check_required_paths(&self) -> Result<()> {
        match self.must_exist.iter().find(|p| !p.exists()) {
            Some(path) => Err(Error::MissingRequiredPath { path: path.clone() }),
            None => Ok(()),
        }
    }
}

fn lookup(name: &str, vars: &HashMap<String, String>, builtins: &Builtins) -> Option<String> {
    vars.get(name)
        .cloned()
        .or_else(|| builtins.get(name))
        .or_else(|| std::env::var(name).ok())
}

/// Resolve user variables, which may refer to each other in any order.
///
/// A user variable shadows a builtin or environment variable of the same
/// name even before it has been resolved itself.
fn resolve_vars(
    raw: &BTreeMap<String, String>,
    builtins: &Builtins,
) -> Result<HashMap<String, String>> {
    let mut resolved = HashMap::new();
    let mut pending: Vec<(&String, &String)> = raw.iter().collect();

    while !pending.is_empty() {
        let before = pending.len();
        let mut deferred = Vec::new();

        for (name, value) in pending {
            let known = |n: &str| {
                if raw.contains_key(n) {
                    resolved.get(n).cloned()
                } else {
                    lookup(n, &resolved, builtins)
                }
            };
            match fpsync_fs::expand(value, known) {
                Ok(expanded) => {
                    resolved.insert(name.clone(), expanded);
                }
                Err(fpsync_fs::Error::UndefinedVariable { name: missing, .. })
                    if raw.contains_key(&missing) && !resolved.contains_key(&missing) =>
                {
                    deferred.push((name, value));
                }
                Err(e) => return Err(e.into()),
            }
        }

        if deferred.len() == before {
            let names: Vec<&str> = deferred.iter().map(|(n, _)| n.as_str()).collect();
            return Err(Error::invalid_manifest(format!(
                "circular variable references: {}",
                names.join(", ")
            )));
        }
        pending = deferred;
    }

    Ok(resolved)
}

fn resolve_entry<F>(index: usize, raw: &EntryFile, expand: &F) -> Result<ManifestEntry>
where
    F: Fn(&str) -> Result<String>,
{
    let label = raw
        .name
        .clone()
        .unwrap_or_else(|| format!("to_update[{}]", index));

    let dir1 = expand(&raw.dir1)?;
    let dir2 = expand(&raw.dir2)?;
    if dir1.is_empty() || dir2.is_empty() {
        return Err(Error::invalid_manifest(format!("{label}: dir1 and dir2 must be set")));
    }

    let to_update: Vec<String> = match &raw.to_update {
        StringOrList::One(words) => words.split_whitespace().map(str::to_string).collect(),
        StringOrList::Many(items) => items.clone(),
    };
    if to_update.is_empty() {
        return Err(Error::invalid_manifest(format!("{label}: to_update is empty")));
    }
    for sub in &to_update {
        validate_subpath(&label, sub)?;
    }

    let exclude_from = match raw.exclude_from.as_deref().map(expand).transpose()? {
        Some(path) if !path.is_empty() => {
            let path = PathBuf::from(path);
            if !path.is_file() {
                return Err(Error::invalid_manifest(format!(
                    "{label}: exclude_from file {} does not exist",
                    path.display()
                )));
            }
            Some(path)
        }
        _ => None,
    };

    let name = raw
        .name
        .clone()
        .unwrap_or_else(|| format!("{} <-> {}", dir1, dir2));

    Ok(ManifestEntry {
        name,
        dir1: SyncPath::parse(&dir1),
        dir2: SyncPath::parse(&dir2),
        exclude_from,
        to_update,
    })
}

/// Subpaths are single names relative to both directories.
///
/// A nested `a/b` would be copied to the top of the destination, and a
/// trailing `/` makes the tool copy contents instead of the directory.
fn validate_subpath(label: &str, sub: &str) -> Result<()> {
    let problem = if sub.is_empty() {
        Some("empty name")
    } else if sub.ends_with('/') {
        Some("must not end with '/'")
    } else if sub.starts_with('/') {
        Some("must be relative")
    } else if sub.contains('/') {
        Some("must not contain subdirectories; add a separate entry instead")
    } else if sub == "." || sub == ".." {
        Some("must name a file or directory")
    } else {
        None
    };

    match problem {
        Some(why) => Err(Error::invalid_manifest(format!("{label}: '{sub}' {why}"))),
        None => Ok(()),
    }
}

fn applies_to_this_platform(platforms: Option<&[String]>) -> bool {
    let Some(platforms) = platforms else {
        return true;
    };
    platforms.iter().any(|p| {
        let p = p.to_lowercase();
        let p = if p == "darwin" { "macos".to_string() } else { p };
        p == std::env::consts::OS
    })
}
