//! Sync directions and the passes they expand into

use std::fmt;
use std::str::FromStr;

use crate::error::Error;

/// Direction requested for a batch run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// dir1 -> dir2
    Up,
    /// dir2 -> dir1
    Down,
    /// Up, then down, never deleting
    Sync,
}

impl Direction {
    /// All accepted names, in help order
    pub fn all_names() -> &'static [&'static str] {
        &["up", "down", "sync"]
    }

    /// One-way passes this direction performs, in order.
    ///
    /// `sync` is two independent mirrors with deletion suppressed in both;
    /// `up` and `down` delete extraneous files unless `no_delete` is set.
    pub fn passes(self, no_delete: bool) -> Vec<Pass> {
        match self {
            Self::Up => vec![Pass {
                direction: PassDirection::Up,
                delete: !no_delete,
            }],
            Self::Down => vec![Pass {
                direction: PassDirection::Down,
                delete: !no_delete,
            }],
            Self::Sync => vec![
                Pass {
                    direction: PassDirection::Up,
                    delete: false,
                },
                Pass {
                    direction: PassDirection::Down,
                    delete: false,
                },
            ],
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Up => write!(f, "up"),
            Self::Down => write!(f, "down"),
            Self::Sync => write!(f, "sync"),
        }
    }
}

impl FromStr for Direction {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "up" => Ok(Self::Up),
            "down" => Ok(Self::Down),
            "sync" => Ok(Self::Sync),
            other => Err(Error::invalid_request(format!(
                "unknown direction '{}', expected one of: {}",
                other,
                Self::all_names().join(", ")
            ))),
        }
    }
}

/// A primitive one-way direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PassDirection {
    Up,
    Down,
}

impl fmt::Display for PassDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Up => write!(f, "up"),
            Self::Down => write!(f, "down"),
        }
    }
}

/// One full sweep over the manifest.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pass {
    pub direction: PassDirection,
    pub delete: bool,
}
