//! Post-tool-use hook handling.
//!
//! The hook receives a JSON event on stdin describing a tool invocation. File
//! writes and edits inside a Knowledge folder resync that folder's manifest.
//! Shell commands carry no reliable target path, so any command mentioning the
//! Knowledge folder resyncs every pillar.

use anyhow::Result;
use serde::Deserialize;
use std::path::{Component, Path, PathBuf};

use crate::config::LayoutConfig;
use crate::manifest::{self, SyncOutcome};
use crate::vault;

#[derive(Debug, thiserror::Error)]
pub enum EventError {
    #[error("invalid event JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),
    #[error("event for {tool} is missing `{field}`")]
    MissingField { tool: String, field: &'static str },
}

/// The tool invocations the hook reacts to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HookAction {
    /// A file was created, written or edited.
    FileChanged(PathBuf),
    /// A shell command ran; only its text is known.
    ShellCommand(String),
    /// Any other tool.
    Other(String),
}

#[derive(Debug, Deserialize)]
struct RawEvent {
    #[serde(default)]
    tool_name: String,
    #[serde(default)]
    tool_input: serde_json::Map<String, serde_json::Value>,
}

impl HookAction {
    /// Decode a hook event.
    pub fn parse(input: &str) -> Result<Self, EventError> {
        let raw: RawEvent = serde_json::from_str(input)?;
        let field = |name: &'static str| {
            raw.tool_input
                .get(name)
                .and_then(|v| v.as_str())
                .filter(|s| !s.is_empty())
                .map(str::to_owned)
                .ok_or_else(|| EventError::MissingField {
                    tool: raw.tool_name.clone(),
                    field: name,
                })
        };

        match raw.tool_name.as_str() {
            "Write" | "Edit" => Ok(Self::FileChanged(PathBuf::from(field("file_path")?))),
            "Bash" => Ok(Self::ShellCommand(field("command")?)),
            other => Ok(Self::Other(other.to_string())),
        }
    }
}

/// What handling an event did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HookOutcome {
    Ignored,
    Synced {
        /// Knowledge folders that were checked.
        folders: Vec<PathBuf>,
        /// How many of them were rewritten.
        rewritten: usize,
    },
}

/// Apply `action` to the vault at `project_dir`.
pub fn handle(action: &HookAction, project_dir: &Path, layout: &LayoutConfig) -> Result<HookOutcome> {
    let folders = match action {
        HookAction::FileChanged(path) => {
            let path = if path.is_absolute() {
                normalize(path)
            } else {
                normalize(&project_dir.join(path))
            };
            match manifest::find_knowledge_dir(&path, layout) {
                Some(dir) => vec![dir],
                None => {
                    tracing::debug!(path = %path.display(), "not inside a knowledge folder");
                    return Ok(HookOutcome::Ignored);
                }
            }
        }
        HookAction::ShellCommand(command) => {
            let needle = format!("{}/", layout.knowledge_dir);
            if !command.contains(&needle) {
                return Ok(HookOutcome::Ignored);
            }
            vault::knowledge_pillars(project_dir, layout)
                .into_iter()
                .map(|pillar| project_dir.join(pillar).join(&layout.knowledge_dir))
                .filter(|dir| dir.is_dir())
                .collect()
        }
        HookAction::Other(tool) => {
            tracing::debug!(tool = %tool, "tool not handled");
            return Ok(HookOutcome::Ignored);
        }
    };

    let mut rewritten = 0;
    for folder in &folders {
        if !folder.is_dir() {
            continue;
        }
        if manifest::sync_manifest(folder, layout, false)? == SyncOutcome::Updated {
            rewritten += 1;
        }
    }

    Ok(HookOutcome::Synced { folders, rewritten })
}

/// Fold `.` and `..` components without touching the filesystem, so a path
/// that only passes through a Knowledge folder is not attributed to it.
fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match out.components().next_back() {
                Some(Component::Normal(_)) => {
                    out.pop();
                }
                Some(Component::RootDir | Component::Prefix(_)) => {}
                _ => out.push(component),
            },
            other => out.push(other),
        }
    }
    out
}
