//! Pillar discovery and note listing.
//!
//! A pillar is any non-hidden top-level folder of the vault that contains at
//! least one of the marker folders (Inbox, Projects, Knowledge). Nothing is
//! registered anywhere: pillars are rediscovered from the directory tree on
//! every run.

use std::path::{Path, PathBuf};

use crate::config::LayoutConfig;

/// Folder names starting with this prefix are never pillars (`.git`, `.obsidian`).
pub const HIDDEN_PREFIX: char = '.';

/// Markdown extension recognized for notes.
pub const NOTE_EXTENSION: &str = "md";

/// The three marker subfolders a pillar may contain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Marker {
    Inbox,
    Projects,
    Knowledge,
}

impl Marker {
    pub const ALL: [Marker; 3] = [Marker::Inbox, Marker::Projects, Marker::Knowledge];

    /// Folder name for this marker under the given layout.
    pub fn dir_name<'a>(&self, layout: &'a LayoutConfig) -> &'a str {
        match self {
            Self::Inbox => &layout.inbox_dir,
            Self::Projects => &layout.projects_dir,
            Self::Knowledge => &layout.knowledge_dir,
        }
    }
}

/// Names of the root's immediate subdirectories that are not hidden and hold
/// at least one of `markers`. Sorted; a missing root yields an empty list.
pub fn discover_pillars(root: &Path, layout: &LayoutConfig, markers: &[Marker]) -> Vec<String> {
    let entries = match std::fs::read_dir(root) {
        Ok(entries) => entries,
        Err(err) => {
            tracing::debug!(root = %root.display(), %err, "vault root not readable");
            return Vec::new();
        }
    };

    let mut pillars: Vec<String> = entries
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.path().is_dir())
        .filter_map(|entry| entry.file_name().into_string().ok())
        .filter(|name| !name.starts_with(HIDDEN_PREFIX))
        .filter(|name| {
            markers
                .iter()
                .any(|m| root.join(name).join(m.dir_name(layout)).exists())
        })
        .collect();

    pillars.sort();
    pillars
}

/// Pillars with a Knowledge folder, used by manifest sync.
pub fn knowledge_pillars(root: &Path, layout: &LayoutConfig) -> Vec<String> {
    discover_pillars(root, layout, &[Marker::Knowledge])
}

/// Pillars with any marker folder, used by the scanner.
pub fn scan_pillars(root: &Path, layout: &LayoutConfig) -> Vec<String> {
    discover_pillars(root, layout, &Marker::ALL)
}

/// Markdown files directly inside `dir`, sorted by file name. `exclude` names a
/// file to leave out (the manifest). A missing directory yields an empty list.
pub fn list_notes(dir: &Path, exclude: Option<&str>) -> Vec<PathBuf> {
    let entries = match std::fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(_) => return Vec::new(),
    };

    let mut notes: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.is_file() && is_note(path))
        .filter(|path| match (exclude, path.file_name()) {
            (Some(skip), Some(name)) => name != skip,
            _ => true,
        })
        .collect();

    notes.sort_by_key(|path| note_stem(path));
    notes
}

/// Whether `path` has the Markdown note extension.
pub fn is_note(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == NOTE_EXTENSION)
}

/// File name without extension, the canonical note identifier.
pub fn note_stem(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// File name with extension, lossily converted.
pub fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}
