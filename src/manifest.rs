//! Knowledge manifest generation and sync.
//!
//! Every Knowledge folder carries a manifest: a Markdown table with one row per
//! note, sorted by stem, each row linking the note as `[[stem]]` next to a short
//! description. The manifest is always regenerated in full and compared
//! byte-for-byte with what is on disk; it is never patched in place.

use anyhow::{Context, Result};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use crate::config::LayoutConfig;
use crate::vault;

/// Title line plus table header of every manifest.
pub const MANIFEST_HEADER: &str = "# Knowledge Manifest\n\n| File | Description |\n|------|-------------|\n";

/// Row emitted when the folder has no notes.
pub const EMPTY_ROW: &str = "| *(empty)* | Add notes to this folder |\n";

/// Description used when a note is unreadable or blank.
pub const NO_DESCRIPTION: &str = "No description";

/// Maximum characters kept from a non-heading first line.
pub const DESCRIPTION_MAX_CHARS: usize = 80;

/// Result of syncing one manifest.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncOutcome {
    /// Manifest already matched the generated content; nothing written.
    InSync,
    /// Manifest differed and was rewritten.
    Updated,
    /// Manifest differs; check-only mode left it untouched.
    OutOfSync,
}

impl SyncOutcome {
    pub fn is_in_sync(&self) -> bool {
        matches!(self, Self::InSync)
    }
}

/// Description of a note from its content.
///
/// The first non-blank line wins. A heading has its `#` markers stripped and is
/// kept whole; any other line is cut to [`DESCRIPTION_MAX_CHARS`] characters with
/// `...` appended when cut.
pub fn describe_content(content: &str) -> String {
    let Some(line) = content.lines().map(str::trim).find(|l| !l.is_empty()) else {
        return NO_DESCRIPTION.to_string();
    };

    if line.starts_with('#') {
        return line.trim_start_matches('#').trim().to_string();
    }

    if line.chars().count() > DESCRIPTION_MAX_CHARS {
        let cut: String = line.chars().take(DESCRIPTION_MAX_CHARS).collect();
        format!("{cut}...")
    } else {
        line.to_string()
    }
}

/// Description of the note at `path`; unreadable files get [`NO_DESCRIPTION`].
pub fn derive_description(path: &Path) -> String {
    match std::fs::read_to_string(path) {
        Ok(content) => describe_content(&content),
        Err(err) => {
            tracing::debug!(path = %path.display(), %err, "note unreadable");
            NO_DESCRIPTION.to_string()
        }
    }
}

/// Render the manifest for `folder`.
pub fn generate_manifest(folder: &Path, layout: &LayoutConfig) -> String {
    let notes = vault::list_notes(folder, Some(&layout.manifest_file));

    let mut out = String::from(MANIFEST_HEADER);
    if notes.is_empty() {
        out.push_str(EMPTY_ROW);
    }
    for note in &notes {
        let stem = vault::note_stem(note);
        let description = derive_description(note);
        out.push_str(&format!("| [[{stem}]] | {description} |\n"));
    }
    out
}

/// Regenerate the manifest of `folder` and compare with the file on disk.
///
/// A missing manifest never matches. With `check_only`, nothing is written.
pub fn sync_manifest(folder: &Path, layout: &LayoutConfig, check_only: bool) -> Result<SyncOutcome> {
    let manifest_path = folder.join(&layout.manifest_file);
    let generated = generate_manifest(folder, layout);
    let current = std::fs::read_to_string(&manifest_path).ok();

    if current.as_deref() == Some(generated.as_str()) {
        return Ok(SyncOutcome::InSync);
    }

    if check_only {
        return Ok(SyncOutcome::OutOfSync);
    }

    std::fs::write(&manifest_path, generated)
        .with_context(|| format!("failed to write manifest {}", manifest_path.display()))?;
    tracing::info!(path = %manifest_path.display(), "manifest rewritten");
    Ok(SyncOutcome::Updated)
}

/// Per-pillar result of [`sync_all`].
#[derive(Debug, Clone)]
pub struct PillarSync {
    pub pillar: String,
    pub manifest_path: PathBuf,
    pub outcome: SyncOutcome,
}

/// Sync the manifest of every pillar that has a Knowledge folder.
pub fn sync_all(root: &Path, layout: &LayoutConfig, check_only: bool) -> Result<Vec<PillarSync>> {
    let mut results = Vec::new();
    for pillar in vault::knowledge_pillars(root, layout) {
        let folder = root.join(&pillar).join(&layout.knowledge_dir);
        if !folder.is_dir() {
            continue;
        }
        let outcome = sync_manifest(&folder, layout, check_only)?;
        results.push(PillarSync {
            manifest_path: folder.join(&layout.manifest_file),
            pillar,
            outcome,
        });
    }
    Ok(results)
}

/// Stems referenced as `[[stem]]` on table rows of a manifest's content.
pub fn parse_links(content: &str) -> BTreeSet<String> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| line.starts_with('|'))
        .filter_map(|line| {
            let start = line.find("[[")?;
            let end = line.find("]]")?;
            (end >= start + 2).then(|| line[start + 2..end].to_string())
        })
        .collect()
}

/// Stems listed in the manifest at `path`; a missing file lists nothing.
pub fn read_manifest_links(path: &Path) -> BTreeSet<String> {
    std::fs::read_to_string(path)
        .map(|content| parse_links(&content))
        .unwrap_or_default()
}

/// Nearest enclosing Knowledge folder of `path`, not counting `path` itself.
pub fn find_knowledge_dir(path: &Path, layout: &LayoutConfig) -> Option<PathBuf> {
    path.ancestors()
        .skip(1)
        .find(|dir| dir.file_name().is_some_and(|name| name == layout.knowledge_dir.as_str()))
        .map(Path::to_path_buf)
}
