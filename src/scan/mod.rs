//! Vault health scan.
//!
//! The [`Scanner`] runs five independent checks over the pillars of a vault:
//! manifest drift, aging inbox items, stale projects, misplaced root files and
//! stub files. Each check only reads the filesystem (and, for the two
//! age-based checks, the [`LastModified`] collaborator).

pub mod history;
pub mod types;

use chrono::{DateTime, Utc};
use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::config::{LayoutConfig, ScanConfig, VaultConfig};
use crate::manifest;
use crate::vault::{self, Marker};

pub use history::{age_in_days, FileSystemTime, GitHistory, LastModified};
pub use types::{AgedNote, Findings, ManifestDrift, ScanFinding};

/// Front-matter fence line.
const FRONT_MATTER_FENCE: &str = "---";

pub struct Scanner {
    root: PathBuf,
    layout: LayoutConfig,
    thresholds: ScanConfig,
    history: Box<dyn LastModified>,
    now: DateTime<Utc>,
}

impl Scanner {
    /// Scanner for the vault at `root` using git history (or mtime only when
    /// `use_git_history` is off) and the current time.
    pub fn new(root: impl Into<PathBuf>, config: &VaultConfig) -> Self {
        let root = root.into();
        let history: Box<dyn LastModified> = if config.scan.use_git_history {
            Box::new(GitHistory::new(
                root.clone(),
                Duration::from_millis(config.scan.git_timeout_ms),
            ))
        } else {
            Box::new(FileSystemTime)
        };

        Self {
            root,
            layout: config.layout.clone(),
            thresholds: config.scan.clone(),
            history,
            now: Utc::now(),
        }
    }

    /// Replace the last-modified source.
    pub fn with_history(mut self, history: Box<dyn LastModified>) -> Self {
        self.history = history;
        self
    }

    /// Pin the reference time ages are measured against.
    pub fn with_now(mut self, now: DateTime<Utc>) -> Self {
        self.now = now;
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Run all five checks.
    pub fn run(&self) -> Findings {
        let findings = Findings {
            manifest_drift: self.check_manifest_drift(),
            aging_inbox: self.check_inbox_items(),
            stale_projects: self.check_stale_projects(),
            root_files: self.check_root_files(),
            stub_files: self.check_stub_files(),
        };
        tracing::debug!(has_tasks = findings.has_tasks(), "scan complete");
        findings
    }

    fn pillars(&self) -> Vec<String> {
        vault::scan_pillars(&self.root, &self.layout)
    }

    fn pillar_dir(&self, pillar: &str, marker: Marker) -> PathBuf {
        self.root.join(pillar).join(marker.dir_name(&self.layout))
    }

    /// Manifest entries vs. notes on disk, per pillar with a Knowledge folder.
    pub fn check_manifest_drift(&self) -> BTreeMap<String, ManifestDrift> {
        let mut drift = BTreeMap::new();

        for pillar in self.pillars() {
            let knowledge = self.pillar_dir(&pillar, Marker::Knowledge);
            if !knowledge.is_dir() {
                continue;
            }

            let listed = manifest::read_manifest_links(&knowledge.join(&self.layout.manifest_file));
            let actual: BTreeSet<String> =
                vault::list_notes(&knowledge, Some(&self.layout.manifest_file))
                    .iter()
                    .map(|p| vault::note_stem(p))
                    .collect();

            let entry = ManifestDrift {
                add: actual.difference(&listed).cloned().collect(),
                remove: listed.difference(&actual).cloned().collect(),
            };
            if !entry.is_empty() {
                tracing::debug!(pillar = %pillar, add = entry.add.len(), remove = entry.remove.len(), "manifest drift");
                drift.insert(pillar, entry);
            }
        }

        drift
    }

    /// Inbox notes at least `inbox_age_days` old.
    pub fn check_inbox_items(&self) -> BTreeMap<String, Vec<AgedNote>> {
        self.aged_notes(Marker::Inbox, self.thresholds.inbox_age_days)
    }

    /// Project notes at least `project_stale_days` old.
    pub fn check_stale_projects(&self) -> BTreeMap<String, Vec<AgedNote>> {
        self.aged_notes(Marker::Projects, self.thresholds.project_stale_days)
    }

    fn aged_notes(&self, marker: Marker, threshold_days: i64) -> BTreeMap<String, Vec<AgedNote>> {
        let mut found = BTreeMap::new();

        for pillar in self.pillars() {
            let dir = self.pillar_dir(&pillar, marker);
            let mut notes: Vec<AgedNote> = vault::list_notes(&dir, None)
                .iter()
                .map(|path| AgedNote {
                    name: vault::file_name(path),
                    age_days: age_in_days(self.now, self.history.last_modified(path)),
                })
                .filter(|note| note.age_days >= threshold_days)
                .collect();

            if notes.is_empty() {
                continue;
            }
            // Oldest first; ties keep name order from the listing.
            notes.sort_by(|a, b| b.age_days.cmp(&a.age_days));
            found.insert(pillar, notes);
        }

        found
    }

    /// Markdown files sitting at the vault root that are not allow-listed.
    pub fn check_root_files(&self) -> Vec<String> {
        let mut files: Vec<String> = vault::list_notes(&self.root, None)
            .iter()
            .map(|p| vault::file_name(p))
            .filter(|name| !self.thresholds.root_allow_list.contains(name))
            .filter(|name| *name != self.layout.report_file)
            .collect();
        files.sort();
        files
    }

    /// Knowledge notes whose body (after front matter) is shorter than
    /// `stub_min_chars`. Paths are relative to the pillar.
    pub fn check_stub_files(&self) -> BTreeMap<String, Vec<String>> {
        let mut found = BTreeMap::new();

        for pillar in self.pillars() {
            let knowledge = self.pillar_dir(&pillar, Marker::Knowledge);
            let mut stubs: Vec<String> = vault::list_notes(&knowledge, Some(&self.layout.manifest_file))
                .iter()
                .filter(|path| match std::fs::read_to_string(path) {
                    Ok(content) => body_len(&content) < self.thresholds.stub_min_chars,
                    Err(err) => {
                        tracing::debug!(path = %path.display(), %err, "note unreadable");
                        false
                    }
                })
                .map(|path| format!("{}/{}", self.layout.knowledge_dir, vault::file_name(path)))
                .collect();

            if stubs.is_empty() {
                continue;
            }
            stubs.sort();
            found.insert(pillar, stubs);
        }

        found
    }
}

/// Content with a leading `---` fenced front-matter block removed. Without a
/// closing fence the content is returned unchanged.
pub fn strip_front_matter(content: &str) -> &str {
    let mut offset = 0;
    for (idx, line) in content.split_inclusive('\n').enumerate() {
        offset += line.len();
        let is_fence = line.trim_end() == FRONT_MATTER_FENCE;
        match idx {
            0 if !is_fence => return content,
            0 => {}
            _ if is_fence => return &content[offset..],
            _ => {}
        }
    }
    content
}

/// Character count of a note's body, front matter and surrounding whitespace excluded.
pub fn body_len(content: &str) -> usize {
    strip_front_matter(content).trim().chars().count()
}
