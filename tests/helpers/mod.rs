#![allow(dead_code)]

use chrono::{DateTime, Duration, TimeZone, Utc};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use vaultkeep::config::VaultConfig;
use vaultkeep::scan::{LastModified, Scanner};

pub const EMPTY_MANIFEST: &str =
    "# Knowledge Manifest\n\n| File | Description |\n|------|-------------|\n";

/// Fixed reference time for age-based checks.
pub fn frozen_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 1, 15, 12, 0, 0).unwrap()
}

/// Create a vault with `Personal` and `Work` pillars, each with
/// Inbox/Projects/Knowledge, a header-only manifest, and the allow-listed
/// root documents.
pub fn test_vault() -> TempDir {
    let tmp = TempDir::new().unwrap();
    for pillar in ["Personal", "Work"] {
        for folder in ["Inbox", "Projects", "Knowledge"] {
            std::fs::create_dir_all(tmp.path().join(pillar).join(folder)).unwrap();
        }
        write(tmp.path(), &format!("{pillar}/Knowledge/MANIFEST.md"), EMPTY_MANIFEST);
    }
    write(tmp.path(), "CLAUDE.md", "# CLAUDE.md");
    write(tmp.path(), "README.md", "# README");
    write(tmp.path(), "AGENTS.md", "# AGENTS.md");
    tmp
}

/// Write `content` to `root/rel`, creating parent folders.
pub fn write(root: &Path, rel: &str, content: &str) -> PathBuf {
    let path = root.join(rel);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    std::fs::write(&path, content).unwrap();
    path
}

pub fn read(root: &Path, rel: &str) -> String {
    std::fs::read_to_string(root.join(rel)).unwrap()
}

/// Last-modified source that reports a fixed age per file name, and
/// `default_age_days` for everything else.
pub struct FixedHistory {
    now: DateTime<Utc>,
    ages: HashMap<String, i64>,
    default_age_days: i64,
}

impl FixedHistory {
    pub fn new(default_age_days: i64) -> Self {
        Self {
            now: frozen_now(),
            ages: HashMap::new(),
            default_age_days,
        }
    }

    pub fn with_age(mut self, file_name: &str, age_days: i64) -> Self {
        self.ages.insert(file_name.to_string(), age_days);
        self
    }
}

impl LastModified for FixedHistory {
    fn last_modified(&self, path: &Path) -> DateTime<Utc> {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let days = self.ages.get(&name).copied().unwrap_or(self.default_age_days);
        self.now - Duration::days(days)
    }
}

/// Scanner over `root` with default config, frozen time and fixed ages.
pub fn test_scanner(root: &Path, history: FixedHistory) -> Scanner {
    Scanner::new(root, &VaultConfig::default())
        .with_history(Box::new(history))
        .with_now(frozen_now())
}
