//! Last-modified lookup for notes.
//!
//! [`LastModified`] is the single seam the age-based checks depend on. The
//! production implementation asks git for the last commit touching a file and
//! falls back to the filesystem mtime, then to "now". It never fails.

use chrono::{DateTime, Utc};
use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::time::Duration;
use wait_timeout::ChildExt;

/// Source of last-modified timestamps.
pub trait LastModified {
    /// When `path` was last changed. Must always return a usable timestamp.
    fn last_modified(&self, path: &Path) -> DateTime<Utc>;
}

/// Git commit time, then filesystem mtime, then the current time.
#[derive(Debug, Clone)]
pub struct GitHistory {
    root: PathBuf,
    timeout: Duration,
}

impl GitHistory {
    pub fn new(root: impl Into<PathBuf>, timeout: Duration) -> Self {
        Self {
            root: root.into(),
            timeout,
        }
    }

    /// Unix seconds of the last commit touching `path`, if git can tell us.
    fn commit_time(&self, path: &Path) -> Option<i64> {
        let mut child = Command::new("git")
            .args(["log", "-1", "--format=%ct", "--"])
            .arg(path)
            .current_dir(&self.root)
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()
            .ok()?;

        match child.wait_timeout(self.timeout).ok()? {
            Some(status) if status.success() => {}
            Some(_) => return None,
            None => {
                tracing::warn!(path = %path.display(), "git log timed out");
                let _ = child.kill();
                let _ = child.wait();
                return None;
            }
        }

        let mut stdout = String::new();
        child.stdout.take()?.read_to_string(&mut stdout).ok()?;
        parse_commit_time(&stdout)
    }
}

impl LastModified for GitHistory {
    fn last_modified(&self, path: &Path) -> DateTime<Utc> {
        if let Some(ts) = self
            .commit_time(path)
            .and_then(|secs| DateTime::from_timestamp(secs, 0))
        {
            return ts;
        }
        tracing::debug!(path = %path.display(), "no git timestamp, using mtime");
        FileSystemTime.last_modified(path)
    }
}

/// Filesystem mtime, then the current time.
#[derive(Debug, Clone, Copy, Default)]
pub struct FileSystemTime;

impl LastModified for FileSystemTime {
    fn last_modified(&self, path: &Path) -> DateTime<Utc> {
        std::fs::metadata(path)
            .and_then(|meta| meta.modified())
            .map(DateTime::<Utc>::from)
            .unwrap_or_else(|_| Utc::now())
    }
}

/// Parse `git log --format=%ct` output; empty or garbled output is `None`.
fn parse_commit_time(stdout: &str) -> Option<i64> {
    let trimmed = stdout.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse().ok()
}

/// Whole days elapsed from `then` to `now`; never negative.
pub fn age_in_days(now: DateTime<Utc>, then: DateTime<Utc>) -> i64 {
    (now - then).num_days().max(0)
}
