//! Scan result types.
//!
//! [`Findings`] holds the five result sets of one scan, keyed by pillar in
//! sorted order. [`ScanFinding`] is the flattened, one-record-per-issue view
//! used for JSON output.

use serde::Serialize;
use std::collections::BTreeMap;

/// Manifest entries that disagree with the notes on disk for one pillar.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ManifestDrift {
    /// Stems present as files but missing from the manifest.
    pub add: Vec<String>,
    /// Stems listed in the manifest with no matching file.
    pub remove: Vec<String>,
}

impl ManifestDrift {
    pub fn is_empty(&self) -> bool {
        self.add.is_empty() && self.remove.is_empty()
    }
}

/// A note with its age in whole days.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AgedNote {
    pub name: String,
    pub age_days: i64,
}

/// One issue found by a scan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ScanFinding {
    ManifestDrift {
        pillar: String,
        add: Vec<String>,
        remove: Vec<String>,
    },
    AgingInboxItem {
        pillar: String,
        filename: String,
        age_days: i64,
    },
    StaleProject {
        pillar: String,
        filename: String,
        age_days: i64,
    },
    MisplacedRootFile {
        filename: String,
    },
    StubFile {
        pillar: String,
        path: String,
    },
}

/// Aggregated result of all five checks.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Findings {
    pub manifest_drift: BTreeMap<String, ManifestDrift>,
    pub aging_inbox: BTreeMap<String, Vec<AgedNote>>,
    pub stale_projects: BTreeMap<String, Vec<AgedNote>>,
    pub root_files: Vec<String>,
    pub stub_files: BTreeMap<String, Vec<String>>,
}

impl Findings {
    /// True when any check reported something.
    pub fn has_tasks(&self) -> bool {
        !(self.manifest_drift.is_empty()
            && self.aging_inbox.is_empty()
            && self.stale_projects.is_empty()
            && self.root_files.is_empty()
            && self.stub_files.is_empty())
    }

    /// Flatten into one [`ScanFinding`] per issue, in report order.
    pub fn findings(&self) -> Vec<ScanFinding> {
        let mut out = Vec::new();

        for (pillar, drift) in &self.manifest_drift {
            out.push(ScanFinding::ManifestDrift {
                pillar: pillar.clone(),
                add: drift.add.clone(),
                remove: drift.remove.clone(),
            });
        }
        for (pillar, notes) in &self.aging_inbox {
            out.extend(notes.iter().map(|n| ScanFinding::AgingInboxItem {
                pillar: pillar.clone(),
                filename: n.name.clone(),
                age_days: n.age_days,
            }));
        }
        for (pillar, notes) in &self.stale_projects {
            out.extend(notes.iter().map(|n| ScanFinding::StaleProject {
                pillar: pillar.clone(),
                filename: n.name.clone(),
                age_days: n.age_days,
            }));
        }
        out.extend(
            self.root_files
                .iter()
                .map(|f| ScanFinding::MisplacedRootFile { filename: f.clone() }),
        );
        for (pillar, paths) in &self.stub_files {
            out.extend(paths.iter().map(|p| ScanFinding::StubFile {
                pillar: pillar.clone(),
                path: p.clone(),
            }));
        }

        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_findings_have_no_tasks() {
        let findings = Findings::default();
        assert!(!findings.has_tasks());
        assert!(findings.findings().is_empty());
    }

    #[test]
    fn any_root_file_is_a_task() {
        let findings = Findings {
            root_files: vec!["misplaced.md".into()],
            ..Default::default()
        };
        assert!(findings.has_tasks());
    }

    #[test]
    fn finding_serializes_with_kind_tag() {
        let finding = ScanFinding::AgingInboxItem {
            pillar: "Personal".into(),
            filename: "todo.md".into(),
            age_days: 5,
        };
        let json = serde_json::to_value(&finding).unwrap();
        assert_eq!(json["kind"], "aging_inbox_item");
        assert_eq!(json["filename"], "todo.md");
        assert_eq!(json["age_days"], 5);
    }

    #[test]
    fn flatten_keeps_check_order() {
        let mut findings = Findings::default();
        findings.stub_files.insert("P".into(), vec!["Knowledge/a.md".into()]);
        findings.root_files.push("x.md".into());
        findings.manifest_drift.insert(
            "P".into(),
            ManifestDrift {
                add: vec!["New".into()],
                remove: vec![],
            },
        );

        let flat = findings.findings();
        assert_eq!(flat.len(), 3);
        assert!(matches!(flat[0], ScanFinding::ManifestDrift { .. }));
        assert!(matches!(flat[1], ScanFinding::MisplacedRootFile { .. }));
        assert!(matches!(flat[2], ScanFinding::StubFile { .. }));
    }
}
