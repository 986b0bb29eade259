//! Cleaning report assembly and the `name=value` status sink.
//!
//! The report is a Markdown task list: a fixed header, then one numbered
//! section per non-empty check in the order manifest drift, inbox, stale
//! projects, root files, stub files. Empty checks are skipped and do not use a
//! number.

use anyhow::{Context, Result};
use std::fmt::Write as _;
use std::io::Write as _;
use std::path::{Path, PathBuf};

use crate::config::VaultConfig;
use crate::scan::Findings;

/// Env var naming the file that receives `name=value` status lines.
pub const STATUS_OUTPUT_ENV: &str = "GITHUB_OUTPUT";

const HEADER: &str = "# Vault Cleaning Tasks\n\n\
This issue was auto-generated by the weekly vault cleaning workflow.\n\
Please complete the following tasks.\n\n";

const FOOTER: &str = "---\n\nWhen complete, the PR should include all changes and updated manifests.\n";

/// Render the cleaning report for `findings`.
pub fn build_report(findings: &Findings, config: &VaultConfig) -> String {
    let layout = &config.layout;
    let mut out = String::from(HEADER);
    let mut task = 1;

    if !findings.manifest_drift.is_empty() {
        let _ = writeln!(out, "## {task}. Fix Manifest Files\n");
        let _ = writeln!(out, "The following {} files are out of sync:\n", layout.manifest_file);
        for (pillar, drift) in &findings.manifest_drift {
            let _ = writeln!(out, "### {pillar}/{}/{}\n", layout.knowledge_dir, layout.manifest_file);
            for name in &drift.add {
                let _ = writeln!(out, "- Add: `[[{name}]]`");
            }
            for name in &drift.remove {
                let _ = writeln!(out, "- Remove: `[[{name}]]`");
            }
            out.push('\n');
        }
        let _ = writeln!(
            out,
            "**Instructions:** Regenerate each manifest by scanning the {}/ folder.",
            layout.knowledge_dir
        );
        out.push_str("Each entry should be: `| [[filename]] | first heading or description |`\n\n");
        task += 1;
    }

    if !findings.aging_inbox.is_empty() {
        let _ = writeln!(out, "## {task}. Process Inbox Items\n");
        let _ = writeln!(
            out,
            "The following items have been in {} for {}+ days:\n",
            layout.inbox_dir, config.scan.inbox_age_days
        );
        for (pillar, notes) in &findings.aging_inbox {
            let _ = writeln!(out, "### {pillar}/{}/\n", layout.inbox_dir);
            for note in notes {
                let _ = writeln!(out, "- `{}` ({} days)", note.name, note.age_days);
            }
            out.push('\n');
        }
        out.push_str("**Instructions:** Review each file. Either:\n");
        let _ = writeln!(out, "- Move to `{}/` if it is reference material", layout.knowledge_dir);
        let _ = writeln!(out, "- Move to `{}/` if it is active work", layout.projects_dir);
        out.push_str("- Delete if no longer needed\n\n");
        let _ = writeln!(
            out,
            "After moving files to {}/, update the corresponding {}.\n",
            layout.knowledge_dir, layout.manifest_file
        );
        task += 1;
    }

    if !findings.stale_projects.is_empty() {
        let _ = writeln!(out, "## {task}. Archive Stale Projects\n");
        let _ = writeln!(
            out,
            "The following projects have not been modified in {}+ days:\n",
            config.scan.project_stale_days
        );
        for (pillar, notes) in &findings.stale_projects {
            let _ = writeln!(out, "### {pillar}/{}/\n", layout.projects_dir);
            for note in notes {
                let _ = writeln!(out, "- `{}` ({} days)", note.name, note.age_days);
            }
            out.push('\n');
        }
        out.push_str("**Instructions:** For each stale project:\n");
        let _ = writeln!(out, "1. Create an archived summary in `{}/`", layout.knowledge_dir);
        out.push_str("2. Include the current git commit hash for reference\n");
        out.push_str("3. Delete the original project file\n");
        let _ = writeln!(out, "4. Update {}\n", layout.manifest_file);
        task += 1;
    }

    if !findings.root_files.is_empty() {
        let _ = writeln!(out, "## {task}. Move Files from Vault Root\n");
        out.push_str("The following files are at the vault root instead of inside a pillar:\n\n");
        for name in &findings.root_files {
            let _ = writeln!(out, "- `{name}`");
        }
        out.push('\n');
        let _ = writeln!(
            out,
            "**Instructions:** Move each file into the `{}/` folder of the pillar it belongs to,",
            layout.inbox_dir
        );
        let _ = writeln!(
            out,
            "or into `{}/` if it is finished reference material.\n",
            layout.knowledge_dir
        );
        task += 1;
    }

    if !findings.stub_files.is_empty() {
        let _ = writeln!(out, "## {task}. Review Empty/Stub Files\n");
        let _ = writeln!(
            out,
            "The following notes have fewer than {} characters of content:\n",
            config.scan.stub_min_chars
        );
        for (pillar, paths) in &findings.stub_files {
            let _ = writeln!(out, "### {pillar}/\n");
            for path in paths {
                let _ = writeln!(out, "- `{path}`");
            }
            out.push('\n');
        }
        out.push_str("**Instructions:** For each file, either:\n");
        out.push_str("- Expand it into a complete note\n");
        out.push_str("- Merge it into a related note\n");
        let _ = writeln!(out, "- Delete it and update {}\n", layout.manifest_file);
        task += 1;
    }

    if task > 1 {
        out.push_str(FOOTER);
    }
    out
}

/// Write the report to `path`.
pub fn write_report(path: &Path, report: &str) -> Result<()> {
    std::fs::write(path, report)
        .with_context(|| format!("failed to write report {}", path.display()))?;
    tracing::info!(path = %path.display(), "report written");
    Ok(())
}

/// Emit `name=value` to the file named by `GITHUB_OUTPUT`, or stdout when unset.
pub fn write_status(name: &str, value: &str) -> Result<()> {
    write_status_to(status_sink().as_deref(), name, value)
}

/// File named by `GITHUB_OUTPUT`, if set and non-empty.
pub fn status_sink() -> Option<PathBuf> {
    std::env::var_os(STATUS_OUTPUT_ENV)
        .filter(|val| !val.is_empty())
        .map(PathBuf::from)
}

/// Line printed when there is no status sink.
pub fn stdout_status_line(name: &str, value: &str) -> String {
    format!("Output: {name}={value}")
}

/// Append `name=value` to `sink`, or print it when there is no sink.
pub fn write_status_to(sink: Option<&Path>, name: &str, value: &str) -> Result<()> {
    match sink {
        Some(path) => {
            let mut file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("failed to open status output {}", path.display()))?;
            writeln!(file, "{name}={value}").context("failed to append status output")?;
        }
        None => println!("{}", stdout_status_line(name, value)),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scan::{AgedNote, ManifestDrift};

    fn config() -> VaultConfig {
        VaultConfig::default()
    }

    #[test]
    fn empty_findings_render_header_only() {
        let report = build_report(&Findings::default(), &config());
        assert_eq!(report, HEADER);
        assert!(report.starts_with("# Vault Cleaning Tasks"));
        assert!(!report.contains("## 1."));
    }

    #[test]
    fn manifest_section_lists_add_and_remove() {
        let mut findings = Findings::default();
        findings.manifest_drift.insert(
            "Personal".into(),
            ManifestDrift {
                add: vec!["New Note".into()],
                remove: vec!["Old Note".into()],
            },
        );

        let report = build_report(&findings, &config());
        assert!(report.contains("## 1. Fix Manifest Files"));
        assert!(report.contains("### Personal/Knowledge/MANIFEST.md"));
        assert!(report.contains("- Add: `[[New Note]]`"));
        assert!(report.contains("- Remove: `[[Old Note]]`"));
        assert!(report.ends_with(FOOTER));
    }

    #[test]
    fn inbox_section_shows_ages() {
        let mut findings = Findings::default();
        findings.aging_inbox.insert(
            "Personal".into(),
            vec![AgedNote {
                name: "todo.md".into(),
                age_days: 5,
            }],
        );

        let report = build_report(&findings, &config());
        assert!(report.contains("## 1. Process Inbox Items"));
        assert!(report.contains("in Inbox for 3+ days"));
        assert!(report.contains("### Personal/Inbox/"));
        assert!(report.contains("- `todo.md` (5 days)"));
    }

    #[test]
    fn stale_projects_section() {
        let mut findings = Findings::default();
        findings.stale_projects.insert(
            "Work".into(),
            vec![AgedNote {
                name: "old-project.md".into(),
                age_days: 45,
            }],
        );

        let report = build_report(&findings, &config());
        assert!(report.contains("## 1. Archive Stale Projects"));
        assert!(report.contains("- `old-project.md` (45 days)"));
    }

    #[test]
    fn root_and_stub_sections() {
        let mut findings = Findings::default();
        findings.root_files = vec!["another.md".into(), "misplaced.md".into()];
        findings.stub_files.insert("Personal".into(), vec!["Knowledge/stub.md".into()]);

        let report = build_report(&findings, &config());
        assert!(report.contains("## 1. Move Files from Vault Root"));
        assert!(report.contains("- `misplaced.md`"));
        assert!(report.contains("## 2. Review Empty/Stub Files"));
        assert!(report.contains("- `Knowledge/stub.md`"));
    }

    #[test]
    fn skipped_sections_do_not_consume_numbers() {
        let mut findings = Findings::default();
        findings.stale_projects.insert(
            "P".into(),
            vec![AgedNote {
                name: "y.md".into(),
                age_days: 35,
            }],
        );
        findings.stub_files.insert("P".into(), vec!["Knowledge/stub.md".into()]);

        let report = build_report(&findings, &config());
        assert!(report.contains("## 1. Archive Stale Projects"));
        assert!(report.contains("## 2. Review Empty/Stub Files"));
        assert!(!report.contains("## 3."));
    }

    #[test]
    fn all_sections_are_numbered_in_order() {
        let mut findings = Findings::default();
        findings.manifest_drift.insert(
            "P".into(),
            ManifestDrift {
                add: vec!["x".into()],
                remove: vec![],
            },
        );
        findings.aging_inbox.insert("P".into(), vec![AgedNote { name: "x.md".into(), age_days: 5 }]);
        findings.stale_projects.insert("P".into(), vec![AgedNote { name: "y.md".into(), age_days: 35 }]);
        findings.root_files = vec!["z.md".into()];
        findings.stub_files.insert("P".into(), vec!["Knowledge/stub.md".into()]);

        let report = build_report(&findings, &config());
        let positions: Vec<usize> = [
            "## 1. Fix Manifest Files",
            "## 2. Process Inbox Items",
            "## 3. Archive Stale Projects",
            "## 4. Move Files from Vault Root",
            "## 5. Review Empty/Stub Files",
        ]
        .iter()
        .map(|heading| report.find(heading).unwrap())
        .collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn status_follows_github_output_env() {
        let tmp = tempfile::TempDir::new().unwrap();
        let sink = tmp.path().join("github_output");
        let saved = std::env::var_os(STATUS_OUTPUT_ENV);

        std::env::set_var(STATUS_OUTPUT_ENV, &sink);
        write_status("has_tasks", "true").unwrap();
        write_status("count", "2").unwrap();
        assert_eq!(std::fs::read_to_string(&sink).unwrap(), "has_tasks=true\ncount=2\n");

        std::env::remove_var(STATUS_OUTPUT_ENV);
        assert_eq!(status_sink(), None);
        write_status("has_tasks", "false").unwrap();
        // Unset env prints instead of touching the old sink.
        assert_eq!(std::fs::read_to_string(&sink).unwrap(), "has_tasks=true\ncount=2\n");
        assert_eq!(stdout_status_line("has_tasks", "false"), "Output: has_tasks=false");

        // Restore
        if let Some(val) = saved {
            std::env::set_var(STATUS_OUTPUT_ENV, val);
        }
    }

    #[test]
    fn status_appends_to_sink() {
        let tmp = tempfile::TempDir::new().unwrap();
        let sink = tmp.path().join("github_output");

        write_status_to(Some(&sink), "foo", "bar").unwrap();
        write_status_to(Some(&sink), "has_tasks", "true").unwrap();

        let content = std::fs::read_to_string(&sink).unwrap();
        assert_eq!(content, "foo=bar\nhas_tasks=true\n");
    }
}
