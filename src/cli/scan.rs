//! CLI `scan` command: run the health checks and write the report.
//!
//! With `--json`, stdout carries only the findings array; progress lines and
//! the fallback status line go to stderr.

use anyhow::{Context, Result};
use std::fmt::Write as _;
use std::io::Write;
use std::path::Path;

use vaultkeep::config::VaultConfig;
use vaultkeep::report;
use vaultkeep::scan::{FileSystemTime, Scanner};

pub fn scan(root: &Path, config: &VaultConfig, json: bool, no_git: bool) -> Result<()> {
    let mut scanner = Scanner::new(root, config);
    if no_git {
        scanner = scanner.with_history(Box::new(FileSystemTime));
    }
    run(
        &scanner,
        config,
        json,
        &mut std::io::stdout().lock(),
        &mut std::io::stderr().lock(),
    )?;
    Ok(())
}

/// Run `scanner`, write the report and emit `has_tasks`. Returns whether
/// there were tasks.
fn run(
    scanner: &Scanner,
    config: &VaultConfig,
    json: bool,
    stdout: &mut dyn Write,
    stderr: &mut dyn Write,
) -> Result<bool> {
    let mut progress = String::new();
    let root = scanner.root();

    let _ = writeln!(progress, "Checking vault for cleaning tasks...");
    let _ = writeln!(progress, "Vault root: {}", super::display_root(root));
    let _ = writeln!(progress);

    let findings = scanner.run();

    if !findings.manifest_drift.is_empty() {
        let _ = writeln!(progress, "Manifest issues: {} pillar(s)", findings.manifest_drift.len());
        for (pillar, drift) in &findings.manifest_drift {
            let _ = writeln!(progress, "  {pillar}: +{} -{}", drift.add.len(), drift.remove.len());
        }
    }

    if !findings.aging_inbox.is_empty() {
        let total: usize = findings.aging_inbox.values().map(Vec::len).sum();
        let _ = writeln!(progress, "Inbox items: {total} file(s)");
        for (pillar, notes) in &findings.aging_inbox {
            let _ = writeln!(progress, "  {pillar}: {} file(s)", notes.len());
        }
    }

    if !findings.stale_projects.is_empty() {
        let total: usize = findings.stale_projects.values().map(Vec::len).sum();
        let _ = writeln!(progress, "Stale projects: {total} project(s)");
        for (pillar, notes) in &findings.stale_projects {
            let _ = writeln!(progress, "  {pillar}: {} project(s)", notes.len());
        }
    }

    if !findings.root_files.is_empty() {
        let _ = writeln!(progress, "Root files: {} file(s)", findings.root_files.len());
    }

    if !findings.stub_files.is_empty() {
        let total: usize = findings.stub_files.values().map(Vec::len).sum();
        let _ = writeln!(progress, "Stub files: {total} file(s)");
        for (pillar, paths) in &findings.stub_files {
            let _ = writeln!(progress, "  {pillar}: {} file(s)", paths.len());
        }
    }

    let has_tasks = findings.has_tasks();
    if has_tasks {
        let body = report::build_report(&findings, config);
        let path = config.report_path(root);
        report::write_report(&path, &body)?;
        let _ = writeln!(progress);
        let _ = writeln!(progress, "Issue body written to: {}", path.display());
    } else {
        let _ = writeln!(progress, "No cleaning tasks found. Vault is tidy!");
    }

    let flag = if has_tasks { "true" } else { "false" };
    match report::status_sink() {
        Some(sink) => report::write_status_to(Some(&sink), "has_tasks", flag)?,
        None => {
            let _ = writeln!(progress, "{}", report::stdout_status_line("has_tasks", flag));
        }
    }

    let _ = writeln!(progress);
    let _ = writeln!(progress, "has_tasks: {has_tasks}");

    if json {
        stderr.write_all(progress.as_bytes())?;
        let out = serde_json::to_string_pretty(&findings.findings())
            .context("failed to serialize findings")?;
        writeln!(stdout, "{out}")?;
    } else {
        stdout.write_all(progress.as_bytes())?;
    }

    Ok(has_tasks)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn untidy_vault() -> TempDir {
        let tmp = TempDir::new().unwrap();
        std::fs::create_dir_all(tmp.path().join("Personal/Knowledge")).unwrap();
        std::fs::write(tmp.path().join("Personal/Knowledge/Stub.md"), "# Stub").unwrap();
        std::fs::write(tmp.path().join("misplaced.md"), "x").unwrap();
        tmp
    }

    fn scanner(root: &Path) -> Scanner {
        Scanner::new(root, &VaultConfig::default()).with_history(Box::new(FileSystemTime))
    }

    #[test]
    fn json_mode_keeps_stdout_parseable() {
        let vault = untidy_vault();
        let mut out = Vec::new();
        let mut err = Vec::new();

        let has_tasks = run(&scanner(vault.path()), &VaultConfig::default(), true, &mut out, &mut err).unwrap();
        assert!(has_tasks);

        let parsed: serde_json::Value = serde_json::from_slice(&out).unwrap();
        let kinds: Vec<&str> = parsed
            .as_array()
            .unwrap()
            .iter()
            .map(|f| f["kind"].as_str().unwrap())
            .collect();
        assert!(kinds.contains(&"misplaced_root_file"));
        assert!(kinds.contains(&"stub_file"));

        let progress = String::from_utf8(err).unwrap();
        assert!(progress.contains("Checking vault for cleaning tasks..."));
        assert!(progress.contains("has_tasks: true"));
        assert!(vault.path().join("cleaning-tasks.md").exists());
    }

    #[test]
    fn plain_mode_prints_progress_to_stdout() {
        let vault = TempDir::new().unwrap();
        std::fs::create_dir_all(vault.path().join("Personal/Inbox")).unwrap();
        let mut out = Vec::new();
        let mut err = Vec::new();

        let has_tasks = run(&scanner(vault.path()), &VaultConfig::default(), false, &mut out, &mut err).unwrap();
        assert!(!has_tasks);

        let stdout = String::from_utf8(out).unwrap();
        assert!(stdout.contains("Vault is tidy!"));
        assert!(err.is_empty());
        assert!(!vault.path().join("cleaning-tasks.md").exists());
    }
}
