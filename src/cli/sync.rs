//! CLI `sync` command: regenerate or verify every Knowledge manifest.

use anyhow::Result;
use std::path::Path;

use vaultkeep::config::VaultConfig;
use vaultkeep::manifest::{self, SyncOutcome};

/// Sync all manifests under `root`. Returns the process exit code: 1 when
/// `check` finds drift, 0 otherwise.
pub fn sync(root: &Path, config: &VaultConfig, check: bool) -> Result<i32> {
    let results = manifest::sync_all(root, &config.layout, check)?;

    if results.is_empty() {
        println!(
            "No pillars found (folders with {}/ subdirectory)",
            config.layout.knowledge_dir
        );
        return Ok(0);
    }

    let mut all_in_sync = true;
    for result in &results {
        let label = super::manifest_label(&result.pillar, config);
        match result.outcome {
            SyncOutcome::InSync => println!("✓ {label} is in sync"),
            SyncOutcome::Updated => println!("✓ {label} updated"),
            SyncOutcome::OutOfSync => println!("✗ {label} is out of sync"),
        }
        all_in_sync &= result.outcome.is_in_sync();
    }

    if check && !all_in_sync {
        println!();
        println!("Manifests are out of sync. Run without --check to update.");
        return Ok(1);
    }

    Ok(0)
}
