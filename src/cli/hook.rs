//! CLI `hook` command: read a tool event from stdin and resync manifests.
//!
//! Never fails: malformed events and sync errors are logged and swallowed so
//! the calling editor is never blocked.

use std::io::Read;
use std::path::Path;

use vaultkeep::config::VaultConfig;
use vaultkeep::hook::{self, HookAction, HookOutcome};

pub fn hook(project_dir: &Path, config: &VaultConfig) {
    let mut input = String::new();
    if let Err(err) = std::io::stdin().read_to_string(&mut input) {
        tracing::debug!(%err, "failed to read hook input");
        return;
    }

    let action = match HookAction::parse(&input) {
        Ok(action) => action,
        Err(err) => {
            tracing::debug!(%err, "ignoring hook event");
            return;
        }
    };

    match hook::handle(&action, project_dir, &config.layout) {
        Ok(HookOutcome::Ignored) => {}
        Ok(HookOutcome::Synced { folders, rewritten }) => {
            tracing::info!(folders = folders.len(), rewritten, "manifests synced");
        }
        Err(err) => tracing::warn!("manifest sync failed: {err:#}"),
    }
}
