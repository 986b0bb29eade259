pub mod hook;
pub mod scan;
pub mod sync;

use std::path::Path;

/// `pillar/Knowledge/MANIFEST.md` as shown to the user.
fn manifest_label(pillar: &str, config: &vaultkeep::config::VaultConfig) -> String {
    let layout = &config.layout;
    format!("{pillar}/{}/{}", layout.knowledge_dir, layout.manifest_file)
}

fn display_root(root: &Path) -> String {
    root.canonicalize()
        .unwrap_or_else(|_| root.to_path_buf())
        .display()
        .to_string()
}
