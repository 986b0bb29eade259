use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::info;

/// File name of the per-vault config, looked up at the vault root.
pub const CONFIG_FILE_NAME: &str = ".vaultkeep.toml";

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct VaultConfig {
    pub log: LogConfig,
    pub layout: LayoutConfig,
    pub scan: ScanConfig,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct LogConfig {
    pub level: String,
}

/// Folder and file names that give a vault its structure.
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct LayoutConfig {
    pub inbox_dir: String,
    pub projects_dir: String,
    pub knowledge_dir: String,
    pub manifest_file: String,
    pub report_file: String,
}

/// Thresholds and allow-lists used by the scanner checks.
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ScanConfig {
    pub inbox_age_days: i64,
    pub project_stale_days: i64,
    pub stub_min_chars: usize,
    pub root_allow_list: Vec<String>,
    pub use_git_history: bool,
    pub git_timeout_ms: u64,
}

impl Default for VaultConfig {
    fn default() -> Self {
        Self {
            log: LogConfig::default(),
            layout: LayoutConfig::default(),
            scan: ScanConfig::default(),
        }
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".into(),
        }
    }
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            inbox_dir: "Inbox".into(),
            projects_dir: "Projects".into(),
            knowledge_dir: "Knowledge".into(),
            manifest_file: "MANIFEST.md".into(),
            report_file: "cleaning-tasks.md".into(),
        }
    }
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            inbox_age_days: 3,
            project_stale_days: 30,
            stub_min_chars: 50,
            root_allow_list: vec!["README.md".into(), "CLAUDE.md".into(), "AGENTS.md".into()],
            use_git_history: true,
            git_timeout_ms: 5000,
        }
    }
}

impl VaultConfig {
    /// Load `<root>/.vaultkeep.toml` (if it exists) then apply env var overrides.
    pub fn load(root: impl AsRef<Path>) -> Result<Self> {
        Self::load_from(root.as_ref().join(CONFIG_FILE_NAME))
    }

    /// Load from a specific path, then apply env var overrides.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let mut config = if path.exists() {
            let contents = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read config file {}", path.display()))?;
            toml::from_str(&contents).context("failed to parse config TOML")?
        } else {
            info!("no config file at {}, using defaults", path.display());
            VaultConfig::default()
        };

        config.apply_env_overrides();
        Ok(config)
    }

    /// Apply environment variable overrides (VAULTKEEP_LOG_LEVEL, VAULTKEEP_REPORT).
    fn apply_env_overrides(&mut self) {
        if let Ok(val) = std::env::var("VAULTKEEP_LOG_LEVEL") {
            self.log.level = val;
        }
        if let Ok(val) = std::env::var("VAULTKEEP_REPORT") {
            self.layout.report_file = val;
        }
    }

    /// Path of the cleaning report for a vault rooted at `root`.
    pub fn report_path(&self, root: &Path) -> PathBuf {
        root.join(&self.layout.report_file)
    }
}

/// Pick the vault root: explicit flag, then `VAULTKEEP_ROOT`, then `fallback_env`
/// (if given), then the current directory.
pub fn resolve_vault_root(explicit: Option<&str>, fallback_env: Option<&str>) -> PathBuf {
    if let Some(path) = explicit {
        return expand_tilde(path);
    }
    if let Ok(val) = std::env::var("VAULTKEEP_ROOT") {
        return expand_tilde(&val);
    }
    if let Some(name) = fallback_env {
        if let Ok(val) = std::env::var(name) {
            return expand_tilde(&val);
        }
    }
    PathBuf::from(".")
}

pub fn expand_tilde(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/") {
        match dirs::home_dir() {
            Some(home) => home.join(rest),
            None => PathBuf::from(path),
        }
    } else {
        PathBuf::from(path)
    }
}
