mod cli;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use vaultkeep::config::{self, VaultConfig};

#[derive(Parser)]
#[command(name = "vaultkeep", version, about = "Manifest sync and cleaning reports for Markdown vaults")]
struct Cli {
    /// Vault root (defaults to $VAULTKEEP_ROOT, then the current directory)
    #[arg(long, global = true)]
    vault: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Regenerate every Knowledge manifest
    Sync {
        /// Only check; exit 1 if any manifest is out of sync
        #[arg(long)]
        check: bool,
    },
    /// Run the health checks and write the cleaning report
    Scan {
        /// Also print findings as JSON
        #[arg(long)]
        json: bool,
        /// Use filesystem mtimes only, skipping git history
        #[arg(long)]
        no_git: bool,
    },
    /// Handle a tool-invocation event read from stdin
    Hook,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // The hook runs inside the editor's project directory.
    let fallback_env = match cli.command {
        Command::Hook => Some("CLAUDE_PROJECT_DIR"),
        _ => None,
    };
    let root = config::resolve_vault_root(cli.vault.as_deref(), fallback_env);

    let is_hook = fallback_env.is_some();
    let config = match VaultConfig::load(&root) {
        Ok(config) => config,
        // A broken config must not block the editor that runs the hook.
        Err(err) if is_hook => {
            eprintln!("vaultkeep: {err:#}, using defaults");
            VaultConfig::default()
        }
        Err(err) => return Err(err),
    };

    // Log to stderr so stdout stays clean for reports and status lines.
    let filter = EnvFilter::try_new(&config.log.level)
        .unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Command::Sync { check } => {
            let code = cli::sync::sync(&root, &config, check)?;
            if code != 0 {
                std::process::exit(code);
            }
        }
        Command::Scan { json, no_git } => {
            cli::scan::scan(&root, &config, json, no_git)?;
        }
        Command::Hook => {
            cli::hook::hook(&root, &config);
        }
    }

    Ok(())
}
