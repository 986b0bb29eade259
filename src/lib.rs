//! Housekeeping for Markdown "pillar" vaults.
//!
//! A vault is a tree of Markdown notes grouped into top-level pillar folders,
//! each holding some of `Inbox/`, `Projects/` and `Knowledge/`. vaultkeep keeps
//! every Knowledge folder's manifest in step with its notes and produces a
//! cleaning report of housekeeping issues.
//!
//! | Check | Rule | Default threshold |
//! |-------|------|-------------------|
//! | **Manifest drift** | manifest links differ from notes on disk | n/a |
//! | **Aging inbox** | inbox note untouched for too long | 3 days |
//! | **Stale projects** | project note untouched for too long | 30 days |
//! | **Root files** | Markdown at the vault root, not allow-listed | n/a |
//! | **Stub files** | Knowledge note body too short | 50 chars |
//!
//! # Modules
//!
//! - [`config`]: Configuration loading from `.vaultkeep.toml` and environment variables
//! - [`vault`]: Pillar discovery and note listing
//! - [`manifest`]: Manifest generation, sync and link parsing
//! - [`scan`]: The five health checks and the last-modified collaborator
//! - [`report`]: Cleaning report rendering and status output
//! - [`hook`]: Tool-invocation events that trigger manifest sync

pub mod config;
pub mod hook;
pub mod manifest;
pub mod report;
pub mod scan;
pub mod vault;
