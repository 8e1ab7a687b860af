//! CLI module — Clap argument parser, prompts, and command implementations.

pub mod commands;
pub mod output;

use std::io::{self, IsTerminal};
use std::path::Path;

use clap::Parser;

use zeroize::Zeroizing;

use crate::config::Settings;
use crate::errors::{PassVaultError, Result};
use crate::vault::{Vault, VaultPaths};

/// Environment variable that supplies the master password non-interactively.
pub const PASSWORD_ENV: &str = "PASSVAULT_PASSWORD";

/// PassVault CLI: local encrypted password manager.
#[derive(Parser)]
#[command(name = "passvault", about = "Local encrypted password manager", version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Vault directory (default: .passvault, or `vault_dir` from .passvault.toml)
    #[arg(long, global = true)]
    pub vault_dir: Option<String>,

    /// Enable debug logging (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

/// All available subcommands.
#[derive(clap::Subcommand)]
pub enum Commands {
    /// Set up the vault: master password, keys, and default username
    Init {
        /// Default email/username offered when adding logins
        #[arg(short, long)]
        username: Option<String>,
    },

    /// Save a login for a site (replaces any existing one)
    Add {
        /// Site name (e.g. example.com)
        site: String,

        /// Email or username (defaults to the one set at init)
        #[arg(short, long)]
        email: Option<String>,

        /// Password (omit for interactive prompt)
        #[arg(short, long, conflicts_with = "generate")]
        password: Option<String>,

        /// Generate a random password instead of entering one
        #[arg(short, long)]
        generate: bool,

        /// Copy the generated password to the clipboard
        #[arg(short, long, requires = "generate")]
        copy: bool,
    },

    /// Show the saved login for a site (asks for the master password)
    Search {
        /// Site name
        site: String,

        /// Copy the password to the clipboard instead of printing it
        #[arg(short, long)]
        copy: bool,
    },

    /// Generate a random password
    Generate {
        /// Copy the password to the clipboard
        #[arg(short, long)]
        copy: bool,
    },

    /// List saved site names
    List,
}

// ---------------------------------------------------------------------------
// Shared helpers used by multiple commands
// ---------------------------------------------------------------------------

/// Get the master password, trying in order:
/// 1. `PASSVAULT_PASSWORD` env var
/// 2. Interactive prompt
///
/// Returns `Zeroizing<String>` so the password is wiped from memory on drop.
pub fn prompt_master_password() -> Result<Zeroizing<String>> {
    if let Some(pw) = password_from_env() {
        return Ok(pw);
    }

    let pw = dialoguer::Password::new()
        .with_prompt("Enter master password")
        .allow_empty_password(true)
        .interact()
        .map_err(|e| PassVaultError::CommandFailed(format!("password prompt: {e}")))?;
    Ok(Zeroizing::new(pw))
}

/// Prompt for a new master password with confirmation (used during `init`).
///
/// Also respects `PASSVAULT_PASSWORD` for scripted usage.
pub fn prompt_new_master_password() -> Result<Zeroizing<String>> {
    if let Some(pw) = password_from_env() {
        return Ok(pw);
    }

    loop {
        let password = dialoguer::Password::new()
            .with_prompt("Choose master password")
            .with_confirmation(
                "Confirm master password",
                "Passwords do not match, try again",
            )
            .allow_empty_password(true)
            .interact()
            .map_err(|e| PassVaultError::CommandFailed(format!("password prompt: {e}")))?;

        if password.is_empty() {
            output::warning("Master password cannot be empty. Try again.");
            continue;
        }

        return Ok(Zeroizing::new(password));
    }
}

fn password_from_env() -> Option<Zeroizing<String>> {
    std::env::var(PASSWORD_ENV)
        .ok()
        .filter(|pw| !pw.is_empty())
        .map(Zeroizing::new)
}

/// Whether interactive prompts can be shown.
pub fn is_interactive() -> bool {
    io::stdin().is_terminal()
}

/// Resolve the vault file set from the working directory, the config
/// file, and `--vault-dir`.
pub fn vault_paths(cli: &Cli) -> Result<VaultPaths> {
    let cwd = std::env::current_dir()?;
    vault_paths_in(cli, &cwd)
}

fn vault_paths_in(cli: &Cli, project_dir: &Path) -> Result<VaultPaths> {
    let settings = Settings::load(project_dir)?;
    Ok(settings.vault_paths(project_dir, cli.vault_dir.as_deref()))
}

/// Open the provisioned vault for this invocation.
pub fn open_vault(cli: &Cli) -> Result<Vault> {
    Vault::open(vault_paths(cli)?)
}

/// Put `text` on the system clipboard.
pub fn copy_to_clipboard(text: &str) -> Result<()> {
    let mut clipboard =
        arboard::Clipboard::new().map_err(|e| PassVaultError::ClipboardError(e.to_string()))?;
    clipboard
        .set_text(text)
        .map_err(|e| PassVaultError::ClipboardError(e.to_string()))
}
