//! `passvault init` — create the master verifier, salt, and vault key.

use crate::bootstrap::{bootstrap_if_needed, BootstrapOutcome};
use crate::cli::output;
use crate::cli::{is_interactive, prompt_new_master_password, vault_paths, Cli};
use crate::errors::{PassVaultError, Result};

/// Execute the `init` command.
pub fn execute(cli: &Cli, username: Option<&str>) -> Result<()> {
    let paths = vault_paths(cli)?;

    let outcome = bootstrap_if_needed(&paths, prompt_new_master_password, || {
        prompt_default_username(username)
    })?;

    match outcome {
        BootstrapOutcome::Provisioned(_) => {
            output::success(&format!("Vault created at {}", paths.dir.display()));
            output::warning(
                "Back up the vault key file — without it saved logins cannot be recovered.",
            );
            output::tip("Run `passvault add <SITE>` to save a login.");
            output::tip("Run `passvault generate` to create a random password.");
        }
        BootstrapOutcome::AlreadyProvisioned(_) => {
            output::info(&format!(
                "Vault already set up at {} — nothing to do.",
                paths.dir.display()
            ));
        }
    }

    Ok(())
}

/// Use the `--username` flag, otherwise ask (interactive only).
fn prompt_default_username(flag: Option<&str>) -> Result<Option<String>> {
    if let Some(u) = flag {
        return Ok(Some(u.to_string()));
    }
    if !is_interactive() {
        return Ok(None);
    }

    let input: String = dialoguer::Input::new()
        .with_prompt("Default email/username (optional)")
        .allow_empty(true)
        .interact_text()
        .map_err(|e| PassVaultError::CommandFailed(format!("input prompt: {e}")))?;
    Ok(Some(input))
}
