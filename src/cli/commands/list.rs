//! `passvault list` — display stored site names in a table.

use crate::cli::output;
use crate::cli::{open_vault, Cli};
use crate::errors::{PassVaultError, Result};

/// Execute the `list` command.
///
/// Site names are plaintext keys of the vault document, so no master
/// password is needed.
pub fn execute(cli: &Cli) -> Result<()> {
    let vault = open_vault(cli)?;

    let sites = match vault.sites() {
        Ok(sites) => sites,
        Err(PassVaultError::VaultNotInitialized(_)) => Vec::new(),
        Err(e) => return Err(e),
    };

    output::info(&format!("{} saved login(s)", sites.len()));
    output::print_sites_table(&sites);

    Ok(())
}
