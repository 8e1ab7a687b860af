//! `passvault search` — decrypt and show the login saved for a site.

use crate::cli::{copy_to_clipboard, open_vault, output, prompt_master_password, Cli};
use crate::errors::Result;

/// Execute the `search` command.
pub fn execute(cli: &Cli, site: &str, copy: bool) -> Result<()> {
    let vault = open_vault(cli)?;

    // The master password is asked for on every search.
    let credential = vault.search_site(site, prompt_master_password)?;

    if copy {
        copy_to_clipboard(&credential.password)?;
        output::print_credential(site, &credential, false);
        output::success("Password copied to clipboard.");
    } else {
        output::print_credential(site, &credential, true);
    }

    Ok(())
}
