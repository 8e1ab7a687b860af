//! `passvault add` — save or replace the login for a site.

use std::io::{self, Read};

use zeroize::Zeroizing;

use crate::cli::{copy_to_clipboard, is_interactive, open_vault, output, Cli};
use crate::crypto::generate_random_password;
use crate::errors::{PassVaultError, Result};

/// Arguments of the `add` command.
pub struct AddArgs<'a> {
    pub site: &'a str,
    pub email: Option<&'a str>,
    pub password: Option<&'a str>,
    pub generate: bool,
    pub copy: bool,
}

/// Execute the `add` command.
///
/// Writes do not ask for the master password.
pub fn execute(cli: &Cli, args: &AddArgs<'_>) -> Result<()> {
    let vault = open_vault(cli)?;

    let email = match args.email {
        Some(e) => e.to_string(),
        None => match vault.default_username()? {
            Some(default) => default,
            None => prompt_email()?,
        },
    };

    // Determine the password from one of four sources.
    let password: Zeroizing<String> = if args.generate {
        Zeroizing::new(generate_random_password())
    } else if let Some(p) = args.password {
        output::warning("Password provided on command line — it may appear in shell history.");
        Zeroizing::new(p.to_string())
    } else if !is_interactive() {
        let mut buf = String::new();
        io::stdin().read_to_string(&mut buf)?;
        Zeroizing::new(buf.trim_end().to_string())
    } else {
        let pw = dialoguer::Password::new()
            .with_prompt(format!("Password for {}", args.site))
            .allow_empty_password(true)
            .interact()
            .map_err(|e| PassVaultError::CommandFailed(format!("input prompt: {e}")))?;
        Zeroizing::new(pw)
    };

    vault.save_entry(args.site, &email, &password)?;
    output::success(&format!("Saved login for '{}' ({})", args.site, email));

    if args.generate {
        if args.copy {
            copy_to_clipboard(&password)?;
            output::success("Generated password copied to clipboard.");
        } else {
            output::info(&format!("Generated password: {}", password.as_str()));
        }
    }

    Ok(())
}

fn prompt_email() -> Result<String> {
    if !is_interactive() {
        return Ok(String::new());
    }
    dialoguer::Input::<String>::new()
        .with_prompt("Email/username")
        .allow_empty(true)
        .interact_text()
        .map_err(|e| PassVaultError::CommandFailed(format!("input prompt: {e}")))
}
