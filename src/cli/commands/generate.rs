//! `passvault generate` — print a fresh random password.

use crate::cli::{copy_to_clipboard, output};
use crate::crypto::generate_random_password;
use crate::errors::Result;

/// Execute the `generate` command.
pub fn execute(copy: bool) -> Result<()> {
    let password = generate_random_password();
    println!("{password}");

    if copy {
        copy_to_clipboard(&password)?;
        output::success("Copied to clipboard.");
    }

    Ok(())
}
