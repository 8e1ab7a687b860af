//! Colored terminal output helpers.
//!
//! All user-facing output goes through these functions so we get
//! consistent styling across every command.

use comfy_table::{ContentArrangement, Table};
use console::style;

use crate::vault::Credential;

/// Print a green success message: "check_mark {msg}"
pub fn success(msg: &str) {
    println!("{} {}", style("\u{2713}").green().bold(), msg);
}

/// Print a red error message: "x_mark {msg}"
pub fn error(msg: &str) {
    eprintln!("{} {}", style("\u{2717}").red().bold(), msg);
}

/// Print a yellow warning: "warning_sign {msg}"
pub fn warning(msg: &str) {
    eprintln!("{} {}", style("\u{26a0}").yellow().bold(), msg);
}

/// Print a blue info message: "info_sign {msg}"
pub fn info(msg: &str) {
    println!("{} {}", style("\u{2139}").blue().bold(), msg);
}

/// Print a dim tip/hint: "arrow {msg}"
pub fn tip(msg: &str) {
    println!("{} {}", style("\u{2192}").dim(), style(msg).dim());
}

/// Print a found login. The password is omitted when it went to the clipboard.
pub fn print_credential(site: &str, credential: &Credential, show_password: bool) {
    println!("{}", style(site).bold());
    println!("  Login:    {}", credential.email);
    if show_password {
        println!("  Password: {}", credential.password);
    }
}

/// Print a table of stored site names.
pub fn print_sites_table(sites: &[String]) {
    if sites.is_empty() {
        info("No logins saved yet.");
        tip("Run `passvault add <SITE>` to save your first login.");
        return;
    }

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Site"]);

    for site in sites {
        table.add_row(vec![site.as_str()]);
    }

    println!("{table}");
}
