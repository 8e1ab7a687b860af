use clap::Parser;
use passvault::cli::commands::add::AddArgs;
use passvault::cli::{Cli, Commands};
use tracing_subscriber::EnvFilter;

fn main() {
    let cli = Cli::parse();

    init_tracing(if cli.verbose { "debug" } else { "warn" });

    let result = match cli.command {
        Commands::Init { ref username } => {
            passvault::cli::commands::init::execute(&cli, username.as_deref())
        }
        Commands::Add {
            ref site,
            ref email,
            ref password,
            generate,
            copy,
        } => {
            let args = AddArgs {
                site,
                email: email.as_deref(),
                password: password.as_deref(),
                generate,
                copy,
            };
            passvault::cli::commands::add::execute(&cli, &args)
        }
        Commands::Search { ref site, copy } => {
            passvault::cli::commands::search::execute(&cli, site, copy)
        }
        Commands::Generate { copy } => passvault::cli::commands::generate::execute(copy),
        Commands::List => passvault::cli::commands::list::execute(&cli),
    };

    if let Err(e) = result {
        passvault::cli::output::error(&e.to_string());
        std::process::exit(1);
    }
}

/// Log to stderr; `RUST_LOG` wins over the `--verbose` default.
fn init_tracing(default_level: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}
