//! One module per subcommand. Each exposes an `execute` function.

pub mod add;
pub mod generate;
pub mod init;
pub mod list;
pub mod search;
