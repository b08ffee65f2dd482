pub mod commands;
mod context;
mod help;
pub mod notifier;
pub mod output;
pub mod registry;
mod shell;

pub use context::{CliError, CliMode, CommandError, CommandResult, LoopControl, ShellContext};
pub use notifier::ConsoleNotifier;
pub use shell::{run_cli, SCRIPT_ENV};
