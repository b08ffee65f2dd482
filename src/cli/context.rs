//! Shell state, command dispatch and the CLI error types.

use std::{io, path::Path};

use rustyline::error::ReadlineError;
use thiserror::Error;

use crate::backup::FileBackupHandle;
use crate::config::{ConfigManager, Settings};
use crate::errors::TrackerError;
use crate::storage::JsonFileStore;
use crate::time::{Clock, SystemClock};
use crate::tracker::Tracker;
use crate::utils::paths;

use super::commands;
use super::notifier::ConsoleNotifier;
use super::output;
use super::registry::{CommandEntry, CommandRegistry};

/// Distance beyond which an unknown command gets no suggestion.
const SUGGESTION_DISTANCE: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CliMode {
    Interactive,
    Script,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopControl {
    Continue,
    Exit,
}

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Core(#[from] TrackerError),
    #[error("Invalid input: {0}")]
    Input(String),
    #[error("Command failed: {0}")]
    Command(String),
}

impl From<io::Error> for CliError {
    fn from(err: io::Error) -> Self {
        CliError::Command(err.to_string())
    }
}

impl From<ReadlineError> for CliError {
    fn from(err: ReadlineError) -> Self {
        CliError::Input(err.to_string())
    }
}

#[derive(Debug, Error)]
pub enum CommandError {
    #[error("{0}")]
    InvalidArguments(String),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Core(#[from] TrackerError),
    #[error("exit requested")]
    ExitRequested,
}

impl From<CommandError> for CliError {
    fn from(err: CommandError) -> Self {
        CliError::Command(err.to_string())
    }
}

pub type CommandResult = Result<(), CommandError>;

pub struct ShellContext {
    pub mode: CliMode,
    pub registry: CommandRegistry,
    pub tracker: Tracker<JsonFileStore>,
    pub config_manager: ConfigManager,
    pub settings: Settings,
    pub notifier: ConsoleNotifier,
    pub last_command: Option<String>,
    pub running: bool,
}

impl ShellContext {
    pub fn new(mode: CliMode) -> Result<Self, CliError> {
        Self::with_base_dir(mode, &paths::app_data_dir(), Box::new(SystemClock))
    }

    /// Opens the tracker and settings stored under `base`.
    pub fn with_base_dir(mode: CliMode, base: &Path, clock: Box<dyn Clock>) -> Result<Self, CliError> {
        let config_manager = ConfigManager::with_base_dir(base)?;
        let settings = config_manager.load()?;
        let store = JsonFileStore::new(paths::store_file_in(base));
        let tracker = Tracker::open(store, clock)?;

        let mut registry = CommandRegistry::default();
        commands::register_all(&mut registry);

        let mut context = Self {
            mode,
            registry,
            tracker,
            config_manager,
            settings,
            notifier: ConsoleNotifier::default(),
            last_command: None,
            running: true,
        };
        context.restore_backup();
        Ok(context)
    }

    /// Reconnects the backup target remembered in settings.
    fn restore_backup(&mut self) {
        let Some(path) = self.settings.backup_path.clone() else {
            return;
        };
        self.tracker
            .connect_backup(Box::new(FileBackupHandle::new(path)));
        if let Some(error) = self.tracker.backup().last_error() {
            output::warning(error);
        }
    }

    pub fn prompt(&self) -> String {
        format!("subtrack ({})> ", self.tracker.subscriptions().len())
    }

    pub fn command_names(&self) -> Vec<&'static str> {
        self.registry.words()
    }

    pub fn command(&self, name: &str) -> Option<&CommandEntry> {
        self.registry.resolve(name)
    }

    pub fn currency(&self) -> &'static str {
        self.settings.currency.symbol()
    }

    pub fn money(&self, amount: f64) -> String {
        format!("{}{:.2}", self.currency(), amount)
    }

    pub fn persist_settings(&self) -> CommandResult {
        self.config_manager.save(&self.settings)?;
        Ok(())
    }

    pub(crate) fn dispatch(
        &mut self,
        command: &str,
        raw: &str,
        args: &[&str],
    ) -> Result<LoopControl, CommandError> {
        let Some(handler) = self.registry.resolve(command).map(|entry| entry.run) else {
            self.suggest_command(raw);
            return Ok(LoopControl::Continue);
        };
        match handler(self, args) {
            Ok(()) => Ok(LoopControl::Continue),
            Err(CommandError::ExitRequested) => Ok(LoopControl::Exit),
            Err(err) => Err(err),
        }
    }

    pub(crate) fn suggestion_for(&self, input: &str) -> Option<&'static str> {
        self.registry.closest(input, SUGGESTION_DISTANCE)
    }

    pub(crate) fn suggest_command(&self, input: &str) {
        output::warning(format!(
            "Unknown command `{input}`. Type `help` to see available commands."
        ));
        if let Some(best) = self.suggestion_for(input) {
            output::info(format!("Suggestion: `{best}`?"));
        }
    }

    pub(crate) fn report_error(&self, err: CommandError) {
        match err {
            CommandError::ExitRequested => {}
            CommandError::InvalidArguments(message) => {
                output::error(message);
                output::info("Use `help <command>` for usage details.");
            }
            other => output::error(other),
        }
    }

    #[cfg(test)]
    pub(crate) fn process_line(&mut self, line: &str) -> Result<LoopControl, CommandError> {
        super::shell::handle_line(self, line)
    }
}
