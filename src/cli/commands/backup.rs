use std::path::PathBuf;

use crate::backup::{BackupOutcome, FileBackupHandle, SUGGESTED_FILE_NAME};
use crate::cli::context::{CommandResult, ShellContext};
use crate::cli::output;
use crate::cli::registry::CommandEntry;
use crate::utils::paths;

use super::args::invalid;

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![CommandEntry::new(
        "backup",
        "Mirror every change into a backup file",
        "backup [status | connect [path] | disconnect]",
        cmd_backup,
    )]
}

fn cmd_backup(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    match args {
        [] | ["status"] => status(context),
        ["connect"] => connect(context, paths::app_data_dir().join(SUGGESTED_FILE_NAME)),
        ["connect", path] => connect(context, PathBuf::from(*path)),
        ["disconnect"] => disconnect(context),
        _ => Err(invalid("usage: backup [status | connect [path] | disconnect]")),
    }
}

fn status(context: &ShellContext) -> CommandResult {
    let mirror = context.tracker.backup();
    output::section("Backup");
    output::info(format!("  State      : {}", mirror.state().label()));
    if let Some(target) = mirror.target() {
        output::info(format!("  File       : {target}"));
    }
    match mirror.last_saved() {
        Some(saved) => output::info(format!("  Last saved : {}", saved.to_rfc3339())),
        None => output::info("  Last saved : never"),
    }
    if let Some(error) = mirror.last_error() {
        output::warning(error);
    }
    Ok(())
}

fn connect(context: &mut ShellContext, path: PathBuf) -> CommandResult {
    let outcome = context
        .tracker
        .connect_backup(Box::new(FileBackupHandle::new(path.clone())));
    context.settings.backup_path = Some(path.clone());
    context.persist_settings()?;
    match outcome {
        BackupOutcome::Written => {
            output::success(format!("Backup connected: {}", path.display()));
        }
        BackupOutcome::Failed(reason) => {
            output::warning(format!("Backup connected but not written: {reason}"));
        }
        BackupOutcome::Skipped => {}
    }
    Ok(())
}

fn disconnect(context: &mut ShellContext) -> CommandResult {
    if context.tracker.disconnect_backup().is_none() {
        output::info("No backup file connected.");
        return Ok(());
    }
    context.settings.backup_path = None;
    context.persist_settings()?;
    output::success("Backup disconnected.");
    Ok(())
}
