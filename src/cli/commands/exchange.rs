use std::{fs, path::Path};

use crate::calendar;
use crate::cli::context::{CommandResult, ShellContext};
use crate::cli::output;
use crate::cli::registry::CommandEntry;
use crate::utils::paths::write_atomic;

use super::args::invalid;

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new(
            "export-ics",
            "Export renewals as an iCalendar file (stdout when no path is given)",
            "export-ics [path]",
            cmd_export_ics,
        ),
        CommandEntry::new(
            "export-json",
            "Export all subscriptions as JSON (stdout when no path is given)",
            "export-json [path]",
            cmd_export_json,
        ),
        CommandEntry::new(
            "import-json",
            "Replace all subscriptions with the contents of a JSON export",
            "import-json <path>",
            cmd_import_json,
        ),
    ]
}

fn emit(target: Option<&&str>, contents: &str, what: &str) -> CommandResult {
    match target {
        Some(path) => {
            write_atomic(Path::new(path), contents)?;
            output::success(format!("Wrote {what} to {path}"));
        }
        None => output::raw(contents.trim_end()),
    }
    Ok(())
}

fn cmd_export_ics(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let document = context.tracker.calendar_export();
    let what = format!("calendar ({})", calendar::CONTENT_TYPE);
    emit(args.first(), &document, &what)
}

fn cmd_export_json(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let document = context.tracker.export_json()?;
    emit(args.first(), &document, "JSON export")
}

fn cmd_import_json(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let [path] = args else {
        return Err(invalid("usage: import-json <path>"));
    };
    let payload = fs::read_to_string(path)?;
    let count = context.tracker.import_json(&payload)?;
    output::success(format!("Imported {count} subscriptions from {path}"));
    Ok(())
}
