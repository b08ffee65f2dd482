use crate::cli::context::{CommandResult, ShellContext};
use crate::cli::output;
use crate::cli::registry::CommandEntry;
use crate::notify::{ensure_permission, NotificationPermission, HORIZON_DAYS};
use crate::tracker::DEFAULT_TOP;

use super::args::invalid;

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new("total", "Show the monthly-equivalent total", "total", cmd_total),
        CommandEntry::new(
            "categories",
            "Show monthly spending per category",
            "categories",
            cmd_categories,
        ),
        CommandEntry::new(
            "top",
            "Show the most expensive subscriptions per month",
            "top [count]",
            cmd_top,
        ),
        CommandEntry::new(
            "notify",
            "Announce renewals due in the next three days",
            "notify",
            cmd_notify,
        ),
    ]
}

fn cmd_total(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let total = context.tracker.total_monthly();
    output::info(format!("Monthly total: {}", context.money(total)));
    output::info(format!("Yearly total: {}", context.money(total * 12.0)));
    Ok(())
}

fn cmd_categories(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let totals = context.tracker.by_category();
    if totals.is_empty() {
        output::info("No subscriptions yet.");
        return Ok(());
    }
    let rows: Vec<Vec<String>> = totals
        .iter()
        .map(|entry| {
            vec![
                entry.category.clone(),
                entry.count.to_string(),
                context.money(entry.monthly),
            ]
        })
        .collect();
    output::section("Spending by category");
    output::raw(output::render_table(&["Category", "Count", "Monthly"], &rows));
    Ok(())
}

fn cmd_top(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let limit = match args.first() {
        Some(raw) => raw
            .parse::<usize>()
            .ok()
            .filter(|value| *value > 0)
            .ok_or_else(|| invalid(format!("invalid count `{raw}`")))?,
        None => DEFAULT_TOP,
    };
    let ranked = context.tracker.top(limit);
    if ranked.is_empty() {
        output::info("No subscriptions yet.");
        return Ok(());
    }
    let rows: Vec<Vec<String>> = ranked
        .iter()
        .enumerate()
        .map(|(idx, entry)| {
            vec![
                (idx + 1).to_string(),
                entry.name.clone(),
                context.money(entry.monthly),
            ]
        })
        .collect();
    output::section(format!("Top {limit} by monthly cost"));
    output::raw(output::render_table(&["#", "Name", "Monthly"], &rows));
    Ok(())
}

fn cmd_notify(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    if ensure_permission(&mut context.notifier) != NotificationPermission::Granted {
        output::warning("Notifications are blocked.");
        return Ok(());
    }
    let currency = context.currency();
    let report = context
        .tracker
        .check_upcoming_renewals(&mut context.notifier, currency);
    if report.delivered == 0 {
        output::info(format!(
            "No new renewals in the next {HORIZON_DAYS} days ({} already announced).",
            report.already_notified
        ));
    }
    Ok(())
}
