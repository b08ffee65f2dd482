use crate::cli::context::{CommandError, CommandResult, ShellContext};
use crate::cli::output;
use crate::cli::registry::CommandEntry;
use crate::dates::format_display;
use crate::subscription::{Subscription, SubscriptionDraft};

use super::args::{self, invalid};

const SHORT_ID_LEN: usize = 8;
const DATE_OPTIONS: [&str; 2] = ["renews", "expires"];
const EDIT_OPTIONS: [&str; 6] = ["name", "price", "frequency", "category", "renews", "expires"];

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new("list", "List subscriptions in display order", "list", cmd_list)
            .aliased(&["ls"]),
        CommandEntry::new(
            "add",
            "Add a subscription",
            "add <name> <price> <weekly|monthly|yearly> [category] [--renews YYYY-MM-DD] [--expires YYYY-MM-DD]",
            cmd_add,
        ),
        CommandEntry::new(
            "edit",
            "Change fields of a subscription",
            "edit <id> [--name N] [--price P] [--frequency F] [--category C] [--renews DATE|none] [--expires DATE|none]",
            cmd_edit,
        ),
        CommandEntry::new("remove", "Delete a subscription", "remove <id>", cmd_remove)
            .aliased(&["rm"]),
        CommandEntry::new(
            "move",
            "Move a subscription to another list position",
            "move <from> <to>",
            cmd_move,
        ),
    ]
}

fn short_id(id: &str) -> &str {
    match id.char_indices().nth(SHORT_ID_LEN) {
        Some((idx, _)) => &id[..idx],
        None => id,
    }
}

fn display_date(value: Option<&str>) -> String {
    value.map(format_display).unwrap_or_else(|| "-".to_string())
}

fn cmd_list(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let subs = context.tracker.subscriptions();
    if subs.is_empty() {
        output::info("No subscriptions yet. Use `add` to create one.");
        return Ok(());
    }

    let rows: Vec<Vec<String>> = subs
        .iter()
        .enumerate()
        .map(|(idx, sub)| {
            vec![
                (idx + 1).to_string(),
                short_id(&sub.id).to_string(),
                sub.name.clone(),
                context.money(sub.price),
                sub.frequency.label().to_string(),
                sub.category.clone(),
                display_date(sub.next_renewal.as_deref()),
                display_date(sub.expiration_date.as_deref()),
                context.money(sub.monthly_cost()),
            ]
        })
        .collect();

    output::section("Subscriptions");
    output::raw(output::render_table(
        &["#", "ID", "Name", "Price", "Billing", "Category", "Renews", "Expires", "Monthly"],
        &rows,
    ));
    Ok(())
}

fn cmd_add(context: &mut ShellContext, raw: &[&str]) -> CommandResult {
    let parsed = args::parse(raw, &DATE_OPTIONS)?;
    let [name, price, frequency, rest @ ..] = parsed.positionals.as_slice() else {
        return Err(invalid("usage: add <name> <price> <frequency> [category]"));
    };
    if rest.len() > 1 {
        return Err(invalid("category must be a single argument; quote it if it has spaces"));
    }

    let mut draft = SubscriptionDraft::new(
        *name,
        args::price(price)?,
        args::frequency(frequency)?,
        rest.first().copied().unwrap_or_default(),
    );
    if let Some(value) = parsed.option("renews") {
        draft.next_renewal = args::date(value)?;
    }
    if let Some(value) = parsed.option("expires") {
        draft.expiration_date = args::date(value)?;
    }

    let id = context.tracker.add(draft)?;
    output::success(format!("Added `{name}` ({})", short_id(&id)));
    Ok(())
}

fn resolve_id(context: &ShellContext, reference: &str) -> Result<String, CommandError> {
    Ok(context.tracker.get(reference)?.id.clone())
}

fn cmd_edit(context: &mut ShellContext, raw: &[&str]) -> CommandResult {
    let parsed = args::parse(raw, &EDIT_OPTIONS)?;
    let [reference] = parsed.positionals.as_slice() else {
        return Err(invalid("usage: edit <id> [--field value]..."));
    };
    if !parsed.has_options() {
        return Err(invalid("nothing to change; pass at least one --field option"));
    }

    let current: &Subscription = context.tracker.get(reference)?;
    let id = current.id.clone();
    let mut draft = SubscriptionDraft::from(current);
    if let Some(value) = parsed.option("name") {
        draft.name = value.to_string();
    }
    if let Some(value) = parsed.option("price") {
        draft.price = args::price(value)?;
    }
    if let Some(value) = parsed.option("frequency") {
        draft.frequency = args::frequency(value)?;
    }
    if let Some(value) = parsed.option("category") {
        draft.category = value.to_string();
    }
    if let Some(value) = parsed.option("renews") {
        draft.next_renewal = args::date(value)?;
    }
    if let Some(value) = parsed.option("expires") {
        draft.expiration_date = args::date(value)?;
    }

    context.tracker.update(&id, draft)?;
    output::success(format!("Updated {}", short_id(&id)));
    Ok(())
}

fn cmd_remove(context: &mut ShellContext, raw: &[&str]) -> CommandResult {
    let [reference] = raw else {
        return Err(invalid("usage: remove <id>"));
    };
    let id = resolve_id(context, reference)?;
    let removed = context.tracker.remove(&id)?;
    output::success(format!("Removed `{}`", removed.name));
    Ok(())
}

fn cmd_move(context: &mut ShellContext, raw: &[&str]) -> CommandResult {
    let [from, to] = raw else {
        return Err(invalid("usage: move <from> <to>"));
    };
    let len = context.tracker.subscriptions().len();
    let from = args::position(from, len)?;
    let to = args::position(to, len)?;
    context.tracker.move_item(from, to)?;
    output::success(format!("Moved #{} to #{}", from + 1, to + 1));
    Ok(())
}
