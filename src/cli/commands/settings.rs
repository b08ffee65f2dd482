use crate::cli::context::{CommandResult, ShellContext};
use crate::cli::output;
use crate::cli::registry::CommandEntry;
use crate::config::Currency;

use super::args::invalid;

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![CommandEntry::new(
        "currency",
        "Show or change the display currency",
        "currency [€|$|£|¥|CHF]",
        cmd_currency,
    )]
}

fn cmd_currency(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let [raw] = args else {
        let options: Vec<&str> = Currency::ALL.iter().map(|c| c.symbol()).collect();
        output::info(format!(
            "Currency: {} (options: {})",
            context.currency(),
            options.join(" ")
        ));
        return Ok(());
    };
    let currency: Currency = raw
        .parse()
        .map_err(|_| invalid(format!("unsupported currency `{raw}`")))?;
    context.settings.currency = currency;
    context.persist_settings()?;
    output::success(format!("Currency set to {currency}"));
    Ok(())
}
