//! Argument parsing shared by command handlers.

use std::collections::HashMap;

use crate::dates::parse_date;
use crate::subscription::BillingFrequency;

use crate::cli::context::CommandError;

/// Value accepted by `--renews` and `--expires` to clear a date.
pub(crate) const CLEAR: &str = "none";

/// Positional arguments plus `--flag value` options.
#[derive(Debug, Default)]
pub(crate) struct ParsedArgs<'a> {
    pub positionals: Vec<&'a str>,
    options: HashMap<&'a str, &'a str>,
}

impl<'a> ParsedArgs<'a> {
    pub fn option(&self, name: &str) -> Option<&'a str> {
        self.options.get(name).copied()
    }

    pub fn has_options(&self) -> bool {
        !self.options.is_empty()
    }
}

pub(crate) fn parse<'a>(args: &[&'a str], allowed: &[&str]) -> Result<ParsedArgs<'a>, CommandError> {
    let mut parsed = ParsedArgs::default();
    let mut iter = args.iter().copied();
    while let Some(arg) = iter.next() {
        let Some(name) = arg.strip_prefix("--") else {
            parsed.positionals.push(arg);
            continue;
        };
        if !allowed.contains(&name) {
            return Err(invalid(format!("unknown option `--{name}`")));
        }
        let value = iter
            .next()
            .ok_or_else(|| invalid(format!("option `--{name}` needs a value")))?;
        parsed.options.insert(name, value);
    }
    Ok(parsed)
}

pub(crate) fn invalid(message: impl Into<String>) -> CommandError {
    CommandError::InvalidArguments(message.into())
}

pub(crate) fn price(raw: &str) -> Result<f64, CommandError> {
    raw.parse::<f64>()
        .ok()
        .filter(|value| value.is_finite() && *value >= 0.0)
        .ok_or_else(|| invalid(format!("invalid price `{raw}`")))
}

pub(crate) fn frequency(raw: &str) -> Result<BillingFrequency, CommandError> {
    raw.parse()
        .map_err(|_| invalid(format!("invalid frequency `{raw}` (weekly, monthly or yearly)")))
}

/// `None` clears the date; otherwise the canonical date string is returned.
pub(crate) fn date(raw: &str) -> Result<Option<String>, CommandError> {
    if raw.eq_ignore_ascii_case(CLEAR) {
        return Ok(None);
    }
    parse_date(raw)
        .map(|_| Some(raw.to_string()))
        .ok_or_else(|| invalid(format!("invalid date `{raw}` (use YYYY-MM-DD)")))
}

/// Converts a 1-based list position into an index.
pub(crate) fn position(raw: &str, len: usize) -> Result<usize, CommandError> {
    match raw.parse::<usize>() {
        Ok(value) if (1..=len).contains(&value) => Ok(value - 1),
        _ => Err(invalid(format!("position `{raw}` is not between 1 and {len}"))),
    }
}
