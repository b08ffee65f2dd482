use chrono::{Datelike, Duration, NaiveDate};
use tracing::debug;

use crate::dates::{self, format_canonical, months_between, parse_date};
use crate::subscription::{BillingFrequency, Subscription};

/// Outcome counts from rolling a collection forward.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RolloverReport {
    /// Records whose stored renewal date changed to a later (or canonicalized) date.
    pub advanced: usize,
    /// Records whose renewal was cleared: expired, unparseable or not advanceable.
    pub cleared: usize,
    pub unchanged: usize,
}

impl RolloverReport {
    pub fn changed(&self) -> bool {
        self.advanced > 0 || self.cleared > 0
    }
}

/// Returns the first occurrence of the series on or after `today`, or `None` when the
/// series lapses before reaching it.
///
/// Every candidate is derived from the original `anchor` plus a whole number of periods,
/// so a Jan 31 monthly anchor visits Feb 29, Mar 31, Apr 30 rather than drifting to the
/// 29th. Days that do not exist in the target month clip to its last day.
pub fn advance(
    today: NaiveDate,
    anchor: NaiveDate,
    frequency: &BillingFrequency,
    expiration: Option<NaiveDate>,
) -> Option<NaiveDate> {
    let expired = |date: NaiveDate| expiration.is_some_and(|limit| date > limit);

    if anchor >= today {
        return if expired(anchor) { None } else { Some(anchor) };
    }

    // Candidates grow strictly with the period count, so starting from a lower bound on
    // the elapsed periods finds the same first occurrence and the same expiry outcome.
    let mut periods = elapsed_lower_bound(anchor, today, frequency)?;
    loop {
        let candidate = occurrence(anchor, frequency, periods)?;
        if expired(candidate) {
            return None;
        }
        if candidate >= today {
            return Some(candidate);
        }
        periods += 1;
    }
}

/// String form of [`advance`]: canonical `YYYY-MM-DD`, or an empty string when the anchor
/// is missing or unparseable or the series has expired.
///
/// An expiration date that cannot be parsed never expires the series.
pub fn next_billing_date(
    today: NaiveDate,
    anchor: &str,
    frequency: &BillingFrequency,
    expiration: Option<&str>,
) -> String {
    let Some(anchor_date) = parse_date(anchor) else {
        return String::new();
    };
    let expiration = expiration.and_then(parse_date);
    advance(today, anchor_date, frequency, expiration)
        .map(format_canonical)
        .unwrap_or_default()
}

/// Passes every record with a renewal date through the advancer, returning new records.
/// Lapsed renewals are cleared; records without a renewal date are copied as-is.
pub fn roll_forward(
    subscriptions: &[Subscription],
    today: NaiveDate,
) -> (Vec<Subscription>, RolloverReport) {
    let mut report = RolloverReport::default();
    let rolled: Vec<Subscription> = subscriptions
        .iter()
        .map(|sub| {
            let mut next = sub.clone();
            let Some(stored) = sub.next_renewal.as_deref() else {
                report.unchanged += 1;
                return next;
            };
            let computed = next_billing_date(
                today,
                stored,
                &sub.frequency,
                sub.expiration_date.as_deref(),
            );
            if computed.is_empty() {
                debug!(id = %sub.id, stored, "renewal cleared");
                report.cleared += 1;
                next.next_renewal = None;
            } else if computed != stored {
                debug!(id = %sub.id, stored, next = %computed, "renewal advanced");
                report.advanced += 1;
                next.next_renewal = Some(computed);
            } else {
                report.unchanged += 1;
            }
            next
        })
        .collect();
    (rolled, report)
}

fn occurrence(anchor: NaiveDate, frequency: &BillingFrequency, periods: i64) -> Option<NaiveDate> {
    match frequency {
        BillingFrequency::Weekly => {
            anchor.checked_add_signed(Duration::try_days(periods.checked_mul(7)?)?)
        }
        BillingFrequency::Monthly => dates::shift_months(anchor, i32::try_from(periods).ok()?),
        BillingFrequency::Yearly => dates::shift_years(anchor, i32::try_from(periods).ok()?),
        BillingFrequency::Unrecognized(raw) => {
            debug!(frequency = %raw, "cannot advance unrecognized frequency");
            None
        }
    }
}

/// Largest period count whose occurrence is certainly before `today` (at least 1).
fn elapsed_lower_bound(
    anchor: NaiveDate,
    today: NaiveDate,
    frequency: &BillingFrequency,
) -> Option<i64> {
    let bound = match frequency {
        BillingFrequency::Weekly => (today - anchor).num_days() / 7,
        BillingFrequency::Monthly => i64::from(months_between(anchor, today)) - 1,
        BillingFrequency::Yearly => i64::from(today.year() - anchor.year()) - 1,
        BillingFrequency::Unrecognized(_) => return None,
    };
    Some(bound.max(1))
}
