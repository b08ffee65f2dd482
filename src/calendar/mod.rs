//! Calendar export: one recurring reminder event and one recurring task per subscription.

pub mod ics;

use chrono::{DateTime, Utc};
use tracing::debug;

use crate::dates::ICS_DATE_FORMAT;
use crate::subscription::{BillingFrequency, Subscription};
use ics::ContentLines;

pub const CONTENT_TYPE: &str = "text/calendar;charset=utf-8";
pub const FILE_NAME: &str = "subscriptions.ics";
pub const PRODUCT_ID: &str = "-//SubTracker//App//EN";

const STAMP_FORMAT: &str = "%Y%m%dT%H%M%SZ";
const ALARM_DESCRIPTION: &str = "Subscription Renewal Reminder";

/// Maps a billing frequency to its `RRULE` value. Unrecognized frequencies get none.
pub fn recurrence_rule(frequency: &BillingFrequency) -> Option<&'static str> {
    match frequency {
        BillingFrequency::Weekly => Some("FREQ=WEEKLY"),
        BillingFrequency::Monthly => Some("FREQ=MONTHLY"),
        BillingFrequency::Yearly => Some("FREQ=YEARLY"),
        BillingFrequency::Unrecognized(_) => None,
    }
}

/// Serializes every subscription that has a renewal date into a `VCALENDAR` document.
///
/// Each such subscription yields a `VEVENT` (all-day, one-day-before alarm, `-event` uid)
/// and a `VTODO` (`-task` uid) sharing the same recurrence rule. All entries carry the
/// same `DTSTAMP`, taken from `generated_at`. Records without a usable renewal date are
/// skipped entirely.
pub fn encode_calendar(subscriptions: &[Subscription], generated_at: DateTime<Utc>) -> String {
    let stamp = generated_at.format(STAMP_FORMAT).to_string();
    let mut lines = ContentLines::new();
    lines
        .begin("VCALENDAR")
        .raw("VERSION", "2.0")
        .raw("PRODID", PRODUCT_ID)
        .raw("CALSCALE", "GREGORIAN")
        .raw("METHOD", "PUBLISH");

    for sub in subscriptions {
        let Some(renewal) = sub.renewal_date() else {
            debug!(id = %sub.id, "skipping subscription without renewal date");
            continue;
        };
        let date = renewal.format(ICS_DATE_FORMAT).to_string();
        let rule = recurrence_rule(&sub.frequency);
        let description = format!("Price: {} | Category: {}", sub.price, sub.category);

        lines
            .begin("VEVENT")
            .text("UID", &format!("{}-event", sub.id))
            .raw("DTSTAMP", &stamp)
            .raw("DTSTART;VALUE=DATE", &date)
            .text("SUMMARY", &format!("Renew {}", sub.name))
            .text("DESCRIPTION", &description);
        if let Some(rule) = rule {
            lines.raw("RRULE", rule);
        }
        lines
            .begin("VALARM")
            .raw("ACTION", "DISPLAY")
            .text("DESCRIPTION", ALARM_DESCRIPTION)
            .raw("TRIGGER", "-P1D")
            .end("VALARM")
            .end("VEVENT");

        lines
            .begin("VTODO")
            .text("UID", &format!("{}-task", sub.id))
            .raw("DTSTAMP", &stamp)
            .raw("DUE;VALUE=DATE", &date)
            .text("SUMMARY", &format!("Pay {}", sub.name))
            .text("DESCRIPTION", &description);
        if let Some(rule) = rule {
            lines.raw("RRULE", rule);
        }
        lines.raw("STATUS", "NEEDS-ACTION").end("VTODO");
    }

    lines.end("VCALENDAR");
    lines.finish()
}
