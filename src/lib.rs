#![doc(test(attr(deny(warnings))))]

//! SubTrack Core normalizes subscription prices to a monthly basis, rolls stored
//! renewal dates forward through elapsed billing periods, and exports recurring
//! obligations as iCalendar events and tasks.
//!
//! The billing engine (`billing`, `calendar`, `notify`) is pure and storage-agnostic.
//! `storage`, `backup`, `config` and [`tracker::Tracker`] wire it to local persistence.

pub mod backup;
pub mod billing;
pub mod calendar;
pub mod cli;
pub mod config;
pub mod dates;
pub mod errors;
pub mod notify;
pub mod storage;
pub mod subscription;
pub mod time;
pub mod tracker;
pub mod utils;

pub use billing::{
    advance, by_category, monthly_cost, next_billing_date, roll_forward, top_by_monthly_cost,
    total_monthly, CategoryTotal, RankedSubscription, RolloverReport,
};
pub use calendar::encode_calendar;
pub use errors::TrackerError;
pub use subscription::{BillingFrequency, Subscription, SubscriptionDraft};
pub use tracker::Tracker;

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup info log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::info!("SubTrack Core tracing initialized.");
    });
}

#[cfg(test)]
mod tests {
    #[test]
    fn init_does_not_panic() {
        super::init();
        super::init();
    }
}
