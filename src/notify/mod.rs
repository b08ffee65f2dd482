//! Renewal notification policy: which subscriptions to announce, and only once each.
//!
//! Display and permission handling belong to a [`Notifier`]; "already notified" state
//! lives in an injected [`MarkerStore`], so the scan is a function of its inputs.

pub mod markers;

use chrono::{Duration, NaiveDateTime, NaiveTime};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::subscription::Subscription;

pub use markers::{KeyValueMarkerStore, MarkerStore, MemoryMarkerStore};

/// Renewals up to this many days ahead are announced.
pub const HORIZON_DAYS: i64 = 3;

const MILLIS_PER_DAY: i64 = 24 * 60 * 60 * 1000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationPermission {
    /// The user has not decided yet; asking is allowed.
    Default,
    Granted,
    Denied,
}

#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("notification display failed: {0}")]
    Display(String),
    #[error("marker store failed: {0}")]
    Markers(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct RenewalNotification {
    pub subscription_id: String,
    pub title: String,
    pub body: String,
    pub days_until: i64,
}

/// Delivery collaborator (desktop notifications, a terminal, a test double).
pub trait Notifier {
    fn permission(&self) -> NotificationPermission;
    fn request_permission(&mut self) -> NotificationPermission;
    fn show(&mut self, notification: &RenewalNotification) -> Result<(), NotifyError>;
}

/// Asks for permission only while the user has not decided; returns the resulting state.
pub fn ensure_permission<N: Notifier + ?Sized>(notifier: &mut N) -> NotificationPermission {
    match notifier.permission() {
        NotificationPermission::Default => notifier.request_permission(),
        decided => decided,
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScanReport {
    pub delivered: usize,
    pub already_notified: usize,
    pub not_permitted: usize,
    pub failed: usize,
}

pub fn dedupe_key(subscription_id: &str, renewal: &str) -> String {
    format!("notified-{subscription_id}-{renewal}")
}

/// Whole days until `renewal_at`, rounded up, when it falls in `(now, now + 3 days]`.
pub fn days_until_renewal(now: NaiveDateTime, renewal_at: NaiveDateTime) -> Option<i64> {
    if renewal_at <= now || renewal_at > now + Duration::days(HORIZON_DAYS) {
        return None;
    }
    let millis = (renewal_at - now).num_milliseconds();
    Some((millis + MILLIS_PER_DAY - 1) / MILLIS_PER_DAY)
}

pub fn build_notification(sub: &Subscription, days_until: i64, currency: &str) -> RenewalNotification {
    let plural = if days_until > 1 { "s" } else { "" };
    RenewalNotification {
        subscription_id: sub.id.clone(),
        title: format!("Subscription Renewal Alert: {}", sub.name),
        body: format!(
            "{} is renewing in {days_until} day{plural} for {currency}{}",
            sub.name, sub.price
        ),
        days_until,
    }
}

/// Announces every renewal due within the horizon exactly once per
/// (subscription id, renewal date) pair.
///
/// A renewal date is taken to start at local midnight. A marker is written only after
/// the notifier has displayed the notification, so a denied or failed delivery is
/// retried on a later scan.
pub fn check_upcoming_renewals<M, N>(
    subscriptions: &[Subscription],
    now: NaiveDateTime,
    markers: &mut M,
    notifier: &mut N,
    currency: &str,
) -> ScanReport
where
    M: MarkerStore + ?Sized,
    N: Notifier + ?Sized,
{
    let mut report = ScanReport::default();

    for sub in subscriptions {
        let (Some(raw), Some(date)) = (sub.next_renewal.as_deref(), sub.renewal_date()) else {
            continue;
        };
        let Some(days_until) = days_until_renewal(now, date.and_time(NaiveTime::MIN)) else {
            continue;
        };

        let key = dedupe_key(&sub.id, raw);
        match markers.has_fired(&key) {
            Ok(true) => {
                debug!(%key, "renewal already announced");
                report.already_notified += 1;
                continue;
            }
            Ok(false) => {}
            Err(err) => {
                warn!(%key, error = %err, "cannot read notification marker; skipping");
                report.failed += 1;
                continue;
            }
        }

        if notifier.permission() != NotificationPermission::Granted {
            report.not_permitted += 1;
            continue;
        }

        let notification = build_notification(sub, days_until, currency);
        if let Err(err) = notifier.show(&notification) {
            warn!(id = %sub.id, error = %err, "renewal notification not shown");
            report.failed += 1;
            continue;
        }
        if let Err(err) = markers.mark_fired(&key) {
            warn!(%key, error = %err, "notification shown but marker not saved");
        }
        info!(id = %sub.id, days_until, "renewal notification delivered");
        report.delivered += 1;
    }

    report
}
