//! Facade that owns the subscription collection and coordinates persistence,
//! rollover, backups and notification scans.

use tracing::{debug, info, warn};

use crate::backup::{BackupHandle, BackupMirror, BackupOutcome};
use crate::billing::{self, CategoryTotal, RankedSubscription, RolloverReport};
use crate::calendar;
use crate::dates::parse_date;
use crate::errors::{Result, TrackerError};
use crate::notify::{self, KeyValueMarkerStore, Notifier, ScanReport};
use crate::storage::{self, KeyValueStore};
use crate::subscription::{move_item, Subscription, SubscriptionDraft, SubscriptionService};
use crate::time::Clock;

/// Backup target type held by the tracker.
pub type DynBackupHandle = Box<dyn BackupHandle + Send>;

/// Number of entries shown by the dashboard ranking.
pub const DEFAULT_TOP: usize = 5;

pub struct Tracker<S: KeyValueStore> {
    store: S,
    subscriptions: Vec<Subscription>,
    clock: Box<dyn Clock>,
    backup: BackupMirror<DynBackupHandle>,
    last_backup: Option<BackupOutcome>,
}

impl<S: KeyValueStore> Tracker<S> {
    /// Loads the collection, rolls past renewals forward and persists the result if
    /// anything moved.
    pub fn open(store: S, clock: Box<dyn Clock>) -> Result<Self> {
        let loaded = storage::load_subscriptions(&store)?;
        let mut tracker = Self {
            store,
            subscriptions: loaded,
            clock,
            backup: BackupMirror::new(),
            last_backup: None,
        };
        let report = tracker.roll_forward()?;
        info!(
            count = tracker.subscriptions.len(),
            advanced = report.advanced,
            cleared = report.cleared,
            "tracker opened"
        );
        Ok(tracker)
    }

    pub fn subscriptions(&self) -> &[Subscription] {
        &self.subscriptions
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn clock(&self) -> &dyn Clock {
        self.clock.as_ref()
    }

    /// Looks a record up by exact id or unique id prefix.
    pub fn get(&self, reference: &str) -> Result<&Subscription> {
        SubscriptionService::resolve(&self.subscriptions, reference)
    }

    pub fn add(&mut self, draft: SubscriptionDraft) -> Result<String> {
        validate_draft(&draft)?;
        let mut next = self.subscriptions.clone();
        let id = SubscriptionService::add(&mut next, draft);
        self.commit(next)?;
        Ok(id)
    }

    pub fn update(&mut self, id: &str, draft: SubscriptionDraft) -> Result<()> {
        validate_draft(&draft)?;
        let mut next = self.subscriptions.clone();
        SubscriptionService::update(&mut next, id, draft)?;
        self.commit(next)
    }

    pub fn remove(&mut self, id: &str) -> Result<Subscription> {
        let mut next = self.subscriptions.clone();
        let removed = SubscriptionService::remove(&mut next, id)?;
        self.commit(next)?;
        Ok(removed)
    }

    pub fn move_item(&mut self, from: usize, to: usize) -> Result<()> {
        let next = move_item(&self.subscriptions, from, to)?;
        self.commit(next)
    }

    /// Replaces the whole collection.
    pub fn replace_all(&mut self, subscriptions: Vec<Subscription>) -> Result<()> {
        self.commit(subscriptions)
    }

    /// Parses an exported collection and replaces the current one with it.
    /// Nothing changes when the payload is rejected.
    pub fn import_json(&mut self, payload: &str) -> Result<usize> {
        let imported = storage::import_json(payload)?;
        let count = imported.len();
        self.replace_all(imported)?;
        info!(count, "collection imported");
        Ok(count)
    }

    pub fn export_json(&self) -> Result<String> {
        storage::export_json(&self.subscriptions)
    }

    /// Advances lapsed renewals against today's date, committing only when a record changed.
    pub fn roll_forward(&mut self) -> Result<RolloverReport> {
        let (rolled, report) = billing::roll_forward(&self.subscriptions, self.clock.today());
        if report.changed() {
            self.commit(rolled)?;
        }
        Ok(report)
    }

    pub fn total_monthly(&self) -> f64 {
        billing::total_monthly(&self.subscriptions)
    }

    pub fn by_category(&self) -> Vec<CategoryTotal> {
        billing::by_category(&self.subscriptions)
    }

    pub fn top(&self, limit: usize) -> Vec<RankedSubscription> {
        billing::top_by_monthly_cost(&self.subscriptions, limit)
    }

    pub fn calendar_export(&self) -> String {
        calendar::encode_calendar(&self.subscriptions, self.clock.timestamp())
    }

    /// Runs the renewal notification scan with markers kept in the tracker's store.
    pub fn check_upcoming_renewals<N: Notifier + ?Sized>(
        &self,
        notifier: &mut N,
        currency: &str,
    ) -> ScanReport {
        let mut markers = KeyValueMarkerStore::new(&self.store);
        notify::check_upcoming_renewals(
            &self.subscriptions,
            self.clock.now(),
            &mut markers,
            notifier,
            currency,
        )
    }

    pub fn backup(&self) -> &BackupMirror<DynBackupHandle> {
        &self.backup
    }

    pub fn last_backup_outcome(&self) -> Option<&BackupOutcome> {
        self.last_backup.as_ref()
    }

    /// Connects a backup target and mirrors the current collection into it.
    pub fn connect_backup(&mut self, handle: DynBackupHandle) -> BackupOutcome {
        self.backup.connect(handle);
        self.mirror()
    }

    pub fn disconnect_backup(&mut self) -> Option<DynBackupHandle> {
        self.last_backup = None;
        self.backup.disconnect()
    }

    /// Persists `next` and only then adopts it, so a failed save leaves state untouched.
    fn commit(&mut self, next: Vec<Subscription>) -> Result<()> {
        storage::save_subscriptions(&self.store, &next)?;
        self.subscriptions = next;
        debug!(count = self.subscriptions.len(), "collection committed");
        self.mirror();
        Ok(())
    }

    fn mirror(&mut self) -> BackupOutcome {
        let outcome = self
            .backup
            .mirror(&self.subscriptions, self.clock.timestamp());
        if let BackupOutcome::Failed(reason) = &outcome {
            warn!(%reason, "collection saved but backup mirror failed");
        }
        self.last_backup = Some(outcome.clone());
        outcome
    }
}

/// Rejects drafts that could never be billed or displayed.
fn validate_draft(draft: &SubscriptionDraft) -> Result<()> {
    if draft.name.trim().is_empty() {
        return Err(TrackerError::InvalidInput("name must not be empty".into()));
    }
    if !draft.price.is_finite() || draft.price < 0.0 {
        return Err(TrackerError::InvalidInput(format!(
            "price must be a non-negative number, got {}",
            draft.price
        )));
    }
    if !draft.frequency.is_recognized() {
        return Err(TrackerError::InvalidInput(format!(
            "unknown frequency `{}`",
            draft.frequency
        )));
    }
    for (label, value) in [
        ("renewal", draft.next_renewal.as_deref()),
        ("expiration", draft.expiration_date.as_deref()),
    ] {
        if let Some(raw) = value {
            if parse_date(raw).is_none() {
                return Err(TrackerError::InvalidInput(format!(
                    "{label} date `{raw}` is not YYYY-MM-DD"
                )));
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backup::PermissionState;
    use crate::storage::{MemoryStore, SUBSCRIPTIONS_KEY};
    use crate::subscription::BillingFrequency;
    use crate::time::FixedClock;
    use chrono::NaiveDate;
    use std::io;

    fn clock(y: i32, m: u32, d: u32) -> Box<dyn Clock> {
        Box::new(FixedClock::at_date(NaiveDate::from_ymd_opt(y, m, d).unwrap()))
    }

    fn draft(name: &str, price: f64) -> SubscriptionDraft {
        SubscriptionDraft::new(name, price, BillingFrequency::Monthly, "Streaming")
    }

    struct FailingHandle;

    impl BackupHandle for FailingHandle {
        fn query_permission(&self) -> PermissionState {
            PermissionState::Granted
        }

        fn request_permission(&mut self) -> PermissionState {
            PermissionState::Denied
        }

        fn write(&mut self, _contents: &str) -> io::Result<()> {
            Err(io::Error::new(io::ErrorKind::PermissionDenied, "read-only"))
        }

        fn describe(&self) -> String {
            "failing".into()
        }
    }

    #[test]
    fn open_rolls_forward_and_persists() {
        let store = MemoryStore::new();
        let stale = vec![Subscription::with_id("1", draft("Netflix", 10.0).renewing("2024-01-01"))];
        storage::save_subscriptions(&store, &stale).unwrap();

        let tracker = Tracker::open(store, clock(2024, 2, 2)).unwrap();
        assert_eq!(
            tracker.subscriptions()[0].next_renewal.as_deref(),
            Some("2024-03-01")
        );
        let persisted = storage::load_subscriptions(tracker.store()).unwrap();
        assert_eq!(persisted[0].next_renewal.as_deref(), Some("2024-03-01"));
    }

    #[test]
    fn mutations_are_persisted_in_order() {
        let mut tracker = Tracker::open(MemoryStore::new(), clock(2024, 1, 1)).unwrap();
        let a = tracker.add(draft("A", 1.0)).unwrap();
        let b = tracker.add(draft("B", 2.0)).unwrap();
        tracker.move_item(1, 0).unwrap();
        tracker.update(&a, draft("A2", 3.0)).unwrap();

        let names: Vec<_> = storage::load_subscriptions(tracker.store())
            .unwrap()
            .into_iter()
            .map(|sub| sub.name)
            .collect();
        assert_eq!(names, ["B", "A2"]);

        tracker.remove(&b).unwrap();
        assert_eq!(tracker.subscriptions().len(), 1);
        assert!(matches!(tracker.remove(&b), Err(TrackerError::NotFound(_))));
    }

    #[test]
    fn invalid_drafts_are_rejected() {
        let mut tracker = Tracker::open(MemoryStore::new(), clock(2024, 1, 1)).unwrap();
        assert!(tracker.add(draft(" ", 1.0)).is_err());
        assert!(tracker.add(draft("A", f64::NAN)).is_err());
        assert!(tracker.add(draft("A", 1.0).renewing("01/02/2024")).is_err());
        assert!(tracker.subscriptions().is_empty());
        assert!(tracker.store().load(SUBSCRIPTIONS_KEY).unwrap().is_none());
    }

    #[test]
    fn rejected_import_leaves_state_untouched() {
        let mut tracker = Tracker::open(MemoryStore::new(), clock(2024, 1, 1)).unwrap();
        tracker.add(draft("Keep", 5.0)).unwrap();

        assert!(matches!(
            tracker.import_json("{\"not\":\"an array\"}"),
            Err(TrackerError::ImportRejected(_))
        ));
        assert_eq!(tracker.subscriptions()[0].name, "Keep");
        assert_eq!(storage::load_subscriptions(tracker.store()).unwrap().len(), 1);
    }

    #[test]
    fn backup_failure_does_not_fail_mutation() {
        let mut tracker = Tracker::open(MemoryStore::new(), clock(2024, 1, 1)).unwrap();
        let outcome = tracker.connect_backup(Box::new(FailingHandle));
        assert!(matches!(outcome, BackupOutcome::Failed(_)));

        tracker.add(draft("Still saved", 1.0)).unwrap();
        assert_eq!(storage::load_subscriptions(tracker.store()).unwrap().len(), 1);
        assert!(tracker.backup().last_error().is_some());
        assert!(matches!(
            tracker.last_backup_outcome(),
            Some(BackupOutcome::Failed(_))
        ));
    }

    #[test]
    fn reports_follow_collection() {
        let mut tracker = Tracker::open(MemoryStore::new(), clock(2024, 1, 1)).unwrap();
        tracker.add(draft("Netflix", 10.0)).unwrap();
        tracker
            .add(SubscriptionDraft::new("Domain", 24.0, BillingFrequency::Yearly, "web"))
            .unwrap();

        assert!((tracker.total_monthly() - 12.0).abs() < 1e-9);
        assert_eq!(tracker.by_category()[0].category, "STREAMING");
        assert_eq!(tracker.top(1)[0].name, "Netflix");
    }
}
