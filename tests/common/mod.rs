#![allow(dead_code)]

use std::{path::PathBuf, sync::Mutex};

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use subtrack_core::{
    storage::JsonFileStore,
    time::FixedClock,
    utils::paths,
    BillingFrequency, Subscription, SubscriptionDraft, Tracker,
};
use tempfile::TempDir;

/// Holds TempDir guards so temporary folders live for the duration of the test run.
static TEST_DIRS: Lazy<Mutex<Vec<TempDir>>> = Lazy::new(|| Mutex::new(Vec::new()));

/// Creates a unique data directory that outlives the calling test.
pub fn temp_base() -> PathBuf {
    let temp = TempDir::new().expect("create temp dir");
    let base = temp.path().to_path_buf();
    TEST_DIRS.lock().expect("lock temp dir registry").push(temp);
    base
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid test date")
}

/// Tracker over a fresh JSON file store with the clock frozen at midnight of `today`.
pub fn open_tracker(base: &std::path::Path, today: NaiveDate) -> Tracker<JsonFileStore> {
    let store = JsonFileStore::new(paths::store_file_in(base));
    Tracker::open(store, Box::new(FixedClock::at_date(today))).expect("open tracker")
}

pub fn monthly(id: &str, name: &str, price: f64, renewal: &str) -> Subscription {
    Subscription::with_id(
        id,
        SubscriptionDraft::new(name, price, BillingFrequency::Monthly, "Streaming").renewing(renewal),
    )
}
