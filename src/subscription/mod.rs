//! Subscription records, billing frequencies and collection maintenance.

pub mod collection;
pub mod frequency;
pub mod record;

pub use collection::{move_item, SubscriptionService};
pub use frequency::BillingFrequency;
pub use record::{Subscription, SubscriptionDraft};
