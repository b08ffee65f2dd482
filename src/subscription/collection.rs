//! Ordered collection maintenance. Order is user-significant, so every operation keeps
//! the relative position of untouched records.

use tracing::debug;

use super::{Subscription, SubscriptionDraft};
use crate::errors::{Result, TrackerError};

/// Provides helpers for editing an owned subscription sequence.
pub struct SubscriptionService;

impl SubscriptionService {
    /// Appends a new record with a fresh identity and returns that identity.
    pub fn add(list: &mut Vec<Subscription>, draft: SubscriptionDraft) -> String {
        let sub = Subscription::new(draft);
        let id = sub.id.clone();
        debug!(id = %id, name = %sub.name, "subscription added");
        list.push(sub);
        id
    }

    /// Replaces the editable fields of `id` in place.
    pub fn update(list: &mut [Subscription], id: &str, draft: SubscriptionDraft) -> Result<()> {
        let sub = list
            .iter_mut()
            .find(|sub| sub.id == id)
            .ok_or_else(|| TrackerError::NotFound(id.to_string()))?;
        sub.apply(draft);
        debug!(id = %id, "subscription updated");
        Ok(())
    }

    /// Removes `id`, returning the removed record.
    pub fn remove(list: &mut Vec<Subscription>, id: &str) -> Result<Subscription> {
        let index = Self::position(list, id).ok_or_else(|| TrackerError::NotFound(id.to_string()))?;
        debug!(id = %id, "subscription removed");
        Ok(list.remove(index))
    }

    pub fn position(list: &[Subscription], id: &str) -> Option<usize> {
        list.iter().position(|sub| sub.id == id)
    }

    /// Resolves a user reference: an exact id, or a unique id prefix.
    pub fn resolve<'a>(list: &'a [Subscription], reference: &str) -> Result<&'a Subscription> {
        if let Some(exact) = list.iter().find(|sub| sub.id == reference) {
            return Ok(exact);
        }
        let mut matches = list.iter().filter(|sub| sub.id.starts_with(reference));
        match (matches.next(), matches.next()) {
            (Some(only), None) if !reference.is_empty() => Ok(only),
            (Some(_), Some(_)) => Err(TrackerError::InvalidInput(format!(
                "`{reference}` matches more than one subscription"
            ))),
            _ => Err(TrackerError::NotFound(reference.to_string())),
        }
    }
}

/// Returns a new sequence with the item at `from` relocated to `to`.
pub fn move_item<T: Clone>(items: &[T], from: usize, to: usize) -> Result<Vec<T>> {
    if from >= items.len() || to >= items.len() {
        return Err(TrackerError::InvalidInput(format!(
            "cannot move position {from} to {to} in a list of {}",
            items.len()
        )));
    }
    let mut moved = items.to_vec();
    let item = moved.remove(from);
    moved.insert(to, item);
    Ok(moved)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::subscription::BillingFrequency;

    fn draft(name: &str) -> SubscriptionDraft {
        SubscriptionDraft::new(name, 10.0, BillingFrequency::Monthly, "Misc")
    }

    #[test]
    fn move_item_relocates_without_touching_input() {
        let items = vec!["a", "b", "c", "d"];
        assert_eq!(move_item(&items, 1, 2).unwrap(), vec!["a", "c", "b", "d"]);
        assert_eq!(move_item(&items, 3, 0).unwrap(), vec!["d", "a", "b", "c"]);
        assert_eq!(move_item(&items, 0, 3).unwrap(), vec!["b", "c", "d", "a"]);
        assert_eq!(items, vec!["a", "b", "c", "d"]);
        assert!(move_item(&items, 4, 0).is_err());
    }

    #[test]
    fn update_keeps_position_and_identity() {
        let mut list = Vec::new();
        let first = SubscriptionService::add(&mut list, draft("First"));
        let second = SubscriptionService::add(&mut list, draft("Second"));

        SubscriptionService::update(&mut list, &first, draft("Renamed")).unwrap();
        assert_eq!(list[0].id, first);
        assert_eq!(list[0].name, "Renamed");
        assert_eq!(list[1].id, second);
    }

    #[test]
    fn remove_and_update_report_missing_ids() {
        let mut list = Vec::new();
        SubscriptionService::add(&mut list, draft("Only"));
        assert!(matches!(
            SubscriptionService::remove(&mut list, "nope"),
            Err(TrackerError::NotFound(_))
        ));
        assert!(matches!(
            SubscriptionService::update(&mut list, "nope", draft("x")),
            Err(TrackerError::NotFound(_))
        ));
        assert_eq!(list.len(), 1);
    }

    #[test]
    fn resolve_accepts_unique_prefixes() {
        let list = vec![
            Subscription::with_id("abc123", draft("A")),
            Subscription::with_id("abd456", draft("B")),
        ];
        assert_eq!(SubscriptionService::resolve(&list, "abc").unwrap().name, "A");
        assert!(matches!(
            SubscriptionService::resolve(&list, "ab"),
            Err(TrackerError::InvalidInput(_))
        ));
        assert!(SubscriptionService::resolve(&list, "zzz").is_err());
    }
}
