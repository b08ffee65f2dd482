use std::collections::HashMap;

use serde::Serialize;

use super::monthly_cost;
use crate::subscription::Subscription;

pub const UNCATEGORIZED: &str = "UNCATEGORIZED";

/// Monthly spend of one category. Categories compare case-insensitively and are
/// reported uppercased.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryTotal {
    pub category: String,
    pub monthly: f64,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedSubscription {
    pub id: String,
    pub name: String,
    pub monthly: f64,
}

/// Sum of every record's monthly-equivalent cost.
pub fn total_monthly(subscriptions: &[Subscription]) -> f64 {
    subscriptions.iter().map(Subscription::monthly_cost).sum()
}

pub fn category_key(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        UNCATEGORIZED.to_string()
    } else {
        trimmed.to_uppercase()
    }
}

/// Groups monthly spend by category, largest first. Equal totals keep the order in which
/// their categories first appear.
pub fn by_category(subscriptions: &[Subscription]) -> Vec<CategoryTotal> {
    let mut totals: Vec<CategoryTotal> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for sub in subscriptions {
        let key = category_key(&sub.category);
        let slot = *index.entry(key.clone()).or_insert_with(|| {
            totals.push(CategoryTotal {
                category: key,
                monthly: 0.0,
                count: 0,
            });
            totals.len() - 1
        });
        totals[slot].monthly += sub.monthly_cost();
        totals[slot].count += 1;
    }

    totals.sort_by(|a, b| b.monthly.total_cmp(&a.monthly));
    totals
}

/// The `limit` most expensive subscriptions by monthly cost. The sort is stable, so ties
/// keep their relative order in the input.
pub fn top_by_monthly_cost(subscriptions: &[Subscription], limit: usize) -> Vec<RankedSubscription> {
    let mut ranked: Vec<RankedSubscription> = subscriptions
        .iter()
        .map(|sub| RankedSubscription {
            id: sub.id.clone(),
            name: sub.name.clone(),
            monthly: monthly_cost(sub.price, &sub.frequency),
        })
        .collect();
    ranked.sort_by(|a, b| b.monthly.total_cmp(&a.monthly));
    ranked.truncate(limit);
    ranked
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::subscription::{BillingFrequency, SubscriptionDraft};

    fn sub(id: &str, price: f64, frequency: BillingFrequency, category: &str) -> Subscription {
        Subscription::with_id(id, SubscriptionDraft::new(id, price, frequency, category))
    }

    #[test]
    fn total_mixes_frequencies() {
        let subs = vec![
            sub("netflix", 10.0, BillingFrequency::Monthly, "Streaming"),
            sub("prime", 120.0, BillingFrequency::Yearly, "Streaming"),
        ];
        assert_eq!(total_monthly(&subs), 20.0);
        assert_eq!(total_monthly(&[]), 0.0);
    }

    #[test]
    fn categories_merge_case_insensitively() {
        let subs = vec![
            sub("a", 5.0, BillingFrequency::Monthly, "music"),
            sub("b", 20.0, BillingFrequency::Monthly, "Video"),
            sub("c", 7.0, BillingFrequency::Monthly, "Music "),
            sub("d", 1.0, BillingFrequency::Monthly, "  "),
        ];
        let totals = by_category(&subs);
        assert_eq!(
            totals
                .iter()
                .map(|t| (t.category.as_str(), t.monthly, t.count))
                .collect::<Vec<_>>(),
            vec![("VIDEO", 20.0, 1), ("MUSIC", 12.0, 2), (UNCATEGORIZED, 1.0, 1)]
        );
    }

    #[test]
    fn top_ranking_is_stable_for_ties() {
        let subs = vec![
            sub("first", 10.0, BillingFrequency::Monthly, ""),
            sub("big", 240.0, BillingFrequency::Yearly, ""),
            sub("second", 10.0, BillingFrequency::Monthly, ""),
            sub("bad", -3.0, BillingFrequency::Monthly, ""),
        ];
        let top = top_by_monthly_cost(&subs, 3);
        let ids: Vec<_> = top.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["big", "first", "second"]);
        assert!(top_by_monthly_cost(&subs, 0).is_empty());
    }
}
