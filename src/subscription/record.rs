use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

use super::BillingFrequency;
use crate::dates;

/// A recurring charge as stored and exchanged (camelCase JSON field names).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subscription {
    pub id: String,
    pub name: String,
    /// A `null`, absent or non-numeric stored price reads as `0.0`.
    #[serde(default, deserialize_with = "lenient_price")]
    pub price: f64,
    pub frequency: BillingFrequency,
    pub category: String,
    /// Renewal anchor in `YYYY-MM-DD`; `None` means no active recurrence.
    #[serde(
        default,
        deserialize_with = "empty_as_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub next_renewal: Option<String>,
    /// Last date a renewal may fall on; `None` means the series never expires.
    #[serde(
        default,
        deserialize_with = "empty_as_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub expiration_date: Option<String>,
}

impl Subscription {
    /// Creates a record with a fresh UUID v4 identity.
    pub fn new(draft: SubscriptionDraft) -> Self {
        Self::with_id(Uuid::new_v4().to_string(), draft)
    }

    pub fn with_id(id: impl Into<String>, draft: SubscriptionDraft) -> Self {
        Self {
            id: id.into(),
            name: draft.name,
            price: draft.price,
            frequency: draft.frequency,
            category: draft.category,
            next_renewal: draft.next_renewal,
            expiration_date: draft.expiration_date,
        }
    }

    /// Overwrites every editable field, keeping the identity.
    pub fn apply(&mut self, draft: SubscriptionDraft) {
        let id = std::mem::take(&mut self.id);
        *self = Self::with_id(id, draft);
    }

    pub fn renewal_date(&self) -> Option<NaiveDate> {
        self.next_renewal.as_deref().and_then(dates::parse_date)
    }

    pub fn expiration(&self) -> Option<NaiveDate> {
        self.expiration_date.as_deref().and_then(dates::parse_date)
    }

    pub fn monthly_cost(&self) -> f64 {
        crate::billing::monthly_cost(self.price, &self.frequency)
    }
}

/// Every editable field of a subscription; used for creation and edits.
#[derive(Debug, Clone, PartialEq)]
pub struct SubscriptionDraft {
    pub name: String,
    pub price: f64,
    pub frequency: BillingFrequency,
    pub category: String,
    pub next_renewal: Option<String>,
    pub expiration_date: Option<String>,
}

impl SubscriptionDraft {
    pub fn new(
        name: impl Into<String>,
        price: f64,
        frequency: BillingFrequency,
        category: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            price,
            frequency,
            category: category.into(),
            next_renewal: None,
            expiration_date: None,
        }
    }

    pub fn renewing(mut self, date: impl Into<String>) -> Self {
        self.next_renewal = Some(date.into());
        self
    }

    pub fn expiring(mut self, date: impl Into<String>) -> Self {
        self.expiration_date = Some(date.into());
        self
    }
}

impl From<&Subscription> for SubscriptionDraft {
    fn from(sub: &Subscription) -> Self {
        Self {
            name: sub.name.clone(),
            price: sub.price,
            frequency: sub.frequency.clone(),
            category: sub.category.clone(),
            next_renewal: sub.next_renewal.clone(),
            expiration_date: sub.expiration_date.clone(),
        }
    }
}

/// The browser app clears a lapsed renewal by writing `""`; treat that as absent.
fn empty_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.filter(|raw| !raw.trim().is_empty()))
}

/// The browser app writes `null` for a NaN price and older payloads may carry strings.
fn lenient_price<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let price = match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::Number(number) => number.as_f64().unwrap_or(0.0),
        serde_json::Value::String(raw) => raw.trim().parse::<f64>().unwrap_or(0.0),
        _ => 0.0,
    };
    Ok(price)
}
