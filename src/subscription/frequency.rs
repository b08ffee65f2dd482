use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::errors::TrackerError;

/// How often a subscription bills.
///
/// Values outside the three known cadences are preserved verbatim as `Unrecognized` so a
/// stored collection round-trips, but they contribute nothing to cost totals, are never
/// advanced and get no recurrence rule on export.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum BillingFrequency {
    Weekly,
    Monthly,
    Yearly,
    Unrecognized(String),
}

impl BillingFrequency {
    pub fn as_str(&self) -> &str {
        match self {
            BillingFrequency::Weekly => "weekly",
            BillingFrequency::Monthly => "monthly",
            BillingFrequency::Yearly => "yearly",
            BillingFrequency::Unrecognized(raw) => raw,
        }
    }

    pub fn is_recognized(&self) -> bool {
        !matches!(self, BillingFrequency::Unrecognized(_))
    }

    pub fn label(&self) -> &str {
        match self {
            BillingFrequency::Weekly => "Weekly",
            BillingFrequency::Monthly => "Monthly",
            BillingFrequency::Yearly => "Yearly",
            BillingFrequency::Unrecognized(raw) => raw,
        }
    }
}

impl From<String> for BillingFrequency {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "weekly" => BillingFrequency::Weekly,
            "monthly" => BillingFrequency::Monthly,
            "yearly" => BillingFrequency::Yearly,
            _ => BillingFrequency::Unrecognized(raw),
        }
    }
}

impl From<BillingFrequency> for String {
    fn from(frequency: BillingFrequency) -> Self {
        match frequency {
            BillingFrequency::Unrecognized(raw) => raw,
            known => known.as_str().to_string(),
        }
    }
}

/// Strict parsing for user input: only the three cadences are accepted, case-insensitively.
impl FromStr for BillingFrequency {
    type Err = TrackerError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        match BillingFrequency::from(input.trim().to_ascii_lowercase()) {
            BillingFrequency::Unrecognized(_) => Err(TrackerError::InvalidInput(format!(
                "unknown frequency `{input}` (use weekly, monthly or yearly)"
            ))),
            known => Ok(known),
        }
    }
}

impl fmt::Display for BillingFrequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serde_keeps_unknown_values() {
        let parsed: Vec<BillingFrequency> =
            serde_json::from_str(r#"["weekly","monthly","yearly","quarterly"]"#).unwrap();
        assert_eq!(
            parsed,
            vec![
                BillingFrequency::Weekly,
                BillingFrequency::Monthly,
                BillingFrequency::Yearly,
                BillingFrequency::Unrecognized("quarterly".into()),
            ]
        );
        assert_eq!(
            serde_json::to_string(&parsed).unwrap(),
            r#"["weekly","monthly","yearly","quarterly"]"#
        );
    }

    #[test]
    fn from_str_is_strict_but_case_insensitive() {
        assert_eq!(
            "Monthly".parse::<BillingFrequency>().unwrap(),
            BillingFrequency::Monthly
        );
        assert!("fortnightly".parse::<BillingFrequency>().is_err());
    }
}
