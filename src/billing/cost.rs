use crate::subscription::BillingFrequency;

const WEEKS_PER_YEAR: f64 = 52.0;
const MONTHS_PER_YEAR: f64 = 12.0;

/// Normalizes a price to its average monthly contribution.
///
/// Weekly prices use the 52/12 weeks-per-month average rather than calendar weeks.
/// Negative or non-finite prices and unrecognized frequencies contribute `0.0`.
pub fn monthly_cost(price: f64, frequency: &BillingFrequency) -> f64 {
    if !price.is_finite() || price <= 0.0 {
        return 0.0;
    }
    match frequency {
        BillingFrequency::Monthly => price,
        BillingFrequency::Yearly => price / MONTHS_PER_YEAR,
        BillingFrequency::Weekly => price * WEEKS_PER_YEAR / MONTHS_PER_YEAR,
        BillingFrequency::Unrecognized(_) => 0.0,
    }
}
