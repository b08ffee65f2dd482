//! Cost normalization, aggregation and billing-date advancement.

pub mod advance;
pub mod aggregate;
pub mod cost;

pub use advance::{advance, next_billing_date, roll_forward, RolloverReport};
pub use aggregate::{
    by_category, category_key, top_by_monthly_cost, total_monthly, CategoryTotal,
    RankedSubscription, UNCATEGORIZED,
};
pub use cost::monthly_cost;
