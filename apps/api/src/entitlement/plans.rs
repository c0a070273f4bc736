use chrono::{DateTime, Months, Utc};

use crate::errors::AppError;
use crate::models::{Subscription, SubscriptionType};

/// Promotional coupon granting a free year whatever plan is requested.
pub const FREE_YEAR_COUPON: &str = "RGNEW2026";

impl SubscriptionType {
    pub fn parse_plan(plan: &str) -> Result<Self, AppError> {
        match plan.trim().to_ascii_lowercase().as_str() {
            "monthly" => Ok(SubscriptionType::Monthly),
            "quarterly" => Ok(SubscriptionType::Quarterly),
            "yearly" => Ok(SubscriptionType::Yearly),
            _ => Err(AppError::InvalidPlan(plan.to_string())),
        }
    }

    pub fn duration(&self) -> Months {
        match self {
            SubscriptionType::Monthly => Months::new(1),
            SubscriptionType::Quarterly => Months::new(3),
            SubscriptionType::Yearly => Months::new(12),
        }
    }
}

/// Computes the subscription granted by a purchase.
///
/// The expiry is `now + duration`; an existing subscription is replaced,
/// not extended. A valid coupon overrides the plan entirely.
pub fn apply_subscription(
    plan: &str,
    coupon: Option<&str>,
    now: DateTime<Utc>,
) -> Result<Subscription, AppError> {
    let coupon = coupon.map(str::trim).filter(|c| !c.is_empty());

    let subscription_type = match coupon {
        Some(FREE_YEAR_COUPON) => SubscriptionType::Yearly,
        Some(_) => return Err(AppError::Validation("Invalid coupon code".to_string())),
        None => SubscriptionType::parse_plan(plan)?,
    };

    let expiry = now
        .checked_add_months(subscription_type.duration())
        .ok_or_else(|| AppError::Internal(anyhow::anyhow!("subscription expiry out of range")))?;

    Ok(Subscription {
        is_subscribed: true,
        subscription_type: Some(subscription_type),
        subscription_expiry: Some(expiry),
    })
}
