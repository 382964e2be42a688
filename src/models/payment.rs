use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use time::PrimitiveDateTime;

use super::timestamp::naive_datetime;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    Pending,
    Released,
    Paid,
}

impl PaymentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Released => "released",
            Self::Paid => "paid",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Payment {
    pub id: i64,
    pub project_id: i64,
    pub solver_id: i64,
    pub amount: Decimal,
    pub status: PaymentStatus,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default = "default_payment_method")]
    pub payment_method: String,
    #[serde(with = "naive_datetime")]
    pub created_at: PrimitiveDateTime,
    #[serde(default, with = "naive_datetime::option")]
    pub released_at: Option<PrimitiveDateTime>,
    #[serde(default, with = "naive_datetime::option")]
    pub paid_at: Option<PrimitiveDateTime>,
}

fn default_payment_method() -> String {
    "stripe".to_string()
}

/// Response to completion requests and payment approvals
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentActionResponse {
    pub message: String,
    pub payment_id: i64,
    pub amount: Decimal,
    pub status: PaymentStatus,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentRejection {
    pub message: String,
    #[serde(default)]
    pub reason: Option<String>,
}

/// Solver earnings summary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentStats {
    pub total_earned: Decimal,
    pub paid_amount: Decimal,
    pub pending_amount: Decimal,
    pub payment_count: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct PayoutRequest {
    pub payment_id: i64,
    pub stripe_account_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PayoutResponse {
    pub payout_id: String,
    pub status: String,
    pub amount: Decimal,
    #[serde(with = "naive_datetime")]
    pub arrival_date: PrimitiveDateTime,
}
