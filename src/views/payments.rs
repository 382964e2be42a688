use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;

use crate::error::ClientResult;
use crate::models::{Payment, PaymentStats, PaymentStatus};
use crate::services::ApiClient;

/// Solver payments screen: payment history and the server's earning totals
#[derive(Debug, Clone, Serialize)]
pub struct SolverPaymentsView {
    pub payments: Vec<Payment>,
    pub stats: PaymentStats,
}

impl SolverPaymentsView {
    pub async fn load(client: &ApiClient) -> ClientResult<Self> {
        let api = client.payments();
        let (payments, stats) = futures::try_join!(api.my_payments(), api.stats())?;
        Ok(Self { payments, stats })
    }
}

/// Totals over a buyer's payment requests for one project
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct PaymentRequestSummary {
    pub count: usize,
    pub pending: usize,
    pub pending_amount: Decimal,
    pub released_amount: Decimal,
}

impl PaymentRequestSummary {
    pub fn from_payments(payments: &[Payment]) -> Self {
        payments.iter().fold(Self::default(), |mut acc, payment| {
            acc.count += 1;
            match payment.status {
                PaymentStatus::Pending => {
                    acc.pending += 1;
                    acc.pending_amount += payment.amount;
                }
                PaymentStatus::Released | PaymentStatus::Paid => {
                    acc.released_amount += payment.amount;
                }
            }
            acc
        })
    }
}

/// Amount formatted the way the screens show money
pub fn format_amount(amount: Decimal) -> String {
    format!(
        "${:.2}",
        amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
    )
}
