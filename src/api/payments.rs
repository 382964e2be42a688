use crate::error::ClientResult;
use crate::models::{Payment, PaymentStats, PayoutRequest, PayoutResponse};
use crate::services::ApiClient;

/// `/payments` endpoints
pub struct PaymentsApi<'a> {
    client: &'a ApiClient,
}

impl<'a> PaymentsApi<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    pub async fn my_payments(&self) -> ClientResult<Vec<Payment>> {
        self.client.get_json("/payments/my-payments").await
    }

    pub async fn stats(&self) -> ClientResult<PaymentStats> {
        self.client.get_json("/payments/stats").await
    }

    pub async fn project_payments(&self, project_id: i64) -> ClientResult<Vec<Payment>> {
        self.client
            .get_json(&format!("/payments/projects/{}/payments", project_id))
            .await
    }

    pub async fn payout(&self, request: &PayoutRequest) -> ClientResult<PayoutResponse> {
        self.client.post_json("/payments/payout", request).await
    }
}
