use super::api_client::ApiClient;
use crate::config::ServiceSettings;
use crate::error::ApiError;
use crate::models::{
    Commission, CommissionUpdate, CreatePayoutRequest, OrderCompleteEvent, Page,
    PaymentSuccessEvent, Payout, PayoutQuery, PayoutStats, PendingOrder, VendorPayoutRequest,
    WebhookAck,
};
use crate::session::SessionStore;
use crate::utils::IdempotencyKey;
use std::sync::Arc;
use uuid::Uuid;

/// Client for the payout orchestrator. Every payout mutation carries an
/// `Idempotency-Key`.
pub struct PayoutClient {
    api: ApiClient,
}

impl PayoutClient {
    pub fn new(settings: ServiceSettings, session: Arc<SessionStore>) -> Self {
        Self {
            api: ApiClient::new("payout", settings, session),
        }
    }

    pub fn base_url(&self) -> &str {
        self.api.base_url()
    }

    pub async fn commission(&self, merchant_id: Uuid) -> Result<Commission, ApiError> {
        self.api
            .get(&format!("/merchants/{}/commission", merchant_id), &[])
            .await
    }

    /// Some deployments answer with an empty body; `None` then.
    pub async fn update_commission(
        &self,
        merchant_id: Uuid,
        update: &CommissionUpdate,
    ) -> Result<Option<Commission>, ApiError> {
        self.api
            .put(&format!("/merchants/{}/commission", merchant_id), update)
            .await
    }

    pub async fn payouts(&self, query: &PayoutQuery) -> Result<Page<Payout>, ApiError> {
        self.api.get("/payouts", &query.to_query()).await
    }

    /// Orders whose payment succeeded but whose escrow split has not run yet.
    pub async fn pending_orders(
        &self,
        merchant_id: Uuid,
        vendor_id: Uuid,
    ) -> Result<Vec<PendingOrder>, ApiError> {
        self.api
            .get(
                "/payouts/pending-orders",
                &[
                    ("merchantId", merchant_id.to_string()),
                    ("vendorId", vendor_id.to_string()),
                ],
            )
            .await
    }

    /// Payout on behalf of a vendor (admin).
    pub async fn create_payout(
        &self,
        request: &CreatePayoutRequest,
        key: &IdempotencyKey,
    ) -> Result<Payout, ApiError> {
        self.api.post("/payouts", request, Some(key)).await
    }

    pub async fn request_payout(
        &self,
        request: &VendorPayoutRequest,
        key: &IdempotencyKey,
    ) -> Result<Payout, ApiError> {
        self.api.post("/payouts/request", request, Some(key)).await
    }

    pub async fn confirm_payout(
        &self,
        payout_id: Uuid,
        key: &IdempotencyKey,
    ) -> Result<Payout, ApiError> {
        self.api
            .post_empty(&format!("/payouts/{}/confirm", payout_id), Some(key))
            .await
    }

    pub async fn reverse_payout(
        &self,
        payout_id: Uuid,
        key: &IdempotencyKey,
    ) -> Result<Payout, ApiError> {
        self.api
            .post_empty(&format!("/payouts/{}/reverse", payout_id), Some(key))
            .await
    }

    /// Idempotent by order id on the backend; the client does not dedupe.
    pub async fn payment_success(
        &self,
        event: &PaymentSuccessEvent,
    ) -> Result<WebhookAck, ApiError> {
        self.api
            .post("/mock/webhooks/payment-success", event, None)
            .await
    }

    pub async fn order_complete(
        &self,
        event: &OrderCompleteEvent,
    ) -> Result<WebhookAck, ApiError> {
        self.api
            .post("/mock/webhooks/order-complete", event, None)
            .await
    }

    pub async fn stats(&self) -> Result<PayoutStats, ApiError> {
        self.api.get("/payouts/stats", &[]).await
    }
}
