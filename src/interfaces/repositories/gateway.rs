use async_trait::async_trait;

use crate::{
    entities::payment::{CheckoutRequest, CheckoutSession, GatewayEvent, GatewayTransaction},
    errors::AppError,
};

/// Hosted-checkout payment provider.
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Opens a checkout session. Errors are `UpstreamFailure`.
    async fn initialize(&self, request: &CheckoutRequest) -> Result<CheckoutSession, AppError>;

    /// Fetches the authoritative state of a transaction.
    async fn verify(&self, reference: &str) -> Result<GatewayTransaction, AppError>;

    /// Checks a webhook signature over the raw request body.
    fn verify_signature(&self, payload: &[u8], signature: &str) -> bool;

    /// Decodes an already authenticated webhook body.
    fn parse_event(&self, payload: &[u8]) -> Result<GatewayEvent, AppError>;
}
