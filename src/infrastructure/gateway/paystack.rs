use async_trait::async_trait;
use chrono::{DateTime, Utc};
use hmac::{Hmac, Mac};
use reqwest::Client;
use serde::{de::DeserializeOwned, Deserialize};
use serde_json::{json, Value};
use sha2::Sha512;
use std::time::Duration;

use crate::{
    entities::payment::{
        CheckoutRequest, CheckoutSession, GatewayEvent, GatewayStatus, GatewayTransaction,
        PaymentMetadata,
    },
    errors::AppError,
    repositories::gateway::PaymentGateway,
    settings::AppConfig,
};

type HmacSha512 = Hmac<Sha512>;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(20);
pub const CHARGE_SUCCESS: &str = "charge.success";

/// Paystack wraps every payload in the same envelope.
#[derive(Debug, Deserialize)]
struct Envelope<T> {
    status: bool,
    message: String,
    data: Option<T>,
}

#[derive(Debug, Deserialize)]
struct InitializeData {
    authorization_url: String,
    access_code: Option<String>,
    reference: String,
}

#[derive(Debug, Deserialize)]
pub struct TransactionData {
    pub reference: String,
    /// Absent from `charge.success` webhooks, where the event itself is the verdict.
    #[serde(default)]
    pub status: Option<String>,
    pub amount: i64,
    pub currency: Option<String>,
    pub channel: Option<String>,
    pub paid_at: Option<DateTime<Utc>>,
    pub gateway_response: Option<String>,
    #[serde(default)]
    pub metadata: Value,
}

impl From<TransactionData> for GatewayTransaction {
    fn from(data: TransactionData) -> Self {
        GatewayTransaction {
            status: data
                .status
                .as_deref()
                .map_or(GatewayStatus::Pending, GatewayStatus::from_gateway),
            metadata: parse_metadata(&data.metadata),
            reference: data.reference,
            amount_minor: data.amount,
            currency: data.currency,
            channel: data.channel,
            paid_at: data.paid_at,
            gateway_response: data.gateway_response,
        }
    }
}

#[derive(Debug, Deserialize)]
struct WebhookEnvelope {
    event: String,
    #[serde(default)]
    data: Value,
}

/// Metadata comes back as an object, a JSON string, or `0`/`""` when absent.
pub fn parse_metadata(raw: &Value) -> Option<PaymentMetadata> {
    match raw {
        Value::Object(_) => serde_json::from_value(raw.clone()).ok(),
        Value::String(s) => serde_json::from_str(s).ok(),
        _ => None,
    }
}

#[derive(Clone)]
pub struct PaystackClient {
    http: Client,
    base_url: String,
    secret_key: String,
}

impl PaystackClient {
    pub fn new(config: &AppConfig) -> Result<Self, reqwest::Error> {
        let http = Client::builder().timeout(REQUEST_TIMEOUT).build()?;

        Ok(PaystackClient {
            http,
            base_url: config.paystack_base_url.trim_end_matches('/').to_string(),
            secret_key: config.paystack_secret_key.clone(),
        })
    }

    async fn read_envelope<T: DeserializeOwned>(
        &self,
        response: reqwest::Response,
        action: &str,
    ) -> Result<T, AppError> {
        let status = response.status();
        let envelope: Envelope<T> = response.json().await.map_err(|e| {
            tracing::error!(%status, error = %e, "Unreadable gateway response to {}", action);
            AppError::UpstreamFailure(format!("Payment gateway returned an unreadable {} response", action))
        })?;

        if !status.is_success() || !envelope.status {
            tracing::error!(%status, message = %envelope.message, "Gateway rejected {}", action);
            return Err(AppError::UpstreamFailure(envelope.message));
        }

        envelope.data.ok_or_else(|| {
            AppError::UpstreamFailure(format!("Payment gateway returned no data for {}", action))
        })
    }
}

#[async_trait]
impl PaymentGateway for PaystackClient {
    async fn initialize(&self, request: &CheckoutRequest) -> Result<CheckoutSession, AppError> {
        let body = json!({
            "email": request.email,
            "amount": request.amount_minor,
            "currency": request.currency,
            "callback_url": request.callback_url,
            "metadata": request.metadata,
        });

        let response = self
            .http
            .post(format!("{}/transaction/initialize", self.base_url))
            .bearer_auth(&self.secret_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "Payment gateway unreachable");
                AppError::from(e)
            })?;

        let data: InitializeData = self.read_envelope(response, "initialize").await?;

        Ok(CheckoutSession {
            reference: data.reference,
            authorization_url: data.authorization_url,
            access_code: data.access_code,
        })
    }

    async fn verify(&self, reference: &str) -> Result<GatewayTransaction, AppError> {
        let response = self
            .http
            .get(format!(
                "{}/transaction/verify/{}",
                self.base_url,
                urlencoding::encode(reference)
            ))
            .bearer_auth(&self.secret_key)
            .send()
            .await
            .map_err(|e| {
                tracing::error!(error = %e, reference, "Payment gateway unreachable");
                AppError::from(e)
            })?;

        let data: TransactionData = self.read_envelope(response, "verify").await?;
        Ok(data.into())
    }

    fn verify_signature(&self, payload: &[u8], signature: &str) -> bool {
        verify_hmac_sha512(&self.secret_key, payload, signature)
    }

    fn parse_event(&self, payload: &[u8]) -> Result<GatewayEvent, AppError> {
        parse_webhook(payload)
    }
}

/// Constant-time check of a hex HMAC-SHA512 signature.
pub fn verify_hmac_sha512(secret: &str, payload: &[u8], signature: &str) -> bool {
    let Ok(expected) = hex::decode(signature.trim()) else {
        return false;
    };

    let Ok(mut mac) = HmacSha512::new_from_slice(secret.as_bytes()) else {
        return false;
    };
    mac.update(payload);
    mac.verify_slice(&expected).is_ok()
}

/// Decodes a webhook body. Only `charge.success` carries a transaction.
pub fn parse_webhook(payload: &[u8]) -> Result<GatewayEvent, AppError> {
    let envelope: WebhookEnvelope = serde_json::from_slice(payload)
        .map_err(|e| AppError::InvalidInput(format!("Malformed webhook payload: {}", e)))?;

    if envelope.event != CHARGE_SUCCESS {
        return Ok(GatewayEvent::Ignored(envelope.event));
    }

    let mut data: TransactionData = serde_json::from_value(envelope.data)
        .map_err(|e| AppError::InvalidInput(format!("Malformed charge data: {}", e)))?;
    data.status.get_or_insert_with(|| "success".to_string());

    Ok(GatewayEvent::Charge(data.into()))
}
