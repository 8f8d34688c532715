use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "TEXT", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    Pending,
    Success,
    Failed,
}

impl PaymentStatus {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, PaymentStatus::Pending)
    }
}

/// One row of the payment ledger. Never deleted.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Payment {
    pub id: Uuid,
    pub user_id: Uuid,
    /// Cleared when the album is deleted; the ledger row survives.
    pub album_id: Option<Uuid>,
    pub reference: String,
    pub amount_minor: i64,
    pub currency: String,
    pub status: PaymentStatus,
    pub channel: Option<String>,
    pub gateway_response: Option<String>,
    pub paid_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct PaymentInsert {
    pub user_id: Uuid,
    pub album_id: Uuid,
    pub reference: String,
    pub amount_minor: i64,
    pub currency: String,
}

/// The terminal transition reconciliation wants to apply to a pending row.
#[derive(Debug, Clone, PartialEq)]
pub enum Settlement {
    Success {
        amount_minor: i64,
        channel: Option<String>,
        paid_at: DateTime<Utc>,
        gateway_response: Option<String>,
    },
    Failed {
        gateway_response: Option<String>,
    },
}

impl Settlement {
    pub fn status(&self) -> PaymentStatus {
        match self {
            Settlement::Success { .. } => PaymentStatus::Success,
            Settlement::Failed { .. } => PaymentStatus::Failed,
        }
    }
}

/// Opaque metadata the gateway echoes back verbatim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentMetadata {
    pub account_id: Uuid,
    pub album_id: Uuid,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum GatewayStatus {
    Success,
    Failed,
    /// Still in flight at the gateway (ongoing, queued, processing...).
    Pending,
}

impl GatewayStatus {
    pub fn from_gateway(raw: &str) -> Self {
        match raw.to_ascii_lowercase().as_str() {
            "success" => GatewayStatus::Success,
            "failed" | "abandoned" | "reversed" => GatewayStatus::Failed,
            _ => GatewayStatus::Pending,
        }
    }
}

/// Authoritative transaction state as reported by the gateway.
#[derive(Debug, Clone, PartialEq)]
pub struct GatewayTransaction {
    pub reference: String,
    pub status: GatewayStatus,
    pub amount_minor: i64,
    pub currency: Option<String>,
    pub channel: Option<String>,
    pub paid_at: Option<DateTime<Utc>>,
    pub gateway_response: Option<String>,
    pub metadata: Option<PaymentMetadata>,
}

/// A decoded gateway webhook.
#[derive(Debug, Clone, PartialEq)]
pub enum GatewayEvent {
    Charge(GatewayTransaction),
    /// Any other event type; acknowledged without side effects.
    Ignored(String),
}

#[derive(Debug, Clone)]
pub struct CheckoutRequest {
    pub email: String,
    pub amount_minor: i64,
    pub currency: String,
    pub metadata: PaymentMetadata,
    pub callback_url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckoutSession {
    pub reference: String,
    pub authorization_url: String,
    pub access_code: Option<String>,
}

// ───── Requests / Responses ──────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct InitiateCheckoutRequest {
    pub album_id: Uuid,
}

#[derive(Debug, Serialize)]
pub struct CheckoutResponse {
    pub reference: String,
    pub authorization_url: String,
    pub amount_minor: i64,
    pub currency: String,
}

#[derive(Debug, Deserialize)]
pub struct VerifyPaymentRequest {
    pub reference: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ReconcileStatus {
    Success,
    Failed,
    Pending,
}

impl From<PaymentStatus> for ReconcileStatus {
    fn from(status: PaymentStatus) -> Self {
        match status {
            PaymentStatus::Pending => ReconcileStatus::Pending,
            PaymentStatus::Success => ReconcileStatus::Success,
            PaymentStatus::Failed => ReconcileStatus::Failed,
        }
    }
}

/// Result of one reconciliation attempt.
#[derive(Debug, Clone, Serialize)]
pub struct ReconcileOutcome {
    pub reference: String,
    pub album_id: Option<Uuid>,
    pub status: ReconcileStatus,
    /// True when this call performed the transition, false on replay.
    pub applied: bool,
    pub message: Option<String>,
}

impl ReconcileOutcome {
    pub fn from_payment(payment: &Payment, applied: bool) -> Self {
        ReconcileOutcome {
            reference: payment.reference.clone(),
            album_id: payment.album_id,
            status: payment.status.into(),
            applied,
            message: payment.gateway_response.clone(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct PaymentListQuery {
    pub status: Option<PaymentStatus>,
}

/// What a webhook delivery amounted to.
#[derive(Debug, Clone)]
pub enum WebhookOutcome {
    Reconciled(ReconcileOutcome),
    Ignored(String),
}
