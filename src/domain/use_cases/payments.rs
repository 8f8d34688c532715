use chrono::Utc;
use uuid::Uuid;

use crate::{
    domain::access::{authorize, Actor, AlbumResource},
    entities::payment::{
        CheckoutRequest, CheckoutResponse, GatewayEvent, GatewayStatus, GatewayTransaction,
        Payment, PaymentInsert, PaymentMetadata, PaymentStatus, ReconcileOutcome, Settlement,
        WebhookOutcome,
    },
    errors::AppError,
    repositories::{album::AlbumRepository, gateway::PaymentGateway, payment::PaymentRepository},
};

pub const AMOUNT_MISMATCH: &str = "amount mismatch";
pub const CURRENCY_MISMATCH: &str = "currency mismatch";
const STILL_PROCESSING: &str = "Payment is still being processed";

/// Where a reconciliation request came from. Binding failures are reported
/// differently on each path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    ClientVerify,
    Webhook,
}

pub struct PaymentHandler<P, A, G>
where
    P: PaymentRepository,
    A: AlbumRepository,
    G: PaymentGateway,
{
    pub payment_repo: P,
    pub album_repo: A,
    pub gateway: G,
    pub currency: String,
    pub default_price_minor: i64,
    pub callback_url: String,
}

/// Album price when set, the configured default otherwise.
pub fn resolve_price(album_price_minor: i64, default_price_minor: i64) -> i64 {
    if album_price_minor > 0 {
        album_price_minor
    } else {
        default_price_minor
    }
}

/// The terminal state a gateway report moves a payment into, or `None` while
/// the gateway is still processing. Pure; used for both applying and replay checks.
pub fn settlement_for(payment: &Payment, tx: &GatewayTransaction) -> Option<Settlement> {
    match tx.status {
        GatewayStatus::Pending => None,
        GatewayStatus::Failed => Some(Settlement::Failed {
            gateway_response: tx
                .gateway_response
                .clone()
                .or_else(|| Some("Payment failed".to_string())),
        }),
        GatewayStatus::Success => {
            if tx.amount_minor < payment.amount_minor {
                return Some(Settlement::Failed {
                    gateway_response: Some(AMOUNT_MISMATCH.to_string()),
                });
            }
            if let Some(currency) = &tx.currency {
                if !currency.eq_ignore_ascii_case(&payment.currency) {
                    return Some(Settlement::Failed {
                        gateway_response: Some(CURRENCY_MISMATCH.to_string()),
                    });
                }
            }
            Some(Settlement::Success {
                amount_minor: tx.amount_minor,
                channel: tx.channel.clone(),
                paid_at: tx.paid_at.unwrap_or_else(Utc::now),
                gateway_response: tx.gateway_response.clone(),
            })
        }
    }
}

/// The gateway must echo back the account and album the payment was opened for.
/// Once the album is deleted only the account can be checked; the ledger row
/// still settles so the charge is on record.
fn metadata_matches(payment: &Payment, metadata: Option<&PaymentMetadata>) -> bool {
    match metadata {
        Some(meta) => {
            meta.account_id == payment.user_id
                && payment.album_id.is_none_or(|album_id| album_id == meta.album_id)
        }
        None => false,
    }
}

impl<P, A, G> PaymentHandler<P, A, G>
where
    P: PaymentRepository,
    A: AlbumRepository,
    G: PaymentGateway,
{
    pub fn new(
        payment_repo: P,
        album_repo: A,
        gateway: G,
        currency: String,
        default_price_minor: i64,
        callback_url: String,
    ) -> Self {
        PaymentHandler {
            payment_repo,
            album_repo,
            gateway,
            currency,
            default_price_minor,
            callback_url,
        }
    }

    /// Opens a gateway checkout for an album. Nothing is persisted unless the
    /// gateway hands back a reference.
    pub async fn initiate_checkout(&self, actor: &Actor, email: &str, album_id: &Uuid) -> Result<CheckoutResponse, AppError> {
        let album = self
            .album_repo
            .get_album(album_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Album not found".to_string()))?;

        authorize(Some(actor), &album, AlbumResource::Listing)?;

        if album.paid && album.is_member(&actor.id) {
            return Err(AppError::Conflict("You already have full access to this album".to_string()));
        }

        let amount_minor = resolve_price(album.price_minor, self.default_price_minor);
        let request = CheckoutRequest {
            email: email.to_string(),
            amount_minor,
            currency: self.currency.clone(),
            metadata: PaymentMetadata {
                account_id: actor.id,
                album_id: album.id,
            },
            callback_url: self.callback_url.clone(),
        };

        let session = self.gateway.initialize(&request).await.map_err(|e| {
            tracing::error!(%album_id, user_id = %actor.id, error = %e, "Checkout initialization failed");
            if e.is_retryable() {
                e
            } else {
                AppError::UpstreamFailure(e.to_string())
            }
        })?;

        let payment = self
            .payment_repo
            .create_pending(&PaymentInsert {
                user_id: actor.id,
                album_id: album.id,
                reference: session.reference.clone(),
                amount_minor,
                currency: self.currency.clone(),
            })
            .await?;

        tracing::info!(
            reference = %payment.reference,
            %album_id,
            user_id = %actor.id,
            amount_minor,
            "Checkout started"
        );

        Ok(CheckoutResponse {
            reference: payment.reference,
            authorization_url: session.authorization_url,
            amount_minor,
            currency: payment.currency,
        })
    }

    /// Client-triggered reconciliation after returning from checkout.
    pub async fn verify_payment(&self, actor: &Actor, reference: &str) -> Result<ReconcileOutcome, AppError> {
        let reference = reference.trim();
        if reference.is_empty() {
            return Err(AppError::InvalidInput("Payment reference is required".to_string()));
        }

        let payment = self.find_payment(reference).await?;

        if payment.user_id != actor.id {
            tracing::warn!(%reference, actor_id = %actor.id, "Payment verification by non-owner");
            return Err(AppError::ForbiddenAccess);
        }

        if payment.status.is_terminal() {
            return Ok(ReconcileOutcome::from_payment(&payment, false));
        }

        let tx = self.gateway.verify(reference).await?;

        if !metadata_matches(&payment, tx.metadata.as_ref()) {
            tracing::warn!(%reference, actor_id = %actor.id, "Gateway metadata does not match payment");
            return Err(AppError::ForbiddenAccess);
        }

        self.apply(&payment, &tx, Trigger::ClientVerify).await
    }

    /// Gateway-triggered reconciliation. The signature is checked before the
    /// body is even parsed.
    pub async fn handle_webhook(&self, payload: &[u8], signature: Option<&str>) -> Result<WebhookOutcome, AppError> {
        let signature = signature.filter(|s| !s.trim().is_empty()).ok_or_else(|| {
            tracing::warn!("Webhook without signature");
            AppError::SignatureMismatch
        })?;

        if !self.gateway.verify_signature(payload, signature) {
            tracing::warn!("Webhook signature mismatch");
            return Err(AppError::SignatureMismatch);
        }

        let tx = match self.gateway.parse_event(payload)? {
            GatewayEvent::Charge(tx) => tx,
            GatewayEvent::Ignored(kind) => {
                tracing::info!(event = %kind, "Ignoring webhook event");
                return Ok(WebhookOutcome::Ignored(kind));
            }
        };

        let payment = self.find_payment(&tx.reference).await?;

        if !metadata_matches(&payment, tx.metadata.as_ref()) {
            tracing::warn!(reference = %tx.reference, "Webhook metadata does not match payment");
            return Err(AppError::Conflict("Webhook metadata does not match the payment".to_string()));
        }

        if payment.status.is_terminal() {
            self.check_replay(&payment, &tx)?;
            return Ok(WebhookOutcome::Reconciled(ReconcileOutcome::from_payment(&payment, false)));
        }

        self.apply(&payment, &tx, Trigger::Webhook)
            .await
            .map(WebhookOutcome::Reconciled)
    }

    pub async fn list_mine(&self, actor: &Actor) -> Result<Vec<Payment>, AppError> {
        self.payment_repo.list_for_user(&actor.id).await
    }

    pub async fn list_all(&self, status: Option<PaymentStatus>) -> Result<Vec<Payment>, AppError> {
        self.payment_repo.list_all(status).await
    }

    async fn find_payment(&self, reference: &str) -> Result<Payment, AppError> {
        self.payment_repo
            .find_by_reference(reference)
            .await?
            .ok_or_else(|| AppError::NotFound("Payment not found".to_string()))
    }

    /// A redelivered report must agree with what was already recorded.
    fn check_replay(&self, payment: &Payment, tx: &GatewayTransaction) -> Result<(), AppError> {
        match settlement_for(payment, tx) {
            Some(settlement) if settlement.status() != payment.status => {
                tracing::warn!(
                    reference = %payment.reference,
                    recorded = ?payment.status,
                    reported = ?settlement.status(),
                    "Gateway report disagrees with recorded payment"
                );
                Err(AppError::Conflict(format!(
                    "Payment {} is already recorded as {:?}",
                    payment.reference, payment.status
                )))
            }
            _ => Ok(()),
        }
    }

    async fn apply(&self, payment: &Payment, tx: &GatewayTransaction, trigger: Trigger) -> Result<ReconcileOutcome, AppError> {
        let Some(settlement) = settlement_for(payment, tx) else {
            let mut outcome = ReconcileOutcome::from_payment(payment, false);
            outcome.message = Some(STILL_PROCESSING.to_string());
            return Ok(outcome);
        };

        match self.payment_repo.settle(&payment.reference, &settlement).await? {
            Some(settled) => {
                tracing::info!(
                    reference = %settled.reference,
                    status = ?settled.status,
                    album_id = ?settled.album_id,
                    user_id = %settled.user_id,
                    ?trigger,
                    "Payment reconciled"
                );
                Ok(ReconcileOutcome::from_payment(&settled, true))
            }
            None => {
                // another trigger settled it first; report what it recorded
                let current = self.find_payment(&payment.reference).await?;
                if trigger == Trigger::Webhook {
                    self.check_replay(&current, tx)?;
                }
                Ok(ReconcileOutcome::from_payment(&current, false))
            }
        }
    }
}
