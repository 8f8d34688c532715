use actix_web::{web, HttpRequest, HttpResponse, Responder};
use serde_json::json;
use tracing::instrument;

use crate::{
    entities::payment::{
        InitiateCheckoutRequest, PaymentListQuery, ReconcileStatus, VerifyPaymentRequest,
    },
    errors::AppError,
    use_cases::extractors::{AdminClaims, AuthClaims},
    AppState,
};

pub const SIGNATURE_HEADER: &str = "x-paystack-signature";
const RETRY_PROMPT: &str = "Payment was not completed. Please try again.";

#[instrument(skip(state, claims, data))]
pub async fn initiate_checkout(
    state: web::Data<AppState>,
    claims: AuthClaims,
    data: web::Json<InitiateCheckoutRequest>,
) -> Result<impl Responder, AppError> {
    let actor = claims.actor()?;
    let checkout = state
        .payment_handler
        .initiate_checkout(&actor, &claims.0.email, &data.album_id)
        .await?;
    Ok(HttpResponse::Ok().json(checkout))
}

/// 200 when paid, 402 when the gateway declined, 202 while still processing.
#[instrument(skip(state, claims, data))]
pub async fn verify_payment(
    state: web::Data<AppState>,
    claims: AuthClaims,
    data: web::Json<VerifyPaymentRequest>,
) -> Result<HttpResponse, AppError> {
    let actor = claims.actor()?;
    let outcome = state
        .payment_handler
        .verify_payment(&actor, &data.reference)
        .await?;

    let status = outcome.status;
    let response = match status {
        ReconcileStatus::Success => HttpResponse::Ok().json(outcome),
        ReconcileStatus::Pending => HttpResponse::Accepted().json(outcome),
        ReconcileStatus::Failed => HttpResponse::PaymentRequired().json(json!({
            "error": "Payment failed",
            "details": outcome.message.as_deref().unwrap_or(RETRY_PROMPT),
            "reference": outcome.reference,
        })),
    };
    Ok(response)
}

/// Acknowledged only after the outcome is persisted; any error makes the
/// gateway redeliver.
#[instrument(skip(state, req, body))]
pub async fn payment_webhook(
    state: web::Data<AppState>,
    req: HttpRequest,
    body: web::Bytes,
) -> Result<impl Responder, AppError> {
    let signature = req
        .headers()
        .get(SIGNATURE_HEADER)
        .and_then(|value| value.to_str().ok());

    state.payment_handler.handle_webhook(&body, signature).await?;

    Ok(HttpResponse::Ok().json(json!({ "received": true })))
}

#[instrument(skip(state, claims))]
pub async fn list_my_payments(
    state: web::Data<AppState>,
    claims: AuthClaims,
) -> Result<impl Responder, AppError> {
    let actor = claims.actor()?;
    let payments = state.payment_handler.list_mine(&actor).await?;
    Ok(HttpResponse::Ok().json(payments))
}

#[instrument(skip(_claims, state, query))]
pub async fn list_all_payments(
    _claims: AdminClaims,
    state: web::Data<AppState>,
    query: web::Query<PaymentListQuery>,
) -> Result<impl Responder, AppError> {
    let payments = state.payment_handler.list_all(query.status).await?;
    Ok(HttpResponse::Ok().json(payments))
}
