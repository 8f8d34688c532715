mod test_utils;

use serde_json::json;
use sha2::{Digest, Sha256};
use test_utils::*;
use uuid::Uuid;
use wiremock::{
    matchers::{body_partial_json, body_string_contains, header, method, path},
    Mock, MockServer, ResponseTemplate,
};

use album_delivery::{
    entities::{
        image::UploadedFile,
        payment::{CheckoutRequest, GatewayEvent, GatewayStatus, PaymentMetadata},
    },
    errors::AppError,
    gateway::paystack::{parse_webhook, verify_hmac_sha512, PaystackClient},
    media::cloudinary::{sign_params, watermark_url, CloudinaryClient},
    repositories::{gateway::PaymentGateway, media::MediaStore},
};

fn checkout_request() -> CheckoutRequest {
    CheckoutRequest {
        email: "client@example.com".into(),
        amount_minor: 1_500_000,
        currency: CURRENCY.into(),
        metadata: PaymentMetadata {
            account_id: Uuid::new_v4(),
            album_id: Uuid::new_v4(),
        },
        callback_url: "http://localhost:3000/payment/callback".into(),
    }
}

async fn paystack(server: &MockServer) -> PaystackClient {
    let mut config = test_config();
    config.paystack_base_url = server.uri();
    PaystackClient::new(&config).unwrap()
}

async fn cloudinary(server: &MockServer) -> CloudinaryClient {
    let mut config = test_config();
    config.cloudinary_base_url = server.uri();
    CloudinaryClient::new(&config).unwrap()
}

// ───── Paystack ──────────────────────────────────────────────────────

#[actix_rt::test]
async fn initialize_sends_amount_and_metadata() {
    let server = MockServer::start().await;
    let request = checkout_request();

    Mock::given(method("POST"))
        .and(path("/transaction/initialize"))
        .and(header("authorization", format!("Bearer {}", WEBHOOK_SECRET).as_str()))
        .and(body_partial_json(json!({
            "amount": 1_500_000,
            "currency": CURRENCY,
            "metadata": {
                "accountId": request.metadata.account_id,
                "albumId": request.metadata.album_id,
            }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": true,
            "message": "Authorization URL created",
            "data": {
                "authorization_url": "https://checkout.paystack.com/abc123",
                "access_code": "abc123",
                "reference": "ref-abc123"
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let session = paystack(&server).await.initialize(&request).await.unwrap();

    assert_eq!(session.reference, "ref-abc123");
    assert_eq!(session.authorization_url, "https://checkout.paystack.com/abc123");
    assert_eq!(session.access_code.as_deref(), Some("abc123"));
}

#[actix_rt::test]
async fn rejected_initialize_is_an_upstream_failure() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/transaction/initialize"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "status": false,
            "message": "Invalid key"
        })))
        .mount(&server)
        .await;

    let result = paystack(&server).await.initialize(&checkout_request()).await;

    match result {
        Err(AppError::UpstreamFailure(message)) => assert_eq!(message, "Invalid key"),
        other => panic!("unexpected result: {:?}", other),
    }
}

#[actix_rt::test]
async fn verify_maps_transaction_report() {
    let server = MockServer::start().await;
    let account_id = Uuid::new_v4();
    let album_id = Uuid::new_v4();

    Mock::given(method("GET"))
        .and(path("/transaction/verify/ref-42"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": true,
            "message": "Verification successful",
            "data": {
                "reference": "ref-42",
                "status": "success",
                "amount": 1_000_000,
                "currency": "NGN",
                "channel": "bank_transfer",
                "paid_at": "2025-03-01T10:15:00Z",
                "gateway_response": "Approved",
                "metadata": { "accountId": account_id, "albumId": album_id }
            }
        })))
        .mount(&server)
        .await;

    let tx = paystack(&server).await.verify("ref-42").await.unwrap();

    assert_eq!(tx.status, GatewayStatus::Success);
    assert_eq!(tx.amount_minor, 1_000_000);
    assert_eq!(tx.channel.as_deref(), Some("bank_transfer"));
    assert!(tx.paid_at.is_some());
    assert_eq!(tx.metadata, Some(PaymentMetadata { account_id, album_id }));
}

#[actix_rt::test]
async fn abandoned_transaction_counts_as_failed() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/transaction/verify/ref-7"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": true,
            "message": "Verification successful",
            "data": {
                "reference": "ref-7",
                "status": "abandoned",
                "amount": 1_000_000,
                "currency": "NGN",
                "channel": null,
                "paid_at": null,
                "gateway_response": "The transaction was not completed",
                "metadata": ""
            }
        })))
        .mount(&server)
        .await;

    let tx = paystack(&server).await.verify("ref-7").await.unwrap();

    assert_eq!(tx.status, GatewayStatus::Failed);
    assert_eq!(tx.metadata, None);
}

#[test]
fn gateway_status_mapping() {
    assert_eq!(GatewayStatus::from_gateway("success"), GatewayStatus::Success);
    assert_eq!(GatewayStatus::from_gateway("failed"), GatewayStatus::Failed);
    assert_eq!(GatewayStatus::from_gateway("reversed"), GatewayStatus::Failed);
    assert_eq!(GatewayStatus::from_gateway("ongoing"), GatewayStatus::Pending);
}

#[test]
fn hmac_signature_checks() {
    let body = br#"{"event":"charge.success"}"#;
    let signature = sign(body);

    assert!(verify_hmac_sha512(WEBHOOK_SECRET, body, &signature));
    assert!(verify_hmac_sha512(WEBHOOK_SECRET, body, &signature.to_uppercase()));
    assert!(!verify_hmac_sha512(WEBHOOK_SECRET, br#"{"event":"charge.failed"}"#, &signature));
    assert!(!verify_hmac_sha512("another_secret", body, &signature));
    assert!(!verify_hmac_sha512(WEBHOOK_SECRET, body, "not-hex"));
    assert!(!verify_hmac_sha512(WEBHOOK_SECRET, body, ""));
}

#[test]
fn malformed_webhook_body_is_invalid_input() {
    assert!(matches!(parse_webhook(b"{oops"), Err(AppError::InvalidInput(_))));
    assert!(matches!(
        parse_webhook(br#"{"event":"charge.success","data":{"reference":"r"}}"#),
        Err(AppError::InvalidInput(_))
    ));
}

#[test]
fn charge_success_without_status_counts_as_success() {
    let meta = PaymentMetadata {
        account_id: Uuid::new_v4(),
        album_id: Uuid::new_v4(),
    };

    match parse_webhook(&bare_charge_webhook("ref-9", 1_000_000, meta)) {
        Ok(GatewayEvent::Charge(tx)) => {
            assert_eq!(tx.status, GatewayStatus::Success);
            assert_eq!(tx.reference, "ref-9");
            assert_eq!(tx.amount_minor, 1_000_000);
            assert_eq!(tx.currency, None);
            assert_eq!(tx.metadata, Some(meta));
        }
        other => panic!("unexpected event: {:?}", other),
    }
}

#[test]
fn explicit_webhook_status_is_respected() {
    let body = webhook_body("charge.success", "ref-10", "reversed", 1_000_000, json!({}));

    match parse_webhook(&body) {
        Ok(GatewayEvent::Charge(tx)) => assert_eq!(tx.status, GatewayStatus::Failed),
        other => panic!("unexpected event: {:?}", other),
    }
}

// ───── Cloudinary ────────────────────────────────────────────────────

#[test]
fn signature_sorts_params_and_skips_empty_values() {
    let secret = "cloudinary_test_secret";
    let mut hasher = Sha256::new();
    hasher.update(b"folder=albums/1&timestamp=1700000000");
    hasher.update(secret.as_bytes());
    let expected = hex::encode(hasher.finalize());

    let signed = sign_params(&[("timestamp", "1700000000"), ("folder", "albums/1"), ("tags", "")], secret);

    assert_eq!(signed, expected);
}

#[test]
fn watermark_overlay_is_inserted_after_upload_segment() {
    let url = "https://res.cloudinary.com/demo/image/upload/v1/albums/a.jpg";

    assert_eq!(
        watermark_url(url, "MY STUDIO"),
        "https://res.cloudinary.com/demo/image/upload/l_text:Arial_90:MY%20STUDIO,co_white,o_50,g_center/v1/albums/a.jpg"
    );
    assert_eq!(watermark_url("https://cdn.example.com/a.jpg", "X"), "https://cdn.example.com/a.jpg");
}

#[actix_rt::test]
async fn upload_returns_original_and_preview_urls() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1_1/demo/image/upload"))
        .and(body_string_contains("signature_algorithm"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "public_id": "albums/1/a",
            "secure_url": "https://res.cloudinary.com/demo/image/upload/v1/albums/1/a.jpg"
        })))
        .expect(1)
        .mount(&server)
        .await;

    // ASCII content keeps the multipart body valid UTF-8 for the body matcher
    let file = UploadedFile {
        file_name: "a.jpg".into(),
        bytes: b"jpeg-bytes".to_vec(),
    };
    let stored = cloudinary(&server).await.upload("albums/1", &file).await.unwrap();

    assert_eq!(stored.public_id, "albums/1/a");
    assert_eq!(stored.url, "https://res.cloudinary.com/demo/image/upload/v1/albums/1/a.jpg");
    assert!(stored.watermarked_url.contains("/upload/l_text:Arial_90:PREVIEW,co_white,o_50,g_center/v1/"));
}

#[actix_rt::test]
async fn upload_error_message_is_surfaced() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1_1/demo/image/upload"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "error": { "message": "Invalid Signature" }
        })))
        .mount(&server)
        .await;

    let file = UploadedFile {
        file_name: "a.jpg".into(),
        bytes: vec![0xFF],
    };
    let result = cloudinary(&server).await.upload("albums/1", &file).await;

    match result {
        Err(AppError::UpstreamFailure(message)) => assert_eq!(message, "Invalid Signature"),
        other => panic!("unexpected result: {:?}", other),
    }
}

#[actix_rt::test]
async fn destroy_tolerates_already_missing_assets() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1_1/demo/image/destroy"))
        .and(body_string_contains("public_id=albums%2F1%2Fgone"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "result": "not found" })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/v1_1/demo/image/destroy"))
        .and(body_string_contains("public_id=albums%2F1%2Flocked"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "result": "error" })))
        .mount(&server)
        .await;

    let client = cloudinary(&server).await;

    assert!(client.destroy("albums/1/gone").await.is_ok());
    assert!(matches!(
        client.destroy("albums/1/locked").await,
        Err(AppError::UpstreamFailure(_))
    ));
}
