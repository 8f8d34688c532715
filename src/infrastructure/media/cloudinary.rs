use async_trait::async_trait;
use chrono::Utc;
use reqwest::{multipart, Client};
use serde::Deserialize;
use sha2::{Digest, Sha256};
use std::time::Duration;

use crate::{
    entities::image::{StoredMedia, UploadedFile},
    errors::AppError,
    repositories::media::MediaStore,
    settings::AppConfig,
};

const UPLOAD_TIMEOUT: Duration = Duration::from_secs(120);
const UPLOAD_SEGMENT: &str = "/upload/";

#[derive(Debug, Deserialize)]
struct UploadResponse {
    public_id: String,
    secure_url: String,
}

#[derive(Debug, Deserialize)]
struct DestroyResponse {
    result: String,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: ErrorMessage,
}

#[derive(Debug, Deserialize)]
struct ErrorMessage {
    message: String,
}

#[derive(Clone)]
pub struct CloudinaryClient {
    http: Client,
    base_url: String,
    cloud_name: String,
    api_key: String,
    api_secret: String,
    watermark_text: String,
}

impl CloudinaryClient {
    pub fn new(config: &AppConfig) -> Result<Self, reqwest::Error> {
        let http = Client::builder().timeout(UPLOAD_TIMEOUT).build()?;

        Ok(CloudinaryClient {
            http,
            base_url: config.cloudinary_base_url.trim_end_matches('/').to_string(),
            cloud_name: config.cloudinary_cloud_name.clone(),
            api_key: config.cloudinary_api_key.clone(),
            api_secret: config.cloudinary_api_secret.clone(),
            watermark_text: config.watermark_text.clone(),
        })
    }

    fn endpoint(&self, action: &str) -> String {
        format!("{}/v1_1/{}/image/{}", self.base_url, self.cloud_name, action)
    }

    fn sign(&self, params: &[(&str, &str)]) -> String {
        sign_params(params, &self.api_secret)
    }

    async fn upstream_error(response: reqwest::Response, action: &str) -> AppError {
        let status = response.status();
        let message = response
            .json::<ErrorBody>()
            .await
            .map(|body| body.error.message)
            .unwrap_or_else(|_| format!("media store returned {}", status));

        tracing::error!(%status, %message, "Media store {} failed", action);
        AppError::UpstreamFailure(message)
    }
}

/// Request signature: sorted `key=value` pairs joined by `&`, secret appended, SHA-256 hex.
pub fn sign_params(params: &[(&str, &str)], api_secret: &str) -> String {
    let mut sorted: Vec<_> = params.iter().filter(|(_, v)| !v.is_empty()).collect();
    sorted.sort_by(|a, b| a.0.cmp(b.0));

    let to_sign = sorted
        .iter()
        .map(|(k, v)| format!("{}={}", k, v))
        .collect::<Vec<_>>()
        .join("&");

    let mut hasher = Sha256::new();
    hasher.update(to_sign.as_bytes());
    hasher.update(api_secret.as_bytes());
    hex::encode(hasher.finalize())
}

/// Derives the preview rendition by inserting a text overlay after `/upload/`.
pub fn watermark_url(url: &str, text: &str) -> String {
    let overlay = format!(
        "l_text:Arial_90:{},co_white,o_50,g_center/",
        urlencoding::encode(text)
    );

    match url.find(UPLOAD_SEGMENT) {
        Some(idx) => {
            let split = idx + UPLOAD_SEGMENT.len();
            format!("{}{}{}", &url[..split], overlay, &url[split..])
        }
        None => url.to_string(),
    }
}

#[async_trait]
impl MediaStore for CloudinaryClient {
    async fn upload(&self, folder: &str, file: &UploadedFile) -> Result<StoredMedia, AppError> {
        let timestamp = Utc::now().timestamp().to_string();
        let signature = self.sign(&[("folder", folder), ("timestamp", &timestamp)]);

        let part = multipart::Part::bytes(file.bytes.clone()).file_name(file.file_name.clone());
        let form = multipart::Form::new()
            .part("file", part)
            .text("api_key", self.api_key.clone())
            .text("timestamp", timestamp)
            .text("folder", folder.to_string())
            .text("signature", signature)
            .text("signature_algorithm", "sha256");

        let response = self
            .http
            .post(self.endpoint("upload"))
            .multipart(form)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Self::upstream_error(response, "upload").await);
        }

        let uploaded: UploadResponse = response.json().await?;

        tracing::info!(public_id = %uploaded.public_id, "Image stored");

        Ok(StoredMedia {
            watermarked_url: watermark_url(&uploaded.secure_url, &self.watermark_text),
            url: uploaded.secure_url,
            public_id: uploaded.public_id,
        })
    }

    async fn destroy(&self, public_id: &str) -> Result<(), AppError> {
        let timestamp = Utc::now().timestamp().to_string();
        let signature = self.sign(&[("public_id", public_id), ("timestamp", &timestamp)]);

        let response = self
            .http
            .post(self.endpoint("destroy"))
            .form(&[
                ("public_id", public_id),
                ("api_key", self.api_key.as_str()),
                ("timestamp", timestamp.as_str()),
                ("signature", signature.as_str()),
                ("signature_algorithm", "sha256"),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Self::upstream_error(response, "destroy").await);
        }

        let body: DestroyResponse = response.json().await?;
        match body.result.as_str() {
            "ok" | "not found" => Ok(()),
            other => Err(AppError::UpstreamFailure(format!(
                "Media store refused to delete {}: {}",
                public_id, other
            ))),
        }
    }
}
