//! 图片上传中转服务
//!
//! 将缓冲的图片以签名请求转发到 Cloudinary，请求限定尺寸、自动质量与格式的版本

use crate::{
    config::MediaConfig,
    error::AppError,
    models::upload::{ImagePayload, UploadTarget, UploadedImage},
};
use reqwest::multipart::{Form, Part};
use secrecy::ExposeSecret;
use serde::Deserialize;
use sha2::{Digest, Sha256};
use std::time::Duration;

pub struct UploadService {
    client: reqwest::Client,
    config: MediaConfig,
    timeout: Duration,
}

/// Cloudinary 错误响应
#[derive(Debug, Deserialize)]
struct MediaHostError {
    error: MediaHostErrorDetail,
}

#[derive(Debug, Deserialize)]
struct MediaHostErrorDetail {
    message: String,
}

impl UploadService {
    pub fn from_config(config: &MediaConfig) -> Result<Self, AppError> {
        let client = reqwest::Client::builder()
            .build()
            .map_err(|e| AppError::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            config: config.clone(),
            timeout: Duration::from_secs(config.timeout_secs),
        })
    }

    fn upload_url(&self) -> String {
        format!(
            "{}/v1_1/{}/image/upload",
            self.config.base_url.trim_end_matches('/'),
            self.config.cloud_name
        )
    }

    /// 限定尺寸 + 自动质量 + 自动格式
    pub fn transformation(&self) -> String {
        format!(
            "c_limit,h_{},w_{}/q_auto/f_auto",
            self.config.max_height, self.config.max_width
        )
    }

    /// 上传图片；整个远程调用受超时约束
    pub async fn upload(
        &self,
        target: &UploadTarget,
        image: ImagePayload,
    ) -> Result<UploadedImage, AppError> {
        if !self.config.is_configured() {
            return Err(AppError::Config(
                "Media host credentials are not configured".to_string(),
            ));
        }

        let folder = target.folder();
        let public_id = target.public_id(chrono::Utc::now().timestamp_millis());
        let timestamp = chrono::Utc::now().timestamp().to_string();
        let transformation = self.transformation();

        let signature = sign_params(
            &[
                ("folder", folder.as_str()),
                ("public_id", public_id.as_str()),
                ("timestamp", timestamp.as_str()),
                ("transformation", transformation.as_str()),
            ],
            self.config.api_secret.expose_secret(),
        );

        tracing::info!(
            plant_code = %target.plant_code,
            folder = %folder,
            size = image.bytes.len(),
            "Uploading image to media host"
        );

        let file_part = Part::bytes(image.bytes)
            .file_name(image.file_name)
            .mime_str(&image.content_type)
            .map_err(|e| AppError::Upload(format!("Upload error: {}", e)))?;

        let form = Form::new()
            .part("file", file_part)
            .text("api_key", self.config.api_key.clone())
            .text("timestamp", timestamp)
            .text("folder", folder)
            .text("public_id", public_id)
            .text("transformation", transformation)
            .text("signature_algorithm", "sha256")
            .text("signature", signature);

        let request = async {
            let response = self
                .client
                .post(self.upload_url())
                .multipart(form)
                .send()
                .await
                .map_err(|e| AppError::Internal(format!("Media host request failed: {}", e)))?;

            let status = response.status();
            if !status.is_success() {
                let message = response
                    .json::<MediaHostError>()
                    .await
                    .map(|e| e.error.message)
                    .unwrap_or_else(|_| "unknown error".to_string());
                return Err(AppError::Internal(format!(
                    "Media host rejected upload ({}): {}",
                    status, message
                )));
            }

            response
                .json::<UploadedImage>()
                .await
                .map_err(|e| AppError::Internal(format!("Invalid media host response: {}", e)))
        };

        let uploaded = tokio::time::timeout(self.timeout, request)
            .await
            .map_err(|_| {
                AppError::Internal(format!(
                    "Media host request timed out after {}s",
                    self.timeout.as_secs()
                ))
            })??;

        tracing::info!(
            public_id = %uploaded.public_id,
            url = %uploaded.secure_url,
            "Image uploaded successfully"
        );

        Ok(uploaded)
    }
}

/// 按参数名排序拼接后附加密钥，计算 SHA-256 签名
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

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::Secret;

    fn media_config() -> MediaConfig {
        MediaConfig {
            cloud_name: "demo".to_string(),
            api_key: "1234567890".to_string(),
            api_secret: Secret::new("abcd".to_string()),
            base_url: "https://api.cloudinary.com/".to_string(),
            max_upload_bytes: 10 * 1024 * 1024,
            timeout_secs: 30,
            max_width: 800,
            max_height: 800,
        }
    }

    #[test]
    fn test_sign_params_sorted_and_deterministic() {
        let a = sign_params(&[("timestamp", "1315060510"), ("public_id", "sample")], "abcd");
        let b = sign_params(&[("public_id", "sample"), ("timestamp", "1315060510")], "abcd");
        assert_eq!(a, b);
        assert_eq!(a.len(), 64);

        // public_id=sample&timestamp=1315060510abcd
        let mut hasher = Sha256::new();
        hasher.update(b"public_id=sample&timestamp=1315060510abcd");
        assert_eq!(a, hex::encode(hasher.finalize()));
    }

    #[test]
    fn test_sign_params_skips_empty_values() {
        let with_empty = sign_params(&[("folder", ""), ("timestamp", "1")], "s");
        let without = sign_params(&[("timestamp", "1")], "s");
        assert_eq!(with_empty, without);
    }

    #[test]
    fn test_transformation_and_url() {
        let service = UploadService::from_config(&media_config()).unwrap();
        assert_eq!(service.transformation(), "c_limit,h_800,w_800/q_auto/f_auto");
        assert_eq!(
            service.upload_url(),
            "https://api.cloudinary.com/v1_1/demo/image/upload"
        );
    }

    #[tokio::test]
    async fn test_unconfigured_service_fails_as_config_error() {
        let mut config = media_config();
        config.cloud_name = String::new();
        let service = UploadService::from_config(&config).unwrap();

        let result = service
            .upload(
                &UploadTarget::default(),
                ImagePayload {
                    file_name: "a.png".to_string(),
                    content_type: "image/png".to_string(),
                    bytes: vec![1, 2, 3],
                },
            )
            .await;

        assert!(matches!(result, Err(AppError::Config(_))));
    }
}
