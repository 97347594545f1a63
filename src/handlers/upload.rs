//! 图片上传的 HTTP 处理器

use crate::{
    error::AppError,
    middleware::AppState,
    models::upload::{ImagePayload, UploadResponse, UploadTarget},
};
use axum::{
    extract::{multipart::MultipartError, Multipart, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use std::sync::Arc;

/// 文件字段名
const IMAGE_FIELD: &str = "image";

fn file_too_large(max_bytes: usize) -> AppError {
    AppError::Upload(format!(
        "File too large. Maximum size is {}MB.",
        max_bytes / (1024 * 1024)
    ))
}

fn unexpected_field() -> AppError {
    AppError::Upload("Upload error: Unexpected field".to_string())
}

fn multipart_error(e: MultipartError, max_bytes: usize) -> AppError {
    // 超出请求体上限时 axum 返回 413
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        file_too_large(max_bytes)
    } else {
        AppError::Upload(format!("Upload error: {}", e.body_text()))
    }
}

/// 上传植物图片
///
/// multipart 表单：`image` 文件字段，以及 plantCode、communityName、
/// communityMemberId、uploadFolder 四个文本字段
pub async fn upload_image(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Result<impl IntoResponse, AppError> {
    let max_bytes = state.config.media.max_upload_bytes;

    let mut image: Option<ImagePayload> = None;
    let mut target = UploadTarget::default();

    while let Some(mut field) = multipart
        .next_field()
        .await
        .map_err(|e| multipart_error(e, max_bytes))?
    {
        let name = field.name().unwrap_or_default().to_string();

        if name == IMAGE_FIELD {
            if image.is_some() {
                return Err(unexpected_field());
            }

            // 非图片类型在读取内容前直接拒绝
            let content_type = field.content_type().unwrap_or_default().to_string();
            if !content_type.starts_with("image/") {
                return Err(AppError::Upload("Only image files are allowed!".to_string()));
            }

            let file_name = field.file_name().unwrap_or("upload").to_string();
            let mut bytes = Vec::new();
            while let Some(chunk) = field
                .chunk()
                .await
                .map_err(|e| multipart_error(e, max_bytes))?
            {
                if bytes.len() + chunk.len() > max_bytes {
                    return Err(file_too_large(max_bytes));
                }
                bytes.extend_from_slice(&chunk);
            }

            image = Some(ImagePayload {
                file_name,
                content_type,
                bytes,
            });
            continue;
        }

        let slot = match name.as_str() {
            "plantCode" => &mut target.plant_code,
            "communityName" => &mut target.community_name,
            "communityMemberId" => &mut target.community_member_id,
            "uploadFolder" => &mut target.upload_folder,
            // 只接受 image 一个文件字段
            _ if field.file_name().is_some() => return Err(unexpected_field()),
            _ => continue,
        };
        *slot = field
            .text()
            .await
            .map_err(|e| multipart_error(e, max_bytes))?;
    }

    let image = image.ok_or_else(|| AppError::BadRequest("No image file provided.".to_string()))?;

    tracing::info!(
        plant_code = %target.plant_code,
        community_name = %target.community_name,
        member_id = %target.community_member_id,
        upload_folder = %target.upload_folder,
        "Received upload request"
    );

    if !target.is_complete() {
        return Err(AppError::BadRequest(
            "Missing required parameters: plantCode, communityName, communityMemberId, uploadFolder."
                .to_string(),
        ));
    }

    let uploaded = state.upload_service.upload(&target, image).await?;

    Ok(Json(UploadResponse {
        image_url: uploaded.secure_url,
        public_id: uploaded.public_id,
        message: "Image uploaded successfully.".to_string(),
    }))
}
