//! Image upload models

use serde::{Deserialize, Serialize};

/// Caller-supplied identifiers that place an upload on the media host
#[derive(Debug, Clone, Default)]
pub struct UploadTarget {
    pub plant_code: String,
    pub community_name: String,
    pub community_member_id: String,
    pub upload_folder: String,
}

impl UploadTarget {
    pub fn is_complete(&self) -> bool {
        [
            &self.plant_code,
            &self.community_name,
            &self.community_member_id,
            &self.upload_folder,
        ]
        .iter()
        .all(|v| !v.trim().is_empty())
    }

    /// Destination folder, e.g. `Mekar/00000001/APP_PLANT_PHOTO`
    pub fn folder(&self) -> String {
        format!(
            "{}/{}/{}",
            self.community_name, self.community_member_id, self.upload_folder
        )
    }

    /// File name within the folder, disambiguated by a millisecond timestamp
    pub fn public_id(&self, timestamp_millis: i64) -> String {
        format!("{}_{}", self.plant_code, timestamp_millis)
    }
}

/// Buffered image taken from the multipart body
#[derive(Debug, Clone)]
pub struct ImagePayload {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

/// Result returned by the media host
#[derive(Debug, Clone, Deserialize)]
pub struct UploadedImage {
    pub secure_url: String,
    pub public_id: String,
}

/// Upload response
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadResponse {
    pub image_url: String,
    pub public_id: String,
    pub message: String,
}
