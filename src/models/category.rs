//! Category domain models

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Category record
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Category {
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
}

/// Create / update category request (full replacement)
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CategoryRequest {
    #[serde(default, deserialize_with = "super::null_as_empty")]
    #[validate(length(min = 1, max = 255, message = "Category name is required"))]
    pub name: String,
    pub description: Option<String>,
}

/// Delete response
#[derive(Debug, Serialize)]
pub struct DeletedCategoryResponse {
    pub message: String,
    #[serde(rename = "deletedCategory")]
    pub deleted_category: Category,
}
