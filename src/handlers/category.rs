//! 分类管理的 HTTP 处理器

use crate::{
    error::AppError,
    extract::{AppJson, AppPath},
    middleware::AppState,
    models::category::*,
    repository::CategoryRepository,
};
use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use std::sync::Arc;
use validator::Validate;

const NOT_FOUND: &str = "Category not found";

/// 列出分类
pub async fn list_categories(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, AppError> {
    let repo = CategoryRepository::new(state.db.clone());
    let categories = repo.list().await?;

    Ok(Json(categories))
}

/// 获取分类详情
pub async fn get_category(
    State(state): State<Arc<AppState>>,
    AppPath(id): AppPath<i32>,
) -> Result<impl IntoResponse, AppError> {
    let repo = CategoryRepository::new(state.db.clone());
    let category = repo.get(id).await?.ok_or_else(|| AppError::not_found(NOT_FOUND))?;

    Ok(Json(category))
}

/// 创建分类
pub async fn create_category(
    State(state): State<Arc<AppState>>,
    AppJson(req): AppJson<CategoryRequest>,
) -> Result<impl IntoResponse, AppError> {
    req.validate()?;

    let repo = CategoryRepository::new(state.db.clone());
    let category = repo.create(&req).await?;

    tracing::info!(category_id = category.id, "Category created");

    Ok((StatusCode::CREATED, Json(category)))
}

/// 更新分类
pub async fn update_category(
    State(state): State<Arc<AppState>>,
    AppPath(id): AppPath<i32>,
    AppJson(req): AppJson<CategoryRequest>,
) -> Result<impl IntoResponse, AppError> {
    req.validate()?;

    let repo = CategoryRepository::new(state.db.clone());
    let category = repo
        .update(id, &req)
        .await?
        .ok_or_else(|| AppError::not_found(NOT_FOUND))?;

    Ok(Json(category))
}

/// 删除分类
pub async fn delete_category(
    State(state): State<Arc<AppState>>,
    AppPath(id): AppPath<i32>,
) -> Result<impl IntoResponse, AppError> {
    let repo = CategoryRepository::new(state.db.clone());
    let deleted = repo.delete(id).await?.ok_or_else(|| AppError::not_found(NOT_FOUND))?;

    tracing::info!(category_id = deleted.id, "Category deleted");

    Ok(Json(DeletedCategoryResponse {
        message: "Category deleted successfully".to_string(),
        deleted_category: deleted,
    }))
}
