//! 植物管理的 HTTP 处理器

use crate::{
    error::AppError,
    extract::{AppJson, AppPath},
    middleware::AppState,
    models::plant::*,
    repository::PlantRepository,
};
use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use std::sync::Arc;
use validator::Validate;

const NOT_FOUND: &str = "Plant not found";

/// 列出植物
pub async fn list_plants(State(state): State<Arc<AppState>>) -> Result<impl IntoResponse, AppError> {
    let repo = PlantRepository::new(state.db.clone());
    let plants = repo.list().await?;

    Ok(Json(plants))
}

/// 获取植物详情
pub async fn get_plant(
    State(state): State<Arc<AppState>>,
    AppPath(id): AppPath<i32>,
) -> Result<impl IntoResponse, AppError> {
    let repo = PlantRepository::new(state.db.clone());
    let plant = repo.get(id).await?.ok_or_else(|| AppError::not_found(NOT_FOUND))?;

    Ok(Json(plant))
}

/// 创建植物
pub async fn create_plant(
    State(state): State<Arc<AppState>>,
    AppJson(req): AppJson<PlantRequest>,
) -> Result<impl IntoResponse, AppError> {
    req.validate()?;

    let repo = PlantRepository::new(state.db.clone());
    let plant = repo.create(&req).await?;

    tracing::info!(plant_id = plant.id, "Plant created");

    Ok((StatusCode::CREATED, Json(plant)))
}

/// 更新植物
pub async fn update_plant(
    State(state): State<Arc<AppState>>,
    AppPath(id): AppPath<i32>,
    AppJson(req): AppJson<PlantRequest>,
) -> Result<impl IntoResponse, AppError> {
    req.validate()?;

    let repo = PlantRepository::new(state.db.clone());
    let plant = repo
        .update(id, &req)
        .await?
        .ok_or_else(|| AppError::not_found(NOT_FOUND))?;

    Ok(Json(plant))
}

/// 删除植物
pub async fn delete_plant(
    State(state): State<Arc<AppState>>,
    AppPath(id): AppPath<i32>,
) -> Result<impl IntoResponse, AppError> {
    let repo = PlantRepository::new(state.db.clone());
    let deleted = repo.delete(id).await?.ok_or_else(|| AppError::not_found(NOT_FOUND))?;

    tracing::info!(plant_id = deleted.id, "Plant deleted");

    Ok(Json(DeletedPlantResponse {
        message: "Plant deleted successfully".to_string(),
        deleted_plant: deleted,
    }))
}
