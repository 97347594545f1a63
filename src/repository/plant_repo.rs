//! Plant repository (植物数据访问)
//!
//! 写操作均为单条语句：通过 CTE 在同一语句中完成写入并关联分类名称

use crate::{db, error::AppError, models::plant::*};
use sqlx::PgPool;

/// 关联分类名称的查询列
const PLANT_COLUMNS: &str = r#"
    p.id,
    p.category_id,
    c.name AS category_name,
    p.name,
    p.last_media_changed,
    p.code,
    p.location,
    p.pot_description,
    p.watering_frequency,
    p.notes,
    p.photo_path
"#;

pub struct PlantRepository {
    db: PgPool,
}

fn map_write_error(e: sqlx::Error) -> AppError {
    if db::is_foreign_key_violation(&e) {
        AppError::BadRequest("Category does not exist".to_string())
    } else if db::is_unique_violation(&e) {
        AppError::conflict("Plant already exists")
    } else {
        AppError::Database(e)
    }
}

impl PlantRepository {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// 列出植物（按名称升序）
    pub async fn list(&self) -> Result<Vec<Plant>, AppError> {
        let query = format!(
            "SELECT {PLANT_COLUMNS} FROM plant p LEFT JOIN category c ON p.category_id = c.id ORDER BY p.name ASC"
        );

        let plants = sqlx::query_as::<_, Plant>(&query).fetch_all(&self.db).await?;

        Ok(plants)
    }

    /// 获取植物
    pub async fn get(&self, id: i32) -> Result<Option<Plant>, AppError> {
        let query = format!(
            "SELECT {PLANT_COLUMNS} FROM plant p LEFT JOIN category c ON p.category_id = c.id WHERE p.id = $1"
        );

        let plant = sqlx::query_as::<_, Plant>(&query)
            .bind(id)
            .fetch_optional(&self.db)
            .await?;

        Ok(plant)
    }

    /// 创建植物
    pub async fn create(&self, req: &PlantRequest) -> Result<Plant, AppError> {
        let query = format!(
            r#"
            WITH p AS (
                INSERT INTO plant (
                    category_id, name, last_media_changed, code, location,
                    pot_description, watering_frequency, notes, photo_path
                )
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
                RETURNING *
            )
            SELECT {PLANT_COLUMNS} FROM p LEFT JOIN category c ON p.category_id = c.id
            "#
        );

        sqlx::query_as::<_, Plant>(&query)
            .bind(req.category_id)
            .bind(&req.name)
            .bind(req.last_media_changed)
            .bind(&req.code)
            .bind(&req.location)
            .bind(&req.pot_description)
            .bind(&req.watering_frequency)
            .bind(&req.notes)
            .bind(&req.photo_path)
            .fetch_one(&self.db)
            .await
            .map_err(map_write_error)
    }

    /// 更新植物（整体替换）
    pub async fn update(&self, id: i32, req: &PlantRequest) -> Result<Option<Plant>, AppError> {
        let query = format!(
            r#"
            WITH p AS (
                UPDATE plant
                SET
                    category_id = $1,
                    name = $2,
                    last_media_changed = $3,
                    code = $4,
                    location = $5,
                    pot_description = $6,
                    watering_frequency = $7,
                    notes = $8,
                    photo_path = $9
                WHERE id = $10
                RETURNING *
            )
            SELECT {PLANT_COLUMNS} FROM p LEFT JOIN category c ON p.category_id = c.id
            "#
        );

        sqlx::query_as::<_, Plant>(&query)
            .bind(req.category_id)
            .bind(&req.name)
            .bind(req.last_media_changed)
            .bind(&req.code)
            .bind(&req.location)
            .bind(&req.pot_description)
            .bind(&req.watering_frequency)
            .bind(&req.notes)
            .bind(&req.photo_path)
            .bind(id)
            .fetch_optional(&self.db)
            .await
            .map_err(map_write_error)
    }

    /// 删除植物，返回被删除的记录
    pub async fn delete(&self, id: i32) -> Result<Option<PlantRecord>, AppError> {
        let record = sqlx::query_as::<_, PlantRecord>(
            r#"
            DELETE FROM plant WHERE id = $1
            RETURNING id, category_id, name, last_media_changed, code, location,
                      pot_description, watering_frequency, notes, photo_path
            "#,
        )
        .bind(id)
        .fetch_optional(&self.db)
        .await?;

        Ok(record)
    }
}
