//! Category repository (分类数据访问)

use crate::{db, error::AppError, models::category::*};
use sqlx::PgPool;

pub struct CategoryRepository {
    db: PgPool,
}

fn map_write_error(e: sqlx::Error) -> AppError {
    if db::is_unique_violation(&e) {
        AppError::conflict("Category name already exists")
    } else {
        AppError::Database(e)
    }
}

impl CategoryRepository {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// 列出分类（按名称升序）
    pub async fn list(&self) -> Result<Vec<Category>, AppError> {
        let categories = sqlx::query_as::<_, Category>(
            "SELECT id, name, description FROM category ORDER BY name ASC",
        )
        .fetch_all(&self.db)
        .await?;

        Ok(categories)
    }

    /// 获取分类
    pub async fn get(&self, id: i32) -> Result<Option<Category>, AppError> {
        let category = sqlx::query_as::<_, Category>(
            "SELECT id, name, description FROM category WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.db)
        .await?;

        Ok(category)
    }

    /// 创建分类
    pub async fn create(&self, req: &CategoryRequest) -> Result<Category, AppError> {
        sqlx::query_as::<_, Category>(
            "INSERT INTO category (name, description) VALUES ($1, $2) RETURNING id, name, description",
        )
        .bind(&req.name)
        .bind(&req.description)
        .fetch_one(&self.db)
        .await
        .map_err(map_write_error)
    }

    /// 更新分类（整体替换）
    pub async fn update(&self, id: i32, req: &CategoryRequest) -> Result<Option<Category>, AppError> {
        sqlx::query_as::<_, Category>(
            r#"
            UPDATE category
            SET name = $1, description = $2
            WHERE id = $3
            RETURNING id, name, description
            "#,
        )
        .bind(&req.name)
        .bind(&req.description)
        .bind(id)
        .fetch_optional(&self.db)
        .await
        .map_err(map_write_error)
    }

    /// 删除分类，返回被删除的记录
    pub async fn delete(&self, id: i32) -> Result<Option<Category>, AppError> {
        sqlx::query_as::<_, Category>(
            "DELETE FROM category WHERE id = $1 RETURNING id, name, description",
        )
        .bind(id)
        .fetch_optional(&self.db)
        .await
        .map_err(|e| {
            // 仍被植物引用，不级联删除
            if db::is_foreign_key_violation(&e) {
                AppError::conflict("Category is still in use by plants")
            } else {
                AppError::Database(e)
            }
        })
    }
}
