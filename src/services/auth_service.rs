//! 认证服务：注册、登录

use crate::{
    auth::{jwt::Identity, password::PasswordHasher, JwtService},
    error::AppError,
    models::user::*,
    repository::UserRepository,
};
use sqlx::PgPool;
use std::sync::Arc;

/// 未知用户名与密码错误共用同一消息，避免枚举用户名
pub const INVALID_CREDENTIALS: &str = "Invalid credentials";

pub struct AuthService {
    db: PgPool,
    jwt_service: Arc<JwtService>,
    hasher: PasswordHasher,
}

impl AuthService {
    pub fn new(db: PgPool, jwt_service: Arc<JwtService>, hasher: PasswordHasher) -> Self {
        Self {
            db,
            jwt_service,
            hasher,
        }
    }

    /// 用户注册
    pub async fn register(&self, req: CredentialsRequest) -> Result<UserResponse, AppError> {
        let password_hash = self.hash_password(req.password).await?;

        let user_repo = UserRepository::new(self.db.clone());
        let user = user_repo.create(&req.username, &password_hash).await?;

        tracing::info!(user_id = user.id, username = %user.username, "User registered");

        Ok(UserResponse::from(user))
    }

    /// 用户登录，成功返回令牌
    pub async fn login(&self, req: CredentialsRequest) -> Result<String, AppError> {
        let user_repo = UserRepository::new(self.db.clone());

        let Some(user) = user_repo.find_by_username(&req.username).await? else {
            tracing::info!(username = %req.username, "Login failed: unknown user");
            return Err(AppError::BadRequest(INVALID_CREDENTIALS.to_string()));
        };

        if !self.verify_password(req.password, user.password_hash.clone()).await? {
            tracing::info!(user_id = user.id, "Login failed: wrong password");
            return Err(AppError::BadRequest(INVALID_CREDENTIALS.to_string()));
        }

        let token = self.jwt_service.issue(&Identity {
            id: user.id,
            username: user.username,
        })?;

        tracing::info!(user_id = user.id, "User logged in");

        Ok(token)
    }

    // bcrypt 为 CPU 密集操作，放到阻塞线程池执行
    async fn hash_password(&self, password: String) -> Result<String, AppError> {
        let hasher = self.hasher;
        tokio::task::spawn_blocking(move || hasher.hash(&password))
            .await
            .map_err(|e| AppError::Internal(format!("Password hashing task failed: {}", e)))?
    }

    async fn verify_password(&self, password: String, hash: String) -> Result<bool, AppError> {
        let hasher = self.hasher;
        tokio::task::spawn_blocking(move || hasher.verify(&password, &hash))
            .await
            .map_err(|e| AppError::Internal(format!("Password verification task failed: {}", e)))?
    }
}
