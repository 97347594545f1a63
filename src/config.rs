//! 配置系统
//! 从环境变量加载所有配置，使用 Secret 包装敏感信息

use config::{Config, ConfigError, Environment};
use secrecy::{ExposeSecret, Secret};
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// 监听地址，例如 "0.0.0.0:3000"
    pub addr: String,
    /// 优雅关闭超时时间（秒）
    pub graceful_shutdown_timeout_secs: u64,
    /// 运行模式: development, production
    pub mode: String,
    /// CORS 允许的来源（未设置时放行所有来源）
    pub cors_allowed_origins: Option<Vec<String>>,
}

impl ServerConfig {
    /// 开发模式下错误响应会携带内部错误详情
    pub fn is_development(&self) -> bool {
        self.mode.eq_ignore_ascii_case("development")
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// 数据库连接 URL（使用 Secret 包装，防止日志泄露）
    pub url: Secret<String>,
    /// 最大连接数
    pub max_connections: u32,
    /// 最小连接数
    pub min_connections: u32,
    /// 获取连接超时时间（秒）
    pub acquire_timeout_secs: u64,
    /// 空闲连接超时时间（秒）
    pub idle_timeout_secs: u64,
    /// 连接最大生命周期（秒）
    pub max_lifetime_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// 日志级别: trace, debug, info, warn, error
    pub level: String,
    /// 日志格式: json, pretty
    pub format: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SecurityConfig {
    /// JWT 密钥（使用 Secret 包装，防止日志泄露）
    pub jwt_secret: Secret<String>,
    /// 令牌过期时间（秒）
    pub token_exp_secs: u64,
    /// bcrypt 计算成本
    pub bcrypt_cost: u32,
    /// 植物、分类与上传接口是否要求 Bearer 令牌
    pub protect_resources: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MediaConfig {
    /// Cloudinary 云名称
    pub cloud_name: String,
    pub api_key: String,
    pub api_secret: Secret<String>,
    /// 上传 API 根地址
    pub base_url: String,
    /// 单个文件最大字节数
    pub max_upload_bytes: usize,
    /// 上传请求超时时间（秒）
    pub timeout_secs: u64,
    pub max_width: u32,
    pub max_height: u32,
}

impl MediaConfig {
    pub fn is_configured(&self) -> bool {
        !self.cloud_name.is_empty()
            && !self.api_key.is_empty()
            && !self.api_secret.expose_secret().is_empty()
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub logging: LoggingConfig,
    pub security: SecurityConfig,
    pub media: MediaConfig,
}

impl AppConfig {
    /// 从环境变量加载配置
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut settings = Config::builder();

        // 添加默认配置
        settings = settings
            .set_default("server.addr", "0.0.0.0:3000")?
            .set_default("server.graceful_shutdown_timeout_secs", 30)?
            .set_default("server.mode", "production")?
            .set_default("database.max_connections", 10)?
            .set_default("database.min_connections", 2)?
            .set_default("database.acquire_timeout_secs", 30)?
            .set_default("database.idle_timeout_secs", 600)?
            .set_default("database.max_lifetime_secs", 1800)?
            .set_default("logging.level", "info")?
            .set_default("logging.format", "json")?
            .set_default("security.jwt_secret", "change-this-secret-in-production-min-32-chars!")?
            .set_default("security.token_exp_secs", 3600)?
            .set_default("security.bcrypt_cost", 10)?
            .set_default("security.protect_resources", false)?
            .set_default("media.cloud_name", "")?
            .set_default("media.api_key", "")?
            .set_default("media.api_secret", "")?
            .set_default("media.base_url", "https://api.cloudinary.com")?
            .set_default("media.max_upload_bytes", 10 * 1024 * 1024)?
            .set_default("media.timeout_secs", 30)?
            .set_default("media.max_width", 800)?
            .set_default("media.max_height", 800)?;

        // 从环境变量加载配置（前缀为 PLANT_）
        settings = settings.add_source(
            Environment::with_prefix("PLANT")
                .prefix_separator("_")
                .separator("__")
                .list_separator(",")
                .with_list_parse_key("server.cors_allowed_origins")
                .try_parsing(true),
        );

        let config: AppConfig = settings.build()?.try_deserialize()?;

        // 验证配置
        config.validate()?;

        Ok(config)
    }

    /// 验证配置合法性
    pub fn validate(&self) -> Result<(), ConfigError> {
        // 验证端口范围
        if let Some(port_str) = self.server.addr.split(':').next_back() {
            if let Ok(port) = port_str.parse::<u16>() {
                if port != 0 && port < 1024 {
                    return Err(ConfigError::Message("Server port should be >= 1024".to_string()));
                }
            }
        }

        match self.server.mode.to_lowercase().as_str() {
            "development" | "production" => {}
            _ => {
                return Err(ConfigError::Message(format!(
                    "Invalid server mode: {}. Must be one of: development, production",
                    self.server.mode
                )))
            }
        }

        // 验证日志级别
        match self.logging.level.to_lowercase().as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            _ => {
                return Err(ConfigError::Message(format!(
                    "Invalid log level: {}. Must be one of: trace, debug, info, warn, error",
                    self.logging.level
                )))
            }
        }

        // 验证日志格式
        match self.logging.format.to_lowercase().as_str() {
            "json" | "pretty" => {}
            _ => {
                return Err(ConfigError::Message(format!(
                    "Invalid log format: {}. Must be one of: json, pretty",
                    self.logging.format
                )))
            }
        }

        // 验证数据库连接池配置
        if self.database.max_connections < self.database.min_connections {
            return Err(ConfigError::Message(
                "max_connections must be >= min_connections".to_string(),
            ));
        }

        // 验证 JWT 密钥长度（至少 32 字符）
        if self.security.jwt_secret.expose_secret().len() < 32 {
            return Err(ConfigError::Message(
                "JWT secret must be at least 32 characters long".to_string(),
            ));
        }

        if self.security.token_exp_secs < 60 || self.security.token_exp_secs > 86400 {
            return Err(ConfigError::Message(
                "token_exp_secs must be between 60 and 86400 (1 minute to 24 hours)".to_string(),
            ));
        }

        // bcrypt 仅支持 4..=31
        if !(4..=31).contains(&self.security.bcrypt_cost) {
            return Err(ConfigError::Message(
                "bcrypt_cost must be between 4 and 31".to_string(),
            ));
        }

        if self.media.max_upload_bytes == 0 {
            return Err(ConfigError::Message(
                "media.max_upload_bytes must be greater than 0".to_string(),
            ));
        }

        if self.media.timeout_secs == 0 {
            return Err(ConfigError::Message(
                "media.timeout_secs must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}
