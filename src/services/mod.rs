//! 服务层

pub mod auth_service;
pub mod upload_service;

pub use auth_service::AuthService;
pub use upload_service::UploadService;
