//! HTTP 处理器模块

pub mod auth;
pub mod category;
pub mod health;
pub mod metrics;
pub mod plant;
pub mod upload;
