//! 路由注册
//! 创建所有 API 路由并应用中间件

use axum::{
    extract::DefaultBodyLimit,
    http::HeaderValue,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, CorsLayer};

use crate::{auth::middleware::jwt_auth_middleware, handlers, middleware::AppState};

/// JSON 请求体上限
pub const JSON_BODY_LIMIT: usize = 50 * 1024 * 1024;

/// multipart 编码中除文件外的字段与边界开销
const MULTIPART_OVERHEAD: usize = 1024 * 1024;

/// 创建应用路由
pub fn create_router(state: Arc<AppState>) -> Router {
    let jwt_service = state.jwt_service.clone();

    // 公开端点
    let public_routes = Router::new()
        .route("/", get(handlers::health::root))
        .route("/health", get(handlers::health::health_check))
        .route("/ready", get(handlers::health::readiness_check))
        .route("/metrics", get(handlers::metrics::metrics_export));

    // 注册与登录（无需认证）
    let auth_routes = Router::new()
        .route("/auth/register", post(handlers::auth::register))
        .route("/auth/login", post(handlers::auth::login));

    // 始终需要认证
    let identity_routes = Router::new()
        .route("/auth/me", get(handlers::auth::get_current_user))
        .layer(axum::middleware::from_fn_with_state(
            jwt_service.clone(),
            jwt_auth_middleware,
        ));

    let mut resource_routes = Router::new()
        // 植物
        .route(
            "/plants",
            get(handlers::plant::list_plants).post(handlers::plant::create_plant),
        )
        .route(
            "/plants/{id}",
            get(handlers::plant::get_plant)
                .put(handlers::plant::update_plant)
                .delete(handlers::plant::delete_plant),
        )
        // 分类
        .route(
            "/categories",
            get(handlers::category::list_categories).post(handlers::category::create_category),
        )
        .route(
            "/categories/{id}",
            get(handlers::category::get_category)
                .put(handlers::category::update_category)
                .delete(handlers::category::delete_category),
        )
        // 图片上传
        .route(
            "/api/upload-image",
            post(handlers::upload::upload_image).layer(DefaultBodyLimit::max(
                state.config.media.max_upload_bytes + MULTIPART_OVERHEAD,
            )),
        );

    // 资源接口默认公开，可通过 security.protect_resources 开启认证
    if state.config.security.protect_resources {
        resource_routes = resource_routes.layer(axum::middleware::from_fn_with_state(
            jwt_service,
            jwt_auth_middleware,
        ));
    }

    Router::new()
        .merge(public_routes)
        .merge(auth_routes)
        .merge(identity_routes)
        .merge(resource_routes)
        .layer(DefaultBodyLimit::max(JSON_BODY_LIMIT))
        .layer(cors_layer(state.config.server.cors_allowed_origins.as_deref()))
        .layer(axum::middleware::from_fn(crate::middleware::request_tracking_middleware))
        .with_state(state)
}

/// CORS：未配置来源时放行所有来源
fn cors_layer(origins: Option<&[String]>) -> CorsLayer {
    match origins {
        Some(origins) if !origins.is_empty() => {
            let origins: Vec<HeaderValue> = origins
                .iter()
                .filter_map(|o| match HeaderValue::from_str(o) {
                    Ok(value) => Some(value),
                    Err(_) => {
                        tracing::warn!(origin = %o, "Ignoring invalid CORS origin");
                        None
                    }
                })
                .collect();

            CorsLayer::new()
                .allow_origin(AllowOrigin::list(origins))
                .allow_methods(tower_http::cors::Any)
                .allow_headers(tower_http::cors::Any)
        }
        _ => CorsLayer::permissive(),
    }
}
