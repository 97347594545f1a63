//! HTTP 中间件
//! 应用状态与请求追踪

use axum::{
    extract::Request,
    http::{HeaderMap, HeaderValue},
    middleware::Next,
    response::Response,
};
use std::sync::Arc;
use std::time::Instant;
use tracing::Instrument;
use uuid::Uuid;

/// 应用状态
///
/// 连接池与签名密钥在启动时创建一次，通过 State 注入各处理器
#[derive(Clone)]
pub struct AppState {
    pub config: crate::config::AppConfig,
    pub db: sqlx::PgPool,
    pub jwt_service: Arc<crate::auth::jwt::JwtService>,
    pub auth_service: Arc<crate::services::AuthService>,
    pub upload_service: Arc<crate::services::UploadService>,
}

impl AppState {
    /// 根据配置和连接池组装所有服务
    pub fn new(config: crate::config::AppConfig, db: sqlx::PgPool) -> Result<Self, crate::error::AppError> {
        let jwt_service = Arc::new(crate::auth::jwt::JwtService::from_config(&config)?);
        let hasher = crate::auth::password::PasswordHasher::with_cost(config.security.bcrypt_cost);
        let auth_service = Arc::new(crate::services::AuthService::new(
            db.clone(),
            jwt_service.clone(),
            hasher,
        ));
        let upload_service = Arc::new(crate::services::UploadService::from_config(&config.media)?);

        Ok(Self {
            config,
            db,
            jwt_service,
            auth_service,
            upload_service,
        })
    }
}

pub const TRACE_ID_HEADER: &str = "x-trace-id";
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// 每个请求的追踪标识：trace_id 可由上游传入，request_id 总是新生成
#[derive(Debug, Clone)]
struct RequestIds {
    trace_id: String,
    request_id: String,
}

impl RequestIds {
    fn from_headers(headers: &HeaderMap) -> Self {
        Self {
            trace_id: extract_or_generate_trace_id(headers),
            request_id: Uuid::new_v4().to_string(),
        }
    }

    fn write_to(&self, headers: &mut HeaderMap) {
        for (name, value) in [
            (TRACE_ID_HEADER, &self.trace_id),
            (REQUEST_ID_HEADER, &self.request_id),
        ] {
            if let Ok(value) = HeaderValue::from_str(value) {
                headers.insert(name, value);
            }
        }
    }
}

/// 请求追踪：span、计数与耗时指标、完成日志，并回写追踪头
pub async fn request_tracking_middleware(req: Request, next: Next) -> Response {
    let ids = RequestIds::from_headers(req.headers());
    let method = req.method().clone();
    let path = req.uri().path().to_owned();

    let span = tracing::info_span!(
        "http_request",
        trace_id = %ids.trace_id,
        request_id = %ids.request_id,
        method = %method,
        path = %path,
    );

    async move {
        let start = Instant::now();
        let mut response = next.run(req).await;
        let elapsed = start.elapsed();
        let status = response.status().as_u16();

        metrics::counter!(
            "http_requests_total",
            "method" => method_label(method.as_str()),
            "status" => status_label(status)
        )
        .increment(1);
        metrics::histogram!("http_request_duration_seconds").record(elapsed.as_secs_f64());

        tracing::info!(status, elapsed_ms = elapsed.as_millis() as u64, "Request completed");

        ids.write_to(response.headers_mut());
        response
    }
    .instrument(span)
    .await
}

fn method_label(method: &str) -> &'static str {
    match method {
        "GET" => "GET",
        "POST" => "POST",
        "PUT" => "PUT",
        "DELETE" => "DELETE",
        "OPTIONS" => "OPTIONS",
        _ => "OTHER",
    }
}

// 只列出本服务实际会返回的状态码，其余归为 other
fn status_label(status: u16) -> &'static str {
    match status {
        200 => "200",
        201 => "201",
        400 => "400",
        401 => "401",
        403 => "403",
        404 => "404",
        409 => "409",
        413 => "413",
        500 => "500",
        503 => "503",
        _ => "other",
    }
}

fn extract_or_generate_trace_id(headers: &HeaderMap) -> String {
    headers
        .get(TRACE_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.is_empty())
        .map(str::to_owned)
        .unwrap_or_else(|| Uuid::new_v4().to_string())
}
