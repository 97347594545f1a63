//! 结构化日志初始化

use crate::config::AppConfig;
use tracing_subscriber::{
    fmt::format::FmtSpan, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer,
};

/// 日志输出格式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// 生产环境，每行一个 JSON 对象
    Json,
    /// 开发环境，多行易读格式
    Pretty,
}

impl LogFormat {
    /// 未识别的值按 JSON 处理
    pub fn parse(value: &str) -> Self {
        if value.eq_ignore_ascii_case("pretty") {
            LogFormat::Pretty
        } else {
            LogFormat::Json
        }
    }
}

/// 过滤规则：`RUST_LOG` 优先，否则使用配置级别并压低依赖库的噪声
pub fn build_filter(level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "{level},sqlx=warn,hyper=warn,reqwest=warn,tower_http=info"
        ))
    })
}

/// 安装全局 subscriber，进程内只调用一次
pub fn init_telemetry(config: &AppConfig) {
    let format = LogFormat::parse(&config.logging.format);

    let fmt_layer = match format {
        LogFormat::Json => tracing_subscriber::fmt::layer()
            .json()
            .with_current_span(true)
            .with_target(false)
            .with_span_events(FmtSpan::CLOSE)
            .boxed(),
        LogFormat::Pretty => tracing_subscriber::fmt::layer()
            .pretty()
            .with_target(false)
            .boxed(),
    };

    tracing_subscriber::registry()
        .with(build_filter(&config.logging.level))
        .with(fmt_layer)
        .init();

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        level = %config.logging.level,
        format = ?format,
        mode = %config.server.mode,
        "Logging initialized"
    );
}
