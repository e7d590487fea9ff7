//! # users-cql
//!
//! 基于 Axum 的用户 CRUD 服务，数据存放在 Cassandra 的 `users` 表中。
//! - `app`: 用户资源的模型、服务与处理器
//! - `core`: 错误处理与中间件
//! - `infrastructure`: 配置、日志、存储与启动时的 schema 初始化

pub mod app;
pub mod core;
pub mod infrastructure;

use axum::{middleware, Router};
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

use app::users::{handler::AppState, service::UserService};
use infrastructure::database::UserStore;

/// 构建完整的 HTTP 应用
pub fn build_app(store: Arc<dyn UserStore>) -> Router {
    let state = AppState {
        user_service: UserService::new(store),
    };

    app::users::routes()
        .layer(middleware::from_fn(
            core::middleware::request_logging_middleware,
        ))
        .layer(CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any))
        // 请求日志由中间件输出，trace 只在 debug 级别可见
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::DEBUG))
                .on_response(DefaultOnResponse::new().level(Level::DEBUG)),
        )
        .with_state(state)
}
