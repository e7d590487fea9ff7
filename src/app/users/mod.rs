//! 用户资源

pub mod handler;
pub mod model;
pub mod service;

use axum::{routing::get, Router};

use handler::AppState;

/// `/users` 路由表
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/users", get(handler::list_users).post(handler::create_user))
        .route(
            "/users/:id",
            get(handler::get_user).delete(handler::delete_user),
        )
}
