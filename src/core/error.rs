//! 核心错误处理模块

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use tracing::error;

use crate::infrastructure::database::StoreError;

/// 核心错误类型
///
/// 除状态码外不返回错误体。
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("资源不存在")]
    NotFound,
    #[error("存储不可用: {0}")]
    Store(#[from] StoreError),
}

impl IntoResponse for CoreError {
    fn into_response(self) -> Response {
        match self {
            CoreError::NotFound => StatusCode::NOT_FOUND.into_response(),
            CoreError::Store(e) => {
                error!("存储调用失败: {}", e);
                StatusCode::INTERNAL_SERVER_ERROR.into_response()
            }
        }
    }
}
