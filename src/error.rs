//! # 에러 처리 모듈
//!
//! 저장소(Repository)와 HTTP 계층에서 발생할 수 있는 모든 에러 타입을 정의합니다.
//! Rust에서는 예외(exception) 대신 `Result<T, E>` 타입으로 에러를 처리합니다.
//!
//! 이 모듈의 핵심:
//! - `AppError` 열거형(enum): 모든 에러 종류를 하나의 타입으로 통합
//! - `IntoResponse` 구현: 에러를 HTTP 응답으로 자동 변환
//!
//! 저장소의 각 작업은 값 또는 에러 중 **정확히 하나**만 돌려줍니다.
//! 에러는 재시도 없이 호출자에게 한 번만 전달됩니다.

use axum::{
    http::StatusCode,                   // HTTP 상태 코드 (200, 404, 500 등)
    response::{IntoResponse, Response}, // Axum의 응답 변환 트레이트
    Json,                               // JSON 응답 래퍼
};
use serde_json::json; // json! 매크로
use thiserror::Error; // #[derive(Error)]로 Display와 std::error::Error를 자동 구현

/// 애플리케이션에서 발생할 수 있는 모든 에러 종류
///
/// 저장소 메서드는 `Result<T, AppError>`를 반환하고,
/// 라우트 핸들러는 같은 타입을 그대로 반환하여 Axum이 HTTP 응답으로 변환하게 합니다.
#[derive(Debug, Error)]
pub enum AppError {
    /// 요청한 Person을 찾을 수 없음 (HTTP 404)
    #[error("Resource not found")]
    NotFound,

    /// 필드 검증 실패 (HTTP 400)
    /// 예: `name`이 비어 있는 Draft
    #[error("Validation failed: {0}")]
    Validation(String),

    /// id 형식이 잘못됨 (HTTP 400)
    /// 저장소가 발급한 UUID 형식이 아니면 DB에 묻기 전에 거절합니다.
    #[error("Invalid id: {0}")]
    InvalidId(String),

    /// 호출자가 넘긴 CancellationToken이 취소됨 (HTTP 503)
    #[error("Operation cancelled")]
    Cancelled,

    /// 데이터베이스 오류 (HTTP 500)
    /// #[from]: sqlx::Error → AppError::Database 자동 변환 (`?` 연산자에서 사용)
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// 파일 입출력 오류 (HTTP 500)
    /// 예: DB 파일 디렉토리를 만들지 못함
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// 마이그레이션 실패 (HTTP 500)
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
}

impl AppError {
    /// 에러 응답 본문에 들어갈 고정 코드 문자열
    pub fn code(&self) -> &'static str {
        match self {
            AppError::NotFound => "not_found",
            AppError::Validation(_) => "validation_error",
            AppError::InvalidId(_) => "invalid_id",
            AppError::Cancelled => "cancelled",
            AppError::Database(_) => "database_error",
            AppError::Io(_) => "io_error",
            AppError::Migration(_) => "migration_error",
        }
    }
}

impl IntoResponse for AppError {
    /// AppError를 HTTP 응답으로 변환합니다.
    ///
    /// 내부 에러(Database, Io, Migration)는 실제 내용을 로그에만 기록하고,
    /// 클라이언트에는 일반적인 메시지만 반환합니다.
    fn into_response(self) -> Response {
        let code = self.code();
        let (status, message) = match self {
            AppError::NotFound => (StatusCode::NOT_FOUND, self.to_string()),
            AppError::Validation(ref msg) | AppError::InvalidId(ref msg) => {
                (StatusCode::BAD_REQUEST, msg.clone())
            }
            AppError::Cancelled => (StatusCode::SERVICE_UNAVAILABLE, self.to_string()),
            AppError::Database(ref e) => {
                tracing::error!("Database error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "A database error occurred".to_string(),
                )
            }
            AppError::Io(ref e) => {
                tracing::error!("IO error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An IO error occurred".to_string(),
                )
            }
            AppError::Migration(ref e) => {
                tracing::error!("Migration error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "A database error occurred".to_string(),
                )
            }
        };

        // 결과: { "error": { "code": "not_found", "message": "Resource not found" } }
        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_errors_map_to_4xx() {
        assert_eq!(AppError::NotFound.into_response().status(), StatusCode::NOT_FOUND);
        assert_eq!(
            AppError::Validation("name is required".into())
                .into_response()
                .status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::InvalidId("nope".into()).into_response().status(),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn cancelled_maps_to_service_unavailable() {
        assert_eq!(AppError::Cancelled.code(), "cancelled");
        assert_eq!(
            AppError::Cancelled.into_response().status(),
            StatusCode::SERVICE_UNAVAILABLE
        );
    }
}
