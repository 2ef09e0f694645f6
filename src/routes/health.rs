//! # 헬스체크(Health Check) 핸들러
//!
//! ## 엔드포인트
//! - `GET /api/v1/health` → `{ "status": "ok", "store": "up" }`
//!
//! 저장소에 닿지 못해도 프로세스는 살아 있으므로 상태 코드는 항상 200이고,
//! 저장소 연결 여부는 `store` 필드(`up`/`down`)로 알려줍니다.

use crate::routes::people::AppState;
use axum::{extract::State, Json};
use serde_json::{json, Value};

/// `GET /health` — 서버와 저장소 상태를 확인합니다.
pub async fn health_check(State(state): State<AppState>) -> Json<Value> {
    // `SELECT 1`: 가장 가벼운 왕복 쿼리로 연결만 확인합니다.
    let store = match sqlx::query("SELECT 1").execute(state.people.pool()).await {
        Ok(_) => "up",
        Err(e) => {
            tracing::warn!("health check could not reach store: {}", e);
            "down"
        }
    };

    Json(json!({
        "status": "ok",
        "store": store
    }))
}
