//! # 라우트 핸들러 모듈
//!
//! HTTP 요청을 처리하는 핸들러 함수들과 라우터 구성을 모아둔 모듈입니다.
//!
//! 각 하위 모듈:
//! - `health`: 서버 상태 확인 (헬스체크)
//! - `people`: Person 저장소 작업 핸들러

pub mod health;
pub mod people;

pub use health::*;
pub use people::*;

use axum::{
    routing::{get, patch, post},
    Router,
};

/// `/api/v1` 아래에 붙는 API 라우터를 만듭니다.
///
/// main.rs와 테스트가 같은 라우터를 사용하도록 여기서 한 번만 정의합니다.
/// axum 0.8부터 경로 파라미터는 `{id}` 문법을 사용합니다.
pub fn api_router(state: AppState) -> Router {
    Router::new()
        .route(
            "/people",
            get(find_people_by_name)
                .post(create_person)
                .delete(delete_many_people),
        )
        .route("/people/batch", post(create_many_people))
        // 정적 세그먼트(query-chain, by-food, by-name)는 `{id}`보다 먼저 매칭됩니다.
        .route("/people/query-chain", get(query_chain))
        .route("/people/by-food/{food}", get(find_one_by_food))
        .route("/people/by-name/{name}/age", patch(update_age))
        .route("/people/{id}", get(get_person).delete(delete_person))
        .route("/people/{id}/foods", post(append_hamburger))
        .route("/health", get(health_check))
        .with_state(state)
}
