//! # Person 라우트 핸들러
//!
//! `PersonRepository`의 각 작업을 HTTP로 노출하는 핸들러 함수들입니다.
//! 핸들러는 요청에서 인자를 꺼내 저장소에 그대로 넘기고, 결과를 JSON으로 돌려줍니다.
//!
//! ## 엔드포인트 목록
//! | 메서드 | 경로 | 핸들러 | 저장소 작업 |
//! |--------|------|--------|-------------|
//! | POST | /api/v1/people | `create_person` | `create` |
//! | POST | /api/v1/people/batch | `create_many_people` | `create_many` |
//! | GET | /api/v1/people?name=… | `find_people_by_name` | `find_by_name` |
//! | DELETE | /api/v1/people?name=… | `delete_many_people` | `delete_many_by_name` |
//! | GET | /api/v1/people/by-food/{food} | `find_one_by_food` | `find_one_by_food` |
//! | GET | /api/v1/people/query-chain | `query_chain` | `query_chained` |
//! | GET | /api/v1/people/{id} | `get_person` | `find_by_id` |
//! | DELETE | /api/v1/people/{id} | `delete_person` | `delete_by_id` |
//! | POST | /api/v1/people/{id}/foods | `append_hamburger` | `fetch_append_food_save` |
//! | PATCH | /api/v1/people/by-name/{name}/age | `update_age` | `update_age_by_name` |

use crate::{
    db::{PersonRepository, NAME_TO_REMOVE},
    error::AppError,
    models::*,
};
use axum::{
    extract::{Path, Query, State}, // URL 경로, 쿼리 문자열, 앱 상태 추출자
    http::StatusCode,
    Json,
};
use serde_json::{json, Value};
use sqlx::SqlitePool;

/// 애플리케이션 공유 상태
///
/// Axum의 State 추출자는 내부적으로 clone하므로 `Clone`이 필요합니다.
/// `PersonRepository`는 풀과 취소 토큰만 들고 있어 clone 비용이 작습니다.
#[derive(Clone)]
pub struct AppState {
    pub people: PersonRepository,
}

impl AppState {
    /// 서버용 상태를 만듭니다.
    ///
    /// 저장소는 자체 토큰을 사용하며 서버 종료 신호와 묶이지 않습니다.
    /// 정상 종료(graceful shutdown) 중에도 진행 중인 요청은 끝까지 처리됩니다.
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            people: PersonRepository::new(pool),
        }
    }
}

/// `POST /people` — Person 하나를 생성합니다. → `201 Created`
pub async fn create_person(
    State(state): State<AppState>,
    Json(draft): Json<PersonDraft>,
) -> Result<(StatusCode, Json<Person>), AppError> {
    let person = state.people.create(&draft).await?;
    Ok((StatusCode::CREATED, Json(person)))
}

/// `POST /people/batch` — 배열로 받은 Draft들을 한 번에 생성합니다.
///
/// 하나라도 잘못되면 아무것도 저장되지 않고 400을 반환합니다.
pub async fn create_many_people(
    State(state): State<AppState>,
    Json(drafts): Json<Vec<PersonDraft>>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    let people = state.people.create_many(&drafts).await?;
    Ok((StatusCode::CREATED, Json(json!({ "people": people }))))
}

/// `GET /people?name=Juan` → `{ "people": [...] }`
///
/// 일치하는 문서가 없어도 200과 빈 배열을 반환합니다.
pub async fn find_people_by_name(
    State(state): State<AppState>,
    Query(query): Query<NameQuery>,
) -> Result<Json<Value>, AppError> {
    let name = query
        .name
        .ok_or_else(|| AppError::Validation("query parameter `name` is required".to_string()))?;
    let people = state.people.find_by_name(&name).await?;
    Ok(Json(json!({ "people": people })))
}

/// `DELETE /people?name=...` → `{ "deletedCount": n }`
///
/// `name`이 없으면 "Mary"를 삭제합니다.
pub async fn delete_many_people(
    State(state): State<AppState>,
    Query(query): Query<NameQuery>,
) -> Result<Json<DeleteSummary>, AppError> {
    let name = query.name.as_deref().unwrap_or(NAME_TO_REMOVE);
    let summary = state.people.delete_many_by_name(name).await?;
    Ok(Json(summary))
}

/// `GET /people/by-food/{food}` — 해당 음식을 좋아하는 첫 번째 Person
pub async fn find_one_by_food(
    State(state): State<AppState>,
    Path(food): Path<String>,
) -> Result<Json<Person>, AppError> {
    let person = state
        .people
        .find_one_by_food(&food)
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(Json(person))
}

/// `GET /people/query-chain` → 부리토를 좋아하는 Person 최대 2명 (이름순, age 제외)
pub async fn query_chain(State(state): State<AppState>) -> Result<Json<Value>, AppError> {
    let people = state.people.query_chained().await?;
    Ok(Json(json!({ "people": people })))
}

/// `GET /people/{id}`
pub async fn get_person(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Person>, AppError> {
    let person = state
        .people
        .find_by_id(&id)
        .await?
        // None(문서 없음)이면 404
        .ok_or(AppError::NotFound)?;
    Ok(Json(person))
}

/// `DELETE /people/{id}` — 삭제된 문서(삭제 직전 상태)를 본문으로 돌려줍니다.
pub async fn delete_person(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Person>, AppError> {
    let removed = state.people.delete_by_id(&id).await?;
    Ok(Json(removed))
}

/// `POST /people/{id}/foods` — 좋아하는 음식 끝에 "hamburger"를 추가합니다.
pub async fn append_hamburger(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Person>, AppError> {
    let person = state.people.fetch_append_food_save(&id).await?;
    Ok(Json(person))
}

/// `PATCH /people/by-name/{name}/age` — 나이를 20으로 설정하고 갱신된 문서를 반환합니다.
pub async fn update_age(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<Person>, AppError> {
    let person = state.people.update_age_by_name(&name).await?;
    Ok(Json(person))
}
