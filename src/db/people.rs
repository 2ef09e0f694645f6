//! # Person 저장소(Repository)
//!
//! `people` 컬렉션에 대한 10가지 작업을 제공하는 얇은 퍼사드(facade)입니다.
//! 각 작업은 저장소에 요청을 보내고, 값 또는 에러 중 정확히 하나를 돌려줍니다.
//!
//! ## 저장 방식
//! Person 하나가 `people` 테이블의 한 행이고, `favorite_foods`는 JSON 배열입니다.
//! 배열 조건은 SQLite JSON1 함수(`json_each`, `json_insert`)로 처리합니다.
//!
//! ## 원자성
//! - `fetch_append_food_save`: 한 번의 UPDATE로 배열 끝에 추가합니다 (중간 조회 없음).
//! - `update_age_by_name`: 필터와 갱신을 한 문장으로 수행합니다.
//! - `create_many`: 하나의 트랜잭션으로 묶어 일부만 저장되는 일이 없습니다.
//!
//! ## 취소
//! 모든 작업은 저장소에 묶인 `CancellationToken`을 관찰합니다.
//! 토큰이 취소되면 진행 중인 요청은 버려지고 `AppError::Cancelled`가 반환됩니다.

use crate::error::AppError;
use crate::models::*;
use sqlx::types::Json;
use sqlx::{Sqlite, SqlitePool};
use std::future::Future;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

/// `fetch_append_food_save`가 추가하는 음식
pub const FOOD_TO_ADD: &str = "hamburger";
/// `update_age_by_name`이 설정하는 나이
pub const AGE_TO_SET: i64 = 20;
/// 필터 기반 삭제의 기본 이름
pub const NAME_TO_REMOVE: &str = "Mary";
/// `query_chained`가 찾는 음식
pub const FOOD_TO_SEARCH: &str = "burrito";
/// `query_chained` 결과의 최대 개수
pub const QUERY_CHAIN_LIMIT: i64 = 2;

/// `people` 컬렉션 저장소
///
/// `SqlitePool`은 내부적으로 Arc이므로 clone해도 같은 풀을 가리킵니다.
/// 저장소 자체는 상태를 들고 있지 않으며, 모든 데이터는 DB에만 있습니다.
#[derive(Debug, Clone)]
pub struct PersonRepository {
    pool: SqlitePool,
    cancel: CancellationToken,
}

impl PersonRepository {
    /// 연결 풀로 저장소를 만듭니다. 취소되지 않는 새 토큰을 사용합니다.
    pub fn new(pool: SqlitePool) -> Self {
        Self::with_token(pool, CancellationToken::new())
    }

    /// 연결 풀과 호출자가 넘긴 취소 토큰으로 저장소를 만듭니다.
    ///
    /// 토큰이 취소되면 이후의 모든 작업과 진행 중인 작업이 `AppError::Cancelled`로 끝납니다.
    pub fn with_token(pool: SqlitePool, cancel: CancellationToken) -> Self {
        Self { pool, cancel }
    }

    /// 같은 풀을 공유하면서 호출자가 넘긴 토큰을 관찰하는 저장소를 돌려줍니다.
    pub fn with_cancellation(&self, cancel: CancellationToken) -> Self {
        Self::with_token(self.pool.clone(), cancel)
    }

    /// 저장소가 사용하는 연결 풀 (헬스체크, 종료 처리용)
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// 작업 future를 취소 토큰과 경주시킵니다.
    ///
    /// `biased`: 이미 취소된 토큰이면 요청을 보내지 않고 바로 `Cancelled`를 반환합니다.
    async fn run<T, F>(&self, op: F) -> Result<T, AppError>
    where
        F: Future<Output = Result<T, AppError>>,
    {
        tokio::select! {
            biased;
            _ = self.cancel.cancelled() => Err(AppError::Cancelled),
            result = op => result,
        }
    }

    // ── 생성(Create) ──

    /// Person 하나를 생성합니다.
    ///
    /// # 반환값
    /// 저장소가 발급한 `id`가 포함된 Person
    ///
    /// # 에러
    /// - `Validation`: `name`이 비어 있음 (아무것도 저장하지 않음)
    /// - `Database`: 쓰기 실패
    pub async fn create(&self, draft: &PersonDraft) -> Result<Person, AppError> {
        draft.validate()?;
        let person = self.run(insert_person(&self.pool, draft)).await?;
        tracing::debug!(id = %person.id, "person created");
        Ok(person)
    }

    /// 여러 Person을 한 번에 생성합니다.
    ///
    /// 모든 Draft를 먼저 검증하고, 하나라도 잘못되면 아무것도 쓰지 않습니다.
    /// 삽입은 하나의 트랜잭션 안에서 순서대로 실행되며, 결과도 입력 순서를 따릅니다.
    pub async fn create_many(&self, drafts: &[PersonDraft]) -> Result<Vec<Person>, AppError> {
        for draft in drafts {
            draft.validate()?;
        }

        let people = self
            .run(async {
                let mut tx = self.pool.begin().await?;
                let mut created = Vec::with_capacity(drafts.len());
                for draft in drafts {
                    created.push(insert_person(&mut *tx, draft).await?);
                }
                // commit 전에 에러로 빠져나가면 tx가 drop되면서 롤백됩니다.
                tx.commit().await?;
                Ok::<_, AppError>(created)
            })
            .await?;

        tracing::debug!(count = people.len(), "people created");
        Ok(people)
    }

    // ── 조회(Read) ──

    /// 이름이 정확히 일치하는 Person들을 삽입 순서대로 조회합니다.
    /// 일치하는 문서가 없으면 빈 Vec을 반환합니다.
    pub async fn find_by_name(&self, name: &str) -> Result<Vec<Person>, AppError> {
        self.run(async {
            let people = sqlx::query_as::<_, Person>(
                r#"
                SELECT id, name, age, favorite_foods
                FROM people
                WHERE name = ?
                ORDER BY rowid
                "#,
            )
            .bind(name)
            .fetch_all(&self.pool)
            .await?;
            Ok::<_, AppError>(people)
        })
        .await
    }

    /// `favorite_foods`에 `food`가 들어 있는 첫 번째 Person을 조회합니다.
    ///
    /// - `Ok(Some(Person))`: 삽입 순서상 가장 먼저 저장된 문서
    /// - `Ok(None)`: 일치하는 문서 없음
    pub async fn find_one_by_food(&self, food: &str) -> Result<Option<Person>, AppError> {
        self.run(async {
            // json_each: JSON 배열을 (key, value) 행들로 펼치는 테이블 함수
            let person = sqlx::query_as::<_, Person>(
                r#"
                SELECT id, name, age, favorite_foods
                FROM people
                WHERE EXISTS (
                    SELECT 1 FROM json_each(people.favorite_foods)
                    WHERE json_each.value = ?
                )
                ORDER BY rowid
                LIMIT 1
                "#,
            )
            .bind(food)
            .fetch_optional(&self.pool)
            .await?;
            Ok::<_, AppError>(person)
        })
        .await
    }

    /// id로 Person을 조회합니다.
    ///
    /// # 에러
    /// - `InvalidId`: UUID 형식이 아님
    pub async fn find_by_id(&self, id: &str) -> Result<Option<Person>, AppError> {
        let id = parse_id(id)?;
        self.run(async {
            let person = sqlx::query_as::<_, Person>(
                "SELECT id, name, age, favorite_foods FROM people WHERE id = ?",
            )
            .bind(&id)
            .fetch_optional(&self.pool)
            .await?;
            Ok::<_, AppError>(person)
        })
        .await
    }

    // ── 수정(Update) ──

    /// `favorite_foods` 끝에 [`FOOD_TO_ADD`]를 추가하고 갱신된 Person을 반환합니다.
    pub async fn fetch_append_food_save(&self, id: &str) -> Result<Person, AppError> {
        self.append_food(id, FOOD_TO_ADD).await
    }

    /// `favorite_foods` 끝에 `food`를 원자적으로 추가합니다.
    ///
    /// `json_insert(arr, '$[#]', v)`의 `#`은 "배열의 끝"을 뜻합니다.
    /// 읽기와 쓰기가 한 문장이므로 동시에 다른 쓰기가 끼어들어도 추가가 유실되지 않습니다.
    ///
    /// # 에러
    /// - `InvalidId`: UUID 형식이 아님
    /// - `NotFound`: 해당 id의 문서가 없음
    pub async fn append_food(&self, id: &str, food: &str) -> Result<Person, AppError> {
        let id = parse_id(id)?;
        let person = self
            .run(async {
                let person = sqlx::query_as::<_, Person>(
                    r#"
                    UPDATE people
                    SET favorite_foods = json_insert(favorite_foods, '$[#]', ?)
                    WHERE id = ?
                    RETURNING id, name, age, favorite_foods
                    "#,
                )
                .bind(food)
                .bind(&id)
                .fetch_optional(&self.pool)
                .await?;
                person.ok_or(AppError::NotFound)
            })
            .await?;

        tracing::debug!(id = %person.id, food, "food appended");
        Ok(person)
    }

    /// 이름이 `name`인 첫 번째 Person의 나이를 [`AGE_TO_SET`]으로 바꿉니다.
    ///
    /// 갱신 **후**의 문서를 반환합니다.
    pub async fn update_age_by_name(&self, name: &str) -> Result<Person, AppError> {
        self.set_age_by_name(name, AGE_TO_SET).await
    }

    /// 이름이 `name`인 첫 번째 Person(삽입 순서)의 나이를 원자적으로 설정합니다.
    ///
    /// # 에러
    /// - `NotFound`: 해당 이름의 문서가 없음
    pub async fn set_age_by_name(&self, name: &str, age: i64) -> Result<Person, AppError> {
        let person = self
            .run(async {
                let person = sqlx::query_as::<_, Person>(
                    r#"
                    UPDATE people
                    SET age = ?
                    WHERE rowid = (
                        SELECT rowid FROM people WHERE name = ? ORDER BY rowid LIMIT 1
                    )
                    RETURNING id, name, age, favorite_foods
                    "#,
                )
                .bind(age)
                .bind(name)
                .fetch_optional(&self.pool)
                .await?;
                person.ok_or(AppError::NotFound)
            })
            .await?;

        tracing::debug!(id = %person.id, age, "age updated");
        Ok(person)
    }

    // ── 삭제(Delete) ──

    /// id로 Person을 삭제하고, 삭제 직전의 문서를 반환합니다.
    ///
    /// # 에러
    /// - `InvalidId`: UUID 형식이 아님
    /// - `NotFound`: 해당 id의 문서가 없음
    pub async fn delete_by_id(&self, id: &str) -> Result<Person, AppError> {
        let id = parse_id(id)?;
        let removed = self
            .run(async {
                // DELETE ... RETURNING: 삭제된 행의 값을 그대로 돌려받습니다.
                let removed = sqlx::query_as::<_, Person>(
                    "DELETE FROM people WHERE id = ? RETURNING id, name, age, favorite_foods",
                )
                .bind(&id)
                .fetch_optional(&self.pool)
                .await?;
                removed.ok_or(AppError::NotFound)
            })
            .await?;

        tracing::debug!(id = %removed.id, "person deleted");
        Ok(removed)
    }

    /// 이름이 `name`인 모든 Person을 삭제하고 삭제 개수를 반환합니다.
    ///
    /// 일치하는 문서가 없으면 `deleted_count == 0`이며 에러가 아닙니다.
    pub async fn delete_many_by_name(&self, name: &str) -> Result<DeleteSummary, AppError> {
        let summary = self
            .run(async {
                let result = sqlx::query("DELETE FROM people WHERE name = ?")
                    .bind(name)
                    .execute(&self.pool)
                    .await?;
                Ok::<_, AppError>(DeleteSummary {
                    deleted_count: result.rows_affected(),
                })
            })
            .await?;

        tracing::debug!(name, deleted = summary.deleted_count, "people deleted");
        Ok(summary)
    }

    // ── 쿼리 체이닝 ──

    /// [`FOOD_TO_SEARCH`]를 좋아하는 Person을 이름 오름차순으로 최대 2명 조회합니다.
    /// 결과에는 `age`가 없습니다.
    pub async fn query_chained(&self) -> Result<Vec<PersonSummary>, AppError> {
        self.query_chained_for(FOOD_TO_SEARCH).await
    }

    /// 필터(`food` 포함) → 정렬(name ASC) → 제한(2) → 투영(age 제외)
    pub async fn query_chained_for(&self, food: &str) -> Result<Vec<PersonSummary>, AppError> {
        self.run(async {
            let people = sqlx::query_as::<_, PersonSummary>(
                r#"
                SELECT id, name, favorite_foods
                FROM people
                WHERE EXISTS (
                    SELECT 1 FROM json_each(people.favorite_foods)
                    WHERE json_each.value = ?
                )
                ORDER BY name ASC, rowid ASC
                LIMIT ?
                "#,
            )
            .bind(food)
            .bind(QUERY_CHAIN_LIMIT)
            .fetch_all(&self.pool)
            .await?;
            Ok::<_, AppError>(people)
        })
        .await
    }
}

/// Draft 하나를 삽입하고 저장된 문서를 반환합니다.
///
/// 풀과 트랜잭션 모두에서 쓰기 위해 `Executor`에 대해 제네릭입니다.
async fn insert_person<'e, E>(executor: E, draft: &PersonDraft) -> Result<Person, AppError>
where
    E: sqlx::Executor<'e, Database = Sqlite>,
{
    // UUIDv7: 시간 기반이라 생성 순서대로 정렬됩니다.
    let id = Uuid::now_v7().to_string();

    let person = sqlx::query_as::<_, Person>(
        r#"
        INSERT INTO people (id, name, age, favorite_foods)
        VALUES (?, ?, ?, ?)
        RETURNING id, name, age, favorite_foods
        "#,
    )
    .bind(&id)
    .bind(&draft.name)
    .bind(draft.age)
    .bind(Json(&draft.favorite_foods))
    .fetch_one(executor)
    .await?;

    Ok(person)
}

/// 외부에서 받은 id를 저장 형식(소문자 하이픈 UUID)으로 정규화합니다.
fn parse_id(id: &str) -> Result<String, AppError> {
    Uuid::parse_str(id)
        .map(|uuid| uuid.to_string())
        .map_err(|_| AppError::InvalidId(format!("`{id}` is not a valid person id")))
}
