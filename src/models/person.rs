//! # Person 모델 정의
//!
//! `people` 컬렉션에 저장되는 문서와 관련 구조체들입니다.
//!
//! ## 구조체 역할
//! - `Person`: 저장소에 저장된 문서 (응답용)
//! - `PersonDraft`: 아직 저장되지 않은 입력 데이터 (생성 요청 본문)
//! - `PersonSummary`: `age` 필드를 뺀 투영(projection) 결과
//! - `DeleteSummary`: 필터 기반 삭제의 결과 요약
//!
//! JSON 필드 이름은 camelCase입니다 (`favoriteFoods`, `deletedCount`).

use crate::error::AppError;
use serde::{Deserialize, Serialize};

/// Person 문서 — `people` 테이블 한 행(row)에 대응합니다.
///
/// `favorite_foods`는 DB에 JSON 배열 문자열로 저장되며,
/// `#[sqlx(json)]`이 읽을 때 `Vec<String>`으로 역직렬화합니다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Person {
    /// 저장소가 생성 시 발급하는 식별자 (UUIDv7 문자열). 이후 변경되지 않습니다.
    pub id: String,
    /// 이름 (필수, 중복 허용)
    pub name: String,
    /// 나이 (선택)
    pub age: Option<i64>,
    /// 좋아하는 음식 목록. 입력 순서를 그대로 보존합니다.
    #[sqlx(json)]
    pub favorite_foods: Vec<String>,
}

/// 저장 전의 Person 입력 데이터
///
/// `favoriteFoods`가 요청 본문에 없으면 빈 배열로 처리합니다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonDraft {
    pub name: String,
    #[serde(default)]
    pub age: Option<i64>,
    #[serde(default)]
    pub favorite_foods: Vec<String>,
}

impl PersonDraft {
    pub fn new<I, S>(name: impl Into<String>, age: Option<i64>, favorite_foods: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            age,
            favorite_foods: favorite_foods.into_iter().map(Into::into).collect(),
        }
    }

    /// 스키마 검증: `name`은 비어 있으면 안 됩니다.
    ///
    /// 나머지 필드는 타입만 맞으면 통과합니다.
    pub fn validate(&self) -> Result<(), AppError> {
        if self.name.is_empty() {
            return Err(AppError::Validation("name is required".to_string()));
        }
        Ok(())
    }
}

/// `age`를 제외한 Person 투영
///
/// 구조체에 `age` 필드 자체가 없으므로 JSON에도 `age` 키가 나타나지 않습니다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct PersonSummary {
    pub id: String,
    pub name: String,
    #[sqlx(json)]
    pub favorite_foods: Vec<String>,
}

/// 필터 기반 삭제 결과
///
/// 일치하는 문서가 없으면 `deleted_count`가 0이며, 에러가 아닙니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteSummary {
    pub deleted_count: u64,
}

/// `GET /people?name=...`, `DELETE /people?name=...`의 쿼리 문자열
#[derive(Debug, Deserialize)]
pub struct NameQuery {
    pub name: Option<String>,
}
