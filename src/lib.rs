//! # person-store
//!
//! `people` 문서 컬렉션에 대한 기본 CRUD 작업(생성, 조회, 수정, 삭제, 쿼리 체이닝)을
//! 제공하는 데이터 접근 크레이트입니다.
//!
//! - `db::PersonRepository`: 10가지 저장소 작업
//! - `routes`: 같은 작업을 HTTP(`/api/v1`)로 노출하는 axum 핸들러
//!
//! ```no_run
//! use person_store::{db, models::PersonDraft, PersonRepository};
//!
//! # async fn demo() -> Result<(), person_store::AppError> {
//! let pool = db::connect_lazy("sqlite:data/people.db?mode=rwc")?;
//! db::migrate(&pool).await?;
//!
//! let people = PersonRepository::new(pool);
//! let juan = people
//!     .create(&PersonDraft::new("Juan", Some(20), ["completo"]))
//!     .await?;
//! let juan = people.fetch_append_food_save(&juan.id).await?;
//! assert_eq!(juan.favorite_foods, ["completo", "hamburger"]);
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod routes;

pub use config::Config;
pub use db::PersonRepository;
pub use error::AppError;
