//! # 데이터베이스 접근 계층 (Data Access Layer)
//!
//! 문서 저장소(SQLite)와 직접 상호작용하는 코드를 모아둔 모듈입니다.
//!
//! - 이 파일: 연결 풀 생성, 연결 확인, 마이그레이션 실행
//! - `people`: `people` 컬렉션에 대한 `PersonRepository`
//!
//! 연결은 전역 싱글톤이 아니라 `main`에서 명시적으로 만들어
//! 저장소 객체에 넘겨줍니다.

pub mod people;

pub use people::*;

use crate::error::AppError;
use sqlx::sqlite::{SqlitePool, SqlitePoolOptions};

/// 연결 풀의 최대 연결 수
const MAX_CONNECTIONS: u32 = 5;

/// 연결 문자열로 **지연(lazy)** 연결 풀을 만듭니다.
///
/// `connect_lazy`는 실제 연결을 첫 쿼리 시점까지 미룹니다.
/// 저장소에 닿지 못해도 프로세스는 계속 실행되고, 이후 각 작업이
/// `AppError::Database`로 실패합니다.
///
/// # 에러
/// 연결 문자열 자체를 해석할 수 없을 때만 에러를 반환합니다.
pub fn connect_lazy(database_url: &str) -> Result<SqlitePool, AppError> {
    let pool = SqlitePoolOptions::new()
        .max_connections(MAX_CONNECTIONS)
        .connect_lazy(database_url)?;
    Ok(pool)
}

/// 임베드된 마이그레이션(./migrations)을 실행합니다.
///
/// 아직 적용되지 않은 마이그레이션만 순서대로 실행되므로 여러 번 호출해도 안전합니다.
pub async fn migrate(pool: &SqlitePool) -> Result<(), AppError> {
    sqlx::migrate!("./migrations").run(pool).await?;
    Ok(())
}

/// 시작 시 저장소 연결을 확인하고 스키마를 준비합니다.
///
/// 연결 이벤트를 로그로 남깁니다:
/// - 성공: `info` 레벨 "store connected"
/// - 실패: `error` 레벨 "store connection error"
///
/// 실패는 이 연결 시도에 대해서만 치명적입니다. 에러를 호출자에게 돌려주되,
/// `main`은 이를 기록만 하고 서버를 계속 띄웁니다.
pub async fn bootstrap(pool: &SqlitePool) -> Result<(), AppError> {
    // DB 파일이 들어갈 디렉토리가 없으면 SQLite가 파일을 열지 못하므로 먼저 만듭니다.
    if let Err(e) = ensure_parent_dir(pool).await {
        tracing::error!("store connection error: {}", e);
        return Err(e.into());
    }

    // 풀에서 연결 하나를 빌려 실제로 닿는지 확인합니다.
    match pool.acquire().await {
        Ok(_conn) => tracing::info!("store connected"),
        Err(e) => {
            tracing::error!("store connection error: {}", e);
            return Err(e.into());
        }
    }

    tracing::info!("Running database migrations...");
    if let Err(e) = migrate(pool).await {
        tracing::error!("store migration error: {}", e);
        return Err(e);
    }

    Ok(())
}

/// 파일 기반 DB의 상위 디렉토리를 만듭니다 (`mkdir -p`와 같음).
///
/// 메모리 DB이거나 상위 경로가 비어 있으면(현재 디렉토리) 아무것도 하지 않습니다.
async fn ensure_parent_dir(pool: &SqlitePool) -> std::io::Result<()> {
    let options = pool.connect_options();
    let filename = options.get_filename();
    if filename.as_os_str() == ":memory:" || filename.to_string_lossy().starts_with("file:") {
        return Ok(());
    }

    match filename.parent() {
        Some(parent) if !parent.as_os_str().is_empty() && !parent.exists() => {
            tokio::fs::create_dir_all(parent).await?;
            tracing::info!("Created store directory: {}", parent.display());
            Ok(())
        }
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn connect_lazy_rejects_unknown_open_mode() {
        assert!(connect_lazy("sqlite:people.db?mode=bogus").is_err());
    }

    #[tokio::test]
    async fn bootstrap_prepares_in_memory_store() {
        let pool = connect_lazy("sqlite::memory:").unwrap();
        // 메모리 DB는 연결마다 별개이므로 하나의 연결로 확인만 합니다.
        bootstrap(&pool).await.unwrap();
    }

    #[tokio::test]
    async fn bootstrap_creates_missing_store_directory() {
        let dir = tempfile::tempdir().unwrap();
        let db_path = dir.path().join("data").join("nested").join("people.db");
        assert!(!db_path.parent().unwrap().exists());

        let url = format!("sqlite:{}?mode=rwc", db_path.display());
        let pool = connect_lazy(&url).unwrap();
        bootstrap(&pool).await.unwrap();

        assert!(db_path.exists());
        pool.close().await;
    }
}
