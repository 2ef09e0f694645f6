//! # 애플리케이션 설정(Configuration) 모듈
//!
//! 환경변수에서 설정값을 읽어오는 모듈입니다.
//! `.env` 파일이나 시스템 환경변수에서 값을 가져옵니다.
//!
//! 설정 항목:
//! - `DATABASE_URL`: 문서 저장소(SQLite) 연결 문자열
//! - `HOST`: 서버 바인딩 주소
//! - `PORT`: 서버 포트 번호
//!
//! 필수 항목은 없습니다. `DATABASE_URL`이 없으면 경고 로그만 남기고
//! 기본 경로로 계속 시작합니다.

use std::env;

/// `DATABASE_URL`이 없을 때 사용하는 연결 문자열
/// `mode=rwc`: 파일이 없으면 새로 만듭니다 (read-write-create).
pub const DEFAULT_DATABASE_URL: &str = "sqlite:data/people.db?mode=rwc";
pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 3000;

/// 애플리케이션 전체 설정을 담는 구조체
#[derive(Debug, Clone)]
pub struct Config {
    /// 저장소 연결 문자열 (예: "sqlite:data/people.db")
    pub database_url: String,
    /// 서버가 바인딩할 호스트 주소
    pub host: String,
    /// 서버 포트 번호
    pub port: u16,
}

impl Config {
    /// 프로세스 환경변수에서 설정을 읽습니다.
    ///
    /// 연결 문자열이 없어도 에러가 아닙니다. 경고를 남기고 기본값을 씁니다.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// 임의의 조회 함수로 설정을 구성합니다.
    ///
    /// `lookup`은 키를 받아 값이 있으면 `Some`을 돌려주는 클로저입니다.
    /// 테스트에서는 HashMap 기반 클로저를 넘겨 전역 환경변수를 건드리지 않습니다.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        // 빈 문자열도 "정의되지 않음"으로 취급합니다.
        let database_url = match lookup("DATABASE_URL").filter(|v| !v.trim().is_empty()) {
            Some(url) => url,
            None => {
                tracing::warn!(
                    "DATABASE_URL is not set, falling back to {}",
                    DEFAULT_DATABASE_URL
                );
                DEFAULT_DATABASE_URL.to_string()
            }
        };

        Self {
            database_url,
            host: lookup("HOST").unwrap_or_else(|| DEFAULT_HOST.to_string()),
            // 파싱 실패 시에도 기본 포트를 사용합니다.
            port: lookup("PORT")
                .and_then(|p| p.parse().ok())
                .unwrap_or(DEFAULT_PORT),
        }
    }

    /// `host:port` 형태의 바인딩 주소
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Config {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn missing_database_url_falls_back_to_default() {
        let config = config_from(&[]);
        assert_eq!(config.database_url, DEFAULT_DATABASE_URL);
        assert_eq!(config.bind_addr(), "0.0.0.0:3000");
    }

    #[test]
    fn blank_database_url_is_treated_as_missing() {
        let config = config_from(&[("DATABASE_URL", "  ")]);
        assert_eq!(config.database_url, DEFAULT_DATABASE_URL);
    }

    #[test]
    fn reads_values_and_ignores_bad_port() {
        let config = config_from(&[
            ("DATABASE_URL", "sqlite::memory:"),
            ("HOST", "127.0.0.1"),
            ("PORT", "not-a-port"),
        ]);
        assert_eq!(config.database_url, "sqlite::memory:");
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.port, DEFAULT_PORT);
    }
}
