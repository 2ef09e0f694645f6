//! # 데이터 모델 모듈
//!
//! 애플리케이션에서 사용하는 데이터 구조체(struct)들을 정의합니다.
//! - `person`: Person 문서와 그 입력(Draft)/투영(Summary)/삭제 결과 구조체
//!
//! `pub use person::*;`로 재공개하여 `crate::models::Person`처럼 짧게 접근합니다.

pub mod person;

pub use person::*;
