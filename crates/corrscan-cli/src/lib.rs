//! CLI 도구 모음.
//!
//! 이 crate는 다음 기능을 제공합니다:
//! - 일간 상관 요약 실행 파이프라인
//! - 저장된 요약 레코드 조회
//! - 데모 데이터 생성

pub mod commands;

pub use commands::*;
