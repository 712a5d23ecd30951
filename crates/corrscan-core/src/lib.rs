//! # CorrScan Core
//!
//! 롤링 윈도우 상관계수 요약 엔진의 핵심 도메인 모델 및 타입을 제공합니다.
//!
//! 이 크레이트는 시스템 전반에서 사용되는 기본 타입을 제공합니다:
//! - 수익률 행렬 및 윈도우 슬라이스
//! - 일일 요약 레코드
//! - 설정 관리
//! - 로깅 인프라
//! - 에러 타입

pub mod config;
pub mod domain;
pub mod error;
pub mod logging;

pub use config::*;
pub use domain::*;
pub use error::*;
pub use logging::*;
