//! 상관 분석 시스템의 에러 타입.
//!
//! 이 모듈은 시스템 전반에서 사용되는 에러 타입을 정의합니다.

use thiserror::Error;

/// 핵심 엔진 에러.
#[derive(Debug, Error)]
pub enum CorrscanError {
    /// 설정 에러
    #[error("설정 에러: {0}")]
    Config(String),

    /// 데이터 에러 (행렬 구조 위반 등)
    #[error("데이터 에러: {0}")]
    Data(String),

    /// 윈도우 추출 에러
    #[error("윈도우 에러: {0}")]
    Window(String),

    /// 계산 에러
    #[error("계산 에러: {0}")]
    Computation(String),

    /// 저장소 에러
    #[error("저장소 에러: {0}")]
    Storage(String),

    /// 직렬화 에러
    #[error("직렬화 에러: {0}")]
    Serialization(String),

    /// 입출력 에러
    #[error("입출력 에러: {0}")]
    Io(String),

    /// 잘못된 입력
    #[error("잘못된 입력: {0}")]
    InvalidInput(String),

    /// 찾을 수 없음
    #[error("찾을 수 없음: {0}")]
    NotFound(String),

    /// 내부 에러
    #[error("내부 에러: {0}")]
    Internal(String),
}

/// 상관 분석 작업을 위한 Result 타입.
pub type CorrscanResult<T> = Result<T, CorrscanError>;

impl CorrscanError {
    /// 재시도 가능한 에러인지 확인합니다.
    ///
    /// 날짜별 재계산은 순수 함수이므로 저장/입출력 실패는 재시도해도 안전합니다.
    pub fn is_retryable(&self) -> bool {
        matches!(self, CorrscanError::Storage(_) | CorrscanError::Io(_))
    }

    /// 실행 전체를 중단해야 하는 에러인지 확인합니다.
    pub fn is_critical(&self) -> bool {
        matches!(
            self,
            CorrscanError::Config(_) | CorrscanError::InvalidInput(_)
        )
    }
}

impl From<serde_json::Error> for CorrscanError {
    fn from(err: serde_json::Error) -> Self {
        CorrscanError::Serialization(err.to_string())
    }
}

impl From<std::io::Error> for CorrscanError {
    fn from(err: std::io::Error) -> Self {
        CorrscanError::Io(err.to_string())
    }
}
