//! 데이터 모듈 오류 타입.

use corrscan_core::CorrscanError;
use thiserror::Error;

/// 데이터 관련 오류.
#[derive(Debug, Error)]
pub enum DataError {
    /// 파싱 오류
    #[error("Parse error: {0}")]
    ParseError(String),

    /// 잘못된 데이터 형식
    #[error("Invalid data: {0}")]
    InvalidData(String),

    /// 레코드를 찾을 수 없음
    #[error("Record not found: {0}")]
    NotFound(String),

    /// 직렬화/역직렬화 오류
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// 입출력 오류
    #[error("I/O error: {0}")]
    Io(String),
}

impl From<std::io::Error> for DataError {
    fn from(err: std::io::Error) -> Self {
        DataError::Io(err.to_string())
    }
}

impl From<serde_json::Error> for DataError {
    fn from(err: serde_json::Error) -> Self {
        DataError::SerializationError(err.to_string())
    }
}

// 이 변환은 스케줄러가 저장소를 호출하는 경로에서만 쓰이므로,
// 입출력 오류는 엔진 쪽에서 저장소 오류로 분류한다.
impl From<DataError> for CorrscanError {
    fn from(err: DataError) -> Self {
        match err {
            DataError::NotFound(msg) => CorrscanError::NotFound(msg),
            DataError::SerializationError(msg) => CorrscanError::Serialization(msg),
            DataError::Io(msg) => CorrscanError::Storage(msg),
            DataError::ParseError(msg) | DataError::InvalidData(msg) => CorrscanError::Data(msg),
        }
    }
}

pub type Result<T> = std::result::Result<T, DataError>;
