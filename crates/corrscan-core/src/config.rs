//! 설정 관리.
//!
//! 이 모듈은 애플리케이션 설정을 정의하고 관리합니다.
//! 우선순위: 내장 기본값 < TOML 파일 < 환경 변수 (`CORRSCAN__` 접두사).

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{CorrscanError, CorrscanResult};

/// 애플리케이션 설정.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AppConfig {
    /// 입력 데이터 설정
    #[serde(default)]
    pub data: DataConfig,
    /// 엔진 설정
    #[serde(default)]
    pub engine: EngineConfig,
    /// 저장소 설정
    #[serde(default)]
    pub storage: StorageConfig,
    /// 로깅 설정
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// 입력 데이터 설정.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DataConfig {
    /// 가격 CSV 파일이 있는 디렉토리
    pub data_dir: String,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            data_dir: "data".to_string(),
        }
    }
}

/// 롤링 윈도우 엔진 설정.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct EngineConfig {
    /// 롤링 윈도우 길이 (선행 거래일 수)
    pub window: usize,
    /// 배치당 날짜 수 (클수록 메모리 사용이 늘고 실행 시간이 줄어듭니다)
    pub batch_size: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            window: 20,
            batch_size: 50,
        }
    }
}

impl EngineConfig {
    /// 엔진 설정 값을 검증합니다.
    pub fn validate(&self) -> CorrscanResult<()> {
        if self.window == 0 {
            return Err(CorrscanError::Config(
                "윈도우 길이는 1 이상이어야 합니다".to_string(),
            ));
        }
        if self.batch_size == 0 {
            return Err(CorrscanError::Config(
                "배치 크기는 1 이상이어야 합니다".to_string(),
            ));
        }
        Ok(())
    }
}

/// 요약 레코드 저장소 설정.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StorageConfig {
    /// 일일 요약 레코드가 저장될 디렉토리
    pub output_dir: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            output_dir: "daily_correlations_summary_stats".to_string(),
        }
    }
}

/// 로깅 설정.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    /// 로그 레벨
    pub level: String,
    /// 로그 형식 (pretty, json, compact)
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}

impl AppConfig {
    /// 파일과 환경 변수에서 설정을 로드합니다.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, config::ConfigError> {
        Self::load_inner(config::File::from(path.as_ref()))
    }

    /// 기본 경로에서 설정을 로드합니다.
    ///
    /// `config/default.toml`이 없으면 내장 기본값과 환경 변수만 사용합니다.
    pub fn load_default() -> Result<Self, config::ConfigError> {
        Self::load_inner(config::File::with_name("config/default").required(false))
    }

    fn load_inner(file: config::File<config::FileSourceFile, config::FileFormat>) -> Result<Self, config::ConfigError> {
        let builder = config::Config::builder()
            // 기본값으로 시작
            .set_default("data.data_dir", "data")?
            .set_default("engine.window", 20)?
            .set_default("engine.batch_size", 50)?
            .set_default("storage.output_dir", "daily_correlations_summary_stats")?
            .set_default("logging.level", "info")?
            .set_default("logging.format", "pretty")?
            // 파일에서 로드
            .add_source(file)
            // 환경 변수로 오버라이드
            .add_source(
                config::Environment::with_prefix("CORRSCAN")
                    .separator("__")
                    .try_parsing(true),
            );

        let config = builder.build()?;
        config.try_deserialize()
    }

    /// 설정 전체를 검증합니다.
    pub fn validate(&self) -> CorrscanResult<()> {
        self.engine.validate()
    }
}
