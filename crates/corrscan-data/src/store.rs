//! 일간 요약 레코드 저장소.
//!
//! 날짜별 요약 레코드를 저장/조회하는 [`SummaryStore`] 트레잇과
//! JSON 파일 기반 구현을 제공합니다. 파일명은
//! `correlation_summary_YYYY-MM-DD.json` 형식으로 고정되어 있어
//! 외부 소비자가 날짜로 직접 찾을 수 있습니다.

use async_trait::async_trait;
use chrono::NaiveDate;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use corrscan_core::DailySummaryRecord;

use crate::error::{DataError, Result};

/// 요약 레코드 파일명 접두사.
pub const RECORD_PREFIX: &str = "correlation_summary_";

/// 요약 레코드 파일 확장자.
pub const RECORD_EXT: &str = ".json";

/// 일간 요약 레코드 저장소 트레잇.
///
/// 스케줄러는 이 트레잇을 통해서만 저장소에 접근하므로, 테스트에서
/// 실패를 주입하거나 메모리 구현으로 대체할 수 있습니다.
#[async_trait]
pub trait SummaryStore: Send + Sync {
    /// 요약 레코드 저장. 같은 날짜의 기존 레코드는 덮어씁니다.
    async fn save(&self, record: &DailySummaryRecord) -> Result<()>;

    /// 특정 날짜의 요약 레코드 조회.
    async fn load(&self, date: NaiveDate) -> Result<DailySummaryRecord>;

    /// 저장된 레코드의 날짜 목록 (오름차순).
    async fn list_dates(&self) -> Result<Vec<NaiveDate>>;

    /// 특정 날짜의 레코드 존재 여부.
    async fn has_record(&self, date: NaiveDate) -> Result<bool>;

    /// 모든 요약 레코드 삭제. 삭제된 레코드 수를 반환합니다.
    async fn clear(&self) -> Result<usize>;
}

/// 디렉토리 하나에 날짜별 JSON 파일을 쓰는 저장소.
#[derive(Debug, Clone)]
pub struct JsonSummaryStore {
    root: PathBuf,
}

impl JsonSummaryStore {
    /// 지정한 디렉토리를 루트로 하는 저장소를 생성합니다.
    ///
    /// 디렉토리는 첫 저장 시점에 생성됩니다.
    pub fn new<P: Into<PathBuf>>(root: P) -> Self {
        Self { root: root.into() }
    }

    /// 저장소 루트 디렉토리.
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn record_path(&self, date: NaiveDate) -> PathBuf {
        self.root
            .join(format!("{}{}{}", RECORD_PREFIX, date.format("%Y-%m-%d"), RECORD_EXT))
    }

    fn parse_record_filename(name: &str) -> Option<NaiveDate> {
        let stem = name.strip_prefix(RECORD_PREFIX)?.strip_suffix(RECORD_EXT)?;
        NaiveDate::parse_from_str(stem, "%Y-%m-%d").ok()
    }
}

#[async_trait]
impl SummaryStore for JsonSummaryStore {
    async fn save(&self, record: &DailySummaryRecord) -> Result<()> {
        tokio::fs::create_dir_all(&self.root).await?;

        let path = self.record_path(record.date);
        let body = serde_json::to_vec_pretty(record)?;
        tokio::fs::write(&path, body).await?;

        debug!(date = %record.date, path = %path.display(), "요약 레코드 저장");
        Ok(())
    }

    async fn load(&self, date: NaiveDate) -> Result<DailySummaryRecord> {
        let path = self.record_path(date);
        let body = match tokio::fs::read(&path).await {
            Ok(body) => body,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(DataError::NotFound(format!(
                    "no summary record for {}",
                    date
                )));
            }
            Err(e) => return Err(e.into()),
        };

        Ok(serde_json::from_slice(&body)?)
    }

    async fn list_dates(&self) -> Result<Vec<NaiveDate>> {
        let mut entries = match tokio::fs::read_dir(&self.root).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut dates = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            if let Some(name) = entry.file_name().to_str() {
                if let Some(date) = Self::parse_record_filename(name) {
                    dates.push(date);
                }
            }
        }
        dates.sort();

        Ok(dates)
    }

    async fn has_record(&self, date: NaiveDate) -> Result<bool> {
        match tokio::fs::metadata(self.record_path(date)).await {
            Ok(_) => Ok(true),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    async fn clear(&self) -> Result<usize> {
        let dates = self.list_dates().await?;
        for date in &dates {
            tokio::fs::remove_file(self.record_path(*date)).await?;
        }

        if !dates.is_empty() {
            info!(removed = dates.len(), root = %self.root.display(), "기존 요약 레코드 삭제 완료");
        }

        Ok(dates.len())
    }
}
