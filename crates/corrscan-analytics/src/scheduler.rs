//! 일간 요약 배치 스케줄러.
//!
//! 적격 날짜들을 날짜 순 배치로 묶고, 배치 내 날짜들을 병렬로
//! 계산한 뒤 저장소에 기록합니다. 상관행렬 계산은 블로킹 풀에서,
//! 저장은 비동기로 수행합니다. 한 날짜의 실패는 해당 날짜의 실패로만
//! 기록되며 나머지 날짜 처리를 중단시키지 않습니다.

use chrono::NaiveDate;
use futures::future::join_all;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

use corrscan_core::{
    batch_span, CorrscanError, CorrscanResult, DailySummaryRecord, ReturnMatrix,
};
use corrscan_data::SummaryStore;

use crate::correlation::window_correlation_matrix;
use crate::pairs::upper_triangle_pairs;
use crate::stats::RunStats;
use crate::summary::summarize;

/// 일간 요약 실행 옵션.
#[derive(Debug, Clone)]
pub struct RunOptions {
    /// 롤링 윈도우 길이 (일)
    pub window: usize,
    /// 배치당 날짜 수
    pub batch_size: usize,
    /// 기존 레코드를 지우고 전체를 다시 계산할지 여부
    pub overwrite: bool,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            window: 20,
            batch_size: 50,
            overwrite: false,
        }
    }
}

/// 단일 날짜 처리 실패.
#[derive(Debug)]
pub struct DateFailure {
    /// 실패한 대상 날짜
    pub date: NaiveDate,
    /// 실패 원인
    pub error: CorrscanError,
}

/// 전체 실행 결과.
#[derive(Debug)]
pub struct RunReport {
    /// 실행 통계
    pub stats: RunStats,
    /// 날짜별 실패 목록 (실패가 없으면 비어 있음)
    pub failures: Vec<DateFailure>,
}

impl RunReport {
    /// 모든 적격 날짜가 실패 없이 처리되었는지 여부.
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

/// 한 날짜의 요약 레코드를 계산합니다.
///
/// 윈도우 추출, 상관행렬, 쌍 축소, 요약 통계까지의 순수 계산
/// 파이프라인입니다. 저장소에는 접근하지 않습니다.
pub fn compute_daily_summary(
    matrix: &ReturnMatrix,
    date: NaiveDate,
    window: usize,
) -> CorrscanResult<DailySummaryRecord> {
    let slice = matrix.window_slice(date, window)?;
    let corr = window_correlation_matrix(&slice);
    let pairs = upper_triangle_pairs(&corr);
    Ok(summarize(date, &corr, &pairs))
}

/// 모든 적격 날짜의 요약 레코드를 계산해 저장합니다.
///
/// 기본 동작은 증분 실행으로, 저장소에 이미 레코드가 있는 날짜는
/// 건너뜁니다. `overwrite`가 설정되면 시작 전에 기존 레코드를 모두
/// 삭제하고 전체를 다시 계산합니다.
///
/// 배치 크기는 동시 실행 정도만 제어하며 결과 레코드의 내용에는
/// 영향을 주지 않습니다.
pub async fn run_daily_summaries<S>(
    matrix: Arc<ReturnMatrix>,
    store: Arc<S>,
    options: RunOptions,
) -> CorrscanResult<RunReport>
where
    S: SummaryStore + ?Sized + 'static,
{
    if options.window == 0 {
        return Err(CorrscanError::InvalidInput(
            "윈도우 길이는 1 이상이어야 합니다".to_string(),
        ));
    }
    if options.batch_size == 0 {
        return Err(CorrscanError::InvalidInput(
            "배치 크기는 1 이상이어야 합니다".to_string(),
        ));
    }

    let started = Instant::now();
    let mut stats = RunStats::new();
    let mut failures = Vec::new();

    if options.overwrite {
        let removed = store.clear().await?;
        if removed > 0 {
            info!(removed = removed, "덮어쓰기 모드: 기존 레코드 삭제");
        }
    }

    let eligible = matrix.eligible_dates(options.window);
    stats.total = eligible.len();

    info!(
        tickers = matrix.num_tickers(),
        dates = matrix.num_dates(),
        eligible = eligible.len(),
        window = options.window,
        batch_size = options.batch_size,
        "일간 요약 실행 시작"
    );

    for (batch_idx, chunk) in eligible.chunks(options.batch_size).enumerate() {
        let batch = batch_idx + 1;
        debug!(batch = batch, dates = chunk.len(), "배치 처리 시작");

        let mut handles: Vec<(NaiveDate, tokio::task::JoinHandle<CorrscanResult<bool>>)> =
            Vec::with_capacity(chunk.len());

        for &date in chunk {
            let matrix = Arc::clone(&matrix);
            let store = Arc::clone(&store);
            let window = options.window;
            let overwrite = options.overwrite;

            let handle = tokio::spawn(async move {
                if !overwrite && store.has_record(date).await? {
                    return Ok(false);
                }

                let record = tokio::task::spawn_blocking(move || {
                    let span = batch_span!("compute_daily_summary", date, batch);
                    let _enter = span.enter();
                    compute_daily_summary(&matrix, date, window)
                })
                .await
                .map_err(|e| CorrscanError::Internal(format!("계산 작업 패닉: {}", e)))??;

                store.save(&record).await?;
                Ok(true)
            });

            handles.push((date, handle));
        }

        let (dates, futs): (Vec<_>, Vec<_>) = handles.into_iter().unzip();
        let joined = join_all(futs).await;

        for (date, joined_result) in dates.into_iter().zip(joined) {
            match joined_result {
                Ok(Ok(true)) => stats.success += 1,
                Ok(Ok(false)) => {
                    debug!(date = %date, "기존 레코드 존재, 건너뜀");
                    stats.skipped += 1;
                }
                Ok(Err(error)) => {
                    warn!(date = %date, error = %error, "날짜 처리 실패");
                    stats.errors += 1;
                    failures.push(DateFailure { date, error });
                }
                Err(join_error) => {
                    warn!(date = %date, error = %join_error, "작업 패닉");
                    stats.errors += 1;
                    failures.push(DateFailure {
                        date,
                        error: CorrscanError::Internal(format!("작업 패닉: {}", join_error)),
                    });
                }
            }
        }
    }

    stats.elapsed = started.elapsed();
    stats.log_summary("일간 상관 요약");

    Ok(RunReport { stats, failures })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_matrix(n_dates: usize, n_tickers: usize) -> ReturnMatrix {
        let base = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let dates: Vec<NaiveDate> = (0..n_dates)
            .map(|i| base + chrono::Duration::days(i as i64))
            .collect();
        let tickers: Vec<String> = (0..n_tickers).map(|i| format!("T{}", i)).collect();
        // 행/열 인덱스 조합으로 분산이 0이 아닌 값을 만든다
        let values: Vec<Vec<Option<f64>>> = (0..n_dates)
            .map(|row| {
                (0..n_tickers)
                    .map(|col| Some(((row * 7 + col * 3) % 11) as f64 / 100.0 - 0.05))
                    .collect()
            })
            .collect();
        ReturnMatrix::new(dates, tickers, values).unwrap()
    }

    #[test]
    fn test_run_options_defaults() {
        let options = RunOptions::default();
        assert_eq!(options.window, 20);
        assert_eq!(options.batch_size, 50);
        assert!(!options.overwrite);
    }

    #[test]
    fn test_compute_daily_summary_produces_record() {
        let matrix = make_matrix(10, 4);
        let target = matrix.dates()[5];
        let record = compute_daily_summary(&matrix, target, 5).unwrap();

        assert_eq!(record.date, target);
        assert!(record.has_aggregates());
    }

    #[test]
    fn test_compute_daily_summary_unknown_date() {
        let matrix = make_matrix(10, 4);
        let unknown = NaiveDate::from_ymd_opt(1999, 1, 1).unwrap();
        let result = compute_daily_summary(&matrix, unknown, 5);
        assert!(matches!(result, Err(CorrscanError::Window(_))));
    }

    #[test]
    fn test_compute_daily_summary_insufficient_history() {
        let matrix = make_matrix(10, 4);
        let early = matrix.dates()[2];
        let result = compute_daily_summary(&matrix, early, 5);
        assert!(matches!(result, Err(CorrscanError::Window(_))));
    }
}
