//! 일간 상관 요약 파이프라인 실행 명령어.
//!
//! 가격 CSV 디렉토리를 읽어 수익률 행렬을 구성한 뒤, 적격 날짜마다
//! 상관 요약 레코드를 계산하여 JSON 저장소에 기록합니다.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use indicatif::{ProgressBar, ProgressStyle};
use std::sync::Arc;
use tracing::info;

use corrscan_analytics::{run_daily_summaries, RunOptions, RunReport};
use corrscan_data::{build_return_matrix, filter_date_range, load_price_dir, JsonSummaryStore};

/// 실행 명령어 설정.
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// 가격 CSV 디렉토리
    pub data_dir: String,
    /// 요약 레코드 출력 디렉토리
    pub output_dir: String,
    /// 롤링 윈도우 길이
    pub window: usize,
    /// 배치당 날짜 수
    pub batch_size: usize,
    /// 시작 날짜 (포함)
    pub from: Option<NaiveDate>,
    /// 종료 날짜 (포함)
    pub to: Option<NaiveDate>,
    /// 기존 레코드 삭제 후 전체 재계산 여부
    pub overwrite: bool,
}

/// 전체 파이프라인을 실행합니다.
///
/// 하나라도 실패한 날짜가 있으면 실패 목록을 출력한 뒤 에러를 반환합니다.
pub async fn run_summaries(config: RunConfig) -> Result<RunReport> {
    // 진행률 표시줄
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .unwrap(),
    );
    pb.set_message(format!("Loading price data from {}...", config.data_dir));

    let prices = load_price_dir(&config.data_dir)
        .await
        .with_context(|| format!("Failed to load price data from {}", config.data_dir))?;
    let prices = filter_date_range(prices, config.from, config.to);
    if prices.is_empty() {
        pb.finish_and_clear();
        anyhow::bail!("No price observations in the requested date range");
    }

    let matrix = build_return_matrix(prices).context("Failed to build return matrix")?;
    pb.finish_with_message(format!(
        "Loaded {} tickers, {} return dates",
        matrix.num_tickers(),
        matrix.num_dates()
    ));

    info!(
        data_dir = %config.data_dir,
        output_dir = %config.output_dir,
        window = config.window,
        batch_size = config.batch_size,
        overwrite = config.overwrite,
        "파이프라인 실행 시작"
    );

    let store = JsonSummaryStore::new(&config.output_dir);
    let options = RunOptions {
        window: config.window,
        batch_size: config.batch_size,
        overwrite: config.overwrite,
    };

    let report = run_daily_summaries(Arc::new(matrix), Arc::new(store), options).await?;

    if !report.is_complete() {
        println!("\n실패한 날짜:");
        for failure in &report.failures {
            println!("  {} - {}", failure.date, failure.error);
        }
        anyhow::bail!(
            "{} of {} dates failed",
            report.failures.len(),
            report.stats.total
        );
    }

    Ok(report)
}

/// YYYY-MM-DD 형식의 날짜 문자열을 파싱합니다.
pub fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .with_context(|| format!("Invalid date format: {}. Expected YYYY-MM-DD", s))
}
