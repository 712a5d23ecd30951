//! 저장된 요약 레코드 조회 명령어.

use anyhow::Result;
use chrono::NaiveDate;

use corrscan_core::{DailySummaryRecord, TickerPair};
use corrscan_data::{JsonSummaryStore, SummaryStore};

/// 출력 형식.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Table,
    Json,
}

impl OutputFormat {
    /// 문자열에서 출력 형식 파싱
    pub fn parse(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "table" => Ok(Self::Table),
            "json" => Ok(Self::Json),
            _ => Err(anyhow::anyhow!("Invalid format: {}. Use: table, json", s)),
        }
    }
}

/// 조회 명령어 설정.
#[derive(Debug, Clone)]
pub struct ShowConfig {
    /// 요약 레코드 디렉토리
    pub output_dir: String,
    /// 조회할 날짜
    pub date: NaiveDate,
    /// 출력 형식
    pub format: OutputFormat,
}

/// 날짜 하나의 요약 레코드를 로드하여 출력합니다.
pub async fn show_record(config: ShowConfig) -> Result<()> {
    let store = JsonSummaryStore::new(&config.output_dir);
    let record = store.load(config.date).await?;

    match config.format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&record)?),
        OutputFormat::Table => print_record_table(&record),
    }

    Ok(())
}

/// 저장된 요약 레코드 날짜 목록을 출력하고 개수를 반환합니다.
pub async fn list_record_dates(output_dir: &str) -> Result<usize> {
    let store = JsonSummaryStore::new(output_dir);
    let dates = store.list_dates().await?;

    if dates.is_empty() {
        println!("저장된 요약 레코드가 없습니다: {}", output_dir);
        return Ok(0);
    }

    println!("\n저장된 요약 레코드 ({}건):", dates.len());
    for date in &dates {
        println!("  {}", date);
    }

    Ok(dates.len())
}

fn print_record_table(record: &DailySummaryRecord) {
    println!("\n==== {} 상관 요약 ====", record.date);

    if !record.has_aggregates() {
        println!("정의된 쌍 없음");
        return;
    }

    println!("평균 상관계수:  {}", fmt_stat(record.mean_correlation));
    println!("중앙값:         {}", fmt_stat(record.median_correlation));
    println!("표준편차:       {}", fmt_stat(record.std_correlation));
    println!("|r| > 0.7 비율: {}", fmt_stat(record.pct_above_0_7));
    println!("분포 엔트로피:  {}", fmt_stat(record.correlation_entropy));

    print_pair_section("0에 가장 가까운 쌍", &record.top_20_closest_to_zero);
    print_pair_section("±1에 가장 가까운 쌍", &record.top_20_closest_to_one);
    print_pair_section("가장 음의 상관 쌍", &record.top_5_most_negative);
}

fn print_pair_section(title: &str, pairs: &[TickerPair]) {
    if pairs.is_empty() {
        return;
    }

    println!("\n-- {} ({}개) --", title, pairs.len());
    for pair in pairs {
        println!(
            "  {} / {}: {:+.4}",
            pair.ticker_1, pair.ticker_2, pair.correlation
        );
    }
}

fn fmt_stat(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{:.4}", v),
        None => "-".to_string(),
    }
}
