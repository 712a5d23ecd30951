//! 데모용 합성 가격 데이터 생성 명령어.
//!
//! 시드 고정 랜덤워크로 영업일(월~금) 가격 CSV를 종목당 하나씩 생성합니다.
//! 같은 시드는 항상 같은 파일을 만듭니다.

use anyhow::{Context, Result};
use chrono::{Datelike, NaiveDate, Weekday};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::path::Path;
use tracing::info;

/// 데모 데이터 생성 설정.
#[derive(Debug, Clone)]
pub struct DemoDataConfig {
    /// 출력 디렉토리
    pub dir: String,
    /// 종목 수
    pub tickers: usize,
    /// 영업일 수
    pub days: usize,
    /// 랜덤 시드
    pub seed: u64,
}

/// 랜덤워크 가격 CSV를 생성하고 종목 수를 반환합니다.
pub async fn generate_demo_data(config: DemoDataConfig) -> Result<usize> {
    if config.tickers == 0 || config.days == 0 {
        anyhow::bail!("tickers and days must be at least 1");
    }

    tokio::fs::create_dir_all(&config.dir)
        .await
        .with_context(|| format!("Failed to create demo data directory {}", config.dir))?;

    let start = NaiveDate::from_ymd_opt(2024, 1, 2).context("invalid demo start date")?;
    let dates = business_days(start, config.days)?;
    let mut rng = StdRng::seed_from_u64(config.seed);

    for i in 0..config.tickers {
        let ticker = format!("DEMO{:03}", i);
        let mut level: f64 = rng.gen_range(20.0..200.0);

        let mut csv = String::from("Ticker,Date,Price\n");
        for date in &dates {
            level *= 1.0 + rng.gen_range(-0.02..0.02);
            // 드물게 결측 관측치를 남겨 결측 셀 경로도 데모에 포함시킨다
            if rng.gen_bool(0.02) {
                continue;
            }
            csv.push_str(&format!("{},{},{:.4}\n", ticker, date, level));
        }

        let path = Path::new(&config.dir).join(format!("{}.csv", ticker));
        tokio::fs::write(&path, csv)
            .await
            .with_context(|| format!("Failed to write {}", path.display()))?;
    }

    info!(
        tickers = config.tickers,
        days = config.days,
        dir = %config.dir,
        seed = config.seed,
        "데모 데이터 생성 완료"
    );

    Ok(config.tickers)
}

/// 주말을 건너뛴 영업일 `count`개를 생성합니다.
fn business_days(start: NaiveDate, count: usize) -> Result<Vec<NaiveDate>> {
    let mut dates = Vec::with_capacity(count);
    let mut current = start;
    while dates.len() < count {
        if !matches!(current.weekday(), Weekday::Sat | Weekday::Sun) {
            dates.push(current);
        }
        current = current.succ_opt().context("date range overflow")?;
    }
    Ok(dates)
}
