//! 상관 요약 엔진 CLI.
//!
//! # 사용 예시
//!
//! ```bash
//! # 데모 데이터 생성 후 전체 파이프라인 실행
//! corrscan demo-data -d data/demo --tickers 40 --days 90
//! corrscan run -d data/demo -o daily_correlations_summary_stats -w 20
//!
//! # 특정 구간만 실행 (증분, 기존 레코드는 건너뜀)
//! corrscan run -d data/demo -f 2024-03-01 -t 2024-06-30
//!
//! # 결과 조회
//! corrscan list-dates
//! corrscan show -d 2024-03-15 --format json
//! ```

use clap::{Parser, Subcommand};
use tracing::{error, info};

mod commands;

use commands::demo::{generate_demo_data, DemoDataConfig};
use commands::run::{parse_date, run_summaries, RunConfig};
use commands::show::{list_record_dates, show_record, OutputFormat, ShowConfig};
use corrscan_core::{init_logging, AppConfig, LogConfig};

#[derive(Parser)]
#[command(name = "corrscan")]
#[command(about = "Correlation summary engine CLI - 일간 상관 요약 통계 생성 도구", long_about = None)]
#[command(version)]
struct Cli {
    /// 로그 레벨 (trace, debug, info, warn, error)
    #[arg(long)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// 전체 파이프라인 실행 (가격 로드 → 수익률 → 윈도우 상관 → 요약 저장)
    Run {
        /// 가격 CSV 디렉토리 (기본: 설정 파일 값)
        #[arg(short, long)]
        data_dir: Option<String>,

        /// 요약 레코드 출력 디렉토리 (기본: 설정 파일 값)
        #[arg(short, long)]
        output: Option<String>,

        /// 롤링 윈도우 길이 (선행 거래일 수)
        #[arg(short, long)]
        window: Option<usize>,

        /// 배치당 날짜 수
        #[arg(short, long)]
        batch_size: Option<usize>,

        /// 시작 날짜 (YYYY-MM-DD, 포함)
        #[arg(short = 'f', long)]
        from: Option<String>,

        /// 종료 날짜 (YYYY-MM-DD, 포함)
        #[arg(short, long)]
        to: Option<String>,

        /// 기존 레코드 삭제 후 전체 재계산
        #[arg(long, default_value = "false")]
        overwrite: bool,

        /// 설정 파일 경로 (기본: config/default.toml 탐색)
        #[arg(short, long)]
        config: Option<String>,
    },

    /// 저장된 요약 레코드 하나를 조회
    Show {
        /// 요약 레코드 디렉토리 (기본: 설정 파일 값)
        #[arg(short, long)]
        output: Option<String>,

        /// 조회할 날짜 (YYYY-MM-DD)
        #[arg(short, long)]
        date: String,

        /// 출력 형식 (table, json)
        #[arg(short, long, default_value = "table")]
        format: String,
    },

    /// 저장된 요약 레코드 날짜 목록 조회
    ListDates {
        /// 요약 레코드 디렉토리 (기본: 설정 파일 값)
        #[arg(short, long)]
        output: Option<String>,
    },

    /// 데모용 합성 가격 데이터 생성 (시드 고정 랜덤워크)
    DemoData {
        /// 출력 디렉토리
        #[arg(short, long, default_value = "data/demo")]
        dir: String,

        /// 종목 수
        #[arg(long, default_value = "40")]
        tickers: usize,

        /// 영업일 수
        #[arg(long, default_value = "90")]
        days: usize,

        /// 랜덤 시드
        #[arg(long, default_value = "42")]
        seed: u64,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // .env 파일 로드 (있는 경우)
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    // 설정 로드 (기본값 < 파일 < 환경 변수 < CLI 플래그)
    let app_config = match &cli.command {
        Commands::Run {
            config: Some(path), ..
        } => AppConfig::load(path)?,
        _ => AppConfig::load_default()?,
    };
    app_config.validate()?;

    // 트레이싱 초기화
    let level = cli
        .log_level
        .clone()
        .unwrap_or_else(|| app_config.logging.level.clone());
    init_logging(LogConfig::new(level).with_format(app_config.logging.format.parse()?))?;

    match cli.command {
        Commands::Run {
            data_dir,
            output,
            window,
            batch_size,
            from,
            to,
            overwrite,
            config: _,
        } => {
            let start_date = from.as_ref().map(|d| parse_date(d)).transpose()?;
            let end_date = to.as_ref().map(|d| parse_date(d)).transpose()?;

            if let (Some(start), Some(end)) = (start_date, end_date) {
                if start > end {
                    return Err("Start date must be before end date".into());
                }
            }

            let run_config = RunConfig {
                data_dir: data_dir.unwrap_or_else(|| app_config.data.data_dir.clone()),
                output_dir: output.unwrap_or_else(|| app_config.storage.output_dir.clone()),
                window: window.unwrap_or(app_config.engine.window),
                batch_size: batch_size.unwrap_or(app_config.engine.batch_size),
                from: start_date,
                to: end_date,
                overwrite,
            };

            info!("Output records will be saved to: {}", run_config.output_dir);

            match run_summaries(run_config).await {
                Ok(report) => {
                    info!("✅ Daily summary run completed");
                    println!(
                        "\n일간 요약 실행 완료: 대상 {}일, 생성 {}건, 건너뜀 {}건",
                        report.stats.total, report.stats.success, report.stats.skipped
                    );
                }
                Err(e) => {
                    error!("Daily summary run failed: {}", e);
                    return Err(e.into());
                }
            }
        }

        Commands::Show {
            output,
            date,
            format,
        } => {
            let format = OutputFormat::parse(&format)?;
            let target = parse_date(&date)?;

            let show_config = ShowConfig {
                output_dir: output.unwrap_or_else(|| app_config.storage.output_dir.clone()),
                date: target,
                format,
            };

            match show_record(show_config).await {
                Ok(()) => {
                    info!("✅ Summary record displayed");
                }
                Err(e) => {
                    error!("Show record failed: {}", e);
                    return Err(e.into());
                }
            }
        }

        Commands::ListDates { output } => {
            let output_dir = output.unwrap_or_else(|| app_config.storage.output_dir.clone());

            match list_record_dates(&output_dir).await {
                Ok(count) => {
                    info!("✅ Listed {} summary dates", count);
                }
                Err(e) => {
                    error!("List dates failed: {}", e);
                    return Err(e.into());
                }
            }
        }

        Commands::DemoData {
            dir,
            tickers,
            days,
            seed,
        } => {
            let demo_config = DemoDataConfig {
                dir: dir.clone(),
                tickers,
                days,
                seed,
            };

            match generate_demo_data(demo_config).await {
                Ok(count) => {
                    info!("✅ Generated demo prices for {} tickers", count);
                    println!("\n데모 데이터 생성 완료: {}개 종목, {}일", count, days);
                    println!("저장 위치: {}", dir);
                }
                Err(e) => {
                    error!("Demo data generation failed: {}", e);
                    return Err(e.into());
                }
            }
        }
    }

    Ok(())
}
