//! 롤링 상관 분석 엔진.
//!
//! 이 크레이트는 다음을 제공합니다:
//! - 윈도우 상관행렬 계산 (rayon 병렬)
//! - 상삼각 쌍 축소
//! - 일간 요약 통계 (평균/중앙값/표준편차/엔트로피/top-K)
//! - 배치 스케줄러와 실행 통계
//!
//! # Re-exports
//!
//! - [`correlation`]: 상관행렬 계산 (CorrelationMatrix 등)
//! - [`summary`]: 요약 통계 계산 (summarize, correlation_entropy 등)
//! - [`scheduler`]: 배치 실행 (run_daily_summaries, RunOptions 등)

pub mod correlation;
pub mod pairs;
pub mod scheduler;
pub mod stats;
pub mod summary;

// Correlation 모듈 re-exports
pub use correlation::{calculate_correlation, window_correlation_matrix, CorrelationMatrix};

// Pairs 모듈 re-exports
pub use pairs::{upper_triangle_pairs, PairCorrelation};

// Summary 모듈 re-exports
pub use summary::{
    correlation_entropy, summarize, HIGH_CORRELATION_THRESHOLD, HISTOGRAM_BINS,
    NUM_CLOSEST_TO_ONE, NUM_CLOSEST_TO_ZERO, NUM_MOST_NEGATIVE,
};

// Scheduler 모듈 re-exports
pub use scheduler::{
    compute_daily_summary, run_daily_summaries, DateFailure, RunOptions, RunReport,
};

// Stats re-export
pub use stats::RunStats;
