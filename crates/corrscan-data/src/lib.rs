//! 데이터 수집 및 저장.
//!
//! 이 crate는 다음을 제공합니다:
//! - 가격 CSV 디렉토리 로더
//! - 일간 수익률 계산 및 수익률 행렬 구성
//! - 일일 요약 레코드 저장소 (날짜별 JSON 파일)

pub mod error;
pub mod loader;
pub mod returns;
pub mod store;

pub use error::{DataError, Result};
pub use loader::{filter_date_range, load_price_dir, parse_price_csv, PriceRecord};
pub use returns::{build_return_matrix, compute_daily_returns, pivot_returns, ReturnRecord};
pub use store::{JsonSummaryStore, SummaryStore};
