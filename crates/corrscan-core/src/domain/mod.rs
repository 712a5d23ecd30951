//! 도메인 모델.
//!
//! 수익률 행렬, 윈도우 슬라이스, 일일 요약 레코드를 정의합니다.

pub mod return_matrix;
pub mod summary;

pub use return_matrix::{ReturnMatrix, WindowSlice};
pub use summary::{DailySummaryRecord, TickerPair};
