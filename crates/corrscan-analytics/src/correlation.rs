//! 상관행렬 계산 모듈.
//!
//! 하나의 롤링 윈도우에 대해 종목 간 Pearson 상관행렬을 계산합니다.
//! 윈도우 내 결측 관측치가 있거나 분산이 0인 종목의 상관계수는
//! 정의되지 않으며 `None`으로 표현됩니다.
//!
//! # 주요 기능
//!
//! - **Pearson 상관계수**: 두 수익률 시계열 간 선형 상관관계 측정
//! - **윈도우 상관행렬**: 윈도우 슬라이스에서 N×N 행렬 계산 (쌍 단위 병렬)
//!
//! # 예시
//!
//! ```rust,ignore
//! use corrscan_analytics::correlation::{calculate_correlation, window_correlation_matrix};
//!
//! let returns_a = vec![0.01, -0.02, 0.015, 0.005];
//! let returns_b = vec![0.008, -0.015, 0.012, 0.003];
//!
//! let corr = calculate_correlation(&returns_a, &returns_b);
//! println!("상관계수: {:.4}", corr.unwrap_or(0.0));
//! ```

use rayon::iter::{IntoParallelRefIterator, ParallelIterator};
use serde::{Deserialize, Serialize};

use corrscan_core::WindowSlice;

/// 한 윈도우의 상관행렬 결과.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorrelationMatrix {
    /// 종목 목록 (행/열 순서)
    pub tickers: Vec<String>,
    /// 상관계수 행렬 (N×N, 대칭). 정의되지 않은 셀은 `None`
    pub values: Vec<Vec<Option<f64>>>,
    /// 윈도우 길이 (일수)
    pub window: usize,
}

impl CorrelationMatrix {
    /// 종목 수.
    pub fn num_tickers(&self) -> usize {
        self.tickers.len()
    }
}

/// Pearson 상관계수 계산.
///
/// 두 수익률 시계열 간의 상관계수를 계산합니다.
///
/// # 인자
///
/// * `x` - 첫 번째 수익률 시계열
/// * `y` - 두 번째 수익률 시계열
///
/// # 반환
///
/// 상관계수 (-1.0 ~ 1.0), 데이터 부족 또는 분산 0 시 None
pub fn calculate_correlation(x: &[f64], y: &[f64]) -> Option<f64> {
    if x.len() != y.len() || x.len() < 2 {
        return None;
    }

    let n = x.len() as f64;

    // 평균 계산
    let mean_x = x.iter().sum::<f64>() / n;
    let mean_y = y.iter().sum::<f64>() / n;

    // 공분산 및 표준편차 계산
    let mut cov = 0.0;
    let mut var_x = 0.0;
    let mut var_y = 0.0;

    for i in 0..x.len() {
        let dx = x[i] - mean_x;
        let dy = y[i] - mean_y;
        cov += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }

    // 표준편차가 0인 경우 (변동 없음)
    if var_x == 0.0 || var_y == 0.0 {
        return None;
    }

    let std_x = var_x.sqrt();
    let std_y = var_y.sqrt();

    Some(cov / (std_x * std_y))
}

/// 평균 제거된 열과 그 노름. 쌍 단위 계산에서 재사용됩니다.
struct PreparedColumn {
    deltas: Vec<f64>,
    norm: f64,
}

/// 열을 평균 제거 형태로 변환합니다. 분산 0이면 None.
fn prepare_column(values: &[f64]) -> Option<PreparedColumn> {
    if values.len() < 2 {
        return None;
    }

    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let deltas: Vec<f64> = values.iter().map(|v| v - mean).collect();
    let square_sum: f64 = deltas.iter().map(|d| d * d).sum();

    if square_sum == 0.0 {
        return None;
    }

    Some(PreparedColumn {
        deltas,
        norm: square_sum.sqrt(),
    })
}

/// 윈도우 슬라이스에서 상관행렬을 계산합니다.
///
/// 각 종목의 열을 평균 제거 형태로 한 번만 준비한 뒤, 상삼각 쌍을
/// rayon으로 병렬 계산하고 대칭으로 채웁니다. 대각선은 항상
/// `Some(1.0)`이며, 사용 불가 종목 (결측 또는 분산 0)이 포함된
/// 비대각 셀은 `None`입니다.
pub fn window_correlation_matrix(slice: &WindowSlice<'_>) -> CorrelationMatrix {
    let n = slice.num_tickers();

    let prepared: Vec<Option<PreparedColumn>> = (0..n)
        .map(|col| slice.column(col).and_then(|v| prepare_column(&v)))
        .collect();

    let mut pairs = Vec::with_capacity(n.saturating_sub(1) * n / 2);
    for i in 0..n {
        for j in (i + 1)..n {
            pairs.push((i, j));
        }
    }

    let coefficients: Vec<(usize, usize, Option<f64>)> = pairs
        .par_iter()
        .map(|&(i, j)| {
            let value = match (&prepared[i], &prepared[j]) {
                (Some(x), Some(y)) => {
                    let mut sum = 0.0;
                    for k in 0..x.deltas.len() {
                        sum += x.deltas[k] * y.deltas[k];
                    }
                    Some(sum / (x.norm * y.norm))
                }
                _ => None,
            };
            (i, j, value)
        })
        .collect();

    let mut values = vec![vec![None; n]; n];
    for (i, row) in values.iter_mut().enumerate() {
        // 자기 자신과의 상관계수는 1.0
        row[i] = Some(1.0);
    }
    for (i, j, value) in coefficients {
        values[i][j] = value;
        values[j][i] = value;
    }

    CorrelationMatrix {
        tickers: slice.tickers().to_vec(),
        values,
        window: slice.len(),
    }
}
