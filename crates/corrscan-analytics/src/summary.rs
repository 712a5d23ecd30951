//! 일간 요약 통계 계산.
//!
//! 쌍 목록에서 분포 통계 (평균, 중앙값, 모표준편차, 고상관 비율,
//! 히스토그램 엔트로피)와 세 가지 top-K 목록을 계산합니다. 모든
//! 통계는 정의된 쌍에 대해서만 계산하며, 미정의 쌍은 어떤 통계에도
//! 0으로 대체되지 않습니다.

use chrono::NaiveDate;
use std::cmp::Ordering;

use corrscan_core::{DailySummaryRecord, TickerPair};

use crate::correlation::CorrelationMatrix;
use crate::pairs::PairCorrelation;

/// 엔트로피 히스토그램 구간 수 ([-1, 1] 균등 분할).
pub const HISTOGRAM_BINS: usize = 50;

/// 고상관 판정 임계값 (|r| 기준, 초과만 집계).
pub const HIGH_CORRELATION_THRESHOLD: f64 = 0.7;

/// 0에 가장 가까운 쌍 목록 크기.
pub const NUM_CLOSEST_TO_ZERO: usize = 20;

/// |r|이 가장 큰 쌍 목록 크기.
pub const NUM_CLOSEST_TO_ONE: usize = 20;

/// 가장 음의 상관이 강한 쌍 목록 크기.
pub const NUM_MOST_NEGATIVE: usize = 5;

/// 한 날짜의 쌍 목록을 요약 레코드로 축약합니다.
///
/// 정의된 쌍이 하나도 없으면 다섯 개의 집계 통계가 모두 비어 있는
/// 퇴화 레코드를 반환합니다. 이 경우에도 레코드 자체는 생성됩니다.
pub fn summarize(
    date: NaiveDate,
    matrix: &CorrelationMatrix,
    pairs: &[PairCorrelation],
) -> DailySummaryRecord {
    // (쌍 열거 순번, 상관계수). 순번은 top-K 동점 처리에 쓰인다
    let defined: Vec<(u32, f64)> = pairs
        .iter()
        .enumerate()
        .filter_map(|(idx, p)| p.value.map(|v| (idx as u32, v)))
        .collect();

    if defined.is_empty() {
        return DailySummaryRecord::degenerate(date);
    }

    let values: Vec<f64> = defined.iter().map(|&(_, v)| v).collect();
    let n = values.len() as f64;

    let mean = values.iter().sum::<f64>() / n;

    let mut sorted = values.clone();
    sorted.sort_unstable_by(|a, b| a.total_cmp(b));
    let median = median_of_sorted(&sorted);

    let variance = values
        .iter()
        .map(|v| {
            let d = v - mean;
            d * d
        })
        .sum::<f64>()
        / n;
    let std = variance.sqrt();

    let above = values
        .iter()
        .filter(|v| v.abs() > HIGH_CORRELATION_THRESHOLD)
        .count();
    let pct_above = above as f64 / n;

    let entropy = correlation_entropy(&values);

    let closest_to_zero = top_k_sorted(
        defined.iter().map(|&(idx, v)| (v.abs(), idx)).collect(),
        NUM_CLOSEST_TO_ZERO,
    );
    let closest_to_one = top_k_sorted(
        defined.iter().map(|&(idx, v)| (-v.abs(), idx)).collect(),
        NUM_CLOSEST_TO_ONE,
    );
    let most_negative = top_k_sorted(
        defined.iter().map(|&(idx, v)| (v, idx)).collect(),
        NUM_MOST_NEGATIVE,
    );

    DailySummaryRecord {
        date,
        mean_correlation: Some(mean),
        median_correlation: Some(median),
        std_correlation: Some(std),
        pct_above_0_7: Some(pct_above),
        correlation_entropy: Some(entropy),
        top_20_closest_to_zero: to_ticker_pairs(&closest_to_zero, &matrix.tickers, pairs),
        top_20_closest_to_one: to_ticker_pairs(&closest_to_one, &matrix.tickers, pairs),
        top_5_most_negative: to_ticker_pairs(&most_negative, &matrix.tickers, pairs),
    }
}

/// 정의된 상관계수 분포의 Shannon 엔트로피 (밑 2).
///
/// [-1, 1] 구간을 [`HISTOGRAM_BINS`]개의 균등 구간으로 나눈
/// 히스토그램에서 계산합니다. 부동소수점 오차로 구간을 살짝 벗어난
/// 값은 양 끝 구간으로 귀속되며, 빈 구간은 합산에서 제외됩니다.
pub fn correlation_entropy(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }

    let mut counts = [0usize; HISTOGRAM_BINS];
    for &v in values {
        let idx = (((v + 1.0) / 2.0) * HISTOGRAM_BINS as f64).floor() as isize;
        let idx = idx.clamp(0, HISTOGRAM_BINS as isize - 1) as usize;
        counts[idx] += 1;
    }

    let n = values.len() as f64;
    let mut entropy = 0.0;
    for &count in &counts {
        if count > 0 {
            let p = count as f64 / n;
            entropy -= p * p.log2();
        }
    }

    entropy
}

/// 키 기준 최소 k개를 정렬된 상태로 선택합니다.
///
/// 전체 정렬 대신 `select_nth_unstable_by`로 k개를 분할한 뒤 그
/// k개만 정렬합니다. 동점은 쌍 순번 오름차순으로 갈립니다.
fn top_k_sorted(mut keyed: Vec<(f64, u32)>, k: usize) -> Vec<(f64, u32)> {
    if k == 0 {
        return Vec::new();
    }

    if keyed.len() > k {
        keyed.select_nth_unstable_by(k - 1, cmp_key);
        keyed.truncate(k);
    }
    keyed.sort_unstable_by(cmp_key);

    keyed
}

fn cmp_key(a: &(f64, u32), b: &(f64, u32)) -> Ordering {
    a.0.total_cmp(&b.0).then_with(|| a.1.cmp(&b.1))
}

fn median_of_sorted(sorted: &[f64]) -> f64 {
    if sorted.is_empty() {
        return 0.0;
    }

    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 1 {
        sorted[mid]
    } else {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    }
}

fn to_ticker_pairs(
    selected: &[(f64, u32)],
    tickers: &[String],
    pairs: &[PairCorrelation],
) -> Vec<TickerPair> {
    selected
        .iter()
        .filter_map(|&(_, idx)| {
            let pair = pairs.get(idx as usize)?;
            let value = pair.value?;
            Some(TickerPair {
                ticker_1: tickers[pair.a].clone(),
                ticker_2: tickers[pair.b].clone(),
                correlation: value,
            })
        })
        .collect()
}
