//! 일일 요약 레코드 모델.
//!
//! 하루치 상관 구조를 압축한 요약 레코드와 주목할 만한 종목 쌍을 정의합니다.
//! JSON 키는 기존 소비자(대시보드)가 읽는 키 이름을 그대로 따릅니다.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// 주목할 만한 종목 쌍과 그 상관계수.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TickerPair {
    /// 첫 번째 종목
    pub ticker_1: String,
    /// 두 번째 종목
    pub ticker_2: String,
    /// 두 종목 간 상관계수
    pub correlation: f64,
}

/// 하루치 상관 구조 요약 레코드.
///
/// 날짜별로 정확히 하나 생성되며, 생성 이후 불변입니다. 정의된 쌍이
/// 하나도 없는 날에는 집계 필드가 JSON에서 생략됩니다 (0으로 대체하지
/// 않습니다).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailySummaryRecord {
    /// 대상 날짜
    #[serde(rename = "Date")]
    pub date: NaiveDate,

    /// 정의된 쌍 상관계수의 평균
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mean_correlation: Option<f64>,

    /// 정의된 쌍 상관계수의 중앙값
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub median_correlation: Option<f64>,

    /// 정의된 쌍 상관계수의 모표준편차
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub std_correlation: Option<f64>,

    /// 절대값이 0.7을 초과하는 쌍의 비율 (0.0 ~ 1.0)
    #[serde(
        rename = "pct_above_0.7",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub pct_above_0_7: Option<f64>,

    /// 구간화된 상관 분포의 Shannon 엔트로피 (밑 2)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub correlation_entropy: Option<f64>,

    /// 절대값이 0에 가장 가까운 쌍 (|상관| 오름차순, 최대 20개)
    pub top_20_closest_to_zero: Vec<TickerPair>,

    /// 절대값이 ±1에 가장 가까운 쌍 (|상관| 내림차순, 최대 20개)
    pub top_20_closest_to_one: Vec<TickerPair>,

    /// 가장 음의 상관이 강한 쌍 (부호 있는 값 오름차순, 최대 5개)
    pub top_5_most_negative: Vec<TickerPair>,
}

impl DailySummaryRecord {
    /// 정의된 쌍이 하나도 없는 날의 레코드를 생성합니다.
    pub fn degenerate(date: NaiveDate) -> Self {
        Self {
            date,
            mean_correlation: None,
            median_correlation: None,
            std_correlation: None,
            pct_above_0_7: None,
            correlation_entropy: None,
            top_20_closest_to_zero: Vec::new(),
            top_20_closest_to_one: Vec::new(),
            top_5_most_negative: Vec::new(),
        }
    }

    /// 집계 통계가 존재하는지 (정의된 쌍이 있었는지) 여부.
    pub fn has_aggregates(&self) -> bool {
        self.mean_correlation.is_some()
    }
}
