//! 수익률 행렬 도메인 모델.
//!
//! 날짜 × 종목 구조의 일간 수익률 테이블과 롤링 윈도우 슬라이스를 정의합니다.
//! 행렬은 생성 시점에 구조 불변식을 검증하며 이후 불변입니다.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::error::{CorrscanError, CorrscanResult};

/// 날짜 × 종목 수익률 행렬.
///
/// 행은 거래일(엄격한 오름차순), 열은 종목입니다. 셀은 해당 날짜의
/// 일간 수익률이며, 관측치가 없는 경우 `None`입니다.
///
/// # 불변식
///
/// - 날짜 인덱스에 중복이 없고 엄격히 증가합니다.
/// - 종목 식별자는 서로 다릅니다.
/// - 모든 행의 길이는 종목 수와 같습니다.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReturnMatrix {
    dates: Vec<NaiveDate>,
    tickers: Vec<String>,
    values: Vec<Vec<Option<f64>>>,
}

impl ReturnMatrix {
    /// 불변식을 검증하며 수익률 행렬을 생성합니다.
    ///
    /// # 인자
    ///
    /// * `dates` - 거래일 (엄격한 오름차순)
    /// * `tickers` - 종목 식별자 (중복 불가)
    /// * `values` - 행 우선 수익률 (행 수 = 날짜 수, 열 수 = 종목 수)
    pub fn new(
        dates: Vec<NaiveDate>,
        tickers: Vec<String>,
        values: Vec<Vec<Option<f64>>>,
    ) -> CorrscanResult<Self> {
        if let Some(pair) = dates.windows(2).find(|w| w[0] >= w[1]) {
            return Err(CorrscanError::Data(format!(
                "날짜 인덱스가 엄격한 오름차순이 아닙니다: {} >= {}",
                pair[0], pair[1]
            )));
        }

        let mut seen = HashSet::new();
        for ticker in &tickers {
            if !seen.insert(ticker.as_str()) {
                return Err(CorrscanError::Data(format!(
                    "중복된 종목 식별자: {}",
                    ticker
                )));
            }
        }

        if values.len() != dates.len() {
            return Err(CorrscanError::Data(format!(
                "행 수 불일치: 날짜 {}개, 행 {}개",
                dates.len(),
                values.len()
            )));
        }

        if let Some((idx, row)) = values
            .iter()
            .enumerate()
            .find(|(_, row)| row.len() != tickers.len())
        {
            return Err(CorrscanError::Data(format!(
                "{} 행의 길이 불일치: 종목 {}개, 셀 {}개",
                dates[idx],
                tickers.len(),
                row.len()
            )));
        }

        Ok(Self {
            dates,
            tickers,
            values,
        })
    }

    /// 날짜 수를 반환합니다.
    pub fn num_dates(&self) -> usize {
        self.dates.len()
    }

    /// 종목 수를 반환합니다.
    pub fn num_tickers(&self) -> usize {
        self.tickers.len()
    }

    /// 날짜 인덱스를 반환합니다.
    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    /// 종목 목록을 반환합니다.
    pub fn tickers(&self) -> &[String] {
        &self.tickers
    }

    /// 특정 날짜의 행 위치를 반환합니다.
    pub fn position_of(&self, date: NaiveDate) -> Option<usize> {
        self.dates.binary_search(&date).ok()
    }

    /// 요약 계산이 가능한 날짜 목록을 반환합니다.
    ///
    /// `window`개 이상의 선행 관측치를 가진 날짜, 즉 인덱스 `window` 이후의
    /// 모든 날짜입니다. 행렬이 윈도우보다 짧으면 빈 목록을 반환합니다.
    pub fn eligible_dates(&self, window: usize) -> Vec<NaiveDate> {
        if window >= self.dates.len() {
            return Vec::new();
        }
        self.dates[window..].to_vec()
    }

    /// 대상 날짜 직전의 `window`개 행을 슬라이스로 반환합니다.
    ///
    /// 대상 날짜 자신의 행은 윈도우에 포함되지 않습니다. 대상 날짜가
    /// 인덱스에 없거나 선행 행이 부족하면 에러를 반환합니다.
    pub fn window_slice(&self, target: NaiveDate, window: usize) -> CorrscanResult<WindowSlice<'_>> {
        let pos = self.position_of(target).ok_or_else(|| {
            CorrscanError::Window(format!("대상 날짜 {}가 인덱스에 없습니다", target))
        })?;

        if pos < window {
            return Err(CorrscanError::Window(format!(
                "{} 이전의 관측치가 부족합니다: 필요 {}개, 보유 {}개",
                target, window, pos
            )));
        }

        Ok(WindowSlice {
            matrix: self,
            start: pos - window,
            end: pos,
        })
    }
}

/// 수익률 행렬의 연속된 행 구간을 빌려오는 윈도우 슬라이스.
///
/// 하나의 날짜 계산 내에서 생성되고 소비되는 일시적 뷰이며,
/// 원본 행렬을 변경하지 않습니다.
#[derive(Debug, Clone, Copy)]
pub struct WindowSlice<'a> {
    matrix: &'a ReturnMatrix,
    start: usize,
    end: usize,
}

impl<'a> WindowSlice<'a> {
    /// 윈도우에 포함된 행(날짜) 수.
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    /// 윈도우가 비어 있는지 여부.
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// 종목 목록 (부모 행렬과 동일한 순서).
    pub fn tickers(&self) -> &'a [String] {
        &self.matrix.tickers
    }

    /// 종목 수.
    pub fn num_tickers(&self) -> usize {
        self.matrix.tickers.len()
    }

    /// 윈도우에 포함된 날짜들.
    pub fn dates(&self) -> &'a [NaiveDate] {
        &self.matrix.dates[self.start..self.end]
    }

    /// 한 종목의 열을 길이 `len()`의 벡터로 추출합니다.
    ///
    /// 윈도우 내에 결측 관측치가 하나라도 있으면 `None`을 반환합니다.
    pub fn column(&self, col: usize) -> Option<Vec<f64>> {
        let mut out = Vec::with_capacity(self.len());
        for row in self.start..self.end {
            out.push(self.matrix.values[row][col]?);
        }
        Some(out)
    }
}
