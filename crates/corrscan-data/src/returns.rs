//! 가격 → 일간 수익률 변환.
//!
//! 가격 레코드를 종목별 단순 수익률로 변환하고, 날짜 × 종목 격자로
//! 피벗해 [`ReturnMatrix`]를 만듭니다. 각 종목의 첫 관측치는 직전
//! 가격이 없으므로 수익률을 만들지 않습니다.

use chrono::NaiveDate;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};
use tracing::{debug, warn};

use corrscan_core::ReturnMatrix;

use crate::error::{DataError, Result};
use crate::loader::PriceRecord;

/// 단일 종목의 하루 수익률.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReturnRecord {
    /// 종목 식별자
    pub ticker: String,
    /// 수익률이 실현된 날짜
    pub date: NaiveDate,
    /// 단순 수익률 (p_t - p_{t-1}) / p_{t-1}
    pub value: f64,
}

/// 가격 레코드를 종목별 일간 수익률로 변환합니다.
///
/// 입력 순서는 무관하며 내부에서 (종목, 날짜) 순으로 정렬합니다.
/// 각 종목의 첫 관측치는 수익률 없이 소비됩니다.
pub fn compute_daily_returns(mut prices: Vec<PriceRecord>) -> Vec<ReturnRecord> {
    prices.sort_by(|a, b| a.ticker.cmp(&b.ticker).then(a.date.cmp(&b.date)));

    let mut returns = Vec::new();
    let mut prev: Option<(&str, f64)> = None;

    for record in &prices {
        let price = record.price.to_f64().unwrap_or(0.0);

        if let Some((prev_ticker, prev_price)) = prev {
            if prev_ticker == record.ticker && prev_price > 0.0 {
                returns.push(ReturnRecord {
                    ticker: record.ticker.clone(),
                    date: record.date,
                    value: (price - prev_price) / prev_price,
                });
            }
        }

        prev = Some((&record.ticker, price));
    }

    debug!(
        prices = prices.len(),
        returns = returns.len(),
        "일간 수익률 계산 완료"
    );

    returns
}

/// 수익률 레코드를 날짜 × 종목 행렬로 피벗합니다.
///
/// 날짜와 종목은 각각 오름차순으로 정렬되며, 해당 날짜에 관측치가
/// 없는 셀은 `None`으로 남습니다.
pub fn pivot_returns(returns: &[ReturnRecord]) -> Result<ReturnMatrix> {
    let dates: Vec<NaiveDate> = returns
        .iter()
        .map(|r| r.date)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();
    let tickers: Vec<String> = returns
        .iter()
        .map(|r| r.ticker.clone())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();

    let date_idx: HashMap<NaiveDate, usize> =
        dates.iter().enumerate().map(|(i, d)| (*d, i)).collect();
    let ticker_idx: HashMap<&str, usize> = tickers
        .iter()
        .enumerate()
        .map(|(i, t)| (t.as_str(), i))
        .collect();

    let mut values = vec![vec![None; tickers.len()]; dates.len()];
    for record in returns {
        let row = date_idx[&record.date];
        let col = ticker_idx[record.ticker.as_str()];
        if values[row][col].is_some() {
            warn!(
                ticker = %record.ticker,
                date = %record.date,
                "중복 수익률 관측치를 덮어씁니다"
            );
        }
        values[row][col] = Some(record.value);
    }

    ReturnMatrix::new(dates, tickers, values).map_err(|e| DataError::InvalidData(e.to_string()))
}

/// 가격 레코드에서 수익률 행렬까지 한 번에 구성합니다.
pub fn build_return_matrix(prices: Vec<PriceRecord>) -> Result<ReturnMatrix> {
    let returns = compute_daily_returns(prices);
    pivot_returns(&returns)
}
