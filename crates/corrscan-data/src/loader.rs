//! 가격 CSV 디렉토리 로더.
//!
//! `Ticker`, `Date`, `Price` 열을 가진 CSV 파일들의 디렉토리를 읽어
//! 정렬된 가격 레코드 목록을 생성합니다. 열 순서는 헤더로 판별하며,
//! 형식이 깨진 행은 경고 후 건너뜁니다 (전체 실패로 만들지 않습니다).
//!
//! ## CSV 파일 형식
//!
//! ```csv
//! Ticker,Date,Price
//! AAPL,2024-01-02,185.64
//! AAPL,2024-01-03,184.25
//! MSFT,2024-01-02,370.87
//! ```

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::str::FromStr;
use tracing::{debug, info, warn};

use crate::error::{DataError, Result};

/// 단일 가격 관측치.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceRecord {
    /// 종목 식별자
    pub ticker: String,
    /// 거래일
    pub date: NaiveDate,
    /// 종가
    pub price: Decimal,
}

/// 헤더에서 찾은 필수 열의 위치.
struct ColumnLayout {
    ticker: usize,
    date: usize,
    price: usize,
}

/// 디렉토리의 모든 CSV 파일에서 가격 레코드를 로드합니다.
///
/// 파일은 이름 순으로 읽으며, 결과는 (종목, 날짜) 순으로 정렬되고
/// 중복 관측치는 첫 값만 남깁니다.
pub async fn load_price_dir<P: AsRef<Path>>(dir: P) -> Result<Vec<PriceRecord>> {
    let dir = dir.as_ref();
    let mut paths = Vec::new();

    let mut entries = tokio::fs::read_dir(dir).await.map_err(|e| {
        DataError::Io(format!("cannot read data directory {}: {}", dir.display(), e))
    })?;
    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();
        let is_csv = path
            .extension()
            .map(|ext| ext.eq_ignore_ascii_case("csv"))
            .unwrap_or(false);
        if is_csv {
            paths.push(path);
        }
    }
    paths.sort();

    if paths.is_empty() {
        return Err(DataError::InvalidData(format!(
            "no CSV files found in {}",
            dir.display()
        )));
    }

    let mut records = Vec::new();
    for path in &paths {
        let content = tokio::fs::read_to_string(path).await?;
        match parse_price_csv(&content, &path.display().to_string()) {
            Ok(mut parsed) => {
                debug!(path = %path.display(), rows = parsed.len(), "가격 파일 파싱 완료");
                records.append(&mut parsed);
            }
            Err(e) => {
                // 헤더가 없는 파일 하나가 전체 수집을 막지 않도록 한다
                warn!(path = %path.display(), error = %e, "가격 파일을 건너뜁니다");
            }
        }
    }

    records.sort_by(|a, b| a.ticker.cmp(&b.ticker).then(a.date.cmp(&b.date)));
    records.dedup_by(|a, b| {
        if a.ticker == b.ticker && a.date == b.date {
            if a.price != b.price {
                warn!(
                    ticker = %b.ticker,
                    date = %b.date,
                    "같은 날짜의 중복 관측치 가격이 서로 다릅니다. 첫 값을 사용합니다"
                );
            }
            true
        } else {
            false
        }
    });

    info!(
        files = paths.len(),
        records = records.len(),
        "가격 데이터 로드 완료"
    );

    Ok(records)
}

/// CSV 본문 하나를 가격 레코드로 파싱합니다.
///
/// 첫 번째 비어 있지 않은 줄을 헤더로 간주하며, 필수 열이 없으면
/// 에러를 반환합니다. 개별 행의 오류는 경고 후 건너뜁니다.
pub fn parse_price_csv(content: &str, source: &str) -> Result<Vec<PriceRecord>> {
    let mut lines = content.lines().enumerate();

    let layout = loop {
        let (_, line) = lines
            .next()
            .ok_or_else(|| DataError::ParseError(format!("{}: empty file", source)))?;
        if line.trim().is_empty() {
            continue;
        }
        break resolve_columns(line)
            .ok_or_else(|| DataError::ParseError(format!(
                "{}: header must contain Ticker, Date and Price columns",
                source
            )))?;
    };

    let mut records = Vec::new();
    let mut skipped = 0usize;

    for (line_num, line) in lines {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let parts = parse_csv_line(line);
        let max_idx = layout.ticker.max(layout.date).max(layout.price);
        if parts.len() <= max_idx {
            skipped += 1;
            warn!(source = source, line = line_num + 1, "열 수가 부족한 행을 건너뜁니다");
            continue;
        }

        let ticker = parts[layout.ticker].trim();
        if !is_valid_ticker(ticker) {
            skipped += 1;
            warn!(source = source, line = line_num + 1, ticker = ticker, "잘못된 종목 식별자");
            continue;
        }

        let date = match NaiveDate::parse_from_str(parts[layout.date].trim(), "%Y-%m-%d") {
            Ok(date) => date,
            Err(_) => {
                skipped += 1;
                warn!(
                    source = source,
                    line = line_num + 1,
                    value = parts[layout.date],
                    "잘못된 날짜 형식 (YYYY-MM-DD 필요)"
                );
                continue;
            }
        };

        let price = match Decimal::from_str(parts[layout.price].trim()) {
            Ok(price) if price > Decimal::ZERO => price,
            _ => {
                skipped += 1;
                warn!(
                    source = source,
                    line = line_num + 1,
                    value = parts[layout.price],
                    "가격이 없거나 0 이하인 행을 건너뜁니다"
                );
                continue;
            }
        };

        records.push(PriceRecord {
            ticker: ticker.to_string(),
            date,
            price,
        });
    }

    if skipped > 0 {
        warn!(source = source, skipped = skipped, "형식 오류 행 건너뜀");
    }

    Ok(records)
}

/// 가격 레코드를 닫힌 날짜 구간 [from, to]로 제한합니다.
pub fn filter_date_range(
    records: Vec<PriceRecord>,
    from: Option<NaiveDate>,
    to: Option<NaiveDate>,
) -> Vec<PriceRecord> {
    records
        .into_iter()
        .filter(|r| from.map_or(true, |f| r.date >= f) && to.map_or(true, |t| r.date <= t))
        .collect()
}

/// 헤더 줄에서 필수 열의 위치를 찾습니다 (대소문자 무시).
fn resolve_columns(header: &str) -> Option<ColumnLayout> {
    let mut ticker = None;
    let mut date = None;
    let mut price = None;

    for (idx, name) in parse_csv_line(header).iter().enumerate() {
        match name.trim().to_lowercase().as_str() {
            "ticker" => ticker = ticker.or(Some(idx)),
            "date" => date = date.or(Some(idx)),
            "price" => price = price.or(Some(idx)),
            _ => {}
        }
    }

    Some(ColumnLayout {
        ticker: ticker?,
        date: date?,
        price: price?,
    })
}

/// CSV 라인 파싱 (따옴표 처리).
fn parse_csv_line(line: &str) -> Vec<&str> {
    let mut result = Vec::new();
    let mut in_quotes = false;
    let mut field_start = 0;

    let chars: Vec<char> = line.chars().collect();
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];

        if c == '"' {
            in_quotes = !in_quotes;
        } else if c == ',' && !in_quotes {
            let field = &line[field_start..byte_index(line, i)];
            result.push(field.trim_matches('"'));
            field_start = byte_index(line, i + 1);
        }

        i += 1;
    }

    // 마지막 필드
    if field_start < line.len() {
        let field = &line[field_start..];
        result.push(field.trim_matches('"'));
    }

    result
}

/// 문자 인덱스를 바이트 인덱스로 변환.
fn byte_index(s: &str, char_index: usize) -> usize {
    s.char_indices()
        .nth(char_index)
        .map(|(i, _)| i)
        .unwrap_or(s.len())
}

/// 유효한 티커인지 확인.
///
/// - 영숫자 및 일부 특수문자 (., -, ^, _) 허용
/// - 최소 1자, 최대 20자
fn is_valid_ticker(ticker: &str) -> bool {
    if ticker.is_empty() || ticker.len() > 20 {
        return false;
    }

    ticker
        .chars()
        .all(|c| c.is_alphanumeric() || c == '.' || c == '-' || c == '^' || c == '_')
}
