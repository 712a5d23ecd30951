//! End-to-end integration test for the daily correlation summary pipeline.
//!
//! This test exercises the complete flow:
//! 1. Build a return matrix (directly, or from raw price records)
//! 2. Run the batch scheduler over all eligible dates
//! 3. Verify stored records, incremental reruns and failure isolation

use async_trait::async_trait;
use chrono::{Duration, NaiveDate};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use corrscan_analytics::{run_daily_summaries, RunOptions};
use corrscan_core::{CorrscanError, DailySummaryRecord, ReturnMatrix};
use corrscan_data::{build_return_matrix, DataError, JsonSummaryStore, PriceRecord, SummaryStore};

/// In-memory summary store for scheduler tests.
#[derive(Default)]
struct MemoryStore {
    records: Mutex<HashMap<NaiveDate, DailySummaryRecord>>,
}

#[async_trait]
impl SummaryStore for MemoryStore {
    async fn save(&self, record: &DailySummaryRecord) -> Result<(), DataError> {
        self.records
            .lock()
            .unwrap()
            .insert(record.date, record.clone());
        Ok(())
    }

    async fn load(&self, date: NaiveDate) -> Result<DailySummaryRecord, DataError> {
        self.records
            .lock()
            .unwrap()
            .get(&date)
            .cloned()
            .ok_or_else(|| DataError::NotFound(format!("no summary record for {}", date)))
    }

    async fn list_dates(&self) -> Result<Vec<NaiveDate>, DataError> {
        let mut dates: Vec<NaiveDate> = self.records.lock().unwrap().keys().copied().collect();
        dates.sort();
        Ok(dates)
    }

    async fn has_record(&self, date: NaiveDate) -> Result<bool, DataError> {
        Ok(self.records.lock().unwrap().contains_key(&date))
    }

    async fn clear(&self) -> Result<usize, DataError> {
        let mut records = self.records.lock().unwrap();
        let removed = records.len();
        records.clear();
        Ok(removed)
    }
}

/// Store that rejects the save for one specific date.
struct FailingStore {
    inner: MemoryStore,
    fail_on: NaiveDate,
}

#[async_trait]
impl SummaryStore for FailingStore {
    async fn save(&self, record: &DailySummaryRecord) -> Result<(), DataError> {
        if record.date == self.fail_on {
            return Err(DataError::Io("disk full".to_string()));
        }
        self.inner.save(record).await
    }

    async fn load(&self, date: NaiveDate) -> Result<DailySummaryRecord, DataError> {
        self.inner.load(date).await
    }

    async fn list_dates(&self) -> Result<Vec<NaiveDate>, DataError> {
        self.inner.list_dates().await
    }

    async fn has_record(&self, date: NaiveDate) -> Result<bool, DataError> {
        self.inner.has_record(date).await
    }

    async fn clear(&self) -> Result<usize, DataError> {
        self.inner.clear().await
    }
}

/// Store whose existence check panics on one date, to exercise task isolation.
struct PanickingStore {
    inner: MemoryStore,
    panic_on: NaiveDate,
}

#[async_trait]
impl SummaryStore for PanickingStore {
    async fn save(&self, record: &DailySummaryRecord) -> Result<(), DataError> {
        self.inner.save(record).await
    }

    async fn load(&self, date: NaiveDate) -> Result<DailySummaryRecord, DataError> {
        self.inner.load(date).await
    }

    async fn list_dates(&self) -> Result<Vec<NaiveDate>, DataError> {
        self.inner.list_dates().await
    }

    async fn has_record(&self, date: NaiveDate) -> Result<bool, DataError> {
        if date == self.panic_on {
            panic!("injected panic for {}", date);
        }
        self.inner.has_record(date).await
    }

    async fn clear(&self) -> Result<usize, DataError> {
        self.inner.clear().await
    }
}

/// Seeded random return matrix with non-degenerate columns.
fn random_matrix(seed: u64, n_dates: usize, n_tickers: usize) -> ReturnMatrix {
    let mut rng = StdRng::seed_from_u64(seed);
    let base = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
    let dates: Vec<NaiveDate> = (0..n_dates)
        .map(|i| base + Duration::days(i as i64))
        .collect();
    let tickers: Vec<String> = (0..n_tickers).map(|i| format!("TICK{:03}", i)).collect();
    let values: Vec<Vec<Option<f64>>> = (0..n_dates)
        .map(|_| {
            (0..n_tickers)
                .map(|_| Some(rng.gen_range(-0.05..0.05)))
                .collect()
        })
        .collect();
    ReturnMatrix::new(dates, tickers, values).unwrap()
}

#[tokio::test]
async fn test_twenty_five_return_rows_yield_five_records() {
    let matrix = Arc::new(random_matrix(7, 25, 25));
    let store = Arc::new(MemoryStore::default());

    let report = run_daily_summaries(
        Arc::clone(&matrix),
        Arc::clone(&store),
        RunOptions::default(),
    )
    .await
    .unwrap();

    assert!(report.is_complete());
    assert_eq!(report.stats.total, 5);
    assert_eq!(report.stats.success, 5);
    assert_eq!(report.stats.errors, 0);

    // Only dates with a full 20-day trailing window get a record
    let stored = store.list_dates().await.unwrap();
    assert_eq!(stored, matrix.dates()[20..].to_vec());

    // 25 tickers produce 300 pairs, so every top list is filled to its bound
    let record = store.load(stored[0]).await.unwrap();
    assert!(record.has_aggregates());
    assert_eq!(record.top_20_closest_to_zero.len(), 20);
    assert_eq!(record.top_20_closest_to_one.len(), 20);
    assert_eq!(record.top_5_most_negative.len(), 5);
}

#[tokio::test]
async fn test_price_history_end_to_end() {
    // 26 price days become 25 return rows, hence 5 eligible dates
    let mut rng = StdRng::seed_from_u64(11);
    let base = NaiveDate::from_ymd_opt(2024, 2, 1).unwrap();
    let mut prices = Vec::new();
    for t in 0..8 {
        let mut level = 100.0 + t as f64;
        for d in 0..26 {
            level *= 1.0 + rng.gen_range(-0.01..0.01);
            prices.push(PriceRecord {
                ticker: format!("TICK{:02}", t),
                date: base + Duration::days(d),
                price: Decimal::from_f64_retain(level).unwrap(),
            });
        }
    }

    let matrix = Arc::new(build_return_matrix(prices).unwrap());
    assert_eq!(matrix.num_dates(), 25);
    assert_eq!(matrix.num_tickers(), 8);

    let dir = tempfile::tempdir().unwrap();
    let store = Arc::new(JsonSummaryStore::new(dir.path()));
    let report = run_daily_summaries(
        Arc::clone(&matrix),
        Arc::clone(&store),
        RunOptions::default(),
    )
    .await
    .unwrap();

    assert!(report.is_complete());
    assert_eq!(report.stats.success, 5);

    // The consumer contract fixes both the file name and the JSON keys
    let first = matrix.dates()[20];
    let path = dir
        .path()
        .join(format!("correlation_summary_{}.json", first.format("%Y-%m-%d")));
    let body = std::fs::read_to_string(path).unwrap();
    let json: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert_eq!(json["Date"].as_str(), Some(first.to_string().as_str()));
    assert!(json.get("pct_above_0.7").is_some());
    assert!(json.get("mean_correlation").is_some());
    assert!(json["top_20_closest_to_zero"].is_array());
    assert!(json["top_5_most_negative"].is_array());
}

#[tokio::test]
async fn test_constant_ticker_excluded_from_all_lists() {
    // Nine random tickers plus one that repeats the same return every
    // day, so its variance is zero in every window
    let mut rng = StdRng::seed_from_u64(17);
    let n_dates = 30;
    let base = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
    let dates: Vec<NaiveDate> = (0..n_dates)
        .map(|i| base + Duration::days(i as i64))
        .collect();
    let mut tickers: Vec<String> = (0..9).map(|i| format!("TICK{:03}", i)).collect();
    tickers.push("CONST".to_string());
    let values: Vec<Vec<Option<f64>>> = (0..n_dates)
        .map(|_| {
            let mut cells: Vec<Option<f64>> =
                (0..9).map(|_| Some(rng.gen_range(-0.05..0.05))).collect();
            cells.push(Some(0.001));
            cells
        })
        .collect();
    let matrix = Arc::new(ReturnMatrix::new(dates, tickers, values).unwrap());

    let store = Arc::new(MemoryStore::default());
    let report = run_daily_summaries(
        Arc::clone(&matrix),
        Arc::clone(&store),
        RunOptions::default(),
    )
    .await
    .unwrap();
    assert!(report.is_complete());

    for date in store.list_dates().await.unwrap() {
        let record = store.load(date).await.unwrap();
        // Pairs among the other nine tickers are still defined
        assert!(record.has_aggregates());

        let mentions_const = record
            .top_20_closest_to_zero
            .iter()
            .chain(&record.top_20_closest_to_one)
            .chain(&record.top_5_most_negative)
            .any(|p| p.ticker_1 == "CONST" || p.ticker_2 == "CONST");
        assert!(!mentions_const, "constant ticker leaked into {}", date);
    }
}

#[tokio::test]
async fn test_batch_size_does_not_change_records() {
    let matrix = Arc::new(random_matrix(23, 30, 6));

    let store_small = Arc::new(MemoryStore::default());
    let store_large = Arc::new(MemoryStore::default());

    let small = RunOptions {
        batch_size: 3,
        ..RunOptions::default()
    };
    let large = RunOptions {
        batch_size: 64,
        ..RunOptions::default()
    };

    run_daily_summaries(Arc::clone(&matrix), Arc::clone(&store_small), small)
        .await
        .unwrap();
    run_daily_summaries(Arc::clone(&matrix), Arc::clone(&store_large), large)
        .await
        .unwrap();

    let dates = store_small.list_dates().await.unwrap();
    assert_eq!(dates.len(), 10);
    assert_eq!(dates, store_large.list_dates().await.unwrap());

    for date in dates {
        let a = store_small.load(date).await.unwrap();
        let b = store_large.load(date).await.unwrap();
        assert_eq!(a, b, "records for {} differ between batch sizes", date);
    }
}

#[tokio::test]
async fn test_incremental_rerun_skips_existing() {
    let matrix = Arc::new(random_matrix(31, 26, 5));
    let store = Arc::new(MemoryStore::default());

    let first = run_daily_summaries(
        Arc::clone(&matrix),
        Arc::clone(&store),
        RunOptions::default(),
    )
    .await
    .unwrap();
    assert_eq!(first.stats.success, 6);
    assert_eq!(first.stats.skipped, 0);

    let second = run_daily_summaries(
        Arc::clone(&matrix),
        Arc::clone(&store),
        RunOptions::default(),
    )
    .await
    .unwrap();
    assert_eq!(second.stats.success, 0);
    assert_eq!(second.stats.skipped, 6);
    assert_eq!(second.stats.errors, 0);

    // Overwrite clears the store and recomputes everything
    let third = run_daily_summaries(
        Arc::clone(&matrix),
        Arc::clone(&store),
        RunOptions {
            overwrite: true,
            ..RunOptions::default()
        },
    )
    .await
    .unwrap();
    assert_eq!(third.stats.success, 6);
    assert_eq!(third.stats.skipped, 0);
    assert_eq!(store.list_dates().await.unwrap().len(), 6);
}

#[tokio::test]
async fn test_save_failure_isolated_to_one_date() {
    let matrix = Arc::new(random_matrix(41, 25, 5));
    let fail_on = matrix.dates()[22];
    let store = Arc::new(FailingStore {
        inner: MemoryStore::default(),
        fail_on,
    });

    let report = run_daily_summaries(
        Arc::clone(&matrix),
        Arc::clone(&store),
        RunOptions::default(),
    )
    .await
    .unwrap();

    assert_eq!(report.stats.total, 5);
    assert_eq!(report.stats.success, 4);
    assert_eq!(report.stats.errors, 1);
    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].date, fail_on);
    assert!(matches!(
        report.failures[0].error,
        CorrscanError::Storage(_)
    ));

    // Every other date was still stored
    let stored = store.list_dates().await.unwrap();
    assert_eq!(stored.len(), 4);
    assert!(!stored.contains(&fail_on));
}

#[tokio::test]
async fn test_task_panic_does_not_abort_run() {
    let matrix = Arc::new(random_matrix(43, 25, 5));
    let panic_on = matrix.dates()[21];
    let store = Arc::new(PanickingStore {
        inner: MemoryStore::default(),
        panic_on,
    });

    let report = run_daily_summaries(
        Arc::clone(&matrix),
        Arc::clone(&store),
        RunOptions::default(),
    )
    .await
    .unwrap();

    assert_eq!(report.stats.errors, 1);
    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].date, panic_on);
    assert!(matches!(
        report.failures[0].error,
        CorrscanError::Internal(_)
    ));
    assert_eq!(store.list_dates().await.unwrap().len(), 4);
}

#[tokio::test]
async fn test_zero_window_rejected() {
    let matrix = Arc::new(random_matrix(47, 10, 3));
    let store = Arc::new(MemoryStore::default());

    let result = run_daily_summaries(
        matrix,
        store,
        RunOptions {
            window: 0,
            ..RunOptions::default()
        },
    )
    .await;

    assert!(matches!(result, Err(CorrscanError::InvalidInput(_))));
}
