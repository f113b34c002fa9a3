use chrono::{Duration, TimeZone, Utc};
use pricecast::application::ml::{ModelCache, TrainingConfig, TrainingService};
use pricecast::domain::market::Tick;
use pricecast::domain::repositories::TickRepository;
use pricecast::infrastructure::{Database, SqliteTickRepository};
use std::sync::Arc;

async fn memory_db() -> Database {
    Database::new("sqlite::memory:")
        .await
        .expect("Failed to open in-memory database")
}

#[tokio::test]
async fn test_fetch_all_is_chronological() {
    let db = memory_db().await;
    let repo = SqliteTickRepository::new(db.pool.clone());
    let start = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();

    // Insert out of order
    for i in [3i64, 0, 2, 1] {
        repo.save("ETH-USD", &Tick::new(start + Duration::seconds(i), 100.0 + i as f64))
            .await
            .unwrap();
    }

    let ticks = repo.fetch_all().await.unwrap();
    let prices: Vec<f64> = ticks.iter().map(|t| t.price).collect();
    assert_eq!(prices, vec![100.0, 101.0, 102.0, 103.0]);
    assert_eq!(ticks[0].timestamp, start);
    assert_eq!(repo.count().await.unwrap(), 4);
}

#[tokio::test]
async fn test_equal_timestamps_keep_insertion_order() {
    let db = memory_db().await;
    let repo = SqliteTickRepository::new(db.pool.clone());
    let at = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();

    repo.save("ETH-USD", &Tick::new(at, 1.0)).await.unwrap();
    repo.save("ETH-USD", &Tick::new(at, 2.0)).await.unwrap();

    let prices: Vec<f64> = repo.fetch_all().await.unwrap().iter().map(|t| t.price).collect();
    assert_eq!(prices, vec![1.0, 2.0]);
}

#[tokio::test]
async fn test_symbol_filter() {
    let db = memory_db().await;
    let writer = SqliteTickRepository::new(db.pool.clone());
    let start = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();

    for i in 0..5 {
        let at = start + Duration::seconds(i);
        writer.save("BTC-USD", &Tick::new(at, 60_000.0)).await.unwrap();
        writer.save("ETH-USD", &Tick::new(at, 3_000.0)).await.unwrap();
    }

    let btc = SqliteTickRepository::new(db.pool.clone()).with_symbol(Some("BTC-USD".to_string()));
    let ticks = btc.fetch_all().await.unwrap();
    assert_eq!(ticks.len(), 5);
    assert!(ticks.iter().all(|t| t.price == 60_000.0));
    assert_eq!(btc.count().await.unwrap(), 5);
    assert_eq!(writer.count().await.unwrap(), 10);
}

#[tokio::test]
async fn test_training_from_sqlite_store() {
    let db = memory_db().await;
    let repo = Arc::new(SqliteTickRepository::new(db.pool.clone()));
    let start = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();

    for i in 0..40 {
        repo.save("BTC-USD", &Tick::new(start + Duration::seconds(i), 100.0 + i as f64))
            .await
            .unwrap();
    }

    let service = TrainingService::new(repo, Arc::new(ModelCache::new()), TrainingConfig::default());
    let report = service.run_training().await.unwrap();

    // 40 ticks -> 31 feature rows -> 21 labeled rows -> 16 train / 5 test
    assert_eq!(report.ticks, 40);
    assert_eq!(report.labeled_rows, 21);
    assert_eq!(report.train_rows, 16);
    assert_eq!(report.test_rows, 5);
    assert_eq!(report.accuracy, 1.0);
}
