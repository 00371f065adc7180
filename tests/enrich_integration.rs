//! Integration tests for `run_enrich` and `run_status` on on-disk stores.

mod helpers;

use helpers::{category, open_pool, start_endpoint, temp_db, test_config, PagedDataset};
use sqlx::SqlitePool;
use wikidata_sites::{run_enrich, run_harvest, run_status, EnrichConfig, MemoryReporter};

async fn create_legacy_store(pool: &SqlitePool, rows: &[(&str, &str)]) {
    sqlx::query(
        "CREATE TABLE websites (
            item TEXT, item_label TEXT, website TEXT, type_label TEXT,
            PRIMARY KEY (item, website)
        )",
    )
    .execute(pool)
    .await
    .unwrap();
    for (item, website) in rows {
        sqlx::query("INSERT INTO websites VALUES (?, ?, ?, 'Bank')")
            .bind(item)
            .bind(format!("Label {item}"))
            .bind(website)
            .execute(pool)
            .await
            .unwrap();
    }
}

async fn domain_columns(pool: &SqlitePool, item: &str) -> (Option<String>, Option<String>) {
    sqlx::query_as("SELECT domain, subdomain FROM websites WHERE item = ?")
        .bind(item)
        .fetch_one(pool)
        .await
        .unwrap()
}

#[tokio::test]
async fn test_enrich_legacy_store_end_to_end() {
    let (_dir, db_path) = temp_db();
    let pool = open_pool(&db_path).await;
    create_legacy_store(
        &pool,
        &[
            ("Q1", "http://www.example.com/x"),
            ("Q2", "http://shop.example.com/x"),
            ("Q3", "http://localhost/x"),
            ("Q4", ""),
        ],
    )
    .await;
    pool.close().await;

    let before = run_status(&db_path).await.unwrap();
    assert!(!before.has_enrichment_columns);
    assert_eq!(before.pending, 3);

    let config = EnrichConfig {
        db_path: db_path.clone(),
        batch_size: 2,
    };
    let reporter = MemoryReporter::new();
    let report = run_enrich(config.clone(), &reporter).await.unwrap();
    assert_eq!(report.columns_added, vec!["domain", "subdomain"]);
    assert_eq!(report.updated, 3);
    assert_eq!(report.batches, 2);
    assert!(reporter.contains("Adding column domain"));

    let pool = open_pool(&db_path).await;
    assert_eq!(
        domain_columns(&pool, "Q1").await,
        (Some("example.com".into()), None)
    );
    assert_eq!(
        domain_columns(&pool, "Q2").await,
        (Some("example.com".into()), Some("shop.example.com".into()))
    );
    assert_eq!(domain_columns(&pool, "Q3").await, (Some(String::new()), None));
    assert_eq!(domain_columns(&pool, "Q4").await, (None, None));
    pool.close().await;

    let again = run_enrich(config, &MemoryReporter::new()).await.unwrap();
    assert!(again.columns_added.is_empty());
    assert_eq!(again.updated, 0);

    let after = run_status(&db_path).await.unwrap();
    assert!(after.has_enrichment_columns);
    assert_eq!(after.resolved, 2);
    assert_eq!(after.unresolvable, 1);
    assert_eq!(after.pending, 0);
    assert_eq!(after.ineligible, 1);
}

#[tokio::test]
async fn test_harvest_then_enrich() {
    let server = start_endpoint(PagedDataset::new(7)).await;
    let (_dir, db_path) = temp_db();
    run_harvest(test_config(&server, &db_path, 5, 100), &MemoryReporter::new())
        .await
        .unwrap();

    let report = run_enrich(
        EnrichConfig {
            db_path: db_path.clone(),
            batch_size: 3,
        },
        &MemoryReporter::new(),
    )
    .await
    .unwrap();
    assert!(report.columns_added.is_empty());
    assert_eq!(report.updated, 7);
    assert_eq!(report.resolved, 7);

    let pool = open_pool(&db_path).await;
    let domains: Vec<String> =
        sqlx::query_scalar("SELECT domain FROM websites ORDER BY website LIMIT 2")
            .fetch_all(&pool)
            .await
            .unwrap();
    assert_eq!(
        domains,
        vec!["example.org".to_string(), "example.org".to_string()]
    );
}

#[tokio::test]
async fn test_enrich_missing_database_fails_without_creating_it() {
    let (_dir, db_path) = temp_db();
    let result = run_enrich(
        EnrichConfig {
            db_path: db_path.clone(),
            batch_size: 10,
        },
        &MemoryReporter::new(),
    )
    .await;
    assert!(result.is_err());
    assert!(!db_path.exists());
    assert!(run_status(&db_path).await.is_err());
}

#[tokio::test]
async fn test_zero_batch_rejected() {
    let (_dir, db_path) = temp_db();
    let err = run_enrich(
        EnrichConfig {
            db_path,
            batch_size: 0,
        },
        &MemoryReporter::new(),
    )
    .await
    .unwrap_err();
    assert!(format!("{:#}", err).contains("--batch"));
}

#[tokio::test]
async fn test_harvest_into_legacy_store_keeps_category_labels() {
    let (_dir, db_path) = temp_db();
    let pool = open_pool(&db_path).await;
    create_legacy_store(&pool, &[]).await;
    sqlx::query(
        "INSERT INTO websites VALUES ('Q1', 'Old band', 'http://band.example.com', 'musical group')",
    )
    .execute(&pool)
    .await
    .unwrap();
    pool.close().await;

    let server = start_endpoint(PagedDataset::new(3)).await;
    let mut config = test_config(&server, &db_path, 10, 100);
    config.categories = vec![category("Musical group")];
    let report = run_harvest(config, &MemoryReporter::new()).await.unwrap();

    assert_eq!(
        report.store.per_category,
        vec![("musical group".to_string(), 4)]
    );
    let status = run_status(&db_path).await.unwrap();
    assert_eq!(status.per_category, report.store.per_category);
    assert!(!status.has_enrichment_columns);
}
