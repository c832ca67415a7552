use log::*;
use payfast_engine::SqliteDatabase;
use sqlx::{migrate::MigrateDatabase, Sqlite};

/// Creates a fresh, migrated SQLite database in the temp directory.
pub async fn new_test_db() -> SqliteDatabase {
    let _ = env_logger::try_init();
    let path = std::env::temp_dir().join(format!("payfast_it_{}.db", rand::random::<u64>()));
    let url = format!("sqlite://{}", path.display());
    Sqlite::create_database(&url).await.expect("Error creating database");
    let db = SqliteDatabase::new_with_url(&url, 5).await.expect("Error connecting to database");
    db.migrate().await.expect("Error running migrations");
    debug!("🚀️ Test database ready at {url}");
    db
}

pub async fn tear_down(db: SqliteDatabase) {
    let url = db.url().to_string();
    db.pool().close().await;
    if let Err(e) = Sqlite::drop_database(&url).await {
        warn!("🚀️ Failed to drop test database {url}: {e}");
    }
}
