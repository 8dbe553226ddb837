use anyhow::{Context, Result};
use sqlx::{Executor, PgPool};
use std::{fs, path::Path};

fn load_all_schemas(schema_dirs: &[&str]) -> Result<String> {
    let mut combined_sql = String::new();

    for dir in schema_dirs {
        let schema_path = Path::new(env!("CARGO_MANIFEST_DIR")).join(dir).join("schema.sql");
        let sql = fs::read_to_string(&schema_path)
            .with_context(|| format!("Failed to read schema file: {:?}", schema_path))?;
        combined_sql.push_str(&sql);
        combined_sql.push('\n');
    }

    Ok(combined_sql)
}

async fn check_tables_exist(pool: &PgPool, tables: &[&str]) -> Result<bool> {
    for &table in tables {
        let exists: (bool,) = sqlx::query_as(
            "SELECT EXISTS (
                SELECT 1 FROM information_schema.tables
                WHERE table_schema = 'public' AND table_name = $1
            )",
        )
        .bind(table)
        .fetch_one(pool)
        .await?;

        if !exists.0 {
            log::info!("Table '{}' does not exist yet.", table);
            return Ok(false);
        }
    }
    Ok(true)
}

/// Connects to Postgres and creates any missing tables from the per-module
/// schema files.
pub async fn setup_backend() -> Result<PgPool> {
    let database_url = std::env::var("DATABASE_URL").context("DATABASE_URL must be set")?;
    let pool = PgPool::connect(&database_url)
        .await
        .context("Failed to connect to database")?;

    let schema_dirs = [
        "src/databases/chat",
        "src/databases/photos",
    ];

    let combined_schema_sql = load_all_schemas(&schema_dirs)?;

    let required_tables = [
        "messages",
        "photos",
    ];

    let tables_exist = check_tables_exist(&pool, &required_tables).await?;

    if !tables_exist {
        log::info!("Some tables missing. Running schema SQL to create tables...");
        pool.execute(combined_schema_sql.as_str())
            .await
            .context("Failed to execute schema SQL")?;
        log::info!("Schema SQL executed successfully.");
    } else {
        log::info!("All required tables exist.");
    }

    Ok(pool)
}
