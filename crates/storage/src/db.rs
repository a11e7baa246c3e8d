use chrono::{DateTime, NaiveDate, Utc};
use impensa_core::{Category, CategoryId, ExpenseRecord, PaymentMethod, DEFAULT_CATEGORIES};
use impensa_import::{ColumnMapping, DateOrder, ExpenseStore, StoreError};
use sqlx::{sqlite::SqlitePoolOptions, Pool, Sqlite};
use std::path::Path;
use std::str::FromStr;
use uuid::Uuid;

pub type DbPool = Pool<Sqlite>;

pub async fn create_db(path: &Path) -> Result<DbPool, sqlx::Error> {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect(&format!("sqlite:{}?mode=rwc", path.display()))
        .await?;

    configure(&pool).await?;
    run_migrations(&pool).await?;

    Ok(pool)
}

async fn configure(pool: &DbPool) -> Result<(), sqlx::Error> {
    sqlx::query("PRAGMA journal_mode = WAL")
        .execute(pool)
        .await?;
    sqlx::query("PRAGMA foreign_keys = ON")
        .execute(pool)
        .await?;
    sqlx::query("PRAGMA synchronous = NORMAL")
        .execute(pool)
        .await?;
    sqlx::query("PRAGMA busy_timeout = 5000")
        .execute(pool)
        .await?;
    Ok(())
}

async fn run_migrations(pool: &DbPool) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS categories (
            id TEXT PRIMARY KEY,
            name TEXT NOT NULL UNIQUE,
            created_at TEXT NOT NULL DEFAULT (datetime('now'))
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS expenses (
            id TEXT PRIMARY KEY,
            amount_cents INTEGER NOT NULL,
            category_id TEXT REFERENCES categories(id),
            description TEXT NOT NULL,
            date TEXT NOT NULL,
            payment_method TEXT NOT NULL,
            note TEXT,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS import_profiles (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL UNIQUE,
            mapping TEXT NOT NULL,
            date_order TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

pub async fn seed_default_categories(pool: &DbPool) -> Result<(), sqlx::Error> {
    for name in DEFAULT_CATEGORIES {
        sqlx::query("INSERT OR IGNORE INTO categories (id, name) VALUES (?, ?)")
            .bind(CategoryId::generate().0)
            .bind(*name)
            .execute(pool)
            .await?;
    }
    Ok(())
}

pub async fn insert_category(pool: &DbPool, category: &Category) -> Result<(), sqlx::Error> {
    sqlx::query("INSERT INTO categories (id, name) VALUES (?, ?)")
        .bind(category.id.as_str())
        .bind(&category.name)
        .execute(pool)
        .await?;
    Ok(())
}

pub async fn get_all_categories(pool: &DbPool) -> Result<Vec<Category>, sqlx::Error> {
    let rows = sqlx::query_as::<_, (String, String)>(
        "SELECT id, name FROM categories ORDER BY name",
    )
    .fetch_all(pool)
    .await?;

    Ok(rows
        .into_iter()
        .map(|(id, name)| Category {
            id: CategoryId(id),
            name,
        })
        .collect())
}

pub async fn insert_expense(pool: &DbPool, record: &ExpenseRecord) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        INSERT INTO expenses
            (id, amount_cents, category_id, description, date, payment_method, note, created_at, updated_at)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(record.id.to_string())
    .bind(record.amount.to_cents())
    .bind(record.category_id.as_ref().map(|c| c.as_str().to_string()))
    .bind(&record.description)
    .bind(record.date.to_string())
    .bind(record.payment_method.to_string())
    .bind(&record.note)
    .bind(record.created_at.to_rfc3339())
    .bind(record.updated_at.to_rfc3339())
    .execute(pool)
    .await?;
    Ok(())
}

pub async fn get_expense_by_id(
    pool: &DbPool,
    id: Uuid,
) -> Result<Option<ExpenseRecord>, sqlx::Error> {
    let row = sqlx::query_as::<_, ExpenseRow>(
        "SELECT id, amount_cents, category_id, description, date, payment_method, note, created_at, updated_at FROM expenses WHERE id = ?",
    )
    .bind(id.to_string())
    .fetch_optional(pool)
    .await?;

    row.map(row_to_record).transpose()
}

type ExpenseRow = (
    String,
    i64,
    Option<String>,
    String,
    String,
    String,
    Option<String>,
    String,
    String,
);

fn row_to_record(row: ExpenseRow) -> Result<ExpenseRecord, sqlx::Error> {
    let (id, cents, category_id, description, date, payment_method, note, created, updated) = row;
    Ok(ExpenseRecord {
        id: Uuid::from_str(&id).map_err(decode_err)?,
        amount: impensa_core::Money::from_cents(cents),
        category_id: category_id.map(CategoryId),
        description,
        date: NaiveDate::from_str(&date).map_err(decode_err)?,
        payment_method: parse_payment_method(&payment_method),
        note,
        created_at: parse_timestamp(&created)?,
        updated_at: parse_timestamp(&updated)?,
    })
}

fn parse_payment_method(s: &str) -> PaymentMethod {
    match s {
        "card" => PaymentMethod::Card,
        "cash" => PaymentMethod::Cash,
        "bank_transfer" => PaymentMethod::BankTransfer,
        _ => PaymentMethod::Other,
    }
}

fn parse_timestamp(s: &str) -> Result<DateTime<Utc>, sqlx::Error> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(decode_err)
}

fn decode_err<E: std::error::Error + Send + Sync + 'static>(e: E) -> sqlx::Error {
    sqlx::Error::Decode(Box::new(e))
}

// ── Import profiles ───────────────────────────────────────────────────────────

/// A saved column mapping, so repeat imports from the same bank skip the
/// manual override step.
#[derive(Debug, Clone)]
pub struct ImportProfile {
    pub id: Option<i64>,
    pub name: String,
    pub mapping: ColumnMapping,
    pub date_order: DateOrder,
}

pub async fn save_import_profile(
    pool: &DbPool,
    name: &str,
    mapping: &ColumnMapping,
    date_order: DateOrder,
) -> Result<(), sqlx::Error> {
    let mapping_json =
        serde_json::to_string(mapping).map_err(|e| sqlx::Error::Encode(Box::new(e)))?;
    sqlx::query(
        r#"
        INSERT INTO import_profiles (name, mapping, date_order) VALUES (?, ?, ?)
        ON CONFLICT(name) DO UPDATE SET mapping = excluded.mapping, date_order = excluded.date_order
        "#,
    )
    .bind(name)
    .bind(mapping_json)
    .bind(date_order.as_str())
    .execute(pool)
    .await?;
    Ok(())
}

pub async fn get_import_profiles(pool: &DbPool) -> Result<Vec<ImportProfile>, sqlx::Error> {
    let rows = sqlx::query_as::<_, (i64, String, String, String)>(
        "SELECT id, name, mapping, date_order FROM import_profiles ORDER BY name",
    )
    .fetch_all(pool)
    .await?;

    rows.into_iter()
        .map(|(id, name, mapping_json, order)| {
            Ok(ImportProfile {
                id: Some(id),
                name,
                mapping: serde_json::from_str(&mapping_json).map_err(decode_err)?,
                date_order: DateOrder::from_str(&order).unwrap_or_default(),
            })
        })
        .collect()
}

pub async fn delete_import_profile(pool: &DbPool, name: &str) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM import_profiles WHERE name = ?")
        .bind(name)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

// ── ExpenseStore seam ─────────────────────────────────────────────────────────

/// The import executor's view of this store.
#[derive(Clone)]
pub struct SqliteExpenseStore {
    pool: DbPool,
}

impl SqliteExpenseStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

impl ExpenseStore for SqliteExpenseStore {
    async fn insert_expense(&self, record: &ExpenseRecord) -> Result<(), StoreError> {
        insert_expense(&self.pool, record).await.map_err(|e| match e {
            sqlx::Error::Database(db) => StoreError::Constraint(db.to_string()),
            other => StoreError::Backend(other.to_string()),
        })
    }
}
