//! Generic CRUD engine
//!
//! [`DbMap`] owns one connection pool plus its [`Dialect`] and executes
//! statements built from a record's descriptor table. Created once at
//! startup and shared; the pool serializes physical connections, the
//! mapper adds no locking of its own. In particular `upsert_one` is
//! update-then-insert and NOT atomic: two concurrent upserts on the
//! same natural key can both observe zero rows affected and both
//! insert; with a uniqueness constraint on the key the loser surfaces
//! as [`SrmError::UniqueViolation`].

use sqlx::postgres::{PgArguments, PgPool, PgRow};
use sqlx::query::Query;
use sqlx::sqlite::{SqliteArguments, SqlitePool, SqliteRow};
use sqlx::{Column, Postgres, Row, Sqlite};
use tracing::debug;

use crate::dialect::Dialect;
use crate::error::{classify, SrmError};
use crate::record::{self, FieldDescriptor, FieldKind, Relational, SqlValue};

/// Backend-specific pool handle.
#[derive(Clone)]
pub enum DbPool {
    Postgres(PgPool),
    Sqlite(SqlitePool),
}

/// One pool, one dialect: the handle every storage consumer receives.
#[derive(Clone)]
pub struct DbMap {
    pool: DbPool,
    dialect: Dialect,
}

impl DbMap {
    pub fn postgres(pool: PgPool) -> Self {
        Self { pool: DbPool::Postgres(pool), dialect: Dialect::Postgres }
    }

    pub fn sqlite(pool: SqlitePool) -> Self {
        Self { pool: DbPool::Sqlite(pool), dialect: Dialect::Sqlite }
    }

    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    pub fn pool(&self) -> &DbPool {
        &self.pool
    }

    /// Cheap connectivity probe for health checks.
    pub async fn ping(&self) -> Result<(), SrmError> {
        self.execute("SELECT 1", &[]).await.map(|_| ())
    }

    /// Insert one record and return the generated primary key.
    pub async fn insert_one<T: Relational>(&self, table: &str, record: &T) -> Result<i64, SrmError> {
        let fields = record::write_fields::<T>();
        let mut columns = String::new();
        let mut values = String::new();
        let mut params = Vec::with_capacity(fields.len());

        for (i, field) in fields.iter().enumerate() {
            if i > 0 {
                columns.push(',');
                values.push(',');
            }
            columns.push_str(field.column);
            values.push_str(&self.dialect.placeholder(i + 1));
            params.push((field.get)(record));
        }

        let sql = format!(
            "INSERT INTO {} ({}) VALUES ({}){}",
            table,
            columns,
            values,
            self.dialect.insert_suffix("id")
        );
        self.insert_returning(&sql, &params).await
    }

    /// Insert a batch, stopping at the first failure.
    pub async fn insert_many<T: Relational>(
        &self,
        table: &str,
        records: &[T],
    ) -> Result<Vec<i64>, SrmError> {
        let mut ids = Vec::with_capacity(records.len());
        for record in records {
            ids.push(self.insert_one(table, record).await?);
        }
        Ok(ids)
    }

    /// Update the row whose `key_column` equals the record's current
    /// value for that column. Returns the number of rows affected
    /// (0 when no row matched).
    pub async fn update_one<T: Relational>(
        &self,
        table: &str,
        key_column: &str,
        record: &T,
    ) -> Result<u64, SrmError> {
        let fields = record::write_fields::<T>();
        let mut assignments = String::new();
        let mut params = Vec::with_capacity(fields.len() + 1);
        let mut key_value = SqlValue::Null;

        for (i, field) in fields.iter().enumerate() {
            if i > 0 {
                assignments.push_str(", ");
            }
            assignments.push_str(field.column);
            assignments.push_str(" = ");
            assignments.push_str(&self.dialect.placeholder(i + 1));

            let value = (field.get)(record);
            if field.column == key_column {
                key_value = value.clone();
            }
            params.push(value);
        }
        params.push(key_value);

        let sql = format!(
            "UPDATE {} SET {} WHERE {} = {}",
            table,
            assignments,
            key_column,
            self.dialect.placeholder(fields.len() + 1)
        );
        self.execute(&sql, &params).await
    }

    /// Update-then-insert by natural key.
    ///
    /// Returns the generated id on the insert path, 0 when an existing
    /// row was updated. See the module docs for the concurrency caveat.
    pub async fn upsert_one<T: Relational>(
        &self,
        table: &str,
        key_column: &str,
        record: &T,
    ) -> Result<i64, SrmError> {
        let rows_affected = self.update_one(table, key_column, record).await?;
        if rows_affected == 0 {
            return self.insert_one(table, record).await;
        }
        Ok(0)
    }

    /// Upsert a batch, stopping at the first failure.
    pub async fn upsert_many<T: Relational>(
        &self,
        table: &str,
        key_column: &str,
        records: &[T],
    ) -> Result<Vec<i64>, SrmError> {
        let mut ids = Vec::with_capacity(records.len());
        for record in records {
            ids.push(self.upsert_one(table, key_column, record).await?);
        }
        Ok(ids)
    }

    /// Execute a query expected to return exactly one row and scan it
    /// into a new record. Zero rows is [`SrmError::NotFound`].
    pub async fn select_one<T: Relational>(
        &self,
        query: &str,
        params: &[SqlValue],
    ) -> Result<T, SrmError> {
        let rows = self.select_many(query, params).await?;
        rows.into_iter().next().ok_or(SrmError::NotFound)
    }

    /// Execute a query and scan every row into a record.
    ///
    /// Returns an empty Vec (not an error) when nothing matches.
    pub async fn select_many<T: Relational>(
        &self,
        query: &str,
        params: &[SqlValue],
    ) -> Result<Vec<T>, SrmError> {
        debug!(sql = query, params = params.len(), "executing query");
        match &self.pool {
            DbPool::Postgres(pool) => {
                let mut q = sqlx::query(query);
                for param in params {
                    q = bind_pg(q, param);
                }
                let rows = q.fetch_all(pool).await.map_err(classify)?;
                let mut out = Vec::with_capacity(rows.len());
                if let Some(first) = rows.first() {
                    let names: Vec<&str> = first.columns().iter().map(|c| c.name()).collect();
                    let targets = record::read_targets::<T>(&names);
                    for row in &rows {
                        out.push(scan_pg_row(row, &targets)?);
                    }
                }
                Ok(out)
            },
            DbPool::Sqlite(pool) => {
                let mut q = sqlx::query(query);
                for param in params {
                    q = bind_sqlite(q, param);
                }
                let rows = q.fetch_all(pool).await.map_err(classify)?;
                let mut out = Vec::with_capacity(rows.len());
                if let Some(first) = rows.first() {
                    let names: Vec<&str> = first.columns().iter().map(|c| c.name()).collect();
                    let targets = record::read_targets::<T>(&names);
                    for row in &rows {
                        out.push(scan_sqlite_row(row, &targets)?);
                    }
                }
                Ok(out)
            },
        }
    }

    /// Execute a single-value query (e.g. COUNT) and return the integer
    /// in the first column of the first row.
    pub async fn select_count(&self, query: &str, params: &[SqlValue]) -> Result<i64, SrmError> {
        debug!(sql = query, params = params.len(), "executing scalar query");
        match &self.pool {
            DbPool::Postgres(pool) => {
                let mut q = sqlx::query(query);
                for param in params {
                    q = bind_pg(q, param);
                }
                let row = q.fetch_one(pool).await.map_err(classify)?;
                row.try_get::<i64, _>(0).map_err(classify)
            },
            DbPool::Sqlite(pool) => {
                let mut q = sqlx::query(query);
                for param in params {
                    q = bind_sqlite(q, param);
                }
                let row = q.fetch_one(pool).await.map_err(classify)?;
                row.try_get::<i64, _>(0).map_err(classify)
            },
        }
    }

    /// Unconditional `DELETE FROM table`, used for idempotent
    /// bulk-replace ahead of re-ingestion.
    pub async fn delete_all(&self, table: &str) -> Result<(), SrmError> {
        let sql = format!("DELETE FROM {}", table);
        self.execute(&sql, &[]).await.map(|_| ())
    }

    async fn execute(&self, sql: &str, params: &[SqlValue]) -> Result<u64, SrmError> {
        debug!(sql, params = params.len(), "executing statement");
        match &self.pool {
            DbPool::Postgres(pool) => {
                let mut q = sqlx::query(sql);
                for param in params {
                    q = bind_pg(q, param);
                }
                let result = q.execute(pool).await.map_err(classify)?;
                Ok(result.rows_affected())
            },
            DbPool::Sqlite(pool) => {
                let mut q = sqlx::query(sql);
                for param in params {
                    q = bind_sqlite(q, param);
                }
                let result = q.execute(pool).await.map_err(classify)?;
                Ok(result.rows_affected())
            },
        }
    }

    /// Insert using the dialect's id-retrieval strategy: result-set
    /// scan of the RETURNING clause for Postgres, last-inserted rowid
    /// for sqlite.
    async fn insert_returning(&self, sql: &str, params: &[SqlValue]) -> Result<i64, SrmError> {
        debug!(sql, params = params.len(), "executing insert");
        match &self.pool {
            DbPool::Postgres(pool) => {
                let mut q = sqlx::query(sql);
                for param in params {
                    q = bind_pg(q, param);
                }
                let row = q.fetch_one(pool).await.map_err(classify)?;
                row.try_get::<i64, _>(0).map_err(classify)
            },
            DbPool::Sqlite(pool) => {
                let mut q = sqlx::query(sql);
                for param in params {
                    q = bind_sqlite(q, param);
                }
                let result = q.execute(pool).await.map_err(classify)?;
                Ok(result.last_insert_rowid())
            },
        }
    }
}

fn bind_pg<'q>(
    q: Query<'q, Postgres, PgArguments>,
    value: &'q SqlValue,
) -> Query<'q, Postgres, PgArguments> {
    match value {
        SqlValue::Text(s) => q.bind(s.as_str()),
        SqlValue::Int(i) => q.bind(*i),
        SqlValue::Float(f) => q.bind(*f),
        SqlValue::Bool(b) => q.bind(*b),
        SqlValue::Timestamp(t) => q.bind(*t),
        SqlValue::Null => q.bind(Option::<String>::None),
    }
}

fn bind_sqlite<'q>(
    q: Query<'q, Sqlite, SqliteArguments<'q>>,
    value: &'q SqlValue,
) -> Query<'q, Sqlite, SqliteArguments<'q>> {
    match value {
        SqlValue::Text(s) => q.bind(s.as_str()),
        SqlValue::Int(i) => q.bind(*i),
        SqlValue::Float(f) => q.bind(*f),
        SqlValue::Bool(b) => q.bind(*b),
        SqlValue::Timestamp(t) => q.bind(*t),
        SqlValue::Null => q.bind(Option::<String>::None),
    }
}

fn scan_pg_row<T: Relational>(
    row: &PgRow,
    targets: &[Option<&'static FieldDescriptor<T>>],
) -> Result<T, SrmError> {
    let mut record = T::default();
    for (index, target) in targets.iter().enumerate() {
        if let Some(field) = target {
            let value = decode_pg(row, index, field.kind)?;
            (field.set)(&mut record, value);
        }
    }
    Ok(record)
}

fn scan_sqlite_row<T: Relational>(
    row: &SqliteRow,
    targets: &[Option<&'static FieldDescriptor<T>>],
) -> Result<T, SrmError> {
    let mut record = T::default();
    for (index, target) in targets.iter().enumerate() {
        if let Some(field) = target {
            let value = decode_sqlite(row, index, field.kind)?;
            (field.set)(&mut record, value);
        }
    }
    Ok(record)
}

fn decode_pg(row: &PgRow, index: usize, kind: FieldKind) -> Result<SqlValue, SrmError> {
    let value = match kind {
        FieldKind::Text => row
            .try_get::<Option<String>, _>(index)
            .map_err(classify)?
            .map(SqlValue::Text),
        FieldKind::Int => row
            .try_get::<Option<i64>, _>(index)
            .map_err(classify)?
            .map(SqlValue::Int),
        FieldKind::Float => row
            .try_get::<Option<f64>, _>(index)
            .map_err(classify)?
            .map(SqlValue::Float),
        FieldKind::Bool => row
            .try_get::<Option<bool>, _>(index)
            .map_err(classify)?
            .map(SqlValue::Bool),
        FieldKind::Timestamp => row
            .try_get::<Option<chrono::DateTime<chrono::Utc>>, _>(index)
            .map_err(classify)?
            .map(SqlValue::Timestamp),
    };
    Ok(value.unwrap_or(SqlValue::Null))
}

fn decode_sqlite(row: &SqliteRow, index: usize, kind: FieldKind) -> Result<SqlValue, SrmError> {
    let value = match kind {
        FieldKind::Text => row
            .try_get::<Option<String>, _>(index)
            .map_err(classify)?
            .map(SqlValue::Text),
        FieldKind::Int => row
            .try_get::<Option<i64>, _>(index)
            .map_err(classify)?
            .map(SqlValue::Int),
        FieldKind::Float => row
            .try_get::<Option<f64>, _>(index)
            .map_err(classify)?
            .map(SqlValue::Float),
        FieldKind::Bool => row
            .try_get::<Option<bool>, _>(index)
            .map_err(classify)?
            .map(SqlValue::Bool),
        FieldKind::Timestamp => row
            .try_get::<Option<chrono::DateTime<chrono::Utc>>, _>(index)
            .map_err(classify)?
            .map(SqlValue::Timestamp),
    };
    Ok(value.unwrap_or(SqlValue::Null))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{FieldDescriptor, SqlValue, Timestamp};
    use sqlx::sqlite::SqlitePoolOptions;

    #[derive(Debug, Default, Clone, PartialEq)]
    struct Car {
        id: i64,
        updated: Timestamp,
        epa_id: i64,
        make: String,
        model: String,
        year: i64,
        mpg_comb: f64,
        is_electric: bool,
    }

    impl Relational for Car {
        fn fields() -> &'static [FieldDescriptor<Self>] {
            static FIELDS: &[FieldDescriptor<Car>] = &[
                FieldDescriptor::int(
                    "id",
                    |c: &Car| SqlValue::Int(c.id),
                    |c: &mut Car, v| c.id = v.into_int(),
                )
                .primary_key(),
                FieldDescriptor::timestamp(
                    "updated",
                    |c: &Car| SqlValue::Timestamp(c.updated.0),
                    |c: &mut Car, v| c.updated = v.into_timestamp(),
                )
                .auto_set(),
                FieldDescriptor::int(
                    "epa_id",
                    |c: &Car| SqlValue::Int(c.epa_id),
                    |c: &mut Car, v| c.epa_id = v.into_int(),
                ),
                FieldDescriptor::text(
                    "make",
                    |c: &Car| SqlValue::Text(c.make.clone()),
                    |c: &mut Car, v| c.make = v.into_text(),
                ),
                FieldDescriptor::text(
                    "model",
                    |c: &Car| SqlValue::Text(c.model.clone()),
                    |c: &mut Car, v| c.model = v.into_text(),
                ),
                FieldDescriptor::int(
                    "year",
                    |c: &Car| SqlValue::Int(c.year),
                    |c: &mut Car, v| c.year = v.into_int(),
                ),
                FieldDescriptor::float(
                    "mpg_comb",
                    |c: &Car| SqlValue::Float(c.mpg_comb),
                    |c: &mut Car, v| c.mpg_comb = v.into_float(),
                ),
                FieldDescriptor::boolean(
                    "is_electric",
                    |c: &Car| SqlValue::Bool(c.is_electric),
                    |c: &mut Car, v| c.is_electric = v.into_bool(),
                ),
            ];
            FIELDS
        }
    }

    async fn test_db() -> DbMap {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap();
        sqlx::query(
            "CREATE TABLE cars (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                updated TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP,
                epa_id INTEGER NOT NULL UNIQUE,
                make TEXT NOT NULL,
                model TEXT NOT NULL,
                year INTEGER NOT NULL,
                mpg_comb REAL NOT NULL,
                is_electric INTEGER NOT NULL
            )",
        )
        .execute(&pool)
        .await
        .unwrap();
        DbMap::sqlite(pool)
    }

    fn sample_car() -> Car {
        Car {
            epa_id: 31873,
            make: "Alfa Romeo".into(),
            model: "4C".into(),
            year: 2015,
            mpg_comb: 28.0,
            is_electric: false,
            ..Car::default()
        }
    }

    #[tokio::test]
    async fn test_insert_one_returns_generated_id() {
        let db = test_db().await;
        let id = db.insert_one("cars", &sample_car()).await.unwrap();
        assert!(id > 0);
    }

    #[tokio::test]
    async fn test_upsert_inserts_then_updates_in_place() {
        let db = test_db().await;

        let mut car = sample_car();
        let id = db.upsert_one("cars", "epa_id", &car).await.unwrap();
        assert!(id > 0);

        car.model = "4C Spider".into();
        car.mpg_comb = 26.0;
        let second = db.upsert_one("cars", "epa_id", &car).await.unwrap();
        assert_eq!(second, 0);

        let stored: Car = db
            .select_one("SELECT * FROM cars WHERE epa_id = ?", &[SqlValue::Int(31873)])
            .await
            .unwrap();
        assert_eq!(stored.model, "4C Spider");
        assert_eq!(stored.mpg_comb, 26.0);
        assert_eq!(stored.id, id);

        let count = db.select_count("SELECT COUNT(*) FROM cars", &[]).await.unwrap();
        assert_eq!(count, 1);
    }

    #[tokio::test]
    async fn test_select_one_zero_rows_is_not_found() {
        let db = test_db().await;
        let result: Result<Car, _> = db
            .select_one("SELECT * FROM cars WHERE epa_id = ?", &[SqlValue::Int(404)])
            .await;
        assert!(matches!(result, Err(SrmError::NotFound)));
    }

    #[tokio::test]
    async fn test_select_many_zero_rows_is_empty_vec() {
        let db = test_db().await;
        let cars: Vec<Car> = db
            .select_many("SELECT * FROM cars WHERE year = ?", &[SqlValue::Int(1899)])
            .await
            .unwrap();
        assert!(cars.is_empty());
    }

    #[tokio::test]
    async fn test_select_many_scans_all_fields() {
        let db = test_db().await;
        let mut car = sample_car();
        car.is_electric = true;
        db.insert_one("cars", &car).await.unwrap();

        let cars: Vec<Car> = db.select_many("SELECT * FROM cars", &[]).await.unwrap();
        assert_eq!(cars.len(), 1);
        let stored = &cars[0];
        assert_eq!(stored.make, "Alfa Romeo");
        assert_eq!(stored.year, 2015);
        assert!(stored.is_electric);
        assert!(stored.id > 0);
        // autoSet column populated by the database, scanned on read
        assert_ne!(stored.updated, Timestamp::default());
    }

    #[tokio::test]
    async fn test_duplicate_natural_key_is_unique_violation() {
        let db = test_db().await;
        db.insert_one("cars", &sample_car()).await.unwrap();
        let result = db.insert_one("cars", &sample_car()).await;
        assert!(matches!(result, Err(SrmError::UniqueViolation(_))));
    }

    #[tokio::test]
    async fn test_foreign_key_violation_is_classified() {
        let db = test_db().await;
        let DbPool::Sqlite(pool) = db.pool() else {
            unreachable!();
        };
        sqlx::query("PRAGMA foreign_keys = ON").execute(pool).await.unwrap();
        sqlx::query(
            "CREATE TABLE inspections (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                epa_id INTEGER NOT NULL REFERENCES cars (epa_id)
            )",
        )
        .execute(pool)
        .await
        .unwrap();

        let result = db
            .execute("INSERT INTO inspections (epa_id) VALUES (?)", &[SqlValue::Int(99)])
            .await;
        assert!(matches!(result, Err(SrmError::ForeignKeyViolation(_))));
    }

    #[tokio::test]
    async fn test_delete_all() {
        let db = test_db().await;
        db.insert_one("cars", &sample_car()).await.unwrap();
        db.delete_all("cars").await.unwrap();
        let count = db.select_count("SELECT COUNT(*) FROM cars", &[]).await.unwrap();
        assert_eq!(count, 0);
    }

    #[tokio::test]
    async fn test_update_one_no_match_returns_zero() {
        let db = test_db().await;
        let rows = db.update_one("cars", "epa_id", &sample_car()).await.unwrap();
        assert_eq!(rows, 0);
    }

    #[derive(Clone, Default)]
    struct CapturedLogs(std::sync::Arc<std::sync::Mutex<Vec<u8>>>);

    impl std::io::Write for CapturedLogs {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    impl<'a> tracing_subscriber::fmt::MakeWriter<'a> for CapturedLogs {
        type Writer = CapturedLogs;

        fn make_writer(&'a self) -> Self::Writer {
            self.clone()
        }
    }

    #[tokio::test]
    async fn test_generated_statements_are_logged_at_debug() {
        let logs = CapturedLogs::default();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .with_writer(logs.clone())
            .finish();
        let _guard = tracing::subscriber::set_default(subscriber);

        let db = test_db().await;
        db.insert_one("cars", &sample_car()).await.unwrap();
        db.ping().await.unwrap();
        let _: Vec<Car> = db.select_many("SELECT * FROM cars", &[]).await.unwrap();

        let output = String::from_utf8(logs.0.lock().unwrap().clone()).unwrap();
        assert!(output.contains("INSERT INTO cars"));
        assert!(output.contains("SELECT 1"));
        assert!(output.contains("SELECT * FROM cars"));
    }
}
