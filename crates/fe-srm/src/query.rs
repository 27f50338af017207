//! Parameterized COUNT / SELECT builder for ad-hoc listing queries
//!
//! Both shapes share one WHERE implementation, so a result count and a
//! page of results are always computed against the same predicate.
//! Placeholder ordinals increase monotonically across exact filters,
//! fuzzy filters, LIMIT and OFFSET, in that order, because positional
//! named placeholders (`$n`) cannot rely on driver-side auto-numbering.

use crate::dialect::Dialect;
use crate::record::SqlValue;

/// Composable filter set over one table.
///
/// Filters are applied in insertion order: exact filters first, then
/// fuzzy (case-insensitive prefix) filters. LIMIT / OFFSET are emitted
/// only when positive; zero or negative means unbounded.
#[derive(Debug, Clone)]
pub struct QueryBuilder {
    dialect: Dialect,
    table: String,
    limit: i64,
    offset: i64,
    where_exact: Vec<(String, SqlValue)>,
    where_fuzzy: Vec<(String, String)>,
}

impl QueryBuilder {
    pub fn new(dialect: Dialect, table: impl Into<String>) -> Self {
        Self {
            dialect,
            table: table.into(),
            limit: 0,
            offset: 0,
            where_exact: Vec::new(),
            where_fuzzy: Vec::new(),
        }
    }

    /// Add an exact-match predicate: `column = value`.
    pub fn exact(mut self, column: impl Into<String>, value: SqlValue) -> Self {
        self.where_exact.push((column.into(), value));
        self
    }

    /// Add a case-insensitive prefix predicate:
    /// `lower(column) LIKE 'lower(value)%'`.
    pub fn fuzzy(mut self, column: impl Into<String>, value: impl Into<String>) -> Self {
        self.where_fuzzy.push((column.into(), value.into()));
        self
    }

    pub fn limit(mut self, limit: i64) -> Self {
        self.limit = limit;
        self
    }

    pub fn offset(mut self, offset: i64) -> Self {
        self.offset = offset;
        self
    }

    /// `SELECT COUNT(*)` over the filter predicate.
    pub fn build_count(&self) -> (String, Vec<SqlValue>) {
        let mut sql = format!("SELECT COUNT(*) FROM {}", self.table);
        let mut args = Vec::new();
        let mut ordinal = 1;
        self.push_where(&mut sql, &mut args, &mut ordinal);
        (sql, args)
    }

    /// `SELECT *` over the filter predicate, plus LIMIT / OFFSET.
    pub fn build_select(&self) -> (String, Vec<SqlValue>) {
        let mut sql = format!("SELECT * FROM {}", self.table);
        let mut args = Vec::new();
        let mut ordinal = 1;
        self.push_where(&mut sql, &mut args, &mut ordinal);

        if self.limit > 0 {
            sql.push_str(" LIMIT ");
            sql.push_str(&self.dialect.placeholder(ordinal));
            args.push(SqlValue::Int(self.limit));
            ordinal += 1;
        }

        if self.offset > 0 {
            sql.push_str(" OFFSET ");
            sql.push_str(&self.dialect.placeholder(ordinal));
            args.push(SqlValue::Int(self.offset));
        }

        (sql, args)
    }

    fn push_where(&self, sql: &mut String, args: &mut Vec<SqlValue>, ordinal: &mut usize) {
        let mut first = true;
        for (column, value) in &self.where_exact {
            sql.push_str(if first { " WHERE " } else { " AND " });
            sql.push_str(column);
            sql.push_str(" = ");
            sql.push_str(&self.dialect.placeholder(*ordinal));
            args.push(value.clone());
            first = false;
            *ordinal += 1;
        }
        for (column, value) in &self.where_fuzzy {
            sql.push_str(if first { " WHERE " } else { " AND " });
            sql.push_str("lower(");
            sql.push_str(column);
            sql.push_str(") LIKE ");
            sql.push_str(&self.dialect.placeholder(*ordinal));
            args.push(SqlValue::Text(format!("{}%", value.to_lowercase())));
            first = false;
            *ordinal += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_filters() {
        let qb = QueryBuilder::new(Dialect::Postgres, "vehicles");
        let (count_sql, count_args) = qb.build_count();
        let (select_sql, select_args) = qb.build_select();
        assert_eq!(count_sql, "SELECT COUNT(*) FROM vehicles");
        assert_eq!(select_sql, "SELECT * FROM vehicles");
        assert!(count_args.is_empty());
        assert!(select_args.is_empty());
    }

    #[test]
    fn test_count_and_select_share_predicate() {
        let qb = QueryBuilder::new(Dialect::Postgres, "vehicles")
            .exact("year", SqlValue::Int(2015))
            .fuzzy("make", "Alfa")
            .limit(10)
            .offset(20);

        let (count_sql, count_args) = qb.build_count();
        let (select_sql, select_args) = qb.build_select();

        assert_eq!(
            count_sql,
            "SELECT COUNT(*) FROM vehicles WHERE year = $1 AND lower(make) LIKE $2"
        );
        assert_eq!(
            select_sql,
            "SELECT * FROM vehicles WHERE year = $1 AND lower(make) LIKE $2 LIMIT $3 OFFSET $4"
        );
        // Identical predicate parameters, in identical order
        assert_eq!(count_args, select_args[..2].to_vec());
        assert_eq!(select_args[2], SqlValue::Int(10));
        assert_eq!(select_args[3], SqlValue::Int(20));
    }

    #[test]
    fn test_fuzzy_argument_is_lowercased_prefix() {
        let qb = QueryBuilder::new(Dialect::Postgres, "vehicles").fuzzy("make", "Alfa");
        let (_, args) = qb.build_select();
        assert_eq!(args, vec![SqlValue::Text("alfa%".into())]);
    }

    #[test]
    fn test_exact_filters_precede_fuzzy_in_caller_order() {
        let qb = QueryBuilder::new(Dialect::Postgres, "vehicles")
            .fuzzy("model", "gol")
            .exact("year", SqlValue::Int(2020))
            .exact("cylinders", SqlValue::Int(4))
            .fuzzy("make", "vol");
        let (sql, _) = qb.build_count();
        assert_eq!(
            sql,
            "SELECT COUNT(*) FROM vehicles WHERE year = $1 AND cylinders = $2 \
             AND lower(model) LIKE $3 AND lower(make) LIKE $4"
        );
    }

    #[test]
    fn test_zero_limit_and_offset_are_suppressed() {
        let qb = QueryBuilder::new(Dialect::Postgres, "vehicles")
            .exact("year", SqlValue::Int(2015))
            .limit(0)
            .offset(0);
        let (sql, args) = qb.build_select();
        assert_eq!(sql, "SELECT * FROM vehicles WHERE year = $1");
        assert_eq!(args.len(), 1);
    }

    #[test]
    fn test_limit_without_offset_keeps_ordinals_monotonic() {
        let qb = QueryBuilder::new(Dialect::Postgres, "vehicles")
            .fuzzy("make", "che")
            .limit(5);
        let (sql, args) = qb.build_select();
        assert_eq!(
            sql,
            "SELECT * FROM vehicles WHERE lower(make) LIKE $1 LIMIT $2"
        );
        assert_eq!(args.len(), 2);
    }

    #[test]
    fn test_sqlite_placeholders() {
        let qb = QueryBuilder::new(Dialect::Sqlite, "vehicles")
            .exact("year", SqlValue::Int(2015))
            .fuzzy("make", "alfa")
            .limit(10);
        let (sql, _) = qb.build_select();
        assert_eq!(
            sql,
            "SELECT * FROM vehicles WHERE year = ? AND lower(make) LIKE ? LIMIT ?"
        );
    }
}
