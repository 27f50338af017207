//! Database-specific SQL fragments
//!
//! Encapsulates the two things that differ between supported backends:
//! placeholder syntax and the strategy for retrieving a generated
//! primary key after INSERT. Postgres uses positional-named `$n`
//! placeholders and a `RETURNING` clause; sqlite uses `?` placeholders
//! and the connection's last-inserted rowid (see [`crate::mapper`]).

use crate::error::SrmError;

/// Supported storage backends.
///
/// Immutable and stateless; copied freely alongside the pool handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dialect {
    Postgres,
    Sqlite,
}

impl Dialect {
    /// Resolve a configured backend identifier.
    ///
    /// Unrecognized identifiers fail fast at initialization.
    pub fn from_backend(name: &str) -> Result<Self, SrmError> {
        match name {
            "postgres" | "postgresql" => Ok(Dialect::Postgres),
            "sqlite" | "sqlite3" => Ok(Dialect::Sqlite),
            other => Err(SrmError::UnsupportedBackend(other.to_string())),
        }
    }

    /// Placeholder token for the given 1-based ordinal.
    pub fn placeholder(self, ordinal: usize) -> String {
        match self {
            Dialect::Postgres => format!("${}", ordinal),
            Dialect::Sqlite => "?".to_string(),
        }
    }

    /// Statement suffix appended to INSERT when the backend returns the
    /// generated key in the result set.
    pub fn insert_suffix(self, pk_column: &str) -> String {
        match self {
            Dialect::Postgres => format!(" RETURNING {}", pk_column),
            Dialect::Sqlite => String::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_placeholders() {
        assert_eq!(Dialect::Postgres.placeholder(1), "$1");
        assert_eq!(Dialect::Postgres.placeholder(12), "$12");
        assert_eq!(Dialect::Sqlite.placeholder(1), "?");
        assert_eq!(Dialect::Sqlite.placeholder(12), "?");
    }

    #[test]
    fn test_insert_suffix() {
        assert_eq!(Dialect::Postgres.insert_suffix("id"), " RETURNING id");
        assert_eq!(Dialect::Sqlite.insert_suffix("id"), "");
    }

    #[test]
    fn test_from_backend() {
        assert_eq!(Dialect::from_backend("postgres").unwrap(), Dialect::Postgres);
        assert_eq!(Dialect::from_backend("sqlite3").unwrap(), Dialect::Sqlite);
        assert!(matches!(
            Dialect::from_backend("oracle"),
            Err(SrmError::UnsupportedBackend(_))
        ));
    }
}
