//! Record-to-relational mapping engine
//!
//! A small, dialect-abstracted CRUD layer: domain records declare a
//! compile-time field-descriptor table ([`Relational`]) and the
//! [`DbMap`] builds and executes INSERT / UPDATE / UPSERT / SELECT /
//! DELETE statements against one connection pool and one [`Dialect`].
//! [`QueryBuilder`] composes parameterized COUNT and SELECT queries
//! over the same filter predicates for ad-hoc listing.

pub mod dialect;
pub mod error;
pub mod mapper;
pub mod query;
pub mod record;

pub use dialect::Dialect;
pub use error::SrmError;
pub use mapper::{DbMap, DbPool};
pub use query::QueryBuilder;
pub use record::{FieldDescriptor, FieldKind, FieldRole, Relational, SqlValue, Timestamp};
