//! Field-descriptor metadata for mapped record types
//!
//! Each record type registers a compile-time table of
//! [`FieldDescriptor`]s: column name, semantic kind, role, and getter /
//! setter function pointers. The table drives statement generation in
//! one direction (which columns participate in writes) and row scanning
//! in the other (which result column lands in which field). Both
//! directions read the same table, so the column set seen by writes and
//! reads can never diverge.
//!
//! Exactly five semantic kinds are supported; anything else is
//! unrepresentable by construction.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Wire value passed between records and the database.
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    Text(String),
    Int(i64),
    Float(f64),
    Bool(bool),
    Timestamp(DateTime<Utc>),
    /// NULL read from storage; converts to each kind's zero value.
    Null,
}

impl SqlValue {
    pub fn into_text(self) -> String {
        match self {
            SqlValue::Text(s) => s,
            _ => String::new(),
        }
    }

    pub fn into_int(self) -> i64 {
        match self {
            SqlValue::Int(i) => i,
            _ => 0,
        }
    }

    pub fn into_float(self) -> f64 {
        match self {
            SqlValue::Float(f) => f,
            _ => 0.0,
        }
    }

    pub fn into_bool(self) -> bool {
        match self {
            SqlValue::Bool(b) => b,
            _ => false,
        }
    }

    pub fn into_timestamp(self) -> Timestamp {
        match self {
            SqlValue::Timestamp(t) => Timestamp(t),
            _ => Timestamp::default(),
        }
    }
}

/// Timestamp field wrapper whose zero value is the Unix epoch.
///
/// Exists so record types can derive `Default`; serializes transparently
/// as the inner RFC 3339 datetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Timestamp(pub DateTime<Utc>);

impl Default for Timestamp {
    fn default() -> Self {
        Timestamp(DateTime::<Utc>::UNIX_EPOCH)
    }
}

impl From<DateTime<Utc>> for Timestamp {
    fn from(t: DateTime<Utc>) -> Self {
        Timestamp(t)
    }
}

/// Semantic kind of a mapped field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Int,
    Float,
    Bool,
    Timestamp,
}

/// Role of a field with respect to writes.
///
/// `PrimaryKey` and `AutoSet` fields are excluded from INSERT / UPDATE
/// column sets but still receive values when scanning result rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldRole {
    Data,
    PrimaryKey,
    /// Server-managed column (e.g. an update timestamp default).
    AutoSet,
}

/// One entry in a record type's descriptor table.
pub struct FieldDescriptor<T> {
    pub column: &'static str,
    pub kind: FieldKind,
    pub role: FieldRole,
    pub get: fn(&T) -> SqlValue,
    pub set: fn(&mut T, SqlValue),
}

impl<T> FieldDescriptor<T> {
    pub const fn text(
        column: &'static str,
        get: fn(&T) -> SqlValue,
        set: fn(&mut T, SqlValue),
    ) -> Self {
        Self { column, kind: FieldKind::Text, role: FieldRole::Data, get, set }
    }

    pub const fn int(
        column: &'static str,
        get: fn(&T) -> SqlValue,
        set: fn(&mut T, SqlValue),
    ) -> Self {
        Self { column, kind: FieldKind::Int, role: FieldRole::Data, get, set }
    }

    pub const fn float(
        column: &'static str,
        get: fn(&T) -> SqlValue,
        set: fn(&mut T, SqlValue),
    ) -> Self {
        Self { column, kind: FieldKind::Float, role: FieldRole::Data, get, set }
    }

    pub const fn boolean(
        column: &'static str,
        get: fn(&T) -> SqlValue,
        set: fn(&mut T, SqlValue),
    ) -> Self {
        Self { column, kind: FieldKind::Bool, role: FieldRole::Data, get, set }
    }

    pub const fn timestamp(
        column: &'static str,
        get: fn(&T) -> SqlValue,
        set: fn(&mut T, SqlValue),
    ) -> Self {
        Self { column, kind: FieldKind::Timestamp, role: FieldRole::Data, get, set }
    }

    pub const fn primary_key(mut self) -> Self {
        self.role = FieldRole::PrimaryKey;
        self
    }

    pub const fn auto_set(mut self) -> Self {
        self.role = FieldRole::AutoSet;
        self
    }
}

/// A record type mapped onto one relational table.
pub trait Relational: Default + Send + Sync + Sized + 'static {
    /// Descriptor table, in declaration order.
    fn fields() -> &'static [FieldDescriptor<Self>];
}

/// Descriptors eligible for INSERT / UPDATE column sets.
pub fn write_fields<T: Relational>() -> Vec<&'static FieldDescriptor<T>> {
    T::fields()
        .iter()
        .filter(|f| f.role == FieldRole::Data)
        .collect()
}

/// Positional scan targets for a result set's column names.
///
/// Columns are matched case-insensitively; a result column with no
/// descriptor maps to `None` and its value is read but discarded, so
/// `SELECT *` tolerates columns not modeled on the record.
pub fn read_targets<T: Relational>(columns: &[&str]) -> Vec<Option<&'static FieldDescriptor<T>>> {
    columns
        .iter()
        .map(|name| {
            T::fields()
                .iter()
                .find(|f| f.column.eq_ignore_ascii_case(name))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Default)]
    struct Widget {
        id: i64,
        updated: Timestamp,
        label: String,
        weight: f64,
        active: bool,
    }

    impl Relational for Widget {
        fn fields() -> &'static [FieldDescriptor<Self>] {
            static FIELDS: &[FieldDescriptor<Widget>] = &[
                FieldDescriptor::int(
                    "id",
                    |w: &Widget| SqlValue::Int(w.id),
                    |w: &mut Widget, v| w.id = v.into_int(),
                )
                .primary_key(),
                FieldDescriptor::timestamp(
                    "updated",
                    |w: &Widget| SqlValue::Timestamp(w.updated.0),
                    |w: &mut Widget, v| w.updated = v.into_timestamp(),
                )
                .auto_set(),
                FieldDescriptor::text(
                    "label",
                    |w: &Widget| SqlValue::Text(w.label.clone()),
                    |w: &mut Widget, v| w.label = v.into_text(),
                ),
                FieldDescriptor::float(
                    "weight",
                    |w: &Widget| SqlValue::Float(w.weight),
                    |w: &mut Widget, v| w.weight = v.into_float(),
                ),
                FieldDescriptor::boolean(
                    "active",
                    |w: &Widget| SqlValue::Bool(w.active),
                    |w: &mut Widget, v| w.active = v.into_bool(),
                ),
            ];
            FIELDS
        }
    }

    #[test]
    fn test_write_fields_exclude_pk_and_auto_set() {
        let cols: Vec<&str> = write_fields::<Widget>().iter().map(|f| f.column).collect();
        assert_eq!(cols, vec!["label", "weight", "active"]);
    }

    #[test]
    fn test_read_targets_match_case_insensitively() {
        let targets = read_targets::<Widget>(&["LABEL", "id", "Weight"]);
        assert_eq!(targets[0].unwrap().column, "label");
        assert_eq!(targets[1].unwrap().column, "id");
        assert_eq!(targets[2].unwrap().column, "weight");
    }

    #[test]
    fn test_read_targets_discard_unknown_columns() {
        let targets = read_targets::<Widget>(&["label", "legacy_column"]);
        assert!(targets[0].is_some());
        assert!(targets[1].is_none());
    }

    #[test]
    fn test_read_targets_include_pk_and_auto_set() {
        // Reads must cover the full column set or scanned records would
        // silently keep zero values in id / updated.
        let targets = read_targets::<Widget>(&["id", "updated"]);
        assert!(targets.iter().all(|t| t.is_some()));
    }

    #[test]
    fn test_sql_value_zero_conversions() {
        assert_eq!(SqlValue::Null.into_text(), "");
        assert_eq!(SqlValue::Null.into_int(), 0);
        assert_eq!(SqlValue::Null.into_float(), 0.0);
        assert!(!SqlValue::Null.into_bool());
        assert_eq!(SqlValue::Null.into_timestamp(), Timestamp::default());
    }

    #[test]
    fn test_setters_round_trip() {
        let mut w = Widget::default();
        let fields = Widget::fields();
        (fields[2].set)(&mut w, SqlValue::Text("wheel".into()));
        (fields[3].set)(&mut w, SqlValue::Float(2.5));
        (fields[4].set)(&mut w, SqlValue::Bool(true));
        assert_eq!(w.label, "wheel");
        assert_eq!(w.weight, 2.5);
        assert!(w.active);
        assert_eq!((fields[2].get)(&w), SqlValue::Text("wheel".into()));
    }
}
