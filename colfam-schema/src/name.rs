//! Object and table naming.
//!
//! Names keep two forms: the display form as the user wrote it and a
//! canonical lowercase form used as the lookup key. Relationship edges in the
//! catalog are addressed by these names (a rooted forest of catalog keys),
//! never by embedded snapshot pointers.

use std::fmt;

use bitcode::{Decode, Encode};

/// A single schema-object name (table, schema, family, or column).
///
/// Preserves the original casing for display while comparing and hashing by
/// the canonical lowercase form.
#[derive(Clone, Debug, Encode, Decode)]
pub struct ObjectName {
    display: String,
    canonical: String,
}

impl ObjectName {
    pub fn new(name: impl Into<String>) -> Self {
        let display = name.into();
        let canonical = display.to_ascii_lowercase();
        Self { display, canonical }
    }

    /// The name as originally written.
    pub fn display(&self) -> &str {
        &self.display
    }

    /// The lowercase lookup key.
    pub fn canonical(&self) -> &str {
        &self.canonical
    }

    /// UTF-8 bytes of the display form, as persisted in the store.
    pub fn as_bytes(&self) -> &[u8] {
        self.display.as_bytes()
    }
}

impl PartialEq for ObjectName {
    fn eq(&self, other: &Self) -> bool {
        self.canonical == other.canonical
    }
}

impl Eq for ObjectName {}

impl std::hash::Hash for ObjectName {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.canonical.hash(state);
    }
}

impl fmt::Display for ObjectName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display)
    }
}

impl From<&str> for ObjectName {
    fn from(value: &str) -> Self {
        ObjectName::new(value)
    }
}

impl From<String> for ObjectName {
    fn from(value: String) -> Self {
        ObjectName::new(value)
    }
}

/// A fully addressed table name: optional tenant, optional schema, table.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Encode, Decode)]
pub struct TableName {
    tenant: Option<ObjectName>,
    schema: Option<ObjectName>,
    table: ObjectName,
}

impl TableName {
    pub fn new<T>(tenant: Option<ObjectName>, schema: Option<ObjectName>, table: T) -> Self
    where
        T: Into<ObjectName>,
    {
        Self {
            tenant,
            schema,
            table: table.into(),
        }
    }

    /// Parse a pre-formatted `schema.table` string (no tenant component).
    ///
    /// Strings without a dot are treated as bare table names.
    pub fn from_qualified(name: &str) -> Self {
        match name.split_once('.') {
            Some((schema, table)) if !table.is_empty() => Self {
                tenant: None,
                schema: Some(ObjectName::new(schema)),
                table: ObjectName::new(table),
            },
            _ => Self {
                tenant: None,
                schema: None,
                table: ObjectName::new(name),
            },
        }
    }

    pub fn tenant(&self) -> Option<&ObjectName> {
        self.tenant.as_ref()
    }

    pub fn schema(&self) -> Option<&ObjectName> {
        self.schema.as_ref()
    }

    pub fn table(&self) -> &ObjectName {
        &self.table
    }

    /// Format as `schema.table` (or just `table` if schema is absent).
    pub fn full_name(&self) -> String {
        match &self.schema {
            Some(schema) => format!("{schema}.{}", self.table),
            None => self.table.display().to_string(),
        }
    }

    /// The catalog cache key for this name.
    pub fn key(&self) -> TableKey {
        TableKey {
            tenant: self.tenant.as_ref().map(|n| n.canonical().to_string()),
            schema: self.schema.as_ref().map(|n| n.canonical().to_string()),
            table: self.table.canonical().to_string(),
        }
    }
}

impl fmt::Display for TableName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.full_name())
    }
}

impl From<&str> for TableName {
    fn from(value: &str) -> Self {
        TableName::from_qualified(value)
    }
}

/// Canonical key identifying a logical table in an external catalog cache.
///
/// External caches store snapshots keyed by (tenant, schema, table); the
/// timestamp axis is theirs to manage.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Encode, Decode)]
pub struct TableKey {
    tenant: Option<String>,
    schema: Option<String>,
    table: String,
}

impl TableKey {
    pub fn tenant(&self) -> Option<&str> {
        self.tenant.as_deref()
    }

    pub fn schema(&self) -> Option<&str> {
        self.schema.as_deref()
    }

    pub fn table(&self) -> &str {
        &self.table
    }
}
