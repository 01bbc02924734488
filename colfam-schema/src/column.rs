//! Column, column-family, and primary-key descriptors.

use bitcode::{Decode, Encode};
use colfam_result::{Error, Result};

use crate::name::ObjectName;

/// Sort direction of a row-key component.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Encode, Decode, Default)]
pub enum SortOrder {
    #[default]
    Ascending,
    Descending,
}

impl SortOrder {
    #[inline]
    pub fn is_descending(self) -> bool {
        self == SortOrder::Descending
    }
}

/// Metadata for a single column of a table snapshot.
///
/// Primary-key columns carry no family and no qualifier: their values live in
/// the row key itself. Every other column belongs to exactly one family and
/// is addressed by its qualifier bytes within that family.
#[derive(Clone, Debug, PartialEq, Eq, Encode, Decode)]
pub struct ColumnDescriptor {
    /// Logical column name.
    pub name: ObjectName,
    /// Owning column family; `None` for primary-key columns.
    pub family: Option<ObjectName>,
    /// Physical qualifier bytes within the family; `None` for PK columns.
    pub qualifier: Option<Vec<u8>>,
    /// Counter-allocated qualifier number, when the table's encoding scheme
    /// assigns one.
    pub encoded_qualifier: Option<u32>,
    /// 0-based position in the table's full column list. PK columns first,
    /// in row-key order.
    pub position: u16,
    /// Whether the column admits missing values.
    pub nullable: bool,
    /// Whether this PK column sources the row timestamp.
    pub row_timestamp: bool,
    /// Row-key sort direction; only meaningful for PK columns.
    pub sort_order: SortOrder,
}

impl ColumnDescriptor {
    /// Whether this column is part of the primary key.
    #[inline]
    pub fn is_pk(&self) -> bool {
        self.family.is_none()
    }

    /// `family.column` for data columns, the bare name for PK columns.
    pub fn qualified_name(&self) -> String {
        match &self.family {
            Some(family) => format!("{family}.{}", self.name),
            None => self.name.display().to_string(),
        }
    }
}

/// A column family and its member columns, ordered by position.
#[derive(Clone, Debug, PartialEq, Eq, Encode, Decode)]
pub struct ColumnFamilyDescriptor {
    pub name: ObjectName,
    pub columns: Vec<ColumnDescriptor>,
}

impl ColumnFamilyDescriptor {
    /// Look up a member column by logical name.
    pub fn column(&self, name: &str) -> Result<&ColumnDescriptor> {
        let canonical = name.to_ascii_lowercase();
        self.columns
            .iter()
            .find(|c| c.name.canonical() == canonical)
            .ok_or_else(|| Error::ColumnNotFound(format!("{}.{name}", self.name)))
    }

    /// Look up a member column by its physical qualifier bytes.
    pub fn column_for_qualifier(&self, qualifier: &[u8]) -> Result<&ColumnDescriptor> {
        self.columns
            .iter()
            .find(|c| c.qualifier.as_deref() == Some(qualifier))
            .ok_or_else(|| {
                Error::ColumnNotFound(format!(
                    "qualifier {qualifier:?} in family '{}'",
                    self.name
                ))
            })
    }
}

/// The primary-key constraint of a table: the ordered row-key columns plus
/// optional write-spreading salt.
#[derive(Clone, Debug, PartialEq, Eq, Encode, Decode)]
pub struct PrimaryKey {
    name: Option<ObjectName>,
    columns: Vec<ColumnDescriptor>,
    salt_buckets: Option<u32>,
}

impl PrimaryKey {
    /// Build a primary key, validating the salt-bucket count.
    ///
    /// `salt_buckets` is `None` for unsalted tables; when present it must be
    /// a positive bucket count.
    pub fn new(
        name: Option<ObjectName>,
        columns: Vec<ColumnDescriptor>,
        salt_buckets: Option<u32>,
    ) -> Result<Self> {
        if salt_buckets == Some(0) {
            return Err(Error::ConstraintViolation(
                "salt bucket count must be positive".to_string(),
            ));
        }
        Ok(Self {
            name,
            columns,
            salt_buckets,
        })
    }

    /// Optional constraint name from the DDL.
    pub fn name(&self) -> Option<&ObjectName> {
        self.name.as_ref()
    }

    /// PK columns in row-key (join-key) order. This order is fixed at table
    /// creation and never changes across snapshots.
    pub fn columns(&self) -> &[ColumnDescriptor] {
        &self.columns
    }

    /// Number of row-key prefix buckets, `None` when the table is unsalted.
    pub fn salt_buckets(&self) -> Option<u32> {
        self.salt_buckets
    }

    /// Whether any row-key component sorts descending.
    pub fn has_descending_column(&self) -> bool {
        self.columns.iter().any(|c| c.sort_order.is_descending())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn col(name: &str, family: Option<&str>, position: u16) -> ColumnDescriptor {
        ColumnDescriptor {
            name: ObjectName::new(name),
            family: family.map(ObjectName::new),
            qualifier: family.map(|_| name.as_bytes().to_vec()),
            encoded_qualifier: None,
            position,
            nullable: family.is_some(),
            row_timestamp: false,
            sort_order: SortOrder::Ascending,
        }
    }

    #[test]
    fn pk_membership_follows_family() {
        assert!(col("id", None, 0).is_pk());
        assert!(!col("v", Some("a"), 1).is_pk());
    }

    #[test]
    fn family_lookup_by_name_and_qualifier() {
        let family = ColumnFamilyDescriptor {
            name: ObjectName::new("A"),
            columns: vec![col("v1", Some("A"), 1), col("v2", Some("A"), 2)],
        };
        assert_eq!(family.column("V2").unwrap().name.display(), "v2");
        assert!(matches!(
            family.column("missing"),
            Err(Error::ColumnNotFound(_))
        ));
        assert_eq!(
            family.column_for_qualifier(b"v1").unwrap().name.display(),
            "v1"
        );
        assert!(family.column_for_qualifier(b"zz").is_err());
    }

    #[test]
    fn zero_salt_buckets_rejected() {
        assert!(matches!(
            PrimaryKey::new(None, vec![col("id", None, 0)], Some(0)),
            Err(Error::ConstraintViolation(_))
        ));
        let pk = PrimaryKey::new(None, vec![col("id", None, 0)], Some(8)).unwrap();
        assert_eq!(pk.salt_buckets(), Some(8));
    }
}
