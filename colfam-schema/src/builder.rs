//! Snapshot construction for table creation and alteration.

use colfam_result::{Error, Result};
use colfam_types::{QualifierEncoding, QualifierValue, StorageScheme};
use rustc_hash::FxHashSet;

use crate::column::{ColumnDescriptor, PrimaryKey, SortOrder};
use crate::counter::QualifierCounter;
use crate::links::RelationshipLinks;
use crate::name::ObjectName;
use crate::reserved::{DEFAULT_COLUMN_FAMILY, INITIAL_SEQUENCE_NUMBER};
use crate::table::{TableDescriptor, TableIdentity, TableProperties};
use crate::version::VersionInfo;

/// Declaration of a column to add to a snapshot under construction.
///
/// Positions and qualifiers are assigned by the builder; a spec only carries
/// what the DDL statement said.
#[derive(Clone, Debug)]
pub struct ColumnSpec {
    name: ObjectName,
    family: Option<ObjectName>,
    nullable: bool,
    row_timestamp: bool,
    sort_order: SortOrder,
}

impl ColumnSpec {
    pub fn new(name: impl Into<ObjectName>) -> Self {
        Self {
            name: name.into(),
            family: None,
            nullable: true,
            row_timestamp: false,
            sort_order: SortOrder::Ascending,
        }
    }

    /// Place the column in an explicit family instead of the default one.
    pub fn with_family(mut self, family: impl Into<ObjectName>) -> Self {
        self.family = Some(family.into());
        self
    }

    pub fn not_null(mut self) -> Self {
        self.nullable = false;
        self
    }

    /// Mark this PK column as the row-timestamp source.
    pub fn with_row_timestamp(mut self, row_timestamp: bool) -> Self {
        self.row_timestamp = row_timestamp;
        self
    }

    pub fn with_sort_order(mut self, sort_order: SortOrder) -> Self {
        self.sort_order = sort_order;
        self
    }
}

impl From<&str> for ColumnSpec {
    fn from(value: &str) -> Self {
        ColumnSpec::new(value)
    }
}

/// Carried-forward pieces of the snapshot being superseded.
#[derive(Clone, Debug)]
struct PriorState {
    sequence_number: u64,
    pk: PrimaryKey,
    columns: Vec<ColumnDescriptor>,
    counter: QualifierCounter,
}

/// Builds the next immutable snapshot of a table.
///
/// This is the model's sole mutating operation, conceptually a constructor:
/// [`TableBuilder::create`] produces a table's first snapshot (sequence 0),
/// [`TableBuilder::alter`] produces the successor of an existing one. The
/// storage and qualifier encoding schemes are fixed here and have no setters
/// afterwards; changing either requires a full physical rewrite, so an
/// altered snapshot always inherits them.
///
/// The builder exclusively owns a deep copy of the prior snapshot's
/// qualifier counter: allocation during the build is invisible to readers
/// still holding the previous generation.
///
/// A failed build returns an error and produces no snapshot; the prior
/// snapshot remains the table's current generation.
#[derive(Debug)]
pub struct TableBuilder {
    identity: TableIdentity,
    storage_scheme: StorageScheme,
    encoding: QualifierEncoding,
    timestamp: u64,
    update_cache_frequency_ms: u64,
    index_disable_timestamp: u64,
    base_column_count: Option<u32>,
    pk_name: Option<ObjectName>,
    salt_buckets: Option<u32>,
    salt_buckets_set: bool,
    props: TableProperties,
    links: RelationshipLinks,
    prior: Option<PriorState>,
    pk_specs: Vec<ColumnSpec>,
    added: Vec<ColumnSpec>,
    removed: Vec<String>,
}

impl TableBuilder {
    /// Start a creation build: the table's first snapshot.
    pub fn create(
        identity: TableIdentity,
        storage_scheme: StorageScheme,
        encoding: QualifierEncoding,
    ) -> Self {
        Self {
            identity,
            storage_scheme,
            encoding,
            timestamp: 0,
            update_cache_frequency_ms: 0,
            index_disable_timestamp: 0,
            base_column_count: None,
            pk_name: None,
            salt_buckets: None,
            salt_buckets_set: false,
            props: TableProperties {
                // New tables are created after the row-key ordering fix.
                row_key_order_optimizable: true,
                ..TableProperties::default()
            },
            links: RelationshipLinks::standalone(),
            prior: None,
            pk_specs: Vec::new(),
            added: Vec::new(),
            removed: Vec::new(),
        }
    }

    /// Start an alteration build from the current snapshot.
    ///
    /// Identity, schemes, primary key, properties, and links carry over; the
    /// qualifier counter is deep-copied so the build owns its allocation
    /// state outright.
    pub fn alter(prior: &TableDescriptor) -> Self {
        Self {
            identity: prior.identity().clone(),
            storage_scheme: prior.storage_scheme(),
            encoding: prior.encoding(),
            timestamp: prior.timestamp(),
            update_cache_frequency_ms: prior.update_cache_frequency_ms(),
            index_disable_timestamp: prior.index_disable_timestamp(),
            base_column_count: Some(prior.base_column_count()),
            pk_name: prior.primary_key().name().cloned(),
            salt_buckets: prior.salt_buckets(),
            salt_buckets_set: false,
            props: prior.properties().clone(),
            links: prior.links().clone(),
            prior: Some(PriorState {
                sequence_number: prior.sequence_number(),
                pk: prior.primary_key().clone(),
                columns: prior.columns().to_vec(),
                counter: prior.counter().copy(),
            }),
            pk_specs: Vec::new(),
            added: Vec::new(),
            removed: Vec::new(),
        }
    }

    pub fn with_timestamp(mut self, timestamp: u64) -> Self {
        self.timestamp = timestamp;
        self
    }

    pub fn with_update_cache_frequency(mut self, millis: u64) -> Self {
        self.update_cache_frequency_ms = millis;
        self
    }

    pub fn with_index_disable_timestamp(mut self, timestamp: u64) -> Self {
        self.index_disable_timestamp = timestamp;
        self
    }

    pub fn with_base_column_count(mut self, count: u32) -> Self {
        self.base_column_count = Some(count);
        self
    }

    pub fn with_pk_name(mut self, name: impl Into<ObjectName>) -> Self {
        self.pk_name = Some(name.into());
        self
    }

    /// Set the salt-bucket count. Only valid on a creation build; the
    /// row-key layout is fixed once rows exist.
    pub fn with_salt_buckets(mut self, buckets: Option<u32>) -> Self {
        self.salt_buckets = buckets;
        self.salt_buckets_set = true;
        self
    }

    pub fn with_properties(mut self, props: TableProperties) -> Self {
        self.props = props;
        self
    }

    pub fn with_links(mut self, links: RelationshipLinks) -> Self {
        self.links = links;
        self
    }

    /// Declare a primary-key column. Only valid on a creation build.
    pub fn add_pk_column(mut self, spec: impl Into<ColumnSpec>) -> Self {
        self.pk_specs.push(spec.into());
        self
    }

    /// Declare a data column to add.
    pub fn add_column(mut self, spec: impl Into<ColumnSpec>) -> Self {
        self.added.push(spec.into());
        self
    }

    /// Declare a column to drop, by bare or `family.column` name.
    pub fn remove_column(mut self, name: impl Into<String>) -> Self {
        self.removed.push(name.into());
        self
    }

    /// Validate the declarations and publish the new snapshot.
    pub fn build(self) -> Result<TableDescriptor> {
        let is_create = self.prior.is_none();

        if !is_create {
            if !self.pk_specs.is_empty() {
                return Err(Error::ConstraintViolation(
                    "primary key columns are fixed at table creation".to_string(),
                ));
            }
            if self.salt_buckets_set {
                return Err(Error::ConstraintViolation(
                    "salt bucket count is fixed at table creation".to_string(),
                ));
            }
        }
        if is_create {
            if self.pk_specs.is_empty() {
                return Err(Error::ConstraintViolation(
                    "a table requires at least one primary key column".to_string(),
                ));
            }
            if !self.removed.is_empty() {
                return Err(Error::ConstraintViolation(
                    "cannot drop columns during table creation".to_string(),
                ));
            }
        }

        let default_family = self
            .props
            .default_family
            .clone()
            .unwrap_or_else(|| ObjectName::new(DEFAULT_COLUMN_FAMILY));

        // Row-key columns. On alteration the prior PK carries over untouched.
        let (pk, mut columns) = match &self.prior {
            Some(prior) => {
                let mut columns = prior.columns.clone();
                self.drop_removed_columns(&mut columns)?;
                (prior.pk.clone(), columns)
            }
            None => {
                let mut pk_columns = Vec::with_capacity(self.pk_specs.len());
                let mut row_timestamp_seen = false;
                for (position, spec) in self.pk_specs.iter().enumerate() {
                    if spec.family.is_some() {
                        return Err(Error::ConstraintViolation(format!(
                            "primary key column '{}' may not declare a family",
                            spec.name
                        )));
                    }
                    if spec.row_timestamp {
                        if row_timestamp_seen {
                            return Err(Error::ConstraintViolation(
                                "only one row-timestamp column is allowed".to_string(),
                            ));
                        }
                        row_timestamp_seen = true;
                    }
                    pk_columns.push(ColumnDescriptor {
                        name: spec.name.clone(),
                        family: None,
                        qualifier: None,
                        encoded_qualifier: None,
                        position: u16::try_from(position).map_err(|_| {
                            Error::ConstraintViolation(
                                "column position space exhausted".to_string(),
                            )
                        })?,
                        // Row-key components are always materialized.
                        nullable: false,
                        row_timestamp: spec.row_timestamp,
                        sort_order: spec.sort_order,
                    });
                }
                let pk = PrimaryKey::new(self.pk_name.clone(), pk_columns.clone(), self.salt_buckets)?;
                (pk, pk_columns)
            }
        };

        // Data columns, with qualifier allocation.
        let mut counter = match &self.prior {
            Some(prior) => prior.counter.copy(),
            None => QualifierCounter::for_encoding(self.encoding),
        };
        for spec in &self.added {
            if spec.row_timestamp {
                return Err(Error::ConstraintViolation(format!(
                    "column '{}' is not a primary key column and cannot be a row timestamp",
                    spec.name
                )));
            }
            if !is_create && !spec.nullable {
                return Err(Error::ConstraintViolation(format!(
                    "column '{}' must be nullable when added to an existing table",
                    spec.name
                )));
            }
            let family = spec.family.clone().unwrap_or_else(|| default_family.clone());
            let duplicate = columns.iter().any(|c| {
                c.name == spec.name
                    && match &c.family {
                        Some(existing) => *existing == family,
                        None => true,
                    }
            });
            if duplicate {
                return Err(Error::ConstraintViolation(format!(
                    "column '{}' already exists in family '{family}'",
                    spec.name
                )));
            }

            let (qualifier, encoded_qualifier) = if self.encoding.is_numbered() {
                let next = counter.peek(family.canonical()).ok_or_else(|| {
                    Error::Internal("numbering encoding scheme with a disabled counter".to_string())
                })?;
                let value = QualifierValue::Number(next);
                if !self.encoding.is_encodeable(&value) {
                    return Err(Error::NotEncodeable(format!(
                        "family '{family}' has exhausted the {} qualifier range",
                        self.encoding
                    )));
                }
                let bytes = self.encoding.encode(&value)?;
                if !counter.increment(Some(family.canonical())) {
                    return Err(Error::Internal(format!(
                        "failed to advance qualifier counter for family '{family}'"
                    )));
                }
                (Some(bytes), Some(next))
            } else {
                let bytes = self
                    .encoding
                    .encode(&QualifierValue::Name(spec.name.display().to_string()))?;
                (Some(bytes), None)
            };

            columns.push(ColumnDescriptor {
                name: spec.name.clone(),
                family: Some(family),
                qualifier,
                encoded_qualifier,
                position: 0, // fixed up below
                nullable: spec.nullable,
                row_timestamp: false,
                sort_order: spec.sort_order,
            });
        }

        for (position, column) in columns.iter_mut().enumerate() {
            column.position = u16::try_from(position).map_err(|_| {
                Error::ConstraintViolation("column position space exhausted".to_string())
            })?;
        }

        // Qualifiers must stay unique within each family.
        let mut seen: FxHashSet<(&str, &[u8])> = FxHashSet::default();
        for column in &columns {
            if let (Some(family), Some(qualifier)) = (&column.family, &column.qualifier)
                && !seen.insert((family.canonical(), qualifier.as_slice()))
            {
                return Err(Error::ConstraintViolation(format!(
                    "duplicate qualifier {qualifier:?} in family '{family}'"
                )));
            }
        }

        if self.identity.kind.is_derived() && self.links.resolved_physical_name().is_none() {
            return Err(Error::ConstraintViolation(format!(
                "{} '{}' has no physical store name",
                self.identity.kind.token(),
                self.identity.full_name()
            )));
        }

        let sequence_number = match &self.prior {
            Some(prior) => prior.sequence_number.checked_add(1).ok_or_else(|| {
                Error::Internal("table sequence number space exhausted".to_string())
            })?,
            None => INITIAL_SEQUENCE_NUMBER,
        };

        let version = VersionInfo {
            timestamp: self.timestamp,
            sequence_number,
            base_column_count: self.base_column_count.unwrap_or(0),
            update_cache_frequency_ms: self.update_cache_frequency_ms,
            index_disable_timestamp: self.index_disable_timestamp,
        };

        tracing::debug!(
            table = %self.identity.full_name(),
            sequence = sequence_number,
            added = self.added.len(),
            removed = self.removed.len(),
            "publishing table snapshot"
        );

        TableDescriptor::from_parts(
            self.identity,
            version,
            pk,
            columns,
            self.storage_scheme,
            self.encoding,
            counter,
            self.links,
            self.props,
        )
    }

    fn drop_removed_columns(&self, columns: &mut Vec<ColumnDescriptor>) -> Result<()> {
        for name in &self.removed {
            if self.props.append_only_schema {
                return Err(Error::ConstraintViolation(format!(
                    "cannot drop column '{name}' from an append-only schema"
                )));
            }
            let matches: Vec<usize> = match name.split_once('.') {
                Some((family, column)) => {
                    let family = family.to_ascii_lowercase();
                    let column = column.to_ascii_lowercase();
                    columns
                        .iter()
                        .enumerate()
                        .filter(|(_, c)| {
                            c.name.canonical() == column
                                && c.family.as_ref().is_some_and(|f| f.canonical() == family)
                        })
                        .map(|(idx, _)| idx)
                        .collect()
                }
                None => {
                    let column = name.to_ascii_lowercase();
                    columns
                        .iter()
                        .enumerate()
                        .filter(|(_, c)| c.name.canonical() == column)
                        .map(|(idx, _)| idx)
                        .collect()
                }
            };
            let idx = match matches.as_slice() {
                [] => return Err(Error::ColumnNotFound(name.clone())),
                [idx] => *idx,
                _ => return Err(Error::AmbiguousColumn(name.clone())),
            };
            if columns[idx].is_pk() {
                return Err(Error::ConstraintViolation(format!(
                    "cannot drop primary key column '{name}'"
                )));
            }
            columns.remove(idx);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::name::TableName;
    use crate::reserved::ENCODED_QUALIFIER_INITIAL_VALUE;
    use colfam_types::TableKind;

    fn identity(name: &str) -> TableIdentity {
        TableIdentity::new(TableName::from_qualified(name), TableKind::Table)
    }

    fn simple_table() -> TableDescriptor {
        TableBuilder::create(
            identity("s.t"),
            StorageScheme::OneCellPerColumn,
            QualifierEncoding::FourByte,
        )
        .with_timestamp(100)
        .add_pk_column(ColumnSpec::new("id"))
        .add_column(ColumnSpec::new("v1").with_family("a"))
        .build()
        .unwrap()
    }

    #[test]
    fn create_starts_at_sequence_zero() {
        let table = simple_table();
        assert_eq!(table.sequence_number(), INITIAL_SEQUENCE_NUMBER);
        assert_eq!(table.columns().len(), 2);
        assert_eq!(
            table.column("v1").unwrap().encoded_qualifier,
            Some(ENCODED_QUALIFIER_INITIAL_VALUE)
        );
    }

    #[test]
    fn create_requires_pk() {
        let err = TableBuilder::create(
            identity("s.t"),
            StorageScheme::OneCellPerColumn,
            QualifierEncoding::FourByte,
        )
        .add_column(ColumnSpec::new("v1"))
        .build()
        .unwrap_err();
        assert!(matches!(err, Error::ConstraintViolation(_)));
    }

    #[test]
    fn alter_increments_sequence_and_preserves_prior() {
        let v1 = simple_table();
        let v2 = TableBuilder::alter(&v1)
            .with_timestamp(200)
            .add_column(ColumnSpec::new("v2").with_family("a"))
            .build()
            .unwrap();

        assert_eq!(v2.sequence_number(), v1.sequence_number() + 1);
        assert_eq!(
            v2.column("v2").unwrap().encoded_qualifier,
            Some(ENCODED_QUALIFIER_INITIAL_VALUE + 1)
        );
        // The superseded snapshot is untouched.
        assert_eq!(v1.columns().len(), 2);
        assert!(v1.column("v2").is_err());
    }

    #[test]
    fn alter_cannot_touch_pk_or_salt() {
        let table = simple_table();
        assert!(matches!(
            TableBuilder::alter(&table)
                .add_pk_column(ColumnSpec::new("id2"))
                .build(),
            Err(Error::ConstraintViolation(_))
        ));
        assert!(matches!(
            TableBuilder::alter(&table)
                .with_salt_buckets(Some(4))
                .build(),
            Err(Error::ConstraintViolation(_))
        ));
    }

    #[test]
    fn added_column_must_be_nullable_on_alter() {
        let table = simple_table();
        let err = TableBuilder::alter(&table)
            .add_column(ColumnSpec::new("v2").with_family("a").not_null())
            .build()
            .unwrap_err();
        assert!(matches!(err, Error::ConstraintViolation(_)));
    }

    #[test]
    fn duplicate_column_in_family_rejected() {
        let err = TableBuilder::create(
            identity("s.t"),
            StorageScheme::OneCellPerColumn,
            QualifierEncoding::FourByte,
        )
        .add_pk_column(ColumnSpec::new("id"))
        .add_column(ColumnSpec::new("v1").with_family("a"))
        .add_column(ColumnSpec::new("V1").with_family("A"))
        .build()
        .unwrap_err();
        assert!(matches!(err, Error::ConstraintViolation(_)));
    }

    #[test]
    fn same_name_allowed_across_families() {
        let table = TableBuilder::create(
            identity("s.t"),
            StorageScheme::OneCellPerColumn,
            QualifierEncoding::FourByte,
        )
        .add_pk_column(ColumnSpec::new("id"))
        .add_column(ColumnSpec::new("v").with_family("a"))
        .add_column(ColumnSpec::new("v").with_family("b"))
        .build()
        .unwrap();

        assert!(matches!(table.column("v"), Err(Error::AmbiguousColumn(_))));
        assert_eq!(
            table.column("b.v").unwrap().family.as_ref().unwrap().display(),
            "b"
        );
    }

    #[test]
    fn row_timestamp_restricted_to_pk() {
        let err = TableBuilder::create(
            identity("s.t"),
            StorageScheme::OneCellPerColumn,
            QualifierEncoding::FourByte,
        )
        .add_pk_column(ColumnSpec::new("id"))
        .add_column(ColumnSpec::new("v").with_family("a").with_row_timestamp(true))
        .build()
        .unwrap_err();
        assert!(matches!(err, Error::ConstraintViolation(_)));
    }

    #[test]
    fn drop_column_recomputes_positions() {
        let v1 = TableBuilder::create(
            identity("s.t"),
            StorageScheme::OneCellPerColumn,
            QualifierEncoding::FourByte,
        )
        .add_pk_column(ColumnSpec::new("id"))
        .add_column(ColumnSpec::new("v1").with_family("a"))
        .add_column(ColumnSpec::new("v2").with_family("a"))
        .build()
        .unwrap();

        let v2 = TableBuilder::alter(&v1).remove_column("a.v1").build().unwrap();
        assert!(v2.column("v1").is_err());
        let survivor = v2.column("v2").unwrap();
        assert_eq!(survivor.position, 1);
        // Allocation state survives the drop; the number is not reused.
        let v3 = TableBuilder::alter(&v2)
            .add_column(ColumnSpec::new("v3").with_family("a"))
            .build()
            .unwrap();
        assert_eq!(
            v3.column("v3").unwrap().encoded_qualifier,
            Some(ENCODED_QUALIFIER_INITIAL_VALUE + 2)
        );
    }

    #[test]
    fn drop_pk_column_rejected() {
        let table = simple_table();
        assert!(matches!(
            TableBuilder::alter(&table).remove_column("id").build(),
            Err(Error::ConstraintViolation(_))
        ));
    }

    #[test]
    fn drop_unknown_column_not_found() {
        let table = simple_table();
        assert!(matches!(
            TableBuilder::alter(&table).remove_column("nope").build(),
            Err(Error::ColumnNotFound(_))
        ));
    }

    #[test]
    fn append_only_schema_blocks_drops() {
        let v1 = TableBuilder::create(
            identity("s.t"),
            StorageScheme::OneCellPerColumn,
            QualifierEncoding::FourByte,
        )
        .with_properties(TableProperties {
            append_only_schema: true,
            row_key_order_optimizable: true,
            ..TableProperties::default()
        })
        .add_pk_column(ColumnSpec::new("id"))
        .add_column(ColumnSpec::new("v1").with_family("a"))
        .build()
        .unwrap();

        assert!(matches!(
            TableBuilder::alter(&v1).remove_column("a.v1").build(),
            Err(Error::ConstraintViolation(_))
        ));
    }

    #[test]
    fn non_encoded_tables_use_name_qualifiers() {
        let table = TableBuilder::create(
            identity("s.t"),
            StorageScheme::OneCellPerColumn,
            QualifierEncoding::NonEncoded,
        )
        .add_pk_column(ColumnSpec::new("id"))
        .add_column(ColumnSpec::new("v1").with_family("a"))
        .build()
        .unwrap();

        assert!(table.counter().is_disabled());
        let column = table.column("v1").unwrap();
        assert_eq!(column.qualifier.as_deref(), Some(b"v1".as_slice()));
        assert_eq!(column.encoded_qualifier, None);
    }

    #[test]
    fn unimplemented_width_cannot_build_columns() {
        let err = TableBuilder::create(
            identity("s.t"),
            StorageScheme::OneCellPerColumn,
            QualifierEncoding::TwoByte,
        )
        .add_pk_column(ColumnSpec::new("id"))
        .add_column(ColumnSpec::new("v1").with_family("a"))
        .build()
        .unwrap_err();
        assert!(matches!(err, Error::Unsupported(_)));
    }

    #[test]
    fn derived_objects_need_a_physical_name() {
        let err = TableBuilder::create(
            TableIdentity::new(TableName::from_qualified("s.v"), TableKind::View),
            StorageScheme::OneCellPerColumn,
            QualifierEncoding::FourByte,
        )
        .add_pk_column(ColumnSpec::new("id"))
        .build()
        .unwrap_err();
        assert!(matches!(err, Error::ConstraintViolation(_)));
    }

    #[test]
    fn descending_pk_gates_row_key_order() {
        let table = TableBuilder::create(
            identity("s.t"),
            StorageScheme::OneCellPerColumn,
            QualifierEncoding::FourByte,
        )
        .add_pk_column(ColumnSpec::new("id").with_sort_order(SortOrder::Descending))
        .build()
        .unwrap();
        // Created after the compatibility fix, so still optimizable.
        assert!(table.row_key_order_optimizable());

        // A pre-fix snapshot with a descending PK column is not.
        let mut props = table.properties().clone();
        props.row_key_order_optimizable = false;
        let mut state = table.to_state();
        state.props = props;
        let legacy = TableDescriptor::from_state(state).unwrap();
        assert!(!legacy.row_key_order_optimizable());
    }
}
