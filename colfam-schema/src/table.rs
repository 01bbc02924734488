//! Immutable table snapshots and their lookup indices.

use bitcode::{Decode, Encode};
use colfam_result::{Error, Result};
use colfam_types::{IndexType, QualifierEncoding, StorageScheme, TableKind, ViewType};
use rustc_hash::FxHashMap;

use crate::column::{ColumnDescriptor, ColumnFamilyDescriptor, PrimaryKey};
use crate::counter::{QualifierCounter, QualifierCounterState};
use crate::links::RelationshipLinks;
use crate::name::{ObjectName, TableKey, TableName};
use crate::version::VersionInfo;

/// Who a snapshot is: addressing plus classification.
#[derive(Clone, Debug, PartialEq, Eq, Encode, Decode)]
pub struct TableIdentity {
    pub name: TableName,
    pub kind: TableKind,
}

impl TableIdentity {
    pub fn new(name: TableName, kind: TableKind) -> Self {
        Self { name, kind }
    }

    pub fn full_name(&self) -> String {
        self.name.full_name()
    }

    pub fn key(&self) -> TableKey {
        self.name.key()
    }
}

/// Table-level property flags carried on every snapshot.
#[derive(Clone, Debug, PartialEq, Eq, Encode, Decode, Default)]
pub struct TableProperties {
    /// Rows are written once and never updated in place.
    pub immutable_rows: bool,
    /// Write-ahead logging is turned off for this table.
    pub wal_disabled: bool,
    /// Rows are partitioned by a leading tenant id.
    pub multi_tenant: bool,
    /// Null column values are stored as explicit cells.
    pub store_nulls: bool,
    /// Writes go through the transaction layer.
    pub transactional: bool,
    /// The schema name maps to a store-level namespace.
    pub namespace_mapped: bool,
    /// Columns may only ever be added, never dropped.
    pub append_only_schema: bool,
    /// Compatibility flag: row-key order optimizations were validated for
    /// this table. Pre-fix tables with descending PK columns carry `false`.
    pub row_key_order_optimizable: bool,
    /// Family used for columns declared without one.
    pub default_family: Option<ObjectName>,
    /// View classification, for views.
    pub view_type: Option<ViewType>,
    /// Index classification, for indexes.
    pub index_type: Option<IndexType>,
}

/// An immutable snapshot of a table's metadata.
///
/// Snapshots are produced by [`crate::builder::TableBuilder`] and never
/// mutated afterwards; a schema alteration builds a fully independent
/// successor. All lookup indices are derived at construction, so concurrent
/// reads require no synchronization.
#[derive(Clone, Debug)]
pub struct TableDescriptor {
    identity: TableIdentity,
    version: VersionInfo,
    pk: PrimaryKey,
    columns: Vec<ColumnDescriptor>,
    families: Vec<ColumnFamilyDescriptor>,
    storage_scheme: StorageScheme,
    encoding: QualifierEncoding,
    counter: QualifierCounter,
    links: RelationshipLinks,
    props: TableProperties,

    // Derived lookup indices, keyed by canonical names. Values index into
    // `families` / `columns`.
    family_index: FxHashMap<String, usize>,
    bare_column_index: FxHashMap<String, Vec<usize>>,
    qualifier_index: FxHashMap<(String, Vec<u8>), Vec<usize>>,
    pk_column_index: FxHashMap<String, usize>,
}

impl TableDescriptor {
    /// Assemble a snapshot from its parts, deriving families and lookup
    /// indices.
    ///
    /// Structural consistency (positions contiguous, PK columns leading) is
    /// verified here and fails [`Error::CatalogError`]; semantic DDL rules
    /// are the builder's job.
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn from_parts(
        identity: TableIdentity,
        version: VersionInfo,
        pk: PrimaryKey,
        columns: Vec<ColumnDescriptor>,
        storage_scheme: StorageScheme,
        encoding: QualifierEncoding,
        counter: QualifierCounter,
        links: RelationshipLinks,
        props: TableProperties,
    ) -> Result<Self> {
        let pk_len = pk.columns().len();
        for (idx, column) in columns.iter().enumerate() {
            if column.position as usize != idx {
                return Err(Error::CatalogError(format!(
                    "column '{}' has position {} but sits at index {idx}",
                    column.name, column.position
                )));
            }
            if (idx < pk_len) != column.is_pk() {
                return Err(Error::CatalogError(format!(
                    "column '{}' breaks the PK-columns-first ordering",
                    column.name
                )));
            }
        }

        // Families preserve first-appearance order of their columns.
        let mut families: Vec<ColumnFamilyDescriptor> = Vec::new();
        let mut family_index: FxHashMap<String, usize> = FxHashMap::default();
        for column in &columns {
            let Some(family) = &column.family else {
                continue;
            };
            let slot = *family_index
                .entry(family.canonical().to_string())
                .or_insert_with(|| {
                    families.push(ColumnFamilyDescriptor {
                        name: family.clone(),
                        columns: Vec::new(),
                    });
                    families.len() - 1
                });
            families[slot].columns.push(column.clone());
        }

        let mut bare_column_index: FxHashMap<String, Vec<usize>> = FxHashMap::default();
        let mut qualifier_index: FxHashMap<(String, Vec<u8>), Vec<usize>> = FxHashMap::default();
        let mut pk_column_index: FxHashMap<String, usize> = FxHashMap::default();
        for (idx, column) in columns.iter().enumerate() {
            bare_column_index
                .entry(column.name.canonical().to_string())
                .or_default()
                .push(idx);
            if let (Some(family), Some(qualifier)) = (&column.family, &column.qualifier) {
                qualifier_index
                    .entry((family.canonical().to_string(), qualifier.clone()))
                    .or_default()
                    .push(idx);
            }
            if column.is_pk() {
                pk_column_index.insert(column.name.canonical().to_string(), idx);
            }
        }

        tracing::debug!(
            table = %identity.full_name(),
            sequence = version.sequence_number,
            columns = columns.len(),
            families = families.len(),
            "assembled table snapshot"
        );

        Ok(Self {
            identity,
            version,
            pk,
            columns,
            families,
            storage_scheme,
            encoding,
            counter,
            links,
            props,
            family_index,
            bare_column_index,
            qualifier_index,
            pk_column_index,
        })
    }

    // ---- Identity and version accessors ----

    pub fn identity(&self) -> &TableIdentity {
        &self.identity
    }

    pub fn kind(&self) -> TableKind {
        self.identity.kind
    }

    pub fn tenant(&self) -> Option<&ObjectName> {
        self.identity.name.tenant()
    }

    pub fn schema_name(&self) -> Option<&ObjectName> {
        self.identity.name.schema()
    }

    pub fn table_name(&self) -> &ObjectName {
        self.identity.name.table()
    }

    pub fn full_name(&self) -> String {
        self.identity.full_name()
    }

    /// Catalog cache key: (tenant, schema, table).
    pub fn key(&self) -> TableKey {
        self.identity.key()
    }

    pub fn version(&self) -> &VersionInfo {
        &self.version
    }

    pub fn timestamp(&self) -> u64 {
        self.version.timestamp
    }

    pub fn sequence_number(&self) -> u64 {
        self.version.sequence_number
    }

    pub fn base_column_count(&self) -> u32 {
        self.version.base_column_count
    }

    pub fn update_cache_frequency_ms(&self) -> u64 {
        self.version.update_cache_frequency_ms
    }

    pub fn index_disable_timestamp(&self) -> u64 {
        self.version.index_disable_timestamp
    }

    pub fn properties(&self) -> &TableProperties {
        &self.props
    }

    pub fn is_namespace_mapped(&self) -> bool {
        self.props.namespace_mapped
    }

    pub fn is_append_only_schema(&self) -> bool {
        self.props.append_only_schema
    }

    // ---- Structural accessors ----

    /// PK columns in row-key order.
    pub fn pk_columns(&self) -> &[ColumnDescriptor] {
        self.pk.columns()
    }

    pub fn primary_key(&self) -> &PrimaryKey {
        &self.pk
    }

    /// All columns ordered by position, PK columns first.
    pub fn columns(&self) -> &[ColumnDescriptor] {
        &self.columns
    }

    /// Column families ordered by first appearance.
    pub fn column_families(&self) -> &[ColumnFamilyDescriptor] {
        &self.families
    }

    pub fn salt_buckets(&self) -> Option<u32> {
        self.pk.salt_buckets()
    }

    pub fn storage_scheme(&self) -> StorageScheme {
        self.storage_scheme
    }

    pub fn encoding(&self) -> QualifierEncoding {
        self.encoding
    }

    /// The carried-forward qualifier allocation state.
    pub fn counter(&self) -> &QualifierCounter {
        &self.counter
    }

    /// Position of the row-timestamp PK column, if one was declared.
    pub fn row_timestamp_column_position(&self) -> Option<usize> {
        self.pk
            .columns()
            .iter()
            .position(|c| c.row_timestamp)
    }

    /// Whether ORDER BY / GROUP BY may be optimized out against row-key
    /// order.
    ///
    /// True unless the table uses descending PK columns and predates the
    /// row-key ordering compatibility fix.
    pub fn row_key_order_optimizable(&self) -> bool {
        self.props.row_key_order_optimizable || !self.pk.has_descending_column()
    }

    // ---- Lookup operations ----

    /// Resolve a column family by name.
    pub fn family(&self, name: &str) -> Result<&ColumnFamilyDescriptor> {
        self.family_index
            .get(&name.to_ascii_lowercase())
            .map(|&idx| &self.families[idx])
            .ok_or_else(|| Error::FamilyNotFound(name.to_string()))
    }

    /// Resolve a column family by its name bytes.
    pub fn family_bytes(&self, name: &[u8]) -> Result<&ColumnFamilyDescriptor> {
        let name = std::str::from_utf8(name)
            .map_err(|_| Error::FamilyNotFound(String::from_utf8_lossy(name).into_owned()))?;
        self.family(name)
    }

    /// Resolve a column by bare or `family.column`-qualified name.
    ///
    /// Bare names that match columns in several families fail
    /// [`Error::AmbiguousColumn`]; qualify the name to disambiguate.
    pub fn column(&self, name: &str) -> Result<&ColumnDescriptor> {
        if let Some((family, column)) = name.split_once('.') {
            let family = self
                .family(family)
                .map_err(|_| Error::ColumnNotFound(name.to_string()))?;
            return family
                .column(column)
                .map_err(|_| Error::ColumnNotFound(name.to_string()));
        }
        match self
            .bare_column_index
            .get(&name.to_ascii_lowercase())
            .map(Vec::as_slice)
        {
            None | Some([]) => Err(Error::ColumnNotFound(name.to_string())),
            Some([idx]) => Ok(&self.columns[*idx]),
            Some(_) => Err(Error::AmbiguousColumn(name.to_string())),
        }
    }

    /// Resolve a PK column by name.
    pub fn pk_column(&self, name: &str) -> Result<&ColumnDescriptor> {
        self.pk_column_index
            .get(&name.to_ascii_lowercase())
            .map(|&idx| &self.columns[idx])
            .ok_or_else(|| Error::ColumnNotFound(name.to_string()))
    }

    /// Resolve a column by (family bytes, qualifier bytes).
    ///
    /// Snapshots published by the builder hold at most one column per
    /// (family, qualifier) pair; rehydrated state that violates that
    /// uniqueness surfaces [`Error::AmbiguousColumn`] here rather than
    /// silently picking one.
    pub fn column_for_qualifier(
        &self,
        family: &[u8],
        qualifier: &[u8],
    ) -> Result<&ColumnDescriptor> {
        let family = self.family_bytes(family)?;
        let key = (family.name.canonical().to_string(), qualifier.to_vec());
        match self.qualifier_index.get(&key).map(Vec::as_slice) {
            None | Some([]) => Err(Error::ColumnNotFound(format!(
                "qualifier {qualifier:?} in family '{}'",
                family.name
            ))),
            Some([idx]) => Ok(&self.columns[*idx]),
            Some(_) => Err(Error::AmbiguousColumn(format!(
                "qualifier {qualifier:?} in family '{}'",
                family.name
            ))),
        }
    }

    // ---- Relationship accessors ----

    pub fn links(&self) -> &RelationshipLinks {
        &self.links
    }

    /// Full name of the parent object; `None` unless this is a view or
    /// index.
    pub fn parent_name(&self) -> Option<String> {
        self.links.parent.as_ref().map(TableName::full_name)
    }

    pub fn parent_table_name(&self) -> Option<&ObjectName> {
        self.links.parent.as_ref().map(TableName::table)
    }

    pub fn parent_schema_name(&self) -> Option<&ObjectName> {
        self.links.parent.as_ref().and_then(TableName::schema)
    }

    /// All physical store names registered for this object.
    pub fn physical_names(&self) -> &[TableName] {
        &self.links.physical_names
    }

    /// The store name actually holding this object's rows. Falls back to the
    /// object's own name for base tables, which are their own store.
    pub fn physical_name(&self) -> TableName {
        self.links
            .resolved_physical_name()
            .cloned()
            .unwrap_or_else(|| self.identity.name.clone())
    }

    /// Identities of the indexes defined over this table.
    pub fn indexes(&self) -> &[TableName] {
        &self.links.indexes
    }

    // ---- Serialization ----

    /// Export the snapshot into its serializable form.
    pub fn to_state(&self) -> TableState {
        TableState {
            identity: self.identity.clone(),
            version: self.version,
            pk: self.pk.clone(),
            columns: self.columns.clone(),
            storage_scheme: self.storage_scheme,
            encoding: self.encoding,
            counter: self.counter.to_state(),
            links: self.links.clone(),
            props: self.props.clone(),
        }
    }

    /// Rebuild a snapshot (including lookup indices) from persisted state.
    pub fn from_state(state: TableState) -> Result<Self> {
        let TableState {
            identity,
            version,
            pk,
            columns,
            storage_scheme,
            encoding,
            counter,
            links,
            props,
        } = state;
        Self::from_parts(
            identity,
            version,
            pk,
            columns,
            storage_scheme,
            encoding,
            QualifierCounter::from_state(&counter),
            links,
            props,
        )
    }
}

/// Serializable snapshot state; lookup indices are derived on rebuild.
#[derive(Clone, Debug, Encode, Decode)]
pub struct TableState {
    pub identity: TableIdentity,
    pub version: VersionInfo,
    pub pk: PrimaryKey,
    pub columns: Vec<ColumnDescriptor>,
    pub storage_scheme: StorageScheme,
    pub encoding: QualifierEncoding,
    pub counter: QualifierCounterState,
    pub links: RelationshipLinks,
    pub props: TableProperties,
}
