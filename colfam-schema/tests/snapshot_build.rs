//! End-to-end snapshot construction and lookup behavior.

use colfam_result::Error;
use colfam_schema::reserved::ENCODED_QUALIFIER_INITIAL_VALUE;
use colfam_schema::{
    ColumnSpec, RelationshipLinks, TableBuilder, TableDescriptor, TableIdentity, TableName,
};
use colfam_types::{LinkType, QualifierEncoding, StorageScheme, TableKind, ViewType};

fn table_identity(name: &str) -> TableIdentity {
    TableIdentity::new(TableName::from_qualified(name), TableKind::Table)
}

#[test]
fn packed_family_table_allocates_sequential_qualifiers() {
    // Create with ONE_CELL_PER_FAMILY storage and four-byte qualifiers, then
    // add three columns to family "A".
    let table = TableBuilder::create(
        table_identity("s.metrics"),
        StorageScheme::OneCellPerFamily,
        QualifierEncoding::FourByte,
    )
    .with_timestamp(1_000)
    .add_pk_column(ColumnSpec::new("id"))
    .add_column(ColumnSpec::new("col1").with_family("A"))
    .add_column(ColumnSpec::new("col2").with_family("A"))
    .add_column(ColumnSpec::new("col3").with_family("A"))
    .build()
    .expect("create table");

    let allocated: Vec<u32> = table
        .family("A")
        .expect("family A")
        .columns
        .iter()
        .map(|c| c.encoded_qualifier.expect("encoded qualifier"))
        .collect();
    assert_eq!(
        allocated,
        vec![
            ENCODED_QUALIFIER_INITIAL_VALUE,
            ENCODED_QUALIFIER_INITIAL_VALUE + 1,
            ENCODED_QUALIFIER_INITIAL_VALUE + 2,
        ]
    );

    // The second column resolves identically by qualifier bytes and by
    // qualified name.
    let col2 = table.column("A.col2").expect("qualified lookup");
    let by_qualifier = table
        .column_for_qualifier(b"A", col2.qualifier.as_deref().expect("qualifier bytes"))
        .expect("qualifier lookup");
    assert_eq!(by_qualifier, col2);
    assert_eq!(
        col2.encoded_qualifier,
        Some(ENCODED_QUALIFIER_INITIAL_VALUE + 1)
    );

    // Physical qualifier bytes are 4-byte big-endian.
    assert_eq!(
        col2.qualifier.as_deref(),
        Some((ENCODED_QUALIFIER_INITIAL_VALUE + 1).to_be_bytes().as_slice())
    );
}

#[test]
fn lookups_report_missing_and_ambiguous_names() {
    let table = TableBuilder::create(
        table_identity("s.t"),
        StorageScheme::OneCellPerColumn,
        QualifierEncoding::FourByte,
    )
    .add_pk_column(ColumnSpec::new("id"))
    .add_column(ColumnSpec::new("v").with_family("a"))
    .add_column(ColumnSpec::new("v").with_family("b"))
    .add_column(ColumnSpec::new("only_a").with_family("a"))
    .build()
    .expect("create table");

    assert!(matches!(table.family("c"), Err(Error::FamilyNotFound(_))));
    assert!(matches!(table.column("nope"), Err(Error::ColumnNotFound(_))));
    assert!(matches!(table.column("v"), Err(Error::AmbiguousColumn(_))));
    assert_eq!(table.column("only_a").unwrap().qualified_name(), "a.only_a");
    assert_eq!(table.column("b.v").unwrap().qualified_name(), "b.v");

    assert_eq!(table.pk_column("id").unwrap().position, 0);
    assert!(matches!(table.pk_column("v"), Err(Error::ColumnNotFound(_))));

    assert!(matches!(
        table.column_for_qualifier(b"a", &[0, 0, 0, 0]),
        Err(Error::ColumnNotFound(_))
    ));
}

#[test]
fn view_links_resolve_through_catalog_names() {
    let parent = TableName::from_qualified("s.base");
    let view = TableBuilder::create(
        TableIdentity::new(TableName::from_qualified("s.view"), TableKind::View),
        StorageScheme::OneCellPerColumn,
        QualifierEncoding::FourByte,
    )
    .with_links(RelationshipLinks {
        view_statement: Some("SELECT * FROM s.base WHERE kind = 'x'".to_string()),
        ..RelationshipLinks::derived(parent.clone(), LinkType::PhysicalTable, parent)
    })
    .with_properties({
        let mut props = colfam_schema::TableProperties::default();
        props.row_key_order_optimizable = true;
        props.view_type = Some(ViewType::Updatable);
        props
    })
    .add_pk_column(ColumnSpec::new("id"))
    .build()
    .expect("create view");

    assert_eq!(view.parent_name().as_deref(), Some("s.base"));
    assert_eq!(view.parent_table_name().unwrap().display(), "base");
    assert_eq!(view.parent_schema_name().unwrap().display(), "s");
    assert_eq!(view.physical_name().full_name(), "s.base");
    assert_eq!(view.links().link_type, Some(LinkType::PhysicalTable));

    // Effective view type folds in every ancestor level; order of folding
    // does not matter.
    let own = view.properties().view_type.expect("view type");
    assert_eq!(own.combine(Some(ViewType::Updatable)), ViewType::Updatable);
    assert_eq!(own.combine(Some(ViewType::ReadOnly)), ViewType::ReadOnly);
}

#[test]
fn base_tables_are_their_own_physical_store() {
    let table = TableBuilder::create(
        table_identity("s.t"),
        StorageScheme::OneCellPerColumn,
        QualifierEncoding::FourByte,
    )
    .add_pk_column(ColumnSpec::new("id"))
    .build()
    .expect("create table");

    assert!(table.parent_name().is_none());
    assert_eq!(table.physical_name().full_name(), "s.t");
}

#[test]
fn snapshot_state_roundtrips_with_lookup_indices() {
    let v1 = TableBuilder::create(
        table_identity("s.t"),
        StorageScheme::OneCellPerFamily,
        QualifierEncoding::FourByte,
    )
    .with_timestamp(5)
    .add_pk_column(ColumnSpec::new("tenant"))
    .add_pk_column(ColumnSpec::new("id"))
    .add_column(ColumnSpec::new("v1").with_family("a"))
    .build()
    .expect("create table");

    let encoded = bitcode::encode(&v1.to_state());
    let state = bitcode::decode(&encoded).expect("decode state");
    let restored = TableDescriptor::from_state(state).expect("rebuild");

    assert_eq!(restored.sequence_number(), v1.sequence_number());
    assert_eq!(restored.pk_columns().len(), 2);
    assert_eq!(
        restored.column("a.v1").unwrap(),
        v1.column("a.v1").unwrap()
    );
    assert_eq!(restored.counter(), v1.counter());

    // Alteration of the restored snapshot continues the allocation and
    // version sequence exactly where the original left off.
    let v2 = TableBuilder::alter(&restored)
        .with_timestamp(6)
        .add_column(ColumnSpec::new("v2").with_family("a"))
        .build()
        .expect("alter table");
    assert_eq!(v2.sequence_number(), v1.sequence_number() + 1);
    assert_eq!(
        v2.column("v2").unwrap().encoded_qualifier,
        Some(ENCODED_QUALIFIER_INITIAL_VALUE + 1)
    );
}
