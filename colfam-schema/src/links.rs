//! Relationship metadata between tables, views, and indexes.

use bitcode::{Decode, Encode};
use colfam_types::LinkType;

use crate::name::TableName;

/// How a snapshot relates to other schema objects in the catalog.
///
/// All relationships are expressed as catalog name references. The
/// table/view/index graph is a rooted forest addressed by those keys;
/// resolving a reference to another snapshot goes through an external
/// catalog lookup, so no snapshot ever owns another.
#[derive(Clone, Debug, PartialEq, Eq, Encode, Decode, Default)]
pub struct RelationshipLinks {
    /// Parent object, present only for views and indexes.
    pub parent: Option<TableName>,
    /// Physical tables actually holding this object's rows. Views and
    /// indexes carry at least one entry; the first entry is the store that
    /// resolves reads.
    pub physical_names: Vec<TableName>,
    /// Identities of the indexes defined over this table.
    pub indexes: Vec<TableName>,
    /// Classification of the parent-child edge, when one is registered.
    pub link_type: Option<LinkType>,
    /// The defining statement, for views.
    pub view_statement: Option<String>,
    /// Identifier slot shared by view indexes over the same physical table.
    pub view_index_id: Option<i16>,
}

impl RelationshipLinks {
    /// Links for a standalone base table.
    pub fn standalone() -> Self {
        Self::default()
    }

    /// Links for a derived object (view or index) over `parent`.
    pub fn derived(parent: TableName, link_type: LinkType, physical: TableName) -> Self {
        Self {
            parent: Some(parent),
            physical_names: vec![physical],
            ..Self::default()
        }
        .with_link_type(link_type)
    }

    fn with_link_type(mut self, link_type: LinkType) -> Self {
        self.link_type = Some(link_type);
        self
    }

    /// The store name that resolves reads, when one is registered.
    pub fn resolved_physical_name(&self) -> Option<&TableName> {
        self.physical_names.first()
    }
}
