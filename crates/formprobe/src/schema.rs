//! The schema collaborator: resolving a record to its edit page.
//!
//! The host application's form-schema engine knows which edit page belongs
//! to a record's type, how to build the page's URL for a concrete record,
//! and which fields the page renders in which order. The engine consumes
//! that knowledge through [`SchemaProvider`] and memoizes the result once
//! per session.

use crate::field::FieldList;
use crate::record::Record;
use crate::result::FormProbeResult;

/// A resolved edit page: display name, navigable URL for one record, and the
/// flattened, ordered field list (nested/grouped structures already
/// flattened by the provider).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditPage {
    /// Page name used in messages and verbose traces (e.g. `EditUser`)
    pub name: String,
    /// URL of the edit page for the record the page was resolved against
    pub url: String,
    /// Ordered field list, insertion order = rendering order
    pub fields: FieldList,
}

impl EditPage {
    /// Create an edit page descriptor
    #[must_use]
    pub fn new(name: impl Into<String>, url: impl Into<String>, fields: FieldList) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
            fields,
        }
    }
}

/// Resolves a record's runtime type to its edit page descriptor.
pub trait SchemaProvider {
    /// Resolve the edit page for the given record, including the URL for
    /// that concrete record and the flattened field list
    fn edit_page(&self, record: &dyn Record) -> FormProbeResult<EditPage>;
}
