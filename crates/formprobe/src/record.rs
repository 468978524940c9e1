//! The record collaborator: attribute-addressable storage entities.
//!
//! The engine never assumes a schema beyond "read an attribute by name". Two
//! records take part in a session: the current record persisted in storage,
//! and optionally a new record holding the values a save should produce.

use serde_json::Value;

use crate::result::FormProbeResult;

/// An external, attribute-addressable entity.
///
/// Attribute values are opaque [`Value`]s; an absent attribute reads as
/// [`Value::Null`]. Relationship-valued attributes may return a related
/// record object, a collection of them, or a list of identifiers.
pub trait Record {
    /// Runtime type of the record, used by the schema provider to resolve
    /// the corresponding edit page
    fn record_type(&self) -> &str;

    /// Read an attribute by name
    fn attribute(&self, name: &str) -> Value;

    /// Reload this record's attributes from persistent storage in place.
    ///
    /// Only the current record is ever refreshed; implementations backing a
    /// detached new record may leave the default no-op.
    fn refresh(&mut self) -> FormProbeResult<()> {
        Ok(())
    }
}
