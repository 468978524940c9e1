//! Browser-driven verification of auto-generated record edit pages.
//!
//! An admin panel renders an edit form per record type from a declarative
//! schema. `formprobe` drives a real browser against such a form and checks
//! the full round trip for every field:
//!
//! - **preview** — the page displays the current record's stored values,
//! - **fill** — new values can be written through each widget and submitted,
//! - **save** — after refresh, storage holds exactly the intended values.
//!
//! The engine is generic over three collaborators: a [`SchemaProvider`]
//! resolving records to their edit pages, a [`BrowserDriver`] executing page
//! interactions, and [`Record`]s exposing stored attributes. Field processing
//! dispatches on the declared [`FieldKind`]; host-specific widgets plug in
//! through [`CustomFieldHandler`].
//!
//! ```no_run
//! use formprobe::{EditPageProbe, mock::{MemoryRecord, MockBrowser, StaticSchema}};
//! use formprobe::{EditPage, FieldDescriptor, FieldKind, FieldList};
//! use serde_json::json;
//!
//! # fn main() -> formprobe::FormProbeResult<()> {
//! let fields = FieldList::new()
//!     .with_field(FieldDescriptor::new("name", FieldKind::TextInput));
//! let schema = StaticSchema::new()
//!     .with_page("user", EditPage::new("EditUser", "/admin/users/{record}/edit", fields));
//! let current = MemoryRecord::new("user")
//!     .with_attribute("id", json!(1))
//!     .with_attribute("name", json!("John"));
//! let new = MemoryRecord::new("user").with_attribute("name", json!("Jane"));
//!
//! let mut probe = EditPageProbe::new(schema, MockBrowser::new(), current).with_new(new);
//! probe.required_visible_fields(&["name"])?.test_save()?;
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

use std::sync::Once;

mod comparator;
pub mod driver;
pub mod field;
mod filler;
pub mod handler;
pub mod iteration;
pub mod mock;
pub mod record;
pub mod result;
pub mod schema;
pub mod selector;
pub mod session;
pub mod value;
mod viewer;

pub use comparator::AssertionResult;
pub use driver::BrowserDriver;
pub use field::{
    CodeLanguage, FieldConfig, FieldDescriptor, FieldKind, FieldList, SelectOption,
};
pub use handler::{Behavior, CompareFieldHook, CustomFieldHandler, FieldFlow, PageFieldHook};
pub use iteration::Iteration;
pub use record::Record;
pub use result::{FormProbeError, FormProbeResult};
pub use schema::{EditPage, SchemaProvider};
pub use selector::FieldSelector;
pub use session::{
    EditPageProbe, DEFAULT_DATETIME_DISPLAY_FORMAT, DEFAULT_DATE_DISPLAY_FORMAT,
};
pub use value::DisplayMap;

static TRACING_INIT: Once = Once::new();

/// Install the process-wide tracing subscriber, reading the filter from
/// `RUST_LOG`. Safe to call from every test or binary entry point; only the
/// first call installs.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_target(false)
            .try_init();
    });
}
