//! Custom field handlers and per-field control flow.
//!
//! Before default dispatch, each field is offered to the session's registered
//! handler. A hook that returns [`FieldFlow::Skip`] ends processing for that
//! field and behavior — the handler owns all side effects for it. Returning
//! [`FieldFlow::Continue`] hands the field back to the built-in recipe table
//! unmodified. A single handler may internally dispatch on the field's
//! concrete kind and cover several host-specific widgets.

use std::fmt;

use crate::driver::BrowserDriver;
use crate::field::FieldDescriptor;
use crate::iteration::Iteration;
use crate::record::Record;
use crate::result::FormProbeResult;

/// One of the three verbs performed per field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Behavior {
    /// Write the new record's value into the live page
    Fill,
    /// Assert the page displays the current record's value
    Preview,
    /// Assert post-save storage equals the intended value
    Compare,
}

impl fmt::Display for Behavior {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fill => f.write_str("fill"),
            Self::Preview => f.write_str("preview"),
            Self::Compare => f.write_str("compare"),
        }
    }
}

/// Whether default dispatch proceeds for the field at hand
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldFlow {
    /// Proceed with the built-in recipe
    Continue,
    /// The field is fully handled (or deliberately ignored); do nothing more
    Skip,
}

impl FieldFlow {
    /// Whether this outcome short-circuits default dispatch
    #[must_use]
    pub const fn is_skip(self) -> bool {
        matches!(self, Self::Skip)
    }
}

/// Host-supplied capability object that may intercept fields before default
/// dispatch, per behavior. Hooks decide per call whether they apply,
/// typically by matching on the field's kind; the defaults apply to nothing.
pub trait CustomFieldHandler {
    /// Fill hook, offered the field before the built-in fill recipe
    fn fill(&self, iteration: &mut Iteration<'_>) -> FormProbeResult<FieldFlow> {
        let _ = iteration;
        Ok(FieldFlow::Continue)
    }

    /// Preview hook, offered the field before the built-in preview recipe
    fn preview(&self, iteration: &mut Iteration<'_>) -> FormProbeResult<FieldFlow> {
        let _ = iteration;
        Ok(FieldFlow::Continue)
    }

    /// Compare hook, offered the field before the built-in equality recipe
    fn compare(&self, iteration: &mut Iteration<'_>) -> FormProbeResult<FieldFlow> {
        let _ = iteration;
        Ok(FieldFlow::Continue)
    }
}

/// Pre-behavior callback for fill and preview: receives the field name, its
/// descriptor and the live browser handle, and may skip the field
pub type PageFieldHook =
    Box<dyn FnMut(&str, &FieldDescriptor, &mut dyn BrowserDriver) -> FormProbeResult<FieldFlow>>;

/// Pre-behavior callback for compare: receives the field name, its
/// descriptor and both records, and may skip the field
pub type CompareFieldHook = Box<
    dyn FnMut(&str, &FieldDescriptor, &dyn Record, &dyn Record) -> FormProbeResult<FieldFlow>,
>;
