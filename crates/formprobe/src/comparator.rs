//! Compare: verify the refreshed current record equals the intended values.
//!
//! Runs entirely against the two records — the browser is out of the
//! picture by now. Each field kind defines its own equality semantics
//! (booleans compare as booleans, structured values ignore ordering, rich
//! text loses one layer of editor wrapping, date-times compare by canonical
//! string, null-safe).

use std::fmt::Debug;

use serde::Serialize;
use serde_json::Value;

use crate::field::FieldKind;
use crate::handler::Behavior;
use crate::result::FormProbeResult;
use crate::value::{
    canonical_datetime, canonical_eq, coerce_structured, is_truthy, loose_eq,
    strip_rich_text_wrap, title_projection, to_display_string,
};
use crate::viewer::FieldStep;

/// Result of one field's post-save check, serializable for report output
#[derive(Debug, Clone, Serialize)]
pub struct AssertionResult {
    /// Whether the check passed
    pub passed: bool,
    /// Human-readable message, empty on pass
    pub message: String,
}

impl AssertionResult {
    /// A passing result
    #[must_use]
    pub const fn pass() -> Self {
        Self {
            passed: true,
            message: String::new(),
        }
    }

    /// A failing result with the given message
    #[must_use]
    pub fn fail(message: impl Into<String>) -> Self {
        Self {
            passed: false,
            message: message.into(),
        }
    }
}

fn verdict<T: Debug>(step: &FieldStep<'_>, matches: bool, saved: &T, intended: &T) -> AssertionResult {
    if matches {
        AssertionResult::pass()
    } else {
        AssertionResult::fail(format!(
            "values differ after save for '{}' on {} ({}): saved {saved:?}, intended {intended:?}",
            step.name(),
            step.page_name,
            step.field.kind(),
        ))
    }
}

/// Check one field's saved value against the intended value, per the field
/// kind's equality semantics.
pub(crate) fn compare_field(
    step: &FieldStep<'_>,
    current: &Value,
    new: &Value,
) -> FormProbeResult<AssertionResult> {
    let result = match step.field.kind() {
        FieldKind::TextInput
        | FieldKind::Textarea
        | FieldKind::TimePicker
        | FieldKind::ToggleButtons
        | FieldKind::Select => verdict(step, loose_eq(current, new), current, new),

        FieldKind::CodeEditor | FieldKind::KeyValue => {
            let saved = coerce_structured(current);
            let intended = coerce_structured(new);
            verdict(step, canonical_eq(&saved, &intended), &saved, &intended)
        }

        FieldKind::CheckboxList => {
            if step.field.config().has_relationship() {
                let title = step
                    .field
                    .config()
                    .relationship_title_attribute
                    .as_deref()
                    .unwrap_or("name");
                let saved = title_projection(current, title);
                let intended = title_projection(new, title);
                verdict(step, canonical_eq(&saved, &intended), &saved, &intended)
            } else {
                verdict(step, canonical_eq(current, new), current, new)
            }
        }

        FieldKind::Checkbox | FieldKind::Toggle => {
            let saved = is_truthy(current);
            let intended = is_truthy(new);
            verdict(step, saved == intended, &saved, &intended)
        }

        FieldKind::RichEditor => {
            let saved = to_display_string(current);
            let stripped = strip_rich_text_wrap(&saved).to_string();
            let intended = to_display_string(new);
            verdict(step, stripped == intended, &stripped, &intended)
        }

        FieldKind::DateTimePicker | FieldKind::DatePicker => {
            let saved = canonical_datetime(current);
            let intended = canonical_datetime(new);
            verdict(step, saved == intended, &saved, &intended)
        }

        FieldKind::Custom(_) => return Err(step.unsupported(Behavior::Compare)),
    };
    Ok(result)
}
