//! Preview: assert the edit page displays the current record's values.
//!
//! Also home to the per-field dispatch context shared by the fill and
//! compare engines, including value display map resolution and checkbox-list
//! membership — preview is where display mapping originates, and the other
//! behaviors reuse its rules.

use serde_json::Value;
use tracing::debug;

use crate::driver::BrowserDriver;
use crate::field::{CodeLanguage, FieldDescriptor, FieldKind};
use crate::handler::Behavior;
use crate::result::{FormProbeError, FormProbeResult};
use crate::selector::FieldSelector;
use crate::value::{
    canonical_eq, coerce_structured, format_datetime_display, is_empty_value, is_truthy,
    key_value_entries, plain_membership, relation_keys, to_display_string, DisplayMap,
};

/// Display formats applied when previewing picker fields
#[derive(Debug, Clone, Copy)]
pub(crate) struct DisplayFormats<'a> {
    /// Format for date-time pickers
    pub datetime: &'a str,
    /// Format for date-only pickers
    pub date: &'a str,
}

/// Everything the default recipes need to process one field: the
/// descriptor, a selector builder scoped to its name, the owning page's
/// name for messages, and the field's display map if configured.
pub(crate) struct FieldStep<'a> {
    pub field: &'a FieldDescriptor,
    pub page_name: &'a str,
    pub selector: FieldSelector,
    pub display_map: Option<&'a DisplayMap>,
    pub verbose: bool,
}

impl<'a> FieldStep<'a> {
    pub(crate) fn new(
        field: &'a FieldDescriptor,
        page_name: &'a str,
        display_map: Option<&'a DisplayMap>,
        verbose: bool,
    ) -> Self {
        Self {
            selector: FieldSelector::new(field.name()),
            field,
            page_name,
            display_map,
            verbose,
        }
    }

    pub(crate) fn name(&self) -> &str {
        self.field.name()
    }

    pub(crate) fn unsupported(&self, behavior: Behavior) -> FormProbeError {
        FormProbeError::UnsupportedFieldKind {
            field: self.field.name().to_string(),
            kind: self.field.kind().to_string(),
            behavior: behavior.to_string(),
            page: self.page_name.to_string(),
        }
    }

    /// Look up the human-readable text configured for a raw value
    pub(crate) fn display_value(&self, raw: &Value) -> Option<Value> {
        let mapped = self.display_map?.get(&to_display_string(raw)).cloned();
        if self.verbose {
            if let Some(mapped_value) = &mapped {
                debug!(
                    field = self.field.name(),
                    raw = %raw,
                    display = %mapped_value,
                    "display map consulted"
                );
            }
        }
        mapped
    }

    /// Intended membership of one rendered checkbox-list option.
    ///
    /// A display map entry for the option decides by its truthiness;
    /// otherwise relation-backed fields test the option against the
    /// relationship's key collection and plain fields test direct
    /// membership. The two storage shapes are not interchangeable.
    pub(crate) fn membership(&self, value: &Value, option: &str) -> bool {
        if let Some(mapped) = self.display_value(&Value::String(option.to_string())) {
            return is_truthy(&mapped);
        }
        if self.field.config().has_relationship() {
            relation_keys(value).iter().any(|key| key == option)
        } else {
            plain_membership(value, option)
        }
    }
}

/// Script reading the values of every rendered option of a checkbox list
pub(crate) fn checkbox_values_script(selector: &FieldSelector) -> String {
    format!(
        "[...document.querySelectorAll('{}')].map(el => el.value)",
        FieldSelector::escape(&selector.checkbox_list_items())
    )
}

/// Script counting the rendered rows of a key-value table
pub(crate) fn key_value_row_count_script(selector: &FieldSelector) -> String {
    format!(
        "document.querySelectorAll('{}').length",
        FieldSelector::escape(&selector.key_value_rows())
    )
}

/// Assert the page displays the current record's value for one field,
/// per the field kind's preview recipe.
pub(crate) fn preview_field(
    step: &FieldStep<'_>,
    driver: &mut dyn BrowserDriver,
    current: &Value,
    formats: DisplayFormats<'_>,
) -> FormProbeResult<()> {
    let s = &step.selector;
    match step.field.kind() {
        FieldKind::TextInput | FieldKind::Textarea => {
            driver.assert_value(&s.input(), &to_display_string(current))
        }

        FieldKind::Select => {
            if is_empty_value(current) {
                driver.assert_visible(&s.dropdown_placeholder())
            } else {
                let key = to_display_string(current);
                let expected = match step.display_value(current) {
                    Some(mapped) => to_display_string(&mapped),
                    // Fall back to the option's own rendered text
                    None => driver.text(&s.dropdown_option(&key))?,
                };
                driver.assert_see_in(&s.dropdown_label(), &expected)
            }
        }

        FieldKind::RichEditor => driver.assert_see_in(&s.rich_text(), &to_display_string(current)),

        FieldKind::DateTimePicker => {
            driver.assert_value(&s.input(), &format_datetime_display(current, formats.datetime))
        }

        FieldKind::DatePicker => {
            driver.assert_value(&s.input(), &format_datetime_display(current, formats.date))
        }

        FieldKind::Toggle => driver.assert_attribute(
            &s.toggle_button(),
            "aria-checked",
            if is_truthy(current) { "true" } else { "false" },
        ),

        FieldKind::ToggleButtons => {
            driver.assert_checked(&s.toggle_buttons_item(&to_display_string(current)))
        }

        FieldKind::Checkbox => {
            if is_truthy(current) {
                driver.assert_checked(&s.checkbox())
            } else {
                driver.assert_not_checked(&s.checkbox())
            }
        }

        FieldKind::CheckboxList => {
            let rendered = driver.evaluate(&checkbox_values_script(s))?;
            for option in rendered.as_array().cloned().unwrap_or_default() {
                let option = to_display_string(&option);
                if step.membership(current, &option) {
                    driver.assert_checked(&s.checkbox_list_item(&option))?;
                } else {
                    driver.assert_not_checked(&s.checkbox_list_item(&option))?;
                }
            }
            Ok(())
        }

        FieldKind::CodeEditor => {
            let rendered = driver.text(&s.code_editor())?;
            let matches = match step.field.config().language {
                CodeLanguage::Json => {
                    let parsed: Value = serde_json::from_str(&rendered)?;
                    canonical_eq(&parsed, &coerce_structured(current))
                }
                CodeLanguage::Plain => rendered == to_display_string(current),
            };
            if matches {
                Ok(())
            } else {
                Err(FormProbeError::assertion(format!(
                    "code editor '{}' on {} renders {rendered:?}, expected the stored value",
                    step.name(),
                    step.page_name,
                )))
            }
        }

        FieldKind::KeyValue => {
            driver.assert_visible(&s.key_value_table())?;
            for (row, (key, value)) in key_value_entries(current).iter().enumerate() {
                driver.assert_value(&s.key_value_key_input(row + 1), key)?;
                driver.assert_value(&s.key_value_value_input(row + 1), &to_display_string(value))?;
            }
            Ok(())
        }

        FieldKind::TimePicker | FieldKind::Custom(_) => Err(step.unsupported(Behavior::Preview)),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::mock::MockBrowser;
    use serde_json::json;

    fn step<'a>(
        field: &'a FieldDescriptor,
        display_map: Option<&'a DisplayMap>,
    ) -> FieldStep<'a> {
        FieldStep::new(field, "EditUser", display_map, false)
    }

    #[test]
    fn test_text_input_preview_asserts_value() {
        let field = FieldDescriptor::new("name", FieldKind::TextInput);
        let mut browser = MockBrowser::new().with_value("#form\\.name", "John Doe");
        preview_field(
            &step(&field, None),
            &mut browser,
            &json!("John Doe"),
            DisplayFormats { datetime: "%c", date: "%F" },
        )
        .unwrap();
    }

    #[test]
    fn test_empty_select_asserts_placeholder() {
        let field = FieldDescriptor::new("role_id", FieldKind::Select);
        let s = FieldSelector::new("role_id");
        let mut browser = MockBrowser::new().with_visible(&s.dropdown_placeholder());
        preview_field(
            &step(&field, None),
            &mut browser,
            &Value::Null,
            DisplayFormats { datetime: "%c", date: "%F" },
        )
        .unwrap();
    }

    #[test]
    fn test_select_preview_prefers_display_map_over_option_text() {
        let field = FieldDescriptor::new("role_id", FieldKind::Select);
        let s = FieldSelector::new("role_id");
        let map: DisplayMap = [("7".to_string(), json!("Admin"))].into_iter().collect();
        // The option's own rendered text differs; the map must win.
        let mut browser = MockBrowser::new()
            .with_text(&s.dropdown_option("7"), "Role #7")
            .with_text(&s.dropdown_label(), "Admin");
        preview_field(
            &step(&field, Some(&map)),
            &mut browser,
            &json!(7),
            DisplayFormats { datetime: "%c", date: "%F" },
        )
        .unwrap();
    }

    #[test]
    fn test_checkbox_list_preview_checks_membership_per_option() {
        let field = FieldDescriptor::new("tags", FieldKind::CheckboxList);
        let s = FieldSelector::new("tags");
        let mut browser = MockBrowser::new()
            .with_script(&checkbox_values_script(&s), json!(["a", "b", "c"]))
            .with_checked(&s.checkbox_list_item("a"), true)
            .with_checked(&s.checkbox_list_item("b"), true)
            .with_checked(&s.checkbox_list_item("c"), false);
        preview_field(
            &step(&field, None),
            &mut browser,
            &json!(["a", "b"]),
            DisplayFormats { datetime: "%c", date: "%F" },
        )
        .unwrap();
    }

    #[test]
    fn test_key_value_preview_asserts_rows_in_stored_order() {
        let field = FieldDescriptor::new("settings", FieldKind::KeyValue);
        let s = FieldSelector::new("settings");
        // The page renders b at row 1, a at row 2 — stored order, not sorted.
        let mut browser = MockBrowser::new()
            .with_visible(&s.key_value_table())
            .with_value(&s.key_value_key_input(1), "b")
            .with_value(&s.key_value_value_input(1), "1")
            .with_value(&s.key_value_key_input(2), "a")
            .with_value(&s.key_value_value_input(2), "2");
        preview_field(
            &step(&field, None),
            &mut browser,
            &json!({"b": "1", "a": "2"}),
            DisplayFormats { datetime: "%c", date: "%F" },
        )
        .unwrap();
    }

    #[test]
    fn test_toggle_buttons_preview_asserts_selected_radio() {
        let field = FieldDescriptor::new("status", FieldKind::ToggleButtons);
        let s = FieldSelector::new("status");
        let mut browser =
            MockBrowser::new().with_checked(&s.toggle_buttons_item("published"), true);
        preview_field(
            &step(&field, None),
            &mut browser,
            &json!("published"),
            DisplayFormats { datetime: "%c", date: "%F" },
        )
        .unwrap();

        let mut browser = MockBrowser::new();
        assert!(preview_field(
            &step(&field, None),
            &mut browser,
            &json!("draft"),
            DisplayFormats { datetime: "%c", date: "%F" },
        )
        .is_err());
    }

    #[test]
    fn test_checkbox_preview_covers_both_states() {
        let field = FieldDescriptor::new("subscribed", FieldKind::Checkbox);
        let s = FieldSelector::new("subscribed");
        let mut browser = MockBrowser::new().with_checked(&s.checkbox(), true);
        preview_field(
            &step(&field, None),
            &mut browser,
            &json!(true),
            DisplayFormats { datetime: "%c", date: "%F" },
        )
        .unwrap();

        // Unchecked page state previews a falsy value.
        let mut browser = MockBrowser::new();
        preview_field(
            &step(&field, None),
            &mut browser,
            &json!(false),
            DisplayFormats { datetime: "%c", date: "%F" },
        )
        .unwrap();
    }

    #[test]
    fn test_rich_editor_preview_sees_content_inside_markup() {
        let field = FieldDescriptor::new("bio", FieldKind::RichEditor);
        let s = FieldSelector::new("bio");
        let mut browser = MockBrowser::new().with_text(&s.rich_text(), "<p>hello world</p>");
        preview_field(
            &step(&field, None),
            &mut browser,
            &json!("hello world"),
            DisplayFormats { datetime: "%c", date: "%F" },
        )
        .unwrap();
    }

    #[test]
    fn test_date_picker_preview_uses_date_format() {
        let field = FieldDescriptor::new("born_on", FieldKind::DatePicker);
        let s = FieldSelector::new("born_on");
        let mut browser = MockBrowser::new().with_value(&s.input(), "May 1, 2024");
        preview_field(
            &step(&field, None),
            &mut browser,
            &json!("2024-05-01"),
            DisplayFormats {
                datetime: "%b %-d, %Y %H:%M:%S",
                date: "%b %-d, %Y",
            },
        )
        .unwrap();
    }

    #[test]
    fn test_plain_code_editor_preview_compares_verbatim() {
        let field = FieldDescriptor::new("snippet", FieldKind::CodeEditor);
        let s = FieldSelector::new("snippet");
        let mut browser = MockBrowser::new().with_text(&s.code_editor(), "let x = 1;");
        preview_field(
            &step(&field, None),
            &mut browser,
            &json!("let x = 1;"),
            DisplayFormats { datetime: "%c", date: "%F" },
        )
        .unwrap();

        let mut browser = MockBrowser::new().with_text(&s.code_editor(), "let x = 2;");
        let err = preview_field(
            &step(&field, None),
            &mut browser,
            &json!("let x = 1;"),
            DisplayFormats { datetime: "%c", date: "%F" },
        )
        .unwrap_err();
        assert!(err.to_string().contains("snippet"));
    }

    #[test]
    fn test_verbose_display_lookup_returns_mapped_value() {
        let field = FieldDescriptor::new("role_id", FieldKind::Select);
        let map: DisplayMap = [("7".to_string(), json!("Admin"))].into_iter().collect();
        let step = FieldStep::new(&field, "EditUser", Some(&map), true);
        assert_eq!(step.display_value(&json!(7)), Some(json!("Admin")));
        assert_eq!(step.display_value(&json!(9)), None);
    }

    #[test]
    fn test_unsupported_kind_errors_without_touching_page() {
        let field = FieldDescriptor::new("widget", FieldKind::Custom("Foo".to_string()));
        let mut browser = MockBrowser::new();
        let err = preview_field(
            &step(&field, None),
            &mut browser,
            &Value::Null,
            DisplayFormats { datetime: "%c", date: "%F" },
        )
        .unwrap_err();
        assert!(err.to_string().contains("Foo"));
        assert!(err.to_string().contains("widget"));
        assert!(browser.actions().is_empty());
    }

    #[test]
    fn test_datetime_preview_uses_display_format() {
        let field = FieldDescriptor::new("published_at", FieldKind::DateTimePicker);
        let s = FieldSelector::new("published_at");
        let mut browser = MockBrowser::new().with_value(&s.input(), "May 1, 2024 13:45:09");
        preview_field(
            &step(&field, None),
            &mut browser,
            &json!("2024-05-01 13:45:09"),
            DisplayFormats {
                datetime: "%b %-d, %Y %H:%M:%S",
                date: "%b %-d, %Y",
            },
        )
        .unwrap();
    }
}
