//! Fill: write the new record's values into the live edit page.
//!
//! Each field kind has a fixed interaction recipe; the ordering quirks of
//! the date-time picker (time before day, with a short wait for the panel
//! re-render in between) are part of the contract with the rendered markup,
//! not an optimization.

use std::time::Duration;

use serde_json::Value;

use crate::driver::BrowserDriver;
use crate::field::{CodeLanguage, FieldKind};
use crate::handler::Behavior;
use crate::result::FormProbeResult;
use crate::value::{
    is_truthy, key_value_entries, parse_checked_attribute, parse_datetime, to_display_string,
};
use crate::viewer::{checkbox_values_script, key_value_row_count_script, FieldStep};

/// Selector of the edit form's submit button
pub(crate) const SUBMIT_BUTTON: &str = ".fi-main [type=submit]";

/// The picker panel re-renders after time entry; selecting the day earlier
/// hits the stale panel.
const DATETIME_PANEL_SETTLE: Duration = Duration::from_millis(300);

/// Write the new value into one field, per the field kind's fill recipe.
pub(crate) fn fill_field(
    step: &FieldStep<'_>,
    driver: &mut dyn BrowserDriver,
    new: &Value,
) -> FormProbeResult<()> {
    let s = &step.selector;
    match step.field.kind() {
        FieldKind::TextInput | FieldKind::Textarea => {
            driver.fill(&s.input(), &to_display_string(new))
        }

        FieldKind::Select => {
            driver.click(&s.dropdown_button())?;
            let key = to_display_string(new);
            if step.field.config().searchable {
                let search = match step.display_value(new) {
                    Some(mapped) => to_display_string(&mapped),
                    None => step
                        .field
                        .config()
                        .option_label(&key)
                        .map_or_else(|| key.clone(), ToString::to_string),
                };
                driver.fill(&s.dropdown_search(), &search)?;
            }
            driver.click(&s.dropdown_option(&key))
        }

        FieldKind::RichEditor => driver.fill(&s.rich_text(), &to_display_string(new)),

        FieldKind::DateTimePicker => match parse_datetime(new) {
            Some(dt) => {
                use chrono::{Datelike, Timelike};
                driver.click(&s.datetime_trigger())?;
                driver.fill(&s.datetime_year_input(), &dt.year().to_string())?;
                driver.select(&s.datetime_month_select(), &dt.month0().to_string())?;
                driver.fill(&s.datetime_hour_input(), &dt.hour().to_string())?;
                driver.fill(&s.datetime_minute_input(), &dt.minute().to_string())?;
                driver.fill(&s.datetime_second_input(), &dt.second().to_string())?;
                driver.wait(DATETIME_PANEL_SETTLE)?;
                driver.click(&s.datetime_day_div(Some(dt.day())))
            }
            None => driver.send_keys(&s.input(), "Backspace"),
        },

        FieldKind::DatePicker => match parse_datetime(new) {
            Some(dt) => {
                use chrono::Datelike;
                driver.click(&s.datetime_trigger())?;
                driver.fill(&s.datetime_year_input(), &dt.year().to_string())?;
                driver.select(&s.datetime_month_select(), &dt.month0().to_string())?;
                driver.click(&s.datetime_day_div(Some(dt.day())))
            }
            None => driver.send_keys(&s.input(), "Backspace"),
        },

        FieldKind::Toggle => {
            let rendered = driver.attribute(&s.toggle_button(), "aria-checked")?;
            if parse_checked_attribute(rendered.as_deref()) != is_truthy(new) {
                driver.click(&s.toggle_button())?;
            }
            Ok(())
        }

        FieldKind::ToggleButtons => {
            let key = to_display_string(new);
            let id = driver
                .attribute(&s.toggle_buttons_item(&key), "id")?
                .unwrap_or_default();
            driver.click(&s.label_for(&id))
        }

        FieldKind::Checkbox => {
            if is_truthy(new) {
                driver.check(&s.checkbox())
            } else {
                driver.uncheck(&s.checkbox())
            }
        }

        FieldKind::CheckboxList => {
            let rendered = driver.evaluate(&checkbox_values_script(s))?;
            for option in rendered.as_array().cloned().unwrap_or_default() {
                let option = to_display_string(&option);
                if step.membership(new, &option) {
                    driver.check(&s.checkbox_list_item(&option))?;
                } else {
                    driver.uncheck(&s.checkbox_list_item(&option))?;
                }
            }
            Ok(())
        }

        FieldKind::CodeEditor => {
            driver.clear(&s.code_editor())?;
            let text = match step.field.config().language {
                CodeLanguage::Json => serde_json::to_string(new)?,
                CodeLanguage::Plain => to_display_string(new),
            };
            driver.fill(&s.code_editor(), &text)
        }

        FieldKind::KeyValue => {
            let existing = driver
                .evaluate(&key_value_row_count_script(s))?
                .as_u64()
                .unwrap_or(0);
            for _ in 0..existing {
                driver.click(&s.key_value_delete_row_button(1))?;
            }
            let entries = key_value_entries(new);
            // One empty row exists by default after the deletions settle.
            for _ in 1..entries.len() {
                driver.click(&s.key_value_add_row_button())?;
            }
            for (row, (key, value)) in entries.iter().enumerate() {
                driver.type_slowly(&s.key_value_key_input(row + 1), key)?;
                driver.type_slowly(&s.key_value_value_input(row + 1), &to_display_string(value))?;
            }
            Ok(())
        }

        FieldKind::TimePicker | FieldKind::Custom(_) => Err(step.unsupported(Behavior::Fill)),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::field::{FieldDescriptor, SelectOption};
    use crate::mock::{DriverAction, MockBrowser};
    use crate::selector::FieldSelector;
    use crate::value::DisplayMap;
    use serde_json::json;

    fn step<'a>(
        field: &'a FieldDescriptor,
        display_map: Option<&'a DisplayMap>,
    ) -> FieldStep<'a> {
        FieldStep::new(field, "EditUser", display_map, false)
    }

    #[test]
    fn test_text_fill_types_new_value() {
        let field = FieldDescriptor::new("name", FieldKind::TextInput);
        let mut browser = MockBrowser::new();
        fill_field(&step(&field, None), &mut browser, &json!("Jane")).unwrap();
        assert_eq!(
            browser.actions(),
            &[DriverAction::Fill {
                selector: "#form\\.name".to_string(),
                text: "Jane".to_string(),
            }]
        );
    }

    #[test]
    fn test_searchable_select_searches_by_label_then_picks_by_value() {
        let field = FieldDescriptor::new("role_id", FieldKind::Select)
            .searchable()
            .with_options(vec![SelectOption::new("7", "Admin")]);
        let s = FieldSelector::new("role_id");
        let mut browser = MockBrowser::new();
        fill_field(&step(&field, None), &mut browser, &json!("7")).unwrap();
        assert_eq!(
            browser.actions(),
            &[
                DriverAction::Click(s.dropdown_button()),
                DriverAction::Fill {
                    selector: s.dropdown_search(),
                    text: "Admin".to_string(),
                },
                DriverAction::Click(s.dropdown_option("7")),
            ]
        );
    }

    #[test]
    fn test_searchable_select_prefers_display_map_for_search_text() {
        let field = FieldDescriptor::new("role_id", FieldKind::Select)
            .searchable()
            .with_options(vec![SelectOption::new("7", "Admin")]);
        let map: DisplayMap = [("7".to_string(), json!("Administrator"))]
            .into_iter()
            .collect();
        let s = FieldSelector::new("role_id");
        let mut browser = MockBrowser::new();
        fill_field(&step(&field, Some(&map)), &mut browser, &json!("7")).unwrap();
        assert!(browser.actions().contains(&DriverAction::Fill {
            selector: s.dropdown_search(),
            text: "Administrator".to_string(),
        }));
    }

    #[test]
    fn test_toggle_clicks_only_when_rendered_state_differs() {
        // Scenario: currently rendered unchecked, intended true.
        let field = FieldDescriptor::new("is_active", FieldKind::Toggle);
        let s = FieldSelector::new("is_active");
        let mut browser = MockBrowser::new().with_attribute(&s.toggle_button(), "aria-checked", "false");
        fill_field(&step(&field, None), &mut browser, &json!(true)).unwrap();
        assert_eq!(
            browser.actions(),
            &[DriverAction::Click(s.toggle_button())]
        );

        // Already matching: no click at all.
        let mut browser = MockBrowser::new().with_attribute(&s.toggle_button(), "aria-checked", "true");
        fill_field(&step(&field, None), &mut browser, &json!(true)).unwrap();
        assert!(browser.actions().is_empty());
    }

    #[test]
    fn test_toggle_buttons_fill_clicks_label_of_selected_radio() {
        let field = FieldDescriptor::new("status", FieldKind::ToggleButtons);
        let s = FieldSelector::new("status");
        // The radio input is hidden; the click lands on its label.
        let mut browser = MockBrowser::new().with_attribute(
            &s.toggle_buttons_item("published"),
            "id",
            "form.status.published",
        );
        fill_field(&step(&field, None), &mut browser, &json!("published")).unwrap();
        assert_eq!(
            browser.actions(),
            &[DriverAction::Click(s.label_for("form.status.published"))]
        );
    }

    #[test]
    fn test_checkbox_fill_checks_and_unchecks() {
        let field = FieldDescriptor::new("subscribed", FieldKind::Checkbox);
        let s = FieldSelector::new("subscribed");
        let mut browser = MockBrowser::new();
        fill_field(&step(&field, None), &mut browser, &json!(true)).unwrap();
        assert_eq!(browser.actions(), &[DriverAction::Check(s.checkbox())]);

        let mut browser = MockBrowser::new();
        fill_field(&step(&field, None), &mut browser, &json!(0)).unwrap();
        assert_eq!(browser.actions(), &[DriverAction::Uncheck(s.checkbox())]);
    }

    #[test]
    fn test_rich_editor_fill_writes_content() {
        let field = FieldDescriptor::new("bio", FieldKind::RichEditor);
        let s = FieldSelector::new("bio");
        let mut browser = MockBrowser::new();
        fill_field(&step(&field, None), &mut browser, &json!("hello world")).unwrap();
        assert_eq!(
            browser.actions(),
            &[DriverAction::Fill {
                selector: s.rich_text(),
                text: "hello world".to_string(),
            }]
        );
    }

    #[test]
    fn test_date_picker_fill_skips_time_entry() {
        let field = FieldDescriptor::new("born_on", FieldKind::DatePicker);
        let s = FieldSelector::new("born_on");
        let mut browser = MockBrowser::new();
        fill_field(&step(&field, None), &mut browser, &json!("2024-05-17")).unwrap();
        assert_eq!(
            browser.actions(),
            &[
                DriverAction::Click(s.datetime_trigger()),
                DriverAction::Fill {
                    selector: s.datetime_year_input(),
                    text: "2024".to_string(),
                },
                DriverAction::Select {
                    selector: s.datetime_month_select(),
                    value: "4".to_string(),
                },
                DriverAction::Click(s.datetime_day_div(Some(17))),
            ]
        );
    }

    #[test]
    fn test_plain_code_editor_fill_writes_verbatim() {
        let field = FieldDescriptor::new("snippet", FieldKind::CodeEditor);
        let s = FieldSelector::new("snippet");
        let mut browser = MockBrowser::new();
        fill_field(&step(&field, None), &mut browser, &json!("let x = 1;")).unwrap();
        assert_eq!(
            browser.actions(),
            &[
                DriverAction::Clear(s.code_editor()),
                DriverAction::Fill {
                    selector: s.code_editor(),
                    text: "let x = 1;".to_string(),
                },
            ]
        );
    }

    #[test]
    fn test_checkbox_list_rewrites_membership() {
        // Current {a,b}, intended {c,d,e}: a,b unchecked, c,d,e checked.
        let field = FieldDescriptor::new("tags", FieldKind::CheckboxList);
        let s = FieldSelector::new("tags");
        let mut browser = MockBrowser::new().with_script(
            &checkbox_values_script(&s),
            json!(["a", "b", "c", "d", "e"]),
        );
        fill_field(&step(&field, None), &mut browser, &json!(["c", "d", "e"])).unwrap();
        assert_eq!(
            browser.actions(),
            &[
                DriverAction::Uncheck(s.checkbox_list_item("a")),
                DriverAction::Uncheck(s.checkbox_list_item("b")),
                DriverAction::Check(s.checkbox_list_item("c")),
                DriverAction::Check(s.checkbox_list_item("d")),
                DriverAction::Check(s.checkbox_list_item("e")),
            ]
        );
    }

    #[test]
    fn test_relation_backed_checkbox_list_uses_relationship_keys() {
        let field = FieldDescriptor::new("roles", FieldKind::CheckboxList)
            .with_relationship("roles", "name");
        let s = FieldSelector::new("roles");
        let mut browser =
            MockBrowser::new().with_script(&checkbox_values_script(&s), json!(["3", "7"]));
        let new = json!([{"id": 7, "name": "Editor"}]);
        fill_field(&step(&field, None), &mut browser, &new).unwrap();
        assert_eq!(
            browser.actions(),
            &[
                DriverAction::Uncheck(s.checkbox_list_item("3")),
                DriverAction::Check(s.checkbox_list_item("7")),
            ]
        );
    }

    #[test]
    fn test_key_value_deletes_existing_rows_then_adds_and_types() {
        // Current table has 2 rows; intended map has 3 entries.
        let field = FieldDescriptor::new("settings", FieldKind::KeyValue);
        let s = FieldSelector::new("settings");
        let mut browser =
            MockBrowser::new().with_script(&key_value_row_count_script(&s), json!(2));
        let new = json!({"k3": "v3", "k4": "v4", "k5": "v5"});
        fill_field(&step(&field, None), &mut browser, &new).unwrap();

        let actions = browser.actions();
        let deletes = actions
            .iter()
            .filter(|a| matches!(a, DriverAction::Click(sel) if sel == &s.key_value_delete_row_button(1)))
            .count();
        let adds = actions
            .iter()
            .filter(|a| matches!(a, DriverAction::Click(sel) if sel == &s.key_value_add_row_button()))
            .count();
        let typed = actions
            .iter()
            .filter(|a| matches!(a, DriverAction::TypeSlowly { .. }))
            .count();
        assert_eq!(deletes, 2);
        assert_eq!(adds, 2);
        assert_eq!(typed, 6); // 3 keys + 3 values
        assert!(actions.contains(&DriverAction::TypeSlowly {
            selector: s.key_value_key_input(1),
            text: "k3".to_string(),
        }));
        assert!(actions.contains(&DriverAction::TypeSlowly {
            selector: s.key_value_value_input(3),
            text: "v5".to_string(),
        }));
    }

    #[test]
    fn test_null_datetime_clears_with_backspace() {
        let field = FieldDescriptor::new("published_at", FieldKind::DateTimePicker);
        let s = FieldSelector::new("published_at");
        let mut browser = MockBrowser::new();
        fill_field(&step(&field, None), &mut browser, &serde_json::Value::Null).unwrap();
        assert_eq!(
            browser.actions(),
            &[DriverAction::SendKeys {
                selector: s.input(),
                key: "Backspace".to_string(),
            }]
        );
    }

    #[test]
    fn test_datetime_enters_time_waits_then_picks_day() {
        let field = FieldDescriptor::new("published_at", FieldKind::DateTimePicker);
        let s = FieldSelector::new("published_at");
        let mut browser = MockBrowser::new();
        fill_field(&step(&field, None), &mut browser, &json!("2024-05-17 13:45:09")).unwrap();

        let actions = browser.actions();
        assert_eq!(actions[0], DriverAction::Click(s.datetime_trigger()));
        assert!(actions.contains(&DriverAction::Fill {
            selector: s.datetime_year_input(),
            text: "2024".to_string(),
        }));
        // Month select value is zero-based.
        assert!(actions.contains(&DriverAction::Select {
            selector: s.datetime_month_select(),
            value: "4".to_string(),
        }));
        let wait_pos = actions
            .iter()
            .position(|a| matches!(a, DriverAction::Wait(_)))
            .unwrap();
        let day_pos = actions
            .iter()
            .position(|a| *a == DriverAction::Click(s.datetime_day_div(Some(17))))
            .unwrap();
        assert!(wait_pos < day_pos, "panel settle wait must precede day click");
    }

    #[test]
    fn test_json_code_editor_serializes_value() {
        let field = FieldDescriptor::new("payload", FieldKind::CodeEditor)
            .with_language(CodeLanguage::Json);
        let s = FieldSelector::new("payload");
        let mut browser = MockBrowser::new();
        fill_field(&step(&field, None), &mut browser, &json!({"a": 1})).unwrap();
        assert_eq!(
            browser.actions(),
            &[
                DriverAction::Clear(s.code_editor()),
                DriverAction::Fill {
                    selector: s.code_editor(),
                    text: "{\"a\":1}".to_string(),
                },
            ]
        );
    }

    #[test]
    fn test_unsupported_kind_is_a_configuration_error() {
        let field = FieldDescriptor::new("widget", FieldKind::Custom("Foo".to_string()));
        let mut browser = MockBrowser::new();
        let err = fill_field(&step(&field, None), &mut browser, &json!(1)).unwrap_err();
        assert!(err.is_configuration_error());
        assert!(browser.actions().is_empty());
    }
}
