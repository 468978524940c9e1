//! Selector construction for schema-generated form widgets.
//!
//! The rendered edit page wraps every field in a wire-partial container named
//! after the field, and each widget kind exposes a fixed set of sub-parts
//! under that container (dropdown button, calendar day, key-value row inputs,
//! and so on). [`FieldSelector`] maps a field name plus a sub-part request to
//! the CSS selector for it — deterministically and without touching the
//! browser, so two calls with the same inputs always agree.
//!
//! Field names, option values and ids are interpolated into selector syntax,
//! so characters CSS treats specially (`.`, `:`, `\`) are escaped wherever a
//! raw string lands inside a selector.

/// Builds CSS selectors for one named field's sub-parts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSelector {
    name: String,
}

impl FieldSelector {
    /// Create a selector builder for the given field name
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    /// The field name this builder is scoped to
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Escape characters with special meaning in CSS selector syntax.
    ///
    /// Backslashes are doubled first so that the escapes added for `.` and
    /// `:` are not themselves re-escaped. Applying this a second time yields
    /// a string safe to embed in a single-quoted JavaScript literal.
    #[must_use]
    pub fn escape(selector: &str) -> String {
        let mut out = String::with_capacity(selector.len());
        for ch in selector.chars() {
            if matches!(ch, '\\' | '.' | ':') {
                out.push('\\');
            }
            out.push(ch);
        }
        out
    }

    /// The wire-partial container wrapping this field's widget
    fn wire_partial(&self) -> String {
        Self::escape(&format!(
            "[wire:partial=\"schema-component::form.{}\"]",
            self.name
        ))
    }

    /// The id-based selector shared by plain inputs, textareas and toggles
    fn id_selector(&self) -> String {
        let id = format!("form.{}", self.name);
        let mut out = String::with_capacity(id.len() + 1);
        out.push('#');
        for ch in id.chars() {
            if matches!(ch, '.' | ':' | '-' | '>') {
                out.push('\\');
            }
            out.push(ch);
        }
        out
    }

    /// Selected-value label of a dropdown
    #[must_use]
    pub fn dropdown_label(&self) -> String {
        format!("{} .fi-select-input-value-label", self.wire_partial())
    }

    /// Placeholder shown by an empty dropdown
    #[must_use]
    pub fn dropdown_placeholder(&self) -> String {
        format!("{} .fi-select-input-placeholder", self.wire_partial())
    }

    /// Button that opens a dropdown's option panel
    #[must_use]
    pub fn dropdown_button(&self) -> String {
        format!("{} .fi-select-input-btn", self.wire_partial())
    }

    /// Button that clears a dropdown's current selection
    #[must_use]
    pub fn dropdown_clear_button(&self) -> String {
        format!("{} .fi-select-input-value-remove-btn", self.wire_partial())
    }

    /// Search input inside a searchable dropdown's panel
    #[must_use]
    pub fn dropdown_search(&self) -> String {
        format!("{} .fi-select-input-search-ctn input", self.wire_partial())
    }

    /// A dropdown option identified by its value
    #[must_use]
    pub fn dropdown_option(&self, key: &str) -> String {
        format!(
            "{} .fi-dropdown-panel {}",
            self.wire_partial(),
            Self::escape(&format!("[data-value=\"{key}\"]"))
        )
    }

    /// Text input for this field
    #[must_use]
    pub fn input(&self) -> String {
        self.id_selector()
    }

    /// Textarea for this field
    #[must_use]
    pub fn textarea(&self) -> String {
        self.id_selector()
    }

    /// Editable area of a rich text editor
    #[must_use]
    pub fn rich_text(&self) -> String {
        format!("{} .tiptap", self.wire_partial())
    }

    /// Button that opens the date-time picker panel
    #[must_use]
    pub fn datetime_trigger(&self) -> String {
        format!(
            "{} button.fi-fo-date-time-picker-trigger",
            self.wire_partial()
        )
    }

    /// A calendar day cell; `None` matches any day
    #[must_use]
    pub fn datetime_day_div(&self, day: Option<u32>) -> String {
        let day = day.map_or_else(|| "n".to_string(), |d| d.to_string());
        format!(
            "{} .fi-fo-date-time-picker-panel .fi-fo-date-time-picker-calendar div:nth-child({day} of .fi-fo-date-time-picker-calendar-day)",
            self.wire_partial()
        )
    }

    /// Month select inside the picker panel
    #[must_use]
    pub fn datetime_month_select(&self) -> String {
        format!(
            "{} .fi-fo-date-time-picker-panel select.fi-fo-date-time-picker-month-select",
            self.wire_partial()
        )
    }

    /// Year input inside the picker panel
    #[must_use]
    pub fn datetime_year_input(&self) -> String {
        format!(
            "{} .fi-fo-date-time-picker-panel input.fi-fo-date-time-picker-year-input",
            self.wire_partial()
        )
    }

    /// Hour input inside the picker panel
    #[must_use]
    pub fn datetime_hour_input(&self) -> String {
        self.time_input(1)
    }

    /// Minute input inside the picker panel
    #[must_use]
    pub fn datetime_minute_input(&self) -> String {
        self.time_input(2)
    }

    /// Second input inside the picker panel
    #[must_use]
    pub fn datetime_second_input(&self) -> String {
        self.time_input(3)
    }

    fn time_input(&self, position: usize) -> String {
        format!(
            "{} .fi-fo-date-time-picker-panel .fi-fo-date-time-picker-time-inputs input:nth-of-type({position})",
            self.wire_partial()
        )
    }

    /// Boolean toggle button
    #[must_use]
    pub fn toggle_button(&self) -> String {
        self.id_selector()
    }

    /// Single checkbox input
    #[must_use]
    pub fn checkbox(&self) -> String {
        self.id_selector()
    }

    /// One option of a checkbox list, identified by its value
    #[must_use]
    pub fn checkbox_list_item(&self, option: &str) -> String {
        format!(
            "{} input[type=checkbox][value=\"{option}\"]",
            self.wire_partial()
        )
    }

    /// Every checkbox input of a checkbox list
    #[must_use]
    pub fn checkbox_list_items(&self) -> String {
        format!("{} input[type=checkbox]", self.wire_partial())
    }

    /// A radio input identified by its value
    #[must_use]
    pub fn radio_input(&self, value: &str) -> String {
        format!("{} input[type=radio][value=\"{value}\"]", self.wire_partial())
    }

    /// The radio input backing one option of an exclusive toggle group
    #[must_use]
    pub fn toggle_buttons_item(&self, value: &str) -> String {
        self.radio_input(value)
    }

    /// The label element targeting a DOM id
    #[must_use]
    pub fn label_for(&self, id: &str) -> String {
        format!("label[for=\"{}\"]", Self::escape(id))
    }

    /// Editable content area of a structured code editor
    #[must_use]
    pub fn code_editor(&self) -> String {
        format!("{} .cm-editor .cm-content", self.wire_partial())
    }

    /// Header of a collapsible section; `Some(collapsed)` filters by state
    #[must_use]
    pub fn section_header(&self, collapsed: Option<bool>) -> String {
        let extra = match collapsed {
            Some(true) => ".fi-collapsed",
            Some(false) => ":not(.fi-collapsed)",
            None => "",
        };
        format!("{} section{extra} header", self.wire_partial())
    }

    /// Key-value editor table
    #[must_use]
    pub fn key_value_table(&self) -> String {
        format!("{} .fi-fo-key-value-table", self.wire_partial())
    }

    /// Every row of the key-value editor table
    #[must_use]
    pub fn key_value_rows(&self) -> String {
        format!("{} .fi-fo-key-value-table tbody tr", self.wire_partial())
    }

    /// Key input of the given row (rows start at 1)
    #[must_use]
    pub fn key_value_key_input(&self, row: usize) -> String {
        format!(
            "{} .fi-fo-key-value-table tbody tr:nth-of-type({row}) td:nth-of-type(1) input",
            self.wire_partial()
        )
    }

    /// Value input of the given row (rows start at 1)
    #[must_use]
    pub fn key_value_value_input(&self, row: usize) -> String {
        format!(
            "{} .fi-fo-key-value-table tbody tr:nth-of-type({row}) td:nth-of-type(2) input",
            self.wire_partial()
        )
    }

    /// Delete button of the given row (rows start at 1)
    #[must_use]
    pub fn key_value_delete_row_button(&self, row: usize) -> String {
        format!(
            "{} .fi-fo-key-value-table tbody tr:nth-of-type({row}) td:nth-of-type(3) button[aria-label=\"Delete row\"]",
            self.wire_partial()
        )
    }

    /// Button that appends a row to the key-value editor
    #[must_use]
    pub fn key_value_add_row_button(&self) -> String {
        format!(
            "{} .fi-input-wrp-content-ctn .fi-fo-key-value-add-action-ctn button",
            self.wire_partial()
        )
    }
}
