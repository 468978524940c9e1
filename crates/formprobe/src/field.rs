//! Field descriptors: the schema-side view of one editable unit.
//!
//! A [`FieldDescriptor`] carries a field's unique name, its declared
//! [`FieldKind`] and kind-specific configuration. Descriptors are produced by
//! the schema provider once per session and are read-only afterwards;
//! dispatch is a plain lookup on the kind tag, never runtime type inspection.

use std::fmt;

/// The closed set of built-in widget kinds, plus an escape hatch for
/// host-specific widgets that a custom handler is expected to claim.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FieldKind {
    /// Single-line text input
    TextInput,
    /// Multi-line text input
    Textarea,
    /// Dropdown, optionally searchable
    Select,
    /// Rich text editor (wraps content in markup)
    RichEditor,
    /// Date and time picker with a multi-step panel
    DateTimePicker,
    /// Date-only picker
    DatePicker,
    /// Time-only picker (comparable after save, no fill/preview recipe)
    TimePicker,
    /// Boolean toggle button
    Toggle,
    /// Exclusive-choice group rendered as labelled radios
    ToggleButtons,
    /// Single checkbox
    Checkbox,
    /// Multi-select list of checkboxes
    CheckboxList,
    /// Structured code editor, plain or JSON
    CodeEditor,
    /// Dynamic key-value table with add/remove rows
    KeyValue,
    /// A widget kind outside the built-in table; only a custom handler can
    /// process it, otherwise dispatch fails with a configuration error
    Custom(String),
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TextInput => f.write_str("TextInput"),
            Self::Textarea => f.write_str("Textarea"),
            Self::Select => f.write_str("Select"),
            Self::RichEditor => f.write_str("RichEditor"),
            Self::DateTimePicker => f.write_str("DateTimePicker"),
            Self::DatePicker => f.write_str("DatePicker"),
            Self::TimePicker => f.write_str("TimePicker"),
            Self::Toggle => f.write_str("Toggle"),
            Self::ToggleButtons => f.write_str("ToggleButtons"),
            Self::Checkbox => f.write_str("Checkbox"),
            Self::CheckboxList => f.write_str("CheckboxList"),
            Self::CodeEditor => f.write_str("CodeEditor"),
            Self::KeyValue => f.write_str("KeyValue"),
            Self::Custom(name) => f.write_str(name),
        }
    }
}

/// Content language of a structured code editor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CodeLanguage {
    /// Raw text, compared verbatim
    #[default]
    Plain,
    /// JSON, serialized on fill and deep-compared ignoring order
    Json,
}

/// One option of a select or toggle group: stored value plus rendered label
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectOption {
    /// Value persisted on the record
    pub value: String,
    /// Text rendered in the UI
    pub label: String,
}

impl SelectOption {
    /// Create an option
    #[must_use]
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
        }
    }
}

/// Kind-specific configuration attached to a field descriptor
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldConfig {
    /// Whether a select exposes a search input
    pub searchable: bool,
    /// Accepted options of a select or toggle group
    pub options: Vec<SelectOption>,
    /// Relationship name backing a relation-valued field
    pub relationship: Option<String>,
    /// Attribute projected from related records when comparing
    pub relationship_title_attribute: Option<String>,
    /// Content language of a code editor
    pub language: CodeLanguage,
}

impl FieldConfig {
    /// Look up the rendered label of an option by its stored value
    #[must_use]
    pub fn option_label(&self, value: &str) -> Option<&str> {
        self.options
            .iter()
            .find(|o| o.value == value)
            .map(|o| o.label.as_str())
    }

    /// Whether this field is backed by a relationship
    #[must_use]
    pub fn has_relationship(&self) -> bool {
        self.relationship.as_deref().is_some_and(|r| !r.is_empty())
    }
}

/// Immutable description of one editable unit on the edit page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDescriptor {
    name: String,
    kind: FieldKind,
    config: FieldConfig,
}

impl FieldDescriptor {
    /// Create a descriptor with default configuration
    #[must_use]
    pub fn new(name: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            name: name.into(),
            kind,
            config: FieldConfig::default(),
        }
    }

    /// Attach kind-specific configuration
    #[must_use]
    pub fn with_config(mut self, config: FieldConfig) -> Self {
        self.config = config;
        self
    }

    /// Mark a select as searchable
    #[must_use]
    pub fn searchable(mut self) -> Self {
        self.config.searchable = true;
        self
    }

    /// Set the accepted options
    #[must_use]
    pub fn with_options(mut self, options: Vec<SelectOption>) -> Self {
        self.config.options = options;
        self
    }

    /// Set the backing relationship and the attribute compared after save
    #[must_use]
    pub fn with_relationship(
        mut self,
        name: impl Into<String>,
        title_attribute: impl Into<String>,
    ) -> Self {
        self.config.relationship = Some(name.into());
        self.config.relationship_title_attribute = Some(title_attribute.into());
        self
    }

    /// Set the content language of a code editor
    #[must_use]
    pub fn with_language(mut self, language: CodeLanguage) -> Self {
        self.config.language = language;
        self
    }

    /// Field name, unique within one edit page
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declared widget kind
    #[must_use]
    pub fn kind(&self) -> &FieldKind {
        &self.kind
    }

    /// Kind-specific configuration
    #[must_use]
    pub fn config(&self) -> &FieldConfig {
        &self.config
    }
}

/// Ordered, name-keyed collection of field descriptors for one edit page.
///
/// Insertion order mirrors on-page rendering order. Names are unique; pushing
/// a descriptor with an existing name replaces it in place.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldList {
    fields: Vec<FieldDescriptor>,
}

impl FieldList {
    /// Create an empty field list
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style append
    #[must_use]
    pub fn with_field(mut self, field: FieldDescriptor) -> Self {
        self.push(field);
        self
    }

    /// Append a descriptor, replacing any existing descriptor with the same name
    pub fn push(&mut self, field: FieldDescriptor) {
        if let Some(existing) = self.fields.iter_mut().find(|f| f.name == field.name) {
            *existing = field;
        } else {
            self.fields.push(field);
        }
    }

    /// Look up a descriptor by name
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Whether a field with the given name is present
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Field names in rendering order
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        self.fields.iter().map(|f| f.name.as_str()).collect()
    }

    /// Iterate descriptors in rendering order
    pub fn iter(&self) -> impl Iterator<Item = &FieldDescriptor> {
        self.fields.iter()
    }

    /// Number of fields
    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Whether the list is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl FromIterator<FieldDescriptor> for FieldList {
    fn from_iter<T: IntoIterator<Item = FieldDescriptor>>(iter: T) -> Self {
        let mut list = Self::new();
        for field in iter {
            list.push(field);
        }
        list
    }
}
