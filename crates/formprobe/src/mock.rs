//! Scripted collaborators for testing without a real browser or database.
//!
//! [`MockBrowser`] implements the full driver contract against scripted page
//! state and records every mutating interaction, so tests can assert on the
//! exact click/type sequence a recipe produced. State lives behind a shared
//! handle: clone the browser before handing it to a session and the clone
//! observes everything the session did. [`MemoryRecord`] and
//! [`StaticSchema`] play the record store and schema provider.

use std::cell::RefCell;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::rc::Rc;
use std::time::Duration;

use serde_json::Value;

use crate::driver::BrowserDriver;
use crate::record::Record;
use crate::result::{FormProbeError, FormProbeResult};
use crate::schema::{EditPage, SchemaProvider};
use crate::value::to_display_string;

/// One recorded mutating interaction
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DriverAction {
    /// Navigation to a URL
    Navigate(String),
    /// Input value replacement
    Fill {
        /// Target selector
        selector: String,
        /// Text written
        text: String,
    },
    /// Keystroke-by-keystroke typing
    TypeSlowly {
        /// Target selector
        selector: String,
        /// Text written
        text: String,
    },
    /// Click
    Click(String),
    /// Checkbox checked
    Check(String),
    /// Checkbox unchecked
    Uncheck(String),
    /// Select option chosen by value
    Select {
        /// Target selector
        selector: String,
        /// Option value
        value: String,
    },
    /// Content cleared
    Clear(String),
    /// Named key sent
    SendKeys {
        /// Target selector
        selector: String,
        /// Key name
        key: String,
    },
    /// Button pressed
    Press(String),
    /// Fixed wait
    Wait(Duration),
}

#[derive(Debug, Default)]
struct MockState {
    current_path: Option<String>,
    path_after_submit: Option<String>,
    client_errors: Vec<String>,
    values: HashMap<String, String>,
    texts: HashMap<String, String>,
    attributes: HashMap<String, HashMap<String, String>>,
    checked: HashMap<String, bool>,
    visible: HashSet<String>,
    scripts: HashMap<String, Value>,
    actions: Vec<DriverAction>,
}

/// A scripted in-memory browser implementing [`BrowserDriver`].
#[derive(Debug, Clone, Default)]
pub struct MockBrowser {
    state: Rc<RefCell<MockState>>,
}

impl MockBrowser {
    /// Create an empty scripted browser
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Script the value of an input
    #[must_use]
    pub fn with_value(self, selector: &str, value: &str) -> Self {
        self.state
            .borrow_mut()
            .values
            .insert(selector.to_string(), value.to_string());
        self
    }

    /// Script the rendered text of an element
    #[must_use]
    pub fn with_text(self, selector: &str, text: &str) -> Self {
        self.state
            .borrow_mut()
            .texts
            .insert(selector.to_string(), text.to_string());
        self
    }

    /// Script an attribute of an element
    #[must_use]
    pub fn with_attribute(self, selector: &str, name: &str, value: &str) -> Self {
        self.state
            .borrow_mut()
            .attributes
            .entry(selector.to_string())
            .or_default()
            .insert(name.to_string(), value.to_string());
        self
    }

    /// Script the checked state of a checkbox or radio
    #[must_use]
    pub fn with_checked(self, selector: &str, checked: bool) -> Self {
        self.state
            .borrow_mut()
            .checked
            .insert(selector.to_string(), checked);
        self
    }

    /// Mark an element as visible
    #[must_use]
    pub fn with_visible(self, selector: &str) -> Self {
        self.state.borrow_mut().visible.insert(selector.to_string());
        self
    }

    /// Script the result of a JavaScript evaluation
    #[must_use]
    pub fn with_script(self, script: &str, result: Value) -> Self {
        self.state
            .borrow_mut()
            .scripts
            .insert(script.to_string(), result);
        self
    }

    /// Script a client-side error surfaced on page load
    #[must_use]
    pub fn with_client_error(self, message: &str) -> Self {
        self.state
            .borrow_mut()
            .client_errors
            .push(message.to_string());
        self
    }

    /// Script the path the browser lands on after a submit press
    #[must_use]
    pub fn with_path_after_submit(self, path: &str) -> Self {
        self.state.borrow_mut().path_after_submit = Some(path.to_string());
        self
    }

    /// Every mutating interaction recorded so far, in order
    #[must_use]
    pub fn actions(&self) -> Vec<DriverAction> {
        self.state.borrow().actions.clone()
    }

    /// The path the browser currently sits on
    #[must_use]
    pub fn current_path(&self) -> Option<String> {
        self.state.borrow().current_path.clone()
    }

    /// The scripted value of an input, as last written
    #[must_use]
    pub fn value(&self, selector: &str) -> Option<String> {
        self.state.borrow().values.get(selector).cloned()
    }

    fn record(&self, action: DriverAction) {
        self.state.borrow_mut().actions.push(action);
    }
}

impl BrowserDriver for MockBrowser {
    fn navigate(&mut self, url: &str) -> FormProbeResult<()> {
        self.record(DriverAction::Navigate(url.to_string()));
        self.state.borrow_mut().current_path = Some(url.to_string());
        Ok(())
    }

    fn assert_no_client_errors(&mut self) -> FormProbeResult<()> {
        let errors = self.state.borrow().client_errors.clone();
        if errors.is_empty() {
            Ok(())
        } else {
            Err(FormProbeError::assertion(format!(
                "client-side errors on page load: {}",
                errors.join("; ")
            )))
        }
    }

    fn fill(&mut self, selector: &str, text: &str) -> FormProbeResult<()> {
        self.record(DriverAction::Fill {
            selector: selector.to_string(),
            text: text.to_string(),
        });
        self.state
            .borrow_mut()
            .values
            .insert(selector.to_string(), text.to_string());
        Ok(())
    }

    fn type_slowly(&mut self, selector: &str, text: &str) -> FormProbeResult<()> {
        self.record(DriverAction::TypeSlowly {
            selector: selector.to_string(),
            text: text.to_string(),
        });
        self.state
            .borrow_mut()
            .values
            .insert(selector.to_string(), text.to_string());
        Ok(())
    }

    fn click(&mut self, selector: &str) -> FormProbeResult<()> {
        self.record(DriverAction::Click(selector.to_string()));
        Ok(())
    }

    fn check(&mut self, selector: &str) -> FormProbeResult<()> {
        self.record(DriverAction::Check(selector.to_string()));
        self.state.borrow_mut().checked.insert(selector.to_string(), true);
        Ok(())
    }

    fn uncheck(&mut self, selector: &str) -> FormProbeResult<()> {
        self.record(DriverAction::Uncheck(selector.to_string()));
        self.state
            .borrow_mut()
            .checked
            .insert(selector.to_string(), false);
        Ok(())
    }

    fn select(&mut self, selector: &str, value: &str) -> FormProbeResult<()> {
        self.record(DriverAction::Select {
            selector: selector.to_string(),
            value: value.to_string(),
        });
        Ok(())
    }

    fn clear(&mut self, selector: &str) -> FormProbeResult<()> {
        self.record(DriverAction::Clear(selector.to_string()));
        self.state.borrow_mut().values.remove(selector);
        Ok(())
    }

    fn send_keys(&mut self, selector: &str, key: &str) -> FormProbeResult<()> {
        self.record(DriverAction::SendKeys {
            selector: selector.to_string(),
            key: key.to_string(),
        });
        Ok(())
    }

    fn attribute(&mut self, selector: &str, name: &str) -> FormProbeResult<Option<String>> {
        Ok(self
            .state
            .borrow()
            .attributes
            .get(selector)
            .and_then(|attrs| attrs.get(name))
            .cloned())
    }

    fn text(&mut self, selector: &str) -> FormProbeResult<String> {
        self.state.borrow().texts.get(selector).cloned().ok_or_else(|| {
            FormProbeError::DriverError {
                message: format!("no text scripted for selector {selector}"),
            }
        })
    }

    fn evaluate(&mut self, script: &str) -> FormProbeResult<Value> {
        self.state.borrow().scripts.get(script).cloned().ok_or_else(|| {
            FormProbeError::DriverError {
                message: format!("no result scripted for script {script}"),
            }
        })
    }

    fn assert_visible(&mut self, selector: &str) -> FormProbeResult<()> {
        if self.state.borrow().visible.contains(selector) {
            Ok(())
        } else {
            Err(FormProbeError::assertion(format!(
                "expected {selector} to be visible"
            )))
        }
    }

    fn assert_not_visible(&mut self, selector: &str) -> FormProbeResult<()> {
        if self.state.borrow().visible.contains(selector) {
            Err(FormProbeError::assertion(format!(
                "expected {selector} to not be visible"
            )))
        } else {
            Ok(())
        }
    }

    fn assert_value(&mut self, selector: &str, expected: &str) -> FormProbeResult<()> {
        let actual = self.state.borrow().values.get(selector).cloned();
        if actual.as_deref() == Some(expected) {
            Ok(())
        } else {
            Err(FormProbeError::assertion(format!(
                "expected {selector} to have value {expected:?}, got {actual:?}"
            )))
        }
    }

    fn assert_see_in(&mut self, selector: &str, text: &str) -> FormProbeResult<()> {
        let rendered = self.state.borrow().texts.get(selector).cloned();
        match rendered {
            Some(rendered) if rendered.contains(text) => Ok(()),
            rendered => Err(FormProbeError::assertion(format!(
                "expected {selector} to contain {text:?}, got {rendered:?}"
            ))),
        }
    }

    fn assert_attribute(
        &mut self,
        selector: &str,
        name: &str,
        expected: &str,
    ) -> FormProbeResult<()> {
        let actual = self
            .state
            .borrow()
            .attributes
            .get(selector)
            .and_then(|attrs| attrs.get(name))
            .cloned();
        if actual.as_deref() == Some(expected) {
            Ok(())
        } else {
            Err(FormProbeError::assertion(format!(
                "expected {selector} attribute {name} to be {expected:?}, got {actual:?}"
            )))
        }
    }

    fn assert_checked(&mut self, selector: &str) -> FormProbeResult<()> {
        if self.state.borrow().checked.get(selector) == Some(&true) {
            Ok(())
        } else {
            Err(FormProbeError::assertion(format!(
                "expected {selector} to be checked"
            )))
        }
    }

    fn assert_not_checked(&mut self, selector: &str) -> FormProbeResult<()> {
        if self.state.borrow().checked.get(selector) == Some(&true) {
            Err(FormProbeError::assertion(format!(
                "expected {selector} to not be checked"
            )))
        } else {
            Ok(())
        }
    }

    fn press(&mut self, selector: &str) -> FormProbeResult<()> {
        self.record(DriverAction::Press(selector.to_string()));
        let mut state = self.state.borrow_mut();
        if let Some(path) = state.path_after_submit.clone() {
            state.current_path = Some(path);
        }
        Ok(())
    }

    fn assert_path_is_not(&mut self, path: &str) -> FormProbeResult<()> {
        if self.state.borrow().current_path.as_deref() == Some(path) {
            Err(FormProbeError::assertion(format!(
                "expected the browser to have left {path}"
            )))
        } else {
            Ok(())
        }
    }

    fn wait(&mut self, duration: Duration) -> FormProbeResult<()> {
        // Scripted pages settle instantly; only the intent is recorded.
        self.record(DriverAction::Wait(duration));
        Ok(())
    }
}

/// An attribute map standing in for a stored record.
#[derive(Debug, Clone, Default)]
pub struct MemoryRecord {
    record_type: String,
    attributes: BTreeMap<String, Value>,
    after_refresh: Option<BTreeMap<String, Value>>,
}

impl MemoryRecord {
    /// Create a record of the given runtime type
    #[must_use]
    pub fn new(record_type: impl Into<String>) -> Self {
        Self {
            record_type: record_type.into(),
            ..Self::default()
        }
    }

    /// Set an attribute
    #[must_use]
    pub fn with_attribute(mut self, name: impl Into<String>, value: Value) -> Self {
        self.attributes.insert(name.into(), value);
        self
    }

    /// Script the attributes a refresh from storage will produce
    #[must_use]
    pub fn with_attributes_after_refresh(
        mut self,
        attributes: impl IntoIterator<Item = (String, Value)>,
    ) -> Self {
        self.after_refresh = Some(attributes.into_iter().collect());
        self
    }
}

impl Record for MemoryRecord {
    fn record_type(&self) -> &str {
        &self.record_type
    }

    fn attribute(&self, name: &str) -> Value {
        self.attributes.get(name).cloned().unwrap_or(Value::Null)
    }

    fn refresh(&mut self) -> FormProbeResult<()> {
        if let Some(next) = self.after_refresh.take() {
            self.attributes = next;
        }
        Ok(())
    }
}

/// A schema provider answering from a fixed page-per-record-type table.
///
/// `{record}` in a registered URL is substituted with the record's `id`
/// attribute. Resolution calls are counted so memoization is observable.
#[derive(Debug, Default)]
pub struct StaticSchema {
    pages: HashMap<String, EditPage>,
    resolutions: Rc<RefCell<usize>>,
}

impl StaticSchema {
    /// Create an empty schema table
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the edit page for a record type
    #[must_use]
    pub fn with_page(mut self, record_type: impl Into<String>, page: EditPage) -> Self {
        self.pages.insert(record_type.into(), page);
        self
    }

    /// Shared counter of resolution calls
    #[must_use]
    pub fn resolution_counter(&self) -> Rc<RefCell<usize>> {
        Rc::clone(&self.resolutions)
    }
}

impl SchemaProvider for StaticSchema {
    fn edit_page(&self, record: &dyn Record) -> FormProbeResult<EditPage> {
        *self.resolutions.borrow_mut() += 1;
        let page = self.pages.get(record.record_type()).ok_or_else(|| {
            FormProbeError::SchemaError {
                message: format!("no edit page registered for {}", record.record_type()),
            }
        })?;
        let mut resolved = page.clone();
        resolved.url = resolved
            .url
            .replace("{record}", &to_display_string(&record.attribute("id")));
        Ok(resolved)
    }
}
