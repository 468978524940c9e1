//! The probe session: one record's edit page, verified end to end.
//!
//! [`EditPageProbe`] owns the three collaborators (schema provider, browser
//! driver, record store access through the records themselves) and walks the
//! page's field list once per behavior. Per field, interception runs in a
//! fixed order: verbose trace, registered pre-behavior callback, custom field
//! handler, then the built-in recipe. The first interceptor that skips wins.

use std::collections::HashMap;
use std::fmt;

use tracing::{debug, info};

use crate::comparator;
use crate::driver::BrowserDriver;
use crate::field::FieldDescriptor;
use crate::filler::{self, SUBMIT_BUTTON};
use crate::handler::{Behavior, CompareFieldHook, CustomFieldHandler, FieldFlow, PageFieldHook};
use crate::iteration::Iteration;
use crate::record::Record;
use crate::result::{FormProbeError, FormProbeResult};
use crate::schema::{EditPage, SchemaProvider};
use crate::value::DisplayMap;
use crate::viewer::{self, DisplayFormats, FieldStep};

/// Default render format of date-time picker inputs
pub const DEFAULT_DATETIME_DISPLAY_FORMAT: &str = "%b %-d, %Y %H:%M:%S";
/// Default render format of date-only picker inputs
pub const DEFAULT_DATE_DISPLAY_FORMAT: &str = "%b %-d, %Y";

/// A verification session for one record's edit page.
pub struct EditPageProbe {
    schema: Box<dyn SchemaProvider>,
    driver: Box<dyn BrowserDriver>,
    current: Box<dyn Record>,
    new: Option<Box<dyn Record>>,
    handler: Option<Box<dyn CustomFieldHandler>>,
    display_maps: HashMap<String, DisplayMap>,
    fill_hook: Option<PageFieldHook>,
    preview_hook: Option<PageFieldHook>,
    compare_hook: Option<CompareFieldHook>,
    verbose: bool,
    datetime_display_format: String,
    date_display_format: String,
    page: Option<EditPage>,
}

impl fmt::Debug for EditPageProbe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EditPageProbe")
            .field("has_new", &self.new.is_some())
            .field("has_handler", &self.handler.is_some())
            .field("display_maps", &self.display_maps.keys())
            .field("verbose", &self.verbose)
            .field("datetime_display_format", &self.datetime_display_format)
            .field("date_display_format", &self.date_display_format)
            .field("page", &self.page)
            .finish_non_exhaustive()
    }
}

impl EditPageProbe {
    /// Start a session for the given record, with the schema provider and
    /// browser driver it will run against
    #[must_use]
    pub fn new(
        schema: impl SchemaProvider + 'static,
        driver: impl BrowserDriver + 'static,
        current: impl Record + 'static,
    ) -> Self {
        Self {
            schema: Box::new(schema),
            driver: Box::new(driver),
            current: Box::new(current),
            new: None,
            handler: None,
            display_maps: HashMap::new(),
            fill_hook: None,
            preview_hook: None,
            compare_hook: None,
            verbose: false,
            datetime_display_format: DEFAULT_DATETIME_DISPLAY_FORMAT.to_string(),
            date_display_format: DEFAULT_DATE_DISPLAY_FORMAT.to_string(),
            page: None,
        }
    }

    /// Provide the record carrying the values to fill and save
    #[must_use]
    pub fn with_new(mut self, new: impl Record + 'static) -> Self {
        self.new = Some(Box::new(new));
        self
    }

    /// Register the custom field handler consulted before default dispatch
    #[must_use]
    pub fn with_custom_field_handler(mut self, handler: impl CustomFieldHandler + 'static) -> Self {
        self.handler = Some(Box::new(handler));
        self
    }

    /// Attach a value display map to one field, keyed by raw stored value
    #[must_use]
    pub fn with_values_display_map(mut self, field: impl Into<String>, map: DisplayMap) -> Self {
        self.display_maps.insert(field.into(), map);
        self
    }

    /// Register a callback run per field before the fill recipe
    #[must_use]
    pub fn fill_field_using(
        mut self,
        hook: impl FnMut(&str, &FieldDescriptor, &mut dyn BrowserDriver) -> FormProbeResult<FieldFlow>
            + 'static,
    ) -> Self {
        self.fill_hook = Some(Box::new(hook));
        self
    }

    /// Register a callback run per field before the preview recipe
    #[must_use]
    pub fn preview_field_using(
        mut self,
        hook: impl FnMut(&str, &FieldDescriptor, &mut dyn BrowserDriver) -> FormProbeResult<FieldFlow>
            + 'static,
    ) -> Self {
        self.preview_hook = Some(Box::new(hook));
        self
    }

    /// Register a callback run per field before the post-save comparison
    #[must_use]
    pub fn compare_value_using(
        mut self,
        hook: impl FnMut(
                &str,
                &FieldDescriptor,
                &dyn Record,
                &dyn Record,
            ) -> FormProbeResult<FieldFlow>
            + 'static,
    ) -> Self {
        self.compare_hook = Some(Box::new(hook));
        self
    }

    /// Trace every field as it is processed
    #[must_use]
    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Override the render format asserted for date-time pickers
    #[must_use]
    pub fn with_datetime_display_format(mut self, format: impl Into<String>) -> Self {
        self.datetime_display_format = format.into();
        self
    }

    /// Override the render format asserted for date-only pickers
    #[must_use]
    pub fn with_date_display_format(mut self, format: impl Into<String>) -> Self {
        self.date_display_format = format.into();
        self
    }

    /// The resolved edit page, memoized for the session's lifetime
    fn edit_page(&mut self) -> FormProbeResult<&EditPage> {
        if self.page.is_none() {
            let page = self.schema.edit_page(self.current.as_ref())?;
            debug!(
                page = %page.name,
                url = %page.url,
                fields = page.fields.len(),
                "edit page resolved"
            );
            self.page = Some(page);
        }
        self.page.as_ref().ok_or_else(|| FormProbeError::SchemaError {
            message: "edit page resolution produced no page".to_string(),
        })
    }

    /// Guard that every named field is present on the page.
    ///
    /// Errors list exactly the missing names, so a typo in a test reads as
    /// a configuration problem instead of a downstream dispatch failure.
    pub fn required_visible_fields(&mut self, names: &[&str]) -> FormProbeResult<&mut Self> {
        let page = self.edit_page()?;
        let missing: Vec<String> = names
            .iter()
            .filter(|name| !page.fields.contains(name))
            .map(ToString::to_string)
            .collect();
        if missing.is_empty() {
            Ok(self)
        } else {
            Err(FormProbeError::MissingRequiredFields {
                page: page.name.clone(),
                missing,
            })
        }
    }

    fn trace_field(&self, behavior: Behavior, page: &str, field: &FieldDescriptor) {
        if self.verbose {
            info!(
                page,
                behavior = %behavior,
                field = field.name(),
                kind = %field.kind(),
                "processing field"
            );
        }
    }

    /// Open the edit page and assert every field displays the current
    /// record's value. Returns the browser handle for follow-up assertions.
    ///
    /// # Errors
    ///
    /// Fails on the first field whose displayed value differs from the
    /// record, on client-side page errors, and on unsupported field kinds
    /// no handler claims.
    pub fn test_preview(&mut self) -> FormProbeResult<&mut dyn BrowserDriver> {
        let page = self.edit_page()?.clone();
        let datetime = self.datetime_display_format.clone();
        let date = self.date_display_format.clone();

        self.driver.navigate(&page.url)?;
        self.driver.assert_no_client_errors()?;

        for field in page.fields.iter() {
            self.trace_field(Behavior::Preview, &page.name, field);
            if let Some(hook) = self.preview_hook.as_mut() {
                if hook(field.name(), field, self.driver.as_mut())?.is_skip() {
                    continue;
                }
            }
            if let Some(handler) = self.handler.as_ref() {
                let mut iteration = Iteration::new(
                    field,
                    self.current.as_ref(),
                    None,
                    Some(self.driver.as_mut()),
                    self.display_maps.get(field.name()),
                );
                if handler.preview(&mut iteration)?.is_skip() {
                    continue;
                }
            }
            let step = FieldStep::new(
                field,
                &page.name,
                self.display_maps.get(field.name()),
                self.verbose,
            );
            let current = self.current.attribute(field.name());
            viewer::preview_field(
                &step,
                self.driver.as_mut(),
                &current,
                DisplayFormats {
                    datetime: &datetime,
                    date: &date,
                },
            )?;
        }
        Ok(self.driver.as_mut())
    }

    /// Open the edit page, write the new record's values into every field
    /// and submit the form.
    ///
    /// # Errors
    ///
    /// Fails without a new record, on client-side page errors, on
    /// unsupported field kinds no handler claims, and when the browser is
    /// still on the edit page after submitting.
    pub fn fill_form_and_submit(&mut self) -> FormProbeResult<()> {
        if self.new.is_none() {
            return Err(FormProbeError::NewRecordMissing);
        }
        let page = self.edit_page()?.clone();

        self.driver.navigate(&page.url)?;
        self.driver.assert_no_client_errors()?;

        for field in page.fields.iter() {
            self.trace_field(Behavior::Fill, &page.name, field);
            if let Some(hook) = self.fill_hook.as_mut() {
                if hook(field.name(), field, self.driver.as_mut())?.is_skip() {
                    continue;
                }
            }
            if let Some(handler) = self.handler.as_ref() {
                let mut iteration = Iteration::new(
                    field,
                    self.current.as_ref(),
                    self.new.as_deref(),
                    Some(self.driver.as_mut()),
                    self.display_maps.get(field.name()),
                );
                if handler.fill(&mut iteration)?.is_skip() {
                    continue;
                }
            }
            let new_value = match self.new.as_deref() {
                Some(record) => record.attribute(field.name()),
                None => return Err(FormProbeError::NewRecordMissing),
            };
            let step = FieldStep::new(
                field,
                &page.name,
                self.display_maps.get(field.name()),
                self.verbose,
            );
            filler::fill_field(&step, self.driver.as_mut(), &new_value)?;
        }

        self.driver.press(SUBMIT_BUTTON)?;
        // Still sitting on the edit page means the save never went through.
        self.driver.assert_path_is_not(&page.url)
    }

    /// Assert every field of the refreshed current record equals the
    /// intended value, per the field kind's equality semantics. Failures
    /// across fields are collected and reported together.
    fn compare_records(&mut self) -> FormProbeResult<()> {
        if self.new.is_none() {
            return Err(FormProbeError::NewRecordMissing);
        }
        let page = self.edit_page()?.clone();
        let mut failures = Vec::new();

        for field in page.fields.iter() {
            self.trace_field(Behavior::Compare, &page.name, field);
            if let Some(hook) = self.compare_hook.as_mut() {
                let new = self
                    .new
                    .as_deref()
                    .ok_or(FormProbeError::NewRecordMissing)?;
                if hook(field.name(), field, self.current.as_ref(), new)?.is_skip() {
                    continue;
                }
            }
            if let Some(handler) = self.handler.as_ref() {
                let mut iteration = Iteration::new(
                    field,
                    self.current.as_ref(),
                    self.new.as_deref(),
                    None,
                    self.display_maps.get(field.name()),
                );
                if handler.compare(&mut iteration)?.is_skip() {
                    continue;
                }
            }
            let new_value = match self.new.as_deref() {
                Some(record) => record.attribute(field.name()),
                None => return Err(FormProbeError::NewRecordMissing),
            };
            let step = FieldStep::new(
                field,
                &page.name,
                self.display_maps.get(field.name()),
                self.verbose,
            );
            let current = self.current.attribute(field.name());
            let result = comparator::compare_field(&step, &current, &new_value)?;
            if !result.passed {
                failures.push(result.message);
            }
        }

        if failures.is_empty() {
            Ok(())
        } else {
            Err(FormProbeError::AssertionFailed {
                message: failures.join("\n"),
            })
        }
    }

    /// Fill and submit the form, refresh the current record from storage and
    /// verify every saved value equals the intended one. Returns the browser
    /// handle for follow-up assertions.
    ///
    /// # Errors
    ///
    /// Propagates every [`fill_form_and_submit`](Self::fill_form_and_submit)
    /// failure, refresh failures, and an aggregated assertion error naming
    /// each field whose saved value differs.
    pub fn test_save(&mut self) -> FormProbeResult<&mut dyn BrowserDriver> {
        self.fill_form_and_submit()?;
        self.current.refresh()?;
        self.compare_records()?;
        Ok(self.driver.as_mut())
    }
}
