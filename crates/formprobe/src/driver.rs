//! The browser collaborator: the fixed set of primitives the engine drives.
//!
//! The engine is deliberately ignorant of how a page is actually driven — a
//! real WebDriver/CDP session, a remote bridge, or the scripted
//! [`MockBrowser`](crate::mock::MockBrowser) all sit behind this trait. The
//! interaction model is synchronous and step-by-step: one call fully settles
//! before the next is issued, and implementations own their own waiting and
//! timeout policy. Assertion primitives route mismatches back as
//! [`FormProbeError::AssertionFailed`](crate::FormProbeError::AssertionFailed)
//! so a failed expectation is distinguishable from a broken driver.

use std::time::Duration;

use serde_json::Value;

use crate::result::FormProbeResult;

/// Browser primitives consumed by the fill, preview and compare behaviors.
pub trait BrowserDriver {
    /// Navigate to a URL
    fn navigate(&mut self, url: &str) -> FormProbeResult<()>;

    /// Fail if the page surfaced client-side (JavaScript) errors on load
    fn assert_no_client_errors(&mut self) -> FormProbeResult<()>;

    /// Replace the value of the matched input with the given text
    fn fill(&mut self, selector: &str, text: &str) -> FormProbeResult<()>;

    /// Type text keystroke by keystroke, for widgets that re-render per key
    fn type_slowly(&mut self, selector: &str, text: &str) -> FormProbeResult<()>;

    /// Click the matched element
    fn click(&mut self, selector: &str) -> FormProbeResult<()>;

    /// Check the matched checkbox
    fn check(&mut self, selector: &str) -> FormProbeResult<()>;

    /// Uncheck the matched checkbox
    fn uncheck(&mut self, selector: &str) -> FormProbeResult<()>;

    /// Choose an option of the matched `<select>` by value
    fn select(&mut self, selector: &str, value: &str) -> FormProbeResult<()>;

    /// Clear the matched element's content
    fn clear(&mut self, selector: &str) -> FormProbeResult<()>;

    /// Send a named key (e.g. `Backspace`) to the matched element
    fn send_keys(&mut self, selector: &str, key: &str) -> FormProbeResult<()>;

    /// Read an attribute of the matched element, `None` when absent
    fn attribute(&mut self, selector: &str, name: &str) -> FormProbeResult<Option<String>>;

    /// Read the rendered text of the matched element
    fn text(&mut self, selector: &str) -> FormProbeResult<String>;

    /// Evaluate JavaScript on the page and return its JSON result
    fn evaluate(&mut self, script: &str) -> FormProbeResult<Value>;

    /// Assert the matched element is visible
    fn assert_visible(&mut self, selector: &str) -> FormProbeResult<()>;

    /// Assert the matched element is not visible
    fn assert_not_visible(&mut self, selector: &str) -> FormProbeResult<()>;

    /// Assert the matched input's value equals the expected text
    fn assert_value(&mut self, selector: &str, expected: &str) -> FormProbeResult<()>;

    /// Assert the matched element's text contains the expected text
    fn assert_see_in(&mut self, selector: &str, text: &str) -> FormProbeResult<()>;

    /// Assert an attribute of the matched element equals the expected value
    fn assert_attribute(
        &mut self,
        selector: &str,
        name: &str,
        expected: &str,
    ) -> FormProbeResult<()>;

    /// Assert the matched checkbox or radio is checked
    fn assert_checked(&mut self, selector: &str) -> FormProbeResult<()>;

    /// Assert the matched checkbox or radio is not checked
    fn assert_not_checked(&mut self, selector: &str) -> FormProbeResult<()>;

    /// Press the matched button and wait for the triggered action to settle
    fn press(&mut self, selector: &str) -> FormProbeResult<()>;

    /// Assert the browser has left the given path; the signal that a
    /// submission was accepted and persistence was attempted
    fn assert_path_is_not(&mut self, path: &str) -> FormProbeResult<()>;

    /// Block for a fixed duration
    fn wait(&mut self, duration: Duration) -> FormProbeResult<()>;
}
