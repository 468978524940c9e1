//! A custom field handler claiming a host-specific map widget.
//!
//! The edit page renders a `ParkingSpotMap` widget the built-in recipe table
//! knows nothing about: a grid of spot buttons, with the selected spot
//! carrying a `data-selected` marker. The handler covers all three
//! behaviors for it and leaves every other field to the defaults.
//!
//! Run with `RUST_LOG=debug cargo run --example custom_handler` to see the
//! per-field traces.

use formprobe::mock::{MemoryRecord, MockBrowser, StaticSchema};
use formprobe::value::{loose_eq, to_display_string};
use formprobe::{
    CustomFieldHandler, EditPage, EditPageProbe, FieldDescriptor, FieldFlow, FieldKind, FieldList,
    FormProbeError, FormProbeResult, Iteration,
};
use serde_json::json;

/// Handles the `ParkingSpotMap` widget; every other field continues to the
/// built-in recipes.
struct ParkingSpotHandler;

impl ParkingSpotHandler {
    fn claims(iteration: &Iteration<'_>) -> bool {
        matches!(iteration.field().kind(), FieldKind::Custom(kind) if kind == "ParkingSpotMap")
    }

    fn spot_selector(spot: &str) -> String {
        format!(".parking-map [data-spot=\"{spot}\"]")
    }
}

impl CustomFieldHandler for ParkingSpotHandler {
    fn fill(&self, iteration: &mut Iteration<'_>) -> FormProbeResult<FieldFlow> {
        if !Self::claims(iteration) {
            return Ok(FieldFlow::Continue);
        }
        let spot = to_display_string(iteration.new_value()?);
        let selector = Self::spot_selector(&spot);
        iteration.page()?.click(&selector)?;
        Ok(FieldFlow::Skip)
    }

    fn preview(&self, iteration: &mut Iteration<'_>) -> FormProbeResult<FieldFlow> {
        if !Self::claims(iteration) {
            return Ok(FieldFlow::Continue);
        }
        let spot = to_display_string(iteration.current_value());
        let selector = Self::spot_selector(&spot);
        iteration
            .page()?
            .assert_attribute(&selector, "data-selected", "true")?;
        Ok(FieldFlow::Skip)
    }

    fn compare(&self, iteration: &mut Iteration<'_>) -> FormProbeResult<FieldFlow> {
        if !Self::claims(iteration) {
            return Ok(FieldFlow::Continue);
        }
        let intended = iteration.new_value()?.clone();
        if !loose_eq(iteration.current_value(), &intended) {
            return Err(FormProbeError::assertion(format!(
                "parking spot '{}' saved as {:?}, intended {:?}",
                iteration.name(),
                iteration.current_value(),
                intended,
            )));
        }
        Ok(FieldFlow::Skip)
    }
}

fn main() -> FormProbeResult<()> {
    formprobe::init_tracing();

    let fields = FieldList::new()
        .with_field(FieldDescriptor::new("name", FieldKind::TextInput))
        .with_field(FieldDescriptor::new(
            "spot",
            FieldKind::Custom("ParkingSpotMap".to_string()),
        ));
    let schema = StaticSchema::new().with_page(
        "vehicle",
        EditPage::new("EditVehicle", "/admin/vehicles/{record}/edit", fields),
    );

    // Scripted page state: the form shows the current values, and submitting
    // lands back on the vehicle index.
    let browser = MockBrowser::new()
        .with_value("#form\\.name", "Van 12")
        .with_attribute(".parking-map [data-spot=\"B4\"]", "data-selected", "true")
        .with_path_after_submit("/admin/vehicles");

    let current = MemoryRecord::new("vehicle")
        .with_attribute("id", json!(7))
        .with_attribute("name", json!("Van 12"))
        .with_attribute("spot", json!("B4"))
        .with_attributes_after_refresh([
            ("id".to_string(), json!(7)),
            ("name".to_string(), json!("Van 19")),
            ("spot".to_string(), json!("C2")),
        ]);
    let new = MemoryRecord::new("vehicle")
        .with_attribute("name", json!("Van 19"))
        .with_attribute("spot", json!("C2"));

    let mut probe = EditPageProbe::new(schema, browser, current)
        .with_new(new)
        .with_custom_field_handler(ParkingSpotHandler)
        .verbose(true);

    probe.required_visible_fields(&["name", "spot"])?.test_preview()?;
    probe.test_save()?;

    println!("edit page verified: preview, fill, submit and save all match");
    Ok(())
}
