//! Browser exports for the optics bench.
//!
//! One `BenchRunner` lives in a `thread_local!`; every export borrows it.
//! Calls made before `bench_init` log a warning and return a default value.

pub mod runner;

pub use runner::BenchRunner;

use std::cell::RefCell;

use glam::Vec2;
use optics_engine::{BenchConfig, BenchMode, DisplayFlag, ElementId, ElementUpdate, LensVariant, MirrorVariant, PointerEvent};
use serde::de::DeserializeOwned;
use wasm_bindgen::prelude::*;

thread_local! {
    static RUNNER: RefCell<Option<BenchRunner>> = const { RefCell::new(None) };
}

fn with_runner<R: Default>(f: impl FnOnce(&mut BenchRunner) -> R) -> R {
    RUNNER.with(|cell| match cell.borrow_mut().as_mut() {
        Some(runner) => f(runner),
        None => {
            log::warn!("bench not initialized, call bench_init() first");
            R::default()
        }
    })
}

/// Parse a lowercase/camelCase tag such as `"concave"` or `"rayExtensions"`.
fn parse_tag<T: DeserializeOwned>(tag: &str) -> Option<T> {
    match serde_json::from_value(serde_json::Value::from(tag)) {
        Ok(value) => Some(value),
        Err(err) => {
            log::warn!("unknown tag {tag:?}: {err}");
            None
        }
    }
}

#[wasm_bindgen]
pub fn bench_init(config_json: &str) {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Info);

    let config = if config_json.trim().is_empty() {
        BenchConfig::default()
    } else {
        BenchConfig::from_json(config_json).unwrap_or_else(|err| {
            log::warn!("invalid bench config, using defaults: {err}");
            BenchConfig::default()
        })
    };
    RUNNER.with(|cell| *cell.borrow_mut() = Some(BenchRunner::new(config)));
    log::info!("optics bench: initialized");
}

#[wasm_bindgen]
pub fn bench_tick(dt: f32) {
    with_runner(|r| r.tick(dt));
}

// ---- Pointer input ----

#[wasm_bindgen]
pub fn bench_pointer_down(x: f32, y: f32) {
    with_runner(|r| r.pointer(PointerEvent::Down { x, y }));
}

#[wasm_bindgen]
pub fn bench_pointer_move(x: f32, y: f32) -> bool {
    with_runner(|r| r.pointer(PointerEvent::Move { x, y }))
}

#[wasm_bindgen]
pub fn bench_pointer_up() {
    with_runner(|r| r.pointer(PointerEvent::Up));
}

// ---- Scene setters ----

#[wasm_bindgen]
pub fn bench_set_object_position(x: f32, y: f32) {
    with_runner(|r| r.session_mut().set_object_position(Vec2::new(x, y)));
}

#[wasm_bindgen]
pub fn bench_set_object_height(height: f32) {
    with_runner(|r| r.session_mut().set_object_height(height));
}

/// Add a lens (`"convex"` / `"concave"`). Returns its ID, or 0 if the variant is unknown.
#[wasm_bindgen]
pub fn bench_add_lens(variant: &str) -> u32 {
    let Some(variant) = parse_tag::<LensVariant>(variant) else {
        return 0;
    };
    with_runner(|r| r.session_mut().add_lens(variant).0)
}

/// Add a mirror (`"plane"` / `"concave"` / `"convex"`). Returns its ID, or 0 if unknown.
#[wasm_bindgen]
pub fn bench_add_mirror(variant: &str) -> u32 {
    let Some(variant) = parse_tag::<MirrorVariant>(variant) else {
        return 0;
    };
    with_runner(|r| r.session_mut().add_mirror(variant).0)
}

#[wasm_bindgen]
pub fn bench_remove_element(id: u32) -> bool {
    with_runner(|r| r.session_mut().remove_element(ElementId(id)))
}

/// Apply a partial update given as JSON, e.g. `{"focalLength": 150}`.
#[wasm_bindgen]
pub fn bench_update_element(id: u32, update_json: &str) -> bool {
    let update: ElementUpdate = match serde_json::from_str(update_json) {
        Ok(update) => update,
        Err(err) => {
            log::warn!("invalid element update: {err}");
            return false;
        }
    };
    with_runner(|r| r.session_mut().update_element(ElementId(id), &update))
}

#[wasm_bindgen]
pub fn bench_toggle_display(flag: &str) -> bool {
    let Some(flag) = parse_tag::<DisplayFlag>(flag) else {
        return false;
    };
    with_runner(|r| r.session_mut().toggle_display(flag))
}

#[wasm_bindgen]
pub fn bench_set_mode(mode: &str) {
    if let Some(mode) = parse_tag::<BenchMode>(mode) {
        with_runner(|r| r.session_mut().set_mode(mode));
    }
}

#[wasm_bindgen]
pub fn bench_set_angle_of_incidence(degrees: f32) {
    with_runner(|r| r.session_mut().set_angle_of_incidence(degrees));
}

#[wasm_bindgen]
pub fn bench_reset() {
    with_runner(|r| r.reset());
}

/// Returns the preset description, or an empty string for unknown names.
#[wasm_bindgen]
pub fn bench_apply_preset(name: &str) -> String {
    with_runner(|r| r.apply_preset(name).unwrap_or_default())
}

/// Sweep the object from `start_x` to `end_x`; `eased` slows both ends.
#[wasm_bindgen]
pub fn bench_start_sweep(start_x: f32, end_x: f32, duration: f32, eased: bool) {
    with_runner(|r| r.start_sweep(start_x, end_x, duration, eased));
}

// ---- Measurement recording ----

#[wasm_bindgen]
pub fn bench_set_recording(recording: bool) {
    with_runner(|r| r.set_recording(recording));
}

#[wasm_bindgen]
pub fn bench_clear_recording() {
    with_runner(|r| r.clear_recording());
}

#[wasm_bindgen]
pub fn get_recording_json() -> String {
    with_runner(|r| r.recording_json())
}

#[wasm_bindgen]
pub fn get_recording_csv() -> String {
    with_runner(|r| r.recording_csv())
}

// ---- Tasks ----

#[wasm_bindgen]
pub fn bench_set_active_task(id: &str) -> bool {
    with_runner(|r| r.session_mut().set_active_task(id))
}

#[wasm_bindgen]
pub fn bench_complete_task(id: &str) -> bool {
    with_runner(|r| r.session_mut().complete_task(id))
}

#[wasm_bindgen]
pub fn bench_skip_task(id: &str) -> bool {
    with_runner(|r| r.session_mut().skip_task(id))
}

// ---- Data accessors ----

#[wasm_bindgen]
pub fn get_state_json() -> String {
    with_runner(|r| r.state_json())
}

#[wasm_bindgen]
pub fn get_tasks_json() -> String {
    with_runner(|r| r.tasks_json())
}

#[wasm_bindgen]
pub fn get_active_task_json() -> String {
    with_runner(|r| r.active_task_json())
}

#[wasm_bindgen]
pub fn get_measurements_json() -> String {
    with_runner(|r| r.measurements_json())
}

#[wasm_bindgen]
pub fn get_events_json() -> String {
    with_runner(|r| r.events_json())
}

#[wasm_bindgen]
pub fn get_state_signature() -> String {
    with_runner(|r| r.signature())
}

#[wasm_bindgen]
pub fn get_explain_request_json() -> String {
    with_runner(|r| r.explain_request_json())
}

#[wasm_bindgen]
pub fn get_events_ptr() -> *const f32 {
    RUNNER.with(|cell| {
        cell.borrow()
            .as_ref()
            .map_or(std::ptr::null(), |r| r.events_ptr())
    })
}

#[wasm_bindgen]
pub fn get_events_len() -> u32 {
    with_runner(|r| r.events_len())
}

#[wasm_bindgen]
pub fn get_world_width() -> f32 {
    with_runner(|r| r.world_width())
}

#[wasm_bindgen]
pub fn get_world_height() -> f32 {
    with_runner(|r| r.world_height())
}
