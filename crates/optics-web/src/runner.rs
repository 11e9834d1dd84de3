use std::cell::RefCell;
use std::rc::Rc;

use optics_engine::{
    apply_preset, find_preset, measure, state_signature, BenchConfig, Easing, ExplainRequest,
    FrameLoop, InteractionHandler, MeasurementRecorder, ObjectSweep, PackedEvent, PointerEvent,
    SessionEvent, SimulationSession,
};
use serde::Serialize;

/// Owns one bench session and everything the browser drives it with.
///
/// wasm-bindgen cannot export this struct's borrow-heavy API directly, so
/// `lib.rs` keeps a `thread_local!` runner and exports free functions.
pub struct BenchRunner {
    session: SimulationSession,
    handler: InteractionHandler,
    frames: FrameLoop,
    /// Events of the last tick, flattened for direct memory reads.
    event_buffer: Vec<PackedEvent>,
    last_events: Vec<SessionEvent>,
    /// Shared with the frame callback that feeds it.
    recorder: Rc<RefCell<MeasurementRecorder>>,
}

impl BenchRunner {
    pub fn new(config: BenchConfig) -> Self {
        let recorder = Rc::new(RefCell::new(MeasurementRecorder::default()));
        let mut frames = FrameLoop::new();
        let feed = Rc::clone(&recorder);
        let mut elapsed = 0.0;
        frames.on_frame(move |session, dt| {
            elapsed += dt;
            feed.borrow_mut().record(session.scene(), elapsed);
        });

        Self {
            session: SimulationSession::new(config),
            handler: InteractionHandler::new(),
            frames,
            event_buffer: Vec::with_capacity(16),
            last_events: Vec::new(),
            recorder,
        }
    }

    pub fn session(&self) -> &SimulationSession {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut SimulationSession {
        &mut self.session
    }

    /// Advance animations, then publish the events raised since the last tick.
    pub fn tick(&mut self, dt: f32) {
        self.frames.tick(&mut self.session, dt);
        self.event_buffer = self.session.packed_events();
        self.last_events = self.session.drain_events();
    }

    pub fn pointer(&mut self, event: PointerEvent) -> bool {
        self.handler.handle(event, &mut self.session)
    }

    /// Sweep the object along the axis, eased at both ends or at constant speed.
    pub fn start_sweep(&mut self, start_x: f32, end_x: f32, duration: f32, eased: bool) {
        self.handler.cleanup();
        let easing = if eased { Easing::QuadInOut } else { Easing::Linear };
        self.frames
            .start_sweep(ObjectSweep::new(start_x, end_x, duration).with_easing(easing));
    }

    // ---- Measurement recording ----

    pub fn set_recording(&mut self, recording: bool) {
        self.recorder.borrow_mut().set_recording(recording);
    }

    pub fn clear_recording(&mut self) {
        self.recorder.borrow_mut().clear();
    }

    pub fn recording_csv(&self) -> String {
        self.recorder.borrow().to_csv()
    }

    pub fn recording_json(&self) -> String {
        let recorder = self.recorder.borrow();
        to_json(&recorder.samples().collect::<Vec<_>>())
    }

    /// Reset to the named built-in preset. `None` for unknown names.
    pub fn apply_preset(&mut self, name: &str) -> Option<String> {
        let preset = find_preset(name)?;
        self.handler.cleanup();
        self.frames.cancel_sweep();
        Some(apply_preset(&mut self.session, &preset).to_string())
    }

    pub fn reset(&mut self) {
        self.handler.cleanup();
        self.frames.cancel_sweep();
        self.session.reset();
    }

    // ---- Serialized views ----

    pub fn state_json(&self) -> String {
        to_json(self.session.scene())
    }

    pub fn tasks_json(&self) -> String {
        to_json(&self.session.get_tasks())
    }

    pub fn active_task_json(&self) -> String {
        let snapshot = self
            .session
            .get_active_task()
            .and_then(|task| self.session.get_tasks().into_iter().find(|t| t.id == task.id));
        to_json(&snapshot)
    }

    pub fn measurements_json(&self) -> String {
        to_json(&measure(self.session.scene()))
    }

    pub fn events_json(&self) -> String {
        to_json(&self.last_events)
    }

    pub fn signature(&self) -> String {
        state_signature(self.session.scene(), self.session.config().signature_step)
    }

    pub fn explain_request_json(&self) -> String {
        to_json(&ExplainRequest::for_scene(self.session.scene()))
    }

    // ---- Pointer accessors for direct memory reads ----

    pub fn events_ptr(&self) -> *const f32 {
        bytemuck_floats(&self.event_buffer).as_ptr()
    }

    pub fn events_len(&self) -> u32 {
        (self.event_buffer.len() * PackedEvent::FLOATS) as u32
    }

    pub fn world_width(&self) -> f32 {
        self.session.config().world_width
    }

    pub fn world_height(&self) -> f32 {
        self.session.config().world_height
    }
}

fn bytemuck_floats(events: &[PackedEvent]) -> &[f32] {
    bytemuck::cast_slice(events)
}

/// Serialize for the host. A failure is logged and reported as `null`.
fn to_json<T: Serialize + ?Sized>(value: &T) -> String {
    serde_json::to_string(value).unwrap_or_else(|err| {
        log::warn!("serialization failed: {err}");
        "null".to_string()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use optics_engine::LensVariant;

    #[test]
    fn tick_publishes_and_drains_events() {
        let mut runner = BenchRunner::new(BenchConfig::default());
        runner.tick(1.0 / 60.0);
        assert_eq!(runner.events_len(), PackedEvent::FLOATS as u32);
        assert!(runner.session().events().is_empty());
        assert!(runner.events_json().contains("taskActivated"));
        runner.tick(1.0 / 60.0);
        assert_eq!(runner.events_len(), 0);
    }

    #[test]
    fn preset_names_are_checked() {
        let mut runner = BenchRunner::new(BenchConfig::default());
        assert!(runner.apply_preset("camera").is_some());
        assert!(runner.apply_preset("telescope").is_none());
        assert!(runner.measurements_json().contains("objectDistance"));
    }

    #[test]
    fn recording_follows_frames_while_enabled() {
        let mut runner = BenchRunner::new(BenchConfig::default());
        runner.session_mut().add_lens(LensVariant::Convex);
        runner.tick(0.5);
        assert_eq!(runner.recording_json(), "[]");

        runner.set_recording(true);
        runner.tick(0.5);
        // Unchanged readings are not recorded twice.
        runner.tick(0.5);
        let samples: serde_json::Value = serde_json::from_str(&runner.recording_json()).unwrap();
        assert_eq!(samples.as_array().unwrap().len(), 1);
        assert!((samples[0]["time"].as_f64().unwrap() - 1.0).abs() < 1e-6);

        let x = runner.session().scene().object.position.x;
        runner.start_sweep(x, x - 100.0, 1.0, false);
        runner.tick(0.5);
        assert_eq!(runner.recording_csv().lines().count(), 3);

        runner.clear_recording();
        assert_eq!(runner.recording_csv().lines().count(), 1);
    }

    #[test]
    fn views_are_json() {
        let runner = BenchRunner::new(BenchConfig::default());
        let state: serde_json::Value = serde_json::from_str(&runner.state_json()).unwrap();
        assert!(state["elements"].as_array().unwrap().is_empty());
        let active: serde_json::Value = serde_json::from_str(&runner.active_task_json()).unwrap();
        assert_eq!(active["id"], "task-1");
        assert_eq!(runner.measurements_json(), "null");
    }
}
