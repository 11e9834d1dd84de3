use crate::api::session::SimulationSession;
use crate::extensions::sweep::ObjectSweep;

/// Handle returned by `FrameLoop::on_frame`, used to unregister a callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameCallbackId(u32);

type FrameCallback = Box<dyn FnMut(&SimulationSession, f32)>;

/// Scheduler-agnostic frame driver.
///
/// The host calls `tick` from whatever drives its frames (an animation-frame
/// callback, a test loop). Running animations advance first, then every
/// registered callback reads the session. Callbacks never mutate the session:
/// recomputation already happened inside the setter that changed it.
pub struct FrameLoop {
    callbacks: Vec<(FrameCallbackId, FrameCallback)>,
    sweep: Option<ObjectSweep>,
    next_id: u32,
    frame: u64,
}

impl FrameLoop {
    pub fn new() -> Self {
        Self {
            callbacks: Vec::new(),
            sweep: None,
            next_id: 1,
            frame: 0,
        }
    }

    pub fn on_frame(&mut self, callback: impl FnMut(&SimulationSession, f32) + 'static) -> FrameCallbackId {
        let id = FrameCallbackId(self.next_id);
        self.next_id += 1;
        self.callbacks.push((id, Box::new(callback)));
        id
    }

    pub fn remove(&mut self, id: FrameCallbackId) -> bool {
        let before = self.callbacks.len();
        self.callbacks.retain(|(cb_id, _)| *cb_id != id);
        self.callbacks.len() != before
    }

    /// Start an object sweep, replacing any sweep in progress.
    pub fn start_sweep(&mut self, sweep: ObjectSweep) {
        self.sweep = Some(sweep);
    }

    pub fn cancel_sweep(&mut self) {
        self.sweep = None;
    }

    pub fn is_sweeping(&self) -> bool {
        self.sweep.is_some()
    }

    /// Number of frames ticked so far.
    pub fn frame(&self) -> u64 {
        self.frame
    }

    pub fn tick(&mut self, session: &mut SimulationSession, dt: f32) {
        if let Some(sweep) = self.sweep.as_mut() {
            if !sweep.tick(session, dt) {
                self.sweep = None;
            }
        }
        for (_, callback) in self.callbacks.iter_mut() {
            callback(&*session, dt);
        }
        self.frame += 1;
    }
}

impl Default for FrameLoop {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    #[test]
    fn callbacks_run_every_tick() {
        let mut session = SimulationSession::default();
        let mut frames = FrameLoop::new();
        let seen = Rc::new(Cell::new(0));
        let counter = Rc::clone(&seen);
        let id = frames.on_frame(move |_, _| counter.set(counter.get() + 1));
        frames.tick(&mut session, 1.0 / 60.0);
        frames.tick(&mut session, 1.0 / 60.0);
        assert_eq!(seen.get(), 2);
        assert!(frames.remove(id));
        frames.tick(&mut session, 1.0 / 60.0);
        assert_eq!(seen.get(), 2);
        assert_eq!(frames.frame(), 3);
    }

    #[test]
    fn callbacks_see_sweep_progress() {
        let mut session = SimulationSession::default();
        let mut frames = FrameLoop::new();
        let last_x = Rc::new(Cell::new(0.0));
        let sink = Rc::clone(&last_x);
        frames.on_frame(move |s, _| sink.set(s.object().position.x));
        frames.start_sweep(ObjectSweep::new(100.0, 300.0, 0.5));
        frames.tick(&mut session, 0.5);
        assert_eq!(last_x.get(), 300.0);
        assert!(!frames.is_sweeping());
    }
}
