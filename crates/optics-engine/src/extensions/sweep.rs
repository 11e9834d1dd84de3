// extensions/sweep.rs
//
// Timed horizontal sweep of the object along the bench, so students can watch
// the image move as the object distance changes.

use glam::Vec2;

use crate::api::session::SimulationSession;
use crate::extensions::easing::{ease, Easing};

/// Default sweep duration in seconds.
pub const DEFAULT_SWEEP_SECONDS: f32 = 3.0;

/// Moves the object from `start_x` to `end_x` over `duration` seconds.
/// Each tick goes through `set_object_position`, so rays, image and task
/// checks update on every step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ObjectSweep {
    pub start_x: f32,
    pub end_x: f32,
    pub duration: f32,
    pub easing: Easing,
    elapsed: f32,
}

impl ObjectSweep {
    pub fn new(start_x: f32, end_x: f32, duration: f32) -> Self {
        Self {
            start_x,
            end_x,
            duration: duration.max(0.0),
            easing: Easing::QuadInOut,
            elapsed: 0.0,
        }
    }

    pub fn with_easing(mut self, easing: Easing) -> Self {
        self.easing = easing;
        self
    }

    /// Normalized progress in [0, 1].
    pub fn progress(&self) -> f32 {
        if self.duration <= 0.0 {
            1.0
        } else {
            (self.elapsed / self.duration).min(1.0)
        }
    }

    pub fn is_finished(&self) -> bool {
        self.progress() >= 1.0
    }

    /// Advance by `dt` seconds and move the object. The object's y is kept.
    /// Returns true while the sweep still has steps left.
    pub fn tick(&mut self, session: &mut SimulationSession, dt: f32) -> bool {
        self.elapsed += dt.max(0.0);
        let x = ease(self.start_x, self.end_x, self.progress(), self.easing);
        let y = session.object().position.y;
        session.set_object_position(Vec2::new(x, y));
        !self.is_finished()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sweep_reaches_end_and_stops() {
        let mut session = SimulationSession::default();
        let y = session.object().position.y;
        let mut sweep = ObjectSweep::new(100.0, 400.0, 1.0);
        assert!(sweep.tick(&mut session, 0.5));
        assert!((session.object().position.x - 250.0).abs() < 1e-3);
        assert!(!sweep.tick(&mut session, 0.6));
        assert_eq!(session.object().position, Vec2::new(400.0, y));
    }

    #[test]
    fn eased_sweep_starts_slowly() {
        let mut session = SimulationSession::default();
        let mut sweep = ObjectSweep::new(0.0, 100.0, 1.0);
        sweep.tick(&mut session, 0.25);
        assert!((session.object().position.x - 12.5).abs() < 1e-3);
    }

    #[test]
    fn zero_duration_jumps() {
        let mut session = SimulationSession::default();
        let mut sweep = ObjectSweep::new(100.0, 300.0, 0.0).with_easing(Easing::Linear);
        assert!(!sweep.tick(&mut session, 0.0));
        assert_eq!(session.object().position.x, 300.0);
    }
}
