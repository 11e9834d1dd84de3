use bytemuck::{Pod, Zeroable};
use serde::{Deserialize, Serialize};

/// Unique identifier for an optical element on the bench.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ElementId(pub u32);

/// Identifier of a guided exercise.
pub type TaskId = &'static str;

/// Notifications emitted by the session for UI listeners (toasts, voice-over).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum SessionEvent {
    /// A task became the active exercise and its setup ran.
    TaskActivated { id: TaskId },
    /// A task was completed, either by satisfying its check or by being skipped.
    TaskCompleted { id: TaskId, skipped: bool },
    /// A task's predecessor completed, so it can now be started.
    TaskUnlocked { id: TaskId },
    /// The whole session was restored to its initial state.
    SceneReset,
}

impl SessionEvent {
    /// Numeric kind used by the packed form.
    pub fn kind(&self) -> u32 {
        match self {
            SessionEvent::TaskActivated { .. } => 1,
            SessionEvent::TaskCompleted { .. } => 2,
            SessionEvent::TaskUnlocked { .. } => 3,
            SessionEvent::SceneReset => 4,
        }
    }
}

/// A session event flattened for a shared float buffer.
/// `kind` identifies the event, `a` carries the task index (or -1),
/// `b` is 1.0 for skipped completions.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct PackedEvent {
    pub kind: f32,
    pub a: f32,
    pub b: f32,
    pub c: f32,
}

impl PackedEvent {
    pub const FLOATS: usize = 4;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn packed_event_is_four_floats() {
        assert_eq!(std::mem::size_of::<PackedEvent>(), PackedEvent::FLOATS * 4);
        let events = [PackedEvent { kind: 2.0, a: 1.0, b: 0.0, c: 0.0 }];
        let floats: &[f32] = bytemuck::cast_slice(&events);
        assert_eq!(floats, &[2.0, 1.0, 0.0, 0.0]);
    }

    #[test]
    fn event_json_is_tagged() {
        let json = serde_json::to_string(&SessionEvent::TaskCompleted { id: "task-1", skipped: true }).unwrap();
        assert_eq!(json, r#"{"type":"taskCompleted","id":"task-1","skipped":true}"#);
    }
}
