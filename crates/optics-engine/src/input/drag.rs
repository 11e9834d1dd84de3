//! Pointer handling for the bench: hit testing and dragging.

use glam::Vec2;

use crate::api::config::BenchConfig;
use crate::api::session::SimulationSession;
use crate::api::types::ElementId;
use crate::core::scene::SceneState;
use crate::optics::element::ElementUpdate;

/// Pointer input in world coordinates, as delivered by the host.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    Down { x: f32, y: f32 },
    Move { x: f32, y: f32 },
    Up,
}

/// What a drag is moving.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragTarget {
    Object,
    Element(ElementId),
}

/// The current interaction mode.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InteractionMode {
    Idle,
    /// `grab_offset` is pointer minus the target's anchor at pointer-down,
    /// so the target keeps its place under the pointer.
    Dragging { target: DragTarget, grab_offset: Vec2 },
}

/// Single-pointer drag state machine.
#[derive(Debug, Clone)]
pub struct InteractionHandler {
    mode: InteractionMode,
    /// Last pointer position seen.
    pointer: Vec2,
}

impl InteractionHandler {
    pub fn new() -> Self {
        Self {
            mode: InteractionMode::Idle,
            pointer: Vec2::ZERO,
        }
    }

    pub fn mode(&self) -> InteractionMode {
        self.mode
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.mode, InteractionMode::Dragging { .. })
    }

    pub fn pointer_pos(&self) -> Vec2 {
        self.pointer
    }

    /// Route one pointer event. Returns true if the scene changed.
    pub fn handle(&mut self, event: PointerEvent, session: &mut SimulationSession) -> bool {
        match event {
            PointerEvent::Down { x, y } => {
                let config = *session.config();
                self.start_drag(Vec2::new(x, y), session.scene(), &config);
                false
            }
            PointerEvent::Move { x, y } => self.on_pointer_move(Vec2::new(x, y), session),
            PointerEvent::Up => {
                self.on_pointer_up();
                false
            }
        }
    }

    /// Hit-test the object first, then each element in bench order, and start
    /// dragging the first hit. Returns the target, or `None` on empty space.
    pub fn start_drag(&mut self, pos: Vec2, scene: &SceneState, config: &BenchConfig) -> Option<DragTarget> {
        self.pointer = pos;
        let hit = if scene.object.contains(pos, config.object_hit_slop) {
            Some((DragTarget::Object, scene.object.position))
        } else {
            scene
                .elements()
                .iter()
                .find(|e| e.contains(pos, config.element_hit_half_width))
                .map(|e| (DragTarget::Element(e.id()), e.position()))
        };

        match hit {
            Some((target, anchor)) => {
                log::debug!("drag start: {target:?}");
                self.mode = InteractionMode::Dragging { target, grab_offset: pos - anchor };
                Some(target)
            }
            None => {
                self.mode = InteractionMode::Idle;
                None
            }
        }
    }

    /// Move the dragged target to `pos − grab_offset`, kept inside the world margin.
    /// No effect while idle. Returns true if the scene changed.
    pub fn on_pointer_move(&mut self, pos: Vec2, session: &mut SimulationSession) -> bool {
        self.pointer = pos;
        let InteractionMode::Dragging { target, grab_offset } = self.mode else {
            return false;
        };
        let config = session.config();
        let margin = Vec2::splat(config.drag_margin);
        let max = (Vec2::new(config.world_width, config.world_height) - margin).max(margin);
        let position = (pos - grab_offset).clamp(margin, max);

        match target {
            DragTarget::Object => {
                session.set_object_position(position);
                true
            }
            DragTarget::Element(id) => {
                if session.update_element(id, &ElementUpdate::position(position)) {
                    true
                } else {
                    // The element was removed mid-drag.
                    self.mode = InteractionMode::Idle;
                    false
                }
            }
        }
    }

    pub fn on_pointer_up(&mut self) {
        if self.is_dragging() {
            log::debug!("drag end");
        }
        self.mode = InteractionMode::Idle;
    }

    /// Drop any drag in progress and forget the pointer.
    pub fn cleanup(&mut self) {
        self.on_pointer_up();
        self.pointer = Vec2::ZERO;
    }
}

impl Default for InteractionHandler {
    fn default() -> Self {
        Self::new()
    }
}
