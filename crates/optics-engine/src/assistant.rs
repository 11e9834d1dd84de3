//! Payloads for the external "explain this state" assistant.
//!
//! The engine never calls the assistant itself. It derives a short signature
//! so the host can cache answers for near-identical states and drop answers
//! whose signature no longer matches the bench.

use serde::Serialize;

use crate::core::scene::SceneState;
use crate::optics::element::OpticalElement;
use crate::optics::image::ImageData;
use crate::optics::object::OpticalObject;

pub const EXPLAIN_SUBJECT: &str = "physics";
pub const EXPLAIN_TOPIC: &str = "geometric optics";

fn round_to(value: f32, step: f32) -> f32 {
    if step <= 0.0 {
        return value;
    }
    // Adding 0.0 turns -0 into 0 so the key does not flicker.
    (value / step).round() * step + 0.0
}

/// Deduplication key for the current bench: rounded object height,
/// object-to-element distance, focal length, and element type.
pub fn state_signature(scene: &SceneState, step: f32) -> String {
    let height = round_to(scene.object.height, step);
    match scene.active_element() {
        Some(element) => {
            let distance = round_to((element.position().x - scene.object.position.x).abs(), step);
            let focal = round_to(element.focal_length(), step);
            format!("H:{height}|D:{distance}|F:{focal}|TYPE:{}", element.label())
        }
        None => format!("H:{height}|D:-|F:-|TYPE:none"),
    }
}

/// The `{object, element, image}` triple sent upstream.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct SimulationSnapshot<'a> {
    pub object: &'a OpticalObject,
    pub element: Option<&'a OpticalElement>,
    pub image: Option<&'a ImageData>,
}

impl<'a> SimulationSnapshot<'a> {
    pub fn of(scene: &'a SceneState) -> Self {
        Self {
            object: &scene.object,
            element: scene.active_element(),
            image: scene.image(),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct ExplainContext<'a> {
    pub topic: &'a str,
}

/// Request body for the assistant endpoint.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct ExplainRequest<'a> {
    pub scenario_id: &'a str,
    pub current_task_id: u32,
    pub student_input: &'a str,
    pub mode: &'a str,
    pub subject: &'a str,
    pub simulation_state: SimulationSnapshot<'a>,
    pub context: ExplainContext<'a>,
}

impl<'a> ExplainRequest<'a> {
    pub fn for_scene(scene: &'a SceneState) -> Self {
        Self {
            scenario_id: "generic",
            current_task_id: 0,
            student_input: "Explain the current state",
            mode: "state_explanation",
            subject: EXPLAIN_SUBJECT,
            simulation_state: SimulationSnapshot::of(scene),
            context: ExplainContext { topic: EXPLAIN_TOPIC },
        }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}
