use serde::{Deserialize, Serialize};

/// Parameters for newly added elements, matching the bench sliders' defaults.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ElementDefaults {
    /// Focal length magnitude for lenses.
    pub focal_length: f32,
    pub diameter: f32,
    pub refractive_index: f32,
    /// Radius of curvature; curved mirrors use half of it as focal length.
    pub radius_of_curvature: f32,
    /// Where new elements are placed along the bench.
    pub x: f32,
}

impl Default for ElementDefaults {
    fn default() -> Self {
        Self {
            focal_length: 100.0,
            diameter: 200.0,
            refractive_index: 1.5,
            radius_of_curvature: 200.0,
            x: 600.0,
        }
    }
}

/// Configuration for a bench session.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BenchConfig {
    /// World width in bench units (canvas pixels).
    pub world_width: f32,
    /// World height in bench units. The principal axis defaults to its middle.
    pub world_height: f32,
    /// Dragged entities stay at least this far from every world edge.
    pub drag_margin: f32,
    /// Half-width of an element's grab area either side of its x.
    pub element_hit_half_width: f32,
    /// Extra pixels around the object's bounding box that still count as a hit.
    pub object_hit_slop: f32,
    /// Rounding step for the explain-state signature.
    pub signature_step: f32,
    pub element: ElementDefaults,
}

impl Default for BenchConfig {
    fn default() -> Self {
        Self {
            world_width: 1200.0,
            world_height: 600.0,
            drag_margin: 50.0,
            element_hit_half_width: 30.0,
            object_hit_slop: 10.0,
            signature_step: 1.0,
            element: ElementDefaults::default(),
        }
    }
}

impl BenchConfig {
    /// Parse a configuration from JSON. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// y of the principal axis when no element is on the bench.
    pub fn axis_y(&self) -> f32 {
        self.world_height / 2.0
    }
}
