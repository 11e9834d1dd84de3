use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Shape drawn for the object. Has no effect on the optics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ObjectKind {
    Candle,
    #[default]
    Arrow,
    Pencil,
}

/// The light source standing on the bench.
/// Its base sits at `position` and it extends upward (towards -y) by `height`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OpticalObject {
    pub kind: ObjectKind,
    pub position: Vec2,
    pub height: f32,
    pub width: f32,
}

impl OpticalObject {
    pub fn new(kind: ObjectKind, position: Vec2, height: f32) -> Self {
        Self {
            kind,
            position,
            height,
            width: 20.0,
        }
    }

    /// The tip of the object, origin of every principal ray.
    pub fn tip(&self) -> Vec2 {
        Vec2::new(self.position.x, self.position.y - self.height)
    }

    /// Whether `point` lies inside the object's bounding box grown by `slop` on every side.
    pub fn contains(&self, point: Vec2, slop: f32) -> bool {
        let left = self.position.x - self.width / 2.0 - slop;
        let right = self.position.x + self.width / 2.0 + slop;
        let top = self.position.y - self.height - slop;
        let bottom = self.position.y + slop;
        point.x >= left && point.x <= right && point.y >= top && point.y <= bottom
    }
}

impl Default for OpticalObject {
    fn default() -> Self {
        Self::new(ObjectKind::Arrow, Vec2::new(200.0, 300.0), 80.0)
    }
}
