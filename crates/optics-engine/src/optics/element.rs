//! Lenses and mirrors.
//!
//! Elements are an explicit tagged union; the ray constructor and image
//! calculator match on it exhaustively.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::api::config::ElementDefaults;
use crate::api::types::ElementId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LensVariant {
    Convex,
    Concave,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MirrorVariant {
    Plane,
    Concave,
    Convex,
}

/// Which family an element belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ElementKind {
    Lens,
    Mirror,
}

/// A thin lens. `focal_length` is negative for concave (diverging) lenses.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Lens {
    pub id: ElementId,
    pub variant: LensVariant,
    pub position: Vec2,
    pub focal_length: f32,
    pub diameter: f32,
    pub refractive_index: f32,
    pub radius_of_curvature: f32,
}

impl Lens {
    pub fn new(id: ElementId, variant: LensVariant, position: Vec2, defaults: &ElementDefaults) -> Self {
        Self {
            id,
            variant,
            position,
            focal_length: signed_lens_focal_length(variant, defaults.focal_length),
            diameter: defaults.diameter,
            refractive_index: defaults.refractive_index,
            radius_of_curvature: defaults.radius_of_curvature,
        }
    }

    pub fn convex(id: ElementId, position: Vec2, focal_length: f32, diameter: f32) -> Self {
        Self::with_focal_length(id, LensVariant::Convex, position, focal_length, diameter)
    }

    pub fn concave(id: ElementId, position: Vec2, focal_length: f32, diameter: f32) -> Self {
        Self::with_focal_length(id, LensVariant::Concave, position, focal_length, diameter)
    }

    fn with_focal_length(
        id: ElementId,
        variant: LensVariant,
        position: Vec2,
        focal_length: f32,
        diameter: f32,
    ) -> Self {
        let f = focal_length.abs();
        Self {
            id,
            variant,
            position,
            focal_length: signed_lens_focal_length(variant, f),
            diameter,
            refractive_index: 1.5,
            radius_of_curvature: f * 2.0,
        }
    }
}

/// A mirror facing -x. `focal_length` is 0 for plane mirrors, positive for
/// concave (converging) and negative for convex (diverging) ones.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Mirror {
    pub id: ElementId,
    pub variant: MirrorVariant,
    pub position: Vec2,
    pub focal_length: f32,
    pub diameter: f32,
    pub radius_of_curvature: f32,
}

impl Mirror {
    pub fn new(id: ElementId, variant: MirrorVariant, position: Vec2, defaults: &ElementDefaults) -> Self {
        let radius = defaults.radius_of_curvature.abs();
        Self {
            id,
            variant,
            position,
            focal_length: signed_mirror_focal_length(variant, radius / 2.0),
            diameter: defaults.diameter,
            radius_of_curvature: radius,
        }
    }

    pub fn plane(id: ElementId, position: Vec2, diameter: f32) -> Self {
        Self {
            id,
            variant: MirrorVariant::Plane,
            position,
            focal_length: 0.0,
            diameter,
            radius_of_curvature: 0.0,
        }
    }

    pub fn concave(id: ElementId, position: Vec2, focal_length: f32, diameter: f32) -> Self {
        Self::curved(id, MirrorVariant::Concave, position, focal_length, diameter)
    }

    pub fn convex(id: ElementId, position: Vec2, focal_length: f32, diameter: f32) -> Self {
        Self::curved(id, MirrorVariant::Convex, position, focal_length, diameter)
    }

    fn curved(
        id: ElementId,
        variant: MirrorVariant,
        position: Vec2,
        focal_length: f32,
        diameter: f32,
    ) -> Self {
        let f = focal_length.abs();
        Self {
            id,
            variant,
            position,
            focal_length: signed_mirror_focal_length(variant, f),
            diameter,
            radius_of_curvature: f * 2.0,
        }
    }

    /// Centre of curvature on the principal axis. `None` for plane mirrors.
    pub fn center_of_curvature(&self) -> Option<Vec2> {
        let radius = self.curvature_radius();
        match self.variant {
            MirrorVariant::Plane => None,
            MirrorVariant::Concave => Some(Vec2::new(self.position.x - radius, self.position.y)),
            MirrorVariant::Convex => Some(Vec2::new(self.position.x + radius, self.position.y)),
        }
    }

    /// Radius of curvature, falling back to `2|f|` when the radius was left unset.
    fn curvature_radius(&self) -> f32 {
        if self.radius_of_curvature.abs() > f32::EPSILON {
            self.radius_of_curvature.abs()
        } else {
            self.focal_length.abs() * 2.0
        }
    }
}

/// A lens or a mirror placed on the bench.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "elementKind", rename_all = "lowercase")]
pub enum OpticalElement {
    Lens(Lens),
    Mirror(Mirror),
}

/// Partial update applied by `SimulationSession::update_element`.
/// `None` fields are left untouched; `refractive_index` is ignored for mirrors.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
#[serde(rename_all = "camelCase")]
pub struct ElementUpdate {
    pub position: Option<Vec2>,
    pub focal_length: Option<f32>,
    pub diameter: Option<f32>,
    pub refractive_index: Option<f32>,
    pub radius_of_curvature: Option<f32>,
}

impl ElementUpdate {
    pub fn position(position: Vec2) -> Self {
        Self {
            position: Some(position),
            ..Self::default()
        }
    }
}

impl OpticalElement {
    pub fn id(&self) -> ElementId {
        match self {
            OpticalElement::Lens(lens) => lens.id,
            OpticalElement::Mirror(mirror) => mirror.id,
        }
    }

    pub fn kind(&self) -> ElementKind {
        match self {
            OpticalElement::Lens(_) => ElementKind::Lens,
            OpticalElement::Mirror(_) => ElementKind::Mirror,
        }
    }

    pub fn position(&self) -> Vec2 {
        match self {
            OpticalElement::Lens(lens) => lens.position,
            OpticalElement::Mirror(mirror) => mirror.position,
        }
    }

    pub fn focal_length(&self) -> f32 {
        match self {
            OpticalElement::Lens(lens) => lens.focal_length,
            OpticalElement::Mirror(mirror) => mirror.focal_length,
        }
    }

    pub fn diameter(&self) -> f32 {
        match self {
            OpticalElement::Lens(lens) => lens.diameter,
            OpticalElement::Mirror(mirror) => mirror.diameter,
        }
    }

    /// Top and bottom y of the aperture segment.
    pub fn aperture(&self) -> (f32, f32) {
        let center = self.position().y;
        let half = self.diameter() / 2.0;
        (center - half, center + half)
    }

    /// Focal length signed so converging is positive and diverging negative,
    /// for lenses and mirrors alike. `None` for a plane mirror.
    pub fn converging_focal_length(&self) -> Option<f32> {
        match self {
            OpticalElement::Lens(lens) => Some(signed_lens_focal_length(lens.variant, lens.focal_length)),
            OpticalElement::Mirror(mirror) => match mirror.variant {
                MirrorVariant::Plane => None,
                variant => Some(signed_mirror_focal_length(variant, mirror.focal_length)),
            },
        }
    }

    /// Short label such as `convex-lens` or `plane-mirror`.
    pub fn label(&self) -> &'static str {
        match self {
            OpticalElement::Lens(lens) => match lens.variant {
                LensVariant::Convex => "convex-lens",
                LensVariant::Concave => "concave-lens",
            },
            OpticalElement::Mirror(mirror) => match mirror.variant {
                MirrorVariant::Plane => "plane-mirror",
                MirrorVariant::Concave => "concave-mirror",
                MirrorVariant::Convex => "convex-mirror",
            },
        }
    }

    pub fn as_lens(&self) -> Option<&Lens> {
        match self {
            OpticalElement::Lens(lens) => Some(lens),
            OpticalElement::Mirror(_) => None,
        }
    }

    pub fn as_mirror(&self) -> Option<&Mirror> {
        match self {
            OpticalElement::Mirror(mirror) => Some(mirror),
            OpticalElement::Lens(_) => None,
        }
    }

    /// Hit test against the element body: `half_width` either side of the
    /// element's x, full aperture height.
    pub fn contains(&self, point: Vec2, half_width: f32) -> bool {
        let x = self.position().x;
        let (top, bottom) = self.aperture();
        point.x >= x - half_width && point.x <= x + half_width && point.y >= top && point.y <= bottom
    }

    pub fn set_position(&mut self, position: Vec2) {
        match self {
            OpticalElement::Lens(lens) => lens.position = position,
            OpticalElement::Mirror(mirror) => mirror.position = position,
        }
    }

    /// Apply a partial update. Focal lengths are re-signed to match the variant;
    /// a mirror's focal length and radius of curvature move together.
    pub fn apply(&mut self, update: &ElementUpdate) {
        if let Some(position) = update.position {
            self.set_position(position);
        }
        match self {
            OpticalElement::Lens(lens) => {
                if let Some(f) = update.focal_length {
                    lens.focal_length = signed_lens_focal_length(lens.variant, f);
                }
                if let Some(d) = update.diameter {
                    lens.diameter = d.abs();
                }
                if let Some(n) = update.refractive_index {
                    lens.refractive_index = n;
                }
                if let Some(r) = update.radius_of_curvature {
                    lens.radius_of_curvature = r.abs();
                }
            }
            OpticalElement::Mirror(mirror) => {
                if let Some(d) = update.diameter {
                    mirror.diameter = d.abs();
                }
                // Curved mirrors keep R = 2|f|. A focal length wins over a radius
                // given in the same update.
                if let Some(r) = update.radius_of_curvature {
                    mirror.radius_of_curvature = r.abs();
                    mirror.focal_length = signed_mirror_focal_length(mirror.variant, r.abs() / 2.0);
                }
                if let Some(f) = update.focal_length {
                    mirror.focal_length = signed_mirror_focal_length(mirror.variant, f);
                    if mirror.variant != MirrorVariant::Plane {
                        mirror.radius_of_curvature = f.abs() * 2.0;
                    }
                }
            }
        }
    }
}

impl From<Lens> for OpticalElement {
    fn from(lens: Lens) -> Self {
        OpticalElement::Lens(lens)
    }
}

impl From<Mirror> for OpticalElement {
    fn from(mirror: Mirror) -> Self {
        OpticalElement::Mirror(mirror)
    }
}

fn signed_lens_focal_length(variant: LensVariant, f: f32) -> f32 {
    match variant {
        LensVariant::Convex => f.abs(),
        LensVariant::Concave => -f.abs(),
    }
}

fn signed_mirror_focal_length(variant: MirrorVariant, f: f32) -> f32 {
    match variant {
        MirrorVariant::Plane => 0.0,
        MirrorVariant::Concave => f.abs(),
        MirrorVariant::Convex => -f.abs(),
    }
}

/// Focal length implied by a radius of curvature.
///
/// Mirrors: `R / 2`. Symmetric thin lens (lensmaker's equation with
/// `R1 = R`, `R2 = -R`): `R / (2 (n - 1))`. `None` when `n == 1`.
pub fn focal_length_from_radius(radius: f32, kind: ElementKind, refractive_index: f32) -> Option<f32> {
    match kind {
        ElementKind::Mirror => Some(radius / 2.0),
        ElementKind::Lens => {
            let power = 2.0 * (refractive_index - 1.0);
            if power.abs() < f32::EPSILON {
                None
            } else {
                Some(radius / power)
            }
        }
    }
}
