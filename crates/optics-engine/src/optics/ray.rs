//! Principal-ray construction.
//!
//! Builds the classical ray diagram for the active element: three rays for a
//! lens, two for a curved mirror, one for a plane mirror. Every ray starts at
//! the object's tip and is split at the aperture into an incident and an
//! emergent segment. A ray that misses the aperture keeps only its incident
//! segment; the renderer truncates it.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::core::geometry::{
    direction_towards_positive_x, line_intersection, normalize, ray_segment_intersection, reflect,
};
use crate::optics::element::{Lens, Mirror, MirrorVariant, OpticalElement};
use crate::optics::object::OpticalObject;

pub const PARALLEL_COLOR: u32 = 0xff6b6b;
pub const PRINCIPAL_COLOR: u32 = 0x4ecdc4;
pub const FOCAL_COLOR: u32 = 0x95e1d3;

/// Role of a ray in the diagram.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RayKind {
    /// Leaves the tip parallel to the axis.
    Parallel,
    /// Through the optical centre or the centre of curvature.
    Principal,
    /// Through the near focal point.
    Focal,
    /// Edge ray of a bundle.
    Marginal,
}

impl RayKind {
    pub fn color(self) -> u32 {
        match self {
            RayKind::Parallel => PARALLEL_COLOR,
            RayKind::Principal | RayKind::Marginal => PRINCIPAL_COLOR,
            RayKind::Focal => FOCAL_COLOR,
        }
    }
}

/// A drawable directed half-line.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ray {
    pub origin: Vec2,
    /// Unit direction (zero only for degenerate constructions).
    pub direction: Vec2,
    pub kind: RayKind,
    /// 0xRRGGBB.
    pub color: u32,
    pub intensity: f32,
}

impl Ray {
    /// Build a ray; `direction` is normalized.
    pub fn new(origin: Vec2, direction: Vec2, kind: RayKind) -> Self {
        Self {
            origin,
            direction: normalize(direction),
            kind,
            color: kind.color(),
            intensity: 1.0,
        }
    }

    pub fn point_at(&self, t: f32) -> Vec2 {
        self.origin + self.direction * t
    }

    /// Where this ray crosses the element's aperture, if it does.
    pub fn hit(&self, element: &OpticalElement) -> Option<Vec2> {
        let (top, bottom) = element.aperture();
        ray_segment_intersection(self.origin, self.direction, top, bottom, element.position().x)
    }
}

/// One principal ray: the segment reaching the element and, if it struck the
/// aperture, the segment leaving it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RayPath {
    pub incident: Ray,
    pub emergent: Option<Ray>,
}

impl RayPath {
    fn missed(incident: Ray) -> Self {
        Self { incident, emergent: None }
    }

    /// Point where the ray met the element.
    pub fn hit_point(&self) -> Option<Vec2> {
        self.emergent.map(|r| r.origin)
    }

    /// Incident segment followed by the emergent one, if any.
    pub fn segments(&self) -> impl Iterator<Item = &Ray> {
        std::iter::once(&self.incident).chain(self.emergent.iter())
    }
}

/// Where the lines carrying two rays meet, forwards or backwards.
/// Emergent rays of a virtual image only meet behind their origins.
pub fn find_ray_intersection(a: &Ray, b: &Ray) -> Option<Vec2> {
    line_intersection(a.origin, a.direction, b.origin, b.direction)
}

/// Principal rays from `object` through `element`.
pub fn trace_principal_rays(object: &OpticalObject, element: &OpticalElement) -> Vec<RayPath> {
    let tip = object.tip();
    match element {
        OpticalElement::Lens(lens) => trace_lens(tip, lens, element),
        OpticalElement::Mirror(mirror) => trace_mirror(tip, mirror, element),
    }
}

fn trace_lens(tip: Vec2, lens: &Lens, element: &OpticalElement) -> Vec<RayPath> {
    let axis_y = lens.position.y;
    let f = lens.focal_length;
    let mut paths = Vec::with_capacity(3);

    // Parallel ray: bends towards the far focal point (diverging lenses send it
    // away from the virtual focus on the incident side).
    let parallel = Ray::new(tip, Vec2::X, RayKind::Parallel);
    paths.push(match parallel.hit(element) {
        Some(hit) => {
            let far_focus = Vec2::new(lens.position.x + f, axis_y);
            let toward_focus = normalize(far_focus - hit);
            let direction = if f.abs() < f32::EPSILON {
                Vec2::X
            } else if f > 0.0 {
                toward_focus
            } else {
                -toward_focus
            };
            RayPath {
                incident: parallel,
                emergent: Some(Ray::new(hit, direction, RayKind::Parallel)),
            }
        }
        None => RayPath::missed(parallel),
    });

    // Central ray: undeviated through the optical centre.
    let central = Ray::new(tip, direction_towards_positive_x(tip, lens.position), RayKind::Principal);
    paths.push(match central.hit(element) {
        Some(hit) => RayPath {
            incident: central,
            emergent: Some(Ray::new(hit, central.direction, RayKind::Principal)),
        },
        None => RayPath::missed(central),
    });

    // Focal ray: along the line through the near focal point, leaves parallel.
    let near_focus = Vec2::new(lens.position.x - f, axis_y);
    let focal = Ray::new(tip, direction_towards_positive_x(tip, near_focus), RayKind::Focal);
    paths.push(match focal.hit(element) {
        Some(hit) => RayPath {
            incident: focal,
            emergent: Some(Ray::new(hit, Vec2::X, RayKind::Focal)),
        },
        None => RayPath::missed(focal),
    });

    paths
}

fn trace_mirror(tip: Vec2, mirror: &Mirror, element: &OpticalElement) -> Vec<RayPath> {
    let center = match (mirror.variant, mirror.center_of_curvature()) {
        (MirrorVariant::Plane, _) | (_, None) => {
            let ray = Ray::new(tip, direction_towards_positive_x(tip, mirror.position), RayKind::Principal);
            let path = match ray.hit(element) {
                Some(hit) => RayPath {
                    incident: ray,
                    emergent: Some(Ray::new(hit, reflect(ray.direction, Vec2::NEG_X), RayKind::Principal)),
                },
                None => RayPath::missed(ray),
            };
            return vec![path];
        }
        (_, Some(center)) => center,
    };

    let mut paths = Vec::with_capacity(2);

    // Parallel ray: reflects about the true surface normal, through the focus.
    let parallel = Ray::new(tip, Vec2::X, RayKind::Parallel);
    paths.push(match parallel.hit(element) {
        Some(hit) => {
            let normal = normalize(hit - center);
            RayPath {
                incident: parallel,
                emergent: Some(Ray::new(hit, reflect(parallel.direction, normal), RayKind::Parallel)),
            }
        }
        None => RayPath::missed(parallel),
    });

    // Centre-of-curvature ray: strikes the surface head-on and returns on itself.
    let radial = Ray::new(tip, direction_towards_positive_x(tip, center), RayKind::Principal);
    paths.push(match radial.hit(element) {
        Some(hit) => RayPath {
            incident: radial,
            emergent: Some(Ray::new(hit, -radial.direction, RayKind::Principal)),
        },
        None => RayPath::missed(radial),
    });

    paths
}
