//! Distances and classifications shown by the measurement overlay.

use serde::Serialize;

use crate::core::scene::SceneState;

/// Objects this close to F (px) count as "at F".
pub const AT_FOCUS_TOLERANCE: f32 = 10.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ImageNature {
    Real,
    Virtual,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Orientation {
    Upright,
    Inverted,
}

/// Readings for the active element. Image fields are `None` when no image forms.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Measurements {
    pub object_distance: f32,
    /// Focal length magnitude.
    pub focal_length: f32,
    pub image_distance: Option<f32>,
    pub magnification: Option<f32>,
    pub image_nature: Option<ImageNature>,
    pub orientation: Option<Orientation>,
    /// Object distance in focal lengths; `None` for a plane mirror.
    pub focal_ratio: Option<f32>,
    pub beyond_2f: bool,
    pub between_f_and_2f: bool,
    pub at_f: bool,
    pub within_f: bool,
}

/// Measure the current bench. `None` when no element is placed.
pub fn measure(scene: &SceneState) -> Option<Measurements> {
    let element = scene.active_element()?;
    let u = (element.position().x - scene.object.position.x).abs();
    let f = element.focal_length().abs();
    let image = scene.image();
    // A plane mirror has no focus, so none of the zone flags apply.
    let focused = f > 0.0;

    Some(Measurements {
        object_distance: u,
        focal_length: f,
        image_distance: image.map(|i| (i.position.x - element.position().x).abs()),
        magnification: image.map(|i| i.magnification),
        image_nature: image.map(|i| if i.is_real { ImageNature::Real } else { ImageNature::Virtual }),
        orientation: image.map(|i| if i.is_inverted { Orientation::Inverted } else { Orientation::Upright }),
        focal_ratio: focused.then(|| u / f),
        beyond_2f: focused && u > 2.0 * f,
        between_f_and_2f: focused && u > f && u < 2.0 * f,
        at_f: focused && (u - f).abs() < AT_FOCUS_TOLERANCE,
        within_f: focused && u < f,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::types::ElementId;
    use crate::optics::element::{Lens, Mirror};
    use crate::optics::object::OpticalObject;
    use glam::Vec2;

    fn scene(element: crate::optics::element::OpticalElement, object_x: f32) -> SceneState {
        let mut scene = SceneState::new(OpticalObject::default());
        scene.object.position.x = object_x;
        scene.push_element(element);
        scene.recompute();
        scene
    }

    #[test]
    fn empty_bench_has_no_measurements() {
        assert!(measure(&SceneState::new(OpticalObject::default())).is_none());
    }

    #[test]
    fn convex_lens_between_f_and_2f() {
        let lens = Lens::convex(ElementId(1), Vec2::new(600.0, 300.0), 100.0, 200.0).into();
        let m = measure(&scene(lens, 450.0)).unwrap();
        assert_eq!(m.object_distance, 150.0);
        assert!((m.image_distance.unwrap() - 300.0).abs() < 1e-2);
        assert_eq!(m.image_nature, Some(ImageNature::Real));
        assert_eq!(m.orientation, Some(Orientation::Inverted));
        assert!(m.between_f_and_2f && !m.beyond_2f && !m.within_f && !m.at_f);
        assert_eq!(m.focal_ratio, Some(1.5));
    }

    #[test]
    fn object_at_focus_has_no_image() {
        let lens = Lens::convex(ElementId(1), Vec2::new(600.0, 300.0), 100.0, 200.0).into();
        let m = measure(&scene(lens, 500.0)).unwrap();
        assert!(m.at_f);
        assert_eq!(m.image_distance, None);
        assert_eq!(m.image_nature, None);
    }

    #[test]
    fn plane_mirror_has_no_zones() {
        let mirror = Mirror::plane(ElementId(1), Vec2::new(600.0, 300.0), 200.0).into();
        let m = measure(&scene(mirror, 400.0)).unwrap();
        assert_eq!(m.focal_ratio, None);
        assert!(!m.within_f && !m.at_f);
        assert!((m.image_distance.unwrap() - 200.0).abs() < 1e-3);
        assert_eq!(m.magnification, Some(1.0));
    }
}
