//! Image formation from the thin-lens / mirror equation.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::optics::element::{ElementKind, OpticalElement};
use crate::optics::object::OpticalObject;

/// Object distances this close to the focal length put the image at infinity.
pub const FOCAL_EPSILON: f32 = 1e-3;

/// The image formed by the active element.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageData {
    /// Foot of the image on the principal axis.
    pub position: Vec2,
    pub height: f32,
    pub is_real: bool,
    pub is_inverted: bool,
    /// Unsigned ratio of image height to object height.
    pub magnification: f32,
}

impl ImageData {
    /// The image of the object's tip: below the axis when inverted, above it otherwise.
    pub fn tip(&self) -> Vec2 {
        if self.is_inverted {
            Vec2::new(self.position.x, self.position.y + self.height)
        } else {
            Vec2::new(self.position.x, self.position.y - self.height)
        }
    }
}

/// Signed image distance `v = f·u / (u − f)` for object distance `u > 0` and
/// converging-positive focal length `f`. `None` when the object sits at the focus.
pub fn image_distance(object_distance: f32, focal_length: f32) -> Option<f32> {
    let denom = object_distance - focal_length;
    if denom.abs() < FOCAL_EPSILON {
        return None;
    }
    Some(focal_length * object_distance / denom)
}

/// Signed magnification `−v / u`. Negative means inverted.
pub fn magnification(object_distance: f32, image_distance: f32) -> f32 {
    -image_distance / object_distance
}

/// Image of `object` formed by `element`.
///
/// `None` when the object touches the element or sits exactly at its focal
/// distance. Lens images lie at `x + v`; mirrors send light back towards -x,
/// so their images lie at `x − v` (real ones in front, virtual ones behind).
/// Placing mirror images at `x − v` is a convention of this bench, chosen so
/// the image sits where the reflected rays drawn by `trace_principal_rays` meet.
pub fn calculate_image(object: &OpticalObject, element: &OpticalElement) -> Option<ImageData> {
    let center = element.position();
    let u = (center.x - object.position.x).abs();
    if u == 0.0 {
        return None;
    }

    let (v, signed_m) = match element.converging_focal_length() {
        // Plane mirror: virtual, upright, same size, as far behind as the object is in front.
        None => (-u, 1.0),
        Some(f) => {
            let v = image_distance(u, f)?;
            (v, magnification(u, v))
        }
    };

    let x = match element.kind() {
        ElementKind::Lens => center.x + v,
        ElementKind::Mirror => center.x - v,
    };
    let m = signed_m.abs();

    Some(ImageData {
        position: Vec2::new(x, center.y),
        height: object.height * m,
        is_real: v > 0.0,
        is_inverted: signed_m < 0.0,
        magnification: m,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::types::ElementId;
    use crate::optics::element::{Lens, Mirror};

    const LENS_X: f32 = 600.0;

    fn object_at_distance(u: f32) -> OpticalObject {
        OpticalObject {
            position: Vec2::new(LENS_X - u, 300.0),
            ..OpticalObject::default()
        }
    }

    fn convex() -> OpticalElement {
        Lens::convex(ElementId(1), Vec2::new(LENS_X, 300.0), 100.0, 200.0).into()
    }

    fn assert_close(a: f32, b: f32) {
        assert!((a - b).abs() < 1e-3, "{a} != {b}");
    }

    #[test]
    fn convex_lens_beyond_2f() {
        let image = calculate_image(&object_at_distance(300.0), &convex()).unwrap();
        assert_close(image.position.x - LENS_X, 150.0);
        assert_close(image.magnification, 0.5);
        assert_close(image.height, 40.0);
        assert!(image.is_real);
        assert!(image.is_inverted);
    }

    #[test]
    fn convex_lens_between_f_and_2f() {
        let image = calculate_image(&object_at_distance(150.0), &convex()).unwrap();
        assert_close(image.position.x - LENS_X, 300.0);
        assert_close(image.magnification, 2.0);
        assert!(image.is_real);
        assert!(image.is_inverted);
    }

    #[test]
    fn convex_lens_inside_f_is_virtual_and_magnified() {
        let image = calculate_image(&object_at_distance(50.0), &convex()).unwrap();
        assert_close(image.position.x - LENS_X, -100.0);
        assert_close(image.magnification, 2.0);
        assert!(!image.is_real);
        assert!(!image.is_inverted);
    }

    #[test]
    fn concave_lens_always_virtual_upright_diminished() {
        let lens: OpticalElement = Lens::concave(ElementId(1), Vec2::new(LENS_X, 300.0), 100.0, 200.0).into();
        for u in [10.0, 50.0, 100.0, 250.0, 500.0] {
            let image = calculate_image(&object_at_distance(u), &lens).unwrap();
            assert!(image.position.x < LENS_X);
            assert!(!image.is_real);
            assert!(!image.is_inverted);
            assert!(image.magnification < 1.0);
        }
    }

    #[test]
    fn plane_mirror_image_mirrors_object() {
        let mirror: OpticalElement = Mirror::plane(ElementId(1), Vec2::new(LENS_X, 300.0), 200.0).into();
        for u in [40.0, 150.0, 320.0] {
            let image = calculate_image(&object_at_distance(u), &mirror).unwrap();
            assert_close((image.position.x - LENS_X).abs(), u);
            assert!(image.position.x > LENS_X);
            assert!(!image.is_real);
            assert!(!image.is_inverted);
            assert_close(image.magnification, 1.0);
        }
    }

    #[test]
    fn concave_mirror_real_image_forms_in_front() {
        let mirror: OpticalElement = Mirror::concave(ElementId(1), Vec2::new(LENS_X, 300.0), 100.0, 200.0).into();
        let image = calculate_image(&object_at_distance(300.0), &mirror).unwrap();
        assert_close(image.position.x, LENS_X - 150.0);
        assert!(image.is_real);
        assert!(image.is_inverted);
    }

    #[test]
    fn convex_mirror_is_virtual_upright_diminished() {
        let mirror: OpticalElement = Mirror::convex(ElementId(1), Vec2::new(LENS_X, 300.0), 100.0, 200.0).into();
        let image = calculate_image(&object_at_distance(200.0), &mirror).unwrap();
        assert!(!image.is_real);
        assert!(!image.is_inverted);
        assert!(image.magnification < 1.0);
        assert!(image.position.x > LENS_X);
    }

    #[test]
    fn object_at_focus_has_no_image() {
        assert!(calculate_image(&object_at_distance(100.0), &convex()).is_none());
    }

    #[test]
    fn object_on_element_has_no_image() {
        assert!(calculate_image(&object_at_distance(0.0), &convex()).is_none());
    }

    #[test]
    fn image_tip_side_follows_orientation() {
        let image = calculate_image(&object_at_distance(300.0), &convex()).unwrap();
        assert!(image.tip().y > image.position.y);
    }
}
