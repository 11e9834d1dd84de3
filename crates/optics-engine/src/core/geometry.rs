//! Vector and ray geometry on the optical bench.
//!
//! Pure math over `glam::Vec2`. Screen convention: +x to the right, +y downward.

use glam::Vec2;

/// Directions with an |x| below this are treated as parallel to an aperture.
pub const PARALLEL_EPSILON: f32 = 1e-4;

/// Determinant threshold below which two rays are considered parallel.
const RAY_CROSS_EPSILON: f32 = 1e-3;

/// Unit vector along `v`, or zero when `v` has no length.
#[inline]
pub fn normalize(v: Vec2) -> Vec2 {
    v.normalize_or_zero()
}

/// Mirror `direction` about the surface `normal`: `d - 2 (d·n) n`.
#[inline]
pub fn reflect(direction: Vec2, normal: Vec2) -> Vec2 {
    direction - 2.0 * direction.dot(normal) * normal
}

/// Unit direction from `from` towards `to`, flipped if needed so it travels
/// towards +x. Rays aimed at a point behind their origin keep the same line
/// but head towards the element instead of away from it.
#[inline]
pub fn direction_towards_positive_x(from: Vec2, to: Vec2) -> Vec2 {
    let dir = normalize(to - from);
    if dir.x < 0.0 {
        -dir
    } else {
        dir
    }
}

/// Intersect a half-line with the vertical segment `x = segment_x`,
/// `segment_top_y <= y <= segment_bottom_y`.
///
/// Returns `None` when the ray runs parallel to the segment, when the segment
/// lies behind the origin, or when the crossing is outside the aperture.
pub fn ray_segment_intersection(
    origin: Vec2,
    direction: Vec2,
    segment_top_y: f32,
    segment_bottom_y: f32,
    segment_x: f32,
) -> Option<Vec2> {
    if direction.x.abs() < PARALLEL_EPSILON {
        return None;
    }

    let t = (segment_x - origin.x) / direction.x;
    if t < 0.0 {
        return None;
    }

    let point = origin + direction * t;
    if point.y < segment_top_y || point.y > segment_bottom_y {
        return None;
    }
    Some(point)
}

/// Point where the infinite lines through two rays cross.
///
/// Used to locate where emergent rays (or their backward extensions) meet.
/// `None` for parallel rays.
pub fn line_intersection(
    origin_a: Vec2,
    direction_a: Vec2,
    origin_b: Vec2,
    direction_b: Vec2,
) -> Option<Vec2> {
    let denom = direction_a.perp_dot(direction_b);
    if denom.abs() < RAY_CROSS_EPSILON {
        return None;
    }
    let t = (origin_b - origin_a).perp_dot(direction_b) / denom;
    Some(origin_a + direction_a * t)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: Vec2, b: Vec2) -> bool {
        (a - b).length() < 1e-4
    }

    #[test]
    fn reflect_off_vertical_mirror_flips_x() {
        let d = normalize(Vec2::new(1.0, 1.0));
        let r = reflect(d, Vec2::new(-1.0, 0.0));
        assert!(approx(r, Vec2::new(-d.x, d.y)));
    }

    #[test]
    fn normalize_zero_stays_zero() {
        assert_eq!(normalize(Vec2::ZERO), Vec2::ZERO);
    }

    #[test]
    fn horizontal_ray_hits_aperture() {
        let hit = ray_segment_intersection(
            Vec2::new(200.0, 220.0),
            Vec2::X,
            200.0,
            400.0,
            600.0,
        );
        assert_eq!(hit, Some(Vec2::new(600.0, 220.0)));
    }

    #[test]
    fn ray_above_aperture_misses() {
        let hit = ray_segment_intersection(Vec2::new(200.0, 150.0), Vec2::X, 200.0, 400.0, 600.0);
        assert!(hit.is_none());
    }

    #[test]
    fn segment_behind_origin_misses() {
        let hit = ray_segment_intersection(Vec2::new(700.0, 300.0), Vec2::X, 200.0, 400.0, 600.0);
        assert!(hit.is_none());
    }

    #[test]
    fn vertical_ray_is_parallel_to_aperture() {
        let hit = ray_segment_intersection(Vec2::new(600.0, 0.0), Vec2::Y, 200.0, 400.0, 600.0);
        assert!(hit.is_none());
    }

    #[test]
    fn flipped_direction_heads_right() {
        let dir = direction_towards_positive_x(Vec2::new(500.0, 220.0), Vec2::new(400.0, 300.0));
        assert!(dir.x > 0.0);
        // Same line: the cross product with the original offset is zero.
        assert!(dir.perp_dot(Vec2::new(-100.0, 80.0)).abs() < 1e-3);
    }

    #[test]
    fn crossing_lines_meet() {
        let p = line_intersection(Vec2::ZERO, Vec2::X, Vec2::new(5.0, -5.0), Vec2::Y);
        assert!(approx(p.unwrap(), Vec2::new(5.0, 0.0)));
    }

    #[test]
    fn parallel_lines_never_meet() {
        assert!(line_intersection(Vec2::ZERO, Vec2::X, Vec2::new(0.0, 3.0), Vec2::X).is_none());
    }
}
