//! The optics exercise sequence.

use crate::core::scene::{BenchMode, SceneState};
use crate::optics::element::{LensVariant, MirrorVariant, OpticalElement};
use crate::tasks::engine::{GuideLines, Task};

/// Object movement (px) that counts as "the student moved it".
const MOVE_THRESHOLD: f32 = 5.0;
/// Allowed mismatch between object and image distance for a plane mirror.
const PLANE_MIRROR_TOLERANCE: f32 = 20.0;
/// Refractive index of the default crown glass.
const STANDARD_GLASS_INDEX: f32 = 1.5;
/// Incidence angle (degrees) treated as beyond the critical angle.
const CRITICAL_ANGLE_DEG: f32 = 45.0;

/// The eight exercises, in unlock order.
pub fn default_tasks() -> Vec<Task> {
    vec![
        Task {
            id: "task-1",
            title: "Laws of Reflection",
            description: "Move the object and see the angle of reflection match the angle of incidence",
            instructions: &[
                "Switch to Mirror mode",
                "Add a plane mirror",
                "Move the object up and down to change the angle of incidence",
                "Watch the reflected ray: its angle always equals the incident one",
            ],
            hint: "Move the object vertically and follow the reflected ray",
            guide: GuideLines {
                instruction: "Let's start with reflection. Switch to Mirror mode, add a plane mirror and drag the object up and down.",
                completion: "The reflected angle followed the incident angle every time. That is the law of reflection.",
                hint: "Try several heights and compare the two angles",
            },
            validate: laws_of_reflection,
            setup: |scene| enter_mode(scene, BenchMode::Mirror),
        },
        Task {
            id: "task-2",
            title: "Image in a Plane Mirror",
            description: "Move the object and check that image distance equals object distance",
            instructions: &[
                "Keep a plane mirror on the bench",
                "Move the object towards and away from the mirror",
                "The image stays as far behind the mirror as the object is in front",
                "The image stays virtual and upright",
            ],
            hint: "Drag the object horizontally and watch the image follow",
            guide: GuideLines {
                instruction: "Now move the object closer to the mirror and farther away from it.",
                completion: "Image distance matched object distance. Plane mirrors always do that.",
                hint: "Drag the object sideways",
            },
            validate: plane_mirror_image,
            setup: |scene| enter_mode(scene, BenchMode::Mirror),
        },
        Task {
            id: "task-3",
            title: "Concave vs Convex Mirror",
            description: "Compare the images formed by concave and convex mirrors",
            instructions: &[
                "Add a concave mirror and move the object around",
                "A concave mirror can form real or virtual images",
                "Remove it and add a convex mirror",
                "A convex mirror always forms a virtual, upright, smaller image",
            ],
            hint: "Try both curved mirrors and compare their images",
            guide: GuideLines {
                instruction: "Swap in a curved mirror. Try a concave one, then a convex one.",
                completion: "The convex mirror kept the image small, upright and virtual.",
                hint: "Place the object at different distances from the mirror",
            },
            validate: convex_mirror_image,
            setup: |scene| enter_mode(scene, BenchMode::Mirror),
        },
        Task {
            id: "task-4",
            title: "Refraction of Light",
            description: "Change the angle of incidence for light entering glass",
            instructions: &[
                "Switch to Lens mode",
                "Add a convex lens",
                "Adjust the angle of incidence",
                "Light bends towards the normal entering a denser medium",
            ],
            hint: "Use the angle control and watch the rays bend at the lens",
            guide: GuideLines {
                instruction: "On to lenses. Switch to Lens mode, pick a convex lens and change the angle of incidence.",
                completion: "That bending is refraction: light slows down inside the glass.",
                hint: "Rays bend towards the normal as they enter the lens",
            },
            validate: refraction,
            setup: |scene| {
                enter_mode(scene, BenchMode::Lens);
                scene.angle_of_incidence = 0.0;
            },
        },
        Task {
            id: "task-5",
            title: "Effect of Refractive Index",
            description: "Change the refractive index and compare how much light bends",
            instructions: &[
                "Add a convex lens if there is none",
                "Move the refractive index away from 1.5",
                "A higher index bends light more",
            ],
            hint: "Change the refractive index of the lens",
            guide: GuideLines {
                instruction: "Change what the lens is made of with the refractive index control.",
                completion: "A denser material bends light more strongly.",
                hint: "Compare water (1.33), glass (1.5) and diamond (2.4)",
            },
            validate: refractive_index_changed,
            setup: |scene| enter_mode(scene, BenchMode::Lens),
        },
        Task {
            id: "task-6",
            title: "Total Internal Reflection",
            description: "Increase the angle of incidence past the critical angle",
            instructions: &[
                "Keep a lens on the bench",
                "Raise the angle of incidence above 45°",
                "Beyond the critical angle light reflects instead of refracting",
            ],
            hint: "Push the angle of incidence above 45°",
            guide: GuideLines {
                instruction: "Keep increasing the angle of incidence until the light can no longer escape.",
                completion: "Total internal reflection: the light stays trapped, just like in an optical fibre.",
                hint: "Raise the angle slowly",
            },
            validate: total_internal_reflection,
            setup: |scene| {
                enter_mode(scene, BenchMode::Lens);
                scene.angle_of_incidence = 0.0;
            },
        },
        Task {
            id: "task-7",
            title: "Image Formation by Lenses",
            description: "Compare images formed by convex and concave lenses",
            instructions: &[
                "Try a convex lens with the object at different distances",
                "Beyond F the image is real and inverted, inside F virtual and upright",
                "Then try a concave lens: its image is always virtual, upright and smaller",
            ],
            hint: "Try both lens types at several object positions",
            guide: GuideLines {
                instruction: "Now try a concave lens. Can it ever form a real image?",
                completion: "Right: a concave lens only gives small, upright, virtual images.",
                hint: "Compare with what the convex lens produced",
            },
            validate: concave_lens_image,
            setup: |scene| enter_mode(scene, BenchMode::Lens),
        },
        Task {
            id: "task-8",
            title: "Magnification",
            description: "Change the object distance and watch the image size change",
            instructions: &[
                "Add a convex lens",
                "Beyond 2F the image is smaller than the object",
                "Between F and 2F the image is magnified",
            ],
            hint: "Place the object between F and 2F",
            guide: GuideLines {
                instruction: "Last one: make the image bigger than the object with a convex lens.",
                completion: "You built a projector. Optics training complete!",
                hint: "Keep the object between one and two focal lengths from the lens",
            },
            validate: magnified_real_image,
            setup: |scene| enter_mode(scene, BenchMode::Lens),
        },
    ]
}

/// Extra exercise for advanced students: Newton's form of the lens equation.
pub fn newton_formula_task() -> Task {
    Task {
        id: "advanced-1",
        title: "Newton's Formula",
        description: "Verify f² = x·x' with a convex lens",
        instructions: &[
            "Add a convex lens",
            "x is the distance from the object to the near focal point",
            "x' is the distance from the far focal point to the image",
            "Check that f² = x·x'",
        ],
        hint: "x and x' are measured from the focal points, not from the lens",
        guide: GuideLines {
            instruction: "Measure from the focal points this time and compare f² with x·x'.",
            completion: "Newton's formula holds.",
            hint: "Both distances start at a focal point",
        },
        validate: newton_formula,
        setup: |scene| enter_mode(scene, BenchMode::Lens),
    }
}

/// Switch bench mode; switching clears the bench.
fn enter_mode(scene: &mut SceneState, mode: BenchMode) {
    if scene.mode != mode {
        scene.mode = mode;
        scene.clear_elements();
    }
}

fn active_mirror(scene: &SceneState, variant: MirrorVariant) -> Option<&OpticalElement> {
    scene
        .active_element()
        .filter(|e| e.as_mirror().is_some_and(|m| m.variant == variant))
}

fn active_lens(scene: &SceneState, variant: LensVariant) -> Option<&OpticalElement> {
    scene
        .active_element()
        .filter(|e| e.as_lens().is_some_and(|l| l.variant == variant))
}

fn laws_of_reflection(scene: &SceneState) -> bool {
    if scene.mode != BenchMode::Mirror || active_mirror(scene, MirrorVariant::Plane).is_none() {
        return false;
    }
    let moved = scene.object_displacement().y.abs() > MOVE_THRESHOLD
        || (scene.object.height - scene.task_anchor.height).abs() > MOVE_THRESHOLD;
    scene.display.show_rays && !scene.rays().is_empty() && moved
}

fn plane_mirror_image(scene: &SceneState) -> bool {
    let (Some(mirror), Some(image)) = (active_mirror(scene, MirrorVariant::Plane), scene.image()) else {
        return false;
    };
    if scene.mode != BenchMode::Mirror {
        return false;
    }
    let object_distance = (mirror.position().x - scene.object.position.x).abs();
    let image_distance = (image.position.x - mirror.position().x).abs();
    (object_distance - image_distance).abs() < PLANE_MIRROR_TOLERANCE
        && !image.is_real
        && scene.object_displacement().x.abs() > MOVE_THRESHOLD
}

fn convex_mirror_image(scene: &SceneState) -> bool {
    let (Some(_), Some(image)) = (active_mirror(scene, MirrorVariant::Convex), scene.image()) else {
        return false;
    };
    scene.mode == BenchMode::Mirror && !image.is_real && !image.is_inverted && image.magnification < 1.0
}

fn refraction(scene: &SceneState) -> bool {
    scene.mode == BenchMode::Lens
        && scene.has_lens()
        && !scene.rays().is_empty()
        && scene.angle_of_incidence > 0.0
}

fn refractive_index_changed(scene: &SceneState) -> bool {
    let Some(lens) = scene.find_element(|e| e.as_lens().is_some()).and_then(|e| e.as_lens()) else {
        return false;
    };
    scene.mode == BenchMode::Lens
        && (lens.refractive_index - STANDARD_GLASS_INDEX).abs() > 1e-3
        && !scene.rays().is_empty()
}

fn total_internal_reflection(scene: &SceneState) -> bool {
    scene.has_lens() && scene.angle_of_incidence > CRITICAL_ANGLE_DEG && !scene.rays().is_empty()
}

fn concave_lens_image(scene: &SceneState) -> bool {
    let (Some(_), Some(image)) = (active_lens(scene, LensVariant::Concave), scene.image()) else {
        return false;
    };
    scene.mode == BenchMode::Lens && !image.is_real && !image.is_inverted && image.magnification < 1.0
}

fn magnified_real_image(scene: &SceneState) -> bool {
    let (Some(lens), Some(image)) = (active_lens(scene, LensVariant::Convex), scene.image()) else {
        return false;
    };
    if scene.mode != BenchMode::Lens {
        return false;
    }
    let u = (lens.position().x - scene.object.position.x).abs();
    let f = lens.focal_length().abs();
    u > f && u < 2.0 * f && image.magnification > 1.0
}

fn newton_formula(scene: &SceneState) -> bool {
    let (Some(lens), Some(image)) = (active_lens(scene, LensVariant::Convex), scene.image()) else {
        return false;
    };
    let f = lens.focal_length().abs();
    let object_distance = (lens.position().x - scene.object.position.x).abs();
    let image_distance = (image.position.x - lens.position().x).abs();
    let f_squared = f * f;
    let product = (object_distance - f) * (image_distance - f);
    f_squared > 0.0 && (f_squared - product).abs() / f_squared < 0.05
}
