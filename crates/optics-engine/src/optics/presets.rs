//! Ready-made bench setups for quick demonstrations.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::api::session::SimulationSession;
use crate::core::scene::BenchMode;
use crate::optics::element::{Lens, LensVariant, Mirror, MirrorVariant, OpticalElement};

/// The single element a preset installs.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "elementKind", rename_all = "lowercase", rename_all_fields = "camelCase")]
pub enum PresetElement {
    Lens {
        variant: LensVariant,
        focal_length: f32,
        diameter: f32,
        position: Vec2,
        #[serde(default = "crown_glass")]
        refractive_index: f32,
    },
    Mirror {
        variant: MirrorVariant,
        focal_length: f32,
        diameter: f32,
        position: Vec2,
    },
}

fn crown_glass() -> f32 {
    1.5
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PresetObject {
    pub position: Vec2,
    pub height: f32,
}

/// A named scene: one element plus an object placement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Preset {
    pub name: String,
    pub description: String,
    pub element: PresetElement,
    pub object: PresetObject,
}

impl Preset {
    /// Parse a list of presets supplied by the host.
    pub fn list_from_json(json: &str) -> Result<Vec<Preset>, serde_json::Error> {
        serde_json::from_str(json)
    }
}

fn lens_preset(name: &str, description: &str, f: f32, diameter: f32, lens_x: f32, object_x: f32, height: f32) -> Preset {
    Preset {
        name: name.to_string(),
        description: description.to_string(),
        element: PresetElement::Lens {
            variant: LensVariant::Convex,
            focal_length: f,
            diameter,
            position: Vec2::new(lens_x, 300.0),
            refractive_index: crown_glass(),
        },
        object: PresetObject { position: Vec2::new(object_x, 300.0), height },
    }
}

fn mirror_preset(name: &str, description: &str, variant: MirrorVariant, f: f32, object_x: f32, height: f32) -> Preset {
    Preset {
        name: name.to_string(),
        description: description.to_string(),
        element: PresetElement::Mirror {
            variant,
            focal_length: f,
            diameter: 200.0,
            position: Vec2::new(600.0, 300.0),
        },
        object: PresetObject { position: Vec2::new(object_x, 300.0), height },
    }
}

/// The built-in demonstrations.
pub fn builtin_presets() -> Vec<Preset> {
    vec![
        lens_preset("magnifyingGlass", "Virtual, upright, magnified image", 100.0, 180.0, 500.0, 450.0, 60.0),
        lens_preset("camera", "Real, inverted, reduced image, as in a camera", 80.0, 200.0, 600.0, 300.0, 80.0),
        lens_preset("projector", "Real, inverted, magnified image, as in a projector", 100.0, 220.0, 600.0, 450.0, 50.0),
        lens_preset("microscope", "Highly magnified real image from a short focal length objective", 50.0, 160.0, 600.0, 520.0, 30.0),
        mirror_preset("makeupMirror", "Virtual, upright, magnified, as in a makeup mirror", MirrorVariant::Concave, 100.0, 550.0, 70.0),
        mirror_preset("sideMirror", "Virtual, upright, reduced, as in a car side mirror", MirrorVariant::Convex, 100.0, 400.0, 70.0),
    ]
}

pub fn find_preset(name: &str) -> Option<Preset> {
    builtin_presets().into_iter().find(|p| p.name == name)
}

/// Reset the session, then install the preset's element and object.
/// Returns the preset description for the host to display.
pub fn apply_preset<'a>(session: &mut SimulationSession, preset: &'a Preset) -> &'a str {
    session.reset();
    let id = session.next_element_id();
    let (mode, element): (BenchMode, OpticalElement) = match preset.element {
        PresetElement::Lens { variant, focal_length, diameter, position, refractive_index } => {
            let mut lens = match variant {
                LensVariant::Convex => Lens::convex(id, position, focal_length, diameter),
                LensVariant::Concave => Lens::concave(id, position, focal_length, diameter),
            };
            lens.refractive_index = refractive_index;
            (BenchMode::Lens, lens.into())
        }
        PresetElement::Mirror { variant, focal_length, diameter, position } => {
            let mirror = match variant {
                MirrorVariant::Plane => Mirror::plane(id, position, diameter),
                MirrorVariant::Concave => Mirror::concave(id, position, focal_length, diameter),
                MirrorVariant::Convex => Mirror::convex(id, position, focal_length, diameter),
            };
            (BenchMode::Mirror, mirror.into())
        }
    };
    log::info!("preset {}", preset.name);
    session.set_mode(mode);
    session.add_element(element);
    session.set_object_position(preset.object.position);
    session.set_object_height(preset.object.height);
    &preset.description
}

#[cfg(test)]
mod tests {
    use super::*;

    fn applied(name: &str) -> SimulationSession {
        let mut session = SimulationSession::default();
        let preset = find_preset(name).unwrap();
        apply_preset(&mut session, &preset);
        session
    }

    #[test]
    fn magnifying_glass_gives_virtual_magnified_image() {
        let session = applied("magnifyingGlass");
        let image = session.scene().image().unwrap();
        assert!(!image.is_real);
        assert!(!image.is_inverted);
        assert!(image.magnification > 1.0);
    }

    #[test]
    fn camera_gives_reduced_real_image() {
        let session = applied("camera");
        let image = session.scene().image().unwrap();
        assert!(image.is_real && image.is_inverted);
        assert!(image.magnification < 1.0);
        assert_eq!(session.scene().mode, BenchMode::Lens);
        assert_eq!(session.elements().len(), 1);
    }

    #[test]
    fn side_mirror_gives_reduced_virtual_image() {
        let session = applied("sideMirror");
        let image = session.scene().image().unwrap();
        assert!(!image.is_real && !image.is_inverted);
        assert!(image.magnification < 1.0);
        assert_eq!(session.object().height, 70.0);
    }

    #[test]
    fn makeup_mirror_magnifies() {
        let session = applied("makeupMirror");
        let image = session.scene().image().unwrap();
        assert!(!image.is_real && image.magnification > 1.0);
    }

    #[test]
    fn presets_parse_from_json() {
        let json = r#"[{
            "name": "weak",
            "description": "weak lens",
            "element": {"elementKind": "lens", "variant": "convex", "focalLength": 200, "diameter": 150, "position": [600, 300]},
            "object": {"position": [200, 300], "height": 40}
        }]"#;
        let presets = Preset::list_from_json(json).unwrap();
        assert_eq!(presets.len(), 1);
        match presets[0].element {
            PresetElement::Lens { refractive_index, focal_length, .. } => {
                assert_eq!(refractive_index, 1.5);
                assert_eq!(focal_length, 200.0);
            }
            PresetElement::Mirror { .. } => panic!("expected a lens"),
        }
        assert!(Preset::list_from_json("{").is_err());
    }
}
