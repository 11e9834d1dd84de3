pub mod api;
pub mod core;
pub mod optics;
pub mod tasks;
pub mod input;
pub mod extensions;
pub mod assistant;

// Re-export key types at crate root for convenience
pub use api::config::{BenchConfig, ElementDefaults};
pub use api::session::SimulationSession;
pub use api::types::{ElementId, PackedEvent, SessionEvent, TaskId};
pub use core::frame::{FrameCallbackId, FrameLoop};
pub use core::geometry::{line_intersection, ray_segment_intersection, reflect};
pub use core::scene::{BenchMode, DisplayFlag, DisplayFlags, SceneState, TaskProgress};
pub use optics::element::{
    focal_length_from_radius, ElementKind, ElementUpdate, Lens, LensVariant, Mirror, MirrorVariant,
    OpticalElement,
};
pub use optics::image::{calculate_image, ImageData};
pub use optics::measure::{measure, Measurements};
pub use optics::object::{ObjectKind, OpticalObject};
pub use optics::presets::{apply_preset, builtin_presets, find_preset, Preset};
pub use optics::recorder::{MeasurementRecorder, Sample};
pub use optics::ray::{find_ray_intersection, trace_principal_rays, Ray, RayKind, RayPath};
pub use tasks::catalog::{default_tasks, newton_formula_task};
pub use tasks::engine::{GuideLines, Task, TaskEngine, TaskSnapshot, TaskStatus};
pub use input::drag::{DragTarget, InteractionHandler, InteractionMode, PointerEvent};
pub use assistant::{state_signature, ExplainRequest};

// Extensions: opt-in animation helpers
pub use extensions::{ease, lerp, Easing, ObjectSweep};
