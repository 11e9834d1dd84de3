use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::api::types::{ElementId, TaskId};
use crate::optics::element::{ElementKind, OpticalElement};
use crate::optics::image::{calculate_image, ImageData};
use crate::optics::object::OpticalObject;
use crate::optics::ray::{trace_principal_rays, RayPath};

/// Which family of elements the bench is set up for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BenchMode {
    #[default]
    Lens,
    Mirror,
}

/// Presentation toggles. None of them affect the optics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DisplayFlag {
    Rays,
    FocalPoints,
    VirtualImage,
    Labels,
    Normal,
    RayExtensions,
    Measurements,
    Formula,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DisplayFlags {
    pub show_rays: bool,
    pub show_focal_points: bool,
    pub show_virtual_image: bool,
    pub show_labels: bool,
    pub show_normal: bool,
    pub show_ray_extensions: bool,
    pub show_measurements: bool,
    pub show_formula: bool,
}

impl DisplayFlags {
    pub fn get(&self, flag: DisplayFlag) -> bool {
        match flag {
            DisplayFlag::Rays => self.show_rays,
            DisplayFlag::FocalPoints => self.show_focal_points,
            DisplayFlag::VirtualImage => self.show_virtual_image,
            DisplayFlag::Labels => self.show_labels,
            DisplayFlag::Normal => self.show_normal,
            DisplayFlag::RayExtensions => self.show_ray_extensions,
            DisplayFlag::Measurements => self.show_measurements,
            DisplayFlag::Formula => self.show_formula,
        }
    }

    /// Flip one flag and return its new value.
    pub fn toggle(&mut self, flag: DisplayFlag) -> bool {
        let slot = match flag {
            DisplayFlag::Rays => &mut self.show_rays,
            DisplayFlag::FocalPoints => &mut self.show_focal_points,
            DisplayFlag::VirtualImage => &mut self.show_virtual_image,
            DisplayFlag::Labels => &mut self.show_labels,
            DisplayFlag::Normal => &mut self.show_normal,
            DisplayFlag::RayExtensions => &mut self.show_ray_extensions,
            DisplayFlag::Measurements => &mut self.show_measurements,
            DisplayFlag::Formula => &mut self.show_formula,
        };
        *slot = !*slot;
        *slot
    }
}

impl Default for DisplayFlags {
    fn default() -> Self {
        Self {
            show_rays: true,
            show_focal_points: true,
            show_virtual_image: true,
            show_labels: true,
            show_normal: true,
            show_ray_extensions: true,
            show_measurements: true,
            show_formula: false,
        }
    }
}

/// Exercise progress. `completed_tasks` is ordered and only grows until a reset.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskProgress {
    pub active_task_id: Option<TaskId>,
    pub completed_tasks: Vec<TaskId>,
}

impl TaskProgress {
    pub fn is_completed(&self, id: TaskId) -> bool {
        self.completed_tasks.contains(&id)
    }
}

/// The authoritative bench state read by renderers and task checks.
///
/// Rays and image are derived: `recompute` replaces them wholesale from the
/// object and the first element. Elements keep insertion order because only
/// `elements[0]` takes part in image formation.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SceneState {
    pub object: OpticalObject,
    elements: Vec<OpticalElement>,
    rays: Vec<RayPath>,
    image: Option<ImageData>,
    pub display: DisplayFlags,
    pub mode: BenchMode,
    /// Angle of incidence slider, in degrees.
    pub angle_of_incidence: f32,
    pub progress: TaskProgress,
    /// Object as it was when the active task was set up.
    pub task_anchor: OpticalObject,
}

impl SceneState {
    pub fn new(object: OpticalObject) -> Self {
        Self {
            object,
            elements: Vec::with_capacity(4),
            rays: Vec::new(),
            image: None,
            display: DisplayFlags::default(),
            mode: BenchMode::default(),
            angle_of_incidence: 0.0,
            progress: TaskProgress::default(),
            task_anchor: object,
        }
    }

    /// Rebuild rays and image from the object and the active element.
    pub fn recompute(&mut self) {
        match self.elements.first() {
            Some(element) => {
                self.rays = trace_principal_rays(&self.object, element);
                self.image = calculate_image(&self.object, element);
            }
            None => {
                self.rays.clear();
                self.image = None;
            }
        }
    }

    /// The element that takes part in ray tracing and image formation.
    pub fn active_element(&self) -> Option<&OpticalElement> {
        self.elements.first()
    }

    pub fn elements(&self) -> &[OpticalElement] {
        &self.elements
    }

    pub fn rays(&self) -> &[RayPath] {
        &self.rays
    }

    pub fn image(&self) -> Option<&ImageData> {
        self.image.as_ref()
    }

    /// Add an element at the end of the list.
    pub fn push_element(&mut self, element: OpticalElement) {
        self.elements.push(element);
    }

    /// Remove an element by ID, keeping the order of the rest.
    pub fn remove_element(&mut self, id: ElementId) -> Option<OpticalElement> {
        let idx = self.elements.iter().position(|e| e.id() == id)?;
        Some(self.elements.remove(idx))
    }

    pub fn clear_elements(&mut self) {
        self.elements.clear();
    }

    pub fn element(&self, id: ElementId) -> Option<&OpticalElement> {
        self.elements.iter().find(|e| e.id() == id)
    }

    pub fn element_mut(&mut self, id: ElementId) -> Option<&mut OpticalElement> {
        self.elements.iter_mut().find(|e| e.id() == id)
    }

    /// First element matching a predicate, in bench order.
    pub fn find_element(&self, pred: impl Fn(&OpticalElement) -> bool) -> Option<&OpticalElement> {
        self.elements.iter().find(|e| pred(e))
    }

    pub fn has_lens(&self) -> bool {
        self.elements.iter().any(|e| e.kind() == ElementKind::Lens)
    }

    /// Horizontal distance from the object to the active element.
    pub fn object_distance(&self) -> Option<f32> {
        self.active_element()
            .map(|e| (e.position().x - self.object.position.x).abs())
    }

    /// How far the object has moved since the active task was set up.
    pub fn object_displacement(&self) -> Vec2 {
        self.object.position - self.task_anchor.position
    }
}
