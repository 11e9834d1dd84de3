use glam::Vec2;

use crate::api::config::BenchConfig;
use crate::api::types::{ElementId, PackedEvent, SessionEvent, TaskId};
use crate::core::scene::{BenchMode, DisplayFlag, SceneState};
use crate::optics::element::{ElementUpdate, Lens, LensVariant, Mirror, MirrorVariant, OpticalElement};
use crate::optics::object::{ObjectKind, OpticalObject};
use crate::tasks::catalog::default_tasks;
use crate::tasks::engine::{Task, TaskEngine, TaskSnapshot};

/// One learning session: the scene, its exercises and pending notifications.
///
/// Every setter recomputes rays and image, evaluates the active task and,
/// if no task is active afterwards, activates the next one before returning.
pub struct SimulationSession {
    config: BenchConfig,
    scene: SceneState,
    tasks: TaskEngine,
    events: Vec<SessionEvent>,
    next_id: u32,
}

impl SimulationSession {
    pub fn new(config: BenchConfig) -> Self {
        Self::with_tasks(config, default_tasks())
    }

    /// Build a session around a custom exercise list.
    pub fn with_tasks(config: BenchConfig, tasks: Vec<Task>) -> Self {
        let mut session = Self {
            config,
            scene: SceneState::new(initial_object(&config)),
            tasks: TaskEngine::new(tasks),
            events: Vec::new(),
            next_id: 1,
        };
        session.tasks.advance(&mut session.scene, &mut session.events);
        session.scene.recompute();
        session
    }

    pub fn config(&self) -> &BenchConfig {
        &self.config
    }

    pub fn scene(&self) -> &SceneState {
        &self.scene
    }

    pub fn object(&self) -> &OpticalObject {
        &self.scene.object
    }

    pub fn elements(&self) -> &[OpticalElement] {
        self.scene.elements()
    }

    pub fn task_engine(&self) -> &TaskEngine {
        &self.tasks
    }

    // -- Object --

    pub fn set_object_position(&mut self, position: Vec2) {
        log::debug!("object -> ({:.1}, {:.1})", position.x, position.y);
        self.scene.object.position = position;
        self.refresh();
    }

    pub fn set_object_height(&mut self, height: f32) {
        log::debug!("object height -> {height:.1}");
        self.scene.object.height = height.max(0.0);
        self.refresh();
    }

    pub fn set_object_kind(&mut self, kind: ObjectKind) {
        self.scene.object.kind = kind;
        self.refresh();
    }

    // -- Elements --

    /// Reserve the next element ID.
    pub fn next_element_id(&mut self) -> ElementId {
        let id = ElementId(self.next_id);
        self.next_id = self.next_id.saturating_add(1);
        id
    }

    /// Put an element on the bench. Refused if its ID is already in use or
    /// is `u32::MAX`, which is never handed out.
    pub fn add_element(&mut self, element: OpticalElement) -> Option<ElementId> {
        let id = element.id();
        if id.0 == u32::MAX {
            log::warn!("add_element: id {} is out of range", id.0);
            return None;
        }
        if self.scene.element(id).is_some() {
            log::warn!("add_element: id {} already on the bench", id.0);
            return None;
        }
        self.next_id = self.next_id.max(id.0 + 1);
        log::debug!("add {} #{}", element.label(), id.0);
        self.scene.push_element(element);
        self.refresh();
        Some(id)
    }

    /// Add a lens with the configured defaults at the default bench position.
    pub fn add_lens(&mut self, variant: LensVariant) -> ElementId {
        let id = self.next_element_id();
        let lens = Lens::new(id, variant, self.default_element_position(), &self.config.element);
        self.scene.push_element(lens.into());
        log::debug!("add lens #{}", id.0);
        self.refresh();
        id
    }

    /// Add a mirror with the configured defaults at the default bench position.
    pub fn add_mirror(&mut self, variant: MirrorVariant) -> ElementId {
        let id = self.next_element_id();
        let mirror = Mirror::new(id, variant, self.default_element_position(), &self.config.element);
        self.scene.push_element(mirror.into());
        log::debug!("add mirror #{}", id.0);
        self.refresh();
        id
    }

    pub fn remove_element(&mut self, id: ElementId) -> bool {
        if self.scene.remove_element(id).is_none() {
            log::warn!("remove_element: unknown id {}", id.0);
            return false;
        }
        log::debug!("remove #{}", id.0);
        self.refresh();
        true
    }

    pub fn update_element(&mut self, id: ElementId, update: &ElementUpdate) -> bool {
        let Some(element) = self.scene.element_mut(id) else {
            log::warn!("update_element: unknown id {}", id.0);
            return false;
        };
        element.apply(update);
        self.refresh();
        true
    }

    // -- Bench settings --

    /// Flip a display toggle and return its new value.
    pub fn toggle_display(&mut self, flag: DisplayFlag) -> bool {
        let value = self.scene.display.toggle(flag);
        log::debug!("{flag:?} -> {value}");
        self.refresh();
        value
    }

    /// Switch between lens and mirror bench. Switching clears the elements.
    pub fn set_mode(&mut self, mode: BenchMode) {
        if self.scene.mode == mode {
            return;
        }
        log::debug!("mode -> {mode:?}");
        self.scene.mode = mode;
        self.scene.clear_elements();
        self.refresh();
    }

    /// Angle of incidence in degrees, clamped to [0, 90].
    pub fn set_angle_of_incidence(&mut self, degrees: f32) {
        self.scene.angle_of_incidence = degrees.clamp(0.0, 90.0);
        self.refresh();
    }

    // -- Tasks --

    pub fn get_tasks(&self) -> Vec<TaskSnapshot> {
        self.tasks.snapshots(&self.scene.progress)
    }

    pub fn get_active_task(&self) -> Option<&Task> {
        self.tasks.active_task(&self.scene.progress)
    }

    /// Switch the active exercise. Locked, completed and unknown tasks are refused
    /// and the current task stays active.
    pub fn set_active_task(&mut self, id: &str) -> bool {
        let previous = self.scene.progress.active_task_id;
        if previous == Some(id) {
            return true;
        }
        self.scene.progress.active_task_id = None;
        if !self.tasks.activate(id, &mut self.scene, &mut self.events) {
            self.scene.progress.active_task_id = previous;
            return false;
        }
        self.scene.recompute();
        true
    }

    /// Mark a task completed as if its check had passed.
    pub fn complete_task(&mut self, id: &str) -> bool {
        self.finish_task(id, false)
    }

    /// Mark a task completed without satisfying its check.
    pub fn skip_task(&mut self, id: &str) -> bool {
        self.finish_task(id, true)
    }

    fn finish_task(&mut self, id: &str, skipped: bool) -> bool {
        if !self.tasks.complete(id, skipped, &mut self.scene, &mut self.events) {
            return false;
        }
        self.tasks.advance(&mut self.scene, &mut self.events);
        self.scene.recompute();
        true
    }

    /// Restore the initial object, an empty bench and no task progress,
    /// then activate the first task again.
    pub fn reset(&mut self) {
        log::info!("session reset");
        self.scene = SceneState::new(initial_object(&self.config));
        self.next_id = 1;
        self.events.push(SessionEvent::SceneReset);
        self.tasks.advance(&mut self.scene, &mut self.events);
        self.scene.recompute();
    }

    // -- Events --

    /// Pending notifications, oldest first.
    pub fn events(&self) -> &[SessionEvent] {
        &self.events
    }

    pub fn drain_events(&mut self) -> Vec<SessionEvent> {
        std::mem::take(&mut self.events)
    }

    /// Pending notifications flattened for a float buffer.
    pub fn packed_events(&self) -> Vec<PackedEvent> {
        self.events.iter().map(|e| self.pack(e)).collect()
    }

    fn pack(&self, event: &SessionEvent) -> PackedEvent {
        let index = |id: TaskId| self.tasks.index_of(id).map_or(-1.0, |i| i as f32);
        let (a, b) = match *event {
            SessionEvent::TaskActivated { id } | SessionEvent::TaskUnlocked { id } => (index(id), 0.0),
            SessionEvent::TaskCompleted { id, skipped } => (index(id), if skipped { 1.0 } else { 0.0 }),
            SessionEvent::SceneReset => (-1.0, 0.0),
        };
        PackedEvent { kind: event.kind() as f32, a, b, c: 0.0 }
    }

    // -- Internals --

    fn default_element_position(&self) -> Vec2 {
        Vec2::new(self.config.element.x, self.config.axis_y())
    }

    /// Recompute derived state, check the active task, move on if it completed.
    fn refresh(&mut self) {
        self.scene.recompute();
        self.tasks.evaluate(&mut self.scene, &mut self.events);
        if self.tasks.advance(&mut self.scene, &mut self.events).is_some() {
            self.scene.recompute();
        }
    }
}

impl Default for SimulationSession {
    fn default() -> Self {
        Self::new(BenchConfig::default())
    }
}

/// The arrow a fresh bench starts with: a sixth of the way along the axis.
fn initial_object(config: &BenchConfig) -> OpticalObject {
    OpticalObject {
        position: Vec2::new(config.world_width / 6.0, config.axis_y()),
        ..OpticalObject::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::optics::ray::find_ray_intersection;
    use crate::tasks::engine::{GuideLines, TaskStatus};

    fn session() -> SimulationSession {
        SimulationSession::default()
    }

    fn completed(session: &SimulationSession) -> Vec<TaskId> {
        session.scene().progress.completed_tasks.clone()
    }

    #[test]
    fn first_task_is_active_on_start() {
        let s = session();
        assert_eq!(s.get_active_task().map(|t| t.id), Some("task-1"));
        assert_eq!(s.events(), &[SessionEvent::TaskActivated { id: "task-1" }]);
        let tasks = s.get_tasks();
        assert_eq!(tasks[0].status, TaskStatus::Active);
        assert!(tasks[1..].iter().all(|t| t.locked));
    }

    #[test]
    fn removing_only_element_clears_rays_and_image() {
        let mut s = session();
        let id = s.add_mirror(MirrorVariant::Concave);
        assert!(!s.scene().rays().is_empty());
        assert!(s.scene().image().is_some());
        assert!(s.remove_element(id));
        assert!(s.scene().rays().is_empty());
        assert!(s.scene().image().is_none());
        assert!(!s.remove_element(id));
    }

    #[test]
    fn element_ids_are_unique() {
        let mut s = session();
        let a = s.add_mirror(MirrorVariant::Plane);
        let b = s.add_mirror(MirrorVariant::Convex);
        assert_ne!(a, b);
        let dup = Mirror::plane(a, Vec2::new(900.0, 300.0), 100.0);
        assert_eq!(s.add_element(dup.into()), None);
        let explicit = Mirror::plane(ElementId(10), Vec2::new(900.0, 300.0), 100.0);
        assert_eq!(s.add_element(explicit.into()), Some(ElementId(10)));
        assert_eq!(s.next_element_id(), ElementId(11));
    }

    #[test]
    fn largest_element_id_is_refused() {
        let mut s = session();
        let max = Mirror::plane(ElementId(u32::MAX), Vec2::new(900.0, 300.0), 100.0);
        assert_eq!(s.add_element(max.into()), None);
        assert!(s.elements().is_empty());
        let last = Mirror::plane(ElementId(u32::MAX - 1), Vec2::new(900.0, 300.0), 100.0);
        assert_eq!(s.add_element(last.into()), Some(ElementId(u32::MAX - 1)));
        assert_eq!(s.next_element_id(), ElementId(u32::MAX));
    }

    #[test]
    fn mirror_focal_length_update_keeps_rays_on_image() {
        let mut s = session();
        s.set_object_height(20.0);
        let id = s.add_mirror(MirrorVariant::Concave);
        let update = ElementUpdate { focal_length: Some(150.0), ..ElementUpdate::default() };
        assert!(s.update_element(id, &update));

        let rays = s.scene().rays();
        let parallel = rays[0].emergent.unwrap();
        let t = (300.0 - parallel.origin.y) / parallel.direction.y;
        let crossing = parallel.point_at(t).x;
        assert!((crossing - 450.0).abs() < 2.0, "parallel ray crosses the axis at {crossing}");

        let meet = find_ray_intersection(&parallel, &rays[1].emergent.unwrap()).unwrap();
        let tip = s.scene().image().unwrap().tip();
        assert!((meet - tip).length() < 1.5, "meet={meet:?} tip={tip:?}");
    }

    #[test]
    fn update_element_moves_it() {
        let mut s = session();
        let id = s.add_mirror(MirrorVariant::Concave);
        assert!(s.update_element(id, &ElementUpdate::position(Vec2::new(700.0, 300.0))));
        assert_eq!(s.scene().element(id).map(|e| e.position().x), Some(700.0));
        assert!(!s.update_element(ElementId(99), &ElementUpdate::default()));
    }

    #[test]
    fn mode_switch_clears_bench() {
        let mut s = session();
        s.add_mirror(MirrorVariant::Plane);
        s.set_mode(BenchMode::Lens);
        assert!(s.elements().is_empty());
        assert!(s.scene().image().is_none());
    }

    #[test]
    fn moving_object_completes_reflection_task_and_activates_next() {
        let mut s = session();
        s.add_mirror(MirrorVariant::Plane);
        s.drain_events();
        let pos = s.object().position;
        s.set_object_position(pos - Vec2::new(0.0, 30.0));
        assert_eq!(completed(&s), vec!["task-1"]);
        assert_eq!(s.get_active_task().map(|t| t.id), Some("task-2"));
        assert_eq!(
            s.drain_events(),
            vec![
                SessionEvent::TaskCompleted { id: "task-1", skipped: false },
                SessionEvent::TaskUnlocked { id: "task-2" },
                SessionEvent::TaskActivated { id: "task-2" },
            ]
        );
        // The anchor moved with the new task, so task-2 is not satisfied yet.
        assert_eq!(completed(&s).len(), 1);
    }

    #[test]
    fn skip_completes_regardless_of_check() {
        let mut s = session();
        assert!(s.skip_task("task-1"));
        assert!(s.scene().progress.is_completed("task-1"));
        assert_eq!(s.get_active_task().map(|t| t.id), Some("task-2"));
        assert!(!s.skip_task("task-1"));
        assert!(!s.skip_task("nope"));
    }

    #[test]
    fn task_skipped_ahead_of_predecessor_stays_locked() {
        let mut s = session();
        assert!(s.skip_task("task-3"));
        let tasks = s.get_tasks();
        assert!(!tasks[1].completed && tasks[1].locked);
        assert!(tasks[2].completed && tasks[2].locked);
        assert_eq!(s.get_active_task().map(|t| t.id), Some("task-1"));
    }

    #[test]
    fn locked_task_cannot_be_activated() {
        let mut s = session();
        assert!(!s.set_active_task("task-3"));
        assert_eq!(s.get_active_task().map(|t| t.id), Some("task-1"));
        s.skip_task("task-1");
        s.skip_task("task-2");
        assert!(s.set_active_task("task-3"));
    }

    #[test]
    fn reset_restores_initial_state() {
        let mut s = session();
        s.add_mirror(MirrorVariant::Plane);
        s.skip_task("task-1");
        s.toggle_display(DisplayFlag::Labels);
        s.reset();
        assert!(s.elements().is_empty());
        assert!(completed(&s).is_empty());
        assert!(s.scene().display.show_labels);
        assert_eq!(s.get_active_task().map(|t| t.id), Some("task-1"));
        assert!(s.events().contains(&SessionEvent::SceneReset));
    }

    #[test]
    fn packed_events_carry_task_index() {
        let mut s = session();
        s.drain_events();
        s.skip_task("task-1");
        let packed = s.packed_events();
        assert_eq!(packed[0], PackedEvent { kind: 2.0, a: 0.0, b: 1.0, c: 0.0 });
        assert_eq!(packed[1], PackedEvent { kind: 3.0, a: 1.0, b: 0.0, c: 0.0 });
    }

    #[test]
    fn custom_task_list() {
        fn has_element(scene: &SceneState) -> bool {
            !scene.elements().is_empty()
        }
        let task = Task {
            id: "only",
            title: "Only",
            description: "",
            instructions: &[],
            hint: "",
            guide: GuideLines { instruction: "", completion: "", hint: "" },
            validate: has_element,
            setup: |_| {},
        };
        let mut s = SimulationSession::with_tasks(BenchConfig::default(), vec![task]);
        s.add_lens(LensVariant::Convex);
        assert_eq!(completed(&s), vec!["only"]);
        assert!(s.get_active_task().is_none());
    }

    #[test]
    fn angle_is_clamped() {
        let mut s = session();
        s.set_angle_of_incidence(120.0);
        assert_eq!(s.scene().angle_of_incidence, 90.0);
    }
}
