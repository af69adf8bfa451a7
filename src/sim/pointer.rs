//! Pointer picking and dragging
//!
//! Mouse, pen and touch are one pointer; only the pick tolerance differs.
//! A press picks at most one entity, moves stream into it, release lets go.

use glam::Vec2;

use super::state::{LightScene, PendulumScene, StickUpdate};
use crate::consts::*;

/// Input device behind a pointer event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PointerKind {
    #[default]
    Mouse,
    Pen,
    Touch,
}

impl PointerKind {
    /// From the DOM `pointerType` string
    pub fn from_dom(pointer_type: &str) -> Self {
        match pointer_type {
            "touch" => PointerKind::Touch,
            "pen" => PointerKind::Pen,
            _ => PointerKind::Mouse,
        }
    }

    /// Extra pick tolerance in pixels
    pub fn margin(self) -> f32 {
        match self {
            PointerKind::Touch => TOUCH_PICK_MARGIN,
            PointerKind::Mouse | PointerKind::Pen => MOUSE_PICK_MARGIN,
        }
    }
}

/// Entity currently held by the pointer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragTarget {
    Light(usize),
    Stick,
    Pendulum(usize),
}

/// First light (in list order), else the stick, under the pointer
pub fn pick_light_scene(scene: &LightScene, at: Vec2, kind: PointerKind) -> Option<DragTarget> {
    let margin = kind.margin();
    if let Some(i) = scene
        .lights
        .iter()
        .position(|l| at.distance(l.pos) < l.visual_radius() + margin)
    {
        return Some(DragTarget::Light(i));
    }

    let (min, max) = scene.stick.bounds(scene.ground_y);
    let (min, max) = (min - Vec2::splat(margin), max + Vec2::splat(margin));
    (at.cmpge(min).all() && at.cmple(max).all()).then_some(DragTarget::Stick)
}

/// First pendulum bob (in list order) under the pointer
pub fn pick_pendulum(scene: &PendulumScene, at: Vec2, kind: PointerKind) -> Option<DragTarget> {
    let margin = kind.margin();
    scene
        .pendulums
        .iter()
        .position(|p| at.distance(p.bob_pos(scene.pivot)) < p.bob_radius() + margin)
        .map(DragTarget::Pendulum)
}

/// Drag state machine for one pointer
///
/// The pointer that started a drag owns it: presses from other pointers are
/// ignored until it lets go, and their moves and releases never reach the
/// held entity.
#[derive(Debug, Clone, Copy, Default)]
pub struct Pointer {
    pub kind: PointerKind,
    pub target: Option<DragTarget>,
    /// DOM `pointerId` of the pointer holding `target`
    pub id: Option<i32>,
}

impl Pointer {
    pub fn is_dragging(&self) -> bool {
        self.target.is_some()
    }

    /// Whether pointer `id` is the one holding the drag
    pub fn owns(&self, id: i32) -> bool {
        self.target.is_some() && self.id == Some(id)
    }

    fn begin(&mut self, target: Option<DragTarget>, id: i32, kind: PointerKind) {
        self.kind = kind;
        self.target = target;
        self.id = target.map(|_| id);
    }

    /// Press in the light scene: pick and start dragging
    pub fn press_light_scene(&mut self, scene: &LightScene, id: i32, at: Vec2, kind: PointerKind) {
        if self.is_dragging() {
            return;
        }
        self.begin(pick_light_scene(scene, at, kind), id, kind);
        if let Some(target) = self.target {
            log::debug!("Drag start {:?}", target);
        }
    }

    /// Press in the pendulum scene: grabbing a bob stops its physics
    pub fn press_pendulum(
        &mut self,
        scene: &mut PendulumScene,
        id: i32,
        at: Vec2,
        kind: PointerKind,
    ) {
        if self.is_dragging() {
            return;
        }
        self.begin(pick_pendulum(scene, at, kind), id, kind);
        if let Some(DragTarget::Pendulum(i)) = self.target {
            scene.pendulums[i].grab();
            log::debug!("Drag start pendulum {}", i);
        }
    }

    /// Move in the light scene: the held entity follows, clamped
    pub fn move_light_scene(&self, scene: &mut LightScene, id: i32, at: Vec2) {
        if !self.owns(id) {
            return;
        }
        match self.target {
            Some(DragTarget::Light(i)) => {
                if let Err(e) = scene.move_light(i, at) {
                    log::warn!("Drag: {}", e);
                }
            }
            Some(DragTarget::Stick) => scene.apply_stick(StickUpdate::X(at.x)),
            _ => {}
        }
    }

    /// Move in the pendulum scene: the held bob swings to face the pointer
    pub fn move_pendulum(&self, scene: &mut PendulumScene, id: i32, at: Vec2) {
        if !self.owns(id) {
            return;
        }
        if let Some(DragTarget::Pendulum(i)) = self.target {
            let pivot = scene.pivot;
            // A reset lets go of every bob; stop steering it
            if let Some(p) = scene.pendulums.get_mut(i).filter(|p| p.dragging) {
                p.drag_to(pivot, at);
            }
        }
    }

    /// Release in the light scene
    pub fn release_light_scene(&mut self, id: i32) {
        if self.owns(id) {
            self.cancel_light_scene();
        }
    }

    /// Release in the pendulum scene: the bob restarts from rest
    pub fn release_pendulum(&mut self, scene: &mut PendulumScene, id: i32) {
        if self.owns(id) {
            self.cancel_pendulum(scene);
        }
    }

    /// Drop the drag whichever pointer holds it
    pub fn cancel_light_scene(&mut self) {
        self.id = None;
        if let Some(target) = self.target.take() {
            log::debug!("Drag end {:?}", target);
        }
    }

    /// Drop the drag whichever pointer holds it, releasing the bob
    pub fn cancel_pendulum(&mut self, scene: &mut PendulumScene) {
        self.id = None;
        if let Some(DragTarget::Pendulum(i)) = self.target.take() {
            if let Some(p) = scene.pendulums.get_mut(i) {
                p.release();
            }
            log::debug!("Drag end pendulum {}", i);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::{Settings, ShadowAnchor};
    use crate::CanvasSize;

    fn light_scene() -> LightScene {
        LightScene::new(CanvasSize::default(), ShadowAnchor::Ground, 3)
    }

    fn pendulum_scene() -> PendulumScene {
        PendulumScene::new(CanvasSize::default(), &Settings::default(), 3)
    }

    #[test]
    fn test_touch_picks_farther_than_mouse() {
        let scene = light_scene();
        // Point light draws 8 px radius: mouse reaches 18, touch 28
        let at = Vec2::new(200.0 + 24.0, 150.0);
        assert_eq!(pick_light_scene(&scene, at, PointerKind::Mouse), None);
        assert_eq!(
            pick_light_scene(&scene, at, PointerKind::Touch),
            Some(DragTarget::Light(0))
        );
        assert_eq!(PointerKind::from_dom("pen").margin(), 10.0);
    }

    #[test]
    fn test_lights_win_over_stick_in_list_order() {
        let mut scene = light_scene();
        scene.add_light().unwrap();
        // Stack both lights on the stick top
        let top = scene.stick.top(scene.ground_y);
        scene.lights[0].pos = top;
        scene.lights[1].pos = top;
        assert_eq!(
            pick_light_scene(&scene, top, PointerKind::Mouse),
            Some(DragTarget::Light(0))
        );

        let mid = Vec2::new(scene.stick.x + 12.0, scene.ground_y - 60.0);
        assert_eq!(
            pick_light_scene(&scene, mid, PointerKind::Mouse),
            Some(DragTarget::Stick)
        );
        let away = Vec2::new(scene.stick.x + 30.0, scene.ground_y - 60.0);
        assert_eq!(pick_light_scene(&scene, away, PointerKind::Mouse), None);
    }

    #[test]
    fn test_light_drag_is_clamped() {
        let mut scene = light_scene();
        let mut pointer = Pointer::default();
        pointer.press_light_scene(&scene, 1, Vec2::new(200.0, 150.0), PointerKind::Mouse);
        assert!(pointer.is_dragging());

        pointer.move_light_scene(&mut scene, 1, Vec2::new(-100.0, 1000.0));
        assert_eq!(scene.lights[0].pos, Vec2::new(50.0, 450.0));

        pointer.release_light_scene(1);
        assert!(!pointer.is_dragging());
        pointer.move_light_scene(&mut scene, 1, Vec2::new(300.0, 200.0));
        assert_eq!(scene.lights[0].pos, Vec2::new(50.0, 450.0));
    }

    #[test]
    fn test_stick_drag_stays_in_band() {
        let mut scene = light_scene();
        let mut pointer = Pointer::default();
        pointer.press_light_scene(&scene, 7, Vec2::new(400.0, 450.0), PointerKind::Touch);
        assert_eq!(pointer.target, Some(DragTarget::Stick));

        pointer.move_light_scene(&mut scene, 7, Vec2::new(790.0, 100.0));
        assert_eq!(scene.stick.x, 700.0);
        pointer.move_light_scene(&mut scene, 7, Vec2::new(5.0, 100.0));
        assert_eq!(scene.stick.x, 100.0);
    }

    #[test]
    fn test_pendulum_drag_cycle() {
        let mut scene = pendulum_scene();
        let mut pointer = Pointer::default();
        let bob = scene.pendulums[0].bob_pos(scene.pivot);

        pointer.press_pendulum(&mut scene, 1, bob + Vec2::new(15.0, 0.0), PointerKind::Mouse);
        assert_eq!(pointer.target, Some(DragTarget::Pendulum(0)));
        assert!(scene.pendulums[0].dragging);

        // Straight below the pivot
        let below = scene.pivot + Vec2::new(0.0, 50.0);
        pointer.move_pendulum(&mut scene, 1, below);
        assert!(scene.pendulums[0].angle.abs() < 1e-6);

        pointer.release_pendulum(&mut scene, 1);
        assert!(!scene.pendulums[0].dragging);
        assert_eq!(scene.pendulums[0].angular_vel, 0.0);
        assert!(!pointer.is_dragging());
    }

    #[test]
    fn test_pendulum_pick_misses_far_pointer() {
        let mut scene = pendulum_scene();
        let mut pointer = Pointer::default();
        pointer.press_pendulum(&mut scene, 2, Vec2::new(10.0, 590.0), PointerKind::Touch);
        assert!(!pointer.is_dragging());
        assert!(!scene.pendulums[0].dragging);
    }

    #[test]
    fn test_second_touch_cannot_steal_held_bob() {
        let mut scene = pendulum_scene();
        let mut pointer = Pointer::default();
        let bob = scene.pendulums[0].bob_pos(scene.pivot);

        pointer.press_pendulum(&mut scene, 1, bob, PointerKind::Touch);
        assert_eq!(pointer.id, Some(1));

        // Second finger lands elsewhere, moves and lifts
        pointer.press_pendulum(&mut scene, 2, Vec2::new(10.0, 590.0), PointerKind::Touch);
        assert_eq!(pointer.target, Some(DragTarget::Pendulum(0)));
        let angle = scene.pendulums[0].angle;
        let below = scene.pivot + Vec2::new(0.0, 50.0);
        pointer.move_pendulum(&mut scene, 2, below);
        assert_eq!(scene.pendulums[0].angle, angle);
        pointer.release_pendulum(&mut scene, 2);
        assert!(scene.pendulums[0].dragging);

        // Owner lifts: bob swings again
        pointer.release_pendulum(&mut scene, 1);
        assert!(!pointer.is_dragging());
        assert_eq!(pointer.id, None);
        for frame in 0..60 {
            crate::sim::tick(
                &mut scene,
                &crate::sim::TickInput {
                    now_ms: frame as f64 * 16.0,
                    ..Default::default()
                },
            );
        }
        assert!(!scene.pendulums[0].dragging);
        assert_ne!(scene.pendulums[0].angle, angle);
    }

    #[test]
    fn test_other_pointer_cannot_move_held_light() {
        let mut scene = light_scene();
        let mut pointer = Pointer::default();
        pointer.press_light_scene(&scene, 4, Vec2::new(200.0, 150.0), PointerKind::Mouse);

        pointer.move_light_scene(&mut scene, 9, Vec2::new(300.0, 300.0));
        assert_eq!(scene.lights[0].pos, Vec2::new(200.0, 150.0));
        pointer.release_light_scene(9);
        assert!(pointer.owns(4));

        pointer.move_light_scene(&mut scene, 4, Vec2::new(300.0, 300.0));
        assert_eq!(scene.lights[0].pos, Vec2::new(300.0, 300.0));
    }

    #[test]
    fn test_reset_stops_steering_held_bob() {
        let mut scene = pendulum_scene();
        let mut pointer = Pointer::default();
        let bob = scene.pendulums[0].bob_pos(scene.pivot);
        pointer.press_pendulum(&mut scene, 1, bob, PointerKind::Mouse);

        scene.reset_all();
        let below = scene.pivot + Vec2::new(0.0, 50.0);
        pointer.move_pendulum(&mut scene, 1, below);
        assert_eq!(scene.pendulums[0].angle, PENDULUM_ANGLE);
    }
}
