//! Scene tessellation
//!
//! Turns the active simulation into one triangle list in canvas pixels,
//! back to front. No GPU state is touched here.

use glam::Vec2;

use super::shapes;
use super::vertex::{Vertex, colors};
use crate::settings::QualityPreset;
use crate::sim::{LightScene, PendulumScene, Scene};

/// Grid spacing of the pendulum backdrop
const GRID_SPACING: f32 = 50.0;
/// Ground tint under the stick for each shadow contribution
const TINT_RADII: Vec2 = Vec2::new(75.0, 25.0);
/// Stick base ellipse
const STICK_BASE_RADII: Vec2 = Vec2::new(6.0, 4.0);
/// Spacing between a light's glow rings
const GLOW_STEP: f32 = 15.0;
/// Pivot disk and support bar
const PIVOT_RADIUS: f32 = 6.0;
const PIVOT_SUPPORT: Vec2 = Vec2::new(40.0, 10.0);
/// Angle indicator arc
const ANGLE_ARC_RADIUS: f32 = 80.0;

/// Build the frame's vertices
pub fn build(scene: &Scene, quality: QualityPreset) -> Vec<Vertex> {
    match scene {
        Scene::Light(s) => light_scene(s, quality),
        Scene::Pendulum(s) => pendulum_scene(s, quality),
    }
}

fn light_scene(scene: &LightScene, quality: QualityPreset) -> Vec<Vertex> {
    let segments = quality.circle_segments();
    let (w, h) = (scene.canvas.width, scene.canvas.height);
    let ground_y = scene.ground_y;
    let mut v = Vec::new();

    // Ground
    v.extend(shapes::rect(
        Vec2::new(0.0, ground_y),
        Vec2::new(w, (h - ground_y).max(0.0)),
        colors::GROUND.opaque(),
    ));

    // Shadows: one translucent wedge plus a colored ground tint per
    // contribution, overlapping contributions blend on top of each other
    let base = scene.stick.base(ground_y);
    for shadows in scene.shadows() {
        let color = scene.lights[shadows.light_index].color;
        for quad in &shadows.quads {
            let (near_depth, far_depth) = (quad.base.1 - quad.base.0, quad.tip.1 - quad.tip.0);
            let start = (quad.base.0 + quad.base.1) / 2.0;
            let end = (quad.tip.0 + quad.tip.1) / 2.0;
            v.extend(shapes::quad(
                Vec2::new(start, ground_y),
                Vec2::new(end, ground_y),
                Vec2::new(end, ground_y + far_depth),
                Vec2::new(start, ground_y + near_depth),
                colors::SHADOW.with_alpha(quad.alpha()),
            ));
            v.extend(shapes::ellipse(
                base,
                TINT_RADII,
                color.with_alpha(20.0 * quad.intensity),
                segments,
            ));
        }
    }

    // Stick
    v.extend(shapes::line(
        base,
        scene.stick.top(ground_y),
        scene.stick.width,
        colors::STICK.opaque(),
    ));
    v.extend(shapes::ellipse(base, STICK_BASE_RADII, colors::STICK.opaque(), segments));

    // Lights: glow rings outermost first, then the core
    for light in &scene.lights {
        let radius = light.visual_radius();
        let (core_alpha, glow_alpha) = if light.extended { (150.0, 30.0) } else { (200.0, 40.0) };
        for i in (1..=quality.glow_rings()).rev() {
            v.extend(shapes::circle(
                light.pos,
                radius + i as f32 * GLOW_STEP / 2.0,
                light.color.with_alpha(glow_alpha * light.intensity / i as f32),
                segments,
            ));
        }
        v.extend(shapes::circle(
            light.pos,
            radius,
            light.color.with_alpha(core_alpha),
            segments,
        ));
    }

    v
}

fn pendulum_scene(scene: &PendulumScene, quality: QualityPreset) -> Vec<Vertex> {
    let segments = quality.circle_segments();
    let (w, h) = (scene.canvas.width, scene.canvas.height);
    let pivot = scene.pivot;
    let mut v = Vec::new();

    // Grid
    let grid = colors::GRID.opaque();
    let mut x = 0.0;
    while x < w {
        v.extend(shapes::line(Vec2::new(x, 0.0), Vec2::new(x, h), 1.0, grid));
        x += GRID_SPACING;
    }
    let mut y = 0.0;
    while y < h {
        v.extend(shapes::line(Vec2::new(0.0, y), Vec2::new(w, y), 1.0, grid));
        y += GRID_SPACING;
    }

    // Pivot
    v.extend(shapes::rect(
        pivot - PIVOT_SUPPORT / 2.0,
        PIVOT_SUPPORT,
        colors::PIVOT_SUPPORT.opaque(),
    ));
    v.extend(shapes::circle(pivot, PIVOT_RADIUS, colors::PIVOT.opaque(), segments));

    // Strings and bobs (a dragged bob is drawn where the pointer holds it)
    for p in &scene.pendulums {
        let bob = p.bob_pos(pivot);
        v.extend(shapes::line(pivot, bob, 2.0, colors::STRING.opaque()));
        v.extend(shapes::circle(bob, p.bob_radius(), p.color.opaque(), segments));
        v.extend(shapes::ring(
            bob,
            p.bob_radius() - 0.5,
            p.bob_radius() + 0.5,
            colors::OUTLINE.with_alpha(100.0),
            segments,
        ));
    }

    if let [only] = scene.pendulums.as_slice() {
        v.extend(shapes::arc_stroke(
            pivot,
            ANGLE_ARC_RADIUS,
            2.0,
            0.0,
            only.angle,
            colors::OUTLINE.with_alpha(150.0),
            segments as f32 / std::f32::consts::TAU,
        ));
    }

    if scene.show_trail {
        for p in &scene.pendulums {
            let points: Vec<Vec2> = p.trail.iter().map(|t| t.pos).collect();
            v.extend(shapes::fading_polyline(&points, 1.0, colors::OUTLINE, 100.0));
        }
    }

    if scene.show_forces {
        for f in scene
            .pendulums
            .iter()
            .filter_map(|p| p.forces(pivot, scene.params.gravity))
        {
            let o = f.origin;
            v.extend(shapes::line(o, o + f.gravity, 3.0, colors::FORCE_GRAVITY.opaque()));
            v.extend(shapes::line(o, o + f.tension, 3.0, colors::FORCE_TENSION.opaque()));
            v.extend(shapes::line(o, o + f.velocity, 2.0, colors::FORCE_VELOCITY.opaque()));
        }
    }

    v
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::CanvasSize;
    use crate::consts::GROUND_Y;
    use crate::settings::Settings;
    use crate::sim::{LightUpdate, PendulumSceneUpdate, SimulationKind, TickInput};

    fn scene(kind: SimulationKind) -> Scene {
        Scene::new(kind, CanvasSize::default(), &Settings::default(), 5)
    }

    fn has_color(vertices: &[Vertex], color: [f32; 4]) -> bool {
        vertices.iter().any(|v| v.color == color)
    }

    #[test]
    fn test_light_scene_draws_shadow_below_ground() {
        let s = scene(SimulationKind::LightAndShadow);
        let v = build(&s, QualityPreset::Medium);
        let shadow = colors::SHADOW.with_alpha(80.0);
        let wedge: Vec<_> = v.iter().filter(|v| v.color == shadow).collect();
        assert_eq!(wedge.len(), 6);
        for vertex in wedge {
            assert!(vertex.position[1] >= GROUND_Y);
            assert!((400.0..=486.0).contains(&vertex.position[0]));
        }
    }

    #[test]
    fn test_light_below_ground_casts_nothing() {
        let mut s = scene(SimulationKind::LightAndShadow);
        if let Scene::Light(light) = &mut s {
            light.lights[0].pos.y = 520.0;
        }
        let v = build(&s, QualityPreset::Medium);
        assert!(!has_color(&v, colors::SHADOW.with_alpha(80.0)));
    }

    #[test]
    fn test_extended_light_splits_shadow() {
        let mut s = scene(SimulationKind::LightAndShadow);
        if let Scene::Light(light) = &mut s {
            light.apply(0, LightUpdate::Extended(true)).unwrap();
        }
        let v = build(&s, QualityPreset::Low);
        let share = colors::SHADOW.with_alpha(80.0 * (1.0 / 12.0));
        assert_eq!(v.iter().filter(|v| v.color == share).count(), 12 * 6);
    }

    #[test]
    fn test_glow_rings_follow_quality() {
        let s = scene(SimulationKind::LightAndShadow);
        let low = build(&s, QualityPreset::Low);
        let high = build(&s, QualityPreset::High);
        let glow = crate::Rgb::WHITE.with_alpha(40.0);
        assert!(!has_color(&low, glow));
        assert!(has_color(&high, glow));
    }

    #[test]
    fn test_pendulum_overlays() {
        let mut s = scene(SimulationKind::Pendulum);
        for _ in 0..10 {
            s.update(&TickInput::default());
        }
        let trail = |v: &[Vertex]| {
            v.iter()
                .filter(|v| v.color[3] > 0.0 && v.color[..3] == [1.0; 3])
                .count()
        };
        let force = colors::FORCE_GRAVITY.opaque();

        let plain = build(&s, QualityPreset::Medium);
        assert!(!has_color(&plain, force));

        if let Scene::Pendulum(p) = &mut s {
            p.apply_global(PendulumSceneUpdate::ShowForces(true));
            p.apply_global(PendulumSceneUpdate::ShowTrail(false));
        }
        let forces = build(&s, QualityPreset::Medium);
        assert!(has_color(&forces, force));
        assert!(trail(&forces) < trail(&plain));
    }

    #[test]
    fn test_angle_arc_only_for_single_pendulum() {
        let mut s = scene(SimulationKind::Pendulum);
        let arc = colors::OUTLINE.with_alpha(150.0);
        assert!(has_color(&build(&s, QualityPreset::Medium), arc));
        if let Scene::Pendulum(p) = &mut s {
            p.add_pendulum().unwrap();
        }
        assert!(!has_color(&build(&s, QualityPreset::Medium), arc));
    }

    #[test]
    fn test_grid_lines() {
        // 16 vertical + 12 horizontal
        let s = scene(SimulationKind::Pendulum);
        let v = build(&s, QualityPreset::Low);
        let grid = v.iter().filter(|v| v.color == colors::GRID.opaque()).count();
        assert_eq!(grid, 28 * 6);
    }
}
