//! Per-frame pendulum update
//!
//! One integration step per animation frame while running. The pause toggle
//! stops integration only; the renderer keeps drawing every frame.

use super::state::PendulumScene;

/// Input commands for a single frame
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Host clock in milliseconds (stamps trail samples)
    pub now_ms: f64,
    /// Toggle run/pause (space)
    pub toggle_run: bool,
    /// Reset every pendulum (r/R)
    pub reset: bool,
}

impl TickInput {
    /// Fold a keyboard key into this frame's input. Returns whether it was handled.
    pub fn key(&mut self, key: &str) -> bool {
        match key {
            " " => self.toggle_run = true,
            "r" | "R" => self.reset = true,
            _ => return false,
        }
        true
    }
}

/// Advance the pendulum scene by one frame
pub fn tick(scene: &mut PendulumScene, input: &TickInput) {
    if input.toggle_run {
        scene.running = !scene.running;
        log::info!("{}", if scene.running { "Running" } else { "Paused" });
    }
    if input.reset {
        scene.reset_all();
    }
    if !scene.running {
        return;
    }

    let (pivot, params) = (scene.pivot, scene.params);
    for pendulum in &mut scene.pendulums {
        if let Some(bob) = pendulum.step(pivot, params) {
            pendulum.trail.push(bob, input.now_ms);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::CanvasSize;
    use crate::consts::PENDULUM_ANGLE;
    use crate::settings::Settings;

    fn scene() -> PendulumScene {
        PendulumScene::new(CanvasSize::default(), &Settings::default(), 42)
    }

    #[test]
    fn test_tick_steps_and_records_trail() {
        let mut scene = scene();
        for frame in 0..5 {
            let input = TickInput {
                now_ms: frame as f64 * 16.0,
                ..Default::default()
            };
            tick(&mut scene, &input);
        }
        let p = &scene.pendulums[0];
        assert!(p.angle < PENDULUM_ANGLE);
        assert_eq!(p.trail.len(), 5);
        assert_eq!(p.trail.newest().map(|t| t.time), Some(64.0));
    }

    #[test]
    fn test_pause_stops_integration_only() {
        let mut scene = scene();
        let toggle = TickInput {
            toggle_run: true,
            ..Default::default()
        };
        tick(&mut scene, &toggle);
        assert!(!scene.running);
        let angle = scene.pendulums[0].angle;

        tick(&mut scene, &TickInput::default());
        assert_eq!(scene.pendulums[0].angle, angle);
        assert!(scene.pendulums[0].trail.is_empty());

        tick(&mut scene, &toggle);
        assert!(scene.running);
        assert_ne!(scene.pendulums[0].angle, angle);
    }

    #[test]
    fn test_dragged_pendulum_is_not_integrated() {
        let mut scene = scene();
        scene.add_pendulum().unwrap();
        scene.pendulums[0].grab();
        let held = scene.pendulums[0].angle;
        let free = scene.pendulums[1].angle;

        tick(&mut scene, &TickInput::default());
        assert_eq!(scene.pendulums[0].angle, held);
        assert!(scene.pendulums[0].trail.is_empty());
        assert_ne!(scene.pendulums[1].angle, free);
    }

    #[test]
    fn test_reset_key() {
        let mut scene = scene();
        for _ in 0..30 {
            tick(&mut scene, &TickInput::default());
        }
        let mut input = TickInput::default();
        assert!(input.key("R"));
        assert!(!input.key("x"));
        assert!(input.reset && !input.toggle_run);

        // Reset happens before this frame's step
        scene.running = false;
        tick(&mut scene, &input);
        let p = &scene.pendulums[0];
        assert_eq!(p.angle, PENDULUM_ANGLE);
        assert_eq!(p.angular_vel, 0.0);
        assert!(p.trail.is_empty());
    }

    #[test]
    fn test_determinism() {
        let mut a = scene();
        let mut b = scene();
        a.add_pendulum().unwrap();
        b.add_pendulum().unwrap();
        for frame in 0..200 {
            let input = TickInput {
                now_ms: frame as f64,
                ..Default::default()
            };
            tick(&mut a, &input);
            tick(&mut b, &input);
        }
        for (pa, pb) in a.pendulums.iter().zip(&b.pendulums) {
            assert_eq!(pa.angle, pb.angle);
            assert_eq!(pa.angular_vel, pb.angular_vel);
        }
    }
}
