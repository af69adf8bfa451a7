//! Simulation routing
//!
//! The page picks one simulation per canvas; `Scene` dispatches input,
//! per-frame updates and readouts to it.

use glam::Vec2;

use super::pointer::{Pointer, PointerKind};
use super::state::{LightScene, PendulumScene};
use super::tick::{TickInput, tick};
use crate::CanvasSize;
use crate::settings::Settings;

/// Which simulation a canvas hosts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SimulationKind {
    LightAndShadow,
    Pendulum,
}

impl SimulationKind {
    /// From the canvas `data-simulation` attribute
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "light-and-shadow" => Some(SimulationKind::LightAndShadow),
            "pendulum" => Some(SimulationKind::Pendulum),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SimulationKind::LightAndShadow => "light-and-shadow",
            SimulationKind::Pendulum => "pendulum",
        }
    }
}

/// The active simulation
#[derive(Debug, Clone)]
pub enum Scene {
    Light(LightScene),
    Pendulum(PendulumScene),
}

impl Scene {
    pub fn new(kind: SimulationKind, canvas: CanvasSize, settings: &Settings, seed: u64) -> Self {
        log::info!(
            "Starting {} on a {}x{} canvas{}",
            kind.as_str(),
            canvas.width,
            canvas.height,
            if canvas.is_mobile() { " (mobile)" } else { "" }
        );
        match kind {
            SimulationKind::LightAndShadow => {
                Scene::Light(LightScene::new(canvas, settings.shadow_anchor, seed))
            }
            SimulationKind::Pendulum => Scene::Pendulum(PendulumScene::new(canvas, settings, seed)),
        }
    }

    pub fn kind(&self) -> SimulationKind {
        match self {
            Scene::Light(_) => SimulationKind::LightAndShadow,
            Scene::Pendulum(_) => SimulationKind::Pendulum,
        }
    }

    pub fn canvas(&self) -> CanvasSize {
        match self {
            Scene::Light(s) => s.canvas,
            Scene::Pendulum(s) => s.canvas,
        }
    }

    /// Pointer `id` pressed at `at`; ignored while another pointer holds a drag
    pub fn pointer_down(&mut self, pointer: &mut Pointer, id: i32, at: Vec2, kind: PointerKind) {
        match self {
            Scene::Light(s) => pointer.press_light_scene(s, id, at, kind),
            Scene::Pendulum(s) => pointer.press_pendulum(s, id, at, kind),
        }
    }

    pub fn pointer_move(&mut self, pointer: &Pointer, id: i32, at: Vec2) {
        match self {
            Scene::Light(s) => pointer.move_light_scene(s, id, at),
            Scene::Pendulum(s) => pointer.move_pendulum(s, id, at),
        }
    }

    pub fn pointer_up(&mut self, pointer: &mut Pointer, id: i32) {
        match self {
            Scene::Light(_) => pointer.release_light_scene(id),
            Scene::Pendulum(s) => pointer.release_pendulum(s, id),
        }
    }

    /// End any drag regardless of which pointer holds it
    pub fn cancel_drag(&mut self, pointer: &mut Pointer) {
        match self {
            Scene::Light(_) => pointer.cancel_light_scene(),
            Scene::Pendulum(s) => pointer.cancel_pendulum(s),
        }
    }

    /// One animation frame. The light scene has no time evolution.
    pub fn update(&mut self, input: &TickInput) {
        if let Scene::Pendulum(s) = self {
            tick(s, input);
        }
    }
}
