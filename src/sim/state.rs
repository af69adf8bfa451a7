//! Scene stores and update commands
//!
//! Each simulation owns one explicit scene struct. UI controls never poke
//! fields directly: they build a tagged update which the scene clamps to the
//! control ranges and applies.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::light::{LightSource, Stick};
use super::pendulum::{Pendulum, StepParams};
use super::shadow::{LightShadows, ShadowExtent, cast_shadows, extended_extent};
use crate::color::Rgb;
use crate::consts::*;
use crate::error::{Result, SimError};
use crate::settings::{Settings, ShadowAnchor};
use crate::{CanvasSize, clamp_to};

/// Update to a single light
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "field", content = "value", rename_all = "snake_case")]
pub enum LightUpdate {
    X(f32),
    Y(f32),
    Color(Rgb),
    Intensity(f32),
    Extended(bool),
    Radius(f32),
}

/// Update to the stick
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "field", content = "value", rename_all = "snake_case")]
pub enum StickUpdate {
    X(f32),
    Height(f32),
}

/// Update to a single pendulum
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "field", content = "value", rename_all = "snake_case")]
pub enum PendulumUpdate {
    Length(f32),
    Mass(f32),
    Color(Rgb),
    Damping(f32),
}

/// Update to the pendulum scene's global parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "field", content = "value", rename_all = "snake_case")]
pub enum PendulumSceneUpdate {
    Gravity(f32),
    TimeScale(f32),
    TrailLength(usize),
    ShowTrail(bool),
    ShowForces(bool),
    Running(bool),
}

/// Ground line for a canvas; mobile canvases keep the desktop proportions
pub fn ground_for(canvas: CanvasSize) -> f32 {
    (GROUND_Y * canvas.height / CANVAS_HEIGHT).round()
}

/// Light and shadow scene: 1-3 lights, one stick, a ground line
#[derive(Debug, Clone)]
pub struct LightScene {
    pub lights: Vec<LightSource>,
    pub stick: Stick,
    pub ground_y: f32,
    pub canvas: CanvasSize,
    pub anchor: ShadowAnchor,
    /// Bumped on every mutation of the light/stick geometry
    revision: u64,
    rng: Pcg32,
}

impl LightScene {
    pub fn new(canvas: CanvasSize, anchor: ShadowAnchor, seed: u64) -> Self {
        Self {
            lights: vec![LightSource::default()],
            stick: Stick {
                x: canvas.width / 2.0,
                ..Stick::default()
            },
            ground_y: ground_for(canvas),
            canvas,
            anchor,
            revision: 0,
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    /// Geometry revision (changes whenever lights or the stick change)
    pub fn revision(&self) -> u64 {
        self.revision
    }

    fn touch(&mut self) {
        self.revision = self.revision.wrapping_add(1);
    }

    /// Region lights may be placed in (inclusive min, max)
    pub fn light_bounds(&self) -> (Vec2, Vec2) {
        (
            Vec2::splat(LIGHT_EDGE_MARGIN),
            Vec2::new(
                self.canvas.width - LIGHT_EDGE_MARGIN,
                self.ground_y - LIGHT_EDGE_MARGIN,
            ),
        )
    }

    /// Central band the stick may be placed in
    pub fn stick_bounds(&self) -> (f32, f32) {
        (STICK_EDGE_MARGIN, self.canvas.width - STICK_EDGE_MARGIN)
    }

    /// Add a light at a random spot in the upper canvas
    pub fn add_light(&mut self) -> Result<usize> {
        if self.lights.len() >= MAX_LIGHTS {
            return Err(SimError::LightLimit { max: MAX_LIGHTS });
        }
        let x = self.rng.random::<f32>() * (self.canvas.width - 100.0) + 50.0;
        let y = self.rng.random::<f32>() * 200.0 + 100.0;
        self.lights.push(LightSource::at(Vec2::new(x, y)));
        self.touch();
        log::info!("Added light {} at ({:.0}, {:.0})", self.lights.len() - 1, x, y);
        Ok(self.lights.len() - 1)
    }

    pub fn remove_light(&mut self, index: usize) -> Result<()> {
        if index >= self.lights.len() {
            return Err(SimError::NoSuchEntity {
                kind: "light",
                index,
            });
        }
        if self.lights.len() <= 1 {
            return Err(SimError::LastLight);
        }
        self.lights.remove(index);
        self.touch();
        log::info!("Removed light {}", index);
        Ok(())
    }

    /// Apply a clamped update to light `index`
    pub fn apply(&mut self, index: usize, update: LightUpdate) -> Result<()> {
        let (min, max) = self.light_bounds();
        let light = self.lights.get_mut(index).ok_or(SimError::NoSuchEntity {
            kind: "light",
            index,
        })?;
        match update {
            LightUpdate::X(x) => light.pos.x = clamp_to(x, &(min.x..=max.x)),
            LightUpdate::Y(y) => light.pos.y = clamp_to(y, &(min.y..=max.y)),
            LightUpdate::Color(color) => light.color = color,
            LightUpdate::Intensity(i) => light.intensity = clamp_to(i, &INTENSITY_RANGE),
            LightUpdate::Extended(extended) => light.extended = extended,
            LightUpdate::Radius(r) => light.radius = clamp_to(r, &RADIUS_RANGE),
        }
        self.touch();
        Ok(())
    }

    /// Move a light, clamped to the placement region
    pub fn move_light(&mut self, index: usize, to: Vec2) -> Result<()> {
        self.apply(index, LightUpdate::X(to.x))?;
        self.apply(index, LightUpdate::Y(to.y))
    }

    pub fn apply_stick(&mut self, update: StickUpdate) {
        match update {
            StickUpdate::X(x) => {
                let (lo, hi) = self.stick_bounds();
                self.stick.x = clamp_to(x, &(lo..=hi));
            }
            StickUpdate::Height(h) => self.stick.height = clamp_to(h, &STICK_HEIGHT_RANGE),
        }
        self.touch();
    }

    /// Shadow quads for every light, in light order
    pub fn shadows(&self) -> Vec<LightShadows> {
        self.lights
            .iter()
            .enumerate()
            .map(|(light_index, light)| LightShadows {
                light_index,
                quads: cast_shadows(light, &self.stick, self.ground_y, self.anchor),
            })
            .collect()
    }

    /// Umbra/penumbra extents of the extended lights
    pub fn extents(&self) -> Vec<(usize, ShadowExtent)> {
        self.lights
            .iter()
            .enumerate()
            .filter(|(_, light)| light.extended)
            .filter_map(|(i, light)| {
                extended_extent(light, &self.stick, self.ground_y, self.anchor).map(|e| (i, e))
            })
            .collect()
    }
}

/// Pendulum scene: 1-3 pendulums on one pivot plus global parameters
#[derive(Debug, Clone)]
pub struct PendulumScene {
    pub pendulums: Vec<Pendulum>,
    pub params: StepParams,
    pub pivot: Vec2,
    pub canvas: CanvasSize,
    /// Integration runs only while set; rendering continues regardless
    pub running: bool,
    pub show_trail: bool,
    pub show_forces: bool,
    trail_capacity: usize,
    rng: Pcg32,
}

impl PendulumScene {
    pub fn new(canvas: CanvasSize, settings: &Settings, seed: u64) -> Self {
        let trail_capacity = clamp_to(settings.trail_capacity, &TRAIL_RANGE);
        let mut first = Pendulum::default();
        first.trail.set_capacity(trail_capacity);
        Self {
            pendulums: vec![first],
            params: StepParams {
                gravity: clamp_to(settings.gravity, &GRAVITY_RANGE),
                time_scale: clamp_to(settings.time_scale, &TIME_SCALE_RANGE),
            },
            pivot: Vec2::new(canvas.width / 2.0, PIVOT_Y),
            canvas,
            running: true,
            show_trail: settings.show_trail,
            show_forces: settings.show_forces,
            trail_capacity,
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    pub fn trail_capacity(&self) -> usize {
        self.trail_capacity
    }

    /// Add a pendulum with randomized parameters
    pub fn add_pendulum(&mut self) -> Result<usize> {
        if self.pendulums.len() >= MAX_PENDULUMS {
            return Err(SimError::PendulumLimit { max: MAX_PENDULUMS });
        }
        let rng = &mut self.rng;
        let angle = std::f32::consts::FRAC_PI_6 + rng.random::<f32>() * std::f32::consts::FRAC_PI_3;
        let length = 150.0 + rng.random::<f32>() * 100.0;
        let mass = 0.5 + rng.random::<f32>() * 1.5;
        let damping = 0.99 + rng.random::<f32>() * 0.005;
        let color = Rgb::from_hsl(rng.random::<f32>() * 360.0, 0.7, 0.6);

        let mut pendulum = Pendulum {
            angle,
            length,
            mass,
            damping,
            color,
            ..Default::default()
        };
        pendulum.trail.set_capacity(self.trail_capacity);
        self.pendulums.push(pendulum);
        log::info!(
            "Added pendulum {} (length {:.0}, mass {:.1})",
            self.pendulums.len() - 1,
            length,
            mass
        );
        Ok(self.pendulums.len() - 1)
    }

    pub fn remove_pendulum(&mut self, index: usize) -> Result<()> {
        if index >= self.pendulums.len() {
            return Err(SimError::NoSuchEntity {
                kind: "pendulum",
                index,
            });
        }
        if self.pendulums.len() <= 1 {
            return Err(SimError::LastPendulum);
        }
        self.pendulums.remove(index);
        log::info!("Removed pendulum {}", index);
        Ok(())
    }

    /// Apply a clamped update to pendulum `index`
    pub fn apply(&mut self, index: usize, update: PendulumUpdate) -> Result<()> {
        let pendulum = self
            .pendulums
            .get_mut(index)
            .ok_or(SimError::NoSuchEntity {
                kind: "pendulum",
                index,
            })?;
        match update {
            PendulumUpdate::Length(l) => pendulum.length = clamp_to(l, &LENGTH_RANGE),
            PendulumUpdate::Mass(m) => pendulum.mass = clamp_to(m, &MASS_RANGE),
            PendulumUpdate::Color(color) => pendulum.color = color,
            PendulumUpdate::Damping(d) => pendulum.damping = clamp_to(d, &DAMPING_RANGE),
        }
        Ok(())
    }

    pub fn apply_global(&mut self, update: PendulumSceneUpdate) {
        match update {
            PendulumSceneUpdate::Gravity(g) => self.params.gravity = clamp_to(g, &GRAVITY_RANGE),
            PendulumSceneUpdate::TimeScale(t) => {
                self.params.time_scale = clamp_to(t, &TIME_SCALE_RANGE)
            }
            PendulumSceneUpdate::TrailLength(n) => {
                self.trail_capacity = clamp_to(n, &TRAIL_RANGE);
                for p in &mut self.pendulums {
                    p.trail.set_capacity(self.trail_capacity);
                }
            }
            PendulumSceneUpdate::ShowTrail(show) => self.show_trail = show,
            PendulumSceneUpdate::ShowForces(show) => self.show_forces = show,
            PendulumSceneUpdate::Running(running) => self.running = running,
        }
    }

    /// Every pendulum back to π/4 at rest, not dragged, trail empty
    pub fn reset_all(&mut self) {
        for p in &mut self.pendulums {
            p.reset(PENDULUM_ANGLE);
        }
        log::info!("Reset {} pendulum(s)", self.pendulums.len());
    }
}
