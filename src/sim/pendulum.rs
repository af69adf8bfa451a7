//! Simple pendulum: entity, integrator and bob geometry
//!
//! Angles are measured from straight down, positive toward +x (screen
//! coordinates, y down). Angular velocity is in radians per step.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::trail::Trail;
use crate::color::Rgb;
use crate::consts::*;
use crate::{angle_from_pivot, hanging_point};

/// Drawn length of the tension arrow
const TENSION_ARROW: f32 = 30.0;
/// Pixels per unit of gravity*mass for the gravity arrow
const GRAVITY_ARROW_SCALE: f32 = 50.0;
/// Pixels per rad/step for the velocity arrow
const VELOCITY_ARROW_SCALE: f32 = 20.0;

/// Global parameters shared by every pendulum in a scene
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StepParams {
    pub gravity: f32,
    /// Per-step time factor
    pub time_scale: f32,
}

impl Default for StepParams {
    fn default() -> Self {
        Self {
            gravity: GRAVITY,
            time_scale: TIME_SCALE,
        }
    }
}

/// One semi-implicit Euler step of the damped simple pendulum.
///
/// Returns the new `(angle, angular_velocity)`. The velocity is updated first
/// and damped, then the angle advances with the new velocity. Mass does not
/// enter the motion.
#[inline]
pub fn integrate(
    angle: f32,
    angular_vel: f32,
    length: f32,
    damping: f32,
    params: StepParams,
) -> (f32, f32) {
    let angular_acc = -params.gravity * angle.sin() / length;
    let vel = (angular_vel + angular_acc * params.time_scale) * damping;
    (angle + vel * params.time_scale, vel)
}

/// Small-oscillation period `2π·sqrt(length/gravity)`, in steps at time scale 1
pub fn small_angle_period(length: f32, gravity: f32) -> f32 {
    std::f32::consts::TAU * (length / gravity).sqrt()
}

/// A pendulum hanging from the scene pivot
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pendulum {
    pub angle: f32,
    pub angular_vel: f32,
    pub length: f32,
    /// Only affects the drawn bob size and gravity arrow
    pub mass: f32,
    /// Multiplicative velocity decay per step (0.95 - 1.0)
    pub damping: f32,
    pub color: Rgb,
    /// Held by the pointer: physics is bypassed
    pub dragging: bool,
    /// Recent bob positions
    #[serde(skip)]
    pub trail: Trail,
}

impl Default for Pendulum {
    fn default() -> Self {
        Self {
            angle: PENDULUM_ANGLE,
            angular_vel: 0.0,
            length: PENDULUM_LENGTH,
            mass: PENDULUM_MASS,
            damping: PENDULUM_DAMPING,
            color: PENDULUM_COLOR,
            dragging: false,
            trail: Trail::default(),
        }
    }
}

/// Arrows drawn from the bob when the force overlay is on
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ForceVectors {
    pub origin: Vec2,
    pub gravity: Vec2,
    pub tension: Vec2,
    pub velocity: Vec2,
}

impl Pendulum {
    /// Bob center for the given pivot
    pub fn bob_pos(&self, pivot: Vec2) -> Vec2 {
        hanging_point(pivot, self.angle, self.length)
    }

    /// Drawn bob diameter grows with mass
    pub fn bob_diameter(&self) -> f32 {
        15.0 + self.mass * 5.0
    }

    pub fn bob_radius(&self) -> f32 {
        self.bob_diameter() / 2.0
    }

    /// Advance one step. Dragged pendulums do not move.
    /// Returns the new bob position when the pendulum moved.
    pub fn step(&mut self, pivot: Vec2, params: StepParams) -> Option<Vec2> {
        if self.dragging {
            return None;
        }
        let (angle, vel) = integrate(self.angle, self.angular_vel, self.length, self.damping, params);
        self.angle = angle;
        self.angular_vel = vel;
        Some(self.bob_pos(pivot))
    }

    /// Grab the bob: physics stops until [`Pendulum::release`]
    pub fn grab(&mut self) {
        self.dragging = true;
        self.angular_vel = 0.0;
    }

    /// Follow the pointer around the pivot
    pub fn drag_to(&mut self, pivot: Vec2, pointer: Vec2) {
        self.angle = angle_from_pivot(pivot, pointer);
        self.angular_vel = 0.0;
    }

    /// Let go: the swing restarts from rest at the current angle
    pub fn release(&mut self) {
        self.dragging = false;
        self.angular_vel = 0.0;
    }

    /// Back to a fixed angle at rest, trail cleared
    pub fn reset(&mut self, angle: f32) {
        self.angle = angle;
        self.angular_vel = 0.0;
        self.dragging = false;
        self.trail.clear();
    }

    /// Force overlay arrows, `None` while dragged
    pub fn forces(&self, pivot: Vec2, gravity: f32) -> Option<ForceVectors> {
        if self.dragging {
            return None;
        }
        let origin = self.bob_pos(pivot);
        let tension = (pivot - origin).normalize_or_zero() * TENSION_ARROW;
        Some(ForceVectors {
            origin,
            gravity: Vec2::new(0.0, gravity * self.mass * GRAVITY_ARROW_SCALE),
            tension,
            velocity: Vec2::new(self.angle.cos(), -self.angle.sin())
                * self.angular_vel
                * VELOCITY_ARROW_SCALE,
        })
    }

    /// Angle in whole degrees for the readout
    pub fn angle_degrees(&self) -> i32 {
        self.angle.to_degrees().round() as i32
    }
}
