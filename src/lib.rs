//! Physics Demos - interactive light/shadow and pendulum simulations
//!
//! Core modules:
//! - `sim`: Simulation state, integrator, shadow geometry, pointer picking
//! - `renderer`: WebGPU triangle pipeline and scene tessellation
//! - `controls`: UI control keys mapped onto scene update commands
//! - `shadow_api`: Optional shadow endpoint (request/response, local evaluation)
//! - `settings`: Data-driven configuration

pub mod color;
pub mod controls;
pub mod error;
pub mod renderer;
pub mod settings;
pub mod shadow_api;
pub mod sim;

pub use color::Rgb;
pub use error::SimError;
pub use settings::{QualityPreset, Settings, ShadowAnchor};

use glam::Vec2;

/// Scene layout constants and control ranges
pub mod consts {
    use std::ops::RangeInclusive;

    /// Desktop canvas size
    pub const CANVAS_WIDTH: f32 = 800.0;
    pub const CANVAS_HEIGHT: f32 = 600.0;
    /// Viewports narrower than this use the mobile canvas
    pub const MOBILE_BREAKPOINT: f32 = 768.0;
    /// Mobile canvas is at most this wide (and exactly this tall)
    pub const MOBILE_CANVAS_SIZE: f32 = 400.0;
    /// Horizontal page padding subtracted from the viewport on mobile
    pub const MOBILE_PADDING: f32 = 32.0;

    /// Ground line of the light scene (y, pixels from top)
    pub const GROUND_Y: f32 = 500.0;
    /// Pendulum pivot height (the pivot is horizontally centered)
    pub const PIVOT_Y: f32 = 100.0;

    /// Entity count bounds per simulation
    pub const MAX_LIGHTS: usize = 3;
    pub const MAX_PENDULUMS: usize = 3;

    /// Stick defaults
    pub const STICK_X: f32 = 400.0;
    pub const STICK_HEIGHT: f32 = 150.0;
    pub const STICK_WIDTH: f32 = 8.0;

    /// Light defaults
    pub const LIGHT_X: f32 = 200.0;
    pub const LIGHT_Y: f32 = 150.0;
    pub const LIGHT_RADIUS: f32 = 20.0;
    /// Drawn diameter of a point light
    pub const POINT_LIGHT_DIAMETER: f32 = 16.0;

    /// Pendulum defaults
    pub const PENDULUM_ANGLE: f32 = std::f32::consts::FRAC_PI_4;
    pub const PENDULUM_LENGTH: f32 = 200.0;
    pub const PENDULUM_MASS: f32 = 1.0;
    pub const PENDULUM_DAMPING: f32 = 0.995;
    pub const PENDULUM_COLOR: crate::Rgb = crate::Rgb::new(0x3b, 0x82, 0xf6);

    /// Global pendulum parameters
    pub const GRAVITY: f32 = 0.5;
    pub const TIME_SCALE: f32 = 1.0;
    pub const TRAIL_CAPACITY: usize = 100;

    /// Extended light ring sample count
    pub const EXTENDED_LIGHT_SAMPLES: usize = 12;

    /// Extra pick tolerance around entities (pixels)
    pub const MOUSE_PICK_MARGIN: f32 = 10.0;
    pub const TOUCH_PICK_MARGIN: f32 = 20.0;

    /// Margin between the canvas edge and where lights may be placed
    pub const LIGHT_EDGE_MARGIN: f32 = 50.0;
    /// Margin between the canvas edge and where the stick may be placed
    pub const STICK_EDGE_MARGIN: f32 = 100.0;

    // Control ranges (enforced by the command layer, not by the physics)
    pub const INTENSITY_RANGE: RangeInclusive<f32> = 0.1..=1.0;
    pub const RADIUS_RANGE: RangeInclusive<f32> = 10.0..=50.0;
    pub const STICK_HEIGHT_RANGE: RangeInclusive<f32> = 50.0..=250.0;
    pub const LENGTH_RANGE: RangeInclusive<f32> = 50.0..=300.0;
    pub const MASS_RANGE: RangeInclusive<f32> = 0.1..=3.0;
    pub const DAMPING_RANGE: RangeInclusive<f32> = 0.95..=1.0;
    pub const GRAVITY_RANGE: RangeInclusive<f32> = 0.1..=2.0;
    pub const TIME_SCALE_RANGE: RangeInclusive<f32> = 0.1..=3.0;
    pub const TRAIL_RANGE: RangeInclusive<usize> = 20..=200;
}

/// Canvas dimensions in pixels
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct CanvasSize {
    pub width: f32,
    pub height: f32,
}

impl Default for CanvasSize {
    fn default() -> Self {
        Self {
            width: consts::CANVAS_WIDTH,
            height: consts::CANVAS_HEIGHT,
        }
    }
}

impl CanvasSize {
    /// Pick the canvas size for a viewport width (mobile layouts get a smaller canvas)
    pub fn for_viewport(viewport_width: f32) -> Self {
        use consts::*;
        if viewport_width < MOBILE_BREAKPOINT {
            Self {
                width: MOBILE_CANVAS_SIZE.min(viewport_width - MOBILE_PADDING),
                height: MOBILE_CANVAS_SIZE,
            }
        } else {
            Self::default()
        }
    }

    /// Whether this is the reduced mobile canvas
    pub fn is_mobile(&self) -> bool {
        self.width < consts::CANVAS_WIDTH
    }
}

/// Clamp into an inclusive range
#[inline]
pub fn clamp_to<T: PartialOrd + Copy>(value: T, range: &std::ops::RangeInclusive<T>) -> T {
    if value < *range.start() {
        *range.start()
    } else if value > *range.end() {
        *range.end()
    } else {
        value
    }
}

/// Position of a point hanging at `angle` from vertical (screen coords, y down)
#[inline]
pub fn hanging_point(pivot: Vec2, angle: f32, length: f32) -> Vec2 {
    pivot + Vec2::new(angle.sin(), angle.cos()) * length
}

/// Angle from vertical of `point` as seen from `pivot` (inverse of [`hanging_point`])
#[inline]
pub fn angle_from_pivot(pivot: Vec2, point: Vec2) -> f32 {
    let d = point - pivot;
    d.x.atan2(d.y)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::PI;

    #[test]
    fn test_canvas_for_viewport() {
        assert_eq!(CanvasSize::for_viewport(1280.0), CanvasSize::default());

        let phone = CanvasSize::for_viewport(375.0);
        assert_eq!(phone.width, 343.0);
        assert_eq!(phone.height, 400.0);
        assert!(phone.is_mobile());

        let tablet = CanvasSize::for_viewport(700.0);
        assert_eq!(tablet.width, 400.0);
    }

    #[test]
    fn test_hanging_point_roundtrip() {
        let pivot = Vec2::new(400.0, 100.0);
        let bob = hanging_point(pivot, 0.0, 200.0);
        assert!((bob - Vec2::new(400.0, 300.0)).length() < 1e-4);

        let bob = hanging_point(pivot, PI / 2.0, 200.0);
        assert!((bob - Vec2::new(600.0, 100.0)).length() < 1e-3);

        let angle = angle_from_pivot(pivot, hanging_point(pivot, -0.7, 150.0));
        assert!((angle + 0.7).abs() < 1e-5);
    }

    #[test]
    fn test_clamp_to() {
        assert_eq!(clamp_to(0.0, &consts::INTENSITY_RANGE), 0.1);
        assert_eq!(clamp_to(0.5, &consts::INTENSITY_RANGE), 0.5);
        assert_eq!(clamp_to(500, &consts::TRAIL_RANGE), 200);
    }
}
