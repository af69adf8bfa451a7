//! Light sources and the shadow-casting stick

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::color::Rgb;
use crate::consts::*;

/// A point or extended (disk) light
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LightSource {
    pub pos: Vec2,
    pub color: Rgb,
    /// 0.1 - 1.0
    pub intensity: f32,
    /// Extended lights are sampled around a disk of `radius`
    pub extended: bool,
    pub radius: f32,
}

impl Default for LightSource {
    fn default() -> Self {
        Self::at(Vec2::new(LIGHT_X, LIGHT_Y))
    }
}

impl LightSource {
    /// Default white point light at `pos`
    pub fn at(pos: Vec2) -> Self {
        Self {
            pos,
            color: Rgb::WHITE,
            intensity: 1.0,
            extended: false,
            radius: LIGHT_RADIUS,
        }
    }

    /// Radius of the drawn light (and of its pick target)
    pub fn visual_radius(&self) -> f32 {
        if self.extended {
            self.radius
        } else {
            POINT_LIGHT_DIAMETER / 2.0
        }
    }

    /// Sample points approximating the light: the center for a point light,
    /// a ring of `EXTENDED_LIGHT_SAMPLES` points on the rim for an extended one.
    /// Each sample carries its share of the intensity.
    pub fn samples(&self) -> Vec<(Vec2, f32)> {
        if !self.extended {
            return vec![(self.pos, self.intensity)];
        }
        let n = EXTENDED_LIGHT_SAMPLES;
        let share = self.intensity / n as f32;
        (0..n)
            .map(|i| {
                let angle = i as f32 / n as f32 * std::f32::consts::TAU;
                (self.pos + Vec2::new(angle.cos(), angle.sin()) * self.radius, share)
            })
            .collect()
    }
}

/// The opaque vertical obstacle standing on the ground line
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stick {
    /// Horizontal position of the base center
    pub x: f32,
    pub width: f32,
    pub height: f32,
}

impl Default for Stick {
    fn default() -> Self {
        Self {
            x: STICK_X,
            width: STICK_WIDTH,
            height: STICK_HEIGHT,
        }
    }
}

impl Stick {
    /// Base center on the given ground line
    pub fn base(&self, ground_y: f32) -> Vec2 {
        Vec2::new(self.x, ground_y)
    }

    /// Top of the stick
    pub fn top(&self, ground_y: f32) -> Vec2 {
        Vec2::new(self.x, ground_y - self.height)
    }

    /// Bounding box (min, max) in screen coordinates
    pub fn bounds(&self, ground_y: f32) -> (Vec2, Vec2) {
        let half = self.width / 2.0;
        (
            Vec2::new(self.x - half, ground_y - self.height),
            Vec2::new(self.x + half, ground_y),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_point_light_single_sample() {
        let light = LightSource::default();
        let samples = light.samples();
        assert_eq!(samples.len(), 1);
        assert_eq!(samples[0], (Vec2::new(200.0, 150.0), 1.0));
    }

    #[test]
    fn test_extended_light_ring() {
        let light = LightSource {
            extended: true,
            radius: 30.0,
            intensity: 0.6,
            ..Default::default()
        };
        let samples = light.samples();
        assert_eq!(samples.len(), EXTENDED_LIGHT_SAMPLES);

        let total: f32 = samples.iter().map(|(_, i)| i).sum();
        assert!((total - 0.6).abs() < 1e-5);

        for (p, _) in &samples {
            assert!(((*p - light.pos).length() - 30.0).abs() < 1e-3);
        }
        // First sample sits on the +x rim
        assert!((samples[0].0 - Vec2::new(230.0, 150.0)).length() < 1e-3);
    }

    #[test]
    fn test_stick_bounds() {
        let stick = Stick::default();
        let (min, max) = stick.bounds(GROUND_Y);
        assert_eq!(min, Vec2::new(396.0, 350.0));
        assert_eq!(max, Vec2::new(404.0, 500.0));
        assert_eq!(stick.top(GROUND_Y), Vec2::new(400.0, 350.0));
    }
}
