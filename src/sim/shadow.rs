//! Shadow-casting geometry
//!
//! Similar triangles: a light at (lx, ly) and a stick of height `h` standing
//! at `ox` on the ground line throw a shadow of length `h * |dx| / dy` away
//! from the light, where `dx = ox - lx` and `dy` is the vertical distance from
//! the light down to the anchor line (the ground, or the stick top).
//! Lights at or below the anchor line (`dy <= 0`) cast nothing.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::light::{LightSource, Stick};
use crate::settings::ShadowAnchor;

/// Width of the shadow's far end relative to the stick width
const END_WIDTH_FACTOR: f32 = 2.0;

/// Minimum umbra width (pixels) for it to count as present
const MIN_UMBRA_WIDTH: f32 = 1.0;

/// A point shadow on the ground line
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointShadow {
    /// Shadow starts at the stick base
    pub start: f32,
    /// Far end on the ground (x)
    pub end: f32,
    /// Unsigned length `|end - start|`
    pub length: f32,
}

/// Cast a shadow from a point light. `None` when `dy <= 0`.
pub fn point_shadow(
    light: Vec2,
    stick: &Stick,
    ground_y: f32,
    anchor: ShadowAnchor,
) -> Option<PointShadow> {
    let dx = stick.x - light.x;
    let anchor_y = match anchor {
        ShadowAnchor::Ground => ground_y,
        ShadowAnchor::ObstacleTop => ground_y - stick.height,
    };
    let dy = anchor_y - light.y;
    if dy <= 0.0 {
        return None;
    }

    let length = stick.height * dx.abs() / dy;
    // Extends away from the light (a light directly overhead gives zero length)
    let end = stick.x + dx.signum() * length;
    Some(PointShadow {
        start: stick.x,
        end,
        length,
    })
}

/// Ground footprint of one shadow contribution, ready for blending
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShadowQuad {
    /// Near edge, centered on the stick base: (left x, right x)
    pub base: (f32, f32),
    /// Far edge, centered on the shadow end: (left x, right x)
    pub tip: (f32, f32),
    /// Ground line the quad lies on
    pub ground_y: f32,
    /// Share of the light's intensity carried by this contribution
    pub intensity: f32,
}

impl ShadowQuad {
    fn from_shadow(shadow: &PointShadow, stick: &Stick, ground_y: f32, intensity: f32) -> Self {
        let half_base = stick.width / 2.0;
        let half_tip = stick.width * END_WIDTH_FACTOR / 2.0;
        Self {
            base: (shadow.start - half_base, shadow.start + half_base),
            tip: (shadow.end - half_tip, shadow.end + half_tip),
            ground_y,
            intensity,
        }
    }

    /// Fill alpha on the 0-255 scale
    pub fn alpha(&self) -> f32 {
        80.0 * self.intensity
    }
}

/// All shadow contributions of one light (index into the scene's light list)
#[derive(Debug, Clone, PartialEq)]
pub struct LightShadows {
    pub light_index: usize,
    pub quads: Vec<ShadowQuad>,
}

/// Cast shadows for a light: one quad for a point light, up to
/// `EXTENDED_LIGHT_SAMPLES` superposed quads for an extended light.
/// Samples at or below the anchor line contribute nothing.
pub fn cast_shadows(
    light: &LightSource,
    stick: &Stick,
    ground_y: f32,
    anchor: ShadowAnchor,
) -> Vec<ShadowQuad> {
    light
        .samples()
        .into_iter()
        .filter_map(|(pos, intensity)| {
            point_shadow(pos, stick, ground_y, anchor)
                .map(|s| ShadowQuad::from_shadow(&s, stick, ground_y, intensity))
        })
        .collect()
}

/// Umbra and penumbra span of an extended light on the ground
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ShadowExtent {
    pub umbra_start: f32,
    pub umbra_end: f32,
    pub penumbra_left: f32,
    pub penumbra_right: f32,
    pub has_umbra: bool,
}

/// Bound the umbra/penumbra of an extended light by the shadows of the
/// disk's left and right edges. `None` if either edge casts no shadow.
pub fn extended_extent(
    light: &LightSource,
    stick: &Stick,
    ground_y: f32,
    anchor: ShadowAnchor,
) -> Option<ShadowExtent> {
    let left = point_shadow(light.pos - Vec2::X * light.radius, stick, ground_y, anchor)?;
    let right = point_shadow(light.pos + Vec2::X * light.radius, stick, ground_y, anchor)?;

    let lo = left.end.min(right.end);
    let hi = left.end.max(right.end);
    let ox = stick.x;

    let extent = if (stick.x - light.pos.x).abs() < light.radius {
        // Disk straddles the stick: every ground point still sees part of it
        ShadowExtent {
            umbra_start: ox,
            umbra_end: ox,
            penumbra_left: lo,
            penumbra_right: hi,
            has_umbra: false,
        }
    } else if light.pos.x < ox {
        ShadowExtent {
            umbra_start: ox,
            umbra_end: lo,
            penumbra_left: ox,
            penumbra_right: hi,
            has_umbra: false,
        }
    } else {
        ShadowExtent {
            umbra_start: hi,
            umbra_end: ox,
            penumbra_left: lo,
            penumbra_right: ox,
            has_umbra: false,
        }
    };

    Some(ShadowExtent {
        has_umbra: (extent.umbra_end - extent.umbra_start).abs() > MIN_UMBRA_WIDTH,
        ..extent
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::GROUND_Y;
    use proptest::prelude::*;

    fn stick(x: f32, height: f32) -> Stick {
        Stick {
            x,
            height,
            ..Default::default()
        }
    }

    #[test]
    fn test_reference_shadow() {
        // Light (200,150), stick x=400 h=150, ground 500
        let s = point_shadow(
            Vec2::new(200.0, 150.0),
            &stick(400.0, 150.0),
            GROUND_Y,
            ShadowAnchor::Ground,
        )
        .unwrap();
        assert!((s.length - 85.714_29).abs() < 1e-3);
        assert!((s.end - 485.714_29).abs() < 1e-3);
        assert_eq!(s.start, 400.0);
    }

    #[test]
    fn test_shadow_points_away_from_light() {
        let s = point_shadow(
            Vec2::new(600.0, 150.0),
            &stick(400.0, 150.0),
            GROUND_Y,
            ShadowAnchor::Ground,
        )
        .unwrap();
        assert!((s.end - 314.285_7).abs() < 1e-3);
        assert!(s.length > 0.0);
    }

    #[test]
    fn test_light_overhead_has_zero_length() {
        let s = point_shadow(
            Vec2::new(400.0, 100.0),
            &stick(400.0, 150.0),
            GROUND_Y,
            ShadowAnchor::Ground,
        )
        .unwrap();
        assert_eq!(s.length, 0.0);
        assert_eq!(s.end, 400.0);
    }

    #[test]
    fn test_no_shadow_at_or_below_ground() {
        let st = stick(400.0, 150.0);
        for y in [GROUND_Y, GROUND_Y + 10.0] {
            assert!(point_shadow(Vec2::new(200.0, y), &st, GROUND_Y, ShadowAnchor::Ground).is_none());
        }
    }

    #[test]
    fn test_obstacle_anchor() {
        let st = stick(400.0, 150.0);
        // Exact similar triangles: 150 * 200 / (350 - 150) = 150
        let s = point_shadow(Vec2::new(200.0, 150.0), &st, GROUND_Y, ShadowAnchor::ObstacleTop)
            .unwrap();
        assert!((s.length - 150.0).abs() < 1e-3);

        // Light below the stick top casts nothing in this variant
        assert!(
            point_shadow(Vec2::new(200.0, 360.0), &st, GROUND_Y, ShadowAnchor::ObstacleTop)
                .is_none()
        );
    }

    #[test]
    fn test_cast_point_light_quad() {
        let quads = cast_shadows(
            &LightSource::default(),
            &Stick::default(),
            GROUND_Y,
            ShadowAnchor::Ground,
        );
        assert_eq!(quads.len(), 1);
        let q = quads[0];
        assert_eq!(q.base, (396.0, 404.0));
        assert!((q.tip.0 - 477.714_3).abs() < 1e-3);
        assert!((q.tip.1 - 493.714_3).abs() < 1e-3);
        assert_eq!(q.alpha(), 80.0);
    }

    #[test]
    fn test_cast_extended_light_quads() {
        let light = LightSource {
            extended: true,
            radius: 20.0,
            ..Default::default()
        };
        let quads = cast_shadows(&light, &Stick::default(), GROUND_Y, ShadowAnchor::Ground);
        assert_eq!(quads.len(), 12);
        let total: f32 = quads.iter().map(|q| q.intensity).sum();
        assert!((total - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_extended_light_partially_below_ground() {
        // Center 5px above the ground, radius 20: only the upper samples cast
        let light = LightSource {
            pos: Vec2::new(200.0, GROUND_Y - 5.0),
            extended: true,
            radius: 20.0,
            ..Default::default()
        };
        let quads = cast_shadows(&light, &Stick::default(), GROUND_Y, ShadowAnchor::Ground);
        assert!(!quads.is_empty());
        assert!(quads.len() < 12);
        for q in &quads {
            assert!(q.tip.0.is_finite() && q.tip.1.is_finite());
        }
    }

    #[test]
    fn test_extended_extent_left_light() {
        let light = LightSource {
            extended: true,
            radius: 20.0,
            ..Default::default()
        };
        let e = extended_extent(&light, &Stick::default(), GROUND_Y, ShadowAnchor::Ground).unwrap();
        // Right edge (220) is closer: 150*180/350; left edge (180): 150*220/350
        assert_eq!(e.umbra_start, 400.0);
        assert!((e.umbra_end - (400.0 + 150.0 * 180.0 / 350.0)).abs() < 1e-3);
        assert_eq!(e.penumbra_left, 400.0);
        assert!((e.penumbra_right - (400.0 + 150.0 * 220.0 / 350.0)).abs() < 1e-3);
        assert!(e.has_umbra);
    }

    #[test]
    fn test_extended_extent_right_light_mirrors() {
        let light = LightSource {
            pos: Vec2::new(600.0, 150.0),
            extended: true,
            radius: 20.0,
            ..Default::default()
        };
        let e = extended_extent(&light, &Stick::default(), GROUND_Y, ShadowAnchor::Ground).unwrap();
        assert_eq!(e.umbra_end, 400.0);
        assert_eq!(e.penumbra_right, 400.0);
        assert!(e.penumbra_left < e.umbra_start);
        assert!(e.umbra_start < 400.0);
    }

    #[test]
    fn test_extended_extent_straddling_light() {
        let light = LightSource {
            pos: Vec2::new(410.0, 150.0),
            extended: true,
            radius: 30.0,
            ..Default::default()
        };
        let e = extended_extent(&light, &Stick::default(), GROUND_Y, ShadowAnchor::Ground).unwrap();
        assert!(!e.has_umbra);
        assert!(e.penumbra_left < 400.0 && e.penumbra_right > 400.0);
    }

    #[test]
    fn test_extended_extent_invisible_below_ground() {
        let light = LightSource {
            pos: Vec2::new(200.0, GROUND_Y + 1.0),
            extended: true,
            ..Default::default()
        };
        assert!(extended_extent(&light, &Stick::default(), GROUND_Y, ShadowAnchor::Ground).is_none());
    }

    proptest! {
        #[test]
        fn prop_length_matches_similar_triangles(
            lx in 0.0f32..800.0,
            ly in 0.0f32..499.0,
            ox in 100.0f32..700.0,
            h in 50.0f32..250.0,
        ) {
            let s = point_shadow(Vec2::new(lx, ly), &stick(ox, h), GROUND_Y, ShadowAnchor::Ground)
                .unwrap();
            let expected = h * (ox - lx).abs() / (GROUND_Y - ly);
            prop_assert!((s.length - expected).abs() <= 1e-3 * expected.max(1.0));
            prop_assert!(((s.end - s.start).abs() - s.length).abs() <= 1e-3 * s.length.max(1.0));
        }

        #[test]
        fn prop_length_scales_linearly(
            lx in 0.0f32..300.0,
            ly in 50.0f32..450.0,
            h in 50.0f32..120.0,
        ) {
            let light = Vec2::new(lx, ly);
            let base = point_shadow(light, &stick(400.0, h), GROUND_Y, ShadowAnchor::Ground).unwrap();

            // Doubling the height doubles the length
            let tall = point_shadow(light, &stick(400.0, 2.0 * h), GROUND_Y, ShadowAnchor::Ground)
                .unwrap();
            prop_assert!((tall.length - 2.0 * base.length).abs() <= 1e-3 * base.length.max(1.0));

            // Doubling the horizontal offset doubles the length
            let dx = 400.0 - lx;
            let far = point_shadow(
                Vec2::new(400.0 - 2.0 * dx, ly),
                &stick(400.0, h),
                GROUND_Y,
                ShadowAnchor::Ground,
            )
            .unwrap();
            prop_assert!((far.length - 2.0 * base.length).abs() <= 1e-3 * base.length.max(1.0));

            // Doubling the vertical distance halves the length
            let dy = GROUND_Y - ly;
            let high = point_shadow(
                Vec2::new(lx, GROUND_Y - 2.0 * dy),
                &stick(400.0, h),
                GROUND_Y,
                ShadowAnchor::Ground,
            )
            .unwrap();
            prop_assert!((2.0 * high.length - base.length).abs() <= 1e-3 * base.length.max(1.0));
        }

        #[test]
        fn prop_no_geometry_below_ground(lx in 0.0f32..800.0, below in 0.0f32..100.0) {
            let light = LightSource::at(Vec2::new(lx, GROUND_Y + below));
            prop_assert!(cast_shadows(&light, &Stick::default(), GROUND_Y, ShadowAnchor::Ground).is_empty());
        }
    }
}
