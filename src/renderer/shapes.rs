//! Shape generation for 2D primitives
//!
//! Everything is a triangle list in canvas pixels (y down).

use glam::Vec2;
use std::f32::consts::PI;

use super::vertex::Vertex;
use crate::hanging_point;

/// Generate vertices for a filled ellipse with radii `radii`
pub fn ellipse(center: Vec2, radii: Vec2, color: [f32; 4], segments: u32) -> Vec<Vertex> {
    let mut vertices = Vec::with_capacity((segments * 3) as usize);

    for i in 0..segments {
        let theta1 = (i as f32 / segments as f32) * 2.0 * PI;
        let theta2 = ((i + 1) as f32 / segments as f32) * 2.0 * PI;

        // Triangle from center to edge
        vertices.push(Vertex::new(center.x, center.y, color));
        vertices.push(Vertex::new(
            center.x + radii.x * theta1.cos(),
            center.y + radii.y * theta1.sin(),
            color,
        ));
        vertices.push(Vertex::new(
            center.x + radii.x * theta2.cos(),
            center.y + radii.y * theta2.sin(),
            color,
        ));
    }

    vertices
}

/// Generate vertices for a filled circle
pub fn circle(center: Vec2, radius: f32, color: [f32; 4], segments: u32) -> Vec<Vertex> {
    ellipse(center, Vec2::splat(radius), color, segments)
}

/// Generate vertices for a ring (hollow circle)
pub fn ring(
    center: Vec2,
    inner_radius: f32,
    outer_radius: f32,
    color: [f32; 4],
    segments: u32,
) -> Vec<Vertex> {
    let mut vertices = Vec::with_capacity((segments * 6) as usize);

    for i in 0..segments {
        let theta1 = (i as f32 / segments as f32) * 2.0 * PI;
        let theta2 = ((i + 1) as f32 / segments as f32) * 2.0 * PI;

        let dir1 = Vec2::new(theta1.cos(), theta1.sin());
        let dir2 = Vec2::new(theta2.cos(), theta2.sin());
        let (inner1, outer1) = (center + dir1 * inner_radius, center + dir1 * outer_radius);
        let (inner2, outer2) = (center + dir2 * inner_radius, center + dir2 * outer_radius);

        // Two triangles per segment
        vertices.extend(quad(inner1, outer1, outer2, inner2, color));
    }

    vertices
}

/// Two triangles covering the convex quad `a b c d` (in winding order)
pub fn quad(a: Vec2, b: Vec2, c: Vec2, d: Vec2, color: [f32; 4]) -> [Vertex; 6] {
    [
        Vertex::new(a.x, a.y, color),
        Vertex::new(b.x, b.y, color),
        Vertex::new(c.x, c.y, color),
        Vertex::new(a.x, a.y, color),
        Vertex::new(c.x, c.y, color),
        Vertex::new(d.x, d.y, color),
    ]
}

/// Axis-aligned rectangle from its top-left corner
pub fn rect(min: Vec2, size: Vec2, color: [f32; 4]) -> [Vertex; 6] {
    let max = min + size;
    quad(min, Vec2::new(max.x, min.y), max, Vec2::new(min.x, max.y), color)
}

/// Line segment drawn as a quad `width` pixels wide
pub fn line(from: Vec2, to: Vec2, width: f32, color: [f32; 4]) -> [Vertex; 6] {
    let dir = (to - from).normalize_or_zero();
    let perp = Vec2::new(-dir.y, dir.x) * (width / 2.0);
    quad(from + perp, to + perp, to - perp, from - perp, color)
}

/// Stroked circular arc around `center`, with angles measured from straight
/// down like a pendulum (positive toward +x)
pub fn arc_stroke(
    center: Vec2,
    radius: f32,
    width: f32,
    from_angle: f32,
    to_angle: f32,
    color: [f32; 4],
    segments_per_radian: f32,
) -> Vec<Vertex> {
    let span = to_angle - from_angle;
    let num_segments = ((span.abs() * segments_per_radian) as u32).max(1);
    let (inner_r, outer_r) = (radius - width / 2.0, radius + width / 2.0);

    let mut vertices = Vec::with_capacity((num_segments * 6) as usize);
    for i in 0..num_segments {
        let theta1 = from_angle + span * i as f32 / num_segments as f32;
        let theta2 = from_angle + span * (i + 1) as f32 / num_segments as f32;
        vertices.extend(quad(
            hanging_point(center, theta1, inner_r),
            hanging_point(center, theta1, outer_r),
            hanging_point(center, theta2, outer_r),
            hanging_point(center, theta2, inner_r),
            color,
        ));
    }
    vertices
}

/// Polyline whose segment alpha ramps from 0 at the oldest point to
/// `max_alpha` (0-255 scale) at the newest
pub fn fading_polyline(
    points: &[Vec2],
    width: f32,
    rgb: crate::Rgb,
    max_alpha: f32,
) -> Vec<Vertex> {
    if points.len() < 2 {
        return Vec::new();
    }

    let len = points.len() as f32;
    points
        .windows(2)
        .enumerate()
        .flat_map(|(i, pair)| {
            let alpha = i as f32 / len * max_alpha;
            line(pair[0], pair[1], width, rgb.with_alpha(alpha))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const RED: [f32; 4] = [1.0, 0.0, 0.0, 1.0];

    fn bounds(vertices: &[Vertex]) -> (Vec2, Vec2) {
        vertices.iter().fold(
            (Vec2::splat(f32::MAX), Vec2::splat(f32::MIN)),
            |(lo, hi), v| {
                let p = Vec2::from(v.position);
                (lo.min(p), hi.max(p))
            },
        )
    }

    #[test]
    fn test_ellipse_extent() {
        let v = ellipse(Vec2::new(400.0, 500.0), Vec2::new(75.0, 25.0), RED, 32);
        assert_eq!(v.len(), 96);
        let (lo, hi) = bounds(&v);
        assert!((lo - Vec2::new(325.0, 475.0)).length() < 1e-3);
        assert!((hi - Vec2::new(475.0, 525.0)).length() < 1e-3);
    }

    #[test]
    fn test_line_width() {
        let v = line(Vec2::new(0.0, 0.0), Vec2::new(0.0, 100.0), 8.0, RED);
        let (lo, hi) = bounds(&v);
        assert_eq!(lo, Vec2::new(-4.0, 0.0));
        assert_eq!(hi, Vec2::new(4.0, 100.0));
    }

    #[test]
    fn test_rect() {
        let v = rect(Vec2::new(380.0, 95.0), Vec2::new(40.0, 10.0), RED);
        let (lo, hi) = bounds(&v);
        assert_eq!(lo, Vec2::new(380.0, 95.0));
        assert_eq!(hi, Vec2::new(420.0, 105.0));
    }

    #[test]
    fn test_arc_starts_straight_down() {
        let center = Vec2::new(400.0, 100.0);
        let v = arc_stroke(center, 80.0, 2.0, 0.0, PI / 2.0, RED, 16.0);
        assert!(!v.is_empty());
        // First vertex on the inner radius, directly below the center
        assert!((Vec2::from(v[0].position) - Vec2::new(400.0, 179.0)).length() < 1e-3);
        let (_, hi) = bounds(&v);
        assert!((hi.x - 481.0).abs() < 1e-3);
    }

    #[test]
    fn test_fading_polyline_alpha_ramp() {
        let points: Vec<Vec2> = (0..5).map(|i| Vec2::new(i as f32 * 10.0, 0.0)).collect();
        let v = fading_polyline(&points, 1.0, crate::Rgb::WHITE, 100.0);
        assert_eq!(v.len(), 4 * 6);
        assert_eq!(v[0].color[3], 0.0);
        let last = v[v.len() - 1].color[3];
        assert!((last - 60.0 / 255.0).abs() < 1e-6);
        assert!(fading_polyline(&points[..1], 1.0, crate::Rgb::WHITE, 100.0).is_empty());
    }
}
