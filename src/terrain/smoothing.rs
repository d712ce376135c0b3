use super::HexCoord;
use super::hex::hex_center;
use crate::rng::Mulberry32;
use glam::DVec2;
use std::f64::consts::{FRAC_PI_2, PI};

/// Pixel-space polyline produced from a hex path
pub type PixelPolyline = Vec<DVec2>;

/// Subdivide every hex-to-hex edge of `path` into `segments + 1` points and
/// push interior points sideways by `(rand - 0.5) * curvature * sin(t * pi)`.
///
/// Each edge contributes both of its endpoints, so shared centers appear
/// twice and the result has `(len - 1) * (segments + 1)` points. Only
/// interior points draw from `rng`. A `segments` of zero is treated as one.
pub fn smooth_path(
    path: &[HexCoord],
    rng: &mut Mulberry32,
    curvature: f64,
    segments: u32,
    scale: f64,
) -> PixelPolyline {
    let segments = segments.max(1);
    let mut points = Vec::with_capacity(path.len().saturating_sub(1) * (segments as usize + 1));

    for edge in path.windows(2) {
        let start = hex_center(edge[0], scale);
        let end = hex_center(edge[1], scale);
        let delta = end - start;
        let normal = DVec2::from_angle(delta.y.atan2(delta.x) + FRAC_PI_2);

        for j in 0..=segments {
            let t = j as f64 / segments as f64;
            let mut point = start * (1.0 - t) + end * t;

            if j > 0 && j < segments {
                let offset = rng.centered() * curvature * (t * PI).sin();
                point += normal * offset;
            }
            points.push(point);
        }
    }

    points
}

/// Shift every point of `points` by `offset` pixels along the normal of the
/// straight line from its first to its last point. Paths with fewer than two
/// points are returned unchanged.
pub fn offset_path(points: &[DVec2], offset: f64) -> PixelPolyline {
    if points.len() < 2 {
        return points.to_vec();
    }

    let delta = points[points.len() - 1] - points[0];
    let length = match delta.length() {
        l if l > 0.0 => l,
        _ => 1.0,
    };
    let normal = delta.perp() / length;

    points.iter().map(|&p| p + normal * offset).collect()
}
