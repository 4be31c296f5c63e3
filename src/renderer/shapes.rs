//! Shape tessellation for 2D primitives
//!
//! All generators append triangles in screen-space pixels; the pipeline
//! maps to NDC at upload time. Radial gradients are approximated with
//! per-vertex colors, which the GPU interpolates across each ring band.

use glam::Vec2;
use std::f32::consts::PI;

use super::vertex::Vertex;

/// Append triangles for a filled circle
pub fn circle(out: &mut Vec<Vertex>, center: Vec2, radius: f32, color: [f32; 4], segments: u32) {
    for i in 0..segments {
        let theta1 = (i as f32 / segments as f32) * 2.0 * PI;
        let theta2 = ((i + 1) as f32 / segments as f32) * 2.0 * PI;

        out.push(Vertex::new(center.x, center.y, color));
        out.push(Vertex::new(
            center.x + radius * theta1.cos(),
            center.y + radius * theta1.sin(),
            color,
        ));
        out.push(Vertex::new(
            center.x + radius * theta2.cos(),
            center.y + radius * theta2.sin(),
            color,
        ));
    }
}

/// Filled circle with a distinct center color: a cheap radial gradient
/// (highlight center, shaded edge)
pub fn shaded_circle(
    out: &mut Vec<Vertex>,
    center: Vec2,
    radius: f32,
    center_color: [f32; 4],
    edge_color: [f32; 4],
    segments: u32,
) {
    // Offset the highlight up-left like a lit sphere
    let hl = center + Vec2::new(-radius * 0.3, -radius * 0.32);
    for i in 0..segments {
        let theta1 = (i as f32 / segments as f32) * 2.0 * PI;
        let theta2 = ((i + 1) as f32 / segments as f32) * 2.0 * PI;

        out.push(Vertex::new(hl.x, hl.y, center_color));
        out.push(Vertex::new(
            center.x + radius * theta1.cos(),
            center.y + radius * theta1.sin(),
            edge_color,
        ));
        out.push(Vertex::new(
            center.x + radius * theta2.cos(),
            center.y + radius * theta2.sin(),
            edge_color,
        ));
    }
}

/// Filled circle fading from a center color to an edge color, centered
/// (no highlight offset)
pub fn fade_circle(
    out: &mut Vec<Vertex>,
    center: Vec2,
    radius: f32,
    center_color: [f32; 4],
    edge_color: [f32; 4],
    segments: u32,
) {
    for i in 0..segments {
        let theta1 = (i as f32 / segments as f32) * 2.0 * PI;
        let theta2 = ((i + 1) as f32 / segments as f32) * 2.0 * PI;

        out.push(Vertex::new(center.x, center.y, center_color));
        out.push(Vertex::new(
            center.x + radius * theta1.cos(),
            center.y + radius * theta1.sin(),
            edge_color,
        ));
        out.push(Vertex::new(
            center.x + radius * theta2.cos(),
            center.y + radius * theta2.sin(),
            edge_color,
        ));
    }
}

/// Append triangles for a ring (hollow circle)
pub fn ring(
    out: &mut Vec<Vertex>,
    center: Vec2,
    inner_radius: f32,
    outer_radius: f32,
    color: [f32; 4],
    segments: u32,
) {
    gradient_ring(out, center, inner_radius, outer_radius, color, color, segments);
}

/// Ring band with independent inner and outer colors; with a transparent
/// outer color this approximates a radial glow falloff
pub fn gradient_ring(
    out: &mut Vec<Vertex>,
    center: Vec2,
    inner_radius: f32,
    outer_radius: f32,
    inner_color: [f32; 4],
    outer_color: [f32; 4],
    segments: u32,
) {
    for i in 0..segments {
        let theta1 = (i as f32 / segments as f32) * 2.0 * PI;
        let theta2 = ((i + 1) as f32 / segments as f32) * 2.0 * PI;

        let inner1 = center + Vec2::new(inner_radius * theta1.cos(), inner_radius * theta1.sin());
        let outer1 = center + Vec2::new(outer_radius * theta1.cos(), outer_radius * theta1.sin());
        let inner2 = center + Vec2::new(inner_radius * theta2.cos(), inner_radius * theta2.sin());
        let outer2 = center + Vec2::new(outer_radius * theta2.cos(), outer_radius * theta2.sin());

        out.push(Vertex::new(inner1.x, inner1.y, inner_color));
        out.push(Vertex::new(outer1.x, outer1.y, outer_color));
        out.push(Vertex::new(inner2.x, inner2.y, inner_color));

        out.push(Vertex::new(inner2.x, inner2.y, inner_color));
        out.push(Vertex::new(outer1.x, outer1.y, outer_color));
        out.push(Vertex::new(outer2.x, outer2.y, outer_color));
    }
}

/// Soft glow around a body: a solid-to-transparent band from `inner_radius`
/// out to `outer_radius`
pub fn glow(
    out: &mut Vec<Vertex>,
    center: Vec2,
    inner_radius: f32,
    outer_radius: f32,
    color: [f32; 3],
    alpha: f32,
    segments: u32,
) {
    if outer_radius <= 0.0 || alpha <= 0.0 {
        return;
    }
    let inner = [color[0], color[1], color[2], alpha];
    let outer = [color[0], color[1], color[2], 0.0];
    circle(out, center, inner_radius, inner, segments);
    gradient_ring(out, center, inner_radius, outer_radius, inner, outer, segments);
}

/// Filled ellipse, rotated by `rotation` radians
pub fn ellipse(
    out: &mut Vec<Vertex>,
    center: Vec2,
    rx: f32,
    ry: f32,
    rotation: f32,
    color: [f32; 4],
    segments: u32,
) {
    let (sin_r, cos_r) = rotation.sin_cos();
    let point = |theta: f32| {
        let local = Vec2::new(rx * theta.cos(), ry * theta.sin());
        center + Vec2::new(local.x * cos_r - local.y * sin_r, local.x * sin_r + local.y * cos_r)
    };
    for i in 0..segments {
        let theta1 = (i as f32 / segments as f32) * 2.0 * PI;
        let theta2 = ((i + 1) as f32 / segments as f32) * 2.0 * PI;
        let p1 = point(theta1);
        let p2 = point(theta2);
        out.push(Vertex::new(center.x, center.y, color));
        out.push(Vertex::new(p1.x, p1.y, color));
        out.push(Vertex::new(p2.x, p2.y, color));
    }
}

/// Hollow ellipse band (planet rings)
pub fn ellipse_ring(
    out: &mut Vec<Vertex>,
    center: Vec2,
    rx: f32,
    ry: f32,
    rotation: f32,
    thickness: f32,
    color: [f32; 4],
    segments: u32,
) {
    let (sin_r, cos_r) = rotation.sin_cos();
    let point = |theta: f32, grow: f32| {
        let local = Vec2::new((rx + grow) * theta.cos(), (ry + grow) * theta.sin());
        center + Vec2::new(local.x * cos_r - local.y * sin_r, local.x * sin_r + local.y * cos_r)
    };
    let half = thickness * 0.5;
    for i in 0..segments {
        let theta1 = (i as f32 / segments as f32) * 2.0 * PI;
        let theta2 = ((i + 1) as f32 / segments as f32) * 2.0 * PI;

        let inner1 = point(theta1, -half);
        let outer1 = point(theta1, half);
        let inner2 = point(theta2, -half);
        let outer2 = point(theta2, half);

        out.push(Vertex::new(inner1.x, inner1.y, color));
        out.push(Vertex::new(outer1.x, outer1.y, color));
        out.push(Vertex::new(inner2.x, inner2.y, color));

        out.push(Vertex::new(inner2.x, inner2.y, color));
        out.push(Vertex::new(outer1.x, outer1.y, color));
        out.push(Vertex::new(outer2.x, outer2.y, color));
    }
}

/// Stroke a polyline as connected quads
pub fn polyline(out: &mut Vec<Vertex>, points: &[Vec2], width: f32, color: [f32; 4]) {
    if points.len() < 2 {
        return;
    }
    let half = width * 0.5;
    for pair in points.windows(2) {
        let dir = (pair[1] - pair[0]).normalize_or_zero();
        let perp = Vec2::new(-dir.y, dir.x) * half;

        let a1 = pair[0] + perp;
        let a2 = pair[0] - perp;
        let b1 = pair[1] + perp;
        let b2 = pair[1] - perp;

        out.push(Vertex::new(a1.x, a1.y, color));
        out.push(Vertex::new(a2.x, a2.y, color));
        out.push(Vertex::new(b1.x, b1.y, color));

        out.push(Vertex::new(b1.x, b1.y, color));
        out.push(Vertex::new(a2.x, a2.y, color));
        out.push(Vertex::new(b2.x, b2.y, color));
    }
}

/// Axis-aligned quad with independent top and bottom colors (vertical
/// gradient bands)
pub fn vertical_gradient_quad(
    out: &mut Vec<Vertex>,
    x0: f32,
    y0: f32,
    x1: f32,
    y1: f32,
    top_color: [f32; 4],
    bottom_color: [f32; 4],
) {
    out.push(Vertex::new(x0, y0, top_color));
    out.push(Vertex::new(x1, y0, top_color));
    out.push(Vertex::new(x0, y1, bottom_color));

    out.push(Vertex::new(x0, y1, bottom_color));
    out.push(Vertex::new(x1, y0, top_color));
    out.push(Vertex::new(x1, y1, bottom_color));
}

/// Clamp every vertex from `start` onward to lie right of `clip_x`.
/// Triangles fully left of the boundary collapse to zero area; partially
/// clipped ones get flattened against it, which reads as a hard clip edge.
pub fn clamp_left(vertices: &mut [Vertex], start: usize, clip_x: f32) {
    for v in &mut vertices[start..] {
        if v.position[0] < clip_x {
            v.position[0] = clip_x;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_circle_triangle_count() {
        let mut out = Vec::new();
        circle(&mut out, Vec2::ZERO, 10.0, [1.0; 4], 16);
        assert_eq!(out.len(), 16 * 3);
    }

    #[test]
    fn test_gradient_ring_colors() {
        let mut out = Vec::new();
        gradient_ring(
            &mut out,
            Vec2::ZERO,
            5.0,
            10.0,
            [1.0, 1.0, 1.0, 1.0],
            [1.0, 1.0, 1.0, 0.0],
            8,
        );
        assert_eq!(out.len(), 8 * 6);
        // Inner vertices opaque, outer transparent
        assert_eq!(out[0].color[3], 1.0);
        assert_eq!(out[1].color[3], 0.0);
    }

    #[test]
    fn test_clamp_left_flattens_overhang() {
        let mut out = Vec::new();
        circle(&mut out, Vec2::ZERO, 10.0, [1.0; 4], 8);
        clamp_left(&mut out, 0, -5.0);
        assert!(out.iter().all(|v| v.position[0] >= -5.0));
        // Rightward geometry untouched
        assert!(out.iter().any(|v| v.position[0] > 5.0));
    }

    #[test]
    fn test_polyline_needs_two_points() {
        let mut out = Vec::new();
        polyline(&mut out, &[Vec2::ZERO], 2.0, [1.0; 4]);
        assert!(out.is_empty());
        polyline(&mut out, &[Vec2::ZERO, Vec2::new(10.0, 0.0)], 2.0, [1.0; 4]);
        assert_eq!(out.len(), 6);
    }
}
