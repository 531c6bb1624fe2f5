//! Signed distance functions for the kernel's primitives.
//!
//! All 3D primitives live in their local frame: centered at the origin with
//! their axis along +Z. Placement happens through a rigid transform node.
//! Negative inside, zero on the surface, positive outside.

use std::f64::consts::PI;

use nalgebra::{Vector2, Vector3};

/// Exact distance to an axis-aligned box with `half_extents`.
pub fn sdf_box(p: Vector3<f64>, half_extents: Vector3<f64>) -> f64 {
    let d = p.abs() - half_extents;
    let outside = Vector3::new(d.x.max(0.0), d.y.max(0.0), d.z.max(0.0)).norm();
    let inside = d.x.max(d.y).max(d.z).min(0.0);
    outside + inside
}

/// Exact distance to a capped cylinder along Z, spanning `±half_height`.
pub fn sdf_cylinder(p: Vector3<f64>, radius: f64, half_height: f64) -> f64 {
    let d_radial = Vector2::new(p.x, p.y).norm() - radius;
    let d_axial = p.z.abs() - half_height;
    combine_extrusion(d_radial, d_axial)
}

/// Exact distance to a torus around the Z axis (tube center circle in XY).
pub fn sdf_torus(p: Vector3<f64>, major_radius: f64, minor_radius: f64) -> f64 {
    let q_x = Vector2::new(p.x, p.y).norm() - major_radius;
    Vector2::new(q_x, p.z).norm() - minor_radius
}

/// Exact distance to a truncated cone along Z: radius `r_bottom` at
/// `z = -half_height`, `r_top` at `z = +half_height`.
pub fn sdf_cone(p: Vector3<f64>, r_bottom: f64, r_top: f64, half_height: f64) -> f64 {
    // Quilez, capped cone in (radial, axial) half-plane.
    let q = Vector2::new(Vector2::new(p.x, p.y).norm(), p.z);
    let k1 = Vector2::new(r_top, half_height);
    let k2 = Vector2::new(r_top - r_bottom, 2.0 * half_height);
    let cap_r = if q.y < 0.0 { r_bottom } else { r_top };
    let ca = Vector2::new(q.x - q.x.min(cap_r), q.y.abs() - half_height);
    let t = ((k1 - q).dot(&k2) / k2.dot(&k2)).clamp(0.0, 1.0);
    let cb = q - k1 + k2 * t;
    let sign = if cb.x < 0.0 && ca.y < 0.0 { -1.0 } else { 1.0 };
    sign * ca.norm_squared().min(cb.norm_squared()).sqrt()
}

/// Combine a 2D profile distance with an axial slab distance into the
/// distance of the extruded solid.
pub fn combine_extrusion(d_profile: f64, d_axial: f64) -> f64 {
    if d_profile > 0.0 && d_axial > 0.0 {
        (d_profile * d_profile + d_axial * d_axial).sqrt()
    } else {
        d_profile.max(d_axial)
    }
}

// ---------------------------------------------------------------------------
// 2D profiles
// ---------------------------------------------------------------------------

pub fn sdf_circle(p: Vector2<f64>, center: Vector2<f64>, radius: f64) -> f64 {
    (p - center).norm() - radius
}

/// Exact distance to a rectangle with rounded corners. The rounding stays
/// inside the `half_extents` outline.
pub fn sdf_rounded_rect(
    p: Vector2<f64>,
    center: Vector2<f64>,
    half_extents: Vector2<f64>,
    corner_radius: f64,
) -> f64 {
    let r = corner_radius.min(half_extents.x).min(half_extents.y).max(0.0);
    let d = (p - center).abs() - half_extents + Vector2::new(r, r);
    let outside = Vector2::new(d.x.max(0.0), d.y.max(0.0)).norm();
    let inside = d.x.max(d.y).min(0.0);
    outside + inside - r
}

/// Distance bound to a regular polygon with `sides` edges, circumradius
/// `circumradius`, and its first vertex at angle `rotation` (radians).
///
/// Exact inside; outside it is the largest edge-line distance, which never
/// exceeds the true distance.
pub fn sdf_regular_polygon(
    p: Vector2<f64>,
    center: Vector2<f64>,
    circumradius: f64,
    sides: u32,
    rotation: f64,
) -> f64 {
    let n = sides.max(3) as f64;
    let apothem = circumradius * (PI / n).cos();
    let q = p - center;
    (0..sides.max(3))
        .map(|k| {
            let angle = rotation + (k as f64 + 0.5) * 2.0 * PI / n;
            q.x * angle.cos() + q.y * angle.sin() - apothem
        })
        .fold(f64::NEG_INFINITY, f64::max)
}
