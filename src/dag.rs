//! SolidNode expression tree: the kernel's solid representation.
//!
//! Children are held behind `Arc<SolidNode>` so a tree is cheap to clone
//! and can be shared between solids without copying geometry. Nodes are
//! never mutated after construction.

use std::sync::Arc;

use nalgebra::{Isometry3, Point3, Vector2, Vector3};

use crate::primitives;
use crate::profile::Profile;
use crate::types::BBox3;

/// Anything that can report a signed distance (negative inside).
pub trait Sdf: Send + Sync {
    fn evaluate(&self, point: Vector3<f64>) -> f64;
}

#[derive(Debug)]
pub enum SolidNode {
    // -- Primitives (local frame, axis +Z) ---------------------------------

    /// Box centered at the origin.
    Box3 { half_extents: Vector3<f64> },

    /// Capped cylinder spanning `±half_height` along Z.
    Cylinder { radius: f64, half_height: f64 },

    /// Torus around the Z axis.
    Torus { major_radius: f64, minor_radius: f64 },

    /// Truncated cone spanning `±half_height`, `r_bottom` at -Z.
    Cone { r_bottom: f64, r_top: f64, half_height: f64 },

    /// 2D profile extruded along Z from `z_min` to `z_max`.
    Prism { profile: Arc<Profile>, z_min: f64, z_max: f64 },

    /// Solid behind the plane `normal . p + d = 0`.
    HalfSpace { normal: Vector3<f64>, d: f64 },

    // -- CSG ---------------------------------------------------------------

    Union(Vec<Arc<SolidNode>>),

    Intersection(Arc<SolidNode>, Arc<SolidNode>),

    /// Base minus every tool, as one batched boolean.
    Difference(Arc<SolidNode>, Vec<Arc<SolidNode>>),

    // -- Placement ---------------------------------------------------------

    /// Rigid placement of a local-frame child into the parent frame.
    Transform {
        inner: Arc<SolidNode>,
        iso: Isometry3<f64>,
        inv: Isometry3<f64>,
    },
}

impl SolidNode {
    pub fn transform(inner: Arc<SolidNode>, iso: Isometry3<f64>) -> Self {
        SolidNode::Transform {
            inner,
            inv: iso.inverse(),
            iso,
        }
    }

    pub fn evaluate(&self, p: Vector3<f64>) -> f64 {
        match self {
            SolidNode::Box3 { half_extents } => primitives::sdf_box(p, *half_extents),
            SolidNode::Cylinder {
                radius,
                half_height,
            } => primitives::sdf_cylinder(p, *radius, *half_height),
            SolidNode::Torus {
                major_radius,
                minor_radius,
            } => primitives::sdf_torus(p, *major_radius, *minor_radius),
            SolidNode::Cone {
                r_bottom,
                r_top,
                half_height,
            } => primitives::sdf_cone(p, *r_bottom, *r_top, *half_height),
            SolidNode::Prism {
                profile,
                z_min,
                z_max,
            } => {
                let d_profile = profile.evaluate(Vector2::new(p.x, p.y));
                let mid = (z_min + z_max) * 0.5;
                let half = (z_max - z_min) * 0.5;
                primitives::combine_extrusion(d_profile, (p.z - mid).abs() - half)
            }
            SolidNode::HalfSpace { normal, d } => normal.dot(&p) + d,

            SolidNode::Union(children) => children
                .iter()
                .map(|c| c.evaluate(p))
                .fold(f64::INFINITY, f64::min),
            SolidNode::Intersection(a, b) => a.evaluate(p).max(b.evaluate(p)),
            SolidNode::Difference(base, tools) => {
                let mut d = base.evaluate(p);
                for tool in tools {
                    d = d.max(-tool.evaluate(p));
                }
                d
            }

            SolidNode::Transform { inner, inv, .. } => {
                inner.evaluate(inv.transform_point(&Point3::from(p)).coords)
            }
        }
    }

    /// Conservative axis-aligned bounds. Half-spaces bound only along their
    /// normal axis when it is axis-aligned, and are unbounded otherwise.
    pub fn bounding_box(&self) -> BBox3 {
        match self {
            SolidNode::Box3 { half_extents } => BBox3::centered(Vector3::zeros(), *half_extents),
            SolidNode::Cylinder {
                radius,
                half_height,
            } => BBox3::centered(Vector3::zeros(), Vector3::new(*radius, *radius, *half_height)),
            SolidNode::Torus {
                major_radius,
                minor_radius,
            } => {
                let r = major_radius + minor_radius;
                BBox3::centered(Vector3::zeros(), Vector3::new(r, r, *minor_radius))
            }
            SolidNode::Cone {
                r_bottom,
                r_top,
                half_height,
            } => {
                let r = r_bottom.max(*r_top);
                BBox3::centered(Vector3::zeros(), Vector3::new(r, r, *half_height))
            }
            SolidNode::Prism {
                profile,
                z_min,
                z_max,
            } => {
                let (lo, hi) = profile.bounds();
                BBox3::new(Vector3::new(lo.x, lo.y, *z_min), Vector3::new(hi.x, hi.y, *z_max))
            }
            SolidNode::HalfSpace { normal, d } => half_space_bounds(normal, *d),

            SolidNode::Union(children) => children
                .iter()
                .fold(BBox3::empty(), |acc, c| acc.union(&c.bounding_box())),
            SolidNode::Intersection(a, b) => a.bounding_box().intersection(&b.bounding_box()),
            SolidNode::Difference(base, _) => base.bounding_box(),

            SolidNode::Transform { inner, iso, .. } => {
                let b = inner.bounding_box();
                if b.is_empty() {
                    return b;
                }
                if !b.is_finite() {
                    return BBox3::everything();
                }
                b.corners().iter().fold(BBox3::empty(), |acc, c| {
                    acc.include(iso.transform_point(&Point3::from(*c)).coords)
                })
            }
        }
    }
}

fn half_space_bounds(normal: &Vector3<f64>, d: f64) -> BBox3 {
    let mut bbox = BBox3::everything();
    for axis in 0..3 {
        let others_zero = (0..3).filter(|&i| i != axis).all(|i| normal[i].abs() < 1e-12);
        if others_zero && normal[axis].abs() > 1e-12 {
            // normal[axis] * x + d <= 0
            let bound = -d / normal[axis];
            if normal[axis] > 0.0 {
                bbox.max[axis] = bound;
            } else {
                bbox.min[axis] = bound;
            }
        }
    }
    bbox
}

impl Sdf for SolidNode {
    fn evaluate(&self, point: Vector3<f64>) -> f64 {
        SolidNode::evaluate(self, point)
    }
}
