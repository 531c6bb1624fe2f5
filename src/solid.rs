//! The `Solid` value: the kernel API every part builder works against.
//!
//! `Solid` wraps an `Arc<SolidNode>`, so it is cheap to clone and never
//! mutated. Every operation consumes a solid and returns a new one.

use std::sync::Arc;

use nalgebra::{Isometry3, Translation3, Unit, UnitQuaternion, Vector2, Vector3};

use crate::dag::SolidNode;
use crate::error::GeometryError;
use crate::frame::{Face, Frame};
use crate::mesh;
use crate::profile::Profile;
use crate::types::{BBox3, TriangleMesh};
use crate::voxel::SampleGrid;

/// Samples per axis for the coarse emptiness test used by `split`.
const EMPTINESS_SAMPLES: f64 = 64.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mode {
    Add,
    Cut,
}

#[derive(Clone, Debug)]
pub struct Solid {
    node: Arc<SolidNode>,
}

impl From<SolidNode> for Solid {
    fn from(node: SolidNode) -> Self {
        Self {
            node: Arc::new(node),
        }
    }
}

// ---------------------------------------------------------------------------
// Primitives, centered at the origin with their axis along +Z
// ---------------------------------------------------------------------------

impl Solid {
    /// Box of full size `x × y × z`.
    pub fn box3(x: f64, y: f64, z: f64) -> Self {
        SolidNode::Box3 {
            half_extents: Vector3::new(x, y, z) * 0.5,
        }
        .into()
    }

    pub fn cylinder(radius: f64, height: f64) -> Self {
        SolidNode::Cylinder {
            radius,
            half_height: height * 0.5,
        }
        .into()
    }

    pub fn torus(major_radius: f64, minor_radius: f64) -> Self {
        SolidNode::Torus {
            major_radius,
            minor_radius,
        }
        .into()
    }

    /// Truncated cone, `r_bottom` at `-height/2`.
    pub fn cone(r_bottom: f64, r_top: f64, height: f64) -> Self {
        SolidNode::Cone {
            r_bottom,
            r_top,
            half_height: height * 0.5,
        }
        .into()
    }

    /// `profile` extruded along Z from `z_min` to `z_max`.
    pub fn prism(profile: Profile, z_min: f64, z_max: f64) -> Self {
        SolidNode::Prism {
            profile: Arc::new(profile),
            z_min: z_min.min(z_max),
            z_max: z_min.max(z_max),
        }
        .into()
    }

    /// Everything on the side of `frame` opposite its normal.
    pub fn half_space_below(frame: &Frame) -> Self {
        SolidNode::HalfSpace {
            normal: frame.normal,
            d: -frame.normal.dot(&frame.origin),
        }
        .into()
    }

    pub fn node(&self) -> &SolidNode {
        &self.node
    }
}

// ---------------------------------------------------------------------------
// CSG
// ---------------------------------------------------------------------------

impl Solid {
    pub fn union(self, other: Solid) -> Self {
        Self::union_all(vec![self, other])
    }

    pub fn union_all(solids: Vec<Solid>) -> Self {
        SolidNode::Union(solids.into_iter().map(|s| s.node).collect()).into()
    }

    pub fn subtract(self, tool: Solid) -> Self {
        self.subtract_all(vec![tool])
    }

    /// Remove every tool in one batched boolean.
    pub fn subtract_all(self, tools: Vec<Solid>) -> Self {
        if tools.is_empty() {
            return self;
        }
        SolidNode::Difference(self.node, tools.into_iter().map(|s| s.node).collect()).into()
    }

    pub fn intersect(self, other: Solid) -> Self {
        SolidNode::Intersection(self.node, other.node).into()
    }
}

// ---------------------------------------------------------------------------
// Placement
// ---------------------------------------------------------------------------

impl Solid {
    pub fn transformed(self, iso: Isometry3<f64>) -> Self {
        SolidNode::transform(self.node, iso).into()
    }

    pub fn translate(self, offset: Vector3<f64>) -> Self {
        self.transformed(Isometry3::from_parts(
            Translation3::from(offset),
            UnitQuaternion::identity(),
        ))
    }

    /// Rotate about an axis through the world origin.
    pub fn rotate(self, axis: Unit<Vector3<f64>>, degrees: f64) -> Self {
        self.transformed(Isometry3::from_parts(
            Translation3::identity(),
            UnitQuaternion::from_axis_angle(&axis, degrees.to_radians()),
        ))
    }

    /// Move a local-frame solid onto `frame`: local Z becomes the frame normal.
    pub fn placed(self, frame: &Frame) -> Self {
        self.transformed(frame.isometry())
    }

    /// Rotate about an axis through the center of mass, sampled at `cell_size`.
    pub fn rotate_about_center(
        self,
        axis: Unit<Vector3<f64>>,
        degrees: f64,
        cell_size: f64,
    ) -> Result<Self, GeometryError> {
        let pivot = self.center_of_mass(cell_size)?;
        Ok(self
            .translate(-pivot)
            .rotate(axis, degrees)
            .translate(pivot))
    }
}

// ---------------------------------------------------------------------------
// Workplane operations
// ---------------------------------------------------------------------------

impl Solid {
    /// Extrude `profile` from `frame` by a signed `depth` along its normal
    /// and add it to or cut it from this solid.
    pub fn extrude(self, frame: &Frame, profile: Profile, depth: f64, mode: Mode) -> Self {
        let tool = Solid::prism(profile, 0.0, depth).placed(frame);
        match mode {
            Mode::Add => self.union(tool),
            Mode::Cut => self.subtract(tool),
        }
    }

    /// Cut `profile` through the whole solid along the frame normal.
    pub fn cut_through_all(self, frame: &Frame, profile: Profile) -> Self {
        let (lo, hi) = self.extent_along(frame);
        let tool = Solid::prism(profile, lo - 1.0, hi + 1.0).placed(frame);
        self.subtract(tool)
    }

    /// Union a box of local size `size` centered at each local point.
    pub fn place_boxes(self, frame: &Frame, points: &[Vector2<f64>], size: Vector3<f64>) -> Self {
        let boxes = points
            .iter()
            .map(|p| Solid::box3(size.x, size.y, size.z).placed(&frame.shifted(*p)))
            .collect::<Vec<_>>();
        let mut all = vec![self];
        all.extend(boxes);
        Solid::union_all(all)
    }

    /// Bevel the bounding-box edge shared by faces `a` and `b` with legs of
    /// `distance` on both faces.
    pub fn chamfer(self, a: Face, b: Face, distance: f64) -> Self {
        let bbox = self.bounding_box();
        let (na, nb) = (a.normal(), b.normal());
        let mut edge = bbox.center();
        for (face, n) in [(a, na), (b, nb)] {
            let axis = n.iamax();
            edge[axis] = face.coordinate(&bbox);
        }
        let u = (na + nb).normalize();
        let keep = SolidNode::HalfSpace {
            normal: u,
            d: -u.dot(&edge) + distance * std::f64::consts::FRAC_1_SQRT_2,
        };
        self.intersect(keep.into())
    }

    /// Partition by the plane of `frame` into (normal side, opposite side).
    pub fn split(self, frame: &Frame) -> Result<(Solid, Solid), GeometryError> {
        let bbox = self.bounding_box();
        if !bbox.is_finite() || bbox.is_empty() {
            return Err(GeometryError::DegenerateSplit);
        }
        let level = frame.normal.dot(&frame.origin);
        let corners = bbox.corners();
        let lo = corners.iter().map(|c| frame.normal.dot(c)).fold(f64::INFINITY, f64::min);
        let hi = corners.iter().map(|c| frame.normal.dot(c)).fold(f64::NEG_INFINITY, f64::max);
        if !(lo < level && level < hi) {
            return Err(GeometryError::DegenerateSplit);
        }

        let top = self.clone().intersect(Solid::half_space_below(&frame.flipped()));
        let bottom = self.intersect(Solid::half_space_below(frame));
        if top.is_empty() {
            return Err(GeometryError::EmptySplitHalf("top"));
        }
        if bottom.is_empty() {
            return Err(GeometryError::EmptySplitHalf("bottom"));
        }
        Ok((top, bottom))
    }
}

// ---------------------------------------------------------------------------
// Queries
// ---------------------------------------------------------------------------

impl Solid {
    /// Signed distance bound at `point`, negative inside.
    pub fn distance(&self, point: Vector3<f64>) -> f64 {
        self.node.evaluate(point)
    }

    pub fn contains(&self, point: Vector3<f64>) -> bool {
        self.distance(point) < 0.0
    }

    pub fn bounding_box(&self) -> BBox3 {
        self.node.bounding_box()
    }

    /// True when a coarse sampling of the bounding box finds no material.
    pub fn is_empty(&self) -> bool {
        let bbox = self.bounding_box();
        if bbox.is_empty() {
            return true;
        }
        if !bbox.is_finite() {
            return false;
        }
        let cell = bbox.size().max() / EMPTINESS_SAMPLES;
        SampleGrid::sample(self.node.as_ref(), &bbox, cell, 0).map_or(true, |grid| grid.inside_count() == 0)
    }

    pub fn center_of_mass(&self, cell_size: f64) -> Result<Vector3<f64>, GeometryError> {
        let bbox = self.bounding_box();
        if !bbox.is_finite() {
            return Err(GeometryError::Unbounded);
        }
        if bbox.is_empty() {
            return Err(GeometryError::Empty("center of mass".into()));
        }
        SampleGrid::sample(self.node.as_ref(), &bbox, cell_size, 0)?
            .inside_centroid()
            .ok_or_else(|| GeometryError::Empty("center of mass".into()))
    }

    /// Centroid of the material in contact with `face` of the bounding box,
    /// sampled on a grid of `cell_size` half a cell inside the face.
    pub fn face_centroid(&self, face: Face, cell_size: f64) -> Result<Vector3<f64>, GeometryError> {
        let bbox = self.bounding_box();
        if !bbox.is_finite() {
            return Err(GeometryError::Unbounded);
        }
        if bbox.is_empty() {
            return Err(GeometryError::Empty("face centroid".into()));
        }
        let axis = face.axis();
        let plane = face.coordinate(&bbox);
        let inset = plane - face.normal()[axis] * (cell_size.min(bbox.size()[axis]) / 2.0);
        let mut section = bbox;
        section.min[axis] = inset;
        section.max[axis] = inset;

        let mut centroid = SampleGrid::sample(self.node.as_ref(), &section, cell_size, 0)?
            .inside_centroid()
            .ok_or_else(|| GeometryError::Empty("face centroid".into()))?;
        centroid[axis] = plane;
        Ok(centroid)
    }

    /// Length of material along `direction` starting at `point`, capped at
    /// `max_depth`. A point outside the solid has depth zero.
    pub fn material_depth(&self, point: Vector3<f64>, direction: Vector3<f64>, max_depth: f64) -> f64 {
        const START: f64 = 1e-4;
        const MIN_STEP: f64 = 1e-3;
        let dir = direction.normalize();
        if self.distance(point + dir * START) >= 0.0 {
            return 0.0;
        }
        let mut t = START;
        while t < max_depth {
            let d = self.distance(point + dir * t);
            if d >= 0.0 {
                return t;
            }
            t += (-d).max(MIN_STEP);
        }
        max_depth
    }

    /// Range `(lo, hi)` of the solid's bounding box along the frame normal,
    /// relative to the frame origin.
    pub(crate) fn extent_along(&self, frame: &Frame) -> (f64, f64) {
        let base = frame.normal.dot(&frame.origin);
        self.bounding_box()
            .corners()
            .iter()
            .map(|c| frame.normal.dot(c) - base)
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| (lo.min(v), hi.max(v)))
    }

    pub fn tessellate(&self, cell_size: f64) -> Result<TriangleMesh, GeometryError> {
        mesh::tessellate(self.node.as_ref(), &self.bounding_box(), cell_size)
    }
}
