//! Workplanes: local 2D reference frames anchored to a face or a point.

use nalgebra::{Isometry3, Matrix3, Point3, Rotation3, Translation3, UnitQuaternion, Vector2, Vector3};

use crate::types::BBox3;

/// An extreme face of a solid's bounding box, selected by outward normal.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Face {
    PosX,
    NegX,
    PosY,
    NegY,
    PosZ,
    NegZ,
}

impl Face {
    pub fn normal(self) -> Vector3<f64> {
        match self {
            Face::PosX => Vector3::x(),
            Face::NegX => -Vector3::x(),
            Face::PosY => Vector3::y(),
            Face::NegY => -Vector3::y(),
            Face::PosZ => Vector3::z(),
            Face::NegZ => -Vector3::z(),
        }
    }

    pub(crate) fn axis(self) -> usize {
        match self {
            Face::PosX | Face::NegX => 0,
            Face::PosY | Face::NegY => 1,
            Face::PosZ | Face::NegZ => 2,
        }
    }

    fn is_positive(self) -> bool {
        matches!(self, Face::PosX | Face::PosY | Face::PosZ)
    }

    /// Coordinate of this face on `bbox` along its axis.
    pub fn coordinate(self, bbox: &BBox3) -> f64 {
        if self.is_positive() {
            bbox.max[self.axis()]
        } else {
            bbox.min[self.axis()]
        }
    }
}

/// Where a face workplane puts its origin.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Center {
    /// The world origin projected onto the face plane.
    ProjectedOrigin,
    /// The center of the face's bounding rectangle.
    FaceCenter,
}

/// A right-handed local frame: local X = `x_dir`, local Z = `normal`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Frame {
    pub origin: Vector3<f64>,
    pub x_dir: Vector3<f64>,
    pub normal: Vector3<f64>,
}

impl Frame {
    /// Frame at `origin` with the given normal. The local X axis is world X
    /// projected onto the plane, or world Y when the normal is along X.
    pub fn new(origin: Vector3<f64>, normal: Vector3<f64>) -> Self {
        let n = normal.normalize();
        let reference = if n.x.abs() < 0.9 { Vector3::x() } else { Vector3::y() };
        let x_dir = (reference - n * reference.dot(&n)).normalize();
        Self {
            origin,
            x_dir,
            normal: n,
        }
    }

    /// Workplane on an extreme face of `bbox`.
    pub fn on_face(bbox: &BBox3, face: Face, center: Center) -> Self {
        let axis = face.axis();
        let mut origin = match center {
            Center::ProjectedOrigin => Vector3::zeros(),
            Center::FaceCenter => bbox.center(),
        };
        origin[axis] = face.coordinate(bbox);
        Self::new(origin, face.normal())
    }

    pub fn y_dir(&self) -> Vector3<f64> {
        self.normal.cross(&self.x_dir)
    }

    /// Shift along the normal; negative values move into the solid.
    pub fn offset(&self, distance: f64) -> Self {
        Self {
            origin: self.origin + self.normal * distance,
            ..*self
        }
    }

    /// Shift within the plane by local `(x, y)`.
    pub fn shifted(&self, local: Vector2<f64>) -> Self {
        Self {
            origin: self.to_world(local),
            ..*self
        }
    }

    /// Same origin with the normal reversed.
    pub fn flipped(&self) -> Self {
        Self {
            normal: -self.normal,
            ..*self
        }
    }

    pub fn to_world(&self, local: Vector2<f64>) -> Vector3<f64> {
        self.origin + self.x_dir * local.x + self.y_dir() * local.y
    }

    /// Rigid map from the local frame to world coordinates.
    pub fn isometry(&self) -> Isometry3<f64> {
        let basis = Matrix3::from_columns(&[self.x_dir, self.y_dir(), self.normal]);
        let rotation = UnitQuaternion::from_rotation_matrix(&Rotation3::from_matrix_unchecked(basis));
        Isometry3::from_parts(Translation3::from(self.origin), rotation)
    }

    /// Map a world point into local coordinates.
    pub fn to_local(&self, world: Vector3<f64>) -> Vector3<f64> {
        self.isometry()
            .inverse_transform_point(&Point3::from(world))
            .coords
    }
}
