//! Part builders. Each takes the derived parameters and returns finished
//! solids in world coordinates; builders that seat hardware also register
//! companions in the shared assembly.

pub mod connector;
pub mod intake;
pub mod mount;
pub mod tower;
pub mod wheel;

use nalgebra::{Unit, Vector3};

use crate::catalog::Fit;
use crate::holes::{HoleDepthPolicy, Pattern};
use crate::solid::Solid;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BuildOptions {
    /// Substitute simplified geometry for the lattice and the companions.
    pub preview: bool,
    pub hole_depth_policy: HoleDepthPolicy,
    /// Tolerance grade of every hole.
    pub fit: Fit,
}

/// Box of full size `size` centered at `center`.
pub(crate) fn box_at(size: Vector3<f64>, center: Vector3<f64>) -> Solid {
    Solid::box3(size.x, size.y, size.z).translate(center)
}

/// Hollow box: `outer` minus an `inner` box that is open along Z.
pub(crate) fn hollow_box(outer: Vector3<f64>, inner_x: f64, inner_y: f64, center: Vector3<f64>) -> Solid {
    box_at(outer, center).subtract(box_at(Vector3::new(inner_x, inner_y, outer.z + 1.0), center))
}

/// Two points `pitch` apart along the local x axis.
pub(crate) fn pair(pitch: f64) -> Pattern {
    Pattern::Rect {
        x_spacing: pitch,
        y_spacing: 1.0,
        x_count: 2,
        y_count: 1,
    }
}

/// Rotation taking local +Z onto world +Y.
pub(crate) fn z_to_y() -> (Unit<Vector3<f64>>, f64) {
    (Vector3::x_axis(), -90.0)
}
