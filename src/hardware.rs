//! Renderable stand-ins for purchased hardware.
//!
//! Each representation is built in its seat frame: the origin sits on the
//! host surface and local +Z is the outward normal, so the part extends
//! into the host along -Z.

use std::f64::consts::PI;

use nalgebra::{Vector2, Vector3};

use crate::catalog::{FastenerKind, FastenerSpec};
use crate::profile::Profile;
use crate::solid::Solid;

/// Level of detail for companion parts.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Detail {
    Full,
    Preview,
}

/// Companion solid for `spec` in its seat frame.
pub fn companion(spec: &FastenerSpec, detail: Detail) -> Solid {
    match spec.kind {
        FastenerKind::SocketHeadCapScrew => screw(spec, detail),
        FastenerKind::HeatSetInsert => insert(spec, detail),
        FastenerKind::Bearing => ring(spec.dims().outer, spec.dims().bore, spec.dims().seat_depth),
    }
}

/// Head resting on the seat, shank going into the host.
fn screw(spec: &FastenerSpec, detail: Detail) -> Solid {
    let dims = spec.dims();
    let head_height = dims.seat_depth;
    let length = spec.length_or_seat();

    let head = Solid::cylinder(dims.outer / 2.0, head_height)
        .translate(Vector3::new(0.0, 0.0, head_height / 2.0));
    let shank = Solid::cylinder(dims.bore / 2.0, length)
        .translate(Vector3::new(0.0, 0.0, -length / 2.0));
    let body = head.union(shank);

    match detail {
        Detail::Preview => body,
        Detail::Full => {
            // Hex key socket, across-flats a little under the thread major diameter.
            let across_flats = dims.bore * 0.83;
            let circumradius = across_flats / (PI / 6.0).cos() / 2.0;
            let socket = Solid::prism(
                Profile::regular_polygon(Vector2::zeros(), circumradius, 6, 0.0),
                head_height * 0.4,
                head_height + 1.0,
            );
            body.subtract(socket)
        }
    }
}

/// Threaded sleeve flush with the seat.
fn insert(spec: &FastenerSpec, detail: Detail) -> Solid {
    let dims = spec.dims();
    let sleeve = ring(dims.outer, dims.bore, dims.seat_depth);
    match detail {
        Detail::Preview => sleeve,
        Detail::Full => {
            let groove = dims.seat_depth / 10.0;
            let grooves = (1..=2)
                .map(|k| {
                    let z = -dims.seat_depth * f64::from(k) / 3.0;
                    Solid::torus(dims.outer / 2.0, groove).translate(Vector3::new(0.0, 0.0, z))
                })
                .collect();
            sleeve.subtract_all(grooves)
        }
    }
}

fn ring(outer: f64, bore: f64, width: f64) -> Solid {
    Solid::cylinder(outer / 2.0, width)
        .subtract(Solid::cylinder(bore / 2.0, width + 1.0))
        .translate(Vector3::new(0.0, 0.0, -width / 2.0))
}
