//! The rolling wheel: a disc around the world Y axis with a filament
//! groove on its rim, a ring of weight-reduction holes, a structural web
//! and a bearing seat opening on +Y.

use log::info;
use nalgebra::{Vector2, Vector3};

use crate::assembly::Assembly;
use crate::error::Result;
use crate::frame::{Center, Face, Frame};
use crate::holes::{cut_holes, HolePlacement, Pattern};
use crate::params::Parameters;
use crate::parts::{z_to_y, BuildOptions};
use crate::profile::Profile;
use crate::solid::Solid;

pub const HOLE_COUNT: usize = 8;

pub fn build(params: &Parameters, opts: &BuildOptions, assembly: &mut Assembly) -> Result<Solid> {
    let b = &params.base;
    let (axis, angle) = z_to_y();

    let groove = Solid::torus(params.groove_major_radius, params.groove_minor_radius).rotate(axis, angle);
    let wheel = Solid::cylinder(b.wheel_radius, b.wheel_thickness)
        .rotate(axis, angle)
        .subtract(groove);

    let face = |s: &Solid| Frame::on_face(&s.bounding_box(), Face::PosY, Center::ProjectedOrigin);

    let holes = Pattern::Polar {
        radius: params.hole_array_radius,
        start_deg: 0.0,
        count: HOLE_COUNT,
    }
    .points()
    .into_iter()
    .map(|p| Profile::circle(p, params.hole_radius))
    .collect();
    let frame = face(&wheel);
    let wheel = wheel.cut_through_all(&frame, Profile::batch(holes));

    let seat = HolePlacement::press_fit(params.hardware.bearing, Pattern::center()).with_fit(opts.fit);
    let frame = face(&wheel);
    let wheel = cut_holes(wheel, &frame, &seat, opts.hole_depth_policy, Some(assembly))?;
    let wheel = wheel.cut_through_all(
        &frame,
        Profile::circle(Vector2::zeros(), params.relief_bore_diameter / 2.0),
    );

    let web = Solid::torus(params.web_major_radius, params.web_minor_radius)
        .rotate(axis, angle)
        .translate(Vector3::new(0.0, params.web_offset, 0.0));
    let wheel = wheel.subtract(web);

    info!("built wheel (r = {}, t = {})", b.wheel_radius, b.wheel_thickness);
    Ok(wheel)
}
