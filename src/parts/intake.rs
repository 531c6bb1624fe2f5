//! The intake block that sits on the mount flange and takes the two
//! quick-connect couplers.

use log::info;
use nalgebra::Vector3;

use crate::assembly::Assembly;
use crate::error::Result;
use crate::frame::{Center, Face, Frame};
use crate::holes::{cut_holes, HolePlacement, Pattern};
use crate::params::Parameters;
use crate::parts::{box_at, pair, BuildOptions};
use crate::solid::Solid;

pub fn build(params: &Parameters, opts: &BuildOptions, assembly: &mut Assembly) -> Result<Solid> {
    let b = &params.base;
    let block = box_at(
        Vector3::new(params.mount_outer_width, params.mount_outer_depth, b.intake_height),
        Vector3::new(0.0, 0.0, params.intake_center_z),
    );
    let top = Frame::on_face(&block.bounding_box(), Face::PosZ, Center::ProjectedOrigin);

    let couplers = HolePlacement::threaded(params.hardware.coupler, pair(params.passthrough_pitch), b.coupler_depth)
        .with_fit(opts.fit)
        .unregistered();
    let block = cut_holes(block, &top, &couplers, opts.hole_depth_policy, None)?;

    let screws = HolePlacement::clearance(
        params.hardware.intake_screw,
        Pattern::Rect {
            x_spacing: params.flange_insert_pitch,
            y_spacing: b.intake_attachment_spacing,
            x_count: 2,
            y_count: 2,
        },
    )
    .with_fit(opts.fit);
    let block = cut_holes(block, &top, &screws, opts.hole_depth_policy, Some(assembly))?;

    info!("built intake at z = {}", params.intake_center_z);
    Ok(block)
}
