//! Short bridge under the tower that bolts the stack to an extrusion rail.
//! It carries the tower's screw pitch and the wider rail pitch; its holes
//! register no companions.

use log::info;
use nalgebra::Vector3;

use crate::error::Result;
use crate::frame::{Center, Face, Frame};
use crate::holes::{cut_holes, HolePlacement};
use crate::params::Parameters;
use crate::parts::{hollow_box, pair, BuildOptions};
use crate::solid::Solid;

pub fn build(params: &Parameters, opts: &BuildOptions) -> Result<Solid> {
    let b = &params.base;
    let block = hollow_box(
        Vector3::new(params.connector_length, params.mount_outer_depth, b.extension_mount_height),
        params.mount_inner_width,
        params.mount_inner_depth,
        Vector3::new(0.0, 0.0, params.connector_center_z),
    );
    let top = Frame::on_face(&block.bounding_box(), Face::PosZ, Center::ProjectedOrigin);

    let tower_holes = HolePlacement::clearance(params.hardware.connector_screw, pair(params.lug_pitch))
        .with_fit(opts.fit)
        .with_counterbore(false)
        .unregistered();
    let block = cut_holes(block, &top, &tower_holes, opts.hole_depth_policy, None)?;

    let rail_holes = HolePlacement::clearance(params.hardware.connector_screw, pair(params.rail_pitch))
        .with_fit(opts.fit)
        .unregistered();
    let block = cut_holes(block, &top, &rail_holes, opts.hole_depth_policy, None)?;

    info!("built connector, length {}", params.connector_length);
    Ok(block)
}
