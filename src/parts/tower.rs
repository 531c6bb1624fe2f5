//! The extension tower: a long hollow box between the mount and the
//! connector, lightened by a honeycomb lattice.

use log::info;
use nalgebra::Vector3;

use crate::assembly::Assembly;
use crate::error::Result;
use crate::frame::{Center, Face, Frame};
use crate::holes::{cut_holes, HolePlacement};
use crate::lattice::Lattice;
use crate::params::Parameters;
use crate::parts::{hollow_box, pair, BuildOptions};
use crate::solid::Solid;

/// Grid spacing used to locate the front face centroid.
const FACE_SAMPLE: f64 = 0.25;

pub fn build(params: &Parameters, opts: &BuildOptions, assembly: &mut Assembly) -> Result<Solid> {
    let b = &params.base;
    let policy = opts.hole_depth_policy;
    let center = Vector3::new(0.0, 0.0, params.tower_center_z);

    let tower = hollow_box(
        Vector3::new(params.mount_outer_width, params.mount_outer_depth, b.extension_height),
        params.mount_inner_width,
        params.mount_inner_depth,
        center,
    );

    // Receivers at the top, their outer lower edges beveled so they print
    // without support.
    let top = Frame::on_face(&tower.bounding_box(), Face::PosZ, Center::ProjectedOrigin);
    let receiver_frame = top.offset(-params.receiver_height / 2.0);
    let receivers = pair(params.lug_pitch)
        .points()
        .into_iter()
        .map(|p| {
            let outer = if p.x < 0.0 { Face::NegX } else { Face::PosX };
            Solid::box3(b.extension_mount_width, params.mount_outer_depth, params.receiver_height)
                .placed(&receiver_frame.shifted(p))
                .chamfer(outer, Face::NegZ, b.extension_mount_width - 1e-3)
        })
        .collect::<Vec<_>>();
    let mut all = vec![tower];
    all.extend(receivers);
    let tower = Solid::union_all(all);

    let inserts = HolePlacement::press_fit(params.hardware.insert, pair(params.lug_pitch))
        .with_fit(opts.fit)
        .with_compensation(b.insert_compensation)
        .with_depth(b.insert_depth)
        .with_lead_in(b.insert_lead_in);
    let tower = cut_holes(tower, &top, &inserts, policy, Some(&mut *assembly))?;

    // Lugs at the bottom, matching the mount's.
    let bottom = Frame::on_face(&tower.bounding_box(), Face::NegZ, Center::ProjectedOrigin);
    let tower = tower.place_boxes(
        &bottom.offset(-b.extension_mount_height / 2.0),
        &pair(params.lug_pitch).points(),
        Vector3::new(b.extension_mount_width, params.mount_outer_depth, b.extension_mount_height),
    );
    let lug_top = Frame::new(bottom.origin + Vector3::z() * b.extension_mount_height, Vector3::z());
    let screws =
        HolePlacement::clearance(params.hardware.connector_screw, pair(params.lug_pitch)).with_fit(opts.fit);
    let tower = cut_holes(tower, &lug_top, &screws, policy, Some(assembly))?;

    // Centered on the whole front face, receivers and lugs included.
    let lattice = Lattice::extension(params);
    let front = Frame::new(tower.face_centroid(Face::PosY, FACE_SAMPLE)?, Vector3::y());
    let tower = tower.cut_through_all(&front, lattice.profile(opts.preview));

    info!("built extension tower, height {}", b.extension_height);
    Ok(tower)
}
