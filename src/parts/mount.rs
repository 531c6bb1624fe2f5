//! The wheel mount: a clamshell housing around the wheel, split at the
//! bearing center into a rear half with tower lugs ("mountA") and a plain
//! front half ("mountB").

use log::info;
use nalgebra::{Vector2, Vector3};

use crate::assembly::Assembly;
use crate::error::Result;
use crate::frame::{Center, Face, Frame};
use crate::holes::{cut_holes, HolePlacement, Pattern};
use crate::params::Parameters;
use crate::parts::{hollow_box, pair, BuildOptions};
use crate::profile::Profile;
use crate::solid::{Mode, Solid};

/// The two halves of the split housing.
#[derive(Clone, Debug)]
pub struct MountHalves {
    /// Rear (+Y) half with the longer boss and the tower lugs.
    pub rear: Solid,
    /// Front (-Y) half.
    pub front: Solid,
}

/// Build the complete housing before it is split.
pub fn housing(params: &Parameters, opts: &BuildOptions, assembly: &mut Assembly) -> Result<Solid> {
    let b = &params.base;
    let policy = opts.hole_depth_policy;
    let face = |s: &Solid, f: Face| Frame::on_face(&s.bounding_box(), f, Center::ProjectedOrigin);

    let mut body = hollow_box(
        Vector3::new(params.mount_outer_width, params.mount_outer_depth, params.mount_height),
        params.mount_inner_width,
        params.mount_inner_depth,
        Vector3::zeros(),
    );

    // Weight-reduction windows through both walls.
    let windows = Pattern::Rect {
        x_spacing: params.relief_pitch_x,
        y_spacing: params.relief_pitch_y,
        x_count: 2,
        y_count: 2,
    }
    .points()
    .into_iter()
    .map(|p| {
        Profile::rounded_rect(
            p,
            params.relief_cell_width,
            params.relief_cell_height,
            b.relief_pattern_fillet,
        )
    })
    .collect();
    let rear = face(&body, Face::PosY);
    body = body.cut_through_all(&rear, Profile::batch(windows));

    // Friction relief so only the bosses touch the wheel.
    let pocket = rear.offset(-params.friction_relief_offset);
    body = body.extrude(
        &pocket,
        Profile::circle(Vector2::zeros(), params.friction_relief_radius),
        -params.friction_relief_depth,
        Mode::Cut,
    );

    let boss = Profile::circle(Vector2::zeros(), params.boss_radius);
    body = body.extrude(&rear, boss.clone(), -params.rear_boss_length, Mode::Add);
    let front = face(&body, Face::NegY);
    body = body.extrude(&front, boss, -params.front_boss_length, Mode::Add);

    let screw = HolePlacement::clearance(params.hardware.center_screw, Pattern::center()).with_fit(opts.fit);
    let rear_face = face(&body, Face::PosY);
    body = cut_holes(body, &rear_face, &screw, policy, Some(&mut *assembly))?;

    let insert = HolePlacement::press_fit(params.hardware.insert, Pattern::center())
        .with_fit(opts.fit)
        .with_compensation(b.insert_compensation)
        .with_depth(b.insert_depth);
    let front_face = face(&body, Face::NegY);
    body = cut_holes(body, &front_face, &insert, policy, Some(&mut *assembly))?;

    // Intake flange on top.
    let top = Frame::on_face(&body.bounding_box(), Face::PosZ, Center::FaceCenter);
    body = body.place_boxes(
        &top.offset(b.intake_holder_thickness / 2.0),
        &[Vector2::zeros()],
        Vector3::new(params.mount_outer_width, params.mount_outer_depth, b.intake_holder_thickness),
    );

    let flange = face(&body, Face::PosZ);
    let flange_inserts = HolePlacement::press_fit(
        params.hardware.insert,
        Pattern::Rect {
            x_spacing: params.flange_insert_pitch,
            y_spacing: b.intake_attachment_spacing,
            x_count: 2,
            y_count: 2,
        },
    )
    .with_fit(opts.fit)
    .with_compensation(b.insert_compensation)
    .with_depth(params.flange_insert_depth);
    body = cut_holes(body, &flange, &flange_inserts, policy, Some(&mut *assembly))?;

    let passthroughs = pair(params.passthrough_pitch)
        .points()
        .into_iter()
        .map(|p| Profile::circle(p, b.passthrough_radius))
        .collect();
    body = body.extrude(
        &flange,
        Profile::batch(passthroughs),
        -params.passthrough_depth,
        Mode::Cut,
    );

    Ok(body)
}

/// Build, split at the depth midpoint and add the tower lugs to the rear half.
pub fn build(params: &Parameters, opts: &BuildOptions, assembly: &mut Assembly) -> Result<MountHalves> {
    let b = &params.base;
    let body = housing(params, opts, assembly)?;

    let (rear, front) = body.split(&Frame::new(Vector3::zeros(), Vector3::y()))?;

    let bottom = Frame::on_face(&rear.bounding_box(), Face::NegZ, Center::ProjectedOrigin);
    let lugs = pair(params.lug_pitch).points();
    let rear = rear.place_boxes(
        &bottom.offset(-b.extension_mount_height / 2.0),
        &lugs,
        Vector3::new(b.extension_mount_width, params.mount_outer_depth, b.extension_mount_height),
    );

    let lug_top = Frame::new(
        Vector3::new(0.0, 0.0, -params.mount_height / 2.0 + b.extension_mount_height),
        Vector3::z(),
    );
    let screws =
        HolePlacement::clearance(params.hardware.connector_screw, pair(params.lug_pitch)).with_fit(opts.fit);
    let rear = cut_holes(rear, &lug_top, &screws, opts.hole_depth_policy, Some(assembly))?;

    info!(
        "built mount {} x {} x {}, split at y = 0",
        params.mount_outer_width, params.mount_outer_depth, params.mount_height
    );
    Ok(MountHalves { rear, front })
}
