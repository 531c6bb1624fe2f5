use approx::assert_relative_eq;
use filament_buffer::assembly::Assembly;
use filament_buffer::catalog::Fit;
use filament_buffer::frame::Frame;
use filament_buffer::hardware::Detail;
use filament_buffer::holes::HoleDepthPolicy;
use filament_buffer::params::{BaseParameters, Parameters};
use filament_buffer::parts::{mount, BuildOptions};
use nalgebra::Vector3;

fn params() -> Parameters {
    Parameters::derive(BaseParameters::default()).unwrap()
}

#[test]
fn housing_splits_into_two_halves_at_the_bearing_center() {
    let params = params();
    let mut asm = Assembly::new("test", Detail::Preview);
    let housing = mount::housing(&params, &BuildOptions::default(), &mut asm).unwrap();
    let bbox = housing.bounding_box();

    let (rear, front) = housing.split(&Frame::new(Vector3::zeros(), Vector3::y())).unwrap();
    let (rb, fb) = (rear.bounding_box(), front.bounding_box());
    let joined = rb.union(&fb);
    assert_relative_eq!(joined.min, bbox.min, epsilon = 1e-9);
    assert_relative_eq!(joined.max, bbox.max, epsilon = 1e-9);
    // The halves only share the y = 0 plane.
    assert_relative_eq!(rb.min.y, 0.0);
    assert_relative_eq!(fb.max.y, 0.0);

    for half in [&rear, &front] {
        let mesh = half.tessellate(1.0).unwrap();
        assert!(mesh.is_watertight());
        assert!(mesh.volume() > 0.0);
    }
}

#[test]
fn bosses_are_asymmetric() {
    let params = params();
    let mut asm = Assembly::new("test", Detail::Preview);
    let housing = mount::housing(&params, &BuildOptions::default(), &mut asm).unwrap();
    let half_depth = params.mount_outer_depth / 2.0;
    let r = params.boss_radius - 0.5;

    // Rear boss reaches further in than the front one.
    let rear_tip = half_depth - params.rear_boss_length;
    let front_tip = -half_depth + params.front_boss_length;
    assert!(housing.contains(Vector3::new(r, rear_tip + 0.2, 0.0)));
    assert!(!housing.contains(Vector3::new(r, rear_tip - 0.2, 0.0)));
    assert!(housing.contains(Vector3::new(r, front_tip - 0.2, 0.0)));
    assert!(!housing.contains(Vector3::new(r, front_tip + 0.2, 0.0)));
}

#[test]
fn rear_half_carries_the_lugs() {
    let params = params();
    let mut asm = Assembly::new("test", Detail::Preview);
    let halves = mount::build(&params, &BuildOptions::default(), &mut asm).unwrap();

    let lug_x = params.lug_pitch / 2.0 + params.base.extension_mount_width / 2.0 - 1.0;
    let lug_z = -params.mount_height / 2.0 + params.base.extension_mount_height / 2.0;
    assert!(halves.rear.contains(Vector3::new(lug_x, 2.0, lug_z)));
    assert!(!halves.front.contains(Vector3::new(lug_x, -2.0, lug_z)));

    // Center screw and front insert, four flange inserts, two lug screws.
    assert_eq!(asm.companions().len(), 8);
}

#[test]
fn fit_grade_sizes_the_center_screw_counterbore() {
    let params = params();
    let housing = |fit| {
        let opts = BuildOptions {
            fit,
            ..BuildOptions::default()
        };
        mount::housing(&params, &opts, &mut Assembly::new("test", Detail::Preview)).unwrap()
    };
    // Between the close (6.0) and loose (7.0) counterbore diameters, inside the rear boss.
    let p = Vector3::new(3.25, params.mount_outer_depth / 2.0 - 1.0, 0.0);
    assert!(housing(Fit::Close).contains(p));
    assert!(!housing(Fit::Loose).contains(p));
}

#[test]
fn flange_inserts_fit_the_flange_when_depth_is_enforced() {
    let params = params();
    let opts = BuildOptions {
        hole_depth_policy: HoleDepthPolicy::Reject,
        ..BuildOptions::default()
    };
    let mut asm = Assembly::new("test", Detail::Preview);
    let housing = mount::housing(&params, &opts, &mut asm).unwrap();

    let top = housing.bounding_box().max.z;
    let at = |z| Vector3::new(params.flange_insert_pitch / 2.0, params.base.intake_attachment_spacing / 2.0, z);
    assert!(!housing.contains(at(top - 1.0)));
    assert_eq!(asm.companions().len(), 6);
}
