use filament_buffer::assembly::{Assembly, Role};
use filament_buffer::catalog::FastenerKind;
use filament_buffer::frame::Face;
use filament_buffer::hardware::Detail;
use filament_buffer::holes::HoleDepthPolicy;
use filament_buffer::lattice::Lattice;
use filament_buffer::params::{BaseParameters, Parameters};
use filament_buffer::parts::{tower, BuildOptions};
use filament_buffer::pipeline::{self, MOUNT_A, MOUNT_B, WHEEL};
use nalgebra::{Point3, Vector3};

fn preview() -> BuildOptions {
    BuildOptions {
        preview: true,
        ..BuildOptions::default()
    }
}

#[test]
fn preview_build_registers_every_companion_once() {
    let params = Parameters::derive(BaseParameters::default()).unwrap();
    let asm = pipeline::build_all(&params, &preview()).unwrap();
    assert_eq!(asm.detail(), Detail::Preview);

    let printed: Vec<_> = asm.printed_parts().iter().map(|p| p.name.clone()).collect();
    assert_eq!(printed, ["wheel", "intake", "mountA", "mountB", "extension", "mounting"]);

    let companions = asm.companions();
    assert_eq!(companions.len(), 17);
    let count = |kind| companions.iter().filter(|p| p.role == Role::Companion(kind)).count();
    assert_eq!(count(FastenerKind::Bearing), 1);
    assert_eq!(count(FastenerKind::HeatSetInsert), 7);
    assert_eq!(count(FastenerKind::SocketHeadCapScrew), 9);

    assert!(asm.part("SocketHeadCapScrew-M3-0.5-1").is_some());
    assert!(asm.part("HeatSetInsert-M3-0.5-6-7").is_some());
    assert!(asm.part("HeatSetInsert-M3-0.5-6-8").is_none());
}

#[test]
fn preview_parts_are_watertight() {
    let params = Parameters::derive(BaseParameters::default()).unwrap();
    let asm = pipeline::build_all(&params, &preview()).unwrap();
    for part in asm.printed_parts() {
        let mesh = part.solid.tessellate(1.0).unwrap();
        assert!(!mesh.is_empty(), "{} has no triangles", part.name);
        assert!(mesh.is_watertight(), "{} is not watertight", part.name);
    }
}

#[test]
fn moving_parts_are_reoriented_for_printing() {
    let params = Parameters::derive(BaseParameters::default()).unwrap();
    let jobs = pipeline::export_jobs(&params);
    let rotation = |part: &str| jobs.iter().find(|j| j.part == part).and_then(|j| j.rotate_x);
    assert_eq!(rotation(MOUNT_A), Some(-90.0));
    assert_eq!(rotation(MOUNT_B), Some(90.0));
    assert_eq!(rotation(WHEEL), Some(90.0));
    assert_eq!(jobs.iter().filter(|j| j.rotate_x.is_none()).count(), 3);
    assert!(jobs.iter().any(|j| j.stem == "buffer_extension_150"));
}

#[test]
fn reference_build_has_no_hole_deeper_than_its_wall() {
    let params = Parameters::derive(BaseParameters::default()).unwrap();
    let strict = BuildOptions {
        hole_depth_policy: HoleDepthPolicy::Reject,
        ..BuildOptions::default()
    };
    let asm = pipeline::build_all(&params, &strict).unwrap();
    assert_eq!(asm.companions().len(), 17);
}

#[test]
fn companions_follow_the_build_order() {
    let params = Parameters::derive(BaseParameters::default()).unwrap();
    let asm = pipeline::build_all(&params, &preview()).unwrap();
    let names: Vec<_> = asm.parts().iter().map(|p| p.name.clone()).collect();

    let screw = |n: u32| format!("SocketHeadCapScrew-M3-0.5-{n}");
    let insert = |n: u32| format!("HeatSetInsert-M3-0.5-6-{n}");
    let mut expected = vec!["wheel".to_string(), "Bearing-M8-22-7-1".to_string()];
    // Mount: center screw, front insert, flange inserts, lug screws.
    expected.extend([screw(1), insert(1)]);
    expected.extend((2..=5).map(insert));
    expected.extend([screw(2), screw(3)]);
    // Intake screws, then the tower's inserts and lug screws.
    expected.extend((4..=7).map(screw));
    expected.extend([insert(6), insert(7), screw(8), screw(9)]);
    expected.extend(["intake", "mountA", "mountB", "extension", "mounting"].map(String::from));
    assert_eq!(names, expected);
}

#[test]
fn preview_swaps_lattice_and_companion_detail() {
    let params = Parameters::derive(BaseParameters::default()).unwrap();
    let lattice = Lattice::extension(&params);
    assert_eq!(lattice.profile(true).len(), 1);
    assert_eq!(lattice.profile(false).len(), lattice.centers().len());

    let full = pipeline::build_all(&params, &BuildOptions::default()).unwrap();
    let quick = pipeline::build_all(&params, &preview()).unwrap();
    assert_eq!(full.detail(), Detail::Full);

    // Inside the sleeve wall at the first knurl groove, in the seat frame.
    let name = "HeatSetInsert-M3-0.5-6-1";
    let in_groove = |asm: &Assembly| {
        let part = asm.part(name).unwrap();
        let p = part.location.transform_point(&Point3::new(1.8, 0.0, -2.0));
        part.solid.contains(p.coords)
    };
    assert!(in_groove(&quick));
    assert!(!in_groove(&full));
}

#[test]
fn lattice_is_centered_on_the_tower_front_face() {
    let params = Parameters::derive(BaseParameters::default()).unwrap();
    let opts = preview();
    let tower = tower::build(&params, &opts, &mut Assembly::new("test", Detail::Preview)).unwrap();

    // Receivers on top outweigh the lugs below.
    let center = tower.face_centroid(Face::PosY, 0.25).unwrap();
    assert!(center.z > params.tower_center_z);
    assert!(center.z < params.tower_center_z + 1.0);
    assert!(center.x.abs() < 0.1);

    // The preview window is one cell-size square around that centroid.
    let half = params.base.extension_pattern_size / 2.0;
    let wall_y = (params.mount_outer_depth + params.mount_inner_depth) / 4.0;
    let at = |dz: f64| Vector3::new(0.0, wall_y, center.z + dz);
    assert!(!tower.contains(at(0.0)));
    assert!(!tower.contains(at(half - 0.1)));
    assert!(!tower.contains(at(-half + 0.1)));
    assert!(tower.contains(at(half + 0.1)));
    assert!(tower.contains(at(-half - 0.1)));
}
