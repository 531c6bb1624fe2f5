use std::path::PathBuf;

use filament_buffer::error::GeometryError;
use filament_buffer::export::{write_step, write_stl, ExportOptions};
use filament_buffer::params::{BaseParameters, Parameters};
use filament_buffer::parts::BuildOptions;
use filament_buffer::pipeline;
use filament_buffer::solid::Solid;

fn out_dir(name: &str) -> PathBuf {
    let dir = PathBuf::from(env!("CARGO_TARGET_TMPDIR")).join(name);
    std::fs::remove_dir_all(&dir).ok();
    dir
}

#[test]
fn stl_and_step_describe_the_same_mesh() {
    let mesh = Solid::cylinder(5.0, 8.0).tessellate(0.5).unwrap();
    let mut stl = Vec::new();
    write_stl(&mesh, "pin", &mut stl).unwrap();
    assert_eq!(stl.len(), 84 + 50 * mesh.triangle_count());

    let mut step = Vec::new();
    write_step(&mesh, "pin", &mut step).unwrap();
    let step = String::from_utf8(step).unwrap();
    assert_eq!(step.matches("ADVANCED_FACE(").count(), mesh.triangle_count());
    assert_eq!(step.matches("VERTEX_POINT(").count(), mesh.vertices.len());
    assert!(step.contains("MANIFOLD_SOLID_BREP('pin'"));
}

#[test]
fn pipeline_export_is_byte_identical_across_runs() {
    let params = Parameters::derive(BaseParameters::default()).unwrap();
    let build = BuildOptions {
        preview: true,
        ..BuildOptions::default()
    };
    let asm = pipeline::build_all(&params, &build).unwrap();

    let first = ExportOptions {
        out_dir: out_dir("export_first"),
        cell_size: 1.5,
        manifest: true,
    };
    let second = ExportOptions {
        out_dir: out_dir("export_second"),
        ..first.clone()
    };
    let a = pipeline::export_all(&asm, &params, &first).unwrap();
    let b = pipeline::export_all(&asm, &params, &second).unwrap();

    let names: Vec<_> = a
        .iter()
        .filter_map(|p| p.file_name())
        .map(|n| n.to_string_lossy().into_owned())
        .collect();
    assert_eq!(
        names,
        [
            "buffer_intake.stl",
            "buffer_intake.step",
            "buffer_mount_a.stl",
            "buffer_mount_a.step",
            "buffer_mount_b.stl",
            "buffer_mount_b.step",
            "buffer_wheel.stl",
            "buffer_wheel.step",
            "buffer_extension_150.stl",
            "buffer_extension_150.step",
            "buffer_extrusion_mount.stl",
            "buffer_extrusion_mount.step",
            "buffer_cap.json",
        ]
    );

    for (pa, pb) in a.iter().zip(&b) {
        let (da, db) = (std::fs::read(pa).unwrap(), std::fs::read(pb).unwrap());
        assert!(!da.is_empty());
        assert!(da == db, "{} differs between runs", pa.display());
    }

    let manifest: serde_json::Value = serde_json::from_slice(&std::fs::read(&a[12]).unwrap()).unwrap();
    assert_eq!(manifest["parts"].as_array().unwrap().len(), 6 + 17);
    assert_eq!(manifest["parts"][1]["files"][0], "buffer_intake.stl");
}

#[test]
fn unwritable_directory_is_an_export_error() {
    let params = Parameters::derive(BaseParameters::default()).unwrap();
    let blocker = out_dir("export_blocked");
    std::fs::create_dir_all(blocker.parent().unwrap()).unwrap();
    std::fs::write(&blocker, b"not a directory").unwrap();

    let asm = filament_buffer::assembly::Assembly::new("empty", filament_buffer::hardware::Detail::Preview);
    let opts = ExportOptions {
        out_dir: blocker.join("parts"),
        ..ExportOptions::default()
    };
    let err = pipeline::export_all(&asm, &params, &opts).unwrap_err();
    assert!(matches!(err, filament_buffer::Error::Export(_)));
    std::fs::remove_file(&blocker).ok();
}

#[test]
fn zero_cell_size_is_a_geometry_error() {
    let params = Parameters::derive(BaseParameters::default()).unwrap();
    let build = BuildOptions {
        preview: true,
        ..BuildOptions::default()
    };
    let asm = pipeline::build_all(&params, &build).unwrap();
    let opts = ExportOptions {
        out_dir: out_dir("export_zero_cell"),
        cell_size: 0.0,
        manifest: false,
    };
    let err = pipeline::export_all(&asm, &params, &opts).unwrap_err();
    assert!(matches!(
        err,
        filament_buffer::Error::Geometry(GeometryError::InvalidCellSize(_))
    ));
}
