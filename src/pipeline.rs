//! Build every part into one assembly and export the printed ones.

use std::path::PathBuf;

use log::info;
use nalgebra::Vector3;
use rayon::prelude::*;

use crate::assembly::{Assembly, Color, Part};
use crate::error::{ExportError, GeometryError, Result};
use crate::export::{self, manifest::Manifest, ExportOptions};
use crate::hardware::Detail;
use crate::params::Parameters;
use crate::parts::{self, BuildOptions};

pub const ASSEMBLY_NAME: &str = "buffer_cap";

pub const WHEEL: &str = "wheel";
pub const INTAKE: &str = "intake";
pub const MOUNT_A: &str = "mountA";
pub const MOUNT_B: &str = "mountB";
pub const EXTENSION: &str = "extension";
pub const MOUNTING: &str = "mounting";

/// Build all printed parts, registering companions as holes are cut.
pub fn build_all(params: &Parameters, opts: &BuildOptions) -> Result<Assembly> {
    let detail = if opts.preview { Detail::Preview } else { Detail::Full };
    let mut asm = Assembly::new(ASSEMBLY_NAME, detail);

    let wheel = parts::wheel::build(params, opts, &mut asm)?;
    asm.add(Part::printed(WHEEL, wheel, Color::rgba(0.0, 1.0, 0.0, 0.2)))?;

    // Companions are registered in build order, the printed parts follow.
    let mount = parts::mount::build(params, opts, &mut asm)?;
    let intake = parts::intake::build(params, opts, &mut asm)?;
    let tower = parts::tower::build(params, opts, &mut asm)?;
    let connector = parts::connector::build(params, opts)?;

    asm.add(Part::printed(INTAKE, intake, Color::BLUE))?;
    asm.add(Part::printed(MOUNT_A, mount.rear, Color::WHITE))?;
    asm.add(Part::printed(MOUNT_B, mount.front, Color::rgba(1.0, 0.0, 0.0, 0.2)))?;
    asm.add(Part::printed(EXTENSION, tower, Color::PURPLE))?;
    asm.add(Part::printed(MOUNTING, connector, Color::ORANGE))?;

    info!(
        "assembly `{}`: {} printed parts, {} companions",
        asm.name(),
        asm.printed_parts().len(),
        asm.companions().len()
    );
    Ok(asm)
}

/// One printed part's export: file stem and print orientation.
#[derive(Clone, Debug, PartialEq)]
pub struct ExportJob {
    pub part: &'static str,
    pub stem: String,
    /// Rotation about world X through the center of mass, in degrees.
    pub rotate_x: Option<f64>,
}

pub fn export_jobs(params: &Parameters) -> Vec<ExportJob> {
    let job = |part, stem: &str, rotate_x| ExportJob {
        part,
        stem: stem.to_string(),
        rotate_x,
    };
    vec![
        job(INTAKE, "buffer_intake", None),
        job(MOUNT_A, "buffer_mount_a", Some(-90.0)),
        job(MOUNT_B, "buffer_mount_b", Some(90.0)),
        job(WHEEL, "buffer_wheel", Some(90.0)),
        job(
            EXTENSION,
            &format!("buffer_extension_{}", params.base.extension_height),
            None,
        ),
        job(MOUNTING, "buffer_extrusion_mount", None),
    ]
}

fn run_job(assembly: &Assembly, job: &ExportJob, opts: &ExportOptions) -> Result<Vec<PathBuf>> {
    let part = assembly
        .part(job.part)
        .ok_or_else(|| GeometryError::Empty(job.part.to_string()))?;

    let solid = match job.rotate_x {
        Some(deg) => part
            .solid
            .clone()
            .rotate_about_center(Vector3::x_axis(), deg, opts.cell_size)?,
        None => part.solid.clone(),
    };
    let mesh = solid.tessellate(opts.cell_size)?;
    if mesh.is_empty() {
        return Err(ExportError::EmptyMesh(job.part.to_string()).into());
    }

    let stl = opts.out_dir.join(format!("{}.stl", job.stem));
    export::write_file(&stl, |w| export::write_stl(&mesh, &job.stem, w))?;
    let step = opts.out_dir.join(format!("{}.step", job.stem));
    export::write_file(&step, |w| export::write_step(&mesh, &job.stem, w))?;

    info!(
        "exported {} -> {} ({} triangles)",
        job.part,
        job.stem,
        mesh.triangle_count()
    );
    Ok(vec![stl, step])
}

/// Tessellate and write every printed part, in parallel. Returns the
/// written paths in job order.
pub fn export_all(assembly: &Assembly, params: &Parameters, opts: &ExportOptions) -> Result<Vec<PathBuf>> {
    std::fs::create_dir_all(&opts.out_dir).map_err(|source| ExportError::Io {
        path: opts.out_dir.clone(),
        source,
    })?;

    let jobs = export_jobs(params);
    let written = jobs
        .par_iter()
        .map(|job| run_job(assembly, job, opts))
        .collect::<Result<Vec<_>>>()?;
    let mut paths: Vec<PathBuf> = written.into_iter().flatten().collect();

    if opts.manifest {
        let manifest = Manifest::new(assembly, |part| {
            jobs.iter()
                .filter(|job| job.part == part.name)
                .flat_map(|job| [format!("{}.stl", job.stem), format!("{}.step", job.stem)])
                .collect()
        });
        let path = opts.out_dir.join(format!("{ASSEMBLY_NAME}.json"));
        export::write_file(&path, |w| export::write_manifest(&manifest, w))?;
        paths.push(path);
    }

    Ok(paths)
}
