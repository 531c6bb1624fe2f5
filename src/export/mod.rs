//! Writers for finished parts.
//!
//! - **STL**: binary triangle mesh
//! - **STEP AP214**: faceted manifold solid B-rep built from the same mesh
//! - **manifest**: JSON summary of the assembly tree

pub mod manifest;
pub mod step;
pub mod stl;

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

pub use manifest::write_manifest;
pub use step::write_step;
pub use stl::write_stl;

use crate::error::ExportError;

/// Where and how finely to export.
#[derive(Clone, Debug)]
pub struct ExportOptions {
    pub out_dir: PathBuf,
    /// Tessellation grid spacing in mm.
    pub cell_size: f64,
    pub manifest: bool,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            out_dir: PathBuf::from("out"),
            cell_size: 0.4,
            manifest: false,
        }
    }
}

/// Create `path` and hand a buffered writer to `body`, attaching the path to
/// any I/O failure.
pub fn write_file<F>(path: &Path, body: F) -> Result<(), ExportError>
where
    F: FnOnce(&mut BufWriter<File>) -> io::Result<()>,
{
    let attach = |source| ExportError::Io {
        path: path.to_path_buf(),
        source,
    };
    let file = File::create(path).map_err(attach)?;
    let mut writer = BufWriter::new(file);
    body(&mut writer).map_err(attach)?;
    writer.flush().map_err(attach)
}
