//! Parametric generator for a printable filament-buffer: a grooved wheel
//! on a bearing, a split housing around it, an intake block, a honeycomb
//! extension tower and an extrusion-rail connector.
//!
//! Geometry is modelled as signed distance fields composed into an
//! immutable CSG tree ([`solid::Solid`]) and tessellated to closed
//! triangle meshes for STL and STEP export.
//!
//! ```no_run
//! use filament_buffer::{export::ExportOptions, params::*, parts::BuildOptions, pipeline};
//!
//! let params = Parameters::derive(BaseParameters::default())?;
//! let assembly = pipeline::build_all(&params, &BuildOptions::default())?;
//! pipeline::export_all(&assembly, &params, &ExportOptions::default())?;
//! # Ok::<(), filament_buffer::error::Error>(())
//! ```

pub mod assembly;
pub mod catalog;
pub mod config;
pub mod dag;
pub mod error;
pub mod export;
pub mod frame;
pub mod hardware;
pub mod holes;
pub mod lattice;
pub mod mesh;
pub mod params;
pub mod parts;
pub mod pipeline;
pub mod primitives;
pub mod profile;
pub mod solid;
pub mod types;
pub mod voxel;

pub use assembly::{Assembly, Part};
pub use error::{Error, Result};
pub use frame::{Face, Frame};
pub use params::{BaseParameters, Parameters};
pub use solid::Solid;
pub use types::{BBox3, TriangleMesh};
