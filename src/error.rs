//! Error taxonomy for the build pipeline.
//!
//! Every error is fatal: the pipeline is a deterministic sequence of pure
//! geometry transforms, so a failure repeats identically on retry and there
//! is no partial-assembly output mode.

use std::path::PathBuf;

/// Invalid or unreadable configuration. Raised before any geometry exists.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("derived dimension `{name}` must be positive, got {value}")]
    NonPositive { name: &'static str, value: f64 },

    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid configuration: {0}")]
    Syntax(#[from] toml::de::Error),
}

/// Unknown fastener or bearing size, or a size used with the wrong kind.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CatalogError {
    #[error("unknown {kind} size `{size}`")]
    UnknownSize { kind: &'static str, size: String },

    #[error("unknown fastener type `{0}`")]
    UnknownKind(String),

    #[error("size `{size}` is not available as a {kind}")]
    KindMismatch { kind: &'static str, size: String },

    #[error("{kind} `{size}` needs a length")]
    MissingLength { kind: &'static str, size: String },
}

/// A kernel operation produced degenerate geometry.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GeometryError {
    #[error("split plane does not pass through the interior of the solid")]
    DegenerateSplit,

    #[error("split produced an empty half ({0})")]
    EmptySplitHalf(&'static str),

    #[error("solid is unbounded and cannot be tessellated")]
    Unbounded,

    #[error("solid `{0}` is empty")]
    Empty(String),

    #[error("hole depth {depth:.3} exceeds material depth {available:.3} at ({x:.3}, {y:.3}, {z:.3})")]
    HoleTooDeep {
        depth: f64,
        available: f64,
        x: f64,
        y: f64,
        z: f64,
    },

    #[error("pattern `{0}` produced no positions")]
    EmptyPattern(&'static str),

    #[error("grid cell size must be positive, got {0}")]
    InvalidCellSize(f64),
}

/// Assembly tree violations.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum AssemblyError {
    #[error("assembly `{assembly}` already contains a node named `{name}`")]
    DuplicateName { assembly: String, name: String },
}

/// The output sink cannot be written.
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("tessellation of `{0}` produced no triangles")]
    EmptyMesh(String),
}

/// Umbrella error for the whole run.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error(transparent)]
    Geometry(#[from] GeometryError),

    #[error(transparent)]
    Assembly(#[from] AssemblyError),

    #[error(transparent)]
    Export(#[from] ExportError),
}

pub type Result<T> = std::result::Result<T, Error>;
