//! TOML configuration for a build run.
//!
//! ```toml
//! [parameters]
//! wheel_radius = 35.0
//! extension_height = 150.0
//!
//! [build]
//! preview = true
//! hole_depth_policy = "clamp"
//! fit = "loose"
//!
//! [export]
//! out_dir = "out"
//! mesh_cell_size = 0.4
//! manifest = true
//! ```
//!
//! Every section and every key is optional.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::catalog::Fit;
use crate::error::ConfigError;
use crate::export::ExportOptions;
use crate::holes::HoleDepthPolicy;
use crate::params::BaseParameters;
use crate::parts::BuildOptions;

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub parameters: BaseParameters,
    pub build: BuildConfig,
    pub export: ExportConfig,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BuildConfig {
    pub preview: bool,
    pub hole_depth_policy: HoleDepthPolicy,
    pub fit: Fit,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ExportConfig {
    pub out_dir: PathBuf,
    /// Tessellation grid spacing in mm.
    pub mesh_cell_size: f64,
    pub manifest: bool,
}

impl Default for ExportConfig {
    fn default() -> Self {
        let opts = ExportOptions::default();
        Self {
            out_dir: opts.out_dir,
            mesh_cell_size: opts.cell_size,
            manifest: opts.manifest,
        }
    }
}

impl Config {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&content).map_err(|err| match err {
            ConfigError::Syntax(source) => ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            },
            other => other,
        })
    }

    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Settings outside `[parameters]`; those are checked when derived.
    fn validate(&self) -> Result<(), ConfigError> {
        let cell = self.export.mesh_cell_size;
        if !(cell > 0.0 && cell.is_finite()) {
            return Err(ConfigError::NonPositive {
                name: "mesh_cell_size",
                value: cell,
            });
        }
        Ok(())
    }

    /// Defaults when no file is given.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }

    pub fn build_options(&self) -> BuildOptions {
        BuildOptions {
            preview: self.build.preview,
            hole_depth_policy: self.build.hole_depth_policy,
            fit: self.build.fit,
        }
    }

    pub fn export_options(&self) -> ExportOptions {
        ExportOptions {
            out_dir: self.export.out_dir.clone(),
            cell_size: self.export.mesh_cell_size,
            manifest: self.export.manifest,
        }
    }
}
