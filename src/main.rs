//! filament-buffer command-line interface.
//!
//! ```sh
//! filament-buffer build --config buffer.toml --out-dir out
//! filament-buffer build --preview --cell-size 1.0
//! filament-buffer params
//! filament-buffer lattice > cells.csv
//! ```

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use log::info;

use filament_buffer::catalog::Fit;
use filament_buffer::config::Config;
use filament_buffer::lattice::Lattice;
use filament_buffer::params::Parameters;
use filament_buffer::pipeline;

#[derive(Parser)]
#[command(name = "filament-buffer")]
#[command(about = "Parametric filament buffer: build and export printable parts")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build every part and write STL and STEP files.
    Build {
        /// TOML configuration file.
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Output directory (overrides the config file).
        #[arg(short, long)]
        out_dir: Option<PathBuf>,
        /// Simplified lattice and hardware for a fast preview.
        #[arg(long)]
        preview: bool,
        /// Tessellation cell size in mm.
        #[arg(long)]
        cell_size: Option<f64>,
        /// Hole tolerance grade: close, normal or loose.
        #[arg(long)]
        fit: Option<Fit>,
        /// Also write a JSON assembly manifest.
        #[arg(long)]
        manifest: bool,
    },
    /// Derive and print every dimension.
    Params {
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
    /// Print the extension lattice centers as CSV.
    Lattice {
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}

fn load(config: Option<PathBuf>) -> anyhow::Result<(Config, Parameters)> {
    let config = Config::load_or_default(config.as_deref()).context("loading configuration")?;
    let params = Parameters::derive(config.parameters.clone()).context("deriving parameters")?;
    Ok((config, params))
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("filament_buffer=info")).init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Build {
            config,
            out_dir,
            preview,
            cell_size,
            fit,
            manifest,
        } => {
            let (config, params) = load(config)?;
            let mut build = config.build_options();
            build.preview |= preview;
            if let Some(fit) = fit {
                build.fit = fit;
            }
            let mut export = config.export_options();
            if let Some(dir) = out_dir {
                export.out_dir = dir;
            }
            if let Some(cell) = cell_size {
                anyhow::ensure!(cell > 0.0, "--cell-size must be positive, got {cell}");
                export.cell_size = cell;
            }
            export.manifest |= manifest;

            let assembly = pipeline::build_all(&params, &build).context("building parts")?;
            let written = pipeline::export_all(&assembly, &params, &export)
                .with_context(|| format!("exporting to {}", export.out_dir.display()))?;
            for path in &written {
                println!("{}", path.display());
            }
            info!("wrote {} files to {}", written.len(), export.out_dir.display());
            Ok(())
        }
        Commands::Params { config } => {
            let (_, params) = load(config)?;
            for (name, value) in params.dimensions() {
                println!("{name:<24} {value:>10.3}");
            }
            Ok(())
        }
        Commands::Lattice { config } => {
            let (_, params) = load(config)?;
            let lattice = Lattice::extension(&params);
            let centers = lattice.centers();
            println!("x,y");
            for c in &centers {
                println!("{:.4},{:.4}", c.x, c.y);
            }
            info!("{} cells, packing bound {}", centers.len(), lattice.packing_bound());
            Ok(())
        }
    }
}
