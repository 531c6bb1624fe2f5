//! Regular sampling grids over a signed distance field.
//!
//! A [`SampleGrid`] stores the distance at every grid *corner*. The mesher
//! walks its cubes, and the integral queries (center of mass, emptiness)
//! count its inside corners. Sampling is parallelized with rayon; the
//! result is collected in index order so it does not depend on scheduling.

use nalgebra::Vector3;
use rayon::prelude::*;

use crate::dag::Sdf;
use crate::error::GeometryError;
use crate::types::BBox3;

pub struct SampleGrid {
    /// World position of corner `[0, 0, 0]`.
    pub origin: Vector3<f64>,
    /// Edge length of each cubic cell.
    pub cell_size: f64,
    /// Number of corners along each axis.
    pub dims: [usize; 3],
    /// Row-major `[x][y][z]`, index = `(ix * ny + iy) * nz + iz`.
    pub values: Vec<f64>,
}

impl SampleGrid {
    /// Sample `sdf` over `bbox` grown by `pad_cells` cells on every side.
    /// `bbox` must be finite and non-empty.
    pub fn sample(sdf: &dyn Sdf, bbox: &BBox3, cell_size: f64, pad_cells: usize) -> Result<Self, GeometryError> {
        if !(cell_size > 0.0 && cell_size.is_finite()) {
            return Err(GeometryError::InvalidCellSize(cell_size));
        }
        let pad = cell_size * pad_cells as f64;
        let origin = bbox.min - Vector3::from_element(pad);
        let extent = bbox.size() + Vector3::from_element(2.0 * pad);
        let dims = [
            (extent.x / cell_size).ceil() as usize + 1,
            (extent.y / cell_size).ceil() as usize + 1,
            (extent.z / cell_size).ceil() as usize + 1,
        ];
        let [_, ny, nz] = dims;
        let total = dims[0] * ny * nz;

        let values = (0..total)
            .into_par_iter()
            .map(|idx| {
                let ix = idx / (ny * nz);
                let iy = (idx / nz) % ny;
                let iz = idx % nz;
                sdf.evaluate(origin + Vector3::new(ix as f64, iy as f64, iz as f64) * cell_size)
            })
            .collect();

        Ok(Self {
            origin,
            cell_size,
            dims,
            values,
        })
    }

    pub fn index(&self, ix: usize, iy: usize, iz: usize) -> usize {
        (ix * self.dims[1] + iy) * self.dims[2] + iz
    }

    pub fn point(&self, ix: usize, iy: usize, iz: usize) -> Vector3<f64> {
        self.origin + Vector3::new(ix as f64, iy as f64, iz as f64) * self.cell_size
    }

    /// Grid coordinates of a flat index.
    pub fn coords(&self, idx: usize) -> [usize; 3] {
        let [_, ny, nz] = self.dims;
        [idx / (ny * nz), (idx / nz) % ny, idx % nz]
    }

    pub fn point_at(&self, idx: usize) -> Vector3<f64> {
        let [ix, iy, iz] = self.coords(idx);
        self.point(ix, iy, iz)
    }

    pub fn inside_count(&self) -> usize {
        self.values.par_iter().filter(|v| **v < 0.0).count()
    }

    /// Mean position of the inside corners, or `None` when there are none.
    ///
    /// Sums integer grid coordinates so the result is exact and independent
    /// of how rayon splits the work.
    pub fn inside_centroid(&self) -> Option<Vector3<f64>> {
        let (count, sx, sy, sz) = self
            .values
            .par_iter()
            .enumerate()
            .filter(|(_, v)| **v < 0.0)
            .map(|(idx, _)| {
                let [ix, iy, iz] = self.coords(idx);
                (1u64, ix as u64, iy as u64, iz as u64)
            })
            .reduce(
                || (0, 0, 0, 0),
                |a, b| (a.0 + b.0, a.1 + b.1, a.2 + b.2, a.3 + b.3),
            );
        if count == 0 {
            return None;
        }
        let n = count as f64;
        Some(self.origin + Vector3::new(sx as f64 / n, sy as f64 / n, sz as f64 / n) * self.cell_size)
    }
}
