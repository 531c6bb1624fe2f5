//! Honeycomb weight-reduction pattern.
//!
//! Centers come from an axial hex grid with pitch `gap = cell_size / 2 +
//! margin`. A cell is kept when its center lies strictly inside the target
//! rectangle shrunk by one `gap` on every side. Each kept center carries a
//! regular hexagon whose corner-to-corner size is `cell_size`, rotated 30°
//! so a vertex points along the rectangle's y axis.

use std::f64::consts::PI;

use log::debug;
use nalgebra::Vector2;

use crate::params::Parameters;
use crate::profile::Profile;

const SQRT_3: f64 = 1.732_050_807_568_877_2;

/// Area of the hexagonal region each center owns, in units of `gap²`.
const CELL_AREA_FACTOR: f64 = 1.5 * SQRT_3;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LatticeCell {
    pub center: Vector2<f64>,
    /// Corner-to-corner size.
    pub size: f64,
    /// Angle of the first vertex, radians.
    pub rotation: f64,
}

impl LatticeCell {
    pub fn circumradius(&self) -> f64 {
        self.size / 2.0
    }

    pub fn profile(&self) -> Profile {
        Profile::regular_polygon(self.center, self.circumradius(), 6, self.rotation)
    }
}

/// A rectangle `width × height` centered on the workplane origin, tiled
/// with hexagons of `cell_size` separated by at least `2 × margin`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Lattice {
    pub width: f64,
    pub height: f64,
    pub cell_size: f64,
    pub margin: f64,
}

impl Lattice {
    /// The extension tower's face: the housing's inner width by the tower height.
    pub fn extension(params: &Parameters) -> Self {
        Self {
            width: params.mount_inner_width,
            height: params.base.extension_height,
            cell_size: params.base.extension_pattern_size,
            margin: params.base.extension_pattern_margin,
        }
    }

    pub fn gap(&self) -> f64 {
        self.cell_size / 2.0 + self.margin
    }

    /// Accepted hexagon centers.
    pub fn centers(&self) -> Vec<Vector2<f64>> {
        let g = self.gap();
        let (hw, hh) = (self.width / 2.0, self.height / 2.0);
        let i_max = (hw / (1.5 * g)).ceil() as i64 + 1;
        let j_max = (hh / (SQRT_3 * g)).ceil() as i64 + i_max;

        let mut out = Vec::new();
        for i in -i_max..=i_max {
            for j in -j_max..=j_max {
                let x = g * i as f64 * 1.5;
                let y = g * (SQRT_3 / 2.0 * i as f64 + SQRT_3 * j as f64);
                if x > -hw + g && x < hw - g && y > -hh + g && y < hh - g {
                    out.push(Vector2::new(x, y));
                }
            }
        }
        out
    }

    pub fn cells(&self) -> Vec<LatticeCell> {
        self.centers()
            .into_iter()
            .map(|center| LatticeCell {
                center,
                size: self.cell_size,
                rotation: PI / 6.0,
            })
            .collect()
    }

    /// Upper bound on the number of cells that fit the rectangle.
    pub fn packing_bound(&self) -> usize {
        let g = self.gap();
        (self.width * self.height / (CELL_AREA_FACTOR * g * g)).floor() as usize
    }

    /// Cutout profile: every hexagon, or one `cell_size` square in preview.
    pub fn profile(&self, preview: bool) -> Profile {
        if preview {
            return Profile::rect(Vector2::zeros(), self.cell_size, self.cell_size);
        }
        let cells = self.cells();
        debug!(
            "lattice {}x{}: {} cells (bound {})",
            self.width,
            self.height,
            cells.len(),
            self.packing_bound()
        );
        Profile::batch(cells.iter().map(LatticeCell::profile).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tiny_rectangle_has_no_cells() {
        let lattice = Lattice {
            width: 12.0,
            height: 12.0,
            cell_size: 10.0,
            margin: 1.5,
        };
        assert!(lattice.centers().is_empty());
    }

    #[test]
    fn neighbours_leave_a_web() {
        let lattice = Lattice {
            width: 82.0,
            height: 150.0,
            cell_size: 10.0,
            margin: 1.5,
        };
        let centers = lattice.centers();
        let min_pitch = centers
            .iter()
            .enumerate()
            .flat_map(|(k, a)| centers[k + 1..].iter().map(move |b| (a - b).norm()))
            .fold(f64::INFINITY, f64::min);
        assert!(min_pitch > lattice.cell_size);
    }
}
