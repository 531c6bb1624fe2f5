//! Tessellation by marching tetrahedra.
//!
//! The solid is sampled on a uniform corner grid (see [`SampleGrid`]) whose
//! outer layer lies outside the solid. Every cube is split into the six
//! Kuhn tetrahedra around its main diagonal; the split is the same in every
//! cube, so neighbouring tetrahedra share their faces exactly. Surface
//! vertices are keyed by the grid edge they sit on, which makes the result
//! closed and edge-manifold by construction.
//!
//! Triangle winding is decided on edge midpoints rather than on the
//! interpolated positions, so near-degenerate triangles still get the
//! orientation of their neighbours.

use std::collections::HashMap;

use nalgebra::Vector3;

use crate::dag::Sdf;
use crate::error::GeometryError;
use crate::types::{BBox3, TriangleMesh};
use crate::voxel::SampleGrid;

/// Corner offsets of a cube, bit 0 = x, bit 1 = y, bit 2 = z.
const CORNERS: [[usize; 3]; 8] = [
    [0, 0, 0],
    [1, 0, 0],
    [0, 1, 0],
    [1, 1, 0],
    [0, 0, 1],
    [1, 0, 1],
    [0, 1, 1],
    [1, 1, 1],
];

/// Kuhn split: one tetrahedron per axis permutation (a, b, c), with
/// vertices `0, e_a, e_a + e_b, 7`.
const TETS: [[usize; 4]; 6] = [
    [0, 1, 3, 7],
    [0, 1, 5, 7],
    [0, 2, 3, 7],
    [0, 2, 6, 7],
    [0, 4, 5, 7],
    [0, 4, 6, 7],
];

/// Tessellate `sdf` inside `bbox` with cubes of edge `cell_size`.
pub fn tessellate(sdf: &dyn Sdf, bbox: &BBox3, cell_size: f64) -> Result<TriangleMesh, GeometryError> {
    if bbox.is_empty() {
        return Ok(TriangleMesh::default());
    }
    if !bbox.is_finite() {
        return Err(GeometryError::Unbounded);
    }
    let grid = SampleGrid::sample(sdf, bbox, cell_size, 2)?;
    Ok(march(&grid))
}

/// Extract the zero level set of a sampled grid.
pub fn march(grid: &SampleGrid) -> TriangleMesh {
    let mut builder = MeshBuilder::new(grid);
    let [nx, ny, nz] = grid.dims;

    for ix in 0..nx.saturating_sub(1) {
        for iy in 0..ny.saturating_sub(1) {
            for iz in 0..nz.saturating_sub(1) {
                let mut ids = [0usize; 8];
                let mut inside = 0;
                for (k, off) in CORNERS.iter().enumerate() {
                    ids[k] = grid.index(ix + off[0], iy + off[1], iz + off[2]);
                    if grid.values[ids[k]] < 0.0 {
                        inside += 1;
                    }
                }
                if inside == 0 || inside == 8 {
                    continue;
                }
                for tet in &TETS {
                    builder.tetrahedron([ids[tet[0]], ids[tet[1]], ids[tet[2]], ids[tet[3]]]);
                }
            }
        }
    }

    builder.mesh
}

struct MeshBuilder<'a> {
    grid: &'a SampleGrid,
    edge_vertices: HashMap<(usize, usize), u32>,
    mesh: TriangleMesh,
}

impl<'a> MeshBuilder<'a> {
    fn new(grid: &'a SampleGrid) -> Self {
        Self {
            grid,
            edge_vertices: HashMap::new(),
            mesh: TriangleMesh::default(),
        }
    }

    fn is_inside(&self, id: usize) -> bool {
        self.grid.values[id] < 0.0
    }

    fn position(&self, id: usize) -> Vector3<f64> {
        self.grid.point_at(id)
    }

    fn midpoint(&self, a: usize, b: usize) -> Vector3<f64> {
        (self.position(a) + self.position(b)) * 0.5
    }

    /// Surface vertex on the grid edge `(a, b)`, shared by every tet using it.
    fn edge_vertex(&mut self, a: usize, b: usize) -> u32 {
        let key = (a.min(b), a.max(b));
        if let Some(&v) = self.edge_vertices.get(&key) {
            return v;
        }
        let (va, vb) = (self.grid.values[key.0], self.grid.values[key.1]);
        let t = (va / (va - vb)).clamp(0.0, 1.0);
        let (pa, pb) = (self.position(key.0), self.position(key.1));
        let index = self.mesh.vertices.len() as u32;
        self.mesh.vertices.push(pa + (pb - pa) * t);
        self.edge_vertices.insert(key, index);
        index
    }

    /// Emit triangle `(e0, e1, e2)` (each a grid edge) so that its normal
    /// points along `outward`.
    fn triangle(&mut self, edges: [(usize, usize); 3], outward: Vector3<f64>) {
        let m: Vec<Vector3<f64>> = edges.iter().map(|&(a, b)| self.midpoint(a, b)).collect();
        let normal = (m[1] - m[0]).cross(&(m[2] - m[0]));
        let order = if normal.dot(&outward) >= 0.0 {
            [0, 1, 2]
        } else {
            [0, 2, 1]
        };
        for k in order {
            let (a, b) = edges[k];
            let v = self.edge_vertex(a, b);
            self.mesh.indices.push(v);
        }
    }

    fn tetrahedron(&mut self, ids: [usize; 4]) {
        let (inside, outside): (Vec<usize>, Vec<usize>) =
            ids.iter().copied().partition(|&id| self.is_inside(id));

        match inside.len() {
            1 => {
                let a = inside[0];
                let [b, c, d] = [outside[0], outside[1], outside[2]];
                let outward = self.midpoint(a, b) - self.position(a);
                self.triangle([(a, b), (a, c), (a, d)], outward);
            }
            3 => {
                let d = outside[0];
                let [a, b, c] = [inside[0], inside[1], inside[2]];
                let outward = self.position(d) - self.midpoint(a, d);
                self.triangle([(a, d), (b, d), (c, d)], outward);
            }
            2 => {
                let [a, b] = [inside[0], inside[1]];
                let [c, d] = [outside[0], outside[1]];
                let outward = (self.position(c) + self.position(d) - self.position(a) - self.position(b)) * 0.5;
                // Quad (ac, ad, bd, bc), split along ac-bd. Both halves take
                // the winding of the first so they agree on the diagonal.
                let quad = [(a, c), (a, d), (b, d), (b, c)];
                let m: Vec<Vector3<f64>> = quad.iter().map(|&(p, q)| self.midpoint(p, q)).collect();
                let normal = (m[1] - m[0]).cross(&(m[2] - m[0]));
                let cycle = if normal.dot(&outward) >= 0.0 {
                    quad
                } else {
                    [quad[0], quad[3], quad[2], quad[1]]
                };
                let v: Vec<u32> = cycle.iter().map(|&(p, q)| self.edge_vertex(p, q)).collect();
                self.mesh.indices.extend_from_slice(&[v[0], v[1], v[2], v[0], v[2], v[3]]);
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dag::SolidNode;
    use approx::assert_relative_eq;

    #[test]
    fn box_mesh_is_closed_and_has_the_box_volume() {
        let cube = SolidNode::Box3 {
            half_extents: Vector3::new(2.0, 3.0, 1.5),
        };
        let mesh = tessellate(&cube, &cube.bounding_box(), 0.5).unwrap();
        assert!(mesh.is_watertight());
        assert_eq!(mesh.shell_count(), 1);
        assert_relative_eq!(mesh.volume(), 4.0 * 6.0 * 3.0, max_relative = 0.05);
    }

    #[test]
    fn unbounded_solid_is_rejected() {
        let hs = SolidNode::HalfSpace {
            normal: Vector3::new(1.0, 1.0, 0.0).normalize(),
            d: 0.0,
        };
        assert_eq!(
            tessellate(&hs, &hs.bounding_box(), 1.0),
            Err(GeometryError::Unbounded)
        );
    }
}
