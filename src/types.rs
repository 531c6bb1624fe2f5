use std::collections::HashMap;

use nalgebra::Vector3;

/// A triangle mesh tessellated from a solid.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TriangleMesh {
    /// Vertex positions.
    pub vertices: Vec<Vector3<f64>>,
    /// Triangle indices (every 3 consecutive values form one triangle),
    /// counter-clockwise seen from outside.
    pub indices: Vec<u32>,
}

impl TriangleMesh {
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Every directed edge is matched by exactly one opposite edge: the
    /// surface is closed, edge-manifold and consistently oriented.
    pub fn is_watertight(&self) -> bool {
        if self.is_empty() {
            return false;
        }
        let mut directed: HashMap<(u32, u32), u32> = HashMap::new();
        for tri in self.indices.chunks_exact(3) {
            for (a, b) in [(tri[0], tri[1]), (tri[1], tri[2]), (tri[2], tri[0])] {
                *directed.entry((a, b)).or_insert(0) += 1;
            }
        }
        directed
            .iter()
            .all(|(&(a, b), &count)| count == 1 && directed.get(&(b, a)) == Some(&1))
    }

    /// Number of edge-connected components.
    pub fn shell_count(&self) -> usize {
        let n = self.vertices.len();
        let mut parent: Vec<usize> = (0..n).collect();

        fn find(parent: &mut [usize], mut i: usize) -> usize {
            while parent[i] != i {
                parent[i] = parent[parent[i]];
                i = parent[i];
            }
            i
        }

        for tri in self.indices.chunks_exact(3) {
            let a = find(&mut parent, tri[0] as usize);
            for &v in &tri[1..] {
                let b = find(&mut parent, v as usize);
                if a != b {
                    parent[b] = a;
                }
            }
        }

        let mut used = vec![false; n];
        for &i in &self.indices {
            used[i as usize] = true;
        }
        let mut roots: Vec<usize> = (0..n)
            .filter(|&i| used[i])
            .map(|i| find(&mut parent, i))
            .collect();
        roots.sort_unstable();
        roots.dedup();
        roots.len()
    }

    /// Enclosed volume (divergence theorem). Positive for outward winding.
    pub fn volume(&self) -> f64 {
        self.indices
            .chunks_exact(3)
            .map(|tri| {
                let a = self.vertices[tri[0] as usize];
                let b = self.vertices[tri[1] as usize];
                let c = self.vertices[tri[2] as usize];
                a.dot(&b.cross(&c)) / 6.0
            })
            .sum()
    }

    pub fn bounding_box(&self) -> BBox3 {
        let mut bbox = BBox3::empty();
        for &i in &self.indices {
            bbox = bbox.include(self.vertices[i as usize]);
        }
        bbox
    }
}

/// Axis-aligned bounding box. Components may be infinite for half-spaces.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BBox3 {
    pub min: Vector3<f64>,
    pub max: Vector3<f64>,
}

impl BBox3 {
    pub fn new(min: Vector3<f64>, max: Vector3<f64>) -> Self {
        Self { min, max }
    }

    /// Box centered at `center` with the given half extents.
    pub fn centered(center: Vector3<f64>, half_extents: Vector3<f64>) -> Self {
        Self::new(center - half_extents, center + half_extents)
    }

    /// The inverted box: identity for `union`/`include`.
    pub fn empty() -> Self {
        Self::new(
            Vector3::from_element(f64::INFINITY),
            Vector3::from_element(f64::NEG_INFINITY),
        )
    }

    pub fn everything() -> Self {
        Self::new(
            Vector3::from_element(f64::NEG_INFINITY),
            Vector3::from_element(f64::INFINITY),
        )
    }

    pub fn center(&self) -> Vector3<f64> {
        (self.min + self.max) * 0.5
    }

    pub fn size(&self) -> Vector3<f64> {
        self.max - self.min
    }

    pub fn is_finite(&self) -> bool {
        self.min.iter().chain(self.max.iter()).all(|v| v.is_finite())
    }

    pub fn is_empty(&self) -> bool {
        (0..3).any(|i| self.min[i] > self.max[i])
    }

    pub fn contains(&self, p: Vector3<f64>) -> bool {
        (0..3).all(|i| p[i] >= self.min[i] && p[i] <= self.max[i])
    }

    pub fn union(&self, other: &BBox3) -> BBox3 {
        BBox3::new(self.min.inf(&other.min), self.max.sup(&other.max))
    }

    pub fn intersection(&self, other: &BBox3) -> BBox3 {
        BBox3::new(self.min.sup(&other.min), self.max.inf(&other.max))
    }

    pub fn include(&self, p: Vector3<f64>) -> BBox3 {
        BBox3::new(self.min.inf(&p), self.max.sup(&p))
    }

    /// The 8 corners of the box.
    pub fn corners(&self) -> [Vector3<f64>; 8] {
        let (mn, mx) = (self.min, self.max);
        [
            Vector3::new(mn.x, mn.y, mn.z),
            Vector3::new(mx.x, mn.y, mn.z),
            Vector3::new(mn.x, mx.y, mn.z),
            Vector3::new(mx.x, mx.y, mn.z),
            Vector3::new(mn.x, mn.y, mx.z),
            Vector3::new(mx.x, mn.y, mx.z),
            Vector3::new(mn.x, mx.y, mx.z),
            Vector3::new(mx.x, mx.y, mx.z),
        ]
    }
}
