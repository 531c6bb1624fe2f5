//! 2D cross-section profiles, extruded into prisms by the kernel.
//!
//! Profiles are drawn in workplane-local coordinates. A [`ProfileBatch`]
//! unions many profiles so a whole pattern is cut with one boolean.

use std::f64::consts::PI;

use nalgebra::Vector2;

use crate::primitives;

#[derive(Clone, Debug, PartialEq)]
pub enum Profile {
    Circle {
        center: Vector2<f64>,
        radius: f64,
    },
    /// Rectangle with optional corner fillet.
    Rect {
        center: Vector2<f64>,
        half_extents: Vector2<f64>,
        corner_radius: f64,
    },
    /// Regular polygon; `rotation` is the angle of the first vertex.
    RegularPolygon {
        center: Vector2<f64>,
        circumradius: f64,
        sides: u32,
        rotation: f64,
    },
    Batch(ProfileBatch),
}

impl Profile {
    pub fn circle(center: Vector2<f64>, radius: f64) -> Self {
        Profile::Circle { center, radius }
    }

    /// Rectangle of full size `width × height` centered at `center`.
    pub fn rect(center: Vector2<f64>, width: f64, height: f64) -> Self {
        Profile::Rect {
            center,
            half_extents: Vector2::new(width / 2.0, height / 2.0),
            corner_radius: 0.0,
        }
    }

    /// Rectangle with its four vertices filleted by `radius`.
    pub fn rounded_rect(center: Vector2<f64>, width: f64, height: f64, radius: f64) -> Self {
        Profile::Rect {
            center,
            half_extents: Vector2::new(width / 2.0, height / 2.0),
            corner_radius: radius,
        }
    }

    pub fn regular_polygon(center: Vector2<f64>, circumradius: f64, sides: u32, rotation: f64) -> Self {
        Profile::RegularPolygon {
            center,
            circumradius,
            sides: sides.max(3),
            rotation,
        }
    }

    pub fn batch(items: Vec<Profile>) -> Self {
        Profile::Batch(ProfileBatch::new(items))
    }

    /// Signed distance bound in the profile plane.
    pub fn evaluate(&self, p: Vector2<f64>) -> f64 {
        match self {
            Profile::Circle { center, radius } => primitives::sdf_circle(p, *center, *radius),
            Profile::Rect {
                center,
                half_extents,
                corner_radius,
            } => primitives::sdf_rounded_rect(p, *center, *half_extents, *corner_radius),
            Profile::RegularPolygon {
                center,
                circumradius,
                sides,
                rotation,
            } => primitives::sdf_regular_polygon(p, *center, *circumradius, *sides, *rotation),
            Profile::Batch(batch) => batch.evaluate(p),
        }
    }

    /// Circle enclosing the profile.
    pub fn bounding_circle(&self) -> (Vector2<f64>, f64) {
        match self {
            Profile::Circle { center, radius } => (*center, *radius),
            Profile::Rect {
                center, half_extents, ..
            } => (*center, half_extents.norm()),
            Profile::RegularPolygon {
                center, circumradius, ..
            } => (*center, *circumradius),
            Profile::Batch(batch) => {
                let (min, max) = batch.bounds();
                ((min + max) * 0.5, (max - min).norm() * 0.5)
            }
        }
    }

    /// Axis-aligned bounds `(min, max)` in the profile plane.
    pub fn bounds(&self) -> (Vector2<f64>, Vector2<f64>) {
        match self {
            Profile::Circle { center, radius } => {
                let r = Vector2::new(*radius, *radius);
                (center - r, center + r)
            }
            Profile::Rect {
                center, half_extents, ..
            } => (center - half_extents, center + half_extents),
            Profile::RegularPolygon {
                center, circumradius, ..
            } => {
                let r = Vector2::new(*circumradius, *circumradius);
                (center - r, center + r)
            }
            Profile::Batch(batch) => batch.bounds(),
        }
    }

    /// Factor `s` such that `evaluate(p) >= s * (|p - c| - r)` for the
    /// bounding circle `(c, r)`.
    fn bound_scale(&self) -> f64 {
        match self {
            Profile::Circle { .. } | Profile::Rect { .. } => 1.0,
            Profile::RegularPolygon { sides, .. } => (PI / f64::from((*sides).max(3))).cos(),
            Profile::Batch(batch) => batch.scales.iter().copied().fold(1.0, f64::min),
        }
    }

    /// Number of leaf shapes in the profile.
    pub fn len(&self) -> usize {
        match self {
            Profile::Batch(batch) => batch.items.iter().map(Profile::len).sum(),
            _ => 1,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Union of profiles with bounding-circle culling on evaluation.
#[derive(Clone, Debug, PartialEq)]
pub struct ProfileBatch {
    items: Vec<Profile>,
    circles: Vec<(Vector2<f64>, f64)>,
    scales: Vec<f64>,
}

impl ProfileBatch {
    pub fn new(items: Vec<Profile>) -> Self {
        let circles = items.iter().map(Profile::bounding_circle).collect();
        let scales = items.iter().map(Profile::bound_scale).collect();
        Self {
            items,
            circles,
            scales,
        }
    }

    fn evaluate(&self, p: Vector2<f64>) -> f64 {
        let mut best = f64::INFINITY;
        for ((item, (center, radius)), scale) in
            self.items.iter().zip(&self.circles).zip(&self.scales)
        {
            // An item whose lower bound already exceeds the best value
            // cannot lower the minimum.
            let lower = scale * ((p - center).norm() - radius);
            if lower >= best {
                continue;
            }
            best = best.min(item.evaluate(p));
        }
        best
    }

    fn bounds(&self) -> (Vector2<f64>, Vector2<f64>) {
        self.items.iter().map(Profile::bounds).fold(
            (
                Vector2::from_element(f64::INFINITY),
                Vector2::from_element(f64::NEG_INFINITY),
            ),
            |(min, max), (lo, hi)| (min.inf(&lo), max.sup(&hi)),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn batch_matches_brute_force_minimum() {
        let items: Vec<Profile> = (0..10)
            .map(|i| Profile::regular_polygon(Vector2::new(i as f64 * 7.0, 0.0), 3.0, 6, 0.5))
            .collect();
        let batch = Profile::batch(items.clone());
        for k in 0..200 {
            let p = Vector2::new(k as f64 * 0.37 - 5.0, (k % 7) as f64 - 3.0);
            let brute = items.iter().map(|i| i.evaluate(p)).fold(f64::INFINITY, f64::min);
            assert!((batch.evaluate(p) - brute).abs() < 1e-12);
        }
        assert_eq!(batch.len(), 10);
    }
}
