//! Fastener holes: placement patterns, hole geometry and companion
//! registration.
//!
//! A [`HolePlacement`] describes every hole of one pattern. [`cut_holes`]
//! turns it into one batched subtraction on the host and, when given the
//! assembly, registers one companion part per hole.

use std::f64::consts::PI;

use log::warn;
use nalgebra::{Vector2, Vector3};
use serde::{Deserialize, Serialize};

use crate::assembly::Assembly;
use crate::catalog::{Fit, FitClass, FastenerSpec};
use crate::error::{GeometryError, Result};
use crate::frame::Frame;
use crate::profile::Profile;
use crate::solid::Solid;

/// Height a hole tool reaches above the face so it cuts cleanly.
const OVERCUT: f64 = 0.5;

/// Hole depths may exceed the measured material by this much unnoticed.
const DEPTH_TOLERANCE: f64 = 1e-3;

/// Radial distance outside the hole wall where material depth is measured.
const WALL_PROBE: f64 = 0.05;

/// Hole positions in workplane-local coordinates.
#[derive(Clone, Debug, PartialEq)]
pub enum Pattern {
    Single(Vector2<f64>),
    /// Centered `x_count × y_count` grid.
    Rect {
        x_spacing: f64,
        y_spacing: f64,
        x_count: usize,
        y_count: usize,
    },
    /// `count` points evenly around a full circle, the first at `start_deg`.
    Polar {
        radius: f64,
        start_deg: f64,
        count: usize,
    },
}

impl Pattern {
    pub fn center() -> Self {
        Pattern::Single(Vector2::zeros())
    }

    pub fn points(&self) -> Vec<Vector2<f64>> {
        match *self {
            Pattern::Single(p) => vec![p],
            Pattern::Rect {
                x_spacing,
                y_spacing,
                x_count,
                y_count,
            } => {
                let x0 = (x_count as f64 - 1.0) / 2.0;
                let y0 = (y_count as f64 - 1.0) / 2.0;
                let mut out = Vec::with_capacity(x_count * y_count);
                for i in 0..x_count {
                    for j in 0..y_count {
                        out.push(Vector2::new(
                            (i as f64 - x0) * x_spacing,
                            (j as f64 - y0) * y_spacing,
                        ));
                    }
                }
                out
            }
            Pattern::Polar {
                radius,
                start_deg,
                count,
            } => (0..count)
                .map(|k| {
                    let angle = start_deg.to_radians() + 2.0 * PI * k as f64 / count as f64;
                    Vector2::new(radius * angle.cos(), radius * angle.sin())
                })
                .collect(),
        }
    }
}

/// What to do when a blind hole is deeper than the material under it.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HoleDepthPolicy {
    /// Log a warning and cut the requested depth.
    Warn,
    /// Cut only as deep as the material.
    #[default]
    Clamp,
    /// Fail with [`GeometryError::HoleTooDeep`].
    Reject,
}

#[derive(Clone, Debug, PartialEq)]
pub struct HolePlacement {
    pub pattern: Pattern,
    pub fastener: FastenerSpec,
    pub fit_class: FitClass,
    pub fit: Fit,
    /// Added to the hole radius for printed-part shrinkage.
    pub compensation: f64,
    /// Blind depth; `None` cuts through the whole host.
    pub depth: Option<f64>,
    pub counterbore: bool,
    /// Height of a 45° entry chamfer.
    pub lead_in: f64,
    /// Whether each hole adds a companion part to the assembly.
    pub register: bool,
}

impl HolePlacement {
    fn new(fastener: FastenerSpec, fit_class: FitClass, pattern: Pattern) -> Self {
        Self {
            pattern,
            fastener,
            fit_class,
            fit: Fit::default(),
            compensation: 0.0,
            depth: None,
            counterbore: false,
            lead_in: 0.0,
            register: true,
        }
    }

    /// Through hole at clearance diameter, counterbored for the head.
    pub fn clearance(fastener: FastenerSpec, pattern: Pattern) -> Self {
        Self {
            counterbore: true,
            ..Self::new(fastener, FitClass::Clearance, pattern)
        }
    }

    /// Blind hole at tap-drill diameter.
    pub fn threaded(fastener: FastenerSpec, pattern: Pattern, depth: f64) -> Self {
        Self {
            depth: Some(depth),
            ..Self::new(fastener, FitClass::Threaded, pattern)
        }
    }

    /// Blind seat at the outer diameter, e.g. for a bearing or an insert.
    /// The depth defaults to the catalog seat depth.
    pub fn press_fit(fastener: FastenerSpec, pattern: Pattern) -> Self {
        Self {
            depth: Some(fastener.dims().seat_depth),
            ..Self::new(fastener, FitClass::PressFit, pattern)
        }
    }

    pub fn with_fit(self, fit: Fit) -> Self {
        Self { fit, ..self }
    }

    pub fn with_depth(self, depth: f64) -> Self {
        Self {
            depth: Some(depth),
            ..self
        }
    }

    pub fn with_compensation(self, compensation: f64) -> Self {
        Self { compensation, ..self }
    }

    pub fn with_lead_in(self, lead_in: f64) -> Self {
        Self { lead_in, ..self }
    }

    pub fn with_counterbore(self, counterbore: bool) -> Self {
        Self { counterbore, ..self }
    }

    /// Cut the holes without adding companion parts.
    pub fn unregistered(self) -> Self {
        Self {
            register: false,
            ..self
        }
    }

    pub fn diameter(&self) -> f64 {
        let dims = self.fastener.dims();
        match self.fit_class {
            FitClass::Clearance => dims.clearance_diameter(self.fit),
            FitClass::Threaded => dims.tap_diameter,
            FitClass::PressFit => dims.press_fit_diameter(self.fit, self.compensation),
        }
    }

    fn counterbore_depth(&self) -> f64 {
        if self.counterbore && self.fit_class == FitClass::Clearance {
            self.fastener.dims().seat_depth
        } else {
            0.0
        }
    }

    /// Hole tool in the seat frame: the face at z = 0, the hole along -Z.
    fn tool(&self, depth: f64) -> Solid {
        let radius = self.diameter() / 2.0;
        let circle = |r: f64| Profile::circle(Vector2::zeros(), r);
        let mut parts = vec![Solid::prism(circle(radius), -depth, OVERCUT)];

        let cbore = self.counterbore_depth();
        if cbore > 0.0 {
            let r = self.fastener.dims().counterbore_diameter(self.fit) / 2.0;
            parts.push(Solid::prism(circle(r), -cbore, OVERCUT));
        }
        if self.lead_in > 0.0 {
            let h = self.lead_in.min(depth);
            parts.push(
                Solid::cone(radius, radius + h, h).translate(Vector3::new(0.0, 0.0, -h / 2.0)),
            );
        }
        Solid::union_all(parts)
    }
}

/// Cut every hole of `placement` into `host` from the workplane `frame`.
/// Holes go in along `-frame.normal`.
pub fn cut_holes(
    host: Solid,
    frame: &Frame,
    placement: &HolePlacement,
    policy: HoleDepthPolicy,
    assembly: Option<&mut Assembly>,
) -> Result<Solid> {
    let points = placement.pattern.points();
    if points.is_empty() {
        return Err(GeometryError::EmptyPattern("hole").into());
    }

    let mut tools = Vec::with_capacity(points.len());
    let mut seats = Vec::with_capacity(points.len());
    for p in &points {
        let seat = frame.shifted(*p);
        let depth = match placement.depth {
            None => {
                let (lo, _) = host.extent_along(&seat);
                -lo + 1.0
            }
            Some(requested) => checked_depth(&host, &seat, requested, placement.diameter() / 2.0, policy)?,
        };
        tools.push(placement.tool(depth).placed(&seat));
        seats.push(seat);
    }

    if placement.register {
        if let Some(assembly) = assembly {
            let sink = placement.counterbore_depth();
            for seat in &seats {
                assembly.register_companion(&placement.fastener, &seat.offset(-sink))?;
            }
        }
    }

    Ok(host.subtract_all(tools))
}

/// Material depth is measured just outside the hole wall, so a coaxial hole
/// cut earlier does not hide the wall around this one.
fn checked_depth(
    host: &Solid,
    seat: &Frame,
    requested: f64,
    radius: f64,
    policy: HoleDepthPolicy,
) -> Result<f64> {
    let r = radius + WALL_PROBE;
    let available = [(r, 0.0), (-r, 0.0), (0.0, r), (0.0, -r)]
        .iter()
        .map(|&(x, y)| {
            let start = seat.to_world(Vector2::new(x, y));
            host.material_depth(start, -seat.normal, requested + 1.0)
        })
        .fold(f64::INFINITY, f64::min);
    if available + DEPTH_TOLERANCE >= requested {
        return Ok(requested);
    }
    let at = seat.origin;
    match policy {
        HoleDepthPolicy::Warn => {
            warn!(
                "hole depth {requested:.2} exceeds {available:.2} of material at ({:.2}, {:.2}, {:.2})",
                at.x, at.y, at.z
            );
            Ok(requested)
        }
        HoleDepthPolicy::Clamp => Ok(available),
        HoleDepthPolicy::Reject => Err(GeometryError::HoleTooDeep {
            depth: requested,
            available,
            x: at.x,
            y: at.y,
            z: at.z,
        }
        .into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn rect_pattern_is_centered() {
        let pts = Pattern::Rect {
            x_spacing: 77.0,
            y_spacing: 7.0,
            x_count: 2,
            y_count: 2,
        }
        .points();
        assert_eq!(pts.len(), 4);
        assert_relative_eq!(pts[0], Vector2::new(-38.5, -3.5));
        assert_relative_eq!(pts[3], Vector2::new(38.5, 3.5));
    }

    #[test]
    fn polar_pattern_is_evenly_spaced() {
        let pts = Pattern::Polar {
            radius: 22.0,
            start_deg: 0.0,
            count: 8,
        }
        .points();
        assert_eq!(pts.len(), 8);
        for (a, b) in pts.iter().zip(pts.iter().cycle().skip(1)) {
            assert_relative_eq!((a - b).norm(), 2.0 * 22.0 * (PI / 8.0).sin(), epsilon = 1e-9);
        }
    }

    #[test]
    fn depth_policy_applies_to_thin_plates() {
        let plate = Solid::box3(20.0, 20.0, 4.0);
        let frame = Frame::new(Vector3::new(0.0, 0.0, 2.0), Vector3::z());
        let insert = FastenerSpec::insert("M3-0.5-6").unwrap();
        let holes = HolePlacement::press_fit(insert, Pattern::center());

        let err = cut_holes(plate.clone(), &frame, &holes, HoleDepthPolicy::Reject, None).unwrap_err();
        assert!(matches!(
            err,
            crate::error::Error::Geometry(GeometryError::HoleTooDeep { .. })
        ));
        let warned = cut_holes(plate.clone(), &frame, &holes, HoleDepthPolicy::Warn, None).unwrap();
        assert!(!warned.contains(Vector3::new(0.0, 0.0, 0.0)));
        let clamped = cut_holes(plate, &frame, &holes, HoleDepthPolicy::Clamp, None).unwrap();
        assert!(!clamped.contains(Vector3::new(0.0, 0.0, -1.9)));
    }
}
