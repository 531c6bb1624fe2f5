//! Parameter model: base constants and the dimensions derived from them.
//!
//! [`BaseParameters`] is what a user can set (every field has the default
//! of the reference build). [`Parameters::derive`] computes every other
//! dimension once, in dependency order, and rejects any non-positive result
//! before geometry construction starts.

use log::debug;
use serde::{Deserialize, Serialize};

use crate::catalog::FastenerSpec;
use crate::error::{ConfigError, Result};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BaseParameters {
    pub wheel_radius: f64,
    pub wheel_thickness: f64,
    pub bearing: String,
    pub wheel_groove_offset: f64,
    pub wheel_groove_ratio: f64,
    pub wheel_rim_margin: f64,
    /// Least material left between the web torus and the groove or the far face.
    pub wheel_web_wall: f64,
    pub mount_gap: f64,
    pub mount_tolerance: f64,
    pub wall_thickness: f64,
    pub relief_pattern_divisor: f64,
    pub relief_pattern_fillet: f64,
    pub intake_holder_thickness: f64,
    pub intake_height: f64,
    pub intake_inset: f64,
    pub intake_attachment_inset: f64,
    pub intake_attachment_spacing: f64,
    pub passthrough_radius: f64,
    pub coupler_depth: f64,
    pub extension_height: f64,
    pub extension_pattern_size: f64,
    pub extension_pattern_margin: f64,
    pub extension_mount_width: f64,
    pub extension_mount_height: f64,
    pub insert_depth: f64,
    pub insert_compensation: f64,
    pub insert_lead_in: f64,
    pub mounting_connector_width: f64,
}

impl Default for BaseParameters {
    fn default() -> Self {
        Self {
            wheel_radius: 35.0,
            wheel_thickness: 12.0,
            bearing: "M8-22-7".to_string(),
            wheel_groove_offset: 2.0,
            wheel_groove_ratio: 0.45,
            wheel_rim_margin: 2.0,
            wheel_web_wall: 0.9,
            mount_gap: 6.0,
            mount_tolerance: 0.4,
            wall_thickness: 2.5,
            relief_pattern_divisor: 2.75,
            relief_pattern_fillet: 2.0,
            intake_holder_thickness: 4.0,
            intake_height: 8.0,
            intake_inset: 12.0,
            intake_attachment_inset: 5.0,
            intake_attachment_spacing: 7.0,
            passthrough_radius: 1.5,
            coupler_depth: 8.0,
            extension_height: 150.0,
            extension_pattern_size: 10.0,
            extension_pattern_margin: 1.5,
            extension_mount_width: 10.0,
            extension_mount_height: 8.0,
            insert_depth: 6.0,
            insert_compensation: 0.3,
            insert_lead_in: 0.5,
            mounting_connector_width: 20.0,
        }
    }
}

/// Purchased parts used by the builders.
#[derive(Clone, Debug, PartialEq)]
pub struct Hardware {
    pub bearing: FastenerSpec,
    pub center_screw: FastenerSpec,
    pub connector_screw: FastenerSpec,
    pub intake_screw: FastenerSpec,
    pub coupler: FastenerSpec,
    pub insert: FastenerSpec,
}

impl Hardware {
    fn resolve(bearing: &str) -> Result<Self> {
        Ok(Self {
            bearing: FastenerSpec::bearing(bearing)?,
            center_screw: FastenerSpec::screw("M3-0.5", 12.0)?,
            connector_screw: FastenerSpec::screw("M3-0.5", 10.0)?,
            intake_screw: FastenerSpec::screw("M3-0.5", 10.0)?,
            coupler: FastenerSpec::screw("13/32-28", 16.0)?,
            insert: FastenerSpec::insert("M3-0.5-6")?,
        })
    }
}

/// Every dimension the builders use. Read-only once derived.
#[derive(Clone, Debug, PartialEq)]
pub struct Parameters {
    pub base: BaseParameters,
    pub hardware: Hardware,

    // Wheel
    pub groove_major_radius: f64,
    pub groove_minor_radius: f64,
    /// Radial room between the bearing race and the wheel rim.
    pub rim_width: f64,
    pub hole_array_radius: f64,
    pub hole_radius: f64,
    pub web_major_radius: f64,
    pub web_minor_radius: f64,
    pub web_offset: f64,
    pub relief_bore_diameter: f64,

    // Mount housing
    pub mount_outer_width: f64,
    pub mount_inner_width: f64,
    pub mount_height: f64,
    pub mount_outer_depth: f64,
    pub mount_inner_depth: f64,
    pub rear_boss_length: f64,
    pub front_boss_length: f64,
    pub boss_radius: f64,
    pub friction_relief_radius: f64,
    pub friction_relief_offset: f64,
    pub friction_relief_depth: f64,
    pub relief_cell_width: f64,
    pub relief_cell_height: f64,
    pub relief_pitch_x: f64,
    pub relief_pitch_y: f64,
    pub flange_insert_pitch: f64,
    /// Insert depth in the flange, never more than the flange is thick.
    pub flange_insert_depth: f64,
    pub passthrough_pitch: f64,
    pub passthrough_depth: f64,

    // Tower and connector
    pub lug_pitch: f64,
    pub rail_pitch: f64,
    pub connector_length: f64,
    pub receiver_height: f64,
    pub lattice_gap: f64,

    // Part placement along Z
    pub intake_center_z: f64,
    pub tower_center_z: f64,
    pub connector_center_z: f64,
}

impl Parameters {
    pub fn derive(base: BaseParameters) -> Result<Self> {
        let hardware = Hardware::resolve(&base.bearing)?;
        let bearing = hardware.bearing.dims();
        let b = &base;

        let rim_width = b.wheel_radius - bearing.outer / 2.0;
        let mount_outer_width = 2.0 * b.wheel_radius + 2.0 * b.mount_gap + 2.0 * b.wall_thickness;
        let mount_inner_width = mount_outer_width - 2.0 * b.wall_thickness;
        let mount_height = 2.0 * b.wheel_radius + b.mount_gap;
        let mount_outer_depth = b.wheel_thickness + 2.0 * b.wall_thickness + 2.0 * b.mount_tolerance;
        let mount_inner_depth = mount_outer_depth - 2.0 * b.wall_thickness;

        // The web torus sits on the +Y face at `rim_width`; its section
        // circle must clear the groove circle and the -Y face by the web wall.
        let groove_major_radius = b.wheel_radius + b.wheel_groove_offset;
        let groove_minor_radius = b.wheel_thickness * b.wheel_groove_ratio;
        let section_gap = (groove_major_radius - rim_width).hypot(b.wheel_thickness / 2.0);
        let web_minor_radius = (rim_width / 3.0)
            .min(b.wheel_thickness - b.wall_thickness)
            .min(section_gap - groove_minor_radius - b.wheel_web_wall);

        let params = Self {
            groove_major_radius,
            groove_minor_radius,
            rim_width,
            hole_array_radius: rim_width - b.wheel_rim_margin,
            hole_radius: rim_width / 3.0 - 1.0,
            web_major_radius: rim_width,
            web_minor_radius,
            web_offset: b.wheel_thickness / 2.0,
            relief_bore_diameter: (bearing.bore + bearing.outer) / 2.0,

            mount_outer_width,
            mount_inner_width,
            mount_height,
            mount_outer_depth,
            mount_inner_depth,
            rear_boss_length: b.wheel_thickness / 2.0 + b.mount_tolerance + b.wall_thickness,
            front_boss_length: b.wheel_thickness / 2.0 + b.wall_thickness,
            boss_radius: bearing.bore / 2.0,
            friction_relief_radius: b.wheel_radius - 1.0,
            friction_relief_offset: b.wall_thickness / 2.0,
            friction_relief_depth: mount_outer_depth - b.wall_thickness,
            relief_cell_width: mount_outer_width / b.relief_pattern_divisor,
            relief_cell_height: mount_height / b.relief_pattern_divisor,
            relief_pitch_x: mount_outer_width / 2.0,
            relief_pitch_y: mount_height / 2.0,
            flange_insert_pitch: mount_inner_width - b.intake_attachment_inset,
            flange_insert_depth: b.insert_depth.min(b.intake_holder_thickness),
            passthrough_pitch: mount_inner_width - 2.0 * b.intake_inset,
            passthrough_depth: b.intake_holder_thickness + 1.0,

            lug_pitch: mount_outer_width + b.extension_mount_width,
            rail_pitch: mount_outer_width + 2.0 * b.extension_mount_width + b.mounting_connector_width,
            connector_length: mount_outer_width
                + 2.0 * b.extension_mount_width
                + 2.0 * b.mounting_connector_width,
            receiver_height: b.extension_mount_height + b.extension_mount_width,
            lattice_gap: b.extension_pattern_size / 2.0 + b.extension_pattern_margin,

            intake_center_z: mount_height / 2.0 + b.intake_height / 2.0 + b.intake_holder_thickness,
            tower_center_z: -(mount_height / 2.0 + b.extension_height / 2.0),
            connector_center_z: -(mount_height / 2.0 + b.extension_height + b.extension_mount_height / 2.0),

            hardware,
            base,
        };
        params.validate()?;
        debug!("derived parameters: {:?}", params.dimensions());
        Ok(params)
    }

    /// Named dimensions that must be positive, in derivation order.
    pub fn dimensions(&self) -> Vec<(&'static str, f64)> {
        let b = &self.base;
        vec![
            ("wheel_radius", b.wheel_radius),
            ("wheel_thickness", b.wheel_thickness),
            ("wall_thickness", b.wall_thickness),
            ("mount_gap", b.mount_gap),
            ("extension_height", b.extension_height),
            ("extension_pattern_size", b.extension_pattern_size),
            ("extension_mount_width", b.extension_mount_width),
            ("extension_mount_height", b.extension_mount_height),
            ("insert_depth", b.insert_depth),
            ("intake_height", b.intake_height),
            ("intake_holder_thickness", b.intake_holder_thickness),
            ("intake_attachment_spacing", b.intake_attachment_spacing),
            ("passthrough_radius", b.passthrough_radius),
            ("coupler_depth", b.coupler_depth),
            ("relief_pattern_fillet", b.relief_pattern_fillet),
            ("wheel_web_wall", b.wheel_web_wall),
            ("groove_major_radius", self.groove_major_radius),
            ("groove_minor_radius", self.groove_minor_radius),
            // The groove must not cut the rim in two.
            ("groove_wall", b.wheel_thickness / 2.0 - self.groove_minor_radius),
            ("rim_width", self.rim_width),
            ("hole_array_radius", self.hole_array_radius),
            ("hole_radius", self.hole_radius),
            ("web_minor_radius", self.web_minor_radius),
            ("mount_outer_width", self.mount_outer_width),
            ("mount_inner_width", self.mount_inner_width),
            ("mount_height", self.mount_height),
            ("mount_outer_depth", self.mount_outer_depth),
            ("mount_inner_depth", self.mount_inner_depth),
            ("rear_boss_length", self.rear_boss_length),
            ("front_boss_length", self.front_boss_length),
            ("friction_relief_radius", self.friction_relief_radius),
            ("friction_relief_depth", self.friction_relief_depth),
            ("relief_cell_width", self.relief_cell_width),
            ("relief_cell_height", self.relief_cell_height),
            ("flange_insert_pitch", self.flange_insert_pitch),
            ("flange_insert_depth", self.flange_insert_depth),
            ("passthrough_pitch", self.passthrough_pitch),
            ("lug_pitch", self.lug_pitch),
            ("rail_pitch", self.rail_pitch),
            ("connector_length", self.connector_length),
            ("receiver_height", self.receiver_height),
            ("lattice_gap", self.lattice_gap),
        ]
    }

    fn validate(&self) -> Result<()> {
        for (name, value) in self.dimensions() {
            // `!(v > 0)` also rejects NaN.
            if !(value > 0.0) {
                return Err(ConfigError::NonPositive { name, value }.into());
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_reproduce_the_reference_housing() {
        let p = Parameters::derive(BaseParameters::default()).unwrap();
        assert_eq!(p.mount_outer_width, 87.0);
        assert_eq!(p.mount_height, 76.0);
        assert!((p.mount_outer_depth - 17.8).abs() < 1e-12);
        assert_eq!(p.hole_array_radius, 22.0);
        assert_eq!(p.hole_radius, 7.0);
        assert_eq!(p.connector_center_z, -192.0);
    }

    #[test]
    fn oversized_bearing_margin_is_rejected() {
        let base = BaseParameters {
            wheel_radius: 12.0,
            wheel_thickness: 6.0,
            ..BaseParameters::default()
        };
        assert!(matches!(
            Parameters::derive(base),
            Err(crate::error::Error::Config(ConfigError::NonPositive {
                name: "hole_array_radius",
                ..
            }))
        ));
    }
}
