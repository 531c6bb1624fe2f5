use approx::assert_relative_eq;
use filament_buffer::error::{ConfigError, Error};
use filament_buffer::params::{BaseParameters, Parameters};

#[test]
fn inner_dimensions_are_outer_minus_two_walls() {
    for (radius, thickness, wall) in [(35.0, 12.0, 2.5), (40.0, 10.0, 3.0), (28.0, 8.0, 1.6)] {
        let base = BaseParameters {
            wheel_radius: radius,
            wheel_thickness: thickness,
            wall_thickness: wall,
            ..BaseParameters::default()
        };
        let p = Parameters::derive(base).unwrap();
        assert_relative_eq!(p.mount_inner_width, p.mount_outer_width - 2.0 * wall, epsilon = 1e-12);
        assert_relative_eq!(p.mount_inner_depth, p.mount_outer_depth - 2.0 * wall, epsilon = 1e-12);
    }
}

#[test]
fn reference_dimensions() {
    let p = Parameters::derive(BaseParameters::default()).unwrap();
    assert_relative_eq!(p.mount_inner_width, 82.0);
    assert_relative_eq!(p.mount_inner_depth, 12.8, epsilon = 1e-12);
    assert_relative_eq!(p.rear_boss_length, 8.9, epsilon = 1e-12);
    assert_relative_eq!(p.front_boss_length, 8.5, epsilon = 1e-12);
    assert_relative_eq!(p.boss_radius, 4.0);
    assert_relative_eq!(p.lug_pitch, 97.0);
    assert_relative_eq!(p.rail_pitch, 127.0);
    assert_relative_eq!(p.flange_insert_pitch, 77.0);
    assert_relative_eq!(p.passthrough_pitch, 58.0);
    assert_relative_eq!(p.intake_center_z, 46.0);
    assert_relative_eq!(p.tower_center_z, -113.0);
}

#[test]
fn negative_wall_fails_before_geometry() {
    let base = BaseParameters {
        wall_thickness: -1.0,
        ..BaseParameters::default()
    };
    let err = Parameters::derive(base).unwrap_err();
    assert!(matches!(err, Error::Config(ConfigError::NonPositive { .. })));
}

#[test]
fn unknown_bearing_is_a_catalog_error() {
    let base = BaseParameters {
        bearing: "M9-99-9".into(),
        ..BaseParameters::default()
    };
    assert!(matches!(Parameters::derive(base), Err(Error::Catalog(_))));
}

#[test]
fn intake_and_flange_dimensions_are_validated() {
    let cases: [(&str, fn(&mut BaseParameters)); 6] = [
        ("intake_height", |b| b.intake_height = -8.0),
        ("intake_holder_thickness", |b| b.intake_holder_thickness = 0.0),
        ("passthrough_radius", |b| b.passthrough_radius = -1.0),
        ("coupler_depth", |b| b.coupler_depth = 0.0),
        ("relief_pattern_fillet", |b| b.relief_pattern_fillet = 0.0),
        ("intake_attachment_spacing", |b| b.intake_attachment_spacing = -7.0),
    ];
    for (field, set) in cases {
        let mut base = BaseParameters::default();
        set(&mut base);
        match Parameters::derive(base) {
            Err(Error::Config(ConfigError::NonPositive { name, .. })) => assert_eq!(name, field),
            other => panic!("{field}: expected a NonPositive error, got {other:?}"),
        }
    }
}

#[test]
fn flange_inserts_never_exceed_the_flange() {
    let p = Parameters::derive(BaseParameters::default()).unwrap();
    assert_relative_eq!(p.flange_insert_depth, p.base.intake_holder_thickness);

    let thick = Parameters::derive(BaseParameters {
        intake_holder_thickness: 10.0,
        ..BaseParameters::default()
    })
    .unwrap();
    assert_relative_eq!(thick.flange_insert_depth, thick.base.insert_depth);
}

#[test]
fn groove_deeper_than_half_the_wheel_is_rejected() {
    let base = BaseParameters {
        wheel_groove_ratio: 0.55,
        ..BaseParameters::default()
    };
    assert!(matches!(
        Parameters::derive(base),
        Err(Error::Config(ConfigError::NonPositive { name: "groove_wall", .. }))
    ));
}

#[test]
fn reference_web_is_unchanged() {
    let p = Parameters::derive(BaseParameters::default()).unwrap();
    assert_relative_eq!(p.web_major_radius, 24.0);
    assert_relative_eq!(p.web_minor_radius, 8.0);
    assert_relative_eq!(p.web_offset, 6.0);
}
