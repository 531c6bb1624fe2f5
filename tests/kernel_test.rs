use approx::assert_relative_eq;
use filament_buffer::error::GeometryError;
use filament_buffer::frame::{Center, Face, Frame};
use filament_buffer::profile::Profile;
use filament_buffer::solid::{Mode, Solid};
use nalgebra::{Vector2, Vector3};

fn bracket() -> Solid {
    let block = Solid::box3(20.0, 10.0, 16.0);
    let top = Frame::on_face(&block.bounding_box(), Face::PosZ, Center::FaceCenter);
    block
        .extrude(&top, Profile::circle(Vector2::zeros(), 3.0), -6.0, Mode::Cut)
        .union(Solid::cylinder(4.0, 30.0).translate(Vector3::new(0.0, 0.0, -5.0)))
}

#[test]
fn split_halves_cover_the_unsplit_bounds() {
    let solid = bracket();
    let bbox = solid.bounding_box();
    let (top, bottom) = solid.split(&Frame::new(Vector3::new(0.0, 0.0, 1.0), Vector3::z())).unwrap();

    let (tb, bb) = (top.bounding_box(), bottom.bounding_box());
    let joined = tb.union(&bb);
    assert_relative_eq!(joined.min, bbox.min, epsilon = 1e-12);
    assert_relative_eq!(joined.max, bbox.max, epsilon = 1e-12);
    assert_relative_eq!(tb.min.z, 1.0, epsilon = 1e-12);
    assert_relative_eq!(bb.max.z, 1.0, epsilon = 1e-12);

    assert!(top.contains(Vector3::new(0.0, 0.0, 5.0)));
    assert!(!top.contains(Vector3::new(0.0, 0.0, -5.0)));
    assert!(bottom.contains(Vector3::new(5.0, 0.0, -5.0)));
    assert!(!bottom.contains(Vector3::new(5.0, 0.0, 5.0)));
}

#[test]
fn split_on_the_boundary_is_degenerate() {
    let block = Solid::box3(4.0, 4.0, 4.0);
    let plane = Frame::new(Vector3::new(0.0, 0.0, 2.0), Vector3::z());
    assert_eq!(block.split(&plane).unwrap_err(), GeometryError::DegenerateSplit);
}

#[test]
fn split_through_a_gap_leaves_an_empty_half() {
    // Bounding box spans the plane but all material lies above it.
    let shell = Solid::box3(10.0, 10.0, 10.0)
        .subtract(Solid::box3(20.0, 20.0, 6.0).translate(Vector3::new(0.0, 0.0, -3.0)));
    let plane = Frame::new(Vector3::new(0.0, 0.0, -2.0), Vector3::z());
    assert_eq!(
        shell.split(&plane).unwrap_err(),
        GeometryError::EmptySplitHalf("bottom")
    );
}

#[test]
fn tessellated_bracket_is_watertight() {
    let mesh = bracket().tessellate(0.5).unwrap();
    assert!(!mesh.is_empty());
    assert!(mesh.is_watertight());
    assert_eq!(mesh.shell_count(), 1);
    assert!(mesh.volume() > 0.0);
}

#[test]
fn rotation_about_the_center_keeps_the_centroid() {
    let block = Solid::box3(10.0, 4.0, 2.0).translate(Vector3::new(5.0, 3.0, 1.0));
    let before = block.center_of_mass(0.25).unwrap();
    let rotated = block.rotate_about_center(Vector3::x_axis(), 90.0, 0.25).unwrap();
    let after = rotated.center_of_mass(0.25).unwrap();
    assert_relative_eq!(before, after, epsilon = 0.2);
    let size = rotated.bounding_box().size();
    assert_relative_eq!(size.y, 2.0, epsilon = 1e-9);
    assert_relative_eq!(size.z, 4.0, epsilon = 1e-9);
}

#[test]
fn chamfered_receiver_prints_without_support() {
    let receiver = Solid::box3(10.0, 17.8, 18.0).chamfer(Face::PosX, Face::NegZ, 9.999);
    // The 45° face runs from the bottom at x = -5 to the outer side at z = 1.
    assert!(receiver.contains(Vector3::new(-4.9, 0.0, -8.9)));
    assert!(!receiver.contains(Vector3::new(4.0, 0.0, -2.0)));
    assert!(receiver.contains(Vector3::new(4.0, 0.0, 2.0)));
}

#[test]
fn face_centroid_weights_every_region_on_the_face() {
    // 10 x 10 face at z = 0 plus a 10 x 2 tab centered at z = 6. The pin
    // far behind the face does not count.
    let block = Solid::box3(10.0, 4.0, 10.0)
        .union(Solid::box3(10.0, 4.0, 2.0).translate(Vector3::new(0.0, 0.0, 6.0)))
        .union(Solid::box3(2.0, 1.0, 2.0).translate(Vector3::new(0.0, -10.0, 0.0)));
    let c = block.face_centroid(Face::PosY, 0.1).unwrap();
    assert_relative_eq!(c.y, 2.0);
    assert_relative_eq!(c.x, 0.0, epsilon = 0.05);
    assert_relative_eq!(c.z, 1.0, epsilon = 0.05);
}

#[test]
fn zero_cell_size_is_rejected_by_the_kernel() {
    let block = Solid::box3(2.0, 2.0, 2.0);
    assert_eq!(block.tessellate(0.0).unwrap_err(), GeometryError::InvalidCellSize(0.0));
    assert!(block.center_of_mass(-1.0).is_err());
}
