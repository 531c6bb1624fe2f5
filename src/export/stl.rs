//! Binary STL export.
//!
//! An 80-byte header, the triangle count, then one 50-byte record per
//! triangle (facet normal, three vertices, attribute word), little-endian.

use std::io::{self, Write};

use nalgebra::Vector3;

use crate::types::TriangleMesh;

const HEADER_LEN: usize = 80;

/// Write `mesh` as binary STL. `name` goes into the header after the
/// generator tag and is truncated to fit.
pub fn write_stl<W: Write>(mesh: &TriangleMesh, name: &str, writer: &mut W) -> io::Result<()> {
    let text = format!("binary STL from filament-buffer: {name}");
    let mut header = [0u8; HEADER_LEN];
    let len = text.len().min(HEADER_LEN);
    header[..len].copy_from_slice(&text.as_bytes()[..len]);
    writer.write_all(&header)?;

    writer.write_all(&(mesh.triangle_count() as u32).to_le_bytes())?;

    for tri in mesh.indices.chunks_exact(3) {
        let v0 = mesh.vertices[tri[0] as usize];
        let v1 = mesh.vertices[tri[1] as usize];
        let v2 = mesh.vertices[tri[2] as usize];

        let n = (v1 - v0).cross(&(v2 - v0));
        let len = n.norm();
        let n = if len > 1e-15 { n / len } else { Vector3::z() };

        write_vec(writer, &n)?;
        for v in [v0, v1, v2] {
            write_vec(writer, &v)?;
        }
        writer.write_all(&0u16.to_le_bytes())?;
    }

    Ok(())
}

fn write_vec<W: Write>(writer: &mut W, v: &Vector3<f64>) -> io::Result<()> {
    for c in [v.x, v.y, v.z] {
        writer.write_all(&(c as f32).to_le_bytes())?;
    }
    Ok(())
}
