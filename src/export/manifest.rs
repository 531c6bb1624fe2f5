//! JSON summary of an assembly: one entry per part, printed parts first in
//! build order, companions after them in registration order.

use std::io::{self, Write};

use serde::Serialize;

use crate::assembly::{Assembly, Color, Part};

#[derive(Debug, Serialize)]
pub struct Manifest {
    pub assembly: String,
    pub parts: Vec<ManifestEntry>,
}

#[derive(Debug, Serialize)]
pub struct ManifestEntry {
    pub name: String,
    pub role: String,
    pub color: Color,
    pub bbox_min: [f64; 3],
    pub bbox_max: [f64; 3],
    pub translation: [f64; 3],
    /// Unit quaternion `[i, j, k, w]`.
    pub rotation: [f64; 4],
    /// Files written for this part, relative to the output directory.
    pub files: Vec<String>,
}

impl ManifestEntry {
    fn new(part: &Part, files: Vec<String>) -> Self {
        let bbox = part.solid.bounding_box();
        let t = part.location.translation.vector;
        let q = part.location.rotation.coords;
        Self {
            name: part.name.clone(),
            role: part.role.to_string(),
            color: part.color,
            bbox_min: [bbox.min.x, bbox.min.y, bbox.min.z],
            bbox_max: [bbox.max.x, bbox.max.y, bbox.max.z],
            translation: [t.x, t.y, t.z],
            rotation: [q.x, q.y, q.z, q.w],
            files,
        }
    }
}

impl Manifest {
    /// Describe `assembly`. `files_for` names the files written for a part.
    pub fn new<F>(assembly: &Assembly, files_for: F) -> Self
    where
        F: Fn(&Part) -> Vec<String>,
    {
        let parts = assembly
            .printed_parts()
            .into_iter()
            .chain(assembly.companions())
            .map(|p| ManifestEntry::new(p, files_for(p)))
            .collect();
        Self {
            assembly: assembly.name().to_string(),
            parts,
        }
    }
}

pub fn write_manifest<W: Write>(manifest: &Manifest, writer: &mut W) -> io::Result<()> {
    serde_json::to_writer_pretty(&mut *writer, manifest).map_err(io::Error::from)?;
    writeln!(writer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assembly::Part;
    use crate::catalog::FastenerSpec;
    use crate::frame::Frame;
    use crate::hardware::Detail;
    use crate::solid::Solid;
    use nalgebra::Vector3;

    #[test]
    fn manifest_lists_printed_parts_before_companions() {
        let mut asm = Assembly::new("buffer_cap", Detail::Preview);
        let screw = FastenerSpec::screw("M3-0.5", 10.0).unwrap();
        asm.register_companion(&screw, &Frame::new(Vector3::new(0.0, 0.0, 5.0), Vector3::z()))
            .unwrap();
        asm.add(Part::printed("wheel", Solid::box3(2.0, 2.0, 2.0), Color::WHITE))
            .unwrap();

        let manifest = Manifest::new(&asm, |p| vec![format!("{}.stl", p.name)]);
        let names: Vec<_> = manifest.parts.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, ["wheel", "SocketHeadCapScrew-M3-0.5-1"]);
        assert_eq!(manifest.parts[1].translation, [0.0, 0.0, 5.0]);

        let mut buf = Vec::new();
        write_manifest(&manifest, &mut buf).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&buf).unwrap();
        assert_eq!(value["assembly"], "buffer_cap");
        assert_eq!(value["parts"][0]["role"], "printed");
        assert_eq!(value["parts"][1]["role"], "companion:SocketHeadCapScrew");
    }
}
