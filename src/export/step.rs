//! STEP AP214 export of a tessellated solid.
//!
//! Every triangle becomes a planar ADVANCED_FACE bounded by three line
//! edges; edges are shared between neighbouring faces, so a watertight mesh
//! yields a valid CLOSED_SHELL inside a MANIFOLD_SOLID_BREP. The header
//! carries a fixed timestamp so the same mesh always produces the same
//! bytes.

use std::collections::HashMap;
use std::fmt::{self, Write as _};
use std::io::{self, Write};

use nalgebra::Vector3;

use crate::types::TriangleMesh;

const TIMESTAMP: &str = "2024-01-01T00:00:00";

/// Write `mesh` as a STEP file whose product is named `name`.
pub fn write_step<W: Write>(mesh: &TriangleMesh, name: &str, writer: &mut W) -> io::Result<()> {
    let text = render(mesh, name).map_err(io::Error::other)?;
    writer.write_all(text.as_bytes())
}

/// STEP real: always carries a decimal point.
fn real(v: f64) -> String {
    format!("{v:.6}")
}

fn direction(v: &Vector3<f64>) -> String {
    format!("({:.9},{:.9},{:.9})", v.x, v.y, v.z)
}

struct Entities {
    out: String,
    next: u64,
}

impl Entities {
    fn add(&mut self, body: fmt::Arguments<'_>) -> Result<u64, fmt::Error> {
        let id = self.next;
        self.next += 1;
        writeln!(self.out, "#{id}={body};")?;
        Ok(id)
    }
}

/// Entity id lists as `(#1,#2,...)`.
fn refs(ids: &[u64]) -> String {
    let inner = ids.iter().map(|id| format!("#{id}")).collect::<Vec<_>>().join(",");
    format!("({inner})")
}

fn render(mesh: &TriangleMesh, name: &str) -> Result<String, fmt::Error> {
    let name = name.replace('\'', "");
    let mut e = Entities {
        out: String::new(),
        next: 1,
    };

    let mut points = Vec::with_capacity(mesh.vertices.len());
    let mut vertices = Vec::with_capacity(mesh.vertices.len());
    for v in &mesh.vertices {
        let p = e.add(format_args!(
            "CARTESIAN_POINT('',({},{},{}))",
            real(v.x),
            real(v.y),
            real(v.z)
        ))?;
        points.push(p);
        vertices.push(e.add(format_args!("VERTEX_POINT('',#{p})"))?);
    }

    let mut edges: HashMap<(u32, u32), u64> = HashMap::new();
    let mut faces = Vec::with_capacity(mesh.triangle_count());

    for tri in mesh.indices.chunks_exact(3) {
        let mut oriented = Vec::with_capacity(3);
        for (a, b) in [(tri[0], tri[1]), (tri[1], tri[2]), (tri[2], tri[0])] {
            let key = (a.min(b), a.max(b));
            let edge = match edges.get(&key) {
                Some(&id) => id,
                None => {
                    let (pa, pb) = (mesh.vertices[key.0 as usize], mesh.vertices[key.1 as usize]);
                    let d = pb - pa;
                    let dir = if d.norm() > 1e-12 { d.normalize() } else { Vector3::x() };
                    let dir_id = e.add(format_args!("DIRECTION('',{})", direction(&dir)))?;
                    let vec_id = e.add(format_args!("VECTOR('',#{dir_id},1.)"))?;
                    let line = e.add(format_args!("LINE('',#{},#{vec_id})", points[key.0 as usize]))?;
                    let id = e.add(format_args!(
                        "EDGE_CURVE('',#{},#{},#{line},.T.)",
                        vertices[key.0 as usize],
                        vertices[key.1 as usize]
                    ))?;
                    edges.insert(key, id);
                    id
                }
            };
            let sense = if a == key.0 { ".T." } else { ".F." };
            oriented.push(e.add(format_args!("ORIENTED_EDGE('',*,*,#{edge},{sense})"))?);
        }
        let edge_loop = e.add(format_args!("EDGE_LOOP('',{})", refs(&oriented)))?;
        let bound = e.add(format_args!("FACE_OUTER_BOUND('',#{edge_loop},.T.)"))?;

        let (v0, v1, v2) = (
            mesh.vertices[tri[0] as usize],
            mesh.vertices[tri[1] as usize],
            mesh.vertices[tri[2] as usize],
        );
        let n = (v1 - v0).cross(&(v2 - v0));
        let normal = if n.norm() > 1e-15 { n.normalize() } else { Vector3::z() };
        let reference = if normal.x.abs() < 0.9 { Vector3::x() } else { Vector3::y() };
        let ref_dir = (reference - normal * reference.dot(&normal)).normalize();

        let normal_id = e.add(format_args!("DIRECTION('',{})", direction(&normal)))?;
        let ref_id = e.add(format_args!("DIRECTION('',{})", direction(&ref_dir)))?;
        let axis = e.add(format_args!(
            "AXIS2_PLACEMENT_3D('',#{},#{normal_id},#{ref_id})",
            points[tri[0] as usize]
        ))?;
        let plane = e.add(format_args!("PLANE('',#{axis})"))?;
        faces.push(e.add(format_args!("ADVANCED_FACE('',(#{bound}),#{plane},.T.)"))?);
    }

    let shell = e.add(format_args!("CLOSED_SHELL('',{})", refs(&faces)))?;
    let brep = e.add(format_args!("MANIFOLD_SOLID_BREP('{name}',#{shell})"))?;

    let origin = e.add(format_args!("CARTESIAN_POINT('',(0.,0.,0.))"))?;
    let z = e.add(format_args!("DIRECTION('',(0.,0.,1.))"))?;
    let x = e.add(format_args!("DIRECTION('',(1.,0.,0.))"))?;
    let placement = e.add(format_args!("AXIS2_PLACEMENT_3D('',#{origin},#{z},#{x})"))?;

    let length = e.add(format_args!("(LENGTH_UNIT()NAMED_UNIT(*)SI_UNIT(.MILLI.,.METRE.))"))?;
    let angle = e.add(format_args!("(NAMED_UNIT(*)PLANE_ANGLE_UNIT()SI_UNIT($,.RADIAN.))"))?;
    let solid_angle = e.add(format_args!("(NAMED_UNIT(*)SI_UNIT($,.STERADIAN.)SOLID_ANGLE_UNIT())"))?;
    let uncertainty = e.add(format_args!(
        "UNCERTAINTY_MEASURE_WITH_UNIT(LENGTH_MEASURE(1.E-07),#{length},'distance_accuracy_value','confusion accuracy')"
    ))?;
    let context = e.add(format_args!(
        "(GEOMETRIC_REPRESENTATION_CONTEXT(3)GLOBAL_UNCERTAINTY_ASSIGNED_CONTEXT((#{uncertainty}))GLOBAL_UNIT_ASSIGNED_CONTEXT((#{length},#{angle},#{solid_angle}))REPRESENTATION_CONTEXT('',''))"
    ))?;
    let shape = e.add(format_args!(
        "ADVANCED_BREP_SHAPE_REPRESENTATION('{name}',(#{placement},#{brep}),#{context})"
    ))?;

    let app = e.add(format_args!("APPLICATION_CONTEXT('automotive design')"))?;
    e.add(format_args!(
        "APPLICATION_PROTOCOL_DEFINITION('international standard','automotive_design',2000,#{app})"
    ))?;
    let product_context = e.add(format_args!("PRODUCT_CONTEXT('',#{app},'mechanical')"))?;
    let product = e.add(format_args!("PRODUCT('{name}','{name}','',(#{product_context}))"))?;
    let formation = e.add(format_args!("PRODUCT_DEFINITION_FORMATION('','',#{product})"))?;
    let definition_context = e.add(format_args!("PRODUCT_DEFINITION_CONTEXT('part definition',#{app},'design')"))?;
    let definition = e.add(format_args!("PRODUCT_DEFINITION('design','',#{formation},#{definition_context})"))?;
    let definition_shape = e.add(format_args!("PRODUCT_DEFINITION_SHAPE('','',#{definition})"))?;
    e.add(format_args!("SHAPE_DEFINITION_REPRESENTATION(#{definition_shape},#{shape})"))?;

    let mut text = String::new();
    writeln!(text, "ISO-10303-21;")?;
    writeln!(text, "HEADER;")?;
    writeln!(text, "FILE_DESCRIPTION(('filament-buffer part'),'2;1');")?;
    writeln!(
        text,
        "FILE_NAME('{name}.step','{TIMESTAMP}',(''),(''),'filament-buffer {}','filament-buffer','');",
        env!("CARGO_PKG_VERSION")
    )?;
    writeln!(text, "FILE_SCHEMA(('AUTOMOTIVE_DESIGN {{ 1 0 10303 214 1 1 1 1 }}'));")?;
    writeln!(text, "ENDSEC;")?;
    writeln!(text, "DATA;")?;
    text.push_str(&e.out);
    writeln!(text, "ENDSEC;")?;
    writeln!(text, "END-ISO-10303-21;")?;
    Ok(text)
}
