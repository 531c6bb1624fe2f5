//! The assembly tree: named printed parts plus companion hardware.

use std::collections::HashMap;

use indexmap::IndexMap;
use log::debug;
use nalgebra::Isometry3;
use serde::Serialize;

use crate::catalog::{FastenerKind, FastenerSpec};
use crate::error::AssemblyError;
use crate::frame::Frame;
use crate::hardware::{self, Detail};
use crate::solid::Solid;

/// Display color, components in `0..=1`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const BLUE: Color = Color::rgba(0.0, 0.0, 1.0, 1.0);
    pub const WHITE: Color = Color::rgba(1.0, 1.0, 1.0, 1.0);
    pub const PURPLE: Color = Color::rgba(0.5, 0.0, 0.5, 1.0);
    pub const ORANGE: Color = Color::rgba(1.0, 0.647, 0.0, 1.0);
    pub const STEEL: Color = Color::rgba(0.6, 0.6, 0.65, 1.0);
    pub const BRASS: Color = Color::rgba(0.8, 0.65, 0.25, 1.0);

    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Role {
    /// A part this pipeline builds and exports.
    Printed,
    /// Purchased hardware shown at the hole that receives it.
    Companion(FastenerKind),
}

impl Role {
    pub fn is_companion(&self) -> bool {
        matches!(self, Role::Companion(_))
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::Printed => f.write_str("printed"),
            Role::Companion(kind) => write!(f, "companion:{kind}"),
        }
    }
}

#[derive(Clone, Debug)]
pub struct Part {
    pub name: String,
    pub solid: Solid,
    pub color: Color,
    pub role: Role,
    /// Placement of the part's local frame in the assembly.
    pub location: Isometry3<f64>,
}

impl Part {
    pub fn printed(name: impl Into<String>, solid: Solid, color: Color) -> Self {
        Self {
            name: name.into(),
            solid,
            color,
            role: Role::Printed,
            location: Isometry3::identity(),
        }
    }
}

#[derive(Clone, Debug)]
pub enum AssemblyNode {
    Part(Part),
    Assembly(Assembly),
}

/// Ordered name → node mapping. Insertion order is preserved.
#[derive(Clone, Debug)]
pub struct Assembly {
    name: String,
    children: IndexMap<String, AssemblyNode>,
    counters: HashMap<String, usize>,
    detail: Detail,
}

impl Assembly {
    pub fn new(name: impl Into<String>, detail: Detail) -> Self {
        Self {
            name: name.into(),
            children: IndexMap::new(),
            counters: HashMap::new(),
            detail,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn detail(&self) -> Detail {
        self.detail
    }

    fn insert(&mut self, name: String, node: AssemblyNode) -> Result<(), AssemblyError> {
        if self.children.contains_key(&name) {
            return Err(AssemblyError::DuplicateName {
                assembly: self.name.clone(),
                name,
            });
        }
        self.children.insert(name, node);
        Ok(())
    }

    pub fn add(&mut self, part: Part) -> Result<(), AssemblyError> {
        self.insert(part.name.clone(), AssemblyNode::Part(part))
    }

    pub fn add_assembly(&mut self, sub: Assembly) -> Result<(), AssemblyError> {
        self.insert(sub.name.clone(), AssemblyNode::Assembly(sub))
    }

    /// Add a companion for `spec` seated at `seat`, named
    /// `<kind>-<size>-<n>` with `n` counting per label from 1.
    pub fn register_companion(&mut self, spec: &FastenerSpec, seat: &Frame) -> Result<String, AssemblyError> {
        let label = spec.label();
        let n = self.counters.entry(label.clone()).or_insert(0);
        *n += 1;
        let name = format!("{label}-{n}");

        let solid = hardware::companion(spec, self.detail).placed(seat);
        let color = match spec.kind {
            FastenerKind::HeatSetInsert => Color::BRASS,
            _ => Color::STEEL,
        };
        debug!("{}: registered {} at {:?}", self.name, name, seat.origin);
        self.insert(
            name.clone(),
            AssemblyNode::Part(Part {
                name: name.clone(),
                solid,
                color,
                role: Role::Companion(spec.kind),
                location: seat.isometry(),
            }),
        )?;
        Ok(name)
    }

    pub fn get(&self, name: &str) -> Option<&AssemblyNode> {
        self.children.get(name)
    }

    pub fn part(&self, name: &str) -> Option<&Part> {
        match self.children.get(name) {
            Some(AssemblyNode::Part(p)) => Some(p),
            _ => None,
        }
    }

    pub fn children(&self) -> impl Iterator<Item = (&String, &AssemblyNode)> {
        self.children.iter()
    }

    pub fn len(&self) -> usize {
        self.children.len()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    /// Every part in the tree, depth first, in insertion order.
    pub fn parts(&self) -> Vec<&Part> {
        let mut out = Vec::new();
        self.collect_parts(&mut out);
        out
    }

    fn collect_parts<'a>(&'a self, out: &mut Vec<&'a Part>) {
        for node in self.children.values() {
            match node {
                AssemblyNode::Part(p) => out.push(p),
                AssemblyNode::Assembly(a) => a.collect_parts(out),
            }
        }
    }

    pub fn printed_parts(&self) -> Vec<&Part> {
        self.parts().into_iter().filter(|p| !p.role.is_companion()).collect()
    }

    pub fn companions(&self) -> Vec<&Part> {
        self.parts().into_iter().filter(|p| p.role.is_companion()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Vector3;

    #[test]
    fn duplicate_names_are_rejected() {
        let mut asm = Assembly::new("top", Detail::Preview);
        asm.add(Part::printed("wheel", Solid::box3(1.0, 1.0, 1.0), Color::WHITE))
            .unwrap();
        let err = asm
            .add(Part::printed("wheel", Solid::box3(1.0, 1.0, 1.0), Color::WHITE))
            .unwrap_err();
        assert_eq!(
            err,
            AssemblyError::DuplicateName {
                assembly: "top".into(),
                name: "wheel".into()
            }
        );
    }

    #[test]
    fn companions_count_per_label() {
        let mut asm = Assembly::new("top", Detail::Preview);
        let screw = FastenerSpec::screw("M3-0.5", 10.0).unwrap();
        let insert = FastenerSpec::insert("M3-0.5-6").unwrap();
        let seat = Frame::new(Vector3::zeros(), Vector3::z());
        assert_eq!(asm.register_companion(&screw, &seat).unwrap(), "SocketHeadCapScrew-M3-0.5-1");
        assert_eq!(asm.register_companion(&insert, &seat).unwrap(), "HeatSetInsert-M3-0.5-6-1");
        assert_eq!(asm.register_companion(&screw, &seat).unwrap(), "SocketHeadCapScrew-M3-0.5-2");
        assert_eq!(asm.companions().len(), 3);
        assert!(asm.printed_parts().is_empty());
    }

    #[test]
    fn nested_assemblies_flatten_in_insertion_order() {
        let mut hardware = Assembly::new("hardware", Detail::Preview);
        let screw = FastenerSpec::screw("M3-0.5", 12.0).unwrap();
        hardware
            .register_companion(&screw, &Frame::new(Vector3::zeros(), Vector3::z()))
            .unwrap();

        let mut top = Assembly::new("top", Detail::Preview);
        top.add(Part::printed("wheel", Solid::box3(1.0, 1.0, 1.0), Color::WHITE))
            .unwrap();
        top.add_assembly(hardware).unwrap();
        top.add(Part::printed("mount", Solid::box3(1.0, 1.0, 1.0), Color::WHITE))
            .unwrap();

        let names: Vec<_> = top.parts().into_iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, ["wheel", "SocketHeadCapScrew-M3-0.5-1", "mount"]);
        assert!(matches!(top.get("hardware"), Some(AssemblyNode::Assembly(_))));
        assert!(top.part("hardware").is_none());
        assert_eq!(top.companions().len(), 1);
        assert!(top
            .add_assembly(Assembly::new("wheel", Detail::Preview))
            .is_err());
    }
}
