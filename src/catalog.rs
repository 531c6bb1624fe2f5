//! Fastener and bearing catalog.
//!
//! Sizes are closed enums parsed from their conventional designation
//! (`"M3-0.5"`, `"13/32-28"`, `"M3-0.5-6"`, `"M8-22-7"`). Anything else is
//! rejected at parse time with a [`CatalogError`]. All dimensions in mm.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CatalogError;

const INCH: f64 = 25.4;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FastenerKind {
    SocketHeadCapScrew,
    HeatSetInsert,
    Bearing,
}

impl FastenerKind {
    fn noun(self) -> &'static str {
        match self {
            FastenerKind::SocketHeadCapScrew => "screw",
            FastenerKind::HeatSetInsert => "insert",
            FastenerKind::Bearing => "bearing",
        }
    }
}

impl fmt::Display for FastenerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FastenerKind::SocketHeadCapScrew => "SocketHeadCapScrew",
            FastenerKind::HeatSetInsert => "HeatSetInsert",
            FastenerKind::Bearing => "Bearing",
        };
        f.write_str(name)
    }
}

impl FromStr for FastenerKind {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "SocketHeadCapScrew" | "socket_head_cap_screw" | "shcs" => Ok(FastenerKind::SocketHeadCapScrew),
            "HeatSetInsert" | "heat_set_insert" | "insert" => Ok(FastenerKind::HeatSetInsert),
            "Bearing" | "bearing" => Ok(FastenerKind::Bearing),
            other => Err(CatalogError::UnknownKind(other.to_string())),
        }
    }
}

/// Hole class: how the hole relates to the part it receives.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FitClass {
    Clearance,
    PressFit,
    Threaded,
}

/// Tolerance grade.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Fit {
    Close,
    Normal,
    #[default]
    Loose,
}

impl Fit {
    fn index(self) -> usize {
        match self {
            Fit::Close => 0,
            Fit::Normal => 1,
            Fit::Loose => 2,
        }
    }
}

impl FromStr for Fit {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "close" => Ok(Fit::Close),
            "normal" => Ok(Fit::Normal),
            "loose" => Ok(Fit::Loose),
            _ => Err(CatalogError::UnknownSize {
                kind: "fit",
                size: s.to_string(),
            }),
        }
    }
}

// ---------------------------------------------------------------------------
// Sizes
// ---------------------------------------------------------------------------

macro_rules! size_enum {
    ($name:ident, $kind:literal, { $($variant:ident => $text:literal),+ $(,)? }) => {
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub fn designation(self) -> &'static str {
                match self {
                    $($name::$variant => $text),+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.designation())
            }
        }

        impl FromStr for $name {
            type Err = CatalogError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.trim() {
                    $($text => Ok($name::$variant),)+
                    other => Err(CatalogError::UnknownSize {
                        kind: $kind,
                        size: other.to_string(),
                    }),
                }
            }
        }
    };
}

size_enum!(ScrewSize, "screw", { M3 => "M3-0.5" });
size_enum!(ThreadSize, "thread", { Unf13_32 => "13/32-28" });
size_enum!(InsertSize, "insert", { M3x6 => "M3-0.5-6" });
size_enum!(BearingSize, "bearing", { M8x22x7 => "M8-22-7" });

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Size {
    Screw(ScrewSize),
    Thread(ThreadSize),
    Insert(InsertSize),
    Bearing(BearingSize),
}

impl fmt::Display for Size {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Size::Screw(s) => s.fmt(f),
            Size::Thread(s) => s.fmt(f),
            Size::Insert(s) => s.fmt(f),
            Size::Bearing(s) => s.fmt(f),
        }
    }
}

impl Size {
    /// Parse `size` in the context of `kind`.
    pub fn parse(kind: FastenerKind, size: &str) -> Result<Self, CatalogError> {
        let parsed = match kind {
            FastenerKind::SocketHeadCapScrew => size
                .parse()
                .map(Size::Screw)
                .or_else(|_| size.parse().map(Size::Thread)),
            FastenerKind::HeatSetInsert => size.parse().map(Size::Insert),
            FastenerKind::Bearing => size.parse().map(Size::Bearing),
        };
        parsed.map_err(|_| {
            if known_anywhere(size) {
                CatalogError::KindMismatch {
                    kind: kind.noun(),
                    size: size.to_string(),
                }
            } else {
                CatalogError::UnknownSize {
                    kind: kind.noun(),
                    size: size.to_string(),
                }
            }
        })
    }
}

fn known_anywhere(size: &str) -> bool {
    size.parse::<ScrewSize>().is_ok()
        || size.parse::<ThreadSize>().is_ok()
        || size.parse::<InsertSize>().is_ok()
        || size.parse::<BearingSize>().is_ok()
}

// ---------------------------------------------------------------------------
// Dimensions
// ---------------------------------------------------------------------------

/// Resolved dimensions of one catalog entry.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FastenerDims {
    /// Inner diameter: screw major diameter, insert thread, bearing bore.
    pub bore: f64,
    /// Outer diameter: screw head, insert body, bearing race.
    pub outer: f64,
    /// Depth of the seat the part needs: head height, insert or bearing length.
    pub seat_depth: f64,
    pub pitch: f64,
    pub tap_diameter: f64,
    clearance: [f64; 3],
    counterbore: [f64; 3],
    interference: [f64; 3],
}

impl FastenerDims {
    pub fn clearance_diameter(&self, fit: Fit) -> f64 {
        self.clearance[fit.index()]
    }

    pub fn counterbore_diameter(&self, fit: Fit) -> f64 {
        self.counterbore[fit.index()]
    }

    /// Press-fit hole for the outer diameter, enlarged by `compensation`
    /// on each side for printed parts.
    pub fn press_fit_diameter(&self, fit: Fit, compensation: f64) -> f64 {
        self.outer - self.interference[fit.index()] + 2.0 * compensation
    }
}

pub fn dimensions(size: Size) -> FastenerDims {
    match size {
        Size::Screw(ScrewSize::M3) => FastenerDims {
            bore: 3.0,
            outer: 5.5,
            seat_depth: 3.0,
            pitch: 0.5,
            tap_diameter: 2.5,
            clearance: [3.2, 3.4, 3.6],
            counterbore: [6.0, 6.5, 7.0],
            interference: [0.0; 3],
        },
        Size::Thread(ThreadSize::Unf13_32) => FastenerDims {
            bore: 13.0 / 32.0 * INCH,
            outer: 5.0 / 8.0 * INCH,
            seat_depth: 13.0 / 32.0 * INCH,
            pitch: INCH / 28.0,
            tap_diameter: 9.5,
            clearance: [10.5, 10.9, 11.3],
            counterbore: [16.5, 17.0, 17.5],
            interference: [0.0; 3],
        },
        Size::Insert(InsertSize::M3x6) => FastenerDims {
            bore: 3.0,
            outer: 4.0,
            seat_depth: 6.0,
            pitch: 0.5,
            tap_diameter: 2.5,
            clearance: [4.1, 4.2, 4.3],
            counterbore: [4.6, 4.8, 5.0],
            interference: [0.2, 0.1, 0.0],
        },
        Size::Bearing(BearingSize::M8x22x7) => FastenerDims {
            bore: 8.0,
            outer: 22.0,
            seat_depth: 7.0,
            pitch: 0.0,
            tap_diameter: 8.0,
            clearance: [22.1, 22.2, 22.4],
            counterbore: [22.1, 22.2, 22.4],
            interference: [0.05, 0.02, 0.0],
        },
    }
}

/// Look up a size designation for a fastener kind.
pub fn lookup(kind: FastenerKind, size: &str) -> Result<FastenerDims, CatalogError> {
    Size::parse(kind, size).map(dimensions)
}

// ---------------------------------------------------------------------------
// Fastener specs
// ---------------------------------------------------------------------------

/// A purchased part: kind, size and (for screws) length.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FastenerSpec {
    pub kind: FastenerKind,
    pub size: Size,
    pub length: Option<f64>,
}

impl FastenerSpec {
    pub fn new(kind: FastenerKind, size: &str, length: Option<f64>) -> Result<Self, CatalogError> {
        let size = Size::parse(kind, size)?;
        if kind == FastenerKind::SocketHeadCapScrew && length.is_none() {
            return Err(CatalogError::MissingLength {
                kind: kind.noun(),
                size: size.to_string(),
            });
        }
        Ok(Self { kind, size, length })
    }

    pub fn screw(size: &str, length: f64) -> Result<Self, CatalogError> {
        Self::new(FastenerKind::SocketHeadCapScrew, size, Some(length))
    }

    pub fn insert(size: &str) -> Result<Self, CatalogError> {
        Self::new(FastenerKind::HeatSetInsert, size, None)
    }

    pub fn bearing(size: &str) -> Result<Self, CatalogError> {
        Self::new(FastenerKind::Bearing, size, None)
    }

    pub fn dims(&self) -> FastenerDims {
        dimensions(self.size)
    }

    /// Prefix of companion part names: `<kind>-<size>`.
    pub fn label(&self) -> String {
        format!("{}-{}", self.kind, self.size)
    }

    /// Shank length, falling back to the seat depth for unsized parts.
    pub fn length_or_seat(&self) -> f64 {
        self.length.unwrap_or_else(|| self.dims().seat_depth)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn parses_reference_sizes() {
        let bearing = lookup(FastenerKind::Bearing, "M8-22-7").unwrap();
        assert_eq!(bearing.bore, 8.0);
        assert_eq!(bearing.outer, 22.0);
        let coupler = FastenerSpec::screw("13/32-28", 16.0).unwrap();
        assert_relative_eq!(coupler.dims().pitch, 0.9071, epsilon = 1e-4);
    }

    #[test]
    fn rejects_unknown_and_mismatched_sizes() {
        assert_eq!(
            lookup(FastenerKind::Bearing, "M9-99-9"),
            Err(CatalogError::UnknownSize {
                kind: "bearing",
                size: "M9-99-9".into()
            })
        );
        assert!(matches!(
            FastenerSpec::insert("M3-0.5"),
            Err(CatalogError::KindMismatch { .. })
        ));
        assert!(matches!(
            FastenerSpec::new(FastenerKind::SocketHeadCapScrew, "M3-0.5", None),
            Err(CatalogError::MissingLength { .. })
        ));
    }

    #[test]
    fn insert_compensation_enlarges_both_sides() {
        let insert = FastenerSpec::insert("M3-0.5-6").unwrap().dims();
        assert_relative_eq!(insert.press_fit_diameter(Fit::Loose, 0.3), 4.6);
        assert_eq!(FastenerSpec::insert("M3-0.5-6").unwrap().label(), "HeatSetInsert-M3-0.5-6");
    }

    #[test]
    fn kind_and_fit_names_parse() {
        assert_eq!("shcs".parse::<FastenerKind>(), Ok(FastenerKind::SocketHeadCapScrew));
        assert_eq!("HeatSetInsert".parse::<FastenerKind>(), Ok(FastenerKind::HeatSetInsert));
        assert_eq!(
            "washer".parse::<FastenerKind>(),
            Err(CatalogError::UnknownKind("washer".into()))
        );
        assert_eq!("Close".parse::<Fit>(), Ok(Fit::Close));
        assert_eq!("loose".parse::<Fit>(), Ok(Fit::Loose));
        assert!("snug".parse::<Fit>().is_err());

        let screw = lookup(FastenerKind::SocketHeadCapScrew, "M3-0.5").unwrap();
        assert!(screw.clearance_diameter(Fit::Close) < screw.clearance_diameter(Fit::Loose));
    }
}
