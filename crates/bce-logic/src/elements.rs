//! Element catalog: the fixed set of elements used by the reaction catalog.
//!
//! Display metadata (name, color) is carried for the presentation layer;
//! the core only ever compares elements by identity.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// A chemical element appearing in at least one catalog molecule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[repr(u8)]
pub enum Element {
    H = 1,
    C = 6,
    N = 7,
    O = 8,
    F = 9,
    P = 15,
    S = 16,
    Cl = 17,
}

/// Display metadata for an element.
#[derive(Debug, Clone)]
pub struct ElementInfo {
    pub symbol: &'static str,
    pub name: &'static str,
    /// RGB color used when drawing atoms of this element.
    pub color: [u8; 3],
}

impl Element {
    pub fn all() -> &'static [Element] {
        &[
            Self::H,
            Self::C,
            Self::N,
            Self::O,
            Self::F,
            Self::P,
            Self::S,
            Self::Cl,
        ]
    }

    pub fn info(&self) -> ElementInfo {
        match self {
            Self::H => ElementInfo {
                symbol: "H",
                name: "Hydrogen",
                color: [255, 255, 255],
            },
            Self::C => ElementInfo {
                symbol: "C",
                name: "Carbon",
                color: [178, 178, 178],
            },
            Self::N => ElementInfo {
                symbol: "N",
                name: "Nitrogen",
                color: [0, 0, 255],
            },
            Self::O => ElementInfo {
                symbol: "O",
                name: "Oxygen",
                color: [255, 85, 0],
            },
            Self::F => ElementInfo {
                symbol: "F",
                name: "Fluorine",
                color: [247, 255, 74],
            },
            Self::P => ElementInfo {
                symbol: "P",
                name: "Phosphorus",
                color: [255, 128, 0],
            },
            Self::S => ElementInfo {
                symbol: "S",
                name: "Sulfur",
                color: [212, 181, 59],
            },
            Self::Cl => ElementInfo {
                symbol: "Cl",
                name: "Chlorine",
                color: [153, 242, 57],
            },
        }
    }

    pub fn symbol(&self) -> &'static str {
        self.info().symbol
    }

    pub fn atomic_number(&self) -> u8 {
        *self as u8
    }
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

impl FromStr for Element {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Element::all()
            .iter()
            .copied()
            .find(|e| e.symbol() == s)
            .ok_or_else(|| ConfigError::Parse(format!("unknown element symbol '{}'", s)))
    }
}
