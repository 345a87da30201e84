//! Molecules with fixed atom compositions shared by every equation that uses them.
//!
//! Each species is a `'static` value, so equations hold `&'static Molecule`
//! and never copy or mutate composition data.

use std::fmt;

use crate::elements::Element;
use crate::elements::Element::{Cl, C, F, H, N, O, P, S};

/// Molecules with more atoms than this are "large" and count against a
/// level's large-molecule cap.
pub const LARGE_MOLECULE_ATOMS: usize = 5;

/// A molecule: display symbol plus its ordered atoms.
#[derive(Debug, PartialEq, Eq)]
pub struct Molecule {
    pub symbol: &'static str,
    pub atoms: &'static [Element],
}

impl Molecule {
    pub const fn new(symbol: &'static str, atoms: &'static [Element]) -> Self {
        Self { symbol, atoms }
    }

    pub fn atom_count(&self) -> usize {
        self.atoms.len()
    }

    /// Element counts, ordered by first appearance in the atom list.
    pub fn composition(&self) -> Vec<(Element, u32)> {
        let mut counts: Vec<(Element, u32)> = Vec::new();
        for &atom in self.atoms {
            match counts.iter_mut().find(|(e, _)| *e == atom) {
                Some((_, n)) => *n += 1,
                None => counts.push((atom, 1)),
            }
        }
        counts
    }

    pub fn count_of(&self, element: Element) -> u32 {
        self.atoms.iter().filter(|&&a| a == element).count() as u32
    }

    pub fn is_large(&self) -> bool {
        self.atoms.len() > LARGE_MOLECULE_ATOMS
    }
}

impl fmt::Display for Molecule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol)
    }
}

// ============================================================================
// CATALOG
// ============================================================================

pub static H2: Molecule = Molecule::new("H2", &[H, H]);
pub static O2: Molecule = Molecule::new("O2", &[O, O]);
pub static N2: Molecule = Molecule::new("N2", &[N, N]);
pub static F2: Molecule = Molecule::new("F2", &[F, F]);
pub static CL2: Molecule = Molecule::new("Cl2", &[Cl, Cl]);
pub static CARBON: Molecule = Molecule::new("C", &[C]);
pub static SULFUR: Molecule = Molecule::new("S", &[S]);
pub static P4: Molecule = Molecule::new("P4", &[P, P, P, P]);

pub static H2O: Molecule = Molecule::new("H2O", &[H, H, O]);
pub static HF: Molecule = Molecule::new("HF", &[H, F]);
pub static HCL: Molecule = Molecule::new("HCl", &[H, Cl]);
pub static H2S: Molecule = Molecule::new("H2S", &[H, H, S]);

pub static CO: Molecule = Molecule::new("CO", &[C, O]);
pub static CO2: Molecule = Molecule::new("CO2", &[C, O, O]);
pub static CH4: Molecule = Molecule::new("CH4", &[C, H, H, H, H]);
pub static CH2O: Molecule = Molecule::new("CH2O", &[C, H, H, O]);
pub static CH3OH: Molecule = Molecule::new("CH3OH", &[C, H, H, H, O, H]);
pub static C2H2: Molecule = Molecule::new("C2H2", &[C, C, H, H]);
pub static C2H4: Molecule = Molecule::new("C2H4", &[C, C, H, H, H, H]);
pub static C2H6: Molecule = Molecule::new("C2H6", &[C, C, H, H, H, H, H, H]);
pub static C2H5OH: Molecule = Molecule::new("C2H5OH", &[C, C, H, H, H, H, H, O, H]);
pub static C2H5CL: Molecule = Molecule::new("C2H5Cl", &[C, C, H, H, H, H, H, Cl]);
pub static CS2: Molecule = Molecule::new("CS2", &[C, S, S]);

pub static NH3: Molecule = Molecule::new("NH3", &[N, H, H, H]);
pub static NO: Molecule = Molecule::new("NO", &[N, O]);
pub static NO2: Molecule = Molecule::new("NO2", &[N, O, O]);
pub static N2O: Molecule = Molecule::new("N2O", &[N, N, O]);

pub static PH3: Molecule = Molecule::new("PH3", &[P, H, H, H]);
pub static PF3: Molecule = Molecule::new("PF3", &[P, F, F, F]);
pub static PCL3: Molecule = Molecule::new("PCl3", &[P, Cl, Cl, Cl]);
pub static PCL5: Molecule = Molecule::new("PCl5", &[P, Cl, Cl, Cl, Cl, Cl]);

pub static SO2: Molecule = Molecule::new("SO2", &[S, O, O]);
pub static SO3: Molecule = Molecule::new("SO3", &[S, O, O, O]);
pub static OF2: Molecule = Molecule::new("OF2", &[O, F, F]);
