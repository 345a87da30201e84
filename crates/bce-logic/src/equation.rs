//! Equations and their terms.
//!
//! An [`Equation`] is built once with canonical coefficients that must
//! conserve every element; after that only the user coefficients change.
//! "Correct" in the game means balanced *and* simplified, so `2N2 + 6H2 ->
//! 4NH3` is balanced but still a wrong answer.

use std::fmt;

use serde::Serialize;

use crate::balancer::gcd;
use crate::elements::Element;
use crate::error::ConfigError;
use crate::molecule::Molecule;

/// Which side of the arrow a term sits on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Side {
    Reactants,
    Products,
}

impl Side {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Reactants => "reactants",
            Self::Products => "products",
        }
    }
}

/// A molecule with its canonical and user-entered coefficients.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EquationTerm {
    molecule: &'static Molecule,
    balanced_coefficient: u32,
    user_coefficient: u32,
}

impl EquationTerm {
    pub fn new(molecule: &'static Molecule, balanced_coefficient: u32) -> Self {
        Self {
            molecule,
            balanced_coefficient,
            user_coefficient: 0,
        }
    }

    pub fn molecule(&self) -> &'static Molecule {
        self.molecule
    }

    pub fn balanced_coefficient(&self) -> u32 {
        self.balanced_coefficient
    }

    pub fn user_coefficient(&self) -> u32 {
        self.user_coefficient
    }

    /// Clamp into `0..=max` and store. Returns the stored value.
    fn set_user_coefficient(&mut self, value: i64, max: u32) -> u32 {
        let clamped = value.clamp(0, max as i64) as u32;
        if clamped as i64 != value {
            log::trace!(
                "clamped coefficient for {} from {} to {}",
                self.molecule.symbol,
                value,
                clamped
            );
        }
        self.user_coefficient = clamped;
        clamped
    }
}

/// Read-only view of one term, for the presentation layer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TermView {
    pub symbol: &'static str,
    pub composition: Vec<(Element, u32)>,
    pub user_coefficient: u32,
    pub balanced_coefficient: u32,
    pub large: bool,
}

/// Read-only view of a whole equation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EquationView {
    pub reactants: Vec<TermView>,
    pub products: Vec<TermView>,
    pub balanced: bool,
    pub balanced_and_simplified: bool,
    pub coefficients: String,
}

/// A chemical equation with ordered reactant and product terms.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Equation {
    reactants: Vec<EquationTerm>,
    products: Vec<EquationTerm>,
    max_coefficient: u32,
}

impl Equation {
    /// Build an equation, rejecting canonical coefficients that are zero,
    /// exceed `max_coefficient`, or fail to conserve atoms.
    pub fn new(
        reactants: Vec<EquationTerm>,
        products: Vec<EquationTerm>,
        max_coefficient: u32,
    ) -> Result<Self, ConfigError> {
        let equation = Self {
            reactants,
            products,
            max_coefficient,
        };
        equation.validate()?;
        Ok(equation)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        for side in [Side::Reactants, Side::Products] {
            if self.side(side).is_empty() {
                return Err(ConfigError::EmptySide {
                    reaction: self.to_string(),
                    side: side.name(),
                });
            }
        }
        for term in self.terms() {
            if term.balanced_coefficient == 0 {
                return Err(ConfigError::ZeroCoefficient {
                    reaction: self.to_string(),
                });
            }
            if term.balanced_coefficient > self.max_coefficient {
                return Err(ConfigError::CoefficientOutOfRange {
                    reaction: self.to_string(),
                    coefficient: term.balanced_coefficient,
                    max: self.max_coefficient,
                });
            }
        }
        for element in self.elements() {
            let reactant_count = atom_total(&self.reactants, element, |t| t.balanced_coefficient);
            let product_count = atom_total(&self.products, element, |t| t.balanced_coefficient);
            if reactant_count != product_count {
                return Err(ConfigError::NotConserved {
                    reaction: self.to_string(),
                    element: element.symbol(),
                    reactant_count,
                    product_count,
                });
            }
        }
        Ok(())
    }

    pub fn reactants(&self) -> &[EquationTerm] {
        &self.reactants
    }

    pub fn products(&self) -> &[EquationTerm] {
        &self.products
    }

    pub fn side(&self, side: Side) -> &[EquationTerm] {
        match side {
            Side::Reactants => &self.reactants,
            Side::Products => &self.products,
        }
    }

    /// All terms, reactants first.
    pub fn terms(&self) -> impl Iterator<Item = &EquationTerm> {
        self.reactants.iter().chain(self.products.iter())
    }

    pub fn max_coefficient(&self) -> u32 {
        self.max_coefficient
    }

    /// Distinct elements, ordered by first appearance across the equation.
    pub fn elements(&self) -> Vec<Element> {
        let mut elements = Vec::new();
        for term in self.terms() {
            for &atom in term.molecule.atoms {
                if !elements.contains(&atom) {
                    elements.push(atom);
                }
            }
        }
        elements
    }

    pub fn user_coefficients(&self) -> Vec<u32> {
        self.terms().map(|t| t.user_coefficient).collect()
    }

    pub fn balanced_coefficients(&self) -> Vec<u32> {
        self.terms().map(|t| t.balanced_coefficient).collect()
    }

    /// Set one term's user coefficient, clamped into `0..=max`.
    ///
    /// Returns the value actually stored, or `None` if there is no such term.
    pub fn set_coefficient(&mut self, side: Side, index: usize, value: i64) -> Option<u32> {
        let max = self.max_coefficient;
        let terms = match side {
            Side::Reactants => &mut self.reactants,
            Side::Products => &mut self.products,
        };
        terms
            .get_mut(index)
            .map(|term| term.set_user_coefficient(value, max))
    }

    /// Set every user coefficient to its canonical value.
    pub fn balance(&mut self) {
        for term in self.reactants.iter_mut().chain(self.products.iter_mut()) {
            term.user_coefficient = term.balanced_coefficient;
        }
    }

    /// Set every user coefficient back to zero.
    pub fn reset(&mut self) {
        for term in self.reactants.iter_mut().chain(self.products.iter_mut()) {
            term.user_coefficient = 0;
        }
    }

    /// Saturates at `u32::MAX`.
    pub fn coefficients_sum(&self) -> u32 {
        self.terms()
            .fold(0u32, |acc, t| acc.saturating_add(t.user_coefficient))
    }

    /// True when the user coefficients conserve every element.
    /// The all-zero assignment is never balanced.
    pub fn is_balanced(&self) -> bool {
        if self.coefficients_sum() == 0 {
            return false;
        }
        self.elements().into_iter().all(|element| {
            atom_total(&self.reactants, element, |t| t.user_coefficient)
                == atom_total(&self.products, element, |t| t.user_coefficient)
        })
    }

    /// True when the user coefficients share no divisor above 1.
    pub fn is_simplified(&self) -> bool {
        self.terms()
            .fold(0u64, |acc, t| gcd(acc, t.user_coefficient as u64))
            == 1
    }

    pub fn is_balanced_and_simplified(&self) -> bool {
        self.is_balanced() && self.is_simplified()
    }

    /// Per-element atom totals on one side at the user coefficients.
    pub fn element_counts(&self, side: Side) -> Vec<(Element, u64)> {
        let terms = self.side(side);
        self.elements()
            .into_iter()
            .map(|e| (e, atom_total(terms, e, |t| t.user_coefficient)))
            .collect()
    }

    /// Canonical coefficients as text, e.g. `1 3 -> 2`.
    pub fn coefficients_string(&self) -> String {
        let join = |terms: &[EquationTerm]| {
            terms
                .iter()
                .map(|t| t.balanced_coefficient.to_string())
                .collect::<Vec<_>>()
                .join(" ")
        };
        format!("{} -> {}", join(&self.reactants), join(&self.products))
    }

    pub fn view(&self) -> EquationView {
        let view_side = |terms: &[EquationTerm]| -> Vec<TermView> {
            terms
                .iter()
                .map(|t| TermView {
                    symbol: t.molecule.symbol,
                    composition: t.molecule.composition(),
                    user_coefficient: t.user_coefficient,
                    balanced_coefficient: t.balanced_coefficient,
                    large: t.molecule.is_large(),
                })
                .collect()
        };
        EquationView {
            reactants: view_side(&self.reactants),
            products: view_side(&self.products),
            balanced: self.is_balanced(),
            balanced_and_simplified: self.is_balanced_and_simplified(),
            coefficients: self.coefficients_string(),
        }
    }

    pub fn has_large_molecule(&self) -> bool {
        self.terms().any(|t| t.molecule.is_large())
    }
}

fn atom_total(
    terms: &[EquationTerm],
    element: Element,
    coefficient: impl Fn(&EquationTerm) -> u32,
) -> u64 {
    terms
        .iter()
        .map(|t| coefficient(t) as u64 * t.molecule.count_of(element) as u64)
        .sum()
}

fn write_side(f: &mut fmt::Formatter<'_>, terms: &[EquationTerm]) -> fmt::Result {
    for (i, t) in terms.iter().enumerate() {
        if i > 0 {
            f.write_str(" + ")?;
        }
        if t.balanced_coefficient != 1 {
            write!(f, "{}", t.balanced_coefficient)?;
        }
        f.write_str(t.molecule.symbol)?;
    }
    Ok(())
}

/// Formula with canonical coefficients, omitting 1s.
impl fmt::Display for Equation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_side(f, &self.reactants)?;
        f.write_str(" -> ")?;
        write_side(f, &self.products)
    }
}
