//! Reaction catalog: the equation generators.
//!
//! Each [`Reaction`] is a static template naming its molecules and the
//! closed-form minimal coefficients. Templates carry data only; the single
//! [`Equation`] type supplies all behavior. The [`ReactionFamily`] tag is
//! used for challenge selection and nothing else.
//!
//! Every template a game can reach goes through [`validate_catalog`] when
//! the engine is built, so a typo in a coefficient fails at startup instead
//! of producing an unwinnable challenge.

use serde::{Deserialize, Serialize};

use crate::balancer;
use crate::equation::{Equation, EquationTerm};
use crate::error::ConfigError;
use crate::molecule::*;
use ReactionFamily::{Decomposition, Displacement, Synthesis};

/// The reaction template a generator follows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ReactionFamily {
    /// A + B -> AB
    Synthesis,
    /// AB -> A + B
    Decomposition,
    /// Exchange of atoms between reactants.
    Displacement,
}

/// A canonical reaction with its minimal coefficients.
#[derive(Debug)]
pub struct Reaction {
    pub id: &'static str,
    pub family: ReactionFamily,
    pub reactants: &'static [(u32, &'static Molecule)],
    pub products: &'static [(u32, &'static Molecule)],
}

impl Reaction {
    /// Build a fresh equation with zeroed user coefficients.
    pub fn equation(&self, max_coefficient: u32) -> Result<Equation, ConfigError> {
        let terms = |side: &[(u32, &'static Molecule)]| -> Vec<EquationTerm> {
            side.iter().map(|&(c, m)| EquationTerm::new(m, c)).collect()
        };
        Equation::new(terms(self.reactants), terms(self.products), max_coefficient)
    }

    /// Build the equation and check its coefficients against the balancer.
    pub fn validate(&self, max_coefficient: u32) -> Result<Equation, ConfigError> {
        // Equation::new already rejects unconserved coefficients.
        let equation = self.equation(max_coefficient)?;

        let minimal =
            balancer::minimal_coefficients(&equation).map_err(|source| ConfigError::Unbalanceable {
                reaction: equation.to_string(),
                source,
            })?;
        let declared = equation.balanced_coefficients();
        if declared != minimal {
            return Err(ConfigError::NotMinimal {
                reaction: equation.to_string(),
                declared,
                minimal,
            });
        }
        Ok(equation)
    }

    pub fn molecules(&self) -> impl Iterator<Item = &'static Molecule> {
        self.reactants
            .iter()
            .chain(self.products.iter())
            .map(|&(_, m)| m)
    }

    pub fn has_large_molecule(&self) -> bool {
        self.molecules().any(|m| m.is_large())
    }

    /// True when `other` swaps this reaction's reactants and products.
    pub fn is_reverse_of(&self, other: &Reaction) -> bool {
        same_species(self.reactants, other.products) && same_species(self.products, other.reactants)
    }
}

fn same_species(a: &[(u32, &Molecule)], b: &[(u32, &Molecule)]) -> bool {
    let mut left: Vec<&str> = a.iter().map(|(_, m)| m.symbol).collect();
    let mut right: Vec<&str> = b.iter().map(|(_, m)| m.symbol).collect();
    left.sort_unstable();
    right.sort_unstable();
    left == right
}

/// Validate every reaction, failing on the first broken template.
pub fn validate_catalog(reactions: &[&Reaction], max_coefficient: u32) -> Result<(), ConfigError> {
    for reaction in reactions {
        if let Err(e) = reaction.validate(max_coefficient) {
            log::error!("reaction {} failed validation: {}", reaction.id, e);
            return Err(e);
        }
    }
    log::debug!("validated {} reactions", reactions.len());
    Ok(())
}

pub fn find(id: &str) -> Option<&'static Reaction> {
    CATALOG.iter().copied().find(|r| r.id == id)
}

// ============================================================================
// SYNTHESIS
// ============================================================================

pub static R_2H2_O2_2H2O: Reaction = Reaction {
    id: "2H2_O2_2H2O",
    family: Synthesis,
    reactants: &[(2, &H2), (1, &O2)],
    products: &[(2, &H2O)],
};

pub static R_H2_F2_2HF: Reaction = Reaction {
    id: "H2_F2_2HF",
    family: Synthesis,
    reactants: &[(1, &H2), (1, &F2)],
    products: &[(2, &HF)],
};

pub static R_H2_CL2_2HCL: Reaction = Reaction {
    id: "H2_Cl2_2HCl",
    family: Synthesis,
    reactants: &[(1, &H2), (1, &CL2)],
    products: &[(2, &HCL)],
};

pub static R_CO_2H2_CH3OH: Reaction = Reaction {
    id: "CO_2H2_CH3OH",
    family: Synthesis,
    reactants: &[(1, &CO), (2, &H2)],
    products: &[(1, &CH3OH)],
};

pub static R_CH2O_H2_CH3OH: Reaction = Reaction {
    id: "CH2O_H2_CH3OH",
    family: Synthesis,
    reactants: &[(1, &CH2O), (1, &H2)],
    products: &[(1, &CH3OH)],
};

pub static R_C2H4_H2_C2H6: Reaction = Reaction {
    id: "C2H4_H2_C2H6",
    family: Synthesis,
    reactants: &[(1, &C2H4), (1, &H2)],
    products: &[(1, &C2H6)],
};

pub static R_C2H2_2H2_C2H6: Reaction = Reaction {
    id: "C2H2_2H2_C2H6",
    family: Synthesis,
    reactants: &[(1, &C2H2), (2, &H2)],
    products: &[(1, &C2H6)],
};

pub static R_C_O2_CO2: Reaction = Reaction {
    id: "C_O2_CO2",
    family: Synthesis,
    reactants: &[(1, &CARBON), (1, &O2)],
    products: &[(1, &CO2)],
};

pub static R_2C_O2_2CO: Reaction = Reaction {
    id: "2C_O2_2CO",
    family: Synthesis,
    reactants: &[(2, &CARBON), (1, &O2)],
    products: &[(2, &CO)],
};

pub static R_2CO_O2_2CO2: Reaction = Reaction {
    id: "2CO_O2_2CO2",
    family: Synthesis,
    reactants: &[(2, &CO), (1, &O2)],
    products: &[(2, &CO2)],
};

pub static R_C_CO2_2CO: Reaction = Reaction {
    id: "C_CO2_2CO",
    family: Synthesis,
    reactants: &[(1, &CARBON), (1, &CO2)],
    products: &[(2, &CO)],
};

pub static R_C_2S_CS2: Reaction = Reaction {
    id: "C_2S_CS2",
    family: Synthesis,
    reactants: &[(1, &CARBON), (2, &SULFUR)],
    products: &[(1, &CS2)],
};

pub static R_N2_3H2_2NH3: Reaction = Reaction {
    id: "N2_3H2_2NH3",
    family: Synthesis,
    reactants: &[(1, &N2), (3, &H2)],
    products: &[(2, &NH3)],
};

pub static R_2NO_O2_2NO2: Reaction = Reaction {
    id: "2NO_O2_2NO2",
    family: Synthesis,
    reactants: &[(2, &NO), (1, &O2)],
    products: &[(2, &NO2)],
};

pub static R_2N2_O2_2N2O: Reaction = Reaction {
    id: "2N2_O2_2N2O",
    family: Synthesis,
    reactants: &[(2, &N2), (1, &O2)],
    products: &[(2, &N2O)],
};

pub static R_P4_6H2_4PH3: Reaction = Reaction {
    id: "P4_6H2_4PH3",
    family: Synthesis,
    reactants: &[(1, &P4), (6, &H2)],
    products: &[(4, &PH3)],
};

pub static R_P4_6F2_4PF3: Reaction = Reaction {
    id: "P4_6F2_4PF3",
    family: Synthesis,
    reactants: &[(1, &P4), (6, &F2)],
    products: &[(4, &PF3)],
};

pub static R_P4_6CL2_4PCL3: Reaction = Reaction {
    id: "P4_6Cl2_4PCl3",
    family: Synthesis,
    reactants: &[(1, &P4), (6, &CL2)],
    products: &[(4, &PCL3)],
};

pub static R_PCL3_CL2_PCL5: Reaction = Reaction {
    id: "PCl3_Cl2_PCl5",
    family: Synthesis,
    reactants: &[(1, &PCL3), (1, &CL2)],
    products: &[(1, &PCL5)],
};

pub static R_2SO2_O2_2SO3: Reaction = Reaction {
    id: "2SO2_O2_2SO3",
    family: Synthesis,
    reactants: &[(2, &SO2), (1, &O2)],
    products: &[(2, &SO3)],
};

// ============================================================================
// DECOMPOSITION
// ============================================================================

pub static R_2H2O_2H2_O2: Reaction = Reaction {
    id: "2H2O_2H2_O2",
    family: Decomposition,
    reactants: &[(2, &H2O)],
    products: &[(2, &H2), (1, &O2)],
};

pub static R_2HF_H2_F2: Reaction = Reaction {
    id: "2HF_H2_F2",
    family: Decomposition,
    reactants: &[(2, &HF)],
    products: &[(1, &H2), (1, &F2)],
};

pub static R_2HCL_H2_CL2: Reaction = Reaction {
    id: "2HCl_H2_Cl2",
    family: Decomposition,
    reactants: &[(2, &HCL)],
    products: &[(1, &H2), (1, &CL2)],
};

pub static R_CH3OH_CO_2H2: Reaction = Reaction {
    id: "CH3OH_CO_2H2",
    family: Decomposition,
    reactants: &[(1, &CH3OH)],
    products: &[(1, &CO), (2, &H2)],
};

pub static R_C2H6_C2H4_H2: Reaction = Reaction {
    id: "C2H6_C2H4_H2",
    family: Decomposition,
    reactants: &[(1, &C2H6)],
    products: &[(1, &C2H4), (1, &H2)],
};

pub static R_2CO2_2CO_O2: Reaction = Reaction {
    id: "2CO2_2CO_O2",
    family: Decomposition,
    reactants: &[(2, &CO2)],
    products: &[(2, &CO), (1, &O2)],
};

pub static R_2CO_C_CO2: Reaction = Reaction {
    id: "2CO_C_CO2",
    family: Decomposition,
    reactants: &[(2, &CO)],
    products: &[(1, &CARBON), (1, &CO2)],
};

pub static R_2NH3_N2_3H2: Reaction = Reaction {
    id: "2NH3_N2_3H2",
    family: Decomposition,
    reactants: &[(2, &NH3)],
    products: &[(1, &N2), (3, &H2)],
};

pub static R_2NO_N2_O2: Reaction = Reaction {
    id: "2NO_N2_O2",
    family: Decomposition,
    reactants: &[(2, &NO)],
    products: &[(1, &N2), (1, &O2)],
};

pub static R_2NO2_2NO_O2: Reaction = Reaction {
    id: "2NO2_2NO_O2",
    family: Decomposition,
    reactants: &[(2, &NO2)],
    products: &[(2, &NO), (1, &O2)],
};

pub static R_4PCL3_P4_6CL2: Reaction = Reaction {
    id: "4PCl3_P4_6Cl2",
    family: Decomposition,
    reactants: &[(4, &PCL3)],
    products: &[(1, &P4), (6, &CL2)],
};

pub static R_PCL5_PCL3_CL2: Reaction = Reaction {
    id: "PCl5_PCl3_Cl2",
    family: Decomposition,
    reactants: &[(1, &PCL5)],
    products: &[(1, &PCL3), (1, &CL2)],
};

pub static R_2SO3_2SO2_O2: Reaction = Reaction {
    id: "2SO3_2SO2_O2",
    family: Decomposition,
    reactants: &[(2, &SO3)],
    products: &[(2, &SO2), (1, &O2)],
};

// ============================================================================
// DISPLACEMENT
// ============================================================================

pub static R_CH4_H2O_3H2_CO: Reaction = Reaction {
    id: "CH4_H2O_3H2_CO",
    family: Displacement,
    reactants: &[(1, &CH4), (1, &H2O)],
    products: &[(3, &H2), (1, &CO)],
};

pub static R_CH4_2O2_CO2_2H2O: Reaction = Reaction {
    id: "CH4_2O2_CO2_2H2O",
    family: Displacement,
    reactants: &[(1, &CH4), (2, &O2)],
    products: &[(1, &CO2), (2, &H2O)],
};

pub static R_2C2H6_7O2_4CO2_6H2O: Reaction = Reaction {
    id: "2C2H6_7O2_4CO2_6H2O",
    family: Displacement,
    reactants: &[(2, &C2H6), (7, &O2)],
    products: &[(4, &CO2), (6, &H2O)],
};

pub static R_C2H4_3O2_2CO2_2H2O: Reaction = Reaction {
    id: "C2H4_3O2_2CO2_2H2O",
    family: Displacement,
    reactants: &[(1, &C2H4), (3, &O2)],
    products: &[(2, &CO2), (2, &H2O)],
};

pub static R_2C2H2_5O2_4CO2_2H2O: Reaction = Reaction {
    id: "2C2H2_5O2_4CO2_2H2O",
    family: Displacement,
    reactants: &[(2, &C2H2), (5, &O2)],
    products: &[(4, &CO2), (2, &H2O)],
};

pub static R_C2H5OH_3O2_2CO2_3H2O: Reaction = Reaction {
    id: "C2H5OH_3O2_2CO2_3H2O",
    family: Displacement,
    reactants: &[(1, &C2H5OH), (3, &O2)],
    products: &[(2, &CO2), (3, &H2O)],
};

pub static R_C2H6_CL2_C2H5CL_HCL: Reaction = Reaction {
    id: "C2H6_Cl2_C2H5Cl_HCl",
    family: Displacement,
    reactants: &[(1, &C2H6), (1, &CL2)],
    products: &[(1, &C2H5CL), (1, &HCL)],
};

pub static R_CH4_4S_CS2_2H2S: Reaction = Reaction {
    id: "CH4_4S_CS2_2H2S",
    family: Displacement,
    reactants: &[(1, &CH4), (4, &SULFUR)],
    products: &[(1, &CS2), (2, &H2S)],
};

pub static R_CS2_3O2_CO2_2SO2: Reaction = Reaction {
    id: "CS2_3O2_CO2_2SO2",
    family: Displacement,
    reactants: &[(1, &CS2), (3, &O2)],
    products: &[(1, &CO2), (2, &SO2)],
};

pub static R_4NH3_3O2_2N2_6H2O: Reaction = Reaction {
    id: "4NH3_3O2_2N2_6H2O",
    family: Displacement,
    reactants: &[(4, &NH3), (3, &O2)],
    products: &[(2, &N2), (6, &H2O)],
};

pub static R_4NH3_5O2_4NO_6H2O: Reaction = Reaction {
    id: "4NH3_5O2_4NO_6H2O",
    family: Displacement,
    reactants: &[(4, &NH3), (5, &O2)],
    products: &[(4, &NO), (6, &H2O)],
};

pub static R_4NH3_7O2_4NO2_6H2O: Reaction = Reaction {
    id: "4NH3_7O2_4NO2_6H2O",
    family: Displacement,
    reactants: &[(4, &NH3), (7, &O2)],
    products: &[(4, &NO2), (6, &H2O)],
};

pub static R_4NH3_6NO_5N2_6H2O: Reaction = Reaction {
    id: "4NH3_6NO_5N2_6H2O",
    family: Displacement,
    reactants: &[(4, &NH3), (6, &NO)],
    products: &[(5, &N2), (6, &H2O)],
};

pub static R_SO2_2H2_S_2H2O: Reaction = Reaction {
    id: "SO2_2H2_S_2H2O",
    family: Displacement,
    reactants: &[(1, &SO2), (2, &H2)],
    products: &[(1, &SULFUR), (2, &H2O)],
};

pub static R_SO2_3H2_H2S_2H2O: Reaction = Reaction {
    id: "SO2_3H2_H2S_2H2O",
    family: Displacement,
    reactants: &[(1, &SO2), (3, &H2)],
    products: &[(1, &H2S), (2, &H2O)],
};

pub static R_2F2_H2O_OF2_2HF: Reaction = Reaction {
    id: "2F2_H2O_OF2_2HF",
    family: Displacement,
    reactants: &[(2, &F2), (1, &H2O)],
    products: &[(1, &OF2), (2, &HF)],
};

pub static R_OF2_H2O_O2_2HF: Reaction = Reaction {
    id: "OF2_H2O_O2_2HF",
    family: Displacement,
    reactants: &[(1, &OF2), (1, &H2O)],
    products: &[(1, &O2), (2, &HF)],
};

/// Every reaction in the catalog.
pub static CATALOG: &[&Reaction] = &[
    &R_2H2_O2_2H2O,
    &R_H2_F2_2HF,
    &R_H2_CL2_2HCL,
    &R_CO_2H2_CH3OH,
    &R_CH2O_H2_CH3OH,
    &R_C2H4_H2_C2H6,
    &R_C2H2_2H2_C2H6,
    &R_C_O2_CO2,
    &R_2C_O2_2CO,
    &R_2CO_O2_2CO2,
    &R_C_CO2_2CO,
    &R_C_2S_CS2,
    &R_N2_3H2_2NH3,
    &R_2NO_O2_2NO2,
    &R_2N2_O2_2N2O,
    &R_P4_6H2_4PH3,
    &R_P4_6F2_4PF3,
    &R_P4_6CL2_4PCL3,
    &R_PCL3_CL2_PCL5,
    &R_2SO2_O2_2SO3,
    &R_2H2O_2H2_O2,
    &R_2HF_H2_F2,
    &R_2HCL_H2_CL2,
    &R_CH3OH_CO_2H2,
    &R_C2H6_C2H4_H2,
    &R_2CO2_2CO_O2,
    &R_2CO_C_CO2,
    &R_2NH3_N2_3H2,
    &R_2NO_N2_O2,
    &R_2NO2_2NO_O2,
    &R_4PCL3_P4_6CL2,
    &R_PCL5_PCL3_CL2,
    &R_2SO3_2SO2_O2,
    &R_CH4_H2O_3H2_CO,
    &R_CH4_2O2_CO2_2H2O,
    &R_2C2H6_7O2_4CO2_6H2O,
    &R_C2H4_3O2_2CO2_2H2O,
    &R_2C2H2_5O2_4CO2_2H2O,
    &R_C2H5OH_3O2_2CO2_3H2O,
    &R_C2H6_CL2_C2H5CL_HCL,
    &R_CH4_4S_CS2_2H2S,
    &R_CS2_3O2_CO2_2SO2,
    &R_4NH3_3O2_2N2_6H2O,
    &R_4NH3_5O2_4NO_6H2O,
    &R_4NH3_7O2_4NO2_6H2O,
    &R_4NH3_6NO_5N2_6H2O,
    &R_SO2_2H2_S_2H2O,
    &R_SO2_3H2_H2S_2H2O,
    &R_2F2_H2O_OF2_2HF,
    &R_OF2_H2O_O2_2HF,
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_validates() {
        validate_catalog(CATALOG, 7).unwrap();
    }

    #[test]
    fn test_catalog_family_counts() {
        let count = |f| CATALOG.iter().filter(|r| r.family == f).count();
        assert_eq!(count(Synthesis), 20);
        assert_eq!(count(Decomposition), 13);
        assert_eq!(count(Displacement), 17);
    }

    #[test]
    fn test_ids_unique() {
        let mut ids: Vec<&str> = CATALOG.iter().map(|r| r.id).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), CATALOG.len());
    }

    #[test]
    fn test_display_matches_id_shape() {
        let eq = R_2C2H6_7O2_4CO2_6H2O.equation(7).unwrap();
        assert_eq!(eq.to_string(), "2C2H6 + 7O2 -> 4CO2 + 6H2O");
        assert_eq!(eq.coefficients_string(), "2 7 -> 4 6");
    }

    #[test]
    fn test_reverse_pairs() {
        assert!(R_2H2_O2_2H2O.is_reverse_of(&R_2H2O_2H2_O2));
        assert!(R_2H2O_2H2_O2.is_reverse_of(&R_2H2_O2_2H2O));
        assert!(!R_2H2_O2_2H2O.is_reverse_of(&R_H2_F2_2HF));
        // C + CO2 -> 2CO and 2CO -> C + CO2
        assert!(R_C_CO2_2CO.is_reverse_of(&R_2CO_C_CO2));
    }

    #[test]
    fn test_narrow_range_rejects_large_coefficients() {
        let err = R_2C2H6_7O2_4CO2_6H2O.validate(3).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::CoefficientOutOfRange { coefficient: 7, .. }
        ));
    }

    #[test]
    fn test_non_minimal_template_rejected() {
        static DOUBLED: Reaction = Reaction {
            id: "4H2_2O2_4H2O",
            family: Synthesis,
            reactants: &[(4, &H2), (2, &O2)],
            products: &[(4, &H2O)],
        };
        let err = DOUBLED.validate(7).unwrap_err();
        assert_eq!(
            err,
            ConfigError::NotMinimal {
                reaction: "4H2 + 2O2 -> 4H2O".into(),
                declared: vec![4, 2, 4],
                minimal: vec![2, 1, 2],
            }
        );
    }

    #[test]
    fn test_unconserved_template_rejected() {
        static BROKEN: Reaction = Reaction {
            id: "H2_O2_H2O",
            family: Synthesis,
            reactants: &[(1, &H2), (1, &O2)],
            products: &[(1, &H2O)],
        };
        assert!(matches!(
            validate_catalog(&[&BROKEN], 7),
            Err(ConfigError::NotConserved { .. })
        ));
    }

    #[test]
    fn test_find() {
        assert_eq!(find("N2_3H2_2NH3").map(|r| r.family), Some(Synthesis));
        assert!(find("nope").is_none());
    }
}
