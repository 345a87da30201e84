//! Challenge pools: which reactions each game level draws from, and how a
//! level's challenge sequence is picked.
//!
//! Selection is greedy over a shuffled candidate list with three rules:
//! no reaction twice, never a reaction together with its reverse, and at
//! most `max_large_molecules` challenges containing a large molecule.
//! Consecutive challenges also avoid repeating a reaction family whenever
//! another family is still available.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::equation::Equation;
use crate::error::ConfigError;
use crate::reactions::*;

/// Reaction candidates for one level.
#[derive(Debug, Clone)]
pub struct LevelPool {
    pub reactions: Vec<&'static Reaction>,
    /// Cap on challenges containing a large molecule. `None` = no cap.
    pub max_large_molecules: Option<usize>,
}

impl LevelPool {
    pub fn new(reactions: Vec<&'static Reaction>) -> Self {
        Self {
            reactions,
            max_large_molecules: None,
        }
    }

    pub fn with_max_large_molecules(mut self, max: usize) -> Self {
        self.max_large_molecules = Some(max);
        self
    }

    /// Pick `count` reactions following the pool rules.
    pub fn select<R: Rng + ?Sized>(
        &self,
        level: usize,
        count: usize,
        rng: &mut R,
    ) -> Result<Vec<&'static Reaction>, ConfigError> {
        if self.reactions.is_empty() {
            return Err(ConfigError::EmptyPool { level });
        }

        let mut chosen: Vec<&'static Reaction> = Vec::with_capacity(count);
        let mut large = 0;
        while chosen.len() < count {
            let large_allowed = self.max_large_molecules.map_or(true, |max| large < max);
            let mut candidates: Vec<&'static Reaction> = self
                .reactions
                .iter()
                .copied()
                .filter(|r| !chosen.iter().any(|c| c.id == r.id || c.is_reverse_of(r)))
                .filter(|r| large_allowed || !r.has_large_molecule())
                .collect();
            if candidates.is_empty() {
                return Err(ConfigError::PoolTooSmall {
                    level,
                    available: chosen.len(),
                    required: count,
                });
            }
            candidates.shuffle(rng);

            let previous = chosen.last().map(|r| r.family);
            let pick = candidates
                .iter()
                .copied()
                .find(|r| Some(r.family) != previous)
                .unwrap_or(candidates[0]);
            if pick.has_large_molecule() {
                large += 1;
            }
            chosen.push(pick);
        }
        Ok(chosen)
    }
}

/// One level's challenges for a single game, consumed in order.
#[derive(Debug, Clone)]
pub struct ChallengePool {
    level: usize,
    reactions: Vec<&'static Reaction>,
    equations: Vec<Equation>,
}

impl ChallengePool {
    pub fn build<R: Rng + ?Sized>(
        pool: &LevelPool,
        level: usize,
        count: usize,
        max_coefficient: u32,
        rng: &mut R,
    ) -> Result<Self, ConfigError> {
        let reactions = pool.select(level, count, rng)?;
        let equations = reactions
            .iter()
            .map(|r| r.equation(max_coefficient))
            .collect::<Result<Vec<_>, _>>()?;
        log::debug!(
            "level {} pool: {}",
            level,
            reactions.iter().map(|r| r.id).collect::<Vec<_>>().join(", ")
        );
        Ok(Self {
            level,
            reactions,
            equations,
        })
    }

    pub fn level(&self) -> usize {
        self.level
    }

    pub fn len(&self) -> usize {
        self.equations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.equations.is_empty()
    }

    pub fn reactions(&self) -> &[&'static Reaction] {
        &self.reactions
    }

    pub fn equation(&self, index: usize) -> Option<&Equation> {
        self.equations.get(index)
    }

    pub fn equation_mut(&mut self, index: usize) -> Option<&mut Equation> {
        self.equations.get_mut(index)
    }
}

// ============================================================================
// DEFAULT LEVELS
// ============================================================================

/// The three game levels: simple synthesis/decomposition, mid-size
/// displacement and phosphorus chemistry, then organic combustion with
/// large molecules.
pub fn default_levels() -> Vec<LevelPool> {
    vec![
        LevelPool::new(vec![
            &R_2H2_O2_2H2O,
            &R_H2_F2_2HF,
            &R_H2_CL2_2HCL,
            &R_C_O2_CO2,
            &R_2C_O2_2CO,
            &R_2CO_O2_2CO2,
            &R_C_CO2_2CO,
            &R_C_2S_CS2,
            &R_N2_3H2_2NH3,
            &R_2NO_O2_2NO2,
            &R_2N2_O2_2N2O,
            &R_2SO2_O2_2SO3,
            &R_2H2O_2H2_O2,
            &R_2HF_H2_F2,
            &R_2HCL_H2_CL2,
            &R_2CO2_2CO_O2,
            &R_2CO_C_CO2,
            &R_2NH3_N2_3H2,
            &R_2NO_N2_O2,
            &R_2NO2_2NO_O2,
            &R_2SO3_2SO2_O2,
        ]),
        LevelPool::new(vec![
            &R_CH4_H2O_3H2_CO,
            &R_CH4_2O2_CO2_2H2O,
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
            &R_P4_6H2_4PH3,
            &R_P4_6F2_4PF3,
            &R_P4_6CL2_4PCL3,
            &R_4PCL3_P4_6CL2,
            &R_PCL3_CL2_PCL5,
            &R_PCL5_PCL3_CL2,
        ])
        .with_max_large_molecules(1),
        LevelPool::new(vec![
            &R_2C2H6_7O2_4CO2_6H2O,
            &R_C2H4_3O2_2CO2_2H2O,
            &R_2C2H2_5O2_4CO2_2H2O,
            &R_C2H5OH_3O2_2CO2_3H2O,
            &R_C2H6_CL2_C2H5CL_HCL,
            &R_CO_2H2_CH3OH,
            &R_CH2O_H2_CH3OH,
            &R_C2H4_H2_C2H6,
            &R_C2H2_2H2_C2H6,
            &R_CH3OH_CO_2H2,
            &R_C2H6_C2H4_H2,
            &R_CH4_2O2_CO2_2H2O,
            &R_CS2_3O2_CO2_2SO2,
            &R_4NH3_7O2_4NO2_6H2O,
            &R_4NH3_6NO_5N2_6H2O,
        ])
        .with_max_large_molecules(3),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_default_levels_select_five() {
        for seed in 0..50 {
            let mut rng = StdRng::seed_from_u64(seed);
            for (level, pool) in default_levels().iter().enumerate() {
                let picked = pool.select(level, 5, &mut rng).unwrap();
                assert_eq!(picked.len(), 5);
            }
        }
    }

    #[test]
    fn test_no_duplicates_or_reverse_pairs() {
        for seed in 0..50 {
            let mut rng = StdRng::seed_from_u64(seed);
            let picked = default_levels()[0].select(0, 5, &mut rng).unwrap();
            for (i, a) in picked.iter().enumerate() {
                for b in &picked[i + 1..] {
                    assert_ne!(a.id, b.id);
                    assert!(!a.is_reverse_of(b), "{} with reverse {}", a.id, b.id);
                }
            }
        }
    }

    #[test]
    fn test_families_alternate_when_possible() {
        for seed in 0..50 {
            let mut rng = StdRng::seed_from_u64(seed);
            let picked = default_levels()[0].select(0, 5, &mut rng).unwrap();
            for pair in picked.windows(2) {
                assert_ne!(pair[0].family, pair[1].family);
            }
        }
    }

    #[test]
    fn test_large_molecule_cap() {
        let levels = default_levels();
        for seed in 0..50 {
            let mut rng = StdRng::seed_from_u64(seed);
            let l2 = levels[1].select(1, 5, &mut rng).unwrap();
            assert!(l2.iter().filter(|r| r.has_large_molecule()).count() <= 1);
            let l3 = levels[2].select(2, 5, &mut rng).unwrap();
            assert!(l3.iter().filter(|r| r.has_large_molecule()).count() <= 3);
        }
    }

    #[test]
    fn test_single_family_pool_still_fills() {
        let pool = LevelPool::new(vec![&R_CH4_2O2_CO2_2H2O, &R_CS2_3O2_CO2_2SO2]);
        let mut rng = StdRng::seed_from_u64(1);
        let picked = pool.select(0, 2, &mut rng).unwrap();
        assert_eq!(picked.len(), 2);
    }

    #[test]
    fn test_empty_pool() {
        let mut rng = StdRng::seed_from_u64(1);
        let err = LevelPool::new(vec![]).select(4, 5, &mut rng).unwrap_err();
        assert_eq!(err, ConfigError::EmptyPool { level: 4 });
    }

    #[test]
    fn test_pool_too_small() {
        // a reaction and its reverse can only yield one challenge
        let pool = LevelPool::new(vec![&R_2H2_O2_2H2O, &R_2H2O_2H2_O2]);
        let mut rng = StdRng::seed_from_u64(1);
        let err = pool.select(0, 2, &mut rng).unwrap_err();
        assert_eq!(
            err,
            ConfigError::PoolTooSmall {
                level: 0,
                available: 1,
                required: 2
            }
        );
    }

    #[test]
    fn test_challenge_pool_builds_fresh_equations() {
        let mut rng = StdRng::seed_from_u64(3);
        let pool = ChallengePool::build(&default_levels()[2], 2, 5, 7, &mut rng).unwrap();
        assert_eq!(pool.len(), 5);
        assert_eq!(pool.level(), 2);
        for i in 0..pool.len() {
            assert_eq!(pool.equation(i).unwrap().coefficients_sum(), 0);
        }
        assert!(pool.equation(5).is_none());
    }
}
