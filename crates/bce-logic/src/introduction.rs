//! Introduction screen model: free play with three fixed equations.
//!
//! No scoring and no state machine, just a selected equation whose
//! coefficients the player edits in the range 0..=3.

use crate::config::INTRODUCTION_MAX_COEFFICIENT;
use crate::equation::{Equation, Side};
use crate::error::ConfigError;
use crate::events::{Notifier, SubscriptionId};
use crate::reactions::{Reaction, R_2H2O_2H2_O2, R_CH4_2O2_CO2_2H2O, R_N2_3H2_2NH3};

#[derive(Debug, Clone, PartialEq)]
pub enum IntroEvent {
    SelectionChanged { index: usize },
    CoefficientsChanged { balanced: bool, sum: u32 },
}

#[derive(Debug, Clone)]
pub struct IntroChoice {
    pub label: &'static str,
    pub equation: Equation,
}

static CHOICES: [(&str, &Reaction); 3] = [
    ("Make Ammonia", &R_N2_3H2_2NH3),
    ("Separate Water", &R_2H2O_2H2_O2),
    ("Combust Methane", &R_CH4_2O2_CO2_2H2O),
];

pub struct IntroductionModel {
    choices: Vec<IntroChoice>,
    selected: usize,
    notifier: Notifier<IntroEvent>,
}

impl IntroductionModel {
    pub fn new() -> Result<Self, ConfigError> {
        let choices = CHOICES
            .iter()
            .map(|&(label, reaction)| {
                Ok(IntroChoice {
                    label,
                    equation: reaction.validate(INTRODUCTION_MAX_COEFFICIENT)?,
                })
            })
            .collect::<Result<Vec<_>, ConfigError>>()?;
        Ok(Self {
            choices,
            selected: 0,
            notifier: Notifier::new(),
        })
    }

    pub fn choices(&self) -> &[IntroChoice] {
        &self.choices
    }

    pub fn selected(&self) -> usize {
        self.selected
    }

    pub fn current(&self) -> &Equation {
        &self.choices[self.selected].equation
    }

    pub fn label(&self) -> &'static str {
        self.choices[self.selected].label
    }

    /// Switch equations. Returns false for an index with no choice.
    pub fn select(&mut self, index: usize) -> bool {
        if index >= self.choices.len() {
            log::debug!("ignoring introduction selection {}", index);
            return false;
        }
        if index != self.selected {
            self.selected = index;
            self.notifier.push(IntroEvent::SelectionChanged { index });
            self.push_coefficients();
            self.notifier.flush();
        }
        true
    }

    pub fn set_coefficient(&mut self, side: Side, index: usize, value: i64) -> Option<u32> {
        let stored = self.choices[self.selected]
            .equation
            .set_coefficient(side, index, value)?;
        self.push_coefficients();
        self.notifier.flush();
        Some(stored)
    }

    /// Back to the first choice with every equation cleared.
    pub fn reset(&mut self) {
        for choice in &mut self.choices {
            choice.equation.reset();
        }
        if self.selected != 0 {
            self.selected = 0;
            self.notifier.push(IntroEvent::SelectionChanged { index: 0 });
        }
        self.push_coefficients();
        self.notifier.flush();
    }

    pub fn subscribe(&mut self, listener: impl FnMut(&IntroEvent) + 'static) -> SubscriptionId {
        self.notifier.subscribe(listener)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.notifier.unsubscribe(id)
    }

    fn push_coefficients(&mut self) {
        let equation = &self.choices[self.selected].equation;
        self.notifier.push(IntroEvent::CoefficientsChanged {
            balanced: equation.is_balanced(),
            sum: equation.coefficients_sum(),
        });
    }
}
