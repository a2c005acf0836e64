//! The seven Core Steps and their fixed ordinal ranking.

use serde::{Deserialize, Serialize};
use std::fmt;

/// One of the seven ordered narrative phases.
///
/// Variants are declared in ordinal order, so the derived `Ord` agrees with
/// [`CoreStep::ordinal`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum CoreStep {
    WeaknessNeed,
    Desire,
    Opponent,
    Plan,
    Battle,
    SelfRevelation,
    NewEquilibrium,
}

impl CoreStep {
    /// All steps, lowest ordinal first.
    pub const ALL: [CoreStep; 7] = [
        CoreStep::WeaknessNeed,
        CoreStep::Desire,
        CoreStep::Opponent,
        CoreStep::Plan,
        CoreStep::Battle,
        CoreStep::SelfRevelation,
        CoreStep::NewEquilibrium,
    ];

    /// Rank of this step, `1..=7`.
    ///
    /// The transition guard never lets a traversal move to a step with a
    /// lower ordinal than the beat it is standing on.
    pub fn ordinal(self) -> u8 {
        match self {
            Self::WeaknessNeed => 1,
            Self::Desire => 2,
            Self::Opponent => 3,
            Self::Plan => 4,
            Self::Battle => 5,
            Self::SelfRevelation => 6,
            Self::NewEquilibrium => 7,
        }
    }

    /// Display name.
    pub fn label(self) -> &'static str {
        match self {
            Self::WeaknessNeed => "Weakness & Need",
            Self::Desire => "Desire",
            Self::Opponent => "Opponent",
            Self::Plan => "Plan",
            Self::Battle => "Battle",
            Self::SelfRevelation => "Self Revelation",
            Self::NewEquilibrium => "New Equilibrium",
        }
    }
}

impl fmt::Display for CoreStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
