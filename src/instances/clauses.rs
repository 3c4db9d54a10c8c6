//! # Stored Clause Records

use std::fmt;

use crate::types::{Clause, Lit};

/// A clause every solution must satisfy
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HardClause {
    clause: Clause,
}

impl HardClause {
    pub(crate) fn new(lits: &[Lit]) -> Self {
        Self {
            clause: Clause::from(lits),
        }
    }

    /// Gets the literals of the clause
    #[inline]
    pub fn lits(&self) -> &[Lit] {
        self.clause.lits()
    }

    /// Gets the clause
    #[inline]
    pub fn clause(&self) -> &Clause {
        &self.clause
    }
}

impl fmt::Display for HardClause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.clause)
    }
}

/// A weighted clause. Falsifying it costs its weight.
///
/// Besides the literals and the weight, a soft clause can carry an assumption
/// literal toggling it and the relaxation variables introduced for it by a
/// solving algorithm.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SoftClause {
    clause: Clause,
    weight: u64,
    assumption: Lit,
    relaxation_vars: Vec<Lit>,
}

impl SoftClause {
    pub(crate) fn new(weight: u64, lits: &[Lit], relaxation_vars: &[Lit]) -> Self {
        Self {
            clause: Clause::from(lits),
            weight,
            assumption: Lit::UNDEF,
            relaxation_vars: relaxation_vars.to_vec(),
        }
    }

    /// Gets the literals of the clause
    #[inline]
    pub fn lits(&self) -> &[Lit] {
        self.clause.lits()
    }

    /// Gets the clause
    #[inline]
    pub fn clause(&self) -> &Clause {
        &self.clause
    }

    /// Gets the weight
    #[inline]
    pub fn weight(&self) -> u64 {
        self.weight
    }

    /// Gets the assumption literal, [`Lit::UNDEF`] if none is set
    #[inline]
    pub fn assumption_lit(&self) -> Lit {
        self.assumption
    }

    /// Gets the assumption literal, if one is set
    pub fn assumption(&self) -> Option<Lit> {
        if self.assumption.is_undef() {
            None
        } else {
            Some(self.assumption)
        }
    }

    /// Sets the assumption literal. Passing [`Lit::UNDEF`] clears it.
    pub fn set_assumption(&mut self, lit: Lit) {
        self.assumption = lit;
    }

    /// Gets the relaxation variables
    #[inline]
    pub fn relaxation_vars(&self) -> &[Lit] {
        &self.relaxation_vars
    }
}

impl fmt::Display for SoftClause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.weight, self.clause)
    }
}
