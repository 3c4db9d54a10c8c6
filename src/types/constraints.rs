//! # Constraint Types
//!
//! Different types of constraints. The most basic one is [`Clause`], more
//! general linear constraints are represented as [`PbConstraint`] and, once
//! all coefficients are known to be equal, as [`CardConstraint`].

use std::{fmt, ops};

use itertools::Itertools;

use super::{Assignment, Lit, LitIter, TernaryVal, TypeError};

/// Type representing a clause.
/// Wrapper around a std collection to allow for changing the data structure.
#[derive(Eq, PartialEq, PartialOrd, Ord, Hash, Clone, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Clause {
    lits: Vec<Lit>,
}

impl Clause {
    /// Creates a new empty clause
    pub fn new() -> Self {
        Self::default()
    }

    /// Gets the clause as a slice of literals
    #[inline]
    pub fn lits(&self) -> &[Lit] {
        &self.lits
    }

    /// Gets the length of the clause
    #[inline]
    pub fn len(&self) -> usize {
        self.lits.len()
    }

    /// Checks if the clause is empty
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.lits.is_empty()
    }

    /// Checks if the clause is a unit clause
    #[inline]
    pub fn is_unit(&self) -> bool {
        self.lits.len() == 1
    }

    /// Adds a literal to the clause
    pub fn add(&mut self, lit: Lit) {
        self.lits.push(lit)
    }

    /// Gets an iterator over the clause
    #[inline]
    pub fn iter(&self) -> std::slice::Iter<'_, Lit> {
        self.lits.iter()
    }

    /// Gets a mutable iterator over the clause
    #[inline]
    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, Lit> {
        self.lits.iter_mut()
    }

    /// Evaluates a clause under a given assignment
    pub fn evaluate(&self, assignment: &Assignment) -> TernaryVal {
        self.iter()
            .fold(TernaryVal::False, |val, l| match assignment.lit_value(*l) {
                TernaryVal::True => TernaryVal::True,
                TernaryVal::DontCare => {
                    if val == TernaryVal::False {
                        TernaryVal::DontCare
                    } else {
                        val
                    }
                }
                TernaryVal::False => val,
            })
    }

    /// Checks whether the clause is satisfied by an assignment
    pub fn is_sat(&self, assign: &Assignment) -> bool {
        self.lits
            .iter()
            .any(|&lit| assign.lit_value(lit) == TernaryVal::True)
    }
}

impl<const N: usize> From<[Lit; N]> for Clause {
    fn from(value: [Lit; N]) -> Self {
        Self {
            lits: Vec::from(value),
        }
    }
}

impl From<&[Lit]> for Clause {
    fn from(value: &[Lit]) -> Self {
        Self {
            lits: Vec::from(value),
        }
    }
}

impl Extend<Lit> for Clause {
    fn extend<T: IntoIterator<Item = Lit>>(&mut self, iter: T) {
        self.lits.extend(iter)
    }
}

impl ops::Index<usize> for Clause {
    type Output = Lit;

    #[inline]
    fn index(&self, index: usize) -> &Self::Output {
        &self.lits[index]
    }
}

impl<'a> IntoIterator for &'a Clause {
    type Item = &'a Lit;

    type IntoIter = std::slice::Iter<'a, Lit>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.lits.iter()
    }
}

impl IntoIterator for Clause {
    type Item = Lit;

    type IntoIter = std::vec::IntoIter<Lit>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.lits.into_iter()
    }
}

impl FromIterator<Lit> for Clause {
    fn from_iter<T: IntoIterator<Item = Lit>>(iter: T) -> Self {
        Self {
            lits: Vec::from_iter(iter),
        }
    }
}

/// Clauses can be printed with the [`Display`](std::fmt::Display) trait
impl fmt::Display for Clause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({})", self.iter().join("|"))
    }
}

impl fmt::Debug for Clause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

/// More easily creates clauses. Mainly used in tests.
///
/// # Examples
///
/// ```
/// use maxsat_formula::{clause, lit};
///
/// let cl = clause![lit![0], !lit![1]];
/// assert_eq!(cl.len(), 2);
/// ```
#[macro_export]
macro_rules! clause {
    ( $($l:expr),* ) => {
        {
            let mut tmp_clause = $crate::types::Clause::new();
            $(
                tmp_clause.add($l);
            )*
            tmp_clause
        }
    };
}

/// The comparison operator of a [`PbConstraint`]
#[derive(Hash, Eq, PartialEq, Clone, Copy, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PbSign {
    /// `weighted sum of lits <= rhs`
    LessEq,
    /// `weighted sum of lits >= rhs`
    GreaterEq,
}

impl PbSign {
    /// Gets the opposite comparison operator
    #[inline]
    pub fn flip(self) -> Self {
        match self {
            PbSign::LessEq => PbSign::GreaterEq,
            PbSign::GreaterEq => PbSign::LessEq,
        }
    }
}

impl fmt::Display for PbSign {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PbSign::LessEq => write!(f, "<="),
            PbSign::GreaterEq => write!(f, ">="),
        }
    }
}

/// The shape of a generalized linear constraint, see [`PbConstraint::classify`]
#[derive(Eq, PartialEq, Clone, Copy, Debug)]
pub enum ConstraintKind {
    /// Logically a single disjunction of literals
    Clause,
    /// All coefficients are equal
    Cardinality,
    /// A general pseudo-boolean constraint
    Pb,
}

/// Type representing a pseudo-boolean constraint: literals with matching
/// coefficients, a right-hand side and a comparison operator.
///
/// The same type is used to hold a linear objective function, in which case
/// only the literals and coefficients are relevant.
#[derive(Hash, Eq, PartialEq, Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PbConstraint {
    lits: Vec<Lit>,
    coeffs: Vec<u64>,
    rhs: i64,
    sign: PbSign,
}

impl PbConstraint {
    /// Constructs a new pseudo-boolean constraint from literals and their
    /// coefficients. Panics if the two sequences differ in length.
    pub fn new(lits: Vec<Lit>, coeffs: Vec<u64>, rhs: i64, sign: PbSign) -> Self {
        match Self::try_new(lits, coeffs, rhs, sign) {
            Ok(constr) => constr,
            Err(err) => panic!("invalid pseudo-boolean constraint: {}", err),
        }
    }

    /// Constructs a new pseudo-boolean constraint from literals and their
    /// coefficients. Returns `Err(TypeError::LengthMismatch(_, _))` if the two
    /// sequences differ in length.
    pub fn try_new(
        lits: Vec<Lit>,
        coeffs: Vec<u64>,
        rhs: i64,
        sign: PbSign,
    ) -> Result<Self, TypeError> {
        if lits.len() != coeffs.len() {
            return Err(TypeError::LengthMismatch(lits.len(), coeffs.len()));
        }
        Ok(Self {
            lits,
            coeffs,
            rhs,
            sign,
        })
    }

    /// Constructs a new upper bound constraint (`weighted sum of lits <= rhs`)
    pub fn new_ub<I: IntoIterator<Item = (Lit, u64)>>(lits: I, rhs: i64) -> Self {
        let (lits, coeffs) = lits.into_iter().unzip();
        Self {
            lits,
            coeffs,
            rhs,
            sign: PbSign::LessEq,
        }
    }

    /// Constructs a new lower bound constraint (`weighted sum of lits >= rhs`)
    pub fn new_lb<I: IntoIterator<Item = (Lit, u64)>>(lits: I, rhs: i64) -> Self {
        let (lits, coeffs) = lits.into_iter().unzip();
        Self {
            lits,
            coeffs,
            rhs,
            sign: PbSign::GreaterEq,
        }
    }

    /// Constructs a linear objective (`weighted sum of lits`) to be minimized.
    /// The right-hand side and operator of an objective are not used.
    pub fn new_objective<I: IntoIterator<Item = (Lit, u64)>>(terms: I) -> Self {
        Self::new_ub(terms, 0)
    }

    /// Gets the literals of the constraint
    #[inline]
    pub fn lits(&self) -> &[Lit] {
        &self.lits
    }

    /// Gets the coefficients of the constraint, in the same order as the literals
    #[inline]
    pub fn coeffs(&self) -> &[u64] {
        &self.coeffs
    }

    /// Gets the right-hand side
    #[inline]
    pub fn rhs(&self) -> i64 {
        self.rhs
    }

    /// Gets the comparison operator
    #[inline]
    pub fn sign(&self) -> PbSign {
        self.sign
    }

    /// Gets the number of terms
    #[inline]
    pub fn len(&self) -> usize {
        self.lits.len()
    }

    /// Checks if the constraint has no terms
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.lits.is_empty()
    }

    /// Gets an iterator over `(coefficient, literal)` terms
    pub fn iter(&self) -> impl Iterator<Item = (u64, Lit)> + '_ {
        self.coeffs.iter().copied().zip(self.lits.iter().copied())
    }

    /// Gets the coefficient shared by all terms, if there is one. Returns
    /// [`None`] for empty constraints and constraints with differing
    /// coefficients.
    pub fn unit_coeff(&self) -> Option<u64> {
        self.coeffs.iter().copied().all_equal_value().ok()
    }

    /// Checks if the constraint is a cardinality constraint, i.e., all
    /// coefficients are equal and positive
    pub fn is_card(&self) -> bool {
        matches!(self.unit_coeff(), Some(c) if c > 0)
    }

    /// Checks if the constraint is logically a single clause. This is the case
    /// if all coefficients are 1 and the right-hand side read as `>=` is 1.
    pub fn is_clause(&self) -> bool {
        if self.unit_coeff() != Some(1) {
            return false;
        }
        match self.sign {
            PbSign::GreaterEq => self.rhs == 1,
            // sum of lits <= n-1 <=> sum of negated lits >= 1
            PbSign::LessEq => i128::from(self.rhs) + 1 == self.lits.len() as i128,
        }
    }

    /// Classifies the constraint as clause, cardinality or general
    /// pseudo-boolean constraint. Clauses take precedence over cardinality
    /// constraints.
    pub fn classify(&self) -> ConstraintKind {
        if self.is_clause() {
            ConstraintKind::Clause
        } else if self.is_card() {
            ConstraintKind::Cardinality
        } else {
            ConstraintKind::Pb
        }
    }

    /// Returns a copy of the constraint in `<=` orientation. A `>=` constraint
    /// gets all literals negated and the operator flipped; coefficients and
    /// the right-hand side are left as they are. A `<=` constraint is copied
    /// unchanged.
    pub fn normalize_sign(&self) -> Self {
        match self.sign {
            PbSign::LessEq => self.clone(),
            PbSign::GreaterEq => Self {
                lits: self.lits.iter().map(|&l| !l).collect(),
                coeffs: self.coeffs.clone(),
                rhs: self.rhs,
                sign: self.sign.flip(),
            },
        }
    }

    /// Converts the constraint into a clause, if it is one
    pub fn as_clause(&self) -> Option<Clause> {
        self.is_clause().then(|| self.clause_unchecked())
    }

    /// Converts the constraint into a cardinality constraint, if all
    /// coefficients are equal and positive. The sign is normalized first and
    /// the bound is divided by the common coefficient (rounding down).
    pub fn as_card(&self) -> Option<CardConstraint> {
        let coeff = self.unit_coeff().filter(|&c| c > 0)?;
        Some(self.card_unchecked(coeff))
    }

    /// Converts the constraint into the form it is stored in: a clause, a
    /// cardinality constraint or a sign normalized pseudo-boolean constraint.
    /// The kind of the result matches [`PbConstraint::classify`].
    pub fn normalize(&self) -> NormalizedConstraint {
        if self.is_clause() {
            return NormalizedConstraint::Clause(self.clause_unchecked());
        }
        match self.unit_coeff().filter(|&c| c > 0) {
            Some(coeff) => NormalizedConstraint::Card(self.card_unchecked(coeff)),
            None => NormalizedConstraint::Pb(self.normalize_sign()),
        }
    }

    fn clause_unchecked(&self) -> Clause {
        match self.sign {
            PbSign::GreaterEq => Clause::from(self.lits.as_slice()),
            PbSign::LessEq => self.lits.iter().map(|&l| !l).collect(),
        }
    }

    fn card_unchecked(&self, coeff: u64) -> CardConstraint {
        let norm = self.normalize_sign();
        let rhs = match i64::try_from(coeff) {
            Ok(coeff) => norm.rhs.div_euclid(coeff),
            // |rhs| <= coeff
            Err(_) if norm.rhs >= 0 => 0,
            Err(_) => -1,
        };
        CardConstraint::new(norm.lits, rhs)
    }

    /// Computes the weighted sum of literals set to true by an assignment
    pub fn weighted_sum(&self, assign: &Assignment) -> u64 {
        self.iter()
            .filter(|(_, l)| assign.lit_value(*l) == TernaryVal::True)
            .fold(0, |sum, (c, _)| sum.saturating_add(c))
    }

    /// Checks whether the constraint is satisfied by an assignment
    pub fn is_sat(&self, assign: &Assignment) -> bool {
        let sum = i128::from(self.weighted_sum(assign));
        let rhs = i128::from(self.rhs);
        match self.sign {
            PbSign::LessEq => sum <= rhs,
            PbSign::GreaterEq => sum >= rhs,
        }
    }
}

impl fmt::Display for PbConstraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let terms = self.iter().map(|(c, l)| format!("{} {}", c, l)).join(" + ");
        write!(f, "{} {} {}", terms, self.sign, self.rhs)
    }
}

/// A constraint converted into the form it is stored in, see
/// [`PbConstraint::normalize`]
#[derive(Eq, PartialEq, Clone, Debug)]
pub enum NormalizedConstraint {
    /// Logically a single disjunction of literals
    Clause(Clause),
    /// Cardinality constraint in `<=` orientation
    Card(CardConstraint),
    /// Pseudo-boolean constraint in `<=` orientation
    Pb(PbConstraint),
}

impl NormalizedConstraint {
    /// Gets the kind of the constraint
    pub fn kind(&self) -> ConstraintKind {
        match self {
            NormalizedConstraint::Clause(_) => ConstraintKind::Clause,
            NormalizedConstraint::Card(_) => ConstraintKind::Cardinality,
            NormalizedConstraint::Pb(_) => ConstraintKind::Pb,
        }
    }
}

/// Type representing a cardinality constraint in canonical `<=` form
/// (`sum of lits <= rhs`)
#[derive(Hash, Eq, PartialEq, Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CardConstraint {
    lits: Vec<Lit>,
    rhs: i64,
}

impl CardConstraint {
    /// Constructs a new cardinality constraint (`sum of lits <= rhs`)
    pub fn new<LI: LitIter>(lits: LI, rhs: i64) -> Self {
        CardConstraint {
            lits: lits.into_iter().collect(),
            rhs,
        }
    }

    /// Gets the literals of the constraint
    #[inline]
    pub fn lits(&self) -> &[Lit] {
        &self.lits
    }

    /// Gets the right-hand side
    #[inline]
    pub fn rhs(&self) -> i64 {
        self.rhs
    }

    /// Gets the number of literals
    #[inline]
    pub fn len(&self) -> usize {
        self.lits.len()
    }

    /// Checks if the constraint has no literals
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.lits.is_empty()
    }

    /// Checks if the constraint is always satisfied
    pub fn is_tautology(&self) -> bool {
        self.rhs >= self.lits.len() as i64
    }

    /// Checks if the constraint is unsatisfiable
    pub fn is_unsat(&self) -> bool {
        self.rhs < 0
    }

    /// Decomposes the constraint to its literals and bound
    pub fn decompose(self) -> (Vec<Lit>, i64) {
        (self.lits, self.rhs)
    }

    /// Checks whether the constraint is satisfied by an assignment
    pub fn is_sat(&self, assign: &Assignment) -> bool {
        let count = self
            .lits
            .iter()
            .filter(|&&l| assign.lit_value(l) == TernaryVal::True)
            .count();
        (count as i64) <= self.rhs
    }
}

impl fmt::Display for CardConstraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} <= {}", self.lits.iter().join(" + "), self.rhs)
    }
}
