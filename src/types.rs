//! # Common Types for MaxSAT Formulas
//!
//! Common types used throughout the library to guarantee type safety.

use std::{fmt, ops};

use thiserror::Error;

pub mod constraints;
pub use constraints::{
    CardConstraint, Clause, ConstraintKind, NormalizedConstraint, PbConstraint, PbSign,
};

/// The hash map to use throughout the library
#[cfg(feature = "fxhash")]
pub type RsHashMap<K, V> = rustc_hash::FxHashMap<K, V>;
#[cfg(not(feature = "fxhash"))]
pub type RsHashMap<K, V> = std::collections::HashMap<K, V>;

/// Type representing boolean variables in a MaxSAT problem. Variable indexing
/// starts from 0 and the maximum index is `(u32::MAX - 3) / 2`. This is
/// because literals are represented as a single `u32` as well and the two
/// highest literal representations are reserved for [`Lit::UNDEF`] and
/// [`Lit::ERROR`]. The memory representation of variables is `u32`.
#[derive(Hash, Eq, PartialEq, PartialOrd, Clone, Copy, Ord, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(transparent)]
pub struct Var {
    idx: u32,
}

impl Var {
    /// The maximum index that can be represented.
    pub const MAX_IDX: u32 = (u32::MAX - 3) / 2;

    /// Creates a new variables with a given index.
    /// Indices start from 0.
    /// Panics if `idx > Var::MAX_IDX`.
    pub fn new(idx: u32) -> Var {
        if idx > Var::MAX_IDX {
            panic!("variable index too high")
        }
        Var { idx }
    }

    /// Creates a new variables with a given index.
    /// Indices start from 0.
    /// Returns `Err(TypeError::IdxTooHigh(idx, Var::MAX_IDX)` if
    /// `idx > Var::MAX_IDX`.
    pub fn new_with_error(idx: u32) -> Result<Var, TypeError> {
        if idx > Var::MAX_IDX {
            return Err(TypeError::IdxTooHigh(idx, Var::MAX_IDX));
        }
        Ok(Var { idx })
    }

    /// Creates a literal over this variable with the given polarity.
    #[inline]
    pub fn lit(self, negated: bool) -> Lit {
        Lit::new_unchecked(self.idx, negated)
    }

    /// Creates a literal that is not negated.
    ///
    /// # Examples
    ///
    /// ```
    /// use maxsat_formula::types::{Var, Lit};
    ///
    /// let var = Var::new(5);
    /// let lit = Lit::positive(5);
    ///
    /// assert_eq!(lit, var.pos_lit());
    /// ```
    #[inline]
    pub fn pos_lit(self) -> Lit {
        Lit::new_unchecked(self.idx, false)
    }

    /// Creates a negated literal.
    ///
    /// # Examples
    ///
    /// ```
    /// use maxsat_formula::types::{Var, Lit};
    ///
    /// let var = Var::new(5);
    /// let lit = Lit::negative(5);
    ///
    /// assert_eq!(lit, var.neg_lit());
    /// ```
    #[inline]
    pub fn neg_lit(self) -> Lit {
        Lit::new_unchecked(self.idx, true)
    }

    /// Returns the index of the variable. This is a `usize` to enable easier
    /// indexing of data structures like vectors, even though the internal
    /// representation of a variable is `u32`. For the 32 bit index use
    /// [`Var::idx32`].
    #[inline]
    pub fn idx(&self) -> usize {
        self.idx as usize
    }

    /// Returns the 32 bit index of the variable.
    #[inline]
    pub fn idx32(&self) -> u32 {
        self.idx
    }
}

/// Incrementing variables
impl ops::Add<u32> for Var {
    type Output = Var;

    fn add(self, rhs: u32) -> Self::Output {
        Var {
            idx: self.idx + rhs,
        }
    }
}

impl ops::AddAssign<u32> for Var {
    fn add_assign(&mut self, rhs: u32) {
        self.idx += rhs
    }
}

/// Variables can be printed with the [`Display`](std::fmt::Display) trait
impl fmt::Display for Var {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "x{}", self.idx)
    }
}

/// More easily creates variables. Mainly used in tests.
///
/// # Examples
///
/// ```
/// use maxsat_formula::{var, types::Var};
///
/// assert_eq!(var![42], Var::new(42));
/// ```
#[macro_export]
macro_rules! var {
    ($v:expr) => {
        $crate::types::Var::new($v)
    };
}

/// Type representing literals, possibly negated boolean variables.
///
/// Besides the literals over real variables there are two sentinel values:
/// [`Lit::UNDEF`] for "no literal" and [`Lit::ERROR`] for an invalid literal.
/// Both compare unequal to every real literal and negating them is a no-op.
#[derive(Hash, Eq, PartialEq, PartialOrd, Ord, Clone, Copy, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(transparent)]
pub struct Lit {
    /// Literal representation is `idx << 1` with the last bit representing
    /// whether the literal is negated or not. This way the literal can directly
    /// be used to index data structures with the two literals of a variable
    /// being close together.
    lidx: u32,
}

impl Lit {
    /// The "no literal" sentinel
    pub const UNDEF: Lit = Lit { lidx: u32::MAX };
    /// The "invalid literal" sentinel
    pub const ERROR: Lit = Lit { lidx: u32::MAX - 1 };

    /// Represents a literal in memory
    #[inline]
    fn represent(idx: u32, negated: bool) -> u32 {
        (idx << 1) + (negated as u32)
    }

    /// Creates a new (negated or not) literal with a given index.
    /// Panics if `idx > Var::MAX_IDX`.
    pub fn new(idx: u32, negated: bool) -> Lit {
        if idx > Var::MAX_IDX {
            panic!("variable index too high")
        }
        Lit {
            lidx: Lit::represent(idx, negated),
        }
    }

    /// Creates a new (negated or not) literal with a given index.
    /// Returns `Err(TypeError::IdxTooHigh(idx, Var::MAX_IDX)` if
    /// `idx > Var::MAX_IDX`.
    pub fn new_with_error(idx: u32, negated: bool) -> Result<Lit, TypeError> {
        if idx > Var::MAX_IDX {
            return Err(TypeError::IdxTooHigh(idx, Var::MAX_IDX));
        }
        Ok(Lit {
            lidx: Lit::represent(idx, negated),
        })
    }

    /// Creates a new (negated or not) literal with a given index.
    /// Does not perform any check on the index, therefore might produce an
    /// inconsistent literal or even one of the sentinels.
    /// Only use this if you are sure that `idx <= Var::MAX_IDX`.
    #[inline]
    pub fn new_unchecked(idx: u32, negated: bool) -> Lit {
        Lit {
            lidx: Lit::represent(idx, negated),
        }
    }

    /// Creates a new positive literal with a given index.
    /// Panics if `idx > Var::MAX_IDX`.
    #[inline]
    pub fn positive(idx: u32) -> Lit {
        Lit::new(idx, false)
    }

    /// Creates a new negated literal with a given index.
    /// Panics if `idx > Var::MAX_IDX`.
    #[inline]
    pub fn negative(idx: u32) -> Lit {
        Lit::new(idx, true)
    }

    /// Gets the variable index of the literal
    #[inline]
    pub fn vidx(&self) -> usize {
        (self.lidx >> 1) as usize
    }

    /// Gets the 32bit variable index of the literal
    #[inline]
    pub fn vidx32(&self) -> u32 {
        self.lidx >> 1
    }

    /// Gets the variable that the literal corresponds to.
    ///
    /// # Examples
    ///
    /// ```
    /// use maxsat_formula::types::{Var, Lit};
    ///
    /// let var = Var::new(5);
    /// let lit = Lit::negative(5);
    ///
    /// assert_eq!(var, lit.var());
    /// ```
    #[inline]
    pub fn var(&self) -> Var {
        debug_assert!(!self.is_sentinel());
        Var {
            idx: self.vidx32(),
        }
    }

    /// True if the literal is positive.
    #[inline]
    pub fn is_pos(&self) -> bool {
        (self.lidx & 1u32) == 0
    }

    /// True if the literal is negated.
    #[inline]
    pub fn is_neg(&self) -> bool {
        (self.lidx & 1u32) == 1
    }

    /// True if this is the [`Lit::UNDEF`] sentinel
    #[inline]
    pub fn is_undef(&self) -> bool {
        *self == Lit::UNDEF
    }

    /// True if this is the [`Lit::ERROR`] sentinel
    #[inline]
    pub fn is_error(&self) -> bool {
        *self == Lit::ERROR
    }

    /// True if this is one of the two sentinels
    #[inline]
    pub fn is_sentinel(&self) -> bool {
        self.lidx >= Lit::ERROR.lidx
    }

    /// Gets a wrapper printing the literal as a DIMACS token: the signed
    /// 1-based variable number for real literals, `undef` and `error` for the
    /// sentinels.
    ///
    /// # Examples
    ///
    /// ```
    /// use maxsat_formula::{lit, types::Lit};
    ///
    /// assert_eq!(format!("{}", (!lit![2]).dimacs()), "-3");
    /// assert_eq!(format!("{}", Lit::UNDEF.dimacs()), "undef");
    /// ```
    #[inline]
    pub fn dimacs(self) -> DimacsLit {
        DimacsLit(self)
    }
}

/// Trait implementation allowing for negating literals with the `!` operator.
impl ops::Not for Lit {
    type Output = Lit;

    #[inline]
    fn not(self) -> Lit {
        if self.is_sentinel() {
            return self;
        }
        Lit {
            lidx: self.lidx ^ 1u32,
        }
    }
}

/// Trait implementation allowing for negating literals with the unary `-` operator.
impl ops::Neg for Lit {
    type Output = Lit;

    #[inline]
    fn neg(self) -> Lit {
        !self
    }
}

/// Literals can be printed with the [`Display`](std::fmt::Display) trait
impl fmt::Display for Lit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_undef() {
            return write!(f, "{}", DimacsLit::UNDEF_TOKEN);
        }
        if self.is_error() {
            return write!(f, "{}", DimacsLit::ERROR_TOKEN);
        }
        match self.is_neg() {
            true => write!(f, "~x{}", self.vidx()),
            false => write!(f, "x{}", self.vidx()),
        }
    }
}

/// A literal printed in DIMACS notation, see [`Lit::dimacs`]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DimacsLit(Lit);

impl DimacsLit {
    /// Token printed for [`Lit::UNDEF`]
    pub const UNDEF_TOKEN: &'static str = "undef";
    /// Token printed for [`Lit::ERROR`]
    pub const ERROR_TOKEN: &'static str = "error";
}

impl fmt::Display for DimacsLit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let lit = self.0;
        if lit.is_undef() {
            return write!(f, "{}", DimacsLit::UNDEF_TOKEN);
        }
        if lit.is_error() {
            return write!(f, "{}", DimacsLit::ERROR_TOKEN);
        }
        if lit.is_neg() {
            write!(f, "-{}", lit.vidx() + 1)
        } else {
            write!(f, "{}", lit.vidx() + 1)
        }
    }
}

/// More easily creates literals. Mainly used in tests.
///
/// # Examples
///
/// ```
/// use maxsat_formula::{lit, types::Lit};
///
/// assert_eq!(lit![42], Lit::positive(42));
/// assert_eq!(!lit![42], Lit::negative(42));
/// ```
#[macro_export]
macro_rules! lit {
    ($l:expr) => {
        $crate::types::Lit::positive($l)
    };
}

/// Ternary value assigned to a literal or variable, including possible "don't care"
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum TernaryVal {
    /// Positive assignment.
    True,
    /// Negative assignment.
    False,
    /// Formula is satisfied, no matter the assignment.
    DontCare,
}

/// Ternary values can be printed with the [`Display`](std::fmt::Display) trait
impl fmt::Display for TernaryVal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TernaryVal::True => write!(f, "1"),
            TernaryVal::False => write!(f, "0"),
            TernaryVal::DontCare => write!(f, "_"),
        }
    }
}

impl From<bool> for TernaryVal {
    fn from(value: bool) -> Self {
        if value {
            return TernaryVal::True;
        }
        TernaryVal::False
    }
}

/// Type representing an assignment of variables.
#[derive(Clone, PartialEq, Eq, Default, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(transparent)]
pub struct Assignment {
    assignment: Vec<TernaryVal>,
}

impl Assignment {
    /// Get the value that the solution assigns to a variable.
    /// If the variable is not included in the solution, will return `TernaryVal::DontCare`.
    pub fn var_value(&self, var: Var) -> TernaryVal {
        if var.idx() >= self.assignment.len() {
            TernaryVal::DontCare
        } else {
            self.assignment[var.idx()]
        }
    }

    /// Same as [`Assignment::var_value`], but for literals. Sentinels are
    /// always `TernaryVal::DontCare`.
    pub fn lit_value(&self, lit: Lit) -> TernaryVal {
        if lit.is_sentinel() {
            return TernaryVal::DontCare;
        }
        if lit.is_neg() {
            match self.var_value(lit.var()) {
                TernaryVal::DontCare => TernaryVal::DontCare,
                TernaryVal::True => TernaryVal::False,
                TernaryVal::False => TernaryVal::True,
            }
        } else {
            self.var_value(lit.var())
        }
    }

    /// Assigns a variable in the assignment
    pub fn assign_var(&mut self, var: Var, val: TernaryVal) {
        if self.assignment.len() < var.idx() + 1 {
            self.assignment.resize(var.idx() + 1, TernaryVal::DontCare);
        }
        self.assignment[var.idx()] = val;
    }

    /// Assigns a literal to true
    pub fn assign_lit(&mut self, lit: Lit) {
        let val = if lit.is_pos() {
            TernaryVal::True
        } else {
            TernaryVal::False
        };
        self.assign_var(lit.var(), val)
    }
}

impl fmt::Display for Assignment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.assignment
            .iter()
            .try_for_each(|tv| write!(f, "{}", tv))
    }
}

impl FromIterator<Lit> for Assignment {
    fn from_iter<T: IntoIterator<Item = Lit>>(iter: T) -> Self {
        let mut assignment = Assignment::default();
        iter.into_iter().for_each(|l| assignment.assign_lit(l));
        assignment
    }
}

impl From<Vec<TernaryVal>> for Assignment {
    fn from(assignment: Vec<TernaryVal>) -> Self {
        Self { assignment }
    }
}

/// Errors related to types
#[derive(Error, Debug, PartialEq, Eq)]
pub enum TypeError {
    /// The requested index is too high.
    /// Contains the requested and the maximum index.
    #[error("index {0} is too high (maximum {1})")]
    IdxTooHigh(u32, u32),
    /// Literals and coefficients of a linear constraint differ in length.
    /// Contains the number of literals and the number of coefficients.
    #[error("{0} literals but {1} coefficients")]
    LengthMismatch(usize, usize),
}

/// An iterator over literals
pub trait LitIter: IntoIterator<Item = Lit> {}
impl<I: IntoIterator<Item = Lit>> LitIter for I {}

#[cfg(test)]
mod tests {
    use std::mem::size_of;

    use super::{Assignment, Lit, TernaryVal, TypeError, Var};

    #[test]
    fn var_index() {
        let idx = 5;
        let var = Var::new(idx);
        assert_eq!(var.idx(), idx as usize);
        assert_eq!(var.idx32(), idx);
    }

    #[test]
    fn var_pos_neg_lit() {
        let var = Var::new(5);
        assert_eq!(var.pos_lit(), Lit::positive(5));
        assert_eq!(var.neg_lit(), Lit::negative(5));
        assert_eq!(var.lit(true), Lit::negative(5));
    }

    #[test]
    fn var_too_high() {
        assert_eq!(
            Var::new_with_error(Var::MAX_IDX + 1),
            Err(TypeError::IdxTooHigh(Var::MAX_IDX + 1, Var::MAX_IDX))
        );
        assert!(Var::new_with_error(Var::MAX_IDX).is_ok());
    }

    #[test]
    fn lit_representation() {
        let lidx = Lit::represent(5, true);
        assert_eq!(lidx, 0b1011);
    }

    #[test]
    fn lit_negation() {
        let lit1 = Lit::positive(0);
        let lit2 = !lit1;
        assert!(lit2.is_neg());
        assert_eq!(lit1.var(), lit2.var());
        assert_eq!(-lit2, lit1);
    }

    #[test]
    fn sentinels_are_distinct() {
        assert_ne!(Lit::UNDEF, Lit::ERROR);
        let highest = Lit::new(Var::MAX_IDX, true);
        assert!(!highest.is_sentinel());
        assert_ne!(highest, Lit::UNDEF);
        assert_ne!(highest, Lit::ERROR);
        assert!(Lit::UNDEF.is_undef());
        assert!(Lit::ERROR.is_error());
    }

    #[test]
    fn sentinel_negation_is_noop() {
        assert_eq!(!Lit::UNDEF, Lit::UNDEF);
        assert_eq!(!Lit::ERROR, Lit::ERROR);
    }

    #[test]
    fn dimacs_tokens() {
        assert_eq!(format!("{}", Lit::positive(0).dimacs()), "1");
        assert_eq!(format!("{}", Lit::negative(4).dimacs()), "-5");
        assert_eq!(format!("{}", Lit::UNDEF.dimacs()), "undef");
        assert_eq!(format!("{}", Lit::ERROR.dimacs()), "error");
        assert_eq!(format!("{}", Lit::negative(4)), "~x4");
    }

    #[test]
    fn sol_lit_val() {
        let sol = Assignment::from(vec![
            TernaryVal::True,
            TernaryVal::False,
            TernaryVal::DontCare,
        ]);
        assert_eq!(sol.lit_value(Lit::negative(0)), TernaryVal::False);
        assert_eq!(sol.lit_value(Lit::positive(0)), TernaryVal::True);
        assert_eq!(sol.lit_value(Lit::negative(1)), TernaryVal::True);
        assert_eq!(sol.lit_value(Lit::positive(2)), TernaryVal::DontCare);
        assert_eq!(sol.lit_value(Lit::UNDEF), TernaryVal::DontCare);
    }

    #[test]
    fn sol_from_lits() {
        let true_sol = Assignment::from(vec![
            TernaryVal::True,
            TernaryVal::DontCare,
            TernaryVal::False,
        ]);
        let sol = Assignment::from_iter(vec![lit![0], !lit![2]]);
        assert_eq!(true_sol, sol);
    }

    #[test]
    fn lit_mem_size() {
        assert_eq!(size_of::<Var>(), size_of::<u32>());
        assert_eq!(size_of::<Lit>(), size_of::<u32>());
    }
}
