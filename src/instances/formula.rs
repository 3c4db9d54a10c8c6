//! # Weighted Partial MaxSAT Formula
//!
//! The aggregate every loader writes into and every solving algorithm reads
//! from.

use std::{fmt, io, path::Path};

use thiserror::Error;

use crate::types::{
    Assignment, CardConstraint, ConstraintKind, Lit, NormalizedConstraint, PbConstraint,
    TernaryVal, Var,
};

use super::{
    fio, BasicVarManager, HardClause, ManageVars, SoftClause, VarNameRegistry, WeightTracker,
};

/// Whether soft clauses carry different weights
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ProblemType {
    /// All soft clauses have weight 1
    #[default]
    Unweighted,
    /// Soft clauses have arbitrary weights
    Weighted,
}

impl fmt::Display for ProblemType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProblemType::Unweighted => write!(f, "unweighted"),
            ProblemType::Weighted => write!(f, "weighted"),
        }
    }
}

/// Whether the formula is in pure clause form
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FormulaFormat {
    /// Only hard and soft clauses
    #[default]
    Clausal,
    /// Still holds cardinality or pseudo-boolean constraints
    Pb,
}

/// Violated preconditions of formula operations
#[derive(Error, Debug, PartialEq, Eq, Clone, Copy)]
pub enum FormulaError {
    /// Only formulas in pure clause form can be copied
    #[error("only formulas in clause form can be copied")]
    NotClausal,
    /// No objective function has been stored
    #[error("no objective function to convert")]
    NoObjective,
    /// An objective term does not have a strictly positive coefficient.
    /// Contains the index of the term.
    #[error("objective term {0} does not have a positive coefficient")]
    NonPositiveCoefficient(usize),
}

/// Type representing a weighted partial MaxSAT formula.
///
/// The formula owns all of its clauses and constraints. Insertion operations
/// copy the literals they are given. Hard and soft clauses are append-only and
/// are returned in insertion order by the indexed accessors.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MaxSatFormula {
    hard_clauses: Vec<HardClause>,
    soft_clauses: Vec<SoftClause>,
    card_constraints: Vec<CardConstraint>,
    pb_constraints: Vec<PbConstraint>,
    objective: Option<PbConstraint>,
    names: VarNameRegistry,
    var_manager: BasicVarManager,
    n_initial_vars: u32,
    weights: WeightTracker,
    problem_type: ProblemType,
    format: FormulaFormat,
}

impl MaxSatFormula {
    /// Creates a new empty formula
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocates the next sequential variable
    pub fn new_var(&mut self) -> Var {
        self.var_manager.new_var()
    }

    /// Raises the number of allocated variables to `n_vars`. Never decreases
    /// the allocation. Panics if `n_vars > Var::MAX_IDX + 1`.
    pub fn new_var_up_to(&mut self, n_vars: u32) {
        if let Some(max_idx) = n_vars.checked_sub(1) {
            self.var_manager.mark_used(Var::new(max_idx));
        }
    }

    /// Allocates a fresh variable and returns a literal over it
    pub fn new_literal(&mut self, negated: bool) -> Lit {
        self.new_var().lit(negated)
    }

    /// Gets the number of allocated variables
    #[inline]
    pub fn n_vars(&self) -> u32 {
        self.var_manager.n_used()
    }

    /// Gets the variable count declared by the input problem
    #[inline]
    pub fn n_initial_vars(&self) -> u32 {
        self.n_initial_vars
    }

    /// Sets the variable count declared by the input problem
    pub fn set_initial_vars(&mut self, n_vars: u32) {
        self.n_initial_vars = n_vars;
    }

    /// Gets a reference to the variable manager
    pub fn var_manager(&self) -> &BasicVarManager {
        &self.var_manager
    }

    /// Adds a hard clause. The literals are copied and not checked against
    /// the allocated variables.
    pub fn add_hard_clause(&mut self, lits: &[Lit]) {
        log::trace!("add hard clause {:?}", lits);
        self.hard_clauses.push(HardClause::new(lits));
    }

    /// Adds a soft clause with a weight. This does not update the weight
    /// totals; call [`MaxSatFormula::update_sum_weights`] and
    /// [`MaxSatFormula::set_maximum_weight`] for that.
    pub fn add_soft_clause(&mut self, weight: u64, lits: &[Lit]) {
        self.add_soft_clause_relaxed(weight, lits, &[])
    }

    /// Adds a soft clause with a weight and relaxation variables. Like
    /// [`MaxSatFormula::add_soft_clause`], the weight totals are not updated.
    pub fn add_soft_clause_relaxed(&mut self, weight: u64, lits: &[Lit], relaxation_vars: &[Lit]) {
        log::trace!("add soft clause {:?} with weight {}", lits, weight);
        self.soft_clauses
            .push(SoftClause::new(weight, lits, relaxation_vars));
    }

    /// Gets the number of hard clauses
    #[inline]
    pub fn n_hard(&self) -> usize {
        self.hard_clauses.len()
    }

    /// Gets the number of soft clauses
    #[inline]
    pub fn n_soft(&self) -> usize {
        self.soft_clauses.len()
    }

    /// Gets the number of stored cardinality constraints
    #[inline]
    pub fn n_card(&self) -> usize {
        self.card_constraints.len()
    }

    /// Gets the number of stored pseudo-boolean constraints
    #[inline]
    pub fn n_pb(&self) -> usize {
        self.pb_constraints.len()
    }

    /// Gets the hard clause at index `idx`. Panics if `idx >= self.n_hard()`.
    pub fn hard_clause(&self, idx: usize) -> &HardClause {
        assert!(
            idx < self.n_hard(),
            "hard clause index {} out of range ({} hard clauses)",
            idx,
            self.n_hard()
        );
        &self.hard_clauses[idx]
    }

    /// Gets the soft clause at index `idx`. Panics if `idx >= self.n_soft()`.
    pub fn soft_clause(&self, idx: usize) -> &SoftClause {
        assert!(
            idx < self.n_soft(),
            "soft clause index {} out of range ({} soft clauses)",
            idx,
            self.n_soft()
        );
        &self.soft_clauses[idx]
    }

    /// Gets mutable access to the soft clause at index `idx`, e.g., for setting
    /// its assumption literal. Panics if `idx >= self.n_soft()`.
    pub fn soft_clause_mut(&mut self, idx: usize) -> &mut SoftClause {
        assert!(
            idx < self.n_soft(),
            "soft clause index {} out of range ({} soft clauses)",
            idx,
            self.n_soft()
        );
        &mut self.soft_clauses[idx]
    }

    /// Gets the cardinality constraint at index `idx`. Panics if
    /// `idx >= self.n_card()`.
    pub fn card_constraint(&self, idx: usize) -> &CardConstraint {
        assert!(
            idx < self.n_card(),
            "cardinality constraint index {} out of range ({} constraints)",
            idx,
            self.n_card()
        );
        &self.card_constraints[idx]
    }

    /// Gets the pseudo-boolean constraint at index `idx`. Panics if
    /// `idx >= self.n_pb()`.
    pub fn pb_constraint(&self, idx: usize) -> &PbConstraint {
        assert!(
            idx < self.n_pb(),
            "pseudo-boolean constraint index {} out of range ({} constraints)",
            idx,
            self.n_pb()
        );
        &self.pb_constraints[idx]
    }

    /// Gets an iterator over the hard clauses in insertion order
    pub fn hard_clauses(&self) -> std::slice::Iter<'_, HardClause> {
        self.hard_clauses.iter()
    }

    /// Gets an iterator over the soft clauses in insertion order
    pub fn soft_clauses(&self) -> std::slice::Iter<'_, SoftClause> {
        self.soft_clauses.iter()
    }

    /// Gets an iterator over the cardinality constraints
    pub fn card_constraints(&self) -> std::slice::Iter<'_, CardConstraint> {
        self.card_constraints.iter()
    }

    /// Gets an iterator over the pseudo-boolean constraints
    pub fn pb_constraints(&self) -> std::slice::Iter<'_, PbConstraint> {
        self.pb_constraints.iter()
    }

    /// Adds a weight to the tracked soft weight sum, see
    /// [`WeightTracker::update_sum_weights`]
    pub fn update_sum_weights(&mut self, weight: u64) {
        self.weights.update_sum_weights(weight)
    }

    /// Updates the tracked maximum soft weight, see
    /// [`WeightTracker::set_maximum_weight`]
    pub fn set_maximum_weight(&mut self, weight: u64) {
        self.weights.set_maximum_weight(weight)
    }

    /// Sets the weight marking hard clauses in uniformly weighted formats
    pub fn set_hard_weight(&mut self, weight: u64) {
        self.weights.set_hard_weight(weight)
    }

    /// Gets the weight marking hard clauses in uniformly weighted formats
    #[inline]
    pub fn hard_weight(&self) -> u64 {
        self.weights.hard_weight()
    }

    /// Gets the tracked soft weight sum
    #[inline]
    pub fn sum_soft_weight(&self) -> u64 {
        self.weights.sum_weights()
    }

    /// Gets the tracked maximum soft weight
    #[inline]
    pub fn max_soft_weight(&self) -> u64 {
        self.weights.max_weight()
    }

    /// Gets the weight tracker
    #[inline]
    pub fn weights(&self) -> &WeightTracker {
        &self.weights
    }

    /// Recomputes the soft weight sum from the stored soft clauses. Agrees
    /// with [`MaxSatFormula::sum_soft_weight`] if every soft clause was paired
    /// with a tracker update.
    pub fn soft_weight_sum(&self) -> u64 {
        self.soft_clauses
            .iter()
            .fold(0, |sum, sc| sum.saturating_add(sc.weight()))
    }

    /// Gets the problem type
    #[inline]
    pub fn problem_type(&self) -> ProblemType {
        self.problem_type
    }

    /// Sets the problem type
    pub fn set_problem_type(&mut self, problem_type: ProblemType) {
        self.problem_type = problem_type;
    }

    /// Gets the format tag
    #[inline]
    pub fn format(&self) -> FormulaFormat {
        self.format
    }

    /// Sets the format tag
    pub fn set_format(&mut self, format: FormulaFormat) {
        self.format = format;
    }

    /// Adds a generalized linear constraint. Clauses are stored as hard
    /// clauses, constraints with equal coefficients as cardinality constraints
    /// and everything else as pseudo-boolean constraints. Cardinality and
    /// pseudo-boolean constraints are stored in `<=` orientation and switch
    /// the format to [`FormulaFormat::Pb`]. The constraint passed in is not
    /// modified. Returns how the constraint was classified.
    pub fn add_pb_constraint(&mut self, constr: &PbConstraint) -> ConstraintKind {
        let norm = constr.normalize();
        let kind = norm.kind();
        log::trace!("add {:?} constraint {}", kind, constr);
        match norm {
            NormalizedConstraint::Clause(cl) => self.add_hard_clause(cl.lits()),
            NormalizedConstraint::Card(card) => {
                self.card_constraints.push(card);
                self.format = FormulaFormat::Pb;
            }
            NormalizedConstraint::Pb(pb) => {
                self.pb_constraints.push(pb);
                self.format = FormulaFormat::Pb;
            }
        }
        kind
    }

    /// Gets the variable registered for `name`, allocating a new variable if
    /// the name is new
    pub fn new_var_name(&mut self, name: &str) -> Var {
        self.names.new_var_name(name, &mut self.var_manager)
    }

    /// Looks up the variable registered for `name`
    pub fn var_id(&self, name: &str) -> Option<Var> {
        self.names.var_id(name)
    }

    /// Looks up the name of a variable
    pub fn var_name(&self, var: Var) -> Option<&str> {
        self.names.var_name(var)
    }

    /// Gets the number of registered variable names
    #[inline]
    pub fn n_names(&self) -> usize {
        self.names.len()
    }

    /// Gets the variable name registry
    #[inline]
    pub fn names(&self) -> &VarNameRegistry {
        &self.names
    }

    /// Stores the linear objective to minimize, replacing any previous one
    pub fn set_objective(&mut self, objective: PbConstraint) {
        self.objective = Some(objective);
    }

    /// Gets the stored objective, if any
    pub fn objective(&self) -> Option<&PbConstraint> {
        self.objective.as_ref()
    }

    /// Converts the stored objective into unit soft clauses, see
    /// [`MaxSatFormula::try_convert_pb_to_maxsat`]. Panics if there is no
    /// objective or a term has coefficient 0.
    pub fn convert_pb_to_maxsat(&mut self) {
        if let Err(err) = self.try_convert_pb_to_maxsat() {
            panic!("cannot convert objective: {}", err)
        }
    }

    /// Converts the stored objective into unit soft clauses. Every term
    /// `coeff * lit` becomes a soft clause `(~lit)` with weight `coeff` that is
    /// also fed to the weight tracker. Afterwards the problem type is
    /// unweighted if the maximum soft weight is 1 and weighted otherwise. The
    /// objective is consumed.
    ///
    /// Returns an error and leaves the formula untouched if there is no
    /// objective or a term does not have a positive coefficient.
    pub fn try_convert_pb_to_maxsat(&mut self) -> Result<(), FormulaError> {
        let obj = self.objective.as_ref().ok_or(FormulaError::NoObjective)?;
        if let Some(idx) = obj.coeffs().iter().position(|&c| c == 0) {
            return Err(FormulaError::NonPositiveCoefficient(idx));
        }
        let obj = self.objective.take().ok_or(FormulaError::NoObjective)?;
        log::debug!("converting objective with {} terms", obj.len());
        for (coeff, lit) in obj.iter() {
            self.add_soft_clause(coeff, &[!lit]);
            self.update_sum_weights(coeff);
            self.set_maximum_weight(coeff);
        }
        self.problem_type = if self.max_soft_weight() == 1 {
            ProblemType::Unweighted
        } else {
            ProblemType::Weighted
        };
        Ok(())
    }

    /// Creates a copy of a formula in clause form, see
    /// [`MaxSatFormula::try_copy_formula`]. Panics if the formula is not in
    /// clause form.
    pub fn copy_formula(&self) -> MaxSatFormula {
        match self.try_copy_formula() {
            Ok(copy) => copy,
            Err(err) => panic!("cannot copy formula: {}", err),
        }
    }

    /// Creates a copy of a formula in clause form. The copy has the same
    /// variables, hard and soft clauses, problem type and weight bookkeeping.
    /// The variable names, cardinality and pseudo-boolean constraints, the
    /// objective, and the assumption literals and relaxation variables of the
    /// soft clauses are not copied.
    pub fn try_copy_formula(&self) -> Result<MaxSatFormula, FormulaError> {
        if self.format != FormulaFormat::Clausal {
            return Err(FormulaError::NotClausal);
        }
        log::debug!(
            "copying formula with {} variables, {} hard and {} soft clauses",
            self.n_vars(),
            self.n_hard(),
            self.n_soft()
        );
        let mut copy = MaxSatFormula::new();
        copy.set_initial_vars(self.n_initial_vars);
        for _ in 0..self.n_vars() {
            copy.new_var();
        }
        for sc in self.soft_clauses() {
            copy.add_soft_clause(sc.weight(), sc.lits());
        }
        for hc in self.hard_clauses() {
            copy.add_hard_clause(hc.lits());
        }
        copy.problem_type = self.problem_type;
        copy.weights = WeightTracker::restore(
            self.weights.sum_weights(),
            self.weights.max_weight(),
            self.weights.hard_weight(),
        );
        Ok(copy)
    }

    /// Calculates the cost of an assignment: the summed weight of all falsified
    /// soft clauses. Returns [`None`] if a hard clause is not satisfied.
    pub fn cost(&self, assign: &Assignment) -> Option<u64> {
        if !self.hard_clauses.iter().all(|hc| hc.clause().is_sat(assign)) {
            return None;
        }
        Some(
            self.soft_clauses
                .iter()
                .filter(|sc| sc.clause().evaluate(assign) == TernaryVal::False)
                .fold(0, |cost, sc| cost.saturating_add(sc.weight())),
        )
    }

    /// Writes the formula to DIMACS WCNF (pre 22, with p line and top weight)
    pub fn write_dimacs<W: io::Write>(&self, writer: &mut W) -> Result<(), io::Error> {
        fio::dimacs::write_wcnf_annotated(writer, self)
    }

    /// Writes the formula to a DIMACS WCNF file at a path. With feature
    /// `compression` the output is compressed if the extension is `bz2`, `gz`
    /// or `xz`.
    pub fn write_dimacs_path<P: AsRef<Path>>(&self, path: P) -> Result<(), io::Error> {
        let mut writer = fio::open_compressed_uncompressed_write(path)?;
        self.write_dimacs(&mut writer)
    }

    /// Writes the formula to standard output
    pub fn dump_formula(&self) -> Result<(), io::Error> {
        let stdout = io::stdout();
        let mut lock = stdout.lock();
        self.write_dimacs(&mut lock)
    }
}

impl fmt::Display for MaxSatFormula {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{} formula: {} vars, {} hard, {} soft, {} card, {} pb",
            self.problem_type,
            self.n_vars(),
            self.n_hard(),
            self.n_soft(),
            self.n_card(),
            self.n_pb()
        )?;
        self.hard_clauses
            .iter()
            .try_for_each(|hc| writeln!(f, "h {}", hc))?;
        self.soft_clauses
            .iter()
            .try_for_each(|sc| writeln!(f, "{}", sc))?;
        self.card_constraints
            .iter()
            .try_for_each(|card| writeln!(f, "{}", card))?;
        self.pb_constraints
            .iter()
            .try_for_each(|pb| writeln!(f, "{}", pb))
    }
}
