//! # DIMACS WCNF Writing
//!
//! Writes formulas in the pre 22 weighted format. A comment block summarizes
//! the formula and lists every clause in readable form. It is followed by a
//! `p wcnf` line declaring the variable count, the clause count and the top
//! weight, and by one line per clause that starts with its weight. Hard
//! clauses carry the top weight.
//!
//! Literals are written as signed 1-based integers. The literal sentinels have
//! no integer form and are written as [`crate::types::DimacsLit::UNDEF_TOKEN`]
//! and [`crate::types::DimacsLit::ERROR_TOKEN`].

use std::io::{self, Write};

use crate::{instances::MaxSatFormula, types::Lit};

/// Writes a formula to a (pre 22, with p line) DIMACS WCNF file, preceded by
/// comment lines summarizing it.
///
/// The top weight is the recomputed sum of soft clause weights plus one.
/// Returns an [`io::ErrorKind::InvalidData`] error if that overflows.
pub fn write_wcnf_annotated<W: Write>(
    writer: &mut W,
    formula: &MaxSatFormula,
) -> Result<(), io::Error> {
    let weight_sum = formula.soft_weight_sum();
    let top = top_weight(weight_sum)?;
    log::debug!(
        "writing wcnf with {} hard and {} soft clauses, top weight {}",
        formula.n_hard(),
        formula.n_soft(),
        top
    );
    writeln!(writer, "c WCNF file written by maxsat-formula")?;
    writeln!(
        writer,
        "c {} variables ({} initial)",
        formula.n_vars(),
        formula.n_initial_vars()
    )?;
    writeln!(writer, "c {} hard clauses", formula.n_hard())?;
    writeln!(writer, "c {} soft clauses", formula.n_soft())?;
    writeln!(
        writer,
        "c soft weight sum: {} (tracked: {})",
        weight_sum,
        formula.sum_soft_weight()
    )?;
    writeln!(writer, "c maximum soft weight: {}", formula.max_soft_weight())?;
    writeln!(writer, "c problem type: {}", formula.problem_type())?;
    formula
        .soft_clauses()
        .enumerate()
        .try_for_each(|(idx, sc)| {
            writeln!(writer, "c soft({}/{}): {}", idx + 1, formula.n_soft(), sc)
        })?;
    formula
        .hard_clauses()
        .enumerate()
        .try_for_each(|(idx, hc)| {
            writeln!(writer, "c hard({}/{}): {}", idx + 1, formula.n_hard(), hc)
        })?;
    write_p_line(
        writer,
        formula.n_initial_vars(),
        formula.n_soft() + formula.n_hard(),
        top,
    )?;
    formula
        .soft_clauses()
        .try_for_each(|sc| write_weighted_clause(writer, sc.weight(), sc.lits()))?;
    formula
        .hard_clauses()
        .try_for_each(|hc| write_weighted_clause(writer, top, hc.lits()))?;
    writer.flush()
}

fn top_weight(weight_sum: u64) -> Result<u64, io::Error> {
    weight_sum.checked_add(1).ok_or_else(|| {
        io::Error::new(
            io::ErrorKind::InvalidData,
            "soft weight sum leaves no room for a top weight",
        )
    })
}

fn write_p_line<W: Write>(
    writer: &mut W,
    n_vars: u32,
    n_clauses: usize,
    top: u64,
) -> Result<(), io::Error> {
    writeln!(writer, "p wcnf {} {} {}", n_vars, n_clauses, top)
}

fn write_weighted_clause<W: Write>(
    writer: &mut W,
    weight: u64,
    lits: &[Lit],
) -> Result<(), io::Error> {
    write!(writer, "{} ", weight)?;
    lits.iter()
        .try_for_each(|l| write!(writer, "{} ", l.dimacs()))?;
    writeln!(writer, "0")
}
