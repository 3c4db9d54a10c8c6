use maxsat_formula::{
    instances::{FormulaError, FormulaFormat},
    lit,
    types::{ConstraintKind, Lit, PbConstraint, Var},
    MaxSatFormula, ProblemType,
};

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn tracked_soft(formula: &mut MaxSatFormula, weight: u64, lits: &[Lit]) {
    formula.add_soft_clause(weight, lits);
    formula.update_sum_weights(weight);
    formula.set_maximum_weight(weight);
}

#[test]
fn insertion_order_and_counts() {
    init_logger();
    let mut f = MaxSatFormula::new();
    let lits: Vec<Lit> = (0..5).map(|_| f.new_literal(false)).collect();
    for (i, &l) in lits.iter().enumerate() {
        f.add_hard_clause(&[l, !lits[(i + 1) % lits.len()]]);
        tracked_soft(&mut f, i as u64 + 1, &[!l]);
    }
    assert_eq!(f.n_hard(), 5);
    assert_eq!(f.n_soft(), 5);
    for (i, &l) in lits.iter().enumerate() {
        assert_eq!(f.hard_clause(i).lits()[0], l);
        assert_eq!(f.soft_clause(i).lits(), &[!l]);
        assert_eq!(f.soft_clause(i).weight(), i as u64 + 1);
    }
    assert_eq!(f.hard_clauses().count(), 5);
    assert_eq!(f.soft_clauses().map(|sc| sc.weight()).sum::<u64>(), 15);
}

#[test]
fn variable_count_never_decreases() {
    let mut f = MaxSatFormula::new();
    let mut last = f.n_vars();
    for target in [3, 1, 7, 7, 2, 10] {
        f.new_var_up_to(target);
        assert!(f.n_vars() >= last);
        assert!(f.n_vars() >= target);
        last = f.n_vars();
        f.new_var();
        assert_eq!(f.n_vars(), last + 1);
        last = f.n_vars();
    }
}

#[test]
fn names_round_trip() {
    let mut f = MaxSatFormula::new();
    let names = ["a", "b", "c", "a", "d", "b"];
    let vars: Vec<Var> = names.iter().map(|n| f.new_var_name(n)).collect();
    assert_eq!(vars[0], vars[3]);
    assert_eq!(vars[1], vars[5]);
    assert_eq!(f.names().len(), 4);
    assert_eq!(f.n_vars(), 4);
    for (name, var) in names.iter().zip(vars) {
        assert_eq!(f.var_id(name), Some(var));
        assert_eq!(f.var_name(var), Some(*name));
    }
    assert_eq!(f.var_id("missing"), None);
}

#[test]
fn tracked_sum_matches_recomputed_sum() {
    let mut f = MaxSatFormula::new();
    for w in [4, 1, 9, 2, 2] {
        let l = f.new_literal(false);
        tracked_soft(&mut f, w, &[l]);
    }
    assert_eq!(f.sum_soft_weight(), f.soft_weight_sum());
    assert_eq!(f.sum_soft_weight(), 18);
    assert_eq!(f.max_soft_weight(), 9);
}

#[test]
fn clone_is_independent() {
    let mut f = MaxSatFormula::new();
    f.add_hard_clause(&[lit![0]]);
    tracked_soft(&mut f, 2, &[lit![1]]);
    let snapshot = f.clone();
    let mut g = f.clone();
    g.add_hard_clause(&[lit![2]]);
    tracked_soft(&mut g, 3, &[lit![3]]);
    g.soft_clause_mut(0).set_assumption(lit![4]);
    g.new_var_name("z");
    assert_eq!(f, snapshot);
    assert_eq!(f.n_hard(), 1);
    assert_eq!(f.soft_clause(0).assumption(), None);
    assert_eq!(f.var_id("z"), None);
}

#[test]
fn copy_is_independent() {
    let mut f = MaxSatFormula::new();
    f.new_var_up_to(3);
    f.add_hard_clause(&[lit![0], lit![1]]);
    tracked_soft(&mut f, 2, &[!lit![2]]);
    let snapshot = f.clone();

    let mut copy = f.copy_formula();
    copy.add_hard_clause(&[lit![2]]);
    copy.soft_clause_mut(0).set_assumption(lit![5]);
    tracked_soft(&mut copy, 4, &[lit![1]]);
    copy.new_var();
    assert_eq!(copy.n_hard(), 2);
    assert_eq!(copy.n_soft(), 2);

    assert_eq!(f, snapshot);
    assert_eq!(f.n_hard(), 1);
    assert_eq!(f.n_soft(), 1);
    assert_eq!(f.n_vars(), 3);
    assert_eq!(f.hard_clause(0).lits(), &[lit![0], lit![1]]);
    assert_eq!(f.soft_clause(0).lits(), &[!lit![2]]);
    assert_eq!(f.soft_clause(0).assumption(), None);
    assert_eq!(f.sum_soft_weight(), 2);
}

#[test]
fn objective_conversion_weighted() {
    init_logger();
    let mut f = MaxSatFormula::new();
    let x1 = f.new_literal(false);
    let x2 = f.new_literal(false);
    f.set_objective(PbConstraint::new_objective([(x1, 2), (x2, 5)]));
    f.convert_pb_to_maxsat();
    assert_eq!(f.n_soft(), 2);
    assert_eq!(f.soft_clause(0).lits(), &[!x1]);
    assert_eq!(f.soft_clause(1).lits(), &[!x2]);
    assert_eq!(f.problem_type(), ProblemType::Weighted);
    assert_eq!(f.try_convert_pb_to_maxsat(), Err(FormulaError::NoObjective));
}

#[test]
fn objective_conversion_unweighted() {
    let mut f = MaxSatFormula::new();
    let x1 = f.new_literal(false);
    f.set_objective(PbConstraint::new_objective([(x1, 1)]));
    f.convert_pb_to_maxsat();
    assert_eq!(f.n_soft(), 1);
    assert_eq!(f.soft_clause(0).weight(), 1);
    assert_eq!(f.problem_type(), ProblemType::Unweighted);
}

#[test]
fn constraint_classification() {
    let mut f = MaxSatFormula::new();
    let clause = PbConstraint::new_lb([(lit![0], 1), (lit![1], 1)], 1);
    let card = PbConstraint::new_lb([(lit![0], 3), (lit![1], 3), (lit![2], 3)], 6);
    let pb = PbConstraint::new_ub([(lit![0], 1), (lit![1], 2), (lit![2], 4)], 5);
    assert_eq!(f.add_pb_constraint(&clause), ConstraintKind::Clause);
    assert_eq!(f.n_hard(), 1);
    assert_eq!(f.hard_clause(0).lits(), &[lit![0], lit![1]]);
    assert_eq!(f.format(), FormulaFormat::Clausal);
    assert_eq!(f.add_pb_constraint(&card), ConstraintKind::Cardinality);
    assert_eq!(f.n_card(), 1);
    assert_eq!(f.add_pb_constraint(&pb), ConstraintKind::Pb);
    assert_eq!(f.n_pb(), 1);
    assert_eq!(f.pb_constraint(0), &pb);
    assert_eq!(f.n_hard(), 1);
    assert_eq!(f.format(), FormulaFormat::Pb);
}

#[test]
fn upper_bound_clause_is_negated() {
    let mut f = MaxSatFormula::new();
    // x0 + x1 + x2 <= 2 <=> ~x0 | ~x1 | ~x2
    let constr = PbConstraint::new_ub([(lit![0], 1), (lit![1], 1), (lit![2], 1)], 2);
    assert_eq!(f.add_pb_constraint(&constr), ConstraintKind::Clause);
    assert_eq!(f.hard_clause(0).lits(), &[!lit![0], !lit![1], !lit![2]]);
}

#[test]
fn copy_keeps_clauses_and_weights() {
    let mut f = MaxSatFormula::new();
    f.new_var_up_to(4);
    f.set_initial_vars(3);
    f.set_problem_type(ProblemType::Weighted);
    f.set_hard_weight(100);
    f.add_hard_clause(&[lit![0], lit![1]]);
    let r = f.new_literal(false);
    f.add_soft_clause_relaxed(3, &[lit![2]], &[r]);
    f.update_sum_weights(3);
    f.set_maximum_weight(3);
    f.soft_clause_mut(0).set_assumption(!r);
    f.new_var_name("named");

    let copy = f.copy_formula();
    assert_eq!(copy.n_vars(), f.n_vars());
    assert_eq!(copy.n_initial_vars(), 3);
    assert_eq!(copy.n_hard(), 1);
    assert_eq!(copy.hard_clause(0).lits(), f.hard_clause(0).lits());
    assert_eq!(copy.n_soft(), 1);
    assert_eq!(copy.soft_clause(0).lits(), &[lit![2]]);
    assert_eq!(copy.soft_clause(0).weight(), 3);
    assert_eq!(copy.soft_clause(0).assumption(), None);
    assert!(copy.soft_clause(0).relaxation_vars().is_empty());
    assert_eq!(copy.problem_type(), ProblemType::Weighted);
    assert_eq!(copy.weights(), f.weights());
    assert_eq!(copy.hard_weight(), 100);
    assert_eq!(copy.var_id("named"), None);
}

#[test]
fn copy_requires_clause_form() {
    let mut f = MaxSatFormula::new();
    f.add_pb_constraint(&PbConstraint::new_ub([(lit![0], 2), (lit![1], 2)], 3));
    assert_eq!(f.try_copy_formula(), Err(FormulaError::NotClausal));
}

#[test]
#[should_panic(expected = "out of range")]
fn soft_clause_index_checked() {
    let mut f = MaxSatFormula::new();
    f.add_soft_clause(1, &[lit![0]]);
    f.soft_clause(1);
}

#[cfg(feature = "serde")]
#[test]
fn serde_round_trip() {
    let constr = PbConstraint::new_lb([(lit![0], 2), (!lit![1], 3)], 4);
    let json = serde_json::to_string(&constr).unwrap();
    let back: PbConstraint = serde_json::from_str(&json).unwrap();
    assert_eq!(back, constr);
}
