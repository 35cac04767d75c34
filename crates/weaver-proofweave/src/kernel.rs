//! PWK: the fail-closed natural-deduction checker for ruleset
//! `PWK_ND_PROP_EQ_v1`. The kernel never panics — every error path
//! returns a result with `passed=false` and a message naming the node
//! and rule.

use std::collections::HashMap;

use crate::types::{Formula, ProofObject, Term, PWOF_VERSION, RULESET_ID};

#[derive(Debug, Clone, PartialEq)]
pub struct PwkResult {
    pub passed: bool,
    pub message: String,
    pub node_count: usize,
    pub rules_used: Vec<String>,
}

impl PwkResult {
    fn fail(message: impl Into<String>) -> Self {
        Self {
            passed: false,
            message: message.into(),
            node_count: 0,
            rules_used: Vec::new(),
        }
    }

    fn pass(node_count: usize, rules_used: Vec<String>) -> Self {
        Self {
            passed: true,
            message: "ok".to_string(),
            node_count,
            rules_used,
        }
    }
}

/// Top-level entry point. Walks `proof.nodes` in order, checking each
/// rule application, then compares the conclusion's formula against the
/// goal. Never raises; every failure is an `Ok`-shaped `PwkResult` with
/// `passed=false`.
pub fn pwk_check(proof: &ProofObject) -> PwkResult {
    if proof.pwof_version != PWOF_VERSION {
        return PwkResult::fail(format!(
            "unsupported pwof_version {:?}",
            proof.pwof_version
        ));
    }
    if proof.ruleset_id != RULESET_ID {
        return PwkResult::fail(format!("unsupported ruleset_id {:?}", proof.ruleset_id));
    }
    if proof.proof.nodes.is_empty() {
        return PwkResult::fail("proof.nodes is empty");
    }
    if proof.proof.conclusion.is_empty() {
        return PwkResult::fail("missing conclusion id");
    }

    let mut derived: HashMap<String, Formula> = HashMap::new();
    let mut rules_used = Vec::new();

    for node in &proof.proof.nodes {
        let mut premises = Vec::with_capacity(node.premises.len());
        for premise_id in &node.premises {
            match derived.get(premise_id) {
                Some(f) => premises.push(f.clone()),
                None => {
                    return PwkResult::fail(format!(
                        "node {} cites undischarged premise {}",
                        node.id, premise_id
                    ))
                }
            }
        }

        if let Err(reason) = check_rule(
            &node.rule,
            &premises,
            &node.formula,
            &proof.context.assumptions,
        ) {
            return PwkResult::fail(format!("node {} rule {} failed: {}", node.id, node.rule, reason));
        }

        derived.insert(node.id.clone(), node.formula.clone());
        rules_used.push(node.rule.clone());
    }

    match derived.get(&proof.proof.conclusion) {
        None => PwkResult::fail(format!(
            "conclusion {} was never derived",
            proof.proof.conclusion
        )),
        Some(formula) => {
            if *formula == proof.goal.formula {
                PwkResult::pass(proof.proof.nodes.len(), rules_used)
            } else {
                PwkResult::fail("conclusion formula does not match goal")
            }
        }
    }
}

fn check_rule(
    rule: &str,
    premises: &[Formula],
    formula: &Formula,
    assumptions: &[Formula],
) -> Result<(), String> {
    match rule {
        "ASSUME" => check_assume(premises, formula, assumptions),
        "REITERATE" => check_reiterate(premises, formula),
        "IMP_ELIM" => check_imp_elim(premises, formula),
        "AND_INTRO" => check_and_intro(premises, formula),
        "AND_ELIM_L" => check_and_elim_l(premises, formula),
        "AND_ELIM_R" => check_and_elim_r(premises, formula),
        "OR_INTRO_L" => check_or_intro_l(premises, formula),
        "OR_INTRO_R" => check_or_intro_r(premises, formula),
        "NOT_ELIM" => check_not_elim(premises, formula),
        "EQ_REFL" => check_eq_refl(premises, formula),
        "EQ_SYMM" => check_eq_symm(premises, formula),
        "EQ_TRANS" => check_eq_trans(premises, formula),
        "EQ_SUBST_PRED" => check_eq_subst_pred(premises, formula),
        other => Err(format!("unknown rule {other:?}")),
    }
}

fn check_assume(premises: &[Formula], formula: &Formula, assumptions: &[Formula]) -> Result<(), String> {
    if !premises.is_empty() {
        return Err("ASSUME takes no premises".to_string());
    }
    if assumptions.contains(formula) {
        Ok(())
    } else {
        Err("formula is not among context.assumptions".to_string())
    }
}

fn check_reiterate(premises: &[Formula], formula: &Formula) -> Result<(), String> {
    match premises {
        [p] if p == formula => Ok(()),
        [_] => Err("formula does not equal its premise".to_string()),
        _ => Err("REITERATE takes exactly one premise".to_string()),
    }
}

fn check_imp_elim(premises: &[Formula], formula: &Formula) -> Result<(), String> {
    let [a, b] = premises else {
        return Err("IMP_ELIM takes exactly two premises".to_string());
    };
    for (imp, antecedent) in [(a, b), (b, a)] {
        if let Formula::Imp { left, right } = imp {
            if left.as_ref() == antecedent && right.as_ref() == formula {
                return Ok(());
            }
        }
    }
    Err("no premise ordering satisfies modus ponens".to_string())
}

fn check_and_intro(premises: &[Formula], formula: &Formula) -> Result<(), String> {
    let [p0, p1] = premises else {
        return Err("AND_INTRO takes exactly two premises".to_string());
    };
    match formula {
        Formula::And { left, right } if left.as_ref() == p0 && right.as_ref() == p1 => Ok(()),
        Formula::And { .. } => Err("premises do not match the conjuncts in order".to_string()),
        _ => Err("node formula must be an AND".to_string()),
    }
}

fn check_and_elim_l(premises: &[Formula], formula: &Formula) -> Result<(), String> {
    match premises {
        [Formula::And { left, .. }] if left.as_ref() == formula => Ok(()),
        [Formula::And { .. }] => Err("node formula does not match the left conjunct".to_string()),
        [_] => Err("premise must be an AND".to_string()),
        _ => Err("AND_ELIM_L takes exactly one premise".to_string()),
    }
}

fn check_and_elim_r(premises: &[Formula], formula: &Formula) -> Result<(), String> {
    match premises {
        [Formula::And { right, .. }] if right.as_ref() == formula => Ok(()),
        [Formula::And { .. }] => Err("node formula does not match the right conjunct".to_string()),
        [_] => Err("premise must be an AND".to_string()),
        _ => Err("AND_ELIM_R takes exactly one premise".to_string()),
    }
}

fn check_or_intro_l(premises: &[Formula], formula: &Formula) -> Result<(), String> {
    match (formula, premises) {
        (Formula::Or { left, .. }, [p]) if left.as_ref() == p => Ok(()),
        (Formula::Or { .. }, [_]) => Err("premise does not match the left disjunct".to_string()),
        (_, [_]) => Err("node formula must be an OR".to_string()),
        _ => Err("OR_INTRO_L takes exactly one premise".to_string()),
    }
}

fn check_or_intro_r(premises: &[Formula], formula: &Formula) -> Result<(), String> {
    match (formula, premises) {
        (Formula::Or { right, .. }, [p]) if right.as_ref() == p => Ok(()),
        (Formula::Or { .. }, [_]) => Err("premise does not match the right disjunct".to_string()),
        (_, [_]) => Err("node formula must be an OR".to_string()),
        _ => Err("OR_INTRO_R takes exactly one premise".to_string()),
    }
}

fn check_not_elim(premises: &[Formula], formula: &Formula) -> Result<(), String> {
    if !formula.is_false_atom() {
        return Err("node formula must be the False atom".to_string());
    }
    let [a, b] = premises else {
        return Err("NOT_ELIM takes exactly two premises".to_string());
    };
    for (negation, positive) in [(a, b), (b, a)] {
        if let Formula::Not { formula: inner } = negation {
            if inner.as_ref() == positive {
                return Ok(());
            }
        }
    }
    Err("no premise ordering satisfies not-elimination".to_string())
}

fn check_eq_refl(premises: &[Formula], formula: &Formula) -> Result<(), String> {
    if !premises.is_empty() {
        return Err("EQ_REFL takes no premises".to_string());
    }
    match formula {
        Formula::Eq { left, right } if left == right => Ok(()),
        Formula::Eq { .. } => Err("EQ_REFL requires both sides to be the same term".to_string()),
        _ => Err("node formula must be an EQ".to_string()),
    }
}

fn check_eq_symm(premises: &[Formula], formula: &Formula) -> Result<(), String> {
    match (premises, formula) {
        ([Formula::Eq { left: a, right: b }], Formula::Eq { left, right })
            if left == b && right == a =>
        {
            Ok(())
        }
        ([Formula::Eq { .. }], Formula::Eq { .. }) => {
            Err("node formula is not the symmetric equality".to_string())
        }
        ([Formula::Eq { .. }], _) => Err("node formula must be an EQ".to_string()),
        ([_], _) => Err("premise must be an EQ".to_string()),
        _ => Err("EQ_SYMM takes exactly one premise".to_string()),
    }
}

fn as_term_eq(f: &Formula) -> Option<(&Term, &Term)> {
    match f {
        Formula::Eq { left, right } => Some((left, right)),
        _ => None,
    }
}

fn check_eq_trans(premises: &[Formula], formula: &Formula) -> Result<(), String> {
    let [p0, p1] = premises else {
        return Err("EQ_TRANS takes exactly two premises".to_string());
    };
    let (Some((a0, b0)), Some((a1, b1))) = (as_term_eq(p0), as_term_eq(p1)) else {
        return Err("both premises must be EQ".to_string());
    };
    let Formula::Eq { left: goal_a, right: goal_c } = formula else {
        return Err("node formula must be an EQ".to_string());
    };

    // (a0=b0, b0=c) or (a0=b0, a=a0) style orderings sharing a middle term.
    let candidates = [
        (a0, b0, a1, b1),
        (a1, b1, a0, b0),
    ];
    for (a, b, c_left, c) in candidates {
        if b == c_left && a == goal_a.as_ref() && c == goal_c.as_ref() {
            return Ok(());
        }
    }
    Err("premises do not share a middle term compatible with the goal equality".to_string())
}

fn check_eq_subst_pred(premises: &[Formula], formula: &Formula) -> Result<(), String> {
    let [p0, p1] = premises else {
        return Err("EQ_SUBST_PRED takes exactly two premises".to_string());
    };
    for (eq, atom) in [(p0, p1), (p1, p0)] {
        let Some((a, b)) = as_term_eq(eq) else { continue };
        let Formula::Atom { pred, args } = atom else { continue };
        let [x] = args.as_slice() else { continue };
        let (from, to) = if x == a {
            (a, b)
        } else if x == b {
            (b, a)
        } else {
            continue;
        };
        if let Formula::Atom {
            pred: node_pred,
            args: node_args,
        } = formula
        {
            if let [node_arg] = node_args.as_slice() {
                if node_pred == pred && node_arg == to && x == from {
                    return Ok(());
                }
            }
        }
    }
    Err("no premise ordering satisfies equality substitution".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Context, Goal, Proof, ProofNode};

    fn atom(pred: &str) -> Formula {
        Formula::Atom {
            pred: pred.to_string(),
            args: vec![],
        }
    }

    fn var(name: &str) -> Term {
        Term::Var { name: name.to_string() }
    }

    fn make_node(id: &str, rule: &str, premises: &[&str], formula: Formula) -> ProofNode {
        ProofNode {
            id: id.to_string(),
            rule: rule.to_string(),
            premises: premises.iter().map(|s| s.to_string()).collect(),
            formula,
            justification: None,
        }
    }

    #[test]
    fn modus_ponens_passes() {
        let a = atom("A");
        let b = atom("B");
        let imp = Formula::Imp {
            left: Box::new(a.clone()),
            right: Box::new(b.clone()),
        };
        let proof = ProofObject {
            pwof_version: PWOF_VERSION.to_string(),
            ruleset_id: RULESET_ID.to_string(),
            context: Context {
                assumptions: vec![a.clone(), imp.clone()],
            },
            goal: Goal { formula: b.clone() },
            proof: Proof {
                nodes: vec![
                    make_node("n1", "ASSUME", &[], a.clone()),
                    make_node("n2", "ASSUME", &[], imp.clone()),
                    make_node("n3", "IMP_ELIM", &["n1", "n2"], b.clone()),
                ],
                conclusion: "n3".to_string(),
            },
            who: None,
            why: None,
        };
        let result = pwk_check(&proof);
        assert!(result.passed, "{:?}", result);
    }

    #[test]
    fn eq_refl_with_distinct_variables_fails_closed() {
        let eq = Formula::Eq {
            left: var("x"),
            right: var("y"),
        };
        let proof = ProofObject {
            pwof_version: PWOF_VERSION.to_string(),
            ruleset_id: RULESET_ID.to_string(),
            context: Context { assumptions: vec![] },
            goal: Goal { formula: eq.clone() },
            proof: Proof {
                nodes: vec![make_node("n1", "EQ_REFL", &[], eq.clone())],
                conclusion: "n1".to_string(),
            },
            who: None,
            why: None,
        };
        let result = pwk_check(&proof);
        assert!(!result.passed);
    }

    #[test]
    fn unsupported_version_fails_closed_without_panicking() {
        let proof = ProofObject {
            pwof_version: "2".to_string(),
            ruleset_id: RULESET_ID.to_string(),
            context: Context { assumptions: vec![] },
            goal: Goal { formula: atom("A") },
            proof: Proof {
                nodes: vec![make_node("n1", "ASSUME", &[], atom("A"))],
                conclusion: "n1".to_string(),
            },
            who: None,
            why: None,
        };
        let result = pwk_check(&proof);
        assert!(!result.passed);
    }

    #[test]
    fn eq_trans_chains_two_equalities() {
        let eq_ab = Formula::Eq { left: var("a"), right: var("b") };
        let eq_bc = Formula::Eq { left: var("b"), right: var("c") };
        let eq_ac = Formula::Eq { left: var("a"), right: var("c") };
        let proof = ProofObject {
            pwof_version: PWOF_VERSION.to_string(),
            ruleset_id: RULESET_ID.to_string(),
            context: Context {
                assumptions: vec![eq_ab.clone(), eq_bc.clone()],
            },
            goal: Goal { formula: eq_ac.clone() },
            proof: Proof {
                nodes: vec![
                    make_node("n1", "ASSUME", &[], eq_ab.clone()),
                    make_node("n2", "ASSUME", &[], eq_bc.clone()),
                    make_node("n3", "EQ_TRANS", &["n1", "n2"], eq_ac.clone()),
                ],
                conclusion: "n3".to_string(),
            },
            who: None,
            why: None,
        };
        let result = pwk_check(&proof);
        assert!(result.passed, "{:?}", result);
    }
}
