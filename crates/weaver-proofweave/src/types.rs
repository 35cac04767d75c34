//! PWOF v1 value types. Structural equality comes directly from
//! `#[derive(PartialEq, Eq)]` on these tagged unions — the kernel never
//! needs a hand-rolled deep-equal.

use serde::{Deserialize, Serialize};

pub const PWOF_VERSION: &str = "1";
pub const RULESET_ID: &str = "PWK_ND_PROP_EQ_v1";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Term {
    Var { name: String },
    Fun { name: String, args: Vec<Term> },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Formula {
    Atom { pred: String, args: Vec<Term> },
    Eq { left: Term, right: Term },
    And { left: Box<Formula>, right: Box<Formula> },
    Or { left: Box<Formula>, right: Box<Formula> },
    Imp { left: Box<Formula>, right: Box<Formula> },
    Not { formula: Box<Formula> },
}

impl Formula {
    pub fn false_atom() -> Formula {
        Formula::Atom {
            pred: "False".to_string(),
            args: Vec::new(),
        }
    }

    pub fn is_false_atom(&self) -> bool {
        matches!(self, Formula::Atom { pred, args } if pred == "False" && args.is_empty())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProofNode {
    pub id: String,
    pub rule: String,
    #[serde(default)]
    pub premises: Vec<String>,
    pub formula: Formula,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub justification: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Context {
    pub assumptions: Vec<Formula>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Goal {
    pub formula: Formula,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Proof {
    pub nodes: Vec<ProofNode>,
    pub conclusion: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProofObject {
    pub pwof_version: String,
    pub ruleset_id: String,
    pub context: Context,
    pub goal: Goal,
    pub proof: Proof,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub who: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub why: Option<String>,
}
