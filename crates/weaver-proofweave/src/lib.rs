//! ProofWeave: the PWOF v1 canonical proof-object format and the PWK
//! fail-closed natural-deduction kernel for ruleset `PWK_ND_PROP_EQ_v1`.

pub mod canonical;
pub mod error;
pub mod kernel;
pub mod types;

pub use canonical::{canonicalize_pwof, compute_hash, parse_pwof, HashAlgorithm};
pub use error::ProofWeaveError;
pub use kernel::{pwk_check, PwkResult};
pub use types::{Context, Formula, Goal, Proof, ProofNode, ProofObject, Term};
