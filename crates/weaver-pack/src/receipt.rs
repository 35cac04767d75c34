//! RW-C7: receipts. Every governance operation emits a receipt recording
//! which invariants it checked and whether each check passed.

use serde::{Deserialize, Serialize};
use weaver_primitives::ids;

use crate::error::PackError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GateStatus {
    Pass,
    Fail,
    Skip,
}

impl GateStatus {
    fn from_str(s: &str) -> Result<Self, PackError> {
        match s {
            "pass" => Ok(GateStatus::Pass),
            "fail" => Ok(GateStatus::Fail),
            "skip" => Ok(GateStatus::Skip),
            other => Err(PackError::InvalidGateStatus(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Gate {
    pub name: String,
    pub status: GateStatus,
    pub detail: Option<String>,
}

/// Constructs a gate, validating the status string up front so a
/// malformed caller fails closed instead of silently recording garbage.
pub fn gate(name: impl Into<String>, status: &str, detail: Option<String>) -> Result<Gate, PackError> {
    Ok(Gate {
        name: name.into(),
        status: GateStatus::from_str(status)?,
        detail,
    })
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Receipt {
    pub receipt_id: String,
    pub operation: String,
    pub subject_manifest_id: Option<String>,
    pub invariants_checked: Vec<String>,
    pub gates: Vec<Gate>,
    pub passed: bool,
    pub timestamp: String,
}

/// Emits a receipt for `operation`. `passed` is true iff no gate failed.
pub fn emit_receipt(
    operation: impl Into<String>,
    subject_manifest_id: Option<String>,
    invariants_checked: Vec<String>,
    gates: Vec<Gate>,
    timestamp: impl Into<String>,
) -> Receipt {
    let passed = gates.iter().all(|g| g.status != GateStatus::Fail);
    Receipt {
        receipt_id: ids::generate("RWRC"),
        operation: operation.into(),
        subject_manifest_id,
        invariants_checked,
        gates,
        passed,
        timestamp: timestamp.into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn an_invalid_gate_status_string_is_rejected() {
        let err = gate("check", "maybe", None).unwrap_err();
        assert!(matches!(err, PackError::InvalidGateStatus(_)));
    }

    #[test]
    fn a_receipt_fails_if_any_gate_fails() {
        let gates = vec![
            gate("schema", "pass", None).unwrap(),
            gate("hash", "fail", Some("mismatch".to_string())).unwrap(),
        ];
        let receipt = emit_receipt("verify", None, vec!["RW-C1".to_string()], gates, "t");
        assert!(!receipt.passed);
    }

    #[test]
    fn a_receipt_passes_when_every_gate_passes_or_skips() {
        let gates = vec![
            gate("schema", "pass", None).unwrap(),
            gate("optional", "skip", None).unwrap(),
        ];
        let receipt = emit_receipt("verify", None, vec!["RW-C1".to_string()], gates, "t");
        assert!(receipt.passed);
    }
}
