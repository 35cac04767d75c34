//! Capture/stream session gates. Neither capture nor stream is ever
//! default-on: every precondition must be explicit, or the session
//! fails closed with a receipt recording exactly which gate tripped.

use crate::receipt::{emit_receipt, gate, Gate, Receipt};

#[derive(Debug, Clone)]
pub struct CapturePolicy {
    pub enabled: bool,
    pub consent_recorded: bool,
    pub governance_token: Option<String>,
}

#[derive(Debug, Clone)]
pub struct StreamPolicy {
    pub enabled: bool,
    pub governance_token: Option<String>,
    pub scope: String,
}

fn bool_gate(name: &str, ok: bool, detail: &str) -> Gate {
    gate(name, if ok { "pass" } else { "fail" }, Some(detail.to_string()))
        .expect("pass/fail are always valid gate statuses")
}

/// Starts a capture session, or fails closed with a receipt naming the
/// first unmet precondition (RW-C2).
pub fn start_capture(policy: &CapturePolicy, timestamp: impl Into<String>) -> Receipt {
    let gates = vec![
        bool_gate("enabled", policy.enabled, "capture.enabled must be true"),
        bool_gate(
            "consent",
            policy.consent_recorded,
            "capture requires recorded consent",
        ),
        bool_gate(
            "governance_token",
            policy.governance_token.as_deref().is_some_and(|t| !t.is_empty()),
            "capture requires a governance token",
        ),
    ];
    emit_receipt(
        "capture.start",
        None,
        vec!["RW-C2".to_string(), "RW-C3".to_string()],
        gates,
        timestamp,
    )
}

/// Starts a stream session, or fails closed with a receipt naming the
/// first unmet precondition (RW-C3).
pub fn start_stream(policy: &StreamPolicy, timestamp: impl Into<String>) -> Receipt {
    let gates = vec![
        bool_gate("enabled", policy.enabled, "stream.enabled must be true"),
        bool_gate(
            "governance_token",
            policy.governance_token.as_deref().is_some_and(|t| !t.is_empty()),
            "stream requires a governance token",
        ),
        bool_gate(
            "scope",
            policy.scope != "none",
            "stream scope must not be \"none\"",
        ),
    ];
    emit_receipt("stream.start", None, vec!["RW-C3".to_string()], gates, timestamp)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn capture_with_every_precondition_passes() {
        let policy = CapturePolicy {
            enabled: true,
            consent_recorded: true,
            governance_token: Some("tok".to_string()),
        };
        let receipt = start_capture(&policy, "t");
        assert!(receipt.passed);
    }

    #[test]
    fn capture_without_consent_fails_closed() {
        let policy = CapturePolicy {
            enabled: true,
            consent_recorded: false,
            governance_token: Some("tok".to_string()),
        };
        let receipt = start_capture(&policy, "t");
        assert!(!receipt.passed);
    }

    #[test]
    fn there_is_no_default_on_capture() {
        let policy = CapturePolicy {
            enabled: false,
            consent_recorded: true,
            governance_token: Some("tok".to_string()),
        };
        let receipt = start_capture(&policy, "t");
        assert!(!receipt.passed);
    }

    #[test]
    fn stream_with_scope_none_fails_closed() {
        let policy = StreamPolicy {
            enabled: true,
            governance_token: Some("tok".to_string()),
            scope: "none".to_string(),
        };
        let receipt = start_stream(&policy, "t");
        assert!(!receipt.passed);
    }

    #[test]
    fn stream_with_a_real_scope_and_token_passes() {
        let policy = StreamPolicy {
            enabled: true,
            governance_token: Some("tok".to_string()),
            scope: "audio".to_string(),
        };
        let receipt = start_stream(&policy, "t");
        assert!(receipt.passed);
    }
}
