//! Identifier minting. Identifiers are never hash inputs and their
//! non-determinism is explicitly licensed: nothing in this workspace
//! depends on a generated ID's value for an invariant check.

use rand::RngCore;

/// Produces `"{prefix}-{16 hex chars}"`, e.g. `"RWMF-9f2c1a0b3d4e5f60"`.
pub fn generate(prefix: &str) -> String {
    let mut bytes = [0u8; 8];
    rand::thread_rng().fill_bytes(&mut bytes);
    let hex: String = bytes.iter().map(|b| format!("{:02x}", b)).collect();
    format!("{prefix}-{hex}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_ids_carry_the_prefix() {
        let id = generate("RWMF");
        assert!(id.starts_with("RWMF-"));
        assert_eq!(id.len(), "RWMF-".len() + 16);
    }

    #[test]
    fn generated_ids_are_not_reused() {
        let a = generate("X");
        let b = generate("X");
        assert_ne!(a, b);
    }
}
