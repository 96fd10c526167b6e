//! Proof-verifier doubles for simulation and tests.

use std::collections::HashSet;

use hongbao_core::{Hash32, ProofVerifier, ZkProof};

/// Verifier that accepts a fixed set of first public signals.
///
/// Stands in for the Groth16 verifier: a password-gated claim passes when
/// the distribution's stored hash lock is in the accept set, so tests model
/// "right password" by accepting the lock and "wrong password" by not.
pub struct StaticVerifier {
    accepted: HashSet<Hash32>,
}

impl StaticVerifier {
    pub fn accepting<I: IntoIterator<Item = Hash32>>(signals: I) -> Self {
        Self {
            accepted: signals.into_iter().collect(),
        }
    }

    pub fn reject_all() -> Self {
        Self {
            accepted: HashSet::new(),
        }
    }
}

impl ProofVerifier for StaticVerifier {
    fn verify_proof(&self, _proof: &ZkProof, public_signals: &[Hash32]) -> bool {
        public_signals
            .first()
            .is_some_and(|signal| self.accepted.contains(signal))
    }
}
