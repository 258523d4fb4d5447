//! Identity verification gate
//!
//! Tracks which user identities have passed the external proof check. The
//! proof protocol itself is opaque to the core: a [`ProofVerifier`] is a
//! boolean oracle keyed by identity, and on success the gate records the
//! identity as verified exactly once. Verification never reverts.

use crate::types::UserId;
use crate::{Error, Result};
use chrono::{DateTime, Utc};
use dashmap::DashMap;

/// External identity-proof oracle.
///
/// The core never sees the proof format; it only learns whether the proof
/// checked out for the given identity.
pub trait ProofVerifier: Send + Sync {
    /// Check proof material for a user identity
    fn verify(&self, user: &UserId, proof: &[u8]) -> bool;
}

/// Precondition gate for all state-mutating operations
#[derive(Debug, Default)]
pub struct IdentityGate {
    /// Verified identities with their verification timestamp
    verified: DashMap<UserId, DateTime<Utc>>,
}

impl IdentityGate {
    /// Create an empty gate
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an identity as verified.
    ///
    /// Verifying twice is an explicit error, not a silent no-op.
    pub fn mark_verified(&self, user: &UserId) -> Result<()> {
        use dashmap::mapref::entry::Entry;

        match self.verified.entry(user.clone()) {
            Entry::Occupied(_) => Err(Error::AlreadyVerified(user.clone())),
            Entry::Vacant(entry) => {
                entry.insert(Utc::now());
                tracing::info!(user = %user, "identity verified");
                Ok(())
            }
        }
    }

    /// Fail with `NotVerified` unless the identity has been verified.
    /// No side effects.
    pub fn require_verified(&self, user: &UserId) -> Result<()> {
        if self.verified.contains_key(user) {
            Ok(())
        } else {
            Err(Error::NotVerified(user.clone()))
        }
    }

    /// Pure read
    pub fn is_verified(&self, user: &UserId) -> bool {
        self.verified.contains_key(user)
    }

    /// Number of verified identities
    pub fn verified_count(&self) -> usize {
        self.verified.len()
    }

    /// Run the external proof oracle and, on success, mark the identity
    /// verified. A rejected proof leaves the gate untouched.
    pub fn admit(&self, verifier: &dyn ProofVerifier, user: &UserId, proof: &[u8]) -> Result<()> {
        if !verifier.verify(user, proof) {
            tracing::warn!(user = %user, "identity proof rejected");
            return Err(Error::NotVerified(user.clone()));
        }
        self.mark_verified(user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct StubVerifier {
        accept: bool,
    }

    impl ProofVerifier for StubVerifier {
        fn verify(&self, _user: &UserId, _proof: &[u8]) -> bool {
            self.accept
        }
    }

    #[test]
    fn test_mark_and_require() {
        let gate = IdentityGate::new();
        let alice = UserId::new("alice");

        assert_eq!(
            gate.require_verified(&alice),
            Err(Error::NotVerified(alice.clone()))
        );

        gate.mark_verified(&alice).unwrap();
        assert!(gate.require_verified(&alice).is_ok());
        assert!(gate.is_verified(&alice));
        assert_eq!(gate.verified_count(), 1);
    }

    #[test]
    fn test_double_verification_rejected() {
        let gate = IdentityGate::new();
        let alice = UserId::new("alice");

        gate.mark_verified(&alice).unwrap();
        assert_eq!(
            gate.mark_verified(&alice),
            Err(Error::AlreadyVerified(alice.clone()))
        );
        // Still verified after the rejection.
        assert!(gate.is_verified(&alice));
    }

    #[test]
    fn test_admit_accepts_valid_proof() {
        let gate = IdentityGate::new();
        let alice = UserId::new("alice");

        gate.admit(&StubVerifier { accept: true }, &alice, b"proof")
            .unwrap();
        assert!(gate.is_verified(&alice));
    }

    #[test]
    fn test_admit_rejects_bad_proof() {
        let gate = IdentityGate::new();
        let alice = UserId::new("alice");

        let result = gate.admit(&StubVerifier { accept: false }, &alice, b"junk");
        assert_eq!(result, Err(Error::NotVerified(alice.clone())));
        assert!(!gate.is_verified(&alice));
    }
}
