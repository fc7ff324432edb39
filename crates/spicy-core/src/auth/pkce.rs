//! PKCE (Proof Key for Code Exchange) implementation
//!
//! RFC 7636: https://tools.ietf.org/html/rfc7636

use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use rand::RngCore;
use sha2::{Digest, Sha256};

/// Random bytes behind each verifier (encodes to 86 characters)
const VERIFIER_ENTROPY_BYTES: usize = 64;

/// PKCE code verifier, alive for a single login attempt
#[derive(Clone)]
pub struct PkceVerifier {
    verifier: String,
}

impl PkceVerifier {
    /// Generate a new random verifier
    pub fn new() -> Self {
        let mut bytes = [0u8; VERIFIER_ENTROPY_BYTES];
        rand::thread_rng().fill_bytes(&mut bytes);
        Self {
            verifier: URL_SAFE_NO_PAD.encode(bytes),
        }
    }

    /// Get the verifier string
    pub fn as_str(&self) -> &str {
        &self.verifier
    }

    /// Derive the S256 challenge for this verifier
    pub fn challenge(&self) -> PkceChallenge {
        let hash = Sha256::digest(self.verifier.as_bytes());
        PkceChallenge {
            challenge: URL_SAFE_NO_PAD.encode(hash),
        }
    }
}

impl Default for PkceVerifier {
    fn default() -> Self {
        Self::new()
    }
}

// The verifier is a secret until the exchange completes.
impl std::fmt::Debug for PkceVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PkceVerifier").finish_non_exhaustive()
    }
}

/// PKCE code challenge (base64url SHA-256 of the verifier, no padding)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PkceChallenge {
    challenge: String,
}

impl PkceChallenge {
    /// Challenge method sent alongside the challenge
    pub const METHOD: &'static str = "S256";

    /// Get the challenge string
    pub fn as_str(&self) -> &str {
        &self.challenge
    }
}

/// Generate a fresh verifier/challenge pair
pub fn generate() -> (PkceVerifier, PkceChallenge) {
    let verifier = PkceVerifier::new();
    let challenge = verifier.challenge();
    (verifier, challenge)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verifier_generation() {
        let verifier = PkceVerifier::new();
        assert_eq!(verifier.as_str().len(), 86);
        assert!(
            verifier
                .as_str()
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        );
    }

    #[test]
    fn test_verifiers_are_unique() {
        let (a, _) = generate();
        let (b, _) = generate();
        assert_ne!(a.as_str(), b.as_str());
    }

    #[test]
    fn test_challenge_matches_rfc_example() {
        // RFC 7636 appendix B
        let verifier = PkceVerifier {
            verifier: "dBjftJeZ4CVP-mB92K27uhbUJU1p1r_wW1gFWFOEjXk".to_string(),
        };
        assert_eq!(
            verifier.challenge().as_str(),
            "E9Melhoa2OwvFrEMTJguCHaoeK1t8URWbuGJSstw-cM"
        );
    }

    #[test]
    fn test_challenge_has_no_padding() {
        let (_, challenge) = generate();
        assert_eq!(challenge.as_str().len(), 43);
        assert!(!challenge.as_str().contains('='));
    }

    #[test]
    fn test_debug_hides_verifier() {
        let verifier = PkceVerifier::new();
        let debug = format!("{:?}", verifier);
        assert!(!debug.contains(verifier.as_str()));
    }
}
