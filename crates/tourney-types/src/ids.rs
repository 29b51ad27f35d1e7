//! Identifiers used throughout the tournament ledger.
//!
//! Tournaments are addressed by a dense sequence number handed out by the
//! registry counter. Callers are addressed by the raw ed25519 public key of
//! the authenticated principal.

use std::{fmt, str::FromStr};

use ed25519_dalek::VerifyingKey;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::TourneyError;

// ---------------------------------------------------------------------------
// TournamentId
// ---------------------------------------------------------------------------

/// Dense, monotonically assigned tournament identifier.
///
/// Valid ids for a registry are exactly `0..counter`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub struct TournamentId(pub u64);

impl TournamentId {
    /// The id handed out after this one, or `None` if the counter is exhausted.
    #[must_use]
    pub fn checked_next(self) -> Option<Self> {
        self.0.checked_add(1).map(Self)
    }

    /// Index into the registry arena.
    #[must_use]
    pub fn index(self) -> Option<usize> {
        usize::try_from(self.0).ok()
    }
}

impl From<u64> for TournamentId {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

impl fmt::Display for TournamentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "tournament:{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// Identity
// ---------------------------------------------------------------------------

/// Authenticated caller identity: the raw ed25519 public key (32 bytes).
///
/// Signature verification happens upstream; the core only compares
/// identities for equality. Serialized as a lowercase hex string so it can
/// be used as a JSON map key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd)]
pub struct Identity(pub [u8; 32]);

impl Identity {
    #[must_use]
    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Identity of the holder of `key`.
    #[must_use]
    pub fn from_verifying_key(key: &VerifyingKey) -> Self {
        Self(key.to_bytes())
    }

    #[must_use]
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Full 64-char hex encoding.
    #[must_use]
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "id:{}", hex::encode(&self.0[..8]))
    }
}

impl FromStr for Identity {
    type Err = TourneyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.strip_prefix("0x").unwrap_or(s);
        let bytes = hex::decode(trimmed)
            .map_err(|e| TourneyError::MalformedIdentity(format!("{s}: {e}")))?;
        let bytes: [u8; 32] = bytes.try_into().map_err(|raw: Vec<u8>| {
            TourneyError::MalformedIdentity(format!("expected 32 bytes, got {}", raw.len()))
        })?;
        Ok(Self(bytes))
    }
}

impl Serialize for Identity {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Identity {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let encoded = String::deserialize(deserializer)?;
        encoded.parse().map_err(serde::de::Error::custom)
    }
}

/// Random identity backed by a freshly generated ed25519 key. **Tests only.**
#[cfg(any(test, feature = "test-helpers"))]
impl Identity {
    #[must_use]
    pub fn random() -> Self {
        let signing_key = ed25519_dalek::SigningKey::generate(&mut rand::rngs::OsRng);
        Self::from_verifying_key(&signing_key.verifying_key())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tournament_id_next() {
        assert_eq!(TournamentId(5).checked_next(), Some(TournamentId(6)));
        assert_eq!(TournamentId(u64::MAX).checked_next(), None);
    }

    #[test]
    fn tournament_id_display() {
        assert_eq!(TournamentId(3).to_string(), "tournament:3");
    }

    #[test]
    fn random_identities_differ() {
        assert_ne!(Identity::random(), Identity::random());
    }

    #[test]
    fn identity_hex_parse() {
        let id = Identity::from_bytes([0xAB; 32]);
        let parsed: Identity = id.to_hex().parse().unwrap();
        assert_eq!(parsed, id);

        let prefixed: Identity = format!("0x{}", id.to_hex()).parse().unwrap();
        assert_eq!(prefixed, id);
    }

    #[test]
    fn identity_parse_rejects_wrong_length() {
        let err = "abcd".parse::<Identity>().unwrap_err();
        assert!(matches!(err, TourneyError::MalformedIdentity(_)));
    }

    #[test]
    fn identity_parse_rejects_non_hex() {
        let err = "zz".repeat(32).parse::<Identity>().unwrap_err();
        assert!(matches!(err, TourneyError::MalformedIdentity(_)));
    }

    #[test]
    fn identity_serializes_as_hex_string() {
        let id = Identity::from_bytes([1; 32]);
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, format!("\"{}\"", "01".repeat(32)));
        let back: Identity = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }

    #[test]
    fn identity_from_verifying_key() {
        let key = ed25519_dalek::SigningKey::from_bytes(&[7u8; 32]).verifying_key();
        let id = Identity::from_verifying_key(&key);
        assert_eq!(id.as_bytes(), key.as_bytes());
        assert_eq!(id.to_string().len(), "id:".len() + 16);
    }
}
