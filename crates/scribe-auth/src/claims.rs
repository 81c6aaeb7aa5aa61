//! Token claims and the RS256 codec
//!
//! Signing uses the private key, verification the public key. There
//! are deliberately two read paths: `verify` performs full
//! cryptographic verification, while `decode` only requires the
//! structure to parse and is used during refresh, where the presented
//! access token may already be expired and the caller re-validates the
//! claims itself. Claim semantics (issuer, audience, subject shape)
//! are checked separately by `AuthService::validate_claims`.

use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Registered claims carried by both access and refresh tokens.
///
/// Fields default on deserialization so that a structurally sparse
/// token still decodes; claim-semantics validation rejects the holes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenClaims {
    #[serde(default)]
    pub iss: String,
    #[serde(default)]
    pub sub: String,
    #[serde(default)]
    pub aud: Vec<String>,
    #[serde(default)]
    pub iat: i64,
    #[serde(default)]
    pub nbf: i64,
    #[serde(default)]
    pub exp: i64,
    /// Unique token id; doubles as the session-binding key.
    #[serde(default)]
    pub jti: String,
}

/// Token codec errors
#[derive(Debug, Error)]
pub enum TokenError {
    #[error("invalid key material: {0}")]
    Key(String),
    #[error("token signing failed: {0}")]
    Signing(String),
    #[error("token signature is invalid")]
    InvalidSignature,
    #[error("token is expired")]
    Expired,
    #[error("token is malformed")]
    Malformed,
}

/// RS256 signer/verifier over a fixed key pair.
///
/// Holds only immutable key material; safe to share across requests.
pub struct TokenCodec {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl TokenCodec {
    /// Build a codec from an RSA key pair in PEM format.
    pub fn from_rsa_pem(private_pem: &[u8], public_pem: &[u8]) -> Result<Self, TokenError> {
        Ok(Self {
            encoding_key: EncodingKey::from_rsa_pem(private_pem)
                .map_err(|e| TokenError::Key(e.to_string()))?,
            decoding_key: DecodingKey::from_rsa_pem(public_pem)
                .map_err(|e| TokenError::Key(e.to_string()))?,
        })
    }

    /// Sign claims into a compact token string.
    pub fn sign(&self, claims: &TokenClaims) -> Result<String, TokenError> {
        jsonwebtoken::encode(&Header::new(Algorithm::RS256), claims, &self.encoding_key)
            .map_err(|e| TokenError::Signing(e.to_string()))
    }

    /// Decode and cryptographically verify a token.
    ///
    /// Signature failures are reported as such regardless of what the
    /// claims contain; they never degrade into a claims error.
    pub fn verify(&self, token: &str) -> Result<TokenClaims, TokenError> {
        let mut validation = Validation::new(Algorithm::RS256);
        validation.validate_aud = false;

        let data = jsonwebtoken::decode::<TokenClaims>(token, &self.decoding_key, &validation)
            .map_err(|e| match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => TokenError::Expired,
                jsonwebtoken::errors::ErrorKind::InvalidSignature
                | jsonwebtoken::errors::ErrorKind::InvalidAlgorithm => TokenError::InvalidSignature,
                _ => TokenError::Malformed,
            })?;

        Ok(data.claims)
    }

    /// Decode a token tolerantly: expiry and signature validity are
    /// ignored as long as the structure parses. Never trust the result
    /// without independent re-validation.
    pub fn decode(&self, token: &str) -> Result<TokenClaims, TokenError> {
        let mut validation = Validation::new(Algorithm::RS256);
        validation.insecure_disable_signature_validation();
        validation.validate_exp = false;
        validation.validate_nbf = false;
        validation.validate_aud = false;
        validation.required_spec_claims.clear();

        let data = jsonwebtoken::decode::<TokenClaims>(token, &self.decoding_key, &validation)
            .map_err(|_| TokenError::Malformed)?;

        Ok(data.claims)
    }
}

/// Extract the token from a bearer-scheme Authorization header value.
pub fn extract_bearer_token(authorization: &str) -> Option<&str> {
    let rest = authorization.strip_prefix("Bearer ")?.trim();
    if rest.is_empty() {
        None
    } else {
        Some(rest)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PRIVATE_PEM: &[u8] = include_bytes!("../testdata/rsa_test_private.pem");
    const PUBLIC_PEM: &[u8] = include_bytes!("../testdata/rsa_test_public.pem");

    fn codec() -> TokenCodec {
        TokenCodec::from_rsa_pem(PRIVATE_PEM, PUBLIC_PEM).unwrap()
    }

    fn claims(exp_offset_secs: i64) -> TokenClaims {
        let now = chrono::Utc::now().timestamp();
        TokenClaims {
            iss: "api.test".into(),
            sub: "d4b0c1f8-0000-4000-8000-000000000001".into(),
            aud: vec!["test".into()],
            iat: now,
            nbf: now,
            exp: now + exp_offset_secs,
            jti: "jti-1".into(),
        }
    }

    #[test]
    fn test_sign_verify_roundtrip() {
        let codec = codec();
        let claims = claims(3600);
        let token = codec.sign(&claims).unwrap();
        let decoded = codec.verify(&token).unwrap();
        assert_eq!(decoded, claims);
    }

    #[test]
    fn test_tampered_signature_is_a_signature_error() {
        let codec = codec();
        let token = codec.sign(&claims(3600)).unwrap();

        // flip one character inside the signature segment
        let sig_start = token.rfind('.').unwrap() + 1;
        let mut bytes = token.into_bytes();
        bytes[sig_start] = if bytes[sig_start] == b'A' { b'B' } else { b'A' };
        let tampered = String::from_utf8(bytes).unwrap();

        match codec.verify(&tampered) {
            Err(TokenError::InvalidSignature) => {}
            other => panic!("expected InvalidSignature, got {other:?}"),
        }
    }

    #[test]
    fn test_expired_token() {
        let codec = codec();
        let token = codec.sign(&claims(-3600)).unwrap();

        match codec.verify(&token) {
            Err(TokenError::Expired) => {}
            other => panic!("expected Expired, got {other:?}"),
        }
    }

    #[test]
    fn test_decode_tolerates_expiry() {
        let codec = codec();
        let claims = claims(-3600);
        let token = codec.sign(&claims).unwrap();
        assert_eq!(codec.decode(&token).unwrap(), claims);
    }

    #[test]
    fn test_decode_tolerates_bad_signature() {
        let codec = codec();
        let claims = claims(3600);
        let token = codec.sign(&claims).unwrap();

        let sig_start = token.rfind('.').unwrap() + 1;
        let mut bytes = token.into_bytes();
        bytes[sig_start] = if bytes[sig_start] == b'A' { b'B' } else { b'A' };
        let tampered = String::from_utf8(bytes).unwrap();

        assert_eq!(codec.decode(&tampered).unwrap(), claims);
    }

    #[test]
    fn test_garbage_is_malformed() {
        let codec = codec();
        match codec.verify("not-a-token") {
            Err(TokenError::Malformed) => {}
            other => panic!("expected Malformed, got {other:?}"),
        }
        match codec.decode("not-a-token") {
            Err(TokenError::Malformed) => {}
            other => panic!("expected Malformed, got {other:?}"),
        }
    }

    #[test]
    fn test_extract_bearer_token() {
        assert_eq!(extract_bearer_token("Bearer abc123"), Some("abc123"));
        assert_eq!(extract_bearer_token("Bearer "), None);
        assert_eq!(extract_bearer_token("Basic abc123"), None);
        assert_eq!(extract_bearer_token("abc123"), None);
    }
}
