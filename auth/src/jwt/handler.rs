use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use chrono::Duration;
use chrono::Utc;
use jsonwebtoken::decode;
use jsonwebtoken::encode;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::Algorithm;
use jsonwebtoken::DecodingKey;
use jsonwebtoken::EncodingKey;
use jsonwebtoken::Header;
use jsonwebtoken::Validation;

use super::claims::Claims;
use super::errors::JwtError;
use super::errors::TokenError;

/// JWT token handler for issuing and verifying session tokens.
///
/// The signing algorithm is pinned to HS256. Tokens whose header names any
/// other algorithm, including `none`, are refused before signature checks.
pub struct JwtHandler {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    algorithm: Algorithm,
}

impl JwtHandler {
    const ALGORITHM: Algorithm = Algorithm::HS256;
    const ALGORITHM_NAME: &'static str = "HS256";

    /// Create a new JWT handler with a secret key.
    ///
    /// # Arguments
    /// * `secret` - Secret key for signing tokens
    ///
    /// # Errors
    /// * `MissingSecret` - The secret is empty
    ///
    /// # Security Notes
    /// - The secret should be at least 256 bits (32 bytes) for HS256
    /// - Load it from configuration at startup, never from code
    pub fn new(secret: &[u8]) -> Result<Self, JwtError> {
        if secret.is_empty() {
            return Err(JwtError::MissingSecret);
        }

        Ok(Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            algorithm: Self::ALGORITHM,
        })
    }

    /// Issue a token for `claims` that expires `ttl` from now.
    ///
    /// `iat` and `exp` of the given claims are overwritten.
    ///
    /// # Errors
    /// * `InvalidTtl` - `ttl` is zero or negative
    /// * `EncodingFailed` - Token encoding failed
    pub fn issue(&self, claims: Claims, ttl: Duration) -> Result<String, JwtError> {
        self.issue_with_claims(claims, ttl).map(|(token, _)| token)
    }

    /// Like [`JwtHandler::issue`], also returning the claims that were signed.
    pub fn issue_with_claims(
        &self,
        claims: Claims,
        ttl: Duration,
    ) -> Result<(String, Claims), JwtError> {
        if ttl <= Duration::zero() {
            return Err(JwtError::InvalidTtl(ttl.num_seconds()));
        }

        let claims = claims.valid_for(Utc::now().timestamp(), ttl);
        let token = self.encode(&claims)?;
        Ok((token, claims))
    }

    /// Sign an already populated claims set.
    ///
    /// # Errors
    /// * `EncodingFailed` - Token encoding failed
    pub fn encode(&self, claims: &Claims) -> Result<String, JwtError> {
        let header = Header::new(self.algorithm);

        encode(&header, claims, &self.encoding_key)
            .map_err(|e| JwtError::EncodingFailed(e.to_string()))
    }

    /// Verify a token against the current time.
    ///
    /// # Errors
    /// * `Malformed` - Token cannot be parsed into the expected claims
    /// * `BadSignature` - Wrong algorithm or HMAC mismatch
    /// * `Expired` - Expiry is not in the future
    pub fn verify(&self, token: &str) -> Result<Claims, TokenError> {
        self.verify_at(token, Utc::now().timestamp())
    }

    /// Verify a token as of `now` (Unix timestamp).
    pub fn verify_at(&self, token: &str, now: i64) -> Result<Claims, TokenError> {
        self.check_algorithm(token)?;

        let mut validation = Validation::new(self.algorithm);
        // Expiry is checked below without leeway; nothing else is validated.
        validation.validate_exp = false;
        validation.validate_aud = false;
        validation.required_spec_claims.clear();

        let claims = decode::<Claims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::InvalidSignature
                | ErrorKind::InvalidAlgorithm
                | ErrorKind::MissingAlgorithm => TokenError::BadSignature,
                ErrorKind::ExpiredSignature => TokenError::Expired,
                _ => TokenError::Malformed(e.to_string()),
            })?;

        if claims.is_expired(now) {
            return Err(TokenError::Expired);
        }

        Ok(claims)
    }

    fn check_algorithm(&self, token: &str) -> Result<(), TokenError> {
        let segments: Vec<&str> = token.split('.').collect();
        if segments.len() != 3 {
            return Err(TokenError::Malformed(format!(
                "expected 3 segments, got {}",
                segments.len()
            )));
        }

        let header_bytes = URL_SAFE_NO_PAD
            .decode(segments[0])
            .map_err(|e| TokenError::Malformed(format!("header encoding: {}", e)))?;
        let header: serde_json::Value = serde_json::from_slice(&header_bytes)
            .map_err(|e| TokenError::Malformed(format!("header json: {}", e)))?;

        match header.get("alg").and_then(serde_json::Value::as_str) {
            Some(Self::ALGORITHM_NAME) => Ok(()),
            Some(_) => Err(TokenError::BadSignature),
            None => Err(TokenError::Malformed("header has no alg".to_string())),
        }
    }
}
