use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// Claims the backend puts in its access tokens
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claims {
    #[serde(default)]
    pub user_id: Option<i64>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub exp: Option<i64>, // expiration timestamp
}

pub struct TokenService;

impl TokenService {
    /// Read token claims without verifying the signature.
    /// The signing secret lives on the server; the client only looks at `exp`.
    pub fn peek_claims(token: &str) -> Option<Claims> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.insecure_disable_signature_validation();
        validation.validate_exp = false;
        validation.required_spec_claims.clear();

        decode::<Claims>(token, &DecodingKey::from_secret(&[]), &validation)
            .map(|data| data.claims)
            .ok()
    }

    /// A token counts as expired only when it carries an `exp` in the past.
    /// Opaque tokens are judged by presence alone.
    pub fn is_expired(token: &str, now: OffsetDateTime) -> bool {
        match Self::peek_claims(token).and_then(|claims| claims.exp) {
            Some(exp) => exp <= now.unix_timestamp(),
            None => false,
        }
    }
}
