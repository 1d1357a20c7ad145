//! JWT issuing and validation (HS256)

use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use shared::models::User;

use crate::models::{Claims, UserRole};

pub fn encode_token(claims: &Claims, secret: &str) -> jsonwebtoken::errors::Result<String> {
    encode(
        &Header::new(Algorithm::HS256),
        claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
}

/// Verify signature and expiry and return the claims
pub fn decode_token(token: &str, secret: &str) -> jsonwebtoken::errors::Result<Claims> {
    let validation = Validation::new(Algorithm::HS256);
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )
    .map(|data| data.claims)
}

/// Issue a token for a stored user
///
/// Unknown role strings fall back to `user`, never to `admin`.
pub fn issue_for_user(
    user: &User,
    secret: &str,
    expiration_hours: i64,
) -> jsonwebtoken::errors::Result<String> {
    let role = user.role.parse().unwrap_or(UserRole::User);
    let claims = Claims::new(user.id.clone(), user.email.clone(), role, expiration_hours);
    encode_token(&claims, secret)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "q8Zr2LkP0vXy7NwB4tHs9JcM1fGd6AeU";

    #[test]
    fn test_round_trip() {
        let claims = Claims::new("u1".to_string(), "a@b.co".to_string(), UserRole::Admin, 1);
        let token = encode_token(&claims, SECRET).unwrap();
        let decoded = decode_token(&token, SECRET).unwrap();
        assert_eq!(decoded.sub, "u1");
        assert_eq!(decoded.role, UserRole::Admin);
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let claims = Claims::new("u1".to_string(), "a@b.co".to_string(), UserRole::User, 1);
        let token = encode_token(&claims, SECRET).unwrap();
        assert!(decode_token(&token, "some_other_secret_value_0123456789").is_err());
    }

    #[test]
    fn test_expired_token_rejected() {
        let mut claims = Claims::new("u1".to_string(), "a@b.co".to_string(), UserRole::User, 1);
        claims.iat -= 10 * 3600;
        claims.exp = claims.iat + 3600;
        let token = encode_token(&claims, SECRET).unwrap();
        assert!(decode_token(&token, SECRET).is_err());
    }

    #[test]
    fn test_garbage_rejected() {
        assert!(decode_token("not.a.jwt", SECRET).is_err());
    }
}
