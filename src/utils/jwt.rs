use anyhow::Result;
use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

/// JWT Claims structure.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,  // Username or login id
    pub uid: i32,     // Account ID
    pub role: String, // "admin" or "operator"
    pub name: String, // Display name
    pub exp: usize,   // Expiration timestamp
}

/// Sign a new JWT token for an authenticated account.
pub fn sign(
    secret: &str,
    ttl_hours: i64,
    user_id: i32,
    subject: &str,
    role: &str,
    name: &str,
) -> Result<String> {
    let expiration = (Utc::now() + Duration::hours(ttl_hours)).timestamp();

    let claims = Claims {
        sub: subject.to_owned(),
        uid: user_id,
        role: role.to_owned(),
        name: name.to_owned(),
        exp: expiration as usize,
    };

    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )?;

    Ok(token)
}

/// Verify and decode a JWT token.
pub fn verify(secret: &str, token: &str) -> Result<Claims> {
    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )?;
    Ok(token_data.claims)
}
