use std::sync::Arc;
use std::time::Duration;

use chrono::{TimeZone, Utc};
use jsonwebtoken::{encode, EncodingKey, Header};
use uuid::Uuid;

use crate::features::auth::{AccessClaims, JwtValidator};
use crate::features::categories::models::Category;

pub const TEST_JWT_SECRET: &str = "test-secret-do-not-use";

pub fn test_validator() -> Arc<JwtValidator> {
    Arc::new(JwtValidator::new(
        TEST_JWT_SECRET,
        None,
        Duration::from_secs(0),
    ))
}

/// Sign an HS256 token valid for one hour with the test secret
pub fn mint_token(sub: &str, role: Option<&str>, roles: &[&str]) -> String {
    let claims = AccessClaims {
        sub: sub.to_string(),
        email: Some(format!("{}@example.test", sub)),
        role: role.map(str::to_string),
        roles: roles.iter().map(|r| r.to_string()).collect(),
        iss: None,
        exp: (Utc::now().timestamp() + 3600) as u64,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(TEST_JWT_SECRET.as_bytes()),
    )
    .expect("test token should encode")
}

pub fn bearer(token: &str) -> String {
    format!("Bearer {}", token)
}

/// Build a category row with a deterministic timestamp derived from `seq`
pub fn category(id: Uuid, name: &str, slug: &str, parent_id: Option<Uuid>, seq: i64) -> Category {
    let at = Utc
        .timestamp_opt(1_700_000_000 + seq, 0)
        .single()
        .expect("valid timestamp");

    Category {
        id,
        parent_id,
        name: name.to_string(),
        slug: slug.to_string(),
        description: None,
        is_active: true,
        created_at: at,
        updated_at: at,
    }
}
