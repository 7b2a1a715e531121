use base64::Engine;
use lingo_db::{session, user};
use lingo_entity::session::Model as Session;
use lingo_entity::user::Model as User;
use ring::rand::{self, SecureRandom};
use ring::{digest, pbkdf2};
use sea_orm::{ConnectionTrait, TransactionTrait};
use std::num::NonZeroU32;
use std::sync::LazyLock;
use uuid::Uuid;

pub mod error;

use error::AuthError;

const PBKDF2_ALG: pbkdf2::Algorithm = pbkdf2::PBKDF2_HMAC_SHA256;
const PBKDF2_ITERATIONS: NonZeroU32 = NonZeroU32::new(100_000).unwrap();
const SALT_LEN: usize = 16;
const HASH_LEN: usize = digest::SHA256_OUTPUT_LEN;

/// Server-wide secrets for credential handling. The signing secret is used
/// as a pepper mixed into every password hash.
#[derive(Debug, Clone)]
pub struct SecurityConfig {
    pepper: String,
}

impl SecurityConfig {
    #[must_use]
    pub fn new<S: Into<String>>(signing_secret: S) -> Self {
        Self {
            pepper: signing_secret.into(),
        }
    }
}

/// 3-20 characters, ascii alphanumeric and underscore only.
#[must_use]
pub fn validate_username(username: &str) -> bool {
    (3..=20).contains(&username.len()) && username.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// At least 8 characters with at least one letter and one digit.
#[must_use]
pub fn validate_password(password: &str) -> bool {
    password.len() >= 8
        && password.chars().any(|c| c.is_ascii_alphabetic())
        && password.chars().any(|c| c.is_ascii_digit())
}

fn generate_salt() -> String {
    let rng = rand::SystemRandom::new();
    let mut bytes = [0u8; SALT_LEN];
    rng.fill(&mut bytes).expect("failed to generate random bytes");
    base64::engine::general_purpose::STANDARD.encode(bytes)
}

fn salt_material(salt_b64: &str, security: &SecurityConfig) -> Vec<u8> {
    let mut material = base64::engine::general_purpose::STANDARD
        .decode(salt_b64)
        .unwrap_or_else(|_| salt_b64.as_bytes().to_vec());
    material.extend_from_slice(security.pepper.as_bytes());
    material
}

fn hash_password(password: &str, salt_b64: &str, security: &SecurityConfig) -> String {
    let mut out = [0u8; HASH_LEN];
    pbkdf2::derive(
        PBKDF2_ALG,
        PBKDF2_ITERATIONS,
        &salt_material(salt_b64, security),
        password.as_bytes(),
        &mut out,
    );
    base64::engine::general_purpose::STANDARD.encode(out)
}

/// Constant-time verification via ring's comparison.
fn verify_password(password: &str, salt_b64: &str, hash_b64: &str, security: &SecurityConfig) -> bool {
    let Ok(expected) = base64::engine::general_purpose::STANDARD.decode(hash_b64) else {
        return false;
    };
    pbkdf2::verify(
        PBKDF2_ALG,
        PBKDF2_ITERATIONS,
        &salt_material(salt_b64, security),
        password.as_bytes(),
        &expected,
    )
    .is_ok()
}

// Burned when the username is unknown so that sign-in failures take the
// same time either way.
static DUMMY_SALT: LazyLock<String> = LazyLock::new(generate_salt);

#[derive(Debug, Clone)]
pub struct AuthConfig {
    pub security: SecurityConfig,
    pub session_ttl_days: i64,
}

pub async fn register<C: ConnectionTrait>(
    conn: &C,
    auth: &AuthConfig,
    username: &str,
    password: &str,
) -> Result<(User, Session), AuthError> {
    if !validate_username(username) {
        return Err(AuthError::InvalidUsername);
    }
    if !validate_password(password) {
        return Err(AuthError::WeakPassword);
    }
    if user::Query::username_taken(conn, username, None).await? {
        return Err(AuthError::UsernameTaken);
    }

    let salt = generate_salt();
    let hash = hash_password(password, &salt, &auth.security);
    let created = user::Mutation::create_user(conn, username, &hash, &salt).await?;
    let session = session::Mutation::create_session(conn, created.id, username, auth.session_ttl_days).await?;

    tracing::info!(user = %created.id, "registered new user");
    Ok((created, session))
}

pub async fn sign_in<C: ConnectionTrait>(
    conn: &C,
    auth: &AuthConfig,
    username: &str,
    password: &str,
) -> Result<(User, Session), AuthError> {
    let Some(found) = user::Query::find_by_username(conn, username).await? else {
        // Equalize timing with the found-user path.
        let _ = hash_password(password, &DUMMY_SALT, &auth.security);
        return Err(AuthError::InvalidCredentials);
    };

    if !verify_password(password, &found.password_salt, &found.password_hash, &auth.security) {
        return Err(AuthError::InvalidCredentials);
    }

    user::Mutation::update_last_login(conn, found.id).await?;
    let session = session::Mutation::create_session(conn, found.id, &found.username, auth.session_ttl_days).await?;

    tracing::debug!(user = %found.id, "user signed in");
    Ok((found, session))
}

pub async fn update_username<C: ConnectionTrait>(
    conn: &C,
    user_id: Uuid,
    new_username: &str,
) -> Result<(), AuthError> {
    if !validate_username(new_username) {
        return Err(AuthError::InvalidUsername);
    }
    if user::Query::username_taken(conn, new_username, Some(user_id)).await? {
        return Err(AuthError::UsernameTaken);
    }
    user::Mutation::update_username(conn, user_id, new_username).await?;
    Ok(())
}

/// Verifies the current password, rotates the stored hash, revokes every
/// session of the user and issues a single fresh one.
pub async fn change_password<C: ConnectionTrait>(
    conn: &C,
    auth: &AuthConfig,
    user_id: Uuid,
    current_password: &str,
    new_password: &str,
) -> Result<Session, AuthError> {
    if !validate_password(new_password) {
        return Err(AuthError::WeakPassword);
    }
    let found = user::Query::find_by_id(conn, user_id).await?.ok_or(AuthError::UserNotFound)?;
    if !verify_password(current_password, &found.password_salt, &found.password_hash, &auth.security) {
        return Err(AuthError::InvalidCredentials);
    }

    let salt = generate_salt();
    let hash = hash_password(new_password, &salt, &auth.security);
    user::Mutation::update_password(conn, user_id, &hash, &salt).await?;
    session::Mutation::deactivate_all_for_user(conn, user_id).await?;
    let session = session::Mutation::create_session(conn, user_id, &found.username, auth.session_ttl_days).await?;

    tracing::info!(user = %user_id, "password changed, sessions revoked");
    Ok(session)
}

pub async fn delete_account<C: ConnectionTrait + TransactionTrait>(
    conn: &C,
    auth: &AuthConfig,
    user_id: Uuid,
    password: &str,
) -> Result<(), AuthError> {
    let found = user::Query::find_by_id(conn, user_id).await?.ok_or(AuthError::UserNotFound)?;
    if !verify_password(password, &found.password_salt, &found.password_hash, &auth.security) {
        return Err(AuthError::InvalidCredentials);
    }
    user::Mutation::delete_cascade(conn, user_id).await?;
    tracing::info!(user = %user_id, "account deleted");
    Ok(())
}

/// Idempotent sign-out.
pub async fn sign_out<C: ConnectionTrait>(conn: &C, token: &str) -> Result<(), AuthError> {
    session::Mutation::deactivate(conn, token).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn security() -> SecurityConfig {
        SecurityConfig::new("test-secret")
    }

    #[test]
    fn test_username_rules() {
        assert!(validate_username("abc"));
        assert!(validate_username("test_435"));
        assert!(validate_username("A_1"));
        assert!(!validate_username("ab"));
        assert!(!validate_username("a".repeat(21).as_str()));
        assert!(!validate_username("with space"));
        assert!(!validate_username("dash-ed"));
        assert!(!validate_username(""));
    }

    #[test]
    fn test_password_rules() {
        assert!(validate_password("abcd1234"));
        assert!(validate_password("l0ngerpassword"));
        assert!(!validate_password("short1"));
        assert!(!validate_password("allletters"));
        assert!(!validate_password("12345678"));
    }

    #[test]
    fn test_hash_round_trip() {
        let salt = generate_salt();
        let hash = hash_password("abcd1234", &salt, &security());
        assert!(verify_password("abcd1234", &salt, &hash, &security()));
        assert!(!verify_password("abcd1235", &salt, &hash, &security()));
    }

    #[test]
    fn test_hash_depends_on_salt_and_pepper() {
        let salt_a = generate_salt();
        let salt_b = generate_salt();
        assert_ne!(
            hash_password("abcd1234", &salt_a, &security()),
            hash_password("abcd1234", &salt_b, &security())
        );
        assert_ne!(
            hash_password("abcd1234", &salt_a, &security()),
            hash_password("abcd1234", &salt_a, &SecurityConfig::new("other-secret"))
        );
    }
}
