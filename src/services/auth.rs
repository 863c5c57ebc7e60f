// src/services/auth.rs

use bcrypt::{hash, verify};
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::UserRepository,
    models::auth::{Claims, User},
};

const TOKEN_TTL_DAYS: i64 = 7;

fn issue_token(secret: &str, user_id: Uuid, now: DateTime<Utc>) -> Result<String, AppError> {
    let expires_at = now + Duration::days(TOKEN_TTL_DAYS);
    let claims = Claims {
        sub: user_id,
        exp: expires_at.timestamp() as usize,
        iat: now.timestamp() as usize,
    };
    Ok(encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_ref()),
    )?)
}

fn decode_claims(secret: &str, token: &str) -> Result<Claims, AppError> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_ref()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|_| AppError::InvalidToken)
}

#[derive(Clone)]
pub struct AuthService {
    user_repo: UserRepository,
    jwt_secret: String,
    pool: PgPool,
}

impl AuthService {
    pub fn new(user_repo: UserRepository, jwt_secret: String, pool: PgPool) -> Self {
        Self { user_repo, jwt_secret, pool }
    }

    pub async fn register_user(&self, email: &str, password: &str) -> Result<String, AppError> {
        // bcrypt é caro: roda fora do runtime assíncrono
        let password_clone = password.to_owned();
        let hashed_password = tokio::task::spawn_blocking(move || {
            hash(&password_clone, bcrypt::DEFAULT_COST)
        })
        .await
        .map_err(|e| anyhow::anyhow!("Falha na task de hashing: {}", e))??;

        let new_user = self
            .user_repo
            .create_user(&self.pool, email, &hashed_password)
            .await?;

        tracing::info!(user_id = %new_user.id, "Novo usuário registrado");
        issue_token(&self.jwt_secret, new_user.id, Utc::now())
    }

    pub async fn login_user(&self, email: &str, password: &str) -> Result<String, AppError> {
        let user = self
            .user_repo
            .find_by_email(email)
            .await?
            .ok_or(AppError::InvalidCredentials)?;

        let password_clone = password.to_owned();
        let password_hash_clone = user.password_hash.clone();

        let is_password_valid = tokio::task::spawn_blocking(move || {
            verify(&password_clone, &password_hash_clone)
        })
        .await
        .map_err(|e| anyhow::anyhow!("Falha na task de verificação de senha: {}", e))??;

        if !is_password_valid {
            return Err(AppError::InvalidCredentials);
        }

        issue_token(&self.jwt_secret, user.id, Utc::now())
    }

    pub async fn validate_token(&self, token: &str) -> Result<User, AppError> {
        let claims = decode_claims(&self.jwt_secret, token)?;

        self.user_repo
            .find_by_id(claims.sub)
            .await?
            .ok_or(AppError::UserNotFound)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_carries_the_user_and_a_week_of_validity() {
        let user_id = Uuid::new_v4();
        let now = Utc::now();
        let token = issue_token("segredo", user_id, now).unwrap();

        let claims = decode_claims("segredo", &token).unwrap();
        assert_eq!(claims.sub, user_id);
        assert_eq!(claims.exp - claims.iat, 7 * 24 * 60 * 60);
    }

    #[test]
    fn token_signed_with_another_secret_is_rejected() {
        let token = issue_token("segredo", Uuid::new_v4(), Utc::now()).unwrap();
        assert!(matches!(
            decode_claims("outro", &token),
            Err(AppError::InvalidToken)
        ));
    }

    #[test]
    fn expired_token_is_rejected() {
        let issued = Utc::now() - Duration::days(TOKEN_TTL_DAYS + 1);
        let token = issue_token("segredo", Uuid::new_v4(), issued).unwrap();
        assert!(matches!(
            decode_claims("segredo", &token),
            Err(AppError::InvalidToken)
        ));
    }

    #[test]
    fn garbage_is_not_a_token() {
        assert!(decode_claims("segredo", "nao.e.jwt").is_err());
    }
}
