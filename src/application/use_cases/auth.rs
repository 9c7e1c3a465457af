use std::sync::Arc;

use async_trait::async_trait;
use secrecy::SecretString;
use serde::Serialize;
use time::Duration;
use tracing::instrument;

use crate::app_error::{AppError, AppResult};
use crate::application::jwt;

/// Cost factor for bcrypt password hashing.
pub const BCRYPT_COST: u32 = 10;

/// Bcrypt at cost 10 takes on the order of 100ms, so it runs on the
/// blocking pool rather than an async worker.
pub(crate) async fn hash_password(password: &str) -> AppResult<String> {
    let password = password.to_owned();
    let hash = tokio::task::spawn_blocking(move || bcrypt::hash(password, BCRYPT_COST))
        .await
        .map_err(|e| AppError::Internal(format!("Hashing task failed: {e}")))??;
    Ok(hash)
}

pub(crate) async fn verify_password(password: &str, password_hash: &str) -> AppResult<bool> {
    let password = password.to_owned();
    let password_hash = password_hash.to_owned();
    let valid = tokio::task::spawn_blocking(move || bcrypt::verify(password, &password_hash))
        .await
        .map_err(|e| AppError::Internal(format!("Hashing task failed: {e}")))??;
    Ok(valid)
}

/// Identity record. A user always has a password hash, a Google subject id,
/// or both, never neither.
#[derive(Debug, Clone)]
pub struct User {
    pub id: i64,
    pub email: String,
    pub password_hash: Option<String>,
    pub google_id: Option<String>,
}

/// Client-facing view of a user.
#[derive(Debug, Clone, Serialize)]
pub struct PublicUser {
    pub id: i64,
    pub email: String,
}

impl From<&User> for PublicUser {
    fn from(user: &User) -> Self {
        PublicUser {
            id: user.id,
            email: user.email.clone(),
        }
    }
}

#[async_trait]
pub trait UserRepo: Send + Sync {
    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>>;
    async fn create_with_password(&self, email: &str, password_hash: &str) -> AppResult<User>;
    async fn create_with_google(&self, email: &str, google_id: &str) -> AppResult<User>;
    async fn set_google_id(&self, user_id: i64, google_id: &str) -> AppResult<()>;
    async fn set_password_by_email(&self, email: &str, password_hash: &str) -> AppResult<()>;
}

/// Verified identity extracted from a Google id_token.
#[derive(Debug, Clone)]
pub struct GoogleIdentity {
    pub subject: String,
    pub email: String,
    pub email_verified: bool,
}

#[async_trait]
pub trait GoogleTokenVerifier: Send + Sync {
    async fn verify(&self, id_token: &str) -> AppResult<GoogleIdentity>;
}

/// Session token plus the public view of the user it was issued for.
pub struct AuthenticatedUser {
    pub token: String,
    pub user: PublicUser,
}

pub struct AuthUseCases {
    repo: Arc<dyn UserRepo>,
    google: Arc<dyn GoogleTokenVerifier>,
    jwt_secret: SecretString,
    session_ttl: Duration,
}

impl AuthUseCases {
    pub fn new(
        repo: Arc<dyn UserRepo>,
        google: Arc<dyn GoogleTokenVerifier>,
        jwt_secret: SecretString,
        session_ttl: Duration,
    ) -> Self {
        Self {
            repo,
            google,
            jwt_secret,
            session_ttl,
        }
    }

    fn issue_session_for(&self, user: &User) -> AppResult<AuthenticatedUser> {
        let token = jwt::issue_session(user.id, &user.email, &self.jwt_secret, self.session_ttl)?;
        Ok(AuthenticatedUser {
            token,
            user: user.into(),
        })
    }

    #[instrument(skip(self, password))]
    pub async fn register(&self, email: &str, password: &str) -> AppResult<AuthenticatedUser> {
        if self.repo.find_by_email(email).await?.is_some() {
            return Err(AppError::Conflict("User already exists".into()));
        }

        let password_hash = hash_password(password).await?;
        let user = self.repo.create_with_password(email, &password_hash).await?;

        self.issue_session_for(&user)
    }

    #[instrument(skip(self, password))]
    pub async fn login(&self, email: &str, password: &str) -> AppResult<AuthenticatedUser> {
        let user = self
            .repo
            .find_by_email(email)
            .await?
            .ok_or_else(invalid_credentials)?;

        // Google-only accounts have nothing to compare against; steer the
        // client towards the OAuth login instead.
        let Some(password_hash) = &user.password_hash else {
            return Err(AppError::InvalidCredentials(
                "This account was created with Google. Please use \"Continue with Google\" to login."
                    .into(),
            ));
        };

        let valid = verify_password(password, password_hash).await?;
        if !valid {
            return Err(invalid_credentials());
        }

        self.issue_session_for(&user)
    }

    #[instrument(skip(self, id_token))]
    pub async fn google_login(&self, id_token: &str) -> AppResult<AuthenticatedUser> {
        let identity = self.google.verify(id_token).await?;

        let user = match self.repo.find_by_email(&identity.email).await? {
            None => {
                self.repo
                    .create_with_google(&identity.email, &identity.subject)
                    .await?
            }
            Some(existing) => {
                // Must not silently take over a password-only account.
                if existing.password_hash.is_some() && existing.google_id.is_none() {
                    return Err(AppError::Conflict(
                        "An account with this email already exists. Please login with your \
                         password or use \"Continue with Google\" if you registered with Google."
                            .into(),
                    ));
                }
                if existing.google_id.is_none() {
                    // Account linking: attach the subject id, keep the password.
                    self.repo.set_google_id(existing.id, &identity.subject).await?;
                }
                existing
            }
        };

        self.issue_session_for(&user)
    }
}

fn invalid_credentials() -> AppError {
    AppError::InvalidCredentials("Invalid credentials".into())
}
