use std::sync::Arc;

use async_trait::async_trait;
use secrecy::SecretString;
use time::Duration;
use tracing::instrument;

use crate::app_error::{AppError, AppResult};
use crate::application::email_templates;
use crate::application::jwt;
use crate::application::use_cases::auth::{UserRepo, hash_password};
use crate::otp::{self, OtpError, OtpStore};

#[async_trait]
pub trait EmailSender: Send + Sync {
    async fn send(&self, to: &str, subject: &str, html: &str) -> AppResult<()>;
}

/// Orchestrates forgot-password -> verify-otp -> reset-password.
///
/// Per email the flow is a small state machine: a forgot-password request
/// parks a code in the OTP store, a correct verification consumes it and
/// hands out a purpose-scoped reset token, and the reset itself is proven by
/// that token alone. The reset token is stateless, so a holder can replay it
/// until it expires.
pub struct PasswordResetUseCases {
    repo: Arc<dyn UserRepo>,
    otp_store: Arc<dyn OtpStore>,
    email: Arc<dyn EmailSender>,
    jwt_secret: SecretString,
    otp_ttl_minutes: i64,
    reset_token_ttl: Duration,
}

impl PasswordResetUseCases {
    pub fn new(
        repo: Arc<dyn UserRepo>,
        otp_store: Arc<dyn OtpStore>,
        email: Arc<dyn EmailSender>,
        jwt_secret: SecretString,
        otp_ttl_minutes: i64,
        reset_token_ttl: Duration,
    ) -> Self {
        Self {
            repo,
            otp_store,
            email,
            jwt_secret,
            otp_ttl_minutes,
            reset_token_ttl,
        }
    }

    #[instrument(skip(self))]
    pub async fn forgot_password(&self, email: &str) -> AppResult<()> {
        // Only accounts that actually have a password are eligible; a
        // Google-only account has nothing to reset.
        let eligible = self
            .repo
            .find_by_email(email)
            .await?
            .is_some_and(|user| user.password_hash.is_some());
        if !eligible {
            return Err(AppError::NotFound);
        }

        let code = otp::generate_code();
        self.otp_store
            .put(email, &code, chrono::Duration::minutes(self.otp_ttl_minutes))
            .await;

        let (subject, html) =
            email_templates::password_reset_otp_email(&code, self.otp_ttl_minutes);
        self.email.send(email, &subject, &html).await
    }

    #[instrument(skip(self, code))]
    pub async fn verify_otp(&self, email: &str, code: &str) -> AppResult<String> {
        self.otp_store
            .verify(email, code)
            .await
            .map_err(|err| match err {
                OtpError::NotFound => AppError::InvalidInput("OTP not found or expired".into()),
                OtpError::Expired => AppError::InvalidInput("OTP expired".into()),
                OtpError::Mismatch => AppError::InvalidInput("Invalid OTP".into()),
            })?;

        // The only way to obtain a reset token.
        jwt::issue_reset(email, &self.jwt_secret, self.reset_token_ttl)
    }

    #[instrument(skip(self, reset_token, new_password))]
    pub async fn reset_password(&self, reset_token: &str, new_password: &str) -> AppResult<()> {
        let claims = jwt::verify_reset(reset_token, &self.jwt_secret)?;

        if claims.purpose != jwt::RESET_PURPOSE {
            return Err(AppError::InvalidInput("Invalid reset token".into()));
        }

        let password_hash = hash_password(new_password).await?;
        self.repo
            .set_password_by_email(&claims.email, &password_hash)
            .await
    }
}
