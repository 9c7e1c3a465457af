//! One-time codes for the password-reset flow.
//!
//! One active code per email: a new `put` overwrites whatever was stored
//! before, without checking whether the old code was still valid. A matching
//! `verify` consumes the entry; a mismatch leaves it in place so the user can
//! retry until expiry.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use rand::Rng;
use thiserror::Error;
use tokio::sync::Mutex;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum OtpError {
    #[error("OTP not found or expired")]
    NotFound,

    #[error("OTP expired")]
    Expired,

    #[error("Invalid OTP")]
    Mismatch,
}

/// Keyed code store injected into the reset flow. The in-process
/// implementation below is only suitable for a single instance; a
/// multi-instance deployment needs a shared expiring store behind the
/// same trait.
#[async_trait]
pub trait OtpStore: Send + Sync {
    async fn put(&self, email: &str, code: &str, ttl: Duration);
    async fn verify(&self, email: &str, code: &str) -> Result<(), OtpError>;
}

/// Generates a 6-digit code, uniform over the inclusive range 100000-999999.
pub fn generate_code() -> String {
    rand::thread_rng().gen_range(100_000..=999_999).to_string()
}

struct OtpEntry {
    code: String,
    expires_at: DateTime<Utc>,
}

#[derive(Default)]
pub struct InMemoryOtpStore {
    entries: Mutex<HashMap<String, OtpEntry>>,
}

impl InMemoryOtpStore {
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    pub async fn contains(&self, email: &str) -> bool {
        self.entries.lock().await.contains_key(email)
    }
}

#[async_trait]
impl OtpStore for InMemoryOtpStore {
    async fn put(&self, email: &str, code: &str, ttl: Duration) {
        let entry = OtpEntry {
            code: code.to_string(),
            expires_at: Utc::now() + ttl,
        };
        self.entries.lock().await.insert(email.to_string(), entry);
    }

    async fn verify(&self, email: &str, code: &str) -> Result<(), OtpError> {
        let mut entries = self.entries.lock().await;
        let entry = entries.get(email).ok_or(OtpError::NotFound)?;

        if Utc::now() > entry.expires_at {
            entries.remove(email);
            return Err(OtpError::Expired);
        }

        if entry.code != code {
            // Entry stays put: the user may retry until expiry.
            return Err(OtpError::Mismatch);
        }

        entries.remove(email);
        Ok(())
    }
}
