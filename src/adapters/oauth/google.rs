//! Google id_token verification against Google's published JWKs.

use async_trait::async_trait;
use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode, decode_header};
use reqwest::Client;
use tracing::error;

use crate::{
    app_error::{AppError, AppResult},
    use_cases::auth::{GoogleIdentity, GoogleTokenVerifier},
};

const GOOGLE_JWKS_URL: &str = "https://www.googleapis.com/oauth2/v3/certs";
const GOOGLE_ISSUERS: [&str; 2] = ["https://accounts.google.com", "accounts.google.com"];

/// Google OIDC claims from an id_token.
#[derive(Debug, serde::Deserialize)]
struct GoogleIdTokenClaims {
    /// Google user ID (stable identifier)
    sub: String,
    email: String,
    /// Whether the email has been verified by Google
    #[serde(default)]
    email_verified: bool,
    /// Authorized party (if present, should match client_id)
    #[serde(default)]
    azp: Option<String>,
}

#[derive(Debug, serde::Deserialize)]
struct GoogleJwks {
    keys: Vec<GoogleJwk>,
}

#[derive(Debug, serde::Deserialize)]
struct GoogleJwk {
    kid: String,
    n: String,
    e: String,
}

pub struct GoogleJwksVerifier {
    client: Client,
    client_id: String,
}

impl GoogleJwksVerifier {
    pub fn new(client_id: String) -> Self {
        Self {
            client: Client::new(),
            client_id,
        }
    }

    async fn fetch_jwks(&self) -> AppResult<GoogleJwks> {
        let response = self
            .client
            .get(GOOGLE_JWKS_URL)
            .send()
            .await
            .map_err(|e| {
                error!(error = %e, "Failed to fetch Google JWKs");
                AppError::Internal("Failed to fetch Google JWKs".into())
            })?;

        if !response.status().is_success() {
            return Err(AppError::Internal("Failed to fetch Google JWKs".into()));
        }

        response.json::<GoogleJwks>().await.map_err(|e| {
            error!(error = %e, "Failed to parse Google JWKs");
            AppError::Internal("Failed to parse Google JWKs".into())
        })
    }
}

// Token-shaped problems surface as a generic 400; the upstream detail is
// logged rather than echoed to the client.
fn rejected(reason: &str, detail: impl std::fmt::Display) -> AppError {
    error!(reason, detail = %detail, "Google id_token rejected");
    AppError::InvalidInput("Failed to authenticate with Google".into())
}

#[async_trait]
impl GoogleTokenVerifier for GoogleJwksVerifier {
    async fn verify(&self, id_token: &str) -> AppResult<GoogleIdentity> {
        let header = decode_header(id_token).map_err(|e| rejected("invalid header", e))?;
        let kid = header
            .kid
            .ok_or_else(|| rejected("missing kid", "no kid in id_token header"))?;

        let jwks = self.fetch_jwks().await?;
        let jwk = jwks
            .keys
            .iter()
            .find(|k| k.kid == kid)
            .ok_or_else(|| rejected("unknown kid", &kid))?;

        let decoding_key = DecodingKey::from_rsa_components(&jwk.n, &jwk.e)
            .map_err(|e| AppError::Internal(format!("Failed to create decoding key: {e}")))?;

        let mut validation = Validation::new(Algorithm::RS256);
        validation.set_audience(&[&self.client_id]);
        validation.set_issuer(&GOOGLE_ISSUERS);

        let token_data = decode::<GoogleIdTokenClaims>(id_token, &decoding_key, &validation)
            .map_err(|e| rejected("validation failed", e))?;
        let claims = token_data.claims;

        if let Some(azp) = &claims.azp {
            if azp != &self.client_id {
                return Err(rejected("azp mismatch", azp));
            }
        }

        if !claims.email_verified {
            return Err(rejected("email not verified", &claims.email));
        }

        Ok(GoogleIdentity {
            subject: claims.sub,
            email: claims.email,
            email_verified: claims.email_verified,
        })
    }
}
