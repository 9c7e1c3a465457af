use std::env;
use std::net::SocketAddr;

use axum::http::HeaderValue;
use secrecy::SecretString;
use time::Duration;

pub struct AppConfig {
    pub jwt_secret: SecretString,
    pub session_ttl: Duration,
    pub reset_token_ttl: Duration,
    pub otp_ttl_minutes: i64,
    pub database_url: String,
    pub google_client_id: String,
    pub resend_api_key: SecretString,
    pub email_from: String,
    pub bind_addr: SocketAddr,
    pub cors_origin: HeaderValue,
}

impl AppConfig {
    /// Missing required variables are fatal at boot.
    pub fn from_env() -> Self {
        let jwt_secret = SecretString::new(
            env::var("JWT_SECRET").expect("JWT_SECRET must be set").into(),
        );
        let database_url = env::var("DATABASE_URL").expect("DATABASE_URL must be set");
        let google_client_id =
            env::var("GOOGLE_CLIENT_ID").expect("GOOGLE_CLIENT_ID must be set");
        let resend_api_key = SecretString::new(
            env::var("RESEND_API_KEY").expect("RESEND_API_KEY must be set").into(),
        );
        let email_from = env::var("EMAIL_FROM").expect("EMAIL_FROM must be set");

        let session_ttl_hours: i64 = env::var("SESSION_TTL_HOURS")
            .unwrap_or("24".to_string())
            .parse()
            .expect("SESSION_TTL_HOURS must be a valid number");

        let reset_token_ttl_minutes: i64 = env::var("RESET_TOKEN_TTL_MINUTES")
            .unwrap_or("10".to_string())
            .parse()
            .expect("RESET_TOKEN_TTL_MINUTES must be a valid number");

        let otp_ttl_minutes: i64 = env::var("OTP_TTL_MINUTES")
            .unwrap_or("5".to_string())
            .parse()
            .expect("OTP_TTL_MINUTES must be a valid number");

        let bind_addr: SocketAddr = env::var("BIND_ADDR")
            .unwrap_or("127.0.0.1:5000".to_string())
            .parse()
            .expect("BIND_ADDR must be a valid socket address");

        let cors_origin: HeaderValue = env::var("CORS_ORIGIN")
            .unwrap_or("http://localhost:3000".to_string())
            .parse()
            .expect("CORS_ORIGIN must be a valid header value");

        Self {
            jwt_secret,
            session_ttl: Duration::hours(session_ttl_hours),
            reset_token_ttl: Duration::minutes(reset_token_ttl_minutes),
            otp_ttl_minutes,
            database_url,
            google_client_id,
            resend_api_key,
            email_from,
            bind_addr,
            cors_origin,
        }
    }
}
