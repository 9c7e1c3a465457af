use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::post,
};
use serde::{Deserialize, Serialize};

use crate::{
    adapters::http::app_state::AppState,
    app_error::{AppError, AppResult},
    use_cases::auth::PublicUser,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/google", post(google))
        .route("/forgot-password", post(forgot_password))
        .route("/verify-otp", post(verify_otp))
        .route("/reset-password", post(reset_password))
}

// Payload fields are optional so that absent fields surface as a 400 with a
// useful message instead of a body-rejection status.
#[derive(Deserialize)]
struct CredentialsPayload {
    email: Option<String>,
    password: Option<String>,
}

#[derive(Deserialize)]
struct GooglePayload {
    token: Option<String>,
}

#[derive(Deserialize)]
struct ForgotPasswordPayload {
    email: Option<String>,
}

#[derive(Deserialize)]
struct VerifyOtpPayload {
    email: Option<String>,
    otp: Option<String>,
}

#[derive(Deserialize)]
struct ResetPasswordPayload {
    #[serde(rename = "resetToken")]
    reset_token: Option<String>,
    #[serde(rename = "newPassword")]
    new_password: Option<String>,
}

#[derive(Serialize)]
struct AuthResponse {
    message: &'static str,
    token: String,
    user: PublicUser,
}

#[derive(Serialize)]
struct MessageResponse {
    message: &'static str,
}

#[derive(Serialize)]
struct VerifyOtpResponse {
    message: &'static str,
    #[serde(rename = "resetToken")]
    reset_token: String,
}

fn require<'a>(value: &'a Option<String>, msg: &str) -> AppResult<&'a str> {
    match value.as_deref() {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(AppError::InvalidInput(msg.into())),
    }
}

async fn register(
    State(app_state): State<AppState>,
    Json(payload): Json<CredentialsPayload>,
) -> AppResult<impl IntoResponse> {
    let email = require(&payload.email, "Email and password are required")?;
    let password = require(&payload.password, "Email and password are required")?;

    let authenticated = app_state.auth_use_cases.register(email, password).await?;

    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            message: "User created successfully",
            token: authenticated.token,
            user: authenticated.user,
        }),
    ))
}

async fn login(
    State(app_state): State<AppState>,
    Json(payload): Json<CredentialsPayload>,
) -> AppResult<impl IntoResponse> {
    let email = require(&payload.email, "Email and password are required")?;
    let password = require(&payload.password, "Email and password are required")?;

    let authenticated = app_state.auth_use_cases.login(email, password).await?;

    Ok(Json(AuthResponse {
        message: "Login successful",
        token: authenticated.token,
        user: authenticated.user,
    }))
}

async fn google(
    State(app_state): State<AppState>,
    Json(payload): Json<GooglePayload>,
) -> AppResult<impl IntoResponse> {
    let id_token = require(&payload.token, "Google token is required")?;

    let authenticated = app_state.auth_use_cases.google_login(id_token).await?;

    Ok(Json(AuthResponse {
        message: "Google authentication successful",
        token: authenticated.token,
        user: authenticated.user,
    }))
}

async fn forgot_password(
    State(app_state): State<AppState>,
    Json(payload): Json<ForgotPasswordPayload>,
) -> AppResult<impl IntoResponse> {
    let email = require(&payload.email, "Email is required")?;

    app_state
        .password_reset_use_cases
        .forgot_password(email)
        .await?;

    Ok(Json(MessageResponse {
        message: "OTP sent to your email",
    }))
}

async fn verify_otp(
    State(app_state): State<AppState>,
    Json(payload): Json<VerifyOtpPayload>,
) -> AppResult<impl IntoResponse> {
    let email = require(&payload.email, "Email and OTP are required")?;
    let otp = require(&payload.otp, "Email and OTP are required")?;

    let reset_token = app_state
        .password_reset_use_cases
        .verify_otp(email, otp)
        .await?;

    Ok(Json(VerifyOtpResponse {
        message: "OTP verified successfully",
        reset_token,
    }))
}

async fn reset_password(
    State(app_state): State<AppState>,
    Json(payload): Json<ResetPasswordPayload>,
) -> AppResult<impl IntoResponse> {
    let reset_token = require(
        &payload.reset_token,
        "Reset token and new password are required",
    )?;
    let new_password = require(
        &payload.new_password,
        "Reset token and new password are required",
    )?;

    app_state
        .password_reset_use_cases
        .reset_password(reset_token, new_password)
        .await?;

    Ok(Json(MessageResponse {
        message: "Password reset successfully",
    }))
}
