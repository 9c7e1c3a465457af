use crate::{
    adapters::{
        email::resend::ResendEmailSender,
        http::app_state::AppState,
        oauth::google::GoogleJwksVerifier,
    },
    infra::{config::AppConfig, postgres_persistence},
    otp::InMemoryOtpStore,
    use_cases::{
        auth::{AuthUseCases, GoogleTokenVerifier, UserRepo},
        cart::{CartRepo, CartUseCases},
        catalog::{CatalogUseCases, ProductRepo},
        password_reset::{EmailSender, PasswordResetUseCases},
    },
};
use std::fs::File;
use std::sync::Arc;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

pub async fn init_app_state() -> anyhow::Result<AppState> {
    let config = AppConfig::from_env();

    let postgres_arc = Arc::new(postgres_persistence(&config.database_url).await?);

    let email = Arc::new(ResendEmailSender::new(
        config.resend_api_key.clone(),
        config.email_from.clone(),
    ));

    let google = Arc::new(GoogleJwksVerifier::new(config.google_client_id.clone()));

    let otp_store = Arc::new(InMemoryOtpStore::new());

    let auth_use_cases = AuthUseCases::new(
        postgres_arc.clone() as Arc<dyn UserRepo>,
        google as Arc<dyn GoogleTokenVerifier>,
        config.jwt_secret.clone(),
        config.session_ttl,
    );

    let password_reset_use_cases = PasswordResetUseCases::new(
        postgres_arc.clone() as Arc<dyn UserRepo>,
        otp_store,
        email as Arc<dyn EmailSender>,
        config.jwt_secret.clone(),
        config.otp_ttl_minutes,
        config.reset_token_ttl,
    );

    let catalog_use_cases = CatalogUseCases::new(postgres_arc.clone() as Arc<dyn ProductRepo>);

    let cart_use_cases = CartUseCases::new(
        postgres_arc.clone() as Arc<dyn CartRepo>,
        postgres_arc as Arc<dyn ProductRepo>,
    );

    Ok(AppState {
        config: Arc::new(config),
        auth_use_cases: Arc::new(auth_use_cases),
        password_reset_use_cases: Arc::new(password_reset_use_cases),
        catalog_use_cases: Arc::new(catalog_use_cases),
        cart_use_cases: Arc::new(cart_use_cases),
    })
}

pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "storefront_api=debug,tower_http=debug".into());

    // Console (pretty logs)
    let console_layer = fmt::layer().with_target(false).with_level(true).pretty();

    // File (structured JSON logs)
    let file = File::create("app.log").expect("cannot create log file");
    let json_layer = fmt::layer()
        .json()
        .with_writer(file)
        .with_current_span(true)
        .with_span_list(true);

    tracing_subscriber::registry()
        .with(filter)
        .with(console_layer)
        .with(json_layer)
        .try_init()
        .ok();
}
