use std::sync::Arc;

use axum::http::HeaderValue;
use secrecy::SecretString;
use time::Duration;

use crate::{
    adapters::http::app_state::AppState,
    application::jwt,
    infra::config::AppConfig,
    otp::InMemoryOtpStore,
    test_utils::{
        InMemoryCartRepo, InMemoryProductRepo, InMemoryUserRepo, RecordingEmailSender,
        StubGoogleVerifier,
    },
    use_cases::{
        auth::{AuthUseCases, GoogleIdentity, GoogleTokenVerifier, UserRepo},
        cart::{CartRepo, CartUseCases},
        catalog::{CatalogUseCases, ProductRepo},
        password_reset::{EmailSender, PasswordResetUseCases},
    },
};

// Low cost keeps the hashing in tests fast; production uses BCRYPT_COST.
const TEST_BCRYPT_COST: u32 = 4;

fn test_config() -> AppConfig {
    AppConfig {
        jwt_secret: SecretString::new("test_jwt_secret".into()),
        session_ttl: Duration::hours(24),
        reset_token_ttl: Duration::minutes(10),
        otp_ttl_minutes: 5,
        database_url: "postgres://unused".to_string(),
        google_client_id: "test-client-id".to_string(),
        resend_api_key: SecretString::new("test-api-key".into()),
        email_from: "Test Shop <shop@example.com>".to_string(),
        bind_addr: "127.0.0.1:5001".parse().unwrap(),
        cors_origin: HeaderValue::from_static("http://localhost:3000"),
    }
}

/// Builds an `AppState` backed entirely by in-memory fakes, handing the fakes
/// back alongside it so tests can seed and inspect them.
pub struct TestAppStateBuilder {
    users: Arc<InMemoryUserRepo>,
    products: Arc<InMemoryProductRepo>,
    cart: Arc<InMemoryCartRepo>,
    otp_store: Arc<InMemoryOtpStore>,
    emails: Arc<RecordingEmailSender>,
    google: Arc<StubGoogleVerifier>,
}

impl TestAppStateBuilder {
    pub fn new() -> Self {
        let products = Arc::new(InMemoryProductRepo::new());
        Self {
            users: Arc::new(InMemoryUserRepo::new()),
            cart: Arc::new(InMemoryCartRepo::new(products.clone())),
            products,
            otp_store: Arc::new(InMemoryOtpStore::new()),
            emails: Arc::new(RecordingEmailSender::new()),
            google: Arc::new(StubGoogleVerifier::new()),
        }
    }

    pub fn with_password_user(self, email: &str, password: &str) -> Self {
        let hash = bcrypt::hash(password, TEST_BCRYPT_COST).unwrap();
        self.users.seed(email, Some(hash), None);
        self
    }

    pub fn with_google_user(self, email: &str, google_id: &str) -> Self {
        self.users.seed(email, None, Some(google_id.to_string()));
        self
    }

    pub fn with_product(
        self,
        name: &str,
        price: f64,
        category: Option<&str>,
        stock: i32,
    ) -> Self {
        self.products.seed(name, price, category, stock);
        self
    }

    pub fn with_google_identity(self, identity: GoogleIdentity) -> Self {
        self.google.set_identity(identity);
        self
    }

    pub fn build(self) -> TestContext {
        let config = Arc::new(test_config());

        let auth_use_cases = AuthUseCases::new(
            self.users.clone() as Arc<dyn UserRepo>,
            self.google.clone() as Arc<dyn GoogleTokenVerifier>,
            config.jwt_secret.clone(),
            config.session_ttl,
        );

        let password_reset_use_cases = PasswordResetUseCases::new(
            self.users.clone() as Arc<dyn UserRepo>,
            self.otp_store.clone(),
            self.emails.clone() as Arc<dyn EmailSender>,
            config.jwt_secret.clone(),
            config.otp_ttl_minutes,
            config.reset_token_ttl,
        );

        let catalog_use_cases =
            CatalogUseCases::new(self.products.clone() as Arc<dyn ProductRepo>);

        let cart_use_cases = CartUseCases::new(
            self.cart.clone() as Arc<dyn CartRepo>,
            self.products.clone() as Arc<dyn ProductRepo>,
        );

        TestContext {
            app_state: AppState {
                config,
                auth_use_cases: Arc::new(auth_use_cases),
                password_reset_use_cases: Arc::new(password_reset_use_cases),
                catalog_use_cases: Arc::new(catalog_use_cases),
                cart_use_cases: Arc::new(cart_use_cases),
            },
            users: self.users,
            products: self.products,
            cart: self.cart,
            otp_store: self.otp_store,
            emails: self.emails,
            google: self.google,
        }
    }
}

impl Default for TestAppStateBuilder {
    fn default() -> Self {
        Self::new()
    }
}

pub struct TestContext {
    pub app_state: AppState,
    pub users: Arc<InMemoryUserRepo>,
    pub products: Arc<InMemoryProductRepo>,
    pub cart: Arc<InMemoryCartRepo>,
    pub otp_store: Arc<InMemoryOtpStore>,
    pub emails: Arc<RecordingEmailSender>,
    pub google: Arc<StubGoogleVerifier>,
}

impl TestContext {
    /// Mints a session token the way a successful login would.
    pub fn session_token_for(&self, user_id: i64, email: &str) -> String {
        jwt::issue_session(
            user_id,
            email,
            &self.app_state.config.jwt_secret,
            self.app_state.config.session_ttl,
        )
        .unwrap()
    }
}
