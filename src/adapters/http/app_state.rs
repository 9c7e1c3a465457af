use std::sync::Arc;

use crate::{
    infra::config::AppConfig,
    use_cases::{
        auth::AuthUseCases, cart::CartUseCases, catalog::CatalogUseCases,
        password_reset::PasswordResetUseCases,
    },
};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub auth_use_cases: Arc<AuthUseCases>,
    pub password_reset_use_cases: Arc<PasswordResetUseCases>,
    pub catalog_use_cases: Arc<CatalogUseCases>,
    pub cart_use_cases: Arc<CartUseCases>,
}
