use std::sync::{
    Arc, Mutex,
    atomic::{AtomicI64, Ordering},
};

use async_trait::async_trait;
use chrono::Utc;

use crate::{
    app_error::{AppError, AppResult},
    use_cases::{
        auth::{GoogleIdentity, GoogleTokenVerifier, User, UserRepo},
        cart::{CartItemView, CartRepo},
        catalog::{Product, ProductFilter, ProductRepo},
        password_reset::EmailSender,
    },
};

// ============================================================================
// Users
// ============================================================================

#[derive(Default)]
pub struct InMemoryUserRepo {
    users: Mutex<Vec<User>>,
    next_id: AtomicI64,
}

impl InMemoryUserRepo {
    pub fn new() -> Self {
        Self {
            users: Mutex::new(vec![]),
            next_id: AtomicI64::new(1),
        }
    }

    pub fn seed(
        &self,
        email: &str,
        password_hash: Option<String>,
        google_id: Option<String>,
    ) -> i64 {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        self.users.lock().unwrap().push(User {
            id,
            email: email.to_string(),
            password_hash,
            google_id,
        });
        id
    }

    pub fn get_by_email(&self, email: &str) -> Option<User> {
        self.users
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.email == email)
            .cloned()
    }

    fn find_by_id(&self, id: i64) -> Option<User> {
        self.users
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.id == id)
            .cloned()
    }
}

#[async_trait]
impl UserRepo for InMemoryUserRepo {
    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        Ok(self.get_by_email(email))
    }

    async fn create_with_password(&self, email: &str, password_hash: &str) -> AppResult<User> {
        let id = self.seed(email, Some(password_hash.to_string()), None);
        self.find_by_id(id).ok_or(AppError::NotFound)
    }

    async fn create_with_google(&self, email: &str, google_id: &str) -> AppResult<User> {
        let id = self.seed(email, None, Some(google_id.to_string()));
        self.find_by_id(id).ok_or(AppError::NotFound)
    }

    async fn set_google_id(&self, user_id: i64, google_id: &str) -> AppResult<()> {
        let mut users = self.users.lock().unwrap();
        let user = users
            .iter_mut()
            .find(|u| u.id == user_id)
            .ok_or(AppError::NotFound)?;
        user.google_id = Some(google_id.to_string());
        Ok(())
    }

    async fn set_password_by_email(&self, email: &str, password_hash: &str) -> AppResult<()> {
        let mut users = self.users.lock().unwrap();
        if let Some(user) = users.iter_mut().find(|u| u.email == email) {
            user.password_hash = Some(password_hash.to_string());
        }
        Ok(())
    }
}

// ============================================================================
// Products
// ============================================================================

#[derive(Default)]
pub struct InMemoryProductRepo {
    products: Mutex<Vec<Product>>,
    next_id: AtomicI64,
}

impl InMemoryProductRepo {
    pub fn new() -> Self {
        Self {
            products: Mutex::new(vec![]),
            next_id: AtomicI64::new(1),
        }
    }

    pub fn seed(&self, name: &str, price: f64, category: Option<&str>, stock: i32) -> i64 {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        self.products.lock().unwrap().push(Product {
            id,
            name: name.to_string(),
            description: None,
            price,
            image_url: None,
            category: category.map(str::to_string),
            stock_quantity: stock,
            created_at: Utc::now(),
        });
        id
    }

    pub fn first_id(&self) -> Option<i64> {
        self.products.lock().unwrap().first().map(|p| p.id)
    }
}

#[async_trait]
impl ProductRepo for InMemoryProductRepo {
    async fn list(&self, filter: &ProductFilter) -> AppResult<Vec<Product>> {
        let mut matching: Vec<Product> = self
            .products
            .lock()
            .unwrap()
            .iter()
            .filter(|p| {
                filter
                    .category
                    .as_ref()
                    .is_none_or(|c| p.category.as_deref() == Some(c.as_str()))
                    && filter.min_price.is_none_or(|min| p.price >= min)
                    && filter.max_price.is_none_or(|max| p.price <= max)
            })
            .cloned()
            .collect();
        matching.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(matching)
    }

    async fn get(&self, id: i64) -> AppResult<Option<Product>> {
        Ok(self
            .products
            .lock()
            .unwrap()
            .iter()
            .find(|p| p.id == id)
            .cloned())
    }
}

// ============================================================================
// Cart
// ============================================================================

#[derive(Clone)]
struct CartLine {
    id: i64,
    user_id: i64,
    product_id: i64,
    quantity: i32,
    created_at: chrono::DateTime<Utc>,
}

pub struct InMemoryCartRepo {
    lines: Mutex<Vec<CartLine>>,
    next_id: AtomicI64,
    products: Arc<InMemoryProductRepo>,
}

impl InMemoryCartRepo {
    pub fn new(products: Arc<InMemoryProductRepo>) -> Self {
        Self {
            lines: Mutex::new(vec![]),
            next_id: AtomicI64::new(1),
            products,
        }
    }
}

#[async_trait]
impl CartRepo for InMemoryCartRepo {
    async fn find_line(&self, user_id: i64, product_id: i64) -> AppResult<Option<(i64, i32)>> {
        Ok(self
            .lines
            .lock()
            .unwrap()
            .iter()
            .find(|l| l.user_id == user_id && l.product_id == product_id)
            .map(|l| (l.id, l.quantity)))
    }

    async fn insert_line(&self, user_id: i64, product_id: i64, quantity: i32) -> AppResult<()> {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        self.lines.lock().unwrap().push(CartLine {
            id,
            user_id,
            product_id,
            quantity,
            created_at: Utc::now(),
        });
        Ok(())
    }

    async fn update_quantity(&self, line_id: i64, quantity: i32) -> AppResult<()> {
        let mut lines = self.lines.lock().unwrap();
        if let Some(line) = lines.iter_mut().find(|l| l.id == line_id) {
            line.quantity = quantity;
        }
        Ok(())
    }

    async fn list_for_user(&self, user_id: i64) -> AppResult<Vec<CartItemView>> {
        let lines: Vec<CartLine> = self
            .lines
            .lock()
            .unwrap()
            .iter()
            .filter(|l| l.user_id == user_id)
            .cloned()
            .collect();

        let mut items = Vec::with_capacity(lines.len());
        for line in lines {
            if let Some(product) = self.products.get(line.product_id).await? {
                items.push(CartItemView {
                    id: line.id,
                    quantity: line.quantity,
                    created_at: line.created_at,
                    product_id: product.id,
                    name: product.name,
                    description: product.description,
                    price: product.price,
                    image_url: product.image_url,
                    category: product.category,
                });
            }
        }
        items.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(items)
    }

    async fn get_line_stock(&self, line_id: i64, user_id: i64) -> AppResult<Option<i32>> {
        let product_id = self
            .lines
            .lock()
            .unwrap()
            .iter()
            .find(|l| l.id == line_id && l.user_id == user_id)
            .map(|l| l.product_id);
        match product_id {
            Some(product_id) => Ok(self
                .products
                .get(product_id)
                .await?
                .map(|p| p.stock_quantity)),
            None => Ok(None),
        }
    }

    async fn line_belongs_to_user(&self, line_id: i64, user_id: i64) -> AppResult<bool> {
        Ok(self
            .lines
            .lock()
            .unwrap()
            .iter()
            .any(|l| l.id == line_id && l.user_id == user_id))
    }

    async fn delete_line(&self, line_id: i64) -> AppResult<()> {
        self.lines.lock().unwrap().retain(|l| l.id != line_id);
        Ok(())
    }
}

// ============================================================================
// Mail
// ============================================================================

#[derive(Clone, Debug)]
pub struct SentEmail {
    pub to: String,
    pub subject: String,
    pub html: String,
}

#[derive(Default)]
pub struct RecordingEmailSender {
    sent: Mutex<Vec<SentEmail>>,
}

impl RecordingEmailSender {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last(&self) -> Option<SentEmail> {
        self.sent.lock().unwrap().last().cloned()
    }

    pub fn sent_count(&self) -> usize {
        self.sent.lock().unwrap().len()
    }
}

#[async_trait]
impl EmailSender for RecordingEmailSender {
    async fn send(&self, to: &str, subject: &str, html: &str) -> AppResult<()> {
        self.sent.lock().unwrap().push(SentEmail {
            to: to.to_string(),
            subject: subject.to_string(),
            html: html.to_string(),
        });
        Ok(())
    }
}

// ============================================================================
// Google verifier
// ============================================================================

/// Returns the configured identity for any token, or rejects everything when
/// no identity is set.
#[derive(Default)]
pub struct StubGoogleVerifier {
    identity: Mutex<Option<GoogleIdentity>>,
}

impl StubGoogleVerifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_identity(&self, identity: GoogleIdentity) {
        *self.identity.lock().unwrap() = Some(identity);
    }
}

#[async_trait]
impl GoogleTokenVerifier for StubGoogleVerifier {
    async fn verify(&self, _id_token: &str) -> AppResult<GoogleIdentity> {
        self.identity
            .lock()
            .unwrap()
            .clone()
            .ok_or_else(|| AppError::InvalidInput("Failed to authenticate with Google".into()))
    }
}
