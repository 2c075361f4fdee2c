//! Shared helpers for integration tests
//!
//! Builds the real router over in-memory repositories so the full HTTP
//! pipeline runs without a database.

#![allow(dead_code)]

use axum::{
    body::Body,
    http::{Method, Request, StatusCode},
    Router,
};
use chrono::{NaiveDate, Utc};
use serde_json::Value;
use std::sync::Arc;
use tower::util::ServiceExt; // for oneshot
use uuid::Uuid;

use zeus_api::api;
use zeus_api::auth::jwt::create_token;
use zeus_api::config::AppConfig;
use zeus_api::domain::repositories::UserRepository;
use zeus_api::domain::user::{Email, Gender, Role, User};
use zeus_api::infrastructure::repositories::{InMemoryBudgetRepository, InMemoryUserRepository};
use zeus_api::state::AppState;

pub const PASSWORD: &str = "correct-horse";

pub struct TestApp {
    pub router: Router,
    pub config: Arc<AppConfig>,
    pub users: Arc<InMemoryUserRepository>,
    pub budgets: Arc<InMemoryBudgetRepository>,
}

/// Test application over empty in-memory repositories
pub fn setup() -> TestApp {
    setup_with(|state| state)
}

/// Test application whose state is adjusted by `customize` before routing
pub fn setup_with(customize: impl FnOnce(AppState) -> AppState) -> TestApp {
    let config = Arc::new(AppConfig::for_tests());
    let users = Arc::new(InMemoryUserRepository::new());
    let budgets = Arc::new(InMemoryBudgetRepository::new());

    let state = AppState::from_repositories(config.clone(), users.clone(), budgets.clone());
    let router = api::router(customize(state));

    TestApp {
        router,
        config,
        users,
        budgets,
    }
}

impl TestApp {
    /// Inserts an active user whose password is [`PASSWORD`]
    pub async fn seed_user(&self, full_name: &str, email: &str, role: Role) -> User {
        let now = Utc::now();
        let user = User {
            id: Uuid::new_v4(),
            full_name: full_name.to_string(),
            date_of_birth: NaiveDate::from_ymd_opt(2000, 1, 15).unwrap(),
            email: Email::new(email).unwrap(),
            // Low cost keeps the suite fast; verification works for any cost
            password_hash: bcrypt::hash(PASSWORD, 4).unwrap(),
            role,
            phone_number: "+55 11 99999-0000".to_string(),
            gender: Gender::PreferNotToSay,
            photo_url: None,
            admission_date: NaiveDate::from_ymd_opt(2023, 3, 1).unwrap(),
            skills: vec!["rust".to_string()],
            is_active: true,
            must_change_password: false,
            created_at: now,
            updated_at: now,
        };
        self.users.create(&user).await.unwrap()
    }

    pub async fn admin(&self) -> User {
        self.seed_user("Admin User", "admin@compjunior.com.br", Role::Admin)
            .await
    }

    pub async fn member(&self) -> User {
        self.seed_user("Member User", "member@compjunior.com.br", Role::Member)
            .await
    }

    pub fn token_for(&self, user: &User) -> String {
        create_token(user.id, user.role, &self.config.jwt.secret, 1).unwrap()
    }

    /// Sends a request and returns the status with the decoded JSON body
    ///
    /// Empty bodies decode to `Value::Null`.
    pub async fn send(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header("authorization", format!("Bearer {}", token));
        }

        let body = match body {
            Some(json) => {
                builder = builder.header("content-type", "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };

        let response = self
            .router
            .clone()
            .oneshot(builder.body(body).unwrap())
            .await
            .unwrap();

        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };

        (status, json)
    }
}
