use std::sync::Arc;

use account_service::domain::user::service::UserService;
use account_service::inbound::http::router::create_router;
use account_service::outbound::repositories::InMemoryUserRepository;
use auth::Authenticator;
use auth::HashingConfig;
use auth::PasswordHasher;
use auth::SigningKey;
use auth::TokenCodec;
use auth::TokenSettings;
use serde_json::json;

pub const JWT_SECRET: &str = "test-secret-key-for-jwt-signing-at-least-32-bytes";

/// Test application that spawns a real server backed by the in-memory store
pub struct TestApp {
    pub address: String,
    pub api_client: reqwest::Client,
    pub codec: TokenCodec,
}

impl TestApp {
    /// Spawn the application in a background task and return TestApp
    pub async fn spawn() -> Self {
        // Use random port (0 = OS assigns)
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind random port");
        let port = listener.local_addr().unwrap().port();
        let address = format!("http://127.0.0.1:{}", port);

        let signing_key = SigningKey::from_secret(JWT_SECRET);
        let password_hasher = PasswordHasher::from_config(&HashingConfig {
            algorithm: "argon2id".to_string(),
            memory_kib: 1024,
            iterations: 1,
            parallelism: 1,
        })
        .expect("Failed to build password hasher");

        let authenticator = Arc::new(
            Authenticator::new(&signing_key, TokenSettings::default(), password_hasher)
                .expect("Failed to build authenticator"),
        );

        let user_service = Arc::new(UserService::new(
            Arc::new(InMemoryUserRepository::new()),
            authenticator,
            4,
        ));

        let router = create_router(user_service);

        tokio::spawn(async move {
            axum::serve(listener, router).await.expect("Server error");
        });

        Self {
            address,
            api_client: reqwest::Client::new(),
            codec: TokenCodec::new(&signing_key, TokenSettings::default()),
        }
    }

    /// Helper to make GET request
    pub fn get(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.get(&format!("{}{}", self.address, path))
    }

    /// Helper to make POST request
    pub fn post(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.post(&format!("{}{}", self.address, path))
    }

    /// Helper to make GET request with Bearer token
    pub fn get_authenticated(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.get(path).bearer_auth(token)
    }

    /// Helper to make PATCH request with Bearer token
    pub fn patch_authenticated(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.api_client
            .patch(&format!("{}{}", self.address, path))
            .bearer_auth(token)
    }

    /// Helper to make DELETE request with Bearer token
    pub fn delete_authenticated(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.api_client
            .delete(&format!("{}{}", self.address, path))
            .bearer_auth(token)
    }

    /// Register an account and return the response
    pub async fn register(&self, username: &str, password: &str, role: Option<&str>) -> reqwest::Response {
        let mut body = json!({
            "username": username,
            "password": password,
        });
        if let Some(role) = role {
            body["role"] = json!(role);
        }

        self.post("/api/v1/register")
            .json(&body)
            .send()
            .await
            .expect("Failed to execute request")
    }

    /// Log in and return the response
    pub async fn login(&self, username: &str, password: &str) -> reqwest::Response {
        self.post("/api/v1/login")
            .json(&json!({
                "username": username,
                "password": password,
            }))
            .send()
            .await
            .expect("Failed to execute request")
    }

    /// Register, log in and return the access token
    pub async fn token_for(&self, username: &str, password: &str, role: Option<&str>) -> String {
        self.register(username, password, role).await;

        let body: serde_json::Value = self
            .login(username, password)
            .await
            .json()
            .await
            .expect("Failed to parse response");

        body["data"]["access_token"]
            .as_str()
            .expect("Missing access token")
            .to_string()
    }
}
