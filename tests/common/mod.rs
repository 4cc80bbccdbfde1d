//! Common test utilities for E2E tests

use chrono::Utc;
use roost::data::{EntityId, Post};
use roost::{AppState, config};
use tempfile::TempDir;
use tokio::net::TcpListener;

/// Test server instance
pub struct TestServer {
    pub addr: String,
    pub state: AppState,
    pub _temp_dir: TempDir,
    pub client: reqwest::Client,
}

impl TestServer {
    /// Create a new test server instance
    pub async fn new() -> Self {
        // Create temporary directory for test database
        let temp_dir = TempDir::new().unwrap();
        let db_path = temp_dir.path().join("test.db");

        // Create test configuration
        let config = config::AppConfig {
            server: config::ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 0, // Let OS assign port
            },
            database: config::DatabaseConfig {
                path: db_path.clone(),
            },
            auth: config::AuthConfig {
                token_secret: "test-secret-key-32-bytes-long!!!".to_string(),
                token_ttl_days: 10,
            },
            logging: config::LoggingConfig {
                level: "info".to_string(),
                format: "pretty".to_string(),
            },
        };

        // Initialize app state
        let state = AppState::new(config.clone()).await.unwrap();

        // Create HTTP client
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(10))
            .build()
            .unwrap();

        // Bind to random port
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let addr_str = format!("http://{}", addr);

        // Build router
        let app = roost::build_router(state.clone());

        // Spawn server in background
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        // Wait a bit for server to start
        tokio::time::sleep(tokio::time::Duration::from_millis(100)).await;

        Self {
            addr: addr_str,
            state,
            _temp_dir: temp_dir,
            client,
        }
    }

    /// Get base URL for API requests
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.addr, path)
    }

    /// POST /createAccount with the given credentials
    pub async fn register(&self, username: &str, password: &str) -> reqwest::Response {
        self.client
            .post(self.url("/createAccount"))
            .json(&serde_json::json!({"username": username, "password": password}))
            .send()
            .await
            .expect("request succeeds")
    }

    /// POST /login with the given credentials
    pub async fn login(&self, username: &str, password: &str) -> reqwest::Response {
        self.client
            .post(self.url("/login"))
            .json(&serde_json::json!({"username": username, "password": password}))
            .send()
            .await
            .expect("request succeeds")
    }

    /// Register an account and return its (user_id, token)
    ///
    /// The id is recovered by verifying the issued token, which also
    /// exercises the issue/verify pairing on every setup path.
    pub async fn register_user(&self, username: &str, password: &str) -> (String, String) {
        let response = self.register(username, password).await;
        assert_eq!(response.status(), 200);

        let body: serde_json::Value = response.json().await.expect("response body");
        let token = body["token"].as_str().expect("token in response").to_string();
        let session = roost::auth::verify_token(&token, &self.state.config.auth.token_secret)
            .expect("issued token verifies");

        (session.user_id, token)
    }

    /// Insert a post directly through the data layer
    ///
    /// Posts are owned by a separate component; tests seed them here so
    /// the profile aggregator has something to join against.
    pub async fn seed_post(&self, author_id: &str, content: &str) -> Post {
        let post = Post {
            id: EntityId::new().0,
            author: author_id.to_string(),
            content: content.to_string(),
            created_at: Utc::now(),
        };
        self.state.db.insert_post(&post).await.unwrap();
        post
    }

    /// GET the aggregated profile for a user id
    pub async fn fetch_profile(&self, user_id: &str) -> serde_json::Value {
        let response = self
            .client
            .get(self.url(&format!("/{}", user_id)))
            .send()
            .await
            .expect("request succeeds");
        assert_eq!(response.status(), 200);
        response.json().await.expect("response body")
    }
}
