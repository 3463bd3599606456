//! Common test utilities for E2E tests

use brickworks::{AppState, config};
use tempfile::TempDir;
use tokio::net::TcpListener;

/// Password used for the test admin account
pub const TEST_ADMIN_PASSWORD: &str = "test-admin-password";

/// Email used for the test admin account
pub const TEST_ADMIN_EMAIL: &str = "admin@test.example.com";

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
        brickworks::metrics::init_metrics();

        // Create temporary directory for test database
        let temp_dir = TempDir::new().unwrap();
        let db_path = temp_dir.path().join("test.db");

        // Create test configuration
        let config = config::AppConfig {
            server: config::ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 0, // Let OS assign port
                domain: "localhost".to_string(),
                protocol: "http".to_string(),
            },
            database: config::DatabaseConfig {
                path: db_path.clone(),
                max_connections: 1,
            },
            storage: config::StorageConfig {
                media: config::MediaStorageConfig {
                    bucket: "test-media".to_string(),
                    public_url: "https://media.test.example.com".to_string(),
                },
            },
            cloudflare: config::CloudflareConfig {
                account_id: "test-account".to_string(),
                r2_access_key_id: "test-key".to_string(),
                r2_secret_access_key: "test-secret".to_string(),
            },
            auth: config::AuthConfig {
                session_secret: "test-secret-key-32-bytes-long!!!".to_string(),
                session_max_age: 604_800,
                admin_email: TEST_ADMIN_EMAIL.to_string(),
                admin_password_sha256: brickworks::auth::hash_password(TEST_ADMIN_PASSWORD),
            },
            site: config::SiteConfig {
                title: "Test Builders".to_string(),
                description: "Test construction company".to_string(),
                contact_email: "hello@test.example.com".to_string(),
                contact_phone: Some("+353 1 234 5678".to_string()),
                address: Some("1 Test Street".to_string()),
                social_image_url: None,
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
        let app = brickworks::build_router(state.clone());

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

    /// Log in as the test admin and return the `session` cookie value
    pub async fn login(&self) -> String {
        let response = self
            .client
            .post(self.url("/admin/login"))
            .json(&serde_json::json!({
                "email": TEST_ADMIN_EMAIL,
                "password": TEST_ADMIN_PASSWORD,
            }))
            .send()
            .await
            .expect("login request succeeds");

        assert_eq!(response.status(), 200, "test admin login must succeed");

        let set_cookie = response
            .headers()
            .get("set-cookie")
            .and_then(|v| v.to_str().ok())
            .expect("login sets session cookie");

        extract_session_cookie(set_cookie).expect("session cookie present")
    }

    /// Build a `Cookie` header value from a session token
    pub fn session_cookie(token: &str) -> String {
        format!("session={token}")
    }
}

/// Pull the `session=...` pair out of a Set-Cookie header
pub fn extract_session_cookie(set_cookie: &str) -> Option<String> {
    set_cookie
        .split(';')
        .map(str::trim)
        .find(|pair| pair.starts_with("session="))
        .map(ToString::to_string)
}
