// tests/common/mod.rs
#![allow(dead_code)]

use std::sync::Arc;

use journal::{config::Config, routes, state::AppState, store::{ContentStore, MemoryStore}};

pub struct TestApp {
    pub address: String,
    pub store: Arc<MemoryStore>,
    pub client: reqwest::Client,
}

/// Spawns the app on a random port, backed by a fresh in-memory store.
pub async fn spawn_app(demo_content: bool) -> TestApp {
    let mut config = Config::for_memory("test_secret_for_integration_tests");
    config.demo_content = demo_content;

    let store = Arc::new(MemoryStore::new());
    let shared: Arc<dyn ContentStore> = store.clone();
    let state = AppState::new(shared, config);
    let app = routes::create_router(state);

    // Bind to port 0 to get a random available port
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind random port");
    let port = listener.local_addr().unwrap().port();
    let address = format!("http://127.0.0.1:{}", port);

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    TestApp {
        address,
        store,
        client: reqwest::Client::new(),
    }
}

impl TestApp {
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.address, path)
    }

    /// Registers a fresh author and returns (username, bearer token).
    pub async fn signed_in_author(&self) -> (String, String) {
        let username = format!("u_{}", &uuid::Uuid::new_v4().to_string()[..8]);
        let password = "password123";

        let response = self
            .client
            .post(self.url("/api/auth/register"))
            .json(&serde_json::json!({
                "username": username,
                "password": password,
                "display_name": format!("{} writes", username),
            }))
            .send()
            .await
            .expect("Register failed");
        assert_eq!(response.status().as_u16(), 201);

        let login = self
            .client
            .post(self.url("/api/auth/login"))
            .json(&serde_json::json!({ "username": username, "password": password }))
            .send()
            .await
            .expect("Login failed")
            .json::<serde_json::Value>()
            .await
            .expect("Failed to parse login json");

        let token = login["token"].as_str().expect("Token not found").to_string();
        (username, token)
    }

    /// Creates a post and returns the response body.
    pub async fn write_post(&self, token: &str, body: serde_json::Value) -> serde_json::Value {
        let response = self
            .client
            .post(self.url("/api/posts"))
            .bearer_auth(token)
            .json(&body)
            .send()
            .await
            .expect("Create post failed");
        assert_eq!(response.status().as_u16(), 201);
        response.json().await.unwrap()
    }
}
