// tests/api_tests.rs

mod common;

use common::spawn_app;

#[tokio::test]
async fn unknown_path_returns_404() {
    let app = spawn_app(true).await;

    let response = app
        .client
        .get(app.url("/api/health_check_not_exists"))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status().as_u16(), 404);
}

#[tokio::test]
async fn empty_site_home_shows_sample_content() {
    let app = spawn_app(true).await;

    let body: serde_json::Value = app
        .client
        .get(app.url("/api/home"))
        .send()
        .await
        .expect("Failed to fetch home")
        .json()
        .await
        .unwrap();

    assert_eq!(body["source"], "empty_state");
    assert_eq!(body["featured"]["featured"], true);
    assert_eq!(body["recent"].as_array().unwrap().len(), 5);
    assert_eq!(body["categories"].as_array().unwrap().len(), 5);
}

#[tokio::test]
async fn empty_site_without_demo_content_stays_empty() {
    let app = spawn_app(false).await;

    let body: serde_json::Value = app
        .client
        .get(app.url("/api/home"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(body["source"], "empty_state");
    assert!(body["featured"].is_null());
    assert!(body["recent"].as_array().unwrap().is_empty());

    let articles: serde_json::Value = app
        .client
        .get(app.url("/api/articles"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert!(articles["posts"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn sample_articles_filter_by_category() {
    let app = spawn_app(true).await;

    let body: serde_json::Value = app
        .client
        .get(app.url("/api/articles?category=business"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(body["source"], "empty_state");
    assert_eq!(body["category"], "business");
    let posts = body["posts"].as_array().unwrap();
    assert_eq!(posts.len(), 2);
    for post in posts {
        assert_eq!(post["category"]["slug"], "business");
    }
}

#[tokio::test]
async fn sample_article_resolves_by_slug() {
    let app = spawn_app(true).await;

    let response = app
        .client
        .get(app.url("/api/posts/by-slug/mindful-living-in-a-digital-age"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 200);

    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["author"]["display_name"], "Sarah Chen");
    assert!(!body["content_html"].as_str().unwrap().contains("<script"));

    let missing = app
        .client
        .get(app.url("/api/posts/by-slug/no-such-article"))
        .send()
        .await
        .unwrap();
    assert_eq!(missing.status().as_u16(), 404);
}

#[tokio::test]
async fn categories_respect_limit() {
    let app = spawn_app(true).await;

    let body: serde_json::Value = app
        .client
        .get(app.url("/api/categories?limit=2"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    let names: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Business", "Design"]);
}

#[tokio::test]
async fn duplicate_subscription_is_not_an_error() {
    let app = spawn_app(true).await;
    let email = format!("reader_{}@example.com", uuid::Uuid::new_v4().simple());

    let first = app
        .client
        .post(app.url("/api/subscribers"))
        .json(&serde_json::json!({ "email": email }))
        .send()
        .await
        .unwrap();
    assert_eq!(first.status().as_u16(), 201);
    let body: serde_json::Value = first.json().await.unwrap();
    assert_eq!(body["status"], "subscribed");

    // Same address, different case
    let second = app
        .client
        .post(app.url("/api/subscribers"))
        .json(&serde_json::json!({ "email": email.to_uppercase() }))
        .send()
        .await
        .unwrap();
    assert_eq!(second.status().as_u16(), 200);
    let body: serde_json::Value = second.json().await.unwrap();
    assert_eq!(body["status"], "already_subscribed");
    assert_eq!(body["message"], "This email is already on our list.");
}

#[tokio::test]
async fn invalid_email_is_rejected() {
    let app = spawn_app(true).await;

    let response = app
        .client
        .post(app.url("/api/subscribers"))
        .json(&serde_json::json!({ "email": "not-an-email" }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status().as_u16(), 400);
}

#[tokio::test]
async fn openapi_document_is_served() {
    let app = spawn_app(true).await;

    let response = app
        .client
        .get(app.url("/api-docs/openapi.json"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 200);

    let body: serde_json::Value = response.json().await.unwrap();
    assert!(body["paths"]["/api/posts/{id}"].is_object());
    assert!(body["paths"]["/api/subscribers"].is_object());
}
