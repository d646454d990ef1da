// tests/authoring_tests.rs

mod common;

use common::spawn_app;

fn article(title: &str, content: &str, published: bool) -> serde_json::Value {
    serde_json::json!({
        "title": title,
        "excerpt": "A short summary",
        "content": content,
        "published": published,
    })
}

#[tokio::test]
async fn writing_requires_sign_in() {
    let app = spawn_app(true).await;

    let response = app
        .client
        .post(app.url("/api/posts"))
        .json(&article("Anonymous", "<p>Hi</p>", true))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status().as_u16(), 401);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["redirect"], "/auth");

    let bad_token = app
        .client
        .post(app.url("/api/posts/preview"))
        .bearer_auth("not.a.token")
        .json(&serde_json::json!({ "title": "x", "content": "y" }))
        .send()
        .await
        .unwrap();
    assert_eq!(bad_token.status().as_u16(), 401);
}

#[tokio::test]
async fn register_login_and_session() {
    let app = spawn_app(true).await;

    let anonymous: serde_json::Value = app
        .client
        .get(app.url("/api/auth/session"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(anonymous["authenticated"], false);

    let (username, token) = app.signed_in_author().await;

    let session: serde_json::Value = app
        .client
        .get(app.url("/api/auth/session"))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(session["authenticated"], true);
    assert_eq!(session["username"], username.as_str());
    assert_eq!(session["profile"]["display_name"], format!("{} writes", username));

    // Same name again
    let duplicate = app
        .client
        .post(app.url("/api/auth/register"))
        .json(&serde_json::json!({ "username": username, "password": "password123" }))
        .send()
        .await
        .unwrap();
    assert_eq!(duplicate.status().as_u16(), 409);

    let wrong_password = app
        .client
        .post(app.url("/api/auth/login"))
        .json(&serde_json::json!({ "username": username, "password": "wrong-password" }))
        .send()
        .await
        .unwrap();
    assert_eq!(wrong_password.status().as_u16(), 401);
}

#[tokio::test]
async fn drafts_are_only_visible_to_their_author() {
    let app = spawn_app(true).await;
    let (_, token) = app.signed_in_author().await;

    let saved = app
        .write_post(&token, article("Work in progress", "<p>Not yet</p>", false))
        .await;
    assert_eq!(saved["published"], false);
    assert_eq!(saved["message"], "Saved as draft");
    let id = saved["id"].as_i64().unwrap();

    let public = app
        .client
        .get(app.url(&format!("/api/posts/{}", id)))
        .send()
        .await
        .unwrap();
    assert_eq!(public.status().as_u16(), 404);

    let own = app
        .client
        .get(app.url(&format!("/api/posts/{}", id)))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(own.status().as_u16(), 200);

    // A draft alone does not make the site live
    let home: serde_json::Value = app
        .client
        .get(app.url("/api/home"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(home["source"], "empty_state");

    let mine: serde_json::Value = app
        .client
        .get(app.url("/api/profile/posts"))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let mine = mine.as_array().unwrap();
    assert_eq!(mine.len(), 1);
    assert_eq!(mine[0]["id"], id);
}

#[tokio::test]
async fn published_content_is_sanitized_on_render() {
    let app = spawn_app(true).await;
    let (_, token) = app.signed_in_author().await;

    let content = r#"<p onclick="steal()">Hello <strong>world</strong></p><script>alert(1)</script><a href="javascript:alert(1)">x</a>"#;
    let saved = app
        .write_post(&token, article("Hello, World!", content, true))
        .await;
    assert_eq!(saved["message"], "Published!");
    assert_eq!(saved["read_time"], 1);
    let slug = saved["slug"].as_str().unwrap();
    assert!(slug.starts_with("hello-world-"));

    let detail: serde_json::Value = app
        .client
        .get(app.url(&format!("/api/posts/by-slug/{}", slug)))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    let html = detail["content_html"].as_str().unwrap();
    assert!(html.contains("<strong>world</strong>"));
    assert!(!html.contains("<script"));
    assert!(!html.contains("alert(1)"));
    assert!(!html.contains("onclick"));
    assert!(!html.contains("javascript:"));

    let home: serde_json::Value = app
        .client
        .get(app.url("/api/home"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(home["source"], "live");
    assert!(home["featured"].is_null());
    assert_eq!(home["recent"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn featured_post_leads_the_home_page() {
    let app = spawn_app(true).await;
    let (_, token) = app.signed_in_author().await;

    let first = app
        .write_post(&token, article("First story", "<p>one</p>", true))
        .await;
    app.write_post(&token, article("Second story", "<p>two</p>", true))
        .await;

    let id = first["id"].as_i64().unwrap();
    assert!(app.store.set_featured(id, true).await);

    let home: serde_json::Value = app
        .client
        .get(app.url("/api/home"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(home["featured"]["id"], id);
    let recent = home["recent"].as_array().unwrap();
    assert_eq!(recent.len(), 1);
    assert_eq!(recent[0]["title"], "Second story");
}

#[tokio::test]
async fn live_articles_filter_by_category() {
    let app = spawn_app(true).await;
    let (_, token) = app.signed_in_author().await;

    let categories: serde_json::Value = app
        .client
        .get(app.url("/api/categories"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let travel = categories
        .as_array()
        .unwrap()
        .iter()
        .find(|c| c["slug"] == "travel")
        .unwrap()["id"]
        .as_i64()
        .unwrap();

    let mut body = article("Alpine trails", "<p>Up we go</p>", true);
    body["category_id"] = serde_json::json!(travel);
    app.write_post(&token, body).await;

    let travel_page: serde_json::Value = app
        .client
        .get(app.url("/api/articles?category=travel"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(travel_page["source"], "live");
    assert_eq!(travel_page["posts"].as_array().unwrap().len(), 1);

    // Nothing in design yet, but the site has live posts so no samples appear
    let design_page: serde_json::Value = app
        .client
        .get(app.url("/api/articles?category=design"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(design_page["source"], "live");
    assert!(design_page["posts"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn unknown_category_is_rejected() {
    let app = spawn_app(true).await;
    let (_, token) = app.signed_in_author().await;

    let mut body = article("Lost", "<p>where</p>", true);
    body["category_id"] = serde_json::json!(987_654);

    let response = app
        .client
        .post(app.url("/api/posts"))
        .bearer_auth(&token)
        .json(&body)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 400);
}

#[tokio::test]
async fn only_the_author_can_replace_a_post() {
    let app = spawn_app(true).await;
    let (_, author) = app.signed_in_author().await;
    let (_, other) = app.signed_in_author().await;

    let saved = app
        .write_post(&author, article("Original title", "<p>v1</p>", true))
        .await;
    let id = saved["id"].as_i64().unwrap();
    let slug = saved["slug"].as_str().unwrap().to_string();

    let forbidden = app
        .client
        .put(app.url(&format!("/api/posts/{}", id)))
        .bearer_auth(&other)
        .json(&article("Hijacked", "<p>mine now</p>", true))
        .send()
        .await
        .unwrap();
    assert_eq!(forbidden.status().as_u16(), 403);

    let replaced = app
        .client
        .put(app.url(&format!("/api/posts/{}", id)))
        .bearer_auth(&author)
        .json(&article("New title", "<p>v2</p>", true))
        .send()
        .await
        .unwrap();
    assert_eq!(replaced.status().as_u16(), 200);
    let replaced: serde_json::Value = replaced.json().await.unwrap();
    assert_eq!(replaced["slug"], slug.as_str());

    let detail: serde_json::Value = app
        .client
        .get(app.url(&format!("/api/posts/{}", id)))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(detail["title"], "New title");
    assert_eq!(detail["content_html"], "<p>v2</p>");
}

#[tokio::test]
async fn preview_renders_without_saving() {
    let app = spawn_app(true).await;
    let (_, token) = app.signed_in_author().await;

    let preview: serde_json::Value = app
        .client
        .post(app.url("/api/posts/preview"))
        .bearer_auth(&token)
        .json(&serde_json::json!({
            "title": "Draft Ideas!",
            "content": "<h2>Plan</h2><img src=x onerror=alert(1)>",
        }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(preview["slug"], "draft-ideas");
    assert_eq!(preview["read_time"], 1);
    let html = preview["content_html"].as_str().unwrap();
    assert!(html.contains("<h2>Plan</h2>"));
    assert!(!html.contains("onerror"));

    let mine: serde_json::Value = app
        .client
        .get(app.url("/api/profile/posts"))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert!(mine.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn content_over_the_render_limit_is_rejected() {
    let app = spawn_app(true).await;
    let (_, token) = app.signed_in_author().await;

    // 150 000 bytes, above the 128 KiB default and below the request body limit
    let content = format!("<p>{}</p>", "word ".repeat(30_000));

    let response = app
        .client
        .post(app.url("/api/posts"))
        .bearer_auth(&token)
        .json(&article("Too long", &content, true))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 400);

    let mine: serde_json::Value = app
        .client
        .get(app.url("/api/profile/posts"))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert!(mine.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn blank_title_is_rejected() {
    let app = spawn_app(true).await;
    let (_, token) = app.signed_in_author().await;

    let response = app
        .client
        .post(app.url("/api/posts"))
        .bearer_auth(&token)
        .json(&article("   ", "<p>body</p>", true))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 400);
}

#[tokio::test]
async fn sample_articles_disappear_once_something_is_published() {
    let app = spawn_app(true).await;
    let sample = app.url("/api/posts/by-slug/mindful-living-in-a-digital-age");

    let before = app.client.get(&sample).send().await.unwrap();
    assert_eq!(before.status().as_u16(), 200);

    let (_, token) = app.signed_in_author().await;
    app.write_post(&token, article("First real post", "<p>hello</p>", true))
        .await;

    let after = app.client.get(&sample).send().await.unwrap();
    assert_eq!(after.status().as_u16(), 404);
}
