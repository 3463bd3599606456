//! E2E tests for public and admin content endpoints

mod common;

use common::TestServer;

#[tokio::test]
async fn test_project_lifecycle() {
    let server = TestServer::new().await;
    let cookie = server.login().await;

    // Create a published project
    let response = server
        .client
        .post(server.url("/admin/api/projects"))
        .header("Cookie", &cookie)
        .json(&serde_json::json!({
            "title": "Riverside Apartments",
            "summary": "24-unit residential development",
            "body_html": "<p>Completed in 2025.</p><script>alert(1)</script>",
            "location": "Galway",
            "status": "completed",
            "published": true,
        }))
        .send()
        .await
        .expect("request succeeds");

    assert_eq!(response.status(), 201);
    let created: serde_json::Value = response.json().await.expect("json body");
    assert_eq!(created["slug"], "riverside-apartments");
    // Script tags never survive sanitization
    let body_html = created["body_html"].as_str().unwrap();
    assert!(body_html.contains("<p>Completed in 2025.</p>"));
    assert!(!body_html.contains("script"));

    let id = created["id"].as_str().unwrap().to_string();

    // Visible on the public list
    let response = server
        .client
        .get(server.url("/api/v1/projects"))
        .send()
        .await
        .expect("request succeeds");
    assert_eq!(response.status(), 200);
    let listed: serde_json::Value = response.json().await.expect("json body");
    assert_eq!(listed.as_array().unwrap().len(), 1);

    // Fetchable by slug
    let response = server
        .client
        .get(server.url("/api/v1/projects/riverside-apartments"))
        .send()
        .await
        .expect("request succeeds");
    assert_eq!(response.status(), 200);

    // Unpublish via admin update
    let response = server
        .client
        .put(server.url(&format!("/admin/api/projects/{id}")))
        .header("Cookie", &cookie)
        .json(&serde_json::json!({ "published": false }))
        .send()
        .await
        .expect("request succeeds");
    assert_eq!(response.status(), 200);

    // Gone from public pages, still in the admin list
    let response = server
        .client
        .get(server.url("/api/v1/projects/riverside-apartments"))
        .send()
        .await
        .expect("request succeeds");
    assert_eq!(response.status(), 404);

    let response = server
        .client
        .get(server.url("/admin/api/projects"))
        .header("Cookie", &cookie)
        .send()
        .await
        .expect("request succeeds");
    let admin_list: serde_json::Value = response.json().await.expect("json body");
    assert_eq!(admin_list.as_array().unwrap().len(), 1);

    // Delete
    let response = server
        .client
        .delete(server.url(&format!("/admin/api/projects/{id}")))
        .header("Cookie", &cookie)
        .send()
        .await
        .expect("request succeeds");
    assert_eq!(response.status(), 204);

    let response = server
        .client
        .delete(server.url(&format!("/admin/api/projects/{id}")))
        .header("Cookie", &cookie)
        .send()
        .await
        .expect("request succeeds");
    assert_eq!(response.status(), 404);
}

#[tokio::test]
async fn test_duplicate_titles_get_distinct_slugs() {
    let server = TestServer::new().await;
    let cookie = server.login().await;

    for _ in 0..2 {
        let response = server
            .client
            .post(server.url("/admin/api/projects"))
            .header("Cookie", &cookie)
            .json(&serde_json::json!({
                "title": "Harbour View",
                "status": "planned",
            }))
            .send()
            .await
            .expect("request succeeds");
        assert_eq!(response.status(), 201);
    }

    let response = server
        .client
        .get(server.url("/admin/api/projects"))
        .header("Cookie", &cookie)
        .send()
        .await
        .expect("request succeeds");
    let projects: serde_json::Value = response.json().await.expect("json body");
    let slugs: Vec<&str> = projects
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["slug"].as_str().unwrap())
        .collect();
    assert!(slugs.contains(&"harbour-view"));
    assert!(slugs.contains(&"harbour-view-2"));
}

#[tokio::test]
async fn test_project_rejects_unknown_status() {
    let server = TestServer::new().await;
    let cookie = server.login().await;

    let response = server
        .client
        .post(server.url("/admin/api/projects"))
        .header("Cookie", &cookie)
        .json(&serde_json::json!({
            "title": "Bad Status",
            "status": "demolished",
        }))
        .send()
        .await
        .expect("request succeeds");

    assert_eq!(response.status(), 400);
}

#[tokio::test]
async fn test_property_lifecycle() {
    let server = TestServer::new().await;
    let cookie = server.login().await;

    let response = server
        .client
        .post(server.url("/admin/api/properties"))
        .header("Cookie", &cookie)
        .json(&serde_json::json!({
            "title": "3-bed semi-detached",
            "summary": "Bright family home",
            "address": "14 Shore Road",
            "price_cents": 42_500_000i64,
            "bedrooms": 3,
            "bathrooms": 2,
            "area_sqm": 110,
            "listing_status": "for_sale",
            "published": true,
        }))
        .send()
        .await
        .expect("request succeeds");

    assert_eq!(response.status(), 201);
    let created: serde_json::Value = response.json().await.expect("json body");
    let id = created["id"].as_str().unwrap().to_string();
    let slug = created["slug"].as_str().unwrap().to_string();

    // Public fetch by slug
    let response = server
        .client
        .get(server.url(&format!("/api/v1/properties/{slug}")))
        .send()
        .await
        .expect("request succeeds");
    assert_eq!(response.status(), 200);
    let fetched: serde_json::Value = response.json().await.expect("json body");
    assert_eq!(fetched["price_cents"], 42_500_000i64);

    // Mark sold
    let response = server
        .client
        .put(server.url(&format!("/admin/api/properties/{id}")))
        .header("Cookie", &cookie)
        .json(&serde_json::json!({ "listing_status": "sold" }))
        .send()
        .await
        .expect("request succeeds");
    assert_eq!(response.status(), 200);
    let updated: serde_json::Value = response.json().await.expect("json body");
    assert_eq!(updated["listing_status"], "sold");

    // Negative price rejected
    let response = server
        .client
        .put(server.url(&format!("/admin/api/properties/{id}")))
        .header("Cookie", &cookie)
        .json(&serde_json::json!({ "price_cents": -1 }))
        .send()
        .await
        .expect("request succeeds");
    assert_eq!(response.status(), 400);

    // Delete
    let response = server
        .client
        .delete(server.url(&format!("/admin/api/properties/{id}")))
        .header("Cookie", &cookie)
        .send()
        .await
        .expect("request succeeds");
    assert_eq!(response.status(), 204);
}

async fn insert_test_asset(server: &TestServer, storage_key: &str) -> brickworks::data::ImageAsset {
    let asset = brickworks::data::ImageAsset {
        id: brickworks::data::EntityId::new().0,
        storage_key: storage_key.to_string(),
        public_url: format!("https://media.test.example.com/{storage_key}"),
        content_type: "image/webp".to_string(),
        file_size: 1_024,
        created_at: chrono::Utc::now(),
    };
    server.state.db.insert_image_asset(&asset).await.unwrap();
    asset
}

#[tokio::test]
async fn test_clearing_a_cover_image_via_update() {
    let server = TestServer::new().await;
    let cookie = server.login().await;

    let response = server
        .client
        .post(server.url("/admin/api/projects"))
        .header("Cookie", &cookie)
        .json(&serde_json::json!({
            "title": "Covered Project",
            "status": "planned",
            "cover_image_key": "projects/old-cover.webp",
        }))
        .send()
        .await
        .expect("request succeeds");
    assert_eq!(response.status(), 201);
    let created: serde_json::Value = response.json().await.expect("json body");
    let id = created["id"].as_str().unwrap().to_string();
    assert_eq!(
        created["cover_image_url"],
        "https://media.test.example.com/projects/old-cover.webp"
    );

    // Omitting the field leaves the cover in place
    let response = server
        .client
        .put(server.url(&format!("/admin/api/projects/{id}")))
        .header("Cookie", &cookie)
        .json(&serde_json::json!({ "summary": "Updated summary" }))
        .send()
        .await
        .expect("request succeeds");
    assert_eq!(response.status(), 200);
    let updated: serde_json::Value = response.json().await.expect("json body");
    assert!(updated["cover_image_url"].is_string());

    // An explicit null clears it
    let response = server
        .client
        .put(server.url(&format!("/admin/api/projects/{id}")))
        .header("Cookie", &cookie)
        .json(&serde_json::json!({ "cover_image_key": null }))
        .send()
        .await
        .expect("request succeeds");
    assert_eq!(response.status(), 200);
    let updated: serde_json::Value = response.json().await.expect("json body");
    assert!(updated["cover_image_url"].is_null());
}

#[tokio::test]
async fn test_deleting_media_detaches_cover_references() {
    let server = TestServer::new().await;
    let cookie = server.login().await;

    let asset = insert_test_asset(&server, "uploads/showhouse.webp").await;

    let response = server
        .client
        .post(server.url("/admin/api/projects"))
        .header("Cookie", &cookie)
        .json(&serde_json::json!({
            "title": "Showhouse",
            "status": "completed",
            "published": true,
            "cover_image_key": asset.storage_key,
        }))
        .send()
        .await
        .expect("request succeeds");
    assert_eq!(response.status(), 201);

    let response = server
        .client
        .delete(server.url(&format!("/admin/api/media/{}", asset.id)))
        .header("Cookie", &cookie)
        .send()
        .await
        .expect("request succeeds");
    assert_eq!(response.status(), 204);

    // The library row is gone
    let response = server
        .client
        .get(server.url("/admin/api/media"))
        .header("Cookie", &cookie)
        .send()
        .await
        .expect("request succeeds");
    let assets: serde_json::Value = response.json().await.expect("json body");
    assert!(assets.as_array().unwrap().is_empty());

    // The project no longer points at the deleted object
    let response = server
        .client
        .get(server.url("/admin/api/projects"))
        .header("Cookie", &cookie)
        .send()
        .await
        .expect("request succeeds");
    let projects: serde_json::Value = response.json().await.expect("json body");
    assert!(projects[0]["cover_image_url"].is_null());
}

#[tokio::test]
async fn test_deleting_content_drops_its_media_row() {
    let server = TestServer::new().await;
    let cookie = server.login().await;

    let asset = insert_test_asset(&server, "properties/frontage.webp").await;

    let response = server
        .client
        .post(server.url("/admin/api/properties"))
        .header("Cookie", &cookie)
        .json(&serde_json::json!({
            "title": "Corner Site",
            "price_cents": 25_000_000i64,
            "listing_status": "for_sale",
            "cover_image_key": asset.storage_key,
        }))
        .send()
        .await
        .expect("request succeeds");
    assert_eq!(response.status(), 201);
    let created: serde_json::Value = response.json().await.expect("json body");
    let id = created["id"].as_str().unwrap().to_string();

    let response = server
        .client
        .delete(server.url(&format!("/admin/api/properties/{id}")))
        .header("Cookie", &cookie)
        .send()
        .await
        .expect("request succeeds");
    assert_eq!(response.status(), 204);

    // The cover's library row went with the property
    let response = server
        .client
        .get(server.url("/admin/api/media"))
        .header("Cookie", &cookie)
        .send()
        .await
        .expect("request succeeds");
    let assets: serde_json::Value = response.json().await.expect("json body");
    assert!(assets.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_contact_form_flow() {
    let server = TestServer::new().await;

    // Valid submission
    let response = server
        .client
        .post(server.url("/api/v1/contact"))
        .json(&serde_json::json!({
            "name": "Pat Murphy",
            "email": "pat@example.com",
            "phone": "+353 87 123 4567",
            "message": "Looking for a quote on an extension.",
        }))
        .send()
        .await
        .expect("request succeeds");
    assert_eq!(response.status(), 201);

    // Invalid email rejected
    let response = server
        .client
        .post(server.url("/api/v1/contact"))
        .json(&serde_json::json!({
            "name": "Pat Murphy",
            "email": "not-an-email",
            "message": "hello",
        }))
        .send()
        .await
        .expect("request succeeds");
    assert_eq!(response.status(), 400);

    // Message shows up in the admin inbox
    let cookie = server.login().await;
    let response = server
        .client
        .get(server.url("/admin/api/messages"))
        .header("Cookie", &cookie)
        .send()
        .await
        .expect("request succeeds");
    assert_eq!(response.status(), 200);
    let messages: serde_json::Value = response.json().await.expect("json body");
    let messages = messages.as_array().unwrap();
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0]["email"], "pat@example.com");
    assert_eq!(messages[0]["read"], false);

    let id = messages[0]["id"].as_str().unwrap().to_string();

    // Mark read, then delete
    let response = server
        .client
        .post(server.url(&format!("/admin/api/messages/{id}/read")))
        .header("Cookie", &cookie)
        .send()
        .await
        .expect("request succeeds");
    assert_eq!(response.status(), 204);

    let response = server
        .client
        .delete(server.url(&format!("/admin/api/messages/{id}")))
        .header("Cookie", &cookie)
        .send()
        .await
        .expect("request succeeds");
    assert_eq!(response.status(), 204);
}

#[tokio::test]
async fn test_site_metadata_endpoint() {
    let server = TestServer::new().await;

    let response = server
        .client
        .get(server.url("/api/v1/site"))
        .send()
        .await
        .expect("request succeeds");

    assert_eq!(response.status(), 200);
    let body: serde_json::Value = response.json().await.expect("json body");
    assert_eq!(body["title"], "Test Builders");
    assert_eq!(body["contact_email"], "hello@test.example.com");
    assert_eq!(body["project_count"], 0);
    assert_eq!(body["property_count"], 0);
}
