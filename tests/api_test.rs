mod common;

use axum::http::{header, StatusCode};
use filebox_service::domain::config::storage::UploadSettings;
use serde_json::json;

use common::{json_body, request, test_app, test_app_with};

#[tokio::test]
async fn every_endpoint_requires_a_session() {
    let app = test_app();

    for (method, uri) in [
        ("POST", "/api/upload"),
        ("GET", "/api/files"),
        ("POST", "/api/files"),
        ("GET", "/api/files/uploads/user-a/x.png"),
        ("DELETE", "/api/files/uploads/user-a/x.png"),
        ("GET", "/api/me"),
        ("PATCH", "/api/me"),
        ("POST", "/api/me/avatar"),
        ("DELETE", "/api/me/avatar"),
    ] {
        for token in [None, Some("forged-token")] {
            let response = app.send(request(method, uri, token, None)).await;
            assert_eq!(
                response.status(),
                StatusCode::UNAUTHORIZED,
                "{} {} with {:?}",
                method,
                uri,
                token
            );
        }
    }
    assert_eq!(
        app.storage
            .presign_calls
            .load(std::sync::atomic::Ordering::SeqCst),
        0
    );
}

#[tokio::test]
async fn session_cookie_is_accepted() {
    let app = test_app();
    let mut req = request("GET", "/api/files", None, None);
    req.headers_mut()
        .insert(header::COOKIE, "theme=dark; session=token-a".parse().unwrap());

    let response = app.send(req).await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn foreign_keys_are_forbidden() {
    let app = test_app();
    app.storage.put("uploads/user-b/x.png");

    let download = app
        .send(request("GET", "/api/files/uploads/user-b/x.png", Some("token-a"), None))
        .await;
    assert_eq!(download.status(), StatusCode::FORBIDDEN);

    let delete = app
        .send(request("DELETE", "/api/files/uploads/user-b/x.png", Some("token-a"), None))
        .await;
    assert_eq!(delete.status(), StatusCode::FORBIDDEN);
    assert!(app.storage.contains("uploads/user-b/x.png"));

    let persist = app
        .send(request(
            "POST",
            "/api/files",
            Some("token-a"),
            Some(json!({"id": "f1", "name": "x.png", "key": "uploads/user-b/x.png", "type": "image/png", "size": 3})),
        ))
        .await;
    assert_eq!(persist.status(), StatusCode::FORBIDDEN);
    assert!(app.files.rows.lock().unwrap().is_empty());
}

#[tokio::test]
async fn presign_issues_key_under_caller_prefix() {
    let app = test_app();

    let response = app
        .send(request(
            "POST",
            "/api/upload",
            Some("token-a"),
            Some(json!({"filename": "holiday.JPG", "contentType": "image/jpeg"})),
        ))
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = json_body(response).await;
    let key = body["key"].as_str().unwrap();
    assert!(key.starts_with("uploads/user-a/"));
    assert!(key.ends_with(".JPG"));
    assert_eq!(body["publicUrl"], format!("/api/files/{}", key));
    let presigned = body["presignedUrl"].as_str().unwrap();
    assert!(presigned.contains(key));
    assert!(presigned.contains("type=image/jpeg"));
    assert!(presigned.contains("ttl=3600"));
}

#[tokio::test]
async fn presign_defaults_content_type_and_uses_public_bucket() {
    let app = test_app_with(UploadSettings {
        public_url: Some("https://cdn.example.com".to_string()),
        ..Default::default()
    });

    let response = app
        .send(request(
            "POST",
            "/api/upload",
            Some("token-a"),
            Some(json!({"filename": "notes"})),
        ))
        .await;
    let body = json_body(response).await;
    let key = body["key"].as_str().unwrap();
    assert_eq!(body["publicUrl"], format!("https://cdn.example.com/{}", key));
    assert!(body["presignedUrl"]
        .as_str()
        .unwrap()
        .contains("type=application/octet-stream"));
}

#[tokio::test]
async fn presign_without_filename_is_rejected() {
    let app = test_app();
    let response = app
        .send(request(
            "POST",
            "/api/upload",
            Some("token-a"),
            Some(json!({"filename": "  ", "contentType": "text/plain"})),
        ))
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(json_body(response).await["error"], "filename is required");
}

#[tokio::test]
async fn persisted_files_are_listed_once_newest_first() {
    let app = test_app();

    for (id, name) in [("f1", "first.txt"), ("f2", "second.txt")] {
        let presign = app
            .send(request(
                "POST",
                "/api/upload",
                Some("token-a"),
                Some(json!({"filename": name, "contentType": "text/plain"})),
            ))
            .await;
        let key = json_body(presign).await["key"].as_str().unwrap().to_string();

        let persist = app
            .send(request(
                "POST",
                "/api/files",
                Some("token-a"),
                Some(json!({"id": id, "name": name, "key": key, "type": "text/plain", "size": 12})),
            ))
            .await;
        assert_eq!(persist.status(), StatusCode::OK);
        let stored = json_body(persist).await;
        assert_eq!(stored["userId"], "user-a");
        assert_eq!(stored["key"], key);
        assert!(stored["createdAt"].is_string());
    }

    let list = json_body(app.send(request("GET", "/api/files", Some("token-a"), None)).await).await;
    let ids: Vec<_> = list
        .as_array()
        .unwrap()
        .iter()
        .map(|f| f["id"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(ids, ["f2", "f1"]);

    let other = json_body(app.send(request("GET", "/api/files", Some("token-b"), None)).await).await;
    assert!(other.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn duplicate_persist_is_a_conflict() {
    let app = test_app();
    let body = json!({"id": "f1", "name": "a.txt", "key": "uploads/user-a/a.txt", "type": "text/plain", "size": 1});

    let first = app
        .send(request("POST", "/api/files", Some("token-a"), Some(body.clone())))
        .await;
    assert_eq!(first.status(), StatusCode::OK);

    let second = app
        .send(request("POST", "/api/files", Some("token-a"), Some(body)))
        .await;
    assert_eq!(second.status(), StatusCode::CONFLICT);
    assert_eq!(app.files.rows.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn download_redirects_to_presigned_url() {
    let app = test_app();
    let response = app
        .send(request("GET", "/api/files/uploads/user-a/nested/a.png", Some("token-a"), None))
        .await;

    assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
    let location = response.headers()[header::LOCATION].to_str().unwrap();
    assert!(location.starts_with("https://storage.test/bucket/uploads/user-a/nested/a.png"));
}

#[tokio::test]
async fn deleting_twice_succeeds_both_times() {
    let app = test_app();
    let key = "uploads/user-a/a.txt";
    app.storage.put(key);
    let persist = app
        .send(request(
            "POST",
            "/api/files",
            Some("token-a"),
            Some(json!({"id": "f1", "name": "a.txt", "key": key, "type": "text/plain", "size": 1})),
        ))
        .await;
    assert_eq!(persist.status(), StatusCode::OK);

    for _ in 0..2 {
        let response = app
            .send(request("DELETE", &format!("/api/files/{}", key), Some("token-a"), None))
            .await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_body(response).await, json!({"success": true}));
    }

    assert!(!app.storage.contains(key));
    assert!(app.files.rows.lock().unwrap().is_empty());
    assert_eq!(
        app.storage
            .delete_calls
            .load(std::sync::atomic::Ordering::SeqCst),
        2
    );
}

#[tokio::test]
async fn me_returns_and_records_profile() {
    let app = test_app();

    let response = app.send(request("GET", "/api/me", Some("token-a"), None)).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["user"]["id"], "user-a");
    assert_eq!(body["user"]["email"], "user-a@example.com");
    assert!(app.users.rows.lock().unwrap().contains_key("user-a"));

    let updated = app
        .send(request(
            "PATCH",
            "/api/me",
            Some("token-a"),
            Some(json!({"name": "Alice"})),
        ))
        .await;
    assert_eq!(updated.status(), StatusCode::OK);
    assert_eq!(json_body(updated).await["user"]["name"], "Alice");

    let empty = app
        .send(request("PATCH", "/api/me", Some("token-a"), Some(json!({}))))
        .await;
    assert_eq!(empty.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn health_is_public() {
    let app = test_app();
    let response = app.send(request("GET", "/api/health", None, None)).await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = json_body(response).await;
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["storageProvider"], "memory");
    assert_eq!(body["authProvider"], "static");
}

#[tokio::test]
async fn persist_answers_ok_with_the_record() {
    let app = test_app();
    let response = app
        .send(request(
            "POST",
            "/api/files",
            Some("token-a"),
            Some(json!({"id": "f9", "name": "a.txt", "key": "uploads/user-a/a.txt", "type": "text/plain", "size": 1})),
        ))
        .await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["id"], "f9");
    assert_eq!(body["key"], "uploads/user-a/a.txt");
    assert_eq!(body["userId"], "user-a");
}

#[tokio::test]
async fn avatar_upload_is_issued_under_caller_avatar_prefix() {
    let app = test_app();

    let response = app
        .send(request(
            "POST",
            "/api/me/avatar",
            Some("token-a"),
            Some(json!({"filename": "me.png", "contentType": "image/png", "userId": "user-a"})),
        ))
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = json_body(response).await;
    let key = body["key"].as_str().unwrap();
    assert!(key.starts_with("avatars/user-a/"));
    assert!(key.ends_with(".png"));
    assert_eq!(body["publicUrl"], format!("/api/{}", key));
    assert!(body["presignedUrl"].as_str().unwrap().contains("type=image/png"));
}

#[tokio::test]
async fn avatar_upload_for_another_user_is_forbidden() {
    let app = test_app();

    let response = app
        .send(request(
            "POST",
            "/api/me/avatar",
            Some("token-a"),
            Some(json!({"filename": "me.png", "userId": "user-b"})),
        ))
        .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert_eq!(
        app.storage
            .presign_calls
            .load(std::sync::atomic::Ordering::SeqCst),
        0
    );
}

#[tokio::test]
async fn avatar_is_deleted_by_url_only_for_its_owner() {
    let app = test_app();
    let key = "avatars/user-a/1700000000000.png";
    app.storage.put(key);
    let url = format!("https://cdn.example.com/{}", key);

    let foreign = app
        .send(request(
            "DELETE",
            "/api/me/avatar",
            Some("token-b"),
            Some(json!({"avatarUrl": url})),
        ))
        .await;
    assert_eq!(foreign.status(), StatusCode::FORBIDDEN);
    assert!(app.storage.contains(key));

    let own = app
        .send(request(
            "DELETE",
            "/api/me/avatar",
            Some("token-a"),
            Some(json!({"avatarUrl": url})),
        ))
        .await;
    assert_eq!(own.status(), StatusCode::OK);
    assert_eq!(json_body(own).await, json!({"success": true}));
    assert!(!app.storage.contains(key));
}

#[tokio::test]
async fn avatar_delete_rejects_urls_without_an_avatar_key() {
    let app = test_app();

    for url in ["https://cdn.example.com/uploads/user-a/x.png", "/api/avatars/", "/api/avatars/user-a/../x"] {
        let response = app
            .send(request(
                "DELETE",
                "/api/me/avatar",
                Some("token-a"),
                Some(json!({"avatarUrl": url})),
            ))
            .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{}", url);
    }
}

#[tokio::test]
async fn avatars_are_readable_without_a_session() {
    let app = test_app();
    let response = app
        .send(request("GET", "/api/avatars/user-a/1700000000000.png", None, None))
        .await;

    assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
    let location = response.headers()[header::LOCATION].to_str().unwrap();
    assert!(location.starts_with("https://storage.test/bucket/avatars/user-a/1700000000000.png"));
}
