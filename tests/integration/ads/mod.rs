//! Advertisement endpoint integration tests
//!
//! Tests the 4 advertisement endpoints:
//! - POST /adv - Create advertisement
//! - GET /adv/{id} - Get advertisement
//! - PATCH /adv/{id} - Partially update advertisement
//! - DELETE /adv/{id} - Delete advertisement

use axum::http::{header::CONTENT_TYPE, Method, StatusCode};
use serde_json::{json, Value};
use tower::ServiceExt;

use crate::common::{
    body_json, delete, get, patch_json, post_json, raw_json, unique_owner, TestApp,
};

/// Create an advertisement and return its id.
async fn create_ad(app: &TestApp, header: &str, description: &str, owner: &str) -> i64 {
    let response = app
        .router()
        .oneshot(post_json(
            "/adv",
            &json!({"header": header, "description": description, "owner": owner}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    body["id"].as_i64().expect("create response carries an id")
}

mod test_create {
    use super::*;

    #[tokio::test]
    async fn test_create_then_get_round_trips_all_fields() {
        let Some(app) = TestApp::spawn().await else {
            return;
        };
        let owner = unique_owner();

        let id = create_ad(&app, "Sale", "50% off", &owner).await;

        let response = app.router().oneshot(get(&format!("/adv/{id}"))).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response
                .headers()
                .get(CONTENT_TYPE)
                .and_then(|v| v.to_str().ok()),
            Some("application/json")
        );

        let body = body_json(response).await;
        assert_eq!(
            body,
            json!({"header": "Sale", "description": "50% off", "owner": owner})
        );
    }

    #[tokio::test]
    async fn test_create_accepts_empty_strings() {
        let Some(app) = TestApp::spawn().await else {
            return;
        };

        let response = app
            .router()
            .oneshot(post_json(
                "/adv",
                &json!({"header": "", "description": "", "owner": ""}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_create_with_missing_field_is_400() {
        let Some(app) = TestApp::spawn().await else {
            return;
        };

        let response = app
            .router()
            .oneshot(post_json("/adv", &json!({"header": "Sale"})))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = body_json(response).await;
        assert_eq!(body["status"], "error");
        assert!(body["description"].is_string());
    }

    #[tokio::test]
    async fn test_create_with_malformed_json_is_400() {
        let Some(app) = TestApp::spawn().await else {
            return;
        };

        let response = app
            .router()
            .oneshot(raw_json(Method::POST, "/adv", "{not json"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_create_rejects_client_supplied_id() {
        let Some(app) = TestApp::spawn().await else {
            return;
        };

        let response = app
            .router()
            .oneshot(post_json(
                "/adv",
                &json!({"header": "Sale", "description": "x", "owner": "alice", "id": 12345}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_concurrent_creates_assign_distinct_ids() {
        let Some(app) = TestApp::spawn().await else {
            return;
        };
        let owner = unique_owner();

        let mut handles = Vec::new();
        for n in 0..8 {
            let router = app.router();
            let owner = owner.clone();
            handles.push(tokio::spawn(async move {
                let response = router
                    .oneshot(post_json(
                        "/adv",
                        &json!({"header": format!("ad {n}"), "description": "d", "owner": owner}),
                    ))
                    .await
                    .unwrap();
                assert_eq!(response.status(), StatusCode::OK);
                body_json(response).await["id"].as_i64().unwrap()
            }));
        }

        let mut seen = std::collections::HashSet::new();
        for handle in handles {
            let id = handle.await.unwrap();
            assert!(seen.insert(id), "id {id} assigned twice");
        }
    }
}

mod test_get {
    use super::*;

    #[tokio::test]
    async fn test_get_unknown_id_is_404() {
        let Some(app) = TestApp::spawn().await else {
            return;
        };

        let response = app
            .router()
            .oneshot(get("/adv/9000000000000000000"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let body = body_json(response).await;
        assert_eq!(body["status"], "error");
        assert!(body["description"].is_string());
    }

    #[tokio::test]
    async fn test_get_non_numeric_id_is_404() {
        let Some(app) = TestApp::spawn().await else {
            return;
        };

        for uri in ["/adv/abc", "/adv/12x", "/adv/-1"] {
            let response = app.router().oneshot(get(uri)).await.unwrap();
            assert_eq!(response.status(), StatusCode::NOT_FOUND, "uri {uri}");
        }
    }
}

mod test_update {
    use super::*;

    #[tokio::test]
    async fn test_patch_changes_only_named_fields() {
        let Some(app) = TestApp::spawn().await else {
            return;
        };
        let owner = unique_owner();
        let id = create_ad(&app, "Sale", "50% off", &owner).await;

        let response = app
            .router()
            .oneshot(patch_json(&format!("/adv/{id}"), &json!({"owner": "bob"})))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await, json!({"id": id}));

        let response = app.router().oneshot(get(&format!("/adv/{id}"))).await.unwrap();
        let body = body_json(response).await;
        assert_eq!(
            body,
            json!({"header": "Sale", "description": "50% off", "owner": "bob"})
        );
    }

    #[tokio::test]
    async fn test_patch_does_not_touch_created_at() {
        let Some(app) = TestApp::spawn().await else {
            return;
        };
        let id = create_ad(&app, "Sale", "50% off", &unique_owner()).await;

        let created_at: chrono::DateTime<chrono::Utc> =
            sqlx::query_scalar("SELECT created_at FROM advs WHERE id = $1")
                .bind(id)
                .fetch_one(app.storage.pool())
                .await
                .unwrap();

        let response = app
            .router()
            .oneshot(patch_json(&format!("/adv/{id}"), &json!({"header": "Mega sale"})))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let after: chrono::DateTime<chrono::Utc> =
            sqlx::query_scalar("SELECT created_at FROM advs WHERE id = $1")
                .bind(id)
                .fetch_one(app.storage.pool())
                .await
                .unwrap();
        assert_eq!(created_at, after);
    }

    #[tokio::test]
    async fn test_patch_naming_immutable_fields_is_400_and_leaves_row_unchanged() {
        let Some(app) = TestApp::spawn().await else {
            return;
        };
        let owner = unique_owner();
        let id = create_ad(&app, "Sale", "50% off", &owner).await;

        for payload in [
            json!({"id": 99}),
            json!({"created_at": "2020-01-01T00:00:00Z"}),
            json!({"owner": "bob", "id": 99}),
        ] {
            let response = app
                .router()
                .oneshot(patch_json(&format!("/adv/{id}"), &payload))
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::BAD_REQUEST, "payload {payload}");
        }

        let response = app.router().oneshot(get(&format!("/adv/{id}"))).await.unwrap();
        let body = body_json(response).await;
        assert_eq!(
            body,
            json!({"header": "Sale", "description": "50% off", "owner": owner})
        );
    }

    #[tokio::test]
    async fn test_patch_with_malformed_json_is_400_and_leaves_row_unchanged() {
        let Some(app) = TestApp::spawn().await else {
            return;
        };
        let owner = unique_owner();
        let id = create_ad(&app, "Sale", "50% off", &owner).await;

        let response = app
            .router()
            .oneshot(raw_json(Method::PATCH, &format!("/adv/{id}"), "{not json"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response = app.router().oneshot(get(&format!("/adv/{id}"))).await.unwrap();
        let body = body_json(response).await;
        assert_eq!(body["owner"], Value::String(owner));
    }

    #[tokio::test]
    async fn test_patch_unknown_id_is_404() {
        let Some(app) = TestApp::spawn().await else {
            return;
        };

        let response = app
            .router()
            .oneshot(patch_json("/adv/9000000000000000000", &json!({"owner": "bob"})))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}

mod test_delete {
    use super::*;

    #[tokio::test]
    async fn test_delete_then_get_is_404() {
        let Some(app) = TestApp::spawn().await else {
            return;
        };
        let id = create_ad(&app, "Sale", "50% off", &unique_owner()).await;

        let response = app.router().oneshot(delete(&format!("/adv/{id}"))).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await, json!({"status": "success"}));

        let response = app.router().oneshot(get(&format!("/adv/{id}"))).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_delete_nonexistent_id_is_404_not_success() {
        let Some(app) = TestApp::spawn().await else {
            return;
        };

        let response = app
            .router()
            .oneshot(delete("/adv/9000000000000000000"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let body = body_json(response).await;
        assert_eq!(body["status"], "error");
    }

    #[tokio::test]
    async fn test_delete_twice_is_404_the_second_time() {
        let Some(app) = TestApp::spawn().await else {
            return;
        };
        let id = create_ad(&app, "Sale", "50% off", &unique_owner()).await;

        let response = app.router().oneshot(delete(&format!("/adv/{id}"))).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let response = app.router().oneshot(delete(&format!("/adv/{id}"))).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}

mod test_infrastructure {
    use super::*;

    #[tokio::test]
    async fn test_health_endpoint() {
        let Some(app) = TestApp::spawn().await else {
            return;
        };

        let response = app.router().oneshot(get("/health")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_error_responses_are_json() {
        let Some(app) = TestApp::spawn().await else {
            return;
        };

        let response = app.router().oneshot(get("/adv/abc")).await.unwrap();
        assert_eq!(
            response
                .headers()
                .get(CONTENT_TYPE)
                .and_then(|v| v.to_str().ok()),
            Some("application/json")
        );
    }
}
