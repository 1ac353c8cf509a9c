// tests/auth_authorization_tests.rs
//
// 認証・認可の層をHTTP境界で検証する。
// 全ケースがストアに到達する前に決着するため、DB接続は不要

mod common;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use common::{bearer_token, session_user, test_app};
use http_body_util::BodyExt;
use irms_backend::domain::role::Role;
use tower::ServiceExt;
use uuid::Uuid;

async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn test_health_check_is_public() {
    let (app, _) = test_app();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["status"], "ok");
}

#[tokio::test]
async fn test_protected_route_without_token_is_401() {
    let (app, _) = test_app();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/incidents")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let json = body_json(response).await;
    assert!(json.get("error").is_some());
}

#[tokio::test]
async fn test_tampered_token_is_401() {
    let (app, jwt_manager) = test_app();

    let mut token = bearer_token(&jwt_manager, session_user(Role::Admin, None));
    token.pop();
    token.push('x');

    let response = app
        .oneshot(
            Request::builder()
                .uri("/incidents")
                .header(header::AUTHORIZATION, format!("Bearer {}", token))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_me_returns_session_claims() {
    let (app, jwt_manager) = test_app();

    let department_id = Uuid::new_v4();
    let user = session_user(Role::Manager, Some(department_id));
    let token = bearer_token(&jwt_manager, user.clone());

    let response = app
        .oneshot(
            Request::builder()
                .uri("/auth/me")
                .header(header::AUTHORIZATION, format!("Bearer {}", token))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["role"], "MANAGER");
    assert_eq!(json["departmentId"], department_id.to_string());
    assert_eq!(json["email"], user.email);
}

#[tokio::test]
async fn test_session_cookie_is_accepted() {
    let (app, jwt_manager) = test_app();

    let token = bearer_token(&jwt_manager, session_user(Role::Employee, None));

    let response = app
        .oneshot(
            Request::builder()
                .uri("/auth/me")
                .header(header::COOKIE, format!("session_token={}", token))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_login_validation_rejects_bad_email() {
    let (app, _) = test_app();

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/auth/login")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(
                    r#"{"email": "not-an-email", "password": "password123"}"#,
                ))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["error"], "Validation failed");
}

#[tokio::test]
async fn test_user_listing_is_admin_only() {
    let (app, jwt_manager) = test_app();

    let token = bearer_token(
        &jwt_manager,
        session_user(Role::Employee, Some(Uuid::new_v4())),
    );

    let response = app
        .oneshot(
            Request::builder()
                .uri("/users")
                .header(header::AUTHORIZATION, format!("Bearer {}", token))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_audit_logs_are_admin_only() {
    let (app, jwt_manager) = test_app();

    let token = bearer_token(
        &jwt_manager,
        session_user(Role::Manager, Some(Uuid::new_v4())),
    );

    let response = app
        .oneshot(
            Request::builder()
                .uri("/audit-logs")
                .header(header::AUTHORIZATION, format!("Bearer {}", token))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

/// 部門未設定のマネージャーは設定エラーとして明示的に拒否される
/// （空の一覧にも全件にもならない）
#[tokio::test]
async fn test_manager_without_department_is_rejected_explicitly() {
    let (app, jwt_manager) = test_app();

    let token = bearer_token(&jwt_manager, session_user(Role::Manager, None));

    for uri in ["/incidents", "/risks", "/dashboard/overview"] {
        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .uri(uri)
                    .header(header::AUTHORIZATION, format!("Bearer {}", token))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::FORBIDDEN, "uri: {}", uri);
        let json = body_json(response).await;
        assert!(
            json["error"]
                .as_str()
                .unwrap()
                .contains("no department assigned"),
            "uri: {}",
            uri
        );
    }
}

#[tokio::test]
async fn test_employee_cannot_create_risk() {
    let (app, jwt_manager) = test_app();

    let token = bearer_token(
        &jwt_manager,
        session_user(Role::Employee, Some(Uuid::new_v4())),
    );

    let body = serde_json::json!({
        "title": "Vendor lock-in risk",
        "description": "A single cloud provider hosts all production workloads today.",
        "category": "Operational",
        "departmentId": Uuid::new_v4(),
    });

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/risks")
                .header(header::AUTHORIZATION, format!("Bearer {}", token))
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_task_with_both_relations_is_rejected() {
    let (app, jwt_manager) = test_app();

    let token = bearer_token(
        &jwt_manager,
        session_user(Role::Manager, Some(Uuid::new_v4())),
    );

    let body = serde_json::json!({
        "title": "Investigate root cause",
        "assignedToId": Uuid::new_v4(),
        "relatedIncidentId": Uuid::new_v4(),
        "relatedRiskId": Uuid::new_v4(),
    });

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/tasks")
                .header(header::AUTHORIZATION, format!("Bearer {}", token))
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_comment_query_requires_exactly_one_target() {
    let (app, jwt_manager) = test_app();

    let token = bearer_token(&jwt_manager, session_user(Role::Admin, None));

    let response = app
        .oneshot(
            Request::builder()
                .uri("/comments")
                .header(header::AUTHORIZATION, format!("Bearer {}", token))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_invalid_uuid_path_is_validation_error() {
    let (app, jwt_manager) = test_app();

    let token = bearer_token(&jwt_manager, session_user(Role::Admin, None));

    let response = app
        .oneshot(
            Request::builder()
                .uri("/incidents/not-a-uuid")
                .header(header::AUTHORIZATION, format!("Bearer {}", token))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
