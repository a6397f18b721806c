use actix_web::body::MessageBody;
use actix_web::dev::{Service, ServiceResponse};
use actix_web::http::{header, StatusCode};
use actix_web::middleware::Logger;
use actix_web::{test, App};
use chrono::{Duration, Utc};
use fakelive::auth::TokenResponse;
use fakelive::config::{AuthConfig, UploadConfig};
use fakelive::error::{INVALID_CREDENTIALS_MESSAGE, INVALID_TOKEN_MESSAGE};
use fakelive::models::UserOut;
use fakelive::routes;
use fakelive::store::MemoryStore;
use fakelive::AppState;
use pretty_assertions::assert_eq;
use serde_json::json;
use std::sync::Arc;

fn test_state() -> AppState {
    let auth = AuthConfig {
        jwt_secret: "integration-secret".to_string(),
        token_ttl: Duration::minutes(30),
        hash_cost: 4,
    };
    let upload = UploadConfig {
        dir: std::env::temp_dir().join("fakelive-auth-tests"),
    };
    AppState::new(Arc::new(MemoryStore::new()), &auth, upload).expect("state")
}

async fn register_user(
    app: &impl Service<
        actix_http::Request,
        Response = ServiceResponse<impl MessageBody>,
        Error = actix_web::Error,
    >,
    email: &str,
    password: &str,
) -> (StatusCode, serde_json::Value) {
    let req = test::TestRequest::post()
        .uri("/register")
        .set_json(json!({ "email": email, "password": password }))
        .to_request();
    let resp = test::call_service(app, req).await;
    let status = resp.status();
    let body = test::read_body(resp).await;
    (status, serde_json::from_slice(&body).unwrap_or(serde_json::Value::Null))
}

async fn login_user(
    app: &impl Service<
        actix_http::Request,
        Response = ServiceResponse<impl MessageBody>,
        Error = actix_web::Error,
    >,
    email: &str,
    password: &str,
) -> (StatusCode, serde_json::Value) {
    let req = test::TestRequest::post()
        .uri("/login")
        .set_form([("username", email), ("password", password)])
        .to_request();
    let resp = test::call_service(app, req).await;
    let status = resp.status();
    let body = test::read_body(resp).await;
    (status, serde_json::from_slice(&body).unwrap_or(serde_json::Value::Null))
}

#[actix_rt::test]
async fn test_register_and_login_flow() {
    let state = test_state();
    let app = test::init_service(
        App::new()
            .wrap(Logger::default())
            .configure(|cfg| state.configure(cfg))
            .configure(routes::config),
    )
    .await;

    let (status, body) = register_user(&app, "Integration@Example.com", "Password123!").await;
    assert_eq!(status, StatusCode::OK, "Registration failed. Body: {}", body);
    let user: UserOut = serde_json::from_value(body.clone()).unwrap();
    assert_eq!(user.email, "integration@example.com");
    assert!(body.get("hashed_password").is_none());
    assert!(!body.to_string().contains("Password123!"));

    // Same email, different case: still a duplicate.
    let (status, body) = register_user(&app, "integration@example.com", "Password123!").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Email already registered");

    let (status, body) = login_user(&app, "integration@example.com", "Password123!").await;
    assert_eq!(status, StatusCode::OK, "Login failed. Body: {}", body);
    let token: TokenResponse = serde_json::from_value(body).unwrap();
    assert_eq!(token.token_type, "bearer");

    let identity = state.validator.validate(&token.access_token).unwrap();
    assert_eq!(identity.email, "integration@example.com");
}

#[actix_rt::test]
async fn test_invalid_registration_inputs() {
    let state = test_state();
    let app = test::init_service(
        App::new()
            .configure(|cfg| state.configure(cfg))
            .configure(routes::config),
    )
    .await;

    let test_cases = vec![
        (
            json!({ "password": "Password123!" }),
            StatusCode::BAD_REQUEST,
            "missing email",
        ),
        (
            json!({ "email": "test@example.com" }),
            StatusCode::BAD_REQUEST,
            "missing password",
        ),
        (
            json!({ "email": "invalid-email", "password": "Password123!" }),
            StatusCode::UNPROCESSABLE_ENTITY,
            "invalid email format",
        ),
        (
            json!({ "email": "test@example.com", "password": "123" }),
            StatusCode::UNPROCESSABLE_ENTITY,
            "password too short",
        ),
        (
            json!({ "email": "test@example.com", "password": "a".repeat(73) }),
            StatusCode::UNPROCESSABLE_ENTITY,
            "password past bcrypt limit",
        ),
    ];

    for (payload, expected_status, description) in test_cases {
        let req = test::TestRequest::post()
            .uri("/register")
            .set_json(&payload)
            .to_request();

        let resp = test::call_service(&app, req).await;
        let status = resp.status();
        let body_bytes = test::read_body(resp).await;

        assert_eq!(
            status,
            expected_status,
            "Test case failed: {}. Body: {:?}",
            description,
            String::from_utf8_lossy(&body_bytes)
        );
        let body: serde_json::Value = serde_json::from_slice(&body_bytes)
            .unwrap_or_else(|_| panic!("{}: body is not JSON", description));
        assert!(
            body["error"].is_string(),
            "{}: unexpected body {}",
            description,
            body
        );
    }

    // Not JSON at all.
    let req = test::TestRequest::post()
        .uri("/register")
        .insert_header((header::CONTENT_TYPE, "application/json"))
        .set_payload("{not json")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert!(body["error"].is_string());
}

#[actix_rt::test]
async fn test_login_failures_do_not_reveal_which_part_was_wrong() {
    let state = test_state();
    let app = test::init_service(
        App::new()
            .configure(|cfg| state.configure(cfg))
            .configure(routes::config),
    )
    .await;

    let (status, _) = register_user(&app, "login_test_user@example.com", "Password123!").await;
    assert_eq!(status, StatusCode::OK);

    let (wrong_status, wrong_body) =
        login_user(&app, "login_test_user@example.com", "WrongPassword123!").await;
    let (unknown_status, unknown_body) =
        login_user(&app, "nonexistent@example.com", "Password123!").await;

    assert_eq!(wrong_status, StatusCode::UNAUTHORIZED);
    assert_eq!(unknown_status, StatusCode::UNAUTHORIZED);
    assert_eq!(wrong_body, unknown_body);
    assert_eq!(wrong_body["error"], INVALID_CREDENTIALS_MESSAGE);

    // Missing form field is a malformed request, not an auth failure.
    let req = test::TestRequest::post()
        .uri("/login")
        .set_form([("username", "login_test_user@example.com")])
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert!(body["error"].is_string());
}

#[actix_rt::test]
async fn test_rejected_tokens_are_indistinguishable() {
    let state = test_state();
    let app = test::init_service(
        App::new()
            .configure(|cfg| state.configure(cfg))
            .configure(routes::config),
    )
    .await;

    let (status, _) = register_user(&app, "tokens@example.com", "Password123!").await;
    assert_eq!(status, StatusCode::OK);

    let expired = state
        .authenticator
        .issue_token_at("tokens@example.com", Utc::now() - Duration::hours(3))
        .unwrap();
    let valid = state.authenticator.issue_token("tokens@example.com").unwrap();
    let (head, _) = valid.rsplit_once('.').unwrap();
    let forged = format!("{}.{}", head, "c2lnbmF0dXJlLWZyb20tc29tZXdoZXJlLWVsc2U");
    let unknown_subject = state.authenticator.issue_token("ghost@example.com").unwrap();

    let mut responses = Vec::new();
    for authorization in [
        Some(format!("Bearer {}", expired)),
        Some(format!("Bearer {}", forged)),
        Some(format!("Bearer {}", unknown_subject)),
        Some("Token abc".to_string()),
        None,
    ] {
        let mut req = test::TestRequest::post()
            .uri("/items")
            .set_json(json!({ "content": "should not be stored" }));
        if let Some(value) = &authorization {
            req = req.insert_header((header::AUTHORIZATION, value.as_str()));
        }
        let resp = test::call_service(&app, req.to_request()).await;
        let status = resp.status();
        let www_authenticate = resp
            .headers()
            .get(header::WWW_AUTHENTICATE)
            .map(|v| v.to_str().unwrap().to_string());
        let body = test::read_body(resp).await;
        responses.push((status, www_authenticate, body));
    }

    for (status, www_authenticate, body) in &responses {
        assert_eq!(*status, StatusCode::UNAUTHORIZED);
        assert_eq!(www_authenticate.as_deref(), Some("Bearer"));
        assert_eq!(body, &responses[0].2);
    }
    let body: serde_json::Value = serde_json::from_slice(&responses[0].2).unwrap();
    assert_eq!(body["error"], INVALID_TOKEN_MESSAGE);

    // Nothing was posted by any of the rejected requests.
    let req = test::TestRequest::get().uri("/items").to_request();
    let items: Vec<serde_json::Value> = test::call_and_read_body_json(&app, req).await;
    assert!(items.is_empty());
}
