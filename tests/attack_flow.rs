// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

use std::time::Duration;

use chrono::Utc;
use fgsm_client::auth::token::unsigned_token;
use fgsm_client::error::{GENERIC_SERVER_ERROR, NO_RESPONSE_MESSAGE};
use fgsm_client::{
    AttackParameters, AttackSelection, ClientApp, ClientConfig, Error, ImageFile, ModelId, Route,
};
use serde_json::{json, Value};
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn config(server: &MockServer) -> ClientConfig {
    ClientConfig::default()
        .api_base(server.uri())
        .unwrap()
        .timeout(Duration::from_secs(5))
}

fn live_token() -> String {
    unsigned_token(&json!({ "user_id": 1, "exp": Utc::now().timestamp() + 3600 }))
}

fn attack_body() -> Value {
    json!({
        "epsilon_used": 0.05,
        "orig_class": "cat",
        "orig_conf": 0.9,
        "adv_class": "dog",
        "adv_conf": 0.6,
        "original_image": "AAA",
        "perturbation_image": "BBB",
        "adversarial_image": "CCC"
    })
}

fn cat() -> AttackSelection {
    AttackSelection::file(ImageFile::new("cat.png", vec![0x89, 0x50, 0x4e, 0x47]))
}

async fn logged_in_app(server: &MockServer, token: &str) -> ClientApp {
    Mock::given(method("POST"))
        .and(path("/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "message": "Login successful",
            "token": token,
            "user": {"user_id": 1, "email": "test@example.com"}
        })))
        .mount(server)
        .await;

    let app = ClientApp::new(config(server)).unwrap();
    app.login("test@example.com", "Password123").await.unwrap();
    app
}

async fn attack_requests(server: &MockServer) -> Vec<String> {
    server
        .received_requests()
        .await
        .unwrap()
        .into_iter()
        .filter(|r| r.url.path().starts_with("/attack"))
        .map(|r| String::from_utf8_lossy(&r.body).into_owned())
        .collect()
}

#[tokio::test]
async fn test_file_attack_is_normalized_and_presented() {
    let server = MockServer::start().await;
    let token = live_token();
    let app = logged_in_app(&server, &token).await;

    Mock::given(method("POST"))
        .and(path("/attack"))
        .and(header("authorization", format!("Bearer {}", token).as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(attack_body()))
        .expect(1)
        .mount(&server)
        .await;

    let params = AttackParameters::new()
        .model(ModelId::MobilenetV2)
        .epsilon(0.05)
        .auto_tune(false);
    let outcome = app.attack(&cat(), &params).await.unwrap();

    let result = &outcome.result;
    assert_eq!(result.original_image, "data:image/png;base64,AAA");
    assert_eq!(result.perturbation_image, "data:image/png;base64,BBB");
    assert_eq!(result.adversarial_image, "data:image/png;base64,CCC");
    assert_eq!(result.epsilon_used, 0.05);
    assert_eq!(result.orig_class, "cat");
    assert_eq!(result.orig_conf, 0.9);
    assert_eq!(result.adv_class, "dog");
    assert_eq!(result.adv_conf, 0.6);
    assert!(outcome.warning.is_none());

    assert_eq!(app.router().current_route(), Some(Route::Results));
    assert_eq!(app.router().results().as_ref(), Some(result));
    assert!(!app.attacks().is_loading());

    let bodies = attack_requests(&server).await;
    assert_eq!(bodies.len(), 1);
    assert!(bodies[0].contains("name=\"image\""));
    assert!(bodies[0].contains("name=\"model\"\r\n\r\nmobilenet_v2"));
    assert!(bodies[0].contains("name=\"autoTune\"\r\n\r\nfalse"));
    assert!(bodies[0].contains("name=\"epsilon\"\r\n\r\n0.05"));
}

#[tokio::test]
async fn test_auto_tune_omits_epsilon() {
    let server = MockServer::start().await;
    let app = ClientApp::new(config(&server)).unwrap();

    Mock::given(method("POST"))
        .and(path("/attack"))
        .respond_with(ResponseTemplate::new(200).set_body_json(attack_body()))
        .mount(&server)
        .await;

    let params = AttackParameters::new().auto_tune(true);
    app.attack(&cat(), &params).await.unwrap();

    let bodies = attack_requests(&server).await;
    assert!(bodies[0].contains("name=\"autoTune\"\r\n\r\ntrue"));
    assert!(!bodies[0].contains("name=\"epsilon\""));
}

#[tokio::test]
async fn test_no_input_makes_no_request() {
    let server = MockServer::start().await;
    let app = ClientApp::new(config(&server)).unwrap();

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(attack_body()))
        .expect(0)
        .mount(&server)
        .await;

    let err = app
        .attack(&AttackSelection::new(), &AttackParameters::default())
        .await
        .unwrap_err();

    assert!(err.is_validation());
    assert!(!app.attacks().is_loading());
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_embedded_error_is_not_presented() {
    let server = MockServer::start().await;
    let app = logged_in_app(&server, &live_token()).await;
    app.navigate("/attack").unwrap();

    Mock::given(method("POST"))
        .and(path("/attack"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"error": "Unsupported image format"})),
        )
        .mount(&server)
        .await;

    let err = app.attack(&cat(), &AttackParameters::default()).await.unwrap_err();

    assert!(matches!(&err, Error::ServerReported(m) if m == "Unsupported image format"));
    assert_eq!(err.user_message(), "Unsupported image format");
    assert_eq!(app.router().current_route(), Some(Route::Attack));
    assert!(app.router().results().is_none());
    assert!(!app.attacks().is_loading());
}

#[tokio::test]
async fn test_warning_still_produces_result() {
    let server = MockServer::start().await;
    let app = logged_in_app(&server, &live_token()).await;

    let mut body = attack_body();
    body["warning"] = json!("Attack did not change the prediction");
    body["model_used"] = json!("mobilenet_v2");
    Mock::given(method("POST"))
        .and(path("/attack"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(&server)
        .await;

    let outcome = app.attack(&cat(), &AttackParameters::default()).await.unwrap();

    assert_eq!(
        outcome.warning.as_deref(),
        Some("Attack did not change the prediction")
    );
    assert_eq!(outcome.result.model_used.as_deref(), Some("mobilenet_v2"));
    assert_eq!(app.router().current_route(), Some(Route::Results));
}

#[tokio::test]
async fn test_error_response_uses_body_message() {
    let server = MockServer::start().await;
    let app = ClientApp::new(config(&server)).unwrap();

    Mock::given(method("POST"))
        .and(path("/attack"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({"error": "Model failed to load"})))
        .mount(&server)
        .await;

    let err = app.attack(&cat(), &AttackParameters::default()).await.unwrap_err();

    assert!(matches!(err, Error::TransportErrorResponse { status: 500, .. }));
    assert_eq!(err.user_message(), "Model failed to load");
    assert!(!app.attacks().is_loading());
}

#[tokio::test]
async fn test_error_response_without_message_is_generic() {
    let server = MockServer::start().await;
    let app = ClientApp::new(config(&server)).unwrap();

    Mock::given(method("POST"))
        .and(path("/attack"))
        .respond_with(ResponseTemplate::new(503).set_body_string("Service Unavailable"))
        .mount(&server)
        .await;

    let err = app.attack(&cat(), &AttackParameters::default()).await.unwrap_err();

    assert_eq!(err.status_code(), Some(503));
    assert_eq!(err.user_message(), GENERIC_SERVER_ERROR);
}

#[tokio::test]
async fn test_unreachable_server_is_no_response() {
    let config = ClientConfig::default()
        .api_base("http://127.0.0.1:9")
        .unwrap()
        .timeout(Duration::from_secs(2));
    let app = ClientApp::new(config).unwrap();

    let err = app.attack(&cat(), &AttackParameters::default()).await.unwrap_err();

    assert!(matches!(err, Error::TransportNoResponse { .. }));
    assert_eq!(err.user_message(), NO_RESPONSE_MESSAGE);
    assert!(!app.attacks().is_loading());
}

#[tokio::test]
async fn test_url_attack_sends_json() {
    let server = MockServer::start().await;
    let app = ClientApp::new(config(&server)).unwrap();

    Mock::given(method("POST"))
        .and(path("/attack-from-url"))
        .and(body_json(json!({
            "imageUrl": "http://localhost:5000/static/images/cat.jpg",
            "model": "inception_v3",
            "epsilon": 0.05,
            "autoTune": true
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(attack_body()))
        .expect(1)
        .mount(&server)
        .await;

    let mut selection = cat();
    selection.select_url("http://localhost:5000/static/images/cat.jpg");
    let params = AttackParameters::new()
        .model(ModelId::InceptionV3)
        .auto_tune(true);

    let outcome = app.attack(&selection, &params).await.unwrap();
    assert_eq!(outcome.result.adversarial_image, "data:image/png;base64,CCC");
}

#[tokio::test]
async fn test_available_images() {
    let server = MockServer::start().await;
    let app = ClientApp::new(config(&server)).unwrap();

    Mock::given(method("GET"))
        .and(path("/available-images"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "images": [
                {"filename": "cat.jpg", "label": "cat", "url": "http://localhost:5000/static/images/cat.jpg"},
                {"filename": "dog.jpg", "label": "dog", "url": "http://localhost:5000/static/images/dog.jpg"}
            ]
        })))
        .mount(&server)
        .await;

    let images = app.available_images().await.unwrap();
    assert_eq!(images.len(), 2);
    assert_eq!(images[1].label, "dog");
}

#[tokio::test]
async fn test_available_images_failure_flag() {
    let server = MockServer::start().await;
    let app = ClientApp::new(config(&server)).unwrap();

    Mock::given(method("GET"))
        .and(path("/available-images"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": false})))
        .mount(&server)
        .await;

    let err = app.available_images().await.unwrap_err();
    assert_eq!(err.user_message(), "Failed to load images");
}
