//! HTTP-level tests over in-memory adapters.

use std::path::PathBuf;
use std::sync::Arc;

use actix_web::http::{StatusCode, header};
use actix_web::{App, test, web};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;

use postcard_core::domain::{PropertyValue, StoreKey};
use postcard_core::ports::KeyValueStore;
use postcard_infra::rate_limit::XMAS_POSTCARD_SUBMISSIONS;
use postcard_infra::{
    BasicAuthConfig, BasicAuthGate, InMemoryDocumentStore, InMemoryStore, RateLimitConfig,
};
use postcard_shared::{SubmissionTotals, VisitTotals};

use crate::config::AppConfig;
use crate::handlers;
use crate::state::AppState;

const DATABASE: &str = "db";
const ADMIN_USER: &str = "santa";
const ADMIN_PASS: &str = "h0h0h0";

struct Harness {
    state: AppState,
    store: Arc<InMemoryStore>,
    documents: Arc<InMemoryDocumentStore>,
    static_dir: PathBuf,
}

impl Harness {
    fn new() -> Self {
        Self::with_auth(BasicAuthConfig::new(ADMIN_USER, ADMIN_PASS))
    }

    fn with_auth(auth: BasicAuthConfig) -> Self {
        let static_dir = std::env::temp_dir().join(format!("postcard-static-{}", uuid::Uuid::new_v4()));
        std::fs::create_dir_all(&static_dir).unwrap();
        std::fs::write(static_dir.join("index.html"), "<h1>Send a postcard</h1>").unwrap();
        std::fs::write(static_dir.join("stamp.png"), [0x89, b'P', b'N', b'G']).unwrap();

        let config = AppConfig {
            static_dir: static_dir.clone(),
            notion_database_id: DATABASE.to_string(),
            rate_limits: RateLimitConfig::default(),
            ..AppConfig::default()
        };

        let store = Arc::new(InMemoryStore::new());
        let documents = Arc::new(InMemoryDocumentStore::new());
        let state = AppState::assemble(
            &config,
            store.clone(),
            documents.clone(),
            Arc::new(BasicAuthGate::new(auth)),
        );

        Self {
            state,
            store,
            documents,
            static_dir,
        }
    }

    async fn count(&self) -> Option<String> {
        self.store.get(&StoreKey::submissions_count()).await.unwrap()
    }
}

impl Drop for Harness {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(&self.static_dir);
    }
}

macro_rules! app {
    ($harness:expr) => {
        test::init_service(
            App::new()
                .app_data(web::Data::new($harness.state.clone()))
                .configure(handlers::configure_routes)
                .default_service(web::to(handlers::pages::not_found)),
        )
        .await
    };
}

fn postcard(ip: &str, body: &str) -> test::TestRequest {
    test::TestRequest::post()
        .uri("/api/xmas-cards")
        .peer_addr(format!("{}:40000", ip).parse().unwrap())
        .insert_header((header::CONTENT_TYPE, "application/json"))
        .set_payload(body.to_string())
}

fn basic(user: &str, pass: &str) -> (header::HeaderName, String) {
    (
        header::AUTHORIZATION,
        format!("Basic {}", STANDARD.encode(format!("{}:{}", user, pass))),
    )
}

const BOB_FOR_AMY: &str = r#"{"recipient_name":"Bob","recipient_address_1":"1 Elm St","recipient_address_2":"","recipient_state":"Goa","pin":"403001","sender_name":"Amy"}"#;

#[actix_web::test]
async fn test_submissions_are_capped_per_client() {
    let harness = Harness::new();
    let app = app!(harness);

    for expected in 1..=5u64 {
        let resp = test::call_service(&app, postcard("1.2.3.4", BOB_FOR_AMY).to_request()).await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(resp.headers().get("x-ratelimit-limit").unwrap(), "5");

        let totals: SubmissionTotals = test::read_body_json(resp).await;
        assert_eq!(totals.total_submissions, expected);
    }

    let resp = test::call_service(&app, postcard("1.2.3.4", BOB_FOR_AMY).to_request()).await;
    assert_eq!(resp.status(), StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(test::read_body(resp).await, "Too Many Requests");

    // The rejected request reached neither Notion nor the counter
    assert_eq!(harness.documents.pages(DATABASE).await.len(), 5);
    assert_eq!(harness.count().await, Some("5".to_string()));

    // Another client still has its full allowance
    let resp = test::call_service(&app, postcard("5.6.7.8", BOB_FOR_AMY).to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let totals: SubmissionTotals = test::read_body_json(resp).await;
    assert_eq!(totals.total_submissions, 6);
}

#[actix_web::test]
async fn test_bob_from_amy_sixth_attempt_is_rejected() {
    let harness = Harness::new();
    let app = app!(harness);
    let body = r#"{"recipient_name":"Bob","sender_name":"Amy"}"#;

    let resp = test::call_service(&app, postcard("1.2.3.4", body).to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let json: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(json, serde_json::json!({ "totalSubmissions": 1 }));

    let mut statuses = Vec::new();
    for _ in 0..5 {
        let resp = test::call_service(&app, postcard("1.2.3.4", body).to_request()).await;
        statuses.push(resp.status());
    }
    assert_eq!(
        statuses,
        [
            StatusCode::OK,
            StatusCode::OK,
            StatusCode::OK,
            StatusCode::OK,
            StatusCode::TOO_MANY_REQUESTS,
        ]
    );
    assert_eq!(harness.count().await, Some("5".to_string()));
}

#[actix_web::test]
async fn test_array_body_is_500_and_not_forwarded() {
    let harness = Harness::new();
    let app = app!(harness);

    for body in ["[]", r#"["Bob"]"#] {
        let resp = test::call_service(&app, postcard("1.2.3.4", body).to_request()).await;
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR, "{}", body);
    }
    assert!(harness.documents.pages(DATABASE).await.is_empty());
    assert_eq!(harness.count().await, None);
}

#[actix_web::test]
async fn test_submission_fields_are_forwarded() {
    let harness = Harness::new();
    let app = app!(harness);

    let resp = test::call_service(&app, postcard("1.2.3.4", BOB_FOR_AMY).to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let pages = harness.documents.pages(DATABASE).await;
    assert_eq!(pages.len(), 1);
    let page = &pages[0];

    assert_eq!(
        page.get("Recipient Full Name"),
        Some(&PropertyValue::Title("Bob".to_string()))
    );
    assert_eq!(
        page.get("Recipient Address Line 2"),
        Some(&PropertyValue::RichText("N/A".to_string()))
    );
    assert_eq!(
        page.get("Sender Name"),
        Some(&PropertyValue::RichText("Amy".to_string()))
    );
    assert_eq!(
        page.get("Sender IP Address"),
        Some(&PropertyValue::RichText("1.2.3.4".to_string()))
    );
    assert!(matches!(
        page.get("Submission Date"),
        Some(PropertyValue::Date(_))
    ));
}

#[actix_web::test]
async fn test_empty_form_is_all_placeholders() {
    let harness = Harness::new();
    let app = app!(harness);

    let resp = test::call_service(&app, postcard("1.2.3.4", "{}").to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let pages = harness.documents.pages(DATABASE).await;
    assert_eq!(
        pages[0].get("Recipient Full Name"),
        Some(&PropertyValue::Title("N/A".to_string()))
    );
    assert_eq!(
        pages[0].get("Recipient PIN Code"),
        Some(&PropertyValue::RichText("N/A".to_string()))
    );
}

#[actix_web::test]
async fn test_remote_failure_is_500_and_not_counted() {
    let harness = Harness::new();
    harness.documents.set_failing(true);
    let app = app!(harness);

    let resp = test::call_service(&app, postcard("1.2.3.4", BOB_FOR_AMY).to_request()).await;
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(test::read_body(resp).await, "Internal Server Error");

    assert_eq!(harness.count().await, None);
}

#[actix_web::test]
async fn test_malformed_json_is_500() {
    let harness = Harness::new();
    let app = app!(harness);

    let resp = test::call_service(&app, postcard("1.2.3.4", "{not json").to_request()).await;
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert!(harness.documents.pages(DATABASE).await.is_empty());
    assert_eq!(harness.count().await, None);
}

#[actix_web::test]
async fn test_missing_peer_address_is_unknown_client() {
    let harness = Harness::new();
    let app = app!(harness);

    let req = test::TestRequest::post()
        .uri("/api/xmas-cards")
        .set_payload(BOB_FOR_AMY)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let usage = harness
        .store
        .get(&StoreKey::rate_limit(XMAS_POSTCARD_SUBMISSIONS, "unknown"))
        .await
        .unwrap();
    assert_eq!(usage, Some("1".to_string()));

    let pages = harness.documents.pages(DATABASE).await;
    assert_eq!(
        pages[0].get("Sender IP Address"),
        Some(&PropertyValue::RichText("unknown".to_string()))
    );
}

#[actix_web::test]
async fn test_get_on_submission_path_is_404_without_rate_usage() {
    let harness = Harness::new();
    let app = app!(harness);

    let req = test::TestRequest::get()
        .uri("/api/xmas-cards")
        .peer_addr("1.2.3.4:40000".parse().unwrap())
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let keys = harness
        .store
        .list(&StoreKey::rate_limit_prefix())
        .await
        .unwrap();
    assert!(keys.is_empty());
}

#[actix_web::test]
async fn test_admin_routes_challenge_without_credentials() {
    let harness = Harness::new();
    let app = app!(harness);

    for uri in ["/xmas/stats", "/xmas/stats/visits", "/api/xmas/reset-rate-limit"] {
        let resp = test::call_service(&app, test::TestRequest::get().uri(uri).to_request()).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED, "{}", uri);
        assert_eq!(
            resp.headers().get(header::WWW_AUTHENTICATE).unwrap(),
            "Basic realm=\"Worth A Smile\""
        );
        assert_eq!(test::read_body(resp).await, "Unauthorized");
    }
}

#[actix_web::test]
async fn test_admin_wrong_password_is_401() {
    let harness = Harness::new();
    let app = app!(harness);

    let req = test::TestRequest::get()
        .uri("/xmas/stats")
        .insert_header(basic(ADMIN_USER, "wrong"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn test_stats_recounts_from_remote() {
    let harness = Harness::new();
    harness.documents.seed(DATABASE, 250).await;
    harness
        .store
        .set(&StoreKey::submissions_count(), "3")
        .await
        .unwrap();
    let app = app!(harness);

    let req = test::TestRequest::get()
        .uri("/xmas/stats")
        .insert_header(basic(ADMIN_USER, ADMIN_PASS))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body, serde_json::json!({ "totalSubmissions": 250 }));
    assert_eq!(harness.count().await, Some("250".to_string()));
}

#[actix_web::test]
async fn test_stats_remote_failure_is_500() {
    let harness = Harness::new();
    harness.documents.set_failing(true);
    let app = app!(harness);

    let req = test::TestRequest::get()
        .uri("/xmas/stats")
        .insert_header(basic(ADMIN_USER, ADMIN_PASS))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[actix_web::test]
async fn test_unconfigured_admin_is_500() {
    let harness = Harness::with_auth(BasicAuthConfig::default());
    let app = app!(harness);

    let req = test::TestRequest::get()
        .uri("/xmas/stats")
        .insert_header(basic(ADMIN_USER, ADMIN_PASS))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(test::read_body(resp).await, "Internal Server Error");
}

#[actix_web::test]
async fn test_reset_readmits_capped_client() {
    let harness = Harness::new();
    let app = app!(harness);

    for _ in 0..5 {
        test::call_service(&app, postcard("1.2.3.4", "{}").to_request()).await;
    }
    let resp = test::call_service(&app, postcard("1.2.3.4", "{}").to_request()).await;
    assert_eq!(resp.status(), StatusCode::TOO_MANY_REQUESTS);

    let req = test::TestRequest::get()
        .uri("/api/xmas/reset-rate-limit")
        .insert_header(basic(ADMIN_USER, ADMIN_PASS))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(
        test::read_body(resp).await,
        "Rate limits for all IPs have been reset."
    );

    let resp = test::call_service(&app, postcard("1.2.3.4", "{}").to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);

    // Reset leaves the submission total alone
    let totals: SubmissionTotals = test::read_body_json(resp).await;
    assert_eq!(totals.total_submissions, 6);
}

#[actix_web::test]
async fn test_page_visits_are_counted() {
    let harness = Harness::new();
    let app = app!(harness);

    for _ in 0..3 {
        let resp = test::call_service(&app, test::TestRequest::get().uri("/xmas").to_request()).await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(
            resp.headers().get(header::CONTENT_TYPE).unwrap(),
            "text/html; charset=utf-8"
        );
        assert_eq!(test::read_body(resp).await, "<h1>Send a postcard</h1>");
    }

    let req = test::TestRequest::get()
        .uri("/xmas/stats/visits")
        .insert_header(basic(ADMIN_USER, ADMIN_PASS))
        .to_request();
    let visits: VisitTotals = test::call_and_read_body_json(&app, req).await;
    assert_eq!(visits.visits, 3);
}

#[actix_web::test]
async fn test_assets_are_served_by_name() {
    let harness = Harness::new();
    let app = app!(harness);

    let resp = test::call_service(
        &app,
        test::TestRequest::get().uri("/xmas/stamp.png").to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.headers().get(header::CONTENT_TYPE).unwrap(), "image/png");

    let resp = test::call_service(
        &app,
        test::TestRequest::get().uri("/xmas/missing.png").to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    assert_eq!(test::read_body(resp).await, "Not Found");
}

#[actix_web::test]
async fn test_unknown_routes_use_custom_404_page() {
    let harness = Harness::new();
    std::fs::write(harness.static_dir.join("404.html"), "<h1>Lost in the snow</h1>").unwrap();
    let app = app!(harness);

    for uri in ["/nowhere", "/xmas/nothing.css", "/api/xmas-cards/extra"] {
        let resp = test::call_service(&app, test::TestRequest::get().uri(uri).to_request()).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND, "{}", uri);
        assert_eq!(test::read_body(resp).await, "<h1>Lost in the snow</h1>");
    }
}

#[actix_web::test]
async fn test_health_check() {
    let harness = Harness::new();
    let app = app!(harness);

    let resp = test::call_service(
        &app,
        test::TestRequest::get().uri("/api/health").to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["status"], "ok");
}
