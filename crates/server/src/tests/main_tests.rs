use super::*;
use async_trait::async_trait;
use axum::{
    body::{self, Body},
    http::{header, Request},
};
use mailer::{MailError, OutgoingEmail};
use server_api::Organization;
use std::sync::Mutex;
use storage::VolunteerStore;
use tower::ServiceExt;

#[derive(Default)]
struct TestMailer {
    sent: Mutex<Vec<OutgoingEmail>>,
    broken: bool,
}

#[async_trait]
impl Mailer for TestMailer {
    async fn send(&self, email: &OutgoingEmail) -> Result<(), MailError> {
        if self.broken {
            return Err(MailError::Transport("smtp unreachable".into()));
        }
        self.sent.lock().expect("lock").push(email.clone());
        Ok(())
    }
}

async fn test_app(broken_mail: bool) -> (Router, Storage, Arc<TestMailer>) {
    let storage = Storage::new("sqlite::memory:").await.expect("db");
    let mailer = Arc::new(TestMailer {
        broken: broken_mail,
        ..Default::default()
    });
    let api = ApiContext {
        store: Arc::new(storage.clone()),
        mailer: mailer.clone(),
        organization: Organization {
            name: "Waqiatul Cares Foundation".into(),
            email: "team@example.org".into(),
        },
    };
    let app = build_router(Arc::new(AppState {
        api,
        storage: storage.clone(),
    }));
    (app, storage, mailer)
}

const ASHA: &str = "name=Asha&email=a%40x.com&phone=555&dob=2000-01-01&gender=F&interest=Outreach&why=Want+to+help";

fn post_form(body: &str) -> Request<Body> {
    Request::post("/volunteer")
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(body.to_string()))
        .expect("request")
}

async fn body_text(response: Response) -> String {
    let bytes = body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body");
    String::from_utf8(bytes.to_vec()).expect("utf8")
}

#[tokio::test]
async fn static_pages_render() {
    let (app, _storage, _mailer) = test_app(false).await;
    for (path, needle) in [
        ("/", "Welcome to Waqiatul Cares Foundation"),
        ("/volunteer", "name=\"why\""),
        ("/thank-you", "Thank you for volunteering!"),
    ] {
        let request = Request::get(path).body(Body::empty()).expect("request");
        let response = app.clone().oneshot(request).await.expect("response");
        assert_eq!(response.status(), StatusCode::OK, "{path}");
        let html = body_text(response).await;
        assert!(html.contains(needle), "{path} should contain {needle:?}");
    }
}

#[tokio::test]
async fn healthz_reports_ok_when_storage_is_ready() {
    let (app, _storage, _mailer) = test_app(false).await;
    let request = Request::get("/healthz")
        .body(Body::empty())
        .expect("request");
    let response = app.oneshot(request).await.expect("response");
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_text(response).await, "ok");
}

#[tokio::test]
async fn healthz_reports_unavailable_when_pool_is_closed() {
    let (app, storage, _mailer) = test_app(false).await;
    storage.pool().close().await;
    let request = Request::get("/healthz")
        .body(Body::empty())
        .expect("request");
    let response = app.oneshot(request).await.expect("response");
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    let dto: ApiError = serde_json::from_str(&body_text(response).await).expect("json");
    assert_eq!(dto.code, ErrorCode::Unavailable);
}

#[tokio::test]
async fn successful_submission_redirects_to_thank_you() {
    let (app, storage, mailer) = test_app(false).await;
    let response = app.oneshot(post_form(ASHA)).await.expect("response");

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(
        response
            .headers()
            .get(header::LOCATION)
            .and_then(|v| v.to_str().ok()),
        Some("/thank-you")
    );

    let records = storage.list_volunteers().await.expect("list");
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].volunteer.email, "a@x.com");

    let sent = mailer.sent.lock().expect("lock");
    assert_eq!(sent.len(), 2);
    assert_eq!(sent[0].reply_to.as_deref(), Some("a@x.com"));
    assert_eq!(sent[1].to, vec!["a@x.com".to_string()]);
}

#[tokio::test]
async fn mail_failure_keeps_record_and_shows_danger_flash() {
    let (app, storage, _mailer) = test_app(true).await;
    let response = app.oneshot(post_form(ASHA)).await.expect("response");

    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().get(header::LOCATION).is_none());
    let html = body_text(response).await;
    assert!(html.contains("flash-danger"), "{html}");
    assert!(html.contains("issue sending confirmation emails"));
    assert_eq!(storage.count_volunteers().await.expect("count"), 1);
}

#[tokio::test]
async fn missing_field_is_rejected_before_storage() {
    let (app, storage, mailer) = test_app(false).await;
    let without_why = ASHA.replace("&why=Want+to+help", "");
    let response = app
        .oneshot(post_form(&without_why))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let html = body_text(response).await;
    assert!(html.contains("Please fill in the Motivation field."), "{html}");
    assert_eq!(storage.count_volunteers().await.expect("count"), 0);
    assert!(mailer.sent.lock().expect("lock").is_empty());
}

#[tokio::test]
async fn storage_failure_renders_server_error() {
    let (app, storage, mailer) = test_app(false).await;
    storage.pool().close().await;
    let response = app.oneshot(post_form(ASHA)).await.expect("response");

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let html = body_text(response).await;
    assert!(html.contains("could not save your submission"));
    assert!(mailer.sent.lock().expect("lock").is_empty());
}

#[tokio::test]
async fn oversized_body_is_refused() {
    let (app, storage, _mailer) = test_app(false).await;
    let huge = format!("{ASHA}{}", "x".repeat(MAX_FORM_BYTES + 1));
    let response = app.oneshot(post_form(&huge)).await.expect("response");
    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    assert_eq!(storage.count_volunteers().await.expect("count"), 0);
}

#[test]
fn error_codes_map_to_http_statuses() {
    assert_eq!(
        status_for(ErrorCode::Validation),
        StatusCode::UNPROCESSABLE_ENTITY
    );
    assert_eq!(
        status_for(ErrorCode::Internal),
        StatusCode::INTERNAL_SERVER_ERROR
    );
}

#[test]
fn log_filter_honours_rust_log_and_defaults_to_info() {
    assert_eq!(log_filter(None).to_string(), "info");
    assert_eq!(
        log_filter(Some("server_api=debug".into())).to_string(),
        "server_api=debug"
    );
    assert_eq!(log_filter(Some("server_api=loud".into())).to_string(), "info");
}
