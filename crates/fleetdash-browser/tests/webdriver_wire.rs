//! Wire-level tests for the WebDriver client.
//!
//! Uses `wiremock` to stand in for a chromedriver-compatible endpoint so no
//! real browser is needed. Covers the protocol envelope handling, the
//! no-such-element mapping, bounded waits, and snapshot export.

use std::time::Duration;

use serde_json::json;
use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use fleetdash_browser::{Browser, DriverError, Page, WebDriverBrowser, WebDriverPage};

const ELEMENT_KEY: &str = "element-6066-11e4-a52e-4f735466cecf";

async fn mock_session(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/session"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "value": { "sessionId": "s1", "capabilities": {} }
        })))
        .mount(server)
        .await;
}

async fn open_page(server: &MockServer) -> WebDriverPage {
    let browser =
        WebDriverBrowser::new(&server.uri(), 5, true).expect("browser handle should build");
    browser.open_page(None).await.expect("session should open")
}

#[tokio::test]
async fn open_page_creates_a_webdriver_session() {
    let server = MockServer::start().await;
    mock_session(&server).await;

    let page = open_page(&server).await;

    Mock::given(method("POST"))
        .and(path("/session/s1/url"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "value": null })))
        .expect(1)
        .mount(&server)
        .await;

    page.goto("https://portal.example.com/snowdash")
        .await
        .expect("navigation should succeed");
}

#[tokio::test]
async fn open_page_without_session_id_is_malformed_response() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/session"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "value": {} })))
        .mount(&server)
        .await;

    let browser =
        WebDriverBrowser::new(&server.uri(), 5, true).expect("browser handle should build");
    let result = browser.open_page(None).await;
    assert!(matches!(
        result,
        Err(DriverError::MalformedResponse { .. })
    ));
}

#[tokio::test]
async fn wire_errors_surface_error_and_message() {
    let server = MockServer::start().await;
    mock_session(&server).await;
    let page = open_page(&server).await;

    Mock::given(method("POST"))
        .and(path("/session/s1/url"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({
            "value": { "error": "unknown error", "message": "tab crashed" }
        })))
        .mount(&server)
        .await;

    let result = page.goto("https://portal.example.com").await;
    assert!(
        matches!(
            result,
            Err(DriverError::WebDriver { ref error, ref message })
                if error == "unknown error" && message == "tab crashed"
        ),
        "got: {result:?}"
    );
}

#[tokio::test]
async fn missing_element_reads_as_not_visible() {
    let server = MockServer::start().await;
    mock_session(&server).await;
    let page = open_page(&server).await;

    Mock::given(method("POST"))
        .and(path("/session/s1/element"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "value": { "error": "no such element", "message": "no element" }
        })))
        .mount(&server)
        .await;

    let visible = page
        .is_visible("#dashboard-title-component-id")
        .await
        .expect("probe should not error");
    assert!(!visible);
}

#[tokio::test]
async fn wait_visible_times_out_when_element_never_appears() {
    let server = MockServer::start().await;
    mock_session(&server).await;
    let page = open_page(&server).await;

    Mock::given(method("POST"))
        .and(path("/session/s1/element"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "value": { "error": "no such element", "message": "no element" }
        })))
        .mount(&server)
        .await;

    let result = page
        .wait_visible("#never", Duration::from_millis(1))
        .await;
    assert!(matches!(result, Err(DriverError::Timeout { .. })));
}

#[tokio::test]
async fn wait_enabled_times_out_on_a_rendered_but_disabled_element() {
    let server = MockServer::start().await;
    mock_session(&server).await;
    let page = open_page(&server).await;

    Mock::given(method("POST"))
        .and(path("/session/s1/element"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "value": { ELEMENT_KEY: "el-2" }
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/session/s1/element/el-2/displayed"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "value": true })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/session/s1/element/el-2/enabled"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "value": false })))
        .expect(1..)
        .mount(&server)
        .await;

    let result = page
        .wait_enabled("#apply", Duration::from_millis(1))
        .await;
    assert!(matches!(result, Err(DriverError::Timeout { .. })));
}

#[tokio::test]
async fn click_resolves_element_then_clicks_it() {
    let server = MockServer::start().await;
    mock_session(&server).await;
    let page = open_page(&server).await;

    Mock::given(method("POST"))
        .and(path("/session/s1/element"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "value": { ELEMENT_KEY: "el-1" }
        })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/session/s1/element/el-1/click"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "value": null })))
        .expect(1)
        .mount(&server)
        .await;

    page.click("xpath=//button[normalize-space()='Apply']")
        .await
        .expect("click should succeed");
}

#[tokio::test]
async fn fill_clears_before_typing() {
    let server = MockServer::start().await;
    mock_session(&server).await;
    let page = open_page(&server).await;

    Mock::given(method("POST"))
        .and(path("/session/s1/element"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "value": { ELEMENT_KEY: "el-9" }
        })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/session/s1/element/el-9/clear"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "value": null })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/session/s1/element/el-9/value"))
        .and(body_string_contains("ops@example.com"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "value": null })))
        .expect(1)
        .mount(&server)
        .await;

    page.fill("input#ap_email", "ops@example.com")
        .await
        .expect("fill should succeed");
}

#[tokio::test]
async fn export_snapshot_reads_cookie_jar_and_origin() {
    let server = MockServer::start().await;
    mock_session(&server).await;
    let page = open_page(&server).await;

    Mock::given(method("GET"))
        .and(path("/session/s1/cookie"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "value": [
                { "name": "session-token", "value": "abc", "domain": ".example.com" }
            ]
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/session/s1/url"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "value": "https://portal.example.com/snowdash?x=1"
        })))
        .mount(&server)
        .await;

    let snapshot = page.export_snapshot().await.expect("export should succeed");
    assert!(snapshot.is_usable());
    assert_eq!(snapshot.origin, "https://portal.example.com");
    assert_eq!(snapshot.cookies[0].name, "session-token");
}

#[tokio::test]
async fn capture_response_arms_hook_clicks_and_polls() {
    let server = MockServer::start().await;
    mock_session(&server).await;
    let page = open_page(&server).await;

    // Arm script installs the fetch/XHR hook.
    Mock::given(method("POST"))
        .and(path("/session/s1/execute/sync"))
        .and(body_string_contains("origFetch"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "value": null })))
        .expect(1)
        .mount(&server)
        .await;
    // Poll script pops the captured body.
    Mock::given(method("POST"))
        .and(path("/session/s1/execute/sync"))
        .and(body_string_contains("shift"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "value": "[{\"shopperName\":\"A\"}]"
        })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/session/s1/element"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "value": { ELEMENT_KEY: "btn" }
        })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/session/s1/element/btn/click"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "value": null })))
        .expect(1)
        .mount(&server)
        .await;

    let body = page
        .capture_response(
            "/api/metrics",
            "xpath=//button[normalize-space()='Apply']",
            Duration::from_secs(1),
        )
        .await
        .expect("capture should succeed");
    assert_eq!(body[0]["shopperName"], "A");
}

#[tokio::test]
async fn capture_response_with_unparseable_body_is_bad_capture() {
    let server = MockServer::start().await;
    mock_session(&server).await;
    let page = open_page(&server).await;

    Mock::given(method("POST"))
        .and(path("/session/s1/execute/sync"))
        .and(body_string_contains("origFetch"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "value": null })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/session/s1/execute/sync"))
        .and(body_string_contains("shift"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "value": "not json" })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/session/s1/element"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "value": { ELEMENT_KEY: "btn" }
        })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/session/s1/element/btn/click"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "value": null })))
        .mount(&server)
        .await;

    let result = page
        .capture_response("/api/metrics", "#apply", Duration::from_secs(1))
        .await;
    assert!(matches!(result, Err(DriverError::BadCapture { .. })));
}
