use std::time::Duration;

use fleetdash_browser::fake::FakePage;

use super::{is_login_required, DASHBOARD_MARKER};

const PROBE_URL: &str = "https://portal.example.com/snowdash?mons_sel_dir_mcid=M1&mons_sel_mkid=K1";
const WAIT: Duration = Duration::from_secs(1);

#[tokio::test]
async fn valid_session_shows_the_dashboard_marker() {
    let page = FakePage::new();
    page.show(DASHBOARD_MARKER);
    assert!(!is_login_required(&page, PROBE_URL, WAIT).await);
    assert_eq!(page.visited(), vec![PROBE_URL.to_string()]);
}

#[tokio::test]
async fn signin_redirect_requires_login() {
    let page = FakePage::new();
    page.route(PROBE_URL, "https://portal.example.com/ap/signin?return=1");
    // Marker visible or not, the address decides first.
    page.show(DASHBOARD_MARKER);
    assert!(is_login_required(&page, PROBE_URL, WAIT).await);
}

#[tokio::test]
async fn signin_marker_is_case_insensitive() {
    let page = FakePage::new();
    page.route(PROBE_URL, "https://portal.example.com/SignIn");
    assert!(is_login_required(&page, PROBE_URL, WAIT).await);
}

#[tokio::test]
async fn ap_path_requires_login() {
    let page = FakePage::new();
    page.route(PROBE_URL, "https://portal.example.com/ap/mfa");
    assert!(is_login_required(&page, PROBE_URL, WAIT).await);
}

#[tokio::test]
async fn missing_marker_fails_closed() {
    let page = FakePage::new();
    assert!(is_login_required(&page, PROBE_URL, WAIT).await);
}

#[tokio::test]
async fn navigation_error_fails_closed() {
    let page = FakePage::new();
    page.fail_goto(PROBE_URL);
    page.show(DASHBOARD_MARKER);
    assert!(is_login_required(&page, PROBE_URL, WAIT).await);
}
