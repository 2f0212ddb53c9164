//! W3C WebDriver implementation of the [`Browser`]/[`Page`] contract.
//!
//! Talks plain JSON-over-HTTP to a chromedriver-compatible endpoint. Bounded
//! waits are client-side polls; network-response capture works by injecting
//! a `fetch`/XHR hook before the triggering click (see `capture`).

mod capture;

use std::path::Path;
use std::time::Duration;

use data_encoding::BASE64;
use reqwest::{Client, Method};
use serde_json::{json, Value};

use crate::error::DriverError;
use crate::page::{Browser, Page};
use crate::snapshot::{Cookie, SessionSnapshot};

const POLL_INTERVAL: Duration = Duration::from_millis(250);

/// Connection to a WebDriver endpoint; each [`WebDriverPage`] opened from it
/// is an isolated browser session with its own cookie jar.
pub struct WebDriverBrowser {
    client: Client,
    base_url: String,
    headless: bool,
}

impl WebDriverBrowser {
    /// Creates a browser handle against `webdriver_url` (e.g.
    /// `http://127.0.0.1:9515`).
    ///
    /// # Errors
    ///
    /// Returns [`DriverError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(
        webdriver_url: &str,
        request_timeout_secs: u64,
        headless: bool,
    ) -> Result<Self, DriverError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(request_timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .build()?;
        Ok(Self {
            client,
            base_url: webdriver_url.trim_end_matches('/').to_string(),
            headless,
        })
    }
}

impl Browser for WebDriverBrowser {
    type Page = WebDriverPage;

    async fn open_page(
        &self,
        snapshot: Option<&SessionSnapshot>,
    ) -> Result<WebDriverPage, DriverError> {
        let mut args = vec![
            "--disable-gpu".to_string(),
            "--window-size=1920,1080".to_string(),
        ];
        if self.headless {
            args.push("--headless=new".to_string());
        }

        let endpoint = format!("{}/session", self.base_url);
        let body = json!({
            "capabilities": {
                "alwaysMatch": {
                    "browserName": "chrome",
                    "goog:chromeOptions": { "args": args }
                }
            }
        });

        let value = send(&self.client, Method::POST, &endpoint, Some(&body)).await?;
        let session_id = value
            .get("sessionId")
            .and_then(Value::as_str)
            .ok_or_else(|| DriverError::MalformedResponse {
                endpoint: endpoint.clone(),
                reason: "missing sessionId".to_string(),
            })?;

        let page = WebDriverPage {
            client: self.client.clone(),
            session_url: format!("{}/session/{session_id}", self.base_url),
        };

        if let Some(snapshot) = snapshot {
            page.restore_snapshot(snapshot).await?;
        }

        Ok(page)
    }
}

/// One live WebDriver session.
pub struct WebDriverPage {
    client: Client,
    session_url: String,
}

impl WebDriverPage {
    async fn post(&self, path: &str, body: Value) -> Result<Value, DriverError> {
        let endpoint = format!("{}{path}", self.session_url);
        send(&self.client, Method::POST, &endpoint, Some(&body)).await
    }

    async fn get(&self, path: &str) -> Result<Value, DriverError> {
        let endpoint = format!("{}{path}", self.session_url);
        send(&self.client, Method::GET, &endpoint, None).await
    }

    pub(crate) async fn execute(&self, script: &str, args: Value) -> Result<Value, DriverError> {
        self.post("/execute/sync", json!({ "script": script, "args": args }))
            .await
    }

    /// Finds the first element matching `selector`, or `None` when the
    /// endpoint reports "no such element".
    async fn find(&self, selector: &str) -> Result<Option<String>, DriverError> {
        let (using, value) = locator(selector);
        match self
            .post("/element", json!({ "using": using, "value": value }))
            .await
        {
            Ok(v) => Ok(element_id(&v)),
            Err(DriverError::WebDriver { ref error, .. }) if error == "no such element" => Ok(None),
            Err(e) => Err(e),
        }
    }

    async fn find_all(&self, selector: &str) -> Result<Vec<String>, DriverError> {
        let (using, value) = locator(selector);
        let v = self
            .post("/elements", json!({ "using": using, "value": value }))
            .await?;
        let ids = v
            .as_array()
            .map(|items| items.iter().filter_map(element_id).collect())
            .unwrap_or_default();
        Ok(ids)
    }

    async fn require(&self, selector: &str) -> Result<String, DriverError> {
        self.find(selector)
            .await?
            .ok_or_else(|| DriverError::ElementNotFound {
                selector: selector.to_string(),
            })
    }

    async fn require_nth(&self, selector: &str, index: usize) -> Result<String, DriverError> {
        let ids = self.find_all(selector).await?;
        ids.into_iter()
            .nth(index)
            .ok_or_else(|| DriverError::ElementNotFound {
                selector: format!("{selector} (index {index})"),
            })
    }

    async fn element_displayed(&self, id: &str) -> Result<bool, DriverError> {
        let v = self.get(&format!("/element/{id}/displayed")).await?;
        Ok(v.as_bool().unwrap_or(false))
    }

    async fn element_enabled(&self, id: &str) -> Result<bool, DriverError> {
        let v = self.get(&format!("/element/{id}/enabled")).await?;
        Ok(v.as_bool().unwrap_or(false))
    }

    async fn click_element(&self, id: &str) -> Result<(), DriverError> {
        self.post(&format!("/element/{id}/click"), json!({})).await?;
        Ok(())
    }

    async fn fill_element(&self, id: &str, value: &str) -> Result<(), DriverError> {
        self.post(&format!("/element/{id}/clear"), json!({})).await?;
        self.post(&format!("/element/{id}/value"), json!({ "text": value }))
            .await?;
        Ok(())
    }

    async fn restore_snapshot(&self, snapshot: &SessionSnapshot) -> Result<(), DriverError> {
        // Cookies can only be set against their own origin, so land there
        // first.
        if !snapshot.origin.is_empty() {
            self.goto(&snapshot.origin).await?;
        }
        for cookie in &snapshot.cookies {
            if let Err(e) = self.post("/cookie", json!({ "cookie": cookie })).await {
                tracing::warn!(cookie = %cookie.name, error = %e, "could not restore cookie");
            }
        }
        Ok(())
    }
}

impl Page for WebDriverPage {
    async fn goto(&self, url: &str) -> Result<(), DriverError> {
        self.post("/url", json!({ "url": url })).await?;
        Ok(())
    }

    async fn current_url(&self) -> Result<String, DriverError> {
        let v = self.get("/url").await?;
        v.as_str()
            .map(str::to_string)
            .ok_or_else(|| DriverError::MalformedResponse {
                endpoint: format!("{}/url", self.session_url),
                reason: "url is not a string".to_string(),
            })
    }

    async fn wait_visible(&self, selector: &str, timeout: Duration) -> Result<(), DriverError> {
        let deadline = tokio::time::Instant::now() + timeout;
        loop {
            if self.is_visible(selector).await? {
                return Ok(());
            }
            if tokio::time::Instant::now() >= deadline {
                return Err(timeout_error(
                    format!("element {selector} visible"),
                    timeout,
                ));
            }
            tokio::time::sleep(POLL_INTERVAL).await;
        }
    }

    async fn wait_enabled(&self, selector: &str, timeout: Duration) -> Result<(), DriverError> {
        let deadline = tokio::time::Instant::now() + timeout;
        loop {
            if let Some(id) = self.find(selector).await? {
                if self.element_displayed(&id).await? && self.element_enabled(&id).await? {
                    return Ok(());
                }
            }
            if tokio::time::Instant::now() >= deadline {
                return Err(timeout_error(
                    format!("element {selector} enabled"),
                    timeout,
                ));
            }
            tokio::time::sleep(POLL_INTERVAL).await;
        }
    }

    async fn wait_any_visible(
        &self,
        selectors: &[&str],
        timeout: Duration,
    ) -> Result<usize, DriverError> {
        let deadline = tokio::time::Instant::now() + timeout;
        loop {
            for (index, selector) in selectors.iter().enumerate() {
                if self.is_visible(selector).await? {
                    return Ok(index);
                }
            }
            if tokio::time::Instant::now() >= deadline {
                return Err(timeout_error(
                    format!("any of {} selectors visible", selectors.len()),
                    timeout,
                ));
            }
            tokio::time::sleep(POLL_INTERVAL).await;
        }
    }

    async fn is_visible(&self, selector: &str) -> Result<bool, DriverError> {
        match self.find(selector).await? {
            Some(id) => self.element_displayed(&id).await,
            None => Ok(false),
        }
    }

    async fn click(&self, selector: &str) -> Result<(), DriverError> {
        let id = self.require(selector).await?;
        self.click_element(&id).await
    }

    async fn click_nth(&self, selector: &str, index: usize) -> Result<(), DriverError> {
        let id = self.require_nth(selector, index).await?;
        self.click_element(&id).await
    }

    async fn fill(&self, selector: &str, value: &str) -> Result<(), DriverError> {
        let id = self.require(selector).await?;
        self.fill_element(&id, value).await
    }

    async fn fill_nth(
        &self,
        selector: &str,
        index: usize,
        value: &str,
    ) -> Result<(), DriverError> {
        let id = self.require_nth(selector, index).await?;
        self.fill_element(&id, value).await
    }

    async fn text(&self, selector: &str) -> Result<String, DriverError> {
        let id = self.require(selector).await?;
        let v = self.get(&format!("/element/{id}/text")).await?;
        Ok(v.as_str().unwrap_or_default().to_string())
    }

    async fn attr(&self, selector: &str, name: &str) -> Result<Option<String>, DriverError> {
        let id = self.require(selector).await?;
        let v = self.get(&format!("/element/{id}/attribute/{name}")).await?;
        Ok(v.as_str().map(str::to_string))
    }

    async fn count(&self, selector: &str) -> Result<usize, DriverError> {
        Ok(self.find_all(selector).await?.len())
    }

    async fn capture_response(
        &self,
        url_fragment: &str,
        trigger_selector: &str,
        timeout: Duration,
    ) -> Result<serde_json::Value, DriverError> {
        self.capture_response_impl(url_fragment, trigger_selector, timeout)
            .await
    }

    async fn screenshot(&self, path: &Path) -> Result<(), DriverError> {
        let v = self.get("/screenshot").await?;
        let encoded = v.as_str().ok_or_else(|| DriverError::MalformedResponse {
            endpoint: format!("{}/screenshot", self.session_url),
            reason: "screenshot body is not a string".to_string(),
        })?;
        let bytes = BASE64
            .decode(encoded.as_bytes())
            .map_err(|e| DriverError::ScreenshotDecode(e.to_string()))?;
        tokio::fs::write(path, bytes).await?;
        Ok(())
    }

    async fn export_snapshot(&self) -> Result<SessionSnapshot, DriverError> {
        let v = self.get("/cookie").await?;
        let cookies: Vec<Cookie> =
            serde_json::from_value(v).map_err(|e| DriverError::MalformedResponse {
                endpoint: format!("{}/cookie", self.session_url),
                reason: e.to_string(),
            })?;
        let origin = origin_of(&self.current_url().await?);
        Ok(SessionSnapshot { origin, cookies })
    }

    async fn close(&self) -> Result<(), DriverError> {
        send(&self.client, Method::DELETE, &self.session_url, None).await?;
        Ok(())
    }
}

/// Maps a selector string to a WebDriver location strategy. The `xpath=`
/// prefix opts into XPath; everything else is CSS.
fn locator(selector: &str) -> (&'static str, &str) {
    match selector.strip_prefix("xpath=") {
        Some(expr) => ("xpath", expr),
        None => ("css selector", selector),
    }
}

/// Pulls the opaque element id out of a find-element response value, which
/// is an object keyed by the W3C element identifier constant.
fn element_id(value: &Value) -> Option<String> {
    value
        .as_object()
        .and_then(|o| o.values().next())
        .and_then(Value::as_str)
        .map(str::to_string)
}

fn origin_of(url: &str) -> String {
    let Some(scheme_end) = url.find("://") else {
        return url.to_string();
    };
    let host_start = scheme_end + 3;
    match url[host_start..].find('/') {
        Some(i) => url[..host_start + i].to_string(),
        None => url.to_string(),
    }
}

fn timeout_error(what: String, timeout: Duration) -> DriverError {
    DriverError::Timeout {
        what,
        waited_ms: u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX),
    }
}

/// One wire call. Success unwraps the protocol's `value` envelope; failure
/// surfaces the endpoint's error/message pair as a typed error.
async fn send(
    client: &Client,
    method: Method,
    endpoint: &str,
    body: Option<&Value>,
) -> Result<Value, DriverError> {
    let mut request = client.request(method, endpoint);
    if let Some(body) = body {
        request = request.json(body);
    }

    let response = request.send().await?;
    let status = response.status();
    let text = response.text().await?;

    let payload: Value =
        serde_json::from_str(&text).map_err(|e| DriverError::MalformedResponse {
            endpoint: endpoint.to_string(),
            reason: e.to_string(),
        })?;

    if !status.is_success() {
        if let Some(error) = payload
            .pointer("/value/error")
            .and_then(Value::as_str)
        {
            return Err(DriverError::WebDriver {
                error: error.to_string(),
                message: payload
                    .pointer("/value/message")
                    .and_then(Value::as_str)
                    .unwrap_or_default()
                    .to_string(),
            });
        }
        return Err(DriverError::UnexpectedStatus {
            status: status.as_u16(),
            endpoint: endpoint.to_string(),
        });
    }

    Ok(payload.get("value").cloned().unwrap_or(Value::Null))
}
