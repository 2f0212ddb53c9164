//! Network-response capture over plain WebDriver.
//!
//! The protocol has no response-interception primitive, so the page gets a
//! `fetch`/XHR hook injected before the triggering click. The hook records
//! the body of every response whose URL contains the armed fragment; the
//! client then polls the recorded list until a body arrives or the wait
//! budget runs out.

use std::time::Duration;

use serde_json::{json, Value};

use super::{timeout_error, WebDriverPage, POLL_INTERVAL};
use crate::error::DriverError;
use crate::page::Page;

/// Installs (or re-arms) the capture hook for a URL fragment.
const ARM_SCRIPT: &str = r"
const frag = arguments[0];
if (window.__fleetdash_hook) {
    window.__fleetdash_hook.frag = frag;
    window.__fleetdash_hook.bodies = [];
    return;
}
const hook = { frag: frag, bodies: [] };
window.__fleetdash_hook = hook;
const origFetch = window.fetch;
window.fetch = function () {
    const p = origFetch.apply(this, arguments);
    p.then(function (resp) {
        try {
            if (resp.url.indexOf(hook.frag) !== -1) {
                resp.clone().text().then(function (t) { hook.bodies.push(t); });
            }
        } catch (e) { /* capture must never break the page */ }
    });
    return p;
};
const origOpen = XMLHttpRequest.prototype.open;
const origSend = XMLHttpRequest.prototype.send;
XMLHttpRequest.prototype.open = function (method, url) {
    this.__fleetdash_url = url;
    return origOpen.apply(this, arguments);
};
XMLHttpRequest.prototype.send = function () {
    this.addEventListener('load', function () {
        try {
            if (String(this.__fleetdash_url).indexOf(hook.frag) !== -1) {
                hook.bodies.push(this.responseText);
            }
        } catch (e) { /* ditto */ }
    });
    return origSend.apply(this, arguments);
};
";

/// Pops the oldest captured body, or `null` when none has arrived yet.
const POP_SCRIPT: &str = r"
const hook = window.__fleetdash_hook;
return (hook && hook.bodies.length) ? hook.bodies.shift() : null;
";

impl WebDriverPage {
    pub(super) async fn capture_response_impl(
        &self,
        url_fragment: &str,
        trigger_selector: &str,
        timeout: Duration,
    ) -> Result<Value, DriverError> {
        self.execute(ARM_SCRIPT, json!([url_fragment])).await?;
        self.click(trigger_selector).await?;

        let deadline = tokio::time::Instant::now() + timeout;
        loop {
            let popped = self.execute(POP_SCRIPT, json!([])).await?;
            if let Some(body) = popped.as_str() {
                return serde_json::from_str(body).map_err(|e| DriverError::BadCapture {
                    fragment: url_fragment.to_string(),
                    source: e,
                });
            }
            if tokio::time::Instant::now() >= deadline {
                return Err(timeout_error(
                    format!("response matching \"{url_fragment}\""),
                    timeout,
                ));
            }
            tokio::time::sleep(POLL_INTERVAL).await;
        }
    }
}
