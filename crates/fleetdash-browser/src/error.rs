use thiserror::Error;

#[derive(Debug, Error)]
pub enum DriverError {
    #[error("HTTP error talking to WebDriver: {0}")]
    Http(#[from] reqwest::Error),

    #[error("WebDriver error \"{error}\": {message}")]
    WebDriver { error: String, message: String },

    #[error("unexpected WebDriver status {status} from {endpoint}")]
    UnexpectedStatus { status: u16, endpoint: String },

    #[error("malformed WebDriver response from {endpoint}: {reason}")]
    MalformedResponse { endpoint: String, reason: String },

    #[error("timed out after {waited_ms}ms waiting for {what}")]
    Timeout { what: String, waited_ms: u64 },

    #[error("element not found: {selector}")]
    ElementNotFound { selector: String },

    #[error("captured response for \"{fragment}\" is not valid JSON: {source}")]
    BadCapture {
        fragment: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("screenshot body is not valid base64: {0}")]
    ScreenshotDecode(String),

    #[error("screenshot file error: {0}")]
    ScreenshotIo(#[from] std::io::Error),
}
