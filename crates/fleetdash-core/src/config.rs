use crate::app_config::AppConfig;
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files — useful for testing
/// or when the caller manages env setup.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// This is the core parsing/validation logic, decoupled from the actual environment
/// so it can be tested with a pure `HashMap` lookup — no `set_var`/`remove_var` needed.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::path::PathBuf;

    let require = |var: &str| -> Result<String, ConfigError> {
        lookup(var).map_err(|_| ConfigError::MissingEnvVar(var.to_string()))
    };

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u32>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_f64 = |var: &str, default: &str| -> Result<f64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<f64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let login_email = require("FLEETDASH_LOGIN_EMAIL")?;
    let login_password = require("FLEETDASH_LOGIN_PASSWORD")?;
    let otp_secret = require("FLEETDASH_OTP_SECRET")?;

    let seller_base_url = or_default(
        "FLEETDASH_SELLER_BASE_URL",
        "https://sellercentral.amazon.co.uk",
    );
    let login_url = lookup("FLEETDASH_LOGIN_URL")
        .unwrap_or_else(|_| format!("{}/ap/signin", seller_base_url.trim_end_matches('/')));

    let store_webhook_url = lookup("FLEETDASH_STORE_WEBHOOK_URL").ok();
    let fleet_webhook_url = lookup("FLEETDASH_FLEET_WEBHOOK_URL").ok();

    let debug = matches!(
        or_default("FLEETDASH_DEBUG", "false").to_lowercase().as_str(),
        "1" | "true" | "yes"
    );

    let webdriver_url = or_default("FLEETDASH_WEBDRIVER_URL", "http://127.0.0.1:9515");
    let stores_path = PathBuf::from(or_default("FLEETDASH_STORES_PATH", "./config/stores.yaml"));
    let state_path = PathBuf::from(or_default("FLEETDASH_STATE_PATH", "state.json"));
    let audit_log_path = PathBuf::from(or_default(
        "FLEETDASH_AUDIT_LOG_PATH",
        "output/submissions.jsonl",
    ));
    let output_dir = PathBuf::from(or_default("FLEETDASH_OUTPUT_DIR", "output"));

    let page_timeout_secs = parse_u64("FLEETDASH_PAGE_TIMEOUT_SECS", "90")?;
    let wait_timeout_secs = parse_u64("FLEETDASH_WAIT_TIMEOUT_SECS", "45")?;
    let action_timeout_secs = parse_u64("FLEETDASH_ACTION_TIMEOUT_SECS", "45")?;

    let retry_attempts = parse_u32("FLEETDASH_RETRY_ATTEMPTS", "3")?;
    let retry_delay_secs = parse_u64("FLEETDASH_RETRY_DELAY_SECS", "5")?;
    let webhook_delay_ms = parse_u64("FLEETDASH_WEBHOOK_DELAY_MS", "1000")?;
    let webhook_timeout_secs = parse_u64("FLEETDASH_WEBHOOK_TIMEOUT_SECS", "30")?;

    let uph_threshold = parse_f64("FLEETDASH_UPH_THRESHOLD", "80")?;
    let lates_threshold = parse_f64("FLEETDASH_LATES_THRESHOLD", "3.0")?;
    let inf_threshold = parse_f64("FLEETDASH_INF_THRESHOLD", "2.0")?;

    let thumb_size = parse_u32("FLEETDASH_THUMB_SIZE", "300")?;
    let qr_size = parse_u32("FLEETDASH_QR_SIZE", "60")?;

    Ok(AppConfig {
        seller_base_url,
        login_url,
        login_email,
        login_password,
        otp_secret,
        store_webhook_url,
        fleet_webhook_url,
        debug,
        webdriver_url,
        stores_path,
        state_path,
        audit_log_path,
        output_dir,
        page_timeout_secs,
        wait_timeout_secs,
        action_timeout_secs,
        retry_attempts,
        retry_delay_secs,
        webhook_delay_ms,
        webhook_timeout_secs,
        uph_threshold,
        lates_threshold,
        inf_threshold,
        thumb_size,
        qr_size,
    })
}

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;
