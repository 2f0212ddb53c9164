//! RFC 6238 time-based one-time codes (HMAC-SHA1, 30 second step).

use data_encoding::BASE32_NOPAD;
use hmac::{Hmac, Mac};
use sha1::Sha1;

use crate::error::SessionError;

const STEP_SECS: u64 = 30;
const DIGITS: u32 = 6;

/// Computes the 6-digit code for `secret_base32` at `unix_time`.
///
/// The secret is normalised before decoding: whitespace and `=` padding are
/// stripped and letters upcased, since provisioning UIs present the secret
/// in grouped lowercase form.
///
/// # Errors
///
/// Returns [`SessionError::OtpSecret`] when the secret is not valid base32.
pub fn totp(secret_base32: &str, unix_time: u64) -> Result<String, SessionError> {
    let normalized: String = secret_base32
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '=')
        .map(|c| c.to_ascii_uppercase())
        .collect();
    let key = BASE32_NOPAD
        .decode(normalized.as_bytes())
        .map_err(|e| SessionError::OtpSecret(e.to_string()))?;

    let counter = unix_time / STEP_SECS;
    let mut mac = Hmac::<Sha1>::new_from_slice(&key)
        .map_err(|e| SessionError::OtpSecret(e.to_string()))?;
    mac.update(&counter.to_be_bytes());
    let digest = mac.finalize().into_bytes();

    // Dynamic truncation per RFC 4226 §5.3.
    let offset = usize::from(digest[digest.len() - 1] & 0x0f);
    let bin = (u32::from(digest[offset]) & 0x7f) << 24
        | u32::from(digest[offset + 1]) << 16
        | u32::from(digest[offset + 2]) << 8
        | u32::from(digest[offset + 3]);
    let code = bin % 10u32.pow(DIGITS);
    Ok(format!("{code:0width$}", width = DIGITS as usize))
}
