//! Session lifecycle for the seller portal: persisting the cookie jar,
//! probing whether a saved session is still honoured, and running the
//! credential + one-time-code login flow when it is not.

pub mod auth;
pub mod guard;
pub mod store;
pub mod totp;

mod error;

pub use auth::{Authenticator, LandingKind};
pub use error::SessionError;
pub use guard::is_login_required;
pub use store::SessionStore;
pub use totp::totp;
