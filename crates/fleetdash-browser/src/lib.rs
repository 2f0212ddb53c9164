//! Automation-engine boundary for fleetdash.
//!
//! The scraping and session crates only ever talk to a browser through the
//! [`Browser`] and [`Page`] traits defined here. The production
//! implementation drives a W3C WebDriver endpoint over HTTP; tests use the
//! scripted [`fake::FakePage`] (feature `fake-driver`) instead.

pub mod diag;
pub mod error;
pub mod page;
pub mod snapshot;
pub mod webdriver;

#[cfg(any(test, feature = "fake-driver"))]
pub mod fake;

pub use diag::save_screenshot;
pub use error::DriverError;
pub use page::{Browser, Page};
pub use snapshot::{Cookie, SessionSnapshot};
pub use webdriver::{WebDriverBrowser, WebDriverPage};
