//! Test utilities for HTTP-level and use-case testing.
//!
//! Provides in-memory repository implementations, a recording mail sender, a
//! stub Google verifier, and a builder that wires them into an `AppState`.

mod app_state_builder;
mod mocks;

pub use app_state_builder::*;
pub use mocks::*;

/// Finds the first run of exactly six ASCII digits in an email body. The OTP
/// is the only such run in the reset template.
pub fn extract_otp(html: &str) -> Option<String> {
    let bytes = html.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i].is_ascii_digit() {
            let start = i;
            while i < bytes.len() && bytes[i].is_ascii_digit() {
                i += 1;
            }
            if i - start == 6 {
                return Some(html[start..i].to_string());
            }
        } else {
            i += 1;
        }
    }
    None
}
