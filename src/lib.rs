pub mod adapters;
pub mod application;
pub mod infra;
pub mod otp;

// Test utilities (in-memory repos and app state builder)
#[cfg(test)]
pub mod test_utils;

// Re-exports for shorter use statements.
pub use application::*;
