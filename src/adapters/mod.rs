pub mod email;
pub mod http;
pub mod oauth;
pub mod persistence;
