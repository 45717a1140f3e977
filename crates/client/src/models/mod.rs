//! Data models for APIC API responses.

pub mod auth;
pub mod response;

pub use auth::LoginResult;
pub use response::ApicResponse;
