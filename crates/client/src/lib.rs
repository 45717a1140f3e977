//! APIC session client.
//!
//! This crate authenticates against an APIC fabric controller's REST API,
//! keeps the session alive with timer-driven refresh calls, and logs out
//! cleanly when the session ends. Arbitrary `get`/`post`/`delete` calls go
//! through a [`RequestProxy`] that resolves bare paths against the controller
//! and records the most recent response on the owning session.

mod auth;
pub mod client;
pub mod endpoints;
pub mod error;
pub mod models;
pub mod proxy;

#[cfg(any(test, feature = "test-utils"))]
pub mod testing;

pub use auth::{CredentialProvider, Credentials};
pub use client::builder::SessionClientBuilder;
pub use client::{SessionClient, SessionStatus};
pub use endpoints::SessionEndpoints;
pub use error::{ClientError, Result};
pub use models::{ApicResponse, LoginResult};
pub use proxy::{LastResponse, RequestParts, RequestProxy, ResponseSink};
