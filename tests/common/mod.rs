//! Common test infrastructure
//!
//! This module provides all the infrastructure needed for end-to-end tests.
//! Tests should only import from this module, not from internal submodules.
//!
//! # Example
//!
//! ```no_run
//! mod common;
//! use common::{TestServer, TestClient, REPLY_THREE_SONGS};
//! use reqwest::StatusCode;
//!
//! #[tokio::test]
//! async fn test_text_chat() {
//!     let server = TestServer::spawn(REPLY_THREE_SONGS).await;
//!     let client = TestClient::new(server.base_url.clone());
//!
//!     let response = client.chat_text("rainy day").await;
//!     assert_eq!(response.status(), StatusCode::OK);
//! }
//! ```

mod client;
mod constants;
mod fakes;
mod server;

// Public API - this is what tests import
#[allow(unused_imports)]
pub use client::TestClient;
#[allow(unused_imports)]
pub use constants::*;
#[allow(unused_imports)]
pub use fakes::{thumbnail_for, FakeVideoSearch, ScriptedProvider};
pub use server::TestServer;
