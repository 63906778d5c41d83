//! HTTP client for end-to-end tests
//!
//! Wraps reqwest and provides one method per chat endpoint. When API routes
//! or request formats change, update only this file.

#![allow(dead_code)]

use super::constants::*;
use reqwest::multipart::{Form, Part};
use reqwest::Response;
use serde_json::json;
use std::time::Duration;

pub struct TestClient {
    /// The underlying reqwest client (public for custom requests in tests)
    pub client: reqwest::Client,
    /// The base URL of the test server
    pub base_url: String,
}

impl TestClient {
    pub fn new(base_url: String) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .expect("Failed to build reqwest client");

        Self { client, base_url }
    }

    pub async fn home(&self) -> Response {
        self.client
            .get(format!("{}/", self.base_url))
            .send()
            .await
            .expect("Home request failed")
    }

    pub async fn status(&self) -> Response {
        self.client
            .get(format!("{}/api/status", self.base_url))
            .send()
            .await
            .expect("Status request failed")
    }

    pub async fn chat_text(&self, message: &str) -> Response {
        self.client
            .post(format!("{}/api/chat/text", self.base_url))
            .json(&json!({ "message": message }))
            .send()
            .await
            .expect("Text chat request failed")
    }

    pub async fn chat_color(&self, color: &str) -> Response {
        self.client
            .post(format!("{}/api/chat/color", self.base_url))
            .json(&json!({ "color": color }))
            .send()
            .await
            .expect("Color chat request failed")
    }

    pub async fn chat_image(&self, bytes: &[u8], file_name: &str) -> Response {
        let part = Part::bytes(bytes.to_vec()).file_name(file_name.to_string());
        let form = Form::new().part("image", part);
        self.client
            .post(format!("{}/api/chat/image", self.base_url))
            .multipart(form)
            .send()
            .await
            .expect("Image chat request failed")
    }

    pub async fn chat_combined(
        &self,
        text: Option<&str>,
        color: Option<&str>,
        image: Option<&[u8]>,
    ) -> Response {
        let mut form = Form::new();
        if let Some(text) = text {
            form = form.text("text", text.to_string());
        }
        if let Some(color) = color {
            form = form.text("color", color.to_string());
        }
        if let Some(image) = image {
            form = form.part("image", Part::bytes(image.to_vec()).file_name("photo.png"));
        }
        self.client
            .post(format!("{}/api/chat/combined", self.base_url))
            .multipart(form)
            .send()
            .await
            .expect("Combined chat request failed")
    }
}
