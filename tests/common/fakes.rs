//! Test doubles for the completion service and the video index

#![allow(dead_code)]

use async_trait::async_trait;
use moodtune_server::llm::{CompletionOptions, CompletionProvider, LlmError, Prompt};
use moodtune_server::video::{SearchError, VideoItem, VideoSearch};
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

/// Completion provider returning a fixed reply and recording every prompt
pub struct ScriptedProvider {
    reply: Option<String>,
    prompts: Mutex<Vec<Prompt>>,
}

impl ScriptedProvider {
    pub fn replying(reply: &str) -> Self {
        Self {
            reply: Some(reply.to_string()),
            prompts: Mutex::new(vec![]),
        }
    }

    /// Every completion fails as if the service were down
    pub fn failing() -> Self {
        Self {
            reply: None,
            prompts: Mutex::new(vec![]),
        }
    }

    pub fn prompts(&self) -> Vec<Prompt> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl CompletionProvider for ScriptedProvider {
    fn name(&self) -> &str {
        "scripted"
    }

    fn model(&self) -> &str {
        "scripted-model"
    }

    async fn complete(
        &self,
        prompt: &Prompt,
        _options: &CompletionOptions,
    ) -> Result<String, LlmError> {
        self.prompts.lock().unwrap().push(prompt.clone());
        self.reply
            .clone()
            .ok_or_else(|| LlmError::Connection("service unavailable".to_string()))
    }
}

enum Answer {
    Items(Vec<VideoItem>),
    Fail,
}

/// Video search answering by exact query, with optional per-query latency
#[derive(Default)]
pub struct FakeVideoSearch {
    answers: HashMap<String, Answer>,
    delays: HashMap<String, Duration>,
    queries: Mutex<Vec<String>>,
}

impl FakeVideoSearch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer `query` with a single video whose thumbnail is derived from the id
    pub fn with_video(mut self, query: &str, video_id: &str, title: &str) -> Self {
        self.answers.insert(
            query.to_string(),
            Answer::Items(vec![VideoItem {
                video_id: video_id.to_string(),
                title: title.to_string(),
                description: String::new(),
                high_thumbnail_url: Some(thumbnail_for(video_id)),
            }]),
        );
        self
    }

    pub fn failing_on(mut self, query: &str) -> Self {
        self.answers.insert(query.to_string(), Answer::Fail);
        self
    }

    pub fn with_delay(mut self, query: &str, delay: Duration) -> Self {
        self.delays.insert(query.to_string(), delay);
        self
    }

    pub fn queries(&self) -> Vec<String> {
        self.queries.lock().unwrap().clone()
    }
}

pub fn thumbnail_for(video_id: &str) -> String {
    format!("https://i.ytimg.com/vi/{}/hqdefault.jpg", video_id)
}

#[async_trait]
impl VideoSearch for FakeVideoSearch {
    async fn search(&self, query: &str, _max_results: u32) -> Result<Vec<VideoItem>, SearchError> {
        self.queries.lock().unwrap().push(query.to_string());
        if let Some(delay) = self.delays.get(query) {
            tokio::time::sleep(*delay).await;
        }
        match self.answers.get(query) {
            Some(Answer::Items(items)) => Ok(items.clone()),
            Some(Answer::Fail) => Err(SearchError::Api {
                status: 403,
                message: "quotaExceeded".to_string(),
            }),
            None => Ok(vec![]),
        }
    }
}
