//! moodtune-server: mood based song recommendations backed by a generative
//! model and a video search index.

pub mod config;
pub mod llm;
pub mod recommend;
pub mod server;
pub mod video;
