//! Video lookup for recommended songs.

mod enricher;
mod search;
mod youtube;

pub use enricher::{link_queries, select_best, watch_url, VideoEnricher, DEFAULT_SEARCH_TIMEOUT};
pub use search::{SearchError, VideoItem, VideoSearch};
pub use youtube::{YouTubeSearchClient, YOUTUBE_API_BASE};
