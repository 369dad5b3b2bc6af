// src/extractor/mod.rs

pub mod search;
pub mod state;

pub use search::{ScrollOptions, SearchCollector};
pub use state::{current_feed_count, decode_feeds, extract_feeds};
