// src/downloader/mod.rs

pub mod image_url;
mod job;
mod task_processor;

pub use image_url::{ImageUrlRewriter, extract_image_token};
pub use job::ImageDownloader;
