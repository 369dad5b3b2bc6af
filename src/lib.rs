// src/lib.rs

pub mod browser;
pub mod cli;
pub mod client;
pub mod config;
pub mod constants;
pub mod downloader;
pub mod error;
pub mod extractor;
pub mod logger;
pub mod models;
pub mod symbols;
pub mod ui;
pub mod utils;
mod workflows;

use crate::{
    cli::Cli,
    config::AppConfig,
    error::{AppError, AppResult},
};
use log::debug;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// 一次运行共享的配置、参数与取消信号
#[derive(Clone)]
pub struct AppContext {
    pub config: Arc<AppConfig>,
    pub args: Arc<Cli>,
    pub cancellation_token: CancellationToken,
}

/// 库的公共入口点，由 `main.rs` 调用
pub async fn run_from_cli(args: Arc<Cli>, cancellation_token: CancellationToken) -> AppResult<()> {
    debug!("CLI 参数: {:?}", args);

    if let Some(feed_id) = &args.feed_url {
        return workflows::run_feed_link(feed_id, args.xsec_token.as_deref(), args.json);
    }

    let keyword = args
        .keyword
        .clone()
        .ok_or_else(|| AppError::UserInputError("必须指定 --keyword 或 --feed-url".to_string()))?;

    let config = Arc::new(AppConfig::new(&args)?);
    debug!("加载的应用配置: {:?}", config);

    let context = AppContext {
        config,
        args,
        cancellation_token,
    };
    workflows::run_search(context, &keyword).await
}
