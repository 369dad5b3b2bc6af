// src/workflows.rs

use crate::{
    AppContext,
    browser::ChromiumBrowser,
    constants,
    downloader::ImageDownloader,
    error::{AppError, AppResult},
    extractor::{ScrollOptions, SearchCollector},
    models::{DownloadReport, Feed, NoteType},
    symbols, ui, utils,
};
use anyhow::anyhow;
use colored::*;
use log::{error, info, warn};
use serde::Serialize;
use std::{path::Path, time::Duration};

/// `--json` 模式下每条笔记的下载结果
#[derive(Debug, Serialize)]
struct FeedDownloadOutcome<'a> {
    feed_id: &'a str,
    title: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    report: Option<DownloadReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

/// 只拼接链接，不需要浏览器或配置文件
pub(crate) fn run_feed_link(feed_id: &str, xsec_token: Option<&str>, json: bool) -> AppResult<()> {
    let feed_id = feed_id.trim();
    if feed_id.is_empty() {
        return Err(AppError::UserInputError("笔记 ID 不能为空".to_string()));
    }
    let link = utils::build_feed_link(feed_id, xsec_token);
    if json {
        println!("{}", serde_json::to_string_pretty(&link)?);
    } else {
        ui::plain(&link.full_url);
    }
    Ok(())
}

/// 关键词搜索，按需下载选中笔记的图片
pub(crate) async fn run_search(context: AppContext, keyword: &str) -> AppResult<()> {
    let args = &context.args;
    let keyword = keyword.trim();
    if keyword.is_empty() {
        return Err(AppError::UserInputError("搜索关键词不能为空".to_string()));
    }

    let mut options = ScrollOptions::new(args.scroll).with_stop_on_stall(args.stop_on_stall);
    if let Some(ms) = args.scroll_interval {
        options = options.with_interval(Duration::from_millis(ms));
    }

    if !args.json {
        ui::print_header(&format!("搜索: {}", keyword));
        if options.count > 0 {
            ui::info(&format!("将滚动加载 {} 次，按 {} 可随时中断。", options.count, *symbols::CTRL_C));
        }
    }

    let feeds = collect_feeds(&context, keyword, &options).await?;

    if args.json && !args.download {
        println!("{}", serde_json::to_string_pretty(&feeds)?);
        return Ok(());
    }
    if !args.json {
        if feeds.is_empty() {
            ui::warn("没有找到任何笔记。");
            return Ok(());
        }
        ui::print_sub_header("搜索结果");
        ui::print_feed_table(&feeds);
        ui::print_type_summary(&feeds);
    }

    if args.download {
        run_downloads(&context, &feeds).await?;
    }
    Ok(())
}

async fn collect_feeds(
    context: &AppContext,
    keyword: &str,
    options: &ScrollOptions,
) -> AppResult<Vec<Feed>> {
    let cancel = context.cancellation_token.clone();
    let browser = tokio::select! {
        biased;
        _ = cancel.cancelled() => return Err(AppError::Canceled),
        browser = ChromiumBrowser::launch(&context.config.browser) => browser?,
    };

    // 无论搜索是否成功都要关闭浏览器
    let result = async {
        let mut page = browser.new_page().await?;
        SearchCollector::new(&mut page, &context.config, cancel.clone())
            .search_with_scroll(keyword, options)
            .await
    }
    .await;
    browser.close().await?;
    result
}

async fn run_downloads(context: &AppContext, feeds: &[Feed]) -> AppResult<()> {
    let args = &context.args;
    let indices = utils::parse_selection_indices(&args.select, feeds.len());
    if indices.is_empty() {
        return Err(AppError::UserInputError(format!(
            "选择 '{}' 没有匹配任何笔记 (共 {} 条)",
            args.select,
            feeds.len()
        )));
    }

    let format = args
        .format
        .as_deref()
        .map(|f| f.trim().trim_start_matches('.').to_lowercase())
        .filter(|f| !f.is_empty())
        .unwrap_or_else(|| context.config.default_format.clone());

    let base_dir = &args.output;
    std::fs::create_dir_all(base_dir).map_err(|source| AppError::Directory {
        path: base_dir.to_path_buf(),
        source,
    })?;
    let display_dir = dunce::canonicalize(base_dir).unwrap_or_else(|_| base_dir.to_path_buf());

    if !args.json {
        ui::print_sub_header(&format!(
            "下载 {} 条笔记的图片 (格式: {}) 到 '{}'",
            indices.len(),
            format,
            display_dir.display()
        ));
    }

    let mut outcomes = Vec::with_capacity(indices.len());
    let mut failed = 0;
    for &i in &indices {
        if context.cancellation_token.is_cancelled() {
            return Err(AppError::Canceled);
        }
        let feed = &feeds[i];
        let result = download_feed(context, feed, &format, base_dir).await;
        let outcome = match result {
            Ok(report) => {
                if !args.json {
                    ui::print_download_report(feed.title(), &report);
                }
                FeedDownloadOutcome {
                    feed_id: &feed.id,
                    title: feed.title(),
                    report: Some(report),
                    error: None,
                }
            }
            Err(AppError::Canceled) => return Err(AppError::Canceled),
            Err(e) => {
                failed += 1;
                error!("笔记 '{}' 下载失败: {}", feed.id, e);
                if !args.json {
                    ui::error(&format!(
                        "{}: {}",
                        utils::truncate_text(feed.title(), constants::TITLE_TRUNCATE_LENGTH),
                        e
                    ));
                }
                FeedDownloadOutcome {
                    feed_id: &feed.id,
                    title: feed.title(),
                    report: None,
                    error: Some(e.to_string()),
                }
            }
        };
        outcomes.push(outcome);
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&outcomes)?);
    } else {
        ui::print_header("下载报告");
        println!(
            "{} | {} | 总计: {}",
            format!("成功笔记: {}", indices.len() - failed).green(),
            format!("失败笔记: {}", failed).red(),
            indices.len()
        );
    }

    if failed > 0 {
        Err(AppError::Other(anyhow!("{} 条笔记的图片下载失败。", failed)))
    } else {
        Ok(())
    }
}

async fn download_feed(
    context: &AppContext,
    feed: &Feed,
    format: &str,
    base_dir: &Path,
) -> AppResult<DownloadReport> {
    let images = feed.images();
    if images.is_empty() {
        return Err(AppError::NoImagesDownloaded { attempted: 0 });
    }
    if feed.note_type() == NoteType::Video {
        warn!("笔记 '{}' 是视频笔记，只下载封面", feed.id);
    }

    let target_dir = base_dir.join(utils::sanitize_filename(&feed.id));
    info!("笔记 '{}' 的图片将保存到 {:?}", feed.id, target_dir);

    let mut downloader = ImageDownloader::new(&context.config, context.cancellation_token.clone())?;
    let pbar = (!context.args.json).then(|| {
        ui::new_tasks_progress_bar(
            images.len() as u64,
            &utils::truncate_text(feed.title(), 20),
        )
    });
    if let Some(pbar) = &pbar {
        downloader = downloader.with_progress(pbar.clone());
    }

    let result = downloader
        .download_images(&images, format, &target_dir, feed.title())
        .await;
    if let Some(pbar) = pbar {
        pbar.finish_and_clear();
    }
    result
}
