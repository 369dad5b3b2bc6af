// src/ui.rs

use crate::{
    constants,
    models::{DownloadReport, Feed, NoteType},
    symbols, utils,
};
use colored::*;
use indicatif::{HumanBytes, ProgressBar, ProgressStyle};
use itertools::Itertools;

pub fn print_header(title: &str) {
    println!("\n{}", "═".repeat(constants::UI_WIDTH));
    println!(" {}", title.cyan().bold());
    println!("{}", "═".repeat(constants::UI_WIDTH));
}

pub fn print_sub_header(title: &str) {
    println!("\n--- {} ---", title.bold());
}

pub fn plain(msg: &str) {
    println!("{}", msg);
}

pub fn info(msg: &str) {
    println!("{} {}", *symbols::INFO, msg);
}

pub fn warn(msg: &str) {
    eprintln!("{} {}", *symbols::WARN, msg.yellow());
}

pub fn error(msg: &str) {
    eprintln!("{} {}", *symbols::ERROR, msg.red());
}

/// 逐行列出搜索结果
pub fn print_feed_table(feeds: &[Feed]) {
    let pad = feeds.len().to_string().len();
    for (i, feed) in feeds.iter().enumerate() {
        let likes = &feed.note_card.interact_info.liked_count;
        println!(
            "  [{}] {} {:>8} {} {}",
            format!("{:<pad$}", i + 1, pad = pad).yellow(),
            format!("[{}]", feed.note_type()).cyan(),
            format!("♥ {}", if likes.is_empty() { "-" } else { likes }),
            utils::truncate_text(feed.note_card.user.display_name(), 16).dimmed(),
            utils::truncate_text(feed.title(), constants::TITLE_TRUNCATE_LENGTH)
        );
    }
}

pub fn print_type_summary(feeds: &[Feed]) {
    let counts = feeds.iter().counts_by(|f| f.note_type());
    let get = |t: NoteType| counts.get(&t).copied().unwrap_or(0);
    println!(
        "{} 共 {} 条笔记: 图文 {} 条 | 视频 {} 条 | 其他 {} 条",
        *symbols::INFO,
        feeds.len(),
        get(NoteType::Normal),
        get(NoteType::Video),
        get(NoteType::Unknown)
    );
}

pub fn print_download_report(title: &str, report: &DownloadReport) {
    let summary = format!(
        "{} | {} | 合计 {}",
        format!("成功: {}", report.downloaded.len()).green(),
        format!("跳过: {}", report.skipped.len()).yellow(),
        HumanBytes(report.total_bytes())
    );
    println!("{} {} {}", *symbols::OK, utils::truncate_text(title, constants::TITLE_TRUNCATE_LENGTH), summary);
    for skipped in &report.skipped {
        println!("    - 图片 {}: {}", skipped.index, skipped.reason.red());
    }
}

pub fn new_tasks_progress_bar(total: u64, prefix: &str) -> ProgressBar {
    let pbar = ProgressBar::new(total);
    pbar.set_style(
        ProgressStyle::with_template(
            "{prefix:.bold} [{bar:40.cyan/blue}] {pos}/{len} ({elapsed_precise})",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("#>-"),
    );
    pbar.set_prefix(prefix.to_string());
    pbar
}
