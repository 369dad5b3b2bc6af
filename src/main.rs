// src/main.rs

use clap::{CommandFactory, FromArgMatches};
use colored::*;
use std::{env, sync::Arc};
use tokio_util::sync::CancellationToken;
use xhs_dl::{cli::Cli, error::AppError, logger, run_from_cli, symbols};

#[tokio::main]
async fn main() {
    // 为 Windows 终端启用 ANSI 颜色支持。
    #[cfg(windows)]
    {
        colored::control::set_virtual_terminal(true).ok();
    }

    let bin_name = env::var("CARGO_BIN_NAME").unwrap_or_else(|_| "xhs-dl".to_string());

    let after_help = format!(
        "示例:\n  # 搜索关键词，只看首屏结果\n  {bin} -k 旅行\n\n  # 滚动加载 3 次后输出 JSON\n  {bin} -k 旅行 --scroll 3 --json\n\n  # 下载前 5 条笔记的图片 (jpg 格式)\n  {bin} -k 旅行 -d --select 1-5 -f jpg -o ./pics\n\n  # 生成笔记链接\n  {bin} --feed-url 64b8f0c2000000001e03a1b2 --xsec-token ABxyz",
        bin = bin_name
    );

    let cmd = Cli::command().after_help(after_help);
    let args = match Cli::from_arg_matches(&cmd.get_matches()) {
        Ok(args) => Arc::new(args),
        Err(e) => e.exit(),
    };

    logger::setup_logger(args.log_level);

    let cancellation_token = CancellationToken::new();
    let signal_token = cancellation_token.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            eprintln!("\n{} 用户中断，正在停止...", *symbols::WARN);
            signal_token.cancel();
        }
    });

    match run_from_cli(args, cancellation_token).await {
        Ok(()) => {}
        Err(AppError::Canceled) => {
            log::warn!("用户中断了程序");
            std::process::exit(130);
        }
        Err(e) => {
            log::error!("程序执行出错: {}", e);
            eprintln!("\n{} {}", *symbols::ERROR, format!("程序执行出错: {}", e).red());
            std::process::exit(1);
        }
    }
}
