// src/cli.rs

use crate::constants;
use clap::{Parser, ValueEnum, command, crate_version};
use std::path::PathBuf;

/// 定义日志输出级别
#[derive(ValueEnum, Copy, Clone, Debug, PartialEq, Eq)]
pub enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

#[derive(Parser, Debug, Clone)]
#[command(
    version = crate_version!(),
    about,
    long_about = None,
    arg_required_else_help = true,
    disable_help_flag = true,
    disable_version_flag = true,
)]
#[command(group(
    clap::ArgGroup::new("mode")
        .required(true)
        .args(&["keyword", "feed_url"]),
))]
pub struct Cli {
    // --- 运行模式 (Mode) ---
    /// 按关键词搜索笔记
    #[arg(short, long, help_heading = "Mode")]
    pub keyword: Option<String>,
    /// 生成指定笔记的完整链接并退出 (不启动浏览器)
    #[arg(long, value_name = "FEED_ID", help_heading = "Mode")]
    pub feed_url: Option<String>,

    // --- 搜索选项 (Search) ---
    /// 滚动加载的次数，0 表示只读取首屏结果
    #[arg(long, default_value_t = 0, value_name = "N", help_heading = "Search")]
    pub scroll: usize,
    /// 每次滚动后的等待时间 (毫秒)，默认取配置文件中的值
    #[arg(long, value_name = "MS", help_heading = "Search")]
    pub scroll_interval: Option<u64>,
    /// 某次滚动没有加载到新内容时提前结束
    #[arg(long, action = clap::ArgAction::SetTrue, help_heading = "Search")]
    pub stop_on_stall: bool,
    /// 显示浏览器窗口 (调试用)
    #[arg(long, action = clap::ArgAction::SetTrue, help_heading = "Search")]
    pub headful: bool,

    // --- 下载选项 (Download) ---
    /// 下载搜索结果中笔记的无水印图片
    #[arg(short, long, action = clap::ArgAction::SetTrue, requires = "keyword", help_heading = "Download")]
    pub download: bool,
    /// 指定要下载的笔记序号 (例如 '1-5,8', 'all')
    #[arg(long, default_value_t = constants::DEFAULT_SELECTION.to_string(), value_name = "SELECTION", help_heading = "Download")]
    pub select: String,
    /// 图片格式: 'png', 'jpg', 'webp' 等，默认取配置文件中的值
    #[arg(short, long, value_name = "FORMAT", help_heading = "Download")]
    pub format: Option<String>,
    /// 设置图片保存目录
    #[arg(short, long, value_name = "DIR", default_value_os_t = PathBuf::from(constants::DEFAULT_SAVE_DIR), help_heading = "Download")]
    pub output: PathBuf,

    // --- 链接选项 (Link) ---
    /// 笔记的 xsec_token，用于生成可直接访问的链接
    #[arg(long, requires = "feed_url", help_heading = "Link")]
    pub xsec_token: Option<String>,

    // --- 通用选项 (General) ---
    /// 以 JSON 格式输出结果
    #[arg(long, action = clap::ArgAction::SetTrue, global = true, help_heading = "General")]
    pub json: bool,
    /// 显示此帮助信息并退出
    #[arg(short = 'h', long, action = clap::ArgAction::Help, global = true, help_heading = "General")]
    _help: Option<bool>,
    /// 显示版本信息并退出
    #[arg(short = 'V', long, action = clap::ArgAction::Version, global = true, help_heading = "General")]
    _version: Option<bool>,
    /// (隐藏参数) 设置日志文件的输出级别，用于调试
    #[arg(long, value_enum, default_value_t = LogLevel::Off, global = true, hide = true)]
    pub log_level: LogLevel,
}
