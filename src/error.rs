// src/error.rs

use std::{path::PathBuf, time::Duration};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("页面状态不可用: {0}")]
    StateUnavailable(String),
    #[error("页面状态解析失败: {0}")]
    Decode(#[source] serde_json::Error),
    #[error("页面在 {0:?} 内未能就绪")]
    ReadinessTimeout(Duration),
    #[error("第 {iteration} 次滚动失败: {reason}")]
    ScrollFailed { iteration: usize, reason: String },
    #[error("图片 URL 格式不正确: {0}")]
    MalformedUrl(String),
    #[error("无法创建下载目录 '{path}': {source}")]
    Directory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("没有成功下载任何图片 (共尝试 {attempted} 张)")]
    NoImagesDownloaded { attempted: usize },
    #[error("操作已取消")]
    Canceled,
    #[error("浏览器错误: {0}")]
    Browser(String),
    #[error("网络请求失败: {0}")]
    Network(#[from] reqwest::Error),
    #[error("服务器返回错误状态: {0}")]
    HttpStatus(reqwest::StatusCode),
    #[error("I/O 错误: {0}")]
    Io(#[from] std::io::Error),
    #[error("临时文件持久化失败: {0}")]
    TempFilePersist(#[from] tempfile::PersistError),
    #[error("JSON 解析错误: {0}")]
    Json(#[from] serde_json::Error),
    #[error("{0}")] // 只打印内部信息，不加任何前缀
    UserInputError(String),
    #[error("未知错误: {0}")]
    Other(#[from] anyhow::Error),
}

impl From<chromiumoxide::error::CdpError> for AppError {
    fn from(err: chromiumoxide::error::CdpError) -> Self {
        AppError::Browser(err.to_string())
    }
}

pub type AppResult<T> = Result<T, AppError>;
