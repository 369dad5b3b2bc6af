// src/downloader/job.rs

use super::{image_url::ImageUrlRewriter, task_processor::TaskProcessor};
use crate::{
    client::HttpClient,
    config::AppConfig,
    error::*,
    models::{DetailImageInfo, DownloadReport, DownloadedImageInfo, SkippedImage},
    symbols, utils,
};
use indicatif::ProgressBar;
use log::{info, warn};
use std::{fs, path::Path};
use tokio_util::sync::CancellationToken;

/// 按顺序下载一条笔记的全部图片。
///
/// 单张图片的改写或下载失败只会被记录并跳过，不会中断整批任务；
/// 只有一张都没有成功时才返回 `NoImagesDownloaded`。
pub struct ImageDownloader {
    client: HttpClient,
    rewriter: ImageUrlRewriter,
    cancel: CancellationToken,
    progress: Option<ProgressBar>,
}

impl ImageDownloader {
    pub fn new(config: &AppConfig, cancel: CancellationToken) -> AppResult<Self> {
        Ok(Self::with_client(
            HttpClient::new(config)?,
            ImageUrlRewriter::from_config(config),
            cancel,
        ))
    }

    pub fn with_client(
        client: HttpClient,
        rewriter: ImageUrlRewriter,
        cancel: CancellationToken,
    ) -> Self {
        Self {
            client,
            rewriter,
            cancel,
            progress: None,
        }
    }

    /// 每处理完一张图片推进一次进度条
    pub fn with_progress(mut self, pbar: ProgressBar) -> Self {
        self.progress = Some(pbar);
        self
    }

    pub async fn download_images(
        &self,
        images: &[DetailImageInfo],
        format: &str,
        download_dir: &Path,
        title: &str,
    ) -> AppResult<DownloadReport> {
        fs::create_dir_all(download_dir).map_err(|source| AppError::Directory {
            path: download_dir.to_path_buf(),
            source,
        })?;

        let safe_title = utils::sanitize_filename(title);
        let processor = TaskProcessor::new(&self.client, &self.cancel);
        let mut report = DownloadReport::default();

        info!(
            "开始下载 {} 张图片到 '{}' (格式: {})",
            images.len(),
            download_dir.display(),
            format
        );

        for (i, image) in images.iter().enumerate() {
            let index = i + 1;
            if self.cancel.is_cancelled() {
                return Err(AppError::Canceled);
            }

            let download_url = match self.rewriter.rewrite(&image.url_default, format) {
                Ok(url) => url,
                Err(e) => {
                    self.skip(&mut report, index, image, e.to_string());
                    continue;
                }
            };

            let local_path = download_dir.join(format!("{}_{}.{}", safe_title, index, format));
            match processor.process(&download_url, &local_path).await {
                Ok(file_size) => {
                    info!("成功下载图片 {}: {}", index, local_path.display());
                    if let Some(pbar) = &self.progress {
                        let name = local_path.file_name().unwrap_or_default().to_string_lossy();
                        pbar.println(format!("{} {}", *symbols::OK, name));
                        pbar.inc(1);
                    }
                    report.downloaded.push(DownloadedImageInfo {
                        index,
                        original_url: image.url_default.clone(),
                        download_url,
                        local_path,
                        file_size,
                        width: image.width,
                        height: image.height,
                    });
                }
                Err(AppError::Canceled) => return Err(AppError::Canceled),
                Err(e) => self.skip(&mut report, index, image, e.to_string()),
            }
        }

        if report.downloaded.is_empty() {
            return Err(AppError::NoImagesDownloaded {
                attempted: images.len(),
            });
        }
        Ok(report)
    }

    fn skip(&self, report: &mut DownloadReport, index: usize, image: &DetailImageInfo, reason: String) {
        warn!("图片 {} 处理失败，已跳过: {}", index, reason);
        if let Some(pbar) = &self.progress {
            pbar.println(format!("{} 图片 {} 已跳过: {}", *symbols::WARN, index, reason));
            pbar.inc(1);
        }
        report.skipped.push(SkippedImage {
            index,
            original_url: image.url_default.clone(),
            reason,
        });
    }
}
