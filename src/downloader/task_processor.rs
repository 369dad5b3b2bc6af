// src/downloader/task_processor.rs

use crate::{client::HttpClient, error::*};
use futures::StreamExt;
use log::debug;
use std::{io::Write as IoWrite, path::Path};
use tempfile::NamedTempFile;
use tokio_util::sync::CancellationToken;

/// `TaskProcessor` 负责把单个地址的内容下载到本地文件。
pub struct TaskProcessor<'a> {
    client: &'a HttpClient,
    cancel: &'a CancellationToken,
}

impl<'a> TaskProcessor<'a> {
    pub fn new(client: &'a HttpClient, cancel: &'a CancellationToken) -> Self {
        Self { client, cancel }
    }

    /// 下载 `url` 并写入 `local_path`，返回写入的字节数。
    ///
    /// 响应体先流式写入同目录下的临时文件，全部完成后才改名为目标文件，
    /// 失败时不会留下残缺文件。
    pub async fn process(&self, url: &str, local_path: &Path) -> AppResult<u64> {
        let res = tokio::select! {
            biased;
            _ = self.cancel.cancelled() => return Err(AppError::Canceled),
            res = self.client.get(url) => res?,
        };

        let dir = local_path.parent().unwrap_or_else(|| Path::new("."));
        let mut file = NamedTempFile::new_in(dir)?;
        let mut written: u64 = 0;

        let mut stream = res.bytes_stream();
        loop {
            let next = tokio::select! {
                biased;
                _ = self.cancel.cancelled() => return Err(AppError::Canceled),
                chunk = stream.next() => chunk,
            };
            let Some(chunk_result) = next else { break };
            let chunk = chunk_result?;
            file.write_all(&chunk)?;
            written += chunk.len() as u64;
        }
        file.flush()?;
        file.persist(local_path)?;

        debug!("已写入 {} 字节到 '{}'", written, local_path.display());
        Ok(written)
    }
}
