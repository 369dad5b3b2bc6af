// src/browser/chromium.rs

use super::{PageHandle, poll_until_stable, poll_until_true};
use crate::{
    config::BrowserOptions,
    constants::{scripts, timeouts},
    error::{AppError, AppResult},
};
use async_trait::async_trait;
use chromiumoxide::{
    browser::{Browser, BrowserConfig},
    page::Page,
};
use futures::StreamExt;
use log::{debug, info, warn};
use serde_json::Value;
use std::time::Duration;
use tokio::task::JoinHandle;

/// 由本进程启动的 Chromium 实例
pub struct ChromiumBrowser {
    browser: Browser,
    handler: JoinHandle<()>,
}

impl ChromiumBrowser {
    pub async fn launch(options: &BrowserOptions) -> AppResult<Self> {
        let (width, height) = options.window_size;
        let mut builder = BrowserConfig::builder()
            .window_size(width, height)
            .arg(format!("--user-agent={}", options.user_agent))
            .arg("--disable-gpu")
            .arg("--no-sandbox")
            .arg("--disable-dev-shm-usage")
            .arg("--disable-blink-features=AutomationControlled");
        if !options.headless {
            builder = builder.with_head();
        }
        if let Some(path) = &options.executable {
            builder = builder.chrome_executable(path);
        }
        let config = builder
            .build()
            .map_err(|e| AppError::Browser(format!("浏览器配置无效: {e}")))?;

        info!("启动浏览器 (headless: {})", options.headless);
        let (browser, mut handler) = Browser::launch(config).await?;

        let handler = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if let Err(e) = event {
                    debug!("浏览器事件处理出错: {}", e);
                }
            }
        });

        Ok(Self { browser, handler })
    }

    pub async fn new_page(&self) -> AppResult<ChromiumPage> {
        let page = self.browser.new_page("about:blank").await?;
        Ok(ChromiumPage { page })
    }

    pub async fn close(mut self) -> AppResult<()> {
        if let Err(e) = self.browser.close().await {
            warn!("关闭浏览器失败: {}", e);
        }
        self.handler.abort();
        Ok(())
    }
}

/// Chromium 中的单个页面
pub struct ChromiumPage {
    page: Page,
}

impl ChromiumPage {
    async fn stability_snapshot(&self) -> AppResult<Option<String>> {
        let value = self.evaluate(scripts::STABILITY_SNAPSHOT).await?;
        let Some(text) = value.as_str() else {
            return Ok(None);
        };
        let snapshot: Value = serde_json::from_str(text)?;
        if snapshot.get("ready").and_then(Value::as_str) != Some("complete") {
            return Ok(None);
        }
        Ok(Some(text.to_string()))
    }
}

#[async_trait]
impl PageHandle for ChromiumPage {
    async fn navigate(&self, url: &str) -> AppResult<()> {
        debug!("导航至: {}", url);
        self.page.goto(url).await?;
        Ok(())
    }

    async fn wait_stable(&self) -> AppResult<()> {
        poll_until_stable(
            || self.stability_snapshot(),
            Duration::from_millis(timeouts::STABLE_WINDOW_MS),
        )
        .await;
        Ok(())
    }

    async fn wait_for(&self, predicate: &str) -> AppResult<()> {
        poll_until_true(
            || async { Ok::<_, AppError>(self.evaluate(predicate).await? == Value::Bool(true)) },
            Duration::from_millis(timeouts::POLL_INTERVAL_MS),
        )
        .await;
        Ok(())
    }

    async fn evaluate(&self, script: &str) -> AppResult<Value> {
        let result = self.page.evaluate_expression(script).await?;
        Ok(result.value().cloned().unwrap_or(Value::Null))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants;

    #[tokio::test]
    #[ignore] // 需要本机安装 Chromium
    async fn test_chromium_navigate_and_evaluate() {
        let options = BrowserOptions {
            headless: true,
            executable: None,
            window_size: (1280, 900),
            user_agent: constants::USER_AGENT.to_string(),
        };
        let browser = ChromiumBrowser::launch(&options).await.expect("启动浏览器失败");
        let page = browser.new_page().await.expect("创建页面失败");

        page.navigate("data:text/html,<h1>Hello</h1>").await.expect("导航失败");
        page.wait_stable().await.expect("等待稳定失败");
        page.wait_for("document.querySelector('h1') !== null")
            .await
            .expect("等待元素失败");

        let text = page
            .evaluate("document.querySelector('h1').textContent")
            .await
            .expect("执行脚本失败");
        assert_eq!(text.as_str(), Some("Hello"));

        browser.close().await.expect("关闭浏览器失败");
    }
}
