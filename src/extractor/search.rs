// src/extractor/search.rs

use super::state;
use crate::{
    browser::{PageDeadline, PageHandle},
    config::AppConfig,
    constants::scripts,
    error::{AppError, AppResult},
    models::Feed,
    utils,
};
use log::{debug, info};
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// 滚动加载参数
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScrollOptions {
    /// 滚动次数，0 表示不滚动
    pub count: usize,
    /// 每次滚动后的等待时间，为空时使用配置中的默认值
    pub interval: Option<Duration>,
    /// 某次滚动（第一次除外）没有带来新内容时提前结束，默认关闭
    pub stop_on_stall: bool,
}

impl ScrollOptions {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn new(count: usize) -> Self {
        Self {
            count,
            ..Self::default()
        }
    }

    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = Some(interval);
        self
    }

    pub fn with_stop_on_stall(mut self, enabled: bool) -> Self {
        self.stop_on_stall = enabled;
        self
    }
}

/// 驱动搜索页面：导航、等待就绪、按需滚动，最后一次性读取页面状态中的笔记。
///
/// 页面在整个调用期间被独占借用，同一页面上的多次搜索必须依次进行。
pub struct SearchCollector<'a, P: PageHandle + ?Sized> {
    page: &'a mut P,
    page_timeout: Duration,
    default_interval: Duration,
    cancel: CancellationToken,
}

impl<'a, P: PageHandle + ?Sized> SearchCollector<'a, P> {
    pub fn new(page: &'a mut P, config: &AppConfig, cancel: CancellationToken) -> Self {
        Self {
            page,
            page_timeout: config.page_timeout,
            default_interval: config.scroll_interval,
            cancel,
        }
    }

    pub async fn search(&mut self, keyword: &str) -> AppResult<Vec<Feed>> {
        self.search_with_scroll(keyword, &ScrollOptions::none()).await
    }

    pub async fn search_with_scroll(
        &mut self,
        keyword: &str,
        options: &ScrollOptions,
    ) -> AppResult<Vec<Feed>> {
        let deadline = PageDeadline::start(self.page_timeout, self.cancel.clone());
        let budget = deadline.budget();

        let search_url = utils::make_search_url(keyword);
        info!("开始搜索 '{}': {}", keyword, search_url);
        deadline
            .run(self.page.navigate(&search_url), || AppError::ReadinessTimeout(budget))
            .await?;

        self.await_ready(&deadline).await?;

        if options.count > 0 {
            self.perform_scrolling(&deadline, options).await?;
        }

        let feeds = deadline
            .run(state::extract_feeds(&*self.page), || {
                AppError::StateUnavailable(format!("读取页面状态超过 {:?}", budget))
            })
            .await?;
        info!("关键词 '{}' 共获取到 {} 条笔记", keyword, feeds.len());
        Ok(feeds)
    }

    /// 等待页面稳定且全局状态对象已挂载
    async fn await_ready(&self, deadline: &PageDeadline) -> AppResult<()> {
        let budget = deadline.budget();
        deadline
            .run(self.page.wait_stable(), || AppError::ReadinessTimeout(budget))
            .await?;
        deadline
            .run(self.page.wait_for(scripts::STATE_EXISTS), || {
                AppError::ReadinessTimeout(budget)
            })
            .await
    }

    /// 依次执行滚动，每一步都等待上一步完成后再开始
    async fn perform_scrolling(
        &self,
        deadline: &PageDeadline,
        options: &ScrollOptions,
    ) -> AppResult<()> {
        let budget = deadline.budget();
        let interval = options.interval.unwrap_or(self.default_interval);
        info!(
            "开始滚动加载，计划 {} 次，间隔 {:?}",
            options.count, interval
        );

        for iteration in 1..=options.count {
            let before = self.probe(deadline).await;
            debug!("第 {}/{} 次滚动，当前笔记数量: {}", iteration, options.count, before);

            deadline
                .run(self.page.evaluate(scripts::SCROLL_TO_BOTTOM), || {
                    AppError::ScrollFailed {
                        iteration,
                        reason: "滚动脚本执行超时".to_string(),
                    }
                })
                .await
                .map_err(|e| match e {
                    AppError::Canceled | AppError::ScrollFailed { .. } => e,
                    other => AppError::ScrollFailed {
                        iteration,
                        reason: other.to_string(),
                    },
                })?;

            deadline.sleep(interval).await?;
            deadline
                .run(self.page.wait_stable(), || AppError::ReadinessTimeout(budget))
                .await?;

            let after = self.probe(deadline).await;
            info!(
                "第 {}/{} 次滚动后笔记数量: {} (新增: {})",
                iteration,
                options.count,
                after,
                after as i64 - before as i64
            );

            if options.stop_on_stall && iteration > 1 && after <= before {
                info!("第 {} 次滚动没有加载到新内容，提前结束滚动", iteration);
                break;
            }
        }
        Ok(())
    }

    async fn probe(&self, deadline: &PageDeadline) -> usize {
        let budget = deadline.budget();
        deadline
            .run(
                async { Ok(state::current_feed_count(&*self.page).await) },
                || AppError::ReadinessTimeout(budget),
            )
            .await
            .unwrap_or(0)
    }
}
