// src/browser/mod.rs

//! 浏览器页面抽象。
//!
//! 搜索流程只依赖 `PageHandle` 提供的四个能力（导航、等待稳定、等待条件成立、执行脚本），
//! 具体由 `chromium` 模块基于 chromiumoxide 实现。

pub mod chromium;

pub use chromium::{ChromiumBrowser, ChromiumPage};

use crate::error::{AppError, AppResult};
use async_trait::async_trait;
use log::debug;
use std::{future::Future, time::Duration};
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

/// 一个可导航、可执行脚本的浏览器页面
#[async_trait]
pub trait PageHandle: Send + Sync {
    /// 打开指定地址
    async fn navigate(&self, url: &str) -> AppResult<()>;
    /// 阻塞直到页面的网络与布局活动平静下来
    async fn wait_stable(&self) -> AppResult<()>;
    /// 阻塞直到给定的 JS 表达式求值为 true
    async fn wait_for(&self, predicate: &str) -> AppResult<()>;
    /// 在页面上下文中执行脚本并返回其结果
    async fn evaluate(&self, script: &str) -> AppResult<serde_json::Value>;
}

/// 一次页面操作序列共享的截止时间与取消信号。
///
/// 截止时间在创建时固定，之后的每一步都只能消耗剩余部分。
#[derive(Debug, Clone)]
pub struct PageDeadline {
    budget: Duration,
    deadline: Instant,
    cancel: CancellationToken,
}

impl PageDeadline {
    pub fn start(budget: Duration, cancel: CancellationToken) -> Self {
        Self {
            budget,
            deadline: Instant::now() + budget,
            cancel,
        }
    }

    pub fn budget(&self) -> Duration {
        self.budget
    }

    /// 在截止时间和取消信号的约束下执行 `fut`。取消优先于其他任何结果。
    pub async fn run<T, F>(&self, fut: F, on_timeout: impl FnOnce() -> AppError) -> AppResult<T>
    where
        F: Future<Output = AppResult<T>>,
    {
        tokio::select! {
            biased;
            _ = self.cancel.cancelled() => Err(AppError::Canceled),
            res = tokio::time::timeout_at(self.deadline, fut) => match res {
                Ok(inner) => inner,
                Err(_) => Err(on_timeout()),
            },
        }
    }

    pub async fn sleep(&self, duration: Duration) -> AppResult<()> {
        let budget = self.budget;
        self.run(
            async {
                tokio::time::sleep(duration).await;
                Ok(())
            },
            || AppError::ReadinessTimeout(budget),
        )
        .await
    }
}

/// 反复取快照直到连续两次一致。取快照失败（如页面重新渲染导致执行上下文失效）视为尚未稳定。
///
/// 本身不会结束等待，超时由调用方的 `PageDeadline` 负责。
pub(crate) async fn poll_until_stable<F, Fut>(mut snapshot: F, interval: Duration)
where
    F: FnMut() -> Fut,
    Fut: Future<Output = AppResult<Option<String>>>,
{
    let mut previous: Option<String> = None;
    loop {
        let current = snapshot().await.unwrap_or_else(|e| {
            debug!("读取页面快照失败，继续等待: {}", e);
            None
        });
        if current.is_some() && current == previous {
            return;
        }
        previous = current;
        tokio::time::sleep(interval).await;
    }
}

/// 反复求值直到条件成立，求值出错按未成立处理
pub(crate) async fn poll_until_true<F, Fut>(mut check: F, interval: Duration)
where
    F: FnMut() -> Fut,
    Fut: Future<Output = AppResult<bool>>,
{
    loop {
        match check().await {
            Ok(true) => return,
            Ok(false) => {}
            Err(e) => debug!("条件求值失败，继续等待: {}", e),
        }
        tokio::time::sleep(interval).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_deadline_expires() {
        let deadline = PageDeadline::start(Duration::from_secs(1), CancellationToken::new());
        let err = deadline.sleep(Duration::from_secs(5)).await.unwrap_err();
        assert!(matches!(err, AppError::ReadinessTimeout(d) if d == Duration::from_secs(1)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_takes_precedence() {
        let cancel = CancellationToken::new();
        let deadline = PageDeadline::start(Duration::from_secs(60), cancel.clone());
        cancel.cancel();
        let res: AppResult<()> = deadline
            .run(async { Ok(()) }, || AppError::ReadinessTimeout(Duration::ZERO))
            .await;
        assert!(matches!(res, Err(AppError::Canceled)));
    }

    fn scripted<T>(steps: Vec<AppResult<T>>) -> std::sync::Mutex<std::collections::VecDeque<AppResult<T>>> {
        std::sync::Mutex::new(steps.into())
    }

    #[tokio::test(start_paused = true)]
    async fn test_stability_survives_snapshot_errors() {
        let steps = scripted(vec![
            Err(AppError::Browser("Execution context was destroyed".into())),
            Ok(Some("a".to_string())),
            Err(AppError::Browser("Cannot find context".into())),
            Ok(Some("b".to_string())),
            Ok(Some("b".to_string())),
        ]);
        let calls = std::sync::atomic::AtomicUsize::new(0);
        poll_until_stable(
            || {
                calls.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
                let next = steps.lock().unwrap().pop_front();
                async move { next.unwrap_or(Ok(None)) }
            },
            Duration::from_millis(500),
        )
        .await;
        assert_eq!(calls.load(std::sync::atomic::Ordering::SeqCst), 5);
    }

    #[tokio::test(start_paused = true)]
    async fn test_failing_snapshots_wait_for_the_deadline() {
        let deadline = PageDeadline::start(Duration::from_secs(3), CancellationToken::new());
        let res = deadline
            .run(
                async {
                    poll_until_stable(
                        || async { Err::<Option<String>, _>(AppError::Browser("boom".into())) },
                        Duration::from_millis(500),
                    )
                    .await;
                    Ok(())
                },
                || AppError::ReadinessTimeout(Duration::from_secs(3)),
            )
            .await;
        assert!(matches!(res, Err(AppError::ReadinessTimeout(_))));
    }

    #[tokio::test(start_paused = true)]
    async fn test_predicate_errors_are_retried() {
        let steps = scripted(vec![
            Err(AppError::Browser("not attached".into())),
            Ok(false),
            Ok(true),
        ]);
        poll_until_true(
            || {
                let next = steps.lock().unwrap().pop_front();
                async move { next.unwrap_or(Ok(false)) }
            },
            Duration::from_millis(100),
        )
        .await;
        assert!(steps.lock().unwrap().is_empty());
    }
}
