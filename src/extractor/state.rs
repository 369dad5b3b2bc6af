// src/extractor/state.rs

use crate::{
    browser::PageHandle,
    constants::scripts,
    error::{AppError, AppResult},
    models::{Feed, state::SearchState},
};
use log::{debug, warn};
use serde_json::Value;

/// 读取页面当前已加载的全部笔记。
///
/// 调用前页面必须已经通过 `__INITIAL_STATE__` 存在性检查。整个状态树在一次脚本执行中
/// 序列化为文本，要么完整解析成功，要么返回错误，不会返回部分结果。
pub async fn extract_feeds<P>(page: &P) -> AppResult<Vec<Feed>>
where
    P: PageHandle + ?Sized,
{
    let value = page.evaluate(scripts::SERIALIZE_STATE).await?;
    let text = match value {
        Value::String(s) if !s.is_empty() => s,
        Value::String(_) => {
            return Err(AppError::StateUnavailable(
                "__INITIAL_STATE__ 不存在或序列化结果为空".to_string(),
            ));
        }
        other => {
            return Err(AppError::StateUnavailable(format!(
                "序列化脚本返回了非字符串结果: {}",
                other
            )));
        }
    };
    debug!("已读取页面状态，长度 {} 字节", text.len());
    decode_feeds(&text)
}

/// 把序列化后的状态文本解析为笔记列表，保持数组原有顺序
pub fn decode_feeds(text: &str) -> AppResult<Vec<Feed>> {
    let state: SearchState = serde_json::from_str(text).map_err(AppError::Decode)?;
    Ok(state.into_feeds())
}

/// 当前状态中的笔记数量，仅用作“是否有新内容”的信号。任何异常都视为 0。
pub async fn current_feed_count<P>(page: &P) -> usize
where
    P: PageHandle + ?Sized,
{
    match page.evaluate(scripts::FEED_COUNT).await {
        Ok(value) => value
            .as_u64()
            .or_else(|| value.as_f64().filter(|f| *f >= 0.0).map(|f| f as u64))
            .map_or(0, |n| n as usize),
        Err(e) => {
            warn!("读取笔记数量失败，按 0 处理: {}", e);
            0
        }
    }
}
