// src/models/state.rs

use super::Feed;
use serde::Deserialize;

// --- window.__INITIAL_STATE__ 中与搜索相关的部分 ---

#[derive(Deserialize, Debug)]
pub struct SearchState {
    pub search: SearchSlice,
}

#[derive(Deserialize, Debug)]
pub struct SearchSlice {
    pub feeds: FeedsValue,
}

/// 页面用响应式容器包裹笔记列表，真正的数组在 `_value` 字段中
#[derive(Deserialize, Debug)]
pub struct FeedsValue {
    #[serde(rename = "_value")]
    pub value: Vec<Feed>,
}

impl SearchState {
    pub fn into_feeds(self) -> Vec<Feed> {
        self.search.feeds.value
    }
}
