// src/utils.rs

use crate::{
    constants::{self, site},
    models::FeedLink,
};
use regex::Regex;
use std::{collections::BTreeSet, sync::LazyLock};
use url::form_urlencoded;

static ILLEGAL_CHARS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"[<>:"/\\|?*\p{Cc}]"#).unwrap());

/// 把标题转换为可用作文件名前缀的字符串
pub fn sanitize_filename(title: &str) -> String {
    let stripped = ILLEGAL_CHARS_RE.replace_all(title, "");
    let capped: String = stripped.chars().take(constants::MAX_TITLE_CHARS).collect();
    let name = capped.trim_matches(|c| c == ' ' || c == '.');
    if name.is_empty() {
        return constants::DEFAULT_IMAGE_NAME.to_string();
    }
    name.to_string()
}

/// 构造关键词搜索页地址
pub fn make_search_url(keyword: &str) -> String {
    let query = form_urlencoded::Serializer::new(String::new())
        .append_pair("keyword", keyword)
        .append_pair("source", site::SEARCH_SOURCE)
        .finish();
    format!("{}{}?{}", site::ORIGIN, site::SEARCH_PATH, query)
}

/// 根据笔记 ID 和可选的 xsec_token 生成完整链接
pub fn build_feed_link(feed_id: &str, xsec_token: Option<&str>) -> FeedLink {
    let base_url = format!("{}{}{}", site::ORIGIN, site::EXPLORE_PATH, feed_id);
    let token = xsec_token.filter(|t| !t.is_empty()).unwrap_or_default();
    let full_url = if token.is_empty() {
        base_url.clone()
    } else {
        format!("{}?xsec_token={}", base_url, token)
    };
    FeedLink {
        feed_id: feed_id.to_string(),
        base_url,
        full_url,
        xsec_token: token.to_string(),
    }
}

/// 按显示宽度截断文本，中日韩字符计为 2 个宽度，超出时以 "..." 结尾
pub fn truncate_text(text: &str, max_width: usize) -> String {
    let limit = max_width.saturating_sub(3);
    let mut width = 0;
    for (pos, c) in text.char_indices() {
        width += if c.is_ascii() { 1 } else { 2 };
        if width > limit && pos > 0 {
            return format!("{}...", &text[..pos]);
        }
    }
    text.to_string()
}

/// 把 "1-3,5" 或 "all" 形式的选择解析为从 0 开始的有序下标，忽略越界和无法识别的部分
pub fn parse_selection_indices(selection: &str, total: usize) -> Vec<usize> {
    if selection.trim().eq_ignore_ascii_case(constants::DEFAULT_SELECTION) {
        return (0..total).collect();
    }

    let in_range = |n: usize| (1..=total).contains(&n);
    let mut picked = BTreeSet::new();
    for part in selection.split(',').map(str::trim).filter(|p| !p.is_empty()) {
        match part.split_once('-') {
            Some((a, b)) => {
                let (Ok(a), Ok(b)) = (a.trim().parse::<usize>(), b.trim().parse::<usize>()) else {
                    continue;
                };
                if a == 0 || b == 0 {
                    continue;
                }
                picked.extend((a.min(b)..=a.max(b).min(total)).map(|n| n - 1));
            }
            None => {
                if let Ok(n) = part.parse::<usize>()
                    && in_range(n)
                {
                    picked.insert(n - 1);
                }
            }
        }
    }
    picked.into_iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_selection_indices() {
        assert_eq!(parse_selection_indices("1,3,5", 5), vec![0, 2, 4]);
        assert_eq!(parse_selection_indices("2-4", 5), vec![1, 2, 3]);
        assert_eq!(parse_selection_indices("All", 3), vec![0, 1, 2]);
        // 乱序和重复
        assert_eq!(parse_selection_indices("5, 1-2, 1", 5), vec![0, 1, 4]);
        // 无效和越界输入
        assert_eq!(parse_selection_indices("1,10,foo,-2", 5), vec![0]);
        assert_eq!(parse_selection_indices("", 5), Vec::<usize>::new());
    }

    #[test]
    fn test_sanitize_filename() {
        assert_eq!(sanitize_filename("a<b>c:d\"e/f\\g|h?i*j"), "abcdefghij");
        assert_eq!(sanitize_filename("tab\there\nnew"), "tabherenew");
        assert_eq!(sanitize_filename(" . 周末去哪儿. "), "周末去哪儿");

        // 空串或全部为非法字符时使用默认名称
        assert_eq!(sanitize_filename(""), "image");
        assert_eq!(sanitize_filename("<>|?*"), "image");
        assert_eq!(sanitize_filename(" ... "), "image");

        // 按字符截断，不破坏 UTF-8
        let long_title = "旅".repeat(80);
        let capped = sanitize_filename(&long_title);
        assert_eq!(capped.chars().count(), 50);
    }

    #[test]
    fn test_sanitize_filename_is_idempotent() {
        for title in ["正常标题", "a/b:c", "  .hidden.  ", "", "x".repeat(70).as_str()] {
            let once = sanitize_filename(title);
            assert_eq!(sanitize_filename(&once), once, "title: {:?}", title);
        }
    }

    #[test]
    fn test_make_search_url() {
        assert_eq!(
            make_search_url("travel"),
            "https://www.xiaohongshu.com/search_result?keyword=travel&source=web_explore_feed"
        );
        assert_eq!(
            make_search_url("美食 推荐&"),
            "https://www.xiaohongshu.com/search_result?keyword=%E7%BE%8E%E9%A3%9F+%E6%8E%A8%E8%8D%90%26&source=web_explore_feed"
        );
    }

    #[test]
    fn test_build_feed_link() {
        let link = build_feed_link("64f1a2", Some("ABtoken="));
        assert_eq!(link.base_url, "https://www.xiaohongshu.com/explore/64f1a2");
        assert_eq!(link.full_url, "https://www.xiaohongshu.com/explore/64f1a2?xsec_token=ABtoken=");
        assert_eq!(link.xsec_token, "ABtoken=");

        let link = build_feed_link("64f1a2", Some(""));
        assert_eq!(link.full_url, link.base_url);
        let link = build_feed_link("64f1a2", None);
        assert_eq!(link.full_url, "https://www.xiaohongshu.com/explore/64f1a2");
    }

    #[test]
    fn test_truncate_text() {
        assert_eq!(truncate_text("short", 10), "short");
        assert_eq!(truncate_text("abcdefghijklmnop", 10), "abcdefg...");
    }
}
