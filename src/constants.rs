// src/constants.rs

pub const UI_WIDTH: usize = 88;
pub const TITLE_TRUNCATE_LENGTH: usize = 48;
pub const MAX_TITLE_CHARS: usize = 50;
pub const DEFAULT_IMAGE_NAME: &str = "image";
pub const CONFIG_DIR_NAME: &str = concat!(".", clap::crate_name!());
pub const CONFIG_FILE_NAME: &str = "config.json";
pub const LOG_FILE_NAME: &str = concat!(clap::crate_name!(), ".log");
pub const LOG_FALLBACK_FILE_NAME: &str = "fallback.log";
pub const DEFAULT_SAVE_DIR: &str = "downloads";
pub const DEFAULT_SELECTION: &str = "all";
pub const DEFAULT_IMAGE_FORMAT: &str = "png";
pub const USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

pub mod site {
    pub const ORIGIN: &str = "https://www.xiaohongshu.com";
    pub const REFERER: &str = "https://www.xiaohongshu.com/";
    pub const SEARCH_PATH: &str = "/search_result";
    pub const EXPLORE_PATH: &str = "/explore/";
    /// 网页端搜索入口的来源标记
    pub const SEARCH_SOURCE: &str = "web_explore_feed";
    pub const IMAGE_CDN_BASE: &str = "https://ci.xiaohongshu.com";
    /// 原始图片 URL 按 '/' 切分后至少需要的段数
    pub const IMAGE_URL_MIN_SEGMENTS: usize = 6;
}

pub mod timeouts {
    pub const PAGE_TIMEOUT_SECS: u64 = 60;
    pub const SCROLL_INTERVAL_MS: u64 = 1000;
    pub const CONNECT_TIMEOUT_SECS: u64 = 10;
    pub const REQUEST_TIMEOUT_SECS: u64 = 30;
    pub const POLL_INTERVAL_MS: u64 = 100;
    pub const STABLE_WINDOW_MS: u64 = 500;
}

pub mod scripts {
    /// 页面全局状态是否已挂载
    pub const STATE_EXISTS: &str = "window.__INITIAL_STATE__ !== undefined";

    /// 一次性序列化整个状态树，避免逐个属性读取时被页面脚本修改
    pub const SERIALIZE_STATE: &str = r#"(() => {
        if (window.__INITIAL_STATE__) {
            return JSON.stringify(window.__INITIAL_STATE__);
        }
        return "";
    })()"#;

    pub const FEED_COUNT: &str = r#"(() => {
        const state = window.__INITIAL_STATE__;
        if (state && state.search && state.search.feeds && state.search.feeds._value) {
            return state.search.feeds._value.length;
        }
        return 0;
    })()"#;

    pub const SCROLL_TO_BOTTOM: &str = r#"(() => {
        window.scrollTo({ top: document.body.scrollHeight, behavior: 'smooth' });
        return window.pageYOffset;
    })()"#;

    /// 用于判断页面是否稳定的快照：就绪状态、已加载资源数、DOM 节点数
    pub const STABILITY_SNAPSHOT: &str = r#"(() => JSON.stringify({
        ready: document.readyState,
        resources: performance.getEntriesByType('resource').length,
        nodes: document.getElementsByTagName('*').length,
    }))()"#;
}
