// src/config.rs

pub mod file;

use self::file::load_or_create_external_config;
use crate::{
    cli::Cli,
    constants::{self, site, timeouts},
    error::AppResult,
};
use serde::{Deserialize, Serialize};
use std::{path::PathBuf, time::Duration};

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct BrowserSection {
    pub headless: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub executable: Option<PathBuf>,
    pub page_timeout_secs: Option<u64>,
    pub window_width: Option<u32>,
    pub window_height: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct SearchSection {
    pub scroll_interval_ms: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct NetworkSection {
    pub connect_timeout_secs: Option<u64>,
    pub timeout_secs: Option<u64>,
    pub user_agent: Option<String>,
    pub referer: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ImageSection {
    pub cdn_base: Option<String>,
    pub min_segments: Option<usize>,
    pub default_format: Option<String>,
}

/// 对应 `~/.xhs-dl/config.json` 的文件结构，所有字段均可省略
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ExternalConfig {
    #[serde(default)]
    pub browser: BrowserSection,
    #[serde(default)]
    pub search: SearchSection,
    #[serde(default)]
    pub network: NetworkSection,
    #[serde(default)]
    pub image: ImageSection,
}

impl ExternalConfig {
    pub(crate) fn default_app_config() -> Self {
        Self {
            browser: BrowserSection {
                headless: Some(true),
                executable: None,
                page_timeout_secs: Some(timeouts::PAGE_TIMEOUT_SECS),
                window_width: Some(1280),
                window_height: Some(900),
            },
            search: SearchSection {
                scroll_interval_ms: Some(timeouts::SCROLL_INTERVAL_MS),
            },
            network: NetworkSection {
                connect_timeout_secs: Some(timeouts::CONNECT_TIMEOUT_SECS),
                timeout_secs: Some(timeouts::REQUEST_TIMEOUT_SECS),
                user_agent: Some(constants::USER_AGENT.into()),
                referer: Some(site::REFERER.into()),
            },
            image: ImageSection {
                cdn_base: Some(site::IMAGE_CDN_BASE.into()),
                min_segments: Some(site::IMAGE_URL_MIN_SEGMENTS),
                default_format: Some(constants::DEFAULT_IMAGE_FORMAT.into()),
            },
        }
    }
}

/// 启动浏览器所需的参数
#[derive(Debug, Clone)]
pub struct BrowserOptions {
    pub headless: bool,
    pub executable: Option<PathBuf>,
    pub window_size: (u32, u32),
    pub user_agent: String,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub browser: BrowserOptions,
    /// 一次搜索（导航、等待、滚动）的总时限
    pub page_timeout: Duration,
    pub scroll_interval: Duration,
    pub user_agent: String,
    pub referer: String,
    pub connect_timeout: Duration,
    pub timeout: Duration,
    pub image_cdn_base: String,
    pub image_min_segments: usize,
    pub default_format: String,
}

impl AppConfig {
    pub fn new(args: &Cli) -> AppResult<Self> {
        let external_config = load_or_create_external_config()?;
        let mut config = Self::from_external(external_config);

        if args.headful {
            config.browser.headless = false;
        }
        if let Some(ms) = args.scroll_interval {
            config.scroll_interval = Duration::from_millis(ms);
        }
        Ok(config)
    }

    pub fn from_external(external_config: ExternalConfig) -> Self {
        let ExternalConfig {
            browser,
            search,
            network,
            image,
        } = external_config;
        let user_agent = network
            .user_agent
            .unwrap_or_else(|| constants::USER_AGENT.into());

        Self {
            browser: BrowserOptions {
                headless: browser.headless.unwrap_or(true),
                executable: browser.executable,
                window_size: (
                    browser.window_width.unwrap_or(1280),
                    browser.window_height.unwrap_or(900),
                ),
                user_agent: user_agent.clone(),
            },
            page_timeout: Duration::from_secs(
                browser
                    .page_timeout_secs
                    .unwrap_or(timeouts::PAGE_TIMEOUT_SECS),
            ),
            scroll_interval: Duration::from_millis(
                search
                    .scroll_interval_ms
                    .unwrap_or(timeouts::SCROLL_INTERVAL_MS),
            ),
            user_agent,
            referer: network.referer.unwrap_or_else(|| site::REFERER.into()),
            connect_timeout: Duration::from_secs(
                network
                    .connect_timeout_secs
                    .unwrap_or(timeouts::CONNECT_TIMEOUT_SECS),
            ),
            timeout: Duration::from_secs(
                network.timeout_secs.unwrap_or(timeouts::REQUEST_TIMEOUT_SECS),
            ),
            image_cdn_base: image
                .cdn_base
                .unwrap_or_else(|| site::IMAGE_CDN_BASE.into()),
            image_min_segments: image
                .min_segments
                .unwrap_or(site::IMAGE_URL_MIN_SEGMENTS),
            default_format: image
                .default_format
                .unwrap_or_else(|| constants::DEFAULT_IMAGE_FORMAT.into()),
        }
    }
}

#[cfg(feature = "testing")]
impl Default for AppConfig {
    fn default() -> Self {
        let mut config = Self::from_external(ExternalConfig::default_app_config());
        config.user_agent = "test-agent/1.0".to_string();
        config.connect_timeout = Duration::from_secs(5);
        config.timeout = Duration::from_secs(5);
        config.page_timeout = Duration::from_secs(5);
        config.scroll_interval = Duration::from_millis(10);
        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_file_falls_back_to_defaults() {
        let external: ExternalConfig =
            serde_json::from_str(r#"{"image": {"min_segments": 7}}"#).unwrap();
        let config = AppConfig::from_external(external);

        assert_eq!(config.image_min_segments, 7);
        assert_eq!(config.image_cdn_base, site::IMAGE_CDN_BASE);
        assert_eq!(config.page_timeout, Duration::from_secs(60));
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert_eq!(config.scroll_interval, Duration::from_millis(1000));
        assert!(config.browser.headless);
    }
}
