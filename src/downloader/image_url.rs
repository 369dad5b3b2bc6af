// src/downloader/image_url.rs

use crate::{
    config::AppConfig,
    constants::site,
    error::{AppError, AppResult},
};
use log::debug;

/// 把带水印的缩略图地址改写为无水印原图地址。
///
/// 原始地址形如 `http://sns-webpic-qc.xhscdn.com/<时间>/<签名>/<token>!<样式>`，
/// 取第 `min_segments` 段起的路径作为 token，去掉 `!` 之后的样式后缀，
/// 再拼到图片 CDN 上并指定输出格式。这一规则来自对站点 CDN 的逆向观察，
/// 站点改版后可能失效。
#[derive(Debug, Clone)]
pub struct ImageUrlRewriter {
    cdn_base: String,
    min_segments: usize,
}

impl Default for ImageUrlRewriter {
    fn default() -> Self {
        Self::new(site::IMAGE_CDN_BASE, site::IMAGE_URL_MIN_SEGMENTS)
    }
}

impl ImageUrlRewriter {
    pub fn new(cdn_base: impl Into<String>, min_segments: usize) -> Self {
        let cdn_base = cdn_base.into().trim_end_matches('/').to_string();
        Self {
            cdn_base,
            min_segments: min_segments.max(1),
        }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(config.image_cdn_base.clone(), config.image_min_segments)
    }

    pub fn rewrite(&self, original_url: &str, format: &str) -> AppResult<String> {
        let token = extract_image_token(original_url, self.min_segments)?;
        Ok(format!(
            "{}/{}?imageView2/format/{}",
            self.cdn_base, token, format
        ))
    }
}

/// 从原始图片地址中取出 CDN token
pub fn extract_image_token(original_url: &str, min_segments: usize) -> AppResult<&str> {
    let min_segments = min_segments.max(1);
    let segment_count = original_url.split('/').count();
    if segment_count < min_segments {
        return Err(AppError::MalformedUrl(format!(
            "'{}' 只有 {} 段，至少需要 {} 段",
            original_url, segment_count, min_segments
        )));
    }
    if segment_count > min_segments {
        debug!(
            "图片地址段数 ({}) 多于预期 ({})，多出的路径段将保留在 token 中: {}",
            segment_count, min_segments, original_url
        );
    }

    let remainder = original_url
        .splitn(min_segments, '/')
        .last()
        .unwrap_or_default();
    let token = remainder.split('!').next().unwrap_or_default();
    if token.is_empty() {
        return Err(AppError::MalformedUrl(format!(
            "'{}' 中没有可用的 token",
            original_url
        )));
    }
    Ok(token)
}

#[cfg(test)]
mod tests {
    use super::*;

    const REAL_URL: &str = "http://sns-webpic-qc.xhscdn.com/202509161717/674d2e41f2b3b972dc733d6258f3e27f/1040g2sg311v6icvpis6g49m398un3rak29ba220!nd_dft_wlteh_webp_3";

    #[test]
    fn test_rewrite_real_cdn_url() {
        let url = ImageUrlRewriter::default().rewrite(REAL_URL, "png").unwrap();
        assert_eq!(
            url,
            "https://ci.xiaohongshu.com/1040g2sg311v6icvpis6g49m398un3rak29ba220?imageView2/format/png"
        );
    }

    #[test]
    fn test_format_is_echoed_verbatim() {
        let rewriter = ImageUrlRewriter::default();
        for format in ["webp", "jpg", "PNG", "heic"] {
            let url = rewriter.rewrite(REAL_URL, format).unwrap();
            assert!(url.starts_with("https://ci.xiaohongshu.com/"));
            assert!(url.ends_with(&format!("?imageView2/format/{}", format)));
        }
    }

    #[test]
    fn test_extra_segments_are_kept_and_suffix_dropped() {
        let url = ImageUrlRewriter::default()
            .rewrite("http://host/a/b/c/d/e/token!suffix_tag", "webp")
            .unwrap();
        assert_eq!(url, "https://ci.xiaohongshu.com/c/d/e/token?imageView2/format/webp");
    }

    #[test]
    fn test_url_without_suffix_keeps_full_remainder() {
        let token = extract_image_token("https://h/x/y/abc/def", 6).unwrap();
        assert_eq!(token, "abc/def");
    }

    #[test]
    fn test_only_first_bang_matters() {
        let token = extract_image_token("http://h/1/2/tok!a!b", 6).unwrap();
        assert_eq!(token, "tok");
    }

    #[test]
    fn test_short_url_is_malformed() {
        for bad in ["", "http://host/a/b", "not a url", "http://host/a/b/"] {
            let err = extract_image_token(bad, 6).unwrap_err();
            assert!(matches!(err, AppError::MalformedUrl(_)), "input: {:?}", bad);
        }
    }

    #[test]
    fn test_segment_count_is_configurable() {
        let rewriter = ImageUrlRewriter::new("http://127.0.0.1:1234/", 4);
        let url = rewriter.rewrite("http://h/token!x", "jpg").unwrap();
        assert_eq!(url, "http://127.0.0.1:1234/token?imageView2/format/jpg");
    }
}
