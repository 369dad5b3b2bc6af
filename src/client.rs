// src/client.rs

use crate::{config::AppConfig, error::*};
use reqwest::{
    IntoUrl, Response,
    header::{self, HeaderMap, HeaderValue},
};

/// 下载图片用的 HTTP 客户端。除固定的超时与请求头外不保存任何状态，可在多次下载间复用。
#[derive(Clone)]
pub struct HttpClient {
    pub client: reqwest::Client,
}

impl HttpClient {
    pub fn new(config: &AppConfig) -> AppResult<Self> {
        let mut headers = HeaderMap::new();
        // 图片 CDN 会拒绝没有站点 Referer 的请求
        let referer = HeaderValue::from_str(&config.referer).map_err(|e| {
            AppError::UserInputError(format!("配置中的 Referer '{}' 无效: {}", config.referer, e))
        })?;
        headers.insert(header::REFERER, referer);

        let client = reqwest::Client::builder()
            .user_agent(config.user_agent.clone())
            .default_headers(headers)
            .connect_timeout(config.connect_timeout)
            .timeout(config.timeout)
            .build()?;

        Ok(Self { client })
    }

    /// 发起 GET 请求，非 2xx 状态视为错误
    pub async fn get<T: IntoUrl>(&self, url: T) -> AppResult<Response> {
        let res = self.client.get(url).send().await?;
        if !res.status().is_success() {
            return Err(AppError::HttpStatus(res.status()));
        }
        Ok(res)
    }
}
