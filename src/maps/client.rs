//! # HTTP 客户端
//!
//! 基于 `reqwest::blocking` 的同步客户端，带全局速率限制。
//!
//! ## 设计
//! - `HttpFetch` trait 是网络访问的唯一接缝，街景 / 卫星图逻辑只依赖它，
//!   测试中用内存实现替换
//! - `RateLimiter` 在所有线程间共享，保证相邻请求间隔不小于设定值
//!
//! ## 依赖关系
//! - 被 `maps/streetview.rs`, `maps/static_map.rs`, `osm/overpass.rs` 使用
//! - 使用 `reqwest`, `tracing`

use crate::error::{FacadesetError, Result};

use reqwest::Url;
use std::sync::Mutex;
use std::time::{Duration, Instant};

const USER_AGENT: &str = concat!("facadeset/", env!("CARGO_PKG_VERSION"));

/// 简化的 HTTP 响应
#[derive(Debug, Clone, Default)]
pub struct HttpResponse {
    pub status: u16,
    pub content_type: Option<String>,
    pub body: Vec<u8>,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// 响应体前 `limit` 个字符（错误信息用）
    pub fn body_preview(&self, limit: usize) -> String {
        String::from_utf8_lossy(&self.body).chars().take(limit).collect()
    }
}

/// HTTP 请求抽象
pub trait HttpFetch: Send + Sync {
    fn get(&self, url: &Url) -> Result<HttpResponse>;

    /// POST `application/x-www-form-urlencoded` 表单
    fn post_form(&self, url: &str, form: &[(&str, &str)]) -> Result<HttpResponse>;
}

/// 最小请求间隔限制器
pub struct RateLimiter {
    last_request: Mutex<Option<Instant>>,
    min_interval: Duration,
}

impl RateLimiter {
    pub fn new(min_interval: Duration) -> Self {
        Self {
            last_request: Mutex::new(None),
            min_interval,
        }
    }

    /// 必要时阻塞，直到距上次请求已过 `min_interval`
    pub fn wait(&self) {
        let mut last = match self.last_request.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };

        if let Some(last_time) = *last {
            let elapsed = last_time.elapsed();
            if elapsed < self.min_interval {
                let wait_time = self.min_interval - elapsed;
                tracing::debug!("Rate limiting: waiting {:?}", wait_time);
                std::thread::sleep(wait_time);
            }
        }

        *last = Some(Instant::now());
    }
}

/// 带速率限制的阻塞 HTTP 客户端
pub struct HttpClient {
    http: reqwest::blocking::Client,
    rate_limiter: RateLimiter,
}

impl HttpClient {
    pub fn new(timeout: Duration, min_interval: Duration) -> Result<Self> {
        let http = reqwest::blocking::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()
            .map_err(|e| FacadesetError::Other(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http,
            rate_limiter: RateLimiter::new(min_interval),
        })
    }

    fn collect(url: &str, response: reqwest::blocking::Response) -> Result<HttpResponse> {
        let status = response.status().as_u16();
        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|s| s.to_string());
        let body = response
            .bytes()
            .map_err(|e| FacadesetError::HttpError {
                url: url.to_string(),
                source: e,
            })?
            .to_vec();

        Ok(HttpResponse {
            status,
            content_type,
            body,
        })
    }
}

impl HttpFetch for HttpClient {
    fn get(&self, url: &Url) -> Result<HttpResponse> {
        self.rate_limiter.wait();
        tracing::debug!(host = ?url.host_str(), path = %url.path(), "GET");

        let response = self
            .http
            .get(url.clone())
            .send()
            .map_err(|e| FacadesetError::HttpError {
                url: redact_key(url),
                source: e,
            })?;
        Self::collect(&redact_key(url), response)
    }

    fn post_form(&self, url: &str, form: &[(&str, &str)]) -> Result<HttpResponse> {
        self.rate_limiter.wait();
        tracing::debug!(url = %url, "POST");

        let response = self
            .http
            .post(url)
            .form(form)
            .send()
            .map_err(|e| FacadesetError::HttpError {
                url: url.to_string(),
                source: e,
            })?;
        Self::collect(url, response)
    }
}

/// 去掉 URL 中的 `key` 参数，避免 API key 进入日志与错误信息
pub fn redact_key(url: &Url) -> String {
    let mut redacted = url.clone();
    let pairs: Vec<(String, String)> = url
        .query_pairs()
        .map(|(k, v)| {
            let v = if k == "key" { "***".to_string() } else { v.into_owned() };
            (k.into_owned(), v)
        })
        .collect();
    redacted.query_pairs_mut().clear().extend_pairs(pairs);
    redacted.to_string()
}

#[cfg(test)]
pub(crate) mod testing {
    //! 测试用内存 HTTP 实现
    use super::*;
    use std::collections::HashMap;

    /// 按 URL path 返回预设响应，并记录请求
    #[derive(Default)]
    pub struct FakeHttp {
        pub routes: HashMap<String, HttpResponse>,
        pub requests: Mutex<Vec<Url>>,
        /// POST 请求的表单内容，顺序与请求一致
        pub forms: Mutex<Vec<Vec<(String, String)>>>,
    }

    impl FakeHttp {
        pub fn route(mut self, path: &str, response: HttpResponse) -> Self {
            self.routes.insert(path.to_string(), response);
            self
        }

        pub fn request_count(&self) -> usize {
            self.requests.lock().unwrap().len()
        }

        pub fn requests_to(&self, path: &str) -> Vec<Url> {
            self.requests
                .lock()
                .unwrap()
                .iter()
                .filter(|u| u.path() == path)
                .cloned()
                .collect()
        }

        fn respond(&self, url: &Url) -> HttpResponse {
            self.requests.lock().unwrap().push(url.clone());
            self.routes.get(url.path()).cloned().unwrap_or(HttpResponse {
                status: 404,
                content_type: Some("text/plain".to_string()),
                body: b"not found".to_vec(),
            })
        }
    }

    impl HttpFetch for FakeHttp {
        fn get(&self, url: &Url) -> Result<HttpResponse> {
            Ok(self.respond(url))
        }

        fn post_form(&self, url: &str, form: &[(&str, &str)]) -> Result<HttpResponse> {
            let url = Url::parse(url)
                .map_err(|e| FacadesetError::InvalidArgument(format!("{}: {}", url, e)))?;
            self.forms.lock().unwrap().push(
                form.iter()
                    .map(|(k, v)| (k.to_string(), v.to_string()))
                    .collect(),
            );
            Ok(self.respond(&url))
        }
    }

    pub fn json(body: &str) -> HttpResponse {
        HttpResponse {
            status: 200,
            content_type: Some("application/json".to_string()),
            body: body.as_bytes().to_vec(),
        }
    }

    pub fn image(len: usize) -> HttpResponse {
        HttpResponse {
            status: 200,
            content_type: Some("image/jpeg".to_string()),
            body: vec![0xAB; len],
        }
    }
}
