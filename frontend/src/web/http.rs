//! HTTP 请求封装模块
//!
//! 使用 `web_sys::fetch` 提供简洁的 HTTP 客户端接口。传输层以
//! `HttpClient` trait 抽象，网关逻辑据此可在原生测试中用 Mock 驱动。

use coursework_shared::protocol::HttpMethod;
use serde::de::DeserializeOwned;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;
use web_sys::{Headers, Request, RequestInit, Response};

// =========================================================
// HTTP 错误类型
// =========================================================

#[derive(Debug)]
pub enum HttpError {
    /// 请求构建失败
    RequestBuildFailed(String),
    /// 网络请求失败
    NetworkError(String),
    /// 响应解析失败
    ResponseParseFailed(String),
}

impl core::fmt::Display for HttpError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            HttpError::RequestBuildFailed(msg) => write!(f, "request build failed: {}", msg),
            HttpError::NetworkError(msg) => write!(f, "network error: {}", msg),
            HttpError::ResponseParseFailed(msg) => write!(f, "response parse failed: {}", msg),
        }
    }
}

impl std::error::Error for HttpError {}

// =========================================================
// 通用请求/响应结构
// =========================================================

/// 通用 HTTP 请求结构，builder 风格组装
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub url: String,
    pub method: HttpMethod,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
}

impl HttpRequest {
    pub fn new(url: &str, method: HttpMethod) -> Self {
        Self {
            url: url.to_string(),
            method,
            headers: Vec::new(),
            body: None,
        }
    }

    pub fn with_header(mut self, key: &str, value: &str) -> Self {
        self.headers.push((key.to_string(), value.to_string()));
        self
    }

    pub fn with_body(mut self, body: String) -> Self {
        self.body = Some(body);
        self
    }

    /// 查找请求头（测试断言用）
    pub fn header(&self, key: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

/// 通用 HTTP 响应结构
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    /// 检查响应是否成功 (2xx)
    pub fn ok(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// 解析 JSON 主体；空主体按 `null` 处理（204 等无主体响应）
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, HttpError> {
        let body = if self.body.trim().is_empty() {
            "null"
        } else {
            self.body.as_str()
        };
        serde_json::from_str(body).map_err(|e| HttpError::ResponseParseFailed(e.to_string()))
    }
}

/// HTTP 客户端特性 (Trait)
///
/// (?Send) 是因为浏览器环境下的 JsFuture 不是 Send 的
#[async_trait::async_trait(?Send)]
pub trait HttpClient {
    async fn send(&self, req: HttpRequest) -> Result<HttpResponse, HttpError>;
}

// =========================================================
// 实现层: fetch 客户端 (Production)
// =========================================================

/// 基于 `window.fetch` 的生产实现
#[derive(Clone, Default)]
pub struct FetchHttpClient;

#[async_trait::async_trait(?Send)]
impl HttpClient for FetchHttpClient {
    async fn send(&self, req: HttpRequest) -> Result<HttpResponse, HttpError> {
        let headers = Headers::new()
            .map_err(|e| HttpError::RequestBuildFailed(format!("create headers: {:?}", e)))?;

        for (key, value) in &req.headers {
            headers
                .set(key, value)
                .map_err(|e| HttpError::RequestBuildFailed(format!("set header: {:?}", e)))?;
        }

        let opts = RequestInit::new();
        opts.set_method(req.method.as_str());
        opts.set_headers(&headers.into());

        if let Some(body) = &req.body {
            opts.set_body(&JsValue::from_str(body));
        }

        let request = Request::new_with_str_and_init(&req.url, &opts)
            .map_err(|e| HttpError::RequestBuildFailed(format!("{:?}", e)))?;

        let window = web_sys::window()
            .ok_or_else(|| HttpError::NetworkError("no window object".to_string()))?;

        let resp_value = JsFuture::from(window.fetch_with_request(&request))
            .await
            .map_err(|e| HttpError::NetworkError(format!("{:?}", e)))?;

        let response: Response = resp_value
            .dyn_into()
            .map_err(|e| HttpError::ResponseParseFailed(format!("not a Response: {:?}", e)))?;

        let status = response.status();

        let promise = response
            .text()
            .map_err(|e| HttpError::ResponseParseFailed(format!("{:?}", e)))?;
        let text = JsFuture::from(promise)
            .await
            .map_err(|e| HttpError::ResponseParseFailed(format!("{:?}", e)))?;
        let body = text.as_string().unwrap_or_default();

        Ok(HttpResponse { status, body })
    }
}

// =========================================================
// 测试工具: MockHttpClient
// =========================================================

#[cfg(test)]
pub mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::collections::HashMap;

    /// 录制请求、按 URL 回放预设响应的测试客户端
    #[derive(Default)]
    pub struct MockHttpClient {
        // URL -> (状态码, 响应主体)
        responses: RefCell<HashMap<String, (u16, String)>>,
        /// 记录发出的完整请求，供断言
        pub requests: RefCell<Vec<HttpRequest>>,
    }

    impl MockHttpClient {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn mock_response(&self, url: &str, status: u16, body: serde_json::Value) {
            self.responses
                .borrow_mut()
                .insert(url.to_string(), (status, body.to_string()));
        }

        /// 预设一个无主体的响应（如 DELETE 的 204）
        pub fn mock_empty_response(&self, url: &str, status: u16) {
            self.responses
                .borrow_mut()
                .insert(url.to_string(), (status, String::new()));
        }
    }

    #[async_trait::async_trait(?Send)]
    impl HttpClient for MockHttpClient {
        async fn send(&self, req: HttpRequest) -> Result<HttpResponse, HttpError> {
            let preset = self.responses.borrow().get(&req.url).cloned();
            self.requests.borrow_mut().push(req);

            match preset {
                Some((status, body)) => Ok(HttpResponse { status, body }),
                None => Ok(HttpResponse {
                    status: 404,
                    body: "{\"detail\":\"Not Found\"}".to_string(),
                }),
            }
        }
    }

    /// 总是失败的客户端，模拟断网
    pub struct FailingHttpClient;

    #[async_trait::async_trait(?Send)]
    impl HttpClient for FailingHttpClient {
        async fn send(&self, _req: HttpRequest) -> Result<HttpResponse, HttpError> {
            Err(HttpError::NetworkError("connection refused".to_string()))
        }
    }

    #[test]
    fn empty_body_parses_as_null() {
        let resp = HttpResponse {
            status: 204,
            body: String::new(),
        };
        let value: Option<String> = resp.json().unwrap();
        assert_eq!(value, None);
    }
}
