//! API 网关模块
//!
//! 所有请求都经过同一条管道：按协议定义编码请求体，自动附加
//! Bearer token，拦截 401 做全局强制下线，其余错误原样透传。
//! 这是系统里"会话已失效"的唯一事实来源。

use crate::web::{
    BrowserTokenStore, FetchHttpClient, HttpClient, HttpError, HttpRequest, HttpResponse,
    TokenStore,
};
use coursework_shared::protocol::{
    ApiRequest, BodyEncoding, ChangeEmailRequest, ChangePasswordRequest, CreateCourseRequest,
    CreateTaskRequest, DeleteCourseRequest, DeleteTaskRequest, ListCoursesRequest,
    ListTasksRequest, LoginRequest, RegisterRequest, UpdateCourseRequest, UpdateTaskRequest,
};
use coursework_shared::{
    BEARER_PREFIX, Course, ErrorBody, HEADER_AUTHORIZATION, Task, TokenResponse, UserProfile,
};
use std::sync::Arc;

/// 默认后端地址；构建时可用环境变量 API_BASE_URL 覆盖
pub const DEFAULT_API_BASE_URL: &str = "https://coursework-lite.onrender.com";

pub fn api_base_url() -> String {
    option_env!("API_BASE_URL")
        .unwrap_or(DEFAULT_API_BASE_URL)
        .trim_end_matches('/')
        .to_string()
}

// =========================================================
// 错误类型
// =========================================================

/// 网关错误。页面层只负责把它变成用户可见的消息。
#[derive(Debug, Clone)]
pub enum ApiError {
    /// 传输层失败（断网等）
    Network(String),
    /// 响应主体无法解析
    Decode(String),
    /// 服务端返回非 2xx；`detail` 为响应主体里的消息或通用兜底文案
    Api { status: u16, detail: String },
}

impl ApiError {
    /// 展示给用户的消息
    pub fn message(&self) -> String {
        match self {
            ApiError::Network(_) => "Network error. Please try again.".to_string(),
            ApiError::Decode(_) => "Unexpected server response. Please try again.".to_string(),
            ApiError::Api { detail, .. } => detail.clone(),
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl core::fmt::Display for ApiError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            ApiError::Network(msg) => write!(f, "network failure: {}", msg),
            ApiError::Decode(msg) => write!(f, "decode failure: {}", msg),
            ApiError::Api { status, detail } => write!(f, "api failure ({}): {}", status, detail),
        }
    }
}

impl std::error::Error for ApiError {}

impl From<HttpError> for ApiError {
    fn from(e: HttpError) -> Self {
        match e {
            HttpError::ResponseParseFailed(msg) => ApiError::Decode(msg),
            other => ApiError::Network(other.to_string()),
        }
    }
}

/// 服务端未给出 `detail` 时的兜底文案
const GENERIC_FAILURE: &str = "Request failed. Please try again.";

/// 从失败响应里提取可展示的消息
fn error_detail(response: &HttpResponse) -> String {
    response
        .json::<ErrorBody>()
        .map(|body| body.detail)
        .unwrap_or_else(|_| GENERIC_FAILURE.to_string())
}

/// 把请求序列化为 application/x-www-form-urlencoded
fn form_encode<T: serde::Serialize>(value: &T) -> Result<String, ApiError> {
    let json = serde_json::to_value(value).map_err(|e| ApiError::Decode(e.to_string()))?;
    let object = json
        .as_object()
        .ok_or_else(|| ApiError::Decode("form body must be an object".to_string()))?;

    let pairs: Vec<String> = object
        .iter()
        .map(|(key, val)| {
            let raw = match val {
                serde_json::Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            format!("{}={}", key, urlencoding::encode(&raw))
        })
        .collect();
    Ok(pairs.join("&"))
}

// =========================================================
// 网关客户端 (API Gateway)
// =========================================================

#[derive(Clone)]
pub struct ApiClient<C: HttpClient, S: TokenStore> {
    pub base_url: String,
    transport: C,
    pub store: S,
    /// 401 拦截后的强制下线回调（重置会话、跳转登录页）
    on_session_expired: Option<Arc<dyn Fn() + Send + Sync>>,
}

impl<C: HttpClient, S: TokenStore> ApiClient<C, S> {
    pub fn new(base_url: impl Into<String>, transport: C, store: S) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            base_url,
            transport,
            store,
            on_session_expired: None,
        }
    }

    pub fn with_session_expired(mut self, callback: impl Fn() + Send + Sync + 'static) -> Self {
        self.on_session_expired = Some(Arc::new(callback));
        self
    }

    fn url(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        }
    }

    /// 管道核心：附加 token -> 发送 -> 401 拦截 -> 错误映射
    ///
    /// 返回 Ok 当且仅当响应为 2xx。
    async fn dispatch(&self, mut req: HttpRequest) -> Result<HttpResponse, ApiError> {
        if let Some(token) = self.store.get() {
            req = req.with_header(
                HEADER_AUTHORIZATION,
                &format!("{}{}", BEARER_PREFIX, token),
            );
        }

        let response = self.transport.send(req).await?;

        if response.status == 401 {
            // 会话失效的唯一处理点：清存储、通知上层强制下线
            self.store.clear();
            if let Some(callback) = &self.on_session_expired {
                callback();
            }
            return Err(ApiError::Api {
                status: 401,
                detail: error_detail(&response),
            });
        }

        if !response.ok() {
            return Err(ApiError::Api {
                status: response.status,
                detail: error_detail(&response),
            });
        }

        Ok(response)
    }

    /// 发送一个协议定义的请求并解析其响应类型
    async fn send<R: ApiRequest>(&self, request: &R) -> Result<R::Response, ApiError> {
        let url = self.url(&request.path());
        let mut http = HttpRequest::new(&url, R::METHOD);

        http = match R::ENCODING {
            BodyEncoding::None => http,
            BodyEncoding::Json => {
                let body =
                    serde_json::to_string(request).map_err(|e| ApiError::Decode(e.to_string()))?;
                http.with_header("Content-Type", "application/json")
                    .with_body(body)
            }
            BodyEncoding::Form => http
                .with_header("Content-Type", "application/x-www-form-urlencoded")
                .with_body(form_encode(request)?),
        };

        let response = self.dispatch(http).await?;
        response
            .json::<R::Response>()
            .map_err(|e| ApiError::Decode(e.to_string()))
    }

    // --- Users ---

    /// 登录；成功后把 token 写入 Token Store 并返回它。
    ///
    /// 用户输入的邮箱走表单的 `username` 字段（后端契约如此）。
    pub async fn login(&self, email: &str, password: &str) -> Result<String, ApiError> {
        let request = LoginRequest {
            username: email.to_string(),
            password: password.to_string(),
        };
        let TokenResponse { access_token } = self.send(&request).await?;
        self.store.set(&access_token);
        Ok(access_token)
    }

    /// 注册；成功不代表登录，调用方仍需走 login
    pub async fn register(
        &self,
        username: &str,
        email: &str,
        password: &str,
    ) -> Result<UserProfile, ApiError> {
        self.send(&RegisterRequest {
            username: username.to_string(),
            email: email.to_string(),
            password: password.to_string(),
        })
        .await
    }

    pub async fn change_email(&self, new_email: &str, password: &str) -> Result<(), ApiError> {
        self.send(&ChangeEmailRequest {
            new_email: new_email.to_string(),
            password: password.to_string(),
        })
        .await
        .map(|_| ())
    }

    pub async fn change_password(
        &self,
        current_password: &str,
        new_password: &str,
    ) -> Result<(), ApiError> {
        self.send(&ChangePasswordRequest {
            current_password: current_password.to_string(),
            new_password: new_password.to_string(),
        })
        .await
        .map(|_| ())
    }

    // --- Courses ---

    pub async fn get_courses(&self) -> Result<Vec<Course>, ApiError> {
        self.send(&ListCoursesRequest).await
    }

    pub async fn create_course(&self, request: CreateCourseRequest) -> Result<Course, ApiError> {
        self.send(&request).await
    }

    pub async fn update_course(&self, request: UpdateCourseRequest) -> Result<Course, ApiError> {
        self.send(&request).await
    }

    pub async fn delete_course(&self, id: &str) -> Result<(), ApiError> {
        self.send(&DeleteCourseRequest { id: id.to_string() })
            .await
            .map(|_| ())
    }

    // --- Tasks ---

    pub async fn get_tasks(&self) -> Result<Vec<Task>, ApiError> {
        self.send(&ListTasksRequest).await
    }

    pub async fn create_task(&self, request: CreateTaskRequest) -> Result<Task, ApiError> {
        self.send(&request).await
    }

    pub async fn update_task(&self, request: UpdateTaskRequest) -> Result<Task, ApiError> {
        self.send(&request).await
    }

    pub async fn delete_task(&self, id: &str) -> Result<(), ApiError> {
        self.send(&DeleteTaskRequest { id: id.to_string() })
            .await
            .map(|_| ())
    }
}

/// 浏览器环境下的具体网关类型
pub type CourseworkApi = ApiClient<FetchHttpClient, BrowserTokenStore>;

impl ApiClient<FetchHttpClient, BrowserTokenStore> {
    pub fn from_env() -> Self {
        Self::new(api_base_url(), FetchHttpClient, BrowserTokenStore)
    }
}

/// 从 Context 获取网关客户端
pub fn use_api() -> CourseworkApi {
    leptos::prelude::use_context::<CourseworkApi>().expect("ApiClient should be provided")
}

// =========================================================
// 单元测试 (Unit Tests)
// =========================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::SessionState;
    use crate::web::http_mocks::{FailingHttpClient, MockHttpClient};
    use crate::web::route::{AppRoute, Resolution, resolve};
    use crate::web::storage_mocks::MemoryTokenStore;
    use coursework_shared::protocol::HttpMethod;
    use serde_json::json;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicU32, Ordering};

    const BASE: &str = "https://api.test";

    fn client(store: MemoryTokenStore) -> ApiClient<MockHttpClient, MemoryTokenStore> {
        ApiClient::new(BASE, MockHttpClient::new(), store)
    }

    fn form_pairs(body: &str) -> Vec<&str> {
        let mut pairs: Vec<&str> = body.split('&').collect();
        pairs.sort();
        pairs
    }

    // --- 场景 A：登录成功 ---

    #[tokio::test]
    async fn login_sends_form_credentials_and_persists_the_token() {
        let store = MemoryTokenStore::new();
        let api = client(store.clone());
        api.transport.mock_response(
            "https://api.test/users/login",
            200,
            json!({"access_token": "tok1"}),
        );

        let token = api.login("a@b.com", "secretpw").await.unwrap();
        assert_eq!(token, "tok1");
        assert_eq!(store.get(), Some("tok1".to_string()));

        let requests = api.transport.requests.borrow();
        let request = &requests[0];
        assert_eq!(request.method, HttpMethod::Post);
        assert_eq!(
            request.header("Content-Type"),
            Some("application/x-www-form-urlencoded")
        );
        // 恰好两个字段：username 携带邮箱，password 携带密码
        assert_eq!(
            form_pairs(request.body.as_deref().unwrap()),
            vec!["password=secretpw", "username=a%40b.com"]
        );
        // 登录前没有 token 可附加
        assert_eq!(request.header(HEADER_AUTHORIZATION), None);
    }

    // --- 场景 B：登录失败 ---

    #[tokio::test]
    async fn rejected_login_surfaces_the_server_detail_untouched() {
        let store = MemoryTokenStore::new();
        let api = client(store.clone());
        api.transport.mock_response(
            "https://api.test/users/login",
            401,
            json!({"detail": "Invalid credentials"}),
        );

        let err = api.login("a@b.com", "wrong").await.unwrap_err();
        assert_eq!(err.status(), Some(401));
        assert_eq!(err.message(), "Invalid credentials");
        // 会话保持匿名，存储不变
        assert_eq!(store.get(), None);
    }

    // --- 场景 C：任意请求 401 触发全局强制下线 ---

    #[tokio::test]
    async fn a_stale_session_is_torn_down_by_any_401() {
        let store = MemoryTokenStore::with_token("stale");
        let expirations = Arc::new(AtomicU32::new(0));
        let counter = expirations.clone();
        let api = client(store.clone()).with_session_expired(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });
        api.transport.mock_response(
            "https://api.test/tasks/",
            401,
            json!({"detail": "Could not validate credentials"}),
        );

        let err = api.get_tasks().await.unwrap_err();
        assert_eq!(err.status(), Some(401));
        assert_eq!(store.get(), None);
        assert_eq!(expirations.load(Ordering::SeqCst), 1);

        // 强制下线后守卫把进行中的 #/account 导航改判为登录页
        let mut session = SessionState::default();
        session.resolve(Some("stale".to_string()));
        session.reset();
        assert_eq!(
            resolve("#/account", &session),
            Resolution::Redirect(AppRoute::Login)
        );
    }

    // --- Bearer 附加 ---

    #[tokio::test]
    async fn requests_carry_the_stored_bearer_token() {
        let api = client(MemoryTokenStore::with_token("tok1"));
        api.transport
            .mock_response("https://api.test/courses/", 200, json!([]));

        let courses = api.get_courses().await.unwrap();
        assert!(courses.is_empty());

        let requests = api.transport.requests.borrow();
        assert_eq!(
            requests[0].header(HEADER_AUTHORIZATION),
            Some("Bearer tok1")
        );
    }

    #[tokio::test]
    async fn anonymous_requests_have_no_authorization_header() {
        let api = client(MemoryTokenStore::new());
        api.transport
            .mock_response("https://api.test/courses/", 200, json!([]));

        api.get_courses().await.unwrap();
        let requests = api.transport.requests.borrow();
        assert_eq!(requests[0].header(HEADER_AUTHORIZATION), None);
    }

    // --- 注册 ---

    #[tokio::test]
    async fn register_sends_json_and_does_not_touch_the_store() {
        let store = MemoryTokenStore::new();
        let api = client(store.clone());
        api.transport.mock_response(
            "https://api.test/users/register",
            201,
            json!({"username": "sam", "email": "a@b.com"}),
        );

        let profile = api.register("sam", "a@b.com", "longenough").await.unwrap();
        assert_eq!(profile.username, "sam");
        assert_eq!(store.get(), None);

        let requests = api.transport.requests.borrow();
        let request = &requests[0];
        assert_eq!(request.header("Content-Type"), Some("application/json"));
        let body: serde_json::Value =
            serde_json::from_str(request.body.as_deref().unwrap()).unwrap();
        assert_eq!(
            body,
            json!({"username": "sam", "email": "a@b.com", "password": "longenough"})
        );
    }

    // --- 错误透传 ---

    #[tokio::test]
    async fn non_401_failures_pass_through_without_teardown() {
        let store = MemoryTokenStore::with_token("tok1");
        let expirations = Arc::new(AtomicU32::new(0));
        let counter = expirations.clone();
        let api = client(store.clone()).with_session_expired(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });
        api.transport.mock_response(
            "https://api.test/users/register",
            400,
            json!({"detail": "A user with this email already exists."}),
        );

        let err = api.register("sam", "a@b.com", "pw12345678").await.unwrap_err();
        assert_eq!(err.status(), Some(400));
        assert_eq!(err.message(), "A user with this email already exists.");
        // 非 401 不触发下线
        assert_eq!(expirations.load(Ordering::SeqCst), 0);
        assert_eq!(store.get(), Some("tok1".to_string()));
    }

    #[tokio::test]
    async fn missing_detail_falls_back_to_a_generic_message() {
        let api = client(MemoryTokenStore::new());
        api.transport
            .mock_response("https://api.test/tasks/", 500, json!("boom"));

        let err = api.get_tasks().await.unwrap_err();
        assert_eq!(err.message(), GENERIC_FAILURE);
    }

    #[tokio::test]
    async fn transport_failures_become_network_errors() {
        let api = ApiClient::new(BASE, FailingHttpClient, MemoryTokenStore::new());
        let err = api.get_tasks().await.unwrap_err();
        assert!(matches!(err, ApiError::Network(_)));
        assert_eq!(err.message(), "Network error. Please try again.");
    }

    // --- CRUD 管道 ---

    #[tokio::test]
    async fn delete_hits_the_id_path_and_accepts_an_empty_body() {
        let api = client(MemoryTokenStore::with_token("tok1"));
        api.transport
            .mock_empty_response("https://api.test/tasks/t42", 204);

        api.delete_task("t42").await.unwrap();

        let requests = api.transport.requests.borrow();
        let request = &requests[0];
        assert_eq!(request.method, HttpMethod::Delete);
        assert_eq!(request.url, "https://api.test/tasks/t42");
        assert_eq!(request.body, None);
    }

    #[tokio::test]
    async fn update_serializes_the_task_without_its_id() {
        let api = client(MemoryTokenStore::with_token("tok1"));
        api.transport.mock_response(
            "https://api.test/tasks/t1",
            200,
            json!({
                "id": "t1", "title": "Essay", "courseId": "c1",
                "priority": "High", "status": "active"
            }),
        );

        let task = Task {
            id: "t1".to_string(),
            title: "Essay".to_string(),
            description: None,
            course_id: "c1".to_string(),
            due_date: None,
            priority: coursework_shared::Priority::High,
            status: coursework_shared::TaskStatus::Active,
        };
        let updated = api
            .update_task(UpdateTaskRequest::from_task(&task))
            .await
            .unwrap();
        assert_eq!(updated.priority, coursework_shared::Priority::High);

        let requests = api.transport.requests.borrow();
        let body: serde_json::Value =
            serde_json::from_str(requests[0].body.as_deref().unwrap()).unwrap();
        assert!(body.get("id").is_none());
        assert_eq!(body["courseId"], "c1");
    }

    #[tokio::test]
    async fn base_url_trailing_slash_is_trimmed() {
        let api = ApiClient::new(
            "https://api.test/",
            MockHttpClient::new(),
            MemoryTokenStore::new(),
        );
        api.transport
            .mock_response("https://api.test/courses/", 200, json!([]));
        api.get_courses().await.unwrap();
        assert_eq!(
            api.transport.requests.borrow()[0].url,
            "https://api.test/courses/"
        );
    }
}
