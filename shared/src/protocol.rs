use crate::{Course, Priority, Task, TaskStatus, TokenResponse, UserProfile};
use serde::de::{Deserializer, IgnoredAny};
use serde::{Deserialize, Serialize, de::DeserializeOwned};

/// HTTP Methods for API Requests
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
        }
    }
}

/// 请求体编码方式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyEncoding {
    /// 无请求体 (GET / DELETE)
    None,
    /// JSON 编码
    Json,
    /// application/x-www-form-urlencoded（仅登录使用）
    Form,
}

/// A trait that defines the request-response relationship and metadata for an API endpoint.
pub trait ApiRequest: Serialize {
    /// The response type returned by this request.
    type Response: DeserializeOwned;
    /// The URL path (or suffix).
    const PATH: &'static str;
    /// The HTTP method.
    const METHOD: HttpMethod;
    /// How the body is encoded on the wire.
    const ENCODING: BodyEncoding = BodyEncoding::Json;

    /// 实际请求路径；带 `{id}` 的端点覆写此方法
    fn path(&self) -> String {
        Self::PATH.to_string()
    }
}

/// 忽略主体内容的成功响应（删除返回 204，修改账号返回确认消息等）
#[derive(Debug, Clone, Copy, Default)]
pub struct Done;

impl<'de> Deserialize<'de> for Done {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        IgnoredAny::deserialize(deserializer)?;
        Ok(Done)
    }
}

// =========================================================
// Users
// =========================================================

/// Login. The identifier travels in the `username` field (the backend's
/// OAuth2 form expects it there even though users type an email).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

impl ApiRequest for LoginRequest {
    type Response = TokenResponse;
    const PATH: &'static str = "/users/login";
    const METHOD: HttpMethod = HttpMethod::Post;
    const ENCODING: BodyEncoding = BodyEncoding::Form;
}

/// Register a new account. Does not log the user in.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

impl ApiRequest for RegisterRequest {
    type Response = UserProfile;
    const PATH: &'static str = "/users/register";
    const METHOD: HttpMethod = HttpMethod::Post;
}

/// Change the account email (requires the current password).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChangeEmailRequest {
    pub new_email: String,
    pub password: String,
}

impl ApiRequest for ChangeEmailRequest {
    type Response = Done;
    const PATH: &'static str = "/users/me/email";
    const METHOD: HttpMethod = HttpMethod::Put;
}

/// Change the account password.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChangePasswordRequest {
    pub current_password: String,
    pub new_password: String,
}

impl ApiRequest for ChangePasswordRequest {
    type Response = Done;
    const PATH: &'static str = "/users/me/password";
    const METHOD: HttpMethod = HttpMethod::Put;
}

// =========================================================
// Courses
// =========================================================

/// List all courses of the authenticated user
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ListCoursesRequest;

impl ApiRequest for ListCoursesRequest {
    type Response = Vec<Course>;
    const PATH: &'static str = "/courses/";
    const METHOD: HttpMethod = HttpMethod::Get;
    const ENCODING: BodyEncoding = BodyEncoding::None;
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCourseRequest {
    pub course_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub course_code: Option<String>,
    pub color_tag: String,
}

impl ApiRequest for CreateCourseRequest {
    type Response = Course;
    const PATH: &'static str = "/courses/";
    const METHOD: HttpMethod = HttpMethod::Post;
}

/// Full update of one course; the id rides in the path, not the body.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCourseRequest {
    #[serde(skip)]
    pub id: String,
    pub course_name: String,
    pub course_code: Option<String>,
    pub color_tag: String,
}

impl ApiRequest for UpdateCourseRequest {
    type Response = Course;
    const PATH: &'static str = "/courses";
    const METHOD: HttpMethod = HttpMethod::Put;

    fn path(&self) -> String {
        format!("{}/{}", Self::PATH, self.id)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteCourseRequest {
    #[serde(skip)]
    pub id: String,
}

impl ApiRequest for DeleteCourseRequest {
    type Response = Done;
    const PATH: &'static str = "/courses";
    const METHOD: HttpMethod = HttpMethod::Delete;
    const ENCODING: BodyEncoding = BodyEncoding::None;

    fn path(&self) -> String {
        format!("{}/{}", Self::PATH, self.id)
    }
}

// =========================================================
// Tasks
// =========================================================

/// List all tasks of the authenticated user
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ListTasksRequest;

impl ApiRequest for ListTasksRequest {
    type Response = Vec<Task>;
    const PATH: &'static str = "/tasks/";
    const METHOD: HttpMethod = HttpMethod::Get;
    const ENCODING: BodyEncoding = BodyEncoding::None;
}

/// Minimal creation payload; the backend defaults priority/status.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTaskRequest {
    pub title: String,
    pub course_id: String,
}

impl ApiRequest for CreateTaskRequest {
    type Response = Task;
    const PATH: &'static str = "/tasks/";
    const METHOD: HttpMethod = HttpMethod::Post;
}

/// Full update of one task. `due_date` serializes as null when cleared,
/// which is how the backend is told to drop a due date.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTaskRequest {
    #[serde(skip)]
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    pub due_date: Option<String>,
    pub priority: Priority,
    pub status: TaskStatus,
    pub course_id: String,
}

impl UpdateTaskRequest {
    /// 由现有任务构造一个不改动任何字段的更新请求
    pub fn from_task(task: &Task) -> Self {
        Self {
            id: task.id.clone(),
            title: task.title.clone(),
            description: task.description.clone(),
            due_date: task.due_date.clone(),
            priority: task.priority,
            status: task.status,
            course_id: task.course_id.clone(),
        }
    }
}

impl ApiRequest for UpdateTaskRequest {
    type Response = Task;
    const PATH: &'static str = "/tasks";
    const METHOD: HttpMethod = HttpMethod::Put;

    fn path(&self) -> String {
        format!("{}/{}", Self::PATH, self.id)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteTaskRequest {
    #[serde(skip)]
    pub id: String,
}

impl ApiRequest for DeleteTaskRequest {
    type Response = Done;
    const PATH: &'static str = "/tasks";
    const METHOD: HttpMethod = HttpMethod::Delete;
    const ENCODING: BodyEncoding = BodyEncoding::None;

    fn path(&self) -> String {
        format!("{}/{}", Self::PATH, self.id)
    }
}

// =========================================================
// 单元测试 (Unit Tests)
// =========================================================
