use serde::{Deserialize, Serialize};

pub mod date;
pub mod protocol;
pub mod view;

// =========================================================
// 常量定义 (Constants)
// =========================================================

pub const HEADER_AUTHORIZATION: &str = "Authorization";
pub const BEARER_PREFIX: &str = "Bearer ";

/// 课程引用失效时显示的占位名称
pub const UNKNOWN_COURSE_NAME: &str = "Unknown Course";

// =========================================================
// 领域模型 (Domain Models)
// =========================================================

/// 任务优先级
///
/// 序列化形式与后端一致："Low" / "Medium" / "High"。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Priority {
    Low,
    Medium,
    High,
}

impl Priority {
    /// 比较用序数：Low=1, Medium=2, High=3
    pub fn ordinal(&self) -> u8 {
        match self {
            Priority::Low => 1,
            Priority::Medium => 2,
            Priority::High => 3,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Low => "Low",
            Priority::Medium => "Medium",
            Priority::High => "High",
        }
    }

    pub fn from_str_or_default(s: &str) -> Self {
        match s {
            "Low" => Priority::Low,
            "High" => Priority::High,
            _ => Priority::Medium,
        }
    }
}

impl Default for Priority {
    fn default() -> Self {
        Priority::Medium
    }
}

/// 任务状态：active 为进行中，complete 为已归档
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    Active,
    Complete,
}

impl TaskStatus {
    pub fn toggled(&self) -> Self {
        match self {
            TaskStatus::Active => TaskStatus::Complete,
            TaskStatus::Complete => TaskStatus::Active,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Active => "active",
            TaskStatus::Complete => "complete",
        }
    }
}

impl Default for TaskStatus {
    fn default() -> Self {
        TaskStatus::Active
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Course {
    pub id: String,
    pub course_name: String,
    #[serde(default)]
    pub course_code: Option<String>,
    pub color_tag: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub course_id: String,
    /// 原始的 ISO-8601 字符串；解析统一走 `date` 模块
    #[serde(default)]
    pub due_date: Option<String>,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub status: TaskStatus,
}

impl Task {
    /// 生成一个只翻转了归档状态的副本，其余字段不变
    pub fn with_toggled_status(&self) -> Self {
        let mut task = self.clone();
        task.status = task.status.toggled();
        task
    }
}

// =========================================================
// 请求/响应载荷 (Wire Payloads)
// =========================================================

/// 登录成功响应
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
}

/// 注册成功后返回的用户表示
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    pub username: String,
    pub email: String,
}

/// 失败响应主体，`detail` 为服务端给出的可展示消息
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub detail: String,
}
