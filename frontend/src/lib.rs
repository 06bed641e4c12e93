//! CourseWork Lite 前端应用
//!
//! 采用 Context-Driven 的高内聚低耦合架构：
//! - `web::route`: 路由定义与纯守卫函数（领域模型）
//! - `web::router`: 路由服务（核心引擎，hash 驱动）
//! - `auth`: 会话状态管理
//! - `api`: API 网关（token 附加 + 401 全局拦截）
//! - `components`: UI 组件层

mod api;
mod auth;
mod components {
    pub mod account;
    mod course_dialog;
    pub mod dashboard;
    pub mod landing;
    pub mod login;
    pub mod register;
    mod reminders;
    mod sidebar;
    mod task_dialog;
    mod task_list;
}

use leptos::prelude::*;

// =========================================================
// 跨平台日志宏
// =========================================================

#[cfg(target_arch = "wasm32")]
macro_rules! log_info {
    ($($t:tt)*) => (web_sys::console::log_1(&format!($($t)*).into()))
}

#[cfg(not(target_arch = "wasm32"))]
macro_rules! log_info {
    ($($t:tt)*) => (println!($($t)*))
}

#[cfg(target_arch = "wasm32")]
macro_rules! log_error {
    ($($t:tt)*) => (web_sys::console::error_1(&format!($($t)*).into()))
}

#[cfg(not(target_arch = "wasm32"))]
macro_rules! log_error {
    ($($t:tt)*) => (eprintln!($($t)*))
}

pub(crate) use log_error;
pub(crate) use log_info;

// 原生 Web API 封装模块
// 提供对浏览器原生 API 的轻量级封装，核心逻辑通过其中的 trait
// （HttpClient / TokenStore）与浏览器解耦，可在原生测试中 Mock。
pub(crate) mod web {
    mod http;
    pub mod route;
    pub mod router;
    mod storage;

    pub use http::{FetchHttpClient, HttpClient, HttpError, HttpRequest, HttpResponse};
    pub use storage::{BrowserTokenStore, TokenStore};

    #[cfg(test)]
    pub use http::tests as http_mocks;
    #[cfg(test)]
    pub use storage::tests as storage_mocks;
}

use crate::api::CourseworkApi;
use crate::auth::{AuthContext, force_logout, init_auth};
use crate::components::account::AccountPage;
use crate::components::dashboard::DashboardPage;
use crate::components::landing::LandingPage;
use crate::components::login::LoginPage;
use crate::components::register::RegisterPage;
use crate::web::BrowserTokenStore;
use crate::web::route::{AppRoute, Resolution};
use crate::web::router::{Router, RouterOutlet, rewrite_hash};

/// 会话恢复期间与重定向瞬间的中性视图
fn loading_view() -> AnyView {
    view! {
        <div class="flex items-center justify-center min-h-screen bg-base-200">
            <span class="loading loading-spinner loading-lg text-primary"></span>
        </div>
    }
    .into_any()
}

/// 路由匹配函数
///
/// 根据守卫评估结果返回对应的视图组件。
fn route_matcher(resolution: Resolution) -> AnyView {
    match resolution {
        Resolution::Loading | Resolution::Redirect(_) => loading_view(),
        Resolution::Render(route) => match route {
            AppRoute::Landing => view! { <LandingPage /> }.into_any(),
            AppRoute::Login => view! { <LoginPage /> }.into_any(),
            AppRoute::Register => view! { <RegisterPage /> }.into_any(),
            AppRoute::Dashboard => view! { <DashboardPage /> }.into_any(),
            AppRoute::Account => view! { <AccountPage /> }.into_any(),
        },
    }
}

#[component]
pub fn App() -> impl IntoView {
    // 1. 创建认证上下文
    let auth_ctx = AuthContext::new();
    provide_context(auth_ctx);

    // 2. 网关：401 拦截已清空 Token Store，这里重置会话并跳回登录页
    let api = CourseworkApi::from_env().with_session_expired(move || {
        log_info!("[Auth] session expired, forcing logout");
        force_logout(&auth_ctx);
        rewrite_hash(AppRoute::Login);
    });
    provide_context(api);

    // 3. 从 Token Store 恢复会话（此后 loading 永久为 false）
    init_auth(&auth_ctx, &BrowserTokenStore);

    // 4. 路由器组件：注入会话信号实现守卫
    let session = auth_ctx.session_signal();

    view! {
        <Router session=session>
            <RouterOutlet matcher=route_matcher />
        </Router>
    }
}
