//! 路由服务模块 - 核心引擎
//!
//! 封装 location.hash 的读写，实现高内聚：所有对片段的操作都集中在
//! 此模块。监听 `hashchange` 与会话信号两个变化源，每次变化都重新
//! 执行纯守卫函数 `resolve`，重定向通过改写片段完成（改写又会触发
//! 下一轮评估）。

use leptos::prelude::*;
use wasm_bindgen::prelude::*;

use super::route::{AppRoute, Resolution, resolve};
use crate::auth::SessionState;
use crate::log_info;

/// 获取当前浏览器 hash 片段
fn current_hash() -> String {
    web_sys::window()
        .and_then(|w| w.location().hash().ok())
        .filter(|hash| !hash.is_empty())
        .unwrap_or_else(|| "#/".to_string())
}

/// 改写 location 片段（内部工具函数）
fn set_location_hash(hash: &str) {
    if let Some(window) = web_sys::window() {
        let _ = window.location().set_hash(hash);
    }
}

/// 跳转到指定路由（改写片段；守卫会在下一轮评估中复核）
pub fn rewrite_hash(route: AppRoute) {
    set_location_hash(&route.to_hash());
}

// =========================================================
// 路由服务
// =========================================================

/// 路由器服务
///
/// 通过 Signal 驱动界面更新；会话信号由外部注入，实现与认证系统的
/// 解耦。
#[derive(Clone, Copy)]
pub struct RouterService {
    /// 当前守卫评估结果（只读信号）
    resolution: ReadSignal<Resolution>,
    set_resolution: WriteSignal<Resolution>,
    /// 注入的会话信号
    session: Signal<SessionState>,
}

impl RouterService {
    fn new(session: Signal<SessionState>) -> Self {
        let initial = resolve(&current_hash(), &session.get_untracked());
        let (resolution, set_resolution) = signal(initial);
        Self {
            resolution,
            set_resolution,
            session,
        }
    }

    pub fn resolution(&self) -> ReadSignal<Resolution> {
        self.resolution
    }

    /// 主动导航：改写片段并立即评估一次（hashchange 是异步到达的）
    pub fn navigate(&self, route: AppRoute) {
        set_location_hash(&route.to_hash());
        Self::evaluate(self.set_resolution, &self.session.get_untracked());
    }

    /// **核心方法：评估与守卫**
    ///
    /// 重定向目标在对侧会话状态下必然通过守卫，因此这里直接落地为
    /// Render，不会反复改写片段。
    fn evaluate(set_resolution: WriteSignal<Resolution>, session: &SessionState) {
        match resolve(&current_hash(), session) {
            Resolution::Redirect(target) => {
                log_info!("[Router] redirecting to {}", target);
                set_location_hash(&target.to_hash());
                set_resolution.set(Resolution::Render(target));
            }
            other => set_resolution.set(other),
        }
    }

    /// 初始化浏览器 hash 变化监听
    fn init_hashchange_listener(&self) {
        let set_resolution = self.set_resolution;
        let session = self.session;

        let closure = Closure::<dyn Fn()>::new(move || {
            Self::evaluate(set_resolution, &session.get_untracked());
        });

        if let Some(window) = web_sys::window() {
            let _ = window
                .add_event_listener_with_callback("hashchange", closure.as_ref().unchecked_ref());
        }

        // 泄漏闭包以保持监听器存活
        closure.forget();
    }

    /// 会话变化时重新评估（登录、登出、恢复完成、强制下线）
    fn setup_session_effect(&self) {
        let set_resolution = self.set_resolution;
        let session = self.session;

        Effect::new(move |_| {
            let current = session.get();
            Self::evaluate(set_resolution, &current);
        });
    }
}

/// 提供路由服务到 Context 并初始化
fn provide_router(session: Signal<SessionState>) -> RouterService {
    let router = RouterService::new(session);

    router.init_hashchange_listener();
    router.setup_session_effect();

    provide_context(router);
    router
}

/// 从 Context 获取路由服务
pub fn use_router() -> RouterService {
    use_context::<RouterService>()
        .expect("RouterService not found in context. Ensure Router is provided.")
}

// ============================================================================
// UI 组件
// ============================================================================

/// 路由器根组件，应在 App 根部使用
#[component]
pub fn Router(
    /// 会话信号
    session: Signal<SessionState>,
    /// 子组件
    children: Children,
) -> impl IntoView {
    provide_router(session);

    children()
}

/// 路由出口组件
///
/// 根据当前守卫结果渲染对应的视图。
#[component]
pub fn RouterOutlet(
    /// 匹配函数：接收守卫结果，返回对应视图
    matcher: fn(Resolution) -> AnyView,
) -> impl IntoView {
    let router = use_router();

    move || {
        let current = router.resolution().get();
        matcher(current)
    }
}
