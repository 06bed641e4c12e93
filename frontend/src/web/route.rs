//! 路由定义模块 - 领域模型
//!
//! 纯粹的业务逻辑层，不依赖 DOM 或 web_sys。定义应用的所有路由、
//! 各路由的访问规则，以及核心守卫函数 `resolve`。

use crate::auth::SessionState;
use std::fmt::Display;

/// 应用路由枚举（hash 片段一一对应）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AppRoute {
    /// 落地页 (默认路由)
    #[default]
    Landing,
    Login,
    Register,
    /// 控制面板 (需要认证)
    Dashboard,
    /// 账号设置 (需要认证)
    Account,
}

impl AppRoute {
    /// 将 hash 内的 path 解析为路由枚举；未知路径返回 None
    pub fn from_path(path: &str) -> Option<Self> {
        match path {
            "" | "/" => Some(Self::Landing),
            "/login" => Some(Self::Login),
            "/register" => Some(Self::Register),
            "/dashboard" => Some(Self::Dashboard),
            "/account" => Some(Self::Account),
            _ => None,
        }
    }

    /// 从完整的 location.hash 解析（容忍缺省的 `#` 前缀）
    pub fn from_hash(hash: &str) -> Option<Self> {
        Self::from_path(hash.strip_prefix('#').unwrap_or(hash))
    }

    pub fn to_path(&self) -> &'static str {
        match self {
            Self::Landing => "/",
            Self::Login => "/login",
            Self::Register => "/register",
            Self::Dashboard => "/dashboard",
            Self::Account => "/account",
        }
    }

    /// location.hash 形式，如 "#/login"
    pub fn to_hash(&self) -> String {
        format!("#{}", self.to_path())
    }

    /// **核心守卫逻辑：该路由是否需要认证**
    pub fn requires_auth(&self) -> bool {
        matches!(self, Self::Dashboard | Self::Account)
    }

    /// 已认证用户是否应该离开此路由（落地页/登录/注册）
    pub fn public_only(&self) -> bool {
        matches!(self, Self::Landing | Self::Login | Self::Register)
    }
}

impl Display for AppRoute {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_path())
    }
}

// =========================================================
// 守卫解析 (Guard Resolution)
// =========================================================

/// 一次守卫评估的结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    /// 会话尚未恢复完毕，渲染中性的加载视图，不做重定向决策
    Loading,
    /// 渲染该路由对应的页面
    Render(AppRoute),
    /// 改写 location 片段跳转到目标路由
    Redirect(AppRoute),
}

/// 纯守卫函数：`(hash, session) -> Resolution`
///
/// 规则按优先级排列：
/// 1. 会话加载中 -> 挂起
/// 2. 未认证访问受保护页 -> 重定向登录页
/// 3. 已认证访问公开页 -> 重定向面板
/// 4. 已知路由直接渲染；未知路径按会话状态渲染落地页或面板
///
/// 每个重定向目标在当前会话状态下都能通过守卫，因此不会形成
/// 重定向环。
pub fn resolve(hash: &str, session: &SessionState) -> Resolution {
    if session.is_loading {
        return Resolution::Loading;
    }

    let authenticated = session.is_authenticated();
    match AppRoute::from_hash(hash) {
        Some(route) if route.requires_auth() && !authenticated => {
            Resolution::Redirect(AppRoute::Login)
        }
        Some(route) if route.public_only() && authenticated => {
            Resolution::Redirect(AppRoute::Dashboard)
        }
        Some(route) => Resolution::Render(route),
        None if authenticated => Resolution::Render(AppRoute::Dashboard),
        None => Resolution::Render(AppRoute::Landing),
    }
}

// =========================================================
// 单元测试 (Unit Tests)
// =========================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn loading() -> SessionState {
        SessionState::default()
    }

    fn anonymous() -> SessionState {
        let mut session = SessionState::default();
        session.resolve(None);
        session
    }

    fn authenticated() -> SessionState {
        let mut session = SessionState::default();
        session.resolve(Some("tok1".to_string()));
        session
    }

    const ALL_ROUTES: [AppRoute; 5] = [
        AppRoute::Landing,
        AppRoute::Login,
        AppRoute::Register,
        AppRoute::Dashboard,
        AppRoute::Account,
    ];

    #[test]
    fn hash_round_trip() {
        for route in ALL_ROUTES {
            assert_eq!(AppRoute::from_hash(&route.to_hash()), Some(route));
        }
        assert_eq!(AppRoute::from_hash(""), Some(AppRoute::Landing));
        assert_eq!(AppRoute::from_hash("#/"), Some(AppRoute::Landing));
        assert_eq!(AppRoute::from_hash("#/nope"), None);
    }

    #[test]
    fn loading_session_defers_every_decision() {
        for hash in ["#/", "#/login", "#/dashboard", "#/account", "#/garbage"] {
            assert_eq!(resolve(hash, &loading()), Resolution::Loading);
        }
    }

    #[test]
    fn anonymous_users_are_sent_to_login_from_protected_pages() {
        assert_eq!(
            resolve("#/dashboard", &anonymous()),
            Resolution::Redirect(AppRoute::Login)
        );
        assert_eq!(
            resolve("#/account", &anonymous()),
            Resolution::Redirect(AppRoute::Login)
        );
    }

    #[test]
    fn authenticated_users_are_sent_to_dashboard_from_public_pages() {
        for hash in ["#/", "#/login", "#/register"] {
            assert_eq!(
                resolve(hash, &authenticated()),
                Resolution::Redirect(AppRoute::Dashboard)
            );
        }
    }

    #[test]
    fn known_routes_render_when_the_guard_passes() {
        assert_eq!(
            resolve("#/login", &anonymous()),
            Resolution::Render(AppRoute::Login)
        );
        assert_eq!(
            resolve("#/register", &anonymous()),
            Resolution::Render(AppRoute::Register)
        );
        assert_eq!(
            resolve("#/dashboard", &authenticated()),
            Resolution::Render(AppRoute::Dashboard)
        );
        assert_eq!(
            resolve("#/account", &authenticated()),
            Resolution::Render(AppRoute::Account)
        );
    }

    #[test]
    fn unknown_paths_resolve_by_session_state() {
        assert_eq!(
            resolve("#/does-not-exist", &anonymous()),
            Resolution::Render(AppRoute::Landing)
        );
        assert_eq!(
            resolve("#/does-not-exist", &authenticated()),
            Resolution::Render(AppRoute::Dashboard)
        );
    }

    #[test]
    fn redirect_targets_always_pass_the_guard() {
        // 重定向环不可能：任何重定向目标在同一会话状态下必须可渲染
        for session in [anonymous(), authenticated()] {
            for route in ALL_ROUTES {
                if let Resolution::Redirect(target) = resolve(&route.to_hash(), &session) {
                    assert_eq!(
                        resolve(&target.to_hash(), &session),
                        Resolution::Render(target)
                    );
                }
            }
        }
    }
}
