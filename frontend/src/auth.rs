//! 认证模块
//!
//! 管理用户会话状态，与路由系统解耦：路由服务只消费注入的会话信号。
//! 状态机本身（`SessionState`）是纯数据，信号只是它的宿主。

use crate::api::{ApiClient, ApiError};
use crate::web::{HttpClient, TokenStore};
use coursework_shared::UserProfile;
use leptos::prelude::*;

/// 会话状态
///
/// 状态机：`Unresolved -> {Anonymous, Authenticated}`，登录/登出在
/// 两个已解析状态之间迁移。持有 token 即视为已认证（恢复会话时不做
/// 服务端校验，见 DESIGN.md）。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionState {
    /// 当前 Bearer token；None 即匿名
    pub token: Option<String>,
    /// 启动后、首次从 Token Store 恢复前为 true，此后永远为 false
    pub is_loading: bool,
}

impl Default for SessionState {
    fn default() -> Self {
        Self {
            token: None,
            is_loading: true,
        }
    }
}

impl SessionState {
    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    /// `Unresolved -> {Anonymous, Authenticated}`：用存储中读到的 token
    /// 解析初始状态。两个分支都恰好清一次 loading 标志。
    pub fn resolve(&mut self, stored_token: Option<String>) {
        self.token = stored_token;
        self.is_loading = false;
    }

    /// `Anonymous -> Authenticated`（登录成功）
    pub fn authenticate(&mut self, token: String) {
        self.token = Some(token);
        self.is_loading = false;
    }

    /// `Authenticated -> Anonymous`（登出或强制下线）；幂等
    pub fn reset(&mut self) {
        self.token = None;
        self.is_loading = false;
    }
}

// =========================================================
// 认证上下文 (Auth Context)
// =========================================================

/// 认证上下文
///
/// 包含读写信号，通过 Context 在组件间共享。
#[derive(Clone, Copy)]
pub struct AuthContext {
    /// 会话状态（只读）
    pub state: ReadSignal<SessionState>,
    /// 设置会话状态（写入）
    pub set_state: WriteSignal<SessionState>,
}

impl AuthContext {
    pub fn new() -> Self {
        let (state, set_state) = signal(SessionState::default());
        Self { state, set_state }
    }

    /// 获取会话信号（用于路由服务注入）
    pub fn session_signal(&self) -> Signal<SessionState> {
        let state = self.state;
        Signal::derive(move || state.get())
    }
}

impl Default for AuthContext {
    fn default() -> Self {
        Self::new()
    }
}

/// 从 Context 获取认证上下文
pub fn use_auth() -> AuthContext {
    use_context::<AuthContext>().expect("AuthContext should be provided")
}

// =========================================================
// 会话操作 (Session Operations)
// =========================================================

/// 初始化会话：启动时执行一次，从 Token Store 恢复登录态。
///
/// 存储中有 token 即直接信任，不发起网络请求。
pub fn init_auth<S: TokenStore>(ctx: &AuthContext, store: &S) {
    let stored = store.get();
    ctx.set_state.update(|state| state.resolve(stored));
}

/// 登录并更新会话
///
/// 失败时不改动会话状态，错误原样抛给调用方展示。
pub async fn login<C: HttpClient, S: TokenStore>(
    ctx: &AuthContext,
    api: &ApiClient<C, S>,
    email: &str,
    password: &str,
) -> Result<(), ApiError> {
    let token = api.login(email, password).await?;
    ctx.set_state.update(|state| state.authenticate(token));
    Ok(())
}

/// 注册新账号
///
/// 成功后不改动会话状态：用户仍需手动登录。
pub async fn register<C: HttpClient, S: TokenStore>(
    api: &ApiClient<C, S>,
    username: &str,
    email: &str,
    password: &str,
) -> Result<UserProfile, ApiError> {
    api.register(username, email, password).await
}

/// 注销：清 Token Store 并回到匿名态
///
/// 导航由路由服务监听会话变化自动处理。
pub fn logout<S: TokenStore>(ctx: &AuthContext, store: &S) {
    store.clear();
    ctx.set_state.update(|state| state.reset());
}

/// 强制下线：网关拦截到 401 时调用（store 已被网关清空）
pub fn force_logout(ctx: &AuthContext) {
    ctx.set_state.update(|state| state.reset());
}

// =========================================================
// 单元测试 (Unit Tests)
// =========================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_unresolved_and_loading() {
        let session = SessionState::default();
        assert!(session.is_loading);
        assert!(!session.is_authenticated());
    }

    #[test]
    fn restore_with_stored_token_authenticates_without_network() {
        let mut session = SessionState::default();
        session.resolve(Some("tok1".to_string()));
        assert!(!session.is_loading);
        assert!(session.is_authenticated());
        assert_eq!(session.token.as_deref(), Some("tok1"));
    }

    #[test]
    fn restore_without_token_is_anonymous() {
        let mut session = SessionState::default();
        session.resolve(None);
        assert!(!session.is_loading);
        assert!(!session.is_authenticated());
    }

    #[test]
    fn loading_clears_exactly_once_and_stays_cleared() {
        let mut session = SessionState::default();
        session.resolve(None);
        assert!(!session.is_loading);

        // 后续所有迁移都不会回到 loading
        session.authenticate("tok1".to_string());
        assert!(!session.is_loading);
        session.reset();
        assert!(!session.is_loading);
    }

    #[test]
    fn logout_is_idempotent() {
        let mut session = SessionState::default();
        session.resolve(Some("tok1".to_string()));
        session.reset();
        assert!(!session.is_authenticated());
        session.reset();
        assert!(!session.is_authenticated());
        assert!(!session.is_loading);
    }
}
