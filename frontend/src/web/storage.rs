//! LocalStorage 封装模块
//!
//! 使用 `web_sys::Storage` 提供简洁的本地存储接口，并在其上定义
//! Bearer Token 的持久化抽象（`TokenStore`）。

/// 持久化的 token 键名；跨页面刷新保持登录态
pub const TOKEN_STORAGE_KEY: &str = "token";

/// 本地存储操作封装
///
/// 提供静态方法访问浏览器 LocalStorage API。
pub struct LocalStorage;

impl LocalStorage {
    fn storage() -> Option<web_sys::Storage> {
        web_sys::window()?.local_storage().ok()?
    }

    /// 获取存储的字符串值；键不存在或出错时返回 None
    pub fn get(key: &str) -> Option<String> {
        Self::storage()?.get_item(key).ok()?
    }

    /// 设置存储值，返回操作是否成功
    pub fn set(key: &str, value: &str) -> bool {
        Self::storage()
            .and_then(|s| s.set_item(key, value).ok())
            .is_some()
    }

    /// 删除键值对，返回操作是否成功
    pub fn delete(key: &str) -> bool {
        Self::storage()
            .and_then(|s| s.remove_item(key).ok())
            .is_some()
    }
}

// =========================================================
// Token 持久化抽象 (Token Store)
// =========================================================

/// Bearer token 的持久化接口
///
/// 纯粹的存取层，不校验 token 形状，也不在客户端做过期判断。
pub trait TokenStore {
    fn get(&self) -> Option<String>;
    fn set(&self, token: &str);
    fn clear(&self);
}

/// 生产实现：落在浏览器 LocalStorage
#[derive(Clone, Default)]
pub struct BrowserTokenStore;

impl TokenStore for BrowserTokenStore {
    fn get(&self) -> Option<String> {
        LocalStorage::get(TOKEN_STORAGE_KEY)
    }

    fn set(&self, token: &str) {
        LocalStorage::set(TOKEN_STORAGE_KEY, token);
    }

    fn clear(&self) {
        LocalStorage::delete(TOKEN_STORAGE_KEY);
    }
}

// =========================================================
// 测试工具 (Test Utilities)
// =========================================================
