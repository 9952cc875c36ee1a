//! # Pure Data Module / 纯数据模块 - Data Transfer Objects Only
//!
//! ## Responsibilities / 职责
//!
//! - ✅ Define configuration data structures / 定义配置数据结构
//! - ✅ Provide TOML → DTO mapping / 提供 TOML → DTO 的映射
//!
//! ## Prohibited / 禁止事项
//!
//! ❌ **No business logic or policies / 禁止任何业务逻辑或策略**
//! ❌ **No validation logic / 禁止验证逻辑**
//!
//! Missing values are filled from [`AppConfig::with_system_defaults`], never
//! validated.

use std::path::PathBuf;

pub const DEFAULT_SUCCESS_RESET_MS: u64 = 3_000;
pub const DEFAULT_PHOTO_CACHE_ENTRIES: usize = 64;
pub const DEFAULT_SITE_BASE_URL: &str = "http://localhost:3000";

/// Application configuration DTO (pure data, no logic)
/// 应用配置 DTO（纯数据，无逻辑）
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    /// File backing the long-lived draft storage
    pub drafts_path: PathBuf,

    /// File backing session-scoped preview chrome state
    pub session_path: PathBuf,

    /// JSON fixture with baseline content served by the local repository
    pub content_path: PathBuf,

    /// Delay before a successful save status falls back to idle
    pub success_reset_ms: u64,

    /// Maximum number of photo lookups kept in the fetch cache
    pub photo_cache_entries: usize,

    /// Public site origin used to print preview links
    pub site_base_url: String,
}

impl AppConfig {
    /// Create AppConfig from TOML value, falling back to `defaults` per field.
    /// 从 TOML 值创建 AppConfig，缺失字段使用 `defaults` 中的值。
    pub fn from_toml(toml_value: &toml::Value, defaults: AppConfig) -> anyhow::Result<Self> {
        let section = |name: &str, key: &str| toml_value.get(name).and_then(|s| s.get(key));
        let path = |name: &str, key: &str, fallback: PathBuf| {
            section(name, key)
                .and_then(|v| v.as_str())
                .map(PathBuf::from)
                .unwrap_or(fallback)
        };

        Ok(Self {
            drafts_path: path("storage", "drafts_path", defaults.drafts_path),
            session_path: path("storage", "session_path", defaults.session_path),
            content_path: path("storage", "content_path", defaults.content_path),
            success_reset_ms: section("save", "success_reset_ms")
                .and_then(|v| v.as_integer())
                .map(|v| v.max(0) as u64)
                .unwrap_or(defaults.success_reset_ms),
            photo_cache_entries: section("photos", "cache_entries")
                .and_then(|v| v.as_integer())
                .map(|v| v.max(0) as usize)
                .unwrap_or(defaults.photo_cache_entries),
            site_base_url: section("site", "base_url")
                .and_then(|v| v.as_str())
                .map(str::to_string)
                .unwrap_or(defaults.site_base_url),
        })
    }

    /// Create AppConfig with system-default paths for production use
    /// 生产环境使用：创建具有系统默认路径的 AppConfig
    ///
    /// # Arguments / 参数
    ///
    /// * `data_dir` - Base directory for app data (e.g., `~/.local/share/shutterfolio`)
    pub fn with_system_defaults(data_dir: PathBuf) -> Self {
        Self {
            drafts_path: data_dir.join("drafts.json"),
            session_path: data_dir.join("session.json"),
            content_path: data_dir.join("content.json"),
            success_reset_ms: DEFAULT_SUCCESS_RESET_MS,
            photo_cache_entries: DEFAULT_PHOTO_CACHE_ENTRIES,
            site_base_url: DEFAULT_SITE_BASE_URL.to_string(),
        }
    }
}
