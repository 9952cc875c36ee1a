//! # Configuration Loader / 配置加载器
//!
//! - ✅ Read the TOML configuration file / 读取 TOML 配置文件
//! - ✅ Map it onto [`AppConfig`] over the supplied defaults / 映射为 AppConfig
//! - ❌ No validation / 禁止验证逻辑
//!
//! Whatever the file says is accepted as fact.

use std::path::{Path, PathBuf};

use sf_core::config::AppConfig;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config as TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("failed to map config: {0}")]
    Map(#[source] anyhow::Error),
}

/// Load configuration from a TOML file
/// 从 TOML 文件加载配置
///
/// Fields missing from the file take the value from `defaults`.
/// 文件中缺失的字段取 `defaults` 中的值。
pub fn load_config(config_path: &Path, defaults: AppConfig) -> Result<AppConfig, ConfigError> {
    let content = std::fs::read_to_string(config_path).map_err(|source| ConfigError::Read {
        path: config_path.to_path_buf(),
        source,
    })?;
    let toml_value: toml::Value = toml::from_str(&content)?;
    AppConfig::from_toml(&toml_value, defaults).map_err(ConfigError::Map)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn defaults() -> AppConfig {
        AppConfig::with_system_defaults(PathBuf::from("/tmp/shutterfolio"))
    }

    /// Test that valid TOML is parsed correctly
    /// 测试有效 TOML 被正确解析
    #[test]
    fn test_load_config_reads_valid_toml() {
        let toml_content = r#"
            [storage]
            drafts_path = "/data/drafts.json"

            [save]
            success_reset_ms = 500
        "#;
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(toml_content.as_bytes()).unwrap();

        let config = load_config(temp_file.path(), defaults()).unwrap();

        assert_eq!(config.drafts_path, PathBuf::from("/data/drafts.json"));
        assert_eq!(config.success_reset_ms, 500);
        // Untouched fields keep their defaults
        assert_eq!(config.session_path, defaults().session_path);
    }

    /// Test that a missing file is reported as a read error
    /// 测试缺失文件返回读取错误
    #[test]
    fn test_load_config_reports_missing_file() {
        let result = load_config(Path::new("/nonexistent/shutterfolio.toml"), defaults());

        assert!(matches!(result, Err(ConfigError::Read { .. })));
    }

    /// Test that invalid TOML returns an error
    /// 测试无效 TOML 返回错误
    #[test]
    fn test_load_config_rejects_invalid_toml() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(b"[storage\ndrafts_path = ").unwrap();

        let result = load_config(temp_file.path(), defaults());

        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }
}
