//! # Configuration resolution / 配置解析
//!
//! Chooses the config file and the defaults it is layered over. Parsing lives
//! in `sf_infra::config`.

use std::path::{Path, PathBuf};

use anyhow::Context;
use sf_core::config::AppConfig;
use sf_core::ports::AppDirsPort;
use sf_infra::load_config;
use sf_platform::DirsAppDirsAdapter;
use tracing::debug;

/// Resolve the effective configuration.
/// 解析最终生效的配置。
///
/// - An explicit `config_path` must exist.
/// - Otherwise `<data dir>/shutterfolio.toml` is used when present.
/// - Missing fields fall back to defaults rooted at the data dir.
pub fn resolve_config(config_path: Option<&Path>) -> anyhow::Result<AppConfig> {
    let app_dirs = DirsAppDirsAdapter::new()
        .get_app_dirs()
        .context("failed to resolve application directories")?;
    resolve_config_in(app_dirs.app_data_root.clone(), app_dirs.config_file(), config_path)
}

fn resolve_config_in(
    data_dir: PathBuf,
    default_file: PathBuf,
    config_path: Option<&Path>,
) -> anyhow::Result<AppConfig> {
    let defaults = AppConfig::with_system_defaults(data_dir);

    let file = match config_path {
        Some(path) => path.to_path_buf(),
        None if default_file.exists() => default_file,
        None => {
            debug!("no config file; using defaults");
            return Ok(defaults);
        }
    };

    let config = load_config(&file, defaults)
        .with_context(|| format!("failed to load config from {}", file.display()))?;
    debug!(path = %file.display(), "config loaded");
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn missing_default_file_yields_defaults() {
        let dir = TempDir::new().unwrap();

        let config =
            resolve_config_in(dir.path().to_path_buf(), dir.path().join("shutterfolio.toml"), None)
                .unwrap();

        assert_eq!(config, AppConfig::with_system_defaults(dir.path().to_path_buf()));
    }

    #[test]
    fn default_file_is_read_when_present() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("shutterfolio.toml");
        fs::write(&file, "[site]\nbase_url = \"https://studio.example\"\n").unwrap();

        let config = resolve_config_in(dir.path().to_path_buf(), file, None).unwrap();

        assert_eq!(config.site_base_url, "https://studio.example");
        assert_eq!(config.drafts_path, dir.path().join("drafts.json"));
    }

    #[test]
    fn explicit_path_must_exist() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("elsewhere.toml");

        let result = resolve_config_in(
            dir.path().to_path_buf(),
            dir.path().join("shutterfolio.toml"),
            Some(&missing),
        );

        assert!(result.is_err());
    }
}
