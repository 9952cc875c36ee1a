use std::path::PathBuf;

/// Resolved application directories.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppDirs {
    pub app_data_root: PathBuf,
}

impl AppDirs {
    pub fn logs_dir(&self) -> PathBuf {
        self.app_data_root.join("logs")
    }

    pub fn config_file(&self) -> PathBuf {
        self.app_data_root.join("shutterfolio.toml")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derived_paths_live_under_data_root() {
        let dirs = AppDirs {
            app_data_root: PathBuf::from("/tmp/shutterfolio"),
        };
        assert_eq!(dirs.logs_dir(), PathBuf::from("/tmp/shutterfolio/logs"));
        assert_eq!(
            dirs.config_file(),
            PathBuf::from("/tmp/shutterfolio/shutterfolio.toml")
        );
    }
}
