use super::errors::AppDirsError;
use crate::app_dirs::AppDirs;

pub trait AppDirsPort: Send + Sync {
    fn get_app_dirs(&self) -> Result<AppDirs, AppDirsError>;
}
