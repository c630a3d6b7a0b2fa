use anyhow::{Context, Result};
use std::path::PathBuf;

const APP_DIR_NAME: &str = "Androidify";

/// Get the application data root directory.
///
/// 获取应用数据根目录。
///
/// # Platform-specific Paths / 平台特定路径
/// - macOS: ~/Library/Application Support/Androidify
/// - Windows: %APPDATA%\Androidify
/// - Linux: $XDG_DATA_HOME/Androidify or ~/.local/share/Androidify
///
/// Directories are not created here; the stores create them on first write.
pub fn app_data_dir() -> Result<PathBuf> {
    let base_dir = dirs::data_dir().context("Failed to get platform-specific data directory")?;
    Ok(base_dir.join(APP_DIR_NAME))
}

/// 获取日志目录
pub fn app_log_dir() -> Result<PathBuf> {
    Ok(app_data_dir()?.join("logs"))
}
