//! # Configuration Loader / 配置加载器
//!
//! Reads the TOML file and maps it onto [`AppConfig`]. Pure data loading:
//! missing keys take their defaults, values are not validated here.

use std::path::Path;

use anyhow::Context;
use tracing::info;
use wf_core::config::AppConfig;

/// Load configuration from a TOML file
/// 从 TOML 文件加载配置
///
/// # Errors / 错误
///
/// - File cannot be read (I/O error)
/// - Content is not valid TOML or does not match the config shape
pub fn load_config(config_path: &Path) -> anyhow::Result<AppConfig> {
    let content = std::fs::read_to_string(config_path)
        .with_context(|| format!("Failed to read config file: {}", config_path.display()))?;
    AppConfig::from_toml(&content)
        .with_context(|| format!("Failed to parse config file: {}", config_path.display()))
}

/// Loads `config_path` when given, otherwise the built-in defaults.
pub fn load_config_or_default(config_path: Option<&Path>) -> anyhow::Result<AppConfig> {
    match config_path {
        Some(path) => load_config(path),
        None => {
            info!("no config file given, using defaults");
            Ok(AppConfig::default())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::path::PathBuf;
    use tempfile::NamedTempFile;

    fn write_config(content: &str) -> NamedTempFile {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(content.as_bytes()).unwrap();
        temp_file
    }

    #[test]
    fn test_load_config_reads_all_sections() {
        let file = write_config(
            r#"
            [transfer]
            setup_timeout_secs = 15
            transfer_timeout_secs = 120

            [watch_face]
            package_name = "com.example.face"

            [feature]
            device_supported = false
            force_enable_watch_faces = true

            [storage]
            data_dir = "/tmp/androidify"
            "#,
        );

        let config = load_config(file.path()).unwrap();

        assert_eq!(config.transfer.setup_timeout_secs, 15);
        assert_eq!(config.transfer.transfer_timeout_secs, 120);
        assert_eq!(config.watch_face.package_name, "com.example.face");
        assert!(!config.feature.device_supported);
        assert!(config.feature.force_enable_watch_faces);
        assert_eq!(
            config.storage.data_dir,
            Some(PathBuf::from("/tmp/androidify"))
        );
        assert_eq!(config.storage.log_dir, None);
    }

    /// 缺失的值使用默认值
    #[test]
    fn test_load_config_empty_file_yields_defaults() {
        let file = write_config("");
        assert_eq!(load_config(file.path()).unwrap(), AppConfig::default());
    }

    #[test]
    fn test_load_config_rejects_wrong_types() {
        let file = write_config(
            r#"
            [transfer]
            setup_timeout_secs = "soon"
            "#,
        );

        let err = load_config(file.path()).unwrap_err();
        assert!(err.to_string().contains("Failed to parse config file"));
    }

    #[test]
    fn test_load_config_returns_io_error_on_file_not_found() {
        let result = load_config(Path::new("/this/path/does/not/exist/config.toml"));

        let err = result.unwrap_err();
        assert!(
            err.to_string().contains("Failed to read config file"),
            "Expected IO error message, got: {err}"
        );
    }

    #[test]
    fn test_missing_path_uses_defaults() {
        assert_eq!(load_config_or_default(None).unwrap(), AppConfig::default());
    }
}
