#[cfg(feature = "cli")]
pub mod cli;
pub mod toml_config;

use crate::utils::error::Result;
use crate::utils::validation::{self, Validate};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// 服務設定，啟動時建立一次，之後以 `Arc` 共享給各元件
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    pub server: ServerConfig,
    pub extract: ExtractConfig,
    pub audit: AuditConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// 請求 body 上限（bytes）
    pub max_body_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            max_body_bytes: 1024 * 1024,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractConfig {
    /// gol 索引檔
    pub dataset_path: PathBuf,
    pub gol_path: PathBuf,
    pub osmium_path: PathBuf,
    pub max_area_m2: f64,
    /// 未設定時使用系統暫存目錄
    pub workspace_root: Option<PathBuf>,
    pub workspace_prefix: String,
}

impl Default for ExtractConfig {
    fn default() -> Self {
        Self {
            dataset_path: PathBuf::from("data/england.gol"),
            gol_path: PathBuf::from("gol"),
            osmium_path: PathBuf::from("osmium"),
            max_area_m2: 5.0e7,
            workspace_root: None,
            workspace_prefix: "osm-extractor-".to_string(),
        }
    }
}

impl ExtractConfig {
    pub fn workspace_root(&self) -> PathBuf {
        self.workspace_root
            .clone()
            .unwrap_or_else(std::env::temp_dir)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AuditConfig {
    pub log_path: PathBuf,
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            log_path: PathBuf::from("requests.log"),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Compact,
    Json,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub format: LogFormat,
    pub filter: Option<String>,
}

impl Validate for ServiceConfig {
    fn validate(&self) -> Result<()> {
        validation::validate_non_empty_string("server.host", &self.server.host)?;
        validation::validate_range("server.port", self.server.port, 1, u16::MAX)?;
        validation::validate_positive_number("server.max_body_bytes", self.server.max_body_bytes, 1)?;

        validation::validate_path(
            "extract.dataset_path",
            &self.extract.dataset_path.to_string_lossy(),
        )?;
        validation::validate_path("extract.gol_path", &self.extract.gol_path.to_string_lossy())?;
        validation::validate_path(
            "extract.osmium_path",
            &self.extract.osmium_path.to_string_lossy(),
        )?;
        validation::validate_positive_finite("extract.max_area_m2", self.extract.max_area_m2)?;
        if let Some(root) = &self.extract.workspace_root {
            validation::validate_path("extract.workspace_root", &root.to_string_lossy())?;
        }
        validation::validate_file_name_fragment(
            "extract.workspace_prefix",
            &self.extract.workspace_prefix,
        )?;

        validation::validate_path("audit.log_path", &self.audit.log_path.to_string_lossy())?;

        // 資料集不存在只警告，工具會在執行時回報
        if !self.extract.dataset_path.exists() {
            tracing::warn!(
                "⚠️ Dataset index {} does not exist yet",
                self.extract.dataset_path.display()
            );
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = ServiceConfig::default();

        assert!(config.validate().is_ok());
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.server.max_body_bytes, 1_048_576);
        assert_eq!(config.extract.max_area_m2, 50_000_000.0);
        assert_eq!(config.logging.format, LogFormat::Compact);
    }

    #[test]
    fn test_rejects_non_positive_area_limit() {
        let mut config = ServiceConfig::default();
        config.extract.max_area_m2 = 0.0;

        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_prefix_with_separator() {
        let mut config = ServiceConfig::default();
        config.extract.workspace_prefix = "../escape".to_string();

        assert!(config.validate().is_err());
    }

    #[test]
    fn test_workspace_root_falls_back_to_temp_dir() {
        let config = ServiceConfig::default();
        assert_eq!(config.extract.workspace_root(), std::env::temp_dir());
    }
}
