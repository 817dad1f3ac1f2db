// ==========================================
// BOM 对账工具 - 配置加载器
// ==========================================
// 职责: 读取 JSON 配置文件并校验
// 默认位置: <config_dir>/bom-reconcile/profile.json（不存在则取内置默认值）
// ==========================================

use crate::config::profile::{ReconcileProfile, COLUMN_PLACEHOLDER};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

/// 配置错误
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("配置文件读取失败: {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("配置文件解析失败: {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("配置项无效: {field} {reason}")]
    Invalid { field: String, reason: String },
}

pub type ConfigResult<T> = Result<T, ConfigError>;

const APP_DIR: &str = "bom-reconcile";
const PROFILE_FILE: &str = "profile.json";

pub struct ProfileLoader;

impl ProfileLoader {
    /// 默认配置文件路径
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(APP_DIR).join(PROFILE_FILE))
    }

    /// 读取默认位置的配置；文件不存在时返回内置默认值
    pub fn load_default() -> ConfigResult<ReconcileProfile> {
        match Self::default_path() {
            Some(path) if path.exists() => Self::load_from_path(&path),
            _ => {
                debug!("未找到配置文件，使用内置默认配置");
                Ok(ReconcileProfile::default())
            }
        }
    }

    /// 读取并校验指定配置文件
    pub fn load_from_path(path: &Path) -> ConfigResult<ReconcileProfile> {
        let shown = path.display().to_string();
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: shown.clone(),
            source,
        })?;
        let profile = Self::parse(&raw).map_err(|err| match err {
            ConfigError::Parse { source, .. } => ConfigError::Parse {
                path: shown.clone(),
                source,
            },
            other => other,
        })?;
        info!(path = %shown, "配置加载完成");
        Ok(profile)
    }

    /// 解析 JSON 文本并校验
    pub fn parse(raw: &str) -> ConfigResult<ReconcileProfile> {
        let profile: ReconcileProfile =
            serde_json::from_str(raw).map_err(|source| ConfigError::Parse {
                path: "<inline>".to_string(),
                source,
            })?;
        Self::validate(&profile)?;
        Ok(profile)
    }

    /// 校验配置项
    pub fn validate(profile: &ReconcileProfile) -> ConfigResult<()> {
        require_non_empty("key_column", &profile.key_column)?;
        require_non_empty("anchors.new_generation", &profile.anchors.new_generation)?;
        require_non_empty("anchors.old_generation", &profile.anchors.old_generation)?;
        require_non_empty("naming.price_marker", &profile.naming.price_marker)?;
        require_non_empty("naming.historical_marker", &profile.naming.historical_marker)?;
        require_non_empty("naming.price_diff_single", &profile.naming.price_diff_single)?;

        if profile.naming.strip_chars == 0 {
            return Err(invalid("naming.strip_chars", "必须大于 0"));
        }
        for (field, template) in profile.naming.templates() {
            if !template.contains(COLUMN_PLACEHOLDER) {
                return Err(invalid(
                    &format!("naming.{}", field),
                    &format!("缺少占位符 {}", COLUMN_PLACEHOLDER),
                ));
            }
        }
        Ok(())
    }
}

fn require_non_empty(field: &str, value: &str) -> ConfigResult<()> {
    if value.trim().is_empty() {
        return Err(invalid(field, "不能为空"));
    }
    Ok(())
}

fn invalid(field: &str, reason: &str) -> ConfigError {
    ConfigError::Invalid {
        field: field.to_string(),
        reason: reason.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_load_from_path() {
        let mut file = NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{ "anchors": {{ "old_generation": "料号" }}, "fill_policy": "all" }}"#
        )
        .unwrap();

        let profile = ProfileLoader::load_from_path(file.path()).unwrap();
        assert_eq!(profile.anchors.old_generation, "料号");
        assert_eq!(profile.anchors.new_generation, "Component");
        assert_eq!(profile.fill_policy, crate::domain::types::FillPolicy::All);
    }

    #[test]
    fn test_missing_file_is_read_error() {
        let result = ProfileLoader::load_from_path(Path::new("/nonexistent/profile.json"));
        assert!(matches!(result, Err(ConfigError::Read { .. })));
    }

    #[test]
    fn test_malformed_json_reports_path() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{{ not json").unwrap();
        let err = ProfileLoader::load_from_path(file.path()).unwrap_err();
        match err {
            ConfigError::Parse { path, .. } => assert_eq!(path, file.path().display().to_string()),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_validation_rules() {
        assert!(matches!(
            ProfileLoader::parse(r#"{ "key_column": " " }"#),
            Err(ConfigError::Invalid { ref field, .. }) if field == "key_column"
        ));
        assert!(matches!(
            ProfileLoader::parse(r#"{ "naming": { "strip_chars": 0 } }"#),
            Err(ConfigError::Invalid { ref field, .. }) if field == "naming.strip_chars"
        ));
        assert!(matches!(
            ProfileLoader::parse(r#"{ "naming": { "diff_template": "差值" } }"#),
            Err(ConfigError::Invalid { ref field, .. }) if field == "naming.diff_template"
        ));
        assert!(ProfileLoader::parse("{}").is_ok());
    }
}
