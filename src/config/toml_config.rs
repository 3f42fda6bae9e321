use crate::core::ConfigProvider;
use crate::utils::error::{RecordsError, Result};
use crate::utils::validation::{validate_path, validate_required_field, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

static ENV_VAR_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$\{([^}]+)\}").expect("env var pattern is a valid regex"));

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TomlConfig {
    pub storage: StorageConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    pub data_directory: PathBuf,
    pub backup_directory: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default)]
    pub verbose: bool,
    #[serde(default)]
    pub json: bool,
}

impl TomlConfig {
    /// Config rooted at `data_directory`, with backups in its `backups` subdirectory.
    pub fn with_data_directory(data_directory: impl Into<PathBuf>) -> Self {
        let mut config = Self {
            storage: StorageConfig {
                data_directory: data_directory.into(),
                backup_directory: None,
            },
            logging: LoggingConfig::default(),
        };
        config.apply_defaults();
        config
    }

    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content);

        let mut config: Self =
            toml::from_str(&processed_content).map_err(|e| RecordsError::ConfigError {
                message: format!("TOML parsing error: {}", e),
            })?;
        config.apply_defaults();
        Ok(config)
    }

    /// 替換環境變數 (例如 ${DATA_DIR})，未定義的變數保持原樣
    fn substitute_env_vars(content: &str) -> String {
        ENV_VAR_PATTERN
            .replace_all(content, |caps: &regex::Captures| {
                let var_name = &caps[1];
                std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
            })
            .into_owned()
    }

    pub fn set_data_directory(&mut self, data_directory: impl Into<PathBuf>) {
        let had_default_backups = self.storage.backup_directory.as_deref()
            == Some(self.storage.data_directory.join("backups").as_path());
        self.storage.data_directory = data_directory.into();
        if had_default_backups {
            self.storage.backup_directory = None;
            self.apply_defaults();
        }
    }

    pub fn set_backup_directory(&mut self, backup_directory: impl Into<PathBuf>) {
        self.storage.backup_directory = Some(backup_directory.into());
    }

    fn apply_defaults(&mut self) {
        if self.storage.backup_directory.is_none() {
            self.storage.backup_directory = Some(self.storage.data_directory.join("backups"));
        }
    }
}

impl ConfigProvider for TomlConfig {
    fn data_directory(&self) -> &Path {
        &self.storage.data_directory
    }

    fn backup_directory(&self) -> &Path {
        self.storage
            .backup_directory
            .as_deref()
            .unwrap_or(&self.storage.data_directory)
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        validate_path(
            "storage.data_directory",
            &self.storage.data_directory.to_string_lossy(),
        )?;
        let backup_directory =
            validate_required_field("storage.backup_directory", &self.storage.backup_directory)?;
        validate_path(
            "storage.backup_directory",
            &backup_directory.to_string_lossy(),
        )?;
        Ok(())
    }
}
