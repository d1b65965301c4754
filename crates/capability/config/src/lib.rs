//! 会话配置加载（TOML 文件 + 环境变量）。

use domain::ServiceKind;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// 配置文件路径环境变量。
pub const CONFIG_FILE_ENV: &str = "RAX_CONFIG_FILE";
/// 默认区域环境变量（覆盖配置文件）。
pub const REGION_ENV: &str = "RAX_REGION";
/// 身份端点环境变量（覆盖配置文件）。
pub const IDENTITY_ENDPOINT_ENV: &str = "RAX_IDENTITY_ENDPOINT";
/// 用户目录下的默认配置文件名。
pub const DEFAULT_CONFIG_FILE: &str = ".rax.toml";

/// 配置加载错误。
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid configuration file {path}: {reason}")]
    InvalidConfigurationFile { path: String, reason: String },
}

/// 服务启停开关。
///
/// 未配置的服务使用编译期默认值（见 [`ServiceKind::enabled_by_default`]）。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceToggles {
    flags: BTreeMap<ServiceKind, bool>,
}

impl Default for ServiceToggles {
    fn default() -> Self {
        Self {
            flags: ServiceKind::ALL
                .into_iter()
                .map(|kind| (kind, kind.enabled_by_default()))
                .collect(),
        }
    }
}

impl ServiceToggles {
    /// 全部关闭。
    pub fn none() -> Self {
        Self {
            flags: ServiceKind::ALL.into_iter().map(|kind| (kind, false)).collect(),
        }
    }

    pub fn is_enabled(&self, kind: ServiceKind) -> bool {
        self.flags.get(&kind).copied().unwrap_or(false)
    }

    pub fn set(&mut self, kind: ServiceKind, enabled: bool) {
        self.flags.insert(kind, enabled);
    }

    pub fn with(mut self, kind: ServiceKind, enabled: bool) -> Self {
        self.set(kind, enabled);
        self
    }

    /// 合并覆盖项：逐键后写者胜，未出现的键保持原值。
    pub fn merge(&mut self, overrides: &BTreeMap<ServiceKind, bool>) {
        for (kind, enabled) in overrides {
            self.flags.insert(*kind, *enabled);
        }
    }

    /// 按固定顺序遍历所有服务及其开关。
    pub fn iter(&self) -> impl Iterator<Item = (ServiceKind, bool)> + '_ {
        self.flags.iter().map(|(kind, enabled)| (*kind, *enabled))
    }

    /// 按固定顺序列出已启用的服务。
    pub fn enabled(&self) -> Vec<ServiceKind> {
        self.iter()
            .filter_map(|(kind, enabled)| enabled.then_some(kind))
            .collect()
    }
}

/// 会话配置。
///
/// 启动时加载一次，连接器只读。
#[derive(Debug, Clone, Default)]
pub struct SessionConfig {
    pub default_region: Option<String>,
    pub identity_endpoint: Option<String>,
    pub services: ServiceToggles,
}

#[derive(Debug, Default, Deserialize)]
struct ConfigFile {
    #[serde(default)]
    settings: Settings,
    #[serde(default)]
    services: BTreeMap<String, toml::Value>,
}

#[derive(Debug, Default, Deserialize)]
struct Settings {
    region: Option<String>,
    identity_endpoint: Option<String>,
}

impl SessionConfig {
    /// 从默认位置加载配置，再应用环境变量覆盖。
    ///
    /// 路径优先取 `RAX_CONFIG_FILE`，否则为 `~/.rax.toml`；文件不存在时使用默认值。
    pub fn load() -> Result<Self, ConfigError> {
        let config = match default_config_path() {
            Some(path) => Self::from_file(&path)?,
            None => Self::default(),
        };
        Ok(config.with_env_overrides())
    }

    /// 从指定文件加载；文件不存在时返回默认配置。
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            debug!(path = %path.display(), "no configuration file, using defaults");
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path).map_err(|err| invalid(path, err.to_string()))?;
        Self::from_toml_str(&content, path)
    }

    /// 解析 TOML 配置内容，`path` 仅用于错误信息。
    pub fn from_toml_str(content: &str, path: &Path) -> Result<Self, ConfigError> {
        let file: ConfigFile =
            toml::from_str(content).map_err(|err| invalid(path, err.to_string()))?;

        let mut overrides = BTreeMap::new();
        for (key, value) in &file.services {
            // 键名不区分大小写
            let Ok(kind) = key.to_ascii_lowercase().parse::<ServiceKind>() else {
                warn!(service = %key, "ignoring unknown service in configuration");
                continue;
            };
            let enabled = parse_flag(value)
                .ok_or_else(|| invalid(path, format!("services.{key} must be a boolean")))?;
            overrides.insert(kind, enabled);
        }

        let mut services = ServiceToggles::default();
        services.merge(&overrides);
        Ok(Self {
            default_region: file.settings.region.filter(|region| !region.is_empty()),
            identity_endpoint: file
                .settings
                .identity_endpoint
                .filter(|endpoint| !endpoint.is_empty()),
            services,
        })
    }

    /// 应用 `RAX_REGION` / `RAX_IDENTITY_ENDPOINT` 覆盖。
    pub fn with_env_overrides(mut self) -> Self {
        if let Some(region) = read_optional(REGION_ENV) {
            self.default_region = Some(region);
        }
        if let Some(endpoint) = read_optional(IDENTITY_ENDPOINT_ENV) {
            self.identity_endpoint = Some(endpoint);
        }
        self
    }
}

/// 默认配置文件路径。
pub fn default_config_path() -> Option<PathBuf> {
    read_optional(CONFIG_FILE_ENV)
        .map(PathBuf::from)
        .or_else(|| dirs::home_dir().map(|home| home.join(DEFAULT_CONFIG_FILE)))
}

/// 布尔开关：TOML 布尔值，或不区分大小写的 "true"/"1"/"on"/"yes"、
/// "false"/"0"/"off"/"no" 字符串；其他值无效。
fn parse_flag(value: &toml::Value) -> Option<bool> {
    match value {
        toml::Value::Boolean(flag) => Some(*flag),
        toml::Value::String(text) => match text.to_ascii_lowercase().as_str() {
            "1" | "true" | "on" | "yes" => Some(true),
            "0" | "false" | "off" | "no" => Some(false),
            _ => None,
        },
        _ => None,
    }
}

fn read_optional(key: &str) -> Option<String> {
    match env::var(key) {
        Ok(value) if !value.is_empty() => Some(value),
        _ => None,
    }
}

fn invalid(path: &Path, reason: String) -> ConfigError {
    ConfigError::InvalidConfigurationFile {
        path: path.display().to_string(),
        reason,
    }
}
