pub mod catalog;
pub mod service;

pub use catalog::{ALL_REGIONS, EndpointEntry, ServiceCatalog, normalize_service_type};
pub use service::{ServiceKind, UnknownService};

use std::fmt;
use std::path::PathBuf;

/// 凭据来源：直接传入或从凭据文件读取。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CredentialSource {
    Inline,
    File(PathBuf),
}

/// 身份凭据：所有模块共享的认证输入。
///
/// 设置后不可修改，重新设置时整体替换。
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub api_key: String,
    pub source: CredentialSource,
}

impl Credentials {
    /// 构造直接传入的凭据。
    pub fn inline(username: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            api_key: api_key.into(),
            source: CredentialSource::Inline,
        }
    }

    /// 构造来自凭据文件的凭据。
    pub fn from_file(
        username: impl Into<String>,
        api_key: impl Into<String>,
        path: impl Into<PathBuf>,
    ) -> Self {
        Self {
            username: username.into(),
            api_key: api_key.into(),
            source: CredentialSource::File(path.into()),
        }
    }
}

impl fmt::Debug for Credentials {
    // api_key 不进日志
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("api_key", &"***")
            .field("source", &self.source)
            .finish()
    }
}
