use crate::AuthError;
use domain::Credentials;
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// 凭据文件中保存用户名与 API key 的 section。
pub const CREDENTIAL_SECTION: &str = "rackspace_cloud";

#[derive(Debug, Deserialize)]
struct CredentialFile {
    rackspace_cloud: Option<CredentialSection>,
}

#[derive(Debug, Deserialize)]
struct CredentialSection {
    username: String,
    api_key: String,
}

/// 读取凭据文件。
///
/// 格式：
///
/// ```toml
/// [rackspace_cloud]
/// username = "myusername"
/// api_key = "1234567890abcdef"
/// ```
pub fn read_credential_file(path: &Path) -> Result<Credentials, AuthError> {
    let content = fs::read_to_string(path).map_err(|err| invalid(path, err.to_string()))?;
    parse_credentials(&content, path)
}

/// 解析凭据文件内容，`path` 仅用于错误信息与来源标记。
pub fn parse_credentials(content: &str, path: &Path) -> Result<Credentials, AuthError> {
    let file: CredentialFile =
        toml::from_str(content).map_err(|err| invalid(path, err.to_string()))?;
    let section = file
        .rackspace_cloud
        .ok_or_else(|| invalid(path, format!("missing [{CREDENTIAL_SECTION}] section")))?;
    if section.username.is_empty() || section.api_key.is_empty() {
        return Err(invalid(path, "username and api_key must not be empty".to_string()));
    }
    Ok(Credentials::from_file(section.username, section.api_key, path))
}

fn invalid(path: &Path, reason: String) -> AuthError {
    AuthError::InvalidCredentialFile {
        path: path.display().to_string(),
        reason,
    }
}
