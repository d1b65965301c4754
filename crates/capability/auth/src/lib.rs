//! 认证能力：凭据、Identity 状态机与身份提供方。

mod credential_file;
mod in_memory;
mod keystone;

use async_trait::async_trait;
use domain::{Credentials, ServiceCatalog};
use std::fmt;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info, warn};

pub use credential_file::{CREDENTIAL_SECTION, parse_credentials, read_credential_file};
pub use in_memory::InMemoryIdentityProvider;
pub use keystone::{DEFAULT_IDENTITY_ENDPOINT, KeystoneProvider, parse_token_response};

/// 认证相关错误。
#[derive(Debug, Clone, thiserror::Error)]
pub enum AuthError {
    #[error("no credentials have been set")]
    MissingCredentials,
    #[error("credentials rejected: {0}")]
    Rejected(String),
    #[error("identity transport error: {0}")]
    Transport(String),
    #[error("invalid identity response: {0}")]
    Response(String),
    #[error("invalid credential file {path}: {reason}")]
    InvalidCredentialFile { path: String, reason: String },
}

/// 身份提供方握手成功后的授权结果。
#[derive(Debug, Clone)]
pub struct AuthGrant {
    pub token: String,
    pub tenant_id: String,
    pub tenant_name: String,
    pub auth_endpoint: String,
    pub services: ServiceCatalog,
}

/// 身份提供方抽象，便于替换实现与测试。
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// 认证端点（写入 Identity.auth_endpoint）。
    fn endpoint(&self) -> &str;

    async fn authenticate(&self, credentials: &Credentials) -> Result<AuthGrant, AuthError>;
}

/// 认证状态机。
///
/// `authenticated == true` 时 token、tenant、auth_endpoint、服务目录均已填充；
/// 否则全部为空。认证失败时整体重置为空实例（provider 保留）。
pub struct Identity {
    provider: Arc<dyn IdentityProvider>,
    credentials: Option<Credentials>,
    authenticated: bool,
    token: String,
    tenant_id: String,
    tenant_name: String,
    auth_endpoint: String,
    services: ServiceCatalog,
}

impl Identity {
    /// 创建空的 Identity。
    pub fn new(provider: Arc<dyn IdentityProvider>) -> Self {
        Self {
            provider,
            credentials: None,
            authenticated: false,
            token: String::new(),
            tenant_id: String::new(),
            tenant_name: String::new(),
            auth_endpoint: String::new(),
            services: ServiceCatalog::new(),
        }
    }

    /// 同一 provider 的全新空实例。
    pub fn fresh(&self) -> Self {
        Self::new(Arc::clone(&self.provider))
    }

    /// 重置为空实例。
    pub fn reset(&mut self) {
        *self = self.fresh();
    }

    /// 设置凭据，`authenticate_now` 时立即认证。
    pub async fn set_credentials(
        &mut self,
        username: &str,
        api_key: &str,
        authenticate_now: bool,
    ) -> Result<(), AuthError> {
        self.install(Credentials::inline(username, api_key), authenticate_now)
            .await
    }

    /// 从凭据文件读取凭据，`authenticate_now` 时立即认证。
    ///
    /// 文件无法解析时返回 [`AuthError::InvalidCredentialFile`]，当前状态不变。
    pub async fn set_credential_file(
        &mut self,
        path: &Path,
        authenticate_now: bool,
    ) -> Result<(), AuthError> {
        let credentials = read_credential_file(path)?;
        self.install(credentials, authenticate_now).await
    }

    /// 使用当前凭据与身份提供方握手。
    pub async fn authenticate(&mut self) -> Result<(), AuthError> {
        let Some(credentials) = self.credentials.clone() else {
            self.reset();
            return Err(AuthError::MissingCredentials);
        };
        match self.provider.authenticate(&credentials).await {
            Ok(grant) => {
                info!(
                    username = %credentials.username,
                    tenant_id = %grant.tenant_id,
                    services = grant.services.len(),
                    "authenticated"
                );
                self.apply(grant);
                Ok(())
            }
            Err(err) => {
                warn!(username = %credentials.username, error = %err, "authentication failed");
                self.reset();
                Err(err)
            }
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.authenticated
    }

    pub fn credentials(&self) -> Option<&Credentials> {
        self.credentials.as_ref()
    }

    pub fn username(&self) -> &str {
        self.credentials
            .as_ref()
            .map(|creds| creds.username.as_str())
            .unwrap_or_default()
    }

    pub fn api_key(&self) -> &str {
        self.credentials
            .as_ref()
            .map(|creds| creds.api_key.as_str())
            .unwrap_or_default()
    }

    pub fn token(&self) -> &str {
        &self.token
    }

    pub fn tenant_id(&self) -> &str {
        &self.tenant_id
    }

    pub fn tenant_name(&self) -> &str {
        &self.tenant_name
    }

    pub fn auth_endpoint(&self) -> &str {
        &self.auth_endpoint
    }

    pub fn services(&self) -> &ServiceCatalog {
        &self.services
    }

    async fn install(
        &mut self,
        credentials: Credentials,
        authenticate_now: bool,
    ) -> Result<(), AuthError> {
        debug!(?credentials, authenticate_now, "credentials set");
        // 新凭据作废旧授权
        self.reset();
        self.credentials = Some(credentials);
        if authenticate_now {
            self.authenticate().await?;
        }
        Ok(())
    }

    fn apply(&mut self, grant: AuthGrant) {
        self.token = grant.token;
        self.tenant_id = grant.tenant_id;
        self.tenant_name = grant.tenant_name;
        self.auth_endpoint = grant.auth_endpoint;
        self.services = grant.services;
        self.authenticated = true;
    }
}

impl fmt::Debug for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Identity")
            .field("provider", &self.provider.endpoint())
            .field("credentials", &self.credentials)
            .field("authenticated", &self.authenticated)
            .field("tenant_id", &self.tenant_id)
            .field("tenant_name", &self.tenant_name)
            .field("auth_endpoint", &self.auth_endpoint)
            .field("services", &self.services.len())
            .finish()
    }
}
