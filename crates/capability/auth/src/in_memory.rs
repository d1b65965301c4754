//! 内存身份提供方
//!
//! 仅用于测试和本地演示：固定账户、固定租户、固定服务目录。

use crate::{AuthError, AuthGrant, IdentityProvider};
use async_trait::async_trait;
use domain::{Credentials, ServiceCatalog};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

const IN_MEMORY_ENDPOINT: &str = "memory://identity/v2.0/";

/// 内存身份提供方
pub struct InMemoryIdentityProvider {
    accounts: HashMap<String, String>,
    tenant_id: String,
    tenant_name: String,
    services: ServiceCatalog,
    attempts: AtomicUsize,
}

impl InMemoryIdentityProvider {
    pub fn new() -> Self {
        Self {
            accounts: HashMap::new(),
            tenant_id: "tenant-1".to_string(),
            tenant_name: "tenant-1".to_string(),
            services: ServiceCatalog::new(),
            attempts: AtomicUsize::new(0),
        }
    }

    /// 注册可通过认证的账户。
    pub fn with_account(mut self, username: impl Into<String>, api_key: impl Into<String>) -> Self {
        self.accounts.insert(username.into(), api_key.into());
        self
    }

    pub fn with_tenant(mut self, tenant_id: impl Into<String>, tenant_name: impl Into<String>) -> Self {
        self.tenant_id = tenant_id.into();
        self.tenant_name = tenant_name.into();
        self
    }

    pub fn with_catalog(mut self, services: ServiceCatalog) -> Self {
        self.services = services;
        self
    }

    /// 已发生的认证次数（含失败）。
    pub fn attempts(&self) -> usize {
        self.attempts.load(Ordering::Relaxed)
    }
}

impl Default for InMemoryIdentityProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl IdentityProvider for InMemoryIdentityProvider {
    fn endpoint(&self) -> &str {
        IN_MEMORY_ENDPOINT
    }

    async fn authenticate(&self, credentials: &Credentials) -> Result<AuthGrant, AuthError> {
        self.attempts.fetch_add(1, Ordering::Relaxed);
        match self.accounts.get(&credentials.username) {
            Some(api_key) if *api_key == credentials.api_key => Ok(AuthGrant {
                token: uuid::Uuid::new_v4().to_string(),
                tenant_id: self.tenant_id.clone(),
                tenant_name: self.tenant_name.clone(),
                auth_endpoint: IN_MEMORY_ENDPOINT.to_string(),
                services: self.services.clone(),
            }),
            _ => Err(AuthError::Rejected(format!(
                "unknown user or api key: {}",
                credentials.username
            ))),
        }
    }
}
