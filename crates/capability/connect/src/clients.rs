//! 各服务的客户端句柄
//!
//! 句柄在构造时一次性填充完毕，之后不再修改。请求/响应处理不在本 crate 内。

use domain::ServiceKind;
use rax_auth::Identity;
use std::fmt;

/// 句柄共享的认证参数。
#[derive(Clone, PartialEq, Eq)]
pub struct ClientAuth {
    pub username: String,
    pub api_key: String,
    pub auth_token: String,
    pub tenant_id: String,
    pub tenant_name: String,
    pub auth_url: String,
}

impl ClientAuth {
    /// 从已认证的 Identity 复制认证参数。
    pub fn from_identity(identity: &Identity) -> Self {
        Self {
            username: identity.username().to_string(),
            api_key: identity.api_key().to_string(),
            auth_token: identity.token().to_string(),
            tenant_id: identity.tenant_id().to_string(),
            tenant_name: identity.tenant_name().to_string(),
            auth_url: identity.auth_endpoint().to_string(),
        }
    }
}

impl fmt::Debug for ClientAuth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientAuth")
            .field("username", &self.username)
            .field("api_key", &"***")
            .field("auth_token", &"***")
            .field("tenant_id", &self.tenant_id)
            .field("tenant_name", &self.tenant_name)
            .field("auth_url", &self.auth_url)
            .finish()
    }
}

/// 云主机（compute）。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComputeClient {
    pub auth: ClientAuth,
    pub region: String,
    pub management_url: String,
    pub service_type: &'static str,
    pub auth_system: &'static str,
    pub user_agent: String,
}

/// 对象存储 + CDN。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectStoreClient {
    pub auth: ClientAuth,
    pub region: String,
    pub storage_url: String,
    pub cdn_url: String,
    pub endpoint_type: &'static str,
    pub auth_version: &'static str,
    pub user_agent: String,
}

/// 身份管理（keystone），直接使用认证端点。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentityAdminClient {
    pub auth: ClientAuth,
    pub user_agent: String,
}

/// 负载均衡。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadBalancerClient {
    pub auth: ClientAuth,
    pub region: String,
    pub management_url: String,
    pub user_agent: String,
}

/// DNS。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DnsClient {
    pub auth: ClientAuth,
    pub region: String,
    pub management_url: String,
    pub user_agent: String,
}

/// 云数据库。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabaseClient {
    pub auth: ClientAuth,
    pub region: String,
    pub management_url: String,
    pub service_type: &'static str,
    pub user_agent: String,
}

/// 块存储。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockStorageClient {
    pub auth: ClientAuth,
    pub region: String,
    pub management_url: String,
    pub service_type: &'static str,
    pub user_agent: String,
}

/// 连接器产出的句柄。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServiceClient {
    Compute(ComputeClient),
    ObjectStore(ObjectStoreClient),
    IdentityAdmin(IdentityAdminClient),
    LoadBalancer(LoadBalancerClient),
    Dns(DnsClient),
    Database(DatabaseClient),
    BlockStorage(BlockStorageClient),
}

impl ServiceClient {
    pub fn service(&self) -> ServiceKind {
        match self {
            ServiceClient::Compute(_) => ServiceKind::Servers,
            ServiceClient::ObjectStore(_) => ServiceKind::Files,
            ServiceClient::IdentityAdmin(_) => ServiceKind::Keystone,
            ServiceClient::LoadBalancer(_) => ServiceKind::LoadBalancers,
            ServiceClient::Dns(_) => ServiceKind::Dns,
            ServiceClient::Database(_) => ServiceKind::Databases,
            ServiceClient::BlockStorage(_) => ServiceKind::BlockStorage,
        }
    }

    pub fn auth(&self) -> &ClientAuth {
        match self {
            ServiceClient::Compute(client) => &client.auth,
            ServiceClient::ObjectStore(client) => &client.auth,
            ServiceClient::IdentityAdmin(client) => &client.auth,
            ServiceClient::LoadBalancer(client) => &client.auth,
            ServiceClient::Dns(client) => &client.auth,
            ServiceClient::Database(client) => &client.auth,
            ServiceClient::BlockStorage(client) => &client.auth,
        }
    }

    pub fn user_agent(&self) -> &str {
        match self {
            ServiceClient::Compute(client) => &client.user_agent,
            ServiceClient::ObjectStore(client) => &client.user_agent,
            ServiceClient::IdentityAdmin(client) => &client.user_agent,
            ServiceClient::LoadBalancer(client) => &client.user_agent,
            ServiceClient::Dns(client) => &client.user_agent,
            ServiceClient::Database(client) => &client.user_agent,
            ServiceClient::BlockStorage(client) => &client.user_agent,
        }
    }

    /// 主端点（对象存储为 storage_url，keystone 为认证端点）。
    pub fn endpoint(&self) -> &str {
        match self {
            ServiceClient::Compute(client) => &client.management_url,
            ServiceClient::ObjectStore(client) => &client.storage_url,
            ServiceClient::IdentityAdmin(client) => &client.auth.auth_url,
            ServiceClient::LoadBalancer(client) => &client.management_url,
            ServiceClient::Dns(client) => &client.management_url,
            ServiceClient::Database(client) => &client.management_url,
            ServiceClient::BlockStorage(client) => &client.management_url,
        }
    }

    /// keystone 不绑定区域，返回 None。
    pub fn region(&self) -> Option<&str> {
        match self {
            ServiceClient::Compute(client) => Some(&client.region),
            ServiceClient::ObjectStore(client) => Some(&client.region),
            ServiceClient::IdentityAdmin(_) => None,
            ServiceClient::LoadBalancer(client) => Some(&client.region),
            ServiceClient::Dns(client) => Some(&client.region),
            ServiceClient::Database(client) => Some(&client.region),
            ServiceClient::BlockStorage(client) => Some(&client.region),
        }
    }
}
