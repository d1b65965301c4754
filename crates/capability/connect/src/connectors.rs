//! 标准连接器
//!
//! 每个连接器：认证前置检查 -> 按目录解析端点 -> 构造句柄 -> 标记 user-agent。
//! 区域解析由 [`crate::ConnectorRegistry::connect`] 统一完成。

use crate::clients::{
    BlockStorageClient, ClientAuth, ComputeClient, DatabaseClient, IdentityAdminClient,
    LoadBalancerClient, ObjectStoreClient, ServiceClient,
};
#[cfg(feature = "dns")]
use crate::clients::DnsClient;
use crate::{ConnectError, Connector, ensure_authenticated, user_agent};
use domain::ServiceKind;
use rax_auth::Identity;
use rax_endpoint::resolve_endpoint;

/// 未认证时不构造任何句柄。
fn require_authenticated(kind: ServiceKind, identity: &Identity) -> Result<(), ConnectError> {
    ensure_authenticated(identity, &format!("connect {kind}"))
}

fn endpoint(identity: &Identity, service: &str, region: &str) -> Result<String, ConnectError> {
    Ok(resolve_endpoint(identity.services(), service, region)?)
}

/// servers -> compute。
pub struct ComputeConnector;

impl Connector for ComputeConnector {
    fn service(&self) -> ServiceKind {
        ServiceKind::Servers
    }

    fn build(&self, identity: &Identity, region: &str) -> Result<ServiceClient, ConnectError> {
        require_authenticated(self.service(), identity)?;
        let management_url = endpoint(identity, "compute", region)?;
        Ok(ServiceClient::Compute(ComputeClient {
            auth: ClientAuth::from_identity(identity),
            region: region.to_string(),
            management_url,
            service_type: "compute",
            auth_system: "rackspace",
            user_agent: user_agent(self.service()),
        }))
    }
}

/// files -> object_store + object_cdn。
pub struct ObjectStoreConnector;

impl Connector for ObjectStoreConnector {
    fn service(&self) -> ServiceKind {
        ServiceKind::Files
    }

    fn build(&self, identity: &Identity, region: &str) -> Result<ServiceClient, ConnectError> {
        require_authenticated(self.service(), identity)?;
        let storage_url = endpoint(identity, "object_store", region)?;
        let cdn_url = endpoint(identity, "object_cdn", region)?;
        Ok(ServiceClient::ObjectStore(ObjectStoreClient {
            auth: ClientAuth::from_identity(identity),
            region: region.to_string(),
            storage_url,
            cdn_url,
            endpoint_type: "publicURL",
            auth_version: "2",
            user_agent: user_agent(self.service()),
        }))
    }
}

/// keystone -> 认证端点（不查目录）。
pub struct IdentityAdminConnector;

impl Connector for IdentityAdminConnector {
    fn service(&self) -> ServiceKind {
        ServiceKind::Keystone
    }

    fn build(&self, identity: &Identity, _region: &str) -> Result<ServiceClient, ConnectError> {
        require_authenticated(self.service(), identity)?;
        Ok(ServiceClient::IdentityAdmin(IdentityAdminClient {
            auth: ClientAuth::from_identity(identity),
            user_agent: user_agent(self.service()),
        }))
    }
}

/// loadbalancers -> load_balancer。
pub struct LoadBalancerConnector;

impl Connector for LoadBalancerConnector {
    fn service(&self) -> ServiceKind {
        ServiceKind::LoadBalancers
    }

    fn build(&self, identity: &Identity, region: &str) -> Result<ServiceClient, ConnectError> {
        require_authenticated(self.service(), identity)?;
        let management_url = endpoint(identity, "load_balancer", region)?;
        Ok(ServiceClient::LoadBalancer(LoadBalancerClient {
            auth: ClientAuth::from_identity(identity),
            region: region.to_string(),
            management_url,
            user_agent: user_agent(self.service()),
        }))
    }
}

/// dns -> dns。
#[cfg(feature = "dns")]
pub struct DnsConnector;

#[cfg(feature = "dns")]
impl Connector for DnsConnector {
    fn service(&self) -> ServiceKind {
        ServiceKind::Dns
    }

    fn build(&self, identity: &Identity, region: &str) -> Result<ServiceClient, ConnectError> {
        require_authenticated(self.service(), identity)?;
        let management_url = endpoint(identity, "dns", region)?;
        Ok(ServiceClient::Dns(DnsClient {
            auth: ClientAuth::from_identity(identity),
            region: region.to_string(),
            management_url,
            user_agent: user_agent(self.service()),
        }))
    }
}

/// databases -> database。
pub struct DatabaseConnector;

impl Connector for DatabaseConnector {
    fn service(&self) -> ServiceKind {
        ServiceKind::Databases
    }

    fn build(&self, identity: &Identity, region: &str) -> Result<ServiceClient, ConnectError> {
        require_authenticated(self.service(), identity)?;
        let management_url = endpoint(identity, "database", region)?;
        Ok(ServiceClient::Database(DatabaseClient {
            auth: ClientAuth::from_identity(identity),
            region: region.to_string(),
            management_url,
            service_type: "rax:database",
            user_agent: user_agent(self.service()),
        }))
    }
}

/// blockstorage -> volume。
pub struct BlockStorageConnector;

impl Connector for BlockStorageConnector {
    fn service(&self) -> ServiceKind {
        ServiceKind::BlockStorage
    }

    fn build(&self, identity: &Identity, region: &str) -> Result<ServiceClient, ConnectError> {
        require_authenticated(self.service(), identity)?;
        let management_url = endpoint(identity, "volume", region)?;
        Ok(ServiceClient::BlockStorage(BlockStorageClient {
            auth: ClientAuth::from_identity(identity),
            region: region.to_string(),
            management_url,
            service_type: "volume",
            user_agent: user_agent(self.service()),
        }))
    }
}
