//! 服务连接能力：连接器注册表、客户端句柄与 user-agent。

mod clients;
mod connectors;

use domain::ServiceKind;
use rax_auth::Identity;
use rax_endpoint::{EndpointError, resolve_region};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, info};

pub use clients::{
    BlockStorageClient, ClientAuth, ComputeClient, DatabaseClient, DnsClient, IdentityAdminClient,
    LoadBalancerClient, ObjectStoreClient, ServiceClient,
};
#[cfg(feature = "dns")]
pub use connectors::DnsConnector;
pub use connectors::{
    BlockStorageConnector, ComputeConnector, DatabaseConnector, IdentityAdminConnector,
    LoadBalancerConnector, ObjectStoreConnector,
};

/// 编排器名称（user-agent 的一部分）。
pub const ORCHESTRATOR: &str = "rax";
/// 编排器版本（user-agent 的一部分）。
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
/// 句柄 user-agent 的组件前缀。
pub const CLIENT_AGENT_BASE: &str = "rax-client";

/// 连接错误。
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConnectError {
    #[error("authentication required before calling '{operation}'")]
    NotAuthenticated { operation: String },
    #[error(transparent)]
    Endpoint(#[from] EndpointError),
}

/// `{component}:{orchestrator}/{version}`，如 `rax-client-servers:rax/0.1.0`。
pub fn user_agent(kind: ServiceKind) -> String {
    format!("{CLIENT_AGENT_BASE}-{kind}:{ORCHESTRATOR}/{VERSION}")
}

/// 认证前置检查。
pub fn ensure_authenticated(identity: &Identity, operation: &str) -> Result<(), ConnectError> {
    if identity.is_authenticated() {
        return Ok(());
    }
    Err(ConnectError::NotAuthenticated {
        operation: operation.to_string(),
    })
}

/// 连接器抽象：为单个服务构造句柄。
///
/// identity 未认证时返回 [`ConnectError::NotAuthenticated`]；region 由调用方解析。
pub trait Connector: Send + Sync {
    fn service(&self) -> ServiceKind;

    fn build(&self, identity: &Identity, region: &str) -> Result<ServiceClient, ConnectError>;
}

/// 服务 -> 连接器的固定映射。
#[derive(Clone, Default)]
pub struct ConnectorRegistry {
    connectors: BTreeMap<ServiceKind, Arc<dyn Connector>>,
}

impl ConnectorRegistry {
    /// 空注册表。
    pub fn empty() -> Self {
        Self::default()
    }

    /// 标准注册表；未启用 `dns` feature 时不含 dns。
    pub fn standard() -> Self {
        let registry = Self::empty()
            .with(Arc::new(ComputeConnector))
            .with(Arc::new(ObjectStoreConnector))
            .with(Arc::new(IdentityAdminConnector))
            .with(Arc::new(LoadBalancerConnector))
            .with(Arc::new(DatabaseConnector))
            .with(Arc::new(BlockStorageConnector));
        #[cfg(feature = "dns")]
        let registry = registry.with(Arc::new(DnsConnector));
        registry
    }

    /// 注册（或替换）连接器。
    pub fn register(&mut self, connector: Arc<dyn Connector>) {
        self.connectors.insert(connector.service(), connector);
    }

    pub fn with(mut self, connector: Arc<dyn Connector>) -> Self {
        self.register(connector);
        self
    }

    pub fn contains(&self, kind: ServiceKind) -> bool {
        self.connectors.contains_key(&kind)
    }

    /// 已注册的服务（固定顺序）。
    pub fn services(&self) -> Vec<ServiceKind> {
        self.connectors.keys().copied().collect()
    }

    /// 执行单个连接器。
    ///
    /// 未认证时返回 [`ConnectError::NotAuthenticated`]，不构造任何句柄；
    /// 服务未注册时返回 `Ok(None)`。
    pub fn connect(
        &self,
        kind: ServiceKind,
        identity: &Identity,
        region: Option<&str>,
        default_region: Option<&str>,
    ) -> Result<Option<ServiceClient>, ConnectError> {
        ensure_authenticated(identity, &format!("connect {kind}"))?;
        let Some(connector) = self.connectors.get(&kind) else {
            debug!(service = %kind, "no connector registered, skipping");
            return Ok(None);
        };
        let region = resolve_region(region, default_region);
        let client = connector.build(identity, &region)?;
        info!(
            service = %kind,
            region = %region,
            endpoint = %client.endpoint(),
            "service connected"
        );
        Ok(Some(client))
    }
}
