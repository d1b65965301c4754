//! 会话编排：认证一次，按配置顺序连接各服务并持有客户端句柄。

mod error;

use domain::ServiceKind;
use rax_auth::{AuthError, Identity, IdentityProvider};
use rax_config::SessionConfig;
use rax_connect::{
    BlockStorageClient, ComputeClient, ConnectorRegistry, DatabaseClient, DnsClient,
    IdentityAdminClient, LoadBalancerClient, ObjectStoreClient, ServiceClient,
    ensure_authenticated,
};
use rax_telemetry::{
    new_session_id, record_auth_failure, record_auth_success, record_connection_established,
    record_connection_failure, record_credentials_cleared,
};
use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

pub use error::SessionError;

/// 多任务共享的会话。身份替换、句柄写入、区域变更与清理共用同一把锁。
pub type SharedSession = Arc<Mutex<Session>>;

/// 会话阶段。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    Unauthenticated,
    Authenticated,
}

/// 会话状态。
///
/// `clients` 中的句柄都是在已认证状态下写入的；之后认证失败不会使其失效，
/// 只有 [`Session::clear_credentials`] 会清空。
pub struct Session {
    session_id: String,
    identity: Identity,
    config: SessionConfig,
    default_region: Option<String>,
    registry: ConnectorRegistry,
    clients: BTreeMap<ServiceKind, ServiceClient>,
}

impl Session {
    /// 使用标准连接器注册表创建会话；默认区域取自配置。
    pub fn new(config: SessionConfig, provider: Arc<dyn IdentityProvider>) -> Self {
        let session_id = new_session_id();
        debug!(
            target: "rax.session",
            session_id = %session_id,
            default_region = ?config.default_region,
            services = ?config.services.enabled(),
            "session created"
        );
        Self {
            session_id,
            identity: Identity::new(provider),
            default_region: config.default_region.clone(),
            config,
            registry: ConnectorRegistry::standard(),
            clients: BTreeMap::new(),
        }
    }

    /// 替换连接器注册表。
    pub fn with_registry(mut self, registry: ConnectorRegistry) -> Self {
        self.registry = registry;
        self
    }

    pub fn into_shared(self) -> SharedSession {
        Arc::new(Mutex::new(self))
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    pub fn identity(&self) -> &Identity {
        &self.identity
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn phase(&self) -> SessionPhase {
        if self.identity.is_authenticated() {
            SessionPhase::Authenticated
        } else {
            SessionPhase::Unauthenticated
        }
    }

    /// 设置凭据；`authenticate_now` 时立即认证并连接所有启用的服务。
    ///
    /// 认证失败时清空整个会话后返回 [`SessionError::AuthenticationFailed`]。
    pub async fn set_credentials(
        &mut self,
        username: &str,
        api_key: &str,
        authenticate_now: bool,
    ) -> Result<(), SessionError> {
        let result = self
            .identity
            .set_credentials(username, api_key, authenticate_now)
            .await;
        self.after_credentials(result, authenticate_now)
    }

    /// 从凭据文件设置凭据，语义同 [`Session::set_credentials`]。
    ///
    /// 文件无效时返回 [`SessionError::InvalidCredentialFile`]，会话保持不变。
    pub async fn set_credential_file(
        &mut self,
        path: &Path,
        authenticate_now: bool,
    ) -> Result<(), SessionError> {
        let result = self
            .identity
            .set_credential_file(path, authenticate_now)
            .await;
        self.after_credentials(result, authenticate_now)
    }

    /// 使用已设置的凭据重新认证。
    ///
    /// 失败时 identity 重置为空，默认区域与已有句柄保持不变。
    pub async fn authenticate(&mut self) -> Result<(), SessionError> {
        match self.identity.authenticate().await {
            Ok(()) => {
                record_auth_success();
                info!(
                    target: "rax.session",
                    session_id = %self.session_id,
                    username = %self.identity.username(),
                    "session authenticated"
                );
                Ok(())
            }
            Err(err) => {
                record_auth_failure();
                Err(err.into())
            }
        }
    }

    /// 清空 identity、默认区域与全部句柄。
    pub fn clear_credentials(&mut self) {
        self.identity.reset();
        self.default_region = None;
        self.clients.clear();
        record_credentials_cleared();
        info!(target: "rax.session", session_id = %self.session_id, "credentials cleared");
    }

    pub fn set_default_region(&mut self, region: impl Into<String>) {
        let region = region.into();
        self.default_region = (!region.is_empty()).then_some(region);
    }

    pub fn default_region(&self) -> Option<&str> {
        self.default_region.as_deref()
    }

    /// 连接单个服务并保存句柄（覆盖旧句柄）。
    ///
    /// 未认证时返回 [`SessionError::NotAuthenticated`] 且句柄不变；
    /// 服务没有注册连接器时返回 `Ok(None)`。
    pub fn connect(
        &mut self,
        kind: ServiceKind,
        region: Option<&str>,
    ) -> Result<Option<&ServiceClient>, SessionError> {
        let connected = self
            .registry
            .connect(kind, &self.identity, region, self.default_region.as_deref())
            .map_err(|err| {
                record_connection_failure();
                warn!(
                    target: "rax.session",
                    session_id = %self.session_id,
                    service = %kind,
                    error = %err,
                    "service connection failed"
                );
                SessionError::from(err)
            })?;
        let Some(client) = connected else {
            return Ok(None);
        };
        record_connection_established();
        self.clients.insert(kind, client);
        Ok(self.clients.get(&kind))
    }

    /// 按固定顺序连接所有启用的服务，遇到第一个错误即停止。
    ///
    /// 未启用的服务被跳过，其已有句柄保持不变。
    pub fn connect_all(&mut self) -> Result<(), SessionError> {
        ensure_authenticated(&self.identity, "connect_all")?;
        for kind in ServiceKind::ALL {
            if !self.config.services.is_enabled(kind) {
                debug!(
                    target: "rax.session",
                    session_id = %self.session_id,
                    service = %kind,
                    "service disabled"
                );
                continue;
            }
            if !self.registry.contains(kind) {
                debug!(
                    target: "rax.session",
                    session_id = %self.session_id,
                    service = %kind,
                    "service unavailable"
                );
                continue;
            }
            self.connect(kind, None)?;
        }
        info!(
            target: "rax.session",
            session_id = %self.session_id,
            services = ?self.connected_services(),
            "services connected"
        );
        Ok(())
    }

    pub fn client(&self, kind: ServiceKind) -> Option<&ServiceClient> {
        self.clients.get(&kind)
    }

    /// 已持有句柄的服务（固定顺序）。
    pub fn connected_services(&self) -> Vec<ServiceKind> {
        self.clients.keys().copied().collect()
    }

    pub fn compute(&self) -> Option<&ComputeClient> {
        match self.client(ServiceKind::Servers) {
            Some(ServiceClient::Compute(client)) => Some(client),
            _ => None,
        }
    }

    pub fn object_store(&self) -> Option<&ObjectStoreClient> {
        match self.client(ServiceKind::Files) {
            Some(ServiceClient::ObjectStore(client)) => Some(client),
            _ => None,
        }
    }

    pub fn identity_admin(&self) -> Option<&IdentityAdminClient> {
        match self.client(ServiceKind::Keystone) {
            Some(ServiceClient::IdentityAdmin(client)) => Some(client),
            _ => None,
        }
    }

    pub fn load_balancers(&self) -> Option<&LoadBalancerClient> {
        match self.client(ServiceKind::LoadBalancers) {
            Some(ServiceClient::LoadBalancer(client)) => Some(client),
            _ => None,
        }
    }

    pub fn dns(&self) -> Option<&DnsClient> {
        match self.client(ServiceKind::Dns) {
            Some(ServiceClient::Dns(client)) => Some(client),
            _ => None,
        }
    }

    pub fn databases(&self) -> Option<&DatabaseClient> {
        match self.client(ServiceKind::Databases) {
            Some(ServiceClient::Database(client)) => Some(client),
            _ => None,
        }
    }

    pub fn block_storage(&self) -> Option<&BlockStorageClient> {
        match self.client(ServiceKind::BlockStorage) {
            Some(ServiceClient::BlockStorage(client)) => Some(client),
            _ => None,
        }
    }

    fn after_credentials(
        &mut self,
        result: Result<(), AuthError>,
        authenticate_now: bool,
    ) -> Result<(), SessionError> {
        match result.map_err(SessionError::from) {
            Ok(()) => {
                if !authenticate_now {
                    return Ok(());
                }
                record_auth_success();
                info!(
                    target: "rax.session",
                    session_id = %self.session_id,
                    username = %self.identity.username(),
                    "session authenticated"
                );
                self.connect_all()
            }
            Err(err @ SessionError::AuthenticationFailed(_)) => {
                record_auth_failure();
                self.clear_credentials();
                Err(err)
            }
            Err(err) => Err(err),
        }
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("session_id", &self.session_id)
            .field("identity", &self.identity)
            .field("default_region", &self.default_region)
            .field("connected", &self.connected_services())
            .finish()
    }
}
