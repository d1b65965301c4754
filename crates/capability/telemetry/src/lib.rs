//! 日志追踪、会话 ID 与会话计数。

use std::sync::OnceLock;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing_subscriber::{EnvFilter, fmt};

/// 会话计数快照。
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MetricsSnapshot {
    pub auth_success: u64,
    pub auth_failure: u64,
    pub connections_established: u64,
    pub connection_failures: u64,
    pub credentials_cleared: u64,
}

/// 进程级会话计数。
pub struct SessionMetrics {
    auth_success: AtomicU64,
    auth_failure: AtomicU64,
    connections_established: AtomicU64,
    connection_failures: AtomicU64,
    credentials_cleared: AtomicU64,
}

impl SessionMetrics {
    pub fn new() -> Self {
        Self {
            auth_success: AtomicU64::new(0),
            auth_failure: AtomicU64::new(0),
            connections_established: AtomicU64::new(0),
            connection_failures: AtomicU64::new(0),
            credentials_cleared: AtomicU64::new(0),
        }
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            auth_success: self.auth_success.load(Ordering::Relaxed),
            auth_failure: self.auth_failure.load(Ordering::Relaxed),
            connections_established: self.connections_established.load(Ordering::Relaxed),
            connection_failures: self.connection_failures.load(Ordering::Relaxed),
            credentials_cleared: self.credentials_cleared.load(Ordering::Relaxed),
        }
    }
}

impl Default for SessionMetrics {
    fn default() -> Self {
        Self::new()
    }
}

static METRICS: OnceLock<SessionMetrics> = OnceLock::new();

/// 获取全局计数实例。
pub fn metrics() -> &'static SessionMetrics {
    METRICS.get_or_init(SessionMetrics::new)
}

/// 初始化 tracing（默认 info）。
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = fmt().with_env_filter(filter).try_init();
}

/// 生成新的 session_id，用于关联同一会话的日志。
pub fn new_session_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// 记录认证成功次数。
pub fn record_auth_success() {
    metrics().auth_success.fetch_add(1, Ordering::Relaxed);
}

/// 记录认证失败次数。
pub fn record_auth_failure() {
    metrics().auth_failure.fetch_add(1, Ordering::Relaxed);
}

/// 记录服务连接成功次数。
pub fn record_connection_established() {
    metrics()
        .connections_established
        .fetch_add(1, Ordering::Relaxed);
}

/// 记录服务连接失败次数。
pub fn record_connection_failure() {
    metrics().connection_failures.fetch_add(1, Ordering::Relaxed);
}

/// 记录凭据清理次数。
pub fn record_credentials_cleared() {
    metrics().credentials_cleared.fetch_add(1, Ordering::Relaxed);
}
