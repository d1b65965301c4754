use std::fmt;
use std::str::FromStr;

/// 逻辑服务。
///
/// 声明顺序即 connect_all 的固定调用顺序（BTreeMap 也按此排序）。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ServiceKind {
    Servers,
    Files,
    Keystone,
    LoadBalancers,
    Dns,
    Databases,
    BlockStorage,
}

impl ServiceKind {
    pub const ALL: [ServiceKind; 7] = [
        ServiceKind::Servers,
        ServiceKind::Files,
        ServiceKind::Keystone,
        ServiceKind::LoadBalancers,
        ServiceKind::Dns,
        ServiceKind::Databases,
        ServiceKind::BlockStorage,
    ];

    /// 配置文件 `[services]` 中的键名。
    pub fn key(self) -> &'static str {
        match self {
            ServiceKind::Servers => "servers",
            ServiceKind::Files => "files",
            ServiceKind::Keystone => "keystone",
            ServiceKind::LoadBalancers => "loadbalancers",
            ServiceKind::Dns => "dns",
            ServiceKind::Databases => "databases",
            ServiceKind::BlockStorage => "blockstorage",
        }
    }

    /// 未配置时是否默认启用。
    pub fn enabled_by_default(self) -> bool {
        !matches!(self, ServiceKind::Databases | ServiceKind::BlockStorage)
    }
}

impl fmt::Display for ServiceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// 未知服务名。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownService(pub String);

impl fmt::Display for UnknownService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown service: {}", self.0)
    }
}

impl std::error::Error for UnknownService {}

impl FromStr for ServiceKind {
    type Err = UnknownService;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        ServiceKind::ALL
            .into_iter()
            .find(|kind| kind.key() == value)
            .ok_or_else(|| UnknownService(value.to_string()))
    }
}
