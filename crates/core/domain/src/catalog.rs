use std::collections::BTreeMap;

/// 不区分区域的模板端点所使用的区域键。
pub const ALL_REGIONS: &str = "ALL";

/// 单个区域下的服务端点。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EndpointEntry {
    pub public_url: String,
    pub internal_url: Option<String>,
    pub tenant_id: Option<String>,
}

impl EndpointEntry {
    pub fn public(url: impl Into<String>) -> Self {
        Self {
            public_url: url.into(),
            internal_url: None,
            tenant_id: None,
        }
    }
}

/// 服务目录：服务名 -> 区域 -> 端点。
///
/// 由身份提供方在认证成功后返回；区域键区分大小写。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ServiceCatalog {
    services: BTreeMap<String, BTreeMap<String, EndpointEntry>>,
}

impl ServiceCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// 写入（或覆盖）某服务某区域的端点。
    pub fn insert(
        &mut self,
        service: impl Into<String>,
        region: impl Into<String>,
        entry: EndpointEntry,
    ) {
        self.services
            .entry(service.into())
            .or_default()
            .insert(region.into(), entry);
    }

    /// 链式写入 public_url，便于构造测试目录。
    pub fn with_endpoint(
        mut self,
        service: impl Into<String>,
        region: impl Into<String>,
        public_url: impl Into<String>,
    ) -> Self {
        self.insert(service, region, EndpointEntry::public(public_url));
        self
    }

    pub fn endpoint(&self, service: &str, region: &str) -> Option<&EndpointEntry> {
        self.services.get(service)?.get(region)
    }

    /// 查找 public_url，空字符串视为不存在。
    pub fn public_url(&self, service: &str, region: &str) -> Option<&str> {
        self.endpoint(service, region)
            .map(|entry| entry.public_url.as_str())
            .filter(|url| !url.is_empty())
    }

    pub fn regions(&self, service: &str) -> Vec<&str> {
        self.services
            .get(service)
            .map(|regions| regions.keys().map(String::as_str).collect())
            .unwrap_or_default()
    }

    pub fn service_names(&self) -> impl Iterator<Item = &str> {
        self.services.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.services.len()
    }

    pub fn is_empty(&self) -> bool {
        self.services.is_empty()
    }
}

/// 目录类型名规范化：去掉 `rax:` 前缀，`-` 换成 `_`。
///
/// 例如 `rax:object-cdn` -> `object_cdn`，`object-store` -> `object_store`。
pub fn normalize_service_type(raw: &str) -> String {
    raw.strip_prefix("rax:").unwrap_or(raw).replace('-', "_")
}
