//! 端点解析：区域回退策略与服务目录查找。

use domain::{ALL_REGIONS, ServiceCatalog};
use tracing::debug;

/// 既没有显式区域也没有默认区域时使用的区域。
pub const FALLBACK_REGION: &str = "DFW";

/// 端点解析错误。
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EndpointError {
    #[error("no endpoint for service '{service}' in region '{region}'")]
    ResolutionFailed { service: String, region: String },
}

/// 区域优先级：显式区域 -> 默认区域 -> FALLBACK_REGION。
///
/// 空字符串等同于未提供。
pub fn resolve_region(explicit: Option<&str>, default_region: Option<&str>) -> String {
    explicit
        .filter(|region| !region.is_empty())
        .or_else(|| default_region.filter(|region| !region.is_empty()))
        .unwrap_or(FALLBACK_REGION)
        .to_string()
}

/// 解析服务在指定区域的 public_url。
///
/// 1. 精确区域命中则原样返回；
/// 2. 否则取 `ALL` 模板，在第一个 `//` 之后插入小写区域前缀；
/// 3. 两者都没有时返回 [`EndpointError::ResolutionFailed`]。
pub fn resolve_endpoint(
    catalog: &ServiceCatalog,
    service: &str,
    region: &str,
) -> Result<String, EndpointError> {
    if let Some(url) = catalog.public_url(service, region) {
        return Ok(url.to_string());
    }
    let rewritten = catalog
        .public_url(service, ALL_REGIONS)
        .and_then(|template| with_region_prefix(template, region));
    match rewritten {
        Some(url) => {
            debug!(service, region, url = %url, "endpoint resolved from ALL template");
            Ok(url)
        }
        None => Err(EndpointError::ResolutionFailed {
            service: service.to_string(),
            region: region.to_string(),
        }),
    }
}

/// `https://x.com` + `LON` -> `https://lon.x.com`。
fn with_region_prefix(template: &str, region: &str) -> Option<String> {
    let (scheme, rest) = template.split_once("//")?;
    Some(format!("{scheme}//{}.{rest}", region.to_lowercase()))
}
