use crate::{AuthError, AuthGrant, IdentityProvider};
use async_trait::async_trait;
use domain::{ALL_REGIONS, Credentials, EndpointEntry, ServiceCatalog, normalize_service_type};
use reqwest::StatusCode;
use serde::Deserialize;
use tracing::debug;

/// 默认身份端点（Keystone v2.0）。
pub const DEFAULT_IDENTITY_ENDPOINT: &str = "https://identity.api.rackspacecloud.com/v2.0/";

const HTTP_USER_AGENT: &str = concat!("rax/", env!("CARGO_PKG_VERSION"));

/// `POST /tokens` 响应。
#[derive(Debug, Deserialize)]
struct TokenResponse {
    access: Access,
}

#[derive(Debug, Deserialize)]
struct Access {
    token: Token,
    #[serde(rename = "serviceCatalog", default)]
    service_catalog: Vec<CatalogService>,
}

#[derive(Debug, Deserialize)]
struct Token {
    id: String,
    tenant: Option<Tenant>,
}

#[derive(Debug, Deserialize)]
struct Tenant {
    id: String,
    name: String,
}

#[derive(Debug, Deserialize)]
struct CatalogService {
    #[serde(rename = "type")]
    service_type: String,
    #[serde(default)]
    endpoints: Vec<CatalogEndpoint>,
}

#[derive(Debug, Deserialize)]
struct CatalogEndpoint {
    region: Option<String>,
    #[serde(rename = "publicURL")]
    public_url: Option<String>,
    #[serde(rename = "internalURL")]
    internal_url: Option<String>,
    #[serde(rename = "tenantId")]
    tenant_id: Option<String>,
}

/// 基于 HTTP 的 Keystone v2.0 身份提供方（API key 认证）。
pub struct KeystoneProvider {
    http: reqwest::Client,
    endpoint: String,
}

impl KeystoneProvider {
    /// 创建指向 `endpoint` 的提供方。
    pub fn new(endpoint: impl Into<String>) -> Result<Self, AuthError> {
        let http = reqwest::Client::builder()
            .user_agent(HTTP_USER_AGENT)
            .build()
            .map_err(|err| AuthError::Transport(err.to_string()))?;
        Ok(Self {
            http,
            endpoint: endpoint.into(),
        })
    }

    fn tokens_url(&self) -> String {
        format!("{}/tokens", self.endpoint.trim_end_matches('/'))
    }
}

#[async_trait]
impl IdentityProvider for KeystoneProvider {
    fn endpoint(&self) -> &str {
        &self.endpoint
    }

    async fn authenticate(&self, credentials: &Credentials) -> Result<AuthGrant, AuthError> {
        let url = self.tokens_url();
        debug!(url = %url, username = %credentials.username, "requesting token");
        let body = serde_json::json!({
            "auth": {
                "RAX-KSKEY:apiKeyCredentials": {
                    "username": credentials.username,
                    "apiKey": credentials.api_key,
                }
            }
        });

        let response = self
            .http
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|err| AuthError::Transport(err.to_string()))?;

        let status = response.status();
        if matches!(status, StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN) {
            return Err(AuthError::Rejected(format!(
                "identity endpoint returned {status}"
            )));
        }
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(AuthError::Transport(format!(
                "identity endpoint returned {status}: {text}"
            )));
        }

        let text = response
            .text()
            .await
            .map_err(|err| AuthError::Transport(err.to_string()))?;
        parse_token_response(&text, &self.endpoint)
    }
}

/// 解析 `POST /tokens` 响应体为 [`AuthGrant`]。
///
/// 服务目录按规范化后的 type 建索引；缺少 region 的端点记为 `ALL`。
pub fn parse_token_response(body: &str, auth_endpoint: &str) -> Result<AuthGrant, AuthError> {
    let parsed: TokenResponse =
        serde_json::from_str(body).map_err(|err| AuthError::Response(err.to_string()))?;
    let access = parsed.access;
    if access.token.id.is_empty() {
        return Err(AuthError::Response("empty token id".to_string()));
    }
    let tenant = access
        .token
        .tenant
        .ok_or_else(|| AuthError::Response("token has no tenant".to_string()))?;

    let mut services = ServiceCatalog::new();
    for service in access.service_catalog {
        let name = normalize_service_type(&service.service_type);
        for endpoint in service.endpoints {
            let Some(public_url) = endpoint.public_url else {
                continue;
            };
            let region = endpoint.region.unwrap_or_else(|| ALL_REGIONS.to_string());
            services.insert(
                name.clone(),
                region,
                EndpointEntry {
                    public_url,
                    internal_url: endpoint.internal_url,
                    tenant_id: endpoint.tenant_id,
                },
            );
        }
    }

    Ok(AuthGrant {
        token: access.token.id,
        tenant_id: tenant.id,
        tenant_name: tenant.name,
        auth_endpoint: auth_endpoint.to_string(),
        services,
    })
}
