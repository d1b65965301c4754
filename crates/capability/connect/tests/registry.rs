use std::sync::Arc;

use domain::{ALL_REGIONS, ServiceCatalog, ServiceKind};
use rax_auth::{Identity, InMemoryIdentityProvider};
use rax_connect::{
    BlockStorageConnector, ComputeConnector, ConnectError, Connector, ConnectorRegistry,
    DatabaseConnector, IdentityAdminConnector, LoadBalancerConnector, ObjectStoreConnector,
    ServiceClient, VERSION, user_agent,
};
use rax_endpoint::EndpointError;

fn catalog() -> ServiceCatalog {
    ServiceCatalog::new()
        .with_endpoint("compute", "ORD", "https://ord.servers.example.com/v2/123")
        .with_endpoint("compute", ALL_REGIONS, "https://servers.example.com/v2/123")
        .with_endpoint("object_store", "ORD", "https://storage.ord.example.com/v1/abc")
        .with_endpoint("object_cdn", "ORD", "https://cdn.ord.example.com/v1/abc")
        .with_endpoint("load_balancer", ALL_REGIONS, "https://loadbalancers.example.com/v1.0/123")
        .with_endpoint("database", ALL_REGIONS, "https://databases.example.com/v1.0/123")
}

async fn authenticated() -> Identity {
    let provider = InMemoryIdentityProvider::new()
        .with_account("alice", "key-1")
        .with_tenant("123", "123456")
        .with_catalog(catalog());
    let mut identity = Identity::new(Arc::new(provider));
    identity
        .set_credentials("alice", "key-1", true)
        .await
        .expect("authenticate");
    identity
}

#[test]
fn user_agent_format() {
    assert_eq!(
        user_agent(ServiceKind::Servers),
        format!("rax-client-servers:rax/{VERSION}")
    );
    assert_eq!(
        user_agent(ServiceKind::LoadBalancers),
        format!("rax-client-loadbalancers:rax/{VERSION}")
    );
}

#[cfg(feature = "dns")]
#[test]
fn standard_registry_covers_every_service() {
    let registry = ConnectorRegistry::standard();
    assert_eq!(registry.services(), ServiceKind::ALL.to_vec());
}

#[tokio::test]
async fn unauthenticated_connect_fails() {
    let identity = Identity::new(Arc::new(InMemoryIdentityProvider::new()));
    let registry = ConnectorRegistry::standard();
    let err = registry
        .connect(ServiceKind::Servers, &identity, Some("ORD"), None)
        .expect_err("not authenticated");
    assert_eq!(
        err,
        ConnectError::NotAuthenticated {
            operation: "connect servers".to_string()
        }
    );
}

#[test]
fn connectors_refuse_unauthenticated_identity() {
    let identity = Identity::new(Arc::new(InMemoryIdentityProvider::new()));
    let mut connectors: Vec<Arc<dyn Connector>> = vec![
        Arc::new(ComputeConnector),
        Arc::new(ObjectStoreConnector),
        Arc::new(IdentityAdminConnector),
        Arc::new(LoadBalancerConnector),
        Arc::new(DatabaseConnector),
        Arc::new(BlockStorageConnector),
    ];
    #[cfg(feature = "dns")]
    connectors.push(Arc::new(rax_connect::DnsConnector));

    for connector in connectors {
        let kind = connector.service();
        let err = connector
            .build(&identity, "ORD")
            .expect_err("not authenticated");
        assert_eq!(
            err,
            ConnectError::NotAuthenticated {
                operation: format!("connect {kind}")
            }
        );
    }
}

#[tokio::test]
async fn compute_uses_exact_region() {
    let identity = authenticated().await;
    let registry = ConnectorRegistry::standard();
    let client = registry
        .connect(ServiceKind::Servers, &identity, Some("ORD"), Some("LON"))
        .expect("connect")
        .expect("registered");

    let ServiceClient::Compute(compute) = client else {
        panic!("expected compute client");
    };
    assert_eq!(compute.region, "ORD");
    assert_eq!(compute.management_url, "https://ord.servers.example.com/v2/123");
    assert_eq!(compute.auth.username, "alice");
    assert_eq!(compute.auth.tenant_name, "123456");
    assert_eq!(compute.auth.auth_token, identity.token());
    assert_eq!(compute.service_type, "compute");
    assert_eq!(compute.user_agent, user_agent(ServiceKind::Servers));
}

#[tokio::test]
async fn default_then_fallback_region() {
    let identity = authenticated().await;
    let registry = ConnectorRegistry::standard();

    let client = registry
        .connect(ServiceKind::Servers, &identity, None, Some("LON"))
        .expect("connect")
        .expect("registered");
    assert_eq!(client.region(), Some("LON"));
    assert_eq!(client.endpoint(), "https://lon.servers.example.com/v2/123");

    let client = registry
        .connect(ServiceKind::Databases, &identity, None, None)
        .expect("connect")
        .expect("registered");
    assert_eq!(client.region(), Some("DFW"));
    assert_eq!(client.endpoint(), "https://dfw.databases.example.com/v1.0/123");
}

#[tokio::test]
async fn object_store_resolves_storage_and_cdn() {
    let identity = authenticated().await;
    let registry = ConnectorRegistry::standard();
    let client = registry
        .connect(ServiceKind::Files, &identity, Some("ORD"), None)
        .expect("connect")
        .expect("registered");

    let ServiceClient::ObjectStore(files) = client else {
        panic!("expected object store client");
    };
    assert_eq!(files.storage_url, "https://storage.ord.example.com/v1/abc");
    assert_eq!(files.cdn_url, "https://cdn.ord.example.com/v1/abc");
    assert_eq!(files.endpoint_type, "publicURL");
}

#[tokio::test]
async fn object_store_without_endpoint_fails() {
    let identity = authenticated().await;
    let registry = ConnectorRegistry::standard();
    let err = registry
        .connect(ServiceKind::Files, &identity, Some("SYD"), None)
        .expect_err("no SYD storage");
    assert_eq!(
        err,
        ConnectError::Endpoint(EndpointError::ResolutionFailed {
            service: "object_store".to_string(),
            region: "SYD".to_string(),
        })
    );
}

#[tokio::test]
async fn keystone_uses_auth_endpoint() {
    let identity = authenticated().await;
    let registry = ConnectorRegistry::standard();
    let client = registry
        .connect(ServiceKind::Keystone, &identity, None, None)
        .expect("connect")
        .expect("registered");
    assert_eq!(client.endpoint(), identity.auth_endpoint());
    assert_eq!(client.auth().tenant_name, "123456");
    assert!(client.region().is_none());
}

#[tokio::test]
async fn unregistered_service_is_skipped() {
    let identity = authenticated().await;
    let registry = ConnectorRegistry::empty().with(Arc::new(ComputeConnector));
    assert!(!registry.contains(ServiceKind::Dns));
    let result = registry
        .connect(ServiceKind::Dns, &identity, None, None)
        .expect("skip");
    assert!(result.is_none());
}

#[test]
fn client_debug_hides_secrets() {
    let auth = rax_connect::ClientAuth {
        username: "alice".to_string(),
        api_key: "secret-key".to_string(),
        auth_token: "secret-token".to_string(),
        tenant_id: "123".to_string(),
        tenant_name: "123456".to_string(),
        auth_url: "memory://identity/v2.0/".to_string(),
    };
    let rendered = format!("{auth:?}");
    assert!(!rendered.contains("secret-key"));
    assert!(!rendered.contains("secret-token"));
}
