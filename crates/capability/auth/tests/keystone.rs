use rax_auth::{AuthError, DEFAULT_IDENTITY_ENDPOINT, parse_token_response};

const TOKEN_BODY: &str = r#"{
  "access": {
    "token": {
      "id": "b9b51ede-62c6-4e78-aea6-1880c4409b7b",
      "expires": "2012-10-20T20:34:25.000-05:00",
      "tenant": { "id": "728829", "name": "728829" }
    },
    "serviceCatalog": [
      {
        "name": "cloudServersOpenStack",
        "type": "compute",
        "endpoints": [
          { "region": "DFW", "tenantId": "728829", "publicURL": "https://dfw.servers.api.rackspacecloud.com/v2/728829" },
          { "region": "ORD", "tenantId": "728829", "publicURL": "https://ord.servers.api.rackspacecloud.com/v2/728829" }
        ]
      },
      {
        "name": "cloudFiles",
        "type": "object-store",
        "endpoints": [
          { "region": "ORD", "tenantId": "MossoCloudFS_abc",
            "publicURL": "https://storage101.ord1.clouddrive.com/v1/MossoCloudFS_abc",
            "internalURL": "https://snet-storage101.ord1.clouddrive.com/v1/MossoCloudFS_abc" }
        ]
      },
      {
        "name": "cloudFilesCDN",
        "type": "rax:object-cdn",
        "endpoints": [
          { "region": "ORD", "publicURL": "https://cdn2.clouddrive.com/v1/MossoCloudFS_abc" }
        ]
      },
      {
        "name": "cloudDNS",
        "type": "rax:dns",
        "endpoints": [
          { "publicURL": "https://dns.api.rackspacecloud.com/v1.0/728829" }
        ]
      },
      {
        "name": "cloudDatabases",
        "type": "rax:database",
        "endpoints": [
          { "region": "ORD", "publicURL": "https://ord.databases.api.rackspacecloud.com/v1.0/728829" }
        ]
      }
    ]
  }
}"#;

#[test]
fn parses_token_and_tenant() {
    let grant = parse_token_response(TOKEN_BODY, DEFAULT_IDENTITY_ENDPOINT).expect("parse");
    assert_eq!(grant.token, "b9b51ede-62c6-4e78-aea6-1880c4409b7b");
    assert_eq!(grant.tenant_id, "728829");
    assert_eq!(grant.tenant_name, "728829");
    assert_eq!(grant.auth_endpoint, DEFAULT_IDENTITY_ENDPOINT);
}

#[test]
fn catalog_keys_are_normalized() {
    let grant = parse_token_response(TOKEN_BODY, DEFAULT_IDENTITY_ENDPOINT).expect("parse");
    let names: Vec<&str> = grant.services.service_names().collect();
    assert_eq!(
        names,
        vec!["compute", "database", "dns", "object_cdn", "object_store"]
    );
    assert_eq!(
        grant.services.public_url("compute", "ORD"),
        Some("https://ord.servers.api.rackspacecloud.com/v2/728829")
    );
    let files = grant
        .services
        .endpoint("object_store", "ORD")
        .expect("object store");
    assert_eq!(
        files.internal_url.as_deref(),
        Some("https://snet-storage101.ord1.clouddrive.com/v1/MossoCloudFS_abc")
    );
    assert_eq!(files.tenant_id.as_deref(), Some("MossoCloudFS_abc"));
}

#[test]
fn regionless_endpoint_stored_under_all() {
    let grant = parse_token_response(TOKEN_BODY, DEFAULT_IDENTITY_ENDPOINT).expect("parse");
    assert_eq!(
        grant.services.public_url("dns", "ALL"),
        Some("https://dns.api.rackspacecloud.com/v1.0/728829")
    );
    assert_eq!(grant.services.regions("dns"), vec!["ALL"]);
}

#[test]
fn missing_tenant_rejected() {
    let body = r#"{"access":{"token":{"id":"abc"},"serviceCatalog":[]}}"#;
    let result = parse_token_response(body, DEFAULT_IDENTITY_ENDPOINT);
    assert!(matches!(result, Err(AuthError::Response(_))));
}

#[test]
fn empty_token_rejected() {
    let body = r#"{"access":{"token":{"id":"","tenant":{"id":"1","name":"1"}}}}"#;
    let result = parse_token_response(body, DEFAULT_IDENTITY_ENDPOINT);
    assert!(matches!(result, Err(AuthError::Response(_))));
}

#[test]
fn non_json_body_rejected() {
    let result = parse_token_response("<html>nope</html>", DEFAULT_IDENTITY_ENDPOINT);
    assert!(matches!(result, Err(AuthError::Response(_))));
}
