//! 开发用登录工具：读取凭据文件，认证并连接所有启用的服务。

use rax_auth::{DEFAULT_IDENTITY_ENDPOINT, KeystoneProvider};
use rax_config::SessionConfig;
use rax_session::Session;
use rax_telemetry::{init_tracing, metrics};
use std::env;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

/// 凭据文件路径环境变量。
const CREDENTIALS_FILE_ENV: &str = "RAX_CREDENTIALS_FILE";
/// 用户目录下的默认凭据文件名。
const DEFAULT_CREDENTIALS_FILE: &str = ".rackspace_cloud_credentials";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 加载本地 .env（如存在），便于直接 cargo run 启动
    dotenvy::dotenv().ok();
    // 初始化结构化日志
    init_tracing();
    // 配置文件 + 环境变量覆盖
    let config = SessionConfig::load()?;

    let endpoint = identity_endpoint(&config);
    let provider = Arc::new(KeystoneProvider::new(endpoint)?);
    let path = credentials_path(env::var(CREDENTIALS_FILE_ENV).ok(), dirs::home_dir())
        .ok_or("cannot locate credential file; set RAX_CREDENTIALS_FILE")?;

    let mut session = Session::new(config, provider);
    session.set_credential_file(&path, true).await?;

    info!(
        enabled = ?session.config().services.enabled(),
        default_region = session.default_region().unwrap_or("-"),
        "session configured"
    );
    for kind in session.connected_services() {
        if let Some(client) = session.client(kind) {
            info!(
                service = %kind,
                region = client.region().unwrap_or("-"),
                endpoint = %client.endpoint(),
                tenant = %client.auth().tenant_name,
                user_agent = %client.user_agent(),
                "connected"
            );
        }
    }
    info!(
        session_id = %session.session_id(),
        tenant = %session.identity().tenant_name(),
        metrics = ?metrics().snapshot(),
        "login complete"
    );
    Ok(())
}

fn identity_endpoint(config: &SessionConfig) -> String {
    config
        .identity_endpoint
        .clone()
        .unwrap_or_else(|| DEFAULT_IDENTITY_ENDPOINT.to_string())
}

/// 凭据文件路径：环境变量优先，否则为用户目录下的默认文件。
fn credentials_path(explicit: Option<String>, home: Option<PathBuf>) -> Option<PathBuf> {
    explicit
        .filter(|path| !path.is_empty())
        .map(PathBuf::from)
        .or_else(|| home.map(|home| home.join(DEFAULT_CREDENTIALS_FILE)))
}
