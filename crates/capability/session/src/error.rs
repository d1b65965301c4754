use rax_auth::AuthError;
use rax_config::ConfigError;
use rax_connect::ConnectError;
use rax_endpoint::EndpointError;

/// 会话层错误。
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("authentication required before calling '{operation}'")]
    NotAuthenticated { operation: String },
    #[error("authentication failed: {0}")]
    AuthenticationFailed(#[source] AuthError),
    #[error("invalid configuration file {path}: {reason}")]
    InvalidConfigurationFile { path: String, reason: String },
    #[error("invalid credential file {path}: {reason}")]
    InvalidCredentialFile { path: String, reason: String },
    #[error("no endpoint for service '{service}' in region '{region}'")]
    EndpointResolutionFailed { service: String, region: String },
}

impl From<AuthError> for SessionError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::InvalidCredentialFile { path, reason } => {
                SessionError::InvalidCredentialFile { path, reason }
            }
            other => SessionError::AuthenticationFailed(other),
        }
    }
}

impl From<ConfigError> for SessionError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::InvalidConfigurationFile { path, reason } => {
                SessionError::InvalidConfigurationFile { path, reason }
            }
        }
    }
}

impl From<EndpointError> for SessionError {
    fn from(err: EndpointError) -> Self {
        match err {
            EndpointError::ResolutionFailed { service, region } => {
                SessionError::EndpointResolutionFailed { service, region }
            }
        }
    }
}

impl From<ConnectError> for SessionError {
    fn from(err: ConnectError) -> Self {
        match err {
            ConnectError::NotAuthenticated { operation } => {
                SessionError::NotAuthenticated { operation }
            }
            ConnectError::Endpoint(err) => err.into(),
        }
    }
}
