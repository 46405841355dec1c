pub mod bridge;
pub mod config;
pub mod errors;
pub mod oidc;

use std::sync::Arc;

use uuid::Uuid;

pub use config::PluginConfig;
pub use errors::{AuthenticationError, Cause, ErrorKind, OidcErrorCode};
pub use oidc::{
    context::{AuthenticationContext, AuthenticationContextBuilder},
    ext::{AssertionType, CredentialsType, PromptBehavior},
    request::{TokenRequest, TokenRequestBuilder},
    result::{AuthenticationResult, AuthenticationStatus, TokenItem},
};

/// Entry point of the plugin: a validated context plus the configuration it came from
#[derive(Clone)]
pub struct OidcPlugin {
    pub config: PluginConfig,
    pub context: Arc<AuthenticationContext>,
}

impl OidcPlugin {
    pub fn from_env() -> Result<Self, AuthenticationError> {
        Self::new(PluginConfig::from_env()?)
    }

    pub fn new(config: PluginConfig) -> Result<Self, AuthenticationError> {
        let context = Arc::new(config.context()?);
        Ok(Self { config, context })
    }

    /// Builds the configured token request and validates it against the context
    pub fn prepare(&self) -> Result<(TokenRequest, Uuid), AuthenticationError> {
        let request = self.config.token_request()?;
        let correlation_id = self.context.validate_request(&request)?;
        Ok((request, correlation_id))
    }

    /// Bridge payload for `prepare`, or the failed result when validation rejects it
    pub fn prepare_payload(&self) -> serde_json::Value {
        match self.prepare() {
            Ok((request, correlation_id)) => {
                bridge::request_payload(&self.context, &request, correlation_id)
            }
            Err(error) => bridge::result_payload(&AuthenticationResult::from_error(
                error,
                self.context.correlation_id(),
            )),
        }
    }
}
