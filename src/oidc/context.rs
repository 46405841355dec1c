use std::sync::Arc;

use url::Url;
use uuid::Uuid;

use crate::errors::{AuthenticationError, OidcErrorCode};

use super::{
    ext::{CredentialsType, PromptBehavior},
    request::TokenRequest,
};

pub const DEFAULT_TOKEN_ENDPOINT: &str = "/oauth2/token";
pub const DEFAULT_RESPONSE_TYPE: &str = "code";

/// One context per OIDC authority. Construction validates the authority,
/// so a context that exists is always usable.
#[derive(Debug, Clone)]
pub struct AuthenticationContext {
    authority: Url,
    token_url: Url,
    token_endpoint: String,
    response_type: String,
    validate_authority: bool,
    correlation_id: Option<Uuid>,
    credentials_type: CredentialsType,
    extended_lifetime_enabled: bool,
    log_component: Option<String>,
}

pub struct AuthenticationContextBuilder {
    authority: String,
    token_endpoint: Option<String>,
    response_type: Option<String>,
    validate_authority: bool,
    correlation_id: Option<Uuid>,
    credentials_type: CredentialsType,
    extended_lifetime_enabled: bool,
    log_component: Option<String>,
}

impl AuthenticationContextBuilder {
    pub fn new(authority: impl Into<String>) -> Self {
        Self {
            authority: authority.into(),
            token_endpoint: None,
            response_type: None,
            validate_authority: true,
            correlation_id: None,
            credentials_type: CredentialsType::default(),
            extended_lifetime_enabled: false,
            log_component: None,
        }
    }

    /// URL suffix of the token endpoint, e.g. `/oauth2/v1` or `/connect/token`
    pub fn with_token_endpoint(mut self, token_endpoint: impl Into<String>) -> Self {
        self.token_endpoint = Some(token_endpoint.into());
        self
    }

    pub fn with_response_type(mut self, response_type: impl Into<String>) -> Self {
        self.response_type = Some(response_type.into());
        self
    }

    pub fn with_validate_authority(mut self, validate_authority: bool) -> Self {
        self.validate_authority = validate_authority;
        self
    }

    pub fn with_correlation_id(mut self, correlation_id: Uuid) -> Self {
        self.correlation_id = Some(correlation_id);
        self
    }

    pub fn with_credentials_type(mut self, credentials_type: CredentialsType) -> Self {
        self.credentials_type = credentials_type;
        self
    }

    pub fn with_extended_lifetime(mut self, enabled: bool) -> Self {
        self.extended_lifetime_enabled = enabled;
        self
    }

    pub fn with_log_component(mut self, log_component: impl Into<String>) -> Self {
        self.log_component = Some(log_component.into());
        self
    }

    pub fn build(self) -> Result<AuthenticationContext, AuthenticationError> {
        let authority = self.authority.trim().trim_end_matches('/');
        if authority.is_empty() {
            let code = OidcErrorCode::DeveloperAuthorityIsEmpty;
            tracing::warn!(code = %code, "Rejected authority: empty");
            return Err(AuthenticationError::usage(code, "The authority must not be empty"));
        }

        let authority_url = Url::parse(authority).map_err(|e| {
            let code = OidcErrorCode::DeveloperAuthorityIsNotValidUrl;
            tracing::warn!(code = %code, "Rejected authority '{}': {}", authority, e);
            AuthenticationError::usage_with_cause(
                code,
                format!("The authority '{}' is not a valid URL", authority),
                Arc::new(e),
            )
        })?;
        if authority_url.cannot_be_a_base() || authority_url.host_str().is_none() {
            let code = OidcErrorCode::DeveloperAuthorityIsNotValidUrl;
            tracing::warn!(
                code = %code,
                "Rejected authority '{}': not a hierarchical URL",
                authority
            );
            return Err(AuthenticationError::usage(
                code,
                format!("The authority '{}' is not a valid URL", authority),
            ));
        }

        if self.validate_authority {
            validate_instance(&authority_url)?;
        }

        let token_endpoint = match self.token_endpoint {
            Some(token_endpoint) => {
                let token_endpoint = token_endpoint.trim().to_string();
                if token_endpoint.is_empty() {
                    let code = OidcErrorCode::DeveloperTokenEndpointIsEmpty;
                    tracing::warn!(code = %code, "Rejected token endpoint: empty");
                    return Err(AuthenticationError::usage(
                        code,
                        "The token endpoint must not be empty",
                    ));
                }
                if !token_endpoint.starts_with('/') {
                    let code = OidcErrorCode::InvalidArgument;
                    tracing::warn!(
                        code = %code,
                        "Rejected token endpoint '{}': not a path",
                        token_endpoint
                    );
                    return Err(AuthenticationError::usage(
                        code,
                        format!("The token endpoint '{}' must start with '/'", token_endpoint),
                    ));
                }
                token_endpoint
            }
            None => DEFAULT_TOKEN_ENDPOINT.to_string(),
        };

        let response_type = match self.response_type {
            Some(response_type) if response_type.trim().is_empty() => {
                let code = OidcErrorCode::DeveloperResponseTypeIsEmpty;
                tracing::warn!(code = %code, "Rejected response type: empty");
                return Err(AuthenticationError::usage(code, "The response type must not be empty"));
            }
            Some(response_type) => response_type.trim().to_string(),
            None => DEFAULT_RESPONSE_TYPE.to_string(),
        };

        let token_url = token_url(&authority_url, &token_endpoint);

        tracing::debug!("Created authentication context for {}", authority);
        Ok(AuthenticationContext {
            authority: authority_url,
            token_url,
            token_endpoint,
            response_type,
            validate_authority: self.validate_authority,
            correlation_id: self.correlation_id,
            credentials_type: self.credentials_type,
            extended_lifetime_enabled: self.extended_lifetime_enabled,
            log_component: self.log_component,
        })
    }
}

/// Appends the endpoint to the authority path. Query and fragment of the
/// authority never carry over to the token URL.
fn token_url(authority: &Url, token_endpoint: &str) -> Url {
    let mut token_url = authority.clone();
    let path = format!("{}{}", authority.path().trim_end_matches('/'), token_endpoint);
    token_url.set_path(&path);
    token_url.set_query(None);
    token_url.set_fragment(None);
    token_url
}

fn validate_instance(authority: &Url) -> Result<(), AuthenticationError> {
    let code = OidcErrorCode::DeveloperAuthorityIsNotValidInstance;
    if authority.scheme() != "https" {
        tracing::warn!(code = %code, "Rejected authority '{}': not https", authority);
        return Err(AuthenticationError::usage(
            code,
            format!("The authority '{}' must use https", authority),
        ));
    }
    if authority.query().is_some() || authority.fragment().is_some() {
        tracing::warn!(
            code = %code,
            "Rejected authority '{}': carries a query or fragment",
            authority
        );
        return Err(AuthenticationError::usage(
            code,
            format!("The authority '{}' must not carry a query or fragment", authority),
        ));
    }
    Ok(())
}

impl AuthenticationContext {
    pub fn builder(authority: impl Into<String>) -> AuthenticationContextBuilder {
        AuthenticationContextBuilder::new(authority)
    }

    /// Authority without its trailing slash
    pub fn authority(&self) -> &str {
        self.authority.as_str().trim_end_matches('/')
    }

    pub fn token_endpoint(&self) -> &str {
        &self.token_endpoint
    }

    pub fn token_url(&self) -> &Url {
        &self.token_url
    }

    pub fn response_type(&self) -> &str {
        &self.response_type
    }

    pub fn validate_authority(&self) -> bool {
        self.validate_authority
    }

    pub fn correlation_id(&self) -> Option<Uuid> {
        self.correlation_id
    }

    pub fn credentials_type(&self) -> CredentialsType {
        self.credentials_type
    }

    pub fn extended_lifetime_enabled(&self) -> bool {
        self.extended_lifetime_enabled
    }

    pub fn log_component(&self) -> Option<&str> {
        self.log_component.as_deref()
    }

    /// Checks a request against this context and returns the correlation id
    /// the request runs under.
    pub fn validate_request(&self, request: &TokenRequest) -> Result<Uuid, AuthenticationError> {
        if request.assertion().is_some() && request.prompt_behavior() != PromptBehavior::Auto {
            let code = OidcErrorCode::InvalidArgument;
            tracing::warn!(
                code = %code,
                "Rejected assertion request with prompt behavior {}",
                request.prompt_behavior().as_str()
            );
            return Err(AuthenticationError::usage(
                code,
                "An assertion request cannot prompt the user",
            ));
        }

        let correlation_id = request
            .correlation_id()
            .or(self.correlation_id)
            .unwrap_or_else(Uuid::new_v4);
        tracing::debug!(
            "Validated token request for resource {} with correlation id {}",
            request.resource(),
            correlation_id
        );
        Ok(correlation_id)
    }
}
