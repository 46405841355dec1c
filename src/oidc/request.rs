use std::sync::Arc;

use url::{form_urlencoded, Url};
use uuid::Uuid;

use crate::errors::{AuthenticationError, OidcErrorCode};

use super::ext::{AssertionType, PromptBehavior};

/// A validated description of a token request. Nothing here talks to the network.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenRequest {
    resource: String,
    client_id: String,
    redirect_uri: Option<Url>,
    user_id: Option<String>,
    prompt_behavior: PromptBehavior,
    extra_query_parameters: Vec<(String, String)>,
    assertion: Option<(String, AssertionType)>,
    correlation_id: Option<Uuid>,
}

impl TokenRequest {
    pub fn builder(
        resource: impl Into<String>,
        client_id: impl Into<String>,
    ) -> TokenRequestBuilder {
        TokenRequestBuilder::new(resource, client_id)
    }

    pub fn resource(&self) -> &str {
        &self.resource
    }

    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    pub fn redirect_uri(&self) -> Option<&Url> {
        self.redirect_uri.as_ref()
    }

    pub fn user_id(&self) -> Option<&str> {
        self.user_id.as_deref()
    }

    pub fn prompt_behavior(&self) -> PromptBehavior {
        self.prompt_behavior
    }

    pub fn extra_query_parameters(&self) -> &[(String, String)] {
        &self.extra_query_parameters
    }

    pub fn assertion(&self) -> Option<(&str, AssertionType)> {
        self.assertion
            .as_ref()
            .map(|(assertion, assertion_type)| (assertion.as_str(), *assertion_type))
    }

    pub fn correlation_id(&self) -> Option<Uuid> {
        self.correlation_id
    }
}

pub struct TokenRequestBuilder {
    resource: String,
    client_id: String,
    redirect_uri: Option<String>,
    user_id: Option<String>,
    prompt_behavior: PromptBehavior,
    extra_query_parameters: Option<String>,
    assertion: Option<(String, AssertionType)>,
    correlation_id: Option<Uuid>,
}

impl TokenRequestBuilder {
    pub fn new(resource: impl Into<String>, client_id: impl Into<String>) -> Self {
        Self {
            resource: resource.into(),
            client_id: client_id.into(),
            redirect_uri: None,
            user_id: None,
            prompt_behavior: PromptBehavior::default(),
            extra_query_parameters: None,
            assertion: None,
            correlation_id: None,
        }
    }

    pub fn with_redirect_uri(mut self, redirect_uri: impl Into<String>) -> Self {
        self.redirect_uri = Some(redirect_uri.into());
        self
    }

    pub fn with_user_id(mut self, user_id: Option<String>) -> Self {
        self.user_id = user_id;
        self
    }

    pub fn with_prompt_behavior(mut self, prompt_behavior: PromptBehavior) -> Self {
        self.prompt_behavior = prompt_behavior;
        self
    }

    /// Query string appended to the authorization request, e.g. `domain_hint=contoso.com`
    pub fn with_extra_query_parameters(mut self, parameters: impl Into<String>) -> Self {
        self.extra_query_parameters = Some(parameters.into());
        self
    }

    pub fn with_assertion(
        mut self,
        assertion: impl Into<String>,
        assertion_type: AssertionType,
    ) -> Self {
        self.assertion = Some((assertion.into(), assertion_type));
        self
    }

    pub fn with_correlation_id(mut self, correlation_id: Uuid) -> Self {
        self.correlation_id = Some(correlation_id);
        self
    }

    pub fn build(self) -> Result<TokenRequest, AuthenticationError> {
        let resource = self.resource.trim();
        if resource.is_empty() {
            let code = OidcErrorCode::DeveloperResourceIsEmpty;
            tracing::warn!(code = %code, "Rejected token request: empty resource");
            return Err(AuthenticationError::usage(code, "The resource must not be empty"));
        }

        let client_id = self.client_id.trim();
        if client_id.is_empty() {
            let code = OidcErrorCode::DeveloperClientIdIsEmpty;
            tracing::warn!(code = %code, "Rejected token request: empty client id");
            return Err(AuthenticationError::usage(code, "The client id must not be empty"));
        }

        let redirect_uri = self
            .redirect_uri
            .map(|redirect_uri| {
                Url::parse(redirect_uri.trim()).map_err(|e| {
                    let code = OidcErrorCode::DeveloperRedirectUriInvalid;
                    tracing::warn!(code = %code, "Rejected redirect uri '{}': {}", redirect_uri, e);
                    AuthenticationError::usage_with_cause(
                        code,
                        format!("Invalid redirect uri '{}'", redirect_uri),
                        Arc::new(e),
                    )
                })
            })
            .transpose()?;

        if let Some((assertion, _)) = &self.assertion {
            if assertion.trim().is_empty() {
                let code = OidcErrorCode::DeveloperAssertionIsEmpty;
                tracing::warn!(code = %code, "Rejected token request: empty assertion");
                return Err(AuthenticationError::usage(code, "The assertion must not be empty"));
            }
        }

        let extra_query_parameters = match &self.extra_query_parameters {
            Some(parameters) => parse_extra_query_parameters(parameters)?,
            None => Vec::new(),
        };

        // An empty user id means "any user"
        let user_id = self.user_id.filter(|user_id| !user_id.trim().is_empty());

        Ok(TokenRequest {
            resource: resource.to_string(),
            client_id: client_id.to_string(),
            redirect_uri,
            user_id,
            prompt_behavior: self.prompt_behavior,
            extra_query_parameters,
            assertion: self.assertion,
            correlation_id: self.correlation_id,
        })
    }
}

fn parse_extra_query_parameters(
    parameters: &str,
) -> Result<Vec<(String, String)>, AuthenticationError> {
    let parameters = parameters.trim().trim_start_matches('&');
    form_urlencoded::parse(parameters.as_bytes())
        .map(|(key, value)| {
            if key.is_empty() {
                let code = OidcErrorCode::InvalidArgument;
                tracing::warn!(code = %code, "Rejected extra query parameters '{}'", parameters);
                return Err(AuthenticationError::usage(
                    code,
                    format!("Extra query parameter without a name in '{}'", parameters),
                ));
            }
            Ok((key.into_owned(), value.into_owned()))
        })
        .collect()
}
