use crate::{
    errors::{AuthenticationError, OidcErrorCode},
    oidc::{
        context::{AuthenticationContext, AuthenticationContextBuilder},
        request::TokenRequest,
    },
};

/// Plugin settings, usually read from the environment (or a `.env` file)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PluginConfig {
    pub authority: String,
    pub token_endpoint: Option<String>,
    pub response_type: Option<String>,
    pub validate_authority: bool,
    pub client_id: String,
    pub resource: String,
    pub redirect_uri: Option<String>,
}

impl PluginConfig {
    pub fn from_env() -> Result<Self, AuthenticationError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, AuthenticationError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |name: &str| {
            lookup(name).filter(|value| !value.trim().is_empty()).ok_or_else(|| {
                tracing::error!("Missing configuration variable {}", name);
                AuthenticationError::usage(
                    OidcErrorCode::DeveloperConfigurationMissing,
                    format!("{} is not set", name),
                )
            })
        };

        let validate_authority = match lookup("OIDC_VALIDATE_AUTHORITY") {
            Some(value) => parse_bool("OIDC_VALIDATE_AUTHORITY", &value)?,
            None => true,
        };

        Ok(Self {
            authority: required("OIDC_AUTHORITY")?,
            token_endpoint: lookup("OIDC_TOKEN_ENDPOINT"),
            response_type: lookup("OIDC_RESPONSE_TYPE"),
            validate_authority,
            client_id: required("OIDC_CLIENT_ID")?,
            resource: required("OIDC_RESOURCE")?,
            redirect_uri: lookup("OIDC_REDIRECT_URI"),
        })
    }

    pub fn context(&self) -> Result<AuthenticationContext, AuthenticationError> {
        let mut builder = AuthenticationContextBuilder::new(self.authority.clone())
            .with_validate_authority(self.validate_authority);
        if let Some(token_endpoint) = &self.token_endpoint {
            builder = builder.with_token_endpoint(token_endpoint.clone());
        }
        if let Some(response_type) = &self.response_type {
            builder = builder.with_response_type(response_type.clone());
        }
        builder.build()
    }

    pub fn token_request(&self) -> Result<TokenRequest, AuthenticationError> {
        let mut builder = TokenRequest::builder(self.resource.clone(), self.client_id.clone());
        if let Some(redirect_uri) = &self.redirect_uri {
            builder = builder.with_redirect_uri(redirect_uri.clone());
        }
        builder.build()
    }
}

fn parse_bool(name: &str, value: &str) -> Result<bool, AuthenticationError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Ok(true),
        "false" | "0" | "no" => Ok(false),
        _ => {
            tracing::error!("Invalid boolean for {}: {}", name, value);
            Err(AuthenticationError::usage(
                OidcErrorCode::InvalidArgument,
                format!("{} must be true or false, got '{}'", name, value),
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    fn complete() -> Vec<(&'static str, &'static str)> {
        vec![
            ("OIDC_AUTHORITY", "https://login.example.com/contoso"),
            ("OIDC_CLIENT_ID", "my-client"),
            ("OIDC_RESOURCE", "https://graph.example.com"),
            ("OIDC_REDIRECT_URI", "com.example.app://auth"),
        ]
    }

    #[test]
    fn test_complete_config() {
        let config = PluginConfig::from_lookup(lookup(&complete())).unwrap();
        assert_eq!(config.authority, "https://login.example.com/contoso");
        assert!(config.validate_authority);
        assert_eq!(config.token_endpoint, None);

        let context = config.context().unwrap();
        assert_eq!(
            context.token_url().as_str(),
            "https://login.example.com/contoso/oauth2/token"
        );
        let request = config.token_request().unwrap();
        assert_eq!(request.client_id(), "my-client");
        assert_eq!(
            request.redirect_uri().map(|uri| uri.as_str()),
            Some("com.example.app://auth")
        );
    }

    #[tracing_test::traced_test]
    #[test]
    fn test_missing_required_variable() {
        let vars: Vec<_> = complete()
            .into_iter()
            .filter(|(name, _)| *name != "OIDC_CLIENT_ID")
            .collect();
        let error = PluginConfig::from_lookup(lookup(&vars)).unwrap_err();
        assert!(error.is_usage());
        assert_eq!(error.code(), OidcErrorCode::DeveloperConfigurationMissing);
        assert!(error.message().contains("OIDC_CLIENT_ID"));
        assert!(logs_contain("Missing configuration variable OIDC_CLIENT_ID"));
    }

    #[test]
    fn test_validate_authority_flag() {
        let mut vars = complete();
        vars.push(("OIDC_VALIDATE_AUTHORITY", "false"));
        vars[0] = ("OIDC_AUTHORITY", "http://localhost:8080/realms/app");
        let config = PluginConfig::from_lookup(lookup(&vars)).unwrap();
        assert!(!config.validate_authority);
        assert!(config.context().is_ok());

        let mut vars = complete();
        vars.push(("OIDC_VALIDATE_AUTHORITY", "maybe"));
        let error = PluginConfig::from_lookup(lookup(&vars)).unwrap_err();
        assert_eq!(error.code(), OidcErrorCode::InvalidArgument);
    }
}
