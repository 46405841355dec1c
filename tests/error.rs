use std::{error::Error as _, sync::Arc};

use oidc_plugin::{
    bridge, AuthenticationContext, AuthenticationError, AuthenticationResult,
    AuthenticationStatus, Cause, ErrorKind, OidcErrorCode, OidcPlugin, PluginConfig, TokenRequest,
};

#[derive(Debug, thiserror::Error)]
#[error("expected ',' at line 1 column 17")]
struct ParseError;

fn config() -> PluginConfig {
    PluginConfig {
        authority: "https://login.example.com/contoso".to_string(),
        token_endpoint: None,
        response_type: None,
        validate_authority: true,
        client_id: "my-client".to_string(),
        resource: "https://graph.example.com".to_string(),
        redirect_uri: Some("com.example.app://auth".to_string()),
    }
}

#[test]
fn test_client_id_must_not_be_empty() {
    let error =
        AuthenticationError::usage(OidcErrorCode::InvalidArgument, "client id must not be empty");

    assert_eq!(error.code(), OidcErrorCode::InvalidArgument);
    assert_eq!(error.message(), "client id must not be empty");
    assert!(error.cause().is_none());
}

#[test]
fn test_token_parse_failed_keeps_cause() {
    let parse_error: Cause = Arc::new(ParseError);
    let error = AuthenticationError::usage_with_cause(
        OidcErrorCode::InvalidArgument,
        "token parse failed",
        parse_error.clone(),
    );

    assert_eq!(error.code(), OidcErrorCode::InvalidArgument);
    assert!(Arc::ptr_eq(error.cause().unwrap(), &parse_error));
    assert_eq!(
        error.source().map(|source| source.to_string()),
        Some("expected ',' at line 1 column 17".to_string())
    );
}

#[test]
fn test_usage_errors_narrow_from_result() {
    fn login(client_id: &str) -> Result<(), AuthenticationError> {
        TokenRequest::builder("https://graph.example.com", client_id).build()?;
        Err(AuthenticationError::network(
            OidcErrorCode::DeviceConnectionIsNotAvailable,
            "offline",
        ))
    }

    match login("") {
        Err(AuthenticationError::Usage { code, .. }) => {
            assert_eq!(code, OidcErrorCode::DeveloperClientIdIsEmpty)
        }
        other => panic!("expected a usage error, got {:?}", other),
    }

    let error = login("my-client").unwrap_err();
    assert_eq!(error.kind(), ErrorKind::Network);
    assert!(!error.is_usage());
}

#[test]
fn test_plugin_prepares_request() {
    let plugin = OidcPlugin::new(config()).expect("valid configuration");
    let (request, correlation_id) = plugin.prepare().expect("valid request");

    assert_eq!(request.resource(), "https://graph.example.com");
    assert!(!correlation_id.is_nil());

    let payload = plugin.prepare_payload();
    assert_eq!(payload["tokenUrl"], "https://login.example.com/contoso/oauth2/token");
    assert_eq!(payload["clientId"], "my-client");
    assert_eq!(payload["promptBehavior"], "auto");
}

#[test]
fn test_plugin_reports_usage_error_payload() {
    let mut config = config();
    config.redirect_uri = Some("::not a uri".to_string());
    let plugin = OidcPlugin::new(config).expect("valid context");

    let payload = plugin.prepare_payload();
    assert_eq!(payload["status"], "failed");
    assert_eq!(payload["errorKind"], "usage");
    assert_eq!(payload["errorCode"], "DEVELOPER_REDIRECT_URI_INVALID");
    assert_eq!(payload["errorDetails"].as_array().map(|details| details.len()), Some(1));
}

#[test]
fn test_plugin_rejects_invalid_authority() {
    let mut config = config();
    config.authority = "http://login.example.com/contoso".to_string();

    let error = OidcPlugin::new(config).err().expect("http authority should be rejected");
    assert!(error.is_usage());
    assert_eq!(error.code(), OidcErrorCode::DeveloperAuthorityIsNotValidInstance);
}

#[test]
fn test_cancellation_is_not_a_usage_error() {
    let result = AuthenticationResult::from_cancellation(None);
    assert_eq!(result.status(), AuthenticationStatus::UserCancelled);
    assert!(!result.error().unwrap().is_usage());

    let payload = bridge::result_payload(&result);
    assert_eq!(payload["status"], "user_cancelled");
    assert_eq!(payload["errorCode"], "AUTH_FAILED_CANCELLED");
}

#[test]
fn test_context_errors_display_for_integrators() {
    let error = AuthenticationContext::builder("").build().unwrap_err();
    assert_eq!(
        error.to_string(),
        "usage error [DEVELOPER_AUTHORITY_IS_EMPTY]: The authority must not be empty"
    );
}
