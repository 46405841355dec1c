//! JSON payloads posted back to the JavaScript side of the hybrid app.

use serde_json::{json, Map, Value};
use uuid::Uuid;

use crate::{
    errors::AuthenticationError,
    oidc::{
        context::AuthenticationContext,
        request::TokenRequest,
        result::{AuthenticationResult, AuthenticationStatus},
    },
};

pub fn error_payload(error: &AuthenticationError) -> Value {
    json!({
        "errorKind": error.kind().as_str(),
        "errorCode": error.code().as_str(),
        "errorDescription": error.message(),
        "errorDetails": error.cause_chain(),
    })
}

pub fn result_payload(result: &AuthenticationResult) -> Value {
    let mut payload = Map::new();
    payload.insert("status".to_string(), json!(result.status().as_str()));
    payload.insert(
        "correlationId".to_string(),
        json!(result.correlation_id().map(|id| id.to_string())),
    );

    if let Some(error) = result.error() {
        tracing::error!("Posting failed authentication result: {}", error);
        if let Value::Object(fields) = error_payload(error) {
            payload.extend(fields);
        }
    }

    if let (AuthenticationStatus::Succeeded, Some(token)) = (result.status(), result.token()) {
        payload.insert("accessToken".to_string(), json!(token.access_token));
        payload.insert("accessTokenType".to_string(), json!(token.token_type));
        payload.insert("expiresOn".to_string(), json!(token.expires_on.unix_timestamp()));
        payload.insert("idToken".to_string(), json!(token.id_token));
        payload.insert("resource".to_string(), json!(token.resource));
        payload.insert(
            "extendedLifetimeToken".to_string(),
            json!(result.extended_lifetime_token()),
        );
    }

    Value::Object(payload)
}

/// Describes a validated request before it is handed to the token flow
pub fn request_payload(
    context: &AuthenticationContext,
    request: &TokenRequest,
    correlation_id: Uuid,
) -> Value {
    let extra_query_parameters: Map<String, Value> = request
        .extra_query_parameters()
        .iter()
        .map(|(key, value)| (key.clone(), json!(value)))
        .collect();

    // The assertion itself is a credential and never leaves the plugin
    json!({
        "authority": context.authority(),
        "tokenUrl": context.token_url().as_str(),
        "responseType": context.response_type(),
        "resource": request.resource(),
        "clientId": request.client_id(),
        "redirectUri": request.redirect_uri().map(|uri| uri.as_str()),
        "userId": request.user_id(),
        "promptBehavior": request.prompt_behavior().as_str(),
        "extraQueryParameters": extra_query_parameters,
        "assertionType": request.assertion().map(|(_, assertion_type)| assertion_type.as_str()),
        "correlationId": correlation_id.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use time::OffsetDateTime;

    use super::*;
    use crate::{
        errors::OidcErrorCode,
        oidc::{ext::AssertionType, result::TokenItem},
    };

    #[derive(Debug, thiserror::Error)]
    #[error("connection reset")]
    struct Reset;

    #[test]
    fn test_error_payload() {
        let error = AuthenticationError::network_with_cause(
            OidcErrorCode::DeviceConnectionIsNotAvailable,
            "could not reach the authority",
            Arc::new(Reset),
        );
        assert_eq!(
            error_payload(&error),
            json!({
                "errorKind": "network",
                "errorCode": "DEVICE_CONNECTION_IS_NOT_AVAILABLE",
                "errorDescription": "could not reach the authority",
                "errorDetails": ["connection reset"],
            })
        );
    }

    #[test]
    fn test_failed_result_payload() {
        let correlation_id = Uuid::new_v4();
        let result = AuthenticationResult::from_parameter_error(
            "client id must not be empty",
            Some(correlation_id),
        );
        let payload = result_payload(&result);

        assert_eq!(payload["status"], "failed");
        assert_eq!(payload["correlationId"], correlation_id.to_string());
        assert_eq!(payload["errorKind"], "usage");
        assert_eq!(payload["errorCode"], "INVALID_ARGUMENT");
        assert!(payload.get("accessToken").is_none());
    }

    #[test]
    fn test_succeeded_result_payload() {
        let expires_on = OffsetDateTime::from_unix_timestamp(1_900_000_000).unwrap();
        let result = AuthenticationResult::from_token(
            TokenItem {
                access_token: "access".to_string(),
                token_type: "Bearer".to_string(),
                expires_on,
                id_token: Some("id".to_string()),
                resource: "https://graph.example.com".to_string(),
            },
            None,
        );
        let payload = result_payload(&result);

        assert_eq!(payload["status"], "succeeded");
        assert_eq!(payload["correlationId"], Value::Null);
        assert_eq!(payload["accessToken"], "access");
        assert_eq!(payload["expiresOn"], 1_900_000_000);
        assert!(payload.get("errorCode").is_none());
    }

    #[test]
    fn test_request_payload_carries_extras() {
        let context = AuthenticationContext::builder("https://login.example.com/contoso")
            .build()
            .unwrap();
        let request = TokenRequest::builder("https://graph.example.com", "client")
            .with_extra_query_parameters("domain_hint=contoso.com&login_hint=a%40b.com")
            .with_assertion("<saml:Assertion/>", AssertionType::Saml2)
            .build()
            .unwrap();
        let correlation_id = Uuid::new_v4();
        let payload = request_payload(&context, &request, correlation_id);

        assert_eq!(
            payload["extraQueryParameters"],
            json!({ "domain_hint": "contoso.com", "login_hint": "a@b.com" })
        );
        assert_eq!(payload["assertionType"], "saml2");
        assert_eq!(payload["correlationId"], correlation_id.to_string());
        assert!(!payload.to_string().contains("saml:Assertion"));
    }

    #[test]
    fn test_request_payload_without_extras() {
        let context = AuthenticationContext::builder("https://login.example.com/contoso")
            .build()
            .unwrap();
        let request = TokenRequest::builder("https://graph.example.com", "client")
            .build()
            .unwrap();
        let payload = request_payload(&context, &request, Uuid::new_v4());

        assert_eq!(payload["extraQueryParameters"], json!({}));
        assert_eq!(payload["assertionType"], Value::Null);
    }
}
