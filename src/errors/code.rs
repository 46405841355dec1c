use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("Unknown error code: {0}")]
pub struct UnknownCode(pub String);

macro_rules! error_codes {
    ($($(#[$meta:meta])* $variant:ident => $name:literal, $description:literal;)+) => {
        /// Closed set of codes classifying what went wrong during authentication
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(try_from = "String", into = "&'static str")]
        pub enum OidcErrorCode {
            $($(#[$meta])* $variant,)+
        }

        impl OidcErrorCode {
            pub const ALL: &'static [OidcErrorCode] = &[$(OidcErrorCode::$variant,)+];

            /// Stable name, as written in logs and in serialized errors
            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $name,)+
                }
            }

            pub fn description(&self) -> &'static str {
                match self {
                    $(Self::$variant => $description,)+
                }
            }
        }
    };
}

error_codes! {
    InvalidArgument => "INVALID_ARGUMENT", "An argument passed to the library is invalid";
    DeveloperAuthorityIsEmpty => "DEVELOPER_AUTHORITY_IS_EMPTY", "Authority is empty";
    DeveloperAuthorityIsNotValidUrl =>
        "DEVELOPER_AUTHORITY_IS_NOT_VALID_URL", "Authority is not a valid URL";
    DeveloperAuthorityIsNotValidInstance =>
        "DEVELOPER_AUTHORITY_IS_NOT_VALID_INSTANCE", "Authority is not a valid instance";
    DeveloperTokenEndpointIsEmpty => "DEVELOPER_TOKEN_ENDPOINT_IS_EMPTY", "Token endpoint is empty";
    DeveloperResponseTypeIsEmpty => "DEVELOPER_RESPONSE_TYPE_IS_EMPTY", "Response type is empty";
    DeveloperResourceIsEmpty => "DEVELOPER_RESOURCE_IS_EMPTY", "Resource is empty";
    DeveloperClientIdIsEmpty => "DEVELOPER_CLIENT_ID_IS_EMPTY", "Client id is empty";
    DeveloperRedirectUriInvalid => "DEVELOPER_REDIRECT_URI_INVALID", "Redirect uri is not valid";
    DeveloperAssertionIsEmpty => "DEVELOPER_ASSERTION_IS_EMPTY", "Assertion is empty";
    DeveloperContextIsNotProvided =>
        "DEVELOPER_CONTEXT_IS_NOT_PROVIDED", "Authentication context is not provided";
    DeveloperConfigurationMissing =>
        "DEVELOPER_CONFIGURATION_MISSING", "A required configuration value is missing";
    /// The completion callback of a request could not be located
    CallbackIsNotFound => "CALLBACK_IS_NOT_FOUND", "Active callback is not found";
    DeviceConnectionIsNotAvailable =>
        "DEVICE_CONNECTION_IS_NOT_AVAILABLE", "Connection is not available";
    NetworkRequestTimeout => "NETWORK_REQUEST_TIMEOUT", "Network request timed out";
    ServerError => "SERVER_ERROR", "Server returned an error";
    ServerInvalidRequest => "SERVER_INVALID_REQUEST", "Server rejected the request as invalid";
    ServerInvalidJsonResponse => "SERVER_INVALID_JSON_RESPONSE", "Server returned invalid JSON";
    AuthFailedNoToken => "AUTH_FAILED_NO_TOKEN", "Server response did not contain a token";
    /// Interaction is required but the request did not allow a prompt
    UserInputNeeded => "USER_INPUT_NEEDED", "User input is needed to complete the request";
    AuthFailedCancelled => "AUTH_FAILED_CANCELLED", "The user cancelled the authorization request";
    TokenCacheItemNotFound => "TOKEN_CACHE_ITEM_NOT_FOUND", "Token cache item is not found";
    InvalidTokenCacheItem => "INVALID_TOKEN_CACHE_ITEM", "Token cache item is invalid";
    EncryptionFailed => "ENCRYPTION_FAILED", "Encryption failed";
    DecryptionFailed => "DECRYPTION_FAILED", "Decryption failed";
    Unknown => "UNKNOWN", "Unknown error";
}

impl fmt::Display for OidcErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OidcErrorCode {
    type Err = UnknownCode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|code| code.as_str() == s)
            .ok_or_else(|| UnknownCode(s.to_string()))
    }
}

impl TryFrom<String> for OidcErrorCode {
    type Error = UnknownCode;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<OidcErrorCode> for &'static str {
    fn from(code: OidcErrorCode) -> Self {
        code.as_str()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn test_names_are_unique() {
        let names: HashSet<_> = OidcErrorCode::ALL.iter().map(|code| code.as_str()).collect();
        assert_eq!(names.len(), OidcErrorCode::ALL.len());
    }

    #[test]
    fn test_parse_every_name() {
        for code in OidcErrorCode::ALL {
            assert_eq!(code.as_str().parse::<OidcErrorCode>(), Ok(*code));
        }
    }

    #[test]
    fn test_parse_unknown_name() {
        let result = "NOT_A_CODE".parse::<OidcErrorCode>();
        assert_eq!(result, Err(UnknownCode("NOT_A_CODE".to_string())));
    }

    #[test]
    fn test_serde_uses_stable_name() {
        let json = serde_json::to_string(&OidcErrorCode::DeveloperRedirectUriInvalid).unwrap();
        assert_eq!(json, "\"DEVELOPER_REDIRECT_URI_INVALID\"");

        let code: OidcErrorCode = serde_json::from_str("\"USER_INPUT_NEEDED\"").unwrap();
        assert_eq!(code, OidcErrorCode::UserInputNeeded);
        assert!(serde_json::from_str::<OidcErrorCode>("\"user_input_needed\"").is_err());
    }
}
