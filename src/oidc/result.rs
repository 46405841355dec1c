use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::errors::{AuthenticationError, OidcErrorCode};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthenticationStatus {
    Succeeded,
    UserCancelled,
    Failed,
}

impl AuthenticationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Succeeded => "succeeded",
            Self::UserCancelled => "user_cancelled",
            Self::Failed => "failed",
        }
    }
}

/// Token handed back by a successful request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenItem {
    pub access_token: String,
    pub token_type: String,
    pub expires_on: OffsetDateTime,
    pub id_token: Option<String>,
    pub resource: String,
}

impl TokenItem {
    pub fn is_expired(&self, now: OffsetDateTime) -> bool {
        self.expires_on <= now
    }
}

/// Outcome of an authentication request
#[derive(Debug, Clone)]
pub struct AuthenticationResult {
    status: AuthenticationStatus,
    error: Option<AuthenticationError>,
    correlation_id: Option<Uuid>,
    token: Option<TokenItem>,
    extended_lifetime_token: bool,
}

impl AuthenticationResult {
    pub fn from_error(error: AuthenticationError, correlation_id: Option<Uuid>) -> Self {
        let status = match error {
            AuthenticationError::Cancelled { .. } => AuthenticationStatus::UserCancelled,
            _ => AuthenticationStatus::Failed,
        };
        Self {
            status,
            error: Some(error),
            correlation_id,
            token: None,
            extended_lifetime_token: false,
        }
    }

    pub fn from_cancellation(correlation_id: Option<Uuid>) -> Self {
        Self::from_error(
            AuthenticationError::cancelled(
                OidcErrorCode::AuthFailedCancelled,
                OidcErrorCode::AuthFailedCancelled.description(),
            ),
            correlation_id,
        )
    }

    /// Failed result for a request whose parameters were rejected before it started
    pub fn from_parameter_error(
        details: impl std::fmt::Display,
        correlation_id: Option<Uuid>,
    ) -> Self {
        Self::from_error(
            AuthenticationError::usage(OidcErrorCode::InvalidArgument, details),
            correlation_id,
        )
    }

    pub fn from_token(token: TokenItem, correlation_id: Option<Uuid>) -> Self {
        Self {
            status: AuthenticationStatus::Succeeded,
            error: None,
            correlation_id,
            token: Some(token),
            extended_lifetime_token: false,
        }
    }

    /// Marks the token as one served past its normal lifetime during an outage
    pub fn with_extended_lifetime_token(mut self, extended: bool) -> Self {
        self.extended_lifetime_token = extended;
        self
    }

    pub fn status(&self) -> AuthenticationStatus {
        self.status
    }

    pub fn error(&self) -> Option<&AuthenticationError> {
        self.error.as_ref()
    }

    pub fn correlation_id(&self) -> Option<Uuid> {
        self.correlation_id
    }

    pub fn token(&self) -> Option<&TokenItem> {
        self.token.as_ref()
    }

    pub fn extended_lifetime_token(&self) -> bool {
        self.extended_lifetime_token
    }
}
