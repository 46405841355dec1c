use std::{error::Error as _, fmt, sync::Arc};

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub mod code;
pub mod wire;


pub use code::{OidcErrorCode, UnknownCode};

/// Lower-level error kept inside an [`AuthenticationError`]
pub type Cause = Arc<dyn std::error::Error + Send + Sync>;

/// Which branch of the error taxonomy an [`AuthenticationError`] belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorKind {
    Usage,
    Network,
    Protocol,
    Cancelled,
    Cache,
    General,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Usage => "usage",
            Self::Network => "network",
            Self::Protocol => "protocol",
            Self::Cancelled => "cancelled",
            Self::Cache => "cache",
            Self::General => "general",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned by every fallible operation of the plugin.
///
/// Each variant carries the same three pieces: a [`OidcErrorCode`], a message
/// meant for the integrator of the library, and optionally the error that
/// triggered it. The variant itself is the kind, so callers can narrow with a
/// `match` instead of inspecting the code.
#[derive(Debug, Clone, Error)]
pub enum AuthenticationError {
    /// The caller broke a precondition of the public API
    #[error("usage error [{code}]: {message}")]
    Usage {
        code: OidcErrorCode,
        message: String,
        #[source]
        cause: Option<Cause>,
    },

    #[error("network error [{code}]: {message}")]
    Network {
        code: OidcErrorCode,
        message: String,
        #[source]
        cause: Option<Cause>,
    },

    /// The authority answered with something the protocol does not allow
    #[error("protocol error [{code}]: {message}")]
    Protocol {
        code: OidcErrorCode,
        message: String,
        #[source]
        cause: Option<Cause>,
    },

    #[error("cancelled [{code}]: {message}")]
    Cancelled {
        code: OidcErrorCode,
        message: String,
        #[source]
        cause: Option<Cause>,
    },

    #[error("cache error [{code}]: {message}")]
    Cache {
        code: OidcErrorCode,
        message: String,
        #[source]
        cause: Option<Cause>,
    },

    #[error("authentication error [{code}]: {message}")]
    General {
        code: OidcErrorCode,
        message: String,
        #[source]
        cause: Option<Cause>,
    },
}

impl AuthenticationError {
    pub fn new(
        kind: ErrorKind,
        code: OidcErrorCode,
        message: impl fmt::Display,
        cause: Option<Cause>,
    ) -> Self {
        let message = message.to_string();
        match kind {
            ErrorKind::Usage => Self::Usage { code, message, cause },
            ErrorKind::Network => Self::Network { code, message, cause },
            ErrorKind::Protocol => Self::Protocol { code, message, cause },
            ErrorKind::Cancelled => Self::Cancelled { code, message, cause },
            ErrorKind::Cache => Self::Cache { code, message, cause },
            ErrorKind::General => Self::General { code, message, cause },
        }
    }

    fn parts(&self) -> (ErrorKind, OidcErrorCode, &str, Option<&Cause>) {
        match self {
            Self::Usage { code, message, cause } => {
                (ErrorKind::Usage, *code, message.as_str(), cause.as_ref())
            }
            Self::Network { code, message, cause } => {
                (ErrorKind::Network, *code, message.as_str(), cause.as_ref())
            }
            Self::Protocol { code, message, cause } => {
                (ErrorKind::Protocol, *code, message.as_str(), cause.as_ref())
            }
            Self::Cancelled { code, message, cause } => {
                (ErrorKind::Cancelled, *code, message.as_str(), cause.as_ref())
            }
            Self::Cache { code, message, cause } => {
                (ErrorKind::Cache, *code, message.as_str(), cause.as_ref())
            }
            Self::General { code, message, cause } => {
                (ErrorKind::General, *code, message.as_str(), cause.as_ref())
            }
        }
    }

    pub fn kind(&self) -> ErrorKind {
        self.parts().0
    }

    pub fn code(&self) -> OidcErrorCode {
        self.parts().1
    }

    pub fn message(&self) -> &str {
        self.parts().2
    }

    pub fn cause(&self) -> Option<&Cause> {
        self.parts().3
    }

    pub fn is_usage(&self) -> bool {
        matches!(self, Self::Usage { .. })
    }

    /// Display messages of the cause followed by every error in its source chain
    pub fn cause_chain(&self) -> Vec<String> {
        let Some(cause) = self.cause() else {
            return Vec::new();
        };
        let mut chain = vec![cause.to_string()];
        let mut next = cause.source();
        while let Some(error) = next {
            chain.push(error.to_string());
            next = error.source();
        }
        chain
    }
}

// Helper methods to create AuthenticationErrors of each kind
impl AuthenticationError {
    pub fn usage(code: OidcErrorCode, message: impl fmt::Display) -> Self {
        Self::new(ErrorKind::Usage, code, message, None)
    }

    pub fn usage_with_cause(
        code: OidcErrorCode,
        message: impl fmt::Display,
        cause: Cause,
    ) -> Self {
        Self::new(ErrorKind::Usage, code, message, Some(cause))
    }

    pub fn network(code: OidcErrorCode, message: impl fmt::Display) -> Self {
        Self::new(ErrorKind::Network, code, message, None)
    }

    pub fn network_with_cause(
        code: OidcErrorCode,
        message: impl fmt::Display,
        cause: Cause,
    ) -> Self {
        Self::new(ErrorKind::Network, code, message, Some(cause))
    }

    pub fn protocol(code: OidcErrorCode, message: impl fmt::Display) -> Self {
        Self::new(ErrorKind::Protocol, code, message, None)
    }

    pub fn protocol_with_cause(
        code: OidcErrorCode,
        message: impl fmt::Display,
        cause: Cause,
    ) -> Self {
        Self::new(ErrorKind::Protocol, code, message, Some(cause))
    }

    pub fn cancelled(code: OidcErrorCode, message: impl fmt::Display) -> Self {
        Self::new(ErrorKind::Cancelled, code, message, None)
    }

    pub fn cancelled_with_cause(
        code: OidcErrorCode,
        message: impl fmt::Display,
        cause: Cause,
    ) -> Self {
        Self::new(ErrorKind::Cancelled, code, message, Some(cause))
    }

    pub fn cache(code: OidcErrorCode, message: impl fmt::Display) -> Self {
        Self::new(ErrorKind::Cache, code, message, None)
    }

    pub fn cache_with_cause(
        code: OidcErrorCode,
        message: impl fmt::Display,
        cause: Cause,
    ) -> Self {
        Self::new(ErrorKind::Cache, code, message, Some(cause))
    }

    pub fn general(code: OidcErrorCode, message: impl fmt::Display) -> Self {
        Self::new(ErrorKind::General, code, message, None)
    }

    pub fn general_with_cause(
        code: OidcErrorCode,
        message: impl fmt::Display,
        cause: Cause,
    ) -> Self {
        Self::new(ErrorKind::General, code, message, Some(cause))
    }
}
