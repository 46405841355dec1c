//! Versioned JSON form of [`AuthenticationError`], for errors that cross a
//! process boundary (the hybrid app bridge, crash reports, persisted results).

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::{AuthenticationError, ErrorKind, OidcErrorCode};

/// Bumped whenever the document layout changes
pub const WIRE_VERSION: u32 = 1;

#[derive(Debug, Error)]
pub enum WireError {
    #[error("Unsupported error document version {found}, expected {expected}")]
    UnsupportedVersion { found: u32, expected: u32 },

    #[error("Malformed error document: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// Cause rebuilt from a decoded document. Only the messages survive.
#[derive(Debug, Error)]
#[error("{message}")]
pub struct RemoteCause {
    message: String,
    #[source]
    source: Option<Box<RemoteCause>>,
}

impl RemoteCause {
    fn from_chain(message: String, chain: Vec<String>) -> Self {
        let source = chain
            .into_iter()
            .rev()
            .fold(None, |source, message| Some(Box::new(RemoteCause { message, source })));
        Self { message, source }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

#[derive(Deserialize)]
struct VersionHeader {
    version: u32,
}

#[derive(Serialize, Deserialize)]
struct ErrorDocument {
    version: u32,
    kind: ErrorKind,
    code: OidcErrorCode,
    message: String,
    cause: Option<CauseDocument>,
}

#[derive(Serialize, Deserialize)]
struct CauseDocument {
    message: String,
    #[serde(default)]
    chain: Vec<String>,
}

pub fn to_json(error: &AuthenticationError) -> Result<String, WireError> {
    let mut chain = error.cause_chain().into_iter();
    let cause = chain.next().map(|message| CauseDocument {
        message,
        chain: chain.collect(),
    });
    let document = ErrorDocument {
        version: WIRE_VERSION,
        kind: error.kind(),
        code: error.code(),
        message: error.message().to_string(),
        cause,
    };
    Ok(serde_json::to_string(&document)?)
}

pub fn from_json(json: &str) -> Result<AuthenticationError, WireError> {
    let header: VersionHeader = serde_json::from_str(json)?;
    if header.version != WIRE_VERSION {
        tracing::warn!(
            "Rejecting error document with version {} (expected {})",
            header.version,
            WIRE_VERSION
        );
        return Err(WireError::UnsupportedVersion {
            found: header.version,
            expected: WIRE_VERSION,
        });
    }

    let document: ErrorDocument = serde_json::from_str(json)?;
    let cause = document.cause.map(|cause| -> super::Cause {
        Arc::new(RemoteCause::from_chain(cause.message, cause.chain))
    });
    Ok(AuthenticationError::new(
        document.kind,
        document.code,
        document.message,
        cause,
    ))
}
