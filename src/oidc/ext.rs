use serde::{Deserialize, Serialize};

/// When the user may be prompted during a token request
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PromptBehavior {
    /// Prompt only if the user's attention is needed
    #[default]
    Auto,
    Always,
    /// Re-authorize so the resulting token carries updated claims
    RefreshSession,
    Force,
}

impl PromptBehavior {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Auto => "auto",
            Self::Always => "always",
            Self::RefreshSession => "refresh_session",
            Self::Force => "force",
        }
    }
}

/// Where the credentials dialog lives
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CredentialsType {
    #[default]
    Auto,
    Embedded,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AssertionType {
    #[default]
    #[serde(rename = "saml1_1")]
    Saml1_1,
    #[serde(rename = "saml2")]
    Saml2,
}

impl AssertionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Saml1_1 => "saml1_1",
            Self::Saml2 => "saml2",
        }
    }

    /// Grant type sent to the token endpoint for this assertion
    pub fn grant_type(&self) -> &'static str {
        match self {
            Self::Saml1_1 => "urn:ietf:params:oauth:grant-type:saml1_1-bearer",
            Self::Saml2 => "urn:ietf:params:oauth:grant-type:saml2-bearer",
        }
    }
}
