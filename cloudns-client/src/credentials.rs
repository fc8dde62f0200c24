//! API credentials and the auth parameters derived from them

use std::fmt;

use crate::error::{ClouDnsError, Result};
use crate::params::Params;

/// Password field, sent with every request.
pub const AUTH_PASSWORD: &str = "auth-password";
/// Main account identity field.
pub const AUTH_ID: &str = "auth-id";
/// Sub-user identity field (numeric ID).
pub const SUB_AUTH_ID: &str = "sub-auth-id";
/// Sub-user identity field (username).
pub const SUB_AUTH_USER: &str = "sub-auth-user";

/// Which identity the credentials authenticate as.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdentityKind {
    /// Main account, `auth-id`.
    Main,
    /// Sub-user by ID, `sub-auth-id`.
    SubUserId,
    /// Sub-user by username, `sub-auth-user`.
    SubUserName,
}

impl IdentityKind {
    pub fn from_flags(act_as_sub_user: bool, sub_user_uses_username: bool) -> Self {
        match (act_as_sub_user, sub_user_uses_username) {
            (false, _) => Self::Main,
            (true, false) => Self::SubUserId,
            (true, true) => Self::SubUserName,
        }
    }

    /// Wire key carrying the identity.
    pub fn param_key(self) -> &'static str {
        match self {
            Self::Main => AUTH_ID,
            Self::SubUserId => SUB_AUTH_ID,
            Self::SubUserName => SUB_AUTH_USER,
        }
    }
}

/// Immutable ClouDNS credentials.
///
/// The wire-level auth parameters are derived once at construction and
/// always hold `auth-password` plus exactly one identity key.
#[derive(Clone)]
pub struct Credentials {
    identity: String,
    kind: IdentityKind,
    auth_params: Params,
}

impl Credentials {
    /// Main account credentials.
    pub fn new(auth_id: impl Into<String>, password: impl Into<String>) -> Self {
        Self::with_kind(auth_id, password, IdentityKind::Main)
    }

    /// Sub-user credentials identified by numeric sub-user ID.
    pub fn sub_user_id(sub_auth_id: impl Into<String>, password: impl Into<String>) -> Self {
        Self::with_kind(sub_auth_id, password, IdentityKind::SubUserId)
    }

    /// Sub-user credentials identified by username.
    pub fn sub_user_name(sub_auth_user: impl Into<String>, password: impl Into<String>) -> Self {
        Self::with_kind(sub_auth_user, password, IdentityKind::SubUserName)
    }

    /// Builds credentials from the two configuration flags.
    pub fn from_flags(
        identity: impl Into<String>,
        password: impl Into<String>,
        act_as_sub_user: bool,
        sub_user_uses_username: bool,
    ) -> Self {
        Self::with_kind(
            identity,
            password,
            IdentityKind::from_flags(act_as_sub_user, sub_user_uses_username),
        )
    }

    fn with_kind(identity: impl Into<String>, password: impl Into<String>, kind: IdentityKind) -> Self {
        let identity = identity.into();
        let auth_params = Params::new()
            .with(AUTH_PASSWORD, password.into())
            .with(kind.param_key(), identity.clone());
        Self {
            identity,
            kind,
            auth_params,
        }
    }

    /// Reads `CLOUDNS_AUTH_ID`, `CLOUDNS_AUTH_PASSWORD`, `CLOUDNS_IS_SUB_USER`
    /// and `CLOUDNS_USE_SUB_USERNAME` from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub(crate) fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let identity = lookup("CLOUDNS_AUTH_ID")
            .filter(|v| !v.is_empty())
            .ok_or_else(|| ClouDnsError::validation("Missing CLOUDNS_AUTH_ID"))?;
        let password = lookup("CLOUDNS_AUTH_PASSWORD")
            .filter(|v| !v.is_empty())
            .ok_or_else(|| ClouDnsError::validation("Missing CLOUDNS_AUTH_PASSWORD"))?;
        let is_sub_user = crate::config::parse_flag(&lookup, "CLOUDNS_IS_SUB_USER", false)?;
        let use_username = crate::config::parse_flag(&lookup, "CLOUDNS_USE_SUB_USERNAME", false)?;

        Ok(Self::from_flags(identity, password, is_sub_user, use_username))
    }

    pub fn identity(&self) -> &str {
        &self.identity
    }

    pub fn kind(&self) -> IdentityKind {
        self.kind
    }

    /// Auth parameters merged into every request.
    pub fn auth_params(&self) -> &Params {
        &self.auth_params
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("identity", &self.identity)
            .field("kind", &self.kind)
            .field("password", &"***REDACTED***")
            .finish()
    }
}
