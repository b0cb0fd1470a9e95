//! Client-side authentication session.
//!
//! A [`Session`] is either anonymous (no token, no user) or authenticated
//! (both). The fields are private so no other shape can be constructed.

use secrecy::{ExposeSecret, SecretString};

use crate::UserProfile;

/// Opaque auth token issued by `/auth/login`.
///
/// Sent verbatim in the `Authorization` header. `Debug` never shows the value.
#[derive(Clone)]
pub struct SessionToken(SecretString);

impl SessionToken {
    #[must_use]
    pub fn new(token: impl Into<String>) -> Self {
        Self(SecretString::from(token.into()))
    }

    /// The raw token value, for the `Authorization` header and persistence.
    #[must_use]
    pub fn expose(&self) -> &str {
        self.0.expose_secret()
    }
}

impl PartialEq for SessionToken {
    fn eq(&self, other: &Self) -> bool {
        self.expose() == other.expose()
    }
}

impl Eq for SessionToken {}

impl std::fmt::Debug for SessionToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("SessionToken([REDACTED])")
    }
}

/// The client's belief about current authentication.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Session {
    token: Option<SessionToken>,
    user: Option<UserProfile>,
}

impl Session {
    /// The logged-out session.
    #[must_use]
    pub const fn anonymous() -> Self {
        Self {
            token: None,
            user: None,
        }
    }

    /// A logged-in session carrying both token and profile.
    #[must_use]
    pub const fn authenticated(token: SessionToken, user: UserProfile) -> Self {
        Self {
            token: Some(token),
            user: Some(user),
        }
    }

    /// Build a session from separately stored parts.
    ///
    /// Anything other than both-present collapses to anonymous.
    #[must_use]
    pub fn from_parts(token: Option<SessionToken>, user: Option<UserProfile>) -> Self {
        match (token, user) {
            (Some(token), Some(user)) => Self::authenticated(token, user),
            _ => Self::anonymous(),
        }
    }

    #[must_use]
    pub const fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    #[must_use]
    pub const fn token(&self) -> Option<&SessionToken> {
        self.token.as_ref()
    }

    #[must_use]
    pub const fn user(&self) -> Option<&UserProfile> {
        self.user.as_ref()
    }
}
