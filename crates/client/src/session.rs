//! Session controller.
//!
//! Owns the in-memory [`Session`] and its durable mirror. The session has two
//! states, anonymous and authenticated, and only moves between them here:
//!
//! - `login` success: anonymous → authenticated (store written first)
//! - `logout`: any → anonymous (store cleared)
//! - `register`: never changes state
//!
//! Credentials are forwarded exactly as given; the service is the only
//! validator.

use tracing::{debug, info, instrument, warn};

use shopfront_core::{AuthResponse, Credentials, Session, SessionToken};

use crate::api::{ApiRequest, ApiResponse, Transport, TransportError, paths};
use crate::store::{SessionStore, StoreError};

/// Result of a `register` or `login` command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthOutcome {
    /// The account was created. The session is unchanged.
    Registered,
    /// The service refused the registration.
    RegistrationFailed,
    /// The session is now authenticated.
    LoggedIn,
    /// The service refused the credentials.
    LoginFailed,
    /// The exchange did not complete or the reply was unusable.
    Error(String),
}

impl AuthOutcome {
    /// Message shown in the auth region, if any.
    #[must_use]
    pub fn message(&self) -> Option<String> {
        match self {
            Self::Registered => Some("Registered! Please login.".to_string()),
            Self::RegistrationFailed => Some("Registration failed.".to_string()),
            Self::LoginFailed => Some("Login failed.".to_string()),
            Self::Error(detail) => Some(format!("Error: {detail}")),
            Self::LoggedIn => None,
        }
    }
}

/// Owns the session state and keeps the store in step with it.
pub struct SessionController<T, S> {
    transport: T,
    store: S,
    session: Session,
}

impl<T: Transport, S: SessionStore> SessionController<T, S> {
    /// Create a controller whose initial state is whatever `store` holds.
    #[must_use]
    pub fn new(transport: T, store: S) -> Self {
        let session = store.load();
        debug!(
            authenticated = session.is_authenticated(),
            "Session restored from store"
        );

        Self {
            transport,
            store,
            session,
        }
    }

    #[must_use]
    pub const fn session(&self) -> &Session {
        &self.session
    }

    #[must_use]
    pub const fn transport(&self) -> &T {
        &self.transport
    }

    #[must_use]
    pub const fn store(&self) -> &S {
        &self.store
    }

    /// Create an account. Does not log in.
    #[instrument(skip(self, credentials), fields(username = %credentials.username))]
    pub async fn register(&self, credentials: &Credentials) -> AuthOutcome {
        match self.post(paths::REGISTER, credentials).await {
            Ok(response) if response.is_success() => {
                info!("Account registered");
                AuthOutcome::Registered
            }
            Ok(response) => {
                warn!(status = %response.status, "Registration rejected");
                AuthOutcome::RegistrationFailed
            }
            Err(e) => {
                warn!(error = %e, "Registration request failed");
                AuthOutcome::Error(e.to_string())
            }
        }
    }

    /// Authenticate and, on success, persist and adopt the new session.
    ///
    /// On any failure both the in-memory session and the store are left as
    /// they were.
    #[instrument(skip(self, credentials), fields(username = %credentials.username))]
    pub async fn login(&mut self, credentials: &Credentials) -> AuthOutcome {
        let response = match self.post(paths::LOGIN, credentials).await {
            Ok(response) => response,
            Err(e) => {
                warn!(error = %e, "Login request failed");
                return AuthOutcome::Error(e.to_string());
            }
        };

        if !response.is_success() {
            warn!(status = %response.status, "Login rejected");
            return AuthOutcome::LoginFailed;
        }

        let auth = match response.json::<AuthResponse>() {
            Ok(auth) if !auth.token.is_empty() => auth,
            Ok(_) => {
                warn!("Login response carried an empty token");
                return AuthOutcome::Error("login response did not include a token".to_string());
            }
            Err(e) => {
                warn!(error = %e, "Malformed login response");
                return AuthOutcome::Error(format!("malformed login response: {e}"));
            }
        };

        let session = Session::authenticated(SessionToken::new(auth.token), auth.user);
        if let Err(e) = self.store.save(&session) {
            warn!(error = %e, "Failed to persist session, staying logged out");
            return AuthOutcome::Error(e.to_string());
        }

        self.session = session;
        info!("Logged in");
        AuthOutcome::LoggedIn
    }

    /// Drop the session and clear the store.
    ///
    /// The in-memory session is anonymous afterwards even if clearing the
    /// store fails.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the persisted session could not be removed.
    #[instrument(skip(self))]
    pub fn logout(&mut self) -> Result<(), StoreError> {
        self.session = Session::anonymous();
        self.store.clear()?;
        info!("Logged out");
        Ok(())
    }

    async fn post(
        &self,
        path: &'static str,
        credentials: &Credentials,
    ) -> Result<ApiResponse, TransportError> {
        let request = ApiRequest::post_json(path, credentials)?;
        self.transport.send(request).await
    }
}
