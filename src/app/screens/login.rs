//! Login screen controller
//!
//! Validates locally before any network call, establishes the session on
//! success, and maps every failure onto the copy the login screen shows.

use std::sync::Arc;

use tokio::sync::watch;
use tracing::{debug, warn};

use crate::app::client::ApiClient;
use crate::app::models::LoginRequest;
use crate::app::session::SessionStore;
use crate::errors::ApiError;

const USERNAME_REQUIRED: &str = "Email or mobile number is required.";
const PASSWORD_REQUIRED: &str = "Password is required.";
const GENERIC_ERROR: &str = "Something went wrong. Please try again.";

/// Login screen state
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoginState {
    pub username: String,
    pub password: String,
    pub submitting: bool,
    pub error: Option<String>,
}

/// Controller backing the login screen
pub struct LoginController {
    api: Arc<ApiClient>,
    session: Arc<SessionStore>,
    state: watch::Sender<LoginState>,
}

impl LoginController {
    pub fn new(api: Arc<ApiClient>, session: Arc<SessionStore>) -> Self {
        let (state, _) = watch::channel(LoginState::default());
        Self {
            api,
            session,
            state,
        }
    }

    /// Observe state changes
    pub fn subscribe(&self) -> watch::Receiver<LoginState> {
        self.state.subscribe()
    }

    /// Snapshot of the current state
    pub fn state(&self) -> LoginState {
        self.state.borrow().clone()
    }

    /// Update the username field, clearing any shown error
    pub fn set_username(&self, value: &str) {
        self.state.send_modify(|state| {
            state.username = value.to_string();
            state.error = None;
        });
    }

    /// Update the password field, clearing any shown error
    pub fn set_password(&self, value: &str) {
        self.state.send_modify(|state| {
            state.password = value.to_string();
            state.error = None;
        });
    }

    /// Attempt to log in with the entered credentials
    ///
    /// Validation failures set the error without touching the network.
    /// Returns whether a session was established.
    pub async fn submit(&self) -> bool {
        let (username, password) = {
            let state = self.state.borrow();
            (state.username.clone(), state.password.clone())
        };

        let mut violations = Vec::new();
        if username.trim().is_empty() {
            violations.push(USERNAME_REQUIRED);
        }
        if password.trim().is_empty() {
            violations.push(PASSWORD_REQUIRED);
        }
        if !violations.is_empty() {
            self.state.send_modify(|state| {
                state.error = Some(violations.join(" "));
            });
            return false;
        }

        self.state.send_modify(|state| {
            state.submitting = true;
            state.error = None;
        });

        let request = LoginRequest {
            username: username.trim().to_string(),
            password,
        };

        match self.api.login(&request).await {
            Ok(auth) => {
                let saved = self
                    .session
                    .save_session(
                        &auth.token,
                        auth.user_id,
                        &auth.first_name,
                        &auth.last_name,
                        &auth.email,
                    )
                    .await;

                match saved {
                    Ok(()) => {
                        debug!("Login succeeded for user {}", auth.user_id);
                        self.state.send_modify(|state| {
                            state.submitting = false;
                            state.error = None;
                        });
                        true
                    }
                    Err(e) => {
                        warn!("Failed to persist session after login: {}", e);
                        self.state.send_modify(|state| {
                            state.submitting = false;
                            state.error = Some(GENERIC_ERROR.to_string());
                        });
                        false
                    }
                }
            }
            Err(e) => {
                warn!("Login failed: {}", e);
                let message = submit_error_message(&e);
                self.state.send_modify(|state| {
                    state.submitting = false;
                    state.error = Some(message);
                });
                false
            }
        }
    }
}

/// User-facing message for a failed auth call
///
/// Server-reported messages pass through verbatim (an invalid-credentials
/// 401 shows exactly what the backend said); transport problems collapse
/// into one generic line.
pub(super) fn submit_error_message(error: &ApiError) -> String {
    match error {
        ApiError::Status { message, .. } => message.clone(),
        _ => GENERIC_ERROR.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;
    use url::Url;

    fn controller(temp_dir: &TempDir) -> LoginController {
        let session = Arc::new(SessionStore::new(temp_dir.path().join("session.json")));
        let api = Arc::new(
            ApiClient::new(Url::parse("http://127.0.0.1:9/").unwrap(), session.clone()).unwrap(),
        );
        LoginController::new(api, session)
    }

    #[tokio::test]
    async fn test_blank_fields_collect_messages_without_network() {
        let temp_dir = TempDir::new().unwrap();
        let controller = controller(&temp_dir);

        assert!(!controller.submit().await);
        let state = controller.state();
        assert_eq!(
            state.error.as_deref(),
            Some("Email or mobile number is required. Password is required.")
        );
        assert!(!state.submitting);
    }

    #[tokio::test]
    async fn test_blank_password_alone() {
        let temp_dir = TempDir::new().unwrap();
        let controller = controller(&temp_dir);
        controller.set_username("student@example.com");

        assert!(!controller.submit().await);
        assert_eq!(
            controller.state().error.as_deref(),
            Some("Password is required.")
        );
    }

    #[tokio::test]
    async fn test_editing_clears_error() {
        let temp_dir = TempDir::new().unwrap();
        let controller = controller(&temp_dir);

        controller.submit().await;
        assert!(controller.state().error.is_some());

        controller.set_username("student@example.com");
        assert!(controller.state().error.is_none());
    }

    #[tokio::test]
    async fn test_unreachable_server_shows_generic_message() {
        let temp_dir = TempDir::new().unwrap();
        let controller = controller(&temp_dir);
        controller.set_username("student@example.com");
        controller.set_password("sup3r-secret");

        assert!(!controller.submit().await);
        let state = controller.state();
        assert_eq!(state.error.as_deref(), Some(GENERIC_ERROR));
        assert!(!state.submitting);
    }

    #[test]
    fn test_status_errors_surface_server_message() {
        let error = ApiError::Status {
            status: 401,
            message: "Invalid credentials".to_string(),
        };
        assert_eq!(submit_error_message(&error), "Invalid credentials");
    }
}
