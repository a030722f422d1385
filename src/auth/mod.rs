pub mod machine;
pub mod password;
pub mod verify;


use std::collections::VecDeque;
use std::sync::Arc;

use log::debug;

use crate::directory::Directory;
use crate::models::{User, UserRole};
use crate::notify::Notifier;
use crate::routing::Navigator;

use machine::{apply, AuthEffect, AuthEvent, AuthState};

/// Drives the account screen: owns the form state and executes the effects
/// the pure transition function emits, feeding directory call resolutions
/// back in as events.
pub struct AuthFlow {
    state: AuthState,
    directory: Arc<dyn Directory>,
    navigator: Arc<dyn Navigator>,
    notifier: Arc<dyn Notifier>,
    signed_in: Option<User>,
}

impl AuthFlow {
    /// Initial mode and role come from the navigation context, the same way
    /// the hosted screen reads `?signup=true&role=...`.
    pub fn new(
        directory: Arc<dyn Directory>,
        navigator: Arc<dyn Navigator>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        let signup = navigator.query("signup").as_deref() == Some("true");
        let default_role = navigator
            .query("role")
            .and_then(|r| r.parse::<UserRole>().ok());
        AuthFlow {
            state: AuthState::new(signup, default_role),
            directory,
            navigator,
            notifier,
            signed_in: None,
        }
    }

    pub fn state(&self) -> &AuthState {
        &self.state
    }

    /// The user signed in by the most recent successful login or signup, if
    /// any. Consuming it hands the session over to the shell.
    pub fn take_signed_in(&mut self) -> Option<User> {
        self.signed_in.take()
    }

    /// Apply an event and run every effect it produces. Directory calls are
    /// awaited in place and their resolutions queued as follow-up events, so
    /// a single dispatch settles the whole exchange.
    pub async fn dispatch(&mut self, event: AuthEvent) {
        let mut pending = VecDeque::from([event]);
        while let Some(event) = pending.pop_front() {
            debug!("auth event: {event:?}");
            for effect in apply(&mut self.state, event) {
                match effect {
                    AuthEffect::Notify(notice) => self.notifier.display(notice),
                    AuthEffect::ReplaceQuery(query) => self.navigator.replace_query(&query),
                    AuthEffect::Redirect(path) => self.navigator.navigate(path),
                    AuthEffect::CheckAccount { email } => {
                        let outcome = self.directory.check_account_exists(&email).await;
                        pending.push_back(AuthEvent::AccountChecked(outcome));
                    }
                    AuthEffect::Authenticate { email, password } => {
                        let outcome = self.directory.authenticate(&email, &password).await;
                        if let Ok(user) = &outcome {
                            self.signed_in = Some(user.clone());
                        }
                        pending.push_back(AuthEvent::LoginResolved(outcome));
                    }
                    AuthEffect::CreateAccount(account) => {
                        let outcome = self.directory.create_account(account).await;
                        if let Ok(user) = &outcome {
                            self.signed_in = Some(user.clone());
                        }
                        pending.push_back(AuthEvent::SignupResolved(outcome));
                    }
                }
            }
        }
    }
}
