//! The account screen as an explicit state machine. `apply` is a pure
//! function from (state, event) to effects; everything latent or visible to
//! the user happens in the effects, executed by the owning flow.

use crate::auth::password::{self, PasswordChecks};
use crate::directory::NewAccount;
use crate::errors::FlowError;
use crate::models::{User, UserRole};
use crate::notify::Notice;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthMode {
    Login,
    Signup,
}

/// Signup progress. Login ignores the stage entirely.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignupStage {
    /// Collecting name, email and password.
    Collecting,
    /// The verification step is exposed; account creation is not yet
    /// reachable.
    Verifying,
    /// College id verified; the next submit creates the account.
    Verified,
}

/// Which directory call is outstanding. At most one per form: submits are
/// ignored while set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InFlight {
    CheckingAccount,
    Authenticating,
    CreatingAccount,
}

#[derive(Debug, Clone)]
pub struct AuthState {
    pub mode: AuthMode,
    pub stage: SignupStage,
    pub name: String,
    pub email: String,
    pub password: String,
    pub role: UserRole,
    pub college_id: Option<String>,
    pub checks: PasswordChecks,
    pub in_flight: Option<InFlight>,
}

impl AuthState {
    pub fn new(signup: bool, default_role: Option<UserRole>) -> Self {
        AuthState {
            mode: if signup { AuthMode::Signup } else { AuthMode::Login },
            stage: SignupStage::Collecting,
            name: String::new(),
            email: String::new(),
            password: String::new(),
            role: default_role.unwrap_or(UserRole::Junior),
            college_id: None,
            checks: PasswordChecks::default(),
            in_flight: None,
        }
    }

    pub fn verified(&self) -> bool {
        self.stage == SignupStage::Verified
    }
}

#[derive(Debug, Clone)]
pub enum AuthEvent {
    NameChanged(String),
    EmailChanged(String),
    PasswordChanged(String),
    ToggleMode,
    Submit,
    /// The verification step completed for this session.
    VerificationPassed { college_id: String, role: UserRole },
    AccountChecked(Result<bool, FlowError>),
    LoginResolved(Result<User, FlowError>),
    SignupResolved(Result<User, FlowError>),
}

#[derive(Debug)]
pub enum AuthEffect {
    /// Rewrite the location's query string in place, no reload.
    ReplaceQuery(String),
    Notify(Notice),
    CheckAccount { email: String },
    Authenticate { email: String, password: String },
    CreateAccount(NewAccount),
    Redirect(&'static str),
}

pub fn apply(state: &mut AuthState, event: AuthEvent) -> Vec<AuthEffect> {
    match event {
        AuthEvent::NameChanged(value) => {
            state.name = value;
            Vec::new()
        }
        AuthEvent::EmailChanged(value) => {
            state.email = value;
            Vec::new()
        }
        AuthEvent::PasswordChanged(value) => {
            state.password = value;
            // Login never shows the requirement list, so it stays blank.
            state.checks = match state.mode {
                AuthMode::Signup => password::check(&state.password),
                AuthMode::Login => PasswordChecks::default(),
            };
            Vec::new()
        }
        AuthEvent::ToggleMode => toggle_mode(state),
        AuthEvent::Submit => submit(state),
        AuthEvent::VerificationPassed { college_id, role } => {
            if state.mode == AuthMode::Signup && state.stage == SignupStage::Verifying {
                state.college_id = Some(college_id);
                state.role = role;
                state.stage = SignupStage::Verified;
            }
            Vec::new()
        }
        AuthEvent::AccountChecked(outcome) => {
            state.in_flight = None;
            match outcome {
                Ok(true) => {
                    // Existing account: abandon signup and steer to login.
                    state.mode = AuthMode::Login;
                    state.stage = SignupStage::Collecting;
                    vec![
                        AuthEffect::Notify(Notice::destructive(
                            "Account Already Exists",
                            "An account with this email already exists. Please log in instead.",
                        )),
                        AuthEffect::ReplaceQuery(String::new()),
                    ]
                }
                Ok(false) => {
                    state.stage = SignupStage::Verifying;
                    Vec::new()
                }
                Err(_) => vec![AuthEffect::Notify(Notice::destructive(
                    "Sign Up Failed",
                    "There was an error processing your request. Please try again.",
                ))],
            }
        }
        AuthEvent::LoginResolved(outcome) => {
            state.in_flight = None;
            match outcome {
                Ok(_) => vec![
                    AuthEffect::Notify(Notice::info(
                        "Login Successful",
                        "Welcome back to AcademiX!",
                    )),
                    AuthEffect::Redirect("/browse"),
                ],
                Err(_) => vec![AuthEffect::Notify(Notice::destructive(
                    "Login Failed",
                    "There was an error processing your request. Please try again.",
                ))],
            }
        }
        AuthEvent::SignupResolved(outcome) => {
            state.in_flight = None;
            match outcome {
                Ok(user) => vec![
                    AuthEffect::Notify(Notice::info(
                        "Account Created",
                        format!("Your account has been created as a {} student.", user.role),
                    )),
                    AuthEffect::Redirect(match user.role {
                        UserRole::Junior => "/browse",
                        UserRole::Senior => "/dashboard",
                    }),
                ],
                Err(_) => vec![AuthEffect::Notify(Notice::destructive(
                    "Sign Up Failed",
                    "There was an error processing your request. Please try again.",
                ))],
            }
        }
    }
}

fn toggle_mode(state: &mut AuthState) -> Vec<AuthEffect> {
    if state.in_flight.is_some() {
        return Vec::new();
    }
    state.mode = match state.mode {
        AuthMode::Login => AuthMode::Signup,
        AuthMode::Signup => AuthMode::Login,
    };
    state.stage = SignupStage::Collecting;
    state.name.clear();
    state.email.clear();
    state.password.clear();
    state.checks = PasswordChecks::default();
    state.college_id = None;
    let query = match state.mode {
        AuthMode::Signup => "signup=true".to_string(),
        AuthMode::Login => String::new(),
    };
    vec![AuthEffect::ReplaceQuery(query)]
}

fn submit(state: &mut AuthState) -> Vec<AuthEffect> {
    if state.in_flight.is_some() {
        return Vec::new();
    }
    match state.mode {
        AuthMode::Login => {
            if state.email.is_empty() || state.password.is_empty() {
                return vec![AuthEffect::Notify(Notice::destructive(
                    "Validation Error",
                    "Please fill in all required fields",
                ))];
            }
            state.in_flight = Some(InFlight::Authenticating);
            vec![AuthEffect::Authenticate {
                email: state.email.clone(),
                password: state.password.clone(),
            }]
        }
        AuthMode::Signup => {
            if state.name.is_empty() || state.email.is_empty() || state.password.is_empty() {
                return vec![AuthEffect::Notify(Notice::destructive(
                    "Validation Error",
                    "Please fill in all required fields",
                ))];
            }
            if !state.checks.satisfied() {
                return vec![AuthEffect::Notify(Notice::destructive(
                    "Password Requirements",
                    "Your password does not meet all the requirements.",
                ))];
            }
            match state.stage {
                SignupStage::Collecting => {
                    state.in_flight = Some(InFlight::CheckingAccount);
                    vec![AuthEffect::CheckAccount {
                        email: state.email.clone(),
                    }]
                }
                SignupStage::Verifying => vec![AuthEffect::Notify(Notice::destructive(
                    "Verification Required",
                    "Complete the college ID verification step first.",
                ))],
                SignupStage::Verified => {
                    state.in_flight = Some(InFlight::CreatingAccount);
                    vec![AuthEffect::CreateAccount(NewAccount {
                        name: state.name.clone(),
                        email: state.email.clone(),
                        password: state.password.clone(),
                        role: state.role,
                        college_id: state.college_id.clone(),
                    })]
                }
            }
        }
    }
}
