//! End-to-end account journeys against the in-memory directory.

use std::sync::Arc;

use academix::auth::machine::{AuthEvent, AuthMode, SignupStage};
use academix::auth::verify::{prefix_classifier, IdVerifier};
use academix::auth::AuthFlow;
use academix::directory::mock::MockDirectory;
use academix::directory::Directory;
use academix::models::{FileRef, UserRole};
use academix::notify::RecordingNotifier;
use academix::routing::{Location, Navigator};

struct Harness {
    directory: Arc<MockDirectory>,
    navigator: Arc<Location>,
    notifier: Arc<RecordingNotifier>,
    flow: AuthFlow,
    verifier: IdVerifier,
}

fn harness(query: &str) -> Harness {
    let directory = Arc::new(MockDirectory::instant());
    let navigator = Arc::new(Location::new("/login", query));
    let notifier = Arc::new(RecordingNotifier::new());
    let flow = AuthFlow::new(directory.clone(), navigator.clone(), notifier.clone());
    let verifier = IdVerifier::new(directory.clone(), prefix_classifier());
    Harness {
        directory,
        navigator,
        notifier,
        flow,
        verifier,
    }
}

async fn fill_signup(flow: &mut AuthFlow, name: &str, email: &str, password: &str) {
    flow.dispatch(AuthEvent::NameChanged(name.into())).await;
    flow.dispatch(AuthEvent::EmailChanged(email.into())).await;
    flow.dispatch(AuthEvent::PasswordChanged(password.into()))
        .await;
}

#[tokio::test]
async fn junior_signup_lands_on_browse() {
    let mut h = harness("signup=true");
    assert_eq!(h.flow.state().mode, AuthMode::Signup);

    fill_signup(&mut h.flow, "Ravi Kumar", "ravi@academix.edu", "Abcdef1!").await;
    h.flow.dispatch(AuthEvent::Submit).await;
    assert_eq!(h.flow.state().stage, SignupStage::Verifying);

    let scan = FileRef::from_bytes("id.png", b"card scan");
    let verification = h.verifier.verify("EE1023456", Some(&scan)).await.unwrap();
    assert_eq!(verification.role, UserRole::Junior);
    h.flow
        .dispatch(AuthEvent::VerificationPassed {
            college_id: verification.college_id,
            role: verification.role,
        })
        .await;
    assert!(h.flow.state().verified());

    h.flow.dispatch(AuthEvent::Submit).await;
    let user = h.flow.take_signed_in().expect("account created");
    assert_eq!(user.role, UserRole::Junior);
    assert_eq!(user.college_id.as_deref(), Some("EE1023456"));
    assert!(user.verified);
    assert_eq!(h.navigator.path(), "/browse");
    assert_eq!(h.notifier.titles(), vec!["Account Created"]);
}

#[tokio::test]
async fn senior_signup_lands_on_dashboard() {
    let mut h = harness("signup=true");
    fill_signup(&mut h.flow, "Asha Menon", "asha@academix.edu", "Abcdef1!").await;
    h.flow.dispatch(AuthEvent::Submit).await;

    let scan = FileRef::from_bytes("id.png", b"card scan");
    let verification = h.verifier.verify("CS2045678", Some(&scan)).await.unwrap();
    assert_eq!(verification.role, UserRole::Senior);
    h.flow
        .dispatch(AuthEvent::VerificationPassed {
            college_id: verification.college_id,
            role: verification.role,
        })
        .await;

    h.flow.dispatch(AuthEvent::Submit).await;
    let user = h.flow.take_signed_in().expect("account created");
    assert_eq!(user.role, UserRole::Senior);
    assert_eq!(h.navigator.path(), "/dashboard");
}

#[tokio::test]
async fn created_account_can_log_back_in() {
    let mut h = harness("signup=true");
    fill_signup(&mut h.flow, "Ravi Kumar", "ravi@academix.edu", "Abcdef1!").await;
    h.flow.dispatch(AuthEvent::Submit).await;
    let scan = FileRef::from_bytes("id.png", b"card scan");
    let verification = h.verifier.verify("EE1023456", Some(&scan)).await.unwrap();
    h.flow
        .dispatch(AuthEvent::VerificationPassed {
            college_id: verification.college_id,
            role: verification.role,
        })
        .await;
    h.flow.dispatch(AuthEvent::Submit).await;
    h.flow.take_signed_in().expect("account created");

    // A later visit in login mode with the same credentials succeeds.
    let navigator = Arc::new(Location::new("/login", ""));
    let notifier = Arc::new(RecordingNotifier::new());
    let mut flow = AuthFlow::new(h.directory.clone(), navigator.clone(), notifier.clone());
    flow.dispatch(AuthEvent::EmailChanged("ravi@academix.edu".into()))
        .await;
    flow.dispatch(AuthEvent::PasswordChanged("Abcdef1!".into()))
        .await;
    flow.dispatch(AuthEvent::Submit).await;

    let user = flow.take_signed_in().expect("login succeeded");
    assert_eq!(user.name, "Ravi Kumar");
    assert_eq!(navigator.path(), "/browse");
    assert_eq!(notifier.titles(), vec!["Login Successful"]);
}

#[tokio::test]
async fn seeded_senior_login_redirects_to_browse() {
    // Login is role-independent: even a senior lands on /browse.
    let mut h = harness("");
    h.flow
        .dispatch(AuthEvent::EmailChanged("jane.smith@academix.edu".into()))
        .await;
    h.flow
        .dispatch(AuthEvent::PasswordChanged("Campus@2024".into()))
        .await;
    h.flow.dispatch(AuthEvent::Submit).await;

    let user = h.flow.take_signed_in().expect("login succeeded");
    assert_eq!(user.role, UserRole::Senior);
    assert_eq!(h.navigator.path(), "/browse");
}

#[tokio::test]
async fn failed_account_creation_is_retryable_in_place() {
    let mut h = harness("signup=true");
    fill_signup(&mut h.flow, "Ravi Kumar", "ravi@academix.edu", "Abcdef1!").await;
    h.flow.dispatch(AuthEvent::Submit).await;
    let scan = FileRef::from_bytes("id.png", b"card scan");
    let verification = h.verifier.verify("EE1023456", Some(&scan)).await.unwrap();
    h.flow
        .dispatch(AuthEvent::VerificationPassed {
            college_id: verification.college_id,
            role: verification.role,
        })
        .await;

    h.directory.fail_next();
    h.flow.dispatch(AuthEvent::Submit).await;
    assert!(h.flow.take_signed_in().is_none());
    assert_eq!(h.notifier.titles(), vec!["Sign Up Failed"]);
    // No partial state: still verified, nothing was created, resubmit works.
    assert!(h.flow.state().verified());
    assert!(!h
        .directory
        .check_account_exists("ravi@academix.edu")
        .await
        .unwrap());

    h.flow.dispatch(AuthEvent::Submit).await;
    assert!(h.flow.take_signed_in().is_some());
    assert_eq!(h.navigator.path(), "/browse");
}

#[tokio::test]
async fn default_role_from_query_applies_until_verification_overrides() {
    let h = harness("signup=true&role=senior");
    assert_eq!(h.flow.state().role, UserRole::Senior);
    assert_eq!(h.flow.state().mode, AuthMode::Signup);
}
