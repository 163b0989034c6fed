use super::common::*;
use crate::catalog::digital_id::ISSUED_ID;
use crate::flow::{Companion, FlowError, LoginForm, ValidationError, VerificationStep};
use crate::navigation::{Gate, NavigationError, Screen};
use crate::simulate::{Cancelled, Latency, SimulatedOperation};

#[tokio::test]
async fn signup_with_matching_passwords_reaches_profile_completion() {
    let companion = companion();
    companion.navigate(Screen::Signup).expect("welcome links to signup");

    let identity = companion.signup(signup_form()).await.expect("signup succeeds");

    assert_eq!(identity.name, "Asha Rao");
    assert_eq!(identity.emergency_contact.as_deref(), Some("+91 9000000002"));
    assert_eq!(companion.screen(), Screen::CompleteProfile);
    assert_eq!(titles(&companion), vec!["Account created!"]);
}

#[tokio::test]
async fn password_mismatch_stays_on_signup_with_error() {
    let companion = companion();
    companion.navigate(Screen::Signup).expect("welcome links to signup");
    let mut form = signup_form();
    form.confirm_password = "something-else".to_string();

    let err = companion.signup(form).await.expect_err("mismatch rejected");

    assert_eq!(err, FlowError::Validation(ValidationError::PasswordMismatch));
    assert_eq!(companion.screen(), Screen::Signup);
    assert!(companion.user().is_none());
    let notifications = companion.drain_notifications();
    assert_eq!(notifications.len(), 1);
    assert!(notifications[0].is_destructive());
    assert_eq!(notifications[0].description, "Passwords do not match");
}

#[tokio::test]
async fn blank_required_field_is_named() {
    let companion = companion();
    companion.navigate(Screen::Signup).expect("welcome links to signup");
    let mut form = signup_form();
    form.phone = "  ".to_string();

    match companion.signup(form).await {
        Err(FlowError::Validation(ValidationError::MissingField("phone"))) => {}
        other => panic!("expected missing phone, got {other:?}"),
    }
}

#[tokio::test]
async fn login_lands_on_dashboard_with_issued_id() {
    let companion = signed_in().await;

    let session = companion.session();
    assert_eq!(session.user().map(|user| user.name.as_str()), Some("Priya Sharma"));
    assert_eq!(session.last_issued_id(), Some(ISSUED_ID));
    assert_eq!(companion.history(), vec![Screen::Welcome, Screen::Login]);
}

#[tokio::test]
async fn login_requires_credentials() {
    let companion = companion();
    companion.navigate(Screen::Login).expect("welcome links to login");

    let err = companion
        .login(LoginForm {
            email: "priya@example.com".to_string(),
            password: String::new(),
        })
        .await
        .expect_err("blank password rejected");

    assert_eq!(
        err,
        FlowError::Validation(ValidationError::MissingField("password"))
    );
    assert_eq!(companion.screen(), Screen::Login);
}

#[tokio::test]
async fn operations_are_bound_to_their_screen() {
    let companion = companion();

    match companion.login(login_form()).await {
        Err(FlowError::WrongScreen { expected, actual }) => {
            assert_eq!(expected, Screen::Login);
            assert_eq!(actual, Screen::Welcome);
        }
        other => panic!("expected wrong screen, got {other:?}"),
    }
}

#[tokio::test]
async fn full_onboarding_walks_every_gate() {
    let companion = companion();
    companion.navigate(Screen::Signup).expect("welcome links to signup");
    companion.signup(signup_form()).await.expect("signup succeeds");

    match companion.navigate(Screen::DigitalId) {
        Err(FlowError::Navigation(NavigationError::Blocked { gate, .. })) => {
            assert_eq!(gate, Gate::ProfileVerified)
        }
        other => panic!("expected profile gate, got {other:?}"),
    }

    let progress = companion.verify_profile().await.expect("verification runs");
    assert!(progress.verified);
    assert_eq!(progress.percent, 100);
    assert_eq!(progress.completed, VerificationStep::ALL.to_vec());

    companion.navigate(Screen::DigitalId).expect("profile verified");
    let card = companion.issue_digital_id().await.expect("id issued");
    assert_eq!(card.id, ISSUED_ID);
    assert_eq!(card.name, "Asha Rao");
    assert_eq!(companion.issue_digital_id().await.expect("idempotent"), card);

    companion.navigate(Screen::Dashboard).expect("id issued");
    let titles = titles(&companion);
    assert_eq!(titles.last().map(String::as_str), Some("Welcome to SafeYatri!"));
    assert_eq!(
        companion.session().user().and_then(|user| user.issued_credential_id.clone()),
        Some(ISSUED_ID.to_string())
    );
}

#[tokio::test]
async fn dashboard_requires_id_after_signup() {
    let companion = companion();
    companion.navigate(Screen::Signup).expect("welcome links to signup");
    companion.signup(signup_form()).await.expect("signup succeeds");
    companion.verify_profile().await.expect("verification runs");
    companion.navigate(Screen::DigitalId).expect("profile verified");

    match companion.navigate(Screen::Dashboard) {
        Err(FlowError::Navigation(NavigationError::Blocked { gate, .. })) => {
            assert_eq!(gate, Gate::IdIssued)
        }
        other => panic!("expected id gate, got {other:?}"),
    }
}

#[tokio::test(start_paused = true)]
async fn leaving_the_screen_cancels_an_inflight_login() {
    let companion = Companion::new(Latency::default());
    companion.navigate(Screen::Login).expect("welcome links to login");

    let (login, _) = tokio::join!(companion.login(login_form()), async {
        tokio::time::sleep(std::time::Duration::from_millis(500)).await;
        companion.navigate(Screen::Signup).expect("login links to signup");
    });

    assert_eq!(
        login,
        Err(FlowError::Cancelled(Cancelled {
            operation: SimulatedOperation::Login
        }))
    );
    assert_eq!(companion.screen(), Screen::Signup);
    assert!(companion.user().is_none());
}

#[tokio::test]
async fn signing_out_resets_the_session() {
    let companion = signed_in().await;
    companion.navigate(Screen::Welcome).expect("dashboard links to welcome");

    assert!(companion.user().is_none());
    assert!(companion.session().last_issued_id().is_none());
    assert!(matches!(
        companion.navigate(Screen::Dashboard),
        Err(FlowError::Navigation(NavigationError::NoRoute { .. }))
    ));
}
