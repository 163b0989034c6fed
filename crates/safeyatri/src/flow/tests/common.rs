use crate::flow::{Companion, LoginForm, SignupForm};
use crate::navigation::Screen;
use crate::simulate::Latency;

pub(super) fn companion() -> Companion {
    Companion::new(Latency::instant())
}

pub(super) fn signup_form() -> SignupForm {
    SignupForm {
        full_name: "Asha Rao".to_string(),
        email: "asha@example.com".to_string(),
        phone: "+91 9000000001".to_string(),
        password: "monsoon-2024".to_string(),
        confirm_password: "monsoon-2024".to_string(),
        id_type: Some("passport".to_string()),
        id_number: Some("P1234567".to_string()),
        emergency_name: Some("Ravi Rao".to_string()),
        emergency_contact: Some("+91 9000000002".to_string()),
    }
}

pub(super) fn login_form() -> LoginForm {
    LoginForm {
        email: "priya@example.com".to_string(),
        password: "secret".to_string(),
    }
}

/// Log in through the welcome screen and land on the dashboard.
pub(super) async fn signed_in() -> Companion {
    let companion = companion();
    companion.navigate(Screen::Login).expect("welcome links to login");
    companion.login(login_form()).await.expect("login succeeds");
    assert_eq!(companion.screen(), Screen::Dashboard);
    companion.drain_notifications();
    companion
}

/// Signed in and standing on `screen`.
pub(super) async fn on_screen(screen: Screen) -> Companion {
    let companion = signed_in().await;
    companion.navigate(screen).expect("dashboard links to every feature");
    companion.drain_notifications();
    companion
}

pub(super) fn titles(companion: &Companion) -> Vec<String> {
    companion
        .drain_notifications()
        .into_iter()
        .map(|notification| notification.title)
        .collect()
}
