use std::sync::Mutex;
use std::time::Duration;

use tokio::sync::mpsc;

use super::common::*;
use crate::flow::{FlowError, Speaker};
use crate::navigation::Screen;
use crate::platform::{
    CapabilityError, InstallOutcome, InstallPrompt, SpeechToText, Transcript, Unavailable,
};
use crate::session::Language;
use crate::simulate::{Cancelled, SimulatedOperation};

/// Plays back a fixed script. The channel closes after the last transcript
/// unless `keep_open` is set.
#[derive(Default)]
struct Microphone {
    script: Vec<Transcript>,
    keep_open: bool,
    heard_in: Mutex<Option<Language>>,
    open: Mutex<Option<mpsc::Sender<Transcript>>>,
}

impl Microphone {
    fn closing(script: Vec<Transcript>) -> Self {
        Self {
            script,
            ..Self::default()
        }
    }

    fn listening(script: Vec<Transcript>) -> Self {
        Self {
            script,
            keep_open: true,
            ..Self::default()
        }
    }
}

impl SpeechToText for Microphone {
    fn listen(&self, language: Language) -> Result<mpsc::Receiver<Transcript>, CapabilityError> {
        *self.heard_in.lock().expect("language mutex poisoned") = Some(language);
        let (tx, rx) = mpsc::channel(self.script.len().max(1));
        for transcript in &self.script {
            tx.try_send(transcript.clone()).expect("channel sized for script");
        }
        if self.keep_open {
            *self.open.lock().expect("sender mutex poisoned") = Some(tx);
        }
        Ok(rx)
    }
}

struct Answers(Result<InstallOutcome, CapabilityError>);

impl InstallPrompt for Answers {
    fn prompt(&self) -> Result<InstallOutcome, CapabilityError> {
        self.0
    }
}

#[tokio::test]
async fn dictated_message_is_answered() {
    let companion = on_screen(Screen::Chatbot).await;
    companion.set_language(Language::Hi);
    let microphone = Microphone::closing(vec![
        Transcript::Interim("find".into()),
        Transcript::Final("find ATM".into()),
        Transcript::Interim("near".into()),
    ]);

    let reply = companion.dictate_chat(&microphone).await.expect("reply");

    assert!(reply.text.contains("ATMs"));
    assert_eq!(
        *microphone.heard_in.lock().expect("language mutex poisoned"),
        Some(Language::Hi)
    );
    let history = companion.chat_history();
    assert_eq!(history.len(), 3);
    assert_eq!(history[1].speaker, Speaker::Traveler);
    assert_eq!(history[1].text, "find ATM");
    assert_eq!(history[2].speaker, Speaker::Assistant);
}

#[tokio::test]
async fn silent_dictation_sends_nothing() {
    let companion = on_screen(Screen::Chatbot).await;
    let microphone = Microphone::closing(vec![Transcript::Interim("umm".into())]);

    let result = companion.dictate_chat(&microphone).await;

    assert!(matches!(result, Err(FlowError::Validation(_))));
    assert_eq!(companion.chat_history().len(), 1);
}

#[tokio::test(start_paused = true)]
async fn leaving_the_chat_mid_dictation_drops_the_utterance() {
    let companion = on_screen(Screen::Chatbot).await;
    let microphone = Microphone::listening(vec![Transcript::Final("find atm".into())]);

    let (result, _) = tokio::join!(companion.dictate_chat(&microphone), async {
        tokio::time::sleep(Duration::from_millis(300)).await;
        companion.navigate(Screen::Dashboard).expect("back to dashboard");
        companion.navigate(Screen::Chatbot).expect("chat again");
    });

    match result {
        Err(FlowError::Cancelled(Cancelled {
            operation: SimulatedOperation::ChatReply,
        })) => {}
        other => panic!("expected cancelled dictation, got {other:?}"),
    }
    assert_eq!(companion.screen(), Screen::Chatbot);
    let history = companion.chat_history();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].speaker, Speaker::Assistant);
}

#[tokio::test]
async fn install_prompt_reports_the_answer() {
    let companion = signed_in().await;

    assert_eq!(
        companion.request_install(&Answers(Ok(InstallOutcome::Accepted))),
        Ok(InstallOutcome::Accepted)
    );
    assert_eq!(
        companion.request_install(&Answers(Ok(InstallOutcome::Dismissed))),
        Ok(InstallOutcome::Dismissed)
    );
    assert!(titles(&companion).is_empty());
}

#[tokio::test]
async fn install_without_platform_support_is_destructive() {
    let companion = companion();

    let err = companion
        .request_install(&Unavailable)
        .expect_err("no install support");
    assert_eq!(
        err,
        FlowError::Capability(CapabilityError::Unsupported("app installation"))
    );

    let denied = companion
        .request_install(&Answers(Err(CapabilityError::Denied("app installation"))))
        .expect_err("install denied");
    assert!(matches!(denied, FlowError::Capability(CapabilityError::Denied(_))));

    let notifications = companion.drain_notifications();
    assert_eq!(notifications.len(), 2);
    assert!(notifications.iter().all(|n| n.is_destructive()));
    assert_eq!(notifications[0].title, "Install unavailable");
}
